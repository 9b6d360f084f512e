//! Turns a raw forecast payload into a [`PresentationModel`].
//!
//! All timestamps in the payload are local wall-clock strings for the forecast
//! location (the forecast is requested with `timezone=auto`), so "now" is a
//! [`NaiveDateTime`] on that same clock.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::{
    codes,
    error::ProjectionError,
    model::{
        CurrentSnapshot, DailySummary, DayPhase, HourlySample, MISSING_TIME, PresentationModel,
        TodaySummary,
    },
    payload::{RawCurrent, RawDaily, RawForecastPayload, RawHourly},
    units::{self, UnitSystem},
};

const HOURLY_STRIDE: usize = 3;
const HOURLY_SAMPLES: usize = 8;
const DAILY_ENTRIES: usize = 5;
/// Real UTC offsets stay within ±18 hours.
const MAX_UTC_OFFSET_SECONDS: i64 = 18 * 3600;

/// How sunrise/sunset times are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockStyle {
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

impl ClockStyle {
    pub fn short_time(&self, at: NaiveDateTime) -> String {
        match self {
            ClockStyle::TwentyFourHour => at.format("%H:%M").to_string(),
            ClockStyle::TwelveHour => at.format("%-I:%M %p").to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Projector {
    clock: ClockStyle,
}

/// Projects with the default 24-hour clock.
pub fn project(
    raw: &RawForecastPayload,
    now: NaiveDateTime,
    system: UnitSystem,
) -> Result<PresentationModel, ProjectionError> {
    Projector::default().project(raw, now, system)
}

impl Projector {
    pub fn new(clock: ClockStyle) -> Self {
        Self { clock }
    }

    pub fn project(
        &self,
        raw: &RawForecastPayload,
        now: NaiveDateTime,
        system: UnitSystem,
    ) -> Result<PresentationModel, ProjectionError> {
        let (current, hourly, daily) = validate(raw)?;

        let hourly_times = hourly
            .time
            .iter()
            .map(|t| parse_timestamp(t).ok_or_else(|| malformed(format!("hourly time '{t}'"))))
            .collect::<Result<Vec<_>, _>>()?;
        let daily_dates = daily
            .time
            .iter()
            .map(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|_| malformed(format!("daily date '{d}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PresentationModel {
            units: system,
            current: self.current(current, system),
            today: self.today(daily, system),
            hourly: self.hourly(hourly, &hourly_times, now, system),
            daily: self.daily(daily, &daily_dates, now, system),
        })
    }

    fn current(&self, current: &RawCurrent, system: UnitSystem) -> CurrentSnapshot {
        CurrentSnapshot {
            temperature: units::temperature(current.temperature_2m, system),
            unit_suffix: system.temperature_suffix().to_string(),
            description: codes::describe(current.weather_code).to_string(),
            icon_id: codes::icon_id(current.weather_code, current.is_day),
            humidity_pct: current.relative_humidity_2m,
            wind: units::speed(current.wind_speed_10m, system),
            feels_like: units::temperature(current.apparent_temperature, system),
            visibility: current.visibility.map(|m| units::distance(m, system)),
            day_or_night: DayPhase::from_flag(current.is_day),
        }
    }

    fn today(&self, daily: &RawDaily, system: UnitSystem) -> TodaySummary {
        TodaySummary {
            high: units::temperature(daily.temperature_2m_max[0], system),
            low: units::temperature(daily.temperature_2m_min[0], system),
            rain_chance_pct: numeric_at(&daily.precipitation_probability_max, 0),
            uv_index: Some(numeric_at(&daily.uv_index_max, 0)),
            sunrise: self.time_at(&daily.sunrise, 0),
            sunset: self.time_at(&daily.sunset, 0),
        }
    }

    fn hourly(
        &self,
        hourly: &RawHourly,
        times: &[NaiveDateTime],
        now: NaiveDateTime,
        system: UnitSystem,
    ) -> Vec<HourlySample> {
        // With every timestamp in the past the strip still starts from the first hour.
        let start = times.iter().position(|t| *t >= now).unwrap_or(0);

        (start..times.len())
            .step_by(HOURLY_STRIDE)
            .take(HOURLY_SAMPLES)
            .map(|i| HourlySample {
                time_label: times[i].format("%-I %p").to_string(),
                temperature: units::temperature(hourly.temperature_2m[i], system),
                icon_id: codes::icon_id(hourly.weather_code[i], hourly.is_day[i]),
            })
            .collect()
    }

    fn daily(
        &self,
        daily: &RawDaily,
        dates: &[NaiveDate],
        now: NaiveDateTime,
        system: UnitSystem,
    ) -> Vec<DailySummary> {
        let cutoff = (now.date() + Duration::days(1)).format("%Y-%m-%d").to_string();

        daily
            .time
            .iter()
            .enumerate()
            .filter(|(_, date)| date.as_str() > cutoff.as_str())
            .take(DAILY_ENTRIES)
            .map(|(i, date)| DailySummary {
                date: date.clone(),
                day_name: dates[i].format("%A").to_string(),
                high: units::temperature(daily.temperature_2m_max[i], system),
                low: units::temperature(daily.temperature_2m_min[i], system),
                icon_id: codes::icon_id(daily.weather_code[i], true),
                rain_chance_pct: numeric_at(&daily.precipitation_probability_max, i),
                wind: units::speed(numeric_at(&daily.wind_speed_10m_max, i), system),
                sunrise: self.time_at(&daily.sunrise, i),
                sunset: self.time_at(&daily.sunset, i),
            })
            .collect()
    }

    fn time_at(&self, values: &Option<Vec<Option<String>>>, index: usize) -> String {
        values
            .as_ref()
            .and_then(|v| v.get(index))
            .and_then(|s| s.as_deref())
            .and_then(parse_timestamp)
            .map(|t| self.clock.short_time(t))
            .unwrap_or_else(|| MISSING_TIME.to_string())
    }
}

fn validate(
    raw: &RawForecastPayload,
) -> Result<(&RawCurrent, &RawHourly, &RawDaily), ProjectionError> {
    utc_offset(raw)?;

    let current = raw.current.as_ref().ok_or_else(|| malformed("missing current section"))?;
    let hourly = raw.hourly.as_ref().ok_or_else(|| malformed("missing hourly section"))?;
    let daily = raw.daily.as_ref().ok_or_else(|| malformed("missing daily section"))?;

    let hours = hourly.time.len();
    same_length("hourly.temperature_2m", hourly.temperature_2m.len(), hours)?;
    same_length("hourly.weather_code", hourly.weather_code.len(), hours)?;
    same_length("hourly.is_day", hourly.is_day.len(), hours)?;

    let days = daily.time.len();
    if days == 0 {
        return Err(malformed("daily section has no entries"));
    }
    same_length("daily.temperature_2m_max", daily.temperature_2m_max.len(), days)?;
    same_length("daily.temperature_2m_min", daily.temperature_2m_min.len(), days)?;
    same_length("daily.weather_code", daily.weather_code.len(), days)?;

    let optional = [
        ("daily.sunrise", daily.sunrise.as_ref().map(Vec::len)),
        ("daily.sunset", daily.sunset.as_ref().map(Vec::len)),
        (
            "daily.precipitation_probability_max",
            daily.precipitation_probability_max.as_ref().map(Vec::len),
        ),
        ("daily.wind_speed_10m_max", daily.wind_speed_10m_max.as_ref().map(Vec::len)),
        ("daily.uv_index_max", daily.uv_index_max.as_ref().map(Vec::len)),
    ];
    for (name, len) in optional {
        if let Some(len) = len {
            same_length(name, len, days)?;
        }
    }

    Ok((current, hourly, daily))
}

/// The payload's offset from UTC; a missing offset means UTC.
pub(crate) fn utc_offset(raw: &RawForecastPayload) -> Result<TimeDelta, ProjectionError> {
    let seconds = raw.utc_offset_seconds.unwrap_or(0);
    if !(-MAX_UTC_OFFSET_SECONDS..=MAX_UTC_OFFSET_SECONDS).contains(&seconds) {
        return Err(malformed(format!("utc_offset_seconds {seconds} out of range")));
    }
    TimeDelta::try_seconds(seconds)
        .ok_or_else(|| malformed(format!("utc_offset_seconds {seconds} out of range")))
}

fn same_length(name: &str, len: usize, expected: usize) -> Result<(), ProjectionError> {
    if len == expected {
        Ok(())
    } else {
        Err(malformed(format!("{name} has {len} entries, expected {expected}")))
    }
}

fn malformed(detail: impl Into<String>) -> ProjectionError {
    ProjectionError::MalformedPayload(detail.into())
}

fn numeric_at(values: &Option<Vec<Option<f64>>>, index: usize) -> f64 {
    values.as_ref().and_then(|v| v.get(index)).copied().flatten().unwrap_or(0.0)
}

/// Parses `YYYY-MM-DDTHH:MM[:SS]`, or an RFC 3339 timestamp taken at its own local time.
pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_local()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_timestamp(s).expect("valid timestamp")
    }

    fn current() -> RawCurrent {
        RawCurrent {
            temperature_2m: 20.0,
            weather_code: 0,
            is_day: true,
            relative_humidity_2m: 40.0,
            apparent_temperature: 19.6,
            wind_speed_10m: 16.0,
            visibility: None,
        }
    }

    fn hourly(start: &str, hours: usize) -> RawHourly {
        let first = at(start);
        let time = (0..hours)
            .map(|h| (first + Duration::hours(h as i64)).format("%Y-%m-%dT%H:%M").to_string())
            .collect();
        RawHourly {
            time,
            temperature_2m: (0..hours).map(|h| h as f64).collect(),
            weather_code: vec![61; hours],
            is_day: (0..hours).map(|h| (6..18).contains(&(h % 24))).collect(),
        }
    }

    fn daily(first: &str, days: usize) -> RawDaily {
        let first = NaiveDate::parse_from_str(first, "%Y-%m-%d").expect("date");
        let dates: Vec<NaiveDate> = (0..days).map(|d| first + Duration::days(d as i64)).collect();
        RawDaily {
            time: dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect(),
            temperature_2m_max: (0..days).map(|d| 25.0 + d as f64).collect(),
            temperature_2m_min: (0..days).map(|d| 12.0 + d as f64).collect(),
            weather_code: vec![3; days],
            sunrise: Some(dates.iter().map(|d| Some(format!("{d}T05:21"))).collect()),
            sunset: Some(dates.iter().map(|d| Some(format!("{d}T21:07"))).collect()),
            precipitation_probability_max: Some(vec![Some(40.0); days]),
            wind_speed_10m_max: Some(vec![Some(20.0); days]),
            uv_index_max: Some(vec![Some(6.5); days]),
        }
    }

    fn payload() -> RawForecastPayload {
        RawForecastPayload {
            utc_offset_seconds: Some(0),
            timezone: None,
            current: Some(current()),
            hourly: Some(hourly("2024-07-15T00:00", 24)),
            daily: Some(daily("2024-07-15", 8)),
        }
    }

    #[test]
    fn clear_sky_in_fahrenheit() {
        let model = project(&payload(), at("2024-07-15T10:30"), UnitSystem::Imperial)
            .expect("projects");

        assert_eq!(model.current.temperature, 68.0);
        assert_eq!(model.current.unit_suffix, "°F");
        assert_eq!(model.current.icon_id, "01d");
        assert_eq!(model.current.description, "Clear sky");
        assert_eq!(model.current.wind, 10.0);
        assert_eq!(model.current.feels_like, 67.0);
        assert_eq!(model.current.day_or_night, DayPhase::Day);
    }

    #[test]
    fn night_flag_selects_night_icon() {
        let mut raw = payload();
        if let Some(current) = raw.current.as_mut() {
            current.is_day = false;
            current.weather_code = 95;
        }
        let model = project(&raw, at("2024-07-15T23:00"), UnitSystem::Metric).expect("projects");
        assert_eq!(model.current.icon_id, "11n");
        assert_eq!(model.current.day_or_night, DayPhase::Night);
    }

    #[test]
    fn visibility_is_projected_when_present() {
        let mut raw = payload();
        if let Some(current) = raw.current.as_mut() {
            current.visibility = Some(24140.0);
        }
        let metric = project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).expect("metric");
        let imperial =
            project(&raw, at("2024-07-15T10:00"), UnitSystem::Imperial).expect("imperial");
        assert_eq!(metric.current.visibility.as_deref(), Some("24.1"));
        assert_eq!(imperial.current.visibility.as_deref(), Some("15.0"));

        let without = project(&payload(), at("2024-07-15T10:00"), UnitSystem::Metric)
            .expect("projects");
        assert_eq!(without.current.visibility, None);
    }

    #[test]
    fn missing_sections_are_malformed() {
        let mut raw = payload();
        raw.daily = None;
        let err = project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).unwrap_err();
        assert_eq!(err, ProjectionError::MalformedPayload("missing daily section".into()));

        let mut raw = payload();
        raw.current = None;
        assert!(project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).is_err());

        let mut raw = payload();
        raw.hourly = None;
        assert!(project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).is_err());
    }

    #[test]
    fn mismatched_array_lengths_are_malformed() {
        let mut raw = payload();
        if let Some(hourly) = raw.hourly.as_mut() {
            hourly.weather_code.pop();
        }
        let err = project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).unwrap_err();
        assert!(err.to_string().contains("hourly.weather_code"));

        let mut raw = payload();
        if let Some(daily) = raw.daily.as_mut() {
            daily.uv_index_max = Some(vec![Some(1.0)]);
        }
        let err = project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).unwrap_err();
        assert!(err.to_string().contains("daily.uv_index_max"));
    }

    #[test]
    fn out_of_range_utc_offset_is_malformed() {
        for offset in [18 * 3600 + 1, -(18 * 3600 + 1), 100_000_000_000_000, i64::MAX, i64::MIN] {
            let mut raw = payload();
            raw.utc_offset_seconds = Some(offset);
            let err = project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).unwrap_err();
            assert!(err.to_string().contains("utc_offset_seconds"), "offset {offset}");
        }

        let mut raw = payload();
        raw.utc_offset_seconds = Some(-18 * 3600);
        assert!(project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).is_ok());
    }

    #[test]
    fn empty_daily_is_malformed() {
        let mut raw = payload();
        raw.daily = Some(RawDaily::default());
        assert!(project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).is_err());
    }

    #[test]
    fn unparseable_hourly_time_is_malformed() {
        let mut raw = payload();
        if let Some(hourly) = raw.hourly.as_mut() {
            hourly.time[3] = "yesterday".into();
        }
        let err = project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn hourly_before_all_samples_starts_at_first() {
        let model = project(&payload(), at("2024-07-14T20:00"), UnitSystem::Metric)
            .expect("projects");

        assert_eq!(model.hourly.len(), 8);
        let temps: Vec<f64> = model.hourly.iter().map(|h| h.temperature).collect();
        assert_eq!(temps, vec![0.0, 3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0]);
        assert_eq!(model.hourly[0].time_label, "12 AM");
        assert_eq!(model.hourly[5].time_label, "3 PM");
    }

    #[test]
    fn hourly_starts_at_first_upcoming_hour() {
        let model = project(&payload(), at("2024-07-15T10:30"), UnitSystem::Metric)
            .expect("projects");

        // 11:00 onward, stride 3, runs out of data after 5 samples
        let labels: Vec<&str> = model.hourly.iter().map(|h| h.time_label.as_str()).collect();
        assert_eq!(labels, vec!["11 AM", "2 PM", "5 PM", "8 PM", "11 PM"]);
        assert_eq!(model.hourly[0].icon_id, "10d");
        assert_eq!(model.hourly[3].icon_id, "10n");
    }

    #[test]
    fn hourly_in_the_past_falls_back_to_first_sample() {
        let model = project(&payload(), at("2024-07-20T12:00"), UnitSystem::Metric)
            .expect("projects");
        assert_eq!(model.hourly.len(), 8);
        assert_eq!(model.hourly[0].time_label, "12 AM");
    }

    // Every date up to and including tomorrow is skipped, so the list opens on day index 2.
    #[test]
    fn daily_list_starts_after_tomorrow() {
        let model = project(&payload(), at("2024-07-15T10:00"), UnitSystem::Metric)
            .expect("projects");

        assert_eq!(model.daily.len(), 5);
        let dates: Vec<&str> = model.daily.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2024-07-17", "2024-07-18", "2024-07-19", "2024-07-20", "2024-07-21"]
        );
        // 2024-07-17 was a Wednesday
        assert_eq!(model.daily[0].day_name, "Wednesday");
        assert_eq!(model.daily[0].high, 27.0);
        assert_eq!(model.daily[0].low, 14.0);
        assert_eq!(model.daily[0].icon_id, "04d");
        assert_eq!(model.daily[0].rain_chance_pct, 40.0);
        assert_eq!(model.daily[0].wind, 20.0);
        assert_eq!(model.daily[0].sunrise, "05:21");
        assert_eq!(model.daily[0].sunset, "21:07");
    }

    #[test]
    fn daily_list_is_capped_by_available_days() {
        let mut raw = payload();
        raw.daily = Some(daily("2024-07-15", 4));
        let model = project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).expect("projects");
        assert_eq!(model.daily.len(), 2);
    }

    #[test]
    fn today_block_uses_first_day() {
        let model = project(&payload(), at("2024-07-15T10:00"), UnitSystem::Metric)
            .expect("projects");

        assert_eq!(model.today.high, 25.0);
        assert_eq!(model.today.low, 12.0);
        assert_eq!(model.today.rain_chance_pct, 40.0);
        assert_eq!(model.today.uv_index, Some(6.5));
        assert_eq!(model.today.sunrise, "05:21");
        assert_eq!(model.today.sunset, "21:07");
    }

    #[test]
    fn missing_optional_daily_arrays_use_defaults() {
        let mut raw = payload();
        if let Some(daily) = raw.daily.as_mut() {
            daily.sunrise = None;
            daily.sunset = None;
            daily.precipitation_probability_max = None;
            daily.uv_index_max = None;
            daily.wind_speed_10m_max = None;
        }
        let model = project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).expect("projects");

        assert_eq!(model.today.rain_chance_pct, 0.0);
        assert_eq!(model.today.uv_index, Some(0.0));
        assert_eq!(model.today.sunrise, MISSING_TIME);
        assert_eq!(model.today.sunset, MISSING_TIME);
        for day in &model.daily {
            assert_eq!(day.rain_chance_pct, 0.0);
            assert_eq!(day.wind, 0.0);
            assert_eq!(day.sunrise, "--:--");
            assert_eq!(day.sunset, "--:--");
        }
    }

    #[test]
    fn null_entries_fall_back_to_defaults() {
        let mut raw = payload();
        if let Some(daily) = raw.daily.as_mut() {
            daily.precipitation_probability_max = Some(vec![None; 8]);
            daily.uv_index_max = Some(vec![None; 8]);
            daily.wind_speed_10m_max = Some(vec![None; 8]);
            daily.sunrise = Some(vec![None; 8]);
        }
        let model = project(&raw, at("2024-07-15T10:00"), UnitSystem::Metric).expect("projects");

        assert_eq!(model.today.rain_chance_pct, 0.0);
        assert_eq!(model.today.uv_index, Some(0.0));
        assert_eq!(model.today.sunrise, MISSING_TIME);
        assert_eq!(model.today.sunset, "21:07");
        assert_eq!(model.daily[0].wind, 0.0);
    }

    #[test]
    fn twelve_hour_clock_for_sun_times() {
        let model = Projector::new(ClockStyle::TwelveHour)
            .project(&payload(), at("2024-07-15T10:00"), UnitSystem::Metric)
            .expect("projects");
        assert_eq!(model.today.sunrise, "5:21 AM");
        assert_eq!(model.today.sunset, "9:07 PM");
    }

    #[test]
    fn same_unit_projection_is_idempotent() {
        let now = at("2024-07-15T10:00");
        for system in UnitSystem::all() {
            let first = project(&payload(), now, *system).expect("projects");
            let second = project(&payload(), now, *system).expect("projects");
            assert_eq!(first, second);
        }
    }

    #[test]
    fn parses_timestamp_variants() {
        assert!(parse_timestamp("2024-07-15T05:21").is_some());
        assert!(parse_timestamp("2024-07-15T05:21:30").is_some());
        assert_eq!(
            parse_timestamp("2024-07-15T05:21:00-04:00"),
            parse_timestamp("2024-07-15T05:21")
        );
        assert!(parse_timestamp("05:21").is_none());
    }
}
