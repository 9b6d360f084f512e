use std::fmt::Write;

use skyboard_core::{DashboardView, units::whole};

/// Terminal glyph for an icon id such as `"10n"`.
fn glyph(icon_id: &str) -> &'static str {
    let night = icon_id.ends_with('n');
    match icon_id.get(..2) {
        Some("01") if night => "🌙",
        Some("01") => "☀️",
        Some("02") if night => "🌙",
        Some("02") => "🌤️",
        Some("03") => "⛅",
        Some("04") => "☁️",
        Some("10") => "🌧️",
        Some("11") => "⛈️",
        Some("13") => "❄️",
        Some("50") => "🌫️",
        _ => "·",
    }
}

pub fn render(view: &DashboardView) -> String {
    let model = &view.model;
    let units = model.units;
    let deg = "°";
    let mut out = String::new();

    let c = &model.current;
    let _ = writeln!(
        out,
        "{} {}  {} ({})",
        glyph(&c.icon_id),
        view.location_name,
        c.description,
        c.day_or_night
    );
    let _ = writeln!(
        out,
        "  {}{}  feels like {}{}",
        whole(c.temperature),
        c.unit_suffix,
        whole(c.feels_like),
        c.unit_suffix
    );
    let _ = write!(
        out,
        "  Humidity {}%  Wind {} {}",
        whole(c.humidity_pct),
        whole(c.wind),
        units.speed_suffix()
    );
    if let Some(visibility) = &c.visibility {
        let _ = write!(out, "  Visibility {} {}", visibility, units.distance_suffix());
    }
    out.push('\n');

    let t = &model.today;
    let _ = write!(
        out,
        "\nToday  H {}{deg} L {}{deg}  Rain {}%",
        whole(t.high),
        whole(t.low),
        whole(t.rain_chance_pct)
    );
    if let Some(uv) = t.uv_index {
        let _ = write!(out, "  UV {uv}");
    }
    let _ = writeln!(out, "  Sunrise {}  Sunset {}", t.sunrise, t.sunset);

    if !model.hourly.is_empty() {
        out.push_str("\nNext hours\n");
        let strip: Vec<String> = model
            .hourly
            .iter()
            .map(|h| {
                format!("{:>5} {} {:>3}{deg}", h.time_label, glyph(&h.icon_id), whole(h.temperature))
            })
            .collect();
        let _ = writeln!(out, "  {}", strip.join("  "));
    }

    if !model.daily.is_empty() {
        out.push_str("\nForecast\n");
        for day in &model.daily {
            let _ = writeln!(
                out,
                "  {:<9} {} H {:>3}{deg} L {:>3}{deg}  Rain {:>3}%  Wind {:>3} {}  Sun {}-{}",
                day.day_name,
                glyph(&day.icon_id),
                whole(day.high),
                whole(day.low),
                whole(day.rain_chance_pct),
                whole(day.wind),
                units.speed_suffix(),
                day.sunrise,
                day.sunset
            );
        }
    }

    if !view.advisories.is_empty() {
        out.push_str("\nAdvisories\n");
        for advisory in &view.advisories {
            let _ = writeln!(out, "  ! {}", advisory.event_name);
        }
    }

    out
}
