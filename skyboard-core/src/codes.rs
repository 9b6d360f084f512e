//! WMO weather code lookups.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

/// Human-readable description for a WMO weather code, or `"Unknown"`.
pub fn describe(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Icon identifier (e.g. `"10n"`) for a code and day/night flag.
///
/// Codes outside the table fall back to the broken-clouds icon.
pub fn icon_id(code: i32, is_day: bool) -> String {
    let base = match code {
        0 => "01",
        1 => "02",
        2 => "03",
        3 => "04",
        45 | 48 => "50",
        51 | 53 | 55 | 56 | 57 | 61 | 63 | 65 | 66 | 67 | 80 | 81 | 82 => "10",
        71 | 73 | 75 | 77 | 85 | 86 => "13",
        95 | 96 | 99 => "11",
        _ => "03",
    };
    let suffix = if is_day { 'd' } else { 'n' };

    format!("{base}{suffix}")
}
