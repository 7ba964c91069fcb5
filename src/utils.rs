/// Utility functions
use chrono::{DateTime, Local, TimeZone, Utc};

const DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

const DEFAULT_ICON_CODE: &str = "01d";
const SUN: &str = "☀️";

/// Compass label for a wind bearing in degrees; missing bearings read as 0
pub fn wind_direction_label(degrees: Option<f64>) -> &'static str {
    let degrees = degrees.unwrap_or(0.0);
    if !degrees.is_finite() {
        return DIRECTIONS[0];
    }
    let sector = (degrees.rem_euclid(360.0) / 45.0).round() as usize;
    DIRECTIONS[sector % DIRECTIONS.len()]
}

/// Glyph for a provider icon code, keyed on its first two characters
pub fn glyph_for_icon_code(code: Option<&str>) -> &'static str {
    let code = code.unwrap_or(DEFAULT_ICON_CODE);
    match code.get(..2) {
        Some("01") => SUN,
        Some("02") => "⛅",
        Some("03") | Some("04") => "☁️",
        Some("09") => "🌧️",
        Some("10") => "🌦️",
        Some("11") => "⛈️",
        Some("13") => "❄️",
        Some("50") => "🌫️",
        _ => SUN,
    }
}

/// Provider-hosted image for an icon code
pub fn icon_image_url(code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{code}@2x.png")
}

/// Short en-GB date ("Mon 15 Jan") in the local zone; missing means now
pub fn format_display_date(epoch_seconds: Option<i64>) -> String {
    format_display_date_in(epoch_seconds, &Local)
}

pub fn format_display_date_in<Tz>(epoch_seconds: Option<i64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let utc = epoch_seconds
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        .unwrap_or_else(Utc::now);
    utc.with_timezone(tz).format("%a %-d %b").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_direction_cardinal_points() {
        assert_eq!(wind_direction_label(Some(0.0)), "N");
        assert_eq!(wind_direction_label(Some(90.0)), "E");
        assert_eq!(wind_direction_label(Some(180.0)), "S");
        assert_eq!(wind_direction_label(Some(270.0)), "W");
        assert_eq!(wind_direction_label(Some(315.0)), "NW");
    }

    #[test]
    fn test_wind_direction_rounds_to_nearest_sector() {
        assert_eq!(wind_direction_label(Some(22.4)), "N");
        assert_eq!(wind_direction_label(Some(22.5)), "NE");
        assert_eq!(wind_direction_label(Some(350.0)), "N");
        assert_eq!(wind_direction_label(Some(337.6)), "N");
    }

    #[test]
    fn test_wind_direction_defaults_to_north() {
        assert_eq!(wind_direction_label(None), "N");
        assert_eq!(wind_direction_label(Some(f64::NAN)), "N");
    }

    #[test]
    fn test_wind_direction_is_periodic() {
        let mut d = -720.0;
        while d <= 720.0 {
            assert_eq!(
                wind_direction_label(Some(d)),
                wind_direction_label(Some(d + 360.0)),
                "bearing {d}"
            );
            d += 7.5;
        }
        assert_eq!(wind_direction_label(Some(-90.0)), "W");
    }

    #[test]
    fn test_glyph_known_codes() {
        assert_eq!(glyph_for_icon_code(Some("01d")), "☀️");
        assert_eq!(glyph_for_icon_code(Some("02n")), "⛅");
        assert_eq!(glyph_for_icon_code(Some("04d")), "☁️");
        assert_eq!(glyph_for_icon_code(Some("09d")), "🌧️");
        assert_eq!(glyph_for_icon_code(Some("10n")), "🌦️");
        assert_eq!(glyph_for_icon_code(Some("11d")), "⛈️");
        assert_eq!(glyph_for_icon_code(Some("13d")), "❄️");
        assert_eq!(glyph_for_icon_code(Some("50n")), "🌫️");
    }

    #[test]
    fn test_glyph_is_keyed_on_prefix() {
        for (a, b) in [("10d", "10n"), ("03d", "03x"), ("13", "13zz")] {
            assert_eq!(glyph_for_icon_code(Some(a)), glyph_for_icon_code(Some(b)));
        }
    }

    #[test]
    fn test_glyph_falls_back_to_sun() {
        assert_eq!(glyph_for_icon_code(None), "☀️");
        assert_eq!(glyph_for_icon_code(Some("99d")), "☀️");
        assert_eq!(glyph_for_icon_code(Some("1")), "☀️");
        assert_eq!(glyph_for_icon_code(Some("")), "☀️");
    }

    #[test]
    fn test_icon_image_url() {
        assert_eq!(
            icon_image_url("10d"),
            "https://openweathermap.org/img/wn/10d@2x.png"
        );
    }

    #[test]
    fn test_format_display_date_in_utc() {
        // 2024-01-15T10:50:00Z
        assert_eq!(format_display_date_in(Some(1705315800), &Utc), "Mon 15 Jan");
        // 2024-02-05T00:00:00Z
        assert_eq!(format_display_date_in(Some(1707091200), &Utc), "Mon 5 Feb");
    }

    #[test]
    fn test_format_display_date_defaults_to_now() {
        let expected = Utc::now().format("%a %-d %b").to_string();
        assert_eq!(format_display_date_in(None, &Utc), expected);
    }
}
