//! Terminal rendering of a `ViewState`. Pure functions, no I/O.

use crate::domain::{CurrentConditions, ForecastEntry, Theme, UnitSystem, FORECAST_WINDOW};
use crate::utils::{format_display_date, glyph_for_icon_code, wind_direction_label};
use crate::view::controller::ViewState;
use std::fmt::Write;

const RULE: &str = "────────────────────────────────────────────";

fn whole(value: Option<f64>) -> i64 {
    value.unwrap_or(0.0).round() as i64
}

fn one_decimal(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_string(), |v| format!("{v:.1}"))
}

fn humidity_bar(percent: Option<f64>) -> String {
    let filled = (percent.unwrap_or(0.0).clamp(0.0, 100.0) / 10.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

/// Units the displayed figures were fetched in. The pending query may differ
/// while a refresh is in flight or after one failed.
fn displayed_units(state: &ViewState) -> UnitSystem {
    state
        .displayed_for
        .as_ref()
        .map_or(state.query.unit_system, |q| q.unit_system)
}

/// Full dashboard: current conditions, search line, forecast and details.
pub fn render_dashboard(state: &ViewState) -> String {
    let units = displayed_units(state);
    let empty = CurrentConditions::default();
    let current = state.current.as_ref().unwrap_or(&empty);
    let mut out = String::new();

    // The toggle offers the other theme.
    let toggle = match state.theme {
        Theme::Light => "☾",
        Theme::Dark => "☀",
    };
    let _ = writeln!(out, "{RULE} [{toggle}]");
    let _ = writeln!(
        out,
        "📍 {:<28} 📅 {}",
        current.location_name.as_deref().unwrap_or("Location"),
        format_display_date(current.observed_at_epoch_seconds)
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "   {}  {}°{}  {}",
        glyph_for_icon_code(current.icon_code.as_deref()),
        whole(current.temperature),
        units.temperature_suffix(),
        current.condition_text.as_deref().unwrap_or("Sunny")
    );
    let _ = writeln!(
        out,
        "   Wind {} {}   Humidity {}%",
        one_decimal(current.wind_speed),
        units.wind_speed_suffix(),
        current
            .humidity_percent
            .map_or_else(|| "--".to_string(), |h| whole(Some(h)).to_string())
    );
    let _ = writeln!(out, "{RULE}");

    let button = if state.busy() { "..." } else { "Go" };
    let _ = writeln!(
        out,
        "🔍 {:<30} [{}]   {}",
        state.query.city,
        button,
        unit_toggle(state.query.unit_system)
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "3-Day Forecast");
    for line in forecast_cells(&state.forecast, units) {
        let _ = writeln!(out, "  {line}");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Weather Details");
    let _ = writeln!(
        out,
        "  Wind Status  {} {}  ({})",
        one_decimal(current.wind_speed),
        units.wind_speed_suffix(),
        wind_direction_label(current.wind_degrees)
    );
    let _ = writeln!(
        out,
        "  Humidity     {}%  {}",
        whole(current.humidity_percent),
        humidity_bar(current.humidity_percent)
    );
    let _ = write!(out, "{RULE}");
    out
}

fn unit_toggle(units: UnitSystem) -> &'static str {
    match units {
        UnitSystem::Metric => "[°C] °F",
        UnitSystem::Imperial => "°C [°F]",
    }
}

fn forecast_cells(forecast: &[ForecastEntry], units: UnitSystem) -> Vec<String> {
    let suffix = units.temperature_suffix();
    if forecast.is_empty() {
        return (1..=FORECAST_WINDOW)
            .map(|day| format!("{:<12} ☀️  --°{}", format!("Day {day}"), suffix))
            .collect();
    }

    forecast
        .iter()
        .map(|entry| {
            format!(
                "{:<12} {}  {}-{}°{}",
                format_display_date(entry.at_epoch_seconds),
                glyph_for_icon_code(entry.icon_code.as_deref()),
                whole(entry.temp_min),
                whole(entry.temp_max),
                suffix
            )
        })
        .collect()
}

/// One-line card: city, date, glyph, temperature and description.
pub fn render_card(state: &ViewState) -> String {
    let units = displayed_units(state);
    match &state.current {
        Some(current) => format!(
            "{} · {} · {} {}°{} {}",
            current.location_name.as_deref().unwrap_or(&state.query.city),
            format_display_date(current.observed_at_epoch_seconds),
            glyph_for_icon_code(current.icon_code.as_deref()),
            whole(current.temperature),
            units.temperature_suffix(),
            current.condition_text.as_deref().unwrap_or("")
        )
        .trim_end()
        .to_string(),
        None => format!("{} · no data yet", state.query.city),
    }
}
