//! Forecast and projection display

use crate::models::{Forecast, ProjectionPoint};

use super::format::{column_width, money, separator};

/// Expected growth per tier over the forecast horizon
pub fn format_forecast(forecast: &Forecast, symbol: &str) -> String {
    let mut output = format!("Expected growth over {} month(s)\n", forecast.months);
    if forecast.tiers.is_empty() {
        output.push_str("No tiers defined.\n");
        return output;
    }

    let width = column_width("Tier", forecast.tiers.iter().map(|t| t.tier.as_str()));
    output.push_str(&format!("{:<width$}  {:>14}\n", "Tier", "Growth"));
    output.push_str(&format!("{}\n", separator(width + 16)));
    for t in &forecast.tiers {
        output.push_str(&format!("{:<width$}  {:>14}\n", t.tier, money(t.growth, symbol)));
    }
    output.push_str(&format!("{}\n", separator(width + 16)));
    output.push_str(&format!("{:<width$}  {:>14}\n", "TOTAL", money(forecast.total(), symbol)));
    output
}

/// Month-by-month balance projection
pub fn format_projection(points: &[ProjectionPoint], symbol: &str) -> String {
    if points.is_empty() {
        return "Nothing to project.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:>16}  {:>14}  {:>14}\n",
        "Month", "Balance", "Contributed", "Interest"
    ));
    output.push_str(&format!("{}\n", separator(55)));
    for p in points {
        output.push_str(&format!(
            "{:>5}  {:>16}  {:>14}  {:>14}\n",
            p.month,
            money(p.balance, symbol),
            money(p.contributed, symbol),
            money(p.interest, symbol),
        ));
    }

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        output.push_str(&format!(
            "Change over {} month(s): {}\n",
            last.month,
            money(last.balance - first.balance, symbol)
        ));
    }
    output
}
