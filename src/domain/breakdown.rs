//! Display lines for a computed quote.

use super::quote::PriceBreakdown;

pub const CURRENCY_LABEL: &str = "Rs.";

#[derive(Clone, Debug, PartialEq)]
pub struct BreakdownLine {
    pub label: &'static str,
    pub value: String,
    pub is_total: bool,
}

impl BreakdownLine {
    fn item(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            is_total: false,
        }
    }
}

pub fn format_amount(amount: f64) -> String {
    format!("{CURRENCY_LABEL} {amount:.2}")
}

pub fn format_distance(distance_km: f64) -> String {
    format!("{distance_km:.2} km")
}

pub fn format_multiplier(multiplier: f64) -> String {
    format!("{multiplier}x")
}

/// Itemized lines in display order. Volume charge, package multiplier and
/// insurance only appear when they affect the price.
pub fn breakdown_lines(breakdown: &PriceBreakdown) -> Vec<BreakdownLine> {
    let mut lines = vec![
        BreakdownLine::item("Distance", format_distance(breakdown.distance_km)),
        BreakdownLine::item("Base Rate", format_amount(breakdown.base_rate)),
        BreakdownLine::item("Distance Cost", format_amount(breakdown.distance_cost)),
        BreakdownLine::item("Service Charge", format_amount(breakdown.service_charge)),
        BreakdownLine::item("Fuel Surcharge", format_amount(breakdown.fuel_surcharge)),
    ];

    if breakdown.volume_charge > 0.0 {
        lines.push(BreakdownLine::item(
            "Volume Charge",
            format_amount(breakdown.volume_charge),
        ));
    }
    if breakdown.package_multiplier != 1.0 {
        lines.push(BreakdownLine::item(
            "Package Type Multiplier",
            format_multiplier(breakdown.package_multiplier),
        ));
    }
    if breakdown.insurance_cost > 0.0 {
        lines.push(BreakdownLine::item(
            "Insurance",
            format_amount(breakdown.insurance_cost),
        ));
    }

    lines.push(BreakdownLine {
        label: "Total Cost",
        value: format_amount(breakdown.total_price),
        is_total: true,
    });
    lines
}
