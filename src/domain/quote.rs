//! Shipping price calculation.
//!
//! Every quote is a pure function of a [`ShipmentInput`]: the same input always
//! produces the same [`PriceBreakdown`], and every intermediate line item is kept
//! so the breakdown can be itemized on screen.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::shipment::ShipmentInput;

pub const BASE_RATE: f64 = 80.0;
pub const RATE_PER_KM: f64 = 2.0;
pub const SERVICE_CHARGE: f64 = 50.0;
/// Fuel surcharge per driven kilometre.
pub const FUEL_RATE_PER_KM: f64 = 0.5;
/// Volume (m³) above which the volume charge applies. Exactly this volume is free.
pub const VOLUME_THRESHOLD_M3: f64 = 0.01;
pub const VOLUME_RATE_PER_M3: f64 = 100.0;
pub const INSURANCE_RATE: f64 = 0.1;

const CM3_PER_M3: f64 = 1_000_000.0;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("invalid package type: {0:?}")]
    InvalidPackageType(String),
}

/// Itemized price for a single shipment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_rate: f64,
    pub distance_cost: f64,
    pub service_charge: f64,
    pub fuel_surcharge: f64,
    pub volume_charge: f64,
    pub package_multiplier: f64,
    pub insurance_cost: f64,
    pub total_price: f64,
    pub distance_km: f64,
}

impl PriceBreakdown {
    /// Sum of the line items before the package multiplier is applied.
    pub fn subtotal(&self) -> f64 {
        self.base_rate
            + self.distance_cost
            + self.service_charge
            + self.fuel_surcharge
            + self.volume_charge
    }

    /// Total after the package multiplier, before insurance.
    pub fn pre_insurance_total(&self) -> f64 {
        self.subtotal() * self.package_multiplier
    }
}

pub fn volume_m3(length_cm: f64, width_cm: f64, height_cm: f64) -> f64 {
    (length_cm * width_cm * height_cm) / CM3_PER_M3
}

pub fn volume_charge(volume_m3: f64) -> f64 {
    if volume_m3 > VOLUME_THRESHOLD_M3 {
        volume_m3 * VOLUME_RATE_PER_M3
    } else {
        0.0
    }
}

pub fn compute_quote(input: &ShipmentInput) -> PriceBreakdown {
    let distance_km = input.distance_km;
    let dims = input.dimensions;

    let distance_cost = distance_km * RATE_PER_KM;
    let fuel_surcharge = distance_km * FUEL_RATE_PER_KM;
    let volume_charge = volume_charge(volume_m3(dims.length_cm, dims.width_cm, dims.height_cm));

    let mut breakdown = PriceBreakdown {
        base_rate: BASE_RATE,
        distance_cost,
        service_charge: SERVICE_CHARGE,
        fuel_surcharge,
        volume_charge,
        package_multiplier: input.package_type.multiplier(),
        insurance_cost: 0.0,
        total_price: 0.0,
        distance_km,
    };

    // Multiplier applies to the subtotal as a whole, insurance on top of it.
    let pre_insurance_total = breakdown.pre_insurance_total();
    if input.insurance_required {
        breakdown.insurance_cost = pre_insurance_total * INSURANCE_RATE;
    }
    breakdown.total_price = pre_insurance_total + breakdown.insurance_cost;
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shipment::{Dimensions, PackageType};

    const EPS: f64 = 1e-9;

    fn shipment(
        dims: (f64, f64, f64),
        package_type: PackageType,
        insurance_required: bool,
        distance_km: f64,
    ) -> ShipmentInput {
        ShipmentInput {
            dimensions: Dimensions::new(dims.0, dims.1, dims.2),
            package_type,
            insurance_required,
            distance_km,
        }
    }

    fn price(
        dims: (f64, f64, f64),
        package_type: PackageType,
        insurance_required: bool,
        distance_km: f64,
    ) -> PriceBreakdown {
        compute_quote(&shipment(dims, package_type, insurance_required, distance_km))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    const SAMPLE_DISTANCES: [f64; 5] = [0.0, 1.5, 100.0, 742.25, 3_000.0];
    const SAMPLE_DIMENSIONS: [(f64, f64, f64); 5] = [
        (10.0, 10.0, 10.0),
        (10.0, 10.0, 100.0),
        (30.0, 40.0, 50.0),
        (120.0, 80.0, 60.0),
        (1000.0, 1000.0, 1000.0),
    ];

    #[test]
    fn small_standard_parcel_over_100_km() {
        let quote = price((10.0, 10.0, 10.0), PackageType::Standard, false, 100.0);

        assert_eq!(quote.base_rate, 80.0);
        assert_eq!(quote.distance_cost, 200.0);
        assert_eq!(quote.service_charge, 50.0);
        assert_eq!(quote.fuel_surcharge, 50.0);
        assert_eq!(quote.volume_charge, 0.0);
        assert_eq!(quote.package_multiplier, 1.0);
        assert_eq!(quote.insurance_cost, 0.0);
        assert_close(quote.total_price, 380.0);
        assert_eq!(quote.distance_km, 100.0);
    }

    #[test]
    fn fragile_insured_parcel_over_100_km() {
        let quote = price((10.0, 10.0, 10.0), PackageType::Fragile, true, 100.0);

        assert_close(quote.pre_insurance_total(), 570.0);
        assert_close(quote.insurance_cost, 57.0);
        assert_close(quote.total_price, 627.0);
    }

    #[test]
    fn zero_distance_standard_total_is_fixed_fees_plus_volume() {
        for dims in SAMPLE_DIMENSIONS {
            let quote = price(dims, PackageType::Standard, false, 0.0);
            let expected = BASE_RATE + SERVICE_CHARGE + quote.volume_charge;
            assert_close(quote.total_price, expected);
        }
    }

    #[test]
    fn identical_input_gives_bit_identical_output() {
        for dims in SAMPLE_DIMENSIONS {
            for distance in SAMPLE_DISTANCES {
                let input = shipment(dims, PackageType::Document, true, distance);
                let first = compute_quote(&input);
                let second = compute_quote(&input);
                assert_eq!(first.total_price.to_bits(), second.total_price.to_bits());
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn volume_charge_steps_at_threshold() {
        // 10 x 10 x 100 cm is exactly 0.01 m³.
        let at = price((10.0, 10.0, 100.0), PackageType::Standard, false, 0.0);
        assert_eq!(at.volume_charge, 0.0);

        let above = price((10.0, 10.0, 100.1), PackageType::Standard, false, 0.0);
        assert!(above.volume_charge > 0.0);
        assert_close(above.volume_charge, 1.001);

        // No smoothing: the first charged volume jumps straight to ~1.0.
        assert!(above.total_price - at.total_price > 1.0);
    }

    #[test]
    fn large_parcel_volume_charge() {
        let quote = price((120.0, 80.0, 60.0), PackageType::Standard, false, 0.0);
        assert_close(quote.volume_charge, 57.6);
    }

    #[test]
    fn multiplier_scales_the_whole_subtotal() {
        for dims in SAMPLE_DIMENSIONS {
            for distance in SAMPLE_DISTANCES {
                let standard = price(dims, PackageType::Standard, false, distance);
                let fragile = price(dims, PackageType::Fragile, false, distance);
                let document = price(dims, PackageType::Document, false, distance);

                assert_close(fragile.total_price, 1.5 * standard.total_price);
                assert_close(document.total_price, 0.8 * standard.total_price);
                // Line items themselves are never multiplied.
                assert_eq!(fragile.distance_cost, standard.distance_cost);
                assert_eq!(document.volume_charge, standard.volume_charge);
            }
        }
    }

    #[test]
    fn insurance_adds_ten_percent_once() {
        for package_type in PackageType::ALL {
            for distance in SAMPLE_DISTANCES {
                let plain = price((30.0, 40.0, 50.0), package_type, false, distance);
                let insured = price((30.0, 40.0, 50.0), package_type, true, distance);

                assert_eq!(plain.insurance_cost, 0.0);
                assert_close(insured.insurance_cost, 0.1 * plain.total_price);
                assert_close(insured.total_price, 1.1 * plain.total_price);
            }
        }
    }

    #[test]
    fn breakdown_satisfies_total_invariant() {
        for package_type in PackageType::ALL {
            for dims in SAMPLE_DIMENSIONS {
                for distance in SAMPLE_DISTANCES {
                    for insured in [false, true] {
                        let q = price(dims, package_type, insured, distance);
                        let expected = (q.base_rate
                            + q.distance_cost
                            + q.service_charge
                            + q.fuel_surcharge
                            + q.volume_charge)
                            * q.package_multiplier
                            + q.insurance_cost;
                        assert_close(q.total_price, expected);
                        assert!(q.insurance_cost >= 0.0);
                        assert!(q.package_multiplier > 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn unknown_package_type_is_rejected() {
        let err = "express".parse::<PackageType>().unwrap_err();
        assert_eq!(err, QuoteError::InvalidPackageType("express".to_string()));
        assert_eq!(err.to_string(), "invalid package type: \"express\"");
    }
}
