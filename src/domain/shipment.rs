use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::quote::QuoteError;

/// Accepted range for every package dimension, in centimetres.
pub const MIN_DIMENSION_CM: f64 = 10.0;
pub const MAX_DIMENSION_CM: f64 = 1000.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    #[default]
    Standard,
    Fragile,
    Document,
}

impl PackageType {
    pub const ALL: [PackageType; 3] = [
        PackageType::Standard,
        PackageType::Fragile,
        PackageType::Document,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            PackageType::Standard => 1.0,
            PackageType::Fragile => 1.5,
            PackageType::Document => 0.8,
        }
    }

    /// Identifier used in form values and serialized state.
    pub fn key(&self) -> &'static str {
        match self {
            PackageType::Standard => "standard",
            PackageType::Fragile => "fragile",
            PackageType::Document => "document",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PackageType::Standard => "Standard",
            PackageType::Fragile => "Fragile (+50%)",
            PackageType::Document => "Document (-20%)",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PackageType {
    type Err = QuoteError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        PackageType::ALL
            .into_iter()
            .find(|kind| kind.key() == raw)
            .ok_or_else(|| QuoteError::InvalidPackageType(raw.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
}

impl Dimensions {
    pub fn new(length_cm: f64, width_cm: f64, height_cm: f64) -> Self {
        Self {
            length_cm,
            width_cm,
            height_cm,
        }
    }

    pub fn contains(value: f64) -> bool {
        (MIN_DIMENSION_CM..=MAX_DIMENSION_CM).contains(&value)
    }
}

/// Parameters for one quote. Built fresh for every calculation.
///
/// Dimensions are expected to be validated by the caller; the quote engine only
/// insists on a recognized package type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipmentInput {
    pub dimensions: Dimensions,
    pub package_type: PackageType,
    pub insurance_required: bool,
    pub distance_km: f64,
}
