//! Interactive state of the shipment form.
//!
//! The UI never mutates fields directly; each user action maps to one method on
//! [`FormState`]. The state is plain data and serializes with serde.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    location::{is_searchable, Coordinates, LocationSuggestion},
    quote::{PriceBreakdown, QuoteError},
    shipment::{Dimensions, PackageType, ShipmentInput},
};

/// Matches the `maxlength` of the address inputs.
pub const MAX_LOCATION_CHARS: usize = 100;

const DEFAULT_DIMENSION: &str = "10";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationField {
    Pickup,
    Delivery,
}

impl LocationField {
    pub fn label(&self) -> &'static str {
        match self {
            LocationField::Pickup => "Pickup Location",
            LocationField::Delivery => "Delivery Location",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            LocationField::Pickup => "Search for pickup location...",
            LocationField::Delivery => "Search for delivery location...",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionAxis {
    Length,
    Width,
    Height,
}

impl DimensionAxis {
    pub const ALL: [DimensionAxis; 3] = [
        DimensionAxis::Length,
        DimensionAxis::Width,
        DimensionAxis::Height,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DimensionAxis::Length => "Length",
            DimensionAxis::Width => "Width",
            DimensionAxis::Height => "Height",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressInput {
    pub text: String,
    pub coords: Option<Coordinates>,
    #[serde(default)]
    pub suggestions: Vec<LocationSuggestion>,
    #[serde(default)]
    pub show_suggestions: bool,
}

impl AddressInput {
    pub fn visible_suggestions(&self) -> &[LocationSuggestion] {
        if self.show_suggestions {
            &self.suggestions
        } else {
            &[]
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum FormError {
    #[error("Please select valid pickup and delivery locations")]
    MissingSelection,
    #[error("{axis} must be a number, got {raw:?}")]
    InvalidDimension { axis: &'static str, raw: String },
    #[error("{axis} must be between 10 and 1000 cm, got {value}")]
    DimensionOutOfRange { axis: &'static str, value: f64 },
    #[error(transparent)]
    Quote(#[from] QuoteError),
}

/// Everything a submission needs apart from the route distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuoteRequest {
    pub from: Coordinates,
    pub to: Coordinates,
    pub dimensions: Dimensions,
    pub package_type: PackageType,
    pub insurance_required: bool,
}

impl QuoteRequest {
    pub fn into_shipment(self, distance_km: f64) -> ShipmentInput {
        ShipmentInput {
            dimensions: self.dimensions,
            package_type: self.package_type,
            insurance_required: self.insurance_required,
            distance_km,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub pickup: AddressInput,
    pub delivery: AddressInput,
    pub length: String,
    pub width: String,
    pub height: String,
    pub package_type: String,
    pub insurance_required: bool,
    #[serde(default)]
    pub loading: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result: Option<PriceBreakdown>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            pickup: AddressInput::default(),
            delivery: AddressInput::default(),
            length: DEFAULT_DIMENSION.to_string(),
            width: DEFAULT_DIMENSION.to_string(),
            height: DEFAULT_DIMENSION.to_string(),
            package_type: PackageType::default().key().to_string(),
            insurance_required: false,
            loading: false,
            error: None,
            result: None,
        }
    }
}

impl FormState {
    pub fn address(&self, field: LocationField) -> &AddressInput {
        match field {
            LocationField::Pickup => &self.pickup,
            LocationField::Delivery => &self.delivery,
        }
    }

    fn address_mut(&mut self, field: LocationField) -> &mut AddressInput {
        match field {
            LocationField::Pickup => &mut self.pickup,
            LocationField::Delivery => &mut self.delivery,
        }
    }

    pub fn dimension(&self, axis: DimensionAxis) -> &str {
        match axis {
            DimensionAxis::Length => &self.length,
            DimensionAxis::Width => &self.width,
            DimensionAxis::Height => &self.height,
        }
    }

    /// User typed into an address field. Any previous selection is dropped.
    ///
    /// Returns the text to look up, or `None` when it is too short to search.
    pub fn edit_location(&mut self, field: LocationField, text: &str) -> Option<String> {
        let text: String = text.chars().take(MAX_LOCATION_CHARS).collect();
        let address = self.address_mut(field);
        address.coords = None;
        address.suggestions.clear();

        if is_searchable(&text) {
            address.show_suggestions = true;
            address.text = text.clone();
            Some(text)
        } else {
            address.show_suggestions = false;
            address.text = text;
            None
        }
    }

    /// Apply a finished lookup. Results for text the field no longer shows, or
    /// for a field that already has a selection, are dropped.
    ///
    /// Returns whether the suggestions were applied.
    pub fn receive_suggestions(
        &mut self,
        field: LocationField,
        query: &str,
        suggestions: Vec<LocationSuggestion>,
    ) -> bool {
        let address = self.address_mut(field);
        if address.coords.is_some() || address.text != query {
            return false;
        }
        address.suggestions = suggestions;
        true
    }

    pub fn select_suggestion(&mut self, field: LocationField, suggestion: &LocationSuggestion) {
        let address = self.address_mut(field);
        address.text = suggestion.label.chars().take(MAX_LOCATION_CHARS).collect();
        address.coords = Some(suggestion.coordinates());
        address.suggestions.clear();
        address.show_suggestions = false;
    }

    pub fn dismiss_suggestions(&mut self, field: LocationField) {
        self.address_mut(field).show_suggestions = false;
    }

    pub fn set_dimension(&mut self, axis: DimensionAxis, raw: &str) {
        let slot = match axis {
            DimensionAxis::Length => &mut self.length,
            DimensionAxis::Width => &mut self.width,
            DimensionAxis::Height => &mut self.height,
        };
        *slot = raw.to_string();
    }

    pub fn set_package_type(&mut self, raw: &str) {
        self.package_type = raw.to_string();
    }

    pub fn set_insurance(&mut self, required: bool) {
        self.insurance_required = required;
    }

    /// Validate the form before any network call is made.
    pub fn prepare_submission(&self) -> Result<QuoteRequest, FormError> {
        let (Some(from), Some(to)) = (self.pickup.coords, self.delivery.coords) else {
            return Err(FormError::MissingSelection);
        };

        let dimensions = Dimensions::new(
            parse_dimension(DimensionAxis::Length, &self.length)?,
            parse_dimension(DimensionAxis::Width, &self.width)?,
            parse_dimension(DimensionAxis::Height, &self.height)?,
        );
        let package_type = self.package_type.parse::<PackageType>()?;

        Ok(QuoteRequest {
            from,
            to,
            dimensions,
            package_type,
            insurance_required: self.insurance_required,
        })
    }

    /// Enter the loading state. Returns `false`, changing nothing, while a
    /// submission is already in flight.
    pub fn begin_submission(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.error = None;
        self.result = None;
        self.loading = true;
        true
    }

    pub fn finish_submission(&mut self, outcome: Result<PriceBreakdown, String>) {
        self.loading = false;
        match outcome {
            Ok(breakdown) => {
                self.result = Some(breakdown);
                self.error = None;
            }
            Err(message) => {
                self.result = None;
                self.error = Some(message);
            }
        }
    }
}

pub fn parse_dimension(axis: DimensionAxis, raw: &str) -> Result<f64, FormError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| FormError::InvalidDimension {
            axis: axis.label(),
            raw: raw.to_string(),
        })?;

    if !Dimensions::contains(value) {
        return Err(FormError::DimensionOutOfRange {
            axis: axis.label(),
            value,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(label: &str, lat: f64, lon: f64) -> LocationSuggestion {
        LocationSuggestion {
            label: label.to_string(),
            lat,
            lon,
        }
    }

    fn selected_form() -> FormState {
        let mut form = FormState::default();
        form.select_suggestion(LocationField::Pickup, &suggestion("Mumbai, India", 19.07, 72.87));
        form.select_suggestion(LocationField::Delivery, &suggestion("Pune, India", 18.52, 73.85));
        form
    }

    #[test]
    fn defaults_match_initial_form() {
        let form = FormState::default();
        assert_eq!(form.length, "10");
        assert_eq!(form.width, "10");
        assert_eq!(form.height, "10");
        assert_eq!(form.package_type, "standard");
        assert!(!form.insurance_required);
        assert!(form.pickup.coords.is_none());
        assert!(!form.loading);
    }

    #[test]
    fn short_text_does_not_search() {
        let mut form = FormState::default();
        assert_eq!(form.edit_location(LocationField::Pickup, "Mu"), None);
        assert!(!form.pickup.show_suggestions);
        assert_eq!(form.pickup.text, "Mu");
    }

    #[test]
    fn editing_clears_previous_selection() {
        let mut form = selected_form();
        let query = form.edit_location(LocationField::Pickup, "Mumb");
        assert_eq!(query.as_deref(), Some("Mumb"));
        assert!(form.pickup.coords.is_none());
        assert!(form.pickup.show_suggestions);
        assert!(form.delivery.coords.is_some());
    }

    #[test]
    fn editing_truncates_long_input() {
        let mut form = FormState::default();
        let long = "x".repeat(150);
        let query = form.edit_location(LocationField::Delivery, &long);
        assert_eq!(form.delivery.text.chars().count(), MAX_LOCATION_CHARS);
        assert_eq!(query.map(|q| q.len()), Some(MAX_LOCATION_CHARS));
    }

    #[test]
    fn suggestions_for_outdated_text_are_dropped() {
        let mut form = FormState::default();
        form.edit_location(LocationField::Pickup, "Mum");
        form.edit_location(LocationField::Pickup, "Mumbai");

        let stale = form.receive_suggestions(
            LocationField::Pickup,
            "Mum",
            vec![suggestion("Mumford, UK", 52.0, -1.0)],
        );
        assert!(!stale);
        assert!(form.pickup.suggestions.is_empty());

        let fresh = form.receive_suggestions(
            LocationField::Pickup,
            "Mumbai",
            vec![suggestion("Mumbai, India", 19.07, 72.87)],
        );
        assert!(fresh);
        assert_eq!(form.pickup.visible_suggestions().len(), 1);
    }

    #[test]
    fn suggestions_after_selection_are_dropped() {
        let mut form = FormState::default();
        form.edit_location(LocationField::Delivery, "Pune");
        form.select_suggestion(LocationField::Delivery, &suggestion("Pune, India", 18.52, 73.85));

        let applied = form.receive_suggestions(
            LocationField::Delivery,
            "Pune, India",
            vec![suggestion("Pune, India", 18.52, 73.85)],
        );
        assert!(!applied);
        assert!(form.delivery.visible_suggestions().is_empty());
    }

    #[test]
    fn selecting_sets_label_and_coordinates() {
        let mut form = FormState::default();
        form.edit_location(LocationField::Pickup, "Mumb");
        form.receive_suggestions(
            LocationField::Pickup,
            "Mumb",
            vec![suggestion("Mumbai, India", 19.07, 72.87)],
        );
        let picked = form.pickup.suggestions[0].clone();
        form.select_suggestion(LocationField::Pickup, &picked);

        assert_eq!(form.pickup.text, "Mumbai, India");
        assert_eq!(form.pickup.coords, Some(Coordinates::new(19.07, 72.87)));
        assert!(!form.pickup.show_suggestions);
        assert!(form.pickup.suggestions.is_empty());
    }

    #[test]
    fn dismiss_hides_but_keeps_list() {
        let mut form = FormState::default();
        form.edit_location(LocationField::Pickup, "Mumb");
        form.receive_suggestions(LocationField::Pickup, "Mumb", vec![suggestion("A", 1.0, 2.0)]);
        form.dismiss_suggestions(LocationField::Pickup);
        assert!(form.pickup.visible_suggestions().is_empty());
        assert_eq!(form.pickup.suggestions.len(), 1);
    }

    #[test]
    fn submission_requires_both_selections() {
        let mut form = FormState::default();
        assert_eq!(form.prepare_submission(), Err(FormError::MissingSelection));

        form.select_suggestion(LocationField::Pickup, &suggestion("A", 1.0, 2.0));
        assert_eq!(form.prepare_submission(), Err(FormError::MissingSelection));
        assert_eq!(
            FormError::MissingSelection.to_string(),
            "Please select valid pickup and delivery locations"
        );
    }

    #[test]
    fn submission_builds_request() {
        let mut form = selected_form();
        form.set_dimension(DimensionAxis::Length, "40");
        form.set_dimension(DimensionAxis::Width, " 30.5 ");
        form.set_package_type("fragile");
        form.set_insurance(true);

        let request = form.prepare_submission().unwrap();
        assert_eq!(request.from, Coordinates::new(19.07, 72.87));
        assert_eq!(request.to, Coordinates::new(18.52, 73.85));
        assert_eq!(request.dimensions, Dimensions::new(40.0, 30.5, 10.0));
        assert_eq!(request.package_type, PackageType::Fragile);
        assert!(request.insurance_required);

        let shipment = request.into_shipment(12.5);
        assert_eq!(shipment.distance_km, 12.5);
        assert_eq!(shipment.package_type, PackageType::Fragile);
    }

    #[test]
    fn submission_rejects_bad_dimensions() {
        let mut form = selected_form();
        form.set_dimension(DimensionAxis::Height, "");
        assert!(matches!(
            form.prepare_submission(),
            Err(FormError::InvalidDimension { axis: "Height", .. })
        ));

        form.set_dimension(DimensionAxis::Height, "5");
        assert_eq!(
            form.prepare_submission(),
            Err(FormError::DimensionOutOfRange {
                axis: "Height",
                value: 5.0
            })
        );

        form.set_dimension(DimensionAxis::Height, "1001");
        assert!(form.prepare_submission().is_err());

        form.set_dimension(DimensionAxis::Height, "inf");
        assert!(matches!(
            form.prepare_submission(),
            Err(FormError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn submission_rejects_unknown_package_type() {
        let mut form = selected_form();
        form.set_package_type("express");
        assert_eq!(
            form.prepare_submission(),
            Err(FormError::Quote(QuoteError::InvalidPackageType(
                "express".to_string()
            )))
        );
    }

    #[test]
    fn submission_lifecycle() {
        let mut form = selected_form();
        form.finish_submission(Err("boom".to_string()));
        assert_eq!(form.error.as_deref(), Some("boom"));

        assert!(form.begin_submission());
        assert!(form.loading);
        assert!(form.error.is_none());
        assert!(form.result.is_none());

        let request = form.prepare_submission().unwrap();
        let breakdown = crate::domain::compute_quote(&request.into_shipment(100.0));
        form.finish_submission(Ok(breakdown));
        assert!(!form.loading);
        assert_eq!(form.result, Some(breakdown));
    }

    #[test]
    fn state_survives_serialization() {
        let mut form = selected_form();
        form.set_package_type("document");
        let json = serde_json::to_string(&form).unwrap();
        let restored: FormState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, form);
    }

    #[test]
    fn submission_in_flight_ignores_second_submit() {
        let mut form = selected_form();
        assert!(form.begin_submission());
        form.error = Some("kept".to_string());

        assert!(!form.begin_submission());
        assert!(form.loading);
        assert_eq!(form.error.as_deref(), Some("kept"));

        form.finish_submission(Err("done".to_string()));
        assert!(form.begin_submission());
    }
}
