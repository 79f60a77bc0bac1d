//! Pricing rules and form state. Nothing in here performs I/O.

pub mod breakdown;
pub mod form_state;
pub mod location;
pub mod quote;
pub mod shipment;

pub use breakdown::breakdown_lines;
pub use form_state::{
    AddressInput, DimensionAxis, FormError, FormState, LocationField, QuoteRequest,
};
pub use location::{
    is_searchable, Coordinates, LocationResolver, LocationSuggestion, RouteError, MAX_SUGGESTIONS,
};
pub use quote::{compute_quote, PriceBreakdown};
pub use shipment::PackageType;
