pub mod address_field;
pub mod breakdown_card;
pub mod toast;

pub use address_field::AddressField;
pub use breakdown_card::BreakdownCard;
