//! Integrations with external services.

pub mod geoapify;
pub mod suggest;
