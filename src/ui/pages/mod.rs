pub mod quote;
pub mod settings;

pub use quote::QuotePage;
pub use settings::SettingsPage;
