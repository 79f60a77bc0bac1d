pub const APP_NAME: &str = "Logistics Calculator";
pub const APP_TAGLINE: &str = "Calculate shipping costs based on distance and package details";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{}", APP_VERSION)
    }
}
