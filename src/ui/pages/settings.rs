use dioxus::prelude::*;
use tracing::{error, info};
use url::Url;

use crate::{
    app::Provider,
    ui::components::toast::{push_toast, ToastKind, ToastMessage},
    util::config::{
        apply_env_override, save_settings, settings_path_display, LoadedSettings, ProviderSettings,
        API_KEY_ENV,
    },
};

const MAX_DELAY_MS: u64 = 5_000;

#[component]
pub fn SettingsPage() -> Element {
    let mut settings = use_context::<Signal<LoadedSettings>>();
    let mut provider = use_context::<Signal<Option<Provider>>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let initial = settings.with(|loaded| loaded.clone());
    let mut api_key_input = use_signal(|| stored_key_input(&initial));
    let mut base_url_input = use_signal(|| initial.settings.base_url.clone());
    let mut delay_input = use_signal(|| initial.settings.suggestion_delay_ms.to_string());

    let key_source = settings.with(|loaded| loaded.key_source);
    let key_hint = format!(
        "Current key {}. {API_KEY_ENV} overrides this value.",
        key_source.describe()
    );
    let settings_path = settings_path_display();

    let on_save = {
        let toasts = toasts.clone();
        move |_| {
            let parsed = parse_settings_form(&api_key_input(), &base_url_input(), &delay_input());
            let next = match parsed {
                Ok(next) => next,
                Err(message) => {
                    push_toast(toasts.clone(), ToastKind::Error, message);
                    return;
                }
            };

            if let Err(err) = save_settings(&next) {
                error!(%err, "failed to save settings");
                push_toast(
                    toasts.clone(),
                    ToastKind::Error,
                    format!("Failed to save settings: {err}"),
                );
                return;
            }

            let loaded = apply_env_override(next, std::env::var(API_KEY_ENV).ok());
            match Provider::from_settings(&loaded.settings) {
                Ok(next_provider) => provider.set(Some(next_provider)),
                Err(err) => {
                    push_toast(
                        toasts.clone(),
                        ToastKind::Error,
                        format!("Settings saved but the provider could not start: {err}"),
                    );
                }
            }
            info!(key_source = ?loaded.key_source, "settings updated");
            settings.set(loaded);
            push_toast(toasts.clone(), ToastKind::Success, "Settings saved.");
        }
    };

    let on_clear_cache = {
        let toasts = toasts.clone();
        move |_| {
            let Some(current) = provider() else {
                push_toast(toasts.clone(), ToastKind::Warning, "No provider to clear.");
                return;
            };
            spawn(async move {
                current.client.clear_cache().await;
            });
            push_toast(
                toasts.clone(),
                ToastKind::Info,
                "Cleared cached suggestions. Lookups will hit the provider again.",
            );
        }
    };

    rsx! {
        div { class: "form-section",
            section { class: "card",
                div { class: "card-header",
                    h2 { class: "card-title", "Location Provider" }
                    p {
                        class: "card-description",
                        "Geoapify powers address suggestions and driving distances."
                    }
                }
                div { class: "card-content",
                    div { class: "form-group",
                        label { class: "form-label", r#for: "apiKey", "API key" }
                        input {
                            id: "apiKey",
                            class: "form-input",
                            r#type: "password",
                            value: api_key_input(),
                            oninput: move |evt| api_key_input.set(evt.value()),
                        }
                        p { class: "form-hint", "{key_hint}" }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "baseUrl", "Base URL" }
                        input {
                            id: "baseUrl",
                            class: "form-input",
                            value: base_url_input(),
                            oninput: move |evt| base_url_input.set(evt.value()),
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "delay", "Suggestion delay (ms)" }
                        input {
                            id: "delay",
                            class: "form-input",
                            r#type: "number",
                            min: "0",
                            max: "5000",
                            value: delay_input(),
                            oninput: move |evt| delay_input.set(evt.value()),
                        }
                    }
                    button { class: "btn btn-primary", onclick: on_save, "Save" }
                    p { class: "form-hint", "Stored at {settings_path}" }
                }
            }

            section { class: "card",
                div { class: "card-header",
                    h2 { class: "card-title", "Suggestion Cache" }
                    p {
                        class: "card-description",
                        "Lookups are cached for ten minutes and reused if the provider goes down."
                    }
                }
                div { class: "card-content",
                    button { class: "btn btn-secondary", onclick: on_clear_cache, "Clear Cache" }
                }
            }
        }
    }
}

/// The key field edits the stored key only; an environment key is never shown
/// or written back to disk.
fn stored_key_input(loaded: &LoadedSettings) -> String {
    loaded.file_api_key.clone().unwrap_or_default()
}

fn parse_settings_form(
    api_key: &str,
    base_url: &str,
    delay_ms: &str,
) -> Result<ProviderSettings, String> {
    let base_url = base_url.trim();
    Url::parse(base_url).map_err(|_| format!("Base URL is not a valid URL: {base_url:?}"))?;

    let suggestion_delay_ms: u64 = delay_ms
        .trim()
        .parse()
        .map_err(|_| "Suggestion delay must be a whole number of milliseconds")?;
    if suggestion_delay_ms > MAX_DELAY_MS {
        return Err(format!("Suggestion delay must be at most {MAX_DELAY_MS} ms"));
    }

    let api_key = Some(api_key.trim().to_string()).filter(|key| !key.is_empty());

    Ok(ProviderSettings {
        api_key,
        base_url: base_url.to_string(),
        suggestion_delay_ms,
    })
}
