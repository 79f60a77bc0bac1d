use dioxus::{prelude::*, signals::Signal};
use tracing::{error, warn};

use crate::{
    controller::{submit_form, SubmitError},
    domain::{FormState, LocationField},
    infra::{
        geoapify::{GeoapifyClient, GeoapifyError, DEFAULT_BASE_URL},
        suggest::SuggestionSearch,
    },
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{QuotePage, SettingsPage},
        shell::Shell,
    },
    util::{
        assets,
        config::{load_settings, KeySource, LoadedSettings, ProviderSettings},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Quote {},
    #[route("/settings")]
    Settings {},
}

/// Geoapify client plus one debouncer per address field, so typing in one
/// field never cancels the other's lookup.
#[derive(Clone)]
pub struct Provider {
    pub client: GeoapifyClient,
    pickup_search: SuggestionSearch<GeoapifyClient>,
    delivery_search: SuggestionSearch<GeoapifyClient>,
}

impl Provider {
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, GeoapifyError> {
        let client = GeoapifyClient::with_base_url(&settings.base_url, settings.api_key.clone())?;
        let delay = settings.suggestion_delay();
        Ok(Self {
            pickup_search: SuggestionSearch::with_delay(client.clone(), delay),
            delivery_search: SuggestionSearch::with_delay(client.clone(), delay),
            client,
        })
    }

    pub fn search(&self, field: LocationField) -> &SuggestionSearch<GeoapifyClient> {
        match field {
            LocationField::Pickup => &self.pickup_search,
            LocationField::Delivery => &self.delivery_search,
        }
    }
}

#[component]
pub fn App() -> Element {
    let loaded = use_hook(load_settings);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts.clone());

    let settings = use_signal(|| loaded.clone());
    use_context_provider(|| settings.clone());

    let provider = use_signal(|| build_provider(&loaded, toasts.clone()));
    use_context_provider(|| provider.clone());

    let form = use_signal(FormState::default);
    use_context_provider(|| form.clone());

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

fn build_provider(loaded: &LoadedSettings, toasts: Signal<Vec<ToastMessage>>) -> Option<Provider> {
    if loaded.key_source == KeySource::Missing {
        push_toast(
            toasts.clone(),
            ToastKind::Warning,
            "No Geoapify API key configured. Add one in Settings.",
        );
    }

    match Provider::from_settings(&loaded.settings) {
        Ok(provider) => Some(provider),
        Err(err) => {
            warn!(
                %err,
                base_url = %loaded.settings.base_url,
                "falling back to default provider URL"
            );
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("Invalid provider settings: {err}"),
            );
            let fallback = ProviderSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                ..loaded.settings.clone()
            };
            match Provider::from_settings(&fallback) {
                Ok(provider) => Some(provider),
                Err(err) => {
                    error!(%err, "failed to initialise Geoapify client");
                    None
                }
            }
        }
    }
}

/// Apply typed text to `field` and start (or cancel) the debounced lookup.
pub fn edit_location(
    mut form: Signal<FormState>,
    provider: Signal<Option<Provider>>,
    field: LocationField,
    text: String,
) {
    let query = form.with_mut(|st| st.edit_location(field, &text));
    let Some(provider) = provider() else {
        return;
    };
    let search = provider.search(field).clone();

    match query {
        Some(query) => {
            spawn(async move {
                if let Some(suggestions) = search.search(query.clone()).await {
                    form.with_mut(|st| st.receive_suggestions(field, &query, suggestions));
                }
            });
        }
        None => search.cancel(),
    }
}

/// Run one quote submission. Ignored while another is still in flight.
pub fn submit_quote(
    mut form: Signal<FormState>,
    provider: Signal<Option<Provider>>,
    toasts: Signal<Vec<ToastMessage>>,
) {
    if !form.with_mut(|st| st.begin_submission()) {
        return;
    }
    let snapshot = form();
    let provider = provider();

    spawn(async move {
        let client = provider.as_ref().map(|provider| &provider.client);
        let outcome = submit_form(client, &snapshot).await;

        if let Err(err) = &outcome {
            error!(%err, "quote request failed");
            if *err == SubmitError::ProviderUnavailable {
                push_toast(toasts.clone(), ToastKind::Error, err.to_string());
            }
        }
        form.with_mut(|st| st.finish_submission(outcome.map_err(|err| err.to_string())));
    });
}

#[component]
pub fn Quote() -> Element {
    rsx! { Shell { QuotePage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
