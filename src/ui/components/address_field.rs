use dioxus::prelude::*;

use crate::domain::{AddressInput, LocationField, LocationSuggestion};

#[component]
pub fn AddressField(
    field: LocationField,
    address: AddressInput,
    on_input: EventHandler<String>,
    on_select: EventHandler<LocationSuggestion>,
    on_dismiss: EventHandler<()>,
) -> Element {
    let id = match field {
        LocationField::Pickup => "pickupLocation",
        LocationField::Delivery => "deliveryLocation",
    };
    let suggestions = address.visible_suggestions().to_vec();
    let selected = address.coords.is_some();

    rsx! {
        div { class: "form-group",
            label { class: "form-label", r#for: id, "{field.label()}" }
            div { class: "autocomplete-wrapper",
                input {
                    id: id,
                    class: "form-input",
                    r#type: "text",
                    autocomplete: "off",
                    maxlength: "100",
                    placeholder: field.placeholder(),
                    value: "{address.text}",
                    oninput: move |evt| on_input.call(evt.value()),
                    onkeydown: move |evt| {
                        if evt.key() == Key::Escape {
                            on_dismiss.call(());
                        }
                    },
                }
                if !suggestions.is_empty() {
                    ul { class: "suggestions-list",
                        for suggestion in suggestions {
                            SuggestionItem {
                                key: "{suggestion.label}",
                                suggestion,
                                on_select,
                            }
                        }
                    }
                }
            }
            if selected {
                p { class: "form-hint", "Location selected" }
            }
        }
    }
}

#[component]
fn SuggestionItem(
    suggestion: LocationSuggestion,
    on_select: EventHandler<LocationSuggestion>,
) -> Element {
    let label = suggestion.label.clone();
    rsx! {
        li {
            class: "suggestion-item",
            onclick: move |_| on_select.call(suggestion.clone()),
            "{label}"
        }
    }
}
