use dioxus::prelude::*;

use crate::{
    app::{edit_location, submit_quote, Provider},
    domain::{DimensionAxis, FormState, LocationField, PackageType},
    ui::components::{toast::ToastMessage, AddressField, BreakdownCard},
};

#[component]
pub fn QuotePage() -> Element {
    let mut form = use_context::<Signal<FormState>>();
    let provider = use_context::<Signal<Option<Provider>>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let snapshot = form();
    let button_label = if snapshot.loading {
        "Calculating..."
    } else {
        "Calculate Shipping Cost"
    };

    rsx! {
        div { class: "grid",
            section { class: "form-section",
                div { class: "card",
                    div { class: "card-header",
                        h2 { class: "card-title", "Shipment Details" }
                        p {
                            class: "card-description",
                            "Pick both locations from the suggestions, then describe the package."
                        }
                    }
                    form {
                        class: "card-content",
                        onsubmit: move |evt| {
                            evt.prevent_default();
                            submit_quote(form, provider, toasts);
                        },
                        for field in [LocationField::Pickup, LocationField::Delivery] {
                            AddressField {
                                key: "{field.label()}",
                                field,
                                address: snapshot.address(field).clone(),
                                on_input: move |text| edit_location(form, provider, field, text),
                                on_select: move |suggestion| {
                                    if let Some(current) = provider() {
                                        current.search(field).cancel();
                                    }
                                    form.with_mut(|st| st.select_suggestion(field, &suggestion));
                                },
                                on_dismiss: move |_| {
                                    form.with_mut(|st| st.dismiss_suggestions(field));
                                },
                            }
                        }

                        div { class: "form-group",
                            span { class: "form-label", "Dimensions (cm)" }
                            div { class: "dimensions-grid",
                                for axis in DimensionAxis::ALL {
                                    div { key: "{axis.label()}", class: "form-group",
                                        label { class: "form-hint", "{axis.label()}" }
                                        input {
                                            class: "form-input",
                                            r#type: "number",
                                            min: "10",
                                            max: "1000",
                                            value: "{snapshot.dimension(axis)}",
                                            oninput: move |evt| {
                                                let raw = evt.value();
                                                form.with_mut(|st| st.set_dimension(axis, &raw));
                                            },
                                        }
                                    }
                                }
                            }
                            p { class: "form-hint", "Each side must be between 10 and 1000 cm." }
                        }

                        div { class: "form-group",
                            label { class: "form-label", r#for: "packageType", "Package Type" }
                            select {
                                id: "packageType",
                                class: "form-select",
                                value: "{snapshot.package_type}",
                                onchange: move |evt| {
                                    let raw = evt.value();
                                    form.with_mut(|st| st.set_package_type(&raw));
                                },
                                for kind in PackageType::ALL {
                                    option {
                                        key: "{kind.key()}",
                                        value: kind.key(),
                                        selected: snapshot.package_type == kind.key(),
                                        "{kind.label()}"
                                    }
                                }
                            }
                        }

                        div { class: "checkbox-group",
                            input {
                                id: "insurance",
                                r#type: "checkbox",
                                checked: snapshot.insurance_required,
                                onchange: move |evt| {
                                    form.with_mut(|st| st.set_insurance(evt.checked()));
                                },
                            }
                            label { r#for: "insurance", "Add insurance coverage (+10%)" }
                        }

                        button {
                            class: "btn btn-primary",
                            r#type: "submit",
                            disabled: snapshot.loading,
                            "{button_label}"
                        }
                    }
                }
            }

            section { class: "results-section",
                if let Some(message) = snapshot.error.clone() {
                    div { class: "alert alert-error",
                        h3 { class: "alert-title", "Error" }
                        p { class: "alert-message", "{message}" }
                    }
                }
                if let Some(breakdown) = snapshot.result {
                    BreakdownCard { breakdown }
                } else if snapshot.error.is_none() {
                    div { class: "card",
                        div { class: "card-content",
                            p { class: "form-hint", "Your quote will appear here." }
                        }
                    }
                }
            }
        }
    }
}
