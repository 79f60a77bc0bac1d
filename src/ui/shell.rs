use dioxus::prelude::*;

use crate::app::Route;
use crate::util::version::{version_label, APP_NAME, APP_TAGLINE};

#[component]
pub fn Shell(children: Element) -> Element {
    let current_route = use_route::<Route>();
    let nav = use_navigator();
    let version = version_label();

    rsx! {
        header { class: "app-header",
            div { class: "container",
                div {
                    h1 { class: "app-title", "{APP_NAME}" }
                    p { class: "app-subtitle", "{APP_TAGLINE}" }
                }
                nav { class: "app-nav",
                    NavButton {
                        active: matches!(current_route, Route::Quote {}),
                        onclick: move |_| { nav.push(Route::Quote {}); },
                        label: "Quote",
                    }
                    NavButton {
                        active: matches!(current_route, Route::Settings {}),
                        onclick: move |_| { nav.push(Route::Settings {}); },
                        label: "Settings",
                    }
                }
                span { class: "app-version", "{version}" }
            }
        }
        main { class: "app-main",
            div { class: "container", {children} }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    let class = if active { "nav-link active" } else { "nav-link" };

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
