use dioxus::prelude::*;

use crate::domain::{breakdown_lines, PriceBreakdown};

#[component]
pub fn BreakdownCard(breakdown: PriceBreakdown) -> Element {
    let lines = breakdown_lines(&breakdown);

    rsx! {
        div { class: "card",
            div { class: "card-header",
                h2 { class: "card-title", "Price Breakdown" }
            }
            div { class: "card-content",
                ul { class: "breakdown-list",
                    for line in lines {
                        li {
                            key: "{line.label}",
                            class: line_class(line.is_total),
                            span { class: "breakdown-label", "{line.label}" }
                            span { "{line.value}" }
                        }
                    }
                }
            }
        }
    }
}

fn line_class(is_total: bool) -> &'static str {
    if is_total {
        "breakdown-item breakdown-total"
    } else {
        "breakdown-item"
    }
}
