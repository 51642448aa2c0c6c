use dioxus::prelude::*;

use study_core::model::Topic;

use crate::vm::{CountSliderVm, TopicChipVm};

/// Topic chips plus the session-size slider shared by quiz and flashcard setup.
#[component]
pub fn TopicPicker(
    chips: Vec<TopicChipVm>,
    slider: CountSliderVm,
    noun: &'static str,
    on_toggle: EventHandler<Topic>,
    on_count: EventHandler<usize>,
) -> Element {
    let chip_buttons = chips.into_iter().map(|chip| {
        let class = if chip.selected {
            "topic-chip selected"
        } else {
            "topic-chip"
        };
        let label = chip.topic.to_string();
        let topic = chip.topic;
        rsx! {
            button {
                key: "{label}",
                class: "{class}",
                r#type: "button",
                onclick: move |_| on_toggle.call(topic.clone()),
                "{label}"
            }
        }
    });

    rsx! {
        div { class: "panel",
            h3 { "Topics" }
            div { class: "row wrap", {chip_buttons} }
            if slider.available == 0 {
                p { class: "muted", "Select at least one topic." }
            } else if slider.is_fixed() {
                p { class: "muted", "{slider.value} {noun} available." }
            } else {
                label { class: "slider",
                    "How many {noun}: {slider.value}"
                    input {
                        r#type: "range",
                        min: "{slider.min}",
                        max: "{slider.max}",
                        value: "{slider.value}",
                        oninput: move |evt| {
                            if let Ok(count) = evt.value().parse::<usize>() {
                                on_count.call(count);
                            }
                        },
                    }
                }
            }
        }
    }
}
