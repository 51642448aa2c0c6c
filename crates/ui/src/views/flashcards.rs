use dioxus::prelude::*;
use dioxus_router::Link;

use services::{FlashcardDeck, FlashcardSetup};
use study_core::model::Flashcard;

use crate::context::DocumentState;
use crate::routes::Route;
use crate::views::TopicPicker;
use crate::vm::{count_slider, flashcard_vm, topic_chips};

#[derive(Clone, Debug)]
enum FlashcardScreen {
    Configuring(FlashcardSetup),
    Studying(FlashcardDeck),
}

#[component]
pub fn FlashcardsView() -> Element {
    let document = use_context::<DocumentState>();

    rsx! {
        div { class: "page",
            match document.current() {
                Some(open) => rsx! {
                    FlashcardRunner { cards: open.analysis.flashcards().to_vec() }
                },
                None => rsx! {
                    h2 { "Flashcards" }
                    p { "Open a document first." }
                    Link { to: Route::Upload {}, "Upload a PDF" }
                },
            }
        }
    }
}

#[component]
fn FlashcardRunner(cards: Vec<Flashcard>) -> Element {
    let mut screen = {
        let cards = cards.clone();
        use_signal(move || FlashcardScreen::Configuring(FlashcardSetup::new(&cards)))
    };
    let mut error = use_signal(|| None::<String>);

    let current = screen.read().clone();
    let body = match current {
        FlashcardScreen::Configuring(setup) => {
            let chips = topic_chips(setup.selection());
            let slider = count_slider(setup.selection());
            rsx! {
                h2 { "Flashcards" }
                TopicPicker {
                    chips,
                    slider,
                    noun: "cards",
                    on_toggle: move |topic| {
                        if let FlashcardScreen::Configuring(setup) = &mut *screen.write() {
                            setup.selection_mut().toggle(&topic);
                        }
                    },
                    on_count: move |count| {
                        if let FlashcardScreen::Configuring(setup) = &mut *screen.write() {
                            setup.selection_mut().set_count(count);
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !slider.can_start(),
                    onclick: move |_| match setup.start(&mut rand::rng()) {
                        Ok(deck) => {
                            error.set(None);
                            screen.set(FlashcardScreen::Studying(deck));
                        }
                        Err(err) => error.set(Some(err.to_string())),
                    },
                    "Start studying"
                }
            }
        }
        FlashcardScreen::Studying(deck) => {
            let vm = flashcard_vm(&deck);
            let restart_cards = cards.clone();
            rsx! {
                h2 { "Flashcards" }
                p { class: "muted", "{vm.position_label} · {vm.topic}" }
                button {
                    class: "flashcard",
                    r#type: "button",
                    onclick: move |_| {
                        if let FlashcardScreen::Studying(deck) = &mut *screen.write() {
                            deck.flip();
                        }
                    },
                    span { class: "muted", "{vm.face_label}" }
                    p { "{vm.text}" }
                }
                div { class: "row",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        disabled: !vm.can_previous,
                        onclick: move |_| {
                            if let FlashcardScreen::Studying(deck) = &mut *screen.write() {
                                deck.previous();
                            }
                        },
                        "Previous"
                    }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        disabled: !vm.can_next,
                        onclick: move |_| {
                            if let FlashcardScreen::Studying(deck) = &mut *screen.write() {
                                deck.next();
                            }
                        },
                        "Next"
                    }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            screen.set(FlashcardScreen::Configuring(FlashcardSetup::new(&restart_cards)));
                        },
                        "New set"
                    }
                }
            }
        }
    };

    rsx! {
        {body}
        if let Some(message) = error() {
            p { class: "error", "{message}" }
        }
    }
}
