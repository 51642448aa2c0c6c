use dioxus::prelude::*;
use dioxus_router::Link;
use tracing::warn;

use services::SaveArticleDraft;

use crate::context::{AppContext, DocumentState, OpenDocument};
use crate::routes::Route;
use crate::vm::sanitize_summary;

#[component]
pub fn ResultsView() -> Element {
    let document = use_context::<DocumentState>();

    rsx! {
        div { class: "page",
            match document.current() {
                Some(open) => rsx! { ResultsBody { open } },
                None => rsx! {
                    h2 { "Results" }
                    p { "No document is open." }
                    Link { to: Route::Upload {}, "Upload a PDF" }
                    " or "
                    Link { to: Route::Library {}, "open one from the library" }
                },
            }
        }
    }
}

#[component]
fn ResultsBody(open: OpenDocument) -> Element {
    let summary_html = sanitize_summary(open.analysis.summary());
    let question_count = open.analysis.quiz().questions().len();
    let card_count = open.analysis.flashcards().len();

    rsx! {
        h2 { "{open.file_name}" }
        div { class: "row",
            Link { to: Route::Quiz {}, "Take the quiz ({question_count} questions)" }
            Link { to: Route::Flashcards {}, "Study flashcards ({card_count})" }
        }
        div { class: "panel summary", dangerous_inner_html: "{summary_html}" }
        SavePanel { open: open.clone() }
        ExportPanel { open }
    }
}

#[component]
fn SavePanel(open: OpenDocument) -> Element {
    let ctx = use_context::<AppContext>();
    let mut document = use_context::<DocumentState>();
    let mut specialty = use_signal(String::new);
    let mut status = use_signal(|| None::<String>);

    if open.saved_id.is_some() {
        return rsx! {
            p { class: "panel muted", "Saved in your library." }
        };
    }

    let library = ctx.library();
    let save = move |_| {
        let library = library.clone();
        let draft = SaveArticleDraft {
            file_name: open.file_name.clone(),
            specialty: specialty.read().clone(),
            analysis: open.analysis.clone(),
        };
        spawn(async move {
            match library.save(draft).await {
                Ok(outcome) => match outcome.saved {
                    Some(id) => document.mark_saved(id),
                    None => status.set(Some("Could not save to the library.".into())),
                },
                Err(err) => {
                    warn!(error = %err, "save to library failed");
                    status.set(Some(err.to_string()));
                }
            }
        });
    };

    rsx! {
        div { class: "panel",
            h3 { "Save to library" }
            div { class: "row",
                input {
                    r#type: "text",
                    placeholder: "Specialty, e.g. Cardiology",
                    value: "{specialty}",
                    oninput: move |evt| specialty.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: specialty.read().trim().is_empty(),
                    onclick: save,
                    "Save"
                }
            }
            if let Some(message) = status() {
                p { class: "error", "{message}" }
            }
        }
    }
}

#[component]
fn ExportPanel(open: OpenDocument) -> Element {
    let ctx = use_context::<AppContext>();
    let mut status = use_signal(|| None::<String>);

    let exports = ctx.exports();
    let export_cards = {
        let exports = exports.clone();
        let open = open.clone();
        move |_| {
            let exports = exports.clone();
            let open = open.clone();
            spawn(async move {
                let result = exports
                    .write_flashcards(&open.file_name, open.analysis.flashcards())
                    .await;
                status.set(Some(match result {
                    Ok(path) => format!("Flashcards exported to {}", path.display()),
                    Err(err) => format!("Export failed: {err}"),
                }));
            });
        }
    };
    let export_quiz = move |_| {
        let exports = exports.clone();
        let open = open.clone();
        spawn(async move {
            let result = exports.write_quiz(&open.file_name, open.analysis.quiz()).await;
            status.set(Some(match result {
                Ok(path) => format!("Quiz exported to {}", path.display()),
                Err(err) => format!("Export failed: {err}"),
            }));
        });
    };

    rsx! {
        div { class: "panel",
            h3 { "Export" }
            div { class: "row",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: export_cards,
                    "Flashcards (.csv)"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: export_quiz,
                    "Quiz (.doc)"
                }
            }
            if let Some(message) = status() {
                p { class: "muted", "{message}" }
            }
        }
    }
}
