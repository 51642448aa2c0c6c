use std::path::PathBuf;

use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use tracing::warn;

use crate::context::{AppContext, DocumentState, OpenDocument};
use crate::routes::Route;

#[component]
pub fn UploadView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut document = use_context::<DocumentState>();
    let mut path = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<&'static str>);

    let credentials = ctx.credentials();
    let has_key = use_resource(move || {
        let credentials = credentials.clone();
        async move { credentials.has_key().await }
    });
    let missing_key = matches!(*has_key.read(), Some(false));

    let analysis = ctx.analysis();
    let analyze = move |_| {
        let raw = path.read().trim().to_string();
        if raw.is_empty() || busy() {
            return;
        }
        let analysis = analysis.clone();
        busy.set(true);
        error.set(None);
        spawn(async move {
            let result = analysis.analyze_file(&PathBuf::from(raw)).await;
            busy.set(false);
            match result {
                Ok(analyzed) => {
                    document.open(OpenDocument::from(analyzed));
                    let _ = navigator.push(Route::Results {});
                }
                Err(err) => {
                    warn!(error = %err, "analysis failed");
                    error.set(Some(err.user_message()));
                    if err.requires_key_entry() {
                        let _ = navigator.push(Route::ApiKey {});
                    }
                }
            }
        });
    };

    rsx! {
        div { class: "page",
            header { class: "view-header",
                h2 { class: "view-title", "Upload a PDF" }
                p { class: "view-subtitle",
                    "Choose a text-based medical PDF to get a summary, a quiz and flashcards."
                }
            }
            div { class: "view-divider" }

            if missing_key {
                p { class: "panel",
                    "No API key is configured yet. "
                    Link { to: Route::ApiKey {}, "Enter your API key" }
                }
            }

            div { class: "row panel",
                input {
                    r#type: "text",
                    placeholder: "/path/to/article.pdf",
                    value: "{path}",
                    oninput: move |evt| path.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy() || path.read().trim().is_empty(),
                    onclick: analyze,
                    if busy() { "Analyzing..." } else { "Analyze" }
                }
            }

            if let Some(message) = error() {
                p { class: "error", "{message}" }
            }
        }
    }
}
