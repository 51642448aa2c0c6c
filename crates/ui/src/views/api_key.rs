use dioxus::prelude::*;
use dioxus_router::use_navigator;

use services::{AiError, CredentialError};

use crate::context::AppContext;
use crate::routes::Route;

fn credential_message(err: &CredentialError) -> &'static str {
    match err {
        CredentialError::Empty => "Please enter an API key.",
        CredentialError::Validation(AiError::Unauthorized) => {
            "That key was rejected by the provider. Check it and try again."
        }
        CredentialError::Validation(_) => {
            "Could not reach the AI provider to check the key. Try again later."
        }
        _ => "The key could not be stored.",
    }
}

#[component]
pub fn ApiKeyView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let credentials = ctx.credentials();
    let mut key = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<&'static str>);

    let submit = move |_| {
        if busy() {
            return;
        }
        let credentials = credentials.clone();
        let value = key.read().clone();
        busy.set(true);
        error.set(None);
        spawn(async move {
            let result = credentials.submit_key(&value).await;
            busy.set(false);
            match result {
                Ok(()) => {
                    key.set(String::new());
                    let _ = navigator.push(Route::Upload {});
                }
                Err(err) => error.set(Some(credential_message(&err))),
            }
        });
    };

    rsx! {
        div { class: "page",
            header { class: "view-header",
                h2 { class: "view-title", "API key" }
                p { class: "view-subtitle",
                    "The key is kept in memory for this session only and is checked before use."
                }
            }
            div { class: "view-divider" }
            div { class: "row panel",
                input {
                    r#type: "password",
                    placeholder: "sk-...",
                    value: "{key}",
                    oninput: move |evt| key.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy(),
                    onclick: submit,
                    if busy() { "Checking..." } else { "Save key" }
                }
            }
            if let Some(message) = error() {
                p { class: "error", "{message}" }
            }
        }
    }
}
