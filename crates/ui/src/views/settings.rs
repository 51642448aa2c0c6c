use dioxus::prelude::*;
use dioxus_router::Link;

use study_core::model::Theme;

use crate::context::{AppContext, ThemeState};
use crate::routes::Route;

fn theme_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "Light",
        Theme::Dark => "Dark",
    }
}

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut theme = use_context::<ThemeState>();
    let preferences = ctx.preferences();
    let credentials = ctx.credentials();
    let mut key_notice = use_signal(|| None::<&'static str>);

    let key_credentials = credentials.clone();
    let mut has_key = use_resource(move || {
        let credentials = key_credentials.clone();
        async move { credentials.has_key().await }
    });

    let current = *theme.0.read();
    let key_label = match *has_key.read() {
        Some(true) => "An API key is available for this session.",
        Some(false) => "No API key is configured.",
        None => "Checking...",
    };

    rsx! {
        div { class: "page",
            header { class: "view-header",
                h2 { class: "view-title", "Settings" }
            }
            div { class: "view-divider" }
            section { class: "panel",
                h3 { "Appearance" }
                div { class: "row",
                    span { "Theme: {theme_label(current)}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let preferences = preferences.clone();
                            spawn(async move {
                                let next = preferences.toggle_theme().await;
                                theme.0.set(next);
                            });
                        },
                        "Switch to {theme_label(current.toggled())}"
                    }
                }
            }
            section { class: "panel",
                h3 { "API key" }
                p { class: "muted", "{key_label}" }
                div { class: "row",
                    Link { to: Route::ApiKey {}, "Enter a new key" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let credentials = credentials.clone();
                            spawn(async move {
                                match credentials.forget().await {
                                    Ok(()) => key_notice.set(Some("Session key removed.")),
                                    Err(_) => key_notice.set(Some("The key could not be removed.")),
                                }
                                has_key.restart();
                            });
                        },
                        "Forget session key"
                    }
                }
                if let Some(message) = key_notice() {
                    p { class: "muted", "{message}" }
                }
            }
        }
    }
}
