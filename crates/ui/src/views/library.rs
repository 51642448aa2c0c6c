use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::{AppContext, DocumentState, OpenDocument};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_library_groups;

#[component]
pub fn LibraryView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let document = use_context::<DocumentState>();
    let library = ctx.library();
    let notice = use_signal(|| None::<ViewError>);

    let list_library = library.clone();
    let resource = use_resource(move || {
        let library = list_library.clone();
        async move { Ok::<_, ViewError>(map_library_groups(&library.by_specialty().await)) }
    });

    let state = view_state_from_resource(&resource);
    rsx! {
        div { class: "page",
            header { class: "view-header",
                h2 { class: "view-title", "Library" }
                p { class: "view-subtitle", "Saved analyses, grouped by specialty." }
            }
            div { class: "view-divider" }
            if let Some(err) = notice() {
                p { class: "error", "{err.message()}" }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
                ViewState::Ready(groups) if groups.is_empty() => rsx! {
                    p { class: "muted", "Nothing saved yet. Analyze a PDF and save it here." }
                },
                ViewState::Ready(groups) => rsx! {
                    for group in groups {
                        section { key: "{group.specialty}", class: "panel",
                            h3 { "{group.specialty}" }
                            ul {
                                for item in group.items {
                                    li { key: "{item.id}", class: "row",
                                        div {
                                            strong { "{item.file_name}" }
                                            p { class: "muted",
                                                "{item.quiz_title} · {item.counts_label} · {item.saved_at_str}"
                                            }
                                        }
                                        button {
                                            class: "btn btn-primary",
                                            r#type: "button",
                                            onclick: {
                                                let library = library.clone();
                                                let id = item.id.clone();
                                                let mut notice = notice;
                                                let mut document = document;
                                                let mut resource = resource;
                                                move |_| {
                                                    let library = library.clone();
                                                    let id = id.clone();
                                                    spawn(async move {
                                                        match library.get(&id).await {
                                                            Some(article) => {
                                                                notice.set(None);
                                                                document.open(OpenDocument::from(&article));
                                                                let _ = navigator.push(Route::Results {});
                                                            }
                                                            None => {
                                                                notice.set(Some(ViewError::NotFound));
                                                                resource.restart();
                                                            }
                                                        }
                                                    });
                                                }
                                            },
                                            "Open"
                                        }
                                        button {
                                            class: "btn btn-secondary",
                                            r#type: "button",
                                            onclick: {
                                                let library = library.clone();
                                                let id = item.id.clone();
                                                let mut resource = resource;
                                                move |_| {
                                                    let library = library.clone();
                                                    let id = id.clone();
                                                    spawn(async move {
                                                        library.delete(&id).await;
                                                        resource.restart();
                                                    });
                                                }
                                            },
                                            "Delete"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
