use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{
    ApiKeyView, FlashcardsView, LibraryView, QuizView, ResultsView, SettingsView, UploadView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", UploadView)] Upload {},
        #[route("/results", ResultsView)] Results {},
        #[route("/quiz", QuizView)] Quiz {},
        #[route("/flashcards", FlashcardsView)] Flashcards {},
        #[route("/library", LibraryView)] Library {},
        #[route("/api-key", ApiKeyView)] ApiKey {},
        #[route("/settings", SettingsView)] Settings {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Study Aid" }
            ul {
                li { Link { to: Route::Upload {}, "Upload" } }
                li { Link { to: Route::Results {}, "Results" } }
                li { Link { to: Route::Library {}, "Library" } }
                li { Link { to: Route::Settings {}, "Settings" } }
            }
        }
    }
}
