use dioxus::prelude::*;
use dioxus_router::Router;

use study_core::model::Theme;

use crate::context::{AppContext, DocumentState, ThemeState};
use crate::routes::Route;

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let mut theme = use_signal(Theme::default);
    use_context_provider(|| ThemeState(theme));
    use_context_provider(|| DocumentState(Signal::new(None)));

    let preferences = ctx.preferences();
    use_future(move || {
        let preferences = preferences.clone();
        async move {
            theme.set(preferences.theme().await);
        }
    });

    let theme_class = ThemeState(theme).class();

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        // Window title only; each view renders its own heading.
        document::Title { "Study Aid" }

        div { class: "app-root {theme_class}",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
