use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AiError, AnalysisModel, AppServices, Clock, ServicesConfig};
use study_core::model::{
    AnalysisResult, Flashcard, OPTION_COUNT, Question, Quiz, QuizSettings, Theme, Topic,
};
use study_core::time::fixed_now;

use crate::context::{DocumentState, OpenDocument, ThemeState, UiApp, build_app_context};
use crate::views::{
    ApiKeyView, FlashcardsView, LibraryView, QuizView, ResultsView, SettingsView, UploadView,
};

/// Model double that never gets a usable answer.
struct OfflineModel;

#[async_trait::async_trait]
impl AnalysisModel for OfflineModel {
    async fn generate(&self, _api_key: &str, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::EmptyResponse)
    }

    async fn validate_key(&self, _api_key: &str) -> Result<(), AiError> {
        Err(AiError::Unauthorized)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Upload,
    Results,
    Quiz,
    Flashcards,
    Library,
    ApiKey,
    Settings,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    view: ViewKind,
    document: Option<OpenDocument>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(app));
    use_context_provider(|| props.view);
    let document = props.document.clone();
    use_context_provider(|| DocumentState(Signal::new(document)));
    use_context_provider(|| ThemeState(Signal::new(Theme::default())));
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Upload => rsx! { UploadView {} },
        ViewKind::Results => rsx! { ResultsView {} },
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::Flashcards => rsx! { FlashcardsView {} },
        ViewKind::Library => rsx! { LibraryView {} },
        ViewKind::ApiKey => rsx! { ApiKeyView {} },
        ViewKind::Settings => rsx! { SettingsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: AppServices,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// In-memory services at the fixed test time, with no API key configured.
pub fn test_services() -> AppServices {
    AppServices::in_memory(
        Clock::fixed(fixed_now()),
        ServicesConfig::default(),
        Arc::new(OfflineModel),
    )
}

/// Mount `view` over `services`, optionally with a document already open.
pub fn setup_view_harness(
    view: ViewKind,
    services: AppServices,
    document: Option<OpenDocument>,
) -> ViewHarness {
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(services.clone()),
            view,
            document,
        },
    );
    ViewHarness { dom, services }
}

fn question(i: usize, topic: &str) -> Question {
    let options: [String; OPTION_COUNT] = [
        format!("Option {i}a"),
        format!("Option {i}b"),
        format!("Option {i}c"),
        format!("Option {i}d"),
    ];
    Question::new(
        format!("Question {i}?"),
        options,
        i % OPTION_COUNT,
        format!("Because {i}."),
        Topic::new(topic).unwrap(),
    )
    .unwrap()
}

/// Six questions over two topics and three flashcards.
pub fn sample_analysis() -> AnalysisResult {
    let topics = ["Heart failure", "Arrhythmia"];
    let questions = (0..6).map(|i| question(i, topics[i % 2])).collect();
    let quiz = Quiz::new("Cardiology basics", QuizSettings::default(), questions).unwrap();
    let flashcards = vec![
        Flashcard::new("Preload", "End-diastolic volume", Topic::new("Heart failure").unwrap())
            .unwrap(),
        Flashcard::new("Afterload", "Resistance to ejection", Topic::new("Heart failure").unwrap())
            .unwrap(),
        Flashcard::new("QT interval", "Ventricular depolarization and repolarization", Topic::new("Arrhythmia").unwrap())
            .unwrap(),
    ];
    AnalysisResult::new(
        "<p>Heart <strong>failure</strong> overview<script>alert(1)</script></p>",
        quiz,
        flashcards,
    )
    .unwrap()
}

pub fn open_document() -> OpenDocument {
    OpenDocument {
        file_name: "cardiology.pdf".to_string(),
        analysis: sample_analysis(),
        saved_id: None,
    }
}
