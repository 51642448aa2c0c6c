use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{QuizSetup, SaveArticleDraft};

use super::test_harness::{
    ViewKind, open_document, sample_analysis, setup_view_harness, test_services,
};

#[tokio::test(flavor = "current_thread")]
async fn results_view_renders_sanitized_summary() {
    let mut harness = setup_view_harness(ViewKind::Results, test_services(), Some(open_document()));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("cardiology.pdf"), "missing file name in {html}");
    assert!(html.contains("<strong>failure</strong>"), "missing summary in {html}");
    assert!(!html.contains("<script"), "script survived in {html}");
    assert!(html.contains("Take the quiz (6 questions)"), "missing quiz link in {html}");
    assert!(html.contains("Save to library"), "missing save form in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_without_document_points_to_upload() {
    let mut harness = setup_view_harness(ViewKind::Results, test_services(), None);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("No document is open."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_opens_on_topic_selection() {
    let mut harness = setup_view_harness(ViewKind::Quiz, test_services(), Some(open_document()));
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Cardiology basics"), "missing title in {html}");
    assert!(html.contains("Heart failure"), "missing topic chip in {html}");
    assert!(html.contains("Arrhythmia"), "missing topic chip in {html}");
    assert!(html.contains("Start quiz"), "missing start button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_offers_resume_for_matching_snapshot() {
    let services = test_services();
    let quiz = sample_analysis().quiz().clone();
    let setup = QuizSetup::new(quiz);
    let mut session = services
        .quiz_loop()
        .start(&setup, &mut StdRng::seed_from_u64(3))
        .await
        .expect("start");
    services
        .quiz_loop()
        .answer(&mut session, 0)
        .await
        .expect("answer");

    let mut harness = setup_view_harness(ViewKind::Quiz, services, Some(open_document()));
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("1 of 6 questions answered"),
        "missing resume prompt in {html}"
    );
    assert!(html.contains("Resume"), "missing resume button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn flashcards_view_opens_on_topic_selection() {
    let mut harness =
        setup_view_harness(ViewKind::Flashcards, test_services(), Some(open_document()));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Start studying"), "missing start button in {html}");
    assert!(html.contains("3 cards available."), "missing count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn library_view_groups_saved_articles() {
    let services = test_services();
    services
        .library()
        .save(SaveArticleDraft {
            file_name: "cardiology.pdf".to_string(),
            specialty: "Cardiology".to_string(),
            analysis: sample_analysis(),
        })
        .await
        .expect("save");

    let mut harness = setup_view_harness(ViewKind::Library, services, None);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Cardiology"), "missing specialty in {html}");
    assert!(html.contains("cardiology.pdf"), "missing file name in {html}");
    assert!(html.contains("6 questions · 3 flashcards"), "missing counts in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn library_view_shows_empty_state() {
    let mut harness = setup_view_harness(ViewKind::Library, test_services(), None);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Nothing saved yet."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn upload_view_hints_when_no_key_is_configured() {
    let mut harness = setup_view_harness(ViewKind::Upload, test_services(), None);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Upload a PDF"), "missing title in {html}");
    assert!(html.contains("Enter your API key"), "missing key hint in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn settings_view_shows_theme_and_key_state() {
    let mut harness = setup_view_harness(ViewKind::Settings, test_services(), None);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Theme: Light"), "missing theme in {html}");
    assert!(html.contains("Switch to Dark"), "missing toggle in {html}");
    assert!(html.contains("No API key is configured."), "missing key state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn api_key_view_renders_form() {
    let mut harness = setup_view_harness(ViewKind::ApiKey, test_services(), None);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Save key"), "missing submit in {html}");
}
