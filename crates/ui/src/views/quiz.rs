use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::Link;

use services::sessions::{EXPLANATION_DELAY_MS, QuizSessionError};
use services::{ProgressUpdate, QuizLoopService, QuizOutcome, QuizSession, QuizSetup, QuizStep};
use study_core::model::{Quiz, QuizProgress};

use crate::context::{AppContext, DocumentState};
use crate::routes::Route;
use crate::views::TopicPicker;
use crate::vm::{count_slider, outcome_vm, question_vm, topic_chips};

#[derive(Clone, Debug)]
enum QuizScreen {
    Configuring(QuizSetup),
    Resume(QuizProgress),
    InProgress(QuizSession),
    Finished(QuizOutcome),
}

impl QuizScreen {
    /// Answer on the session shown right now.
    ///
    /// `Ok(None)` means nothing changed: the question already had an answer
    /// or no quiz is running.
    fn answer(
        &mut self,
        quiz_loop: &QuizLoopService,
        option: usize,
    ) -> Result<Option<ProgressUpdate>, QuizSessionError> {
        let QuizScreen::InProgress(session) = self else {
            return Ok(None);
        };
        let (verdict, update) = quiz_loop.apply_answer(session, option)?;
        Ok((!verdict.already_answered).then_some(update))
    }

    /// Move past the answered question, switching to the outcome at the end.
    fn advance(
        &mut self,
        quiz_loop: &QuizLoopService,
    ) -> Result<Option<ProgressUpdate>, QuizSessionError> {
        let QuizScreen::InProgress(session) = self else {
            return Ok(None);
        };
        let (step, update) = quiz_loop.apply_advance(session)?;
        if let QuizStep::Finished(outcome) = step {
            *self = QuizScreen::Finished(outcome);
        }
        Ok(Some(update))
    }
}

#[component]
pub fn QuizView() -> Element {
    let document = use_context::<DocumentState>();

    rsx! {
        div { class: "page",
            match document.current() {
                Some(open) => rsx! {
                    QuizRunner { quiz: open.analysis.quiz().clone() }
                },
                None => rsx! {
                    h2 { "Quiz" }
                    p { "Open a document first." }
                    Link { to: Route::Upload {}, "Upload a PDF" }
                },
            }
        }
    }
}

#[component]
fn QuizRunner(quiz: Quiz) -> Element {
    let ctx = use_context::<AppContext>();
    let clock = ctx.clock();
    let quiz_loop = ctx.quiz_loop();
    let mut screen = {
        let quiz = quiz.clone();
        use_signal(move || QuizScreen::Configuring(QuizSetup::new(quiz)))
    };
    let mut error = use_signal(|| None::<String>);
    // Bumped when a pending explanation should become visible.
    let mut reveal_tick = use_signal(|| 0_u32);

    {
        let quiz_loop = quiz_loop.clone();
        let quiz = quiz.clone();
        use_future(move || {
            let quiz_loop = quiz_loop.clone();
            let quiz = quiz.clone();
            async move {
                if let Some(snapshot) = quiz_loop.pending_resume(&quiz).await {
                    screen.set(QuizScreen::Resume(snapshot));
                }
            }
        });
    }

    let _ = reveal_tick();
    let current = screen.read().clone();

    let body = match current {
        QuizScreen::Configuring(setup) => {
            let title = setup.quiz().title().to_string();
            let chips = topic_chips(setup.selection());
            let slider = count_slider(setup.selection());
            let quiz_loop = quiz_loop.clone();
            rsx! {
                h2 { "{title}" }
                TopicPicker {
                    chips,
                    slider,
                    noun: "questions",
                    on_toggle: move |topic| {
                        if let QuizScreen::Configuring(setup) = &mut *screen.write() {
                            setup.selection_mut().toggle(&topic);
                        }
                    },
                    on_count: move |count| {
                        if let QuizScreen::Configuring(setup) = &mut *screen.write() {
                            setup.selection_mut().set_count(count);
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !slider.can_start(),
                    onclick: move |_| {
                        let quiz_loop = quiz_loop.clone();
                        let setup = setup.clone();
                        spawn(async move {
                            let mut rng = rand::rng();
                            match quiz_loop.start(&setup, &mut rng).await {
                                Ok(session) => {
                                    error.set(None);
                                    screen.set(QuizScreen::InProgress(session));
                                }
                                Err(err) => error.set(Some(err.to_string())),
                            }
                        });
                    },
                    "Start quiz"
                }
            }
        }
        QuizScreen::Resume(snapshot) => {
            let answered = snapshot.answered_count();
            let total = snapshot.questions.len();
            let resume_loop = quiz_loop.clone();
            let discard_loop = quiz_loop.clone();
            let title = quiz.title().to_string();
            let resume_quiz = quiz.clone();
            let discard_quiz = quiz.clone();
            rsx! {
                h2 { "{title}" }
                div { class: "panel",
                    p { "You have an unfinished attempt: {answered} of {total} questions answered." }
                    div { class: "row",
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| {
                                let quiz_loop = resume_loop.clone();
                                let quiz = resume_quiz.clone();
                                let snapshot = snapshot.clone();
                                spawn(async move {
                                    match quiz_loop.resume(&quiz, snapshot).await {
                                        Ok(session) => screen.set(QuizScreen::InProgress(session)),
                                        Err(err) => {
                                            error.set(Some(err.to_string()));
                                            screen.set(QuizScreen::Configuring(QuizSetup::new(quiz)));
                                        }
                                    }
                                });
                            },
                            "Resume"
                        }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let quiz_loop = discard_loop.clone();
                                let quiz = discard_quiz.clone();
                                spawn(async move {
                                    quiz_loop.restart().await;
                                    screen.set(QuizScreen::Configuring(QuizSetup::new(quiz)));
                                });
                            },
                            "Start over"
                        }
                    }
                }
            }
        }
        QuizScreen::InProgress(session) => {
            let vm = question_vm(&session, clock.now());
            let title = session.quiz_title().to_string();
            let answer_loop = quiz_loop.clone();
            let advance_loop = quiz_loop.clone();
            let options = vm.options.iter().map(|option| {
                let index = option.index;
                let quiz_loop = answer_loop.clone();
                let mut screen = screen;
                let mut error = error;
                let mut reveal_tick = reveal_tick;
                rsx! {
                    button {
                        key: "{index}",
                        class: "{option.state.class()}",
                        r#type: "button",
                        disabled: vm.answered,
                        onclick: move |_| {
                            let applied = screen.write().answer(&quiz_loop, index);
                            match applied {
                                Ok(Some(update)) => {
                                    let quiz_loop = quiz_loop.clone();
                                    spawn(async move {
                                        quiz_loop.persist(update).await;
                                        let delay = u64::try_from(EXPLANATION_DELAY_MS).unwrap_or(0);
                                        tokio::time::sleep(Duration::from_millis(delay)).await;
                                        reveal_tick += 1;
                                    });
                                }
                                Ok(None) => {}
                                Err(err) => error.set(Some(err.to_string())),
                            }
                        },
                        "{option.label}"
                    }
                }
            });
            rsx! {
                h2 { "{title}" }
                div { class: "panel",
                    p { class: "muted", "{vm.progress_label} · {vm.topic}" }
                    h3 { "{vm.text}" }
                    div { class: "options", {options} }
                    if let Some(explanation) = vm.explanation.as_ref() {
                        p { class: "explanation", "{explanation}" }
                    }
                    div { class: "row",
                        span { class: "muted", "{vm.score_label}" }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: !vm.answered,
                            onclick: move |_| {
                                let applied = screen.write().advance(&advance_loop);
                                match applied {
                                    Ok(Some(update)) => {
                                        let quiz_loop = advance_loop.clone();
                                        spawn(async move { quiz_loop.persist(update).await });
                                    }
                                    Ok(None) => {}
                                    Err(err) => error.set(Some(err.to_string())),
                                }
                            },
                            if vm.is_last { "Finish" } else { "Next" }
                        }
                    }
                }
            }
        }
        QuizScreen::Finished(outcome) => {
            let vm = outcome_vm(&outcome);
            let quiz_loop = quiz_loop.clone();
            let quiz = quiz.clone();
            rsx! {
                h2 { "{vm.headline}" }
                div { class: "panel",
                    p { "{vm.correct_label}" }
                    p { "{vm.score_label}" }
                    if !vm.review_topics.is_empty() {
                        p { "Worth another read:" }
                        ul {
                            for topic in vm.review_topics.iter() {
                                li { key: "{topic}", "{topic}" }
                            }
                        }
                    }
                    div { class: "row",
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| {
                                let quiz_loop = quiz_loop.clone();
                                let quiz = quiz.clone();
                                spawn(async move {
                                    quiz_loop.restart().await;
                                    screen.set(QuizScreen::Configuring(QuizSetup::new(quiz)));
                                });
                            },
                            "Try again"
                        }
                        Link { to: Route::Results {}, "Back to results" }
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
