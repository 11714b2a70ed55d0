use dioxus::prelude::*;
use dioxus_router::use_navigator;

use lingo_core::model::LessonId;
use services::{AnswerInput, LessonPhase, MatchColumn, Progress};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    CheckOutcome, LessonVm, QuestionSurface, SurfaceBody, start_lesson,
};

/// Delay before the completed-lesson view navigates home.
const COMPLETION_REDIRECT_MS: u64 = 1500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CompletionStatus {
    Reporting,
    Done { xp_earned: u32 },
    Failed,
}

fn answer_input(surface: Option<&SurfaceBody>, text: &str, choice: Option<&str>) -> AnswerInput {
    match surface {
        Some(SurfaceBody::Text { .. } | SurfaceBody::Blank { .. }) => {
            AnswerInput::Text(text.to_string())
        }
        Some(SurfaceBody::Choice { .. }) => {
            AnswerInput::Choice(choice.unwrap_or_default().to_string())
        }
        Some(SurfaceBody::Matching { .. }) => AnswerInput::Matching,
        None => AnswerInput::Text(String::new()),
    }
}

#[component]
pub fn LessonView(lesson_id: u32) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let flow = ctx.lesson_flow();
    let hearts = ctx.hearts();
    let dashboard_service = ctx.dashboard_service();
    let language = dashboard_service.selected_language();
    let lesson_id = LessonId::new(lesson_id);

    let vm = use_signal(|| None::<LessonVm>);
    let mut text_input = use_signal(String::new);
    let mut choice = use_signal(|| None::<String>);
    let completion = use_signal(|| None::<CompletionStatus>);

    let flow_for_resource = flow.clone();
    let resource = use_resource(move || {
        let flow = flow_for_resource.clone();
        let mut vm = vm;
        let mut text_input = text_input;
        let mut choice = choice;
        let mut completion = completion;
        async move {
            completion.set(None);
            text_input.set(String::new());
            choice.set(None);
            let started = start_lesson(&flow, lesson_id, language).await?;
            vm.set(Some(started));
            Ok::<_, ViewError>(())
        }
    });

    let report_completion = {
        let flow = flow.clone();
        use_callback(move |()| {
            let flow = flow.clone();
            let mut vm = vm;
            let mut completion = completion;
            let navigator = navigator;
            spawn(async move {
                completion.set(Some(CompletionStatus::Reporting));
                let Some(vm_value) = vm.write().take() else {
                    completion.set(Some(CompletionStatus::Failed));
                    return;
                };

                let result = flow.complete(vm_value.session(), language).await;

                // Put the session back so a failed report stays retryable.
                *vm.write() = Some(vm_value);

                match result {
                    Ok(payload) => {
                        completion.set(Some(CompletionStatus::Done {
                            xp_earned: payload.xp_earned,
                        }));
                        tokio::time::sleep(std::time::Duration::from_millis(
                            COMPLETION_REDIRECT_MS,
                        ))
                        .await;
                        let _ = navigator.push(Route::Dashboard {});
                    }
                    Err(err) => {
                        log::warn!("failed to report lesson completion: {err}");
                        completion.set(Some(CompletionStatus::Failed));
                    }
                }
            });
        })
    };

    let on_check = {
        let hearts = hearts.clone();
        use_callback(move |()| {
            let hearts = hearts.clone();
            let mut vm = vm;
            let outcome = {
                let mut guard = vm.write();
                guard.as_mut().map(|vm_value| {
                    let input = answer_input(
                        vm_value.surface().map(|surface| surface.body).as_ref(),
                        &text_input(),
                        choice().as_deref(),
                    );
                    vm_value.check(&hearts, input)
                })
            };
            if outcome
                == Some(CheckOutcome::Checked {
                    persist_deduction: true,
                })
            {
                let hearts = hearts.clone();
                spawn(async move {
                    hearts.persist_deduction().await;
                });
            }
        })
    };

    let on_continue = use_callback(move |()| {
        let mut vm = vm;
        let mut text_input = text_input;
        let mut choice = choice;
        let progress = {
            let mut guard = vm.write();
            guard.as_mut().map(LessonVm::advance)
        };
        text_input.set(String::new());
        choice.set(None);
        if progress == Some(Progress::Complete) {
            report_completion.call(());
        }
    });

    let on_match_click = use_callback(move |(column, value): (MatchColumn, String)| {
        let mut vm = vm;
        let mut guard = vm.write();
        if let Some(vm_value) = guard.as_mut() {
            let _ = vm_value.match_click(column, &value);
        }
    });

    let state = view_state_from_resource(&resource);
    let completion_state = completion();

    let vm_guard = vm.read();
    let surface = vm_guard.as_ref().and_then(LessonVm::surface);
    let feedback = vm_guard.as_ref().and_then(|v| v.feedback().cloned());
    let phase = vm_guard.as_ref().map(LessonVm::phase);
    let title = vm_guard
        .as_ref()
        .map(|v| v.title().to_string())
        .unwrap_or_default();
    let progress = vm_guard.as_ref().map(LessonVm::progress);
    let hearts_count = vm_guard.as_ref().map_or(0, LessonVm::hearts_count);
    let can_check = vm_guard.as_ref().is_some_and(|vm_value| {
        let input = answer_input(
            surface.as_ref().map(|s| &s.body),
            &text_input(),
            choice().as_deref(),
        );
        vm_value.can_check(&input)
    });
    drop(vm_guard);

    let progress_percent = progress.map_or(0.0, |p| p.fraction() * 100.0);
    let round_label = progress.and_then(|p| {
        (p.round > 0 && !p.is_complete).then(|| format!("Review round {}", p.round))
    });
    // Out of hearts blocks checking but never continuing, so the review
    // mechanism can still converge.
    let out_of_hearts = phase.is_some() && hearts_count == 0;
    let show_check =
        phase == Some(LessonPhase::Answering) && completion_state.is_none() && !out_of_hearts;
    let show_continue = completion_state.is_none()
        && (phase == Some(LessonPhase::Checked)
            || (phase == Some(LessonPhase::Answering) && out_of_hearts));

    rsx! {
        div { class: "page lesson-page",
            header { class: "lesson-header",
                h2 { class: "lesson-title", "{title}" }
                div { class: if hearts_count == 0 { "hearts hearts--empty" } else { "hearts" },
                    span { class: "hearts-icon", "\u{2764}" }
                    span { class: "hearts-count", "x{hearts_count}" }
                }
            }
            div { class: "progress-track",
                div {
                    class: "progress-fill",
                    style: "width: {progress_percent}%",
                }
            }
            if let Some(label) = round_label {
                p { class: "round-label", "{label}" }
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "lesson-error",
                        h3 { "Error" }
                        p { "{err.message()}" }
                        if err == ViewError::Unknown {
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| {
                                    let mut resource = resource;
                                    resource.restart();
                                },
                                "Retry"
                            }
                        }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let _ = navigator.push(Route::Dashboard {});
                            },
                            "Back to Dashboard"
                        }
                    }
                },
                ViewState::Ready(()) => rsx! {
                    match completion_state {
                        Some(CompletionStatus::Reporting) => rsx! {
                            div { class: "lesson-complete",
                                p { class: "feedback correct visible", "Lesson Complete!" }
                                p { class: "lesson-complete-note", "Saving your progress..." }
                            }
                        },
                        Some(CompletionStatus::Done { xp_earned }) => rsx! {
                            div { class: "lesson-complete",
                                p { class: "feedback correct visible", "Lesson Complete! +{xp_earned} XP" }
                                p { class: "lesson-complete-note", "Heading back to the dashboard..." }
                            }
                        },
                        Some(CompletionStatus::Failed) => rsx! {
                            div { class: "lesson-complete",
                                p { class: "feedback incorrect visible",
                                    "Could not save lesson completion. Please try again."
                                }
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    onclick: move |_| report_completion.call(()),
                                    "Retry"
                                }
                            }
                        },
                        None => rsx! {
                            if let Some(surface) = surface {
                                QuestionPanel {
                                    surface,
                                    text_value: text_input(),
                                    choice_value: choice(),
                                    answering: phase == Some(LessonPhase::Answering),
                                    can_check,
                                    on_text: move |value| text_input.set(value),
                                    on_choice: move |value| choice.set(Some(value)),
                                    on_match: on_match_click,
                                    on_submit: on_check,
                                }
                            }
                            if let Some(feedback) = feedback {
                                p {
                                    class: if feedback.correct { "feedback correct visible" } else { "feedback incorrect visible" },
                                    "{feedback.message}"
                                }
                            }
                            div { class: "lesson-actions",
                                if show_check {
                                    button {
                                        class: "btn btn-primary check-button",
                                        r#type: "button",
                                        disabled: !can_check,
                                        onclick: move |_| on_check.call(()),
                                        "Check"
                                    }
                                }
                                if show_continue {
                                    button {
                                        class: "btn btn-primary continue-button",
                                        r#type: "button",
                                        onclick: move |_| on_continue.call(()),
                                        "Continue"
                                    }
                                }
                            }
                        },
                    }
                },
            }
        }
    }
}

#[component]
fn QuestionPanel(
    surface: QuestionSurface,
    text_value: String,
    choice_value: Option<String>,
    answering: bool,
    can_check: bool,
    on_text: EventHandler<String>,
    on_choice: EventHandler<String>,
    on_match: EventHandler<(MatchColumn, String)>,
    on_submit: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "question-panel",
            p { class: "question-instruction", "{surface.instruction}" }
            match surface.body {
                SurfaceBody::Text { prompt } => rsx! {
                    p { class: "question-text", "{prompt}" }
                    input {
                        class: "text-answer",
                        r#type: "text",
                        placeholder: "Type your answer here",
                        autocomplete: "off",
                        autocapitalize: "none",
                        disabled: !answering,
                        value: "{text_value}",
                        oninput: move |evt| on_text.call(evt.value()),
                        onkeydown: move |evt| {
                            if evt.key() == Key::Enter && can_check {
                                on_submit.call(());
                            }
                        },
                    }
                },
                SurfaceBody::Blank { prefix, suffix } => rsx! {
                    p { class: "question-text",
                        span { "{prefix}" }
                        input {
                            class: "fill-blank-input",
                            r#type: "text",
                            maxlength: "25",
                            autocomplete: "off",
                            autocapitalize: "none",
                            disabled: !answering,
                            value: "{text_value}",
                            oninput: move |evt| on_text.call(evt.value()),
                            onkeydown: move |evt| {
                                if evt.key() == Key::Enter && can_check {
                                    on_submit.call(());
                                }
                            },
                        }
                        span { "{suffix}" }
                    }
                },
                SurfaceBody::Choice { prompt, options } => rsx! {
                    p { class: "question-text", "{prompt}" }
                    div { class: "mc-options",
                        for option in options {
                            button {
                                class: if choice_value.as_deref() == Some(option.as_str()) { "mc-option selected" } else { "mc-option" },
                                r#type: "button",
                                disabled: !answering,
                                onclick: {
                                    let option = option.clone();
                                    move |_| on_choice.call(option.clone())
                                },
                                "{option}"
                            }
                        }
                    }
                },
                SurfaceBody::Matching { prompt, left, right } => rsx! {
                    p { class: "question-text", "{prompt}" }
                    div { class: "matching-container",
                        div { class: "match-column",
                            for item in left {
                                button {
                                    class: if item.paired { "match-item paired" } else if item.selected { "match-item selected" } else { "match-item" },
                                    r#type: "button",
                                    disabled: !answering,
                                    onclick: {
                                        let label = item.label.clone();
                                        move |_| on_match.call((MatchColumn::Left, label.clone()))
                                    },
                                    "{item.label}"
                                }
                            }
                        }
                        div { class: "match-column",
                            for item in right {
                                button {
                                    class: if item.paired { "match-item paired" } else { "match-item" },
                                    r#type: "button",
                                    disabled: !answering,
                                    onclick: {
                                        let label = item.label.clone();
                                        move |_| on_match.call((MatchColumn::Right, label.clone()))
                                    },
                                    "{item.label}"
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
