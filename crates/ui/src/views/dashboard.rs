use dioxus::prelude::*;
use dioxus_router::use_navigator;

use lingo_core::model::Language;
use services::HeartsTick;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{format_countdown, hearts_label, map_dashboard_lessons};

/// Heart pool as the header renders it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HeartsDisplay {
    count: u8,
    seconds_left: Option<i64>,
}

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let dashboard_service = ctx.dashboard_service();
    let hearts = ctx.hearts();

    let mut language = use_signal({
        let dashboard_service = dashboard_service.clone();
        move || dashboard_service.selected_language()
    });
    let mut menu_open = use_signal(|| false);
    let mut hearts_display = use_signal(|| None::<HeartsDisplay>);

    let dashboard_service_for_resource = dashboard_service.clone();
    let hearts_for_resource = hearts.clone();
    let resource = use_resource(move || {
        let dashboard_service = dashboard_service_for_resource.clone();
        let hearts = hearts_for_resource.clone();
        let lang = language();
        let mut hearts_display = hearts_display;
        async move {
            let dashboard = dashboard_service
                .load(lang)
                .await
                .map_err(|_| ViewError::Unknown)?;

            // Seed the shared pool from the fetch; the one-second tick below
            // keeps the label honest afterwards.
            hearts.initialize(dashboard.hearts, dashboard.time_left);
            let snapshot = hearts.snapshot();
            hearts_display.set(Some(HeartsDisplay {
                count: snapshot.hearts.count(),
                seconds_left: snapshot.seconds_left,
            }));

            Ok::<_, ViewError>(dashboard)
        }
    });

    let hearts_for_tick = hearts.clone();
    use_future(move || {
        let hearts = hearts_for_tick.clone();
        let mut hearts_display = hearts_display;
        async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
            loop {
                interval.tick().await;
                match hearts.tick().await {
                    HeartsTick::Idle => {}
                    HeartsTick::Counting { .. } | HeartsTick::Reconciled => {
                        let snapshot = hearts.snapshot();
                        hearts_display.set(Some(HeartsDisplay {
                            count: snapshot.hearts.count(),
                            seconds_left: snapshot.seconds_left,
                        }));
                    }
                }
            }
        }
    });

    let state = view_state_from_resource(&resource);
    let current_language = language();
    let display = hearts_display();

    rsx! {
        div { class: "page dashboard-page",
            header { class: "view-header",
                h2 { class: "view-title", "Dashboard" }
                div { class: "view-header-side",
                    if let Some(display) = display {
                        div { class: if display.count == 0 { "hearts hearts--empty" } else { "hearts" },
                            span { class: "hearts-icon", "\u{2764}" }
                            span { class: "hearts-count", {hearts_label(display.count)} }
                            if let Some(seconds) = display.seconds_left {
                                span { class: "hearts-timer",
                                    "Next heart in {format_countdown(seconds)}"
                                }
                            }
                        }
                    }
                    div { class: "language-picker",
                        button {
                            class: "dropbtn",
                            r#type: "button",
                            onclick: move |_| menu_open.set(!menu_open()),
                            "{current_language.flag()} {current_language.name()}"
                        }
                        if menu_open() {
                            div { class: "language-menu",
                                for lang in Language::ALL {
                                    button {
                                        class: "language-option",
                                        r#type: "button",
                                        onclick: {
                                            let dashboard_service = dashboard_service.clone();
                                            move |_| {
                                                dashboard_service.select_language(lang);
                                                language.set(lang);
                                                menu_open.set(false);
                                            }
                                        },
                                        "{lang.flag()} {lang.name()}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(dashboard) => {
                    let cards = map_dashboard_lessons(&dashboard);
                    rsx! {
                        div { class: "lesson-grid",
                            for card in cards {
                                div { class: if card.completed { "lesson-card lesson-card--done" } else { "lesson-card" },
                                    div { class: "lesson-card-text",
                                        h4 { class: "lesson-card-title", "{card.title}" }
                                        span { class: "lesson-card-xp", "{card.xp_label}" }
                                        if card.completed {
                                            span { class: "lesson-card-badge", "\u{2713} Completed" }
                                        }
                                    }
                                    button {
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        onclick: {
                                            let nav = navigator;
                                            let lesson_id = card.id;
                                            move |_| {
                                                let _ = nav.push(Route::Lesson { lesson_id });
                                            }
                                        },
                                        if card.completed { "Review" } else { "Start" }
                                    }
                                }
                            }
                            if dashboard.lessons.is_empty() {
                                p { class: "lesson-grid-empty", "No lessons available for this language yet." }
                            }
                        }
                    }
                }
            }
        }
    }
}
