use backend::{InMemoryBackend, LessonPayload};
use lingo_core::model::{Language, LessonId, QuestionDraft};

use super::test_harness::{ViewKind, setup_view_harness};

fn spanish_lesson() -> LessonPayload {
    LessonPayload {
        lesson: 1,
        title: "Basics 1".into(),
        xp: 10,
        questions: vec![QuestionDraft::Translation {
            question: "the dog".into(),
            answer: "el perro".into(),
            instruction: None,
        }],
    }
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_lessons_and_hearts() {
    let backend = InMemoryBackend::new([(Language::Spanish, spanish_lesson())]);
    backend.set_hearts(3, 120).unwrap();
    let mut harness = setup_view_harness(ViewKind::Dashboard, backend);

    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Basics 1"), "missing lesson title in {html}");
    assert!(html.contains("10 XP"), "missing xp label in {html}");
    assert!(html.contains("x3"), "missing hearts label in {html}");
    assert!(html.contains("Spanish"), "missing language name in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_marks_completed_lessons() {
    let backend = InMemoryBackend::new([(Language::Spanish, spanish_lesson())]);
    backend
        .complete_lesson(LessonId::new(1), Language::Spanish)
        .await
        .unwrap();
    let mut harness = setup_view_harness(ViewKind::Dashboard, backend);

    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Completed"), "missing completed badge in {html}");
    assert!(html.contains("Review"), "missing review action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_smoke_renders_question_surface() {
    let backend = InMemoryBackend::new([(Language::Spanish, spanish_lesson())]);
    let mut harness = setup_view_harness(ViewKind::Lesson(1), backend);
    harness.hearts.initialize(5, 0);

    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("Translate this word/phrase:"),
        "missing instruction in {html}"
    );
    assert!(html.contains("the dog"), "missing prompt in {html}");
    assert!(html.contains("Check"), "missing check button in {html}");
    assert!(html.contains("x5"), "missing hearts counter in {html}");

    // Merely rendering the question never costs a heart.
    assert_eq!(harness.backend.lose_heart_calls().unwrap(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_smoke_shows_terminal_error_for_unknown_lesson() {
    let backend = InMemoryBackend::new([(Language::Spanish, spanish_lesson())]);
    let mut harness = setup_view_harness(ViewKind::Lesson(42), backend);

    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("That lesson could not be found."),
        "missing not-found message in {html}"
    );
    assert!(
        html.contains("Back to Dashboard"),
        "missing back action in {html}"
    );
}
