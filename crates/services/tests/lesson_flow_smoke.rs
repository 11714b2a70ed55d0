use std::sync::Arc;

use backend::{InMemoryBackend, InMemoryPrefs, LessonPayload};
use lingo_core::model::{Language, LessonId, QuestionDraft};
use lingo_core::time::fixed_clock;
use services::{AnswerInput, HeartsService, LessonFlowService, Progress};

fn three_question_lesson() -> LessonPayload {
    let translation = |prompt: &str, answer: &str| QuestionDraft::Translation {
        question: prompt.into(),
        answer: answer.into(),
        instruction: None,
    };
    LessonPayload {
        lesson: 1,
        title: "Basics 1".into(),
        xp: 10,
        questions: vec![
            translation("one", "uno"),
            translation("two", "dos"),
            translation("three", "tres"),
        ],
    }
}

#[tokio::test]
async fn missed_question_reviews_then_completes_with_one_deduction() {
    let backend = InMemoryBackend::new([(Language::Spanish, three_question_lesson())]);
    let prefs = InMemoryPrefs::new();
    let hearts = Arc::new(HeartsService::new(
        Arc::new(backend.clone()),
        Arc::new(prefs),
        fixed_clock(),
    ));
    hearts.initialize(5, 0);
    let flow = LessonFlowService::new(Arc::new(backend.clone()), Arc::clone(&hearts));

    let mut session = flow
        .start(LessonId::new(1), Language::Spanish)
        .await
        .unwrap();

    // Round 0: q1 right, q2 wrong (costs the heart), q3 right.
    session.submit(AnswerInput::Text("uno".into())).unwrap();
    session.advance().unwrap();

    let outcome = session.submit(AnswerInput::Text("wrong".into())).unwrap();
    assert!(outcome.heart_spent);
    hearts.deduct().await;
    session.advance().unwrap();

    session.submit(AnswerInput::Text("tres".into())).unwrap();
    assert_eq!(session.advance().unwrap(), Progress::NewRound { round: 1 });

    // Round 1 holds exactly the missed question.
    assert_eq!(session.progress().pool_size, 1);
    session.submit(AnswerInput::Text("dos".into())).unwrap();
    assert_eq!(session.advance().unwrap(), Progress::Complete);

    let payload = flow.complete(&session, Language::Spanish).await.unwrap();
    assert_eq!(payload.xp_earned, 10);
    assert_eq!(payload.completed_lessons, vec![1]);

    // Exactly one deduction reached the server.
    assert_eq!(backend.lose_heart_calls().unwrap(), 1);
    assert_eq!(backend.hearts().await.unwrap().hearts, 4);
    assert_eq!(hearts.snapshot().hearts.count(), 4);
}

#[tokio::test]
async fn completion_before_finishing_is_rejected() {
    let backend = InMemoryBackend::new([(Language::Spanish, three_question_lesson())]);
    let hearts = Arc::new(HeartsService::new(
        Arc::new(backend.clone()),
        Arc::new(InMemoryPrefs::new()),
        fixed_clock(),
    ));
    let flow = LessonFlowService::new(Arc::new(backend), hearts);

    let session = flow
        .start(LessonId::new(1), Language::Spanish)
        .await
        .unwrap();
    let err = flow.complete(&session, Language::Spanish).await.unwrap_err();
    assert!(matches!(err, services::SessionError::NotFinished));
}

#[tokio::test]
async fn starting_with_zero_hearts_is_refused() {
    let backend = InMemoryBackend::new([(Language::Spanish, three_question_lesson())]);
    backend.set_hearts(0, 900).unwrap();
    let hearts = Arc::new(HeartsService::new(
        Arc::new(backend.clone()),
        Arc::new(InMemoryPrefs::new()),
        fixed_clock(),
    ));
    hearts.reconcile().await;
    let flow = LessonFlowService::new(Arc::new(backend), hearts);

    let err = flow
        .start(LessonId::new(1), Language::Spanish)
        .await
        .unwrap_err();
    assert!(matches!(err, services::SessionError::OutOfHearts));
}
