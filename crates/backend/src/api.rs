use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lingo_core::model::{Language, Lesson, LessonId, LessonMeta, QuestionDraft, QuestionError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("lesson {0} not found")]
    LessonNotFound(LessonId),

    #[error(transparent)]
    Content(#[from] QuestionError),

    #[error("backend state error: {0}")]
    State(String),
}

//
// ─── PAYLOADS ──────────────────────────────────────────────────────────────────
//

/// One entry of the dashboard lesson list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSummary {
    pub lesson: u32,
    pub title: String,
    pub xp: u32,
}

impl LessonSummary {
    #[must_use]
    pub fn meta(&self) -> LessonMeta {
        LessonMeta::new(LessonId::new(self.lesson), self.title.clone(), self.xp)
    }
}

/// `GET lessons?lang=<L>` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub lessons: Vec<LessonSummary>,
    pub completed: Vec<u32>,
    pub hearts: u32,
    /// Seconds until the next heart regenerates; 0 when the pool is full.
    pub time_left: i64,
}

/// `GET hearts` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartsPayload {
    pub hearts: u32,
    pub time_left: i64,
}

/// `POST lose_heart` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoseHeartPayload {
    pub success: bool,
    pub hearts: u32,
}

/// `POST complete_lesson/{id}?lang=<L>` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPayload {
    pub xp_earned: u32,
    pub completed_lessons: Vec<u32>,
}

/// `GET lesson/{id}?lang=<L>` response: a lesson with its raw question content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPayload {
    pub lesson: u32,
    pub title: String,
    pub xp: u32,
    pub questions: Vec<QuestionDraft>,
}

impl LessonPayload {
    /// Validate the raw content into a scoreable lesson.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if any question draft fails validation.
    pub fn into_lesson(self) -> Result<Lesson, QuestionError> {
        let meta = LessonMeta::new(LessonId::new(self.lesson), self.title, self.xp);
        Lesson::from_drafts(meta, self.questions)
    }
}

//
// ─── BACKEND CONTRACT ──────────────────────────────────────────────────────────
//

/// The JSON/HTTP contract the client consumes.
///
/// The backend owns persistence and heart regeneration; the client treats
/// every response here as authoritative and only diverges optimistically
/// between calls.
#[async_trait]
pub trait LingoBackend: Send + Sync {
    /// Fetch the dashboard payload for a course language.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport or decoding failure.
    async fn dashboard(&self, lang: Language) -> Result<DashboardPayload, BackendError>;

    /// Fetch the authoritative heart count and regeneration countdown.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport or decoding failure.
    async fn hearts(&self) -> Result<HeartsPayload, BackendError>;

    /// Persist a one-heart deduction.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport or decoding failure.
    async fn lose_heart(&self) -> Result<LoseHeartPayload, BackendError>;

    /// Fetch a lesson's validated question content.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::LessonNotFound` for an unknown id,
    /// `BackendError::Content` for invalid question content, or transport
    /// failures.
    async fn lesson(&self, id: LessonId, lang: Language) -> Result<Lesson, BackendError>;

    /// Report lesson completion and receive the experience reward.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport or decoding failure.
    async fn complete_lesson(
        &self,
        id: LessonId,
        lang: Language,
    ) -> Result<CompletionPayload, BackendError>;
}
