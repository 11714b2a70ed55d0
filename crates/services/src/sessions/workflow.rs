use std::sync::Arc;

use backend::{CompletionPayload, LingoBackend};
use lingo_core::model::{Language, LessonId};

use super::session::LessonSession;
use crate::error::SessionError;
use crate::hearts::HeartsService;

/// Orchestrates the I/O edges of a lesson session: fetching content to start,
/// and reporting completion.
///
/// The state machine itself never waits on the network; the one call that is
/// allowed to fail visibly is completion, which the caller may retry with the
/// session state intact.
#[derive(Clone)]
pub struct LessonFlowService {
    backend: Arc<dyn LingoBackend>,
    hearts: Arc<HeartsService>,
}

impl LessonFlowService {
    #[must_use]
    pub fn new(backend: Arc<dyn LingoBackend>, hearts: Arc<HeartsService>) -> Self {
        Self { backend, hearts }
    }

    /// The shared heart pool this flow deducts from.
    #[must_use]
    pub fn hearts(&self) -> Arc<HeartsService> {
        Arc::clone(&self.hearts)
    }

    /// Fetch a lesson's content and start a session over it with the current
    /// heart pool.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Backend` for fetch/content failures, and the
    /// session constructor's `Empty`/`OutOfHearts` fail-fast errors.
    pub async fn start(
        &self,
        id: LessonId,
        lang: Language,
    ) -> Result<LessonSession, SessionError> {
        let lesson = self.backend.lesson(id, lang).await?;
        let hearts = self.hearts.snapshot().hearts;
        LessonSession::new(lesson, hearts)
    }

    /// Report a finished session and collect the experience reward.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` if the session has questions left,
    /// or `SessionError::Backend` for a failed report. Retryable: the session
    /// state is untouched.
    pub async fn complete(
        &self,
        session: &LessonSession,
        lang: Language,
    ) -> Result<CompletionPayload, SessionError> {
        if !session.is_complete() {
            return Err(SessionError::NotFinished);
        }
        let payload = self
            .backend
            .complete_lesson(session.lesson_id(), lang)
            .await?;
        log::info!(
            "lesson {} complete, {} xp earned",
            session.lesson_id(),
            payload.xp_earned
        );
        Ok(payload)
    }
}
