use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use lingo_core::model::{Language, Lesson, LessonId, MAX_HEARTS};

use crate::api::{
    BackendError, CompletionPayload, DashboardPayload, HeartsPayload, LessonPayload,
    LessonSummary, LingoBackend, LoseHeartPayload,
};

/// Regeneration interval handed out when a deduction starts a countdown.
pub const DEFAULT_REGEN_SECS: i64 = 900;

#[derive(Debug)]
struct ServerState {
    hearts: u32,
    time_left: i64,
    completed: BTreeSet<u32>,
    lose_heart_calls: u32,
}

/// In-memory `LingoBackend` for tests and the offline demo.
///
/// Holds a course-keyed lesson table and a single learner's heart state. The
/// regeneration countdown is bookkept as a static `time_left` snapshot; tests
/// that need it to move drive it through `set_hearts`.
#[derive(Clone)]
pub struct InMemoryBackend {
    lessons: Arc<HashMap<String, Vec<LessonPayload>>>,
    state: Arc<Mutex<ServerState>>,
}

impl InMemoryBackend {
    /// An empty backend with a full heart pool.
    #[must_use]
    pub fn new(lessons: impl IntoIterator<Item = (Language, LessonPayload)>) -> Self {
        let mut table: HashMap<String, Vec<LessonPayload>> = HashMap::new();
        for (lang, payload) in lessons {
            table.entry(lang.course_key()).or_default().push(payload);
        }
        Self {
            lessons: Arc::new(table),
            state: Arc::new(Mutex::new(ServerState {
                hearts: u32::from(MAX_HEARTS),
                time_left: 0,
                completed: BTreeSet::new(),
                lose_heart_calls: 0,
            })),
        }
    }

    /// Override the learner's heart state.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::State` if the state lock is poisoned.
    pub fn set_hearts(&self, hearts: u32, time_left: i64) -> Result<(), BackendError> {
        let mut state = self.lock_state()?;
        state.hearts = hearts;
        state.time_left = time_left;
        Ok(())
    }

    /// Number of `lose_heart` calls observed, for asserting fire-and-forget
    /// behavior in tests.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::State` if the state lock is poisoned.
    pub fn lose_heart_calls(&self) -> Result<u32, BackendError> {
        Ok(self.lock_state()?.lose_heart_calls)
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, ServerState>, BackendError> {
        self.state
            .lock()
            .map_err(|e| BackendError::State(e.to_string()))
    }

    fn course(&self, lang: Language) -> &[LessonPayload] {
        self.lessons
            .get(&lang.course_key())
            .map_or(&[], Vec::as_slice)
    }

    fn find(&self, id: LessonId, lang: Language) -> Result<&LessonPayload, BackendError> {
        self.course(lang)
            .iter()
            .find(|payload| payload.lesson == id.value())
            .ok_or(BackendError::LessonNotFound(id))
    }
}

#[async_trait]
impl LingoBackend for InMemoryBackend {
    async fn dashboard(&self, lang: Language) -> Result<DashboardPayload, BackendError> {
        let state = self.lock_state()?;
        Ok(DashboardPayload {
            lessons: self
                .course(lang)
                .iter()
                .map(|payload| LessonSummary {
                    lesson: payload.lesson,
                    title: payload.title.clone(),
                    xp: payload.xp,
                })
                .collect(),
            completed: state.completed.iter().copied().collect(),
            hearts: state.hearts,
            time_left: state.time_left,
        })
    }

    async fn hearts(&self) -> Result<HeartsPayload, BackendError> {
        let state = self.lock_state()?;
        Ok(HeartsPayload {
            hearts: state.hearts,
            time_left: state.time_left,
        })
    }

    async fn lose_heart(&self) -> Result<LoseHeartPayload, BackendError> {
        let mut state = self.lock_state()?;
        state.lose_heart_calls += 1;
        let success = state.hearts > 0;
        if success {
            state.hearts -= 1;
        }
        if state.hearts < u32::from(MAX_HEARTS) && state.time_left == 0 {
            state.time_left = DEFAULT_REGEN_SECS;
        }
        Ok(LoseHeartPayload {
            success,
            hearts: state.hearts,
        })
    }

    async fn lesson(&self, id: LessonId, lang: Language) -> Result<Lesson, BackendError> {
        Ok(self.find(id, lang)?.clone().into_lesson()?)
    }

    async fn complete_lesson(
        &self,
        id: LessonId,
        lang: Language,
    ) -> Result<CompletionPayload, BackendError> {
        let xp_earned = self.find(id, lang)?.xp;
        let mut state = self.lock_state()?;
        state.completed.insert(id.value());
        Ok(CompletionPayload {
            xp_earned,
            completed_lessons: state.completed.iter().copied().collect(),
        })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
