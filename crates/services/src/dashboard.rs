use std::sync::Arc;

use backend::{LingoBackend, PrefsStore};
use lingo_core::model::{Language, LessonMeta};

use crate::error::DashboardError;

/// One lesson card on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLesson {
    pub meta: LessonMeta,
    pub completed: bool,
}

/// Everything the dashboard view renders for one course language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub language: Language,
    pub lessons: Vec<DashboardLesson>,
    pub hearts: u32,
    pub time_left: i64,
}

/// Loads the dashboard payload and remembers the selected course language.
#[derive(Clone)]
pub struct DashboardService {
    backend: Arc<dyn LingoBackend>,
    prefs: Arc<dyn PrefsStore>,
}

impl DashboardService {
    #[must_use]
    pub fn new(backend: Arc<dyn LingoBackend>, prefs: Arc<dyn PrefsStore>) -> Self {
        Self { backend, prefs }
    }

    /// Last selected course language, defaulting when nothing is persisted.
    #[must_use]
    pub fn selected_language(&self) -> Language {
        match self.prefs.load() {
            Ok(prefs) => prefs.language.unwrap_or_default(),
            Err(err) => {
                log::warn!("failed to load language preference: {err}");
                Language::default()
            }
        }
    }

    /// Persist a course selection. Best-effort: a failed save only costs the
    /// selection across restarts.
    pub fn select_language(&self, language: Language) {
        let mut prefs = match self.prefs.load() {
            Ok(prefs) => prefs,
            Err(err) => {
                log::warn!("failed to load prefs: {err}");
                backend::Prefs::default()
            }
        };
        prefs.language = Some(language);
        if let Err(err) = self.prefs.save(&prefs) {
            log::warn!("failed to save language preference: {err}");
        }
    }

    /// Fetch the dashboard for a course language.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Backend` on fetch failure.
    pub async fn load(&self, language: Language) -> Result<Dashboard, DashboardError> {
        let payload = self.backend.dashboard(language).await?;
        let lessons = payload
            .lessons
            .iter()
            .map(|summary| DashboardLesson {
                meta: summary.meta(),
                completed: payload.completed.contains(&summary.lesson),
            })
            .collect();
        Ok(Dashboard {
            language,
            lessons,
            hearts: payload.hearts,
            time_left: payload.time_left,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
