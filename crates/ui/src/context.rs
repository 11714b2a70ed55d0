use std::sync::Arc;

use services::{DashboardService, HeartsService, LessonFlowService};

/// What the composition root must provide to the UI.
pub trait UiApp: Send + Sync {
    fn dashboard_service(&self) -> Arc<DashboardService>;
    fn lesson_flow(&self) -> Arc<LessonFlowService>;
    fn hearts(&self) -> Arc<HeartsService>;
}

#[derive(Clone)]
pub struct AppContext {
    dashboard_service: Arc<DashboardService>,
    lesson_flow: Arc<LessonFlowService>,
    hearts: Arc<HeartsService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            dashboard_service: app.dashboard_service(),
            lesson_flow: app.lesson_flow(),
            hearts: app.hearts(),
        }
    }

    #[must_use]
    pub fn dashboard_service(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard_service)
    }

    #[must_use]
    pub fn lesson_flow(&self) -> Arc<LessonFlowService> {
        Arc::clone(&self.lesson_flow)
    }

    /// The process-wide heart pool; shared by the dashboard countdown and the
    /// in-lesson deductions.
    #[must_use]
    pub fn hearts(&self) -> Arc<HeartsService> {
        Arc::clone(&self.hearts)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
