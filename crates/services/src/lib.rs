#![forbid(unsafe_code)]

pub mod dashboard;
pub mod error;
pub mod hearts;
pub mod sessions;

pub use lingo_core::Clock;

pub use dashboard::{Dashboard, DashboardLesson, DashboardService};
pub use error::{DashboardError, SessionError};
pub use hearts::{HeartsService, HeartsSnapshot, HeartsTick};
pub use sessions::{
    AnswerInput, AttemptState, LessonFlowService, LessonPhase, LessonProgress, LessonSession,
    MatchClick, MatchColumn, Progress, SubmitOutcome,
};
