mod attempt;
mod progress;
mod session;
mod workflow;

// Public API of the lesson session subsystem.
pub use crate::error::SessionError;
pub use attempt::{AttemptState, MatchClick, MatchColumn};
pub use progress::LessonProgress;
pub use session::{AnswerInput, LessonPhase, LessonSession, Progress, SubmitOutcome};
pub use workflow::LessonFlowService;
