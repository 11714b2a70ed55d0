mod dashboard_vm;
mod lesson_vm;
mod time_fmt;

pub use dashboard_vm::{DashboardLessonVm, hearts_label, map_dashboard_lessons};
pub use lesson_vm::{
    CheckOutcome, FeedbackVm, LessonVm, MatchItemVm, QuestionSurface, SurfaceBody, start_lesson,
};
pub use time_fmt::format_countdown;
