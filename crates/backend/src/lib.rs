#![forbid(unsafe_code)]

pub mod api;
pub mod http;
pub mod memory;
pub mod prefs;

pub use api::{
    BackendError, CompletionPayload, DashboardPayload, HeartsPayload, LessonPayload,
    LessonSummary, LingoBackend, LoseHeartPayload,
};
pub use http::HttpBackend;
pub use memory::InMemoryBackend;
pub use prefs::{FilePrefs, InMemoryPrefs, Prefs, PrefsError, PrefsStore};
