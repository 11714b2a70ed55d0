mod hearts;
mod ids;
mod language;
mod lesson;
mod question;

pub use hearts::{Hearts, MAX_HEARTS};
pub use ids::{LessonId, ParseIdError, QuestionIndex};
pub use language::{Language, ParseLanguageError};
pub use lesson::{Lesson, LessonMeta};
pub use question::{
    Answer, BLANK_MARKER, BlankPrompt, MatchPair, Question, QuestionDraft, QuestionError,
    QuestionKind, Verdict, normalize_answer,
};
