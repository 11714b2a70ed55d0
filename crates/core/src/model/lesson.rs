use crate::model::ids::{LessonId, QuestionIndex};
use crate::model::question::{Question, QuestionDraft, QuestionError};

/// Dashboard-level facts about a lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonMeta {
    id: LessonId,
    title: String,
    xp: u32,
}

impl LessonMeta {
    #[must_use]
    pub fn new(id: LessonId, title: impl Into<String>, xp: u32) -> Self {
        Self {
            id,
            title: title.into(),
            xp,
        }
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Experience points awarded for completing this lesson.
    #[must_use]
    pub fn xp(&self) -> u32 {
        self.xp
    }
}

/// A lesson with its validated question content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    meta: LessonMeta,
    questions: Vec<Question>,
}

impl Lesson {
    /// Validate raw question drafts into a lesson, assigning each question its
    /// canonical position in draft order.
    ///
    /// An empty draft list is allowed here; the session engine is the layer
    /// that refuses to start on it.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` hit while validating drafts.
    pub fn from_drafts(
        meta: LessonMeta,
        drafts: Vec<QuestionDraft>,
    ) -> Result<Self, QuestionError> {
        let questions = drafts
            .into_iter()
            .enumerate()
            .map(|(position, draft)| draft.validate(QuestionIndex::new(position)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { meta, questions })
    }

    #[must_use]
    pub fn meta(&self) -> &LessonMeta {
        &self.meta
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.meta.id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_question_indices_in_draft_order() {
        let meta = LessonMeta::new(LessonId::new(1), "Basics", 10);
        let drafts = vec![
            QuestionDraft::Translation {
                question: "one".into(),
                answer: "uno".into(),
                instruction: None,
            },
            QuestionDraft::Translation {
                question: "two".into(),
                answer: "dos".into(),
                instruction: None,
            },
        ];

        let lesson = Lesson::from_drafts(meta, drafts).unwrap();
        let indices: Vec<usize> = lesson
            .questions()
            .iter()
            .map(|q| q.index().value())
            .collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn propagates_draft_validation_errors() {
        let meta = LessonMeta::new(LessonId::new(1), "Basics", 10);
        let drafts = vec![QuestionDraft::Translation {
            question: "  ".into(),
            answer: "uno".into(),
            instruction: None,
        }];

        let err = Lesson::from_drafts(meta, drafts).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }
}
