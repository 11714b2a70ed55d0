use backend::BackendError;
use lingo_core::model::{Language, LessonId, QuestionKind, Verdict};
use services::{
    AnswerInput, HeartsService, LessonFlowService, LessonPhase, LessonProgress, LessonSession,
    MatchClick, MatchColumn, Progress, SessionError,
};

use crate::views::ViewError;

//
// ─── RENDER SNAPSHOTS ──────────────────────────────────────────────────────────
//

/// Feedback banner under the input surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub message: String,
    pub correct: bool,
}

/// One button in the matching grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchItemVm {
    pub label: String,
    pub paired: bool,
    pub selected: bool,
}

/// The type-specific input surface of the displayed question.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceBody {
    /// Free-text answer (translation, sentence transformation).
    Text { prompt: String },
    /// Radio-group answer.
    Choice { prompt: String, options: Vec<String> },
    /// Inline blank-splicing input.
    Blank { prefix: String, suffix: String },
    /// Two-column matching grid; left keeps canonical order, right is
    /// shuffled per display.
    Matching {
        prompt: String,
        left: Vec<MatchItemVm>,
        right: Vec<MatchItemVm>,
    },
}

/// Render-ready snapshot of the displayed question.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionSurface {
    pub instruction: String,
    pub body: SurfaceBody,
}

/// What a check click did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The answer was scored; when `persist_deduction` is set the caller
    /// must run the fire-and-forget deduction request in the background.
    Checked { persist_deduction: bool },
    /// Checking is blocked (out of hearts).
    Blocked,
}

//
// ─── LESSON VM ─────────────────────────────────────────────────────────────────
//

/// Bridges lesson intents from the view into the session state machine and
/// the shared heart pool.
pub struct LessonVm {
    session: LessonSession,
    feedback: Option<FeedbackVm>,
}

impl LessonVm {
    #[must_use]
    pub fn new(session: LessonSession) -> Self {
        Self {
            session,
            feedback: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &LessonSession {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> LessonPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.session.title()
    }

    #[must_use]
    pub fn hearts_count(&self) -> u8 {
        self.session.hearts_left().count()
    }

    #[must_use]
    pub fn progress(&self) -> LessonProgress {
        self.session.progress()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&FeedbackVm> {
        self.feedback.as_ref()
    }

    /// The check button is live while answering with hearts left and a
    /// fully-specified answer.
    #[must_use]
    pub fn can_check(&self, input: &AnswerInput) -> bool {
        self.phase() == LessonPhase::Answering
            && !self.session.hearts_left().is_empty()
            && self.session.submit_ready(input)
    }

    /// Render-ready snapshot of the current question and its input surface.
    #[must_use]
    pub fn surface(&self) -> Option<QuestionSurface> {
        let question = self.session.current_question()?;
        let attempt = self.session.attempt();

        let body = match question.kind() {
            QuestionKind::Translation { prompt, .. }
            | QuestionKind::SentenceTransformation { prompt, .. } => SurfaceBody::Text {
                prompt: prompt.clone(),
            },
            QuestionKind::MultipleChoice {
                prompt, options, ..
            } => SurfaceBody::Choice {
                prompt: prompt.clone(),
                options: options.clone(),
            },
            QuestionKind::FillInBlank { prompt, .. } => SurfaceBody::Blank {
                prefix: prompt.prefix().to_string(),
                suffix: prompt.suffix().to_string(),
            },
            QuestionKind::Matching { prompt, pairs } => SurfaceBody::Matching {
                prompt: prompt.clone(),
                left: pairs
                    .iter()
                    .map(|pair| MatchItemVm {
                        label: pair.left.clone(),
                        paired: attempt.is_left_paired(&pair.left),
                        selected: attempt.selected_left() == Some(pair.left.as_str()),
                    })
                    .collect(),
                right: attempt
                    .right_column()
                    .iter()
                    .map(|label| MatchItemVm {
                        label: label.clone(),
                        paired: attempt.is_right_paired(label),
                        selected: false,
                    })
                    .collect(),
            },
        };

        Some(QuestionSurface {
            instruction: question.instruction().to_string(),
            body,
        })
    }

    /// Route a matching-grid click into the session.
    pub fn match_click(&mut self, column: MatchColumn, value: &str) -> MatchClick {
        self.session.match_click(column, value)
    }

    /// Check the current answer, spending a heart optimistically on the
    /// first mistake of this question instance. The local counter updates
    /// here; persistence is handed back to the caller to spawn.
    pub fn check(&mut self, hearts: &HeartsService, input: AnswerInput) -> CheckOutcome {
        match self.session.submit(input) {
            Ok(outcome) => {
                self.feedback = Some(self.feedback_for(outcome.verdict, outcome.hearts_left.is_empty()));
                let mut persist_deduction = false;
                if outcome.heart_spent {
                    persist_deduction = hearts.deduct_local().is_some();
                }
                CheckOutcome::Checked { persist_deduction }
            }
            Err(SessionError::OutOfHearts) => {
                self.feedback = Some(FeedbackVm {
                    message: "You are out of hearts!".to_string(),
                    correct: false,
                });
                CheckOutcome::Blocked
            }
            Err(_) => CheckOutcome::Blocked,
        }
    }

    /// Advance past the current question, clearing the feedback banner.
    pub fn advance(&mut self) -> Progress {
        self.feedback = None;
        self.session.advance().unwrap_or(Progress::Complete)
    }

    fn feedback_for(&self, verdict: Verdict, out_of_hearts: bool) -> FeedbackVm {
        let correct = verdict.is_correct();
        let message = match verdict {
            Verdict::Pairs { .. } if correct => "All pairs matched correctly!".to_string(),
            Verdict::Exact { .. } if correct => "Correct!".to_string(),
            Verdict::Pairs { matched, total } => {
                format!("Some pairs were incorrect. ({matched}/{total} correct)")
            }
            Verdict::Exact { .. } => {
                let answer = self
                    .session
                    .current_question()
                    .map(lingo_core::model::Question::answer_display)
                    .unwrap_or_default();
                format!("Incorrect. Correct: {answer}")
            }
        };

        if !correct && out_of_hearts {
            return FeedbackVm {
                message: "Oh no, you're out of hearts!".to_string(),
                correct: false,
            };
        }
        FeedbackVm { message, correct }
    }
}

/// # Errors
///
/// Maps session-start failures onto terminal view errors: `NoQuestions`,
/// `OutOfHearts`, `LessonNotFound`, or `Unknown` for transport failures.
pub async fn start_lesson(
    flow: &LessonFlowService,
    id: LessonId,
    lang: Language,
) -> Result<LessonVm, ViewError> {
    match flow.start(id, lang).await {
        Ok(session) => Ok(LessonVm::new(session)),
        Err(SessionError::Empty) => Err(ViewError::NoQuestions),
        Err(SessionError::OutOfHearts) => Err(ViewError::OutOfHearts),
        Err(SessionError::Backend(BackendError::LessonNotFound(_))) => {
            Err(ViewError::LessonNotFound)
        }
        Err(_) => Err(ViewError::Unknown),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
