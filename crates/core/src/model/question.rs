use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionIndex;

/// Token that marks the blank in a fill-in-the-blank prompt.
pub const BLANK_MARKER: &str = "____";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question answer cannot be empty")]
    EmptyAnswer,

    #[error("fill-in-blank prompt must contain exactly one {BLANK_MARKER:?} marker, found {found}")]
    BlankMarkerCount { found: usize },

    #[error("multiple choice needs at least two options, got {got}")]
    TooFewOptions { got: usize },

    #[error("multiple choice answer {answer:?} is not among the options")]
    AnswerNotInOptions { answer: String },

    #[error("matching question needs at least one pair")]
    NoPairs,

    #[error("matching pair sides cannot be empty")]
    EmptyPairSide,

    #[error("matching left term {left:?} appears more than once")]
    DuplicateLeftTerm { left: String },
}

//
// ─── WIRE SHAPE ────────────────────────────────────────────────────────────────
//

/// One left/right pairing of a matching question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

impl MatchPair {
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Raw question payload as supplied by the lesson content collaborator.
///
/// An unknown `type` tag fails deserialization, which is terminal for the
/// session per the error taxonomy: the lesson never starts on content the
/// client cannot score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionDraft {
    Translation {
        question: String,
        answer: String,
        #[serde(default)]
        instruction: Option<String>,
    },
    SentenceTransformation {
        question: String,
        answer: String,
        #[serde(default)]
        instruction: Option<String>,
    },
    MultipleChoice {
        question: String,
        options: Vec<String>,
        answer: String,
        #[serde(default)]
        instruction: Option<String>,
    },
    FillInBlank {
        question: String,
        answer: String,
        #[serde(default)]
        instruction: Option<String>,
    },
    Matching {
        question: String,
        pairs: Vec<MatchPair>,
        #[serde(default)]
        instruction: Option<String>,
    },
}

impl QuestionDraft {
    /// Validate the draft into a scoreable `Question` at the given canonical
    /// position.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for empty prompts/answers, a fill-in-blank
    /// prompt without exactly one blank marker, a multiple-choice answer
    /// missing from its options, or degenerate matching pair sets.
    pub fn validate(self, index: QuestionIndex) -> Result<Question, QuestionError> {
        let (instruction, kind) = match self {
            QuestionDraft::Translation {
                question,
                answer,
                instruction,
            } => (
                instruction,
                QuestionKind::Translation {
                    prompt: require_text(question, QuestionError::EmptyPrompt)?,
                    answer: require_text(answer, QuestionError::EmptyAnswer)?,
                },
            ),
            QuestionDraft::SentenceTransformation {
                question,
                answer,
                instruction,
            } => (
                instruction,
                QuestionKind::SentenceTransformation {
                    prompt: require_text(question, QuestionError::EmptyPrompt)?,
                    answer: require_text(answer, QuestionError::EmptyAnswer)?,
                },
            ),
            QuestionDraft::MultipleChoice {
                question,
                options,
                answer,
                instruction,
            } => {
                let prompt = require_text(question, QuestionError::EmptyPrompt)?;
                let answer = require_text(answer, QuestionError::EmptyAnswer)?;
                if options.len() < 2 {
                    return Err(QuestionError::TooFewOptions { got: options.len() });
                }
                let key = normalize_answer(&answer);
                if !options.iter().any(|opt| normalize_answer(opt) == key) {
                    return Err(QuestionError::AnswerNotInOptions { answer });
                }
                (
                    instruction,
                    QuestionKind::MultipleChoice {
                        prompt,
                        options,
                        answer,
                    },
                )
            }
            QuestionDraft::FillInBlank {
                question,
                answer,
                instruction,
            } => (
                instruction,
                QuestionKind::FillInBlank {
                    prompt: BlankPrompt::parse(&question)?,
                    answer: require_text(answer, QuestionError::EmptyAnswer)?,
                },
            ),
            QuestionDraft::Matching {
                question,
                pairs,
                instruction,
            } => {
                let prompt = require_text(question, QuestionError::EmptyPrompt)?;
                if pairs.is_empty() {
                    return Err(QuestionError::NoPairs);
                }
                for pair in &pairs {
                    if pair.left.trim().is_empty() || pair.right.trim().is_empty() {
                        return Err(QuestionError::EmptyPairSide);
                    }
                }
                for (i, pair) in pairs.iter().enumerate() {
                    if pairs[..i].iter().any(|prev| prev.left == pair.left) {
                        return Err(QuestionError::DuplicateLeftTerm {
                            left: pair.left.clone(),
                        });
                    }
                }
                (instruction, QuestionKind::Matching { prompt, pairs })
            }
        };

        let instruction = instruction.filter(|text| !text.trim().is_empty());
        Ok(Question {
            index,
            instruction,
            kind,
        })
    }
}

fn require_text(raw: String, err: QuestionError) -> Result<String, QuestionError> {
    if raw.trim().is_empty() {
        return Err(err);
    }
    Ok(raw)
}

//
// ─── VALIDATED MODEL ───────────────────────────────────────────────────────────
//

/// A fill-in-blank prompt split at its single blank marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankPrompt {
    prefix: String,
    suffix: String,
}

impl BlankPrompt {
    fn parse(raw: &str) -> Result<Self, QuestionError> {
        let parts: Vec<&str> = raw.split(BLANK_MARKER).collect();
        if parts.len() != 2 {
            return Err(QuestionError::BlankMarkerCount {
                found: parts.len() - 1,
            });
        }
        if parts[0].trim().is_empty() && parts[1].trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        Ok(Self {
            prefix: parts[0].to_string(),
            suffix: parts[1].to_string(),
        })
    }

    /// Text before the blank.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Text after the blank.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

/// The closed set of question types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    Translation {
        prompt: String,
        answer: String,
    },
    SentenceTransformation {
        prompt: String,
        answer: String,
    },
    MultipleChoice {
        prompt: String,
        options: Vec<String>,
        answer: String,
    },
    FillInBlank {
        prompt: BlankPrompt,
        answer: String,
    },
    Matching {
        prompt: String,
        pairs: Vec<MatchPair>,
    },
}

/// A validated lesson question at a stable canonical position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    index: QuestionIndex,
    instruction: Option<String>,
    kind: QuestionKind,
}

impl Question {
    #[must_use]
    pub fn index(&self) -> QuestionIndex {
        self.index
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Instruction line shown above the prompt; falls back to a per-type
    /// default when the content author did not supply one.
    #[must_use]
    pub fn instruction(&self) -> &str {
        self.instruction
            .as_deref()
            .unwrap_or_else(|| default_instruction(&self.kind))
    }

    /// The canonical answer rendered for "Incorrect. Correct: ..." feedback.
    #[must_use]
    pub fn answer_display(&self) -> String {
        match &self.kind {
            QuestionKind::Translation { answer, .. }
            | QuestionKind::SentenceTransformation { answer, .. }
            | QuestionKind::MultipleChoice { answer, .. }
            | QuestionKind::FillInBlank { answer, .. } => answer.clone(),
            QuestionKind::Matching { pairs, .. } => pairs
                .iter()
                .map(|pair| format!("{} \u{2192} {}", pair.left, pair.right))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Number of pairs for a matching question, 0 otherwise.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        match &self.kind {
            QuestionKind::Matching { pairs, .. } => pairs.len(),
            _ => 0,
        }
    }

    /// Score an answer against this question.
    ///
    /// String comparison is case-insensitive and whitespace-trimmed; matching
    /// is graded pair by pair. An answer of the wrong shape never passes.
    #[must_use]
    pub fn grade(&self, answer: &Answer) -> Verdict {
        match (&self.kind, answer) {
            (
                QuestionKind::Translation { answer: key, .. }
                | QuestionKind::SentenceTransformation { answer: key, .. }
                | QuestionKind::FillInBlank { answer: key, .. },
                Answer::Text(text),
            ) => Verdict::Exact {
                correct: normalize_answer(text) == normalize_answer(key),
            },
            (QuestionKind::MultipleChoice { answer: key, .. }, Answer::Choice(option)) => {
                Verdict::Exact {
                    correct: normalize_answer(option) == normalize_answer(key),
                }
            }
            (QuestionKind::Matching { pairs, .. }, Answer::Pairs(confirmed)) => {
                let matched = pairs
                    .iter()
                    .filter(|canonical| {
                        confirmed.iter().any(|user| {
                            user.left == canonical.left
                                && normalize_answer(&user.right)
                                    == normalize_answer(&canonical.right)
                        })
                    })
                    .count();
                Verdict::Pairs {
                    matched,
                    total: pairs.len(),
                }
            }
            (QuestionKind::Matching { pairs, .. }, _) => Verdict::Pairs {
                matched: 0,
                total: pairs.len(),
            },
            _ => Verdict::Exact { correct: false },
        }
    }
}

fn default_instruction(kind: &QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Translation { .. } => "Translate this word/phrase:",
        QuestionKind::SentenceTransformation { .. } => "Translate this sentence:",
        QuestionKind::MultipleChoice { .. } => "Select the correct option:",
        QuestionKind::FillInBlank { .. } => "Fill in the blank:",
        QuestionKind::Matching { .. } => "Match the pairs:",
    }
}

//
// ─── SCORING ───────────────────────────────────────────────────────────────────
//

/// A fully specified answer for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Choice(String),
    Pairs(Vec<MatchPair>),
}

/// Outcome of scoring one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Exact { correct: bool },
    Pairs { matched: usize, total: usize },
}

impl Verdict {
    /// Partial pair credit is feedback only; a pass needs every pair right.
    #[must_use]
    pub fn is_correct(self) -> bool {
        match self {
            Verdict::Exact { correct } => correct,
            Verdict::Pairs { matched, total } => matched == total,
        }
    }
}

/// Trim and lowercase an answer for comparison.
#[must_use]
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn translation(answer: &str) -> Question {
        QuestionDraft::Translation {
            question: "the dog".into(),
            answer: answer.into(),
            instruction: None,
        }
        .validate(QuestionIndex::new(0))
        .unwrap()
    }

    fn matching(pairs: &[(&str, &str)]) -> Question {
        QuestionDraft::Matching {
            question: "Match the animals".into(),
            pairs: pairs
                .iter()
                .map(|(left, right)| MatchPair::new(*left, *right))
                .collect(),
            instruction: None,
        }
        .validate(QuestionIndex::new(0))
        .unwrap()
    }

    #[test]
    fn text_answer_is_trimmed_and_lowercased() {
        let question = translation("el perro");
        let verdict = question.grade(&Answer::Text("  El Perro ".into()));
        assert!(verdict.is_correct());

        let verdict = question.grade(&Answer::Text("el gato".into()));
        assert!(!verdict.is_correct());
    }

    #[test]
    fn multiple_choice_matches_selected_option() {
        let question = QuestionDraft::MultipleChoice {
            question: "dog?".into(),
            options: vec!["el perro".into(), "el gato".into()],
            answer: "el perro".into(),
            instruction: None,
        }
        .validate(QuestionIndex::new(2))
        .unwrap();

        assert!(question.grade(&Answer::Choice("El Perro".into())).is_correct());
        assert!(!question.grade(&Answer::Choice("el gato".into())).is_correct());
    }

    #[test]
    fn multiple_choice_answer_must_be_an_option() {
        let err = QuestionDraft::MultipleChoice {
            question: "dog?".into(),
            options: vec!["a".into(), "b".into()],
            answer: "c".into(),
            instruction: None,
        }
        .validate(QuestionIndex::new(0))
        .unwrap_err();
        assert!(matches!(err, QuestionError::AnswerNotInOptions { .. }));
    }

    #[test]
    fn fill_in_blank_splits_on_single_marker() {
        let question = QuestionDraft::FillInBlank {
            question: "Yo ____ un libro".into(),
            answer: "leo".into(),
            instruction: None,
        }
        .validate(QuestionIndex::new(1))
        .unwrap();

        let QuestionKind::FillInBlank { prompt, .. } = question.kind() else {
            panic!("expected fill-in-blank kind");
        };
        assert_eq!(prompt.prefix(), "Yo ");
        assert_eq!(prompt.suffix(), " un libro");
        assert!(question.grade(&Answer::Text(" LEO".into())).is_correct());
    }

    #[test]
    fn fill_in_blank_rejects_wrong_marker_count() {
        for (raw, found) in [("no marker here", 0), ("a ____ b ____ c", 2)] {
            let err = QuestionDraft::FillInBlank {
                question: raw.into(),
                answer: "x".into(),
                instruction: None,
            }
            .validate(QuestionIndex::new(0))
            .unwrap_err();
            assert_eq!(err, QuestionError::BlankMarkerCount { found });
        }
    }

    #[test]
    fn matching_counts_partial_credit_but_requires_full_match() {
        let question = matching(&[("A", "1"), ("B", "3")]);

        let verdict = question.grade(&Answer::Pairs(vec![
            MatchPair::new("A", "1"),
            MatchPair::new("B", "2"),
        ]));
        assert_eq!(verdict, Verdict::Pairs { matched: 1, total: 2 });
        assert!(!verdict.is_correct());

        let verdict = question.grade(&Answer::Pairs(vec![
            MatchPair::new("A", "1"),
            MatchPair::new("B", "3"),
        ]));
        assert!(verdict.is_correct());
    }

    #[test]
    fn matching_right_side_comparison_is_case_insensitive() {
        let question = matching(&[("dog", "perro")]);
        let verdict = question.grade(&Answer::Pairs(vec![MatchPair::new("dog", " PERRO ")]));
        assert!(verdict.is_correct());
    }

    #[test]
    fn matching_rejects_duplicate_left_terms() {
        let err = QuestionDraft::Matching {
            question: "m".into(),
            pairs: vec![MatchPair::new("A", "1"), MatchPair::new("A", "2")],
            instruction: None,
        }
        .validate(QuestionIndex::new(0))
        .unwrap_err();
        assert!(matches!(err, QuestionError::DuplicateLeftTerm { .. }));
    }

    #[test]
    fn mismatched_answer_shape_never_passes() {
        let question = translation("hola");
        assert!(!question.grade(&Answer::Choice("hola".into())).is_correct());

        let question = matching(&[("A", "1")]);
        assert!(!question.grade(&Answer::Text("1".into())).is_correct());
    }

    #[test]
    fn instruction_falls_back_to_type_default() {
        let question = translation("x");
        assert_eq!(question.instruction(), "Translate this word/phrase:");

        let question = QuestionDraft::Translation {
            question: "q".into(),
            answer: "a".into(),
            instruction: Some("Say it in Spanish:".into()),
        }
        .validate(QuestionIndex::new(0))
        .unwrap();
        assert_eq!(question.instruction(), "Say it in Spanish:");
    }

    #[test]
    fn unknown_type_tag_fails_deserialization() {
        let raw = r#"{"type":"word_order","question":"q","answer":"a"}"#;
        let result: Result<QuestionDraft, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }

    #[test]
    fn matching_answer_display_lists_pairs() {
        let question = matching(&[("A", "1"), ("B", "2")]);
        assert_eq!(question.answer_display(), "A \u{2192} 1, B \u{2192} 2");
    }
}
