use rand::seq::SliceRandom;
use std::collections::BTreeSet;
use std::fmt;

use lingo_core::model::{
    Answer, Hearts, Lesson, LessonId, Question, QuestionIndex, Verdict,
};

use super::attempt::{AttemptState, MatchClick, MatchColumn};
use super::progress::LessonProgress;
use crate::error::SessionError;

//
// ─── ACTIONS & OUTCOMES ────────────────────────────────────────────────────────
//

/// Answer as captured by the input surface.
///
/// Matching submits from the session's own confirmed pairs, so it carries no
/// payload here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerInput {
    Text(String),
    Choice(String),
    Matching,
}

/// Where the session is in its display cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonPhase {
    /// Waiting for an answer to the current question.
    Answering,
    /// The current answer has been checked; waiting for continue.
    Checked,
    /// A full round passed with zero misses.
    Complete,
}

/// Result of checking one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub verdict: Verdict,
    /// True when this submission cost a heart (first mistake on this
    /// question instance).
    pub heart_spent: bool,
    pub hearts_left: Hearts,
}

/// Result of advancing past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The next question of the current pool is on display.
    Question,
    /// The round ended with misses; a shuffled review round began.
    NewRound { round: u32 },
    /// The round ended clean; the session is complete.
    Complete,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory lesson session.
///
/// Steps through the current question pool, scoring submissions and spending
/// at most one heart per question instance. Questions missed during a round
/// are re-queued into a shuffled review round; the session completes only
/// when a full pool is traversed without a miss.
pub struct LessonSession {
    lesson_id: LessonId,
    title: String,
    questions: Vec<Question>,
    pool: Vec<QuestionIndex>,
    cursor: usize,
    round: u32,
    missed_this_round: BTreeSet<QuestionIndex>,
    hearts_left: Hearts,
    attempt: AttemptState,
    phase: LessonPhase,
}

impl LessonSession {
    /// Start a session over a lesson's canonical question sequence.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` for a lesson without questions and
    /// `SessionError::OutOfHearts` when the learner has no hearts; a session
    /// cannot begin with zero lives.
    pub fn new(lesson: Lesson, hearts: Hearts) -> Result<Self, SessionError> {
        let lesson_id = lesson.id();
        let title = lesson.meta().title().to_string();
        let questions = lesson.into_questions();

        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        if hearts.is_empty() {
            return Err(SessionError::OutOfHearts);
        }

        let pool: Vec<QuestionIndex> = questions.iter().map(Question::index).collect();
        let attempt = AttemptState::for_question(&questions[0]);

        Ok(Self {
            lesson_id,
            title,
            questions,
            pool,
            cursor: 0,
            round: 0,
            missed_this_round: BTreeSet::new(),
            hearts_left: hearts,
            attempt,
            phase: LessonPhase::Answering,
        })
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// 0 for the initial pass, 1.. for review rounds.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn hearts_left(&self) -> Hearts {
        self.hearts_left
    }

    #[must_use]
    pub fn phase(&self) -> LessonPhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == LessonPhase::Complete
    }

    /// Attempt state of the displayed question (matching selection, guard).
    #[must_use]
    pub fn attempt(&self) -> &AttemptState {
        &self.attempt
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == LessonPhase::Complete {
            return None;
        }
        self.pool
            .get(self.cursor)
            .map(|index| &self.questions[index.value()])
    }

    /// Snapshot for progress bar and footer labels.
    #[must_use]
    pub fn progress(&self) -> LessonProgress {
        LessonProgress {
            round: self.round,
            position: self.cursor,
            pool_size: self.pool.len(),
            hearts_left: self.hearts_left.count(),
            is_complete: self.is_complete(),
        }
    }

    /// Whether the given input is complete enough to check: non-blank text,
    /// a selected option, or every matching pair confirmed.
    #[must_use]
    pub fn submit_ready(&self, input: &AnswerInput) -> bool {
        match input {
            AnswerInput::Text(text) => !text.trim().is_empty(),
            AnswerInput::Choice(option) => !option.is_empty(),
            AnswerInput::Matching => self
                .current_question()
                .is_some_and(|question| {
                    self.attempt.all_pairs_confirmed(question.pair_count())
                }),
        }
    }

    /// Route a click in the matching grid to the attempt state.
    ///
    /// Clicks are ignored after the answer is checked and while the learner
    /// is out of hearts (checking is blocked then anyway).
    pub fn match_click(&mut self, column: MatchColumn, value: &str) -> MatchClick {
        if self.phase != LessonPhase::Answering || self.hearts_left.is_empty() {
            return MatchClick::Ignored;
        }
        self.attempt.click(column, value)
    }

    /// Check the current answer.
    ///
    /// A mistake costs a heart only the first time this question instance is
    /// checked wrong; the miss is recorded for the next review round either
    /// way. A correct answer clears the miss only during review rounds, since
    /// initial-pass successes never entered the set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the session finished and
    /// `SessionError::OutOfHearts` when no hearts remain.
    pub fn submit(&mut self, input: AnswerInput) -> Result<SubmitOutcome, SessionError> {
        if self.phase == LessonPhase::Complete {
            return Err(SessionError::Completed);
        }
        if self.hearts_left.is_empty() {
            return Err(SessionError::OutOfHearts);
        }

        let answer = match input {
            AnswerInput::Text(text) => Answer::Text(text),
            AnswerInput::Choice(option) => Answer::Choice(option),
            AnswerInput::Matching => Answer::Pairs(self.attempt.confirmed_pairs().to_vec()),
        };

        let (verdict, index) = {
            let question = self
                .pool
                .get(self.cursor)
                .map(|index| &self.questions[index.value()])
                .ok_or(SessionError::Completed)?;
            (question.grade(&answer), question.index())
        };

        let mut heart_spent = false;
        if verdict.is_correct() {
            if self.round > 0 {
                self.missed_this_round.remove(&index);
            }
        } else {
            self.missed_this_round.insert(index);
            if !self.attempt.mistake_counted() {
                self.attempt.count_mistake();
                self.hearts_left = self.hearts_left.spent();
                heart_spent = true;
            }
        }

        self.phase = LessonPhase::Checked;

        Ok(SubmitOutcome {
            verdict,
            heart_spent,
            hearts_left: self.hearts_left,
        })
    }

    /// Move past the current question.
    ///
    /// Continuing past an unchecked question records it as missed; this is
    /// how an out-of-hearts learner still converges through review rounds.
    /// At the end of a pool the round is evaluated: a clean round completes
    /// the session, otherwise the missed questions become the next shuffled
    /// review pool.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the session finished.
    pub fn advance(&mut self) -> Result<Progress, SessionError> {
        if self.phase == LessonPhase::Complete {
            return Err(SessionError::Completed);
        }

        if self.phase == LessonPhase::Answering {
            if let Some(index) = self.pool.get(self.cursor) {
                self.missed_this_round.insert(*index);
            }
        }

        self.cursor += 1;

        if self.cursor < self.pool.len() {
            self.phase = LessonPhase::Answering;
            self.reset_attempt();
            return Ok(Progress::Question);
        }

        if self.missed_this_round.is_empty() {
            self.phase = LessonPhase::Complete;
            return Ok(Progress::Complete);
        }

        let mut pool: Vec<QuestionIndex> = self.missed_this_round.iter().copied().collect();
        pool.shuffle(&mut rand::rng());
        self.pool = pool;
        self.missed_this_round.clear();
        self.cursor = 0;
        self.round += 1;
        self.phase = LessonPhase::Answering;
        self.reset_attempt();
        Ok(Progress::NewRound { round: self.round })
    }

    fn reset_attempt(&mut self) {
        if let Some(index) = self.pool.get(self.cursor) {
            self.attempt = AttemptState::for_question(&self.questions[index.value()]);
        }
    }
}

impl fmt::Debug for LessonSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonSession")
            .field("lesson_id", &self.lesson_id)
            .field("round", &self.round)
            .field("cursor", &self.cursor)
            .field("pool_len", &self.pool.len())
            .field("missed", &self.missed_this_round.len())
            .field("hearts_left", &self.hearts_left)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
