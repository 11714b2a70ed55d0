use rand::seq::SliceRandom;

use lingo_core::model::{MatchPair, Question, QuestionKind};

/// Which matching column a click landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchColumn {
    Left,
    Right,
}

/// What one click in the matching grid did, for the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchClick {
    /// A left item became the pending selection.
    Selected,
    /// The pending left selection was toggled off.
    Deselected,
    /// A right click confirmed a pair with the pending left selection.
    Paired,
    /// An already-paired item was clicked; its pair was dissolved.
    Unpaired,
    /// A right click with no pending left selection.
    Ignored,
}

/// Per-displayed-question attempt state.
///
/// Reset on every question change: the deduction guard covers one question
/// *instance*, and a matching question re-shuffles its right column each time
/// it is displayed so memorized positions do not trivially solve it on a
/// review round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptState {
    mistake_counted: bool,
    selected_left: Option<String>,
    confirmed: Vec<MatchPair>,
    right_order: Vec<String>,
}

impl AttemptState {
    /// Fresh attempt state for a newly displayed question.
    #[must_use]
    pub fn for_question(question: &Question) -> Self {
        let mut right_order = match question.kind() {
            QuestionKind::Matching { pairs, .. } => {
                pairs.iter().map(|pair| pair.right.clone()).collect()
            }
            _ => Vec::new(),
        };
        right_order.shuffle(&mut rand::rng());

        Self {
            mistake_counted: false,
            selected_left: None,
            confirmed: Vec::new(),
            right_order,
        }
    }

    /// True once this question instance has already cost a heart.
    #[must_use]
    pub fn mistake_counted(&self) -> bool {
        self.mistake_counted
    }

    pub(crate) fn count_mistake(&mut self) {
        self.mistake_counted = true;
    }

    /// Right-column display order for a matching question, shuffled per
    /// display. Empty for other question types.
    #[must_use]
    pub fn right_column(&self) -> &[String] {
        &self.right_order
    }

    /// The left term awaiting a right-side partner, if any.
    #[must_use]
    pub fn selected_left(&self) -> Option<&str> {
        self.selected_left.as_deref()
    }

    /// Pairs the learner has confirmed so far.
    #[must_use]
    pub fn confirmed_pairs(&self) -> &[MatchPair] {
        &self.confirmed
    }

    #[must_use]
    pub fn is_left_paired(&self, left: &str) -> bool {
        self.confirmed.iter().any(|pair| pair.left == left)
    }

    #[must_use]
    pub fn is_right_paired(&self, right: &str) -> bool {
        self.confirmed.iter().any(|pair| pair.right == right)
    }

    /// Submit becomes available exactly when every pair is confirmed.
    #[must_use]
    pub fn all_pairs_confirmed(&self, pair_count: usize) -> bool {
        pair_count > 0 && self.confirmed.len() == pair_count
    }

    /// Two-click selection protocol.
    ///
    /// Clicking an unpaired left item selects it, replacing any previous
    /// selection; clicking it again deselects. Clicking a right item while a
    /// left item is selected confirms that pair. Clicking an already-paired
    /// item on either side dissolves the pair and clears the selection.
    pub fn click(&mut self, column: MatchColumn, value: &str) -> MatchClick {
        let paired = match column {
            MatchColumn::Left => self.is_left_paired(value),
            MatchColumn::Right => self.is_right_paired(value),
        };
        if paired {
            self.confirmed.retain(|pair| match column {
                MatchColumn::Left => pair.left != value,
                MatchColumn::Right => pair.right != value,
            });
            self.selected_left = None;
            return MatchClick::Unpaired;
        }

        match column {
            MatchColumn::Left => {
                if self.selected_left.as_deref() == Some(value) {
                    self.selected_left = None;
                    MatchClick::Deselected
                } else {
                    self.selected_left = Some(value.to_string());
                    MatchClick::Selected
                }
            }
            MatchColumn::Right => match self.selected_left.take() {
                Some(left) => {
                    self.confirmed.push(MatchPair::new(left, value));
                    MatchClick::Paired
                }
                None => MatchClick::Ignored,
            },
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
