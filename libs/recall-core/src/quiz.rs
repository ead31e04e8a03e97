//! Typed-answer quiz session state machine.

use serde::Serialize;

use crate::matching::answers_match;
use crate::types::CardContent;

/// One graded answer in a quiz session's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub term: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Where a quiz session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum QuizState {
    /// Answering card `index`, with `score` correct so far.
    InProgress { index: usize, score: usize },
    /// Every card has been answered.
    Completed { score: usize },
}

/// A typed-answer quiz over a snapshot of a set's cards.
///
/// Each submitted answer is graded against the current card's definition
/// (trimmed, case-folded, exact equality) and appended to the log. There is
/// no skip or back transition; the only way through is answering every card
/// in order.
#[derive(Debug, Clone)]
pub struct QuizSession {
    cards: Vec<CardContent>,
    state: QuizState,
    answers: Vec<AnswerRecord>,
}

impl QuizSession {
    /// Start a quiz at the first card. An empty snapshot has nothing to
    /// answer and starts completed with score 0.
    pub fn new(cards: Vec<CardContent>) -> Self {
        let state = if cards.is_empty() {
            QuizState::Completed { score: 0 }
        } else {
            QuizState::InProgress { index: 0, score: 0 }
        };
        Self {
            cards,
            state,
            answers: Vec::new(),
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, QuizState::Completed { .. })
    }

    /// Correct answers so far (final score once completed).
    pub fn score(&self) -> usize {
        match self.state {
            QuizState::InProgress { score, .. } | QuizState::Completed { score } => score,
        }
    }

    pub fn total(&self) -> usize {
        self.cards.len()
    }

    /// The graded answer log, in submission order.
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// The card currently being asked, if the quiz is still in progress.
    pub fn current_card(&self) -> Option<&CardContent> {
        match self.state {
            QuizState::InProgress { index, .. } => self.cards.get(index),
            QuizState::Completed { .. } => None,
        }
    }

    /// Grade `user_answer` against the current card, log it, and advance.
    ///
    /// Answering the last card moves the session to `Completed`. Returns the
    /// logged record, or `None` when the quiz is already over.
    pub fn submit_answer(&mut self, user_answer: &str) -> Option<&AnswerRecord> {
        let QuizState::InProgress { index, score } = self.state else {
            return None;
        };
        let card = &self.cards[index];

        let is_correct = answers_match(user_answer, &card.definition);
        self.answers.push(AnswerRecord {
            term: card.term.clone(),
            user_answer: user_answer.to_string(),
            correct_answer: card.definition.clone(),
            is_correct,
        });

        let score = if is_correct { score + 1 } else { score };
        self.state = if index + 1 < self.cards.len() {
            QuizState::InProgress {
                index: index + 1,
                score,
            }
        } else {
            QuizState::Completed { score }
        };

        self.answers.last()
    }

    /// Throw away the log and score and start over at the first card.
    pub fn restart(&mut self) {
        self.answers.clear();
        self.state = if self.cards.is_empty() {
            QuizState::Completed { score: 0 }
        } else {
            QuizState::InProgress { index: 0, score: 0 }
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn greeting_cards() -> Vec<CardContent> {
        vec![
            CardContent::new("Hola", "Hello"),
            CardContent::new("Adios", "Goodbye"),
        ]
    }

    #[test]
    fn test_normalized_answers_score_full_marks() {
        let mut quiz = QuizSession::new(greeting_cards());

        quiz.submit_answer("hello");
        quiz.submit_answer("Goodbye ");

        assert_eq!(quiz.state(), QuizState::Completed { score: 2 });
        assert!(quiz.answers().iter().all(|a| a.is_correct));
    }

    #[test]
    fn test_wrong_answer_logged_not_scored() {
        let mut quiz = QuizSession::new(greeting_cards());

        let record = quiz.submit_answer("bonjour").unwrap();
        assert!(!record.is_correct);
        assert_eq!(record.term, "Hola");
        assert_eq!(record.correct_answer, "Hello");
        assert_eq!(record.user_answer, "bonjour");

        assert_eq!(quiz.state(), QuizState::InProgress { index: 1, score: 0 });
    }

    #[test]
    fn test_exact_equality_no_partial_credit() {
        let mut quiz = QuizSession::new(vec![CardContent::new("Hola", "Hello there")]);
        quiz.submit_answer("hello");
        assert_eq!(quiz.score(), 0);
    }

    #[test]
    fn test_advances_in_order_and_completes() {
        let mut quiz = QuizSession::new(greeting_cards());
        assert_eq!(quiz.current_card().unwrap().term, "Hola");

        quiz.submit_answer("x");
        assert_eq!(quiz.current_card().unwrap().term, "Adios");

        quiz.submit_answer("goodbye");
        assert!(quiz.is_completed());
        assert!(quiz.current_card().is_none());
        assert_eq!(quiz.score(), 1);
        assert_eq!(quiz.answers().len(), 2);
    }

    #[test]
    fn test_submit_after_completion_is_noop() {
        let mut quiz = QuizSession::new(vec![CardContent::new("uno", "one")]);
        quiz.submit_answer("one");
        assert!(quiz.is_completed());

        assert!(quiz.submit_answer("one").is_none());
        assert_eq!(quiz.answers().len(), 1);
        assert_eq!(quiz.score(), 1);
    }

    #[test]
    fn test_restart_discards_log_and_score() {
        let mut quiz = QuizSession::new(greeting_cards());
        quiz.submit_answer("hello");
        quiz.submit_answer("wrong");
        assert!(quiz.is_completed());

        quiz.restart();
        assert_eq!(quiz.state(), QuizState::InProgress { index: 0, score: 0 });
        assert!(quiz.answers().is_empty());
        assert_eq!(quiz.current_card().unwrap().term, "Hola");
    }

    #[test]
    fn test_empty_snapshot_starts_completed() {
        let mut quiz = QuizSession::new(Vec::new());
        assert_eq!(quiz.state(), QuizState::Completed { score: 0 });
        assert!(quiz.submit_answer("anything").is_none());

        quiz.restart();
        assert!(quiz.is_completed());
    }
}
