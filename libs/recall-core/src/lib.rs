//! Core flashcard study library shared by the backend and any client frontend.
//!
//! Provides:
//! - Shared card content type
//! - Answer normalization and matching for typed-answer quizzes
//! - The two study-mode state machines (flip-through practice, typed quiz)
//!
//! Everything here is pure and synchronous; a client loads a set's cards
//! once, snapshots their order, and drives a session entirely in memory.

pub mod matching;
pub mod practice;
pub mod quiz;
pub mod types;

pub use matching::{answers_match, normalize_answer};
pub use practice::{PracticeSession, PracticeState};
pub use quiz::{AnswerRecord, QuizSession, QuizState};
pub use types::CardContent;
