//! Public types for the Scholargate API.

mod request;
mod response;
mod usage;

pub use request::{AiKind, AiRequest};
pub use response::{
    AiResponse, EXPECTED_FLASHCARDS, EXPECTED_QUIZ_QUESTIONS, Flashcard, FlashcardSet, Quiz,
    QuizQuestion, TextResult,
};
pub use usage::{BonusLedger, DailyCounter, UsageBreakdown};
