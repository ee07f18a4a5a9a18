//! ScholarGate - usage-metered, cached access to a hosted study assistant
//!
//! Every request for AI-generated study content (explanations, flashcards,
//! quizzes, formulas) goes through an [`AiGateway`], which:
//!
//! - answers repeated questions from a permanent local cache,
//! - limits remote calls to a daily allowance plus ad-earned bonus uses,
//! - fails fast when the device is offline and the cache cannot help,
//! - validates the shape of every response before it is cached or charged.
//!
//! Storage, clock and connectivity are injected, so hosts decide where
//! counters and cached answers live.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scholargate::{FileStore, ScholarGate};
//!
//! #[tokio::main]
//! async fn main() -> scholargate::Result<()> {
//!     let gateway = ScholarGate::builder()
//!         .edge_function("https://abc.supabase.co", "public-anon-key")
//!         .store(Arc::new(FileStore::default_location()))
//!         .build()?;
//!
//!     let quiz = gateway.quiz("photosynthesis").await?;
//!     for q in &quiz.questions {
//!         println!("{} -> {}", q.question, q.correct_option());
//!     }
//!     println!("{} uses left today", gateway.remaining_uses().await?);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod storage;
pub mod telemetry;
pub mod types;
pub mod usage;

// Re-export main types at crate root
pub use cache::ResponseCache;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::GatewayConfig;
pub use connectivity::{AlwaysOnline, Connectivity, ConnectivityMonitor};
pub use error::{ErrorKind, Result, ScholarGateError};
pub use gateway::{AiGateway, ScholarGate, ScholarGateBuilder};
pub use providers::{AiBackend, EdgeFunctionClient};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use usage::{Reservation, UsageLedger, UseSource};

// Re-export all types
pub use types::{
    AiKind, AiRequest, AiResponse, BonusLedger, DailyCounter, EXPECTED_FLASHCARDS,
    EXPECTED_QUIZ_QUESTIONS, Flashcard, FlashcardSet, Quiz, QuizQuestion, TextResult,
    UsageBreakdown,
};
