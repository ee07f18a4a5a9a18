//! Typed AI responses and payload validation

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::AiKind;
use crate::{Result, ScholarGateError};

/// Number of flashcards the backend is asked to generate.
pub const EXPECTED_FLASHCARDS: usize = 8;

/// Number of quiz questions the backend is asked to generate.
pub const EXPECTED_QUIZ_QUESTIONS: usize = 5;

/// Free-text answer (explain, formula).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResult {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub cards: Vec<Flashcard>,
}

/// A four-option multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; 4],
    /// Index into `options` of the correct answer (0..=3).
    #[serde(deserialize_with = "deserialize_answer")]
    pub answer: u8,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    /// The text of the correct option.
    pub fn correct_option(&self) -> &str {
        &self.options[usize::from(self.answer.min(3))]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

/// A validated response, shaped according to the request's [`AiKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiResponse {
    Text(TextResult),
    Flashcards(FlashcardSet),
    Quiz(Quiz),
}

impl AiResponse {
    /// Parse and validate a raw payload for the given request kind.
    ///
    /// Structural mismatches, empty content and out-of-range quiz answers
    /// are rejected with [`ScholarGateError::MalformedResponse`]. A card or
    /// question count that differs from what was requested is only logged.
    pub fn from_value(kind: AiKind, value: Value) -> Result<Self> {
        match kind {
            AiKind::Explain | AiKind::Formula => {
                let result: TextResult = serde_json::from_value(value)?;
                if result.text.trim().is_empty() {
                    return Err(malformed(kind, "empty text"));
                }
                Ok(AiResponse::Text(result))
            }
            AiKind::Flashcards => {
                let set: FlashcardSet = serde_json::from_value(value)?;
                if set.cards.is_empty() {
                    return Err(malformed(kind, "no cards"));
                }
                if set
                    .cards
                    .iter()
                    .any(|c| c.front.trim().is_empty() || c.back.trim().is_empty())
                {
                    return Err(malformed(kind, "card with an empty side"));
                }
                if set.cards.len() != EXPECTED_FLASHCARDS {
                    warn!(
                        expected = EXPECTED_FLASHCARDS,
                        actual = set.cards.len(),
                        "unexpected flashcard count"
                    );
                }
                Ok(AiResponse::Flashcards(set))
            }
            AiKind::Quiz => {
                let quiz: Quiz = serde_json::from_value(value)?;
                if quiz.questions.is_empty() {
                    return Err(malformed(kind, "no questions"));
                }
                if let Some(q) = quiz.questions.iter().find(|q| q.answer > 3) {
                    return Err(malformed(
                        kind,
                        &format!("answer index {} out of range", q.answer),
                    ));
                }
                if quiz.questions.len() != EXPECTED_QUIZ_QUESTIONS {
                    warn!(
                        expected = EXPECTED_QUIZ_QUESTIONS,
                        actual = quiz.questions.len(),
                        "unexpected quiz question count"
                    );
                }
                Ok(AiResponse::Quiz(quiz))
            }
        }
    }

    pub fn into_text(self) -> Result<TextResult> {
        match self {
            AiResponse::Text(t) => Ok(t),
            other => Err(mismatch("text", &other)),
        }
    }

    pub fn into_flashcards(self) -> Result<FlashcardSet> {
        match self {
            AiResponse::Flashcards(f) => Ok(f),
            other => Err(mismatch("flashcards", &other)),
        }
    }

    pub fn into_quiz(self) -> Result<Quiz> {
        match self {
            AiResponse::Quiz(q) => Ok(q),
            other => Err(mismatch("quiz", &other)),
        }
    }

    fn shape(&self) -> &'static str {
        match self {
            AiResponse::Text(_) => "text",
            AiResponse::Flashcards(_) => "flashcards",
            AiResponse::Quiz(_) => "quiz",
        }
    }
}

fn malformed(kind: AiKind, reason: &str) -> ScholarGateError {
    ScholarGateError::MalformedResponse(format!("{kind}: {reason}"))
}

fn mismatch(wanted: &str, got: &AiResponse) -> ScholarGateError {
    ScholarGateError::MalformedResponse(format!("expected {wanted}, got {}", got.shape()))
}

/// Accept `2` as well as `2.0`; JSON-mode model output is not always integral-typed.
fn deserialize_answer<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let n = f64::deserialize(deserializer)?;
    if n.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&n) {
        return Err(D::Error::custom(format!("invalid answer index {n}")));
    }
    Ok(n as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(answer: Value) -> Value {
        json!({
            "question": "2 + 2?",
            "options": ["1", "2", "3", "4"],
            "answer": answer,
            "explanation": "basic addition"
        })
    }

    #[test]
    fn text_payload_parses() {
        let resp = AiResponse::from_value(AiKind::Explain, json!({"text": "because"})).unwrap();
        assert_eq!(resp.into_text().unwrap().text, "because");
    }

    #[test]
    fn float_answer_index_accepted() {
        let resp =
            AiResponse::from_value(AiKind::Quiz, json!({"questions": [question(json!(3.0))]}))
                .unwrap();
        let quiz = resp.into_quiz().unwrap();
        assert_eq!(quiz.questions[0].answer, 3);
        assert_eq!(quiz.questions[0].correct_option(), "4");
    }

    #[test]
    fn fractional_answer_index_rejected() {
        let err =
            AiResponse::from_value(AiKind::Quiz, json!({"questions": [question(json!(1.5))]}))
                .unwrap_err();
        assert!(matches!(err, ScholarGateError::MalformedResponse(_)));
    }

    #[test]
    fn into_wrong_shape_is_malformed() {
        let resp = AiResponse::Text(TextResult { text: "x".into() });
        assert!(matches!(
            resp.into_quiz(),
            Err(ScholarGateError::MalformedResponse(_))
        ));
    }
}
