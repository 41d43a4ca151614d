// src/models/assignment.rs

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::utils::id::{opt_string_or_number, string_or_number};

/// An assignment as served by `GET /api/assignments/{id}`.
/// Owned by the backend; never mutated on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub instructions: Option<String>,

    /// Publication status (e.g., "PUBLISHED"). Passed through for display.
    #[serde(default)]
    pub status: Option<String>,

    /// Course this assignment belongs to. Used by discovery.
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub course_id: Option<String>,

    #[serde(default)]
    pub total_points: Option<f64>,

    #[serde(default)]
    pub passing_score: Option<f64>,

    #[serde(default)]
    pub max_attempts: Option<u32>,

    /// Time limit in minutes.
    #[serde(default)]
    pub time_limit: Option<u32>,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub allow_late_submission: Option<bool>,

    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Assignment {
    /// Derived identifiers of every question, in declaration order.
    /// Fails if two questions resolve to the same identifier, since the
    /// identifier is the only link between a question and its answer.
    pub fn question_ids(&self) -> Result<Vec<QuestionId>, AppError> {
        let mut seen = HashSet::with_capacity(self.questions.len());
        let mut ids = Vec::with_capacity(self.questions.len());

        for (index, question) in self.questions.iter().enumerate() {
            let id = question.id_at(index);
            if !seen.insert(id) {
                return Err(AppError::Validation(format!(
                    "Assignment {} has more than one question with id {}",
                    self.id, id
                )));
            }
            ids.push(id);
        }

        Ok(ids)
    }

    /// Looks a question up by its derived identifier.
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions
            .iter()
            .enumerate()
            .find(|(index, q)| q.id_at(*index) == id)
            .map(|(_, q)| q)
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
            .map(|minutes| Duration::from_secs(u64::from(minutes) * 60))
    }

    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due < now)
    }
}

/// Question type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuestionType::MultipleChoice => "Multiple choice",
            QuestionType::TrueFalse => "True / false",
            QuestionType::ShortAnswer => "Short answer",
            QuestionType::Essay => "Essay",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    /// Prompt text. Some backends call this field `question`.
    #[serde(alias = "question")]
    pub prompt: String,

    #[serde(default)]
    pub points: f64,

    /// Answer options, in display order.
    #[serde(default)]
    pub options: Option<Vec<String>>,

    /// Only inspected to tell single- from multi-select: an array here means
    /// the question accepts several options.
    #[serde(default)]
    pub correct_answer: Option<Value>,

    /// Explicit ordering index; doubles as the question's identifier.
    #[serde(default)]
    pub order: Option<u32>,
}

impl Question {
    /// Identifier of this question given its position in the assignment.
    pub fn id_at(&self, index: usize) -> QuestionId {
        QuestionId(self.order.unwrap_or(index as u32))
    }

    pub fn is_multi_select(&self) -> bool {
        matches!(self.correct_answer, Some(Value::Array(_)))
    }
}

/// Handle correlating a question with its answer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u32);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
