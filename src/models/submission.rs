// src/models/submission.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use serde_json::Value;

use crate::models::answer::AnswerEntry;
use crate::utils::id::{opt_string_or_number, string_or_number};
use crate::utils::time::lenient_timestamp;

/// Submission lifecycle status as reported by the backend.
/// Anything the client does not know about maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Late,
    Submitted,
    Graded,
    #[serde(other)]
    Other,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionStatus::Late => "LATE",
            SubmissionStatus::Submitted => "SUBMITTED",
            SubmissionStatus::Graded => "GRADED",
            SubmissionStatus::Other => "OTHER",
        };
        f.write_str(label)
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LATE" => Ok(SubmissionStatus::Late),
            "SUBMITTED" => Ok(SubmissionStatus::Submitted),
            "GRADED" => Ok(SubmissionStatus::Graded),
            "OTHER" => Ok(SubmissionStatus::Other),
            other => Err(format!("unknown submission status: {}", other)),
        }
    }
}

/// Returned by `POST /api/assignments/{id}/submit`. Display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub attempt_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A submission row on the review screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub assignment_id: Option<String>,

    #[serde(default)]
    pub student: Option<StudentRef>,

    pub status: SubmissionStatus,

    #[serde(default)]
    pub score: Option<f64>,

    #[serde(default)]
    pub attempt_number: Option<u32>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,

    /// Per-question answers as the backend sent them. Shapes vary between
    /// backend versions, so they are kept untyped.
    #[serde(default)]
    pub answers: Option<Value>,

    /// Seconds the learner spent on the attempt.
    #[serde(default)]
    pub time_spent: Option<u64>,

    #[serde(default)]
    pub feedback: Option<String>,
}

impl Submission {
    pub fn student_name(&self) -> Option<&str> {
        self.student.as_ref().and_then(|s| s.name.as_deref())
    }

    pub fn student_email(&self) -> Option<&str> {
        self.student.as_ref().and_then(|s| s.email.as_deref())
    }
}

/// Body of `POST /api/assignments/{id}/submit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub answers: Vec<AnswerEntry>,
    /// Seconds.
    pub time_spent: u64,
}

/// Body of `PUT /api/submissions/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRequest {
    pub score: f64,
    pub status: SubmissionStatus,
    pub feedback: String,
}

impl GradeRequest {
    pub fn new(score: f64, feedback: String) -> Self {
        Self {
            score,
            status: SubmissionStatus::Graded,
            feedback,
        }
    }
}
