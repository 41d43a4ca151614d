// src/api/submissions.rs

use serde_json::Value;

use super::{ApiClient, decode, send};
use crate::error::AppError;
use crate::models::submission::{GradeRequest, Submission};

/// Which submissions the review screen lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewScope {
    Assignment(String),
    All,
}

impl ReviewScope {
    /// Path segment in `api/assignments/{segment}/submissions`.
    pub fn path_segment(&self) -> &str {
        match self {
            ReviewScope::Assignment(id) => id.as_str(),
            ReviewScope::All => "all",
        }
    }
}

impl ApiClient {
    /// `GET /api/assignments/{id|all}/submissions`
    pub async fn list_submissions(&self, scope: &ReviewScope) -> Result<Vec<Submission>, AppError> {
        tracing::debug!("Fetching submissions for {}", scope.path_segment());
        let path = format!("api/assignments/{}/submissions", scope.path_segment());
        let body = send(self.get(&path)?, "Failed to load submissions").await?;
        decode(body)
    }

    /// `PUT /api/submissions/{id}`
    ///
    /// Returns the updated record when the backend sends one back. An empty
    /// or unrecognisable success body is `None`, not an error.
    pub async fn update_submission(
        &self,
        submission_id: &str,
        grade: &GradeRequest,
    ) -> Result<Option<Submission>, AppError> {
        tracing::info!("Grading submission {} with score {}", submission_id, grade.score);
        let path = format!("api/submissions/{}", submission_id);
        let body = send(self.put(&path)?.json(grade), "Failed to save grade").await?;

        if matches!(&body, Value::Object(map) if map.is_empty()) {
            return Ok(None);
        }

        match decode::<Submission>(body) {
            Ok(updated) => Ok(Some(updated)),
            Err(e) => {
                tracing::debug!("Grade response for {} not a submission: {}", submission_id, e);
                Ok(None)
            }
        }
    }
}
