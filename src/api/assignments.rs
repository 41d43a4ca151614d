// src/api/assignments.rs

use super::{ApiClient, decode, send};
use crate::error::AppError;
use crate::models::assignment::Assignment;
use crate::models::submission::{SubmissionResult, SubmitRequest};

impl ApiClient {
    /// `GET /api/assignments`
    pub async fn list_assignments(&self) -> Result<Vec<Assignment>, AppError> {
        tracing::debug!("Fetching assignments");
        let body = send(self.get("api/assignments")?, "Failed to load assignments").await?;
        decode(body)
    }

    /// `GET /api/assignments/{id}`
    pub async fn get_assignment(&self, assignment_id: &str) -> Result<Assignment, AppError> {
        tracing::debug!("Fetching assignment {}", assignment_id);
        let path = format!("api/assignments/{}", assignment_id);
        let body = send(self.get(&path)?, "Failed to load assignment").await?;
        decode(body)
    }

    /// `POST /api/assignments/{id}/submit`
    pub async fn submit_assignment(
        &self,
        assignment_id: &str,
        request: &SubmitRequest,
    ) -> Result<SubmissionResult, AppError> {
        tracing::info!(
            "Submitting assignment {} ({} answers, {}s)",
            assignment_id,
            request.answers.len(),
            request.time_spent
        );
        let path = format!("api/assignments/{}/submit", assignment_id);
        let body = send(self.post(&path)?.json(request), "Failed to submit assignment").await?;
        decode(body)
    }
}
