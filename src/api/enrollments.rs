// src/api/enrollments.rs

use super::{ApiClient, decode, send};
use crate::error::AppError;
use crate::models::enrollment::Enrollment;

impl ApiClient {
    /// `GET /api/enrollments/my`
    pub async fn my_enrollments(&self) -> Result<Vec<Enrollment>, AppError> {
        tracing::debug!("Fetching enrollments");
        let body = send(self.get("api/enrollments/my")?, "Failed to load enrollments").await?;
        decode(body)
    }
}
