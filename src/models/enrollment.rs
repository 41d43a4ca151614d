// src/models/enrollment.rs

use serde::{Deserialize, Serialize};

use crate::utils::id::{opt_string_or_number, string_or_number};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// One row of `GET /api/enrollments/my`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,

    /// Enrolled learner. Some deployments call this `studentId`.
    #[serde(default, alias = "studentId", deserialize_with = "opt_string_or_number")]
    pub user_id: Option<String>,

    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub course_id: Option<String>,

    /// Embedded course, used when `courseId` is absent.
    #[serde(default)]
    pub course: Option<CourseRef>,
}

impl Enrollment {
    pub fn course_id(&self) -> Option<&str> {
        self.course_id
            .as_deref()
            .or_else(|| self.course.as_ref().map(|c| c.id.as_str()))
    }
}
