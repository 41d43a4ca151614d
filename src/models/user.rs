// src/models/user.rs

use serde::{Deserialize, Serialize};

use crate::utils::id::string_or_number;

/// Learner identity cached locally under the `user` key.
/// Written by whatever signed the learner in; this crate only reads it
/// (the CLI's `remember-user` command aside).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}
