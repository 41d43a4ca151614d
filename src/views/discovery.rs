// src/views/discovery.rs

use std::collections::HashSet;

use crate::error::AppError;
use crate::models::assignment::Assignment;
use crate::models::enrollment::Enrollment;
use crate::state::AppState;
use crate::storage::load_cached_user;
use crate::utils::liveness::Liveness;

/// Works out which assignment the learner should see.
///
/// * A route-supplied id wins and no request is made.
/// * Otherwise the cached user's enrollments are matched against all
///   assignments and the first hit, in backend order, is returned.
///
/// Returns `Ok(None)` when there is no cached user, no match, or the view was
/// torn down part-way through.
pub async fn resolve_assignment_id(
    state: &AppState,
    liveness: &Liveness,
    route_id: Option<&str>,
) -> Result<Option<String>, AppError> {
    if let Some(id) = route_id.map(str::trim).filter(|id| !id.is_empty()) {
        return Ok(Some(id.to_string()));
    }

    let Some(user) = load_cached_user(state.store.as_ref()).await else {
        tracing::info!("No cached user; skipping assignment discovery");
        return Ok(None);
    };
    if !liveness.is_alive() {
        return Ok(None);
    }

    let enrollments = state.client.my_enrollments().await?;
    if !liveness.is_alive() {
        tracing::debug!("Discovery abandoned after enrollments: view torn down");
        return Ok(None);
    }
    let course_ids = enrolled_course_ids(&enrollments, &user.id);

    let assignments = state.client.list_assignments().await?;
    if !liveness.is_alive() {
        tracing::debug!("Discovery abandoned after assignments: view torn down");
        return Ok(None);
    }

    let found = first_enrolled_assignment(&assignments, &course_ids).map(|a| a.id.clone());
    match &found {
        Some(id) => tracing::info!("Discovered assignment {} for user {}", id, user.id),
        None => tracing::info!("No assignment found for user {}", user.id),
    }

    Ok(found)
}

fn enrolled_course_ids<'a>(enrollments: &'a [Enrollment], user_id: &str) -> HashSet<&'a str> {
    enrollments
        .iter()
        .filter(|e| e.user_id.as_deref() == Some(user_id))
        .filter_map(Enrollment::course_id)
        .collect()
}

// Backend order, no tie-break.
fn first_enrolled_assignment<'a>(
    assignments: &'a [Assignment],
    course_ids: &HashSet<&str>,
) -> Option<&'a Assignment> {
    assignments.iter().find(|a| {
        a.course_id
            .as_deref()
            .is_some_and(|course| course_ids.contains(course))
    })
}
