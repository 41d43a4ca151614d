// src/views/attempt.rs

use std::time::Duration;

use crate::error::AppError;
use crate::models::answer::{AnswerValue, Draft};
use crate::models::assignment::{Assignment, QuestionId};
use crate::models::submission::{SubmissionResult, SubmitRequest};
use crate::state::AppState;
use crate::storage::DraftCache;
use crate::utils::liveness::Liveness;
use crate::utils::timer::ElapsedTimer;

use super::discovery::resolve_assignment_id;

/// Where the attempt screen is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Idle,
    Loading,
    /// Discovery finished without finding anything to show.
    NoAssignment,
    /// Loading failed; `error()` says why.
    Failed,
    Loaded,
    Submitting,
    Submitted,
}

/// Controller for the learner's assignment-taking screen.
///
/// Owns the loaded assignment, the working draft, the elapsed-time counter and
/// the submission result. Every answer change is written through to the
/// draft cache.
pub struct AttemptView {
    state: AppState,
    drafts: DraftCache,
    liveness: Liveness,
    phase: AttemptPhase,
    assignment_id: Option<String>,
    assignment: Option<Assignment>,
    draft: Draft,
    timer: Option<ElapsedTimer>,
    result: Option<SubmissionResult>,
    error: Option<String>,
}

impl AttemptView {
    pub fn new(state: AppState) -> Self {
        let drafts = state.drafts();

        Self {
            state,
            drafts,
            liveness: Liveness::new(),
            phase: AttemptPhase::Idle,
            assignment_id: None,
            assignment: None,
            draft: Draft::default(),
            timer: None,
            result: None,
            error: None,
        }
    }

    /// Handle for tearing this view down from another task.
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    pub fn assignment_id(&self) -> Option<&str> {
        self.assignment_id.as_deref()
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn answer(&self, question_id: QuestionId) -> Option<&AnswerValue> {
        self.draft.get(question_id)
    }

    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == AttemptPhase::Loading
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == AttemptPhase::Submitting
    }

    pub fn timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(ElapsedTimer::is_running)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.timer.as_ref().map_or(0, ElapsedTimer::elapsed_secs)
    }

    /// Time left under the assignment's limit, if it has one. Saturates at zero.
    pub fn time_remaining(&self) -> Option<Duration> {
        let limit = self.assignment.as_ref()?.time_limit()?;
        Some(limit.saturating_sub(Duration::from_secs(self.elapsed_secs())))
    }

    /// `(answered, total)` for a progress indicator.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.assignment.as_ref().map_or(0, |a| a.questions.len());
        (self.draft.answered_count(), total)
    }

    /// Resolves the assignment (from `route_id` or by discovery) and loads it.
    pub async fn mount(&mut self, route_id: Option<&str>) -> Result<(), AppError> {
        self.phase = AttemptPhase::Loading;
        self.error = None;

        let resolved = resolve_assignment_id(&self.state, &self.liveness, route_id).await;
        if !self.liveness.is_alive() {
            return Ok(());
        }

        match resolved {
            Ok(Some(id)) => self.load(&id).await,
            Ok(None) => {
                self.phase = AttemptPhase::NoAssignment;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Assignment discovery failed: {}", e);
                self.phase = AttemptPhase::NoAssignment;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetches the assignment, restores or creates its draft and starts the
    /// elapsed-time counter.
    pub async fn load(&mut self, assignment_id: &str) -> Result<(), AppError> {
        self.phase = AttemptPhase::Loading;
        self.error = None;
        self.assignment_id = Some(assignment_id.to_string());
        self.assignment = None;
        self.timer = None;

        let fetched = self.state.client.get_assignment(assignment_id).await;
        if !self.liveness.is_alive() {
            tracing::debug!("Dropping assignment {} response: view torn down", assignment_id);
            return Ok(());
        }

        let assignment = match fetched {
            Ok(assignment) => assignment,
            Err(e) => return Err(self.fail(e)),
        };
        // Ids must be unique whether or not a cached draft is reused.
        if let Err(e) = assignment.question_ids() {
            return Err(self.fail(e));
        }

        let draft = match self.drafts.load(assignment_id).await {
            Some(cached) => {
                tracing::info!("Restored draft for assignment {}", assignment_id);
                cached
            }
            None => match Draft::blank(&assignment) {
                Ok(blank) => blank,
                Err(e) => return Err(self.fail(e)),
            },
        };
        if !self.liveness.is_alive() {
            return Ok(());
        }

        self.assignment = Some(assignment);
        self.draft = draft;
        self.result = None;
        self.restart_timer();
        self.phase = AttemptPhase::Loaded;
        self.persist().await;

        Ok(())
    }

    /// Replaces one question's answer.
    pub async fn set_answer(&mut self, question_id: QuestionId, value: AnswerValue) {
        self.draft.set(question_id, value);
        self.persist().await;
    }

    /// Adds or removes `option` on a multi-select question. No-op otherwise.
    pub async fn toggle_multi(&mut self, question_id: QuestionId, option: &str) {
        if self.draft.toggle(question_id, option) {
            self.persist().await;
        }
    }

    /// Sends the draft and elapsed time to the backend.
    ///
    /// On failure the draft is left exactly as it was so the learner can
    /// retry. On success the cached draft is deleted and the timer stopped.
    pub async fn submit(&mut self) -> Result<SubmissionResult, AppError> {
        let assignment_id = match (&self.assignment_id, &self.assignment) {
            (Some(id), Some(_)) => id.clone(),
            _ => {
                let err = AppError::Validation("No assignment selected".to_string());
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        match self.phase {
            AttemptPhase::Submitted => {
                let err = AppError::Validation("Assignment already submitted".to_string());
                self.error = Some(err.to_string());
                return Err(err);
            }
            AttemptPhase::Submitting | AttemptPhase::Loading => {
                return Err(AppError::Validation("Please wait for the current request".to_string()));
            }
            _ => {}
        }

        self.phase = AttemptPhase::Submitting;
        self.error = None;

        let request = SubmitRequest {
            answers: self.draft.answers.clone(),
            time_spent: self.elapsed_secs(),
        };

        match self.state.client.submit_assignment(&assignment_id, &request).await {
            Ok(result) => {
                tracing::info!(
                    "Assignment {} submitted with status {}",
                    assignment_id,
                    result.status
                );
                self.drafts.clear(&assignment_id).await;
                self.stop_timer();
                self.result = Some(result.clone());
                self.phase = AttemptPhase::Submitted;
                Ok(result)
            }
            Err(e) => {
                tracing::error!("Failed to submit assignment {}: {}", assignment_id, e);
                self.error = Some(e.to_string());
                self.phase = AttemptPhase::Loaded;
                Err(e)
            }
        }
    }

    /// Stops background work and discards any late responses.
    pub fn teardown(&mut self) {
        self.liveness.teardown();
        self.stop_timer();
    }

    fn fail(&mut self, err: AppError) -> AppError {
        tracing::error!("Failed to load assignment: {}", err);
        self.phase = AttemptPhase::Failed;
        self.error = Some(err.to_string());
        err
    }

    fn restart_timer(&mut self) {
        self.timer = Some(ElapsedTimer::start(self.liveness.clone()));
    }

    /// Freezes the counter; the last reading stays visible.
    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.stop();
        }
    }

    /// Writes the draft through to storage while an attempt is open.
    async fn persist(&self) {
        if self.assignment.is_none() || self.phase == AttemptPhase::Submitted {
            return;
        }
        if let Some(id) = &self.assignment_id {
            self.drafts.save(id, &self.draft).await;
        }
    }
}

impl Drop for AttemptView {
    fn drop(&mut self) {
        self.teardown();
    }
}
