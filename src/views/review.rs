// src/views/review.rs

use validator::Validate;

use crate::api::submissions::ReviewScope;
use crate::error::AppError;
use crate::models::submission::{GradeRequest, Submission, SubmissionStatus};
use crate::state::AppState;

/// Client-side filter over the fetched submission list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    /// Exact status match. `None` keeps every status.
    pub status: Option<SubmissionStatus>,
    /// Case-insensitive substring of student name, student email or
    /// assignment id. Blank keeps everything.
    pub search: String,
}

impl ReviewFilter {
    pub fn matches(&self, submission: &Submission) -> bool {
        if self.status.is_some_and(|status| status != submission.status) {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            submission.student_name(),
            submission.student_email(),
            submission.assignment_id.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Matching submissions, in their original order.
    pub fn apply<'a>(&self, submissions: &'a [Submission]) -> Vec<&'a Submission> {
        submissions.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Number of pages needed for `total` items.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// The 1-based `page` of `items`. Out-of-range pages are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Editable score and feedback for the submission being graded.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct GradeForm {
    pub submission_id: String,
    #[validate(range(min = 0.0, message = "Score cannot be negative."))]
    pub score: f64,
    #[validate(length(max = 5000, message = "Feedback must be at most 5000 characters."))]
    pub feedback: String,
}

/// Controller for the instructor's submission review screen.
pub struct ReviewView {
    state: AppState,
    scope: ReviewScope,
    submissions: Vec<Submission>,
    filter: ReviewFilter,
    page: usize,
    page_size: usize,
    grading: Option<GradeForm>,
    loading: bool,
    saving: bool,
    error: Option<String>,
}

impl ReviewView {
    pub fn new(state: AppState, scope: ReviewScope) -> Self {
        let page_size = state.config.page_size.max(1);

        Self {
            state,
            scope,
            submissions: Vec::new(),
            filter: ReviewFilter::default(),
            page: 1,
            page_size,
            grading: None,
            loading: false,
            saving: false,
            error: None,
        }
    }

    pub fn scope(&self) -> &ReviewScope {
        &self.scope
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn filter(&self) -> &ReviewFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the list with a fresh fetch for the current scope and goes
    /// back to the first page.
    pub async fn refresh(&mut self) -> Result<usize, AppError> {
        self.loading = true;
        self.error = None;

        let fetched = self.state.client.list_submissions(&self.scope).await;
        self.loading = false;

        match fetched {
            Ok(submissions) => {
                tracing::info!(
                    "Loaded {} submissions for {}",
                    submissions.len(),
                    self.scope.path_segment()
                );
                self.submissions = submissions;
                self.page = 1;
                Ok(self.submissions.len())
            }
            Err(e) => {
                tracing::error!("Failed to load submissions: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Switches between one assignment and all assignments, then refetches.
    pub async fn set_scope(&mut self, scope: ReviewScope) -> Result<usize, AppError> {
        self.scope = scope;
        self.refresh().await
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.page = 1;
    }

    pub fn set_status(&mut self, status: Option<SubmissionStatus>) {
        self.filter.status = status;
        self.page = 1;
    }

    /// Moves to `page`, clamped to the available range.
    pub fn set_page(&mut self, page: usize) {
        let last = self.page_count().max(1);
        self.page = page.clamp(1, last);
    }

    pub fn visible(&self) -> Vec<&Submission> {
        self.filter.apply(&self.submissions)
    }

    pub fn page_count(&self) -> usize {
        page_count(self.visible().len(), self.page_size)
    }

    /// Rows of the current page after filtering.
    pub fn current_page(&self) -> Vec<&Submission> {
        let visible = self.visible();
        paginate(&visible, self.page, self.page_size).to_vec()
    }

    /// Opens the grading form for `submission_id`, seeded from its current
    /// score and feedback.
    pub fn open(&mut self, submission_id: &str) -> Result<&GradeForm, AppError> {
        let submission = self
            .submissions
            .iter()
            .find(|s| s.id == submission_id)
            .ok_or_else(|| AppError::NotFound(format!("Submission {} not found", submission_id)))?;

        let form = GradeForm {
            submission_id: submission.id.clone(),
            score: submission.score.unwrap_or(0.0),
            feedback: submission.feedback.clone().unwrap_or_default(),
        };

        Ok(&*self.grading.insert(form))
    }

    pub fn close(&mut self) {
        self.grading = None;
    }

    pub fn grade_form(&self) -> Option<&GradeForm> {
        self.grading.as_ref()
    }

    pub fn grade_form_mut(&mut self) -> Option<&mut GradeForm> {
        self.grading.as_mut()
    }

    /// The submission behind the open grading form.
    pub fn selected(&self) -> Option<&Submission> {
        let id = &self.grading.as_ref()?.submission_id;
        self.submissions.iter().find(|s| &s.id == id)
    }

    /// Persists the open grading form.
    ///
    /// The row is patched before the request goes out. A failed request rolls
    /// it back; a successful one settles it on whatever the backend returned.
    pub async fn save_grade(&mut self) -> Result<(), AppError> {
        let Some(form) = self.grading.clone() else {
            return Err(AppError::Validation("No submission selected".to_string()));
        };

        if let Err(e) = form.validate() {
            let err = AppError::from(e);
            self.error = Some(err.to_string());
            return Err(err);
        }

        let Some(index) = self.submissions.iter().position(|s| s.id == form.submission_id) else {
            let err = AppError::NotFound(format!("Submission {} not found", form.submission_id));
            self.error = Some(err.to_string());
            return Err(err);
        };

        self.saving = true;
        self.error = None;

        let snapshot = self.submissions[index].clone();
        {
            let row = &mut self.submissions[index];
            row.score = Some(form.score);
            row.status = SubmissionStatus::Graded;
            row.feedback = Some(form.feedback.clone());
        }

        let request = GradeRequest::new(form.score, form.feedback.clone());
        let outcome = self
            .state
            .client
            .update_submission(&form.submission_id, &request)
            .await;
        self.saving = false;

        match outcome {
            Ok(confirmed) => {
                if let Some(server) = confirmed {
                    let row = &mut self.submissions[index];
                    if server.score.is_some() {
                        row.score = server.score;
                    }
                    row.status = server.status;
                    if server.feedback.is_some() {
                        row.feedback = server.feedback;
                    }
                }
                tracing::info!("Saved grade for submission {}", form.submission_id);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to grade submission {}: {}", form.submission_id, e);
                self.submissions[index] = snapshot;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
