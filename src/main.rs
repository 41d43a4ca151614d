// src/main.rs

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use coursework_client::{
    api::submissions::ReviewScope,
    config::Config,
    error::AppError,
    models::{
        answer::AnswerValue,
        assignment::{Assignment, QuestionId},
        submission::{Submission, SubmissionStatus},
        user::CachedUser,
    },
    state::AppState,
    storage::{self, SqliteStore},
    views::{AttemptPhase, AttemptView, ReviewView},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "coursework", version, about = "Take assignments and review submissions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Work through an assignment interactively. Without --assignment the
    /// first assignment of an enrolled course is picked.
    Take {
        #[arg(short, long)]
        assignment: Option<String>,
    },
    /// List submissions for one assignment, or all of them.
    Review {
        #[arg(short, long)]
        assignment: Option<String>,
        #[arg(long)]
        status: Option<SubmissionStatus>,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Grade a submission.
    Grade {
        submission: String,
        #[arg(long)]
        score: f64,
        #[arg(long, default_value = "")]
        feedback: String,
        #[arg(short, long)]
        assignment: Option<String>,
    },
    /// Cache the learner identity used for assignment discovery.
    RememberUser {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment (.env included)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = init_tracing(&config);

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {:?}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Console layer on stderr (stdout belongs to the command output) plus a
/// daily rolling file.
fn init_tracing(config: &Config) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("logs", "client.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

async fn run(command: Command, config: Config) -> Result<(), AppError> {
    let store = SqliteStore::connect(&config.draft_store_url).await?;
    let state = AppState::new(config, Arc::new(store))?;

    match command {
        Command::Take { assignment } => take(state, assignment).await,
        Command::Review {
            assignment,
            status,
            search,
            page,
        } => review(state, scope_of(assignment), status, search, page).await,
        Command::Grade {
            submission,
            score,
            feedback,
            assignment,
        } => grade(state, scope_of(assignment), &submission, score, feedback).await,
        Command::RememberUser { id, name, email } => {
            let user = CachedUser {
                id,
                name,
                email,
                role: None,
            };
            storage::remember_user(state.store.as_ref(), &user).await?;
            println!("Remembered user {}", user.id);
            Ok(())
        }
    }
}

fn scope_of(assignment: Option<String>) -> ReviewScope {
    match assignment {
        Some(id) if id != "all" => ReviewScope::Assignment(id),
        _ => ReviewScope::All,
    }
}

const TAKE_HELP: &str = "\
commands:
  show                    print the assignment and your answers
  set <question> <text>   answer a question
  toggle <question> <opt> select or unselect an option (multi-select questions)
  submit                  hand in your answers
  quit                    leave; your draft is kept";

async fn take(state: AppState, assignment: Option<String>) -> Result<(), AppError> {
    let mut view = AttemptView::new(state);
    view.mount(assignment.as_deref()).await?;

    match view.phase() {
        AttemptPhase::NoAssignment => {
            println!("No assignment found.");
            return Ok(());
        }
        AttemptPhase::Loaded => {}
        _ => {
            return Err(AppError::Validation(
                view.error().unwrap_or("Assignment could not be loaded").to_string(),
            ));
        }
    }

    print_attempt(&view);
    println!("{}", TAKE_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let mut parts = line.trim().splitn(3, ' ');
        let command = parts.next().unwrap_or_default();

        match command {
            "" => continue,
            "show" => print_attempt(&view),
            "help" => println!("{}", TAKE_HELP),
            "set" | "toggle" => {
                let Some(question_id) = parts.next().and_then(|q| q.parse::<u32>().ok()).map(QuestionId)
                else {
                    println!("usage: {} <question> <value>", command);
                    continue;
                };
                let value = parts.next().unwrap_or_default().trim();

                if command == "set" {
                    if takes_several_options(view.assignment(), question_id) {
                        println!(
                            "question {} takes several options; use `toggle {} <option>`",
                            question_id, question_id
                        );
                        continue;
                    }
                    view.set_answer(question_id, AnswerValue::from(value)).await;
                } else {
                    view.toggle_multi(question_id, value).await;
                }
                print_answer(&view, question_id);
            }
            "submit" => match view.submit().await {
                Ok(result) => {
                    println!("Submitted: {}", result.status);
                    if let Some(attempt) = result.attempt_number {
                        println!("Attempt:   {}", attempt);
                    }
                    if let Some(score) = result.score {
                        println!("Score:     {}", score);
                    }
                    return Ok(());
                }
                Err(e) => println!("Submission failed: {} (your answers are kept)", e),
            },
            "quit" | "exit" => break,
            other => println!("unknown command: {} (try `help`)", other),
        }
    }

    view.teardown();
    println!("Draft saved.");
    Ok(())
}

/// Free text would overwrite the selected set of a multi-select question.
fn takes_several_options(assignment: Option<&Assignment>, question_id: QuestionId) -> bool {
    assignment
        .and_then(|a| a.question(question_id))
        .is_some_and(|q| q.is_multi_select())
}

fn print_attempt(view: &AttemptView) {
    let Some(assignment) = view.assignment() else {
        return;
    };

    println!("== {} ==", assignment.title);
    if let Some(text) = assignment.instructions.as_ref().or(assignment.description.as_ref()) {
        println!("{}", text);
    }
    if let Some(due) = assignment.due_date {
        println!("Due: {}", due.format("%Y-%m-%d %H:%M UTC"));
    }

    for (index, question) in assignment.questions.iter().enumerate() {
        let id = question.id_at(index);
        println!();
        println!("[{}] ({}, {} pts) {}", id, question.question_type, question.points, question.prompt);
        if let Some(options) = &question.options {
            for option in options {
                println!("     - {}", option);
            }
        }
        print_answer(view, id);
    }

    let (answered, total) = view.progress();
    print!("\n{}/{} answered, {}s elapsed", answered, total, view.elapsed_secs());
    if let Some(remaining) = view.time_remaining() {
        print!(", {}s remaining", remaining.as_secs());
    }
    println!();
}

fn print_answer(view: &AttemptView, question_id: QuestionId) {
    match view.answer(question_id) {
        Some(AnswerValue::Text(text)) if !text.is_empty() => println!("   > {}", text),
        Some(AnswerValue::Choices(choices)) if !choices.is_empty() => {
            let joined: Vec<&str> = choices.iter().map(String::as_str).collect();
            println!("   > {}", joined.join(", "));
        }
        Some(_) => println!("   > (unanswered)"),
        None => println!("   > no such question"),
    }
}

async fn review(
    state: AppState,
    scope: ReviewScope,
    status: Option<SubmissionStatus>,
    search: String,
    page: usize,
) -> Result<(), AppError> {
    let mut view = ReviewView::new(state, scope);
    view.refresh().await?;
    view.set_status(status);
    view.set_search(search);
    view.set_page(page);

    let rows = view.current_page();
    if rows.is_empty() {
        println!("No submissions.");
        return Ok(());
    }

    for submission in rows {
        print_submission(submission);
    }
    println!(
        "page {}/{} ({} matching, {} total)",
        view.page(),
        view.page_count().max(1),
        view.visible().len(),
        view.submissions().len()
    );
    Ok(())
}

fn print_submission(submission: &Submission) {
    let who = submission
        .student_name()
        .or(submission.student_email())
        .unwrap_or("-");
    let score = submission
        .score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let when = submission
        .submitted_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    println!(
        "{:<10} {:<24} {:<12} {:<10} {:>6} {}",
        submission.id,
        who,
        submission.assignment_id.as_deref().unwrap_or("-"),
        submission.status,
        score,
        when
    );
}

async fn grade(
    state: AppState,
    scope: ReviewScope,
    submission_id: &str,
    score: f64,
    feedback: String,
) -> Result<(), AppError> {
    let mut view = ReviewView::new(state, scope);
    view.refresh().await?;
    view.open(submission_id)?;

    if let Some(form) = view.grade_form_mut() {
        form.score = score;
        form.feedback = feedback;
    }
    view.save_grade().await?;

    if let Some(submission) = view.selected() {
        print_submission(submission);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_is_refused_on_multi_select_questions() {
        let assignment: Assignment = serde_json::from_value(json!({
            "id": "m1",
            "title": "Primes",
            "questions": [
                { "type": "MULTIPLE_CHOICE", "question": "Which are prime?",
                  "options": ["2", "4", "5"], "correctAnswer": ["2", "5"] },
                { "type": "ESSAY", "question": "Why?" }
            ]
        }))
        .unwrap();

        assert!(takes_several_options(Some(&assignment), QuestionId(0)));
        assert!(!takes_several_options(Some(&assignment), QuestionId(1)));
        assert!(!takes_several_options(Some(&assignment), QuestionId(9)));
        assert!(!takes_several_options(None, QuestionId(0)));
    }
}
