use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use interview_ai::config::{AppConfig, LlmConfig};
use interview_ai::error::AppError;
use interview_ai::llm::{OpenAiTextGeneration, TextGeneration};
use interview_ai::telemetry;
use interview_ai::workflows::interview::{
    Answer, AnswerEvaluator, EvaluatorOptions, Interview, JobContext, NarrativeOptions, Question,
    Report, ReportGenerator,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Evaluator and report generator wired to the same backend configuration.
struct Pipeline {
    evaluator: AnswerEvaluator,
    generator: ReportGenerator,
}

impl Pipeline {
    fn from_config(config: &LlmConfig) -> Self {
        match config.api_key.as_deref().filter(|_| !config.effective_offline()) {
            Some(api_key) => {
                let model: Arc<dyn TextGeneration> =
                    Arc::new(OpenAiTextGeneration::new(api_key, config.model.clone()));
                Self {
                    evaluator: AnswerEvaluator::new(model.clone(), evaluator_options(config)),
                    generator: ReportGenerator::new(model, narrative_options(config)),
                }
            }
            None => Self::offline(),
        }
    }

    fn offline() -> Self {
        Self {
            evaluator: AnswerEvaluator::offline(),
            generator: ReportGenerator::offline(),
        }
    }

    async fn run(&self, interview: &Interview, context: Option<&JobContext>) -> Report {
        let evaluations = self.evaluator.evaluate_all(interview, context).await;
        self.generator.generate(interview, &evaluations, context).await
    }
}

fn evaluator_options(config: &LlmConfig) -> EvaluatorOptions {
    EvaluatorOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        ..EvaluatorOptions::default()
    }
}

fn narrative_options(config: &LlmConfig) -> NarrativeOptions {
    NarrativeOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        ..NarrativeOptions::default()
    }
}

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    pipeline: Arc<Pipeline>,
}

#[derive(Parser, Debug)]
#[command(
    name = "Interview Readiness Coach",
    about = "Score mock interviews and generate readiness reports from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate a readiness report for a recorded interview
    Interview {
        #[command(subcommand)]
        command: InterviewCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum InterviewCommand {
    /// Score an interview transcript file and print the report
    Report(InterviewReportArgs),
}

#[derive(Args, Debug)]
struct InterviewReportArgs {
    /// Path to an interview JSON file (questions plus answers)
    #[arg(long)]
    interview: PathBuf,
    /// Job title the candidate is practicing for
    #[arg(long)]
    job_title: Option<String>,
    /// Free-form description of the target job
    #[arg(long)]
    job_description: Option<String>,
    /// Score deterministically without calling the text-generation backend
    #[arg(long)]
    offline: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InterviewReportRequest {
    questions: Vec<Question>,
    #[serde(default)]
    answers: Vec<Answer>,
    #[serde(default)]
    job_context: Option<JobContext>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Interview {
            command: InterviewCommand::Report(args),
        } => run_interview_report(args).await,
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        pipeline: Arc::new(Pipeline::from_config(&config.llm)),
    };

    let app = build_router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        offline = config.llm.effective_offline(),
        "interview readiness service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/interview/report", post(interview_report_endpoint))
        .with_state(state)
}

async fn run_interview_report(args: InterviewReportArgs) -> Result<(), AppError> {
    let InterviewReportArgs {
        interview,
        job_title,
        job_description,
        offline,
    } = args;

    let raw = std::fs::read_to_string(&interview)?;
    let interview: Interview = serde_json::from_str(&raw)
        .map_err(|err| AppError::InvalidInput(format!("failed to parse interview file: {err}")))?;
    interview.validate()?;

    let context = job_title.map(|title| JobContext {
        title,
        description: job_description.unwrap_or_default(),
    });

    let pipeline = if offline {
        Pipeline::offline()
    } else {
        Pipeline::from_config(&AppConfig::load()?.llm)
    };

    let report = pipeline.run(&interview, context.as_ref()).await;
    render_interview_report(&report);

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn interview_report_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<InterviewReportRequest>,
) -> Result<Json<Report>, AppError> {
    let InterviewReportRequest {
        questions,
        answers,
        job_context,
    } = payload;

    let interview = Interview { questions, answers };
    interview.validate()?;

    let report = state.pipeline.run(&interview, job_context.as_ref()).await;
    Ok(Json(report))
}

fn render_interview_report(report: &Report) {
    println!("Interview readiness report");
    println!(
        "Overall: {}/100 ({})",
        report.overall_score,
        report.readiness_band.label()
    );
    match report.technical_score {
        Some(score) => println!("Technical: {score}/100"),
        None => println!("Technical: n/a"),
    }
    match report.behavioral_score {
        Some(score) => println!("Behavioral: {score}/100"),
        None => println!("Behavioral: n/a"),
    }
    println!(
        "Answered {} of {} questions ({} skipped), average answer length {} words",
        report.metrics.questions_answered,
        report.metrics.total_questions,
        report.metrics.questions_skipped,
        report.metrics.average_answer_length,
    );

    println!("\nSummary");
    println!("{}", report.summary);

    println!("\nPrimary blockers");
    for blocker in &report.primary_blockers {
        println!(
            "- [{}] {} ({}): {}",
            blocker.severity.label(),
            blocker.question_id.as_str(),
            blocker.question_kind.label(),
            blocker.issue
        );
        println!("  Impact: {}", blocker.impact);
    }

    if report.strengths.is_empty() {
        println!("\nStrengths: none noted");
    } else {
        println!("\nStrengths");
        for strength in &report.strengths {
            println!("- {strength}");
        }
    }

    if report.areas_for_improvement.is_empty() {
        println!("\nAreas for improvement: none noted");
    } else {
        println!("\nAreas for improvement");
        for area in &report.areas_for_improvement {
            println!("- {area}");
        }
    }

    if report.recommendations.is_empty() {
        println!("\nRecommendations: none");
    } else {
        println!("\nRecommendations");
        for recommendation in &report.recommendations {
            println!("- {recommendation}");
        }
    }

    println!("\nAI confidence: {:.2}", report.ai_confidence);
}
