#![deny(missing_docs)]
//! GitGrade command-line interface.
//!
//! Grades the public repositories behind a GitHub profile or repository URL.

mod transport;

use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gitgrade_core::{
    BatchReport, Endpoints, RepositoryRef, Session, Transport, no_repositories, render_json,
    render_markdown,
};
use log::info;
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use transport::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpTransport};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "gitgrade", version, about = "GitGrade repository evaluation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct ConnectionArgs {
    /// Base URL of the GitHub REST API.
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,
    /// Base URL serving raw file contents.
    #[arg(long, env = "GITHUB_RAW_URL")]
    raw_url: Option<String>,
    /// User agent sent with every request.
    #[arg(long, env = "GITGRADE_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

impl ConnectionArgs {
    fn endpoints(&self) -> Endpoints {
        let mut endpoints = Endpoints::from_env();
        if let Some(api_url) = non_blank(&self.api_url) {
            endpoints = endpoints.with_api_base(api_url);
        }
        if let Some(raw_url) = non_blank(&self.raw_url) {
            endpoints = endpoints.with_raw_base(raw_url);
        }
        endpoints
    }

    fn session(&self) -> CliResult<Session<HttpTransport>> {
        let transport =
            HttpTransport::new(&self.user_agent, Duration::from_secs(self.timeout_secs))?;
        Ok(Session::new(transport, self.endpoints()))
    }
}

#[derive(Args, Clone, Debug)]
struct RunArgs {
    /// Maximum number of repositories evaluated at once.
    #[arg(short = 'j', long, default_value_t = 1)]
    concurrency: usize,
}

#[derive(Args, Clone, Debug)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a profile's recent repositories or a single repository.
    Evaluate {
        /// Profile URL, repository URL, or bare owner name.
        input: String,
        #[command(flatten)]
        connection: ConnectionArgs,
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// List the repositories and branches an evaluation would use.
    Resolve {
        /// Profile URL, repository URL, or bare owner name.
        input: String,
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

fn main() {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Dispatch a parsed command.
///
/// The blocking HTTP client is created and dropped outside the runtime.
fn run(cli: Cli) -> CliResult<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Evaluate {
            input,
            connection,
            run,
            report,
        } => {
            let session = Arc::new(connection.session()?);
            let batch =
                runtime.block_on(evaluate_batch(session.clone(), input, run.concurrency))?;
            runtime.block_on(emit_report(&batch, &report))?;
        }
        Commands::Resolve { input, connection } => {
            let session = Arc::new(connection.session()?);
            let targets = runtime.block_on(resolve_targets(session.clone(), input))?;
            print!("{}", render_targets(&targets));
        }
    }

    Ok(())
}

async fn evaluate_batch<T>(
    session: Arc<Session<T>>,
    input: String,
    concurrency: usize,
) -> CliResult<BatchReport>
where
    T: Transport + Send + Sync + 'static,
{
    let resolver = session.clone();
    let query = input.clone();
    let repos = tokio::task::spawn_blocking(move || resolver.resolve(&query)).await?;
    if repos.is_empty() {
        return Err(no_repositories(&input, session.endpoints().host()).into());
    }
    info!("evaluating {} repositories", repos.len());

    let total = repos.len();
    let concurrency = if concurrency == 0 { 1 } else { concurrency };
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    for (index, repo) in repos.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let session = session.clone();
        tasks.spawn_blocking(move || {
            let _permit = permit;
            (index, session.evaluate_repository(&repo))
        });
    }

    let mut results = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        results.push(joined?);
    }
    results.sort_by_key(|(index, _)| *index);

    Ok(BatchReport::build(
        results.into_iter().map(|(_, result)| result).collect(),
        Local::now(),
    ))
}

async fn resolve_targets<T>(
    session: Arc<Session<T>>,
    input: String,
) -> CliResult<Vec<(RepositoryRef, String)>>
where
    T: Transport + Send + Sync + 'static,
{
    let targets: Vec<(RepositoryRef, String)> = tokio::task::spawn_blocking(move || {
        let repos = session.resolve(&input);
        if repos.is_empty() {
            return Err(no_repositories(&input, session.endpoints().host()));
        }
        Ok(repos
            .into_iter()
            .map(|repo| {
                let branch = session.default_branch(&repo);
                (repo, branch)
            })
            .collect())
    })
    .await??;
    Ok(targets)
}

async fn emit_report(report: &BatchReport, output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Markdown => render_markdown(report),
        OutputFormat::Json => render_json(report)?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
        info!("report written to {}", path.display());
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_text(report: &BatchReport) -> String {
    let mut output = String::new();
    let summary = &report.summary;
    let _ = writeln!(output, "Overall score: {:.1} / 100", summary.average_score);
    let _ = writeln!(output, "Developer level: {}", summary.level);
    let _ = writeln!(output, "Repositories analyzed: {}", summary.repository_count);
    let _ = writeln!(output, "Time: {}", summary.timestamp);
    let _ = writeln!(output);

    for repo in &report.repositories {
        let result = &repo.result;
        let languages: Vec<&str> = result.languages.iter().map(String::as_str).collect();
        let _ = writeln!(
            output,
            "{}: {:.1} / 100",
            result.repo_name, result.total_score
        );
        let _ = writeln!(output, "  Languages: {}", languages.join(", "));
        let _ = writeln!(
            output,
            "  Structure {:.1} | Quality {:.1} | Tests {} | CI {} | Docs {:.0} | Files {}",
            result.structure_score,
            result.quality_score,
            yes_no(result.has_tests),
            yes_no(result.has_ci),
            result.docs_score,
            result.tree_size
        );
        for strength in &repo.strengths {
            let _ = writeln!(output, "  + {strength}");
        }
        for suggestion in &repo.suggestions {
            let _ = writeln!(output, "  - {suggestion}");
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "Roadmap:");
    for (index, step) in report.roadmap.iter().enumerate() {
        let _ = writeln!(output, "  {}. {step}", index + 1);
    }
    output
}

fn render_targets(targets: &[(RepositoryRef, String)]) -> String {
    let mut output = String::new();
    for (repo, branch) in targets {
        let _ = writeln!(output, "{repo}@{branch}");
    }
    output
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}
