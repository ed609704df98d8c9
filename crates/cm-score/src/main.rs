use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Parser;
use cm_common::api::{MatchRequest, MatchResponse};
use cm_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use cm_common::matching::{rank_organizations, MatchingConfig, ScoreError, VALUE_AWARE_WEIGHTS};
use dotenvy::dotenv;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "cm-score",
    about = "Rank organizations by how closely they match a user's issues and actions"
)]
struct Cli {
    /// Match request JSON file; `-` reads stdin
    #[arg(long, env = "CM_INPUT")]
    input: PathBuf,

    /// Share of each issue distance taken from exact issue matches
    #[arg(long)]
    exact_match: Option<f64>,

    /// Share of each issue distance taken from category matches
    #[arg(long)]
    category_match: Option<f64>,

    /// Weight of the issue score in the total
    #[arg(long)]
    issue_weight: Option<f64>,

    /// Weight of the action score in the total
    #[arg(long)]
    action_weight: Option<f64>,

    /// Weight of the value-question score; omitted means values are ignored
    #[arg(long)]
    value_weight: Option<f64>,

    /// Keep only the N closest organizations
    #[arg(long)]
    limit: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("invalid match request: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Score(#[from] ScoreError),
}

fn load_request(path: &Path) -> Result<MatchRequest, CliError> {
    if path == Path::new("-") {
        return Ok(MatchRequest::from_reader(io::stdin().lock())?);
    }

    let file = File::open(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(MatchRequest::from_reader(BufReader::new(file))?)
}

/// Flags override the request file, which overrides `CM_*` env values.
///
/// Scoring with values and no request weights starts from the value-aware
/// preset; env values and weight flags still override it per field.
fn build_config<F>(cli: &Cli, request: &MatchRequest, env: F) -> MatchingConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = MatchingConfig::from_lookup(&env);
    let value_aware = cli
        .value_weight
        .or(request.value_weight)
        .or(config.value_weight)
        .is_some();
    if value_aware && request.weights.is_none() {
        config = MatchingConfig::from_lookup_over(&env, VALUE_AWARE_WEIGHTS);
    }

    let mut config = request.apply_to(config);

    if let Some(v) = cli.exact_match {
        config.weights.exact_match = v;
    }
    if let Some(v) = cli.category_match {
        config.weights.category_match = v;
    }
    if let Some(v) = cli.issue_weight {
        config.weights.issue_weight = v;
    }
    if let Some(v) = cli.action_weight {
        config.weights.action_weight = v;
    }
    if cli.value_weight.is_some() {
        config.value_weight = cli.value_weight;
    }
    if cli.limit.is_some() {
        config.limit = cli.limit;
    }

    config
}

fn run<F>(cli: &Cli, env: F) -> Result<String, CliError>
where
    F: Fn(&str) -> Option<String>,
{
    let request = load_request(&cli.input)?;
    let config = build_config(cli, &request, env);
    config.validate()?;

    info!(
        organizations = request.organizations.len(),
        user_max_rank = request.user.max_rank(),
        value_aware = config.value_weight.is_some(),
        "scoring match request"
    );

    let ranked = rank_organizations(
        &request.user,
        &request.organizations,
        &request.issue_categories,
        &config,
    )?;

    let response = MatchResponse::new(
        request.user.max_rank(),
        ranked,
        env!("CARGO_PKG_VERSION"),
        Utc::now(),
    );

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    Ok(output)
}

fn main() {
    dotenv().ok();
    init_tracing_subscriber("cm-score");
    install_tracing_panic_hook("cm-score");

    let cli = Cli::parse();
    match run(&cli, |key| std::env::var(key).ok()) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            tracing::error!(error = %err, "cm-score failed");
            std::process::exit(1);
        }
    }
}
