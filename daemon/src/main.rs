//! fitstake oracle CLI.

use anyhow::Context;
use clap::Parser;
use fitstake_activity::ActivityPayload;
use fitstake_oracle::OracleConfig;
use fitstake_types::Timestamp;
use fitstake_utils::LogFormat;
use fitstake_verification::{ActivityVerifier, ChallengeCriteria};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fitstake-oracle", about = "Fitness challenge completion oracle")]
struct Cli {
    /// Oracle identity allowed to mark completions in this scope.
    #[arg(long, env = "FITSTAKE_ORACLE_IDENTITY")]
    oracle_identity: Option<String>,

    /// Deployment scope (e.g. the challenge contract address).
    #[arg(long, env = "FITSTAKE_SCOPE")]
    scope: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FITSTAKE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "FITSTAKE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Verify one activity against one challenge's criteria and print the decision.
    Verify {
        /// Challenge criteria: inline JSON or a path to a JSON file.
        #[arg(long)]
        criteria: String,

        /// Activity payload: inline JSON or a path to a JSON file.
        #[arg(long)]
        activity: String,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn merge_config(cli: &Cli) -> anyhow::Result<OracleConfig> {
    let base = match &cli.config {
        Some(path) => OracleConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => OracleConfig::default(),
    };
    Ok(OracleConfig {
        scope: cli.scope.clone().unwrap_or(base.scope),
        oracle_identity: cli.oracle_identity.clone().unwrap_or(base.oracle_identity),
        log_format: cli.log_format.unwrap_or(base.log_format),
        log_level: cli.log_level.clone().unwrap_or(base.log_level),
        verification: base.verification,
    })
}

/// Inline JSON when the argument looks like an object, otherwise a file path.
fn read_json_arg(arg: &str) -> anyhow::Result<String> {
    if arg.trim_start().starts_with('{') {
        return Ok(arg.to_string());
    }
    std::fs::read_to_string(Path::new(arg)).with_context(|| format!("reading {arg}"))
}

fn verify(config: &OracleConfig, criteria: &str, activity: &str) -> anyhow::Result<ExitCode> {
    config
        .verification
        .validate()
        .context("invalid [verification] settings")?;
    let criteria: ChallengeCriteria = serde_json::from_str(&read_json_arg(criteria)?)
        .context("parsing challenge criteria")?;
    let payload = ActivityPayload::from_json_str(&read_json_arg(activity)?)
        .context("parsing activity payload")?;

    let verifier = ActivityVerifier::new(config.verification.clone());
    let decision = verifier
        .verify(&payload, &criteria, Timestamp::now())
        .context("invalid challenge criteria")?;
    fitstake_oracle::audit(&decision);

    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(if decision.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = merge_config(&cli)?;
    fitstake_utils::init_logging(config.log_format, &config.log_level);

    match &cli.command {
        Command::Verify { criteria, activity } => verify(&config, criteria, activity),
        Command::Config => {
            if let Err(e) = config.validate() {
                tracing::warn!("effective configuration is not usable yet: {e}");
            }
            print!("{}", config.to_toml_string()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
