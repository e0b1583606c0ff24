use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use remote_json_envs_api::{AwsCliConfig, HttpClientConfig};
use remote_json_envs_engine::{HOOK, PackageOutcome, RemoteJsonEnvs, RemoteSources};
use serde_json::{Map, Value, json};
use tracing::info;

/// Resolve `custom.RemoteJSONEnvs` from a serverless descriptor and inject the
/// values into every function of a compiled CloudFormation template.
#[derive(Debug, Parser)]
#[command(name = "remote-json-envs", version, about)]
struct Args {
    /// Serverless descriptor (YAML or JSON) holding `custom.RemoteJSONEnvs`.
    #[arg(long, value_name = "PATH")]
    config: PathBuf,

    /// Compiled template (JSON) to update.
    #[arg(long, value_name = "PATH")]
    template: PathBuf,

    /// Where to write the updated template. Defaults to overwriting `--template`.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// AWS CLI program used for SSMParameterStore and S3.
    #[arg(long = "aws-cli", value_name = "PROGRAM", default_value = "aws")]
    aws_cli: String,

    #[arg(long)]
    region: Option<String>,

    #[arg(long)]
    profile: Option<String>,

    /// Per-request timeout for HTTPRequest items.
    #[arg(long = "http-timeout-ms", value_name = "MILLIS", default_value_t = 7000)]
    http_timeout_ms: u64,

    /// Run the pipeline and print the merged keys with redacted values; write nothing.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let configuration_input = read_descriptor(&args.config)?;
    let mut template = read_template(&args.template)?;

    let aws = AwsCliConfig {
        program: args.aws_cli.clone(),
        region: args.region.clone(),
        profile: args.profile.clone(),
    };
    let http = HttpClientConfig {
        timeout: Duration::from_millis(args.http_timeout_ms),
    };
    let sources = RemoteSources::aws_cli(aws, &http).context("failed to set up remote sources")?;
    let plugin = RemoteJsonEnvs::new(sources);

    let outcome = plugin.run_hook(HOOK, &configuration_input, &mut template).await?;
    if args.dry_run {
        if let Some(outcome) = &outcome {
            println!("{}", serde_json::to_string_pretty(&dry_run_report(outcome))?);
        }
        return Ok(());
    }

    let Some(outcome) = outcome else {
        info!(config = %args.config.display(), "RemoteJSONEnvs not configured; template left unchanged");
        // The unchanged template still has to land at a separate --output.
        if let Some(output) = args.output.as_deref().filter(|output| *output != args.template.as_path()) {
            write_template(output, &template)?;
        }
        return Ok(());
    };

    let output = args.output.as_deref().unwrap_or(&args.template);
    write_template(output, &template)?;
    info!(output = %output.display(), functions = outcome.functions_updated, "wrote template");
    Ok(())
}

fn write_template(path: &Path, template: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(template)?;
    std::fs::write(path, format!("{rendered}\n")).with_context(|| format!("failed to write {}", path.display()))
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_descriptor(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let is_json = path.extension().and_then(|extension| extension.to_str()) == Some("json");
    if is_json {
        serde_json::from_str(&text).with_context(|| format!("failed to parse {} as JSON", path.display()))
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("failed to parse {} as YAML", path.display()))
    }
}

fn read_template(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {} as JSON", path.display()))
}

fn dry_run_report(outcome: &PackageOutcome) -> Value {
    let variables: Map<String, Value> = outcome
        .merged_keys
        .iter()
        .map(|key| (key.clone(), Value::String("<redacted>".into())))
        .collect();
    json!({
        "hook": HOOK,
        "provider": outcome.provider,
        "requested": outcome.requested,
        "resolved": outcome.resolved,
        "functions": outcome.functions_updated,
        "variables": variables,
    })
}
