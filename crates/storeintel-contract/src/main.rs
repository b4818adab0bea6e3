use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tracing::info;

use storeintel_contract::categories::CategoryTable;
use storeintel_contract::cli::{parse_overrides, validate_label, Args, Command};
use storeintel_contract::client::ApiClient;
use storeintel_contract::config::ServiceConfig;
use storeintel_contract::error::{ContractError, ContractResult};
use storeintel_contract::filters::Platform;
use storeintel_contract::logging::init_tracing;
use storeintel_contract::manifests::resolve_manifest_path;
use storeintel_contract::report::{render_summary, write_report};
use storeintel_contract::request::{redact_token, RequestBuilder};
use storeintel_contract::results::{RunContext, RunReport};
use storeintel_contract::stats::compute_stats;
use storeintel_contract::suites::{list_cases_for_target, list_targets, plan_run_cases, run_planned_cases};

#[tokio::main]
async fn main() -> ContractResult<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format)?;

    let categories = match &args.categories {
        Some(path) => CategoryTable::from_path(path)?,
        None => CategoryTable::bundled()?,
    };

    match args.command {
        Command::List { ref target } => {
            if target == "all" {
                println!("targets:");
                for t in list_targets() {
                    println!("- {t}");
                }
            }

            for c in list_cases_for_target(target)? {
                println!("{c}");
            }
        }
        Command::Run {
            ref target,
            ref case_filter,
            ref overrides,
        } => {
            validate_label(&args.label)?;
            let overrides = parse_overrides(overrides)?;
            let planned = plan_run_cases(target, case_filter.as_deref(), &args.manifest)?;

            let token = args.auth_token.clone().ok_or_else(|| {
                ContractError::InvalidArgument(
                    "an auth token is required; pass --auth-token or set STOREINTEL_AUTH_TOKEN"
                        .to_string(),
                )
            })?;
            let config = ServiceConfig::new(
                &args.base_url,
                token,
                args.method,
                Duration::from_secs(args.timeout_secs),
            )?;
            let client = ApiClient::new(&config)?;
            let builder = RequestBuilder::new(config, Arc::new(categories));

            info!(suite = %target, cases = planned.len(), "starting contract run");
            let cases = run_planned_cases(&client, &builder, &planned, &overrides).await?;
            let latencies = cases
                .iter()
                .filter_map(|case| case.elapsed_ms)
                .collect::<Vec<_>>();

            let report = RunReport {
                schema_version: 1,
                context: RunContext {
                    schema_version: 1,
                    label: args.label.clone(),
                    created_at: Utc::now(),
                    base_url: redact_token(builder.config().base_url()),
                    target: target.clone(),
                    method: args.method.as_str().to_string(),
                    case_filter: case_filter.clone(),
                },
                cases,
                latency: compute_stats(&latencies),
            };

            let out_file = write_report(&args.results_dir, &report)?;
            print!("{}", render_summary(&report));
            println!("wrote result: {}", out_file.display());

            let failed = report.failed_count();
            if failed > 0 {
                return Err(ContractError::CasesFailed {
                    failed,
                    total: report.cases.len(),
                });
            }
        }
        Command::Doctor => {
            println!("storeintel-contract doctor");
            println!("base_url={}", args.base_url);
            println!(
                "auth_token={}",
                if args.auth_token.as_deref().is_some_and(|t| !t.trim().is_empty()) {
                    "set (redacted)"
                } else {
                    "missing"
                }
            );
            println!("method={}", args.method.as_str());
            println!("timeout_secs={}", args.timeout_secs);
            println!(
                "categories={}",
                args.categories
                    .as_ref()
                    .map_or_else(|| "bundled".to_string(), |p| p.display().to_string())
            );
            for platform in Platform::ALL {
                println!("categories_{platform}={}", categories.len(platform));
            }
            let manifest = resolve_manifest_path(&args.manifest);
            println!("manifest={}", manifest.display());
            println!("manifest_present={}", manifest.exists());
            println!("results_dir={}", args.results_dir.display());
        }
    }

    Ok(())
}
