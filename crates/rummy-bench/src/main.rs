use std::path::PathBuf;

use clap::Parser;

use rummy_bench::config::{BenchConfig, ResolvedOutputs, SamplingConfig};
use rummy_bench::logging::init_logging;
use rummy_bench::runner::ScenarioRunner;

/// Analysis harness for 13-card rummy hands and the computer player.
#[derive(Debug, Parser)]
#[command(
    name = "rummy-bench",
    author,
    version,
    about = "Runs the winning-hand verifier and bot over configured and sampled hands"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/scenarios.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of sampled hands (enables sampling if absent).
    #[arg(long, value_name = "HANDS")]
    hands: Option<usize>,

    /// Override the RNG seed for sampled deals.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Keep the bot's pick and discard events in the telemetry log.
    #[arg(long)]
    log_decisions: bool,

    /// Exit after validating the configuration (no hands are analysed).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if cli.hands.is_some() || cli.seed.is_some() {
        let sampling = config.sampling.get_or_insert(SamplingConfig {
            seed: None,
            hands: 1,
            decks: 2,
        });
        if let Some(hands) = cli.hands {
            sampling.hands = hands;
        }
        if cli.seed.is_some() {
            sampling.seed = cli.seed;
        }
    }

    if cli.log_decisions {
        config.logging.decision_details = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let scenario_count = config.scenarios.len();
    let sampled = config.sampling.as_ref().map_or(0, |s| s.hands);

    println!(
        "Loaded configuration '{run_id}' with {scenario_count} scenario{} and {sampled} sampled hand{}",
        if scenario_count == 1 { "" } else { "s" },
        if sampled == 1 { "" } else { "s" }
    );

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = ScenarioRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: analysis skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Analysis complete for '{run_id}': {} rows at {}",
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!(
        "  winning: {}, declarable: {}, takes/draws: {}/{}, over budget: {}, mean {:.3} ms",
        summary.stats.winning,
        summary.stats.declarable,
        summary.stats.takes,
        summary.stats.draws,
        summary.stats.over_budget,
        summary.stats.mean_latency_ms()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
