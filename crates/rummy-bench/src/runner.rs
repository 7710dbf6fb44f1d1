use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rummy_bot::{BotParams, PickAction, RummyBot};
use rummy_core::AppInfo;
use rummy_core::model::card::{Card, ParseCardError};
use rummy_core::model::joker::{JokerConfig, count_wild};
use rummy_core::win::{
    PRE_DISCARD_HAND_SIZE, SearchOutcome, WINNING_HAND_SIZE, WinningSearch, arrange_winning_hand,
    find_best_discard_for_win,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchConfig, ResolvedOutputs, ScenarioConfig};
use crate::logging::TELEMETRY_FILE;
use crate::sampler::HandSampler;

/// Analyses every configured and sampled hand, streaming one JSONL row each.
pub struct ScenarioRunner {
    config: BenchConfig,
    outputs: ResolvedOutputs,
    hands: Vec<PreparedHand>,
    params: BotParams,
}

/// Summary details returned after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub rows_written: usize,
    pub stats: RunStats,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandSource {
    Scenario,
    Sampled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Winning,
    NotWinning,
    BudgetExceeded,
}

impl Verdict {
    fn from_outcome(outcome: &SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Winning(_) => Verdict::Winning,
            SearchOutcome::NotWinning => Verdict::NotWinning,
            SearchOutcome::BudgetExceeded => Verdict::BudgetExceeded,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Verdict::Winning => "winning",
            Verdict::NotWinning => "not_winning",
            Verdict::BudgetExceeded => "budget_exceeded",
        }
    }
}

/// One analysed hand. 13-card hands fill the verdict and pick fields; the
/// discard fields are set for 14-card hands and for 13-card hands whose
/// pick took the discard top.
#[derive(Debug, Clone, Serialize)]
pub struct HandRow {
    pub run_id: String,
    pub name: String,
    pub source: HandSource,
    pub hand: Vec<String>,
    pub wildcard: Option<String>,
    pub discard_top: Option<String>,
    pub wild_in_hand: usize,
    pub verdict: Option<Verdict>,
    pub melds: Vec<String>,
    pub pick_action: Option<&'static str>,
    pub pick_reason: Option<&'static str>,
    pub best_discard: Option<String>,
    pub discard: Option<String>,
    pub discard_reason: Option<&'static str>,
    pub can_declare: Option<bool>,
    pub latency_ms: f64,
    pub over_budget: bool,
}

/// Aggregates over every row of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub hands: usize,
    pub winning: usize,
    pub budget_exceeded: usize,
    pub declarable: usize,
    pub takes: usize,
    pub draws: usize,
    pub over_budget: usize,
    total_latency: Duration,
}

impl RunStats {
    fn record(&mut self, row: &HandRow, elapsed: Duration) {
        self.hands += 1;
        self.total_latency += elapsed;
        match row.verdict {
            Some(Verdict::Winning) => self.winning += 1,
            Some(Verdict::BudgetExceeded) => self.budget_exceeded += 1,
            _ => {}
        }
        if row.can_declare == Some(true) {
            self.declarable += 1;
        }
        match row.pick_action {
            Some(action) if action == PickAction::TakeDiscard.as_str() => self.takes += 1,
            Some(_) => self.draws += 1,
            None => {}
        }
        if row.over_budget {
            self.over_budget += 1;
        }
    }

    pub fn mean_latency_ms(&self) -> f64 {
        if self.hands == 0 {
            0.0
        } else {
            self.total_latency.as_secs_f64() * 1000.0 / self.hands as f64
        }
    }
}

#[derive(Debug, Clone)]
struct PreparedHand {
    name: String,
    source: HandSource,
    cards: Vec<Card>,
    jokers: Option<JokerConfig>,
    discard_top: Option<Card>,
}

impl PreparedHand {
    fn from_scenario(scenario: &ScenarioConfig) -> Result<Self, RunnerError> {
        let parse_error = |source| RunnerError::Card {
            scenario: scenario.name.clone(),
            source,
        };
        let cards = scenario.cards().map_err(parse_error)?;
        if cards.len() != WINNING_HAND_SIZE && cards.len() != PRE_DISCARD_HAND_SIZE {
            return Err(RunnerError::HandSize {
                scenario: scenario.name.clone(),
                found: cards.len(),
            });
        }
        let discard_top = scenario
            .discard_top(cards.len() as u16)
            .map_err(parse_error)?;
        let jokers = scenario
            .wildcard()
            .map_err(parse_error)?
            .map(JokerConfig::from_wildcard);

        Ok(Self {
            name: scenario.name.clone(),
            source: HandSource::Scenario,
            cards,
            jokers,
            discard_top,
        })
    }
}

impl ScenarioRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let mut hands = config
            .scenarios
            .iter()
            .map(PreparedHand::from_scenario)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(sampling) = config.sampling.as_ref() {
            let mut sampler = HandSampler::new(sampling);
            for index in 0..sampling.hands {
                let deal = sampler.deal();
                hands.push(PreparedHand {
                    name: format!("sample_{index:04}"),
                    source: HandSource::Sampled,
                    cards: deal.hand,
                    jokers: Some(JokerConfig::from_wildcard(deal.wildcard)),
                    discard_top: Some(deal.discard_top),
                });
            }
        }

        Ok(Self {
            config,
            outputs,
            hands,
            params: BotParams::from_env(),
        })
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }

    /// Execute the run, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut stats = RunStats::default();
        let mut rows = Vec::with_capacity(self.hands.len());
        let budget = Duration::from_millis(self.config.metrics.latency_budget_ms);

        for hand in &self.hands {
            let started = Instant::now();
            let mut row = self.analyse(hand);
            let elapsed = started.elapsed();
            row.latency_ms = elapsed.as_secs_f64() * 1000.0;
            row.over_budget = elapsed > budget;
            log_row(&row);

            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            stats.record(&row, elapsed);
            rows.push(row);
        }

        writer.flush()?;
        write_markdown(
            &self.outputs.summary_md,
            &self.config.run_id,
            self.config.metrics.latency_budget_ms,
            &stats,
            &rows,
        )?;

        let telemetry_path = self
            .config
            .logging
            .enable_structured
            .then(|| self.outputs.telemetry_dir().join(TELEMETRY_FILE));

        Ok(RunSummary {
            rows_written: rows.len(),
            stats,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    fn analyse(&self, hand: &PreparedHand) -> HandRow {
        let jokers = hand.jokers.as_ref();
        let mut bot = RummyBot::new(hand.jokers, self.params);
        let mut row = HandRow {
            run_id: self.config.run_id.clone(),
            name: hand.name.clone(),
            source: hand.source,
            hand: hand.cards.iter().map(Card::to_string).collect(),
            wildcard: hand.jokers.map(|config| config.wildcard().to_string()),
            discard_top: hand.discard_top.map(|card| card.to_string()),
            wild_in_hand: count_wild(&hand.cards, jokers),
            verdict: None,
            melds: Vec::new(),
            pick_action: None,
            pick_reason: None,
            best_discard: None,
            discard: None,
            discard_reason: None,
            can_declare: None,
            latency_ms: 0.0,
            over_budget: false,
        };

        let mut held = hand.cards.clone();
        if held.len() == WINNING_HAND_SIZE {
            let outcome = self.search(jokers).run(&held);
            let verdict = Verdict::from_outcome(&outcome);
            row.verdict = Some(verdict);
            if verdict == Verdict::Winning {
                row.melds = arrange_winning_hand(&held, jokers)
                    .unwrap_or_default()
                    .iter()
                    .map(|group| {
                        let cards: Vec<String> =
                            group.cards.iter().map(Card::to_string).collect();
                        format!("{}: {}", group.kind, cards.join(" "))
                    })
                    .collect();
            }

            let decision = bot.pick_card(&held, hand.discard_top);
            row.pick_action = Some(decision.action.as_str());
            row.pick_reason = Some(decision.reason.as_str());
            match (decision.action, hand.discard_top) {
                (PickAction::TakeDiscard, Some(top)) => held.push(top),
                _ => return row,
            }
        }

        row.best_discard = find_best_discard_for_win(&held, jokers).map(|card| card.to_string());
        row.can_declare = Some(bot.can_declare(&held));
        if let Some(choice) = bot.plan_discard(&held) {
            row.discard = Some(choice.card.to_string());
            row.discard_reason = Some(choice.reason.as_str());
        }
        row
    }

    fn search<'a>(&self, jokers: Option<&'a JokerConfig>) -> WinningSearch<'a> {
        let search = WinningSearch::new(jokers);
        match self.config.metrics.search_budget_ms {
            Some(ms) => search.with_budget(Duration::from_millis(ms)),
            None => search,
        }
    }
}

fn log_row(row: &HandRow) {
    if !tracing::enabled!(target: "rummy_bench::hand", Level::INFO) {
        return;
    }

    event!(
        target: "rummy_bench::hand",
        Level::INFO,
        name = %row.name,
        cards = row.hand.len(),
        verdict = row.verdict.map(Verdict::as_str).unwrap_or("-"),
        pick = row.pick_action.unwrap_or("-"),
        discard = row.discard.as_deref().unwrap_or("-"),
        latency_ms = row.latency_ms,
        over_budget = row.over_budget,
    );
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

pub fn render_markdown(
    run_id: &str,
    latency_budget_ms: u64,
    stats: &RunStats,
    rows: &[HandRow],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} Analysis Summary ({run_id})\n", AppInfo::name());
    let _ = writeln!(out, "Engine version: {}", AppInfo::version());
    let _ = writeln!(out, "Latency budget: {latency_budget_ms} ms per hand\n");

    out.push_str("| Metric | Value |\n");
    out.push_str("|---|---|\n");
    let _ = writeln!(out, "| Hands analysed | {} |", stats.hands);
    let _ = writeln!(out, "| Winning 13-card hands | {} |", stats.winning);
    let _ = writeln!(out, "| Search budget exceeded | {} |", stats.budget_exceeded);
    let _ = writeln!(out, "| Declarable 14-card hands | {} |", stats.declarable);
    let _ = writeln!(out, "| Discard pile taken | {} |", stats.takes);
    let _ = writeln!(out, "| Stock drawn | {} |", stats.draws);
    let _ = writeln!(out, "| Rows over budget | {} |", stats.over_budget);
    let _ = writeln!(out, "| Mean latency (ms) | {:.3} |", stats.mean_latency_ms());

    if !rows.is_empty() {
        out.push_str("\n| Hand | Cards | Verdict | Pick | Discard | Latency (ms) |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for row in rows {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {:.3}{} |",
                row.name,
                row.hand.len(),
                row.verdict.map(Verdict::as_str).unwrap_or("-"),
                row.pick_reason.unwrap_or("-"),
                row.discard.as_deref().unwrap_or("-"),
                row.latency_ms,
                if row.over_budget { " ⚠" } else { "" },
            );
        }
    }
    out
}

fn write_markdown(
    path: &Path,
    run_id: &str,
    latency_budget_ms: u64,
    stats: &RunStats,
    rows: &[HandRow],
) -> Result<(), RunnerError> {
    fs::write(path, render_markdown(run_id, latency_budget_ms, stats, rows))?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("scenario '{scenario}' has an unreadable card: {source}")]
    Card {
        scenario: String,
        #[source]
        source: ParseCardError,
    },
    #[error("scenario '{scenario}' holds {found} cards; expected 13 or 14")]
    HandSize { scenario: String, found: usize },
}
