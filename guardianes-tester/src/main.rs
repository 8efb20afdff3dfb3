mod logic;
mod scenario;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use logic::reports::{generate_console_report, generate_json_report, generate_markdown_report};
use logic::{LogicTester, ScenarioResult};
use scenario::{Scenario, get_scenario, list_scenarios};
use util::{parse_seeds, split_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "guardianes-tester", version)]
#[command(about = "Automated playthroughs for Guardianes de las Plantas del Perú")]
struct Args {
    /// Scenarios to run (comma-separated, `all` for every scenario)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut out = open_output(args.output.as_deref())?;

    if args.list_scenarios {
        write_scenario_list(&mut out)?;
        out.flush()?;
        return Ok(());
    }

    eprintln!("{}", "🌱 Guardianes Automated Tester".bright_cyan().bold());
    let started = Instant::now();
    let seeds = parse_seeds(&args.seeds)?;
    let tester = LogicTester::new(args.verbose);
    let mut results = Vec::new();
    for scenario in resolve_scenarios(&args.scenarios) {
        results.extend(tester.run_scenario(scenario, &seeds, args.iterations).await);
    }

    write_report(&mut out, args.report, &results, started.elapsed())?;
    out.flush()?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(stdout())),
    })
}

fn write_scenario_list(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(out, "  {key:20} - {description}")?;
    }
    Ok(())
}

/// Resolve `--scenarios` in the order given; `all` adds the rest of the
/// catalog. Unknown keys are reported and skipped.
fn resolve_scenarios(arg: &str) -> Vec<Scenario> {
    let mut scenarios: Vec<Scenario> = Vec::new();
    for key in split_csv(arg) {
        let found: Vec<Scenario> = if key.eq_ignore_ascii_case("all") {
            Scenario::ALL.to_vec()
        } else if let Some(scenario) = get_scenario(&key) {
            vec![scenario]
        } else {
            eprintln!("⚠️  Unknown scenario: {}", key.yellow());
            continue;
        };
        for scenario in found {
            if !scenarios.contains(&scenario) {
                scenarios.push(scenario);
            }
        }
    }
    scenarios
}

fn write_report(
    out: &mut dyn Write,
    format: ReportFormat,
    results: &[ScenarioResult],
    elapsed: Duration,
) -> Result<()> {
    match format {
        ReportFormat::Console => generate_console_report(out, results, elapsed),
        ReportFormat::Json => generate_json_report(out, results),
        ReportFormat::Markdown => generate_markdown_report(out, results),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_expands_after_explicit_keys() {
        let scenarios = resolve_scenarios("quiz,all");
        assert_eq!(scenarios[0], Scenario::Quiz);
        assert_eq!(scenarios.len(), Scenario::ALL.len());
        assert!(scenarios.contains(&Scenario::ReplayBestWins));
    }

    #[test]
    fn explicit_keys_keep_their_order() {
        assert_eq!(
            resolve_scenarios("smoke, harvest,smoke"),
            vec![Scenario::Smoke, Scenario::Harvest]
        );
    }

    #[test]
    fn unknown_scenarios_are_skipped() {
        assert!(resolve_scenarios("boss-fight").is_empty());
    }

    #[test]
    fn scenario_list_names_every_key() {
        let mut buf = Vec::new();
        write_scenario_list(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Available scenarios:"));
        for scenario in Scenario::ALL {
            assert!(text.contains(scenario.key()), "{}", scenario.key());
        }
    }

    #[tokio::test]
    async fn json_report_parses_back() {
        let results = LogicTester::new(false)
            .run_scenario(Scenario::Cleanup, &[1337], 1)
            .await;
        let mut buf = Vec::new();
        write_report(&mut buf, ReportFormat::Json, &results, Duration::ZERO).unwrap();
        let parsed: Vec<ScenarioResult> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].passed);
        assert_eq!(parsed[0].scenario_name, "Stream Cleanup");
    }
}
