//! F1 Predictor CLI - next race, qualifying grid and placeholder finish estimates

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Select};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use f1_predictor::error::{parse_eval_date, validate_round, validate_season};
use f1_predictor::pipeline::next_race;
use f1_predictor::source::DEFAULT_BASE_URL;
use f1_predictor::{
    Blocked, CachedSource, Entrant, ErgastClient, FinishEstimate, PipelineState,
    PlaceholderEstimator, QualifyingResult, Race, RaceResolutionPipeline, RaceTarget,
    SourceConfig,
};

type Pipeline = RaceResolutionPipeline<CachedSource<ErgastClient>>;

#[derive(Parser)]
#[command(name = "f1-predictor")]
#[command(author, version, about = "Formula 1 finish estimates from qualifying", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Season to query (defaults to the current year)
    #[arg(short, long, global = true, value_parser = parse_season)]
    season: Option<u32>,

    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true, value_parser = parse_eval_date)]
    today: Option<NaiveDate>,

    /// Ergast-compatible API root
    #[arg(long, global = true, env = "F1_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "10")]
    timeout: u64,

    /// Log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List the races of a season
    Schedule,

    /// Show the next race on or after the evaluation date
    Next,

    /// Estimate finishing positions from qualifying
    Predict {
        /// Round to load instead of the next race
        #[arg(short, long, value_parser = parse_round)]
        round: Option<u32>,

        /// Driver id (e.g. max_verstappen) or short code (e.g. VER)
        #[arg(short, long)]
        driver: Option<String>,

        /// Seed for the random multiplier
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    println!("{}", "F1 Predictor".cyan().bold());
    println!();

    let season = cli.season.unwrap_or_else(|| Local::now().year() as u32);
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    let config = SourceConfig {
        base_url: cli.base_url.clone(),
        timeout_secs: cli.timeout,
        ..Default::default()
    };
    let client = ErgastClient::new(config).context("Failed to create HTTP client")?;
    let pipeline = RaceResolutionPipeline::new(CachedSource::new(client));

    // Create runtime for async operations
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    if cli.interactive {
        run_interactive(&rt, &pipeline, season, today)?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Schedule => show_schedule(&rt, &pipeline, season, today)?,
            Commands::Next => show_next_race(&rt, &pipeline, season, today)?,
            Commands::Predict {
                round,
                driver,
                seed,
            } => {
                let target = round.map(RaceTarget::Round).unwrap_or(RaceTarget::Next);
                let mut rng = make_rng(seed);
                predict(&rt, &pipeline, season, today, target, driver.as_deref(), &mut rng)?;
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn parse_season(value: &str) -> Result<u32, String> {
    let season = value
        .parse::<u32>()
        .map_err(|e| format!("Invalid season '{}': {}", value, e))?;
    validate_season(season)
}

fn parse_round(value: &str) -> Result<u32, String> {
    let round = value
        .parse::<u32>()
        .map_err(|e| format!("Invalid round '{}': {}", value, e))?;
    validate_round(round)
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Run a future on the runtime behind a spinner
fn fetch<F: Future>(rt: &Runtime, message: &str, fut: F) -> Result<F::Output> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    let output = rt.block_on(fut);

    pb.finish_and_clear();
    Ok(output)
}

fn show_schedule(rt: &Runtime, pipeline: &Pipeline, season: u32, today: NaiveDate) -> Result<()> {
    println!("{}: {}", "Schedule".green(), season);
    println!();

    let races = match fetch(rt, "Loading schedule...", pipeline.schedule(season))? {
        Ok(races) => races,
        Err(reason) => {
            print_blocked(&reason);
            return Ok(());
        }
    };
    let next = next_race(&races, today).map(Race::key);

    println!(
        "{:>5} {:<12} {:<32} {:<20}",
        "Round", "Date", "Race", "Country"
    );
    println!("{}", "-".repeat(72));

    for race in &races {
        let line = format!(
            "{:>5} {:<12} {:<32} {:<20}",
            race.round,
            race.date.to_string(),
            truncate_name(&race.name, 32),
            truncate_name(&race.country, 20)
        );
        if Some(race.key()) == next {
            println!("{} {}", line.bold(), "◀ next".green());
        } else if race.date < today {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }

    println!();
    println!("Total: {} races", races.len());
    Ok(())
}

fn show_next_race(rt: &Runtime, pipeline: &Pipeline, season: u32, today: NaiveDate) -> Result<()> {
    match fetch(rt, "Resolving next race...", pipeline.resolve_next_race(season, today))? {
        Ok(race) => print_race(&race),
        Err(reason) => {
            print_blocked(&reason);
            if matches!(reason, Blocked::NoUpcomingRace { .. }) {
                println!("Use `schedule` to list the season and `predict --round` to pick one.");
            }
        }
    }
    Ok(())
}

fn predict(
    rt: &Runtime,
    pipeline: &Pipeline,
    season: u32,
    today: NaiveDate,
    target: RaceTarget,
    driver: Option<&str>,
    rng: &mut StdRng,
) -> Result<()> {
    let state = fetch(rt, "Loading race data...", pipeline.load(season, target, today))?;
    let estimator = PlaceholderEstimator::new();

    let PipelineState::QualifyingLoaded {
        race,
        entrants,
        qualifying,
    } = &state
    else {
        if let Some(reason) = state.blocked() {
            print_blocked(reason);
        }
        return Ok(());
    };

    print_race(race);
    println!();

    match driver {
        Some(query) => {
            let driver_id = match_driver(entrants, query);
            match state.select_driver(&driver_id) {
                PipelineState::Ready { entrant, input, .. } => {
                    let estimate = estimator.estimate(&input, rng);
                    print_estimate(&entrant, &estimate);
                }
                PipelineState::Blocked(reason) => print_blocked(&reason),
                _ => {}
            }
        }
        None => {
            let grid = estimator.estimate_grid(qualifying, rng);
            print_grid(entrants, qualifying, &grid);
        }
    }

    Ok(())
}

fn run_interactive(rt: &Runtime, pipeline: &Pipeline, season: u32, today: NaiveDate) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!();

    let theme = ColorfulTheme::default();
    let estimator = PlaceholderEstimator::new();
    let mut rng = StdRng::from_entropy();

    let mut race = match fetch(rt, "Resolving next race...", pipeline.resolve_next_race(season, today))? {
        Ok(race) => Some(race),
        Err(reason) => {
            print_blocked(&reason);
            None
        }
    };

    loop {
        let current = match race.take() {
            Some(race) => race,
            None => match pick_race(rt, pipeline, &theme, season)? {
                Some(race) => race,
                None => break,
            },
        };

        print_race(&current);
        println!();

        let target = RaceTarget::Round(current.round);
        let state = fetch(rt, "Loading race data...", pipeline.load(season, target, today))?;

        let entrants = match &state {
            PipelineState::QualifyingLoaded { entrants, .. } => entrants.clone(),
            other => {
                if let Some(reason) = other.blocked() {
                    print_blocked(reason);
                }
                match Select::with_theme(&theme)
                    .with_prompt("What next?")
                    .items(&["Pick another race", "Quit"])
                    .default(0)
                    .interact()?
                {
                    0 => continue,
                    _ => break,
                }
            }
        };

        let labels: Vec<String> = entrants.iter().map(Entrant::label).collect();

        loop {
            let picked = Select::with_theme(&theme)
                .with_prompt("Pick a driver")
                .items(&labels)
                .default(0)
                .interact()?;

            println!();
            match state.clone().select_driver(&entrants[picked].driver_id) {
                PipelineState::Ready { entrant, input, .. } => {
                    let estimate = estimator.estimate(&input, &mut rng);
                    print_estimate(&entrant, &estimate);
                }
                PipelineState::Blocked(reason) => print_blocked(&reason),
                _ => {}
            }
            println!();

            let next = Select::with_theme(&theme)
                .with_prompt("What next?")
                .items(&["Pick another driver", "Pick another race", "Quit"])
                .default(0)
                .interact()?;

            match next {
                0 => continue,
                1 => break,
                _ => {
                    println!("Goodbye!");
                    return Ok(());
                }
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Fallback race picker over the full schedule
fn pick_race(
    rt: &Runtime,
    pipeline: &Pipeline,
    theme: &ColorfulTheme,
    season: u32,
) -> Result<Option<Race>> {
    let races = match fetch(rt, "Loading schedule...", pipeline.schedule(season))? {
        Ok(races) => races,
        Err(reason) => {
            print_blocked(&reason);
            return Ok(None);
        }
    };

    let mut labels: Vec<String> = races.iter().map(Race::label).collect();
    labels.push("Quit".to_string());

    let picked = Select::with_theme(theme)
        .with_prompt("Pick a race")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(races.into_iter().nth(picked))
}

/// Map a driver id or short code onto the entrant's driver id
fn match_driver(entrants: &[Entrant], query: &str) -> String {
    let query = query.trim();
    entrants
        .iter()
        .find(|e| {
            e.driver_id.eq_ignore_ascii_case(query)
                || e.code.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(query))
        })
        .map(|e| e.driver_id.clone())
        .unwrap_or_else(|| query.to_string())
}

fn print_race(race: &Race) {
    println!(
        "{}: {} ({})",
        "Race".yellow().bold(),
        race.name.bold(),
        race.date
    );
    println!("Round: {} / {}", race.round, race.season);
    let circuit = match &race.locality {
        Some(locality) => format!("{}, {}", race.circuit_name, locality),
        None => race.circuit_name.clone(),
    };
    println!("Circuit: {} - {}", circuit, race.country);
}

fn print_blocked(reason: &Blocked) {
    if reason.is_not_yet_available() {
        println!("{}: {}", "Not available".yellow(), reason);
    } else {
        println!("{}: {}", "Failed".red(), reason);
    }
}

fn print_estimate(entrant: &Entrant, estimate: &FinishEstimate) {
    println!("{}", "Preliminary prediction (from qualifying)".yellow().bold());
    println!("Driver: {}", entrant.label());
    if let Some(team) = &entrant.constructor {
        println!("Team: {}", team);
    }
    println!("Qualifying: P{}", estimate.qualifying_position);
    println!(
        "Expected finishing position: {}",
        format!("{:.1}", estimate.expected_position).green().bold()
    );
}

fn print_grid(entrants: &[Entrant], qualifying: &[QualifyingResult], grid: &[FinishEstimate]) {
    println!("{}", "Qualifying grid and estimates:".yellow().bold());
    println!(
        "{:>4} {:<5} {:<24} {:<16} {:>10} {:>8}",
        "Pos", "Code", "Driver", "Team", "Best", "Est."
    );
    println!("{}", "-".repeat(72));

    for estimate in grid {
        let entrant = entrants.iter().find(|e| e.driver_id == estimate.driver_id);
        let result = qualifying.iter().find(|q| q.driver_id == estimate.driver_id);

        println!(
            "{:>4} {:<5} {:<24} {:<16} {:>10} {:>8.1}",
            estimate.qualifying_position,
            entrant.map_or(estimate.driver_id.as_str(), Entrant::display_code),
            truncate_name(entrant.map_or(&estimate.driver_id, |e| &e.display_name), 24),
            truncate_name(entrant.and_then(|e| e.constructor.as_deref()).unwrap_or("-"), 16),
            result.and_then(QualifyingResult::best_time).unwrap_or("-"),
            estimate.expected_position
        );
    }

    let unclassified: Vec<&Entrant> = entrants
        .iter()
        .filter(|e| !qualifying.iter().any(|q| q.driver_id == e.driver_id))
        .collect();
    if !unclassified.is_empty() {
        println!();
        println!("{}", "No qualifying time:".dimmed());
        for entrant in unclassified {
            println!("  {}", entrant.label().dimmed());
        }
    }
}

/// Truncate name to fit display width
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}
