use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::info;

use crate::{
    config::{parse_bind_addr, PlannerConfig},
    core::{validate, TripPlanner},
    schemas::{check_day_sequence, validate_result},
    server,
    services::{
        directive::compile,
        storage::{ArtifactStore, FsArtifactStore},
    },
    types::TripRequest,
};

fn command() -> Command {
    let file_arg = |help: &'static str| {
        Arg::new("file")
            .help(help)
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .index(1)
    };

    Command::new("trip-itinerary")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate trip requests, compile planning directives, and generate itineraries")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .global(true)
                .help("Model to request (or set TRIP_MODEL)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .global(true)
                .help("API key (or set OPENAI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("Base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL env vars)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Generation timeout in seconds (or set TRIP_TIMEOUT_SECS)"),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP server")
                .arg(
                    Arg::new("bind")
                        .short('b')
                        .long("bind")
                        .value_name("ADDR")
                        .help("Address to listen on (or set TRIP_BIND_ADDR)"),
                )
                .arg(
                    Arg::new("output-dir")
                        .short('o')
                        .long("output-dir")
                        .value_name("DIR")
                        .value_parser(value_parser!(PathBuf))
                        .help("Where rendered PDFs are stored (or set TRIP_OUTPUT_DIR)"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a trip request JSON file")
                .arg(file_arg("Trip request JSON file")),
        )
        .subcommand(
            Command::new("compile")
                .about("Print the planning directive for a trip request")
                .arg(file_arg("Trip request JSON file"))
                .arg(
                    Arg::new("with-schema")
                        .long("with-schema")
                        .action(ArgAction::SetTrue)
                        .help("Append the output schema contract, as sent to the model"),
                ),
        )
        .subcommand(
            Command::new("check-result")
                .about("Check generated itinerary JSON against the result schema")
                .arg(file_arg("Raw generator output"))
                .arg(
                    Arg::new("days")
                        .short('d')
                        .long("days")
                        .value_name("N")
                        .value_parser(value_parser!(u32))
                        .help("Expected trip length in days"),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Generate an itinerary for a trip request and render it to PDF")
                .arg(file_arg("Trip request JSON file"))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the PDF here instead of the output directory"),
                ),
        )
}

/// CLI entry point for the trip-itinerary tool
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let matches = command().get_matches();
    dispatch(&matches, |key| std::env::var(key).ok()).await
}

async fn dispatch<F>(matches: &ArgMatches, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let Some((name, sub)) = matches.subcommand() else {
        bail!("no subcommand given");
    };

    // Only the commands that reach the network or disk read the environment.
    // Global flags are propagated down, so the subcommand sees all of them.
    match name {
        "serve" => run_serve(resolve_config(sub, lookup)?, sub).await,
        "validate" => run_validate(sub).await,
        "compile" => run_compile(sub).await,
        "check-result" => run_check_result(sub).await,
        "plan" => run_plan(resolve_config(sub, lookup)?, sub).await,
        other => bail!("unknown subcommand `{other}`"),
    }
}

fn resolve_config<F>(matches: &ArgMatches, lookup: F) -> anyhow::Result<PlannerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config =
        PlannerConfig::from_lookup(lookup).context("invalid environment configuration")?;

    if let Some(model) = matches.get_one::<String>("model") {
        config = config.with_model(model.as_str());
    }
    if let Some(api_key) = matches.get_one::<String>("api-key") {
        config = config.with_api_key(api_key.as_str());
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(seconds) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_secs(*seconds));
    }

    Ok(config)
}

fn file_path(matches: &ArgMatches) -> anyhow::Result<&PathBuf> {
    matches
        .get_one::<PathBuf>("file")
        .context("missing input file")
}

async fn read_request(matches: &ArgMatches) -> anyhow::Result<TripRequest> {
    let path = file_path(matches)?;
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let deserializer = &mut serde_json::Deserializer::from_str(&text);
    serde_path_to_error::deserialize(deserializer)
        .with_context(|| format!("{} is not a trip request", path.display()))
}

async fn run_serve(mut config: PlannerConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    if let Some(bind) = matches.get_one::<String>("bind") {
        config.bind_addr = parse_bind_addr(bind)?;
    }
    if let Some(dir) = matches.get_one::<PathBuf>("output-dir") {
        config = config.with_output_dir(dir.clone());
    }

    server::serve(&config).await.context("server stopped")
}

async fn run_validate(matches: &ArgMatches) -> anyhow::Result<()> {
    let request = read_request(matches).await?;
    let normalized = validate(&request).context("trip request rejected")?;

    let party = normalized.party();
    println!(
        "valid: mode={} people={}{} trip_length={}",
        normalized.mode().as_str(),
        party.size.label(),
        if party.assumed { " (assumed)" } else { "" },
        normalized
            .trip_length()
            .map(|days| days.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );
    Ok(())
}

async fn run_compile(matches: &ArgMatches) -> anyhow::Result<()> {
    let request = read_request(matches).await?;
    let normalized = validate(&request).context("trip request rejected")?;
    let directive = compile(&normalized);

    if matches.get_flag("with-schema") {
        println!("{}", directive.into_prompt());
    } else {
        println!("{}", directive);
    }
    Ok(())
}

async fn run_check_result(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = file_path(matches)?;
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let itinerary = validate_result(&raw).context("itinerary rejected")?;
    let expected_days = matches.get_one::<u32>("days").copied();
    check_day_sequence(&itinerary, expected_days).context("itinerary rejected")?;

    println!(
        "valid: {} days, {} activities",
        itinerary.day_count(),
        itinerary.activity_count()
    );
    Ok(())
}

async fn run_plan(config: PlannerConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    let request = read_request(matches).await?;
    let planner = TripPlanner::from_config(&config).context("failed to set up the planner")?;

    info!("Using model: {}", config.model);
    info!("Base URL: {}", config.base_url);

    let (trip, pdf) = planner
        .plan_and_render(&request)
        .await
        .context("planning failed")?;

    let location = match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            tokio::fs::write(path, &pdf)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            path.display().to_string()
        }
        None => {
            let store = FsArtifactStore::new(config.output_dir.clone());
            let name = store.put(pdf).await.context("failed to store the PDF")?;
            store.root().join(name).display().to_string()
        }
    };

    println!("{}", serde_json::to_string_pretty(&trip.itinerary)?);
    info!("PDF written to {}", location);
    Ok(())
}
