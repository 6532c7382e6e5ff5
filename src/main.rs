use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use triptime::api::AppState;
use triptime::{
    GoogleMapsClient, OpenAiChatClient, QueryPipeline, TripTimeConfig, booking, cache, web,
};

const EXAMPLE_QUERIES: [&str; 4] = [
    "What is the current travel duration by car between Filoli Historic House & Garden, Woodside, CA to Pulgas Water Temple, Redwood City, CA?",
    "I want to bike from Shoreline Amphitheatre in Mountain View to the Computer History Museum. How long will it take?",
    "time to travel from Chez Panisse to Mezzo in Berkeley",
    "How long will it take me to bike from the Ferry Building in San Francisco to Walgreens?",
];

#[derive(Debug, Parser)]
#[command(name = "triptime")]
#[command(about = "Natural-language travel duration assistant", version)]
struct Cli {
    /// Path to a configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer a single travel-duration question
    Ask {
        /// The question, e.g. "how long to bike from A to B"
        query: Vec<String>,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = TripTimeConfig::load_from_path(cli.config.clone())?;
    init_tracing(&config, cli.verbose);

    if let Err(e) = cache::init(config.cache_path()) {
        warn!("Running without a persistent cache: {e}");
    }

    let model = OpenAiChatClient::new(&config.llm)?;
    let maps = GoogleMapsClient::new(&config)?;

    match cli.command {
        Some(Command::Serve { port }) => {
            let state = AppState {
                model: Arc::new(model),
                maps: Arc::new(maps),
                settings: config.defaults.clone(),
            };
            web::run(state, port).await
        }
        Some(Command::Ask { query }) => {
            let query = query.join(" ");
            if query.trim().is_empty() {
                anyhow::bail!("Please provide a query, e.g. `triptime ask how long to drive from A to B`");
            }
            let pipeline = QueryPipeline::new(&model, &maps, config.defaults.clone());
            answer_and_offer_ride(&pipeline, query.trim()).await
        }
        None => {
            let pipeline = QueryPipeline::new(&model, &maps, config.defaults.clone());
            interactive_loop(&pipeline).await
        }
    }
}

fn init_tracing(config: &TripTimeConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn answer_and_offer_ride(pipeline: &QueryPipeline<'_>, query: &str) -> Result<()> {
    let response = pipeline.process_query(query).await;
    println!("{}\n", response.answer);

    if let Some(trip) = response.trip {
        print!(
            "Request a ride from {} to {}? [y/N] ",
            trip.origin_name, trip.destination_name
        );
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        if matches!(line.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("{}", booking::request_ride_for_trip(&trip));
        }
    }

    Ok(())
}

async fn interactive_loop(pipeline: &QueryPipeline<'_>) -> Result<()> {
    println!("TripTime - travel duration assistant");
    println!("Ask a travel duration question, pick an example by number, or type 'quit'.\n");
    for (index, example) in EXAMPLE_QUERIES.iter().enumerate() {
        println!("  {}. {}", index + 1, example);
    }
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "quit" | "exit") {
            break;
        }

        // A bare number picks the corresponding example query
        let query = match input.parse::<usize>() {
            Ok(n) if (1..=EXAMPLE_QUERIES.len()).contains(&n) => EXAMPLE_QUERIES[n - 1],
            _ => input,
        };

        answer_and_offer_ride(pipeline, query).await?;
    }

    Ok(())
}
