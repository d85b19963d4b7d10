use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use voyage_agents::TravelAgent;
use voyage_core::QueryReply;
use voyage_lookups::{HttpLookups, LookupConfig, OverpassPlacesClient, WeatherApiClient};
use voyage_observability::{init_tracing, AppMetrics};

type Agent = TravelAgent<WeatherApiClient, OverpassPlacesClient>;

#[derive(Debug, Parser)]
#[command(name = "voyage")]
#[command(about = "Ask about the weather and places to visit in any city")]
struct Cli {
    /// WeatherAPI key; falls back to WEATHER_API_KEY.
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    weather_api_key: Option<String>,

    /// Maximum number of places listed per answer.
    #[arg(long, env = "VOYAGE_MAX_PLACES")]
    max_places: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer a single query.
    Ask {
        text: String,
        /// Print the diagnostic trace after the answer.
        #[arg(long)]
        trace: bool,
        /// Print the answer and trace as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Interactive mode.
    Chat {
        #[arg(long)]
        trace: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing("voyage_cli");
    let cli = Cli::parse();

    let mut config = LookupConfig::from_env();
    if let Some(key) = cli.weather_api_key.filter(|key| !key.trim().is_empty()) {
        config.weather_api_key = Some(key);
    }
    if let Some(max_places) = cli.max_places.filter(|value| *value > 0) {
        config.max_places = max_places;
    }

    let agent = build_agent(&config)?;

    match cli.command {
        Command::Ask { text, trace, json } => {
            let reply = agent.handle(&text).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                print_reply(&reply, trace)?;
            }
        }
        Command::Chat { trace } => run_chat(agent, trace).await?,
    }

    Ok(())
}

async fn run_chat(agent: Agent, show_trace: bool) -> Result<()> {
    println!("Voyage concierge. Ask about the weather or places to visit; type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        let reply = agent.handle(message).await;
        println!();
        print_reply(&reply, show_trace)?;
        println!();
    }

    Ok(())
}

fn print_reply(reply: &QueryReply, show_trace: bool) -> Result<()> {
    println!("{}", reply.response);

    if show_trace {
        println!("\nTrace:");
        println!(
            "{}",
            serde_json::to_string_pretty(&reply.trace).context("failed to serialize trace")?
        );
    }

    Ok(())
}

fn build_agent(config: &LookupConfig) -> Result<Agent> {
    let lookups = HttpLookups::from_config(config).context("failed to set up lookups")?;
    Ok(TravelAgent::new(
        lookups.weather,
        lookups.places,
        AppMetrics::shared(),
    ))
}
