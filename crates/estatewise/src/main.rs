// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! EstateWise - a retrieval-augmented real-estate assistant.
//!
//! This is the binary entry point.

mod wiring;

use clap::{Parser, Subcommand};
use estatewise_core::types::ExpertWeights;

/// EstateWise - a retrieval-augmented real-estate assistant.
#[derive(Parser, Debug)]
#[command(name = "estatewise", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer one question, consulting the property index when useful.
    Ask {
        /// The user's message.
        prompt: String,
        /// Caller-supplied context (profile, preferences, earlier notes).
        #[arg(long, default_value = "")]
        context: String,
        /// Expert weighting, repeatable.
        #[arg(long = "weight", value_name = "EXPERT=WEIGHT", value_parser = parse_weight)]
        weights: Vec<(String, f64)>,
        /// Print the full response as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show whether a message would trigger property retrieval.
    Decide {
        /// The user's message.
        prompt: String,
    },
    /// Validate configuration and print a redacted summary.
    Config,
}

/// Parses `EXPERT=WEIGHT`.
fn parse_weight(raw: &str) -> Result<(String, f64), String> {
    let (name, weight) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected EXPERT=WEIGHT, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing expert name in `{raw}`"));
    }
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|e| format!("invalid weight in `{raw}`: {e}"))?;
    if !weight.is_finite() {
        return Err(format!("weight must be finite in `{raw}`"));
    }
    Ok((name.to_string(), weight))
}

/// Renders an error with its source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    rendered
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("estatewise={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match estatewise_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            estatewise_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);
    estatewise_agent::recording::register_metrics();

    if let Commands::Config = cli.command {
        print!("{}", wiring::config_summary(&config));
        return;
    }

    let agent = match wiring::build_agent(&config) {
        Ok(agent) => agent,
        Err(e) => {
            eprintln!("estatewise: {}", error_chain(&e));
            std::process::exit(1);
        }
    };

    let outcome = match cli.command {
        Commands::Ask {
            prompt,
            context,
            weights,
            json,
        } => {
            let weights: ExpertWeights = weights.into_iter().collect();
            agent.run(&prompt, &context, &weights).await.map(|response| {
                if json {
                    match serde_json::to_string_pretty(&response) {
                        Ok(rendered) => println!("{rendered}"),
                        Err(e) => eprintln!("estatewise: failed to render response: {e}"),
                    }
                } else {
                    println!("{}", response.final_text);
                }
            })
        }
        Commands::Decide { prompt } => agent
            .decide(&prompt)
            .await
            .map(|use_property_data| println!("{use_property_data}")),
        Commands::Config => Ok(()),
    };

    if let Err(e) = outcome {
        eprintln!("estatewise: {}", error_chain(&e));
        std::process::exit(1);
    }
}
