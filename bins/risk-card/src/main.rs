use std::io::IsTerminal;

use clap::Parser;
use client::{ClientState, HttpPredictionApi, Phase, RiskCard};
use common::utils::logging::{init_logging, LogStyle};
use models::CourierFeatures;
use tracing::info;

/// Ask the courier risk server for one prediction and print the risk card.
#[derive(Debug, Parser)]
#[command(name = "risk-card", version)]
struct Args {
    /// Base URL of the courier risk server
    #[arg(long, env = "RISK_SERVER_URL", default_value = "http://127.0.0.1:8081")]
    server: String,
    #[arg(long, default_value_t = 5)]
    past_late_count: u32,
    #[arg(long, default_value_t = 2)]
    leave_frequency: u32,
    /// Minutes
    #[arg(long, default_value_t = 15.5)]
    avg_delivery_time: f64,
    #[arg(long, default_value_t = 4.2)]
    rating: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LogStyle::Cli);
    let args = Args::parse();

    let features = CourierFeatures {
        past_late_count: args.past_late_count,
        leave_frequency: args.leave_frequency,
        avg_delivery_time: args.avg_delivery_time,
        rating: args.rating,
    };
    features.validate()?;

    let api = HttpPredictionApi::new(&args.server);
    info!(endpoint = api.endpoint(), "requesting prediction");

    let mut state = ClientState::new();
    let phase = state.fetch_prediction(&api, &features).await;
    match (phase, state.prediction_result) {
        (Phase::Success, Some(result)) => {
            let card = RiskCard::new(result.risk_score);
            println!("courier {}", result.courier_id);
            println!("{}", card.render(std::io::stdout().is_terminal()));
            if result.recommend_replacement {
                println!("replacement recommended");
            }
            Ok(())
        }
        _ => {
            let message = state.error.unwrap_or_else(|| "no prediction received".to_string());
            anyhow::bail!(message)
        }
    }
}
