use clap::Parser;
use philia_core::InteractionMetrics;
use philia_profile::{MetricsEngine, SqliteProfiles};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the profile database
    #[arg(short, long, default_value = "philia.db")]
    db: String,

    /// Subject identifier whose metrics are tracked
    #[arg(short, long, default_value = "local")]
    subject: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    info!("Opening profile store at {}...", args.db);
    let store = SqliteProfiles::new(&args.db).await?;
    store.ensure_profile(&args.subject).await?;
    let engine = MetricsEngine::new(Arc::new(store));

    println!("Philia metrics console. Enter a user line, then the companion's reply.");
    println!("Type 'show' for the stored snapshot, 'quit' to exit.");

    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("you> ");
        io::stdout().flush()?;
        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let user_message = input.trim().to_string();

        if user_message == "quit" || user_message == "exit" {
            break;
        }

        if user_message == "show" {
            match engine.current(&args.subject).await {
                Ok(Some(metrics)) => print_snapshot(&metrics),
                Ok(None) => println!("No metrics recorded yet."),
                Err(e) => {
                    error!("Failed to read metrics: {}", e);
                    println!("[Store Error]: {}", e);
                }
            }
            continue;
        }

        if user_message.is_empty() {
            continue;
        }

        print!("companion> ");
        io::stdout().flush()?;
        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let bot_response = input.trim().to_string();

        match engine
            .update_metrics(&args.subject, &user_message, &bot_response)
            .await
        {
            Ok(metrics) => print_snapshot(&metrics),
            Err(e) => println!("[Store Error]: {}", e),
        }
    }

    Ok(())
}

fn print_snapshot(metrics: &InteractionMetrics) {
    println!(
        "flirt {}/10 | charm {}/10 | witty {} | energy {} | style {}",
        metrics.flirt_level,
        metrics.charm_factor,
        metrics.witty_exchanges,
        metrics.energy_level.as_str(),
        metrics.connection_style.as_str()
    );
}
