use std::{collections::HashMap, path::Path, time::Duration};

use clap::Parser;
use surety_bank::Purchase;
use surety_node::{
    cli::Args,
    config::Config,
    logging::init_tracing,
    runtime::{
        builder::build_runtime,
        driver::{settle_flight, RetryPolicy},
    },
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Arguments and config
    let args = Args::parse();
    if !Path::new(&args.config).exists() {
        Config::default().save_to_file(&args.config)?;
        eprintln!("Wrote default config to {}", args.config);
    }
    let mut config = Config::load_from_file(&args.config)?;
    args.apply_overrides(&mut config)?;

    // 2. Logging
    std::fs::create_dir_all(&config.log_dir)?;
    let run_name = Path::new(&args.config)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("surety");
    let _guard = init_tracing(&config.log_dir, run_name);

    info!("--- FLIGHTSURETY ---");
    info!("Config: {}", args.config);

    // 3. Runtime
    let runtime = match build_runtime(&config).await {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to start: {}", e);
            return Err(e.into());
        }
    };
    let app = runtime.app.clone();

    // 4. Flights and purchases
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    let timestamps: HashMap<&str, u64> = config
        .flights
        .iter()
        .map(|f| (f.flight.as_str(), f.timestamp.unwrap_or(now)))
        .collect();

    for bought in &config.purchases {
        let Some(flight) = config.flight(&bought.flight) else {
            continue;
        };
        let purchase = Purchase {
            passenger: bought.passenger,
            airline: flight.airline,
            flight: flight.flight.clone(),
            timestamp: timestamps.get(flight.flight.as_str()).copied().unwrap_or(now),
            amount: bought.amount,
        };
        if let Err(e) = app.buy_insurance(&purchase).await {
            warn!("⚠️ Purchase by {} for {} refused: {}", purchase.passenger, purchase.flight, e);
        }
    }

    // 5. Ask the oracles
    let policy = RetryPolicy {
        attempts: config.settle_attempts,
        attempt_timeout: Duration::from_secs(config.settle_timeout_secs),
        ..Default::default()
    };
    for flight in &config.flights {
        let timestamp = timestamps.get(flight.flight.as_str()).copied().unwrap_or(now);
        match settle_flight(&app, &config.owner, flight.airline, &flight.flight, timestamp, &policy).await {
            Ok(Some(status)) => info!("🛬 {} -> {}", flight.flight, status),
            Ok(None) => warn!("🛬 {} never reached quorum", flight.flight),
            Err(e) => error!("Status request for {} failed: {}", flight.flight, e),
        }
    }

    // 6. Payouts
    for bought in &config.purchases {
        match app.withdraw(bought.passenger).await {
            Ok(0) => info!("👤 {} has nothing to withdraw", bought.passenger),
            Ok(amount) => info!("👤 {} withdrew {} wei", bought.passenger, amount),
            Err(e) => error!("Withdrawal for {} failed: {}", bought.passenger, e),
        }
    }

    if let Some(path) = &config.snapshot_path {
        app.save_snapshot(path).await?;
        info!("💾 Ledger snapshot written to {}", path);
    }

    runtime.shutdown().await;
    info!("Done.");
    Ok(())
}
