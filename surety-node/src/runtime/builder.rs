use std::sync::Arc;

use surety_common::{params::AIRLINE_FUNDING, Result, SuretyError};
use tracing::{info, warn};

use super::{
    app::FlightSuretyApp,
    oracle_sim::{OracleSimulator, SimulatorHandle},
};
use crate::config::Config;

pub struct SuretyRuntime {
    pub app: Arc<FlightSuretyApp>,
    pub oracles: SimulatorHandle,
}

impl SuretyRuntime {
    pub async fn shutdown(self) {
        self.oracles.shutdown().await;
    }
}

/// Deploys the application, brings every configured airline on board and
/// starts the oracle pool.
pub async fn build_runtime(config: &Config) -> Result<SuretyRuntime> {
    config.validate()?;

    let first = config
        .airlines
        .first()
        .ok_or_else(|| SuretyError::Config("at least one airline is required".to_string()))?;

    let app = Arc::new(FlightSuretyApp::deploy(
        config.owner,
        config.app_address,
        first.address,
        &first.name,
        config.app_settings(),
    )?);
    info!("🔄 Application deployed. Onboarding {} airlines...", config.airlines.len());

    for airline in config.airlines.iter().skip(1) {
        app.register_airline(&first.address, airline.address, &airline.name).await?;
    }
    for airline in &config.airlines {
        if let Err(e) = app.fund_airline(airline.address, AIRLINE_FUNDING).await {
            warn!("⚠️ Could not fund {}: {}", airline.name, e);
        }
    }

    let mut simulator = OracleSimulator::new(Arc::clone(&app), config.simulation_settings());
    if simulator.bootstrap().await == 0 && config.oracle_count > 0 {
        warn!("⚠️ No oracle registered; requests will never settle");
    }
    let oracles = simulator.spawn();

    info!("✅ Runtime ready");
    Ok(SuretyRuntime { app, oracles })
}
