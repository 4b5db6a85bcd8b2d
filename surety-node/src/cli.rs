use clap::Parser;
use surety_common::{Result, StatusCode};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "surety-node")]
#[command(about = "FlightSurety oracle consensus and insurance escrow simulator")]
pub struct Args {
    /// Config file; a default one is written when missing
    #[arg(long, default_value = "surety.json")]
    pub config: String,

    /// Seed for every random source, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of oracles to register
    #[arg(long)]
    pub oracles: Option<usize>,

    /// Status code every oracle reports (0, 10, 20, 30, 40 or 50)
    #[arg(long)]
    pub forced_status: Option<u8>,

    /// Write the final ledger state to this file
    #[arg(long)]
    pub snapshot: Option<String>,
}

impl Args {
    /// Command line values win over the file.
    pub fn apply_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(oracles) = self.oracles {
            config.oracle_count = oracles;
        }
        if let Some(code) = self.forced_status {
            config.forced_status = Some(StatusCode::try_from(code)?);
        }
        if let Some(path) = &self.snapshot {
            config.snapshot_path = Some(path.clone());
        }
        Ok(())
    }
}
