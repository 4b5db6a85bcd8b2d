use async_trait::async_trait;
use surety_common::{params::INDICES_PER_ORACLE, Address, OracleRequest, Result, StatusCode, Wei};
use surety_consensus::VoteOutcome;
use tokio::sync::broadcast;

use super::app::FlightSuretyApp;

/// What an oracle actor can see and do. The simulator only talks to the
/// protocol through this port.
#[async_trait]
pub trait OracleGateway: Send + Sync {
    async fn register_oracle(&self, oracle: Address, fee: Wei) -> Result<[u8; INDICES_PER_ORACLE]>;

    async fn submit_response(
        &self,
        oracle: &Address,
        request: &OracleRequest,
        status: StatusCode,
    ) -> Result<VoteOutcome>;

    fn subscribe(&self) -> broadcast::Receiver<OracleRequest>;
}

#[async_trait]
impl OracleGateway for FlightSuretyApp {
    async fn register_oracle(&self, oracle: Address, fee: Wei) -> Result<[u8; INDICES_PER_ORACLE]> {
        FlightSuretyApp::register_oracle(self, oracle, fee).await
    }

    async fn submit_response(
        &self,
        oracle: &Address,
        request: &OracleRequest,
        status: StatusCode,
    ) -> Result<VoteOutcome> {
        self.submit_oracle_response(oracle, request, status).await
    }

    fn subscribe(&self) -> broadcast::Receiver<OracleRequest> {
        FlightSuretyApp::subscribe(self)
    }
}
