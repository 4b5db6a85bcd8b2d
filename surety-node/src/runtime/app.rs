use std::{path::Path, sync::Arc};

use surety_bank::{escrow::payout::PayoutPolicy, EscrowEngine, Purchase, UnderwritingService};
use surety_common::{
    params::{AIRLINE_FUNDING, INDEX_SPACE, INDICES_PER_ORACLE, MAX_PREMIUM, MIN_RESPONSES, REGISTRATION_FEE},
    Address, FlightEvent, FlightKey, OracleRequest, Result, StatusCode, SuretyError, Wei,
};
use surety_consensus::{ChainEntropy, ConsensusCoordinator, OracleRegistry, QuorumPolicy, VoteOutcome};
use surety_ledger::{airline, storage::save_snapshot, AdminGate, Administrator, AirlineDirectory, LedgerStore};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

/// Capacity of the request event channel. Slow oracles that fall further
/// behind than this miss requests.
const REQUEST_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    pub registration_fee: Wei,
    pub max_premium: Wei,
    pub quorum: usize,
    pub seed: Option<u64>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            registration_fee: REGISTRATION_FEE,
            max_premium: MAX_PREMIUM,
            quorum: MIN_RESPONSES,
            seed: None,
        }
    }
}

/// Everything the protocol mutates. Only ever touched behind the app's lock.
#[derive(Debug)]
pub struct SuretyState {
    pub store: LedgerStore,
    pub admin: Administrator,
    pub coordinator: ConsensusCoordinator,
    pub entropy: ChainEntropy,
    pub underwriting: UnderwritingService,
}

/// The coordinating application: the one principal authorized to call into
/// escrow, and the single serialization point for every mutation.
///
/// Each operation takes the state lock once and does all of its work under
/// it, so no two mutations ever interleave.
#[derive(Clone)]
pub struct FlightSuretyApp {
    address: Address,
    state: Arc<Mutex<SuretyState>>,
    requests: broadcast::Sender<OracleRequest>,
}

impl FlightSuretyApp {
    /// Deploys the data layer with `first_airline` registered, then the app
    /// at `address`, and authorizes the app on the data layer.
    pub fn deploy(
        owner: Address,
        address: Address,
        first_airline: Address,
        first_airline_name: &str,
        settings: AppSettings,
    ) -> Result<Self> {
        let mut admin = Administrator::new(owner);
        admin.authorize(&owner, address)?;

        let registry = OracleRegistry::new(settings.registration_fee, INDEX_SPACE);
        let coordinator = ConsensusCoordinator::new(
            address,
            registry,
            QuorumPolicy::new(settings.quorum),
            EscrowEngine::new(PayoutPolicy::default()),
        );
        let entropy = match settings.seed {
            Some(seed) => ChainEntropy::from_seed(seed),
            None => ChainEntropy::from_entropy(),
        };

        let state = SuretyState {
            store: LedgerStore::with_first_airline(first_airline, first_airline_name),
            admin,
            coordinator,
            entropy,
            underwriting: UnderwritingService::standard(settings.max_premium),
        };
        let (requests, _) = broadcast::channel(REQUEST_CHANNEL_CAPACITY);

        info!("🚀 FlightSurety deployed at {} (owner {}, first airline {})", address, owner, first_airline);
        Ok(Self {
            address,
            state: Arc::new(Mutex::new(state)),
            requests,
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Request events, in issue order. Subscribe before requesting.
    pub fn subscribe(&self) -> broadcast::Receiver<OracleRequest> {
        self.requests.subscribe()
    }

    pub async fn is_operational(&self) -> bool {
        self.state.lock().await.admin.is_operational()
    }

    pub async fn set_operational_status(&self, caller: &Address, mode: bool) -> Result<()> {
        self.state.lock().await.admin.set_operational_status(caller, mode)
    }

    /// An already registered airline registers another one.
    pub async fn register_airline(&self, caller: &Address, airline: Address, name: &str) -> Result<()> {
        let mut guard = self.state.lock().await;
        let SuretyState { store, admin, .. } = &mut *guard;

        if !store.is_registered(caller) {
            return Err(SuretyError::NotAuthorizedCaller(*caller));
        }
        airline::register_airline(store, admin, &self.address, airline, name)
    }

    /// Funds a registered airline. The deposit must cover the funding minimum.
    pub async fn fund_airline(&self, airline: Address, deposit: Wei) -> Result<()> {
        let mut guard = self.state.lock().await;
        let SuretyState { store, admin, .. } = &mut *guard;

        admin.require_operational()?;
        if !store.is_registered(&airline) {
            return Err(SuretyError::AirlineNotRegistered(airline));
        }
        if deposit < AIRLINE_FUNDING {
            return Err(SuretyError::InsufficientFee {
                paid: deposit,
                required: AIRLINE_FUNDING,
            });
        }
        airline::fund_airline(store, admin, &self.address, airline)
    }

    pub async fn is_airline_funded(&self, airline: &Address) -> bool {
        self.state.lock().await.store.is_funded(airline)
    }

    /// Underwrites the purchase, then records it in escrow.
    pub async fn buy_insurance(&self, purchase: &Purchase) -> Result<FlightKey> {
        let mut guard = self.state.lock().await;
        let SuretyState {
            store,
            admin,
            coordinator,
            underwriting,
            ..
        } = &mut *guard;

        admin.require_operational()?;
        underwriting.check(purchase, store)?;

        let key = purchase.flight_key();
        coordinator
            .escrow()
            .buy(store, admin, &self.address, purchase.passenger, key, purchase.amount)?;
        Ok(key)
    }

    pub async fn register_oracle(&self, oracle: Address, fee: Wei) -> Result<[u8; INDICES_PER_ORACLE]> {
        let mut guard = self.state.lock().await;
        let SuretyState {
            store,
            admin,
            coordinator,
            entropy,
            ..
        } = &mut *guard;

        coordinator.registry().register(store, admin, &self.address, oracle, fee, entropy)
    }

    pub async fn get_my_indexes(&self, oracle: &Address) -> Result<[u8; INDICES_PER_ORACLE]> {
        let guard = self.state.lock().await;
        guard.coordinator.registry().indexes_of(&guard.store, oracle)
    }

    /// Opens a status request and announces it to oracles.
    pub async fn fetch_flight_status(
        &self,
        requester: &Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<OracleRequest> {
        let request = {
            let mut guard = self.state.lock().await;
            let SuretyState {
                admin,
                coordinator,
                entropy,
                ..
            } = &mut *guard;
            coordinator.request_status(admin, requester, airline, flight, timestamp, entropy)?
        };

        if self.requests.send(request.clone()).is_err() {
            debug!("No oracle is listening for {}", request);
        }
        Ok(request)
    }

    pub async fn submit_oracle_response(
        &self,
        oracle: &Address,
        request: &OracleRequest,
        status: StatusCode,
    ) -> Result<VoteOutcome> {
        let mut guard = self.state.lock().await;
        let SuretyState {
            store,
            admin,
            coordinator,
            ..
        } = &mut *guard;

        coordinator.submit_vote(store, admin, oracle, request, status)
    }

    pub async fn flight_status(&self, airline: &Address, flight: &str, timestamp: u64) -> Option<StatusCode> {
        self.state.lock().await.coordinator.flight_status(airline, flight, timestamp)
    }

    pub async fn balance_of(&self, passenger: &Address) -> Wei {
        let guard = self.state.lock().await;
        guard.coordinator.escrow().balance_of(&guard.store, passenger)
    }

    pub async fn insured_amount(&self, passenger: &Address, key: &FlightKey) -> Wei {
        let guard = self.state.lock().await;
        guard.coordinator.escrow().insured_amount(&guard.store, passenger, key)
    }

    pub async fn history_of(&self, passenger: &Address) -> Vec<FlightKey> {
        let guard = self.state.lock().await;
        guard.coordinator.escrow().history_of(&guard.store, passenger)
    }

    pub async fn withdraw(&self, passenger: Address) -> Result<Wei> {
        let mut guard = self.state.lock().await;
        let SuretyState {
            store,
            admin,
            coordinator,
            ..
        } = &mut *guard;

        coordinator.escrow().withdraw(store, admin, &self.address, passenger)
    }

    /// Position just past the newest journal entry.
    pub async fn event_cursor(&self) -> usize {
        self.state.lock().await.coordinator.journal().len()
    }

    /// Journal entries appended at or after `cursor`.
    pub async fn events_since(&self, cursor: usize) -> Vec<FlightEvent> {
        self.state.lock().await.coordinator.journal().since(cursor).to_vec()
    }

    pub async fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let guard = self.state.lock().await;
        save_snapshot(path, &guard.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surety_common::params::ONE_ETHER;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    fn deploy() -> FlightSuretyApp {
        let settings = AppSettings {
            seed: Some(5),
            ..Default::default()
        };
        FlightSuretyApp::deploy(addr(1), addr(2), addr(3), "#1 Airline", settings).unwrap()
    }

    fn purchase(airline: Address, amount: Wei) -> Purchase {
        Purchase {
            passenger: addr(10),
            airline,
            flight: "ND1309".to_string(),
            timestamp: 1_700_000_000,
            amount,
        }
    }

    #[tokio::test]
    async fn test_airline_must_be_funded_before_insurance() {
        let app = deploy();

        let res = app.buy_insurance(&purchase(addr(3), ONE_ETHER)).await;
        assert!(matches!(res, Err(SuretyError::AirlineNotFunded(_))));

        let res = app.fund_airline(addr(3), ONE_ETHER).await;
        assert!(matches!(res, Err(SuretyError::InsufficientFee { .. })));

        app.fund_airline(addr(3), AIRLINE_FUNDING).await.unwrap();
        assert!(app.is_airline_funded(&addr(3)).await);

        let key = app.buy_insurance(&purchase(addr(3), ONE_ETHER)).await.unwrap();
        assert_eq!(app.insured_amount(&addr(10), &key).await, ONE_ETHER);
        assert_eq!(app.history_of(&addr(10)).await, vec![key]);
    }

    #[tokio::test]
    async fn test_premium_cap() {
        let app = deploy();
        app.fund_airline(addr(3), AIRLINE_FUNDING).await.unwrap();

        let res = app.buy_insurance(&purchase(addr(3), ONE_ETHER + 1)).await;
        assert!(matches!(res, Err(SuretyError::PremiumTooHigh { .. })));
    }

    #[tokio::test]
    async fn test_only_registered_airlines_register_airlines() {
        let app = deploy();

        let res = app.register_airline(&addr(50), addr(4), "Rogue Air").await;
        assert!(matches!(res, Err(SuretyError::NotAuthorizedCaller(_))));

        app.register_airline(&addr(3), addr(4), "#2 Airline").await.unwrap();
        app.fund_airline(addr(4), AIRLINE_FUNDING).await.unwrap();
        assert!(app.is_airline_funded(&addr(4)).await);
    }

    #[tokio::test]
    async fn test_request_is_broadcast_to_subscribers() {
        let app = deploy();
        let mut rx = app.subscribe();

        let request = app.fetch_flight_status(&addr(10), addr(3), "ND1309", 1_700_000_000).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), request);
        assert!(request.index < INDEX_SPACE);
        assert_eq!(app.events_since(0).await, vec![FlightEvent::OracleRequested(request)]);
    }

    #[tokio::test]
    async fn test_pause_blocks_purchases_and_requests() {
        let app = deploy();
        app.fund_airline(addr(3), AIRLINE_FUNDING).await.unwrap();
        app.set_operational_status(&addr(1), false).await.unwrap();
        assert!(!app.is_operational().await);

        let res = app.buy_insurance(&purchase(addr(3), 100)).await;
        assert!(matches!(res, Err(SuretyError::NotOperational)));
        let res = app.fetch_flight_status(&addr(10), addr(3), "ND1309", 1).await;
        assert!(matches!(res, Err(SuretyError::NotOperational)));
        let res = app.register_oracle(addr(20), REGISTRATION_FEE).await;
        assert!(matches!(res, Err(SuretyError::NotOperational)));
    }

    #[tokio::test]
    async fn test_register_oracle_then_read_indexes() {
        let app = deploy();
        let indexes = app.register_oracle(addr(20), REGISTRATION_FEE).await.unwrap();
        assert_eq!(app.get_my_indexes(&addr(20)).await.unwrap(), indexes);
        assert!(matches!(
            app.get_my_indexes(&addr(21)).await,
            Err(SuretyError::NotRegistered(_))
        ));
    }
}
