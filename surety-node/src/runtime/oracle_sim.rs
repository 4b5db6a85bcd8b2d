use std::{sync::Arc, time::Duration};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use surety_common::{params::INDICES_PER_ORACLE, Address, OracleRequest, StatusCode, Wei};
use surety_consensus::VoteOutcome;
use tokio::{
    sync::{
        broadcast::{self, error::RecvError},
        watch,
    },
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::gateway::OracleGateway;

#[derive(Debug, Clone, Copy)]
pub struct SimulationSettings {
    pub oracle_count: usize,
    /// The first `silent_oracles` actors register but never answer.
    pub silent_oracles: usize,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    /// Every answering oracle reports this status when set.
    pub forced_status: Option<StatusCode>,
    pub registration_fee: Wei,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleActor {
    pub address: Address,
    pub indexes: [u8; INDICES_PER_ORACLE],
    pub silent: bool,
}

impl OracleActor {
    pub fn should_answer(&self, request: &OracleRequest) -> bool {
        !self.silent && self.indexes.contains(&request.index)
    }
}

/// A pool of independent oracle actors reacting to request events.
pub struct OracleSimulator<G: OracleGateway + 'static> {
    gateway: Arc<G>,
    settings: SimulationSettings,
    actors: Vec<OracleActor>,
    rng: StdRng,
}

impl<G: OracleGateway + 'static> OracleSimulator<G> {
    pub fn new(gateway: Arc<G>, settings: SimulationSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            gateway,
            settings,
            actors: Vec::new(),
            rng,
        }
    }

    pub fn actors(&self) -> &[OracleActor] {
        &self.actors
    }

    /// Registers `oracle_count` fresh oracles. A failed registration is
    /// logged and that actor is left out; nothing is retried.
    pub async fn bootstrap(&mut self) -> usize {
        for i in 0..self.settings.oracle_count {
            let address = Address::random(&mut self.rng);
            match self
                .gateway
                .register_oracle(address, self.settings.registration_fee)
                .await
            {
                Ok(indexes) => {
                    debug!("Oracle #{} {} holds {:?}", i, address, indexes);
                    self.actors.push(OracleActor {
                        address,
                        indexes,
                        silent: i < self.settings.silent_oracles,
                    });
                }
                Err(e) => warn!("⚠️ Oracle #{} {} failed to register: {}", i, address, e),
            }
        }

        info!(
            "🔮 {} of {} oracles registered ({} silent)",
            self.actors.len(),
            self.settings.oracle_count,
            self.actors.iter().filter(|a| a.silent).count()
        );
        self.actors.len()
    }

    /// Starts one task per actor. Every actor is subscribed before any task
    /// runs, so no request issued after this returns is missed.
    pub fn spawn(mut self) -> SimulatorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let latency = (
            self.settings.min_latency_ms.min(self.settings.max_latency_ms),
            self.settings.min_latency_ms.max(self.settings.max_latency_ms),
        );

        let mut tasks = Vec::with_capacity(self.actors.len());
        for actor in std::mem::take(&mut self.actors) {
            let runner = ActorRunner {
                gateway: Arc::clone(&self.gateway),
                actor,
                forced_status: self.settings.forced_status,
                latency,
                rng: StdRng::seed_from_u64(self.rng.gen()),
            };
            let requests = self.gateway.subscribe();
            let shutdown = shutdown_rx.clone();
            tasks.push(tokio::spawn(runner.run(requests, shutdown)));
        }

        info!("🛰️ Oracle simulator running with {} actors", tasks.len());
        SimulatorHandle { shutdown_tx, tasks }
    }
}

pub struct SimulatorHandle {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl SimulatorHandle {
    pub fn actor_count(&self) -> usize {
        self.tasks.len()
    }

    /// Stops every actor and waits for them. Responses already in flight may
    /// still land.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!("Oracle actor ended abnormally: {}", e);
            }
        }
        info!("🛑 Oracle simulator stopped");
    }
}

struct ActorRunner<G: OracleGateway + 'static> {
    gateway: Arc<G>,
    actor: OracleActor,
    forced_status: Option<StatusCode>,
    latency: (u64, u64),
    rng: StdRng,
}

impl<G: OracleGateway + 'static> ActorRunner<G> {
    async fn run(
        mut self,
        mut requests: broadcast::Receiver<OracleRequest>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                received = requests.recv() => match received {
                    Ok(request) => self.react(request),
                    Err(RecvError::Lagged(missed)) => {
                        warn!("Oracle {} lagged and missed {} requests", self.actor.address, missed);
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    }

    /// Answers after a random delay in its own task, so a slow answer never
    /// holds up the next request.
    fn react(&mut self, request: OracleRequest) {
        if !self.actor.should_answer(&request) {
            return;
        }

        let status = self.forced_status.unwrap_or_else(|| {
            StatusCode::ALL
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(StatusCode::Unknown)
        });
        let delay = Duration::from_millis(self.rng.gen_range(self.latency.0..=self.latency.1));
        let gateway = Arc::clone(&self.gateway);
        let oracle = self.actor.address;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match gateway.submit_response(&oracle, &request, status).await {
                Ok(VoteOutcome::Settled { status, votes, .. }) => {
                    info!("🏁 Oracle {} closed {} as {} with {} votes", oracle, request, status, votes);
                }
                Ok(outcome) => debug!("Oracle {} voted {} on {}: {:?}", oracle, status, request, outcome),
                Err(e) => warn!("Oracle {} response rejected: {}", oracle, e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use surety_common::{Result, SuretyError};

    /// Gateway double: hands out fixed indexes and records every vote.
    struct RecordingGateway {
        indexes: [u8; INDICES_PER_ORACLE],
        reject_every_other: bool,
        registrations: Mutex<usize>,
        votes: Mutex<Vec<(Address, OracleRequest, StatusCode)>>,
        requests: broadcast::Sender<OracleRequest>,
    }

    impl RecordingGateway {
        fn new(indexes: [u8; INDICES_PER_ORACLE]) -> Self {
            let (requests, _) = broadcast::channel(16);
            Self {
                indexes,
                reject_every_other: false,
                registrations: Mutex::new(0),
                votes: Mutex::new(Vec::new()),
                requests,
            }
        }
    }

    #[async_trait]
    impl OracleGateway for RecordingGateway {
        async fn register_oracle(&self, oracle: Address, _fee: Wei) -> Result<[u8; INDICES_PER_ORACLE]> {
            let mut count = self.registrations.lock().unwrap();
            *count += 1;
            if self.reject_every_other && *count % 2 == 0 {
                return Err(SuretyError::AlreadyRegistered(oracle));
            }
            Ok(self.indexes)
        }

        async fn submit_response(
            &self,
            oracle: &Address,
            request: &OracleRequest,
            status: StatusCode,
        ) -> Result<VoteOutcome> {
            let mut votes = self.votes.lock().unwrap();
            votes.push((*oracle, request.clone(), status));
            Ok(VoteOutcome::Pending { votes: votes.len() })
        }

        fn subscribe(&self) -> broadcast::Receiver<OracleRequest> {
            self.requests.subscribe()
        }
    }

    fn settings(count: usize, silent: usize) -> SimulationSettings {
        SimulationSettings {
            oracle_count: count,
            silent_oracles: silent,
            min_latency_ms: 0,
            max_latency_ms: 5,
            forced_status: Some(StatusCode::LateWeather),
            registration_fee: 1,
            seed: Some(11),
        }
    }

    #[tokio::test]
    async fn test_failed_registrations_are_skipped() {
        let mut gateway = RecordingGateway::new([1, 2, 3]);
        gateway.reject_every_other = true;
        let mut sim = OracleSimulator::new(Arc::new(gateway), settings(6, 0));

        assert_eq!(sim.bootstrap().await, 3);
        assert_eq!(sim.actors().len(), 3);
    }

    #[tokio::test]
    async fn test_only_matching_loud_actors_answer() {
        let gateway = Arc::new(RecordingGateway::new([1, 2, 3]));
        let mut sim = OracleSimulator::new(Arc::clone(&gateway), settings(4, 1));
        sim.bootstrap().await;
        let handle = sim.spawn();
        assert_eq!(handle.actor_count(), 4);

        let wanted = OracleRequest::new(2, Address::from_bytes([9; 20]), "ND1309", 1);
        let ignored = OracleRequest::new(7, Address::from_bytes([9; 20]), "ND1309", 1);
        gateway.requests.send(ignored).unwrap();
        gateway.requests.send(wanted.clone()).unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.shutdown().await;

        let votes = gateway.votes.lock().unwrap();
        assert_eq!(votes.len(), 3);
        assert!(votes
            .iter()
            .all(|(_, req, status)| *req == wanted && *status == StatusCode::LateWeather));
    }

    #[test]
    fn test_should_answer() {
        let actor = OracleActor {
            address: Address::from_bytes([1; 20]),
            indexes: [4, 6, 8],
            silent: false,
        };
        let req = |i| OracleRequest::new(i, Address::from_bytes([2; 20]), "X1", 0);
        assert!(actor.should_answer(&req(6)));
        assert!(!actor.should_answer(&req(5)));

        let silent = OracleActor { silent: true, ..actor };
        assert!(!silent.should_answer(&req(6)));
    }
}
