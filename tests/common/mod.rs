#![allow(dead_code)]

use dispatch_contract::clients::{CourierClient, OrderClient};
use dispatch_contract::config::HarnessConfig;
use dispatch_contract::fixture::FixtureTracker;
use dispatch_contract::observability::logging;
use dispatch_contract::rest::{Transport, TransportConfig};
use dispatch_contract::stub::StubServer;

/// One scenario's view of the service: clients, a fixture tracker, and the
/// stub when no live service is configured.
///
/// Field order matters: the tracker releases its fixtures before the stub
/// shuts down.
pub struct TestEnv {
    pub tracker: FixtureTracker,
    pub couriers: CourierClient,
    pub orders: OrderClient,
    pub transport: Transport,
    pub stub: Option<StubServer>,
}

impl TestEnv {
    pub fn start() -> Self {
        logging::init_for_tests();
        let config = HarnessConfig::from_env().expect("harness configuration");

        let (stub, transport_config) = match config.base_url {
            Some(host) => (None, TransportConfig::for_host(&host)),
            None => {
                let stub = StubServer::start().expect("stub server starts");
                let transport_config = stub.transport_config();
                (Some(stub), transport_config)
            }
        };

        let transport = Transport::new(transport_config).expect("http client");

        Self {
            tracker: FixtureTracker::new(&transport),
            couriers: CourierClient::new(transport.clone()),
            orders: OrderClient::new(transport.clone()),
            transport,
            stub,
        }
    }

    /// Always a fresh stub, regardless of configuration.
    pub fn stub_only() -> Self {
        logging::init_for_tests();
        let stub = StubServer::start().expect("stub server starts");
        let transport = Transport::new(stub.transport_config()).expect("http client");

        Self {
            tracker: FixtureTracker::new(&transport),
            couriers: CourierClient::new(transport.clone()),
            orders: OrderClient::new(transport.clone()),
            transport,
            stub: Some(stub),
        }
    }

    pub fn stub(&self) -> &StubServer {
        self.stub.as_ref().expect("scenario requires the stub server")
    }
}
