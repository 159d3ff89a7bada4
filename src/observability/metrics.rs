use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub couriers_registered: IntGauge,
    pub order_transitions_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let couriers_registered =
            IntGauge::new("couriers_registered", "Courier accounts currently registered")
                .expect("valid couriers_registered metric");

        let order_transitions_total = IntCounterVec::new(
            Opts::new(
                "order_transitions_total",
                "Order lifecycle transitions by kind",
            ),
            &["transition"],
        )
        .expect("valid order_transitions_total metric");

        registry
            .register(Box::new(couriers_registered.clone()))
            .expect("register couriers_registered");
        registry
            .register(Box::new(order_transitions_total.clone()))
            .expect("register order_transitions_total");

        Self {
            registry,
            couriers_registered,
            order_transitions_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
