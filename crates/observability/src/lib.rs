use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    queries_total: AtomicU64,
    no_place_total: AtomicU64,
    weather_calls_total: AtomicU64,
    places_calls_total: AtomicU64,
    short_circuit_total: AtomicU64,
    degraded_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub queries_total: u64,
    pub no_place_total: u64,
    pub weather_calls_total: u64,
    pub places_calls_total: u64,
    pub short_circuit_total: u64,
    pub degraded_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_query(&self) {
        self.queries_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("voyage_queries_total").increment(1);
    }

    pub fn inc_no_place(&self) {
        self.no_place_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("voyage_no_place_total").increment(1);
    }

    pub fn inc_weather_call(&self) {
        self.weather_calls_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("voyage_lookup_calls_total", "lookup" => "weather").increment(1);
    }

    pub fn inc_places_call(&self) {
        self.places_calls_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("voyage_lookup_calls_total", "lookup" => "places").increment(1);
    }

    pub fn inc_short_circuit(&self) {
        self.short_circuit_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("voyage_short_circuit_total").increment(1);
    }

    pub fn inc_degraded(&self) {
        self.degraded_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("voyage_degraded_total").increment(1);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
        metrics::histogram!("voyage_query_latency_seconds").record(duration.as_secs_f64());
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let queries = self.queries_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            queries_total: queries,
            no_place_total: self.no_place_total.load(Ordering::Relaxed),
            weather_calls_total: self.weather_calls_total.load(Ordering::Relaxed),
            places_calls_total: self.places_calls_total.load(Ordering::Relaxed),
            short_circuit_total: self.short_circuit_total.load(Ordering::Relaxed),
            degraded_total: self.degraded_total.load(Ordering::Relaxed),
            avg_latency_millis: if queries == 0 {
                0.0
            } else {
                latency as f64 / queries as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,voyage_agents=info,voyage_lookups=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
