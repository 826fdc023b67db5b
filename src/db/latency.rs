use std::time::Duration;

use rand::Rng;

use crate::core::config::Settings;

/// Simulated round-trip delay applied before every storage call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Latency {
    None,
    Fixed(Duration),
    Jitter { min: Duration, max: Duration },
}

impl Latency {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        let store = settings.store();
        Self::from_bounds_ms(store.latency_min_ms, store.latency_max_ms)
    }

    pub(crate) fn from_bounds_ms(min_ms: u64, max_ms: u64) -> Self {
        match (min_ms, max_ms) {
            (_, 0) => Latency::None,
            (min, max) if min >= max => Latency::Fixed(Duration::from_millis(max)),
            (min, max) => Latency::Jitter {
                min: Duration::from_millis(min),
                max: Duration::from_millis(max),
            },
        }
    }

    pub(crate) fn sample(&self) -> Duration {
        match *self {
            Latency::None => Duration::ZERO,
            Latency::Fixed(delay) => delay,
            Latency::Jitter { min, max } => {
                let span_ms = max.saturating_sub(min).as_millis() as u64;
                min + Duration::from_millis(rand::thread_rng().gen_range(0..=span_ms))
            }
        }
    }

    pub(crate) async fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
