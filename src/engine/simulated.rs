//! Stub engine producing pseudo-random, coin-flip biased results.
//!
//! There is no detection model behind this engine. After a fixed delay it
//! flips a coin, then draws a score, a confidence and four feature values
//! from ranges that lean toward the chosen outcome. It exists so the rest of
//! the pipeline can be exercised end to end.

use super::AnalysisEngine;
use crate::domain::{AnalysisResult, DetectorError, FeatureScore, ImageHandle, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

/// Default simulated latency in milliseconds.
pub const DEFAULT_LATENCY_MS: u64 = 2500;

/// Feature catalogue: name, description, and the `(base, span)` ranges used
/// when the coin lands on manipulated and on authentic respectively.
const FEATURES: [(&str, &str, (f64, f64), (f64, f64)); 4] = [
    (
        "Facial Inconsistencies",
        "Analysis of facial features for unnatural distortions and asymmetry.",
        (0.7, 0.3),
        (0.0, 0.4),
    ),
    (
        "Blending Artifacts",
        "Detection of artifacts at boundaries where synthetic elements are merged.",
        (0.6, 0.3),
        (0.0, 0.5),
    ),
    (
        "Texture Coherence",
        "Evaluation of skin texture and detail consistency throughout the image.",
        (0.5, 0.3),
        (0.0, 0.4),
    ),
    (
        "Color Consistency",
        "Analysis of color and lighting patterns that may indicate manipulation.",
        (0.4, 0.5),
        (0.0, 0.3),
    ),
];

/// Simulated analysis engine.
#[derive(Debug)]
pub struct SimulatedEngine {
    latency: Duration,
    failure_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedEngine {
    /// Creates an engine seeded from the operating system.
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            failure_rate: 0.0,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Creates a deterministic engine for reproducible runs.
    #[must_use]
    pub fn with_seed(latency: Duration, seed: u64) -> Self {
        Self {
            latency,
            failure_rate: 0.0,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Creates an engine from the session configuration.
    #[must_use]
    pub fn from_config(config: &crate::Config) -> Self {
        Self::new(Duration::from_millis(config.simulated_latency_ms))
            .with_failure_rate(config.simulated_failure_rate)
    }

    /// Sets the probability in `[0, 1]` that an analysis is rejected.
    #[must_use]
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    /// Configured latency.
    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }

    /// Draws one outcome.
    fn draw(&self) -> Result<AnalysisResult> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| DetectorError::AnalysisFailure(format!("random source poisoned: {e}")))?;

        if self.failure_rate > 0.0 && rng.random::<f64>() < self.failure_rate {
            return Err(DetectorError::AnalysisFailure(
                "simulated backend rejected the image".to_string(),
            ));
        }

        let is_fake = rng.random::<f64>() > 0.5;

        let score = if is_fake {
            0.65 + rng.random::<f64>() * 0.35
        } else {
            rng.random::<f64>() * 0.45
        };
        let confidence = 0.7 + rng.random::<f64>() * 0.3;

        let features = FEATURES
            .iter()
            .map(|&(name, description, fake, authentic)| {
                let (base, span) = if is_fake { fake } else { authentic };
                FeatureScore::new(name, base + rng.random::<f64>() * span, description)
            })
            .collect();

        AnalysisResult::new(score, confidence, features)
    }
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_LATENCY_MS))
    }
}

#[async_trait]
impl AnalysisEngine for SimulatedEngine {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn analyze(&self, image: &ImageHandle) -> Result<AnalysisResult> {
        tracing::debug!(
            image = %image.display_name(),
            size = image.size(),
            latency_ms = u64::try_from(self.latency.as_millis()).unwrap_or(u64::MAX),
            "simulated analysis started"
        );

        tokio::time::sleep(self.latency).await;

        let result = self.draw();
        match &result {
            Ok(r) => tracing::debug!(score = r.score, confidence = r.confidence, "simulated analysis finished"),
            Err(e) => tracing::debug!(error = %e, "simulated analysis rejected"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ImageUpload, DEFAULT_MAX_BYTES};

    fn image() -> ImageHandle {
        ImageHandle::from_upload(
            ImageUpload::new(None, "image/jpeg", vec![0xff, 0xd8, 0xff]),
            DEFAULT_MAX_BYTES,
        )
        .unwrap()
    }

    #[test]
    fn draws_respect_biased_ranges() {
        let engine = SimulatedEngine::with_seed(Duration::ZERO, 42);
        for _ in 0..500 {
            let result = engine.draw().unwrap();
            assert_eq!(result.features.len(), 4);
            assert!((0.7..=1.0).contains(&result.confidence));
            if result.is_manipulated() {
                assert!(result.score >= 0.65);
                assert!(result.features[0].value >= 0.7);
                assert!(result.features[3].value >= 0.4);
            } else {
                assert!(result.score < 0.45);
                assert!(result.features[0].value < 0.4);
                assert!(result.features[1].value < 0.5);
            }
        }
    }

    #[test]
    fn both_outcomes_occur() {
        let engine = SimulatedEngine::with_seed(Duration::ZERO, 7);
        let fakes = (0..200).filter(|_| engine.draw().unwrap().is_manipulated()).count();
        assert!(fakes > 40 && fakes < 160, "fakes = {fakes}");
    }

    #[test]
    fn same_seed_same_results() {
        let a = SimulatedEngine::with_seed(Duration::ZERO, 99);
        let b = SimulatedEngine::with_seed(Duration::ZERO, 99);
        assert_eq!(a.draw().unwrap(), b.draw().unwrap());
    }

    #[test]
    fn full_failure_rate_always_rejects() {
        let engine = SimulatedEngine::with_seed(Duration::ZERO, 1).with_failure_rate(1.0);
        assert!(matches!(engine.draw(), Err(DetectorError::AnalysisFailure(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn analysis_waits_for_configured_latency() {
        let engine = SimulatedEngine::with_seed(Duration::from_millis(2500), 3);
        let started = tokio::time::Instant::now();
        let result = engine.analyze(&image()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2500));
        assert!(result.validate().is_ok());
    }
}
