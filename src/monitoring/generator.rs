//! Synthetic vitals generator.
//!
//! Samples each vital uniformly around its scenario midpoint. The spread
//! widens with the tick count (capped), and every value is clamped into the
//! vital's hard physiological bound before it leaves this module.

use chrono::Utc;
use rand::Rng;

use crate::config::{NOISE_CAP, NOISE_PER_TICK};
use crate::models::{Scenario, VitalType, VitalsSample};

use super::scenario;
use super::types::round1;

/// Extra half-width applied at `tick`.
pub fn noise_for_tick(tick: u64) -> f64 {
    (tick as f64 * NOISE_PER_TICK).min(NOISE_CAP)
}

/// Produce one sample for `scenario` at `tick`. Pure apart from `rng` and the clock.
pub fn generate<R: Rng + ?Sized>(scenario: Scenario, tick: u64, rng: &mut R) -> VitalsSample {
    let table = scenario::profile(scenario);
    let noise = noise_for_tick(tick);

    let mut sample = VitalsSample::uniform(0.0, Utc::now());
    for vital in VitalType::ALL {
        let range = table.range(vital);
        let mid = range.midpoint();
        let spread = range.half_width() + noise;
        let raw = if spread > 0.0 {
            rng.gen_range((mid - spread)..=(mid + spread))
        } else {
            mid
        };
        sample.set(vital, vital.clamp(round1(raw)));
    }

    sample
}

/// String-keyed entry point. Unknown scenario names generate as `normal`.
pub fn generate_named<R: Rng + ?Sized>(name: &str, tick: u64, rng: &mut R) -> VitalsSample {
    generate(scenario::resolve_or_normal(name), tick, rng)
}
