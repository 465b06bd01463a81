use proptest::prelude::*;

use deploykit_core::config::SimulationConfig;
use deploykit_core::models::EnvironmentName;

/// Strategy for suite sizes, including empty suites
pub fn suite_total_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), Just(1u32), 0u32..2_000]
}

/// Strategy for raw draws from a random source
pub fn draw_strategy() -> impl Strategy<Value = f64> {
    0.0f64..1.0
}

pub fn environment_strategy() -> impl Strategy<Value = EnvironmentName> {
    prop_oneof![
        Just(EnvironmentName::Dev),
        Just(EnvironmentName::Stage),
        Just(EnvironmentName::Prod),
    ]
}

/// Strategy for valid simulation settings
pub fn simulation_config_strategy() -> impl Strategy<Value = SimulationConfig> {
    (
        0u64..5_000,
        0u64..5_000,
        0.0f64..=1.0,
        0.0f64..=1.0,
        0.0f64..=1.0,
    )
        .prop_map(|(a, b, pass_probability, f1, f2)| SimulationConfig {
            min_run_delay_ms: a.min(b),
            max_run_delay_ms: a.max(b),
            pass_probability,
            min_failure_fraction: f1.min(f2),
            max_failure_fraction: f1.max(f2),
            ..SimulationConfig::default()
        })
}
