//! Benchmark profiles and workload generators for micro.
//!
//! - [`reference_config`]: the module configuration benches run against
//! - [`churn_sizes`]: deterministic allocation sizes for alloc/free churn
//! - [`value_batch`]: deterministic integer payloads for `sum`

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use micro_memory::ModuleConfig;
use micro_module::NativeModule;

/// Module configuration for benchmarks: 1 initial page, room for 64 MiB.
pub fn reference_config() -> ModuleConfig {
    ModuleConfig {
        initial_pages: 1,
        max_pages: 1024,
        heap_base: ModuleConfig::DEFAULT_HEAP_BASE,
    }
}

/// A fresh module built from [`reference_config`].
pub fn reference_module() -> NativeModule {
    NativeModule::new(reference_config()).unwrap()
}

fn lcg(state: u64) -> u64 {
    state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

/// `n` allocation sizes in `[0, max_size]`, reproducible from `seed`.
pub fn churn_sizes(n: usize, max_size: u32, seed: u64) -> Vec<u32> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = lcg(state);
            ((state >> 33) % (max_size as u64 + 1)) as u32
        })
        .collect()
}

/// `n` integers spanning the full `i32` range, reproducible from `seed`.
pub fn value_batch(n: usize, seed: u64) -> Vec<i32> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = lcg(state);
            (state >> 32) as u32 as i32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_config_validates() {
        reference_config().validate().unwrap();
        let _ = reference_module();
    }

    #[test]
    fn generators_are_deterministic_and_bounded() {
        assert_eq!(churn_sizes(64, 512, 7), churn_sizes(64, 512, 7));
        assert!(churn_sizes(1000, 512, 7).iter().all(|&s| s <= 512));
        assert_ne!(value_batch(16, 1), value_batch(16, 2));
        assert_eq!(value_batch(100, 3).len(), 100);
    }
}
