//! Module and value-sequence fixtures.

use micro_memory::ModuleConfig;
use micro_module::NativeModule;

/// A default-configured module with `max_pages` of headroom.
pub fn small_module(max_pages: u32) -> NativeModule {
    NativeModule::new(ModuleConfig {
        max_pages,
        ..ModuleConfig::default()
    })
    .unwrap()
}

/// A module pinned to a single page that can never grow.
pub fn tight_module() -> NativeModule {
    NativeModule::new(ModuleConfig {
        initial_pages: 1,
        max_pages: 1,
        heap_base: ModuleConfig::DEFAULT_HEAP_BASE,
    })
    .unwrap()
}

/// `1, 2, ..., n`.
pub fn ramp(n: usize) -> Vec<i32> {
    (1..=n as i32).collect()
}

/// `i32::MAX, i32::MIN, i32::MAX, ...`, for exercising wrap-around.
pub fn alternating_extremes(n: usize) -> Vec<i32> {
    (0..n)
        .map(|i| if i % 2 == 0 { i32::MAX } else { i32::MIN })
        .collect()
}
