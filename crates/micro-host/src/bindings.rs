//! Managed-path bindings.
//!
//! [`Bindings`] presents a module's entry points as ordinary functions
//! over Rust values. Slices are marshaled into module memory for the
//! duration of one call and freed before it returns.

use micro_core::NumericModule;

use crate::error::HostError;
use crate::raw::RawBuffer;

/// Value-level wrapper around a module instance.
pub struct Bindings<M> {
    module: M,
}

impl<M: NumericModule> Bindings<M> {
    /// Wrap `module`.
    pub fn new(module: M) -> Self {
        Self { module }
    }

    /// Wrapping `a + b`.
    pub fn add(&self, a: i32, b: i32) -> i32 {
        self.module.add(a, b)
    }

    /// Wrapping sum of `values`, computed by the module.
    ///
    /// An empty slice returns 0 without allocating. Nothing is left
    /// allocated in the module afterwards, whether the call succeeds
    /// or fails.
    pub fn sum(&mut self, values: &[i32]) -> Result<i32, HostError> {
        if values.is_empty() {
            return Ok(0);
        }
        let buffer = RawBuffer::from_values(&mut self.module, values)?;
        let total = buffer.sum()?;
        buffer.release()?;
        Ok(total)
    }

    /// The wrapped module.
    pub fn module(&self) -> &M {
        &self.module
    }

    /// The wrapped module, mutably.
    pub fn module_mut(&mut self) -> &mut M {
        &mut self.module
    }

    /// Unwrap the module.
    pub fn into_inner(self) -> M {
        self.module
    }
}

impl<M: NumericModule + Default> Default for Bindings<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use micro_module::NativeModule;
    use micro_test_utils::{alternating_extremes, tight_module, CountingModule};

    #[test]
    fn add_one_three() {
        let bindings = Bindings::new(NativeModule::default());
        assert_eq!(bindings.add(1, 3), 4);
    }

    #[test]
    fn sum_one_two_three() {
        let mut bindings = Bindings::new(NativeModule::default());
        assert_eq!(bindings.sum(&[1, 2, 3]), Ok(6));
        assert_eq!(bindings.module().metrics().live_allocations, 0);
    }

    #[test]
    fn empty_sum_does_not_touch_the_module() {
        let mut bindings = Bindings::new(CountingModule::new(NativeModule::default()));
        assert_eq!(bindings.sum(&[]), Ok(0));
        let module = bindings.into_inner();
        assert_eq!(module.mallocs(), 0);
        assert_eq!(module.sums(), 0);
    }

    #[test]
    fn sum_wraps_around() {
        let mut bindings: Bindings<NativeModule> = Bindings::default();
        // MAX + MIN == -1, four times.
        assert_eq!(bindings.sum(&alternating_extremes(8)), Ok(-4));
    }

    #[test]
    fn failed_marshal_leaves_nothing_behind() {
        let mut bindings = Bindings::new(tight_module());
        let too_many = vec![1; 20_000];
        assert!(matches!(bindings.sum(&too_many), Err(HostError::Alloc(_))));
        assert_eq!(bindings.module().metrics().live_allocations, 0);
        // Still usable afterwards.
        assert_eq!(bindings.sum(&[2, 2]), Ok(4));
    }

    #[test]
    fn every_call_pairs_malloc_with_free() {
        let mut bindings = Bindings::new(CountingModule::new(NativeModule::default()));
        for n in 1..50 {
            let values: Vec<i32> = (0..n).collect();
            assert_eq!(bindings.sum(&values), Ok(n * (n - 1) / 2));
        }
        let module = bindings.module();
        assert_eq!(module.mallocs(), 49);
        assert_eq!(module.frees(), 49);
        assert_eq!(module.metrics().grow_events, 0);
    }
}
