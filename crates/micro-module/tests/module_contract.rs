//! Property tests for the numeric module's call contract.
//!
//! Covers wrapping arithmetic, raw-memory sums against a reference
//! fold, round-tripping through fresh allocations, and fault
//! detection for ranges past the end of memory.

use micro_core::{MemoryError, NumericModule, Ptr};
use micro_memory::{I32View, I32ViewMut, ModuleConfig, PAGE_SIZE};
use micro_module::NativeModule;
use proptest::prelude::*;

fn reference_sum(values: &[i32]) -> i32 {
    values.iter().fold(0i32, |acc, &v| acc.wrapping_add(v))
}

/// Allocate, encode, and return the pointer (the raw-path steps 1-3).
fn place(module: &mut NativeModule, values: &[i32]) -> Ptr {
    let count = values.len() as u32;
    let ptr = module.malloc(count * 4).unwrap();
    I32ViewMut::new(module.memory_mut(), ptr, count)
        .unwrap()
        .copy_from_slice(values)
        .unwrap();
    ptr
}

proptest! {
    #[test]
    fn add_is_wrapping_addition(a in any::<i32>(), b in any::<i32>()) {
        let module = NativeModule::default();
        prop_assert_eq!(module.add(a, b), a.wrapping_add(b));
        prop_assert_eq!(module.add(a, b), module.add(b, a));
    }

    #[test]
    fn raw_sum_matches_reference(values in proptest::collection::vec(any::<i32>(), 0..256)) {
        let mut module = NativeModule::default();
        let expected = reference_sum(&values);
        if values.is_empty() {
            prop_assert_eq!(module.sum(Ptr::NULL, 0), Ok(0));
        } else {
            let ptr = place(&mut module, &values);
            prop_assert_eq!(module.sum(ptr, values.len() as u32), Ok(expected));
            module.free(ptr).unwrap();
        }
    }

    #[test]
    fn values_round_trip_through_fresh_allocations(
        earlier in proptest::collection::vec(0u32..200, 0..16),
        values in proptest::collection::vec(any::<i32>(), 1..64),
    ) {
        // Earlier allocations shift where the values land; placement must
        // never corrupt them.
        let mut module = NativeModule::default();
        let mut ptrs = Vec::new();
        for size in &earlier {
            ptrs.push(module.malloc(*size).unwrap());
        }
        for ptr in ptrs.iter().step_by(2) {
            module.free(*ptr).unwrap();
        }
        let ptr = place(&mut module, &values);
        let view = I32View::new(module.memory(), ptr, values.len() as u32).unwrap();
        prop_assert_eq!(view.to_vec(), values);
    }

    #[test]
    fn ranges_past_the_end_are_faults(offset in 0u32..PAGE_SIZE, len in 1u32..100_000) {
        let module = NativeModule::default();
        let end = offset as u64 + len as u64 * 4;
        let result = module.sum(Ptr(offset), len);
        if end > module.memory_size() {
            let is_oob = matches!(result, Err(MemoryError::OutOfBounds { .. }));
            prop_assert!(is_oob);
        } else {
            prop_assert_eq!(result, Ok(0));
        }
    }
}

#[test]
fn end_to_end_raw_path() {
    let mut module = NativeModule::default();
    assert_eq!(module.add(1, 3), 4);
    let ptr = module.malloc(12).unwrap();
    I32ViewMut::new(module.memory_mut(), ptr, 3)
        .unwrap()
        .copy_from_slice(&[1, 2, 3])
        .unwrap();
    assert_eq!(module.sum(ptr, 3), Ok(6));
    module.free(ptr).unwrap();
    assert_eq!(module.metrics().live_allocations, 0);
}

#[test]
fn module_at_page_limit_still_serves_freed_space() {
    let mut module = NativeModule::new(ModuleConfig {
        initial_pages: 1,
        max_pages: 1,
        heap_base: 1024,
    })
    .unwrap();
    let big = module.malloc(PAGE_SIZE - 2048).unwrap();
    assert!(module.malloc(2048).is_err());
    module.free(big).unwrap();
    assert!(module.malloc(2048).is_ok());
}
