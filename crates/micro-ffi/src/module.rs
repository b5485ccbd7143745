//! Module lifecycle and call FFI.
//!
//! Each instance lives behind its own `Arc<Mutex<..>>`; the global
//! `MODULES` table is locked only long enough to resolve a handle, so
//! calls on different modules never contend.

use std::sync::{Arc, Mutex};

use micro_core::{NumericModule, Ptr};
use micro_host::Bindings;
use micro_memory::memory::checked_range;
use micro_memory::ModuleConfig;
use micro_module::NativeModule;
use tracing::debug;

use crate::config::MicroModuleConfig;
use crate::handle::HandleTable;
use crate::metrics::MicroMemoryMetrics;
use crate::status::MicroStatus;

type ModuleArc = Arc<Mutex<Bindings<NativeModule>>>;

static MODULES: Mutex<HandleTable<ModuleArc>> = Mutex::new(HandleTable::new());

/// Clone the Arc for a module handle, briefly locking the global table.
///
/// Returns `None` if the handle is invalid or the table is poisoned.
fn get_module(handle: u64) -> Option<ModuleArc> {
    MODULES.lock().ok()?.get(handle).cloned()
}

/// Create a module instance.
///
/// `config` may be null to use the defaults. On success the handle is
/// written to `module_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_module_create(
    config: *const MicroModuleConfig,
    module_out: *mut u64,
) -> i32 {
    ffi_guard!({
        if module_out.is_null() {
            return MicroStatus::InvalidArgument as i32;
        }
        let config = if config.is_null() {
            ModuleConfig::default()
        } else {
            // SAFETY: config is non-null and points to a valid struct per
            // caller contract.
            ModuleConfig::from(unsafe { *config })
        };
        let module = match NativeModule::new(config) {
            Ok(m) => m,
            Err(e) => return MicroStatus::from(&e) as i32,
        };
        let handle = ffi_lock!(MODULES).insert(Arc::new(Mutex::new(Bindings::new(module))));
        debug!(handle, "module created");
        // SAFETY: module_out is non-null and valid per caller contract.
        unsafe { *module_out = handle };
        MicroStatus::Ok as i32
    })
}

/// Destroy a module instance and its memory.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_module_destroy(module: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(MODULES).remove(module) {
            Some(_) => MicroStatus::Ok as i32,
            None => MicroStatus::InvalidHandle as i32,
        }
    })
}

/// Wrapping 32-bit addition. Needs no module instance.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_add(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

/// Allocate `size` bytes inside the module's memory.
///
/// Returns the offset, or 0 on any failure (0 is never a valid
/// allocation).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_malloc(module: u64, size: u32) -> u32 {
    ffi_guard_or!(0, {
        let Some(arc) = get_module(module) else {
            return 0;
        };
        let Ok(mut bindings) = arc.lock() else {
            return 0;
        };
        bindings
            .module_mut()
            .malloc(size)
            .map_or(0, |ptr| ptr.0)
    })
}

/// Free an allocation. Freeing 0 is a no-op.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_free(module: u64, ptr: u32) -> i32 {
    ffi_guard!({
        let Some(arc) = get_module(module) else {
            return MicroStatus::InvalidHandle as i32;
        };
        let mut bindings = ffi_lock!(arc);
        match bindings.module_mut().free(Ptr(ptr)) {
            Ok(()) => MicroStatus::Ok as i32,
            Err(e) => MicroStatus::from(&e) as i32,
        }
    })
}

/// Sum `len` integers at `ptr` in the module's memory.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_sum(module: u64, ptr: u32, len: u32, sum_out: *mut i32) -> i32 {
    ffi_guard!({
        if sum_out.is_null() {
            return MicroStatus::InvalidArgument as i32;
        }
        let Some(arc) = get_module(module) else {
            return MicroStatus::InvalidHandle as i32;
        };
        let bindings = ffi_lock!(arc);
        match bindings.module().sum(Ptr(ptr), len) {
            Ok(total) => {
                // SAFETY: sum_out is non-null and valid per caller contract.
                unsafe { *sum_out = total };
                MicroStatus::Ok as i32
            }
            Err(e) => MicroStatus::from(&e) as i32,
        }
    })
}

/// Sum a caller-owned array, marshaling it through the module's memory.
///
/// `values` may be null when `count == 0`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_sum_values(
    module: u64,
    values: *const i32,
    count: usize,
    sum_out: *mut i32,
) -> i32 {
    ffi_guard!({
        if sum_out.is_null() || (values.is_null() && count > 0) {
            return MicroStatus::InvalidArgument as i32;
        }
        let Some(arc) = get_module(module) else {
            return MicroStatus::InvalidHandle as i32;
        };
        let values: &[i32] = if count == 0 {
            &[]
        } else {
            // SAFETY: values is non-null and valid for count reads per
            // caller contract.
            unsafe { std::slice::from_raw_parts(values, count) }
        };
        let mut bindings = ffi_lock!(arc);
        match bindings.sum(values) {
            Ok(total) => {
                // SAFETY: sum_out is non-null and valid per caller contract.
                unsafe { *sum_out = total };
                MicroStatus::Ok as i32
            }
            Err(e) => MicroStatus::from(&e) as i32,
        }
    })
}

/// Copy `len` bytes from `src` into the module's memory at `ptr`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_memory_write(module: u64, ptr: u32, src: *const u8, len: usize) -> i32 {
    ffi_guard!({
        if src.is_null() && len > 0 {
            return MicroStatus::InvalidArgument as i32;
        }
        let Some(arc) = get_module(module) else {
            return MicroStatus::InvalidHandle as i32;
        };
        if len == 0 {
            return MicroStatus::Ok as i32;
        }
        let mut bindings = ffi_lock!(arc);
        let memory = bindings.module_mut().memory_mut();
        let range = match checked_range(memory.len(), Ptr(ptr), len as u64) {
            Ok(r) => r,
            Err(e) => return MicroStatus::from(&e) as i32,
        };
        // SAFETY: src is non-null and valid for len reads per caller
        // contract; the destination range was bounds-checked.
        let src = unsafe { std::slice::from_raw_parts(src, len) };
        memory[range].copy_from_slice(src);
        MicroStatus::Ok as i32
    })
}

/// Copy `len` bytes out of the module's memory at `ptr` into `dst`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_memory_read(module: u64, ptr: u32, dst: *mut u8, len: usize) -> i32 {
    ffi_guard!({
        if dst.is_null() && len > 0 {
            return MicroStatus::InvalidArgument as i32;
        }
        let Some(arc) = get_module(module) else {
            return MicroStatus::InvalidHandle as i32;
        };
        if len == 0 {
            return MicroStatus::Ok as i32;
        }
        let bindings = ffi_lock!(arc);
        let memory = bindings.module().memory();
        let range = match checked_range(memory.len(), Ptr(ptr), len as u64) {
            Ok(r) => r,
            Err(e) => return MicroStatus::from(&e) as i32,
        };
        // SAFETY: dst is non-null and valid for len writes per caller
        // contract; the source range was bounds-checked.
        let dst = unsafe { std::slice::from_raw_parts_mut(dst, len) };
        dst.copy_from_slice(&memory[range]);
        MicroStatus::Ok as i32
    })
}

/// Current size of the module's memory in bytes.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_memory_size(module: u64, size_out: *mut u64) -> i32 {
    ffi_guard!({
        if size_out.is_null() {
            return MicroStatus::InvalidArgument as i32;
        }
        let Some(arc) = get_module(module) else {
            return MicroStatus::InvalidHandle as i32;
        };
        let size = ffi_lock!(arc).module().memory_size();
        // SAFETY: size_out is non-null and valid per caller contract.
        unsafe { *size_out = size };
        MicroStatus::Ok as i32
    })
}

/// Snapshot the module's memory and allocator metrics.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_module_metrics(module: u64, metrics_out: *mut MicroMemoryMetrics) -> i32 {
    ffi_guard!({
        if metrics_out.is_null() {
            return MicroStatus::InvalidArgument as i32;
        }
        let Some(arc) = get_module(module) else {
            return MicroStatus::InvalidHandle as i32;
        };
        let metrics = ffi_lock!(arc).module().metrics();
        // SAFETY: metrics_out is non-null and valid per caller contract.
        unsafe { *metrics_out = MicroMemoryMetrics::from_rust(&metrics) };
        MicroStatus::Ok as i32
    })
}
