//! C-compatible module configuration.

use micro_memory::ModuleConfig;

use crate::status::MicroStatus;

/// Layout-stable mirror of [`ModuleConfig`].
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MicroModuleConfig {
    /// Pages (64 KiB each) the memory starts with.
    pub initial_pages: u32,
    /// Most pages the memory may grow to.
    pub max_pages: u32,
    /// First offset the allocator hands out. Must be 8-aligned and nonzero.
    pub heap_base: u32,
}

const _: () = assert!(std::mem::size_of::<MicroModuleConfig>() == 12);

impl Default for MicroModuleConfig {
    fn default() -> Self {
        ModuleConfig::default().into()
    }
}

impl From<ModuleConfig> for MicroModuleConfig {
    fn from(c: ModuleConfig) -> Self {
        Self {
            initial_pages: c.initial_pages,
            max_pages: c.max_pages,
            heap_base: c.heap_base,
        }
    }
}

impl From<MicroModuleConfig> for ModuleConfig {
    fn from(c: MicroModuleConfig) -> Self {
        Self {
            initial_pages: c.initial_pages,
            max_pages: c.max_pages,
            heap_base: c.heap_base,
        }
    }
}

/// Fill `out` with the default configuration.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_module_config_default(out: *mut MicroModuleConfig) -> i32 {
    if out.is_null() {
        return MicroStatus::InvalidArgument as i32;
    }
    // SAFETY: out is non-null and valid for writes per caller contract.
    unsafe { *out = MicroModuleConfig::default() };
    MicroStatus::Ok as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_rust_default() {
        let mut out = MicroModuleConfig {
            initial_pages: 0,
            max_pages: 0,
            heap_base: 0,
        };
        assert_eq!(micro_module_config_default(&mut out), 0);
        assert_eq!(ModuleConfig::from(out), ModuleConfig::default());
    }

    #[test]
    fn null_out_is_invalid() {
        assert_eq!(
            micro_module_config_default(std::ptr::null_mut()),
            MicroStatus::InvalidArgument as i32
        );
    }
}
