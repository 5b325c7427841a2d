//! Operating system dynamic library access.
//!
//! The loader library is looked up by a single well-known name chosen at
//! build time for the target platform. Opened libraries are never closed: the
//! resolved entry points stay valid for the lifetime of the process.

use std::ffi::{c_void, CStr};
use std::ptr::NonNull;

use ash::vk;

/// The name of the Vulkan loader library on this platform.
#[cfg(all(unix, not(any(target_os = "macos", target_os = "ios"))))]
pub const LIBRARY_NAME: &str = "libvulkan.so.1";

/// The name of the Vulkan loader library on this platform.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub const LIBRARY_NAME: &str = "libvulkan.dylib";

/// The name of the Vulkan loader library on this platform.
#[cfg(windows)]
pub const LIBRARY_NAME: &str = "vulkan-1.dll";

/// The name of the Vulkan loader library on this platform.
#[cfg(not(any(unix, windows)))]
pub const LIBRARY_NAME: &str = "";

/// The name of the single bootstrap symbol every loader exports.
pub const ENTRYPOINT_NAME: &CStr = c"vkGetInstanceProcAddr";

/// A shared library mapped into the process.
///
/// A `Library` is never unmapped, so every function pointer obtained from it
/// stays valid.
#[derive(Debug, Clone, Copy)]
pub struct Library(&'static libloading::Library);

impl Library {
    /// Opens the library `name` through the platform's dynamic linker.
    pub fn open(name: &str) -> Result<Self, libloading::Error> {
        // SAFETY: loader libraries have no initialisation routines with
        // preconditions on the caller.
        let library = unsafe { libloading::Library::new(name) }?;
        Ok(Self(Box::leak(Box::new(library))))
    }

    /// Returns the address of the exported symbol `name`.
    pub fn symbol(&self, name: &CStr) -> Option<NonNull<c_void>> {
        // SAFETY: the address is only read, never called through here.
        let symbol = unsafe { self.0.get::<*mut c_void>(name.to_bytes_with_nul()) }.ok()?;
        NonNull::new(*symbol)
    }

    /// Returns the library's `vkGetInstanceProcAddr`.
    pub fn get_instance_proc_addr(&self) -> Result<vk::PFN_vkGetInstanceProcAddr, libloading::Error> {
        // SAFETY: every Vulkan loader exports `vkGetInstanceProcAddr` with
        // this signature, and the library is never unmapped.
        let symbol = unsafe {
            self.0
                .get::<vk::PFN_vkGetInstanceProcAddr>(ENTRYPOINT_NAME.to_bytes_with_nul())
        }?;
        Ok(*symbol)
    }
}
