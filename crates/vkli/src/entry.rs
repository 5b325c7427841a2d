//! Locating the loader library and its bootstrap function.

use std::ffi::CStr;

use ash::vk;
use vkli_sys::{library::ENTRYPOINT_NAME, Error, Library, Result};

/// The `vkGetInstanceProcAddr` function of a Vulkan loader.
///
/// Every other entry point is resolved through it. The library it came from
/// stays mapped for the rest of the process.
#[derive(Clone, Copy)]
pub struct Entrypoint {
    get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr,
}

impl std::fmt::Debug for Entrypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entrypoint")
            .field(
                "get_instance_proc_addr",
                &(self.get_instance_proc_addr as *const ()),
            )
            .finish()
    }
}

impl Entrypoint {
    /// Loads the platform's Vulkan loader ([`vkli_sys::LIBRARY_NAME`]).
    pub fn load() -> Result<Self> {
        Self::load_from(vkli_sys::LIBRARY_NAME)
    }

    /// Loads the bootstrap function from the library `library_name`.
    ///
    /// Fails with [`Error::DriverNotFound`] if the library can't be opened
    /// and with [`Error::EntrypointMissing`] if it doesn't export
    /// `vkGetInstanceProcAddr`.
    pub fn load_from(library_name: &str) -> Result<Self> {
        let library = Library::open(library_name).map_err(|e| {
            log::debug!("Opening {library_name} failed: {e}");
            Error::DriverNotFound(library_name.to_owned())
        })?;

        let get_instance_proc_addr = library.get_instance_proc_addr().map_err(|e| {
            log::debug!("{library_name} has no {ENTRYPOINT_NAME:?}: {e}");
            Error::EntrypointMissing
        })?;
        log::debug!("Loaded {ENTRYPOINT_NAME:?} from {library_name}.");

        Ok(Self::from_raw(get_instance_proc_addr))
    }

    /// Wraps a `vkGetInstanceProcAddr` obtained by other means, for example
    /// from a loader the application linked against itself.
    pub fn from_raw(get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr) -> Self {
        Self {
            get_instance_proc_addr,
        }
    }

    /// Returns the raw bootstrap function.
    pub fn raw(&self) -> vk::PFN_vkGetInstanceProcAddr {
        self.get_instance_proc_addr
    }

    /// Resolves `name` for `instance` (or globally, for a null instance).
    ///
    /// # Safety
    ///
    /// `instance` must be null or a live instance created through this
    /// entry point.
    pub unsafe fn get_proc_addr(&self, instance: vk::Instance, name: &CStr) -> vk::PFN_vkVoidFunction {
        (self.get_instance_proc_addr)(instance, name.as_ptr())
    }
}
