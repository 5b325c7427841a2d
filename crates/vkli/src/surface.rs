//! Presentation surfaces supplied by a windowing collaborator.

use ash::vk;
use vkli_sys::{Error, Result};

use crate::device::{ExecutionUnit, QueueFamily};
use crate::instance::Instance;

/// Something that can create presentation surfaces, usually a window.
///
/// The windowing library itself stays outside this crate; it only has to
/// name the instance extensions it relies on and turn an [`Instance`] into a
/// raw surface.
pub trait SurfaceSource {
    /// The instance extensions [`SurfaceSource::create_surface`] needs.
    fn required_extensions(&self) -> Vec<String>;

    /// Creates a surface on `instance`. Ownership of the returned handle
    /// passes to the caller.
    fn create_surface(&self, instance: &Instance) -> Result<vk::SurfaceKHR>;
}

/// A presentation surface, destroyed when dropped.
#[derive(Debug)]
pub struct Surface {
    handle: vk::SurfaceKHR,
    destroy: vk::PFN_vkDestroySurfaceKHR,
    supports: Option<vk::PFN_vkGetPhysicalDeviceSurfaceSupportKHR>,
    instance: Instance,
}

impl Surface {
    /// Asks `source` for a surface on `instance`.
    ///
    /// The instance must have been created with `VK_KHR_surface`, otherwise
    /// the surface couldn't be destroyed and none is created.
    pub fn create(instance: &Instance, source: &dyn SurfaceSource) -> Result<Self> {
        let destroy = instance
            .fns()
            .destroy_surface_khr
            .ok_or_else(|| Error::SymbolResolutionFailed("vkDestroySurfaceKHR".to_owned()))?;

        let handle = source.create_surface(instance)?;
        if handle == vk::SurfaceKHR::null() {
            return Err(Error::ContextCreationFailed(
                vk::Result::ERROR_INITIALIZATION_FAILED,
            ));
        }
        log::info!("Surface {handle:?} created.");

        Ok(Self {
            handle,
            destroy,
            supports: instance.fns().get_physical_device_surface_support_khr,
            instance: instance.clone(),
        })
    }

    /// The raw surface handle.
    pub fn handle(&self) -> vk::SurfaceKHR {
        self.handle
    }

    /// The instance the surface belongs to.
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Returns `true` if queues of `family` on `unit` can present to this
    /// surface. Errors from the driver count as "no".
    pub fn supports_present(&self, unit: &ExecutionUnit, family: &QueueFamily) -> bool {
        let Some(supports) = self.supports else {
            return false;
        };
        let mut supported = vk::FALSE;
        let result = unsafe { supports(unit.handle, family.index, self.handle, &mut supported) };
        if result != vk::Result::SUCCESS {
            log::warn!(
                "Couldn't query presentation support of {} family {}: {result}",
                unit.name,
                family.index
            );
            return false;
        }
        supported == vk::TRUE
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        unsafe { (self.destroy)(self.instance.handle(), self.handle, std::ptr::null()) };
        log::debug!("Surface {:?} destroyed.", self.handle);
    }
}
