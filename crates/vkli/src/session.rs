//! A session owns one instance and everything created from it.

use ash::vk;
use vkli_sys::{Error, Result};

use crate::config::InstanceConfig;
use crate::device::{self, Device, Selection};
use crate::instance::Instance;
use crate::surface::{Surface, SurfaceSource};
use crate::vulkan::Vulkan;
use crate::Entrypoint;

/// One instance with its optional surface, selected device and logical
/// device.
///
/// [`Session::teardown`] releases the surface and the device in reverse
/// order of creation, then the instance. It runs on drop as well.
#[derive(Debug)]
pub struct Session {
    device: Option<Device>,
    surface: Option<Surface>,
    selection: Option<Selection>,
    acquired: Vec<Dependent>,
    instance: Option<Instance>,
}

/// The handles a session creates from its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dependent {
    Surface,
    Device,
}

impl Session {
    /// Creates the session's instance.
    pub fn new(vulkan: &Vulkan, config: &InstanceConfig) -> Result<Self> {
        Ok(Self {
            device: None,
            surface: None,
            selection: None,
            acquired: Vec::new(),
            instance: Some(vulkan.create_instance(config)?),
        })
    }

    /// Loads the system loader, creates an instance from `config` and
    /// selects the first device with a graphics queue and every extension of
    /// `required_extensions`.
    ///
    /// Returns `None`, after logging why, if any step fails.
    pub fn bootstrap<S: AsRef<str>>(config: &InstanceConfig, required_extensions: &[S]) -> Option<Self> {
        Self::bootstrap_from(Entrypoint::load(), config, required_extensions)
    }

    fn bootstrap_from<S: AsRef<str>>(
        entry: Result<Entrypoint>,
        config: &InstanceConfig,
        required_extensions: &[S],
    ) -> Option<Self> {
        let session = entry.and_then(Vulkan::with_entrypoint).and_then(|vulkan| {
            let mut session = Self::new(&vulkan, config)?;
            session.select_device(required_extensions, vk::QueueFlags::GRAPHICS)?;
            Ok(session)
        });
        match session {
            Ok(session) => {
                log::info!("Vulkan initialisation successful");
                Some(session)
            }
            Err(e) => {
                log::error!("Vulkan initialisation failed: {e}");
                None
            }
        }
    }

    /// The session's instance, `None` after [`Session::teardown`].
    pub fn instance(&self) -> Option<&Instance> {
        self.instance.as_ref()
    }

    /// The attached surface, if any.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// The selected device, if any.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The logical device, if one was created.
    pub fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    fn live_instance(&self) -> Result<&Instance> {
        self.instance
            .as_ref()
            .ok_or_else(|| "The session has been torn down.".into())
    }

    fn acquire(&mut self, dependent: Dependent) {
        self.acquired.retain(|acquired| *acquired != dependent);
        self.acquired.push(dependent);
    }

    /// Creates a surface through `source`, replacing any earlier one.
    pub fn attach_surface(&mut self, source: &dyn SurfaceSource) -> Result<&Surface> {
        let surface = Surface::create(self.live_instance()?, source)?;
        self.acquire(Dependent::Surface);
        Ok(&*self.surface.insert(surface))
    }

    /// Selects a device with every extension of `required_extensions` and a
    /// queue family supporting `queue_flags`. With a surface attached, the
    /// family must also be able to present to it.
    pub fn select_device<S: AsRef<str>>(
        &mut self,
        required_extensions: &[S],
        queue_flags: vk::QueueFlags,
    ) -> Result<&Selection> {
        if self.device.is_some() {
            return Err("A device has already been created on the selection.".into());
        }
        let units = self.live_instance()?.enumerate_units()?;
        let surface = self.surface.as_ref();
        let selection = device::select(&units, required_extensions, |unit, family| {
            family.supports(queue_flags)
                && surface.map_or(true, |surface| surface.supports_present(unit, family))
        })?;
        Ok(&*self.selection.insert(selection))
    }

    /// Creates a logical device on the selected device.
    pub fn create_device<S: AsRef<str>>(&mut self, extensions: &[S]) -> Result<&Device> {
        let selection = self
            .selection
            .as_ref()
            .ok_or_else(|| Error::from("No device has been selected."))?;
        let device = self.live_instance()?.create_device(selection, extensions)?;
        self.acquire(Dependent::Device);
        Ok(&*self.device.insert(device))
    }

    /// Releases the surface and the device in reverse order of creation,
    /// then the instance. Does nothing when called again.
    pub fn teardown(&mut self) {
        if self.instance.is_none() {
            return;
        }
        while let Some(dependent) = self.acquired.pop() {
            match dependent {
                Dependent::Device => drop(self.device.take()),
                Dependent::Surface => drop(self.surface.take()),
            }
        }
        self.selection = None;
        if let Some(instance) = self.instance.take() {
            if instance.holders() > 1 {
                log::warn!(
                    "The instance outlives the session, {} holders remain.",
                    instance.holders() - 1
                );
            }
        }
        log::debug!("Session torn down.");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}
