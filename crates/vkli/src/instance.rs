//! Creation and ownership of the Vulkan instance.

use std::ffi::{c_char, CStr, CString};
use std::rc::Rc;

use ash::vk;
use vkli_sys::{Error, Result};

use crate::catalog::CapabilityCatalog;
use crate::config::{InstanceConfig, PORTABILITY_ENUMERATION_EXTENSION};
use crate::device::{self, Device, ExecutionUnit, Selection};
use crate::negotiate::NegotiatedSet;
use crate::symbols::{GlobalFns, InstanceFns, SymbolTable, VoidFunction};
use crate::Entrypoint;

/// Destroys the raw instance when dropped. Only ever constructed around an
/// instance whose creation succeeded.
struct InstanceHandle {
    handle: vk::Instance,
    destroy: vk::PFN_vkDestroyInstance,
}

impl Drop for InstanceHandle {
    fn drop(&mut self) {
        unsafe { (self.destroy)(self.handle, std::ptr::null()) };
        log::debug!("Vulkan instance destroyed.");
    }
}

#[derive(Debug)]
struct InstanceInner {
    raw: InstanceHandle,
    entry: Entrypoint,
    symbols: SymbolTable,
    fns: InstanceFns,
    layers: NegotiatedSet,
    extensions: NegotiatedSet,
}

impl std::fmt::Debug for InstanceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("InstanceHandle").field(&self.handle).finish()
    }
}

/// A Vulkan instance together with its resolved instance level entry points.
///
/// Cloning shares the instance; it is destroyed when the last clone is
/// dropped. Objects created from an instance ([`Device`],
/// [`crate::Surface`]) keep a clone, so the instance is always destroyed
/// after them.
#[derive(Debug, Clone)]
pub struct Instance(Rc<InstanceInner>);

impl Instance {
    /// Negotiates the layers and extensions of `config` against `catalog`
    /// and creates an instance with the accepted ones.
    ///
    /// If anything fails after `vkCreateInstance` succeeded, the instance is
    /// destroyed before the error is returned.
    pub fn create(
        entry: &Entrypoint,
        global: &GlobalFns,
        catalog: &CapabilityCatalog,
        config: &InstanceConfig,
    ) -> Result<Self> {
        let mut layers = catalog.negotiate_layers(&config.layer_priorities);
        layers.dedup();
        let mut extensions = catalog.negotiate_extensions(&config.extension_priorities);
        extensions.dedup();
        log::info!(
            "Enabling layers {:?} and instance extensions {:?}.",
            layers.names(),
            extensions.names()
        );

        let application_name = CString::new(config.application_name.as_str())
            .map_err(|_| "The application name contains a nul byte.")?;
        let engine_name = config
            .engine_name
            .as_deref()
            .map(CString::new)
            .transpose()
            .map_err(|_| "The engine name contains a nul byte.")?;

        let mut application_info = vk::ApplicationInfo::default()
            .application_name(&application_name)
            .application_version(config.application_version)
            .engine_version(config.engine_version)
            .api_version(config.api_version);
        if let Some(engine_name) = &engine_name {
            application_info = application_info.engine_name(engine_name);
        }

        let layer_names = layers.as_c_strings()?;
        let extension_names = extensions.as_c_strings()?;
        let layer_pointers = c_pointers(&layer_names);
        let extension_pointers = c_pointers(&extension_names);

        let mut create_info = vk::InstanceCreateInfo::default()
            .application_info(&application_info)
            .enabled_layer_names(&layer_pointers)
            .enabled_extension_names(&extension_pointers);
        if extensions.contains(PORTABILITY_ENUMERATION_EXTENSION) {
            create_info = create_info.flags(vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR);
        }

        let mut handle = vk::Instance::null();
        let result = unsafe { (global.create_instance)(&create_info, std::ptr::null(), &mut handle) };
        if result != vk::Result::SUCCESS {
            return Err(Error::ContextCreationFailed(result));
        }

        // Resolved on its own first, so that the instance can be destroyed
        // even if the rest of the scoped tier is incomplete.
        let destroy = unsafe { entry.get_proc_addr(handle, c"vkDestroyInstance") }
            .map(|function| unsafe {
                std::mem::transmute::<VoidFunction, vk::PFN_vkDestroyInstance>(function)
            });
        let Some(destroy) = destroy else {
            log::error!("vkDestroyInstance is unavailable, the instance {handle:?} is leaked.");
            return Err(Error::SymbolResolutionFailed("vkDestroyInstance".to_owned()));
        };
        let raw = InstanceHandle { handle, destroy };

        let symbols = SymbolTable::resolve_scoped(entry, handle)?;
        let fns = InstanceFns::load(&symbols)?;
        log::info!("Vulkan instance created.");

        Ok(Self(Rc::new(InstanceInner {
            raw,
            entry: *entry,
            symbols,
            fns,
            layers,
            extensions,
        })))
    }

    /// The raw instance handle.
    pub fn handle(&self) -> vk::Instance {
        self.0.raw.handle
    }

    /// The entry point the instance was created through.
    pub fn entrypoint(&self) -> &Entrypoint {
        &self.0.entry
    }

    /// Every instance level entry point resolved for this instance.
    pub fn symbols(&self) -> &SymbolTable {
        &self.0.symbols
    }

    /// The instance level entry points the engine uses.
    pub fn fns(&self) -> &InstanceFns {
        &self.0.fns
    }

    /// Resolves an entry point not covered by the static table, such as a
    /// device extension function.
    pub fn get_proc_addr(&self, name: &CStr) -> vk::PFN_vkVoidFunction {
        // SAFETY: the instance is alive for as long as `self` is.
        unsafe { self.0.entry.get_proc_addr(self.handle(), name) }
    }

    /// The layers the instance was created with.
    pub fn enabled_layers(&self) -> &NegotiatedSet {
        &self.0.layers
    }

    /// The instance extensions the instance was created with.
    pub fn enabled_extensions(&self) -> &NegotiatedSet {
        &self.0.extensions
    }

    /// The number of live holders of this instance.
    pub fn holders(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Takes a snapshot of every physical device and its queue families and
    /// extensions.
    pub fn enumerate_units(&self) -> Result<Vec<ExecutionUnit>> {
        device::enumerate_units(self)
    }

    /// Creates a logical device on the selected unit with one queue from the
    /// selected family.
    pub fn create_device<S: AsRef<str>>(
        &self,
        selection: &Selection,
        extensions: &[S],
    ) -> Result<Device> {
        Device::create(self, selection, extensions)
    }
}

pub(crate) fn c_pointers(names: &[CString]) -> Vec<*const c_char> {
    names.iter().map(|name| name.as_ptr()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_driver::{self, FakeDriver};
    use crate::negotiate::PriorityList;

    fn create(driver: FakeDriver, config: &InstanceConfig) -> Result<Instance> {
        let entry = fake_driver::install(driver);
        let global = GlobalFns::load(&SymbolTable::resolve_global(&entry)?)?;
        let catalog = CapabilityCatalog::enumerate(&global)?;
        Instance::create(&entry, &global, &catalog, config)
    }

    #[test]
    fn passes_negotiated_names_to_the_driver() {
        let config = InstanceConfig {
            layer_priorities: vec![PriorityList::from(["L0", "L1"])],
            extension_priorities: vec![PriorityList::from(["E2"]), PriorityList::from(["E9"])],
            ..InstanceConfig::bare("test")
        };
        let instance = create(
            FakeDriver {
                layers: vec![("L1", "layer")],
                extensions: vec!["E1", "E2"],
                ..Default::default()
            },
            &config,
        )
        .unwrap();

        assert_eq!(instance.enabled_layers().names(), ["L1"]);
        assert_eq!(instance.enabled_extensions().names(), ["E2"]);
        fake_driver::with(|driver| {
            assert_eq!(driver.enabled_layers, ["L1"]);
            assert_eq!(driver.enabled_extensions, ["E2"]);
            assert_eq!(driver.application_name, "test");
        });
    }

    #[test]
    fn failed_creation_destroys_nothing() {
        let result = create(
            FakeDriver {
                create_result: vk::Result::ERROR_INCOMPATIBLE_DRIVER,
                ..Default::default()
            },
            &InstanceConfig::bare("test"),
        );
        assert_eq!(
            result.unwrap_err(),
            Error::ContextCreationFailed(vk::Result::ERROR_INCOMPATIBLE_DRIVER)
        );
        assert_eq!(fake_driver::with(|driver| driver.destroy_instance_calls), 0);
    }

    #[test]
    fn incomplete_scoped_tier_still_destroys_the_instance() {
        let result = create(
            FakeDriver {
                missing_symbol: Some(c"vkCreateDevice"),
                ..Default::default()
            },
            &InstanceConfig::bare("test"),
        );
        assert_eq!(
            result.unwrap_err(),
            Error::SymbolResolutionFailed("vkCreateDevice".to_owned())
        );
        assert_eq!(fake_driver::with(|driver| driver.destroy_instance_calls), 1);
    }

    #[test]
    fn last_holder_destroys_exactly_once() {
        let instance = create(FakeDriver::default(), &InstanceConfig::bare("test")).unwrap();
        let shared = instance.clone();
        assert_eq!(instance.holders(), 2);

        drop(instance);
        assert_eq!(fake_driver::with(|driver| driver.destroy_instance_calls), 0);
        drop(shared);
        assert_eq!(fake_driver::with(|driver| driver.destroy_instance_calls), 1);
    }

    #[test]
    fn surface_functions_follow_the_surface_extension() {
        let without = create(
            FakeDriver {
                extensions: vec!["VK_KHR_surface"],
                ..Default::default()
            },
            &InstanceConfig::bare("test"),
        )
        .unwrap();
        assert!(without.fns().destroy_surface_khr.is_none());

        let config = InstanceConfig {
            extension_priorities: vec![PriorityList::single("VK_KHR_surface")],
            ..InstanceConfig::bare("test")
        };
        let with = create(
            FakeDriver {
                extensions: vec!["VK_KHR_surface"],
                ..Default::default()
            },
            &config,
        )
        .unwrap();
        assert!(with.fns().destroy_surface_khr.is_some());
    }
}
