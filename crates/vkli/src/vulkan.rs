//! The loader level engine: entry point, global entry points and catalog.

use ash::vk;
use vkli_sys::Result;

use crate::catalog::CapabilityCatalog;
use crate::config::InstanceConfig;
use crate::instance::Instance;
use crate::symbols::{GlobalFns, SymbolTable};
use crate::Entrypoint;

/// A loaded Vulkan loader, ready to create instances.
///
/// Owns everything that doesn't depend on an instance: the bootstrap
/// function, the [`vkli_sys::Tier::Global`] entry points and the
/// capability catalog queried right after loading.
#[derive(Debug, Clone)]
pub struct Vulkan {
    entry: Entrypoint,
    symbols: SymbolTable,
    fns: GlobalFns,
    catalog: CapabilityCatalog,
}

impl Vulkan {
    /// Loads the system loader and queries its capabilities.
    pub fn load() -> Result<Self> {
        Self::with_entrypoint(Entrypoint::load()?)
    }

    /// Resolves the global entry points through `entry` and queries the
    /// capability catalog.
    pub fn with_entrypoint(entry: Entrypoint) -> Result<Self> {
        let symbols = SymbolTable::resolve_global(&entry)?;
        let fns = GlobalFns::load(&symbols)?;
        let catalog = CapabilityCatalog::enumerate(&fns)?;
        Ok(Self {
            entry,
            symbols,
            fns,
            catalog,
        })
    }

    /// The layers and instance extensions available.
    pub fn catalog(&self) -> &CapabilityCatalog {
        &self.catalog
    }

    /// The bootstrap function.
    pub fn entrypoint(&self) -> &Entrypoint {
        &self.entry
    }

    /// The resolved global entry points.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The global entry points the engine calls.
    pub fn fns(&self) -> &GlobalFns {
        &self.fns
    }

    /// The instance level version the loader supports, 1.0 on loaders that
    /// predate `vkEnumerateInstanceVersion`.
    pub fn instance_version(&self) -> Result<u32> {
        let Some(enumerate_instance_version) = self.fns.enumerate_instance_version else {
            return Ok(vk::API_VERSION_1_0);
        };
        let mut version = 0;
        vkli_sys::check(unsafe { enumerate_instance_version(&mut version) })?;
        Ok(version)
    }

    /// Creates an instance described by `config`.
    pub fn create_instance(&self, config: &InstanceConfig) -> Result<Instance> {
        Instance::create(&self.entry, &self.fns, &self.catalog, config)
    }

    /// Creates an instance described by `config`, logging the reason on
    /// failure.
    pub fn instance(&self, config: &InstanceConfig) -> Option<Instance> {
        self.create_instance(config)
            .map_err(|e| log::error!("Couldn't create the Vulkan instance: {e}"))
            .ok()
    }

    /// Creates an instance with [`InstanceConfig::default`].
    pub fn default_instance(&self) -> Option<Instance> {
        self.instance(&InstanceConfig::default())
    }
}

/// Loads the system Vulkan loader.
///
/// Returns `None`, after logging why, if there is no usable loader.
pub fn init_vulkan() -> Option<Vulkan> {
    init_with(Vulkan::load())
}

fn init_with(vulkan: Result<Vulkan>) -> Option<Vulkan> {
    match vulkan {
        Ok(vulkan) => {
            log::info!("Vulkan initialisation successful");
            Some(vulkan)
        }
        Err(e) => {
            log::error!("Vulkan initialisation failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_driver::{self, FakeDriver};
    use crate::negotiate::PriorityList;
    use vkli_sys::Error;

    fn vulkan(driver: FakeDriver) -> Result<Vulkan> {
        Vulkan::with_entrypoint(fake_driver::install(driver))
    }

    #[test]
    fn missing_global_symbol_fails_initialisation() {
        let result = vulkan(FakeDriver {
            missing_symbol: Some(c"vkEnumerateInstanceLayerProperties"),
            ..Default::default()
        });
        assert_eq!(
            result.unwrap_err(),
            Error::SymbolResolutionFailed("vkEnumerateInstanceLayerProperties".to_owned())
        );
    }

    #[test]
    fn failed_initialisation_is_none() {
        assert!(init_with(Err(Error::DriverNotFound("libvulkan.so.1".to_owned()))).is_none());
        let driver = FakeDriver {
            missing_symbol: Some(c"vkCreateInstance"),
            ..Default::default()
        };
        assert!(init_with(vulkan(driver)).is_none());
    }

    #[test]
    fn instance_version_falls_back_to_1_0() {
        let modern = vulkan(FakeDriver::default()).unwrap();
        assert_eq!(modern.instance_version(), Ok(vk::API_VERSION_1_3));

        let legacy = vulkan(FakeDriver {
            missing_symbol: Some(c"vkEnumerateInstanceVersion"),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(legacy.instance_version(), Ok(vk::API_VERSION_1_0));
    }

    #[test]
    fn negotiates_against_the_loaded_catalog() {
        let vulkan = vulkan(FakeDriver {
            layers: vec![("L1", "layer")],
            extensions: vec!["E1", "E2"],
            ..Default::default()
        })
        .unwrap();
        let config = InstanceConfig::builder()
            .layer_priorities(vec![PriorityList::from(["L0", "L1"])])
            .extension_priorities(vec![PriorityList::from(["E2"])])
            .build()
            .unwrap();
        let instance = vulkan.instance(&config).unwrap();

        assert_eq!(instance.enabled_layers().names(), ["L1"]);
        assert_eq!(instance.enabled_extensions().names(), ["E2"]);
    }

    #[test]
    fn default_instance_drops_what_is_unavailable() {
        let vulkan = vulkan(FakeDriver {
            extensions: vec!["VK_KHR_surface"],
            ..Default::default()
        })
        .unwrap();
        let instance = vulkan.default_instance().unwrap();

        assert!(instance.enabled_layers().is_empty());
        assert_eq!(instance.enabled_extensions().names(), ["VK_KHR_surface"]);
        fake_driver::with(|driver| {
            assert_eq!(driver.application_name, "Vulkan Example Application")
        });
    }

    #[test]
    fn failed_instance_is_none() {
        let vulkan = vulkan(FakeDriver {
            create_result: vk::Result::ERROR_INITIALIZATION_FAILED,
            ..Default::default()
        })
        .unwrap();
        assert!(vulkan.default_instance().is_none());
        assert_eq!(fake_driver::with(|driver| driver.destroy_instance_calls), 0);
    }
}
