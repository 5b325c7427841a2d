//! Resolution of the tiered entry point table.

use std::collections::HashMap;
use std::ffi::CStr;

use ash::vk;
use vkli_sys::{symbols, Error, Result, Tier};

use crate::Entrypoint;

/// A type-erased Vulkan function pointer.
pub type VoidFunction = unsafe extern "system" fn();

/// The entry points of one tier, resolved through an [`Entrypoint`].
///
/// A table only exists if every required entry point of its tier resolved.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    tier: Tier,
    instance: vk::Instance,
    functions: HashMap<&'static CStr, VoidFunction>,
}

impl SymbolTable {
    /// Resolves the [`Tier::Global`] entry points.
    pub fn resolve_global(entry: &Entrypoint) -> Result<Self> {
        Self::resolve(entry, Tier::Global, vk::Instance::null())
    }

    /// Resolves the [`Tier::Instance`] entry points for `instance`. This has
    /// to be done again for every instance.
    pub fn resolve_scoped(entry: &Entrypoint, instance: vk::Instance) -> Result<Self> {
        Self::resolve(entry, Tier::Instance, instance)
    }

    fn resolve(entry: &Entrypoint, tier: Tier, instance: vk::Instance) -> Result<Self> {
        let mut functions = HashMap::new();
        for symbol in symbols::tier(tier) {
            // SAFETY: `instance` is either null (global tier) or the live
            // instance the caller just created through `entry`.
            match unsafe { entry.get_proc_addr(instance, symbol.name) } {
                Some(function) => {
                    functions.insert(symbol.name, function);
                }
                None if symbol.is_required() => {
                    return Err(Error::SymbolResolutionFailed(
                        symbol.name.to_string_lossy().into_owned(),
                    ));
                }
                None => log::debug!("Optional entry point {:?} is unavailable.", symbol.name),
            }
        }

        log::debug!("Resolved {} {tier:?} entry points.", functions.len());
        Ok(Self {
            tier,
            instance,
            functions,
        })
    }

    /// The tier this table was resolved for.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// The instance the table is bound to; null for the global tier.
    pub fn instance(&self) -> vk::Instance {
        self.instance
    }

    /// Returns the resolved address of `name`.
    pub fn get(&self, name: &CStr) -> Option<VoidFunction> {
        self.functions.get(name).copied()
    }

    /// Returns `true` if `name` was resolved.
    pub fn contains(&self, name: &CStr) -> bool {
        self.functions.contains_key(name)
    }

    /// The number of resolved entry points.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Returns `name` cast to the function pointer type `F`.
    ///
    /// # Safety
    ///
    /// `F` must be the `PFN_` type matching `name`.
    pub unsafe fn typed<F: Copy>(&self, name: &CStr) -> Option<F> {
        debug_assert_eq!(
            std::mem::size_of::<F>(),
            std::mem::size_of::<VoidFunction>()
        );
        self.get(name)
            .map(|function| std::mem::transmute_copy::<VoidFunction, F>(&function))
    }

    unsafe fn required<F: Copy>(&self, name: &CStr) -> Result<F> {
        self.typed(name).ok_or_else(|| {
            Error::SymbolResolutionFailed(name.to_string_lossy().into_owned())
        })
    }
}

/// The global entry points the engine itself calls.
#[derive(Debug, Clone, Copy)]
pub struct GlobalFns {
    /// `vkCreateInstance`
    pub create_instance: vk::PFN_vkCreateInstance,
    /// `vkEnumerateInstanceExtensionProperties`
    pub enumerate_instance_extension_properties: vk::PFN_vkEnumerateInstanceExtensionProperties,
    /// `vkEnumerateInstanceLayerProperties`
    pub enumerate_instance_layer_properties: vk::PFN_vkEnumerateInstanceLayerProperties,
    /// `vkEnumerateInstanceVersion`, absent on Vulkan 1.0 loaders.
    pub enumerate_instance_version: Option<vk::PFN_vkEnumerateInstanceVersion>,
}

impl GlobalFns {
    /// Picks the global functions out of a [`Tier::Global`] table.
    pub fn load(table: &SymbolTable) -> Result<Self> {
        // SAFETY: every name below is paired with its own `PFN_` type.
        unsafe {
            Ok(Self {
                create_instance: table.required(c"vkCreateInstance")?,
                enumerate_instance_extension_properties: table
                    .required(c"vkEnumerateInstanceExtensionProperties")?,
                enumerate_instance_layer_properties: table
                    .required(c"vkEnumerateInstanceLayerProperties")?,
                enumerate_instance_version: table.typed(c"vkEnumerateInstanceVersion"),
            })
        }
    }
}

/// The instance level entry points the engine itself calls.
#[derive(Debug, Clone, Copy)]
pub struct InstanceFns {
    /// `vkDestroyInstance`
    pub destroy_instance: vk::PFN_vkDestroyInstance,
    /// `vkEnumeratePhysicalDevices`
    pub enumerate_physical_devices: vk::PFN_vkEnumeratePhysicalDevices,
    /// `vkGetPhysicalDeviceProperties`
    pub get_physical_device_properties: vk::PFN_vkGetPhysicalDeviceProperties,
    /// `vkGetPhysicalDeviceQueueFamilyProperties`
    pub get_physical_device_queue_family_properties:
        vk::PFN_vkGetPhysicalDeviceQueueFamilyProperties,
    /// `vkEnumerateDeviceExtensionProperties`
    pub enumerate_device_extension_properties: vk::PFN_vkEnumerateDeviceExtensionProperties,
    /// `vkCreateDevice`
    pub create_device: vk::PFN_vkCreateDevice,
    /// `vkDestroyDevice`
    pub destroy_device: vk::PFN_vkDestroyDevice,
    /// `vkDestroySurfaceKHR`, present when `VK_KHR_surface` is enabled.
    pub destroy_surface_khr: Option<vk::PFN_vkDestroySurfaceKHR>,
    /// `vkGetPhysicalDeviceSurfaceSupportKHR`, present when `VK_KHR_surface`
    /// is enabled.
    pub get_physical_device_surface_support_khr:
        Option<vk::PFN_vkGetPhysicalDeviceSurfaceSupportKHR>,
}

impl InstanceFns {
    /// Picks the instance functions out of a [`Tier::Instance`] table.
    pub fn load(table: &SymbolTable) -> Result<Self> {
        // SAFETY: every name below is paired with its own `PFN_` type.
        unsafe {
            Ok(Self {
                destroy_instance: table.required(c"vkDestroyInstance")?,
                enumerate_physical_devices: table.required(c"vkEnumeratePhysicalDevices")?,
                get_physical_device_properties: table
                    .required(c"vkGetPhysicalDeviceProperties")?,
                get_physical_device_queue_family_properties: table
                    .required(c"vkGetPhysicalDeviceQueueFamilyProperties")?,
                enumerate_device_extension_properties: table
                    .required(c"vkEnumerateDeviceExtensionProperties")?,
                create_device: table.required(c"vkCreateDevice")?,
                destroy_device: table.required(c"vkDestroyDevice")?,
                destroy_surface_khr: table.typed(c"vkDestroySurfaceKHR"),
                get_physical_device_surface_support_khr: table
                    .typed(c"vkGetPhysicalDeviceSurfaceSupportKHR"),
            })
        }
    }
}
