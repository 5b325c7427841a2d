//! An in-process stand-in for a Vulkan loader, used by the unit tests.
//!
//! The driver state is thread local; every test runs on its own thread and
//! starts from [`install`].

use std::cell::RefCell;
use std::ffi::{c_char, c_void, CStr};

use ash::vk::{self, Handle};
use vkli_sys::{symbols, Requirement, Tier};

use crate::symbols::VoidFunction;
use crate::Entrypoint;

const INSTANCE: u64 = 0x1000;
const PHYSICAL_DEVICE_BASE: u64 = 0x2000;
const DEVICE: u64 = 0x3000;

/// A physical device exposed by the fake driver.
#[derive(Debug, Clone, Default)]
pub struct FakeUnit {
    pub name: &'static str,
    pub extensions: Vec<&'static str>,
    pub queue_families: Vec<vk::QueueFlags>,
    /// Families able to present; `None` means every family.
    pub present_families: Option<Vec<u32>>,
}

impl FakeUnit {
    pub fn new(name: &'static str, extensions: &[&'static str], queue_families: &[vk::QueueFlags]) -> Self {
        Self {
            name,
            extensions: extensions.to_vec(),
            queue_families: queue_families.to_vec(),
            present_families: None,
        }
    }
}

/// What the fake driver offers, and what it observed.
#[derive(Debug, Clone)]
pub struct FakeDriver {
    pub layers: Vec<(&'static str, &'static str)>,
    pub extensions: Vec<&'static str>,
    pub units: Vec<FakeUnit>,
    /// An entry point the driver pretends not to have.
    pub missing_symbol: Option<&'static CStr>,
    pub create_result: vk::Result,
    pub device_create_result: vk::Result,
    /// The number of fill calls that report a changed count.
    pub unstable_fills: u32,

    pub resolve_calls: usize,
    pub destroy_instance_calls: usize,
    pub destroy_device_calls: usize,
    pub destroy_surface_calls: usize,
    pub teardown_order: Vec<&'static str>,
    pub application_name: String,
    pub enabled_layers: Vec<String>,
    pub enabled_extensions: Vec<String>,
    pub enabled_device_extensions: Vec<String>,
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            extensions: Vec::new(),
            units: Vec::new(),
            missing_symbol: None,
            create_result: vk::Result::SUCCESS,
            device_create_result: vk::Result::SUCCESS,
            unstable_fills: 0,
            resolve_calls: 0,
            destroy_instance_calls: 0,
            destroy_device_calls: 0,
            destroy_surface_calls: 0,
            teardown_order: Vec::new(),
            application_name: String::new(),
            enabled_layers: Vec::new(),
            enabled_extensions: Vec::new(),
            enabled_device_extensions: Vec::new(),
        }
    }
}

thread_local! {
    static DRIVER: RefCell<FakeDriver> = RefCell::new(FakeDriver::default());
}

/// Replaces the driver of the current thread and returns its entry point.
pub fn install(driver: FakeDriver) -> Entrypoint {
    DRIVER.with(|state| *state.borrow_mut() = driver);
    Entrypoint::from_raw(get_instance_proc_addr)
}

/// Runs `f` on the driver of the current thread.
pub fn with<R>(f: impl FnOnce(&mut FakeDriver) -> R) -> R {
    DRIVER.with(|state| f(&mut state.borrow_mut()))
}

fn erase(function: *const ()) -> VoidFunction {
    // SAFETY: only ever called with `extern "system"` functions; callers
    // cast the result back to the matching signature.
    unsafe { std::mem::transmute::<*const (), VoidFunction>(function) }
}

unsafe extern "system" fn get_instance_proc_addr(
    instance: vk::Instance,
    name: *const c_char,
) -> vk::PFN_vkVoidFunction {
    if name.is_null() {
        return None;
    }
    let name = CStr::from_ptr(name);
    let (missing, surface_enabled) = with(|driver| {
        driver.resolve_calls += 1;
        (
            driver.missing_symbol == Some(name),
            driver.enabled_extensions.iter().any(|e| e == "VK_KHR_surface"),
        )
    });
    if missing {
        return None;
    }

    let entry = symbols::find(name)?;
    if entry.tier == Tier::Instance {
        if instance.is_null() {
            return None;
        }
        if entry.requirement == Requirement::Optional && !surface_enabled {
            return None;
        }
    }

    let function = match name.to_bytes() {
        b"vkCreateInstance" => create_instance as *const (),
        b"vkEnumerateInstanceExtensionProperties" => enumerate_instance_extensions as *const (),
        b"vkEnumerateInstanceLayerProperties" => enumerate_instance_layers as *const (),
        b"vkEnumerateInstanceVersion" => enumerate_instance_version as *const (),
        b"vkDestroyInstance" => destroy_instance as *const (),
        b"vkEnumeratePhysicalDevices" => enumerate_physical_devices as *const (),
        b"vkGetPhysicalDeviceProperties" => get_physical_device_properties as *const (),
        b"vkGetPhysicalDeviceQueueFamilyProperties" => get_queue_family_properties as *const (),
        b"vkEnumerateDeviceExtensionProperties" => enumerate_device_extensions as *const (),
        b"vkCreateDevice" => create_device as *const (),
        b"vkDestroyDevice" => destroy_device as *const (),
        b"vkDestroySurfaceKHR" => destroy_surface as *const (),
        b"vkGetPhysicalDeviceSurfaceSupportKHR" => get_surface_support as *const (),
        _ => noop as *const (),
    };
    Some(erase(function))
}

unsafe extern "system" fn noop() {}

fn write_name(dst: &mut [c_char], name: &str) {
    let limit = dst.len() - 1;
    for (dst, src) in dst.iter_mut().zip(name.bytes().take(limit)) {
        *dst = src as c_char;
    }
}

/// Answers a count/fill call the way a driver does.
unsafe fn fill<T: Clone>(items: &[T], count: *mut u32, out: *mut T) -> vk::Result {
    if out.is_null() {
        *count = items.len() as u32;
        return vk::Result::SUCCESS;
    }

    let unstable = with(|driver| {
        let unstable = driver.unstable_fills > 0;
        if unstable && driver.unstable_fills != u32::MAX {
            driver.unstable_fills -= 1;
        }
        unstable
    });

    let written = items.len().min(*count as usize);
    for (i, item) in items.iter().take(written).enumerate() {
        out.add(i).write(item.clone());
    }
    if unstable {
        *count = items.len() as u32 + 1;
        return vk::Result::INCOMPLETE;
    }
    *count = written as u32;
    if written < items.len() {
        vk::Result::INCOMPLETE
    } else {
        vk::Result::SUCCESS
    }
}

unsafe fn names(pointers: *const *const c_char, count: u32) -> Vec<String> {
    (0..count as usize)
        .map(|i| CStr::from_ptr(*pointers.add(i)).to_string_lossy().into_owned())
        .collect()
}

fn extension_properties(names: &[&str]) -> Vec<vk::ExtensionProperties> {
    names
        .iter()
        .map(|name| {
            let mut properties = vk::ExtensionProperties {
                spec_version: 1,
                ..Default::default()
            };
            write_name(&mut properties.extension_name, name);
            properties
        })
        .collect()
}

fn unit_index(physical_device: vk::PhysicalDevice) -> usize {
    (physical_device.as_raw() - PHYSICAL_DEVICE_BASE) as usize
}

fn unit(physical_device: vk::PhysicalDevice) -> FakeUnit {
    with(|driver| driver.units[unit_index(physical_device)].clone())
}

unsafe extern "system" fn create_instance(
    create_info: *const vk::InstanceCreateInfo,
    _allocator: *const c_void,
    instance: *mut vk::Instance,
) -> vk::Result {
    let info = &*create_info;
    let application_name = if info.p_application_info.is_null()
        || (*info.p_application_info).p_application_name.is_null()
    {
        String::new()
    } else {
        CStr::from_ptr((*info.p_application_info).p_application_name)
            .to_string_lossy()
            .into_owned()
    };
    let layers = names(info.pp_enabled_layer_names, info.enabled_layer_count);
    let extensions = names(info.pp_enabled_extension_names, info.enabled_extension_count);

    with(|driver| {
        driver.application_name = application_name;
        driver.enabled_layers = layers;
        driver.enabled_extensions = extensions;
        if driver.create_result == vk::Result::SUCCESS {
            *instance = vk::Instance::from_raw(INSTANCE);
        }
        driver.create_result
    })
}

unsafe extern "system" fn enumerate_instance_extensions(
    _layer_name: *const c_char,
    count: *mut u32,
    properties: *mut vk::ExtensionProperties,
) -> vk::Result {
    let items = with(|driver| extension_properties(&driver.extensions));
    fill(&items, count, properties)
}

unsafe extern "system" fn enumerate_instance_layers(
    count: *mut u32,
    properties: *mut vk::LayerProperties,
) -> vk::Result {
    let items: Vec<_> = with(|driver| {
        driver
            .layers
            .iter()
            .map(|(name, description)| {
                let mut layer = vk::LayerProperties {
                    spec_version: vk::API_VERSION_1_3,
                    implementation_version: 1,
                    ..Default::default()
                };
                write_name(&mut layer.layer_name, name);
                write_name(&mut layer.description, description);
                layer
            })
            .collect()
    });
    fill(&items, count, properties)
}

unsafe extern "system" fn enumerate_instance_version(version: *mut u32) -> vk::Result {
    *version = vk::API_VERSION_1_3;
    vk::Result::SUCCESS
}

unsafe extern "system" fn destroy_instance(_instance: vk::Instance, _allocator: *const c_void) {
    with(|driver| {
        driver.destroy_instance_calls += 1;
        driver.teardown_order.push("instance");
    });
}

unsafe extern "system" fn enumerate_physical_devices(
    _instance: vk::Instance,
    count: *mut u32,
    devices: *mut vk::PhysicalDevice,
) -> vk::Result {
    let items: Vec<_> = with(|driver| {
        (0..driver.units.len() as u64)
            .map(|i| vk::PhysicalDevice::from_raw(PHYSICAL_DEVICE_BASE + i))
            .collect()
    });
    fill(&items, count, devices)
}

unsafe extern "system" fn get_physical_device_properties(
    physical_device: vk::PhysicalDevice,
    properties: *mut vk::PhysicalDeviceProperties,
) {
    let unit = unit(physical_device);
    let properties = &mut *properties;
    properties.api_version = vk::API_VERSION_1_3;
    properties.device_type = vk::PhysicalDeviceType::DISCRETE_GPU;
    properties.vendor_id = 0x10de;
    properties.device_id = unit_index(physical_device) as u32;
    write_name(&mut properties.device_name, unit.name);
}

unsafe extern "system" fn get_queue_family_properties(
    physical_device: vk::PhysicalDevice,
    count: *mut u32,
    properties: *mut vk::QueueFamilyProperties,
) {
    let items: Vec<_> = unit(physical_device)
        .queue_families
        .iter()
        .map(|&queue_flags| vk::QueueFamilyProperties {
            queue_flags,
            queue_count: 1,
            ..Default::default()
        })
        .collect();
    fill(&items, count, properties);
}

unsafe extern "system" fn enumerate_device_extensions(
    physical_device: vk::PhysicalDevice,
    _layer_name: *const c_char,
    count: *mut u32,
    properties: *mut vk::ExtensionProperties,
) -> vk::Result {
    let items = extension_properties(&unit(physical_device).extensions);
    fill(&items, count, properties)
}

unsafe extern "system" fn create_device(
    _physical_device: vk::PhysicalDevice,
    create_info: *const vk::DeviceCreateInfo,
    _allocator: *const c_void,
    device: *mut vk::Device,
) -> vk::Result {
    let info = &*create_info;
    let extensions = names(info.pp_enabled_extension_names, info.enabled_extension_count);
    with(|driver| {
        driver.enabled_device_extensions = extensions;
        if driver.device_create_result == vk::Result::SUCCESS {
            *device = vk::Device::from_raw(DEVICE);
        }
        driver.device_create_result
    })
}

unsafe extern "system" fn destroy_device(_device: vk::Device, _allocator: *const c_void) {
    with(|driver| {
        driver.destroy_device_calls += 1;
        driver.teardown_order.push("device");
    });
}

unsafe extern "system" fn destroy_surface(
    _instance: vk::Instance,
    _surface: vk::SurfaceKHR,
    _allocator: *const c_void,
) {
    with(|driver| {
        driver.destroy_surface_calls += 1;
        driver.teardown_order.push("surface");
    });
}

unsafe extern "system" fn get_surface_support(
    physical_device: vk::PhysicalDevice,
    queue_family_index: u32,
    _surface: vk::SurfaceKHR,
    supported: *mut vk::Bool32,
) -> vk::Result {
    let presents = match unit(physical_device).present_families {
        Some(families) => families.contains(&queue_family_index),
        None => true,
    };
    *supported = presents.into();
    vk::Result::SUCCESS
}
