//! Physical device discovery, selection and logical device creation.

use ash::vk;
use vkli_sys::{Error, Result};

use crate::config::{PORTABILITY_ENUMERATION_EXTENSION, PORTABILITY_SUBSET_EXTENSION};
use crate::enumerate::{fixed_str, two_call};
use crate::instance::{c_pointers, Instance};

/// A queue family of a physical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamily {
    /// The family index, as used in `vkGetDeviceQueue`.
    pub index: u32,
    /// What the queues of this family can do.
    pub flags: vk::QueueFlags,
    /// The number of queues in the family.
    pub queue_count: u32,
}

impl QueueFamily {
    /// Returns `true` if the family has queues supporting all of `flags`.
    pub fn supports(&self, flags: vk::QueueFlags) -> bool {
        self.queue_count > 0 && self.flags.contains(flags)
    }

    /// Returns `true` if the family supports graphics operations.
    pub fn supports_graphics(&self) -> bool {
        self.supports(vk::QueueFlags::GRAPHICS)
    }
}

/// A snapshot of one physical device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionUnit {
    /// The physical device handle.
    pub handle: vk::PhysicalDevice,
    /// The device name reported by the driver.
    pub name: String,
    /// Discrete, integrated, virtual, ...
    pub device_type: vk::PhysicalDeviceType,
    /// The highest Vulkan version the device supports.
    pub api_version: u32,
    /// The PCI vendor id.
    pub vendor_id: u32,
    /// The vendor specific device id.
    pub device_id: u32,
    /// The advertised device extensions, in driver order.
    pub extensions: Vec<String>,
    /// The queue families, in index order.
    pub queue_families: Vec<QueueFamily>,
}

impl ExecutionUnit {
    /// Returns `true` if the device advertises the extension `name`.
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|extension| extension == name)
    }

    /// Returns the first of `required` this device doesn't advertise.
    pub fn first_missing_extension<'a, S: AsRef<str>>(&self, required: &'a [S]) -> Option<&'a str> {
        required
            .iter()
            .map(|extension| extension.as_ref())
            .find(|extension| !self.has_extension(extension))
    }
}

/// The outcome of [`select`]: a device and one of its queue families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The chosen device.
    pub unit: ExecutionUnit,
    /// The index of the chosen queue family on [`Selection::unit`].
    pub queue_family_index: u32,
}

/// A queue predicate accepting graphics capable families.
pub fn graphics_queue(_unit: &ExecutionUnit, family: &QueueFamily) -> bool {
    family.supports_graphics()
}

/// Selects a device and a queue family.
///
/// Devices missing any of `required_extensions` are dropped first; of the
/// rest, the first device (in enumeration order) with a queue family
/// satisfying `predicate` is chosen, together with its first such family.
pub fn select<S, P>(units: &[ExecutionUnit], required_extensions: &[S], predicate: P) -> Result<Selection>
where
    S: AsRef<str>,
    P: Fn(&ExecutionUnit, &QueueFamily) -> bool,
{
    let mut first_missing = None;
    let mut capable = Vec::with_capacity(units.len());
    for unit in units {
        match unit.first_missing_extension(required_extensions) {
            Some(missing) => {
                log::debug!("{} doesn't support {missing}.", unit.name);
                first_missing.get_or_insert_with(|| missing.to_owned());
            }
            None => capable.push(unit),
        }
    }

    if capable.is_empty() {
        return Err(Error::NoCapableUnit(first_missing));
    }

    capable
        .into_iter()
        .find_map(|unit| {
            unit.queue_families
                .iter()
                .find(|family| predicate(unit, family))
                .map(|family| Selection {
                    unit: unit.clone(),
                    queue_family_index: family.index,
                })
        })
        .inspect(|selection| {
            log::info!(
                "Selected {} (queue family {}).",
                selection.unit.name,
                selection.queue_family_index
            )
        })
        .ok_or(Error::NoCapableQueueFamily)
}

pub(crate) fn enumerate_units(instance: &Instance) -> Result<Vec<ExecutionUnit>> {
    let fns = instance.fns();
    let handles = two_call("physical devices", |count, devices| unsafe {
        (fns.enumerate_physical_devices)(instance.handle(), count, devices)
    })?;

    handles
        .into_iter()
        .map(|handle| {
            let mut properties = vk::PhysicalDeviceProperties::default();
            unsafe { (fns.get_physical_device_properties)(handle, &mut properties) };

            let queue_families = two_call("queue families", |count, families| {
                unsafe { (fns.get_physical_device_queue_family_properties)(handle, count, families) };
                vk::Result::SUCCESS
            })?;
            let extensions = two_call("device extensions", |count, extensions| unsafe {
                (fns.enumerate_device_extension_properties)(handle, std::ptr::null(), count, extensions)
            })?;

            Ok(ExecutionUnit {
                handle,
                name: fixed_str(&properties.device_name),
                device_type: properties.device_type,
                api_version: properties.api_version,
                vendor_id: properties.vendor_id,
                device_id: properties.device_id,
                extensions: extensions
                    .iter()
                    .map(|extension| fixed_str(&extension.extension_name))
                    .collect(),
                queue_families: queue_families
                    .iter()
                    .zip(0..)
                    .map(|(family, index)| QueueFamily {
                        index,
                        flags: family.queue_flags,
                        queue_count: family.queue_count,
                    })
                    .collect(),
            })
        })
        .collect()
}

/// A logical device, destroyed when dropped.
#[derive(Debug)]
pub struct Device {
    handle: vk::Device,
    physical_device: vk::PhysicalDevice,
    queue_family_index: u32,
    destroy: vk::PFN_vkDestroyDevice,
    instance: Instance,
}

impl Device {
    pub(crate) fn create<S: AsRef<str>>(
        instance: &Instance,
        selection: &Selection,
        extensions: &[S],
    ) -> Result<Self> {
        let mut extensions: Vec<&str> = extensions.iter().map(|name| name.as_ref()).collect();
        if instance
            .enabled_extensions()
            .contains(PORTABILITY_ENUMERATION_EXTENSION)
            && selection.unit.has_extension(PORTABILITY_SUBSET_EXTENSION)
            && !extensions.contains(&PORTABILITY_SUBSET_EXTENSION)
        {
            log::debug!("{} is a portability device.", selection.unit.name);
            extensions.push(PORTABILITY_SUBSET_EXTENSION);
        }

        let extension_names = extensions
            .iter()
            .map(|&name| std::ffi::CString::new(name))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| "Couldn't convert the device extensions to CStrings.")?;
        let extension_pointers = c_pointers(&extension_names);

        let priorities = [1.0f32];
        let queue_info = vk::DeviceQueueCreateInfo::default()
            .queue_family_index(selection.queue_family_index)
            .queue_priorities(&priorities);
        let create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(std::slice::from_ref(&queue_info))
            .enabled_extension_names(&extension_pointers);

        let fns = instance.fns();
        let mut handle = vk::Device::null();
        let result = unsafe {
            (fns.create_device)(selection.unit.handle, &create_info, std::ptr::null(), &mut handle)
        };
        if result != vk::Result::SUCCESS {
            return Err(Error::ContextCreationFailed(result));
        }
        log::info!("Logical device created on {}.", selection.unit.name);

        Ok(Self {
            handle,
            physical_device: selection.unit.handle,
            queue_family_index: selection.queue_family_index,
            destroy: fns.destroy_device,
            instance: instance.clone(),
        })
    }

    /// The raw device handle.
    pub fn handle(&self) -> vk::Device {
        self.handle
    }

    /// The physical device this device was created on.
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    /// The queue family the device's queue belongs to.
    pub fn queue_family_index(&self) -> u32 {
        self.queue_family_index
    }

    /// The instance the device was created from.
    pub fn instance(&self) -> &Instance {
        &self.instance
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        unsafe { (self.destroy)(self.handle, std::ptr::null()) };
        log::debug!("Logical device {:?} destroyed.", self.handle);
    }
}
