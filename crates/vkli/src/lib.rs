//! `vkli` finds the Vulkan loader at runtime and brings up an instance and a
//! device from it.
//!
//! Nothing is linked against the loader: [`Entrypoint::load`] opens the
//! platform's loader library and takes `vkGetInstanceProcAddr` from it, and
//! every other entry point is resolved through that function. On top of
//! that the crate
//!
//! * lists the layers and instance extensions available
//!   ([`CapabilityCatalog`]),
//! * picks the optional layers and extensions to enable from ordered
//!   wish-lists ([`negotiate`]),
//! * selects a physical device and queue family ([`select`]),
//! * and owns the resulting handles, destroying them in reverse order of
//!   creation ([`Instance`], [`Surface`], [`Device`], [`Session`]).
//!
//! ```no_run
//! let vulkan = vkli::init_vulkan().expect("no Vulkan loader");
//! vulkan.catalog().log_summary();
//! let instance = vulkan.default_instance().expect("no instance");
//! let units = instance.enumerate_units().unwrap();
//! let selection = vkli::select(&units, &["VK_KHR_swapchain"], vkli::graphics_queue).unwrap();
//! let device = instance.create_device(&selection, &["VK_KHR_swapchain"]).unwrap();
//! ```

#![warn(missing_docs)]

pub use vkli_sys;
pub use vkli_sys::{vk, Error, Result};

mod catalog;
pub use catalog::*;
mod config;
pub use config::*;
mod device;
pub use device::{graphics_queue, select, Device, ExecutionUnit, QueueFamily, Selection};
mod entry;
pub use entry::Entrypoint;
mod enumerate;
mod instance;
pub use instance::Instance;
mod negotiate;
pub use negotiate::*;
mod session;
pub use session::Session;
mod surface;
pub use surface::{Surface, SurfaceSource};
mod symbols;
pub use symbols::{GlobalFns, InstanceFns, SymbolTable, VoidFunction};
mod vulkan;
pub use vulkan::{init_vulkan, Vulkan};

#[cfg(test)]
mod fake_driver;
