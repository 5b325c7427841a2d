//! `vkli-sys` provides the low-level pieces of the Vulkan loader interface:
//! opening the system loader library, the static table of entry point names
//! and the error type shared with the `vkli` crate.

#![warn(missing_docs)]

pub use ash::vk;

pub mod error;
pub use error::*;
pub mod library;
pub use library::{Library, LIBRARY_NAME};
pub mod symbols;
pub use symbols::{Requirement, SymbolEntry, Tier};
