//! The "count, then fill" enumeration idiom of the Vulkan API.

use std::ffi::c_char;

use ash::vk;
use vkli_sys::{Error, Result};

/// How many times a count/fill pair is issued before giving up.
pub(crate) const ATTEMPTS: usize = 2;

/// Runs a two-call enumeration: `call` is first invoked with a null output
/// pointer to obtain the count, then with a buffer of that size.
///
/// If the count changes between the two calls (or the driver reports
/// [`vk::Result::INCOMPLETE`]) the pair is repeated; if it still doesn't
/// settle the enumeration fails with [`Error::EnumerationUnstable`].
pub(crate) fn two_call<T, F>(what: &str, mut call: F) -> Result<Vec<T>>
where
    T: Default + Clone,
    F: FnMut(&mut u32, *mut T) -> vk::Result,
{
    for attempt in 1..=ATTEMPTS {
        let mut count = 0u32;
        vkli_sys::check(call(&mut count, std::ptr::null_mut()))?;

        let mut items = vec![T::default(); count as usize];
        let mut written = count;
        match call(&mut written, items.as_mut_ptr()) {
            vk::Result::SUCCESS if written == count => return Ok(items),
            vk::Result::SUCCESS | vk::Result::INCOMPLETE => log::debug!(
                "Enumerating {what} (attempt {attempt}): the count changed from {count} to {written}."
            ),
            other => return Err(Error::Driver(other)),
        }
    }

    Err(Error::EnumerationUnstable)
}

/// Reads a fixed-size, nul-terminated name array filled in by the driver.
pub(crate) fn fixed_str(raw: &[c_char]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}
