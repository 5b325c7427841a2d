//! Errors produced while loading and negotiating with the Vulkan loader.

use ash::vk;

/// The error type of the loader interface.
///
/// Every variant is terminal for the operation that produced it: the
/// condition is either a missing system capability or a permanent mismatch
/// between what was requested and what the driver offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The loader shared library could not be opened.
    DriverNotFound(String),
    /// The loader library was opened but exports no `vkGetInstanceProcAddr`.
    EntrypointMissing,
    /// A required entry point resolved to null.
    SymbolResolutionFailed(String),
    /// A two-call enumeration kept changing its count between calls.
    EnumerationUnstable,
    /// No physical device advertises every required device extension. Holds
    /// the first unmet extension of the first enumerated device, if any
    /// device was enumerated at all.
    NoCapableUnit(Option<String>),
    /// Devices with the required extensions exist, but none has a queue
    /// family matching the requested predicate.
    NoCapableQueueFamily,
    /// `vkCreateInstance` (or `vkCreateDevice`) returned a failure code.
    ContextCreationFailed(vk::Result),
    /// Any other non-success status returned by the driver.
    Driver(vk::Result),
    /// Everything else.
    Other(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DriverNotFound(library) => {
                write!(f, "The vulkan loader ({library}) could not be found")
            }
            Self::EntrypointMissing => write!(
                f,
                "Vulkan loader found, but loading vkGetInstanceProcAddr failed"
            ),
            Self::SymbolResolutionFailed(name) => {
                write!(f, "Loading the entry point {name} failed")
            }
            Self::EnumerationUnstable => write!(
                f,
                "The driver reported a different element count on every enumeration attempt"
            ),
            Self::NoCapableUnit(Some(extension)) => write!(
                f,
                "No physical device supports the required extensions (missing {extension})"
            ),
            Self::NoCapableUnit(None) => write!(f, "No physical device is available"),
            Self::NoCapableQueueFamily => write!(
                f,
                "No physical device has a queue family with the requested capabilities"
            ),
            Self::ContextCreationFailed(result) => write!(f, "Context creation failed: {result}"),
            Self::Driver(result) => write!(f, "The driver returned {result}"),
            Self::Other(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for Error {}

impl From<vk::Result> for Error {
    fn from(value: vk::Result) -> Self {
        Self::Driver(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Self::Other(value.to_owned())
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self::Other(value)
    }
}

/// The result type used throughout the loader interface.
pub type Result<T = (), E = Error> = std::result::Result<T, E>;

/// Converts a raw driver status into a [`Result`], treating only
/// [`vk::Result::SUCCESS`] as success.
pub fn check(result: vk::Result) -> Result {
    match result {
        vk::Result::SUCCESS => Ok(()),
        other => Err(Error::Driver(other)),
    }
}
