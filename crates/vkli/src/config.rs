//! Instance configuration: application identity and capability wish-lists.

use ash::vk;
use derive_builder::Builder;

use crate::negotiate::PriorityList;
use crate::surface::SurfaceSource;

/// The name of the Khronos validation layer.
pub const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";
/// The name of the generic surface extension.
pub const SURFACE_EXTENSION: &str = "VK_KHR_surface";
/// The extension that lets portability (non-conformant) drivers be listed.
pub const PORTABILITY_ENUMERATION_EXTENSION: &str = "VK_KHR_portability_enumeration";
/// The device extension portability drivers advertise; it has to be enabled
/// whenever it is advertised.
pub const PORTABILITY_SUBSET_EXTENSION: &str = "VK_KHR_portability_subset";

/// Describes the instance to create.
///
/// Layers and extensions are requested as [`PriorityList`]s: each list
/// contributes its first available candidate, and a list without an
/// available candidate is silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into), default)]
pub struct InstanceConfig {
    /// The application name reported to the driver.
    pub application_name: String,
    /// The application version, see [`vk::make_api_version`].
    pub application_version: u32,
    /// The engine name reported to the driver, if any.
    #[builder(setter(into, strip_option))]
    pub engine_name: Option<String>,
    /// The engine version.
    pub engine_version: u32,
    /// The highest Vulkan version the application uses.
    pub api_version: u32,
    /// Layer wish-lists.
    #[builder(setter(into, each(name = "layer_priority", into)))]
    pub layer_priorities: Vec<PriorityList>,
    /// Instance extension wish-lists.
    #[builder(setter(into, each(name = "extension_priority", into)))]
    pub extension_priorities: Vec<PriorityList>,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        let platform_surface = vkli_sys::symbols::PLATFORM_SURFACE_EXTENSION
            .to_string_lossy()
            .into_owned();
        Self {
            application_name: "Vulkan Example Application".to_owned(),
            application_version: vk::make_api_version(0, 1, 0, 0),
            engine_name: None,
            engine_version: 0,
            api_version: vk::API_VERSION_1_2,
            layer_priorities: vec![PriorityList::single(VALIDATION_LAYER)],
            extension_priorities: vec![
                PriorityList::single(SURFACE_EXTENSION),
                PriorityList::single(platform_surface),
            ],
        }
    }
}

impl InstanceConfig {
    /// Returns a builder starting from [`InstanceConfig::default`].
    pub fn builder() -> InstanceConfigBuilder {
        InstanceConfigBuilder::default()
    }

    /// A configuration without any layer or extension wish-lists.
    pub fn bare(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            layer_priorities: Vec::new(),
            extension_priorities: Vec::new(),
            ..Default::default()
        }
    }

    /// Appends the instance extensions `source` needs, each as its own
    /// single-candidate list.
    pub fn with_surface(mut self, source: &dyn SurfaceSource) -> Self {
        for extension in source.required_extensions() {
            let list = PriorityList::single(extension);
            if !self.extension_priorities.contains(&list) {
                self.extension_priorities.push(list);
            }
        }
        self
    }
}

impl From<InstanceConfigBuilderError> for vkli_sys::Error {
    fn from(value: InstanceConfigBuilderError) -> Self {
        Self::Other(value.to_string())
    }
}
