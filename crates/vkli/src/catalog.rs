//! The layers and instance extensions the installed loader advertises.

use ash::vk;
use vkli_sys::Result;

use crate::enumerate::{fixed_str, two_call};
use crate::negotiate::{negotiate, NegotiatedSet, PriorityList};
use crate::symbols::GlobalFns;

/// An instance layer reported by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    /// The layer name, e.g. `VK_LAYER_KHRONOS_validation`.
    pub name: String,
    /// The human readable description.
    pub description: String,
    /// The Vulkan version the layer was written against.
    pub spec_version: u32,
    /// The layer's own version.
    pub implementation_version: u32,
}

impl From<&vk::LayerProperties> for LayerInfo {
    fn from(value: &vk::LayerProperties) -> Self {
        Self {
            name: fixed_str(&value.layer_name),
            description: fixed_str(&value.description),
            spec_version: value.spec_version,
            implementation_version: value.implementation_version,
        }
    }
}

/// An instance extension reported by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionInfo {
    /// The extension name, e.g. `VK_KHR_surface`.
    pub name: String,
    /// The extension's revision.
    pub spec_version: u32,
}

impl From<&vk::ExtensionProperties> for ExtensionInfo {
    fn from(value: &vk::ExtensionProperties) -> Self {
        Self {
            name: fixed_str(&value.extension_name),
            spec_version: value.spec_version,
        }
    }
}

/// Everything the loader offers at the instance level, in the order the
/// loader reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityCatalog {
    layers: Vec<LayerInfo>,
    extensions: Vec<ExtensionInfo>,
}

impl CapabilityCatalog {
    /// Queries the loader for its layers and instance extensions.
    pub fn enumerate(fns: &GlobalFns) -> Result<Self> {
        let layers = two_call("instance layers", |count, properties| unsafe {
            (fns.enumerate_instance_layer_properties)(count, properties)
        })?;
        let extensions = two_call("instance extensions", |count, properties| unsafe {
            (fns.enumerate_instance_extension_properties)(std::ptr::null(), count, properties)
        })?;

        Ok(Self {
            layers: layers.iter().map(LayerInfo::from).collect(),
            extensions: extensions.iter().map(ExtensionInfo::from).collect(),
        })
    }

    /// Builds a catalog from already known capabilities.
    pub fn from_parts(layers: Vec<LayerInfo>, extensions: Vec<ExtensionInfo>) -> Self {
        Self { layers, extensions }
    }

    /// The available layers.
    pub fn layers(&self) -> &[LayerInfo] {
        &self.layers
    }

    /// The available instance extensions.
    pub fn extensions(&self) -> &[ExtensionInfo] {
        &self.extensions
    }

    /// Returns `true` if the layer `name` is available.
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.name == name)
    }

    /// Returns `true` if the instance extension `name` is available.
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|extension| extension.name == name)
    }

    /// The names of the available layers.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|layer| layer.name.as_str())
    }

    /// The names of the available instance extensions.
    pub fn extension_names(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(|extension| extension.name.as_str())
    }

    /// Negotiates layer priority lists against this catalog.
    pub fn negotiate_layers<'a>(
        &self,
        lists: impl IntoIterator<Item = &'a PriorityList>,
    ) -> NegotiatedSet {
        negotiate(lists, |name| self.has_layer(name))
    }

    /// Negotiates extension priority lists against this catalog.
    pub fn negotiate_extensions<'a>(
        &self,
        lists: impl IntoIterator<Item = &'a PriorityList>,
    ) -> NegotiatedSet {
        negotiate(lists, |name| self.has_extension(name))
    }

    /// Writes every available layer and extension to the log.
    pub fn log_summary(&self) {
        log::info!("{} Available Layers:", self.layers.len());
        for layer in &self.layers {
            log::info!("{}> {}", layer.name, layer.description);
        }
        log::info!("{} Available Extensions:", self.extensions.len());
        for extension in &self.extensions {
            log::info!("{}> {}", extension.name, extension.spec_version);
        }
    }
}
