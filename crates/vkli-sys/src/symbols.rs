//! The static table of Vulkan entry points the loader interface resolves.
//!
//! Entry points are split into two tiers. [`Tier::Global`] entry points are
//! resolved with a null instance and are usable before any instance exists.
//! [`Tier::Instance`] entry points are resolved against a live instance and
//! have to be resolved again for every new instance.

use std::ffi::CStr;

/// The resolution tier of an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Resolvable through `vkGetInstanceProcAddr(NULL, name)`.
    Global,
    /// Resolvable through `vkGetInstanceProcAddr(instance, name)`.
    Instance,
}

/// Whether a missing entry point invalidates its whole tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// The tier fails to resolve without this entry point.
    Required,
    /// The entry point belongs to an extension or a newer API version and
    /// may legitimately be absent.
    Optional,
}

/// A single entry of the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolEntry {
    /// The exported name, as passed to `vkGetInstanceProcAddr`.
    pub name: &'static CStr,
    /// The tier the entry point is resolved in.
    pub tier: Tier,
    /// Whether the entry point is required.
    pub requirement: Requirement,
}

impl SymbolEntry {
    /// Returns `true` if the tier cannot be resolved without this entry.
    pub const fn is_required(&self) -> bool {
        matches!(self.requirement, Requirement::Required)
    }
}

const fn global(name: &'static CStr) -> SymbolEntry {
    SymbolEntry {
        name,
        tier: Tier::Global,
        requirement: Requirement::Required,
    }
}

const fn instance(name: &'static CStr) -> SymbolEntry {
    SymbolEntry {
        name,
        tier: Tier::Instance,
        requirement: Requirement::Required,
    }
}

const fn optional(entry: SymbolEntry) -> SymbolEntry {
    SymbolEntry {
        requirement: Requirement::Optional,
        ..entry
    }
}

/// The bootstrap entry point itself. It is obtained from the loader library
/// rather than through itself, so it is not part of [`SYMBOLS`].
pub const ENTRYPOINT: &CStr = crate::library::ENTRYPOINT_NAME;

/// The platform independent entry points, global tier first.
pub static SYMBOLS: &[SymbolEntry] = &[
    global(c"vkCreateInstance"),
    global(c"vkEnumerateInstanceExtensionProperties"),
    global(c"vkEnumerateInstanceLayerProperties"),
    // Vulkan 1.1; a 1.0 loader doesn't export it.
    optional(global(c"vkEnumerateInstanceVersion")),
    instance(c"vkDestroyInstance"),
    instance(c"vkEnumeratePhysicalDevices"),
    instance(c"vkGetDeviceProcAddr"),
    instance(c"vkGetPhysicalDeviceProperties"),
    instance(c"vkGetPhysicalDeviceQueueFamilyProperties"),
    instance(c"vkGetPhysicalDeviceMemoryProperties"),
    instance(c"vkGetPhysicalDeviceFeatures"),
    instance(c"vkGetPhysicalDeviceFormatProperties"),
    instance(c"vkGetPhysicalDeviceImageFormatProperties"),
    instance(c"vkCreateDevice"),
    instance(c"vkDestroyDevice"),
    instance(c"vkEnumerateDeviceLayerProperties"),
    instance(c"vkEnumerateDeviceExtensionProperties"),
    instance(c"vkGetDeviceQueue"),
    instance(c"vkQueueSubmit"),
    instance(c"vkQueueWaitIdle"),
    instance(c"vkDeviceWaitIdle"),
    instance(c"vkAllocateMemory"),
    instance(c"vkFreeMemory"),
    instance(c"vkMapMemory"),
    instance(c"vkUnmapMemory"),
    instance(c"vkFlushMappedMemoryRanges"),
    instance(c"vkInvalidateMappedMemoryRanges"),
    instance(c"vkGetDeviceMemoryCommitment"),
    instance(c"vkGetBufferMemoryRequirements"),
    instance(c"vkBindBufferMemory"),
    instance(c"vkGetImageMemoryRequirements"),
    instance(c"vkBindImageMemory"),
    instance(c"vkGetImageSparseMemoryRequirements"),
    instance(c"vkGetPhysicalDeviceSparseImageFormatProperties"),
    instance(c"vkQueueBindSparse"),
    instance(c"vkCreateFence"),
    instance(c"vkDestroyFence"),
    instance(c"vkResetFences"),
    instance(c"vkGetFenceStatus"),
    instance(c"vkWaitForFences"),
    instance(c"vkCreateSemaphore"),
    instance(c"vkDestroySemaphore"),
    instance(c"vkCreateEvent"),
    instance(c"vkDestroyEvent"),
    instance(c"vkGetEventStatus"),
    instance(c"vkSetEvent"),
    instance(c"vkResetEvent"),
    instance(c"vkCreateQueryPool"),
    instance(c"vkDestroyQueryPool"),
    instance(c"vkGetQueryPoolResults"),
    instance(c"vkResetQueryPool"),
    instance(c"vkCreateBuffer"),
    instance(c"vkDestroyBuffer"),
    instance(c"vkCreateBufferView"),
    instance(c"vkDestroyBufferView"),
    instance(c"vkCreateImage"),
    instance(c"vkDestroyImage"),
    instance(c"vkGetImageSubresourceLayout"),
    instance(c"vkCreateImageView"),
    instance(c"vkDestroyImageView"),
    instance(c"vkCreateShaderModule"),
    instance(c"vkDestroyShaderModule"),
    instance(c"vkCreatePipelineCache"),
    instance(c"vkDestroyPipelineCache"),
    instance(c"vkGetPipelineCacheData"),
    instance(c"vkMergePipelineCaches"),
    instance(c"vkCreateGraphicsPipelines"),
    instance(c"vkCreateComputePipelines"),
    instance(c"vkDestroyPipeline"),
    instance(c"vkCreatePipelineLayout"),
    instance(c"vkDestroyPipelineLayout"),
    instance(c"vkCreateSampler"),
    instance(c"vkDestroySampler"),
    instance(c"vkCreateDescriptorSetLayout"),
    instance(c"vkDestroyDescriptorSetLayout"),
    instance(c"vkCreateDescriptorPool"),
    instance(c"vkDestroyDescriptorPool"),
    instance(c"vkResetDescriptorPool"),
    instance(c"vkAllocateDescriptorSets"),
    instance(c"vkFreeDescriptorSets"),
    instance(c"vkUpdateDescriptorSets"),
    instance(c"vkCreateFramebuffer"),
    instance(c"vkDestroyFramebuffer"),
    instance(c"vkCreateRenderPass"),
    instance(c"vkDestroyRenderPass"),
    instance(c"vkGetRenderAreaGranularity"),
    instance(c"vkCreateCommandPool"),
    instance(c"vkDestroyCommandPool"),
    instance(c"vkResetCommandPool"),
    instance(c"vkAllocateCommandBuffers"),
    instance(c"vkFreeCommandBuffers"),
    instance(c"vkBeginCommandBuffer"),
    instance(c"vkEndCommandBuffer"),
    instance(c"vkResetCommandBuffer"),
    instance(c"vkCmdBindPipeline"),
    instance(c"vkCmdSetViewport"),
    instance(c"vkCmdSetScissor"),
    instance(c"vkCmdSetLineWidth"),
    instance(c"vkCmdSetDepthBias"),
    instance(c"vkCmdSetBlendConstants"),
    instance(c"vkCmdSetDepthBounds"),
    instance(c"vkCmdSetStencilCompareMask"),
    instance(c"vkCmdSetStencilWriteMask"),
    instance(c"vkCmdSetStencilReference"),
    instance(c"vkCmdBindDescriptorSets"),
    instance(c"vkCmdBindIndexBuffer"),
    instance(c"vkCmdBindVertexBuffers"),
    instance(c"vkCmdDraw"),
    instance(c"vkCmdDrawIndexed"),
    instance(c"vkCmdDrawIndirect"),
    instance(c"vkCmdDrawIndexedIndirect"),
    instance(c"vkCmdDispatch"),
    instance(c"vkCmdDispatchIndirect"),
    instance(c"vkCmdCopyBuffer"),
    instance(c"vkCmdCopyImage"),
    instance(c"vkCmdBlitImage"),
    instance(c"vkCmdCopyBufferToImage"),
    instance(c"vkCmdCopyImageToBuffer"),
    instance(c"vkCmdUpdateBuffer"),
    instance(c"vkCmdFillBuffer"),
    instance(c"vkCmdClearColorImage"),
    instance(c"vkCmdClearDepthStencilImage"),
    instance(c"vkCmdClearAttachments"),
    instance(c"vkCmdResolveImage"),
    instance(c"vkCmdSetEvent"),
    instance(c"vkCmdResetEvent"),
    instance(c"vkCmdWaitEvents"),
    instance(c"vkCmdPipelineBarrier"),
    instance(c"vkCmdBeginQuery"),
    instance(c"vkCmdEndQuery"),
    instance(c"vkCmdResetQueryPool"),
    instance(c"vkCmdWriteTimestamp"),
    instance(c"vkCmdCopyQueryPoolResults"),
    instance(c"vkCmdPushConstants"),
    instance(c"vkCmdBeginRenderPass"),
    instance(c"vkCmdNextSubpass"),
    instance(c"vkCmdEndRenderPass"),
    instance(c"vkCmdExecuteCommands"),
    instance(c"vkGetPhysicalDeviceFeatures2"),
    instance(c"vkGetPhysicalDeviceProperties2"),
    instance(c"vkGetPhysicalDeviceFormatProperties2"),
    instance(c"vkGetPhysicalDeviceImageFormatProperties2"),
    instance(c"vkGetPhysicalDeviceQueueFamilyProperties2"),
    instance(c"vkGetPhysicalDeviceMemoryProperties2"),
    instance(c"vkGetPhysicalDeviceSparseImageFormatProperties2"),
    instance(c"vkTrimCommandPool"),
    instance(c"vkGetPhysicalDeviceExternalBufferProperties"),
    instance(c"vkGetPhysicalDeviceExternalSemaphoreProperties"),
    instance(c"vkGetPhysicalDeviceExternalFenceProperties"),
    instance(c"vkEnumeratePhysicalDeviceGroups"),
    instance(c"vkGetDeviceGroupPeerMemoryFeatures"),
    instance(c"vkBindBufferMemory2"),
    instance(c"vkBindImageMemory2"),
    instance(c"vkCmdSetDeviceMask"),
    instance(c"vkCmdDispatchBase"),
    instance(c"vkCreateDescriptorUpdateTemplate"),
    instance(c"vkDestroyDescriptorUpdateTemplate"),
    instance(c"vkUpdateDescriptorSetWithTemplate"),
    instance(c"vkGetBufferMemoryRequirements2"),
    instance(c"vkGetImageMemoryRequirements2"),
    instance(c"vkGetImageSparseMemoryRequirements2"),
    instance(c"vkCreateSamplerYcbcrConversion"),
    instance(c"vkDestroySamplerYcbcrConversion"),
    instance(c"vkGetDeviceQueue2"),
    instance(c"vkGetDescriptorSetLayoutSupport"),
    instance(c"vkCreateRenderPass2"),
    instance(c"vkCmdBeginRenderPass2"),
    instance(c"vkCmdNextSubpass2"),
    instance(c"vkCmdEndRenderPass2"),
    instance(c"vkGetSemaphoreCounterValue"),
    instance(c"vkWaitSemaphores"),
    instance(c"vkSignalSemaphore"),
    instance(c"vkCmdDrawIndirectCount"),
    instance(c"vkCmdDrawIndexedIndirectCount"),
    instance(c"vkGetBufferOpaqueCaptureAddress"),
    instance(c"vkGetBufferDeviceAddress"),
    instance(c"vkGetDeviceMemoryOpaqueCaptureAddress"),
    // VK_KHR_surface. Only resolvable when the extension was enabled.
    optional(instance(c"vkDestroySurfaceKHR")),
    optional(instance(c"vkGetPhysicalDeviceSurfaceCapabilitiesKHR")),
    optional(instance(c"vkGetPhysicalDeviceSurfaceFormatsKHR")),
    optional(instance(c"vkGetPhysicalDeviceSurfacePresentModesKHR")),
    optional(instance(c"vkGetPhysicalDeviceSurfaceSupportKHR")),
];

/// The instance extension that creates surfaces for this platform's native
/// windows.
#[cfg(windows)]
pub const PLATFORM_SURFACE_EXTENSION: &CStr = c"VK_KHR_win32_surface";
/// The instance extension that creates surfaces for this platform's native
/// windows.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub const PLATFORM_SURFACE_EXTENSION: &CStr = c"VK_EXT_metal_surface";
/// The instance extension that creates surfaces for this platform's native
/// windows.
#[cfg(target_os = "android")]
pub const PLATFORM_SURFACE_EXTENSION: &CStr = c"VK_KHR_android_surface";
/// The instance extension that creates surfaces for this platform's native
/// windows.
#[cfg(not(any(
    windows,
    target_os = "macos",
    target_os = "ios",
    target_os = "android"
)))]
pub const PLATFORM_SURFACE_EXTENSION: &CStr = c"VK_KHR_xlib_surface";

/// The surface creation entry points of this platform.
#[cfg(windows)]
pub static PLATFORM_SYMBOLS: &[SymbolEntry] = &[optional(instance(c"vkCreateWin32SurfaceKHR"))];
/// The surface creation entry points of this platform.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub static PLATFORM_SYMBOLS: &[SymbolEntry] = &[optional(instance(c"vkCreateMetalSurfaceEXT"))];
/// The surface creation entry points of this platform.
#[cfg(target_os = "android")]
pub static PLATFORM_SYMBOLS: &[SymbolEntry] = &[optional(instance(c"vkCreateAndroidSurfaceKHR"))];
/// The surface creation entry points of this platform.
#[cfg(not(any(
    windows,
    target_os = "macos",
    target_os = "ios",
    target_os = "android"
)))]
pub static PLATFORM_SYMBOLS: &[SymbolEntry] = &[
    optional(instance(c"vkCreateXlibSurfaceKHR")),
    optional(instance(c"vkCreateXcbSurfaceKHR")),
    optional(instance(c"vkCreateWaylandSurfaceKHR")),
];

/// Iterates over every entry of `tier`, in resolution order.
pub fn tier(tier: Tier) -> impl Iterator<Item = &'static SymbolEntry> {
    SYMBOLS
        .iter()
        .chain(PLATFORM_SYMBOLS)
        .filter(move |entry| entry.tier == tier)
}

/// Looks up the table entry named `name`.
pub fn find(name: &CStr) -> Option<&'static SymbolEntry> {
    SYMBOLS
        .iter()
        .chain(PLATFORM_SYMBOLS)
        .find(|entry| entry.name == name)
}
