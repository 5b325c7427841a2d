// Lists the layers and instance extensions of the installed Vulkan loader.
// Run with RUST_LOG=info to see the loader's own summary as well.

fn main() {
    env_logger::init();

    let Some(vulkan) = vkli::init_vulkan() else {
        eprintln!("No usable Vulkan loader was found.");
        std::process::exit(1);
    };
    vulkan.catalog().log_summary();

    match vulkan.instance_version() {
        Ok(version) => println!(
            "Instance version {}.{}.{}",
            vkli::vk::api_version_major(version),
            vkli::vk::api_version_minor(version),
            vkli::vk::api_version_patch(version)
        ),
        Err(e) => eprintln!("Failed to query the instance version: {e}"),
    }

    println!("\nLayers:");
    for layer in vulkan.catalog().layers() {
        println!("  - {} ({})", layer.name, layer.description);
    }
    println!("\nInstance extensions:");
    for extension in vulkan.catalog().extensions() {
        println!("  - {} (rev. {})", extension.name, extension.spec_version);
    }
}
