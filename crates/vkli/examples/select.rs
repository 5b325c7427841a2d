// Brings up an instance, prints every physical device and creates a logical
// device on the first one able to render with a swapchain.

use vkli::{InstanceConfig, PriorityList, Session};

const SWAPCHAIN: &str = "VK_KHR_swapchain";

fn main() {
    env_logger::init();

    let config = InstanceConfig::builder()
        .application_name("vkli select example")
        .engine_name("vkli")
        .layer_priority(PriorityList::single(vkli::VALIDATION_LAYER))
        .extension_priority([vkli::PORTABILITY_ENUMERATION_EXTENSION])
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        });

    let Some(mut session) = Session::bootstrap(&config, &[SWAPCHAIN]) else {
        eprintln!("Couldn't find a device to render with.");
        std::process::exit(1);
    };

    if let Some(instance) = session.instance() {
        println!("Enabled layers: {:?}", instance.enabled_layers().names());
        match instance.enumerate_units() {
            Ok(units) => {
                for unit in units {
                    println!(
                        "{} ({:?}), {} queue families, {} extensions",
                        unit.name,
                        unit.device_type,
                        unit.queue_families.len(),
                        unit.extensions.len()
                    );
                }
            }
            Err(e) => eprintln!("Failed to enumerate the devices: {e}"),
        }
    }

    match session.create_device(&[SWAPCHAIN]) {
        Ok(device) => println!(
            "Created a device with a queue from family {}.",
            device.queue_family_index()
        ),
        Err(e) => eprintln!("Failed to create the device: {e}"),
    }

    session.teardown();
}
