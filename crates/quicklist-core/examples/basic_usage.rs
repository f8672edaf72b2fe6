//! Basic usage: publish dynamic shortcuts past capacity and request a pin.
//!
//! Run with: cargo run --example basic_usage

use quicklist::{HostConfig, MemoryHost, PinCallback, Result, ShortcutEntry, ShortcutPublisher};
use std::sync::Arc;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quicklist=debug")),
        )
        .init();

    // A small capacity so the eviction policy is visible.
    let host = Arc::new(MemoryHost::with_config(HostConfig {
        max_dynamic: 3,
        ..HostConfig::default()
    }));
    let publisher = ShortcutPublisher::new(host);

    for name in ["alpha", "beta", "gamma", "delta"] {
        let entry = ShortcutEntry::builder(format!("demo-{name}"))
            .label(format!("Run {name}"))
            .action(format!("demo://{name}"))
            .build();
        publisher.add_dynamic_shortcut(entry)?;
    }

    // "alpha" was the oldest and has been evicted to make room for "delta".
    println!("Dynamic shortcuts (capacity 3):");
    for entry in publisher.dynamic_shortcuts()? {
        println!("  {} -> {}", entry.id, entry.label);
    }

    let pinned = ShortcutEntry::builder("demo-pin")
        .label("Pinned demo")
        .action("demo://pin")
        .build();
    if publisher.request_pinned_shortcut(pinned, PinCallback::new("demo://pin-done"))? {
        println!("Pin request submitted");
    } else {
        println!("Host does not support pinning");
    }

    Ok(())
}
