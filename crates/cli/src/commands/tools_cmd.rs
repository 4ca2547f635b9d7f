//! `charla tools` — list the built-in tool callbacks.

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = charla_tools::default_registry();

    println!("🔧 charla tools");
    println!("===============");
    for descriptor in registry.descriptors() {
        println!("  {:<18} {}", descriptor.name, descriptor.description);
    }
    println!("\n  {} tool(s) registered", registry.len());

    Ok(())
}
