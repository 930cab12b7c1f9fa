/// Example program to print the loaded configuration
///
/// Run with: cargo run -p animaster-config --example print_config

fn main() {
    // Load configuration from animaster.toml
    let config = animaster_config::AnimasterConfig::load();

    println!("=== Animaster Configuration ===\n");

    println!("Playback Settings:");
    println!("  Realtime: {}", config.playback.realtime);
    println!("  Time Scale: {}", config.playback.time_scale);
    println!("  Run For: {}ms", config.playback.run_for_ms);
    println!();

    println!("Trigger Timeline:");
    for event in config.sorted_events() {
        println!("  {:>7}ms  {}", event.at_ms, event.trigger);
    }
    println!();

    println!("Logging Settings:");
    println!("  Filter: {:?}", config.logging.filter);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
