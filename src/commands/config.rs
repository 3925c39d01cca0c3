//! Config command handler.

use ephemeral::EphemeralConfig;

/// Config command.
pub fn cmd_config(config: &EphemeralConfig) -> Result<bool, Box<dyn std::error::Error>> {
    println!("Current Configuration");
    println!("=====================");
    println!();

    let entries = config.redacted_summary();
    let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in entries {
        println!("  {key:<width$}  {value}");
    }

    println!();
    println!("Logging:");
    println!(
        "  Format: {}",
        config.logging.format.as_deref().unwrap_or("pretty")
    );
    println!(
        "  File: {}",
        config
            .logging
            .file
            .as_ref()
            .map_or_else(|| "(stderr)".to_string(), |p| p.display().to_string())
    );

    Ok(true)
}
