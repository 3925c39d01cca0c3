//! Run command handler.
//!
//! Executes one sweep against the live API and reports the outcome.
//!
//! # Examples
//!
//! ```bash
//! # Delete tweets older than MAX_TWEET_AGE
//! ephemeral run
//!
//! # Dry run to see what would be deleted
//! ephemeral run --dry-run
//!
//! # Emit the {"StatusCode", "Body"} response for a serverless wrapper
//! ephemeral run --json
//! ```

use ephemeral::{EphemeralConfig, TwitterClient, sweep};

/// Run command.
///
/// Returns `Ok(true)` when the sweep finished without failures.
pub fn cmd_run(
    config: &EphemeralConfig,
    dry_run: bool,
    json: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let client = TwitterClient::from_config(config);
    let outcome = sweep::run_once(config, &client, dry_run);

    if json {
        println!("{}", outcome.response.to_json()?);
    } else {
        println!("{}", outcome.response.message);
        if dry_run {
            println!();
            println!("This was a dry run. Run without --dry-run to apply changes.");
        }
    }

    Ok(outcome.is_clean())
}
