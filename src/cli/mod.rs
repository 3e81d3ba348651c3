//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::Cli;

use crate::infrastructure::logging::SecretScrubber;

/// Print `err` with its causes and exit with status 1.
///
/// Credentials are scrubbed from the message. With `json` the error is
/// printed as `{"error": ...}` on stdout.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    let message = SecretScrubber::new().scrub_message(&format!("{err:#}"));
    if json {
        println!("{}", serde_json::json!({ "error": message }));
    } else {
        eprintln!("{} {message}", console::style("error:").red().bold());
    }
    std::process::exit(1)
}
