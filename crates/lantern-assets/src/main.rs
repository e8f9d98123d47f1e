//! One-shot story-file installer entry point.
//!
//! Copies bundled ROMs from the interpreter installation into the local
//! games directory. Run once before starting the API server.

use std::error::Error;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use lantern_assets::{install_story_files, resolve_rom_source, InstallOutcome};
use lantern_frotz::FrotzProvider;

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // The first positional argument overrides the interpreter provider's
    // bundled ROM directory (itself configured via FROTZ_ROM_DIR).
    let provider = FrotzProvider::from_env();
    let explicit = std::env::args().nth(1).map(PathBuf::from);
    let source = resolve_rom_source(explicit, &provider)
        .ok_or("pass a ROM directory as the first argument or set FROTZ_ROM_DIR")?;
    let dest = PathBuf::from(std::env::var("GAMES_DIR").unwrap_or_else(|_| "games".to_string()));

    match install_story_files(&source, &dest)? {
        InstallOutcome::Installed(copied) => {
            tracing::info!(
                count = copied.len(),
                dest = %dest.display(),
                "story files installed"
            );
        }
        InstallOutcome::SourceMissing => {
            tracing::warn!(source = %source.display(), "ROMs not found; nothing installed");
        }
    }

    Ok(())
}
