//! Lantern Assets — one-shot story-file installation.
//!
//! Copies bundled game ROMs from an interpreter installation into the local
//! games directory. This is a preparatory step run before the server starts;
//! it is idempotent and carries no rollback semantics, so a partial copy set
//! after an interruption is acceptable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lantern_core::engine::EngineProvider;

/// Story-file extensions recognized by the installer.
pub const STORY_EXTENSIONS: [&str; 3] = ["z5", "z8", "z3"];

/// Picks the ROM source directory for an installer run.
///
/// An explicit path (command-line argument or environment) wins; otherwise
/// the interpreter provider's bundled ROM directory is used, if it has one.
#[must_use]
pub fn resolve_rom_source(
    explicit: Option<PathBuf>,
    provider: &dyn EngineProvider,
) -> Option<PathBuf> {
    explicit.or_else(|| provider.bundled_rom_dir())
}

/// Result of one installer run.
#[derive(Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The source directory existed; these file names were copied.
    Installed(Vec<String>),
    /// The source directory does not exist; nothing was copied.
    SourceMissing,
}

/// Copies every story file from `source` into `dest`.
///
/// `dest` is created if absent. Files already present in `dest` are
/// overwritten silently, so re-running is safe. Copied file names are
/// reported in the returned outcome and logged individually.
///
/// # Errors
///
/// Returns an I/O error if the destination cannot be created, the source
/// cannot be read, or a copy fails. A missing source directory is not an
/// error; it is reported as [`InstallOutcome::SourceMissing`].
pub fn install_story_files(source: &Path, dest: &Path) -> io::Result<InstallOutcome> {
    fs::create_dir_all(dest)?;

    if !source.is_dir() {
        tracing::warn!(source = %source.display(), "bundled ROM directory not found");
        return Ok(InstallOutcome::SourceMissing);
    }

    let mut copied = Vec::new();
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !is_story_file(&path) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        fs::copy(&path, dest.join(&name))?;
        tracing::info!(file = %name, "copied story file");
        copied.push(name);
    }
    copied.sort();
    Ok(InstallOutcome::Installed(copied))
}

fn is_story_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| STORY_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use lantern_core::engine::{Engine, EngineProvider};
    use lantern_core::error::EngineError;

    use super::{install_story_files, resolve_rom_source, InstallOutcome};

    /// A provider that ships ROMs in a fixed directory.
    struct BundledRomProvider(PathBuf);

    impl EngineProvider for BundledRomProvider {
        fn open(&self, _story_path: &Path) -> Result<Box<dyn Engine>, EngineError> {
            Err(EngineError::Unsupported)
        }

        fn bundled_rom_dir(&self) -> Option<PathBuf> {
            Some(self.0.clone())
        }
    }

    /// A provider with no bundled ROMs.
    struct BareProvider;

    impl EngineProvider for BareProvider {
        fn open(&self, _story_path: &Path) -> Result<Box<dyn Engine>, EngineError> {
            Err(EngineError::Unsupported)
        }
    }

    #[test]
    fn test_resolve_rom_source_prefers_explicit_path() {
        // Arrange
        let provider = BundledRomProvider(PathBuf::from("/opt/frotz/roms"));

        // Act
        let source = resolve_rom_source(Some(PathBuf::from("/tmp/roms")), &provider);

        // Assert
        assert_eq!(source, Some(PathBuf::from("/tmp/roms")));
    }

    #[test]
    fn test_resolve_rom_source_falls_back_to_provider_bundle() {
        // Arrange
        let provider = BundledRomProvider(PathBuf::from("/opt/frotz/roms"));

        // Act
        let source = resolve_rom_source(None, &provider);

        // Assert
        assert_eq!(source, Some(PathBuf::from("/opt/frotz/roms")));
    }

    #[test]
    fn test_resolve_rom_source_is_none_without_any_source() {
        assert_eq!(resolve_rom_source(None, &BareProvider), None);
    }

    #[test]
    fn test_copies_only_recognized_extensions() {
        // Arrange
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        for name in ["zork1.z5", "sorcerer.z3", "sherlock.z8", "notes.txt", "zork1.z6"] {
            fs::write(source.path().join(name), b"data").unwrap();
        }

        // Act
        let outcome = install_story_files(source.path(), dest.path()).unwrap();

        // Assert
        let InstallOutcome::Installed(copied) = outcome else {
            panic!("expected Installed");
        };
        assert_eq!(copied, vec!["sherlock.z8", "sorcerer.z3", "zork1.z5"]);
        assert!(dest.path().join("zork1.z5").is_file());
        assert!(!dest.path().join("notes.txt").exists());
        assert!(!dest.path().join("zork1.z6").exists());
    }

    #[test]
    fn test_missing_source_reports_absence_and_copies_nothing() {
        // Arrange
        let dest = tempfile::tempdir().unwrap();
        let missing = dest.path().join("no-such-roms");

        // Act
        let outcome = install_story_files(&missing, dest.path()).unwrap();

        // Assert
        assert_eq!(outcome, InstallOutcome::SourceMissing);
        assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rerun_overwrites_existing_files_without_error() {
        // Arrange
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::write(source.path().join("zork1.z5"), b"v1").unwrap();
        install_story_files(source.path(), dest.path()).unwrap();
        fs::write(source.path().join("zork1.z5"), b"v2").unwrap();

        // Act
        let outcome = install_story_files(source.path(), dest.path()).unwrap();

        // Assert
        assert_eq!(
            outcome,
            InstallOutcome::Installed(vec!["zork1.z5".to_owned()])
        );
        assert_eq!(fs::read(dest.path().join("zork1.z5")).unwrap(), b"v2");
    }

    #[test]
    fn test_creates_destination_directory_if_absent() {
        // Arrange
        let source = tempfile::tempdir().unwrap();
        let parent = tempfile::tempdir().unwrap();
        let dest = parent.path().join("games");
        fs::write(source.path().join("zork1.z5"), b"data").unwrap();

        // Act
        install_story_files(source.path(), &dest).unwrap();

        // Assert
        assert!(dest.join("zork1.z5").is_file());
    }
}
