use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;

/// Removes a set of files when dropped. Files that do not exist are ignored; other removal
/// errors are logged.
#[derive(Debug, Default)]
pub struct ScopedFiles {
    files: Vec<PathBuf>,
}

impl ScopedFiles {
    /// Create a guard with no files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file to remove and return its path. A file already at the path (for example
    /// left behind by a run that was killed) is removed immediately, so that it cannot be
    /// mistaken for a file written after this call.
    ///
    /// # Arguments
    ///
    /// * `file`: The file path.
    ///
    /// returns: `Result<PathBuf, std::io::Error>`
    pub fn track<P: AsRef<Path>>(&mut self, file: P) -> Result<PathBuf, std::io::Error> {
        let path = file.as_ref().to_path_buf();
        remove_if_exists(&path)?;
        self.files.push(path.clone());
        Ok(path)
    }

    /// The registered files.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl Drop for ScopedFiles {
    fn drop(&mut self) {
        for file in &self.files {
            if let Err(e) = remove_if_exists(file) {
                warn!("Cannot remove the temporary file {:?}: {e}", file);
            }
        }
    }
}

/// Remove a file. A missing file is not an error.
fn remove_if_exists(file: &Path) -> Result<(), std::io::Error> {
    match fs::remove_file(file) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use crate::evaluation::ScopedFiles;

    #[test]
    /// Files are removed when the guard goes out of scope, including missing ones.
    fn test_remove_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("rotor_g0_i0");
        {
            let mut guard = ScopedFiles::new();
            let tracked = guard.track(dir.path().join("res_g0_i0")).unwrap();
            assert_eq!(tracked, dir.path().join("res_g0_i0"));
            fs::write(&existing, "rotor").unwrap();
            guard.track(&existing).unwrap();
            fs::write(&existing, "new rotor").unwrap();
            assert_eq!(guard.files().len(), 2);
            assert!(existing.exists());
        }
        assert!(!existing.exists());
    }

    #[test]
    /// A file left at a tracked path is removed when the path is registered.
    fn test_remove_stale_file() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("res_g0_i0");
        fs::write(&stale, "1 2 3").unwrap();

        let mut guard = ScopedFiles::new();
        guard.track(&stale).unwrap();
        assert!(!stale.exists());
    }
}
