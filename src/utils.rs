use crate::result::Result;
use std::fs;
use std::path::Path;

/// Delete a directory if it exists and recreate it empty
pub fn create_fresh_directory(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)?;
    Ok(())
}

/// Copy a single file, creating the destination's parent directories
pub fn copy_file_with_dirs(source: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(source, destination)?;
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_directory_is_emptied() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("build");
        fs::create_dir_all(dir.join("old/nested")).unwrap();
        fs::write(dir.join("old/stale.zip"), b"x").unwrap();

        create_fresh_directory(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_copy_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("a.lang");
        fs::write(&src, b"<language/>").unwrap();
        let dst = tmp.path().join("out/share/specs/a.lang");

        copy_file_with_dirs(&src, &dst).unwrap();

        assert_eq!(fs::read(&dst).unwrap(), b"<language/>");
    }
}
