use crate::error::Error;
use crate::result::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One directory of a [`FileTree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    /// Path components relative to the tree root; empty for the root itself
    pub components: Vec<String>,
    /// Names of the non-directory entries directly inside, sorted
    pub files: Vec<String>,
}

impl DirNode {
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }
}

/// Post-order listing of every directory under a root: a directory always
/// comes after all of its descendants, and siblings are in file-name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTree {
    dirs: Vec<DirNode>,
}

impl FileTree {
    pub fn scan(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::RootNotFound(root.display().to_string()));
        }

        let walk_err = |source| Error::Walk {
            path: root.display().to_string(),
            source,
        };

        // Files are yielded before their directory, so they wait here until
        // the directory entry itself shows up.
        let mut pending: HashMap<PathBuf, Vec<String>> = HashMap::new();
        let mut dirs = Vec::new();

        for entry in WalkDir::new(root).contents_first(true).sort_by_file_name() {
            let entry = entry.map_err(walk_err)?;
            let rel = entry
                .path()
                .strip_prefix(root)
                .map_err(|_| Error::custom(format!("{} is outside {}", entry.path().display(), root.display())))?
                .to_path_buf();

            if entry.file_type().is_dir() {
                let files = pending.remove(&rel).unwrap_or_default();
                dirs.push(DirNode {
                    components: components(&rel)?,
                    files,
                });
            } else {
                let parent = rel.parent().map(Path::to_path_buf).unwrap_or_default();
                let name = utf8(entry.file_name().to_str(), &rel)?;
                pending.entry(parent).or_default().push(name);
            }
        }

        Ok(FileTree { dirs })
    }

    pub fn dirs(&self) -> &[DirNode] {
        &self.dirs
    }

    pub fn file_count(&self) -> usize {
        self.dirs.iter().map(|d| d.files.len()).sum()
    }
}

fn components(rel: &Path) -> Result<Vec<String>> {
    rel.iter()
        .map(|c| utf8(c.to_str(), rel))
        .collect()
}

fn utf8(s: Option<&str>, path: &Path) -> Result<String> {
    s.map(str::to_string)
        .ok_or_else(|| Error::NonUtf8Path(path.display().to_string()))
}
