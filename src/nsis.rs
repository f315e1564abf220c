//! NSIS install and uninstall file lists.
//!
//! Both lists are generated from the same post-order [`FileTree`] walk, so
//! the uninstaller deletes files before it tries to remove the directory that
//! held them, and removes subdirectories before their parents. `RMDir` without
//! `/r` only removes empty directories, which makes that order load-bearing.

use crate::config::InstallerVars;
use crate::error::Error;
use crate::result::Result;
use crate::tree::{DirNode, FileTree};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

const INDENT: &str = "   ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// `SetOutPath` followed by one `File` per name
    Install { dir: Vec<String>, files: Vec<String> },
    /// One `Delete` per name, then `RMDir` unless `remove_dir` is false
    Uninstall {
        dir: Vec<String>,
        files: Vec<String>,
        remove_dir: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    vars: InstallerVars,
    entries: Vec<Entry>,
}

/// Scan `root` and build its install file list
pub fn build_install_manifest(root: &Path, vars: &InstallerVars) -> Result<Manifest> {
    Ok(Manifest::install(&FileTree::scan(root)?, vars))
}

/// Scan `root` and build its uninstall file list
pub fn build_uninstall_manifest(root: &Path, vars: &InstallerVars) -> Result<Manifest> {
    Ok(Manifest::uninstall(&FileTree::scan(root)?, vars))
}

impl Manifest {
    /// One block per directory that holds files; empty directories are
    /// created implicitly by `SetOutPath` of their descendants.
    pub fn install(tree: &FileTree, vars: &InstallerVars) -> Self {
        let entries = tree
            .dirs()
            .iter()
            .filter(|d| !d.files.is_empty())
            .map(|d| Entry::Install {
                dir: d.components.clone(),
                files: d.files.clone(),
            })
            .collect();

        Self {
            vars: vars.clone(),
            entries,
        }
    }

    /// One block per directory, deepest first. The tree root is the install
    /// directory itself, which still holds the uninstaller while this list
    /// runs, so its files are deleted but it is never removed here.
    pub fn uninstall(tree: &FileTree, vars: &InstallerVars) -> Self {
        let entries = tree
            .dirs()
            .iter()
            .filter(|d| !(d.is_root() && d.files.is_empty()))
            .map(|d: &DirNode| Entry::Uninstall {
                dir: d.components.clone(),
                files: d.files.clone(),
                remove_dir: !d.is_root(),
            })
            .collect();

        Self {
            vars: vars.clone(),
            entries,
        }
    }

    /// Render and write the manifest.
    ///
    /// The text goes to a sibling temporary file which is then renamed over
    /// `path`, so readers see either the old list or the complete new one.
    pub fn write(&self, path: &Path) -> Result<()> {
        let write_err = |source| Error::ManifestWrite {
            path: path.display().to_string(),
            source,
        };

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);

        let result = File::create(tmp)
            .and_then(|mut file| {
                file.write_all(self.to_string().as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(tmp, path));

        if let Err(e) = result {
            let _ = fs::remove_file(tmp);
            return Err(write_err(e));
        }

        Ok(())
    }
}

/// `base\dir\...\name` with NSIS (Windows) separators
fn nsis_path<'a>(base: &str, parts: impl IntoIterator<Item = &'a String>) -> String {
    let mut path = base.to_string();
    for part in parts {
        path.push('\\');
        path.push_str(part);
    }
    path
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let InstallerVars {
            install_dir,
            files_source,
        } = &self.vars;

        for entry in &self.entries {
            match entry {
                Entry::Install { dir, files } => {
                    writeln!(f, "{INDENT}SetOutPath \"{}\"", nsis_path(install_dir, dir))?;
                    for file in files {
                        let source = nsis_path(files_source, dir.iter().chain([file]));
                        writeln!(f, "{INDENT}File \"{}\"", source)?;
                    }
                }
                Entry::Uninstall {
                    dir,
                    files,
                    remove_dir,
                } => {
                    for file in files {
                        let target = nsis_path(install_dir, dir.iter().chain([file]));
                        writeln!(f, "{INDENT}Delete \"{}\"", target)?;
                    }
                    if *remove_dir {
                        writeln!(f, "{INDENT}RMDir \"{}\"", nsis_path(install_dir, dir))?;
                    }
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn sample_tree() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "bin/libgtksourceview-3.0-1.dll");
        touch(tmp.path(), "lib/girepository-1.0/GtkSource-3.0.typelib");
        touch(tmp.path(), "share/gtksourceview-3.0/language-specs/latex.lang");
        touch(tmp.path(), "share/gtksourceview-3.0/language-specs/def.lang");
        touch(tmp.path(), "share/gtksourceview-3.0/styles/classic.xml");
        tmp
    }

    /// Quoted paths after `keyword`, with the installer prefix stripped
    fn referenced(text: &str, keyword: &str, prefix: &str) -> Vec<String> {
        text.lines()
            .filter_map(|l| l.trim().strip_prefix(keyword))
            .map(|rest| {
                rest.trim()
                    .trim_matches('"')
                    .strip_prefix(prefix)
                    .unwrap()
                    .trim_start_matches('\\')
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_example_tree() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a/x.txt");
        touch(tmp.path(), "a/b/y.txt");
        let vars = InstallerVars::default();

        let install = build_install_manifest(tmp.path(), &vars).unwrap();
        assert_eq!(
            install.to_string(),
            concat!(
                "   SetOutPath \"$INSTDIR\\a\\b\"\n",
                "   File \"${FILES_SOURCE_PATH}\\a\\b\\y.txt\"\n",
                "\n",
                "   SetOutPath \"$INSTDIR\\a\"\n",
                "   File \"${FILES_SOURCE_PATH}\\a\\x.txt\"\n",
                "\n",
            )
        );

        let uninstall = build_uninstall_manifest(tmp.path(), &vars).unwrap();
        assert_eq!(
            uninstall.to_string(),
            concat!(
                "   Delete \"$INSTDIR\\a\\b\\y.txt\"\n",
                "   RMDir \"$INSTDIR\\a\\b\"\n",
                "\n",
                "   Delete \"$INSTDIR\\a\\x.txt\"\n",
                "   RMDir \"$INSTDIR\\a\"\n",
                "\n",
            )
        );
    }

    #[test]
    fn test_every_file_installed_and_removed_once() {
        let tmp = sample_tree();
        let vars = InstallerVars::default();
        let install = build_install_manifest(tmp.path(), &vars).unwrap().to_string();
        let uninstall = build_uninstall_manifest(tmp.path(), &vars).unwrap().to_string();

        let installed = referenced(&install, "File", "${FILES_SOURCE_PATH}");
        let removed = referenced(&uninstall, "Delete", "$INSTDIR");

        let expected: BTreeSet<String> = [
            "bin\\libgtksourceview-3.0-1.dll",
            "lib\\girepository-1.0\\GtkSource-3.0.typelib",
            "share\\gtksourceview-3.0\\language-specs\\def.lang",
            "share\\gtksourceview-3.0\\language-specs\\latex.lang",
            "share\\gtksourceview-3.0\\styles\\classic.xml",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        assert_eq!(installed.len(), expected.len());
        assert_eq!(removed.len(), expected.len());
        assert_eq!(installed.into_iter().collect::<BTreeSet<_>>(), expected);
        assert_eq!(removed.into_iter().collect::<BTreeSet<_>>(), expected);
    }

    #[test]
    fn test_empty_directories() {
        let tmp = sample_tree();
        let vars = InstallerVars::default();
        let install = build_install_manifest(tmp.path(), &vars).unwrap().to_string();
        let uninstall = build_uninstall_manifest(tmp.path(), &vars).unwrap().to_string();

        // `share` and `share\gtksourceview-3.0` hold only directories
        let out_paths = referenced(&install, "SetOutPath", "$INSTDIR");
        assert_eq!(
            out_paths,
            vec![
                "bin",
                "lib\\girepository-1.0",
                "share\\gtksourceview-3.0\\language-specs",
                "share\\gtksourceview-3.0\\styles",
            ]
        );

        let removed_dirs = referenced(&uninstall, "RMDir", "$INSTDIR");
        assert_eq!(
            removed_dirs,
            vec![
                "bin",
                "lib\\girepository-1.0",
                "lib",
                "share\\gtksourceview-3.0\\language-specs",
                "share\\gtksourceview-3.0\\styles",
                "share\\gtksourceview-3.0",
                "share",
            ]
        );
    }

    #[test]
    fn test_children_removed_before_parents() {
        let tmp = sample_tree();
        let uninstall = build_uninstall_manifest(tmp.path(), &InstallerVars::default())
            .unwrap()
            .to_string();
        let lines: Vec<&str> = uninstall.lines().map(str::trim).collect();
        let removed_dirs = referenced(&uninstall, "RMDir", "$INSTDIR");

        for (i, dir) in removed_dirs.iter().enumerate() {
            let prefix = format!("{dir}\\");
            for later in &removed_dirs[i + 1..] {
                assert!(!later.starts_with(&prefix), "{later} removed after its parent {dir}");
            }

            // every deletion inside `dir` comes before its RMDir
            let rmdir = lines
                .iter()
                .position(|l| *l == format!("RMDir \"$INSTDIR\\{dir}\""))
                .unwrap();
            let delete_prefix = format!("Delete \"$INSTDIR\\{dir}\\");
            assert!(lines[rmdir..].iter().all(|l| !l.starts_with(&delete_prefix)));
        }
    }

    #[test]
    fn test_root_files_not_removing_install_dir() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "README.txt");
        touch(tmp.path(), "bin/a.dll");
        let vars = InstallerVars::default();

        let install = build_install_manifest(tmp.path(), &vars).unwrap().to_string();
        assert!(install.ends_with("   SetOutPath \"$INSTDIR\"\n   File \"${FILES_SOURCE_PATH}\\README.txt\"\n\n"));

        let uninstall = build_uninstall_manifest(tmp.path(), &vars).unwrap().to_string();
        assert!(uninstall.ends_with("   RMDir \"$INSTDIR\\bin\"\n\n   Delete \"$INSTDIR\\README.txt\"\n\n"));
        assert!(!uninstall.contains("RMDir \"$INSTDIR\"\n"));
    }

    #[test]
    fn test_custom_placeholders() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "bin/a.dll");
        let vars = InstallerVars {
            install_dir: "$PROGRAMFILES\\Inkscape".to_string(),
            files_source: "files\\32bit".to_string(),
        };

        let install = build_install_manifest(tmp.path(), &vars).unwrap().to_string();
        assert!(install.contains("SetOutPath \"$PROGRAMFILES\\Inkscape\\bin\""));
        assert!(install.contains("File \"files\\32bit\\bin\\a.dll\""));
    }

    #[test]
    fn test_idempotent_write() {
        let tmp = sample_tree();
        let out = tempfile::tempdir().unwrap();
        let vars = InstallerVars::default();
        let lists: [(&str, fn(&Path, &InstallerVars) -> Result<Manifest>); 2] = [
            ("inst_file_list_64bit.txt", build_install_manifest),
            ("uninst_file_list_64bit.txt", build_uninstall_manifest),
        ];

        for (name, build) in lists {
            let path = out.path().join(name);
            build(tmp.path(), &vars).unwrap().write(&path).unwrap();
            let first = fs::read(&path).unwrap();
            build(tmp.path(), &vars).unwrap().write(&path).unwrap();
            let second = fs::read(&path).unwrap();

            assert!(!first.is_empty(), "{name}");
            assert_eq!(first, second, "{name}");
            assert!(!out.path().join(format!("{name}.tmp")).exists());
        }
    }

    #[test]
    fn test_empty_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let vars = InstallerVars::default();
        assert!(build_install_manifest(tmp.path(), &vars).unwrap().to_string().is_empty());
        assert!(build_uninstall_manifest(tmp.path(), &vars).unwrap().to_string().is_empty());
    }

    #[test]
    fn test_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        let err = build_install_manifest(&tmp.path().join("files/32bit"), &InstallerVars::default())
            .unwrap_err();
        assert!(matches!(err, Error::RootNotFound(_)));
    }

    #[test]
    fn test_write_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let manifest = Manifest::install(&FileTree::scan(tmp.path()).unwrap(), &InstallerVars::default());
        let err = manifest.write(&tmp.path().join("no/such/dir/list.txt")).unwrap_err();
        assert!(err.aborts_run());
    }
}
