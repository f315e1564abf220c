use crate::arch::Arch;
use std::path::PathBuf;

pub const PACKAGE_BASE_DIR_NAME: &str = "package_content";
pub const FILE_BASE_DIR_NAME: &str = "files";
pub const BUILD_DIR_NAME: &str = "build";
pub const DOWNLOAD_DIR_NAME: &str = "downloads";

/// Context passed throughout the application containing global configuration
#[derive(Clone)]
pub struct Context {
    /// Enable verbose output (show every copied file and executed command)
    pub verbose: bool,

    /// Fetch package archives; when false they must already be downloaded
    pub download: bool,

    /// Directory every output of the run is written under
    pub work_dir: PathBuf,
}

impl Context {
    pub fn new(work_dir: PathBuf, verbose: bool, download: bool) -> Self {
        Self {
            verbose,
            download,
            work_dir,
        }
    }

    pub fn download_dir(&self) -> PathBuf {
        self.work_dir.join(DOWNLOAD_DIR_NAME)
    }

    /// Where the package archive is unpacked
    pub fn package_dir(&self, arch: Arch) -> PathBuf {
        self.work_dir.join(PACKAGE_BASE_DIR_NAME).join(arch.as_str())
    }

    /// Where the required files are collected; root of the manifests and zip
    pub fn files_dir(&self, arch: Arch) -> PathBuf {
        self.work_dir.join(FILE_BASE_DIR_NAME).join(arch.as_str())
    }

    pub fn build_dir(&self) -> PathBuf {
        self.work_dir.join(BUILD_DIR_NAME)
    }

    pub fn install_list_path(&self, arch: Arch) -> PathBuf {
        self.work_dir.join(format!("inst_file_list_{}.txt", arch))
    }

    pub fn uninstall_list_path(&self, arch: Arch) -> PathBuf {
        self.work_dir.join(format!("uninst_file_list_{}.txt", arch))
    }
}
