use crate::arch::Arch;
use crate::error::Error;
use crate::result::Result;
use crate::tpl::Tpl;
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const GTKSOURCEVIEW_PACKAGE: &str = "gtksourceview3-3.24.11-1";
pub const OUTPUT_NAME: &str = "GTKSourceView-Inkscape-1.0";
pub const REPOSITORY: &str = "http://repo.msys2.org/mingw";
pub const ARCHIVE_TEMPLATE: &str = "mingw-w64-$MINGW_ARCH-$PACKAGE-any.pkg.tar.xz";
pub const INSTALL_DIR_VAR: &str = "$INSTDIR";
pub const FILES_SOURCE_VAR: &str = "${FILES_SOURCE_PATH}";

/// The minimum set of files gtksourceview needs to highlight LaTeX in Inkscape
pub const REQUIRED_FILES: &[&str] = &[
    "bin/libgtksourceview-3.0-1.dll",
    "lib/girepository-1.0/GtkSource-3.0.typelib",
    "share/gtksourceview-3.0/language-specs/def.lang",
    "share/gtksourceview-3.0/language-specs/language.dtd",
    "share/gtksourceview-3.0/language-specs/language.rng",
    "share/gtksourceview-3.0/language-specs/language2.rng",
    "share/gtksourceview-3.0/language-specs/latex.lang",
    "share/gtksourceview-3.0/language-specs/R.lang",
    "share/gtksourceview-3.0/styles/classic.xml",
    "share/gtksourceview-3.0/styles/styles.rng",
];

/// On-disk TOML configuration; every key is optional and falls back to the
/// built-in defaults above.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub package: Option<String>,

    #[serde(default)]
    pub output_name: Option<String>,

    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default)]
    pub archive: Option<String>,

    #[serde(default)]
    pub architectures: Option<Vec<String>>,

    #[serde(default)]
    pub required_files: Option<Vec<String>>,

    #[serde(default)]
    pub installer: Option<InstallerConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct InstallerConfig {
    #[serde(default)]
    pub install_dir: Option<String>,

    #[serde(default)]
    pub files_source: Option<String>,
}

/// Installer-side placeholders written into the generated file lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerVars {
    /// Runtime install root, e.g. `$INSTDIR`
    pub install_dir: String,
    /// Compile-time root of the files being packed, e.g. `${FILES_SOURCE_PATH}`
    pub files_source: String,
}

impl Default for InstallerVars {
    fn default() -> Self {
        Self {
            install_dir: INSTALL_DIR_VAR.to_string(),
            files_source: FILES_SOURCE_VAR.to_string(),
        }
    }
}

/// Parsed and processed configuration
#[derive(Debug, Clone)]
pub struct PackConfig {
    pub package: String,
    pub output_name: String,
    pub repository: String,
    archive_template: String,
    pub architectures: Vec<Arch>,
    pub required_files: Vec<PathBuf>,
    pub installer: InstallerVars,
}

impl PackConfig {
    /// Load configuration from a TOML file, or use the built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::ConfigNotFound(path.display().to_string()));
                }
                let content = fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => ConfigFile::default(),
        };
        Self::from_file(file)
    }

    pub fn from_file(file: ConfigFile) -> Result<Self> {
        let package = file
            .package
            .unwrap_or_else(|| GTKSOURCEVIEW_PACKAGE.to_string());

        let mut tpl = Tpl::new();
        tpl.register("PACKAGE", &package);

        let output_name = file
            .output_name
            .map(|n| tpl.parse(&n))
            .unwrap_or_else(|| OUTPUT_NAME.to_string());

        let repository = file
            .repository
            .unwrap_or_else(|| REPOSITORY.to_string())
            .trim_end_matches('/')
            .to_string();

        let archive_template = file
            .archive
            .unwrap_or_else(|| ARCHIVE_TEMPLATE.to_string());

        let architectures = match file.architectures {
            Some(names) => parse_architectures(&names)?,
            None => Arch::ALL.to_vec(),
        };

        let required_files = match file.required_files {
            Some(files) => files,
            None => REQUIRED_FILES.iter().map(|f| f.to_string()).collect(),
        };
        if required_files.is_empty() {
            return Err(Error::InvalidConfig("required-files must not be empty".to_string()));
        }
        let required_files = required_files
            .iter()
            .map(|f| validate_relative(f))
            .collect::<Result<Vec<_>>>()?;

        let installer = file.installer.unwrap_or_default();
        let installer = InstallerVars {
            install_dir: installer
                .install_dir
                .unwrap_or_else(|| INSTALL_DIR_VAR.to_string()),
            files_source: installer
                .files_source
                .unwrap_or_else(|| FILES_SOURCE_VAR.to_string()),
        };

        Ok(PackConfig {
            package,
            output_name,
            repository,
            archive_template,
            architectures,
            required_files,
            installer,
        })
    }

    /// Name of the package archive for an architecture
    pub fn archive_name(&self, arch: Arch) -> String {
        self.tpl(arch).parse(&self.archive_template)
    }

    /// Download URL of the package archive for an architecture
    pub fn archive_url(&self, arch: Arch) -> String {
        format!("{}/{}/{}", self.repository, arch.mingw_arch(), self.archive_name(arch))
    }

    /// File name of the zip package for an architecture
    pub fn zip_name(&self, arch: Arch) -> String {
        format!("{}-{}.zip", self.output_name, arch)
    }

    fn tpl(&self, arch: Arch) -> Tpl {
        let mut tpl = Tpl::new();
        tpl.register("PACKAGE", &self.package);
        tpl.register("NAME", &self.output_name);
        tpl.register("MINGW_ARCH", arch.mingw_arch());
        tpl.register("ARCH", arch.as_str());
        tpl
    }
}

fn parse_architectures(names: &[String]) -> Result<Vec<Arch>> {
    let mut archs = Vec::new();
    for name in names {
        let arch: Arch = name.parse()?;
        if !archs.contains(&arch) {
            archs.push(arch);
        }
    }
    if archs.is_empty() {
        return Err(Error::InvalidConfig("architectures must not be empty".to_string()));
    }
    Ok(archs)
}

/// Required files are joined onto package and output roots; anything that
/// could escape those roots is rejected.
fn validate_relative(file: &str) -> Result<PathBuf> {
    let path = PathBuf::from(file);
    let ok = !file.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !ok {
        return Err(Error::InvalidConfig(format!(
            "required file '{}' must be a relative path inside the package",
            file
        )));
    }
    Ok(path)
}
