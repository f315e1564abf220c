use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Custom(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown architecture '{0}' (expected 32bit or 64bit)")]
    UnknownArch(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to download {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unsupported archive format: {0}")]
    UnsupportedArchive(String),

    #[error("Required file missing from package: {0}")]
    MissingFile(String),

    #[error("File tree root {0} does not exist or is not a directory")]
    RootNotFound(String),

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    #[error("Failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl Error {
    pub fn custom<T: Into<String>>(msg: T) -> Self {
        Error::Custom(msg.into())
    }

    /// Errors that must stop the whole run rather than just the current
    /// architecture pass.
    pub fn aborts_run(&self) -> bool {
        matches!(self, Error::ManifestWrite { .. })
    }
}
