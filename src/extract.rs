use crate::cmd;
use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::utils;
use flate2::read::GzDecoder;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tar::Archive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    None,
    Gzip,
    Xz,
    Zstd,
}

impl Compression {
    fn detect(archive: &Path) -> Option<Self> {
        let name = archive.file_name()?.to_string_lossy().to_ascii_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Compression::Gzip)
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Some(Compression::Xz)
        } else if name.ends_with(".tar.zst") || name.ends_with(".tzst") {
            Some(Compression::Zstd)
        } else if name.ends_with(".tar") {
            Some(Compression::None)
        } else {
            None
        }
    }
}

/// Unpack a (possibly compressed) tarball into `dest`.
///
/// Gzip and plain tarballs are read in-process; xz and zstd packages, which
/// is what MSYS2 ships, go through the system `tar`.
pub fn unpack(ctx: &Context, archive: &Path, dest: &Path) -> Result<()> {
    let compression = Compression::detect(archive)
        .ok_or_else(|| Error::UnsupportedArchive(archive.display().to_string()))?;

    if !archive.is_file() {
        return Err(Error::Custom(format!(
            "Package archive not found at {}",
            archive.display()
        )));
    }

    utils::ensure_dir(dest)?;

    match compression {
        Compression::None => {
            let file = BufReader::new(File::open(archive)?);
            Archive::new(file).unpack(dest)?;
        }
        Compression::Gzip => {
            let file = BufReader::new(File::open(archive)?);
            Archive::new(GzDecoder::new(file)).unpack(dest)?;
        }
        Compression::Xz => {
            cmd::execute(
                ctx,
                "tar",
                &[
                    OsStr::new("-xJf"),
                    archive.as_os_str(),
                    OsStr::new("-C"),
                    dest.as_os_str(),
                ],
            )?;
        }
        Compression::Zstd => {
            cmd::execute(
                ctx,
                "tar",
                &[
                    OsStr::new("--zstd"),
                    OsStr::new("-xf"),
                    archive.as_os_str(),
                    OsStr::new("-C"),
                    dest.as_os_str(),
                ],
            )?;
        }
    }

    Ok(())
}
