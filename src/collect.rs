use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::utils;
use std::path::{Path, PathBuf};

/// Copy each of `required_files` from `source_root` to the same relative
/// location under `dest_root`, in order. Returns the destination paths.
pub fn collect(
    ctx: &Context,
    source_root: &Path,
    dest_root: &Path,
    required_files: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::with_capacity(required_files.len());

    for file in required_files {
        let src = source_root.join(file);
        let dst = dest_root.join(file);

        if !src.is_file() {
            return Err(Error::MissingFile(src.display().to_string()));
        }

        if ctx.verbose {
            println!("   {} -> {}", src.display(), dst.display());
        }

        utils::copy_file_with_dirs(&src, &dst)?;
        copied.push(dst);
    }

    Ok(copied)
}
