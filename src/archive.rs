use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::utils;
use std::fs::File;
use std::io;
use std::path::Path;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Zip every file under `source_dir` into `output_path`.
///
/// Entry names are relative to `source_dir` with `/` separators; entries are
/// written in sorted walk order so the same tree always gives the same
/// archive layout.
pub fn create_zip(ctx: &Context, source_dir: &Path, output_path: &Path) -> Result<usize> {
    if !source_dir.is_dir() {
        return Err(Error::RootNotFound(source_dir.display().to_string()));
    }

    if let Some(parent) = output_path.parent() {
        utils::ensure_dir(parent)?;
    }

    let file = File::create(output_path)?;
    let mut zip = ZipWriter::new(file);

    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut count = 0;
    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(|source| Error::Walk {
            path: source_dir.display().to_string(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|_| Error::custom(format!("{} is outside {}", entry.path().display(), source_dir.display())))?;
        let name = rel
            .iter()
            .map(|c| c.to_str().ok_or_else(|| Error::NonUtf8Path(rel.display().to_string())))
            .collect::<Result<Vec<_>>>()?
            .join("/");

        if ctx.verbose {
            println!("   adding {}", name);
        }

        zip.start_file(name, options)?;
        io::copy(&mut File::open(entry.path())?, &mut zip)?;
        count += 1;
    }

    zip.finish()?;
    Ok(count)
}
