use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::utils;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Download `url` to `dest`.
///
/// The body is streamed into a `.part` sibling which is renamed into place
/// once complete, so an interrupted download never looks like a finished one.
pub fn http(ctx: &Context, url: &str, dest: &Path) -> Result<()> {
    if ctx.verbose {
        println!("Downloading {} -> {}", url, dest.display());
    }

    let download_err = |source| Error::Download {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("sourceview-pack/", env!("CARGO_PKG_VERSION")))
        .timeout(None::<std::time::Duration>)
        .build()
        .map_err(download_err)?;

    let mut response = client.get(url).send().map_err(download_err)?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if let Some(parent) = dest.parent() {
        utils::ensure_dir(parent)?;
    }

    let mut part = dest.as_os_str().to_owned();
    part.push(".part");
    let part = Path::new(&part);

    let mut writer = BufWriter::new(File::create(part)?);
    let bytes = response.copy_to(&mut writer).map_err(download_err)?;
    writer.flush()?;
    drop(writer);

    fs::rename(part, dest)?;

    if ctx.verbose {
        println!("Downloaded {} bytes", bytes);
    }

    Ok(())
}
