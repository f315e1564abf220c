use crate::arch::Arch;
use crate::archive;
use crate::collect;
use crate::config::PackConfig;
use crate::context::Context;
use crate::download;
use crate::extract;
use crate::nsis::{self, Manifest};
use crate::result::Result;
use crate::tree::FileTree;
use crate::utils;
use std::path::PathBuf;

/// What a finished architecture pass produced
#[derive(Debug)]
pub struct PassOutput {
    pub arch: Arch,
    pub files: usize,
    pub install_list: PathBuf,
    pub uninstall_list: PathBuf,
    pub zip: PathBuf,
}

/// Run one full architecture pass: fetch, unpack, collect, write both file
/// lists and zip the collected files.
pub fn run(ctx: &Context, config: &PackConfig, arch: Arch) -> Result<PassOutput> {
    let archive_path = ctx.download_dir().join(config.archive_name(arch));
    let package_dir = ctx.package_dir(arch);
    let files_dir = ctx.files_dir(arch);

    utils::create_fresh_directory(&package_dir)?;
    utils::create_fresh_directory(&files_dir)?;

    if ctx.download {
        let url = config.archive_url(arch);
        step(&format!("Downloading {}...", url), &format!("Downloaded {}", config.archive_name(arch)), || {
            download::http(ctx, &url, &archive_path)
        })?;
    } else if ctx.verbose {
        println!("Skipping download, using {}", archive_path.display());
    }

    step(
        &format!("Extracting {}...", config.archive_name(arch)),
        "Package extracted",
        || extract::unpack(ctx, &archive_path, &package_dir),
    )?;

    let copied = step("Collecting required files...", "Required files collected", || {
        collect::collect(
            ctx,
            &package_dir.join(arch.mingw_root()),
            &files_dir,
            &config.required_files,
        )
    })?;

    let install_list = ctx.install_list_path(arch);
    let uninstall_list = ctx.uninstall_list_path(arch);
    let files = step("Writing installer file lists...", "Installer file lists written", || {
        let tree = FileTree::scan(&files_dir)?;
        Manifest::install(&tree, &config.installer).write(&install_list)?;
        Manifest::uninstall(&tree, &config.installer).write(&uninstall_list)?;
        Ok(tree.file_count())
    })?;
    if ctx.verbose {
        println!("Collected {} files, {} in tree", copied.len(), files);
    }

    let zip = ctx.build_dir().join(config.zip_name(arch));
    step(&format!("Creating zip package {}...", zip.display()), "Zip package created", || {
        archive::create_zip(ctx, &files_dir, &zip)
    })?;

    Ok(PassOutput {
        arch,
        files,
        install_list,
        uninstall_list,
        zip,
    })
}

/// Write only the file lists for an already collected `files/<arch>` tree.
pub fn write_lists(ctx: &Context, config: &PackConfig, arch: Arch) -> Result<()> {
    let files_dir = ctx.files_dir(arch);
    step("Writing installer file lists...", "Installer file lists written", || {
        nsis::build_install_manifest(&files_dir, &config.installer)?
            .write(&ctx.install_list_path(arch))?;
        nsis::build_uninstall_manifest(&files_dir, &config.installer)?
            .write(&ctx.uninstall_list_path(arch))
    })
}

fn step<T>(start: &str, done: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let spinner = cliclack::spinner();
    spinner.start(start);
    match f() {
        Ok(value) => {
            spinner.stop(done);
            Ok(value)
        }
        Err(e) => {
            spinner.error(start.trim_end_matches("..."));
            Err(e)
        }
    }
}
