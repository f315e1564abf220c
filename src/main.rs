mod arch;
mod archive;
mod args;
mod cmd;
mod collect;
mod config;
mod context;
mod download;
mod error;
mod extract;
mod nsis;
mod pass;
mod result;
mod tpl;
mod tree;
mod utils;

use arch::Arch;
use args::Args;
use config::PackConfig;
use context::Context;
use error::Error;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    let Args {
        verbose,
        no_download,
        lists_only,
        config: config_path,
        work_dir,
        arch: arch_filter,
    } = Args::parse();

    let work_dir = match work_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let ctx = Context::new(work_dir, verbose, !no_download);

    cliclack::intro("sourceview-pack")?;

    let config = PackConfig::load(config_path.as_deref())?;
    let archs: Vec<Arch> = if arch_filter.is_empty() {
        config.architectures.clone()
    } else {
        arch_filter
    };

    if !lists_only {
        utils::create_fresh_directory(&ctx.build_dir())?;
    }

    // A failed pass does not stop the others; only a failed manifest write
    // aborts the whole run.
    let mut failed = Vec::new();
    for arch in &archs {
        cliclack::log::step(format!(
            "Building {} package for architecture {}",
            config.package,
            arch.mingw_arch()
        ))?;

        let outcome = if lists_only {
            pass::write_lists(&ctx, &config, *arch)
        } else {
            pass::run(&ctx, &config, *arch).and_then(|out| {
                cliclack::log::success(format!(
                    "{}: {} files -> {}, {}, {}",
                    out.arch,
                    out.files,
                    out.zip.display(),
                    out.install_list.display(),
                    out.uninstall_list.display()
                ))?;
                Ok(())
            })
        };

        match outcome {
            Ok(()) => {}
            Err(e) if e.aborts_run() => {
                cliclack::outro_cancel(format!("{} pass aborted the run", arch))?;
                return Err(e);
            }
            Err(e) => {
                cliclack::log::error(format!("{} pass failed: {}", arch, e))?;
                failed.push(*arch);
            }
        }
    }

    if !failed.is_empty() {
        let names: Vec<&str> = failed.iter().map(Arch::as_str).collect();
        cliclack::outro_cancel(format!("{} of {} passes failed", failed.len(), archs.len()))?;
        return Err(Error::custom(format!("failed architecture passes: {}", names.join(", "))));
    }

    cliclack::outro("Packages created successfully!")?;
    Ok(())
}
