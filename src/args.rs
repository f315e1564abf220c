use crate::arch::Arch;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Command-line arguments for sourceview-pack
#[derive(Debug)]
pub struct Args {
    /// Enable verbose output
    pub verbose: bool,

    /// Reuse previously downloaded package archives
    pub no_download: bool,

    /// Only regenerate the installer file lists from `files/<arch>`
    pub lists_only: bool,

    /// TOML configuration file
    pub config: Option<PathBuf>,

    /// Directory all outputs are written under
    pub work_dir: Option<PathBuf>,

    /// Architectures to build; empty means whatever the configuration lists
    pub arch: Vec<Arch>,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            verbose: matches.get_flag("verbose"),
            no_download: matches.get_flag("no-download"),
            lists_only: matches.get_flag("lists-only"),
            config: matches.get_one::<String>("config").map(PathBuf::from),
            work_dir: matches.get_one::<String>("work-dir").map(PathBuf::from),
            arch: matches
                .get_many::<Arch>("arch")
                .map(|values| values.copied().collect())
                .unwrap_or_default(),
        }
    }
}

fn command() -> Command {
    Command::new("sourceview-pack")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Package GTKSourceView for Inkscape on Windows and generate NSIS file lists")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML configuration file (built-in defaults otherwise)"),
        )
        .arg(
            Arg::new("work-dir")
                .short('w')
                .long("work-dir")
                .value_name("DIR")
                .help("Directory all outputs are written under (default: current directory)"),
        )
        .arg(
            Arg::new("arch")
                .short('a')
                .long("arch")
                .value_name("ARCH")
                .action(ArgAction::Append)
                .value_parser(|s: &str| s.parse::<Arch>().map_err(|e| e.to_string()))
                .help("Architecture to build: 32bit or 64bit (repeatable)"),
        )
        .arg(
            Arg::new("no-download")
                .long("no-download")
                .action(ArgAction::SetTrue)
                .help("Reuse package archives already in the downloads directory"),
        )
        .arg(
            Arg::new("lists-only")
                .long("lists-only")
                .action(ArgAction::SetTrue)
                .help("Only regenerate installer file lists from files/<arch>"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::from_matches(&command().try_get_matches_from(args).unwrap())
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["sourceview-pack"]);
        assert!(!args.verbose && !args.no_download && !args.lists_only);
        assert!(args.arch.is_empty());
        assert!(args.config.is_none());
    }

    #[test]
    fn test_repeated_arch() {
        let args = parse(&["sourceview-pack", "-a", "64bit", "--arch", "i686", "--no-download", "-w", "out"]);
        assert_eq!(args.arch, vec![Arch::X64, Arch::X86]);
        assert!(args.no_download);
        assert_eq!(args.work_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_bad_arch() {
        assert!(command().try_get_matches_from(["sourceview-pack", "--arch", "arm64"]).is_err());
    }
}
