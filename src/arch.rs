use crate::error::Error;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Arch {
    X86,
    X64,
}

impl Arch {
    pub const ALL: [Arch; 2] = [Arch::X86, Arch::X64];

    /// Architecture identifier used in output file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86 => "32bit",
            Arch::X64 => "64bit",
        }
    }

    /// MinGW architecture name, used in repository URLs and package names
    pub fn mingw_arch(&self) -> &'static str {
        match self {
            Arch::X86 => "i686",
            Arch::X64 => "x86_64",
        }
    }

    /// Top-level directory inside the MinGW package holding the install tree
    pub fn mingw_root(&self) -> &'static str {
        match self {
            Arch::X86 => "mingw32",
            Arch::X64 => "mingw64",
        }
    }
}

impl FromStr for Arch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "32bit" | "i686" | "x86" => Ok(Arch::X86),
            "64bit" | "x86_64" | "x64" => Ok(Arch::X64),
            other => Err(Error::UnknownArch(other.to_string())),
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("32bit".parse::<Arch>().unwrap(), Arch::X86);
        assert_eq!("x86_64".parse::<Arch>().unwrap(), Arch::X64);
        assert!(matches!("arm64".parse::<Arch>(), Err(Error::UnknownArch(_))));
    }

    #[test]
    fn test_package_layout_names() {
        assert_eq!(Arch::X86.mingw_root(), "mingw32");
        assert_eq!(Arch::X64.mingw_arch(), "x86_64");
        assert_eq!(Arch::X64.to_string(), "64bit");
    }
}
