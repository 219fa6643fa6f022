use crate::Result;
#[cfg(not(all(
    any(target_os = "macos", target_os = "linux", target_os = "windows"),
    target_arch = "x86_64"
)))]
use bazelift_core::BazeliftError;

/// Host operating system, restricted to the systems Bazel releases
/// binaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    MacOs,
    Windows,
}

/// Host CPU architecture. Bazel only releases x86_64 binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
}

/// The (os, arch) pair release artifacts are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Os {
    pub fn detect() -> Result<Os> {
        #[cfg(target_os = "linux")]
        return Ok(Os::Linux);

        #[cfg(target_os = "macos")]
        return Ok(Os::MacOs);

        #[cfg(target_os = "windows")]
        return Ok(Os::Windows);

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        Err(BazeliftError::UnsupportedOs(
            std::env::consts::OS.to_string(),
        ))
    }

    /// Label used in release filenames. macOS releases are labeled `darwin`.
    pub fn label(self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::MacOs => "darwin",
            Os::Windows => "windows",
        }
    }

    /// Suffix release binaries carry on this OS.
    pub fn exe_suffix(self) -> &'static str {
        match self {
            Os::Windows => ".exe",
            Os::Linux | Os::MacOs => "",
        }
    }
}

impl Arch {
    pub fn detect() -> Result<Arch> {
        #[cfg(target_arch = "x86_64")]
        return Ok(Arch::X86_64);

        #[cfg(not(target_arch = "x86_64"))]
        Err(BazeliftError::UnsupportedArch(
            std::env::consts::ARCH.to_string(),
        ))
    }

    pub fn label(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
        }
    }
}

impl Platform {
    /// Detects the host platform. Pure: no I/O, no environment reads, so an
    /// unsupported host fails before anything is created or fetched.
    ///
    /// Architecture is checked first so ARM hosts report the architecture
    /// problem, not a missing OS.
    pub fn detect() -> Result<Platform> {
        let arch = Arch::detect()?;
        let os = Os::detect()?;
        Ok(Platform { os, arch })
    }
}
