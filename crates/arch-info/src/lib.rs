//! # arch-info
//!
//! Maps the compilation target to the platform string used by container
//! image manifests (`linux/amd64`, `linux/arm/v7`, ...).
//!
//! The smoke image runs this binary; a clean exit with a known platform on
//! stdout is what the harness expects to see.

#![warn(missing_docs)]

/// Line printed when the target architecture has no platform string.
pub const UNKNOWN: &str = "Architecture: Unknown";

/// Every platform string [`platform`] can return.
pub const KNOWN_PLATFORMS: &[&str] = &[
    "linux/386",
    "linux/amd64",
    "linux/arm",
    "linux/arm/v6",
    "linux/arm/v7",
    "linux/arm64",
    "linux/mips64",
    "linux/mips64le",
    "linux/ppc64le",
    "linux/riscv64",
    "linux/s390x",
];

/// Returns the platform string for the architecture this binary was built for.
#[must_use]
pub fn platform() -> Option<&'static str> {
    platform_for(std::env::consts::ARCH)
}

/// Returns the platform string for an architecture name as reported by
/// [`std::env::consts::ARCH`].
///
/// ARM and MIPS variants are resolved from the compilation target, so the
/// answer for those is only meaningful for the current target.
#[must_use]
pub fn platform_for(arch: &str) -> Option<&'static str> {
    match arch {
        "aarch64" => Some("linux/arm64"),
        "arm" => Some(if cfg!(target_feature = "v7") {
            "linux/arm/v7"
        } else if cfg!(target_feature = "v6") {
            "linux/arm/v6"
        } else {
            "linux/arm"
        }),
        "mips64" => Some(if cfg!(target_endian = "little") {
            "linux/mips64le"
        } else {
            "linux/mips64"
        }),
        "powerpc64" => Some("linux/ppc64le"),
        "riscv64" => Some("linux/riscv64"),
        "s390x" => Some("linux/s390x"),
        "x86_64" => Some("linux/amd64"),
        "x86" => Some("linux/386"),
        _ => None,
    }
}

/// Returns true if `line` is one of [`KNOWN_PLATFORMS`].
#[must_use]
pub fn is_known_platform(line: &str) -> bool {
    KNOWN_PLATFORMS.contains(&line)
}
