//! Platform detection for release asset selection.

use crate::error::{Error, Result};

/// Kernel version file consulted for WSL detection.
pub const KERNEL_VERSION_PATH: &str = "/proc/version";

/// Whether a kernel version string identifies a WSL host.
///
/// The match is a case-sensitive substring check for "Microsoft" (WSL1 and
/// early WSL2 kernels) or "WSL" (current WSL2 kernels). A plain Linux kernel
/// matches neither.
#[must_use]
pub fn is_wsl_kernel(version_text: &str) -> bool {
    version_text.contains("Microsoft") || version_text.contains("WSL")
}

/// The `<OS>_<arch>` suffix used by release asset names (lazygit convention).
///
/// # Errors
///
/// Returns `Error::UnsupportedPlatform` when no asset naming is known for the
/// current platform.
pub fn asset_suffix() -> Result<&'static str> {
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;

    match (os, arch) {
        ("linux", "x86_64") => Ok("Linux_x86_64"),
        ("linux", "aarch64") => Ok("Linux_arm64"),
        _ => Err(Error::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wsl1_kernel_matches() {
        assert!(is_wsl_kernel(
            "Linux version 4.4.0-19041-Microsoft (Microsoft@Microsoft.com)"
        ));
    }

    #[test]
    fn wsl2_kernel_matches() {
        assert!(is_wsl_kernel(
            "Linux version 5.15.167.4-microsoft-standard-WSL2 (root@host)"
        ));
    }

    #[test]
    fn plain_linux_does_not_match() {
        assert!(!is_wsl_kernel("Linux version 5.15.0-generic (buildd@lcy02)"));
    }

    #[test]
    fn match_is_case_sensitive() {
        // Lowercase "microsoft" alone is not a match; WSL2 kernels that spell
        // it lowercase still carry the "WSL" marker.
        assert!(!is_wsl_kernel("Linux version 5.15.0-microsoft-custom"));
    }

    #[test]
    fn empty_string_does_not_match() {
        assert!(!is_wsl_kernel(""));
    }

    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    #[test]
    fn asset_suffix_on_linux_x86_64() {
        assert_eq!(asset_suffix().unwrap(), "Linux_x86_64");
    }
}
