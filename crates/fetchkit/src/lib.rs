//! # fetchkit
//!
//! Helpers for installing single-binary tools from release archives:
//!
//! - GitHub release-metadata types and `releases/latest` parsing
//! - platform detection, including the WSL kernel-string check
//! - extraction of exactly one named member from a tar.gz or zip archive
//!
//! Everything is pure (bytes in, bytes out); downloading is the caller's
//! concern, so tests never touch the network.

pub mod archive;
pub mod error;
pub mod platform;
pub mod release;

pub use error::{Error, Result};
pub use release::{Release, ReleaseAsset};
