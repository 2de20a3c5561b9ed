//! Step implementations for the bootstrap stages.
//!
//! Each step carries its own idempotence guard and failure policy; the
//! pipeline in `provision` just runs them in order.

pub mod file;
pub mod git;
pub mod package;
pub mod release;
pub mod script;
pub mod shell;
pub mod symlink;

pub use file::{AppendLine, ConfigDump};
pub use git::GitClone;
pub use package::{IndexRefresh, InstallPackage, SystemUpgrade};
pub use release::{LatestReleaseBinary, WslClipboardBridge};
pub use script::RemoteScript;
pub use shell::{LoginShell, Reminder, SkipNotice};
pub use symlink::CompatSymlink;
