//! # provision
//!
//! A small engine for staged, idempotent machine provisioning.
//!
//! The model: a [`Pipeline`] is an ordered list of named stages, each stage an
//! ordered list of [`Step`]s. Steps declare their own idempotence guard (check
//! state, then mutate) and a [`FailurePolicy`]; the pipeline runs everything
//! strictly sequentially and aborts on the first fatal step error, reporting
//! the failing stage by name.
//!
//! All machine mutation flows through the [`Host`] capability trait, so the
//! same steps can run against the real OS ([`OsHost`]) or an in-memory fake
//! ([`MemoryHost`]) in tests.
//!
//! ## Example
//!
//! ```
//! use provision::{Host, MemoryHost, Pipeline, RunOptions, Step, StepOutcome, StepState};
//!
//! #[derive(Debug)]
//! struct Touch(&'static str);
//!
//! impl Step for Touch {
//!     fn id(&self) -> String { format!("touch:{}", self.0) }
//!     fn description(&self) -> String { format!("Create {}", self.0) }
//!
//!     fn current_state(&self, host: &dyn Host) -> anyhow::Result<StepState> {
//!         Ok(if host.path_exists(self.0.as_ref()) {
//!             StepState::Satisfied
//!         } else {
//!             StepState::Missing
//!         })
//!     }
//!
//!     fn apply(&self, host: &dyn Host) -> anyhow::Result<StepOutcome> {
//!         if host.path_exists(self.0.as_ref()) {
//!             return Ok(StepOutcome::AlreadyDone);
//!         }
//!         host.write_file(self.0.as_ref(), b"")?;
//!         Ok(StepOutcome::Changed)
//!     }
//! }
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.stage("files", "Touch some files", vec![Box::new(Touch("/tmp/a"))]);
//!
//! let host = MemoryHost::new();
//! let summary = pipeline.run(&host, &RunOptions::default(), &mut provision::NoProgress).unwrap();
//! assert_eq!(summary.changed, 1);
//! ```

pub mod host;
pub mod memory;
pub mod pipeline;
pub mod step;
pub mod types;

pub use host::{Host, OsHost};
pub use memory::MemoryHost;
pub use pipeline::{NoProgress, Pipeline, ProgressCallback, Stage};
pub use step::{FailurePolicy, Step};
pub use types::{CommandOutput, RunOptions, RunSummary, StepOutcome, StepState};
