//! The fnpack packaging pipeline.
//!
//! # Stages
//!
//! ```text
//! fnpack package
//!   1. Clean      ── rm -rf *.js node_modules bundle.zip package-lock.json
//!   2. Install    ── yarn --no-lockfile
//!   3. Compile    ── tsc                       (ts functions only)
//!   4. Normalize  ── touch -d @0 on every entry that will be archived
//!   5. Bundle     ── zip -X bundle.zip node_modules *.js
//! ```
//!
//! Every stage is a single external process run in the source directory,
//! through a [`ProcessRunner`] so stages can be tested without spawning
//! anything. Stages share no in-memory state; each one works on what the
//! previous one left on disk.
//!
//! # Reproducibility
//!
//! The install step deliberately ignores lockfiles, so dependency
//! *resolution* can drift between runs. Given the same resolved files,
//! the archive is byte-identical: see [`bundle`] and [`normalize`].

pub mod bundle;
pub mod clean;
pub mod compile;
pub mod doctor;
pub mod install;
pub mod layout;
pub mod normalize;
pub mod pipeline;
pub mod runner;
pub mod stage;

pub use doctor::{CheckResult, Doctor, DoctorReport, ToolCheck};
pub use pipeline::{PackageOutcome, Pipeline, PipelineError, RunState, StageReport};
pub use runner::{Invocation, ProcessError, ProcessOutput, ProcessRunner, TokioRunner};
pub use stage::{Stage, StageContext, StageError};
