//! Background execution of research runs.
//!
//! A run is created `QUEUED` by the API and handed to a detached task that
//! drives the agent stream, persists each event, and settles the run as
//! `COMPLETED` or `FAILED`. The [`RunSupervisor`] keeps handles to those
//! tasks so shutdown can wait for in-flight runs.

/// Task set management for in-flight runs.
pub mod supervisor;
/// The run execution loop.
pub mod tracker;

pub use supervisor::RunSupervisor;
pub use tracker::execute_run;
