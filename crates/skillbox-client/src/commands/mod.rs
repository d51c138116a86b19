//! Command handlers.
//!
//! Handlers write their report to the given writer and return `Ok` even when
//! a remote call fails; the failure is part of the report. Only local I/O
//! errors on the writer propagate.

pub mod calendar;
pub mod drive;
pub mod knowledge;
