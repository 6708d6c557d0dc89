//! Anomaly Scoring Core
//!
//! Statistics, tiered detectors, the fallback chain, result assembly and the
//! run driver.

mod assembler;
mod chain;
mod detectors;
mod observer;
mod ranker;
mod runner;
mod sample;
mod statistics;
mod table;

pub use assembler::*;
pub use chain::*;
pub use detectors::*;
pub use observer::*;
pub use ranker::{format_contributors, rank_contributors};
pub use runner::*;
pub use sample::*;
pub use statistics::*;
pub use table::*;
