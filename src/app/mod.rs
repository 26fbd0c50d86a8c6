pub mod runner;

pub use runner::{run, RunOptions, RunOutcome};
