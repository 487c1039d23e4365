mod engine;
mod table;
mod types;

pub use engine::PhaseEngine;
pub use table::{InitCallback, LoopCallback, PhaseConfig, PhaseSet, PhaseTable, PhaseTableError};
pub use types::{InitArgs, LoopArgs, PhaseData, PhaseResponse, Response};
