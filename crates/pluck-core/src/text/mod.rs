//! Text reconstruction: raw character streams to the line/word model.

mod heuristics;
mod reconstruct;

pub use heuristics::repair_spacing;
pub use reconstruct::Reconstructor;
