//! Contact field extraction from recognized text and model output.

mod heuristic;
mod normalizer;
pub mod rules;

pub use heuristic::HeuristicExtractor;
pub use normalizer::FieldNormalizer;
