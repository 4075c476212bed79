//! Engine-independent analysis: response normalization and heuristic scoring.

pub mod heuristic;
pub mod normalizer;

pub use heuristic::{analyze_heuristic, analyze_simple, TextStats};
pub use normalizer::{normalize, normalize_output, strip_fences, Normalized};
