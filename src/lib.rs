//! EssayLens - LLM-powered essay feedback.
//!
//! An essay goes through three analyzer roles (grammar, structure,
//! content), a coordinator synthesizes their notes into one JSON
//! assessment, and the normalizer turns whatever the model produced into a
//! well-formed [`models::AnalysisReport`]. A statistics-only heuristic
//! profile needs no model at all.
//!
//! The same [`service::EssayService`] backs both the command-line front
//! end and the HTTP API built by [`build_router`].

pub mod agent;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;
pub mod server;
pub mod service;

pub use error::{AnalysisError, AnalysisResult, EngineError};
pub use server::{build_router, AppState};
pub use service::EssayService;
