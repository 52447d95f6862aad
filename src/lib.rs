//! Payment-narrative sanctions screening core.
//!
//! Nine layers, run in strict order: validation, smart filter, language
//! detection, unicode normalization, name normalization, signals
//! extraction, variants, embeddings, decision. Layers 5, 6, and 9 are the
//! hard core; the rest are thin, swappable adapters.

pub mod config;
pub mod decision;
pub mod embeddings;
pub mod error;
pub mod language;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod search;
pub mod signals;
pub mod smart_filter;
pub mod types;
pub mod unicode_norm;
pub mod validation;
pub mod variants;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{Pipeline, ScreenRequest, ScreenResponse};
