//! `codefinder-match`: Code Matcher engine.
//!
//! Pure engine crate: receives pre-loaded query codes and reference rows,
//! returns one enriched row per query code. No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod summary;

pub use config::{MatchConfig, MatchMode, WidthPolicy};
pub use engine::run;
pub use error::MatchError;
pub use matcher::{Matcher, ReferenceTable};
pub use model::{MatchInput, MatchReport, MatchedRow, ResultTable};
pub use normalize::AvoidTokens;

/// Placeholder written into every attribute column of an unmatched row.
pub const MISSING: &str = "MISSING";
