//! `emat_core` is the core library for [emat](https://github.com/emat-tools/emat). It scrapes
//! numeric results out of the human-readable reports a travel demand model writes, and stamps
//! experiment parameters into the model's input files before a run.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Before a run
//!   parameter file → ParameterSet
//!   template + ParameterSet → TokenTemplate (every placeholder replaced or nothing)
//!   input file + ParameterSet → Replacement (assignment values rewritten, comments kept)
//!
//! After a run
//!   report file → TieredParser / DoubleTierParser / InterchangeParser → ReportMapping
//!   ReportMapping → MeasureMap → named measure values
//! ```
//!
//! ## Modules
//!
//! - [`tiers`]: Section markers and the tier stack that recovers a report's outline.
//! - [`report`]: Tiered and double-tier report parsers producing a flat [`ReportMapping`].
//! - [`interchange`]: Parser for matrix reports of origin/destination values.
//! - [`template`]: Strict placeholder substitution with typed parameter values.
//! - [`replacement`]: Regex rewriting of `name: value` assignments with substitution counts.
//! - [`measures`]: Named measures looked up in a parsed report.
//! - [`config`]: Configuration loading from `emat.toml` and parameter files.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use emat_core::report::TieredParser;
//! use emat_core::template::ParameterSet;
//! use emat_core::template::TokenTemplate;
//! use emat_core::tiers::MarkerSet;
//!
//! let report = TieredParser::colon(MarkerSet::default()).parse("==Chicago==\nVMT: 12.5\n").unwrap();
//! assert_eq!(report["Chicago.VMT"], 12.5);
//!
//! let template = TokenTemplate::new(["__x__"]).unwrap();
//! let params = ParameterSet::new().with("__x__", 7);
//! assert_eq!(template.render("rate = __EMAT_PROVIDES__x__", &params).unwrap(), "rate = 7");
//! ```

pub use engine::*;
pub use error::*;
pub use report::ReportMapping;

pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod interchange;
pub mod measures;
pub mod replacement;
pub mod report;
pub mod template;
pub mod tiers;

#[cfg(test)]
mod __fixtures;
