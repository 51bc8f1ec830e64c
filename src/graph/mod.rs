//! Change-impact graph
//!
//! Units and their imports come from a [`unit::UnitScanner`]; the edges are
//! inverted once into a [`ReverseIndex`] and the changed units are closed over
//! it. The engine never touches Cargo or git directly.

pub mod affected;
pub mod ignore;
pub mod reverse_index;
pub mod unit;

pub use affected::AffectedAnalysis;
pub use ignore::IgnoreFilter;
pub use reverse_index::ReverseIndex;
