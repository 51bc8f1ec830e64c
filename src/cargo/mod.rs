//! Cargo bindings for the unit collaborators
//!
//! A build unit is a Cargo package. Packages come from `cargo metadata`,
//! loaded once per run and shared by the resolver and the scanner.

pub mod metadata;
pub mod resolver;
pub mod scanner;

pub use metadata::WorkspaceMetadata;
pub use resolver::CargoUnitResolver;
pub use scanner::CargoScanner;
