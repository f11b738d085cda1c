//! Domain layer containing pure business logic
//!
//! Architecture: Clean Architecture - Domain layer is independent of infrastructure
//! - Contains the documents, findings and reports the engine reasons about
//! - No dependencies on external frameworks or infrastructure concerns

pub mod batch;
pub mod document;
pub mod findings;
