//! CBF header parser for PILATUS detector images
//!
//! This module extracts experiment metadata from the text header of CBF
//! files. Only the header region is read; the binary image payload that
//! follows it is never touched.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`validator`] - Cheap format sniff run before any parsing
//! - [`tokenizer`] - Lazy key/value extraction from the header region
//! - [`dictionary`] - Static table of recognised keys and their rules
//! - [`normalizer`] - Unit conversion and fixed-precision rendering
//! - [`assembler`] - Two-level result tree in declared order
//! - [`pipeline`] - Orchestration of the stages for one file
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cbf_metadata::app::services::cbf_header::extract_header;
//! use cbf_metadata::ImporterConfig;
//!
//! # fn example() -> cbf_metadata::Result<()> {
//! let result = extract_header(std::path::Path::new("image_00001.cbf"), &ImporterConfig::default())?;
//!
//! for field in &result.fields {
//!     println!("{} = {}", field.name, field.value);
//! }
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod dictionary;
pub mod normalizer;
pub mod pipeline;
pub mod stats;
pub mod tokenizer;
pub mod validator;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use assembler::{assemble, count_leaves};
pub use dictionary::{FieldDictionary, GroupSpec, LayoutSlot};
pub use normalizer::normalize;
pub use pipeline::{extract_from_reader, extract_header};
pub use stats::{ExtractionResult, ParseStats};
pub use tokenizer::HeaderTokenizer;
pub use validator::{sniff, validate_file};
