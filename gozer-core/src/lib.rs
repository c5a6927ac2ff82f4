//! Core utilities and types for the gozer scaffolder.
//!
//! This crate provides the file-writing primitives and string utilities
//! shared by every other gozer crate.

mod file;
mod utils;

// File operations
pub use file::{File, FileRules, GENERATED_HEADER, GeneratedFile, Overwrite, WriteResult};
// String utilities
pub use utils::{
    lower_first, split_words, strip_suffix_ignore_case, to_lower_camel_case, to_pascal_case,
    to_snake_case, upper_first,
};
