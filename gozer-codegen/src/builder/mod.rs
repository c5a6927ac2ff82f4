//! Code generation building blocks.
//!
//! - [`CodeBuilder`] - fluent API for building indented code
//! - [`Indent`] - indentation configuration

mod code_builder;
mod indent;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
