// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Language-independent compiler passes for the gozer scaffolder.
//!
//! This crate turns parsed inputs into IR and owns the pieces every
//! emitter shares.
//!
//! # Module Organization
//!
//! - [`naming`] - Naming Resolver (`NamingFormat`, `Naming`)
//! - [`type_mapper`] - column and type-reference mapping
//! - [`classifier`] - ordered operation classification rules
//! - [`annotations`] - route group policy resolution
//! - [`pipeline`] - route-spec IR construction (validate, lower)
//! - [`schema`] - schema-driven IR construction
//! - [`builder`] - `CodeBuilder` and indentation
//! - [`generation`] - artifact registry, imports, descriptor merges, backups

pub mod annotations;
pub mod builder;
pub mod classifier;
mod error;
pub mod generation;
pub mod naming;
pub mod pipeline;
pub mod schema;
pub mod type_mapper;

pub use error::{Error, ErrorScope, Result};
