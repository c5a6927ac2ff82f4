// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Input model for the gozer scaffolder.
//!
//! The types here are what a parser hands to the IR builder: a
//! [`ServiceSpec`] for route-spec mode, a [`SchemaConfig`] for schema-driven
//! mode, and the [`GenConfig`] options shared by both.

mod config;
mod error;
mod schema;
mod service;
mod type_ref;
mod validate;

pub use config::{CONFIG_FILE_NAME, ClassifyRule, GenConfig, GozerToml};
pub use error::{Error, Result, SourceContext};
pub use schema::{Column, SchemaConfig, SchemaTable};
pub use service::{
    Annotations, Field, Route, RouteGroup, ServiceMeta, ServiceSpec, TypeDef, annotation,
};
pub use type_ref::TypeRef;
