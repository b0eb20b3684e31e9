//! Core analysis engine for linqlint.
//!
//! Parses JavaScript and TypeScript with swc, builds a scope model of each
//! module and runs the registered rules over it.

pub mod analysis;
pub mod config;
pub mod diagnostic;
pub mod disable_comments;
pub mod fixer;
pub mod parser;
pub mod rules;
pub mod semantic;
pub mod visitor;
