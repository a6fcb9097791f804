//! The library code for the `thoughtstorm` static blog generator. A build is
//! one linear pass through three steps:
//!
//! 1. Loading posts from markdown source files on disk ([`crate::parser`])
//! 2. Rendering every post page and the index page ([`crate::render`])
//! 3. Writing the rendered pages to the output directory ([`crate::write`])
//!
//! Each step consumes the complete output of the one before it; nothing is
//! written until every page has rendered. The first line of each source file
//! is its title, the rest is its markdown body, and the index lists every
//! post by title and date. [`crate::build::build_site`] runs the whole thing.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod markdown;
pub mod parser;
pub mod post;
pub mod render;
pub mod url;
pub mod write;
