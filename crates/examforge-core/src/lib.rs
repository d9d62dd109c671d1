//! examforge-core — Exam matrix, point allocation, validation and generation.
//!
//! This crate defines the data model of an exam under construction, the
//! period-weighted point allocator, the structural validator for question
//! content, and the generator that turns question plans into content.

pub mod allocator;
pub mod content;
pub mod error;
pub mod generator;
pub mod model;
pub mod prompt;
pub mod session;
pub mod traits;
pub mod validator;
