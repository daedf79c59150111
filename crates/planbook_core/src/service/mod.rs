//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Run rules that need storage lookups (owner-scoped name uniqueness).
//! - Keep callers decoupled from storage details.

pub mod project_service;
pub mod project_validation;
