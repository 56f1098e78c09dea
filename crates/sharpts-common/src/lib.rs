//! Common types and utilities shared across the SharpTS emitter core.
//!
//! This crate provides foundational types used by every downstream crate:
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`, `Spanned`)
//! - Diagnostics (`Diagnostic`, `DiagnosticBag`, `DiagnosticKind`)
//! - The compilation-context configuration (`CompileOptions`)

pub mod diagnostics;
pub mod interner;
pub mod options;
pub mod span;

pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticCategory, DiagnosticKind};
pub use interner::{Atom, Interner};
pub use options::{CompileOptions, TargetWidth};
pub use span::{Span, Spanned};
