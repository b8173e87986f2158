//! phpinspect-core: Core abstractions for PHP code inspections
//!
//! This crate provides:
//! - `Engine`: single-pass dispatcher walking a parsed PHP program and
//!   feeding each node to the inspectors registered for its kind
//! - `Inspector`: trait implemented by every rule handler
//! - `Diagnostic` / `DiagnosticSink`: reporting of findings
//! - `FixDescriptor`: deferred quick fixes, re-anchored at apply time
//! - `Edit` / `apply_edits()`: span-based source rewriting
//! - `query`: expression classification helpers shared by all inspections
//! - `TypeResolver` / `ClassIndex`: semantic services supplied by the host

mod diagnostic;
mod edit;
mod fix;
pub mod engine;
pub mod logging;
pub mod query;
pub mod services;
pub mod walk;

pub use diagnostic::{Diagnostic, DiagnosticList, DiagnosticSink, Severity};
pub use edit::{apply_edits, Edit, EditError};
pub use engine::{Engine, HandlerFault, InspectionContext, InspectionReport, Inspector, NodeKind};
pub use fix::{FixDescriptor, FixError};
pub use services::{
    ClassIndex, ClassStub, MapClassIndex, MapTypeResolver, NullClassIndex, NullTypeResolver,
    PhpType, TypeResolver, TypeSet,
};
pub use walk::{walk_program, Frame, Visit};
