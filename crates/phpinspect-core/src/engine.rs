//! Inspection engine
//!
//! Inspectors declare the node kinds they care about; the engine walks the
//! program once and dispatches each node only to the inspectors registered
//! for its kind. Dispatch order is registration order, so output is
//! deterministic for a fixed inspector set.
//!
//! A panicking inspector is contained: the panic is caught, recorded as a
//! [`HandlerFault`], and the pass continues with the remaining inspectors.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use mago_span::{HasSpan, Span};
use mago_syntax::ast::{Call, Class, Expression, Program};

use crate::diagnostic::{Diagnostic, DiagnosticList, DiagnosticSink};
use crate::logging;
use crate::services::{ClassIndex, TypeResolver};
use crate::walk::{walk_program, Frame, Visit};

/// Coarse node classification used for dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    FunctionCall,
    BinaryExpression,
    UnaryExpression,
    ClassDeclaration,
}

impl NodeKind {
    /// Classify an expression, or `None` for kinds no inspector targets.
    pub fn of_expression(expr: &Expression<'_>) -> Option<NodeKind> {
        match expr {
            Expression::Call(Call::Function(_)) => Some(NodeKind::FunctionCall),
            Expression::Binary(_) => Some(NodeKind::BinaryExpression),
            Expression::UnaryPrefix(_) => Some(NodeKind::UnaryExpression),
            _ => None,
        }
    }
}

/// Per-run services and source text handed to every inspector
pub struct InspectionContext<'ctx> {
    /// Full text of the file under inspection
    pub source: &'ctx str,
    /// Expression type lookup, host-supplied
    pub types: &'ctx dyn TypeResolver,
    /// Project class hierarchy lookup, host-supplied
    pub classes: &'ctx dyn ClassIndex,
}

/// A rule handler
///
/// Each callback examines one node and reports at most one finding for it.
/// Returning `None` means the node is clean as far as this rule goes.
pub trait Inspector: Send + Sync {
    /// Stable rule identifier, used in diagnostics and configuration.
    fn name(&self) -> &'static str;

    /// One-line summary of what the rule detects.
    fn description(&self) -> &'static str;

    /// Node kinds this inspector wants to see.
    fn targets(&self) -> &'static [NodeKind];

    fn check_expression<'a>(
        &self,
        _expr: &'a Expression<'a>,
        _ancestors: &[Frame<'a>],
        _ctx: &InspectionContext<'_>,
    ) -> Option<Diagnostic> {
        None
    }

    fn check_class<'a>(
        &self,
        _class: &'a Class<'a>,
        _ancestors: &[Frame<'a>],
        _ctx: &InspectionContext<'_>,
    ) -> Option<Diagnostic> {
        None
    }
}

/// Record of an inspector panic contained during a run
#[derive(Debug, Clone)]
pub struct HandlerFault {
    /// The inspector that panicked
    pub rule: &'static str,
    /// Span of the node being inspected when the panic fired
    pub span: Span,
}

/// Outcome of a full inspection pass
#[derive(Debug, Default)]
pub struct InspectionReport {
    pub diagnostics: Vec<Diagnostic>,
    pub faults: Vec<HandlerFault>,
}

/// Single-pass dispatcher over a parsed program
pub struct Engine<'e> {
    inspectors: Vec<&'e dyn Inspector>,
    by_kind: HashMap<NodeKind, Vec<usize>>,
}

impl<'e> Engine<'e> {
    pub fn new() -> Self {
        Self {
            inspectors: Vec::new(),
            by_kind: HashMap::new(),
        }
    }

    /// Register an inspector. Later registrations run after earlier ones
    /// on any node they share.
    pub fn register(&mut self, inspector: &'e dyn Inspector) {
        let index = self.inspectors.len();
        for kind in inspector.targets() {
            self.by_kind.entry(*kind).or_default().push(index);
        }
        self.inspectors.push(inspector);
    }

    pub fn inspector_count(&self) -> usize {
        self.inspectors.len()
    }

    /// Run every registered inspector over `program`, reporting into `sink`.
    ///
    /// Returns the faults contained during the run.
    pub fn run_with_sink(
        &self,
        program: &Program<'_>,
        ctx: &InspectionContext<'_>,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<HandlerFault> {
        let mut pass = Pass {
            engine: self,
            ctx,
            sink,
            faults: Vec::new(),
        };
        walk_program(&mut pass, program);
        pass.faults
    }

    /// Run every registered inspector over `program` and collect the results.
    pub fn run(&self, program: &Program<'_>, ctx: &InspectionContext<'_>) -> InspectionReport {
        let mut list = DiagnosticList::new();
        let faults = self.run_with_sink(program, ctx, &mut list);
        let report = InspectionReport {
            diagnostics: list.into_vec(),
            faults,
        };
        logging::log_run_summary(report.diagnostics.len(), report.faults.len());
        report
    }

    fn dispatch(
        &self,
        kind: NodeKind,
        span: Span,
        sink: &mut dyn DiagnosticSink,
        faults: &mut Vec<HandlerFault>,
        mut call: impl FnMut(&dyn Inspector) -> Option<Diagnostic>,
    ) {
        let Some(indices) = self.by_kind.get(&kind) else {
            return;
        };
        for &index in indices {
            let inspector = self.inspectors[index];
            match catch_unwind(AssertUnwindSafe(|| call(inspector))) {
                Ok(Some(diagnostic)) => sink.report(diagnostic),
                Ok(None) => {}
                Err(_) => {
                    logging::log(&format!(
                        "inspector '{}' panicked at {}..{}",
                        inspector.name(),
                        span.start.offset,
                        span.end.offset
                    ));
                    faults.push(HandlerFault {
                        rule: inspector.name(),
                        span,
                    });
                }
            }
        }
    }
}

impl<'e> Default for Engine<'e> {
    fn default() -> Self {
        Self::new()
    }
}

struct Pass<'p, 'e> {
    engine: &'p Engine<'e>,
    ctx: &'p InspectionContext<'p>,
    sink: &'p mut dyn DiagnosticSink,
    faults: Vec<HandlerFault>,
}

impl<'p, 'e, 'a> Visit<'a> for Pass<'p, 'e> {
    fn enter_expression(&mut self, expr: &'a Expression<'a>, ancestors: &[Frame<'a>]) {
        let Some(kind) = NodeKind::of_expression(expr) else {
            return;
        };
        self.engine.dispatch(
            kind,
            expr.span(),
            self.sink,
            &mut self.faults,
            |inspector| inspector.check_expression(expr, ancestors, self.ctx),
        );
    }

    fn enter_class(&mut self, class: &'a Class<'a>, ancestors: &[Frame<'a>]) {
        self.engine.dispatch(
            NodeKind::ClassDeclaration,
            class.name.span(),
            self.sink,
            &mut self.faults,
            |inspector| inspector.check_class(class, ancestors, self.ctx),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{NullClassIndex, NullTypeResolver};
    use crate::Severity;
    use bumpalo::Bump;
    use mago_database::file::FileId;

    struct FlagEveryCall {
        name: &'static str,
    }

    impl Inspector for FlagEveryCall {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "flags every function call"
        }

        fn targets(&self) -> &'static [NodeKind] {
            &[NodeKind::FunctionCall]
        }

        fn check_expression<'a>(
            &self,
            expr: &'a Expression<'a>,
            _ancestors: &[Frame<'a>],
            _ctx: &InspectionContext<'_>,
        ) -> Option<Diagnostic> {
            Some(Diagnostic::new(
                self.name,
                expr.span(),
                "call seen",
                Severity::Warning,
            ))
        }
    }

    struct AlwaysPanics;

    impl Inspector for AlwaysPanics {
        fn name(&self) -> &'static str {
            "always_panics"
        }

        fn description(&self) -> &'static str {
            "panics on every function call"
        }

        fn targets(&self) -> &'static [NodeKind] {
            &[NodeKind::FunctionCall]
        }

        fn check_expression<'a>(
            &self,
            _expr: &'a Expression<'a>,
            _ancestors: &[Frame<'a>],
            _ctx: &InspectionContext<'_>,
        ) -> Option<Diagnostic> {
            panic!("boom");
        }
    }

    fn run_inspectors(source: &str, inspectors: &[&dyn Inspector]) -> InspectionReport {
        let arena = Bump::new();
        let file_id = FileId::new(b"test.php");
        let program = mago_syntax::parser::parse_file_content(&arena, file_id, source.as_bytes());

        let mut engine = Engine::new();
        for inspector in inspectors {
            engine.register(*inspector);
        }
        let ctx = InspectionContext {
            source,
            types: &NullTypeResolver,
            classes: &NullClassIndex,
        };
        engine.run(program, &ctx)
    }

    #[test]
    fn test_dispatches_only_to_targeted_kinds() {
        let first = FlagEveryCall { name: "first" };
        let report = run_inspectors("<?php f(); $a = 1 + 2;", &[&first]);
        // One call in the source; the binary expression is not dispatched
        // to a call-targeting inspector.
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].rule, "first");
    }

    #[test]
    fn test_registration_order_is_dispatch_order() {
        let first = FlagEveryCall { name: "first" };
        let second = FlagEveryCall { name: "second" };
        let report = run_inspectors("<?php f();", &[&first, &second]);

        let rules: Vec<&str> = report.diagnostics.iter().map(|d| d.rule).collect();
        assert_eq!(rules, vec!["first", "second"]);
    }

    #[test]
    fn test_panicking_inspector_is_contained() {
        let panicky = AlwaysPanics;
        let healthy = FlagEveryCall { name: "healthy" };
        let report = run_inspectors("<?php f(); g();", &[&panicky, &healthy]);

        // The healthy inspector still reported for both calls.
        assert_eq!(report.diagnostics.len(), 2);
        assert!(report.diagnostics.iter().all(|d| d.rule == "healthy"));
        // Both panics were recorded as faults.
        assert_eq!(report.faults.len(), 2);
        assert!(report.faults.iter().all(|f| f.rule == "always_panics"));
    }
}
