//! Class name checks that should be `instanceof`
//!
//! Comparing `get_class($x)` against a class name string, or calling
//! `is_a`/`is_subclass_of` with a literal class name, is slower and more
//! brittle than the `instanceof` operator. The rewrite is only offered when
//! it is provably equivalent: the named class must resolve to at least one
//! known project class, `get_class` comparisons additionally require the
//! class to have no subclasses, and the subject must not possibly be a
//! string.

use mago_span::{HasSpan, Span};
use mago_syntax::ast::{Call, Expression, FunctionCall, Literal};

use phpinspect_core::engine::{InspectionContext, Inspector, NodeKind};
use phpinspect_core::query::{
    extract_class_fqn, function_name, node_text, second_operand, OperatorKind,
};
use phpinspect_core::walk::Frame;
use phpinspect_core::{Diagnostic, FixDescriptor, Severity};

pub const RULE_NAME: &str = "instanceof_can_be_used";

pub struct InstanceofCanBeUsed;

impl Inspector for InstanceofCanBeUsed {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Reports class name checks expressible with the instanceof operator"
    }

    fn targets(&self) -> &'static [NodeKind] {
        &[NodeKind::FunctionCall]
    }

    fn check_expression<'a>(
        &self,
        expr: &'a Expression<'a>,
        ancestors: &[Frame<'a>],
        ctx: &InspectionContext<'_>,
    ) -> Option<Diagnostic> {
        let Expression::Call(Call::Function(call)) = expr else {
            return None;
        };
        let name = function_name(call, ctx.source)?;

        if name.eq_ignore_ascii_case("get_class") || name.eq_ignore_ascii_case("get_parent_class")
        {
            return self.check_class_name_comparison(name, expr, call, ancestors, ctx);
        }
        if name.eq_ignore_ascii_case("is_a") || name.eq_ignore_ascii_case("is_subclass_of") {
            return self.check_ancestry_call(expr, call, ctx);
        }
        None
    }
}

impl InstanceofCanBeUsed {
    /// `get_class($x) === 'Fqn'` and friends.
    fn check_class_name_comparison<'a>(
        &self,
        name: &str,
        expr: &'a Expression<'a>,
        call: &'a FunctionCall<'a>,
        ancestors: &[Frame<'a>],
        ctx: &InspectionContext<'_>,
    ) -> Option<Diagnostic> {
        let arguments = &call.argument_list.arguments;
        if arguments.len() != 1 || arguments.iter().any(|arg| arg.is_unpacked()) {
            return None;
        }
        let subject = arguments.iter().next()?.value();

        // Nearest enclosing expression, looking through parentheses.
        let mut node_span = expr.span();
        let mut nearest: Option<&Expression<'_>> = None;
        for frame in ancestors.iter().rev() {
            match *frame {
                Frame::Condition => break,
                Frame::Expr(parent) => match parent {
                    Expression::Parenthesized(_) => node_span = parent.span(),
                    _ => {
                        nearest = Some(parent);
                        break;
                    }
                },
            }
        }
        let parent @ Expression::Binary(binary) = nearest? else {
            return None;
        };
        let op = OperatorKind::of(&binary.operator);
        if !op.is_equality() {
            return None;
        }
        let candidate = second_operand(binary, node_span)?;
        let fqn = extract_class_fqn(candidate, ctx.source)?;

        // `get_class` on a string argument returns false in older PHP and
        // throws in PHP 8; a possibly-string subject makes the comparison
        // not equivalent to instanceof.
        let subject_types = ctx.types.resolve_type(subject, ctx.source)?;
        if subject_types.has_unknown() || subject_types.contains_string() {
            return None;
        }

        if ctx.classes.classes_by_fqn(&fqn).is_empty() {
            return None;
        }
        // An exact class match diverges from instanceof as soon as the
        // class is subclassed.
        if name.eq_ignore_ascii_case("get_class")
            && !ctx.classes.direct_subclasses(&fqn).is_empty()
        {
            return None;
        }

        let subject_text = node_text(subject.span(), ctx.source);
        let replacement = if op.is_negated() {
            format!("!{subject_text} instanceof {fqn}")
        } else {
            format!("{subject_text} instanceof {fqn}")
        };
        Some(self.diagnostic(parent.span(), replacement, ctx))
    }

    /// `is_a($x, 'Fqn')` / `is_subclass_of($x, 'Fqn')`, optionally with an
    /// explicit `false` allow-string argument.
    fn check_ancestry_call<'a>(
        &self,
        expr: &'a Expression<'a>,
        call: &'a FunctionCall<'a>,
        ctx: &InspectionContext<'_>,
    ) -> Option<Diagnostic> {
        let arguments = &call.argument_list.arguments;
        if arguments.iter().any(|arg| arg.is_unpacked()) {
            return None;
        }
        match arguments.len() {
            2 => {}
            3 => {
                // With allow_string enabled the call accepts class name
                // strings, which instanceof does not.
                let allow_string = arguments.iter().nth(2)?.value();
                if !matches!(allow_string, Expression::Literal(Literal::False(_))) {
                    return None;
                }
            }
            _ => return None,
        }

        let subject = arguments.iter().next()?.value();
        let candidate = arguments.iter().nth(1)?.value();
        let fqn = extract_class_fqn(candidate, ctx.source)?;

        // Both calls accept a class name string as the subject; instanceof
        // does not, so a possibly-string subject must stay unreported.
        let subject_types = ctx.types.resolve_type(subject, ctx.source)?;
        if subject_types.has_unknown() || subject_types.contains_string() {
            return None;
        }

        if ctx.classes.classes_by_fqn(&fqn).is_empty() {
            return None;
        }

        let subject_text = node_text(subject.span(), ctx.source);
        let replacement = format!("{subject_text} instanceof {fqn}");
        Some(self.diagnostic(expr.span(), replacement, ctx))
    }

    fn diagnostic(&self, span: Span, replacement: String, ctx: &InspectionContext<'_>) -> Diagnostic {
        let message = format!("'{replacement}' can be used instead.");
        let fix = FixDescriptor::new("Use instanceof", span, ctx.source, replacement);
        Diagnostic::new(RULE_NAME, span, message, Severity::Warning).with_fix(fix)
    }
}
