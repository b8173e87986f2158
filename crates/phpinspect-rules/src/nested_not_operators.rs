//! Nested `!` operator chains
//!
//! `!!$x` is an idiom for boolean casting and `!!!$x` for negation, but both
//! read poorly. The rule reports the whole chain once, anchored at the
//! innermost `!` so nesting is detected bottom-up: an even number of `!`
//! becomes `(bool)`, an odd number becomes a single `!`.

use mago_span::HasSpan;
use mago_syntax::ast::Expression;

use phpinspect_core::engine::{InspectionContext, Inspector, NodeKind};
use phpinspect_core::query::{is_not_operator, node_text, unwrap_parentheses};
use phpinspect_core::walk::Frame;
use phpinspect_core::{Diagnostic, FixDescriptor, Severity};

pub const RULE_NAME: &str = "nested_not_operators";

pub struct NestedNotOperators;

impl Inspector for NestedNotOperators {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Reports nested boolean negation chains such as !!$x and !!!$x"
    }

    fn targets(&self) -> &'static [NodeKind] {
        &[NodeKind::UnaryExpression]
    }

    fn check_expression<'a>(
        &self,
        expr: &'a Expression<'a>,
        ancestors: &[Frame<'a>],
        ctx: &InspectionContext<'_>,
    ) -> Option<Diagnostic> {
        let Expression::UnaryPrefix(unary) = expr else {
            return None;
        };
        if !is_not_operator(unary) {
            return None;
        }
        // Only the deepest `!` of a chain reports, so each chain is counted
        // exactly once.
        let inner = unwrap_parentheses(&unary.operand);
        if is_negation(inner) {
            return None;
        }

        let (depth, outermost) = chain_above(expr, ancestors);
        if depth < 2 {
            return None;
        }

        // A cast or `!` binds tighter than most operators, so anything but
        // an atomic operand keeps its parentheses in the rewrite.
        let inner_text = node_text(inner.span(), ctx.source);
        let operand_text = if is_atomic(inner) {
            inner_text.to_string()
        } else {
            format!("({inner_text})")
        };
        let replacement = if depth % 2 == 0 {
            format!("(bool) {operand_text}")
        } else {
            format!("!{operand_text}")
        };
        let message = format!("Can be replaced with {replacement}");
        let span = outermost.span();

        let fix = FixDescriptor::new("Simplify the expression", span, ctx.source, replacement);
        Some(Diagnostic::new(RULE_NAME, span, message, Severity::Suggestion).with_fix(fix))
    }
}

fn is_negation(expr: &Expression<'_>) -> bool {
    matches!(expr, Expression::UnaryPrefix(unary) if is_not_operator(unary))
}

fn is_atomic(expr: &Expression<'_>) -> bool {
    matches!(
        expr,
        Expression::Variable(_) | Expression::Literal(_) | Expression::Call(_)
    )
}

/// Count the `!` chain containing `expr` (inclusive), looking upward through
/// parentheses, and return the chain's outermost expression.
fn chain_above<'e, 'a>(
    expr: &'e Expression<'a>,
    ancestors: &[Frame<'a>],
) -> (usize, &'e Expression<'a>)
where
    'a: 'e,
{
    let mut depth = 1usize;
    let mut outermost = expr;
    for frame in ancestors.iter().rev() {
        let Frame::Expr(parent) = *frame else {
            break;
        };
        match parent {
            // Parentheses between two `!` fall inside the next not's span;
            // parentheses above the outermost `!` stay in place.
            Expression::Parenthesized(_) => {}
            Expression::UnaryPrefix(unary) if is_not_operator(unary) => {
                depth += 1;
                outermost = parent;
            }
            _ => break,
        }
    }
    (depth, outermost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{apply_single_fix, check};

    #[test]
    fn test_double_not_becomes_bool_cast() {
        let fixed = apply_single_fix("<?php if (!!$x) {}", &NestedNotOperators);
        assert_eq!(fixed, "<?php if ((bool) $x) {}");
    }

    #[test]
    fn test_triple_not_becomes_single_not() {
        let fixed = apply_single_fix("<?php if (!!!$x) {}", &NestedNotOperators);
        assert_eq!(fixed, "<?php if (!$x) {}");
    }

    #[test]
    fn test_chain_reported_exactly_once() {
        let diagnostics = check("<?php $y = !!!!$x;", &NestedNotOperators);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Can be replaced with (bool) $x"
        );
    }

    #[test]
    fn test_parentheses_inside_chain_are_seen_through() {
        let diagnostics = check("<?php $y = !(!($x));", &NestedNotOperators);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("(bool) $x"));
    }

    #[test]
    fn test_non_atomic_operand_keeps_parentheses() {
        let fixed = apply_single_fix("<?php $r = !!($a && $b);", &NestedNotOperators);
        assert_eq!(fixed, "<?php $r = (bool) ($a && $b);");
    }

    #[test]
    fn test_odd_chain_over_non_atomic_operand() {
        let fixed = apply_single_fix("<?php $r = !!!($a || $b);", &NestedNotOperators);
        assert_eq!(fixed, "<?php $r = !($a || $b);");
    }

    #[test]
    fn test_anchor_excludes_wrapping_parentheses() {
        let fixed = apply_single_fix("<?php $y = (!!$x);", &NestedNotOperators);
        assert_eq!(fixed, "<?php $y = ((bool) $x);");
    }

    #[test]
    fn test_single_not_is_clean() {
        assert!(check("<?php if (!$x) {}", &NestedNotOperators).is_empty());
    }

    #[test]
    fn test_not_over_comparison_is_clean() {
        assert!(check("<?php if (!($a === $b)) {}", &NestedNotOperators).is_empty());
    }

    #[test]
    fn test_fix_is_idempotent() {
        let source = "<?php if (!!$x) {}";
        let fixed = apply_single_fix(source, &NestedNotOperators);
        assert!(check(&fixed, &NestedNotOperators).is_empty());
    }

    #[test]
    fn test_two_separate_chains_both_reported() {
        let diagnostics = check("<?php $a = !!$x; $b = !!!$y;", &NestedNotOperators);
        assert_eq!(diagnostics.len(), 2);
    }
}
