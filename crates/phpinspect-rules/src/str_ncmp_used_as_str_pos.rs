//! `strncmp` spelled as a prefix check
//!
//! `strncmp($subject, 'http', 4) === 0` is a prefix test written the hard
//! way; `strpos($subject, 'http') === 0` says the same thing without the
//! length argument that silently breaks when the needle changes. The
//! rewrite is keyed on the first two arguments and drops the rest.
//!
//! Two usage shapes are recognized: the call compared against zero, and the
//! call consumed directly for its truthiness (bare or under `!`).

use mago_span::{HasSpan, Span};
use mago_syntax::ast::{Call, Expression, Literal};

use phpinspect_core::engine::{InspectionContext, Inspector, NodeKind};
use phpinspect_core::query::{
    function_name, is_not_operator, is_used_as_logical_operand, node_text, second_operand,
    OperatorKind,
};
use phpinspect_core::walk::Frame;
use phpinspect_core::{Diagnostic, FixDescriptor, Severity};

pub const RULE_NAME: &str = "str_ncmp_used_as_str_pos";

pub struct StrNcmpUsedAsStrPos;

impl Inspector for StrNcmpUsedAsStrPos {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Reports strncmp/strncasecmp calls that are prefix checks in disguise"
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
        let mapped = if name.eq_ignore_ascii_case("strncmp") {
            "strpos"
        } else if name.eq_ignore_ascii_case("strncasecmp") {
            "stripos"
        } else {
            return None;
        };

        let arguments = &call.argument_list.arguments;
        if arguments.len() < 2 || arguments.iter().any(|arg| arg.is_unpacked()) {
            return None;
        }
        let subject = arguments.iter().next()?.value();
        let needle = arguments.iter().nth(1)?.value();

        let positional = format!(
            "{mapped}({}, {})",
            node_text(subject.span(), ctx.source),
            node_text(needle.span(), ctx.source)
        );

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

        // Shape 1: compared against literal zero.
        if let Some(parent @ Expression::Binary(binary)) = nearest {
            let op = OperatorKind::of(&binary.operator);
            if op.is_equality() {
                if let Some(other) = second_operand(binary, node_span) {
                    if is_integer_zero(other, ctx.source) {
                        let suggestion = format!("{positional} {} 0", op.as_str());
                        return Some(self.diagnostic(parent.span(), suggestion, mapped, ctx));
                    }
                }
            }
        }

        // Shape 2: consumed for truthiness. A negated call asserts the
        // prefix matches; a bare call asserts it does not.
        if let Some(parent @ Expression::UnaryPrefix(unary)) = nearest {
            if is_not_operator(unary) {
                let suggestion = format!("{positional} === 0");
                return Some(self.diagnostic(parent.span(), suggestion, mapped, ctx));
            }
        }
        if is_used_as_logical_operand(expr.span(), ancestors) {
            let suggestion = format!("{positional} !== 0");
            return Some(self.diagnostic(expr.span(), suggestion, mapped, ctx));
        }

        None
    }
}

impl StrNcmpUsedAsStrPos {
    fn diagnostic(
        &self,
        span: Span,
        suggestion: String,
        mapped: &str,
        ctx: &InspectionContext<'_>,
    ) -> Diagnostic {
        let message = format!("'{suggestion}' can be used instead (improves maintainability)");
        let fix = FixDescriptor::new(
            format!("Use '{mapped}' instead"),
            span,
            ctx.source,
            suggestion,
        );
        Diagnostic::new(RULE_NAME, span, message, Severity::Suggestion).with_fix(fix)
    }
}

fn is_integer_zero(expr: &Expression<'_>, source: &str) -> bool {
    matches!(expr, Expression::Literal(Literal::Integer(_)))
        && node_text(expr.span(), source) == "0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{apply_single_fix, check};

    #[test]
    fn test_strict_comparison_with_zero() {
        let fixed = apply_single_fix(
            "<?php if (strncmp($url, 'http', 4) === 0) {}",
            &StrNcmpUsedAsStrPos,
        );
        assert_eq!(fixed, "<?php if (strpos($url, 'http') === 0) {}");
    }

    #[test]
    fn test_loose_comparison_keeps_loose_operator() {
        let fixed = apply_single_fix(
            "<?php if (strncmp($url, 'http', 4) != 0) {}",
            &StrNcmpUsedAsStrPos,
        );
        assert_eq!(fixed, "<?php if (strpos($url, 'http') != 0) {}");
    }

    #[test]
    fn test_zero_on_left_is_normalized_to_the_right() {
        let fixed = apply_single_fix(
            "<?php if (0 !== strncmp($url, 'http', 4)) {}",
            &StrNcmpUsedAsStrPos,
        );
        assert_eq!(fixed, "<?php if (strpos($url, 'http') !== 0) {}");
    }

    #[test]
    fn test_strncasecmp_maps_to_stripos() {
        let fixed = apply_single_fix(
            "<?php if (strncasecmp($url, 'HTTP', 4) === 0) {}",
            &StrNcmpUsedAsStrPos,
        );
        assert_eq!(fixed, "<?php if (stripos($url, 'HTTP') === 0) {}");
    }

    #[test]
    fn test_bare_call_in_condition() {
        let fixed = apply_single_fix(
            "<?php if (strncmp($url, 'http', 4)) {}",
            &StrNcmpUsedAsStrPos,
        );
        assert_eq!(fixed, "<?php if (strpos($url, 'http') !== 0) {}");
    }

    #[test]
    fn test_negated_call_in_condition() {
        let fixed = apply_single_fix(
            "<?php if (!strncmp($url, 'http', 4)) {}",
            &StrNcmpUsedAsStrPos,
        );
        assert_eq!(fixed, "<?php if (strpos($url, 'http') === 0) {}");
    }

    #[test]
    fn test_variable_needle_fires() {
        let fixed = apply_single_fix(
            "<?php if (strncmp($a, $b, 3) === 0) {}",
            &StrNcmpUsedAsStrPos,
        );
        assert_eq!(fixed, "<?php if (strpos($a, $b) === 0) {}");
    }

    #[test]
    fn test_length_argument_is_not_inspected() {
        let fixed = apply_single_fix(
            "<?php if (strncmp($url, 'http', strlen($prefix)) === 0) {}",
            &StrNcmpUsedAsStrPos,
        );
        assert_eq!(fixed, "<?php if (strpos($url, 'http') === 0) {}");
    }

    #[test]
    fn test_single_argument_is_clean() {
        assert!(check("<?php if (strncmp($url)) {}", &StrNcmpUsedAsStrPos).is_empty());
    }

    #[test]
    fn test_comparison_with_nonzero_is_clean() {
        assert!(check(
            "<?php if (strncmp($url, 'http', 4) === 1) {}",
            &StrNcmpUsedAsStrPos
        )
        .is_empty());
    }

    #[test]
    fn test_plain_statement_is_clean() {
        assert!(check("<?php strncmp($url, 'http', 4);", &StrNcmpUsedAsStrPos).is_empty());
    }

    #[test]
    fn test_fix_is_idempotent() {
        let source = "<?php if (strncmp($url, 'http', 4) === 0) {}";
        let fixed = apply_single_fix(source, &StrNcmpUsedAsStrPos);
        assert!(check(&fixed, &StrNcmpUsedAsStrPos).is_empty());
    }
}
