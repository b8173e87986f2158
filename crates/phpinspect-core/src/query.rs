//! Expression classification helpers shared by inspections
//!
//! These are read-only queries over the syntax tree plus the source text.
//! None of them allocate unless they have to build a normalized name.

use mago_span::{HasSpan, Span};
use mago_syntax::ast::*;

use crate::walk::Frame;

/// Comparison and logical operators the inspections care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Equal,
    NotEqual,
    Identical,
    NotIdentical,
    LogicalAnd,
    LogicalOr,
    Other,
}

impl OperatorKind {
    pub fn of(op: &BinaryOperator) -> OperatorKind {
        match op {
            BinaryOperator::Equal(_) => OperatorKind::Equal,
            BinaryOperator::NotEqual(_) | BinaryOperator::AngledNotEqual(_) => {
                OperatorKind::NotEqual
            }
            BinaryOperator::Identical(_) => OperatorKind::Identical,
            BinaryOperator::NotIdentical(_) => OperatorKind::NotIdentical,
            BinaryOperator::And(_) | BinaryOperator::LowAnd(_) => OperatorKind::LogicalAnd,
            BinaryOperator::Or(_) | BinaryOperator::LowOr(_) => OperatorKind::LogicalOr,
            _ => OperatorKind::Other,
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(
            self,
            OperatorKind::Equal
                | OperatorKind::NotEqual
                | OperatorKind::Identical
                | OperatorKind::NotIdentical
        )
    }

    /// Whether the comparison asserts inequality.
    pub fn is_negated(self) -> bool {
        matches!(self, OperatorKind::NotEqual | OperatorKind::NotIdentical)
    }

    /// PHP spelling of the operator, for building replacement text.
    pub fn as_str(self) -> &'static str {
        match self {
            OperatorKind::Equal => "==",
            OperatorKind::NotEqual => "!=",
            OperatorKind::Identical => "===",
            OperatorKind::NotIdentical => "!==",
            OperatorKind::LogicalAnd => "&&",
            OperatorKind::LogicalOr => "||",
            OperatorKind::Other => "",
        }
    }
}

/// Whether a prefix operator is boolean negation.
pub fn is_not_operator(unary: &UnaryPrefix<'_>) -> bool {
    matches!(unary.operator, UnaryPrefixOperator::Not(_))
}

/// Strip any number of wrapping parentheses.
pub fn unwrap_parentheses<'e, 'a>(expr: &'e Expression<'a>) -> &'e Expression<'a> {
    let mut current = expr;
    while let Expression::Parenthesized(paren) = current {
        current = &paren.expression;
    }
    current
}

/// Source text covered by a span, or empty if the span is out of range.
pub fn node_text(span: Span, source: &str) -> &str {
    source
        .get(span.start.offset as usize..span.end.offset as usize)
        .unwrap_or("")
}

/// Name of a directly-named function call, e.g. `strncmp` for
/// `strncmp(...)`. Computed calls and method calls yield `None`.
pub fn function_name<'s>(call: &FunctionCall<'_>, source: &'s str) -> Option<&'s str> {
    match call.function {
        Expression::Identifier(identifier) => Some(node_text(identifier.span(), source)),
        _ => None,
    }
}

/// Whether the expression is a single- or double-quoted string literal.
/// Heredocs and interpolated strings do not qualify.
pub fn is_string_literal_without_interpolation(expr: &Expression<'_>, source: &str) -> bool {
    match expr {
        Expression::Literal(Literal::String(string)) => {
            let text = node_text(string.span(), source);
            text.starts_with('\'') || text.starts_with('"')
        }
        _ => false,
    }
}

/// Contents of a quoted string literal with the quotes stripped, or `None`
/// if the expression is not a plain quoted literal.
pub fn string_literal_contents<'s>(expr: &Expression<'_>, source: &'s str) -> Option<&'s str> {
    if !is_string_literal_without_interpolation(expr, source) {
        return None;
    }
    let text = node_text(expr.span(), source);
    if text.len() < 2 {
        return None;
    }
    Some(&text[1..text.len() - 1])
}

/// Extract a fully qualified class name from a string literal expression.
///
/// Returns the name normalized to a single leading backslash, or `None`
/// when the literal cannot plausibly name a class. Very short names and
/// the PHP incomplete-class marker are rejected.
pub fn extract_class_fqn(expr: &Expression<'_>, source: &str) -> Option<String> {
    let contents = string_literal_contents(expr, source)?;
    if contents.len() <= 3 {
        return None;
    }
    // Double-quoted literals escape the namespace separator.
    let collapsed = contents.replace("\\\\", "\\");
    let trimmed = collapsed.trim_start_matches('\\');
    if trimmed.is_empty() || trimmed == "__PHP_Incomplete_Class" {
        return None;
    }
    Some(format!("\\{trimmed}"))
}

/// The operand of `binary` that is not the one at `known`, or `None` when
/// neither side matches.
pub fn second_operand<'e, 'a>(
    binary: &'e Binary<'a>,
    known: Span,
) -> Option<&'e Expression<'a>> {
    if binary.lhs.span() == known {
        Some(&binary.rhs)
    } else if binary.rhs.span() == known {
        Some(&binary.lhs)
    } else {
        None
    }
}

/// Whether the node at `span` is consumed for its truthiness.
///
/// True when the node sits (through any number of parentheses) in a control
/// statement condition, under a `!`, as an operand of `&&`/`||`, or as the
/// condition of a ternary.
pub fn is_used_as_logical_operand(span: Span, ancestors: &[Frame<'_>]) -> bool {
    let mut node_span = span;
    for frame in ancestors.iter().rev() {
        let parent = match *frame {
            Frame::Condition => return true,
            Frame::Expr(expr) => expr,
        };
        match parent {
            Expression::Parenthesized(_) => {
                node_span = parent.span();
            }
            Expression::UnaryPrefix(unary) if is_not_operator(unary) => return true,
            Expression::Binary(binary) => {
                return matches!(
                    OperatorKind::of(&binary.operator),
                    OperatorKind::LogicalAnd | OperatorKind::LogicalOr
                );
            }
            Expression::Conditional(ternary) => {
                return ternary.condition.span() == node_span;
            }
            _ => return false,
        }
    }
    false
}
