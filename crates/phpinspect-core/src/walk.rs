//! Pre-order AST traversal with ancestor context
//!
//! The mago AST carries no parent links, so the walker maintains the stack
//! of enclosing frames itself and hands every visited node to the `Visit`
//! implementation together with that stack. Every node is visited exactly
//! once, parent before children.
//!
//! Condition slots of control statements get a dedicated frame: handlers
//! use it to tell "value consumed for its truthiness" apart from "value
//! stored or compared".

use mago_syntax::ast::*;

/// One enclosing construct on the path from the program root down to the
/// node currently being visited.
#[derive(Clone, Copy)]
pub enum Frame<'a> {
    /// An enclosing expression; innermost last.
    Expr(&'a Expression<'a>),
    /// The condition slot of an `if`/`elseif`/`while`/`do-while`/`for`.
    Condition,
}

/// Callbacks invoked by [`walk_program`]
pub trait Visit<'a> {
    fn enter_expression(&mut self, _expr: &'a Expression<'a>, _ancestors: &[Frame<'a>]) {}

    fn enter_class(&mut self, _class: &'a Class<'a>, _ancestors: &[Frame<'a>]) {}
}

/// Walk a parsed program, invoking `visitor` for every expression and
/// class declaration in pre-order.
pub fn walk_program<'a, V: Visit<'a>>(visitor: &mut V, program: &'a Program<'a>) {
    let mut walker = Walker {
        visitor,
        frames: Vec::new(),
    };
    for stmt in program.statements.iter() {
        walker.statement(stmt);
    }
}

struct Walker<'w, 'a, V: Visit<'a>> {
    visitor: &'w mut V,
    frames: Vec<Frame<'a>>,
}

impl<'w, 'a, V: Visit<'a>> Walker<'w, 'a, V> {
    fn condition(&mut self, expr: &'a Expression<'a>) {
        self.frames.push(Frame::Condition);
        self.expression(expr);
        self.frames.pop();
    }

    fn statement(&mut self, stmt: &'a Statement<'a>) {
        match stmt {
            Statement::Expression(expr_stmt) => {
                self.expression(&expr_stmt.expression);
            }
            Statement::Block(block) => {
                for inner in block.statements.iter() {
                    self.statement(inner);
                }
            }
            Statement::If(if_stmt) => {
                self.condition(&if_stmt.condition);
                self.if_body(&if_stmt.body);
            }
            Statement::While(while_stmt) => {
                self.condition(&while_stmt.condition);
                self.while_body(&while_stmt.body);
            }
            Statement::DoWhile(do_while) => {
                self.statement(&do_while.statement);
                self.condition(&do_while.condition);
            }
            Statement::For(for_stmt) => {
                for expr in for_stmt.initializations.iter() {
                    self.expression(expr);
                }
                for expr in for_stmt.conditions.iter() {
                    self.condition(expr);
                }
                for expr in for_stmt.increments.iter() {
                    self.expression(expr);
                }
                self.for_body(&for_stmt.body);
            }
            Statement::Foreach(foreach) => {
                self.expression(&foreach.expression);
                self.foreach_body(&foreach.body);
            }
            Statement::Class(class) => {
                self.visitor.enter_class(class, &self.frames);
                for member in class.members.iter() {
                    self.class_like_member(member);
                }
            }
            Statement::Trait(tr) => {
                for member in tr.members.iter() {
                    self.class_like_member(member);
                }
            }
            Statement::Function(func) => {
                for inner in func.body.statements.iter() {
                    self.statement(inner);
                }
            }
            Statement::Namespace(ns) => match &ns.body {
                NamespaceBody::Implicit(body) => {
                    for inner in body.statements.iter() {
                        self.statement(inner);
                    }
                }
                NamespaceBody::BraceDelimited(body) => {
                    for inner in body.statements.iter() {
                        self.statement(inner);
                    }
                }
            },
            Statement::Try(try_stmt) => {
                for inner in try_stmt.block.statements.iter() {
                    self.statement(inner);
                }
                for catch in try_stmt.catch_clauses.iter() {
                    for inner in catch.block.statements.iter() {
                        self.statement(inner);
                    }
                }
                if let Some(finally) = &try_stmt.finally_clause {
                    for inner in finally.block.statements.iter() {
                        self.statement(inner);
                    }
                }
            }
            Statement::Switch(switch) => {
                self.expression(&switch.expression);
                self.switch_body(&switch.body);
            }
            Statement::Return(ret) => {
                if let Some(expr) = &ret.value {
                    self.expression(expr);
                }
            }
            Statement::Echo(echo) => {
                for expr in echo.values.iter() {
                    self.expression(expr);
                }
            }
            _ => {}
        }
    }

    fn if_body(&mut self, body: &'a IfBody<'a>) {
        match body {
            IfBody::Statement(stmt_body) => {
                self.statement(stmt_body.statement);
                for else_if in stmt_body.else_if_clauses.iter() {
                    self.condition(&else_if.condition);
                    self.statement(else_if.statement);
                }
                if let Some(else_clause) = &stmt_body.else_clause {
                    self.statement(else_clause.statement);
                }
            }
            IfBody::ColonDelimited(block) => {
                for inner in block.statements.iter() {
                    self.statement(inner);
                }
                for else_if in block.else_if_clauses.iter() {
                    self.condition(&else_if.condition);
                    for inner in else_if.statements.iter() {
                        self.statement(inner);
                    }
                }
                if let Some(else_clause) = &block.else_clause {
                    for inner in else_clause.statements.iter() {
                        self.statement(inner);
                    }
                }
            }
        }
    }

    fn while_body(&mut self, body: &'a WhileBody<'a>) {
        match body {
            WhileBody::Statement(stmt) => {
                self.statement(stmt);
            }
            WhileBody::ColonDelimited(block) => {
                for inner in block.statements.iter() {
                    self.statement(inner);
                }
            }
        }
    }

    fn for_body(&mut self, body: &'a ForBody<'a>) {
        match body {
            ForBody::Statement(stmt) => {
                self.statement(stmt);
            }
            ForBody::ColonDelimited(block) => {
                for inner in block.statements.iter() {
                    self.statement(inner);
                }
            }
        }
    }

    fn foreach_body(&mut self, body: &'a ForeachBody<'a>) {
        match body {
            ForeachBody::Statement(stmt) => {
                self.statement(stmt);
            }
            ForeachBody::ColonDelimited(block) => {
                for inner in block.statements.iter() {
                    self.statement(inner);
                }
            }
        }
    }

    fn switch_body(&mut self, body: &'a SwitchBody<'a>) {
        match body {
            SwitchBody::BraceDelimited(block) => {
                for case in block.cases.iter() {
                    for stmt in case.statements().iter() {
                        self.statement(stmt);
                    }
                }
            }
            SwitchBody::ColonDelimited(block) => {
                for case in block.cases.iter() {
                    for stmt in case.statements().iter() {
                        self.statement(stmt);
                    }
                }
            }
        }
    }

    fn class_like_member(&mut self, member: &'a ClassLikeMember<'a>) {
        if let ClassLikeMember::Method(method) = member {
            if let MethodBody::Concrete(body) = &method.body {
                for inner in body.statements.iter() {
                    self.statement(inner);
                }
            }
        }
    }

    fn expression(&mut self, expr: &'a Expression<'a>) {
        self.visitor.enter_expression(expr, &self.frames);

        self.frames.push(Frame::Expr(expr));
        match expr {
            Expression::Call(call) => self.call(call),
            Expression::UnaryPrefix(unary) => {
                self.expression(&unary.operand);
            }
            Expression::Parenthesized(paren) => {
                self.expression(&paren.expression);
            }
            Expression::Binary(binary) => {
                self.expression(&binary.lhs);
                self.expression(&binary.rhs);
            }
            Expression::Conditional(ternary) => {
                self.expression(&ternary.condition);
                if let Some(then) = &ternary.then {
                    self.expression(then);
                }
                self.expression(&ternary.r#else);
            }
            Expression::Assignment(assign) => {
                self.expression(&assign.lhs);
                self.expression(&assign.rhs);
            }
            Expression::ArrayAccess(access) => {
                self.expression(&access.array);
                self.expression(&access.index);
            }
            Expression::Array(arr) => {
                for elem in arr.elements.iter() {
                    if let ArrayElement::KeyValue(kv) = elem {
                        self.expression(&kv.key);
                        self.expression(&kv.value);
                    } else if let ArrayElement::Value(val) = elem {
                        self.expression(&val.value);
                    }
                }
            }
            _ => {}
        }
        self.frames.pop();
    }

    fn call(&mut self, call: &'a Call<'a>) {
        match call {
            Call::Function(func_call) => {
                for arg in func_call.argument_list.arguments.iter() {
                    self.expression(arg.value());
                }
            }
            Call::Method(method_call) => {
                self.expression(&method_call.object);
                for arg in method_call.argument_list.arguments.iter() {
                    self.expression(arg.value());
                }
            }
            Call::NullSafeMethod(method_call) => {
                self.expression(&method_call.object);
                for arg in method_call.argument_list.arguments.iter() {
                    self.expression(arg.value());
                }
            }
            Call::StaticMethod(static_call) => {
                for arg in static_call.argument_list.arguments.iter() {
                    self.expression(arg.value());
                }
            }
        }
    }
}
