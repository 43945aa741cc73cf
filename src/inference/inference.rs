//! Expression and return-type inference.
//!
//! A single recursive pass over the expression tree, no fixpoint iteration.
//! Variables and calls resolve through the scope chain; everything the
//! chain cannot answer degrades to a fallback plus a warning.

use crate::ast::ast::{AstNode, Callee, ExprOp};
use crate::ast::types::{Inferred, LuaType};
use crate::errors::diagnostics::Diagnostics;
use crate::errors::errors::{Error, ErrorImpl};
use crate::symtab::symtab::ScopeStack;
use crate::Position;

/// The builtin formatted-print family name.
pub const PRINT_NAME: &str = "print";
/// The builtin formatted-read family name.
pub const READ_NAME: &str = "io.read";

/// Which runtime-support read helper an `io.read` call maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadKind {
    /// `io.read()` / `io.read("*l")` / `io.read("*a")`.
    Line,
    /// `io.read("*n")`.
    Number,
    /// `io.read(n)` with a literal byte count.
    Bytes(i64),
}

impl ReadKind {
    /// The Lua type the helper produces.
    pub fn return_type(&self) -> LuaType {
        match self {
            ReadKind::Number => LuaType::Number,
            ReadKind::Line | ReadKind::Bytes(_) => LuaType::String,
        }
    }
}

/// Maps an `io.read` argument list onto a read helper.
///
/// The format must be a literal: a recognized format string selects the
/// line or number reader, an integer literal selects the byte reader, and
/// an absent argument defaults to the line reader. Anything else is a hard
/// error - the call cannot be translated.
pub fn classify_read_format(args: &[AstNode]) -> Result<ReadKind, Error> {
    let first = match args.first() {
        None => return Ok(ReadKind::Line),
        Some(first) => first,
    };

    let val = match first.as_value() {
        Some(val) => val,
        None => {
            return Err(Error::new(
                ErrorImpl::NonLiteralReadFormat,
                Position::null(),
            ))
        }
    };

    match val.val_type {
        LuaType::String => match val.text.as_str() {
            "*l" | "l" | "*L" | "L" | "*a" | "a" => Ok(ReadKind::Line),
            "*n" | "n" => Ok(ReadKind::Number),
            other => Err(Error::new(
                ErrorImpl::BadReadFormat {
                    format: other.to_string(),
                },
                Position::null(),
            )),
        },
        LuaType::Integer => match val.text.parse() {
            Ok(count) => Ok(ReadKind::Bytes(count)),
            // A byte count too large for i64.
            Err(_) => Err(Error::new(
                ErrorImpl::BadReadFormat {
                    format: val.text.clone(),
                },
                Position::null(),
            )),
        },
        _ => Err(Error::new(
            ErrorImpl::BadReadFormat {
                format: val.text.clone(),
            },
            Position::null(),
        )),
    }
}

/// Types one expression.
///
/// Literals are the only `Constant` results; everything resolved through
/// the scope chain or an operator is `Dynamic`. An unresolved variable is
/// nil (Lua semantics), reported as a warning rather than an error.
pub fn eval_expr_type(
    expr: &AstNode,
    scopes: &ScopeStack,
    diags: &mut Diagnostics,
) -> Inferred {
    match expr {
        AstNode::Value(val) => Inferred::constant(val.val_type),

        AstNode::Variable(var) => {
            if var.name == READ_NAME {
                return Inferred::dynamic(LuaType::Function);
            }
            if var.table_key.is_some() {
                // A table element can hold any type.
                return Inferred::dynamic(LuaType::Dynamic);
            }
            match scopes.lookup(&var.name) {
                Some(sym) => Inferred::dynamic(sym.ty),
                None => {
                    diags.warning(
                        &format!("undefined variable `{}`, treated as nil", var.name),
                        Some(&var.pos),
                    );
                    Inferred::dynamic(LuaType::Nil)
                }
            }
        }

        AstNode::Expr(e) => match e.op {
            ExprOp::Add | ExprOp::Sub | ExprOp::Mul | ExprOp::Div => {
                Inferred::dynamic(LuaType::Number)
            }
            ExprOp::And
            | ExprOp::Or
            | ExprOp::Not
            | ExprOp::Gt
            | ExprOp::Ge
            | ExprOp::Lt
            | ExprOp::Le
            | ExprOp::Eq
            | ExprOp::Ne => Inferred::dynamic(LuaType::Boolean),
            // Unary minus, parentheses and assignment are transparent: the
            // result has the operand's (or right-hand side's) type.
            ExprOp::Neg | ExprOp::Paren | ExprOp::Assign => {
                eval_expr_type(&e.right, scopes, diags)
            }
            ExprOp::Concat => Inferred::dynamic(LuaType::String),
        },

        AstNode::FunctionCall(call) => eval_call_type(&call.callee, &call.args, scopes, diags),

        AstNode::Table(_) => Inferred::dynamic(LuaType::Table),

        // Statement-shaped nodes in expression position carry no value.
        _ => Inferred::dynamic(LuaType::Dynamic),
    }
}

fn eval_call_type(
    callee: &Callee,
    args: &[AstNode],
    scopes: &ScopeStack,
    diags: &mut Diagnostics,
) -> Inferred {
    let name = match callee {
        Callee::Name(name) => name,
        Callee::Expr(_) => {
            diags.warning("cannot type a call through a non-simple callee", None);
            return Inferred::dynamic(LuaType::Dynamic);
        }
    };

    if name == PRINT_NAME {
        // print produces no value.
        return Inferred::dynamic(LuaType::Nil);
    }
    if name == READ_NAME {
        // A garbled format becomes a hard error at emission time; for
        // typing purposes fall back to dynamic.
        return match classify_read_format(args) {
            Ok(kind) => Inferred::dynamic(kind.return_type()),
            Err(_) => Inferred::dynamic(LuaType::Dynamic),
        };
    }

    match scopes.lookup(name) {
        Some(sym) => Inferred::dynamic(sym.ty),
        None => {
            diags.warning(
                &format!("cannot resolve return type of `{}`", name),
                None,
            );
            Inferred::dynamic(LuaType::Dynamic)
        }
    }
}

/// The outcome of return-type inference for one function.
///
/// A tri-state instead of a single opaque "unknown": `Pending` means no
/// return statement fixed a type yet, `Conflict` means two returns
/// genuinely disagreed. The generator defers (emits `void`) for the
/// former and falls back to an untyped pointer for the latter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    Pending,
    Known(LuaType),
    Conflict,
}

/// Infers a function's return type from its body.
///
/// Walks the statement list plus nested if/for bodies (never nested
/// function definitions). The first return fixes the type; later returns
/// reconcile under numeric widening. The nil handling is deliberately
/// asymmetric: an initial nil is overridden by a later concrete type, but
/// a later nil never downgrades an established one.
pub fn infer_func_return_type(
    body: &[AstNode],
    scopes: &ScopeStack,
    diags: &mut Diagnostics,
) -> ReturnType {
    let mut result = ReturnType::Pending;
    walk_returns(body, scopes, diags, &mut result);

    if result == ReturnType::Pending {
        // No return statement at all: the function yields nil.
        return ReturnType::Known(LuaType::Nil);
    }
    result
}

fn walk_returns(
    body: &[AstNode],
    scopes: &ScopeStack,
    diags: &mut Diagnostics,
    result: &mut ReturnType,
) {
    for stmt in body {
        match stmt {
            AstNode::Return(ret) => {
                let ty = match ret.exprs.first() {
                    Some(expr) => eval_expr_type(expr, scopes, diags).ty,
                    None => LuaType::Nil,
                };
                *result = merge_return(*result, ty, diags);
            }
            AstNode::If(ifn) => {
                walk_returns(&ifn.body, scopes, diags, result);
                if let Some(else_body) = &ifn.else_body {
                    walk_returns(else_body, scopes, diags, result);
                }
            }
            AstNode::For(forn) => {
                walk_returns(&forn.body, scopes, diags, result);
            }
            // A nested function has its own return type; skip it.
            AstNode::FunctionDef(_) => {}
            _ => {}
        }
    }
}

/// Reconciles an established return type with one more observed return.
pub fn merge_return(current: ReturnType, ty: LuaType, diags: &mut Diagnostics) -> ReturnType {
    match current {
        ReturnType::Pending => ReturnType::Known(ty),
        ReturnType::Conflict => ReturnType::Conflict,
        ReturnType::Known(known) => {
            if known == ty {
                return current;
            }
            if known.is_numeric() && ty.is_numeric() {
                return ReturnType::Known(LuaType::Number);
            }
            if known == LuaType::Nil {
                return ReturnType::Known(ty);
            }
            if ty == LuaType::Nil {
                return current;
            }
            diags.warning(
                &format!(
                    "incompatible return types `{}` and `{}`, function left untyped",
                    known, ty
                ),
                None,
            );
            ReturnType::Conflict
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::types::Certainty;
    use crate::symtab::symtab::{Symbol, SymbolKind};

    fn scopes_with(name: &str, ty: LuaType) -> ScopeStack {
        let mut scopes = ScopeStack::new();
        scopes.insert(Symbol::new(
            name,
            ty,
            SymbolKind::Variable,
            &Position::null(),
        ));
        scopes
    }

    #[test]
    fn test_literal_inference_is_constant() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let result = eval_expr_type(&AstNode::value("42"), &scopes, &mut diags);
        assert_eq!(result.ty, LuaType::Integer);
        assert_eq!(result.certainty, Certainty::Constant);
    }

    #[test]
    fn test_variable_resolves_through_chain() {
        let scopes = scopes_with("x", LuaType::String);
        let mut diags = Diagnostics::silent();
        let result = eval_expr_type(&AstNode::variable("x"), &scopes, &mut diags);
        assert_eq!(result.ty, LuaType::String);
        assert_eq!(result.certainty, Certainty::Dynamic);
    }

    #[test]
    fn test_unresolved_variable_is_nil_with_warning() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let result = eval_expr_type(&AstNode::variable("ghost"), &scopes, &mut diags);
        assert_eq!(result.ty, LuaType::Nil);
        assert!(diags.has_warning("undefined variable `ghost`"));
    }

    #[test]
    fn test_read_builtin_name_is_function() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let result = eval_expr_type(&AstNode::variable(READ_NAME), &scopes, &mut diags);
        assert_eq!(result.ty, LuaType::Function);
    }

    #[test]
    fn test_arithmetic_is_number() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let expr = AstNode::binary(ExprOp::Add, AstNode::value("1"), AstNode::value("2"));
        assert_eq!(eval_expr_type(&expr, &scopes, &mut diags).ty, LuaType::Number);
    }

    #[test]
    fn test_comparison_is_boolean() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let expr = AstNode::binary(ExprOp::Lt, AstNode::value("1"), AstNode::value("2"));
        assert_eq!(
            eval_expr_type(&expr, &scopes, &mut diags).ty,
            LuaType::Boolean
        );
    }

    #[test]
    fn test_transparent_operators() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let neg = AstNode::unary(ExprOp::Neg, AstNode::value("3.5"));
        assert_eq!(eval_expr_type(&neg, &scopes, &mut diags).ty, LuaType::Float);

        let paren = AstNode::unary(ExprOp::Paren, AstNode::value("hi"));
        assert_eq!(
            eval_expr_type(&paren, &scopes, &mut diags).ty,
            LuaType::String
        );
    }

    #[test]
    fn test_assignment_takes_rhs_type() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let expr = AstNode::assign("x", AstNode::value("true"));
        assert_eq!(
            eval_expr_type(&expr, &scopes, &mut diags).ty,
            LuaType::Boolean
        );
    }

    #[test]
    fn test_concat_is_string() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let expr = AstNode::binary(ExprOp::Concat, AstNode::value("a"), AstNode::value("b"));
        assert_eq!(
            eval_expr_type(&expr, &scopes, &mut diags).ty,
            LuaType::String
        );
    }

    #[test]
    fn test_call_uses_function_symbol_type() {
        let mut scopes = ScopeStack::new();
        scopes.insert(Symbol::new(
            "fib",
            LuaType::Integer,
            SymbolKind::Function,
            &Position::null(),
        ));
        let mut diags = Diagnostics::silent();
        let call = AstNode::call("fib", vec![AstNode::value("3")]);
        assert_eq!(
            eval_expr_type(&call, &scopes, &mut diags).ty,
            LuaType::Integer
        );
    }

    #[test]
    fn test_unknown_call_falls_back_with_warning() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let call = AstNode::call("mystery", vec![]);
        assert_eq!(
            eval_expr_type(&call, &scopes, &mut diags).ty,
            LuaType::Dynamic
        );
        assert!(diags.has_warning("mystery"));
    }

    #[test]
    fn test_read_format_classification() {
        assert_eq!(classify_read_format(&[]).unwrap(), ReadKind::Line);
        assert_eq!(
            classify_read_format(&[AstNode::value_typed(LuaType::String, "*n")]).unwrap(),
            ReadKind::Number
        );
        assert_eq!(
            classify_read_format(&[AstNode::value_typed(LuaType::String, "*l")]).unwrap(),
            ReadKind::Line
        );
        assert_eq!(
            classify_read_format(&[AstNode::value("8")]).unwrap(),
            ReadKind::Bytes(8)
        );
    }

    #[test]
    fn test_read_format_rejects_garbage() {
        let err = classify_read_format(&[AstNode::value_typed(LuaType::String, "*x")]);
        assert_eq!(err.unwrap_err().get_error_name(), "BadReadFormat");

        let err = classify_read_format(&[AstNode::variable("fmt")]);
        assert_eq!(err.unwrap_err().get_error_name(), "NonLiteralReadFormat");

        // A byte count that does not fit i64 is not silently zeroed.
        let err = classify_read_format(&[AstNode::value("99999999999999999999")]);
        assert_eq!(err.unwrap_err().get_error_name(), "BadReadFormat");
    }

    #[test]
    fn test_return_widening_integer_float() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let body = vec![
            AstNode::If(crate::ast::ast::IfNode {
                cond: Box::new(AstNode::value("true")),
                body: vec![AstNode::ret(vec![AstNode::value("1")])],
                else_body: Some(vec![AstNode::ret(vec![AstNode::value("2.5")])]),
            }),
        ];
        assert_eq!(
            infer_func_return_type(&body, &scopes, &mut diags),
            ReturnType::Known(LuaType::Number)
        );
    }

    #[test]
    fn test_return_conflict_warns() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let body = vec![
            AstNode::ret(vec![AstNode::value("1")]),
            AstNode::ret(vec![AstNode::value_typed(LuaType::String, "x")]),
        ];
        assert_eq!(
            infer_func_return_type(&body, &scopes, &mut diags),
            ReturnType::Conflict
        );
        assert!(diags.has_warning("incompatible return types"));
    }

    #[test]
    fn test_return_nil_asymmetry() {
        let mut diags = Diagnostics::silent();

        // An initial nil is overridden by a later concrete type...
        let upgraded = merge_return(
            merge_return(ReturnType::Pending, LuaType::Nil, &mut diags),
            LuaType::Integer,
            &mut diags,
        );
        assert_eq!(upgraded, ReturnType::Known(LuaType::Integer));

        // ...but a later nil never downgrades an established type.
        let kept = merge_return(
            merge_return(ReturnType::Pending, LuaType::Integer, &mut diags),
            LuaType::Nil,
            &mut diags,
        );
        assert_eq!(kept, ReturnType::Known(LuaType::Integer));
        assert_eq!(diags.warning_count(), 0);
    }

    #[test]
    fn test_no_return_infers_nil() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let body = vec![AstNode::assign("x", AstNode::value("1"))];
        assert_eq!(
            infer_func_return_type(&body, &scopes, &mut diags),
            ReturnType::Known(LuaType::Nil)
        );
    }

    #[test]
    fn test_nested_function_returns_are_skipped() {
        let scopes = ScopeStack::new();
        let mut diags = Diagnostics::silent();
        let body = vec![
            AstNode::function(
                "inner",
                &[],
                vec![AstNode::ret(vec![AstNode::value_typed(LuaType::String, "s")])],
            ),
            AstNode::ret(vec![AstNode::value("1")]),
        ];
        assert_eq!(
            infer_func_return_type(&body, &scopes, &mut diags),
            ReturnType::Known(LuaType::Integer)
        );
    }
}
