//! Layered semantic checks on top of expression inference.
//!
//! Two validations are strict enough to be hard errors: the integer-only
//! rule for array index/size expressions, and division by a provably-zero
//! constant. Both are conservative - anything not provable at translation
//! time passes silently.

use crate::ast::ast::{AstNode, Callee, ExprOp};
use crate::ast::types::LuaType;
use crate::errors::errors::{Error, ErrorImpl};
use crate::symtab::symtab::ScopeStack;
use crate::Position;

/// Flags a division whose divisor is a constant literal equal to zero.
///
/// Non-constant divisors are never flagged: a runtime zero is the target
/// program's problem, not the translator's.
pub fn check_division(divisor: &AstNode) -> Result<(), Error> {
    if let Some(val) = divisor.as_value() {
        if val.val_type.is_numeric() && val.text.parse::<f64>() == Ok(0.0) {
            return Err(Error::new(ErrorImpl::DivisionByZero, Position::null()));
        }
    }
    Ok(())
}

/// Validates an array index or size expression and constant-folds it when
/// fully constant.
///
/// Returns `Ok(Some(n))` for a folded constant, `Ok(None)` for a valid but
/// non-constant expression, and a hard error for a disallowed operator, a
/// non-integer operand, a guarded fold-time division by zero, or a negative
/// result.
pub fn validate_size_expr(expr: &AstNode, scopes: &ScopeStack) -> Result<Option<i64>, Error> {
    if !check_size_expr(expr, scopes)? {
        return Ok(None);
    }

    let mut folder = Folder::default();
    let value = folder.eval(expr);
    if folder.div_by_zero {
        return Err(Error::new(ErrorImpl::DivisionByZero, Position::null()));
    }
    if folder.overflow {
        return Err(Error::new(ErrorImpl::SizeOverflow, Position::null()));
    }
    if value < 0 {
        return Err(Error::new(
            ErrorImpl::NegativeSize { value },
            Position::null(),
        ));
    }
    Ok(Some(value))
}

/// Checks the integer-only arithmetic rule.
///
/// Returns whether the whole expression is a compile-time integer constant.
/// Operators outside `+ - * /`, unary minus and parentheses are a hard
/// error; so are float literals and identifiers known to be non-integer.
/// Unknown identifiers and calls merely make the expression non-constant.
fn check_size_expr(expr: &AstNode, scopes: &ScopeStack) -> Result<bool, Error> {
    match expr {
        AstNode::Value(val) => match val.val_type {
            LuaType::Integer => Ok(true),
            _ => Err(Error::new(
                ErrorImpl::NonIntegerSize {
                    found: val.text.clone(),
                },
                Position::null(),
            )),
        },

        AstNode::Variable(var) => {
            if let Some(sym) = scopes.lookup(&var.name) {
                if sym.ty != LuaType::Integer {
                    return Err(Error::new(
                        ErrorImpl::NonIntegerSize {
                            found: var.name.clone(),
                        },
                        var.pos.clone(),
                    ));
                }
            }
            Ok(false)
        }

        AstNode::FunctionCall(call) => {
            if let Callee::Name(name) = &call.callee {
                if let Some(sym) = scopes.lookup(name) {
                    if sym.ty != LuaType::Integer {
                        return Err(Error::new(
                            ErrorImpl::NonIntegerSize {
                                found: name.clone(),
                            },
                            Position::null(),
                        ));
                    }
                }
            }
            Ok(false)
        }

        AstNode::Expr(e) => {
            match e.op {
                ExprOp::Add | ExprOp::Sub | ExprOp::Mul | ExprOp::Div | ExprOp::Neg
                | ExprOp::Paren => {}
                disallowed => {
                    return Err(Error::new(
                        ErrorImpl::InvalidSizeOperator {
                            operator: disallowed.lua_token().to_string(),
                        },
                        Position::null(),
                    ))
                }
            }

            let left_const = match &e.left {
                Some(left) => check_size_expr(left, scopes)?,
                None => true,
            };
            let right_const = check_size_expr(&e.right, scopes)?;
            Ok(left_const && right_const)
        }

        _ => Ok(false),
    }
}

/// Recursive constant folder for validated size expressions.
///
/// Folding never panics: division by zero and 64-bit overflow raise their
/// flags and the caller rejects the whole expression.
#[derive(Default)]
struct Folder {
    div_by_zero: bool,
    overflow: bool,
}

impl Folder {
    fn eval(&mut self, expr: &AstNode) -> i64 {
        match expr {
            AstNode::Value(val) => match val.text.parse() {
                Ok(value) => value,
                Err(_) => {
                    // An integer literal too large for i64.
                    self.overflow = true;
                    0
                }
            },

            AstNode::Expr(e) => {
                let left = match &e.left {
                    Some(left) => self.eval(left),
                    None => 0,
                };
                let right = self.eval(&e.right);

                if self.div_by_zero || self.overflow {
                    return 0;
                }

                let result = match e.op {
                    ExprOp::Add => left.checked_add(right),
                    ExprOp::Sub => left.checked_sub(right),
                    ExprOp::Mul => left.checked_mul(right),
                    ExprOp::Div => {
                        if right == 0 {
                            self.div_by_zero = true;
                            return 0;
                        }
                        left.checked_div(right)
                    }
                    ExprOp::Neg => right.checked_neg(),
                    ExprOp::Paren => Some(right),
                    _ => Some(0),
                };
                match result {
                    Some(value) => value,
                    None => {
                        self.overflow = true;
                        0
                    }
                }
            }

            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symtab::symtab::{Symbol, SymbolKind};

    #[test]
    fn test_constant_subtraction_folds() {
        let scopes = ScopeStack::new();
        let expr = AstNode::binary(ExprOp::Sub, AstNode::value("3"), AstNode::value("1"));
        assert_eq!(validate_size_expr(&expr, &scopes).unwrap(), Some(2));
    }

    #[test]
    fn test_comparison_operator_is_hard_error() {
        let scopes = ScopeStack::new();
        let expr = AstNode::binary(ExprOp::Lt, AstNode::value("3"), AstNode::value("1"));
        let err = validate_size_expr(&expr, &scopes).unwrap_err();
        assert_eq!(err.get_error_name(), "InvalidSizeOperator");
    }

    #[test]
    fn test_fold_division_by_zero_is_guarded() {
        let scopes = ScopeStack::new();
        let expr = AstNode::binary(ExprOp::Div, AstNode::value("4"), AstNode::value("0"));
        let err = validate_size_expr(&expr, &scopes).unwrap_err();
        assert_eq!(err.get_error_name(), "DivisionByZero");
    }

    #[test]
    fn test_fold_overflow_is_guarded() {
        let scopes = ScopeStack::new();
        let expr = AstNode::binary(
            ExprOp::Mul,
            AstNode::value("4611686018427387904"),
            AstNode::value("4"),
        );
        let err = validate_size_expr(&expr, &scopes).unwrap_err();
        assert_eq!(err.get_error_name(), "SizeOverflow");

        // A literal that does not fit i64 at all is rejected the same way.
        let err = validate_size_expr(&AstNode::value("99999999999999999999"), &scopes)
            .unwrap_err();
        assert_eq!(err.get_error_name(), "SizeOverflow");
    }

    #[test]
    fn test_negative_fold_rejected() {
        let scopes = ScopeStack::new();
        let expr = AstNode::binary(ExprOp::Sub, AstNode::value("1"), AstNode::value("3"));
        let err = validate_size_expr(&expr, &scopes).unwrap_err();
        assert_eq!(err.get_error_name(), "NegativeSize");
    }

    #[test]
    fn test_float_literal_rejected() {
        let scopes = ScopeStack::new();
        let err = validate_size_expr(&AstNode::value("2.5"), &scopes).unwrap_err();
        assert_eq!(err.get_error_name(), "NonIntegerSize");
    }

    #[test]
    fn test_integer_variable_is_valid_but_not_constant() {
        let mut scopes = ScopeStack::new();
        scopes.insert(Symbol::new(
            "n",
            LuaType::Integer,
            SymbolKind::Variable,
            &Position::null(),
        ));
        let expr = AstNode::binary(ExprOp::Add, AstNode::variable("n"), AstNode::value("1"));
        assert_eq!(validate_size_expr(&expr, &scopes).unwrap(), None);
    }

    #[test]
    fn test_string_variable_rejected() {
        let mut scopes = ScopeStack::new();
        scopes.insert(Symbol::new(
            "s",
            LuaType::String,
            SymbolKind::Variable,
            &Position::null(),
        ));
        let err = validate_size_expr(&AstNode::variable("s"), &scopes).unwrap_err();
        assert_eq!(err.get_error_name(), "NonIntegerSize");
    }

    #[test]
    fn test_nested_fold_with_parens() {
        let scopes = ScopeStack::new();
        // (2 + 3) * 4
        let expr = AstNode::binary(
            ExprOp::Mul,
            AstNode::unary(
                ExprOp::Paren,
                AstNode::binary(ExprOp::Add, AstNode::value("2"), AstNode::value("3")),
            ),
            AstNode::value("4"),
        );
        assert_eq!(validate_size_expr(&expr, &scopes).unwrap(), Some(20));
    }

    #[test]
    fn test_constant_division_flagged() {
        assert!(check_division(&AstNode::value("0")).is_err());
        assert!(check_division(&AstNode::value("0.0")).is_err());
        assert!(check_division(&AstNode::value("2")).is_ok());
        // Non-constant divisors are never flagged.
        assert!(check_division(&AstNode::variable("n")).is_ok());
    }
}
