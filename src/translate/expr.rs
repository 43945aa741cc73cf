//! Expression rendering.
//!
//! Expressions render to C text bottom-up. Hard errors (an invalid index
//! expression, a garbled read format, a constant division by zero) bubble
//! up so the statement generator can abandon the enclosing construct.

use std::io;

use crate::ast::ast::{AstNode, Callee, Expression, ExprOp, Table, Variable};
use crate::ast::types::LuaType;
use crate::errors::errors::Error;
use crate::inference::checks::{check_division, validate_size_expr};
use crate::inference::inference::{eval_expr_type, PRINT_NAME, READ_NAME};

use super::stdlib::{expand_print, expand_read};
use super::translate::Translator;

/// The C spelling of a binary operator.
fn c_token(op: ExprOp) -> &'static str {
    match op {
        ExprOp::Ne => "!=",
        ExprOp::And => "&&",
        ExprOp::Or => "||",
        // +, -, *, /, comparisons, = and == share their Lua spelling.
        other => other.lua_token(),
    }
}

/// Renders one expression to C text.
pub fn gen_expression<W: io::Write>(
    tr: &mut Translator<W>,
    expr: &AstNode,
) -> Result<String, Error> {
    match expr {
        AstNode::Value(val) => Ok(match val.val_type {
            LuaType::String => format!("\"{}\"", val.text),
            LuaType::Nil => String::from("NULL"),
            _ => val.text.clone(),
        }),

        AstNode::Variable(var) => gen_variable(tr, var),

        AstNode::Expr(e) => gen_operator(tr, e),

        AstNode::FunctionCall(call) => match &call.callee {
            Callee::Name(name) if name == PRINT_NAME => expand_print(tr, &call.args),
            Callee::Name(name) if name == READ_NAME => {
                if call.args.len() > 1 {
                    tr.diags
                        .warning("extra io.read arguments are ignored", None);
                }
                expand_read(&call.args)
            }
            Callee::Name(name) => {
                let args = gen_args(tr, &call.args)?;
                Ok(format!("{}({})", name, args))
            }
            Callee::Expr(callee) => {
                tr.diags
                    .warning("call through a non-simple callee, emitted as-is", None);
                let callee = gen_expression(tr, callee)?;
                let args = gen_args(tr, &call.args)?;
                Ok(format!("{}({})", callee, args))
            }
        },

        AstNode::Table(table) => gen_table(tr, table),

        _ => {
            tr.diags
                .warning("statement in expression position, emitted as 0", None);
            Ok(String::from("0"))
        }
    }
}

fn gen_args<W: io::Write>(tr: &mut Translator<W>, args: &[AstNode]) -> Result<String, Error> {
    let mut rendered = Vec::with_capacity(args.len());
    for arg in args {
        rendered.push(gen_expression(tr, arg)?);
    }
    Ok(rendered.join(", "))
}

fn gen_variable<W: io::Write>(tr: &mut Translator<W>, var: &Variable) -> Result<String, Error> {
    let prefix = if var.by_reference { "&" } else { "" };
    match &var.table_key {
        None => Ok(format!("{}{}", prefix, var.name)),
        Some(key) => {
            // Index expressions are integer-only and folded when constant.
            let rendered = match validate_size_expr(key, &tr.scopes)? {
                Some(folded) => folded.to_string(),
                None => gen_expression(tr, key)?,
            };
            Ok(format!("{}{}[{}]", prefix, var.name, rendered))
        }
    }
}

fn gen_operator<W: io::Write>(tr: &mut Translator<W>, e: &Expression) -> Result<String, Error> {
    match e.op {
        ExprOp::Paren => Ok(format!("({})", gen_expression(tr, &e.right)?)),
        ExprOp::Neg => Ok(format!("-{}", gen_expression(tr, &e.right)?)),
        ExprOp::Not => Ok(format!("!{}", gen_expression(tr, &e.right)?)),
        ExprOp::Concat => {
            let left = match &e.left {
                Some(left) => gen_expression(tr, left)?,
                None => String::new(),
            };
            let right = gen_expression(tr, &e.right)?;
            Ok(format!("strcat({}, {})", left, right))
        }
        op => {
            if op == ExprOp::Div {
                check_division(&e.right)?;
            }
            let left = match &e.left {
                Some(left) => gen_expression(tr, left)?,
                None => String::new(),
            };
            let right = gen_expression(tr, &e.right)?;
            Ok(format!("{} {} {}", left, c_token(op), right))
        }
    }
}

/// Renders a table constructor as a C aggregate initializer.
///
/// Empty (or all-vacuous) tables become the explicit empty aggregate.
/// Each real field becomes one `lua_field` entry, keyed by its own key or
/// a synthetic positional one, typed per the field value's inference with
/// an integer default.
fn gen_table<W: io::Write>(tr: &mut Translator<W>, table: &Table) -> Result<String, Error> {
    let mut entries = Vec::new();

    for field in &table.fields {
        let field = match field {
            AstNode::TableField(field) => field,
            _ => continue,
        };
        let value = match &field.value {
            Some(value) => value,
            None => continue,
        };

        let key = match &field.key {
            Some(key) => match key.as_value() {
                Some(val) => val.text.clone(),
                None => gen_expression(tr, key)?,
            },
            None => tr.next_table_key().to_string(),
        };

        let member = match eval_expr_type(value, &tr.scopes, &mut tr.diags).ty {
            LuaType::String => "string_value",
            LuaType::Float | LuaType::Number => "float_value",
            LuaType::Boolean => "bool_value",
            _ => "int_value",
        };
        let rendered = gen_expression(tr, value)?;
        entries.push(format!(
            "{{.key = \"{}\", .value.{} = {}}}",
            key, member, rendered
        ));
    }

    if entries.is_empty() {
        Ok(String::from("{0}"))
    } else {
        Ok(format!("{{{}}}", entries.join(", ")))
    }
}
