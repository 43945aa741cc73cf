//! Call-site parameter hints.
//!
//! Parameter types cannot be read off a definition alone, so a pure
//! pre-pass walks the whole program before generation and records, for
//! every named call target, the type of each argument position. The walk
//! touches nothing: no scopes exist yet, so arguments are typed
//! context-free and anything unresolvable stays [`LuaType::Dynamic`].

use std::collections::HashMap;

use crate::ast::ast::{AstNode, Callee, ExprOp};
use crate::ast::types::LuaType;

use super::inference::{PRINT_NAME, READ_NAME};

/// Collects per-position argument types from every call site in the
/// program, nested bodies and argument subexpressions included.
///
/// Positions seen with one consistent type keep it; two numeric types
/// widen to [`LuaType::Number`]; anything else collapses to
/// [`LuaType::Dynamic`]. Builtin calls contribute no hints.
pub fn collect_param_hints(program: &[AstNode]) -> HashMap<String, Vec<LuaType>> {
    let mut hints = HashMap::new();
    walk_body(program, &mut hints);
    hints
}

fn walk_body(body: &[AstNode], hints: &mut HashMap<String, Vec<LuaType>>) {
    for stmt in body {
        walk_node(stmt, hints);
    }
}

fn walk_node(node: &AstNode, hints: &mut HashMap<String, Vec<LuaType>>) {
    match node {
        AstNode::FunctionCall(call) => {
            for arg in &call.args {
                walk_node(arg, hints);
            }
            if let Callee::Name(name) = &call.callee {
                if name != PRINT_NAME && name != READ_NAME {
                    record_call(name, &call.args, hints);
                }
            }
        }

        AstNode::Expr(e) => {
            if let Some(left) = &e.left {
                walk_node(left, hints);
            }
            walk_node(&e.right, hints);
        }

        AstNode::Declaration(decl) => {
            if let Some(expr) = &decl.expr {
                walk_node(expr, hints);
            }
        }

        AstNode::Return(ret) => {
            for expr in &ret.exprs {
                walk_node(expr, hints);
            }
        }

        AstNode::FunctionDef(fdef) => walk_body(&fdef.body, hints),

        AstNode::If(ifn) => {
            walk_node(&ifn.cond, hints);
            walk_body(&ifn.body, hints);
            if let Some(else_body) = &ifn.else_body {
                walk_body(else_body, hints);
            }
        }

        AstNode::For(forn) => {
            walk_node(&forn.start, hints);
            walk_node(&forn.end, hints);
            if let Some(step) = &forn.step {
                walk_node(step, hints);
            }
            walk_body(&forn.body, hints);
        }

        AstNode::Variable(var) => {
            if let Some(key) = &var.table_key {
                walk_node(key, hints);
            }
        }

        AstNode::Table(table) => walk_body(&table.fields, hints),

        AstNode::TableField(field) => {
            if let Some(key) = &field.key {
                walk_node(key, hints);
            }
            if let Some(value) = &field.value {
                walk_node(value, hints);
            }
        }

        AstNode::Value(_) | AstNode::Error => {}
    }
}

fn record_call(name: &str, args: &[AstNode], hints: &mut HashMap<String, Vec<LuaType>>) {
    let types: Vec<LuaType> = args.iter().map(hint_type).collect();

    match hints.get_mut(name) {
        None => {
            hints.insert(name.to_string(), types);
        }
        Some(known) => {
            // A shorter argument list leaves the extra positions as they
            // were; a longer one appends.
            for (i, ty) in types.into_iter().enumerate() {
                if i < known.len() {
                    known[i] = unify(known[i], ty);
                } else {
                    known.push(ty);
                }
            }
        }
    }
}

/// Types one argument with no scope information.
fn hint_type(arg: &AstNode) -> LuaType {
    match arg {
        AstNode::Value(val) => val.val_type,
        AstNode::Expr(e) => match e.op {
            ExprOp::Add | ExprOp::Sub | ExprOp::Mul | ExprOp::Div => LuaType::Number,
            ExprOp::And
            | ExprOp::Or
            | ExprOp::Not
            | ExprOp::Gt
            | ExprOp::Ge
            | ExprOp::Lt
            | ExprOp::Le
            | ExprOp::Eq
            | ExprOp::Ne => LuaType::Boolean,
            ExprOp::Neg | ExprOp::Paren | ExprOp::Assign => hint_type(&e.right),
            ExprOp::Concat => LuaType::String,
        },
        AstNode::Table(_) => LuaType::Table,
        _ => LuaType::Dynamic,
    }
}

fn unify(known: LuaType, seen: LuaType) -> LuaType {
    if known == seen {
        return known;
    }
    if known.is_numeric() && seen.is_numeric() {
        return LuaType::Number;
    }
    LuaType::Dynamic
}
