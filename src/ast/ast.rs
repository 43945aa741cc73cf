//! Core AST definitions.
//!
//! The translator does not parse Lua itself; a parser hands it a tree of
//! [`AstNode`] values. The node vocabulary mirrors the constructs the
//! translator understands: literals, variables, operator expressions, local
//! declarations, returns, calls, function definitions, if/for statements and
//! table constructors. Statement bodies and argument lists are plain
//! `Vec<AstNode>`.
//!
//! The tree is read-only for the whole crate: inference and generation
//! borrow it and never patch it.

use crate::Position;

use super::types::LuaType;

/// The operator of an [`Expression`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprOp {
    /// `=` used as an expression (Lua assignment).
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Not,
    And,
    Or,
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
    /// Unary minus.
    Neg,
    /// A parenthesized subexpression; only `right` is set.
    Paren,
    /// Lua `..` string concatenation.
    Concat,
}

impl ExprOp {
    /// The Lua spelling of the operator, for diagnostics.
    pub fn lua_token(&self) -> &'static str {
        match self {
            ExprOp::Assign => "=",
            ExprOp::Add => "+",
            ExprOp::Sub => "-",
            ExprOp::Mul => "*",
            ExprOp::Div => "/",
            ExprOp::Not => "not",
            ExprOp::And => "and",
            ExprOp::Or => "or",
            ExprOp::Gt => ">",
            ExprOp::Ge => ">=",
            ExprOp::Lt => "<",
            ExprOp::Le => "<=",
            ExprOp::Eq => "==",
            ExprOp::Ne => "~=",
            ExprOp::Neg => "-",
            ExprOp::Paren => "()",
            ExprOp::Concat => "..",
        }
    }
}

/// A literal value: its type tag plus the literal's source text.
#[derive(Debug, Clone)]
pub struct Value {
    pub val_type: LuaType,
    pub text: String,
}

/// A variable reference, optionally indexed by a table key and optionally
/// marked as taken by reference.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub table_key: Option<Box<AstNode>>,
    pub by_reference: bool,
    pub pos: Position,
}

/// An operator expression. Unary operators leave `left` empty.
#[derive(Debug, Clone)]
pub struct Expression {
    pub op: ExprOp,
    pub left: Option<Box<AstNode>>,
    pub right: Box<AstNode>,
}

/// An explicit `local` declaration, with an optional initializer.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub var: Box<AstNode>,
    pub expr: Option<Box<AstNode>>,
}

/// A `return` statement. Lua allows multiple return values; the translator
/// emits only the first and warns about the rest.
#[derive(Debug, Clone)]
pub struct ReturnNode {
    pub exprs: Vec<AstNode>,
}

/// The callee of a function call: a plain name, or an arbitrary expression
/// for the non-simple case.
#[derive(Debug, Clone)]
pub enum Callee {
    Name(String),
    Expr(Box<AstNode>),
}

/// A function call.
#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub callee: Callee,
    pub args: Vec<AstNode>,
}

/// One function parameter; `default` is the defaulted-parameter expression
/// when the source carried one.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub default: Option<AstNode>,
}

/// A function definition.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<AstNode>,
    /// An explicit return type when the source carried an annotation.
    pub ret_type: Option<LuaType>,
    pub pos: Position,
}

/// An `if` statement with an optional `else` branch.
#[derive(Debug, Clone)]
pub struct IfNode {
    pub cond: Box<AstNode>,
    pub body: Vec<AstNode>,
    pub else_body: Option<Vec<AstNode>>,
}

/// A numeric `for` loop. The end bound is structurally required; the step
/// defaults to one when absent.
#[derive(Debug, Clone)]
pub struct ForNode {
    pub var: String,
    pub start: Box<AstNode>,
    pub end: Box<AstNode>,
    pub step: Option<Box<AstNode>>,
    pub body: Vec<AstNode>,
}

/// A table constructor; `fields` holds [`AstNode::TableField`] nodes.
#[derive(Debug, Clone)]
pub struct Table {
    pub fields: Vec<AstNode>,
}

/// One table-constructor field. A field with no value is vacuous (`{}` with
/// a dangling separator in the source).
#[derive(Debug, Clone)]
pub struct TableField {
    pub key: Option<Box<AstNode>>,
    pub value: Option<Box<AstNode>>,
}

/// The tagged AST node.
#[derive(Debug, Clone)]
pub enum AstNode {
    Value(Value),
    Variable(Variable),
    Expr(Expression),
    Declaration(Declaration),
    Return(ReturnNode),
    FunctionCall(FunctionCall),
    FunctionDef(FunctionDef),
    If(IfNode),
    For(ForNode),
    Table(Table),
    TableField(TableField),
    /// A node the parser could not recover; translated as a stub comment.
    Error,
}

impl AstNode {
    /// Creates a literal node, inferring its tag from the text.
    pub fn value(text: &str) -> AstNode {
        AstNode::Value(Value {
            val_type: LuaType::of_literal(text),
            text: text.to_string(),
        })
    }

    /// Creates a literal node with an explicit tag.
    pub fn value_typed(val_type: LuaType, text: &str) -> AstNode {
        AstNode::Value(Value {
            val_type,
            text: text.to_string(),
        })
    }

    /// Creates a plain variable reference.
    pub fn variable(name: &str) -> AstNode {
        AstNode::Variable(Variable {
            name: name.to_string(),
            table_key: None,
            by_reference: false,
            pos: Position::null(),
        })
    }

    /// Creates a table-indexed variable reference (`name[key]`).
    pub fn indexed(name: &str, key: AstNode) -> AstNode {
        AstNode::Variable(Variable {
            name: name.to_string(),
            table_key: Some(Box::new(key)),
            by_reference: false,
            pos: Position::null(),
        })
    }

    /// Creates a binary operator expression.
    pub fn binary(op: ExprOp, left: AstNode, right: AstNode) -> AstNode {
        AstNode::Expr(Expression {
            op,
            left: Some(Box::new(left)),
            right: Box::new(right),
        })
    }

    /// Creates a unary operator expression (`not`, unary minus, parens).
    pub fn unary(op: ExprOp, right: AstNode) -> AstNode {
        AstNode::Expr(Expression {
            op,
            left: None,
            right: Box::new(right),
        })
    }

    /// Creates an assignment expression (`name = expr`).
    pub fn assign(name: &str, expr: AstNode) -> AstNode {
        AstNode::binary(ExprOp::Assign, AstNode::variable(name), expr)
    }

    /// Creates a `local` declaration with an initializer.
    pub fn local(name: &str, expr: AstNode) -> AstNode {
        AstNode::Declaration(Declaration {
            var: Box::new(AstNode::variable(name)),
            expr: Some(Box::new(expr)),
        })
    }

    /// Creates a call to a named function.
    pub fn call(name: &str, args: Vec<AstNode>) -> AstNode {
        AstNode::FunctionCall(FunctionCall {
            callee: Callee::Name(name.to_string()),
            args,
        })
    }

    /// Creates a `return` statement with zero or more values.
    pub fn ret(exprs: Vec<AstNode>) -> AstNode {
        AstNode::Return(ReturnNode { exprs })
    }

    /// Creates a function definition with untyped, undefaulted parameters.
    pub fn function(name: &str, params: &[&str], body: Vec<AstNode>) -> AstNode {
        AstNode::FunctionDef(FunctionDef {
            name: name.to_string(),
            params: params
                .iter()
                .map(|p| Param {
                    name: p.to_string(),
                    default: None,
                })
                .collect(),
            body,
            ret_type: None,
            pos: Position::null(),
        })
    }

    /// Attaches a source position to a variable or function node.
    pub fn at(mut self, pos: Position) -> AstNode {
        match &mut self {
            AstNode::Variable(var) => var.pos = pos,
            AstNode::FunctionDef(fdef) => fdef.pos = pos,
            _ => {}
        }
        self
    }

    /// The literal payload, when this node is a [`AstNode::Value`].
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            AstNode::Value(val) => Some(val),
            _ => None,
        }
    }

    /// Whether this node is a string literal (already-quoted text for the
    /// print expansion).
    pub fn is_string_literal(&self) -> bool {
        matches!(self.as_value(), Some(val) if val.val_type == LuaType::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_builder_infers_tag() {
        let node = AstNode::value("42");
        assert_eq!(node.as_value().unwrap().val_type, LuaType::Integer);

        let node = AstNode::value("hi");
        assert!(node.is_string_literal());
    }

    #[test]
    fn test_value_builder_explicit_tag() {
        // A parser may tag quoted text explicitly even when it looks numeric.
        let node = AstNode::value_typed(LuaType::String, "42");
        assert!(node.is_string_literal());
    }

    #[test]
    fn test_assign_builder_shape() {
        let node = AstNode::assign("x", AstNode::value("1"));
        match node {
            AstNode::Expr(expr) => {
                assert_eq!(expr.op, ExprOp::Assign);
                assert!(matches!(*expr.left.unwrap(), AstNode::Variable(_)));
            }
            _ => panic!("expected an expression node"),
        }
    }

    #[test]
    fn test_lua_token_spellings() {
        assert_eq!(ExprOp::Ne.lua_token(), "~=");
        assert_eq!(ExprOp::And.lua_token(), "and");
        assert_eq!(ExprOp::Concat.lua_token(), "..");
    }
}
