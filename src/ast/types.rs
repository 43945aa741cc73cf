//! The Lua type vocabulary used throughout the translator.
//!
//! Lua values are dynamically typed; the tags below are what inference can
//! recover statically. `Dynamic` marks a value whose type genuinely cannot
//! be pinned down at translation time.

use std::fmt::Display;

/// The runtime type tags of Lua values, as far as static inference can
/// distinguish them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LuaType {
    Nil,
    Boolean,
    /// A number known to be integral.
    Integer,
    /// A number known to carry a fractional part.
    Float,
    /// A number of unknown subtype (the widened form of Integer/Float).
    Number,
    String,
    Function,
    Table,
    /// Could not be determined statically.
    Dynamic,
}

impl LuaType {
    /// Infers the type of a literal from its source text alone.
    ///
    /// The rule is purely lexical and context-free: `nil` and the boolean
    /// keywords are recognized by name, anything that parses fully as a
    /// number is `Integer` or `Float` depending on the presence of a
    /// decimal point, and everything else is a string.
    pub fn of_literal(text: &str) -> LuaType {
        if text.is_empty() || text == "nil" {
            return LuaType::Nil;
        }
        if text == "true" || text == "false" {
            return LuaType::Boolean;
        }

        if text.parse::<f64>().is_ok() {
            if text.contains('.') {
                return LuaType::Float;
            }
            return LuaType::Integer;
        }

        LuaType::String
    }

    /// Whether the type is one of the numeric tags.
    pub fn is_numeric(&self) -> bool {
        matches!(self, LuaType::Integer | LuaType::Float | LuaType::Number)
    }
}

impl Display for LuaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LuaType::Nil => "nil",
            LuaType::Boolean => "boolean",
            LuaType::Integer => "integer",
            LuaType::Float => "float",
            LuaType::Number => "number",
            LuaType::String => "string",
            LuaType::Function => "function",
            LuaType::Table => "table",
            LuaType::Dynamic => "dynamic",
        };
        write!(f, "{}", name)
    }
}

/// How certain inference is about a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Certainty {
    /// The value is a compile-time constant (a literal).
    Constant,
    /// The value is only determined at runtime.
    Dynamic,
}

/// The result of typing one expression: a tag plus a certainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inferred {
    pub ty: LuaType,
    pub certainty: Certainty,
}

impl Inferred {
    pub fn constant(ty: LuaType) -> Self {
        Inferred {
            ty,
            certainty: Certainty::Constant,
        }
    }

    pub fn dynamic(ty: LuaType) -> Self {
        Inferred {
            ty,
            certainty: Certainty::Dynamic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_nil() {
        assert_eq!(LuaType::of_literal("nil"), LuaType::Nil);
    }

    #[test]
    fn test_literal_booleans() {
        assert_eq!(LuaType::of_literal("true"), LuaType::Boolean);
        assert_eq!(LuaType::of_literal("false"), LuaType::Boolean);
    }

    #[test]
    fn test_literal_integer() {
        assert_eq!(LuaType::of_literal("42"), LuaType::Integer);
        assert_eq!(LuaType::of_literal("0"), LuaType::Integer);
        assert_eq!(LuaType::of_literal("-7"), LuaType::Integer);
    }

    #[test]
    fn test_literal_float() {
        assert_eq!(LuaType::of_literal("3.14"), LuaType::Float);
        assert_eq!(LuaType::of_literal("0.0"), LuaType::Float);
    }

    #[test]
    fn test_literal_string() {
        assert_eq!(LuaType::of_literal("hello"), LuaType::String);
        assert_eq!(LuaType::of_literal("12abc"), LuaType::String);
    }

    #[test]
    fn test_numeric_tags() {
        assert!(LuaType::Integer.is_numeric());
        assert!(LuaType::Float.is_numeric());
        assert!(LuaType::Number.is_numeric());
        assert!(!LuaType::String.is_numeric());
        assert!(!LuaType::Nil.is_numeric());
    }
}
