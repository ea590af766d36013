//! Abstract syntax tree nodes for varlang programs.

use std::fmt;

/// Scalar types a variable or literal can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int32,
    Float32,
}

impl TypeTag {
    /// Type of a numeric literal, judged purely from its spelling.
    pub fn of_literal(text: &str) -> Self {
        if text.contains('.') {
            TypeTag::Float32
        } else {
            TypeTag::Int32
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Int32 => write!(f, "int"),
            TypeTag::Float32 => write!(f, "float"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `var <type> name (= literal)?;`
    VarDecl {
        declared_type: TypeTag,
        name: String,
        initializer: Option<Box<Node>>,
    },
    // literal text is kept as written; codegen parses it
    NumberLiteral { text: String, inferred_type: TypeTag },
    Assignment { name: String, value: Box<Node> },
    VariableRef { name: String },
    Print { expr: Box<Node> },
}

impl Node {
    pub fn number(text: impl Into<String>) -> Self {
        let text = text.into();
        let inferred_type = TypeTag::of_literal(&text);
        Node::NumberLiteral {
            text,
            inferred_type,
        }
    }
}

/// Top-level container for a parsed program: statements in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub stmts: Vec<Node>,
}
