//! Template AST
//!
//! Parsed form of a template: a list of nodes executed in order.

use serde_json::Value;

/// A compiled template body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Action(Pipeline),
    If(Branch),
    With(Branch),
    Range(Branch),
}

/// Shared shape of `if`, `with` and `range`.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub pipeline: Pipeline,
    pub then: Vec<Node>,
    pub otherwise: Vec<Node>,
}

/// Commands separated by `|`; each result feeds the next as its last
/// argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub operands: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Dot,
    Field(Vec<String>),
    Variable(Vec<String>),
    Function(String),
    Literal(Value),
    Pipeline(Box<Pipeline>),
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Dot => write!(f, "."),
            Operand::Field(path) => write!(f, ".{}", path.join(".")),
            Operand::Variable(path) if path.is_empty() => write!(f, "$"),
            Operand::Variable(path) => write!(f, "$.{}", path.join(".")),
            Operand::Function(name) => write!(f, "{}", name),
            Operand::Literal(value) => write!(f, "{}", value),
            Operand::Pipeline(_) => write!(f, "(...)"),
        }
    }
}
