//! Template Module
//!
//! Delimiter-configurable text templates with pipelines, conditionals and
//! an injectable function table. Compilation is deferred to first use and
//! cached, so a catalog with many messages only pays for what it renders.

pub mod ast;
pub mod defaults;
pub mod exec;
pub mod funcs;
pub mod lexer;
pub mod parser;

pub use ast::Tree;
pub use defaults::{default_delimiters, Delimiters};
pub use funcs::{FunctionTable, TemplateFn};

use crate::error::TemplateError;
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;

/// One template source plus its lazily compiled tree.
///
/// Compiled trees are immutable, so a `Template` can be rendered from
/// several threads at once.
#[derive(Debug)]
pub struct Template {
    src: String,
    delims: Delimiters,
    compiled: OnceCell<Result<Tree, TemplateError>>,
}

impl Template {
    pub fn new(src: impl Into<String>, delims: Delimiters) -> Self {
        Template {
            src: src.into(),
            delims,
            compiled: OnceCell::new(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delims
    }

    /// Parse the source, or return the cached result of an earlier parse.
    pub fn compile(&self) -> Result<&Tree, TemplateError> {
        self.compiled
            .get_or_init(|| {
                self.delims.validate()?;
                if !self.src.contains(&self.delims.left) {
                    return Ok(Tree {
                        nodes: vec![ast::Node::Text(self.src.clone())],
                    });
                }
                parser::parse(&self.src, &self.delims)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Render against any serializable data.
    pub fn execute<T>(&self, data: &T, funcs: &FunctionTable) -> Result<String, TemplateError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(data).map_err(|e| TemplateError::exec(e.to_string()))?;
        self.execute_value(&value, funcs)
    }

    pub fn execute_value(&self, data: &Value, funcs: &FunctionTable) -> Result<String, TemplateError> {
        let tree = self.compile()?;
        exec::execute(tree, data, funcs)
    }
}

impl Clone for Template {
    fn clone(&self) -> Self {
        Template::new(self.src.clone(), self.delims.clone())
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.src == other.src && self.delims == other.delims
    }
}
