//! Template Execution
//!
//! Walks a parsed `Tree` against JSON data and writes the output text.

use super::ast::{Branch, Command, Node, Operand, Pipeline, Tree};
use super::funcs::{is_true, print_value, type_name, FunctionTable};
use crate::error::TemplateError;
use serde_json::Value;
use smallvec::SmallVec;

type Args = SmallVec<[Value; 4]>;

const MAX_DEPTH: usize = 100;

pub fn execute(tree: &Tree, data: &Value, funcs: &FunctionTable) -> Result<String, TemplateError> {
    let mut state = State {
        funcs,
        root: data,
        out: String::new(),
        depth: 0,
    };
    state.walk(data, &tree.nodes)?;
    Ok(state.out)
}

struct State<'a> {
    funcs: &'a FunctionTable,
    root: &'a Value,
    out: String,
    depth: usize,
}

impl<'a> State<'a> {
    fn walk(&mut self, dot: &Value, nodes: &[Node]) -> Result<(), TemplateError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(TemplateError::exec("exceeded maximum template depth"));
        }
        for node in nodes {
            match node {
                Node::Text(text) => self.out.push_str(text),
                Node::Action(pipeline) => {
                    let value = self.eval_pipeline(dot, pipeline)?;
                    self.out.push_str(&print_value(&value));
                }
                Node::If(branch) => {
                    let value = self.eval_pipeline(dot, &branch.pipeline)?;
                    let body = if is_true(&value) { &branch.then } else { &branch.otherwise };
                    self.walk(dot, body)?;
                }
                Node::With(branch) => {
                    let value = self.eval_pipeline(dot, &branch.pipeline)?;
                    if is_true(&value) {
                        self.walk(&value, &branch.then)?;
                    } else {
                        self.walk(dot, &branch.otherwise)?;
                    }
                }
                Node::Range(branch) => self.walk_range(dot, branch)?,
            }
        }
        self.depth -= 1;
        Ok(())
    }

    fn walk_range(&mut self, dot: &Value, branch: &Branch) -> Result<(), TemplateError> {
        let value = self.eval_pipeline(dot, &branch.pipeline)?;
        match &value {
            Value::Array(items) if !items.is_empty() => {
                for item in items {
                    self.walk(item, &branch.then)?;
                }
            }
            Value::Object(map) if !map.is_empty() => {
                // Keys in sorted order, independent of insertion order.
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                for key in keys {
                    self.walk(&map[key.as_str()], &branch.then)?;
                }
            }
            Value::Array(_) | Value::Object(_) | Value::Null => {
                self.walk(dot, &branch.otherwise)?;
            }
            other => {
                return Err(TemplateError::exec(format!(
                    "range can't iterate over {}",
                    type_name(other)
                )))
            }
        }
        Ok(())
    }

    fn eval_pipeline(&mut self, dot: &Value, pipeline: &Pipeline) -> Result<Value, TemplateError> {
        let mut last: Option<Value> = None;
        for command in &pipeline.commands {
            last = Some(self.eval_command(dot, command, last.take())?);
        }
        Ok(last.unwrap_or(Value::Null))
    }

    fn eval_command(
        &mut self,
        dot: &Value,
        command: &Command,
        piped: Option<Value>,
    ) -> Result<Value, TemplateError> {
        let Some((first, rest)) = command.operands.split_first() else {
            return Err(TemplateError::exec("empty command"));
        };

        if let Operand::Function(name) = first {
            let mut args = Args::new();
            for operand in rest {
                args.push(self.eval_operand(dot, operand)?);
            }
            args.extend(piped);
            return self.call(name, &args);
        }

        if !rest.is_empty() || piped.is_some() {
            return Err(TemplateError::exec(format!(
                "can't give argument to non-function {}",
                first
            )));
        }
        self.eval_operand(dot, first)
    }

    fn eval_operand(&mut self, dot: &Value, operand: &Operand) -> Result<Value, TemplateError> {
        match operand {
            Operand::Dot => Ok(dot.clone()),
            Operand::Field(path) => resolve_path(dot, path),
            Operand::Variable(path) => resolve_path(self.root, path),
            Operand::Literal(value) => Ok(value.clone()),
            // A bare function name in argument position is called without
            // arguments.
            Operand::Function(name) => self.call(name, &[]),
            Operand::Pipeline(pipeline) => self.eval_pipeline(dot, pipeline),
        }
    }

    fn call(&self, name: &str, args: &[Value]) -> Result<Value, TemplateError> {
        let func = self
            .funcs
            .get(name)
            .ok_or_else(|| TemplateError::UnknownFunction(name.to_string()))?;
        func(args).map_err(|message| {
            TemplateError::exec(format!("error calling {}: {}", name, message))
        })
    }
}

// A missing key yields nil, which prints as `<no value>`.
fn resolve_path(start: &Value, path: &[String]) -> Result<Value, TemplateError> {
    let mut current = start;
    for name in path {
        current = match current {
            Value::Object(map) => match map.get(name) {
                Some(value) => value,
                None => return Ok(Value::Null),
            },
            Value::Null => return Ok(Value::Null),
            other => {
                return Err(TemplateError::exec(format!(
                    "can't evaluate field {} in type {}",
                    name,
                    type_name(other)
                )))
            }
        };
    }
    Ok(current.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::defaults::Delimiters;
    use crate::template::parser::parse;
    use serde_json::json;

    fn render(src: &str, data: Value) -> Result<String, TemplateError> {
        let tree = parse(src, &Delimiters::default())?;
        execute(&tree, &data, &FunctionTable::new())
    }

    #[test]
    fn test_fields_and_missing_keys() {
        let data = json!({"User": {"Name": "Ana"}});
        assert_eq!(render("{{.User.Name}}", data.clone()).unwrap(), "Ana");
        assert_eq!(render("{{.User.Age}}", data.clone()).unwrap(), "<no value>");
        assert!(render("{{.User.Name.First}}", data).is_err());
    }

    #[test]
    fn test_root_variable_inside_with() {
        let data = json!({"Title": "Dr", "User": {"Name": "Ana"}});
        assert_eq!(
            render("{{with .User}}{{$.Title}} {{.Name}}{{end}}", data).unwrap(),
            "Dr Ana"
        );
    }

    #[test]
    fn test_range_over_array_and_object() {
        assert_eq!(render("{{range .}}[{{.}}]{{end}}", json!([1, 2])).unwrap(), "[1][2]");
        assert_eq!(
            render("{{range .}}{{.}}{{end}}", json!({"b": 2, "a": 1})).unwrap(),
            "12"
        );
        assert_eq!(
            render("{{range .}}x{{else}}none{{end}}", json!([])).unwrap(),
            "none"
        );
        assert!(render("{{range .}}x{{end}}", json!(3)).is_err());
    }

    #[test]
    fn test_piped_argument_is_last() {
        let funcs = FunctionTable::new().with("join", |args: &[Value]| {
            Ok(Value::String(
                args.iter().map(print_value).collect::<Vec<_>>().join("-"),
            ))
        });
        let tree = parse(r#"{{ "c" | join "a" "b" }}"#, &Delimiters::default()).unwrap();
        assert_eq!(execute(&tree, &Value::Null, &funcs).unwrap(), "a-b-c");
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            render("{{ nope }}", Value::Null),
            Err(TemplateError::UnknownFunction("nope".into()))
        );
    }

    #[test]
    fn test_argument_to_non_function() {
        assert!(render("{{ .A 1 }}", json!({"A": 1})).is_err());
    }
}
