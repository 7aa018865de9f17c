/**
 * Template Parser
 *
 * Builds a `Tree` from lexer tokens. Control actions (`if`, `with`,
 * `range`) nest until their matching `end`.
 */

use super::ast::{Branch, Command, Node, Operand, Pipeline, Tree};
use super::defaults::Delimiters;
use super::lexer::{Lexer, Token, TokenType};
use crate::error::TemplateError;

const KEYWORDS: [&str; 5] = ["if", "else", "end", "with", "range"];

/// Deepest nesting of control actions and parenthesized pipelines.
const MAX_DEPTH: usize = 100;

/// How a node list ended.
enum Terminator {
    Eof,
    End(usize),
    Else(usize),
    ElseIf(usize, Pipeline),
}

#[derive(Clone, Copy)]
enum BranchKind {
    If,
    With,
    Range,
}

impl BranchKind {
    fn keyword(self) -> &'static str {
        match self {
            BranchKind::If => "if",
            BranchKind::With => "with",
            BranchKind::Range => "range",
        }
    }

    fn node(self, branch: Branch) -> Node {
        match self {
            BranchKind::If => Node::If(branch),
            BranchKind::With => Node::With(branch),
            BranchKind::Range => Node::Range(branch),
        }
    }
}

pub fn parse(src: &str, delims: &Delimiters) -> Result<Tree, TemplateError> {
    delims.validate()?;
    let tokens = Lexer::new(src, delims).tokenize()?;
    let mut parser = Parser {
        tokens,
        index: 0,
        src_len: src.len(),
        depth: 0,
    };
    let (nodes, terminator) = parser.parse_list()?;
    match terminator {
        Terminator::Eof => Ok(Tree { nodes }),
        Terminator::End(at) => Err(TemplateError::parse(at, "unexpected {{end}}")),
        Terminator::Else(at) | Terminator::ElseIf(at, _) => {
            Err(TemplateError::parse(at, "unexpected {{else}}"))
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    src_len: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn offset(&self) -> usize {
        self.peek().map_or(self.src_len, |t| t.index)
    }

    fn descend(&mut self, at: usize) -> Result<(), TemplateError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(TemplateError::parse(
                at,
                format!("exceeded maximum nesting depth of {}", MAX_DEPTH),
            ));
        }
        Ok(())
    }

    fn expect_right_delim(&mut self, context: &str) -> Result<(), TemplateError> {
        match self.next() {
            Some(Token {
                token_type: TokenType::RightDelim,
                ..
            }) => Ok(()),
            Some(token) => Err(TemplateError::parse(
                token.index,
                format!("unexpected {:?} in {}", token.token_type, context),
            )),
            None => Err(TemplateError::parse(self.src_len, "unclosed action")),
        }
    }

    fn parse_list(&mut self) -> Result<(Vec<Node>, Terminator), TemplateError> {
        let mut nodes = Vec::new();
        while let Some(token) = self.next() {
            match token.token_type {
                TokenType::Text(text) => nodes.push(Node::Text(text)),
                TokenType::LeftDelim => {
                    if let Some(terminator) = self.parse_action(token.index, &mut nodes)? {
                        return Ok((nodes, terminator));
                    }
                }
                other => {
                    return Err(TemplateError::parse(
                        token.index,
                        format!("unexpected {:?} outside action", other),
                    ))
                }
            }
        }
        Ok((nodes, Terminator::Eof))
    }

    // Parses one action after its left delimiter. Returns a terminator
    // when the action closes the enclosing list.
    fn parse_action(
        &mut self,
        at: usize,
        nodes: &mut Vec<Node>,
    ) -> Result<Option<Terminator>, TemplateError> {
        let keyword = match self.peek().map(|t| &t.token_type) {
            Some(TokenType::Identifier(name)) if KEYWORDS.contains(&name.as_str()) => {
                Some(name.clone())
            }
            _ => None,
        };

        match keyword.as_deref() {
            Some("end") => {
                self.next();
                self.expect_right_delim("end")?;
                Ok(Some(Terminator::End(at)))
            }
            Some("else") => {
                self.next();
                if self.peek().map_or(false, |t| t.is_identifier("if")) {
                    self.next();
                    let pipeline = self.parse_pipeline(TokenType::RightDelim, "else if")?;
                    Ok(Some(Terminator::ElseIf(at, pipeline)))
                } else {
                    self.expect_right_delim("else")?;
                    Ok(Some(Terminator::Else(at)))
                }
            }
            Some("if") => {
                self.next();
                nodes.push(self.parse_branch(BranchKind::If, at)?);
                Ok(None)
            }
            Some("with") => {
                self.next();
                nodes.push(self.parse_branch(BranchKind::With, at)?);
                Ok(None)
            }
            Some("range") => {
                self.next();
                nodes.push(self.parse_branch(BranchKind::Range, at)?);
                Ok(None)
            }
            _ => {
                let pipeline = self.parse_pipeline(TokenType::RightDelim, "command")?;
                nodes.push(Node::Action(pipeline));
                Ok(None)
            }
        }
    }

    fn parse_branch(&mut self, kind: BranchKind, at: usize) -> Result<Node, TemplateError> {
        let pipeline = self.parse_pipeline(TokenType::RightDelim, kind.keyword())?;
        self.finish_branch(kind, pipeline, at)
    }

    fn finish_branch(
        &mut self,
        kind: BranchKind,
        pipeline: Pipeline,
        at: usize,
    ) -> Result<Node, TemplateError> {
        self.descend(at)?;
        let (then, terminator) = self.parse_list()?;
        let otherwise = match terminator {
            Terminator::End(_) => Vec::new(),
            Terminator::Else(_) => {
                let (otherwise, terminator) = self.parse_list()?;
                match terminator {
                    Terminator::End(_) => otherwise,
                    Terminator::Eof => {
                        return Err(TemplateError::parse(
                            at,
                            format!("unexpected EOF in {}", kind.keyword()),
                        ))
                    }
                    Terminator::Else(else_at) | Terminator::ElseIf(else_at, _) => {
                        return Err(TemplateError::parse(
                            else_at,
                            format!("expected end; found else in {}", kind.keyword()),
                        ))
                    }
                }
            }
            Terminator::ElseIf(else_at, else_pipeline) => match kind {
                // `{{else if x}}` chains share the outer `{{end}}`.
                BranchKind::If => vec![self.finish_branch(BranchKind::If, else_pipeline, else_at)?],
                _ => {
                    return Err(TemplateError::parse(
                        else_at,
                        format!("else if is not allowed in {}", kind.keyword()),
                    ))
                }
            },
            Terminator::Eof => {
                return Err(TemplateError::parse(
                    at,
                    format!("unexpected EOF in {}", kind.keyword()),
                ))
            }
        };
        self.depth -= 1;
        Ok(kind.node(Branch {
            pipeline,
            then,
            otherwise,
        }))
    }

    fn parse_pipeline(
        &mut self,
        close: TokenType,
        context: &str,
    ) -> Result<Pipeline, TemplateError> {
        let start = self.offset();
        let mut commands = Vec::new();
        let mut operands = Vec::new();
        loop {
            let Some(token) = self.next() else {
                return Err(TemplateError::parse(self.src_len, format!("unclosed {}", context)));
            };
            if token.token_type == close {
                break;
            }
            match token.token_type {
                TokenType::Pipe => {
                    if operands.is_empty() {
                        return Err(TemplateError::parse(token.index, "missing command before |"));
                    }
                    commands.push(Command {
                        operands: std::mem::take(&mut operands),
                    });
                }
                TokenType::Dot => operands.push(Operand::Dot),
                TokenType::Field(path) => operands.push(Operand::Field(path)),
                TokenType::Variable(path) => operands.push(Operand::Variable(path)),
                TokenType::Literal(value) => operands.push(Operand::Literal(value)),
                TokenType::Identifier(name) => {
                    if KEYWORDS.contains(&name.as_str()) {
                        return Err(TemplateError::parse(
                            token.index,
                            format!("unexpected keyword {:?} in {}", name, context),
                        ));
                    }
                    operands.push(Operand::Function(name));
                }
                TokenType::LeftParen => {
                    self.descend(token.index)?;
                    let inner = self.parse_pipeline(TokenType::RightParen, "parenthesized pipeline")?;
                    self.depth -= 1;
                    operands.push(Operand::Pipeline(Box::new(inner)));
                }
                other => {
                    return Err(TemplateError::parse(
                        token.index,
                        format!("unexpected {:?} in {}", other, context),
                    ))
                }
            }
        }

        if operands.is_empty() {
            return Err(TemplateError::parse(
                start,
                format!("missing value for {}", context),
            ));
        }
        commands.push(Command { operands });
        Ok(Pipeline { commands })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse_default(src: &str) -> Result<Tree, TemplateError> {
        parse(src, &Delimiters::default())
    }

    #[test]
    fn test_text_and_field() {
        let tree = parse_default("Hi {{.Name}}").unwrap();
        assert_eq!(
            tree.nodes,
            vec![
                Node::Text("Hi ".into()),
                Node::Action(Pipeline {
                    commands: vec![Command {
                        operands: vec![Operand::Field(vec!["Name".into()])]
                    }]
                }),
            ]
        );
    }

    #[test]
    fn test_pipeline_commands() {
        let tree = parse_default(r#"{{ .Count | print "n=" }}"#).unwrap();
        let Node::Action(pipeline) = &tree.nodes[0] else {
            panic!("expected action");
        };
        assert_eq!(pipeline.commands.len(), 2);
        assert_eq!(
            pipeline.commands[1].operands,
            vec![
                Operand::Function("print".into()),
                Operand::Literal(Value::String("n=".into())),
            ]
        );
    }

    #[test]
    fn test_else_if_chain_shares_end() {
        let tree = parse_default("{{if .A}}a{{else if .B}}b{{else}}c{{end}}").unwrap();
        let Node::If(branch) = &tree.nodes[0] else {
            panic!("expected if");
        };
        assert_eq!(branch.then, vec![Node::Text("a".into())]);
        let Node::If(nested) = &branch.otherwise[0] else {
            panic!("expected nested if");
        };
        assert_eq!(nested.then, vec![Node::Text("b".into())]);
        assert_eq!(nested.otherwise, vec![Node::Text("c".into())]);
    }

    #[test]
    fn test_parenthesized_operand() {
        let tree = parse_default("{{ print (len .Items) }}").unwrap();
        let Node::Action(pipeline) = &tree.nodes[0] else {
            panic!("expected action");
        };
        assert!(matches!(
            pipeline.commands[0].operands[1],
            Operand::Pipeline(_)
        ));
    }

    #[test]
    fn test_errors() {
        assert!(parse_default("{{end}}").is_err());
        assert!(parse_default("{{if .A}}a").is_err());
        assert!(parse_default("{{}}").is_err());
        assert!(parse_default("{{ . | }}").is_err());
        assert!(parse_default("{{with .A}}a{{else if .B}}b{{end}}").is_err());
    }

    #[test]
    fn test_deep_parentheses_are_a_parse_error() {
        let depth = 50_000;
        let src = format!("{{{{ {}1{} }}}}", "print (".repeat(depth), ")".repeat(depth));
        assert!(matches!(
            parse_default(&src),
            Err(TemplateError::Parse { .. })
        ));

        let shallow = format!("{{{{ {}1{} }}}}", "print (".repeat(10), ")".repeat(10));
        assert!(parse_default(&shallow).is_ok());
    }

    #[test]
    fn test_deep_branches_are_a_parse_error() {
        let depth = MAX_DEPTH + 1;
        let src = format!("{}x{}", "{{if .A}}".repeat(depth), "{{end}}".repeat(depth));
        let err = parse_default(&src).unwrap_err();
        assert!(err.to_string().contains("nesting depth"));

        let src = format!("{}x{}", "{{if .A}}".repeat(MAX_DEPTH), "{{end}}".repeat(MAX_DEPTH));
        assert!(parse_default(&src).is_ok());
    }
}
