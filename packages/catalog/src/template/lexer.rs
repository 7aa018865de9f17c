/**
 * Template Lexer
 *
 * Splits template source into text runs and the tokens of each action.
 */

use super::defaults::Delimiters;
use crate::error::TemplateError;
use serde_json::{Number, Value};

const TRIM_MARKER: char = '-';
const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";

/// Token types in templates
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    Text(String),
    LeftDelim,
    RightDelim,
    /// `.` on its own
    Dot,
    /// `.Field.Sub`
    Field(Vec<String>),
    /// `$` or `$.Field.Sub`
    Variable(Vec<String>),
    Identifier(String),
    /// String, number, bool or nil literal
    Literal(Value),
    Pipe,
    LeftParen,
    RightParen,
}

/// Token representation
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub index: usize,
    pub token_type: TokenType,
}

impl Token {
    pub fn new(index: usize, token_type: TokenType) -> Self {
        Token { index, token_type }
    }

    pub fn is_identifier(&self, name: &str) -> bool {
        matches!(&self.token_type, TokenType::Identifier(id) if id == name)
    }
}

pub struct Lexer<'a> {
    src: &'a str,
    delims: &'a Delimiters,
    pos: usize,
    tokens: Vec<Token>,
    // Set by a `-}}` so the following text loses its leading whitespace.
    trim_next_text: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, delims: &'a Delimiters) -> Self {
        Lexer {
            src,
            delims,
            pos: 0,
            tokens: Vec::new(),
            trim_next_text: false,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, TemplateError> {
        let src = self.src;
        while self.pos < src.len() {
            let rest = &src[self.pos..];
            let Some(offset) = rest.find(&self.delims.left) else {
                self.push_text(self.pos, rest, false);
                break;
            };

            let delim_start = self.pos + offset;
            let after_delim = delim_start + self.delims.left.len();
            let trim_len = self.left_trim_len(after_delim);
            self.push_text(self.pos, &rest[..offset], trim_len.is_some());

            self.pos = after_delim + trim_len.unwrap_or(0);
            if src[self.pos..].starts_with(COMMENT_OPEN) {
                self.lex_comment(delim_start)?;
            } else {
                self.tokens.push(Token::new(delim_start, TokenType::LeftDelim));
                self.lex_action(delim_start)?;
            }
        }
        Ok(self.tokens)
    }

    fn push_text(&mut self, index: usize, text: &str, trim_right: bool) {
        let mut text = text;
        if self.trim_next_text {
            text = text.trim_start();
            self.trim_next_text = false;
        }
        if trim_right {
            text = text.trim_end();
        }
        if !text.is_empty() {
            self.tokens
                .push(Token::new(index, TokenType::Text(text.to_string())));
        }
    }

    // `{{- ` trims the text before the action. The marker needs a space
    // after it so `{{-3}}` still reads as a number.
    fn left_trim_len(&self, at: usize) -> Option<usize> {
        let mut chars = self.src[at..].chars();
        if chars.next() != Some(TRIM_MARKER) {
            return None;
        }
        chars
            .next()
            .filter(|c| c.is_whitespace())
            .map(|c| TRIM_MARKER.len_utf8() + c.len_utf8())
    }

    // Whitespace, `-`, then the right delimiter.
    fn right_trim_len(&self, at: usize) -> Option<usize> {
        let rest = &self.src[at..];
        let trimmed = rest.trim_start();
        let ws = rest.len() - trimmed.len();
        if ws == 0 {
            return None;
        }
        let after_marker = trimmed.strip_prefix(TRIM_MARKER)?;
        if after_marker.starts_with(&self.delims.right) {
            Some(ws + 1 + self.delims.right.len())
        } else {
            None
        }
    }

    fn lex_comment(&mut self, start: usize) -> Result<(), TemplateError> {
        let body = self.pos + COMMENT_OPEN.len();
        let Some(close) = self.src[body..].find(COMMENT_CLOSE) else {
            return Err(TemplateError::parse(start, "unclosed comment"));
        };
        self.pos = body + close + COMMENT_CLOSE.len();
        if let Some(len) = self.right_trim_len(self.pos) {
            self.pos += len;
            self.trim_next_text = true;
        } else if self.src[self.pos..].starts_with(&self.delims.right) {
            self.pos += self.delims.right.len();
        } else {
            return Err(TemplateError::parse(start, "comment ends before closing delimiter"));
        }
        Ok(())
    }

    fn lex_action(&mut self, start: usize) -> Result<(), TemplateError> {
        loop {
            if let Some(len) = self.right_trim_len(self.pos) {
                self.tokens.push(Token::new(self.pos, TokenType::RightDelim));
                self.pos += len;
                self.trim_next_text = true;
                return Ok(());
            }
            let rest = &self.src[self.pos..];
            if rest.starts_with(&self.delims.right) {
                self.tokens.push(Token::new(self.pos, TokenType::RightDelim));
                self.pos += self.delims.right.len();
                return Ok(());
            }

            let Some(ch) = rest.chars().next() else {
                return Err(TemplateError::parse(start, "unclosed action"));
            };
            let index = self.pos;
            match ch {
                c if c.is_whitespace() => self.pos += c.len_utf8(),
                '|' => self.single(index, TokenType::Pipe),
                '(' => self.single(index, TokenType::LeftParen),
                ')' => self.single(index, TokenType::RightParen),
                '"' => self.lex_quoted(index)?,
                '`' => self.lex_raw(index)?,
                '.' => self.lex_field(index),
                '$' => self.lex_variable(index)?,
                c if c.is_ascii_digit() || ((c == '-' || c == '+') && self.digit_follows()) => {
                    self.lex_number(index)?
                }
                c if is_identifier_start(c) => self.lex_identifier(index),
                c => {
                    return Err(TemplateError::parse(
                        index,
                        format!("unexpected {:?} in action", c),
                    ))
                }
            }
        }
    }

    fn single(&mut self, index: usize, token_type: TokenType) {
        self.tokens.push(Token::new(index, token_type));
        self.pos += 1;
    }

    fn digit_follows(&self) -> bool {
        self.src[self.pos + 1..]
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_digit())
    }

    fn take_identifier(&mut self) -> String {
        let rest = &self.src[self.pos..];
        let len = rest
            .char_indices()
            .find(|(_, c)| !is_identifier_part(*c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        rest[..len].to_string()
    }

    fn lex_identifier(&mut self, index: usize) {
        let name = self.take_identifier();
        let token_type = match name.as_str() {
            "true" => TokenType::Literal(Value::Bool(true)),
            "false" => TokenType::Literal(Value::Bool(false)),
            "nil" => TokenType::Literal(Value::Null),
            _ => TokenType::Identifier(name),
        };
        self.tokens.push(Token::new(index, token_type));
    }

    fn take_field_chain(&mut self) -> Vec<String> {
        let mut path = Vec::new();
        while self.src[self.pos..].starts_with('.') {
            let next = self.src[self.pos + 1..].chars().next();
            if !next.map_or(false, is_identifier_start) {
                break;
            }
            self.pos += 1;
            path.push(self.take_identifier());
        }
        path
    }

    fn lex_field(&mut self, index: usize) {
        let path = self.take_field_chain();
        if path.is_empty() {
            self.pos += 1;
            self.tokens.push(Token::new(index, TokenType::Dot));
        } else {
            self.tokens.push(Token::new(index, TokenType::Field(path)));
        }
    }

    fn lex_variable(&mut self, index: usize) -> Result<(), TemplateError> {
        self.pos += 1;
        if self.src[self.pos..]
            .chars()
            .next()
            .map_or(false, is_identifier_part)
        {
            return Err(TemplateError::parse(
                index,
                "only the root variable $ is supported",
            ));
        }
        let path = self.take_field_chain();
        self.tokens.push(Token::new(index, TokenType::Variable(path)));
        Ok(())
    }

    fn lex_quoted(&mut self, index: usize) -> Result<(), TemplateError> {
        let mut value = String::new();
        let mut chars = self.src[self.pos + 1..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += 1 + i + 1;
                    self.tokens
                        .push(Token::new(index, TokenType::Literal(Value::String(value))));
                    return Ok(());
                }
                '\\' => {
                    let escaped = match chars.next().map(|(_, e)| e) {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        other => {
                            return Err(TemplateError::parse(
                                index,
                                format!("invalid escape {:?} in string", other),
                            ))
                        }
                    };
                    value.push(escaped);
                }
                '\n' => return Err(TemplateError::parse(index, "unterminated quoted string")),
                c => value.push(c),
            }
        }
        Err(TemplateError::parse(index, "unterminated quoted string"))
    }

    fn lex_raw(&mut self, index: usize) -> Result<(), TemplateError> {
        let body = self.pos + 1;
        let Some(close) = self.src[body..].find('`') else {
            return Err(TemplateError::parse(index, "unterminated raw quoted string"));
        };
        let value = self.src[body..body + close].to_string();
        self.pos = body + close + 1;
        self.tokens
            .push(Token::new(index, TokenType::Literal(Value::String(value))));
        Ok(())
    }

    fn lex_number(&mut self, index: usize) -> Result<(), TemplateError> {
        let rest = &self.src[self.pos..];
        let len = rest
            .char_indices()
            .skip(1)
            .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == 'e' || *c == 'E' || *c == '_'))
            .map_or(rest.len(), |(i, _)| i);
        let text: String = rest[..len].chars().filter(|c| *c != '_').collect();
        self.pos += len;

        let number = if let Ok(int) = text.parse::<i64>() {
            Number::from(int)
        } else {
            text.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .ok_or_else(|| TemplateError::parse(index, format!("bad number syntax: {:?}", text)))?
        };
        self.tokens
            .push(Token::new(index, TokenType::Literal(Value::Number(number))));
        Ok(())
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
