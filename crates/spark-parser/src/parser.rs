//! Formula scanning and call recognition.

use spark_metadata::{FunctionCodeGen, FunctionDescriptor, MetadataRegistry};
use spark_types::{Expression, ExprNode, ExprNodeKind, Grammar, ParsedExpression, Span};

use crate::error::ParseError;

/// Parse one formula under the given grammar.
///
/// Convenience wrapper around [`Parser`].
pub fn parse(
    text: &str,
    grammar: Grammar,
    registry: &MetadataRegistry,
) -> Result<ParsedExpression, ParseError> {
    Parser::new(text, grammar, registry).parse()
}

/// Which registry table a recognised call resolves against.
#[derive(Clone, Copy)]
enum CallKind {
    Static,
    Object,
    Behavior,
}

/// The formula parser.
///
/// Scans the text left to right, producing nodes in source order.
/// Whitespace between tokens is dropped; literal and operator text flows
/// through as constant nodes.
pub struct Parser<'a> {
    src: &'a str,
    pos: usize,
    grammar: Grammar,
    registry: &'a MetadataRegistry,
}

impl<'a> Parser<'a> {
    /// Create a parser over one formula string.
    pub fn new(src: &'a str, grammar: Grammar, registry: &'a MetadataRegistry) -> Self {
        Self {
            src,
            pos: 0,
            grammar,
            registry,
        }
    }

    /// Parse the whole formula. Fails fast on the first error.
    pub fn parse(mut self) -> Result<ParsedExpression, ParseError> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(c) = self.peek() else { break };

            match c {
                '0'..='9' => nodes.push(self.scan_number(start)?),
                '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    nodes.push(self.scan_number(start)?)
                }
                '"' => nodes.push(self.scan_string_literal(start)?),
                '(' => nodes.push(self.scan_sub_expression(start)?),
                '+' => {
                    self.bump();
                    nodes.push(self.constant("+", start));
                }
                '-' | '*' | '/' | '%' if self.grammar == Grammar::Number => {
                    self.bump();
                    nodes.push(self.constant(&c.to_string(), start));
                }
                c if c.is_alphabetic() || c == '_' => nodes.push(self.scan_call(start)?),
                c => {
                    return Err(ParseError::UnexpectedCharacter {
                        ch: c,
                        position: start,
                    })
                }
            }
        }
        Ok(ParsedExpression { nodes })
    }

    // ── Cursor ────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn constant(&self, text: &str, start: usize) -> ExprNode {
        ExprNode::new(
            ExprNodeKind::Constant(text.to_string()),
            Span::new(start, self.pos),
        )
    }

    // ── Literals ──────────────────────────────────────────────────────

    /// `42`, `3.14`, `.5` — numeric grammar only.
    fn scan_number(&mut self, start: usize) -> Result<ExprNode, ParseError> {
        if self.grammar == Grammar::Text {
            return Err(ParseError::NumberInString { position: start });
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        Ok(self.constant(&self.src[start..self.pos].to_string(), start))
    }

    /// `"text"` — string grammar only. Becomes the anonymous bare-value
    /// construct: a static call with an empty name and the (unescaped)
    /// literal as its single parameter.
    fn scan_string_literal(&mut self, start: usize) -> Result<ExprNode, ParseError> {
        if self.grammar == Grammar::Number {
            return Err(ParseError::StringInNumeric { position: start });
        }
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some(c) => value.push(c),
                    None => return Err(ParseError::UnterminatedString { position: start }),
                },
                Some(c) => value.push(c),
                None => return Err(ParseError::UnterminatedString { position: start }),
            }
        }
        Ok(ExprNode::new(
            ExprNodeKind::StaticCall {
                name: String::new(),
                params: vec![Expression::new(value)],
            },
            Span::new(start, self.pos),
        ))
    }

    // ── Sub-expressions ───────────────────────────────────────────────

    /// `( ... )` — the inner text is re-parsed during code generation.
    fn scan_sub_expression(&mut self, start: usize) -> Result<ExprNode, ParseError> {
        self.bump(); // '('
        let inner_start = self.pos;
        let inner_end = self.scan_balanced(start)?;
        Ok(ExprNode::new(
            ExprNodeKind::SubExpr {
                expression: Expression::new(&self.src[inner_start..inner_end]),
            },
            Span::new(start, self.pos),
        ))
    }

    /// Scan to the parenthesis matching an already-consumed `(`.
    /// Returns the byte offset just before that `)`.
    fn scan_balanced(&mut self, open_pos: usize) -> Result<usize, ParseError> {
        let mut depth = 1usize;
        loop {
            match self.bump() {
                Some('(') => depth += 1,
                Some(')') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.pos - 1);
                    }
                }
                Some('"') => self.skip_string_content(open_pos)?,
                Some(_) => {}
                None => return Err(ParseError::UnbalancedParens { position: open_pos }),
            }
        }
    }

    /// Consume string content after an opening quote, escapes included.
    fn skip_string_content(&mut self, err_pos: usize) -> Result<(), ParseError> {
        loop {
            match self.bump() {
                Some('"') => return Ok(()),
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(ParseError::UnterminatedString { position: err_pos });
                    }
                }
                Some(_) => {}
                None => return Err(ParseError::UnterminatedString { position: err_pos }),
            }
        }
    }

    // ── Calls ─────────────────────────────────────────────────────────

    /// `Name(args)`, `Object.Name(args)` or
    /// `Object.Behavior::Name(args)`.
    fn scan_call(&mut self, start: usize) -> Result<ExprNode, ParseError> {
        let first = self.scan_identifier();

        let (kind, name, mut params, name_pos) = if self.peek() == Some('.') {
            self.bump();
            let second_pos = self.pos;
            let second = self.expect_identifier()?;
            if self.peek() == Some(':') && self.peek_at(1) == Some(':') {
                self.bump();
                self.bump();
                let third_pos = self.pos;
                let third = self.expect_identifier()?;
                (
                    CallKind::Behavior,
                    third,
                    vec![Expression::new(first), Expression::new(second)],
                    third_pos,
                )
            } else {
                (
                    CallKind::Object,
                    second,
                    vec![Expression::new(first)],
                    second_pos,
                )
            }
        } else {
            (CallKind::Static, first, Vec::new(), start)
        };

        if self.peek() != Some('(') {
            return Err(ParseError::ExpectedCall {
                name,
                position: self.pos,
            });
        }
        let open_pos = self.pos;
        self.bump();
        params.extend(self.scan_arguments(open_pos)?);

        let descriptor = self.lookup(kind, &name).ok_or_else(|| {
            ParseError::UnknownFunction {
                name: name.clone(),
                position: name_pos,
            }
        })?;
        self.check_arity(&name, descriptor, params.len(), name_pos)?;

        let span = Span::new(start, self.pos);
        let node_kind = match kind {
            CallKind::Static => ExprNodeKind::StaticCall { name, params },
            CallKind::Object => ExprNodeKind::ObjectCall { name, params },
            CallKind::Behavior => ExprNodeKind::BehaviorCall { name, params },
        };
        Ok(ExprNode::new(node_kind, span))
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        let position = self.pos;
        let name = self.scan_identifier();
        if name.is_empty() {
            return Err(ParseError::UnexpectedCharacter {
                ch: self.peek().unwrap_or(' '),
                position,
            });
        }
        Ok(name)
    }

    fn scan_identifier(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }

    /// Arguments between an already-consumed `(` and its matching `)`,
    /// split at top-level commas with the raw text preserved (trimmed).
    fn scan_arguments(&mut self, open_pos: usize) -> Result<Vec<Expression>, ParseError> {
        let inner_start = self.pos;
        let inner_end = self.scan_balanced(open_pos)?;
        let inner = &self.src[inner_start..inner_end];
        if inner.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut args = Vec::new();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut seg_start = 0usize;
        for (i, c) in inner.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' if in_string => escaped = true,
                '"' => in_string = !in_string,
                '(' if !in_string => depth += 1,
                ')' if !in_string => depth = depth.saturating_sub(1),
                ',' if !in_string && depth == 0 => {
                    args.push(Expression::new(inner[seg_start..i].trim()));
                    seg_start = i + 1;
                }
                _ => {}
            }
        }
        args.push(Expression::new(inner[seg_start..].trim()));
        Ok(args)
    }

    fn lookup(&self, kind: CallKind, name: &str) -> Option<&'a FunctionDescriptor> {
        match kind {
            CallKind::Static => self.registry.function(self.grammar, name),
            CallKind::Object => self.registry.object_function(self.grammar, name),
            CallKind::Behavior => self.registry.behavior_function(self.grammar, name),
        }
    }

    /// Supplied parameter count (object/behavior slots included) must
    /// match the declared specs. Overrides decide for themselves.
    fn check_arity(
        &self,
        name: &str,
        descriptor: &FunctionDescriptor,
        got: usize,
        position: usize,
    ) -> Result<(), ParseError> {
        match &descriptor.codegen {
            FunctionCodeGen::Standard { parameters, .. } if parameters.len() != got => {
                Err(ParseError::WrongArgCount {
                    name: name.to_string(),
                    expected: parameters.len(),
                    got,
                    position,
                })
            }
            _ => Ok(()),
        }
    }
}
