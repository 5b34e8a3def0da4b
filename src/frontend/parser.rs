//! Recursive-descent parser producing the structured tree.

use super::lexer::{Spanned, Token};
use crate::ast::{BinaryOperator, Node};
use crate::core::{CompileError, CompileResult};

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    /// Token streams not ending with [`Token::Eof`] get one appended after
    /// the last token.
    pub fn new(mut tokens: Vec<Spanned>) -> Self {
        let end = match tokens.last() {
            Some(last) if last.token == Token::Eof => None,
            Some(last) => Some((last.line, last.column)),
            None => Some((1, 1)),
        };
        if let Some((line, column)) = end {
            tokens.push(Spanned {
                token: Token::Eof,
                line,
                column,
            });
        }
        Self { tokens, pos: 0 }
    }

    pub fn parse_program(mut self) -> CompileResult<Node> {
        let mut items = Vec::new();
        while self.peek() != &Token::Eof {
            items.push(self.parse_item()?);
        }
        log::debug!("Parsed program with {} top-level items", items.len());
        Ok(Node::Program(items))
    }

    fn current(&self) -> &Spanned {
        // The lexer always terminates the stream with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.current().token
    }

    fn advance(&mut self) -> Token {
        let token = self.current().token.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> CompileError {
        let at = self.current();
        let message = message.into();
        log::error!("Parse error at {}:{}: {}", at.line, at.column, message);
        CompileError::Parse {
            line: at.line,
            column: at.column,
            message,
        }
    }

    fn expect_ident(&mut self, what: &str) -> CompileResult<String> {
        if let Token::Ident(name) = self.peek() {
            let name = name.clone();
            self.advance();
            return Ok(name);
        }
        Err(self.error(format!("expected {what}, found {}", self.peek().describe())))
    }

    fn parse_item(&mut self) -> CompileResult<Node> {
        match self.peek() {
            Token::Create => self.parse_procedure(),
            Token::Save => self.parse_assignment(),
            Token::Ident(_) => {
                let name = self.expect_ident("procedure name")?;
                Ok(Node::call(name))
            }
            _ => self.parse_expr(),
        }
    }

    fn parse_procedure(&mut self) -> CompileResult<Node> {
        self.advance();
        let name = self.expect_ident("procedure name after 'create'")?;

        let mut items = Vec::new();
        loop {
            match self.peek() {
                Token::End => {
                    self.advance();
                    break;
                }
                Token::Eof => return Err(self.error(format!("procedure {name} is missing 'end'"))),
                _ => items.push(self.parse_item()?),
            }
        }

        Ok(Node::procedure(name, items))
    }

    fn parse_assignment(&mut self) -> CompileResult<Node> {
        self.advance();
        let value = self.parse_expr()?;
        if self.peek() != &Token::In {
            return Err(self.error(format!("expected 'in', found {}", self.peek().describe())));
        }
        self.advance();
        let name = self.expect_ident("variable name after 'in'")?;
        Ok(Node::assign(name, value))
    }

    fn parse_expr(&mut self) -> CompileResult<Node> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_term()?;
            left = Node::binary(op, left, right);
        }
    }

    fn parse_term(&mut self) -> CompileResult<Node> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOperator::Mul,
                Token::Slash => BinaryOperator::Div,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Node::binary(op, left, right);
        }
    }

    fn parse_factor(&mut self) -> CompileResult<Node> {
        match self.peek() {
            &Token::Number(value) => {
                self.advance();
                Ok(Node::number(value))
            }
            Token::Minus => {
                self.advance();
                match self.parse_factor()? {
                    Node::Number(value) => Ok(Node::number(-value)),
                    operand => Ok(Node::binary(BinaryOperator::Sub, Node::number(0.0), operand)),
                }
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                if self.peek() != &Token::RParen {
                    return Err(self.error(format!("expected ')', found {}", self.peek().describe())));
                }
                self.advance();
                Ok(inner)
            }
            other => Err(self.error(format!("expected an expression, found {}", other.describe()))),
        }
    }
}
