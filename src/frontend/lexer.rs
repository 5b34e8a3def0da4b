//! Tokenizer for hebe source text.

use crate::core::{CompileError, CompileResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Create,
    End,
    Save,
    In,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Eof,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Number(v) => format!("number {v}"),
            Token::Ident(name) => format!("identifier '{name}'"),
            Token::Create => "'create'".to_string(),
            Token::End => "'end'".to_string(),
            Token::Save => "'save'".to_string(),
            Token::In => "'in'".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// A token with its 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

/// Split `source` into tokens, always ending with [`Token::Eof`].
pub fn tokenize(source: &str) -> CompileResult<Vec<Spanned>> {
    let mut lexer = Lexer {
        chars: source.chars().peekable(),
        line: 1,
        column: 1,
    };
    let mut tokens = Vec::new();

    loop {
        lexer.skip_trivia();
        let (line, column) = (lexer.line, lexer.column);
        let token = lexer.next_token()?;
        let done = token == Token::Eof;
        tokens.push(Spanned { token, line, column });
        if done {
            break;
        }
    }

    log::trace!("Tokenized {} tokens", tokens.len());
    Ok(tokens)
}

impl<'a> Lexer<'a> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == ';' {
                // Comment until end of line
                while let Some(ch) = self.bump() {
                    if ch == '\n' {
                        break;
                    }
                }
            } else if ch.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn error(&self, line: usize, column: usize, message: String) -> CompileError {
        CompileError::Parse { line, column, message }
    }

    fn next_token(&mut self) -> CompileResult<Token> {
        let (line, column) = (self.line, self.column);
        let Some(ch) = self.peek() else {
            return Ok(Token::Eof);
        };

        let simple = match ch {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        };
        if let Some(token) = simple {
            self.bump();
            return Ok(token);
        }

        if ch.is_ascii_digit() || ch == '.' {
            return self.number(line, column);
        }
        if ch.is_alphabetic() || ch == '_' {
            return Ok(self.word());
        }

        Err(self.error(line, column, format!("unexpected character '{ch}'")))
    }

    fn number(&mut self, line: usize, column: usize) -> CompileResult<Token> {
        let mut text = String::new();
        let mut seen_dot = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                text.push(ch);
            } else {
                break;
            }
            self.bump();
        }

        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| self.error(line, column, format!("invalid number '{text}'")))
    }

    fn word(&mut self) -> Token {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                text.push(ch);
                self.bump();
            } else {
                break;
            }
        }

        match text.to_ascii_lowercase().as_str() {
            "create" => Token::Create,
            "end" => Token::End,
            "save" => Token::Save,
            "in" => Token::In,
            _ => Token::Ident(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            kinds("SAVE 1 In x"),
            vec![Token::Save, Token::Number(1.0), Token::In, Token::Ident("x".to_string()), Token::Eof]
        );
    }

    #[test]
    fn comments_and_positions() {
        let tokens = tokenize("; header\n  42.5 ; trailing\n+").unwrap();
        assert_eq!(tokens[0].token, Token::Number(42.5));
        assert_eq!((tokens[0].line, tokens[0].column), (2, 3));
        assert_eq!(tokens[1].token, Token::Plus);
        assert_eq!((tokens[1].line, tokens[1].column), (3, 1));
    }

    #[test]
    fn lone_dot_is_rejected() {
        let err = tokenize("1 + .").unwrap_err();
        assert!(matches!(err, CompileError::Parse { line: 1, column: 5, .. }));
    }

    #[test]
    fn unexpected_character() {
        let err = tokenize("save 1 in x\n  $").unwrap_err();
        assert!(matches!(err, CompileError::Parse { line: 2, column: 3, .. }));
    }
}
