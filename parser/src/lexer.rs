//! FILENAME: parser/src/lexer.rs
//! PURPOSE: Turns formula source text into a stream of Tokens.
//! CONTEXT: One-shot, read-ahead-by-one lexer. Cell references and bare
//! identifiers are lexed into the same `Token::Ident` shape (letters, `$`
//! markers, and trailing digits all preserved verbatim) — the Parser is the
//! one that decides whether an `Ident` denotes a cell reference, a range
//! corner, or a named reference, since that depends on surrounding tokens.

use crate::token::Token;

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            chars: source.chars().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn scan_number(&mut self, first: char) -> Token {
        let mut text = String::new();
        text.push(first);
        while matches!(self.chars.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(self.chars.next().unwrap());
        }
        if matches!(self.chars.peek(), Some('.')) {
            text.push(self.chars.next().unwrap());
            while matches!(self.chars.peek(), Some(c) if c.is_ascii_digit()) {
                text.push(self.chars.next().unwrap());
            }
        }
        Token::Number(text.parse().unwrap_or(0.0))
    }

    fn scan_string(&mut self) -> Token {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            self.chars.next();
            if c == '"' {
                break;
            }
            text.push(c);
        }
        Token::String(text)
    }

    /// Scans an identifier-or-reference token: `$`? letters `$`? digits,
    /// where either the letters or the digits run may be empty.
    fn scan_ident(&mut self, first: char) -> Token {
        let mut text = String::new();
        text.push(first);
        while matches!(self.chars.peek(), Some(c) if c.is_ascii_alphanumeric() || *c == '_' || *c == '$') {
            text.push(self.chars.next().unwrap());
        }
        Token::Ident(text)
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let c = match self.chars.next() {
            Some(c) => c,
            None => return Token::Eof,
        };
        match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '&' => Token::Ampersand,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '"' => self.scan_string(),
            '=' => Token::Equal,
            '<' => match self.chars.peek() {
                Some('>') => {
                    self.chars.next();
                    Token::NotEqual
                }
                Some('=') => {
                    self.chars.next();
                    Token::LessEqual
                }
                _ => Token::Less,
            },
            '>' => match self.chars.peek() {
                Some('=') => {
                    self.chars.next();
                    Token::GreaterEqual
                }
                _ => Token::Greater,
            },
            c if c.is_ascii_digit() => self.scan_number(c),
            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => self.scan_ident(c),
            other => {
                // Unknown character: surface it as a single-character identifier
                // so the parser can report a clean "unexpected token" error
                // rather than the lexer silently swallowing input.
                Token::Ident(other.to_string())
            }
        }
    }

    /// Collects the entire token stream, terminated by `Token::Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let done = tok == Token::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_arithmetic() {
        let toks = Lexer::new("1+2*3").tokenize();
        assert_eq!(
            toks,
            vec![
                Token::Number(1.0),
                Token::Plus,
                Token::Number(2.0),
                Token::Star,
                Token::Number(3.0),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lexes_cell_ref_with_dollars() {
        let toks = Lexer::new("$A$1").tokenize();
        assert_eq!(toks, vec![Token::Ident("$A$1".to_string()), Token::Eof]);
    }

    #[test]
    fn lexes_range() {
        let toks = Lexer::new("A1:B10").tokenize();
        assert_eq!(
            toks,
            vec![
                Token::Ident("A1".to_string()),
                Token::Colon,
                Token::Ident("B10".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lexes_string_literal() {
        let toks = Lexer::new("\"hello\"").tokenize();
        assert_eq!(toks, vec![Token::String("hello".to_string()), Token::Eof]);
    }
}
