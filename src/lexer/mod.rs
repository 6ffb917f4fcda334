//! Module for turning NaC source text into tokens.
//!
//! The lexer is an on-demand cursor: `current` inspects the token under the
//! cursor and `advance` scans the next one out of the character buffer.

mod token;

pub use self::token::*;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::diagnostics::Diagnostics;
use crate::limits::MAX_STRING_LEN;

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("fn", TokenKind::Fn);
    m.insert("rn", TokenKind::Rn);
    m.insert("if", TokenKind::If);
    m.insert("for", TokenKind::For);
    m.insert("while", TokenKind::While);
    m.insert("in", TokenKind::In);
    m.insert("out", TokenKind::Out);
    m.insert("time", TokenKind::Time);
    m.insert("break", TokenKind::Break);
    m.insert("continue", TokenKind::Continue);
    m.insert("array", TokenKind::Array);
    m.insert("http", TokenKind::Http);
    m
});

#[derive(Debug, Clone)]
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    current: Token,
}

impl Lexer {
    /// Create a lexer over the given source, positioned at the first token.
    /// A leading byte order mark is skipped.
    pub fn new(source: &str, diagnostics: &mut Diagnostics) -> Self {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);

        let mut lexer = Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            current: Token {
                kind: TokenKind::Eof,
                position: (1, 1),
            },
        };
        lexer.advance(diagnostics);
        lexer
    }

    /// The token under the cursor.
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Scan the next token out of the buffer. Unknown characters are
    /// reported, skipped, and scanning continues.
    pub fn advance(&mut self, diagnostics: &mut Diagnostics) {
        // A `-` directly followed by a digit starts a negative literal,
        // unless the token to its left could end an expression.
        let after_expression = self.current.kind.ends_expression();

        loop {
            self.skip_whitespace_and_comments();

            let position = (self.line, self.col);
            let Some(c) = self.peek() else {
                self.current = Token {
                    kind: TokenKind::Eof,
                    position,
                };
                return;
            };

            let starts_number = c.is_ascii_digit()
                || (c == '-'
                    && !after_expression
                    && self.peek_at(1).map_or(false, |next| next.is_ascii_digit()));

            let kind = if starts_number {
                self.scan_number()
            } else if c == '"' {
                self.scan_string()
            } else if c.is_ascii_alphabetic() || c == '_' || c == '$' {
                self.scan_ident()
            } else {
                match self.scan_operator() {
                    Some(kind) => kind,
                    None => {
                        diagnostics.report(position, "Unknown character");
                        self.bump();
                        continue;
                    }
                }
            };

            self.current = Token { kind, position };
            return;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        let mut lexeme = String::new();

        if self.peek() == Some('-') {
            lexeme.push('-');
            self.bump();
        }

        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            lexeme.push(c);
            self.bump();
        }

        if self.peek() == Some('.') {
            lexeme.push('.');
            self.bump();
            while let Some(c) = self.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                lexeme.push(c);
                self.bump();
            }
            TokenKind::Float(lexeme.parse().unwrap_or(0.0))
        } else {
            // Out-of-range literals saturate instead of being rejected.
            let value = lexeme.parse::<f64>().unwrap_or(0.0);
            TokenKind::Int(value as i32)
        }
    }

    fn scan_string(&mut self) -> TokenKind {
        self.bump();

        let mut value = String::new();
        while let Some(c) = self.bump() {
            let c = match c {
                '"' => break,
                '\\' => match self.bump() {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('\\') => '\\',
                    Some('"') => '"',
                    Some(other) => other,
                    None => break,
                },
                other => other,
            };
            // Text past the bound is dropped; the scanner keeps consuming
            // so the closing quote is never mistaken for code.
            if value.len() + c.len_utf8() < MAX_STRING_LEN {
                value.push(c);
            }
        }

        TokenKind::Str(value)
    }

    fn scan_ident(&mut self) -> TokenKind {
        let mut value = String::new();
        if let Some(c) = self.bump() {
            value.push(c);
        }
        while let Some(c) = self.peek() {
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            value.push(c);
            self.bump();
        }

        match KEYWORDS.get(value.as_str()) {
            Some(keyword) => keyword.clone(),
            None => TokenKind::Ident(value),
        }
    }

    fn scan_operator(&mut self) -> Option<TokenKind> {
        let first = self.peek()?;
        let second = self.peek_at(1);

        let (kind, width) = match (first, second) {
            ('+', Some('+')) => (TokenKind::PlusPlus, 2),
            ('+', _) => (TokenKind::Plus, 1),
            ('-', Some('-')) => (TokenKind::MinusMinus, 2),
            ('-', _) => (TokenKind::Minus, 1),
            ('*', _) => (TokenKind::Star, 1),
            ('/', _) => (TokenKind::Slash, 1),
            ('%', _) => (TokenKind::Percent, 1),
            ('=', Some('=')) => (TokenKind::EqEq, 2),
            ('=', _) => (TokenKind::Assign, 1),
            ('!', Some('=')) => (TokenKind::NotEq, 2),
            ('!', _) => (TokenKind::Not, 1),
            ('<', Some('=')) => (TokenKind::Le, 2),
            ('<', _) => (TokenKind::Lt, 1),
            ('>', Some('=')) => (TokenKind::Ge, 2),
            ('>', _) => (TokenKind::Gt, 1),
            ('&', Some('&')) => (TokenKind::AndAnd, 2),
            ('|', Some('|')) => (TokenKind::OrOr, 2),
            (';', _) => (TokenKind::Semicolon, 1),
            (',', _) => (TokenKind::Comma, 1),
            ('(', _) => (TokenKind::LParen, 1),
            (')', _) => (TokenKind::RParen, 1),
            ('{', _) => (TokenKind::LBrace, 1),
            ('}', _) => (TokenKind::RBrace, 1),
            ('[', _) => (TokenKind::LBracket, 1),
            (']', _) => (TokenKind::RBracket, 1),
            (':', _) => (TokenKind::Colon, 1),
            _ => return None,
        };

        for _ in 0..width {
            self.bump();
        }
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> (Vec<TokenKind>, usize) {
        let mut diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new(source, &mut diagnostics);

        let mut kinds = vec![];
        while lexer.current().kind != TokenKind::Eof {
            kinds.push(lexer.current().kind.clone());
            lexer.advance(&mut diagnostics);
        }
        (kinds, diagnostics.error_count())
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (kinds, errors) = lex_all(source);
        assert_eq!(0, errors);
        kinds
    }

    #[test]
    fn test_lex_assignment() {
        assert_eq!(
            vec![
                TokenKind::Ident("foo".into()),
                TokenKind::Assign,
                TokenKind::Int(42),
                TokenKind::Semicolon,
            ],
            kinds("foo = 42;")
        );
    }

    #[test]
    fn test_lex_keywords() {
        assert_eq!(
            vec![
                TokenKind::Fn,
                TokenKind::Rn,
                TokenKind::If,
                TokenKind::For,
                TokenKind::While,
                TokenKind::In,
                TokenKind::Out,
                TokenKind::Time,
                TokenKind::Break,
                TokenKind::Continue,
                TokenKind::Array,
                TokenKind::Http,
            ],
            kinds("fn rn if for while in out time break continue array http")
        );
    }

    #[test]
    fn test_lex_ident_with_keyword_prefix() {
        assert_eq!(
            vec![
                TokenKind::Ident("forest".into()),
                TokenKind::Ident("_tmp".into()),
                TokenKind::Ident("$x1".into()),
            ],
            kinds("forest _tmp $x1")
        );
    }

    #[test]
    fn test_lex_float() {
        assert_eq!(
            vec![TokenKind::Float(3.25), TokenKind::Float(5.0)],
            kinds("3.25 5.")
        );
    }

    #[test]
    fn test_lex_negative_literal_after_operator() {
        assert_eq!(
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Assign,
                TokenKind::Int(-5),
                TokenKind::Semicolon,
            ],
            kinds("x = -5;")
        );
    }

    #[test]
    fn test_lex_minus_after_expression() {
        // `n-1` is a subtraction, not `n` followed by `-1`.
        assert_eq!(
            vec![
                TokenKind::Ident("n".into()),
                TokenKind::Minus,
                TokenKind::Int(1),
            ],
            kinds("n-1")
        );
        assert_eq!(
            vec![
                TokenKind::RParen,
                TokenKind::Minus,
                TokenKind::Int(2),
            ],
            kinds(")-2")
        );
    }

    #[test]
    fn test_lex_negative_in_argument_position() {
        assert_eq!(
            vec![
                TokenKind::LBracket,
                TokenKind::Int(1),
                TokenKind::Comma,
                TokenKind::Int(-2),
                TokenKind::RBracket,
            ],
            kinds("[1, -2]")
        );
    }

    #[test]
    fn test_lex_two_char_operators() {
        assert_eq!(
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
            ],
            kinds("== != <= >= && || ++ --")
        );
    }

    #[test]
    fn test_lex_string_escapes() {
        assert_eq!(
            vec![TokenKind::Str("a\tb\nc\"d\\e q".into())],
            kinds(r#""a\tb\nc\"d\\e \q""#)
        );
    }

    #[test]
    fn test_lex_string_truncation() {
        let long = "x".repeat(2000);
        let (kinds, errors) = lex_all(&format!("\"{long}\" 7"));
        assert_eq!(0, errors);
        assert_eq!(
            vec![TokenKind::Str("x".repeat(MAX_STRING_LEN - 1)), TokenKind::Int(7)],
            kinds
        );
    }

    #[test]
    fn test_lex_comments() {
        assert_eq!(
            vec![TokenKind::Int(1), TokenKind::Int(2)],
            kinds("1 // first\n2 // trailing")
        );
    }

    #[test]
    fn test_lex_unknown_character() {
        let (kinds, errors) = lex_all("a @ b");
        assert_eq!(
            vec![TokenKind::Ident("a".into()), TokenKind::Ident("b".into())],
            kinds
        );
        assert_eq!(1, errors);
    }

    #[test]
    fn test_lex_single_ampersand_is_unknown() {
        let (kinds, errors) = lex_all("1 & 2");
        assert_eq!(vec![TokenKind::Int(1), TokenKind::Int(2)], kinds);
        assert_eq!(1, errors);
    }

    #[test]
    fn test_positions() {
        let mut diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new("x = 1;\n  y = 2;", &mut diagnostics);

        assert_eq!((1, 1), lexer.current().position);
        lexer.advance(&mut diagnostics);
        assert_eq!((1, 3), lexer.current().position);
        lexer.advance(&mut diagnostics);
        assert_eq!((1, 5), lexer.current().position);
        lexer.advance(&mut diagnostics);
        assert_eq!((1, 6), lexer.current().position);
        lexer.advance(&mut diagnostics);
        assert_eq!((2, 3), lexer.current().position);
    }

    #[test]
    fn test_bom_is_skipped() {
        assert_eq!(vec![TokenKind::Int(1)], kinds("\u{feff}1"));
    }
}
