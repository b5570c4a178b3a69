use std::fmt::Display;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TokenKind {
    Illegal,
    Eof,

    Ident,
    Int,
    String,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,

    Equal,
    NotEqual,

    GreaterThan,
    LessThan,

    Comma,
    Colon,
    SemiColon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Illegal => "ILLEGAL",
            Eof => "EOF",
            Ident => "IDENT",
            Int => "INT",
            String => "STRING",
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Bang => "!",
            Asterisk => "*",
            Slash => "/",
            Equal => "==",
            NotEqual => "!=",
            GreaterThan => ">",
            LessThan => "<",
            Comma => ",",
            Colon => ":",
            SemiColon => ";",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Function => "FUNCTION",
            Let => "LET",
            True => "TRUE",
            False => "FALSE",
            If => "IF",
            Else => "ELSE",
            Return => "RETURN",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A token as handed to the parser: its kind plus the exact source text.
///
/// String tokens carry their contents without the surrounding quotes.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: Rc<str>,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<Rc<str>>) -> Self {
        Token {
            kind,
            literal: literal.into(),
        }
    }

    pub fn eof() -> Self {
        Token::new(TokenKind::Eof, "")
    }
}

fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "fn" => Some(TokenKind::Function),
        "let" => Some(TokenKind::Let),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "return" => Some(TokenKind::Return),
        _ => None,
    }
}

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self { input, iter }
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self
            .iter
            .next_if(|(_, ch)| Self::is_letter(*ch) || ch.is_ascii_digit())
            .is_some()
        {}

        let end = self.next_idx();
        let ident = &self.input[start..end];
        Token::new(keywords(ident).unwrap_or(TokenKind::Ident), ident)
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        let end = self.next_idx();
        Token::new(TokenKind::Int, &self.input[start..end])
    }

    fn read_string(&mut self, start: usize) -> Token {
        let content_start = start + 1;
        loop {
            match self.iter.next() {
                Some((end, '"')) => {
                    return Token::new(TokenKind::String, &self.input[content_start..end])
                }
                None => return Token::new(TokenKind::Illegal, &self.input[start..]),
                _ => {}
            }
        }
    }

    /// Consumes `second` if it is the next character, producing `double`,
    /// otherwise produces `single`.
    fn one_or_two(
        &mut self,
        start: usize,
        second: char,
        double: TokenKind,
        single: TokenKind,
    ) -> Token {
        let kind = if self.iter.next_if(|(_, ch)| *ch == second).is_some() {
            double
        } else {
            single
        };
        let end = self.next_idx();
        Token::new(kind, &self.input[start..end])
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.iter.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}

        let (idx, ch) = self.iter.next()?;
        let kind = match ch {
            '=' => return Some(self.one_or_two(idx, '=', TokenKind::Equal, TokenKind::Assign)),
            '!' => return Some(self.one_or_two(idx, '=', TokenKind::NotEqual, TokenKind::Bang)),
            '"' => return Some(self.read_string(idx)),
            ch if Self::is_letter(ch) => return Some(self.read_identifier(idx)),
            ch if ch.is_ascii_digit() => return Some(self.read_number(idx)),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Asterisk),
            '/' => Some(TokenKind::Slash),
            '<' => Some(TokenKind::LessThan),
            '>' => Some(TokenKind::GreaterThan),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::Colon),
            ';' => Some(TokenKind::SemiColon),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            _ => None,
        };

        let end = self.next_idx();
        let literal = &self.input[idx..end];
        Some(Token::new(kind.unwrap_or(TokenKind::Illegal), literal))
    }
}

#[cfg(test)]
mod tests {
    use super::{Token, TokenKind, Tokenizer};

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|token| token.kind).collect()
    }

    #[test]
    fn test_operators_and_delimiters() {
        let input = "=+(){},;";

        let expected_output = vec![
            TokenKind::Assign,
            TokenKind::Plus,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Comma,
            TokenKind::SemiColon,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_program() {
        let input = "let five = 5;
    let add = fn(x, y) {
      x + y;
    };
    let result = add(five, ten);";

        let expected_output = vec![
            Token::new(TokenKind::Let, "let"),
            Token::new(TokenKind::Ident, "five"),
            Token::new(TokenKind::Assign, "="),
            Token::new(TokenKind::Int, "5"),
            Token::new(TokenKind::SemiColon, ";"),
            Token::new(TokenKind::Let, "let"),
            Token::new(TokenKind::Ident, "add"),
            Token::new(TokenKind::Assign, "="),
            Token::new(TokenKind::Function, "fn"),
            Token::new(TokenKind::LParen, "("),
            Token::new(TokenKind::Ident, "x"),
            Token::new(TokenKind::Comma, ","),
            Token::new(TokenKind::Ident, "y"),
            Token::new(TokenKind::RParen, ")"),
            Token::new(TokenKind::LBrace, "{"),
            Token::new(TokenKind::Ident, "x"),
            Token::new(TokenKind::Plus, "+"),
            Token::new(TokenKind::Ident, "y"),
            Token::new(TokenKind::SemiColon, ";"),
            Token::new(TokenKind::RBrace, "}"),
            Token::new(TokenKind::SemiColon, ";"),
            Token::new(TokenKind::Let, "let"),
            Token::new(TokenKind::Ident, "result"),
            Token::new(TokenKind::Assign, "="),
            Token::new(TokenKind::Ident, "add"),
            Token::new(TokenKind::LParen, "("),
            Token::new(TokenKind::Ident, "five"),
            Token::new(TokenKind::Comma, ","),
            Token::new(TokenKind::Ident, "ten"),
            Token::new(TokenKind::RParen, ")"),
            Token::new(TokenKind::SemiColon, ";"),
        ];

        assert_eq!(Tokenizer::new(input).collect::<Vec<_>>(), expected_output)
    }

    #[test]
    fn test_prefix_and_comparison_operators() {
        let input = "
    !-/*5;
    5 < 10 > 5;
    10 == 10;
    10 != 9;
    ";

        let expected_output = vec![
            TokenKind::Bang,
            TokenKind::Minus,
            TokenKind::Slash,
            TokenKind::Asterisk,
            TokenKind::Int,
            TokenKind::SemiColon,
            TokenKind::Int,
            TokenKind::LessThan,
            TokenKind::Int,
            TokenKind::GreaterThan,
            TokenKind::Int,
            TokenKind::SemiColon,
            TokenKind::Int,
            TokenKind::Equal,
            TokenKind::Int,
            TokenKind::SemiColon,
            TokenKind::Int,
            TokenKind::NotEqual,
            TokenKind::Int,
            TokenKind::SemiColon,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_keywords() {
        let input = "if (5 < 10) {
    return true;
    } else {
    return false;
    }";

        let expected_output = vec![
            TokenKind::If,
            TokenKind::LParen,
            TokenKind::Int,
            TokenKind::LessThan,
            TokenKind::Int,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::True,
            TokenKind::SemiColon,
            TokenKind::RBrace,
            TokenKind::Else,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::False,
            TokenKind::SemiColon,
            TokenKind::RBrace,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_strings_arrays_and_hashes() {
        let input = r#""foo bar" [1, 2]; {"a": 1}"#;

        let expected_output = vec![
            Token::new(TokenKind::String, "foo bar"),
            Token::new(TokenKind::LBracket, "["),
            Token::new(TokenKind::Int, "1"),
            Token::new(TokenKind::Comma, ","),
            Token::new(TokenKind::Int, "2"),
            Token::new(TokenKind::RBracket, "]"),
            Token::new(TokenKind::SemiColon, ";"),
            Token::new(TokenKind::LBrace, "{"),
            Token::new(TokenKind::String, "a"),
            Token::new(TokenKind::Colon, ":"),
            Token::new(TokenKind::Int, "1"),
            Token::new(TokenKind::RBrace, "}"),
        ];

        assert_eq!(Tokenizer::new(input).collect::<Vec<_>>(), expected_output)
    }

    #[test]
    fn test_illegal_input() {
        assert_eq!(
            Tokenizer::new("\"open").collect::<Vec<_>>(),
            vec![Token::new(TokenKind::Illegal, "\"open")]
        );
        assert_eq!(
            Tokenizer::new("a @ b").collect::<Vec<_>>(),
            vec![
                Token::new(TokenKind::Ident, "a"),
                Token::new(TokenKind::Illegal, "@"),
                Token::new(TokenKind::Ident, "b"),
            ]
        );
    }

    #[test]
    fn test_identifiers_with_digits() {
        assert_eq!(
            Tokenizer::new("add_2 x1").collect::<Vec<_>>(),
            vec![
                Token::new(TokenKind::Ident, "add_2"),
                Token::new(TokenKind::Ident, "x1"),
            ]
        );
    }
}
