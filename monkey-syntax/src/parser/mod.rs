pub mod error;
pub mod expressions;
pub mod statements;

use std::rc::Rc;

use crate::ast::Program;
use crate::lexer::{Token, TokenKind};
pub use error::ParseError;
use statements::parse_statement;

pub struct Parser<'a> {
    iter: std::iter::Peekable<Box<dyn Iterator<Item = Token> + 'a>>,
    /// Kind of the most recently consumed token.
    current: TokenKind,
    /// Braces opened and not yet closed within the current top-level statement.
    depth: usize,
    /// Set once an `EOF` token has been consumed; nothing after it is read.
    finished: bool,
}

impl<'a> Parser<'a> {
    /// Builds a parser over any token source. Running out of tokens is the
    /// same as reading an `EOF` token.
    pub fn new<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = Token>,
        I::IntoIter: 'a,
    {
        let iter: Box<dyn Iterator<Item = Token> + 'a> = Box::new(tokens.into_iter());
        Self {
            iter: iter.peekable(),
            current: TokenKind::Eof,
            depth: 0,
            finished: false,
        }
    }

    pub(crate) fn next_token(&mut self) -> Token {
        let token = if self.finished {
            Token::eof()
        } else {
            self.iter.next().unwrap_or_else(Token::eof)
        };
        match token.kind {
            TokenKind::LBrace => self.depth += 1,
            TokenKind::RBrace => self.depth = self.depth.saturating_sub(1),
            TokenKind::Eof => self.finished = true,
            _ => {}
        }
        self.current = token.kind;
        token
    }

    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        if self.finished {
            return TokenKind::Eof;
        }
        self.iter
            .peek()
            .map(|token| token.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Consumes the next token if it is of the given kind.
    pub(crate) fn next_if(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Rc<str>, ParseError> {
        let token = self.expect_token(TokenKind::Ident)?;
        Ok(token.literal)
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.next_token();
        if token.kind == token_kind {
            Ok(token)
        } else {
            Err(ParseError::unexpected_token(token_kind, token.kind))
        }
    }

    /// Skips past the end of the statement that failed to parse. A `;`
    /// inside braces the statement opened does not end it.
    fn synchronize(&mut self) {
        loop {
            match self.current {
                TokenKind::Eof => break,
                TokenKind::SemiColon if self.depth == 0 => break,
                _ => {
                    self.next_token();
                }
            }
        }
    }

    /// Parses every statement up to the end of input.
    ///
    /// A statement that fails to parse is left out of the program; its
    /// diagnostic is recorded and parsing resumes after the next `;`. The
    /// program should only be evaluated when no diagnostics were produced.
    pub fn parse_program(&mut self) -> (Program, Vec<ParseError>) {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        loop {
            while self.next_if(TokenKind::SemiColon) {}
            if self.peek_kind() == TokenKind::Eof {
                break;
            }

            self.depth = 0;
            match parse_statement(self) {
                Ok(statement) => {
                    statements.push(statement);
                }
                Err(err) => {
                    log::debug!("parse error: {}", err);
                    errors.push(err);
                    self.synchronize();
                }
            }
        }

        (Program { statements }, errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Expression, Identifier, LetStatement, Statement};
    use crate::lexer::{Token, TokenKind};
    use crate::parser::{ParseError, Parser};

    fn parse(input: &str) -> (crate::ast::Program, Vec<ParseError>) {
        crate::parse(input)
    }

    fn test_parsing(tests: Vec<(&str, &str)>) {
        for (input, expected) in tests {
            let (program, errors) = parse(input);

            assert!(errors.is_empty(), "input: {} errors: {:?}", input, errors);
            assert_eq!(program.to_string(), expected)
        }
    }

    fn test_errors(tests: Vec<(&str, Vec<&str>)>) {
        for (input, expected) in tests {
            let (_, errors) = parse(input);
            let errors = errors.iter().map(|err| err.to_string()).collect::<Vec<_>>();

            assert_eq!(errors, expected, "input: {}", input);
        }
    }

    #[test]
    fn test_expression_1() {
        let tests = vec![
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4);\n((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("3 > 5 == false", "((3 > 5) == false)"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_expression_precedence() {
        let tests = vec![
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_call_expression() {
        let tests = vec![
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g))",
            ),
            ("add()", "add()"),
            ("add(1, 2,)", "add(1, 2)"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_index_expression() {
        let tests = vec![
            ("myArray[1 + 1]", "(myArray[(1 + 1)])"),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_literals() {
        let tests = vec![
            ("[]", "[]"),
            ("[1, 2 * 2, 3 + 3]", "[1, (2 * 2), (3 + 3)]"),
            (r#""hello world""#, r#""hello world""#),
            ("{}", "{}"),
            (
                r#"{"one": 1, "two": 2, "three": 3}"#,
                r#"{"one": 1, "two": 2, "three": 3}"#,
            ),
            (
                r#"{"one": 0 + 1, "two": 10 - 8, "three": 15 / 5}"#,
                r#"{"one": (0 + 1), "two": (10 - 8), "three": (15 / 5)}"#,
            ),
            ("{true: 1, 2: 2,}", "{true: 1, 2: 2}"),
            ("{[1]: fn(x) { x }}", "{[1]: fn(x) { x }}"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_conditional() {
        let tests = vec![
            ("if (x < y) { x }", "if (x < y) { x }"),
            ("if (x < y) { x } else { y }", "if (x < y) { x } else { y }"),
            ("if x { 1; 2 } else {}", "if x { 1; 2 } else {}"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_function() {
        let tests = vec![
            ("fn() {};", "fn() {}"),
            ("fn(x) {};", "fn(x) {}"),
            ("fn(x, y, z) { x + y; }", "fn(x, y, z) { (x + y) }"),
            (
                "let getName = fn(person) { person[\"name\"]; };",
                "let getName = fn(person) { (person[\"name\"]) };",
            ),
            (
                "let getName = fn(person) { person[\"name\"] };",
                "let getName = fn(person) { (person[\"name\"]) };",
            ),
            ("fn(x) { x }(5)", "fn(x) { x }(5)"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_let_and_return_statements() {
        let tests = vec![
            ("let x = 5;", "let x = 5;"),
            ("let y = true", "let y = true;"),
            ("let foobar = y;", "let foobar = y;"),
            ("return 5;", "return 5;"),
            ("return x + y", "return (x + y);"),
            ("return;", "return;"),
            ("fn() { return }", "fn() { return; }"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_let_statement_tree() {
        let (program, errors) = parse("let x = y;");

        assert!(errors.is_empty());
        assert_eq!(
            program.statements,
            vec![Statement::Let(LetStatement {
                identifier: Identifier::new("x"),
                value: Expression::Identifier(Identifier::new("y")),
            })]
        );
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let inputs = vec![
            "let add = fn(a, b) { return a + b; }; add(1, 2 * 3)",
            "if (a < b) { a } else { b }; -a * !b",
            r#"let h = {"a": [1, 2][0], true: fn() { 1; 2 }}; h["a"]"#,
            "a\n-b",
            "let f = fn(x) { if (x) { return; } x }; f(1)(2)[3]",
        ];

        for input in inputs {
            let (program, errors) = parse(input);
            assert!(errors.is_empty(), "input: {}", input);

            let rendered = program.to_string();
            let (reparsed, errors) = parse(&rendered);
            assert!(errors.is_empty(), "rendered: {}", rendered);
            assert_eq!(reparsed.to_string(), rendered);
            assert_eq!(reparsed, program);
        }
    }

    #[test]
    fn test_error_messages() {
        let tests = vec![
            ("let = 5;", vec!["expected next token to be IDENT, got = instead"]),
            ("let x 5;", vec!["expected next token to be =, got INT instead"]),
            (
                "let 838383;",
                vec!["expected next token to be IDENT, got INT instead"],
            ),
            ("+5", vec!["no prefix parse function for + found"]),
            ("(1 + 2", vec!["expected next token to be ), got EOF instead"]),
            ("[1, 2 3]", vec!["expected next token to be ], got INT instead"]),
            ("{1 2}", vec!["expected next token to be :, got INT instead"]),
            ("fn(1) {}", vec!["expected next token to be IDENT, got INT instead"]),
            ("if (x) { 1", vec!["expected next token to be }, got EOF instead"]),
            (
                "99999999999999999999",
                vec!["could not parse 99999999999999999999 as integer"],
            ),
        ];

        test_errors(tests)
    }

    #[test]
    fn test_parser_recovers_after_error() {
        let (program, errors) = parse("let = 5; let y = 10; y");

        assert_eq!(errors.len(), 1);
        assert_eq!(program.to_string(), "let y = 10;\ny");
    }

    #[test]
    fn test_error_inside_block_drops_whole_statement() {
        let tests = vec![
            (
                "let f = fn() { let = 1; 2 }; let y = 3;",
                vec!["expected next token to be IDENT, got = instead"],
                "let y = 3;",
            ),
            (
                "if (x) { let a = 1; if (y) { 1 + ; }; 3 }; z",
                vec!["no prefix parse function for ; found"],
                "z",
            ),
            (
                "let h = {1: fn() { let x 2; }}; let y = 3; y",
                vec!["expected next token to be =, got INT instead"],
                "let y = 3;\ny",
            ),
        ];

        for (input, expected_errors, expected_program) in tests {
            let (program, errors) = parse(input);
            let errors = errors.iter().map(|err| err.to_string()).collect::<Vec<_>>();

            assert_eq!(errors, expected_errors, "input: {}", input);
            assert_eq!(program.to_string(), expected_program, "input: {}", input);
        }
    }

    #[test_log::test]
    fn test_parser_reports_independent_errors() {
        let (program, errors) = parse("let x 5; let = 10; let 838383; let z = 1;");
        let errors = errors.iter().map(|err| err.to_string()).collect::<Vec<_>>();

        assert_eq!(
            errors,
            vec![
                "expected next token to be =, got INT instead",
                "expected next token to be IDENT, got = instead",
                "expected next token to be IDENT, got INT instead",
            ]
        );
        assert_eq!(program.to_string(), "let z = 1;");
    }

    #[test]
    fn test_error_on_semicolon_does_not_skip_next_statement() {
        let (program, errors) = parse("let x = ; let y = 2;");

        assert_eq!(
            errors,
            vec![ParseError::NoPrefixFunction(TokenKind::SemiColon)]
        );
        assert_eq!(program.to_string(), "let y = 2;");
    }

    #[test]
    fn test_external_token_source() {
        let tokens = vec![
            Token::new(TokenKind::Ident, "a"),
            Token::new(TokenKind::Plus, "+"),
            Token::new(TokenKind::Int, "1"),
            Token::new(TokenKind::Asterisk, "*"),
            Token::new(TokenKind::Int, "2"),
            Token::eof(),
            Token::new(TokenKind::Ident, "ignored"),
        ];

        let (program, errors) = Parser::new(tokens).parse_program();

        assert!(errors.is_empty());
        assert_eq!(program.to_string(), "(a + (1 * 2))");
    }

    #[test]
    fn test_nothing_is_read_after_eof() {
        let tokens = vec![
            Token::new(TokenKind::Let, "let"),
            Token::new(TokenKind::Ident, "x"),
            Token::eof(),
            Token::new(TokenKind::Ident, "after_eof"),
        ];

        let (program, errors) = Parser::new(tokens).parse_program();

        assert_eq!(
            errors,
            vec![ParseError::unexpected_token(TokenKind::Assign, TokenKind::Eof)]
        );
        assert_eq!(program.to_string(), "");
    }

    #[test]
    fn test_empty_statements_are_skipped() {
        test_parsing(vec![(";;1;;", "1"), ("", "")]);
    }
}
