pub mod ast;
pub mod lexer;
pub mod parser;

/// Tokenizes and parses `input`, returning the program together with every
/// diagnostic found along the way.
pub fn parse(input: &str) -> (ast::Program, Vec<parser::ParseError>) {
    parser::Parser::new(lexer::Tokenizer::new(input)).parse_program()
}
