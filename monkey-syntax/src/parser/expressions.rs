use super::error::ParseError;
use super::statements::parse_statement;
use crate::ast::{
    BlockStatement, Expression, Identifier, InfixOperationKind, PrefixOperationKind,
};
use crate::lexer::{Token, TokenKind};
use crate::parser::Parser;

#[derive(PartialOrd, PartialEq, Debug, Clone, Copy)]
pub enum Precedence {
    Lowest = 0,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

pub fn precedence_of(token: TokenKind) -> Precedence {
    match token {
        TokenKind::Equal => Precedence::Equals,
        TokenKind::NotEqual => Precedence::Equals,
        TokenKind::LessThan => Precedence::LessGreater,
        TokenKind::GreaterThan => Precedence::LessGreater,
        TokenKind::Plus => Precedence::Sum,
        TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk => Precedence::Product,
        TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

/// Parses the expression starting at the token that was just consumed.
pub type PrefixRule = fn(&mut Parser<'_>, Token) -> Result<Expression, ParseError>;

/// Continues an expression whose left-hand side is already parsed. Receives
/// the operator token, which has already been consumed.
pub type InfixRule = fn(&mut Parser<'_>, Token, Expression) -> Result<Expression, ParseError>;

pub fn prefix_rule(kind: TokenKind) -> Option<PrefixRule> {
    use TokenKind::*;
    match kind {
        Ident => Some(parse_identifier),
        Int => Some(parse_integer_literal),
        String => Some(parse_string_literal),
        True | False => Some(parse_boolean_literal),
        Bang | Minus => Some(parse_prefix_operation),
        LParen => Some(parse_grouped_expression),
        LBracket => Some(parse_array_literal),
        LBrace => Some(parse_hash_literal),
        If => Some(parse_if_expression),
        Function => Some(parse_function_literal),
        Illegal | Eof | Assign | Plus | Asterisk | Slash | Equal | NotEqual | GreaterThan
        | LessThan | Comma | Colon | SemiColon | RParen | RBrace | RBracket | Let | Else
        | Return => None,
    }
}

pub fn infix_rule(kind: TokenKind) -> Option<InfixRule> {
    use TokenKind::*;
    match kind {
        Plus | Minus | Asterisk | Slash | Equal | NotEqual | LessThan | GreaterThan => {
            Some(parse_infix_operation)
        }
        LParen => Some(parse_call_expression),
        LBracket => Some(parse_index_expression),
        Illegal | Eof | Ident | Int | String | Assign | Bang | Comma | Colon | SemiColon
        | RParen | LBrace | RBrace | RBracket | Function | Let | True | False | If | Else
        | Return => None,
    }
}

impl TryFrom<TokenKind> for PrefixOperationKind {
    type Error = ParseError;

    fn try_from(kind: TokenKind) -> Result<Self, Self::Error> {
        match kind {
            TokenKind::Bang => Ok(PrefixOperationKind::Bang),
            TokenKind::Minus => Ok(PrefixOperationKind::Minus),
            _ => Err(ParseError::NoPrefixFunction(kind)),
        }
    }
}

impl TryFrom<TokenKind> for InfixOperationKind {
    type Error = ParseError;

    fn try_from(kind: TokenKind) -> Result<Self, Self::Error> {
        match kind {
            TokenKind::Plus => Ok(InfixOperationKind::Plus),
            TokenKind::Minus => Ok(InfixOperationKind::Minus),
            TokenKind::Asterisk => Ok(InfixOperationKind::Multiply),
            TokenKind::Slash => Ok(InfixOperationKind::Divide),
            TokenKind::Equal => Ok(InfixOperationKind::Equal),
            TokenKind::NotEqual => Ok(InfixOperationKind::NotEqual),
            TokenKind::LessThan => Ok(InfixOperationKind::LessThan),
            TokenKind::GreaterThan => Ok(InfixOperationKind::GreaterThan),
            _ => Err(ParseError::NoInfixFunction(kind)),
        }
    }
}

pub fn parse_expression(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    let token = parser.next_token();
    let Some(prefix) = prefix_rule(token.kind) else {
        return Err(ParseError::NoPrefixFunction(token.kind));
    };
    let mut left_expression = prefix(parser, token)?;

    loop {
        let next_kind = parser.peek_kind();
        if next_kind == TokenKind::SemiColon || precedence >= precedence_of(next_kind) {
            break;
        }

        let Some(infix) = infix_rule(next_kind) else {
            break;
        };
        let operator = parser.next_token();
        left_expression = infix(parser, operator, left_expression)?;
    }

    Ok(left_expression)
}

fn parse_identifier(_parser: &mut Parser, token: Token) -> Result<Expression, ParseError> {
    Ok(Expression::Identifier(Identifier { name: token.literal }))
}

fn parse_integer_literal(_parser: &mut Parser, token: Token) -> Result<Expression, ParseError> {
    token
        .literal
        .parse()
        .map(Expression::IntegerLiteral)
        .map_err(|_| ParseError::InvalidInteger(token.literal.clone()))
}

fn parse_string_literal(_parser: &mut Parser, token: Token) -> Result<Expression, ParseError> {
    Ok(Expression::StringLiteral(token.literal.to_string()))
}

fn parse_boolean_literal(_parser: &mut Parser, token: Token) -> Result<Expression, ParseError> {
    Ok(Expression::BooleanLiteral(token.kind == TokenKind::True))
}

fn parse_prefix_operation(parser: &mut Parser, token: Token) -> Result<Expression, ParseError> {
    let kind = PrefixOperationKind::try_from(token.kind)?;
    Ok(Expression::PrefixOperation(
        kind,
        Box::new(parse_expression(parser, Precedence::Prefix)?),
    ))
}

fn parse_grouped_expression(parser: &mut Parser, _token: Token) -> Result<Expression, ParseError> {
    let expression = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

/// Parses `element (separator element)* separator? terminator`, the opening
/// delimiter having been consumed already.
fn parse_sequence<T>(
    parser: &mut Parser,
    parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
    separator: TokenKind,
    terminator: TokenKind,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();

    loop {
        if parser.next_if(terminator) {
            return Ok(elements);
        }
        elements.push(parse_element(parser)?);

        let next = parser.next_token();
        match next.kind {
            kind if kind == separator => continue,
            kind if kind == terminator => return Ok(elements),
            kind => return Err(ParseError::unexpected_token(terminator, kind)),
        }
    }
}

fn parse_array_literal(parser: &mut Parser, _token: Token) -> Result<Expression, ParseError> {
    let elements = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::Comma,
        TokenKind::RBracket,
    )?;
    Ok(Expression::ArrayLiteral(elements))
}

fn parse_hash_pair(parser: &mut Parser) -> Result<(Expression, Expression), ParseError> {
    let key = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::Colon)?;
    let value = parse_expression(parser, Precedence::Lowest)?;

    Ok((key, value))
}

fn parse_hash_literal(parser: &mut Parser, _token: Token) -> Result<Expression, ParseError> {
    let pairs = parse_sequence(parser, parse_hash_pair, TokenKind::Comma, TokenKind::RBrace)?;
    Ok(Expression::HashLiteral(pairs))
}

fn parse_if_expression(parser: &mut Parser, _token: Token) -> Result<Expression, ParseError> {
    let condition = Box::new(parse_expression(parser, Precedence::Lowest)?);

    parser.expect_token(TokenKind::LBrace)?;
    let consequence = parse_block_statement(parser)?;

    let alternative = if parser.next_if(TokenKind::Else) {
        parser.expect_token(TokenKind::LBrace)?;
        Some(parse_block_statement(parser)?)
    } else {
        None
    };

    Ok(Expression::IfExpression {
        condition,
        consequence,
        alternative,
    })
}

/// Parses the statements of a block whose `{` was already consumed.
fn parse_block_statement(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    let mut statements = Vec::new();

    loop {
        while parser.next_if(TokenKind::SemiColon) {}

        match parser.peek_kind() {
            TokenKind::RBrace => {
                parser.next_token();
                return Ok(BlockStatement { statements });
            }
            TokenKind::Eof => {
                return Err(ParseError::unexpected_token(
                    TokenKind::RBrace,
                    TokenKind::Eof,
                ))
            }
            _ => statements.push(parse_statement(parser)?),
        }
    }
}

fn parse_function_literal(parser: &mut Parser, _token: Token) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_sequence(
        parser,
        |parser| Ok(Identifier::new(parser.parse_ident()?)),
        TokenKind::Comma,
        TokenKind::RParen,
    )?;

    parser.expect_token(TokenKind::LBrace)?;
    let body = parse_block_statement(parser)?;

    Ok(Expression::FunctionLiteral { parameters, body })
}

fn parse_infix_operation(
    parser: &mut Parser,
    token: Token,
    left: Expression,
) -> Result<Expression, ParseError> {
    let kind = InfixOperationKind::try_from(token.kind)?;
    let right = parse_expression(parser, precedence_of(token.kind))?;

    Ok(Expression::InfixOperation(
        kind,
        Box::new(left),
        Box::new(right),
    ))
}

fn parse_call_expression(
    parser: &mut Parser,
    _token: Token,
    left: Expression,
) -> Result<Expression, ParseError> {
    let arguments = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::Comma,
        TokenKind::RParen,
    )?;

    Ok(Expression::CallExpression {
        function: Box::new(left),
        arguments,
    })
}

fn parse_index_expression(
    parser: &mut Parser,
    _token: Token,
    left: Expression,
) -> Result<Expression, ParseError> {
    let index = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RBracket)?;

    Ok(Expression::IndexExpression {
        left: Box::new(left),
        index: Box::new(index),
    })
}
