use crate::ast::{BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement};
use crate::lexer::Lexer;
use crate::token::Token;
use std::fmt;

type Result<T> = std::result::Result<T, ParserError>;

#[derive(Debug, PartialEq)]
pub enum ParserError {
    ExpectedIdentifierToken(Token),
    ExpectedAssign(Token),
    ExpectedOpenParen(Token),
    ExpectedCloseParen(Token),
    ExpectedOpenBrace(Token),
    ExpectedCloseBrace(Token),
    ExpectedCloseBracket(Token),
    ExpectedColon(Token),
    ExpectedComma(Token),
    NoPrefixParseFunction(Token),
    CouldNotParseInteger(String),
    InvalidAssignmentTarget(Expression),
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParserError::ExpectedIdentifierToken(got) => {
                write!(f, "expected next token to be an identifier, got {} instead", got)
            }
            ParserError::ExpectedAssign(got) => expected(f, "=", got),
            ParserError::ExpectedOpenParen(got) => expected(f, "(", got),
            ParserError::ExpectedCloseParen(got) => expected(f, ")", got),
            ParserError::ExpectedOpenBrace(got) => expected(f, "{", got),
            ParserError::ExpectedCloseBrace(got) => expected(f, "}", got),
            ParserError::ExpectedCloseBracket(got) => expected(f, "]", got),
            ParserError::ExpectedColon(got) => expected(f, ":", got),
            ParserError::ExpectedComma(got) => expected(f, ",", got),
            ParserError::NoPrefixParseFunction(token) => {
                write!(f, "no prefix parse function for {} found", token)
            }
            ParserError::CouldNotParseInteger(literal) => {
                write!(f, "could not parse {:?} as integer", literal)
            }
            ParserError::InvalidAssignmentTarget(target) => {
                write!(f, "invalid assignment target: {}", target)
            }
        }
    }
}

fn expected(f: &mut fmt::Formatter, wanted: &str, got: &Token) -> fmt::Result {
    write!(f, "expected next token to be {}, got {} instead", wanted, got)
}

/// Operator binding strengths, loosest to tightest. The derived `Ord`
/// follows declaration order.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    /// =
    Assign,
    /// == !=
    Equals,
    /// < > <= >=
    LessGreater,
    /// + -
    Sum,
    /// * /
    Product,
    /// !x -x +x
    Prefix,
    /// foo(x) and xs[0]
    Call,
}

fn precedence_of(token: &Token) -> Precedence {
    match token {
        Token::Assign => Precedence::Assign,
        Token::Eq | Token::Ne => Precedence::Equals,
        Token::Lt | Token::Gt | Token::Le | Token::Ge => Precedence::LessGreater,
        Token::Plus | Token::Minus => Precedence::Sum,
        Token::Asterisk | Token::Slash => Precedence::Product,
        Token::OpenParen | Token::OpenBracket => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

fn infix_operator(token: &Token) -> Option<InfixOperator> {
    match token {
        Token::Plus => Some(InfixOperator::Plus),
        Token::Minus => Some(InfixOperator::Minus),
        Token::Asterisk => Some(InfixOperator::Asterisk),
        Token::Slash => Some(InfixOperator::Slash),
        Token::Lt => Some(InfixOperator::Lt),
        Token::Gt => Some(InfixOperator::Gt),
        Token::Le => Some(InfixOperator::Le),
        Token::Ge => Some(InfixOperator::Ge),
        Token::Eq => Some(InfixOperator::Eq),
        Token::Ne => Some(InfixOperator::Ne),
        _ => None,
    }
}

/// Parses `input` in one pass, returning the program together with the
/// rendered syntax errors, in source order. A non-empty error list means the
/// program must not be evaluated.
pub fn parse(input: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();
    let errors = parser.errors().iter().map(ToString::to_string).collect();
    (program, errors)
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<ParserError>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        let mut p = Parser {
            lexer,
            cur_token: Token::Eof,
            peek_token: Token::Eof,
            errors: vec![],
        };

        // Read 2 tokens so that cur_token and peek_token are both initialised
        p.next_token();
        p.next_token();

        p
    }

    fn next_token(&mut self) {
        self.cur_token = self.peek_token.clone();
        self.peek_token = self.lexer.next_token();
    }

    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = vec![];

        while self.cur_token != Token::Eof {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => self.errors.push(err),
            }
            self.next_token();
        }

        Program { statements }
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.cur_token {
            Token::Let => self.parse_let_statement(),
            Token::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Result<Statement> {
        let name;

        if let Token::Ident(ident) = self.peek_token.clone() {
            self.next_token();
            name = ident;
        } else {
            return Err(ParserError::ExpectedIdentifierToken(
                self.peek_token.clone(),
            ));
        }

        self.expect_peek(Token::Assign, ParserError::ExpectedAssign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        self.skip_optional_semicolon();

        Ok(Statement::Let(name, value))
    }

    fn parse_return_statement(&mut self) -> Result<Statement> {
        // `return;` and a `return` closing a block carry no value.
        match self.peek_token {
            Token::SemiColon => {
                self.next_token();
                return Ok(Statement::Return(None));
            }
            Token::CloseBrace | Token::Eof => return Ok(Statement::Return(None)),
            _ => {}
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        self.skip_optional_semicolon();

        Ok(Statement::Return(Some(value)))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;

        self.skip_optional_semicolon();

        Ok(Statement::Expression(expression))
    }

    fn parse_expression(&mut self, min_precedence: Precedence) -> Result<Expression> {
        let mut left = self.parse_prefix()?;

        while self.peek_token != Token::SemiColon
            && precedence_of(&self.peek_token) > min_precedence
        {
            left = match &self.peek_token {
                Token::OpenParen => {
                    self.next_token();
                    self.parse_call_expression(left)?
                }
                Token::OpenBracket => {
                    self.next_token();
                    self.parse_index_expression(left)?
                }
                Token::Assign => {
                    self.next_token();
                    self.parse_assign_expression(left)?
                }
                token => match infix_operator(token) {
                    Some(operator) => {
                        self.next_token();
                        self.parse_infix_expression(operator, left)?
                    }
                    None => return Ok(left),
                },
            };
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expression> {
        match self.cur_token.clone() {
            Token::Ident(name) => Ok(Expression::Identifier(name)),
            Token::Int(literal) => literal
                .parse()
                .map(Expression::Integer)
                .map_err(|_| ParserError::CouldNotParseInteger(literal)),
            Token::String(value) => Ok(Expression::String(value)),
            Token::True => Ok(Expression::Boolean(true)),
            Token::False => Ok(Expression::Boolean(false)),
            Token::Bang => self.parse_prefix_expression(PrefixOperator::Bang),
            Token::Minus => self.parse_prefix_expression(PrefixOperator::Minus),
            Token::Plus => self.parse_prefix_expression(PrefixOperator::Plus),
            Token::OpenParen => self.parse_grouped_expression(),
            Token::If => self.parse_if_expression(),
            Token::Function => self.parse_function_literal(),
            Token::OpenBracket => self.parse_array_literal(),
            Token::Hash => self.parse_hash_literal(),
            Token::OpenBrace => Ok(Expression::Block(self.parse_block_statement())),
            token => Err(ParserError::NoPrefixParseFunction(token)),
        }
    }

    fn parse_prefix_expression(&mut self, operator: PrefixOperator) -> Result<Expression> {
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Ok(Expression::Prefix(operator, Box::new(right)))
    }

    fn parse_infix_expression(
        &mut self,
        operator: InfixOperator,
        left: Expression,
    ) -> Result<Expression> {
        let precedence = precedence_of(&self.cur_token);
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Ok(Expression::Infix(operator, Box::new(left), Box::new(right)))
    }

    fn parse_assign_expression(&mut self, target: Expression) -> Result<Expression> {
        let name = match target {
            Expression::Identifier(name) => name,
            other => return Err(ParserError::InvalidAssignmentTarget(other)),
        };

        // Parsing the value at Lowest makes assignment right-associative.
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        Ok(Expression::Assign(name, Box::new(value)))
    }

    fn parse_grouped_expression(&mut self) -> Result<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::CloseParen, ParserError::ExpectedCloseParen)?;
        Ok(expression)
    }

    fn parse_if_expression(&mut self) -> Result<Expression> {
        self.expect_peek(Token::OpenParen, ParserError::ExpectedOpenParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::CloseParen, ParserError::ExpectedCloseParen)?;
        self.expect_peek(Token::OpenBrace, ParserError::ExpectedOpenBrace)?;

        let consequence = self.parse_block_statement();

        let alternative = if self.peek_token == Token::Else {
            self.next_token();
            self.expect_peek(Token::OpenBrace, ParserError::ExpectedOpenBrace)?;
            Some(self.parse_block_statement())
        } else {
            None
        };

        Ok(Expression::If(
            Box::new(condition),
            consequence,
            alternative,
        ))
    }

    fn parse_function_literal(&mut self) -> Result<Expression> {
        self.expect_peek(Token::OpenParen, ParserError::ExpectedOpenParen)?;
        let parameters = self.parse_function_parameters()?;
        self.expect_peek(Token::OpenBrace, ParserError::ExpectedOpenBrace)?;
        let body = self.parse_block_statement();
        Ok(Expression::Function(parameters, body))
    }

    fn parse_function_parameters(&mut self) -> Result<Vec<String>> {
        let mut parameters = vec![];

        if self.peek_token == Token::CloseParen {
            self.next_token();
            return Ok(parameters);
        }

        self.next_token();
        parameters.push(self.parse_identifier_name()?);

        while self.peek_token == Token::Comma {
            self.next_token();
            self.next_token();
            parameters.push(self.parse_identifier_name()?);
        }

        self.expect_peek(Token::CloseParen, ParserError::ExpectedCloseParen)?;

        Ok(parameters)
    }

    fn parse_identifier_name(&mut self) -> Result<String> {
        match &self.cur_token {
            Token::Ident(name) => Ok(name.clone()),
            token => Err(ParserError::ExpectedIdentifierToken(token.clone())),
        }
    }

    fn parse_call_expression(&mut self, function: Expression) -> Result<Expression> {
        let arguments =
            self.parse_expression_list(Token::CloseParen, ParserError::ExpectedCloseParen)?;
        Ok(Expression::Call(Box::new(function), arguments))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Result<Expression> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::CloseBracket, ParserError::ExpectedCloseBracket)?;
        Ok(Expression::Index(Box::new(left), Box::new(index)))
    }

    fn parse_array_literal(&mut self) -> Result<Expression> {
        let elements =
            self.parse_expression_list(Token::CloseBracket, ParserError::ExpectedCloseBracket)?;
        Ok(Expression::Array(elements))
    }

    fn parse_expression_list(
        &mut self,
        end: Token,
        expected: fn(Token) -> ParserError,
    ) -> Result<Vec<Expression>> {
        let mut items = vec![];

        if self.peek_token == end {
            self.next_token();
            return Ok(items);
        }

        self.next_token();
        items.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token == Token::Comma {
            self.next_token();
            self.next_token();
            items.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end, expected)?;

        Ok(items)
    }

    fn parse_hash_literal(&mut self) -> Result<Expression> {
        self.expect_peek(Token::OpenBrace, ParserError::ExpectedOpenBrace)?;

        let mut pairs = vec![];

        while self.peek_token != Token::CloseBrace {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            self.expect_peek(Token::Colon, ParserError::ExpectedColon)?;
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if self.peek_token != Token::CloseBrace {
                self.expect_peek(Token::Comma, ParserError::ExpectedComma)?;
            }
        }

        self.expect_peek(Token::CloseBrace, ParserError::ExpectedCloseBrace)?;

        Ok(Expression::Hash(pairs))
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let mut statements = vec![];

        self.next_token();

        while self.cur_token != Token::CloseBrace && self.cur_token != Token::Eof {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => self.errors.push(err),
            }
            self.next_token();
        }

        BlockStatement { statements }
    }

    fn expect_peek(&mut self, token: Token, expected: fn(Token) -> ParserError) -> Result<()> {
        if self.peek_token != token {
            return Err(expected(self.peek_token.clone()));
        }

        self.next_token();
        Ok(())
    }

    fn skip_optional_semicolon(&mut self) {
        if self.peek_token == Token::SemiColon {
            self.next_token();
        }
    }
}
