//! Native-dialect JSONPath parser.
//!
//! Accepts the bracket/dot grammar used by in-browser JSONPath libraries plus
//! dot-quoted member access (`."some key"`), which is how structural paths
//! render keys that are not plain identifiers.

use crate::types::*;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Expected root identifier '$' at start")]
    ExpectedRoot,
    #[error("Unexpected character: {0}")]
    UnexpectedChar(char),
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    #[error("Invalid escape sequence")]
    InvalidEscape,
    #[error("Invalid number")]
    InvalidNumber,
    #[error("Unclosed string")]
    UnclosedString,
    #[error("Invalid selector")]
    InvalidSelector,
    #[error("Expression nested too deeply")]
    TooDeep,
}

/// Bound on nested filters, parentheses, negations and function calls.
const MAX_NESTING: usize = 128;

struct ComparisonToken {
    operator: ComparisonOperator,
    len: usize,
}

/// JSONPath parser.
pub struct JsonPathParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> JsonPathParser<'a> {
    /// Parse a JSONPath expression.
    pub fn parse(input: &'a str) -> Result<JSONPath, ParseError> {
        Self::parse_with_position(input).map_err(|(error, _)| error)
    }

    /// Parse a JSONPath expression, reporting the byte offset where parsing failed.
    pub fn parse_with_position(input: &'a str) -> Result<JSONPath, (ParseError, usize)> {
        let mut parser = Self {
            input,
            pos: 0,
            depth: 0,
        };
        match parser.parse_path() {
            Ok(path) => Ok(path),
            Err(error) => Err((error, parser.pos)),
        }
    }

    fn parse_path(&mut self) -> Result<JSONPath, ParseError> {
        if self.peek() != Some('$') {
            return Err(ParseError::ExpectedRoot);
        }
        self.advance();

        let segments = self.parse_segments(false)?;
        if let Some(c) = self.peek() {
            return Err(ParseError::UnexpectedChar(c));
        }
        Ok(JSONPath::new(segments))
    }

    /// Parse `.name`, `..name`, `[...]` segments until something else shows up.
    ///
    /// Inside a filter the segment list also ends at whitespace, operators and
    /// closing brackets.
    fn parse_segments(&mut self, in_filter: bool) -> Result<Vec<PathSegment>, ParseError> {
        let mut segments = Vec::new();

        loop {
            if in_filter && self.is_filter_path_terminator() {
                break;
            }
            match self.peek() {
                Some('.') => {
                    self.advance();
                    if self.peek() == Some('.') {
                        self.advance();
                        let selector = self.parse_recursive_selector()?;
                        segments.push(PathSegment::new(vec![selector], true));
                    } else {
                        let selector = self.parse_dot_selector()?;
                        segments.push(PathSegment::new(vec![selector], false));
                    }
                }
                Some('[') => {
                    let selectors = self.parse_bracket_selectors()?;
                    segments.push(PathSegment::new(selectors, false));
                }
                _ => break,
            }
        }

        Ok(segments)
    }

    fn parse_dot_selector(&mut self) -> Result<Selector, ParseError> {
        match self.peek() {
            Some('*') => {
                self.advance();
                Ok(Selector::Wildcard)
            }
            Some('\'') | Some('"') => Ok(Selector::Name(self.parse_string()?)),
            _ => Ok(Selector::Name(self.parse_identifier()?)),
        }
    }

    fn parse_recursive_selector(&mut self) -> Result<Selector, ParseError> {
        if self.peek() == Some('[') {
            let selectors = self.parse_bracket_selectors()?;
            // `..[a,b]` keeps only the first selector
            return selectors
                .into_iter()
                .next()
                .ok_or(ParseError::InvalidSelector);
        }
        self.parse_dot_selector()
    }

    fn parse_bracket_selectors(&mut self) -> Result<Vec<Selector>, ParseError> {
        self.expect('[')?;
        let mut selectors = Vec::new();

        loop {
            self.skip_whitespace();
            let selector = self.parse_bracket_selector()?;
            selectors.push(selector);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.advance(),
                Some(']') => {
                    self.advance();
                    break;
                }
                Some(c) => return Err(ParseError::UnexpectedChar(c)),
                None => return Err(ParseError::UnexpectedEnd),
            }
        }

        Ok(selectors)
    }

    fn parse_bracket_selector(&mut self) -> Result<Selector, ParseError> {
        match self.peek() {
            Some('\'') | Some('"') => Ok(Selector::Name(self.parse_string()?)),
            Some('*') => {
                self.advance();
                Ok(Selector::Wildcard)
            }
            Some(':') | Some('-') | Some('0'..='9') => self.parse_index_or_slice(),
            Some('?') => {
                self.advance();
                // `[?(...)]` parses as a parenthesized expression, `[?...]` directly
                let expr = self.nested(Self::parse_filter_expression)?;
                Ok(Selector::Filter(expr))
            }
            None => Err(ParseError::UnexpectedEnd),
            _ => Err(ParseError::InvalidSelector),
        }
    }

    fn parse_index_or_slice(&mut self) -> Result<Selector, ParseError> {
        let start = self.parse_optional_number()?;
        self.skip_whitespace();

        if self.peek() == Some(':') {
            self.advance();
            let end = self.parse_optional_number()?;
            self.skip_whitespace();

            let step = if self.peek() == Some(':') {
                self.advance();
                self.parse_optional_number()?
            } else {
                None
            };

            Ok(Selector::Slice { start, end, step })
        } else {
            start.map(Selector::Index).ok_or(ParseError::InvalidNumber)
        }
    }

    fn parse_optional_number(&mut self) -> Result<Option<isize>, ParseError> {
        self.skip_whitespace();
        if matches!(self.peek(), Some('0'..='9') | Some('-')) {
            Ok(Some(self.parse_number()?))
        } else {
            Ok(None)
        }
    }

    fn parse_number(&mut self) -> Result<isize, ParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }

        self.input[start..self.pos]
            .parse::<isize>()
            .map_err(|_| ParseError::InvalidNumber)
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let start = self.pos;

        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(match self.peek() {
                Some(c) => ParseError::UnexpectedChar(c),
                None => ParseError::UnexpectedEnd,
            });
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let quote = self.peek().ok_or(ParseError::UnexpectedEnd)?;
        self.advance();

        let mut result = String::new();

        loop {
            match self.peek() {
                None => return Err(ParseError::UnclosedString),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('\\') => result.push('\\'),
                        Some('\'') => result.push('\''),
                        Some('"') => result.push('"'),
                        Some('/') => result.push('/'),
                        _ => return Err(ParseError::InvalidEscape),
                    }
                    self.advance();
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }

        Ok(result)
    }

    fn parse_filter_expression(&mut self) -> Result<FilterExpression, ParseError> {
        self.parse_logical_or_expression()
    }

    fn parse_logical_or_expression(&mut self) -> Result<FilterExpression, ParseError> {
        let mut left = self.parse_logical_and_expression()?;
        self.skip_whitespace();

        while self.peek_str("||") {
            self.advance_by(2);
            let right = self.parse_logical_and_expression()?;
            left = FilterExpression::Logical {
                operator: LogicalOperator::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
            self.skip_whitespace();
        }

        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> Result<FilterExpression, ParseError> {
        let mut left = self.parse_unary_expression()?;
        self.skip_whitespace();

        while self.peek_str("&&") {
            self.advance_by(2);
            let right = self.parse_unary_expression()?;
            left = FilterExpression::Logical {
                operator: LogicalOperator::And,
                left: Box::new(left),
                right: Box::new(right),
            };
            self.skip_whitespace();
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<FilterExpression, ParseError> {
        self.skip_whitespace();

        if self.peek() == Some('!') && !self.peek_str("!=") {
            self.advance();
            let expr = self.nested(Self::parse_unary_expression)?;
            return Ok(FilterExpression::Negation(Box::new(expr)));
        }

        if self.peek() == Some('(') {
            self.advance();
            let expr = self.nested(|parser| {
                let expr = parser.parse_filter_expression()?;
                parser.skip_whitespace();
                parser.expect(')')?;
                Ok(expr)
            })?;
            return Ok(FilterExpression::Paren(Box::new(expr)));
        }

        self.parse_primary_expression()
    }

    fn parse_primary_expression(&mut self) -> Result<FilterExpression, ParseError> {
        let left = self.parse_value_expression()?;
        self.skip_whitespace();

        if let Some(op) = self.peek_comparison_operator() {
            self.advance_by(op.len);
            let right = self.parse_value_expression()?;
            return Ok(FilterExpression::Comparison {
                operator: op.operator,
                left,
                right,
            });
        }

        match left {
            ValueExpression::Path(path) | ValueExpression::RootPath(path) => {
                Ok(FilterExpression::Existence { path })
            }
            ValueExpression::Current => Ok(FilterExpression::Existence {
                path: JSONPath::new(vec![]),
            }),
            ValueExpression::Function { name, args } => {
                Ok(FilterExpression::Function { name, args })
            }
            ValueExpression::Literal(_) => Err(ParseError::InvalidSelector),
        }
    }

    fn parse_value_expression(&mut self) -> Result<ValueExpression, ParseError> {
        self.skip_whitespace();

        match self.peek() {
            Some('@') => {
                self.advance();
                if matches!(self.peek(), Some('.') | Some('[')) {
                    let segments = self.parse_segments(true)?;
                    return Ok(ValueExpression::Path(JSONPath::new(segments)));
                }
                Ok(ValueExpression::Current)
            }
            Some('$') => {
                self.advance();
                let segments = self.parse_segments(true)?;
                Ok(ValueExpression::RootPath(JSONPath::new(segments)))
            }
            Some('\'') | Some('"') => {
                let s = self.parse_string()?;
                Ok(ValueExpression::Literal(serde_json::Value::String(s)))
            }
            Some('0'..='9') | Some('-') => {
                let number = self.parse_float_number()?;
                Ok(ValueExpression::Literal(number))
            }
            Some(_) if self.peek_keyword("true") => {
                self.advance_by(4);
                Ok(ValueExpression::Literal(serde_json::Value::Bool(true)))
            }
            Some(_) if self.peek_keyword("false") => {
                self.advance_by(5);
                Ok(ValueExpression::Literal(serde_json::Value::Bool(false)))
            }
            Some(_) if self.peek_keyword("null") => {
                self.advance_by(4);
                Ok(ValueExpression::Literal(serde_json::Value::Null))
            }
            Some('a'..='z') => self.parse_function_call(),
            Some(c) => Err(ParseError::UnexpectedChar(c)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_function_call(&mut self) -> Result<ValueExpression, ParseError> {
        let name = self.parse_function_name();
        self.skip_whitespace();
        self.expect('(')?;
        self.skip_whitespace();

        let mut args = Vec::new();
        if self.peek() != Some(')') {
            loop {
                args.push(self.nested(Self::parse_value_expression)?);
                self.skip_whitespace();
                if self.peek() == Some(',') {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.skip_whitespace();
        self.expect(')')?;
        Ok(ValueExpression::Function { name, args })
    }

    fn is_filter_path_terminator(&self) -> bool {
        match self.peek() {
            None => true,
            Some(c) if c.is_whitespace() => true,
            Some(')') | Some(',') | Some(']') | Some('<') | Some('>') => true,
            Some('&') => self.peek_str("&&"),
            Some('|') => self.peek_str("||"),
            Some('=') => self.peek_str("=="),
            Some('!') => self.peek_str("!="),
            _ => false,
        }
    }

    /// Run `f` one nesting level deeper, failing once the bound is reached.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep);
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    /// Keyword literal not followed by an identifier character.
    fn peek_keyword(&self, word: &str) -> bool {
        self.peek_str(word)
            && !self.input[self.pos + word.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
    }

    fn parse_function_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn parse_float_number(&mut self) -> Result<serde_json::Value, ParseError> {
        let start = self.pos;

        if self.peek() == Some('-') {
            self.advance();
        }

        if !matches!(self.peek(), Some('0'..='9')) {
            return Err(ParseError::InvalidNumber);
        }
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }

        if self.peek() == Some('.') {
            self.advance();
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(ParseError::InvalidNumber);
            }
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(ParseError::InvalidNumber);
            }
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        serde_json::from_str(&self.input[start..self.pos]).map_err(|_| ParseError::InvalidNumber)
    }

    fn peek_comparison_operator(&self) -> Option<ComparisonToken> {
        let (operator, len) = if self.peek_str("==") {
            (ComparisonOperator::Equal, 2)
        } else if self.peek_str("!=") {
            (ComparisonOperator::NotEqual, 2)
        } else if self.peek_str("<=") {
            (ComparisonOperator::LessEqual, 2)
        } else if self.peek_str(">=") {
            (ComparisonOperator::GreaterEqual, 2)
        } else if self.peek_str("<") {
            (ComparisonOperator::Less, 1)
        } else if self.peek_str(">") {
            (ComparisonOperator::Greater, 1)
        } else {
            return None;
        };
        Some(ComparisonToken { operator, len })
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(ParseError::UnexpectedChar(c)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }
}
