//! Parse linear objectives and constraints written as text.
//!
//! An objective starts with a sense, `max` or `min`, followed by a sum of terms: `max 4x + y + 4z`.
//! A constraint is a sum of terms, a comparator and a constant bound: `2x + y + z <= 2`.
//! A term is an optional sign, an optional coefficient and a variable name, for example
//! `-3/4*z` or `0.5y`. Coefficients are parsed exactly and then embedded in the field.

use std::{iter::Peekable, str::CharIndices};

use rug::{Integer, Rational};
use smallvec::SmallVec;

use crate::{
    domains::Field,
    optimize::linear_program::{Comparator, ConstraintFunction, ObjectiveFunction, Sense, Variable},
};

/// An error in the textual input, with the byte position where it was detected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

impl ParseError {
    fn new(position: usize, message: impl Into<String>) -> ParseError {
        ParseError {
            position,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error at position {}: {}", self.position, self.message)
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(Rational),
    Identifier(Variable),
    Plus,
    Minus,
    Mul,
    Comparator(Comparator),
}

type TokenList = SmallVec<[(usize, Token); 32]>;

fn read_digits(chars: &mut Peekable<CharIndices>, out: &mut String) {
    while let Some(&(_, c)) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        out.push(c);
        chars.next();
    }
}

/// Read a number of the form `123`, `1.25`, `.5` or `3/4`.
fn read_number(chars: &mut Peekable<CharIndices>, start: usize) -> Result<Rational, ParseError> {
    let mut digits = String::new();
    read_digits(chars, &mut digits);

    let mut n_frac = 0;
    if let Some(&(_, '.')) = chars.peek() {
        chars.next();
        let len = digits.len();
        read_digits(chars, &mut digits);
        n_frac = (digits.len() - len) as u32;
    }

    if digits.is_empty() {
        return Err(ParseError::new(start, "invalid number"));
    }

    let num = Integer::from_str_radix(&digits, 10)
        .map_err(|e| ParseError::new(start, format!("invalid number: {}", e)))?;
    let mut r = Rational::from((num, Integer::from(Integer::u_pow_u(10, n_frac))));

    if let Some(&(pos, '/')) = chars.peek() {
        chars.next();
        let mut den = String::new();
        read_digits(chars, &mut den);
        let den = Integer::from_str_radix(&den, 10)
            .map_err(|_| ParseError::new(pos, "expected a denominator"))?;
        if den == 0 {
            return Err(ParseError::new(pos, "division by zero"));
        }
        r /= den;
    }

    Ok(r)
}

fn tokenize(input: &str) -> Result<TokenList, ParseError> {
    let mut tokens = TokenList::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            '+' | '-' | '*' | '≤' | '≥' => {
                chars.next();
                tokens.push((
                    pos,
                    match c {
                        '+' => Token::Plus,
                        '-' => Token::Minus,
                        '*' => Token::Mul,
                        '≤' => Token::Comparator(Comparator::LessEqual),
                        _ => Token::Comparator(Comparator::GreaterEqual),
                    },
                ));
            }
            '<' | '>' | '=' => {
                chars.next();
                let or_equal = matches!(chars.peek(), Some((_, '=')));
                if or_equal {
                    chars.next();
                }

                let comparator = match (c, or_equal) {
                    ('<', true) => Comparator::LessEqual,
                    ('<', false) => Comparator::Less,
                    ('>', true) => Comparator::GreaterEqual,
                    ('>', false) => Comparator::Greater,
                    _ => Comparator::Equal,
                };
                tokens.push((pos, Token::Comparator(comparator)));
            }
            c if c.is_ascii_digit() || c == '.' => {
                tokens.push((pos, Token::Number(read_number(&mut chars, pos)?)));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = Variable::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !c.is_alphanumeric() && c != '_' {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                tokens.push((pos, Token::Identifier(name)));
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => return Err(ParseError::new(pos, format!("unexpected character '{}'", c))),
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [(usize, Token)],
    pos: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let t = self.peek();
        self.pos += 1;
        t
    }

    /// The byte position of the current token.
    fn position(&self) -> usize {
        self.tokens.get(self.pos).map(|(p, _)| *p).unwrap_or(self.end)
    }

    /// Parse a sum of terms `[+-] [coeff [*]] name`.
    fn sum(&mut self) -> Result<Vec<(Variable, Rational)>, ParseError> {
        let mut terms = vec![];

        loop {
            let negative = match self.peek() {
                Some(Token::Minus) => {
                    self.pos += 1;
                    true
                }
                Some(Token::Plus) => {
                    self.pos += 1;
                    false
                }
                _ if terms.is_empty() => false,
                _ => break,
            };

            let mut coeff = match self.peek() {
                Some(Token::Number(n)) => {
                    self.pos += 1;
                    if let Some(Token::Mul) = self.peek() {
                        self.pos += 1;
                    }
                    n.clone()
                }
                _ => Rational::from(1),
            };
            if negative {
                coeff = -coeff;
            }

            let position = self.position();
            match self.next() {
                Some(Token::Identifier(name)) => terms.push((name.clone(), coeff)),
                _ => return Err(ParseError::new(position, "expected a variable")),
            }
        }

        Ok(terms)
    }

    /// Parse an optionally signed constant.
    fn constant(&mut self) -> Result<Rational, ParseError> {
        let negative = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                true
            }
            Some(Token::Plus) => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        let position = self.position();
        match self.next() {
            Some(Token::Number(n)) if negative => Ok(Rational::from(-n)),
            Some(Token::Number(n)) => Ok(n.clone()),
            _ => Err(ParseError::new(position, "expected a number")),
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        if self.pos < self.tokens.len() {
            Err(ParseError::new(self.position(), "unexpected trailing input"))
        } else {
            Ok(())
        }
    }
}

impl<F: Field> ObjectiveFunction<F> {
    /// Parse an objective such as `max 4x + y + 4z`.
    pub fn parse(input: &str, field: &F) -> Result<ObjectiveFunction<F>, ParseError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            end: input.len(),
        };

        let sense = match parser.next() {
            Some(Token::Identifier(s))
                if s.eq_ignore_ascii_case("max") || s.eq_ignore_ascii_case("maximize") =>
            {
                Sense::Maximize
            }
            Some(Token::Identifier(s))
                if s.eq_ignore_ascii_case("min") || s.eq_ignore_ascii_case("minimize") =>
            {
                Sense::Minimize
            }
            _ => return Err(ParseError::new(0, "expected 'max' or 'min'")),
        };

        let terms = parser.sum()?;
        parser.expect_end()?;

        let mut objective = ObjectiveFunction::new(sense);
        for (name, coeff) in terms {
            objective.add_term(field, &name, field.from_rational(&coeff));
        }
        Ok(objective)
    }
}

impl<F: Field> ConstraintFunction<F> {
    /// Parse a constraint such as `2x + y + z <= 2`.
    pub fn parse(input: &str, field: &F) -> Result<ConstraintFunction<F>, ParseError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            end: input.len(),
        };

        let terms = parser.sum()?;

        let position = parser.position();
        let comparator = match parser.next() {
            Some(Token::Comparator(c)) => *c,
            _ => return Err(ParseError::new(position, "expected a comparator")),
        };

        let bound = parser.constant()?;
        parser.expect_end()?;

        let mut constraint = ConstraintFunction::new(comparator, field.from_rational(&bound));
        for (name, coeff) in terms {
            constraint.add_term(field, &name, field.from_rational(&coeff));
        }
        Ok(constraint)
    }
}
