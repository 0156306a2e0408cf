//! Arithmetic expressions for custom wave formulas.
//!
//! The accepted language is deliberately tiny: numbers, the placeholders
//! `{x}`, `{min_sample}`, `{max_sample}`, `{sample_range}` and
//! `{samples_per_cycle}`, the operators `+ - * / % **`, unary signs and
//! parentheses. Any other character, name or construct is rejected when the
//! expression is compiled.

use std::fmt;

use crate::error::{Result, WaveError};

const MAX_DEPTH: usize = 64;
/// Evaluation and drop both recurse over the tree, so its size is bounded too.
const MAX_NODES: usize = 512;

/// Values substituted for the placeholders at one sample index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormulaInputs {
    pub x: f64,
    pub min_sample: f64,
    pub max_sample: f64,
    pub sample_range: f64,
    pub samples_per_cycle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    X,
    MinSample,
    MaxSample,
    SampleRange,
    SamplesPerCycle,
}

impl Placeholder {
    const ALL: [Placeholder; 5] = [
        Placeholder::X,
        Placeholder::MinSample,
        Placeholder::MaxSample,
        Placeholder::SampleRange,
        Placeholder::SamplesPerCycle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Placeholder::X => "x",
            Placeholder::MinSample => "min_sample",
            Placeholder::MaxSample => "max_sample",
            Placeholder::SampleRange => "sample_range",
            Placeholder::SamplesPerCycle => "samples_per_cycle",
        }
    }

    fn value(self, inputs: &FormulaInputs) -> f64 {
        match self {
            Placeholder::X => inputs.x,
            Placeholder::MinSample => inputs.min_sample,
            Placeholder::MaxSample => inputs.max_sample,
            Placeholder::SampleRange => inputs.sample_range,
            Placeholder::SamplesPerCycle => inputs.samples_per_cycle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Placeholder(Placeholder),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(f64),
    Placeholder(Placeholder),
    Neg(Box<Node>),
    Binary(BinOp, Box<Node>, Box<Node>),
}

impl Node {
    fn eval(&self, inputs: &FormulaInputs) -> f64 {
        match self {
            Node::Number(value) => *value,
            Node::Placeholder(placeholder) => placeholder.value(inputs),
            Node::Neg(inner) => -inner.eval(inputs),
            Node::Binary(op, lhs, rhs) => {
                let (a, b) = (lhs.eval(inputs), rhs.eval(inputs));
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    // Floored modulo: the result takes the sign of the divisor.
                    BinOp::Rem => a - b * (a / b).floor(),
                    BinOp::Pow => a.powf(b),
                }
            }
        }
    }
}

/// A compiled custom formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Node,
}

impl Expression {
    pub fn compile(source: &str) -> Result<Self> {
        let unsafe_formula = |reason: String| WaveError::UnsafeFormula {
            formula: source.to_string(),
            reason,
        };
        let tokens = Lexer::new(source).tokenize().map_err(unsafe_formula)?;
        let root = Parser::new(tokens).parse().map_err(unsafe_formula)?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    pub fn eval(&self, inputs: &FormulaInputs) -> f64 {
        self.root.eval(inputs)
    }

    /// The formula text with every placeholder replaced by its current value.
    pub fn substitute(&self, inputs: &FormulaInputs) -> String {
        Placeholder::ALL.iter().fold(self.source.clone(), |text, placeholder| {
            text.replace(
                &format!("{{{}}}", placeholder.name()),
                &placeholder.value(inputs).to_string(),
            )
        })
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn tokenize(&mut self) -> std::result::Result<Vec<Token>, String> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek() {
            let start = self.pos;
            self.pos += 1;
            let token = match ch {
                ch if ch.is_ascii_whitespace() => continue,
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' if self.peek() == Some('*') => {
                    self.pos += 1;
                    Token::StarStar
                }
                '*' => Token::Star,
                '/' => Token::Slash,
                '%' => Token::Percent,
                '(' => Token::LParen,
                ')' => Token::RParen,
                '{' => self.lex_placeholder(start)?,
                '0'..='9' | '.' => self.lex_number(start)?,
                other => return Err(format!("unexpected '{}' at position {}", other, start)),
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn lex_placeholder(&mut self, start: usize) -> std::result::Result<Token, String> {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => {
                    name.push(ch);
                    self.pos += 1;
                }
                _ => return Err(format!("unterminated placeholder at position {}", start)),
            }
        }
        Placeholder::ALL
            .iter()
            .find(|placeholder| placeholder.name() == name)
            .map(|&placeholder| Token::Placeholder(placeholder))
            .ok_or_else(|| format!("unknown placeholder {{{}}}", name))
    }

    fn lex_number(&mut self, start: usize) -> std::result::Result<Token, String> {
        while let Some(ch) = self.peek() {
            let exponent_sign = (ch == '+' || ch == '-')
                && matches!(self.chars.get(self.pos - 1), Some('e') | Some('E'));
            if ch.is_ascii_digit() || ch == '.' || ch == 'e' || ch == 'E' || exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| format!("invalid number '{}' at position {}", text, start))
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    nodes: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            nodes: 0,
        }
    }

    fn parse(mut self) -> std::result::Result<Node, String> {
        if self.tokens.is_empty() {
            return Err("empty formula".to_string());
        }
        let node = self.parse_sum()?;
        match self.peek() {
            None => Ok(node),
            Some(token) => Err(format!("unexpected {:?} after expression", token)),
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_sum(&mut self) -> std::result::Result<Node, String> {
        let mut node = self.parse_product()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(node),
            };
            self.advance();
            let rhs = self.parse_product()?;
            node = self.push(Node::Binary(op, Box::new(node), Box::new(rhs)))?;
        }
    }

    fn parse_product(&mut self) -> std::result::Result<Node, String> {
        let mut node = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::Percent) => BinOp::Rem,
                _ => return Ok(node),
            };
            self.advance();
            let rhs = self.parse_unary()?;
            node = self.push(Node::Binary(op, Box::new(node), Box::new(rhs)))?;
        }
    }

    fn parse_unary(&mut self) -> std::result::Result<Node, String> {
        self.enter()?;
        let node = match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                let inner = self.parse_unary()?;
                self.push(Node::Neg(Box::new(inner)))?
            }
            Some(Token::Plus) => {
                self.advance();
                self.parse_unary()?
            }
            _ => self.parse_power()?,
        };
        self.depth -= 1;
        Ok(node)
    }

    /// `**` binds tighter than a unary sign on its left and is right associative.
    fn parse_power(&mut self) -> std::result::Result<Node, String> {
        let base = self.parse_atom()?;
        if self.peek() == Some(Token::StarStar) {
            self.advance();
            let exponent = self.parse_unary()?;
            return self.push(Node::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> std::result::Result<Node, String> {
        match self.advance() {
            Some(Token::Number(value)) => self.push(Node::Number(value)),
            Some(Token::Placeholder(placeholder)) => self.push(Node::Placeholder(placeholder)),
            Some(Token::LParen) => {
                let node = self.parse_sum()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(node),
                    _ => Err("missing closing parenthesis".to_string()),
                }
            }
            Some(token) => Err(format!("unexpected {:?}", token)),
            None => Err("unexpected end of formula".to_string()),
        }
    }

    fn push(&mut self, node: Node) -> std::result::Result<Node, String> {
        self.nodes += 1;
        if self.nodes > MAX_NODES {
            return Err(format!("more than {} terms and operators", MAX_NODES));
        }
        Ok(node)
    }

    fn enter(&mut self) -> std::result::Result<(), String> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(format!("nesting deeper than {}", MAX_DEPTH));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUTS: FormulaInputs = FormulaInputs {
        x: 3.0,
        min_sample: -10.0,
        max_sample: 10.0,
        sample_range: 20.0,
        samples_per_cycle: 4.0,
    };

    fn eval(source: &str) -> f64 {
        Expression::compile(source).unwrap().eval(&INPUTS)
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval("1 + 2 * 3"), 7.0);
        assert_eq!(eval("(1 + 2) * 3"), 9.0);
        assert_eq!(eval("10 - 4 - 3"), 3.0);
        assert_eq!(eval("2 ** 3 ** 2"), 512.0);
        assert_eq!(eval("-2 ** 2"), -4.0);
        assert_eq!(eval("2 ** -1"), 0.5);
        assert_eq!(eval("1.5e2 + .5"), 150.5);
    }

    #[test]
    fn modulo_follows_the_divisor_sign() {
        assert_eq!(eval("7 % 3"), 1.0);
        assert_eq!(eval("-7 % 3"), 2.0);
        assert_eq!(eval("7 % -3"), -2.0);
    }

    #[test]
    fn placeholders_take_current_values() {
        assert_eq!(eval("{x} * {max_sample}"), 30.0);
        assert_eq!(eval("{min_sample} + {sample_range} / {samples_per_cycle}"), -5.0);
    }

    #[test]
    fn substitution_for_traces() {
        let expression = Expression::compile("{x} ** 2 + {min_sample}").unwrap();
        assert_eq!(expression.substitute(&INPUTS), "3 ** 2 + -10");
    }

    #[test]
    fn rejects_anything_outside_the_grammar() {
        for source in [
            "",
            "__import__('os').system('ls')",
            "sin({x})",
            "{y} + 1",
            "{x",
            "1 +",
            "(1 + 2",
            "1 2",
            "{x} // 2",
            "1..2",
            "[1]",
            "x",
        ] {
            assert!(
                matches!(Expression::compile(source), Err(WaveError::UnsafeFormula { .. })),
                "accepted {:?}",
                source
            );
        }
    }

    #[test]
    fn rejects_runaway_nesting() {
        let source = format!("{}1{}", "(".repeat(500), ")".repeat(500));
        assert!(matches!(
            Expression::compile(&source),
            Err(WaveError::UnsafeFormula { .. })
        ));
    }

    #[test]
    fn rejects_overlong_operator_chains() {
        for source in [
            format!("1{}", " + 1".repeat(20_000)),
            format!("{{x}}{}", " * 2 % 7".repeat(5_000)),
            format!("{}1", "-".repeat(60).repeat(100)),
        ] {
            assert!(matches!(
                Expression::compile(&source),
                Err(WaveError::UnsafeFormula { .. })
            ));
        }
        assert_eq!(eval(&format!("1{}", " + 1".repeat(200))), 201.0);
    }

    #[test]
    fn any_ascii_whitespace_separates_tokens() {
        assert_eq!(eval("{x}\n  * 2\r\n\t+ 1"), 7.0);
    }
}
