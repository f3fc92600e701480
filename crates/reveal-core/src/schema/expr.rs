//! Sandboxed expression evaluator for F005 custom validation rules (spec §4.5).
//!
//! ARCHITECTURE: a minimal recursive-descent interpreter over a fixed
//! grammar — literals, `value`, comparisons, `and`/`or`/`not`, `len(...)`,
//! and `match(pattern, value)` for regex. There is no `eval`, no attribute
//! access, no function definition, and no way to reach anything outside the
//! single `value` binding; an expression that doesn't parse as this grammar
//! simply evaluates to `false` rather than erroring (spec §4.5: "a failed or
//! ill-formed expression evaluates to false, not an exception").

use regex::Regex;
use serde_json::Value;

/// Evaluate `expr` with `value` bound to the field's current value. Returns
/// `false` on any parse or type error — this function cannot panic and
/// cannot execute anything beyond the grammar below.
pub fn evaluate(expr: &str, value: &Value) -> bool {
    let tokens = match tokenize(expr) {
        Ok(t) => t,
        Err(_) => return false,
    };
    let mut parser = ExprParser { tokens, pos: 0, value };
    match parser.parse_or() {
        Ok(result) if parser.pos == parser.tokens.len() => result.truthy(),
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Num(f64),
    True,
    False,
    And,
    Or,
    Not,
    LParen,
    RParen,
    Comma,
    Op(&'static str),
}

fn tokenize(src: &str) -> Result<Vec<Token>, ()> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        match c {
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '"' | '\'' => {
                let quote = c;
                let mut s = String::new();
                i += 1;
                while i < chars.len() && chars[i] != quote {
                    s.push(chars[i]);
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(());
                }
                i += 1;
                tokens.push(Token::Str(s));
            }
            '=' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Op("=="));
                i += 2;
            }
            '!' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Op("!="));
                i += 2;
            }
            '<' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Op("<="));
                i += 2;
            }
            '>' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Op(">="));
                i += 2;
            }
            '<' => {
                tokens.push(Token::Op("<"));
                i += 1;
            }
            '>' => {
                tokens.push(Token::Op(">"));
                i += 1;
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                tokens.push(Token::Num(text.parse().map_err(|_| ())?));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                tokens.push(match word.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "true" | "True" => Token::True,
                    "false" | "False" => Token::False,
                    _ => Token::Ident(word),
                });
            }
            _ => return Err(()),
        }
    }
    Ok(tokens)
}

/// An evaluator-internal value: either the bound `value`/literal or a bool
/// result from a comparison.
enum Eval<'a> {
    Json(std::borrow::Cow<'a, Value>),
    Bool(bool),
}

impl Eval<'_> {
    fn truthy(&self) -> bool {
        match self {
            Eval::Bool(b) => *b,
            Eval::Json(v) => match v.as_ref() {
                Value::Bool(b) => *b,
                Value::Null => false,
                Value::String(s) => !s.is_empty(),
                Value::Array(a) => !a.is_empty(),
                Value::Number(n) => n.as_f64().unwrap_or(0.0) != 0.0,
                Value::Object(o) => !o.is_empty(),
            },
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Eval::Json(v) => v.as_f64(),
            Eval::Bool(_) => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Eval::Json(v) => v.as_str(),
            Eval::Bool(_) => None,
        }
    }
}

struct ExprParser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    value: &'a Value,
}

type PResult<'a> = Result<Eval<'a>, ()>;

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn parse_or(&mut self) -> PResult<'a> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            let right = self.parse_and()?;
            left = Eval::Bool(left.truthy() || right.truthy());
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> PResult<'a> {
        let mut left = self.parse_not()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.advance();
            let right = self.parse_not()?;
            left = Eval::Bool(left.truthy() && right.truthy());
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> PResult<'a> {
        if matches!(self.peek(), Some(Token::Not)) {
            self.advance();
            let inner = self.parse_not()?;
            return Ok(Eval::Bool(!inner.truthy()));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> PResult<'a> {
        let left = self.parse_primary()?;
        if let Some(Token::Op(op)) = self.peek().cloned() {
            self.advance();
            let right = self.parse_primary()?;
            return Ok(Eval::Bool(compare(op, &left, &right)));
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> PResult<'a> {
        match self.advance() {
            Some(Token::Str(s)) => Ok(Eval::Json(std::borrow::Cow::Owned(Value::String(s)))),
            Some(Token::Num(n)) => Ok(Eval::Json(std::borrow::Cow::Owned(
                serde_json::json!(n),
            ))),
            Some(Token::True) => Ok(Eval::Json(std::borrow::Cow::Owned(Value::Bool(true)))),
            Some(Token::False) => Ok(Eval::Json(std::borrow::Cow::Owned(Value::Bool(false)))),
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(()),
                }
            }
            Some(Token::Ident(name)) if name == "value" => Ok(Eval::Json(std::borrow::Cow::Borrowed(self.value))),
            Some(Token::Ident(name)) if name == "len" => self.parse_call_len(),
            Some(Token::Ident(name)) if name == "match" => self.parse_call_match(),
            _ => Err(()),
        }
    }

    fn parse_call_len(&mut self) -> PResult<'a> {
        self.expect(Token::LParen)?;
        let arg = self.parse_or()?;
        self.expect(Token::RParen)?;
        let len = match &arg {
            Eval::Json(v) => match v.as_ref() {
                Value::String(s) => s.chars().count(),
                Value::Array(a) => a.len(),
                Value::Object(o) => o.len(),
                _ => return Err(()),
            },
            Eval::Bool(_) => return Err(()),
        };
        Ok(Eval::Json(std::borrow::Cow::Owned(serde_json::json!(len))))
    }

    fn parse_call_match(&mut self) -> PResult<'a> {
        self.expect(Token::LParen)?;
        let pattern_eval = self.parse_or()?;
        self.expect(Token::Comma)?;
        let target_eval = self.parse_or()?;
        self.expect(Token::RParen)?;
        let pattern = pattern_eval.as_str().ok_or(())?;
        let target = target_eval.as_str().unwrap_or_default();
        let re = Regex::new(pattern).map_err(|_| ())?;
        Ok(Eval::Bool(re.is_match(target)))
    }

    fn expect(&mut self, expected: Token) -> Result<(), ()> {
        if self.advance() == Some(expected) {
            Ok(())
        } else {
            Err(())
        }
    }
}

fn compare(op: &str, left: &Eval, right: &Eval) -> bool {
    if let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) {
        return match op {
            "==" => a == b,
            "!=" => a != b,
            "<" => a < b,
            "<=" => a <= b,
            ">" => a > b,
            ">=" => a >= b,
            _ => false,
        };
    }
    if let (Some(a), Some(b)) = (left.as_str(), right.as_str()) {
        return match op {
            "==" => a == b,
            "!=" => a != b,
            "<" => a < b,
            "<=" => a <= b,
            ">" => a > b,
            ">=" => a >= b,
            _ => false,
        };
    }
    false
}
