//! Side-effect-free evaluation of literal initializers.
//!
//! Accepts the literal subset of the expression grammar: `null`, `undefined`,
//! booleans, numbers (with an optional sign, hex/octal/binary prefixes and
//! numeric separators), quoted strings, array literals and object literals.
//! Anything else is rejected, and callers keep the raw source text instead.

use serde_json::{Map, Number, Value};
use thiserror::Error;
use winnow::{
    Parser, Result as WResult,
    ascii::{digit1, hex_digit1, multispace0},
    combinator::{alt, delimited, fail, not, opt, preceded, separated, terminated},
    token::{any, one_of, take_while},
};

/// Result of evaluating a literal initializer.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Undefined,
    Value(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot evaluate `{text}`: {message}")]
pub struct EvaluationError {
    pub text: String,
    pub message: String,
}

pub fn evaluate(text: &str) -> Result<Constant, EvaluationError> {
    delimited(multispace0, constant, multispace0)
        .parse(text)
        .map_err(|e| EvaluationError {
            text: text.to_string(),
            message: e.to_string(),
        })
}

fn constant(input: &mut &str) -> WResult<Constant> {
    alt((
        keyword("undefined").value(Constant::Undefined),
        value.map(Constant::Value),
    ))
    .parse_next(input)
}

fn value(input: &mut &str) -> WResult<Value> {
    alt((
        keyword("null").value(Value::Null),
        keyword("true").value(Value::Bool(true)),
        keyword("false").value(Value::Bool(false)),
        quoted.map(Value::String),
        array,
        object,
        number.map(Value::Number),
    ))
    .parse_next(input)
}

/// A keyword not followed by an identifier character.
fn keyword<'i>(word: &'static str) -> impl Parser<&'i str, &'i str, winnow::error::ContextError> {
    terminated(word, not(one_of(is_ident_char)))
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn array(input: &mut &str) -> WResult<Value> {
    let _ = ('[', multispace0).parse_next(input)?;
    let items: Vec<Value> = separated(0.., array_item, (multispace0, ',', multispace0))
        .parse_next(input)?;
    let _ = (multispace0, opt(','), multispace0, ']').parse_next(input)?;
    Ok(Value::Array(items))
}

fn array_item(input: &mut &str) -> WResult<Value> {
    // `undefined` inside an array serializes as `null`.
    constant
        .map(|item| match item {
            Constant::Undefined => Value::Null,
            Constant::Value(value) => value,
        })
        .parse_next(input)
}

fn object(input: &mut &str) -> WResult<Value> {
    let _ = ('{', multispace0).parse_next(input)?;
    let entries: Vec<(String, Value)> =
        separated(0.., object_entry, (multispace0, ',', multispace0)).parse_next(input)?;
    let _ = (multispace0, opt(','), multispace0, '}').parse_next(input)?;
    Ok(Value::Object(entries.into_iter().collect::<Map<_, _>>()))
}

fn object_entry(input: &mut &str) -> WResult<(String, Value)> {
    let key = alt((
        quoted,
        take_while(1.., is_ident_char).map(str::to_string),
    ))
    .parse_next(input)?;
    let _ = (multispace0, ':', multispace0).parse_next(input)?;
    let value = array_item.parse_next(input)?;
    Ok((key, value))
}

fn quoted(input: &mut &str) -> WResult<String> {
    let quote = one_of(['"', '\'']).parse_next(input)?;
    let mut text = String::new();
    loop {
        let chunk = take_while(0.., |c: char| c != quote && c != '\\' && c != '\n')
            .parse_next(input)?;
        text.push_str(chunk);
        match any.parse_next(input)? {
            c if c == quote => return Ok(text),
            '\\' => {
                if let Some(c) = escape.parse_next(input)? {
                    text.push(c);
                }
            }
            _ => return fail.parse_next(input),
        }
    }
}

/// Character after a backslash; `None` for a line continuation.
fn escape(input: &mut &str) -> WResult<Option<char>> {
    let c = any.parse_next(input)?;
    let escaped = match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'v' => '\u{b}',
        '0' => '\0',
        '\n' => return Ok(None),
        'x' => return hex_char(2).map(Some).parse_next(input),
        'u' => {
            return alt((
                delimited('{', hex_digit1, '}').try_map(|digits| u32::from_str_radix(digits, 16)),
                take_while(4, |c: char| c.is_ascii_hexdigit())
                    .try_map(|digits| u32::from_str_radix(digits, 16)),
            ))
            .verify_map(char::from_u32)
            .map(Some)
            .parse_next(input);
        }
        other => other,
    };
    Ok(Some(escaped))
}

fn hex_char<'i>(len: usize) -> impl Parser<&'i str, char, winnow::error::ContextError> {
    take_while(len, |c: char| c.is_ascii_hexdigit())
        .try_map(|digits| u32::from_str_radix(digits, 16))
        .verify_map(char::from_u32)
}

fn number(input: &mut &str) -> WResult<Number> {
    let negative = opt(terminated(one_of(['-', '+']), multispace0))
        .parse_next(input)?
        .is_some_and(|sign| sign == '-');
    let magnitude = alt((radix_integer, decimal)).parse_next(input)?;
    let _ = not(one_of(is_ident_char)).parse_next(input)?;
    let value = if negative { -magnitude } else { magnitude };
    to_json_number(value).map_or_else(|| fail.parse_next(input), Ok)
}

fn radix_integer(input: &mut &str) -> WResult<f64> {
    let (radix, digits) = preceded(
        '0',
        alt((
            preceded(one_of(['x', 'X']), digits_of(|c| c.is_ascii_hexdigit())).map(|d| (16, d)),
            preceded(one_of(['o', 'O']), digits_of(|c| matches!(c, '0'..='7'))).map(|d| (8, d)),
            preceded(one_of(['b', 'B']), digits_of(|c| matches!(c, '0' | '1'))).map(|d| (2, d)),
        )),
    )
    .parse_next(input)?;
    let digits = digits.replace('_', "");
    u64::from_str_radix(&digits, radix)
        .map(|value| value as f64)
        .map_or_else(|_| fail.parse_next(input), Ok)
}

/// Digit run with `_` separators; the first character must be a digit.
fn digits_of<'i>(
    accept: impl Fn(char) -> bool + Copy,
) -> impl Parser<&'i str, &'i str, winnow::error::ContextError> {
    (one_of(accept), take_while(0.., move |c: char| accept(c) || c == '_')).take()
}

fn decimal(input: &mut &str) -> WResult<f64> {
    let text = alt((
        (
            digits_of(|c| c.is_ascii_digit()),
            opt(('.', opt(digits_of(|c| c.is_ascii_digit())))),
        )
            .take(),
        ('.', digit1).take(),
    ))
    .parse_next(input)?;
    let exponent = opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1).take())
        .parse_next(input)?
        .unwrap_or_default();
    format!("{}{exponent}", text.replace('_', ""))
        .parse::<f64>()
        .map_or_else(|_| fail.parse_next(input), Ok)
}

/// Integral values keep an integer representation; `NaN` and infinities are rejected.
fn to_json_number(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        if value == 0.0 {
            return Some(Number::from(0));
        }
        return Some(Number::from(value as i64));
    }
    Number::from_f64(value)
}
