use winnow::prelude::*;
use winnow::ascii::{digit0, digit1, multispace0};
use winnow::combinator::opt;
use winnow::token::take_while;

use crate::ast::Point;

const TRANSLATE: &str = "translate(";

/// Decode the first well-formed `translate(x, y)` found in a transform
/// attribute. Other transform functions around it are ignored.
pub fn parse_translate(transform: &str) -> Option<Point> {
    let mut rest = transform;
    while let Some(pos) = rest.find(TRANSLATE) {
        let mut candidate = &rest[pos..];
        if let Ok(point) = translate(&mut candidate) {
            return Some(point);
        }
        rest = &rest[pos + TRANSLATE.len()..];
    }
    None
}

/// Every number in a path-drawing string, in order. Commands, commas and
/// any other characters between numbers are skipped.
pub fn scan_numbers(path: &str) -> Vec<f64> {
    let mut input = path;
    let mut numbers = Vec::new();
    while let Some(c) = input.chars().next() {
        let checkpoint = input;
        match number(&mut input) {
            Ok(n) => numbers.push(n),
            Err(_) => input = &checkpoint[c.len_utf8()..],
        }
    }
    numbers
}

fn translate(input: &mut &str) -> winnow::Result<Point> {
    TRANSLATE.parse_next(input)?;
    let x = coordinate.parse_next(input)?;
    ','.parse_next(input)?;
    multispace0.parse_next(input)?;
    let y = coordinate.parse_next(input)?;
    ')'.parse_next(input)?;
    Ok(Point::new(x, y))
}

fn coordinate(input: &mut &str) -> winnow::Result<f64> {
    take_while(1.., |c: char| c == '-' || c == '.' || c.is_ascii_digit())
        .try_map(str::parse::<f64>)
        .parse_next(input)
}

fn number(input: &mut &str) -> winnow::Result<f64> {
    (opt('-'), digit1, opt(('.', digit0)))
        .take()
        .try_map(str::parse::<f64>)
        .parse_next(input)
}
