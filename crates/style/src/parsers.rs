//! Low-level nom parser functions for CSS-like property values.
//!
//! These parse individual values (lengths, colours, border shorthands,
//! keywords). There is no selector matching or cascade here: callers feed
//! one property value at a time.

use crate::border::{Border, BorderRadius, BorderStyle};
use crate::dimension::{Dimension, Edges};
use crate::font::{FontStyle, FontWeight};
use crate::position::{BoxSizing, Float, Overflow, Position};
use crate::text::{BaseDirection, TextAlign, TextDecoration};
use folio_types::{AffineTransform, Color};
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while_m_n};
use nom::character::complete::{char, space0, space1};
use nom::combinator::{map, map_res, opt, recognize};
use nom::multi::separated_list1;
use nom::sequence::{delimited, pair, preceded};
use nom::{IResult, Parser};
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

// --- Helper Parsers ---

fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(space0, inner, space0)
}

fn digits(input: &str) -> IResult<&str, &str> {
    take_while_m_n(1, 10, |c: char| c.is_ascii_digit()).parse(input)
}

fn parse_f32(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(pair(
            opt(alt((char('+'), char('-')))),
            alt((
                recognize(pair(digits, opt(pair(char('.'), digits)))),
                recognize(pair(char('.'), digits)),
            )),
        )),
        |s: &str| s.parse::<f32>(),
    )
    .parse(input)
}

// --- Unit & Dimension Parsers ---

fn parse_unit(input: &str) -> IResult<&str, f32> {
    alt((
        map(tag_no_case("pt"), |_| 1.0),
        // px is treated as pt, as in most print engines
        map(tag_no_case("px"), |_| 1.0),
        map(tag_no_case("in"), |_| 72.0),
        map(tag_no_case("cm"), |_| 28.35),
        map(tag_no_case("mm"), |_| 2.835),
    ))
    .parse(input)
}

/// Parses a length value with optional unit (e.g., "12pt", "1in", "10mm").
pub fn parse_length(input: &str) -> IResult<&str, f32> {
    let (input, value) = parse_f32(input)?;
    let (input, unit_multiplier) = opt(parse_unit).parse(input)?;
    Ok((input, value * unit_multiplier.unwrap_or(1.0)))
}

/// Parses a dimension value (length, percentage, or "auto").
pub fn parse_dimension(input: &str) -> IResult<&str, Dimension> {
    alt((
        map(tag_no_case("auto"), |_| Dimension::Auto),
        map(pair(parse_f32, char('%')), |(val, _)| Dimension::Percent(val)),
        map(parse_length, Dimension::Pt),
    ))
    .parse(input)
}

/// Parses CSS shorthand edges (1, 2, or 4 values).
pub fn parse_shorthand_edges(input: &str) -> Result<Edges, StyleParseError> {
    let parts_res = separated_list1(space1, parse_length).parse(input.trim());

    match parts_res {
        Ok(("", parts)) => match parts.as_slice() {
            [all] => Ok(Edges::all(*all)),
            [vertical, horizontal] => Ok(Edges::new(*vertical, *horizontal, *vertical, *horizontal)),
            [top, right, bottom, left] => Ok(Edges::new(*top, *right, *bottom, *left)),
            _ => Err(StyleParseError::Parse(format!(
                "Invalid number of values for edge shorthand: got {}, expected 1, 2, or 4.",
                parts.len()
            ))),
        },
        _ => Err(StyleParseError::Parse(format!(
            "Failed to parse edges value: '{}'",
            input
        ))),
    }
}

// --- Color & Border Parsers ---

fn hex_pair(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()), |s: &str| {
        u8::from_str_radix(s, 16)
    })
    .parse(input)
}

fn hex_single(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, |c: char| c.is_ascii_hexdigit()), |s: &str| {
        u8::from_str_radix(&s.repeat(2), 16)
    })
    .parse(input)
}

fn hex_color_6(input: &str) -> IResult<&str, Color> {
    map((hex_pair, hex_pair, hex_pair), |(r, g, b)| Color::rgb(r, g, b)).parse(input)
}

fn hex_color_3(input: &str) -> IResult<&str, Color> {
    map((hex_single, hex_single, hex_single), |(r, g, b)| Color::rgb(r, g, b)).parse(input)
}

/// Parses a hex color (e.g., "#FF0000" or "#F00").
pub fn parse_color(input: &str) -> IResult<&str, Color> {
    preceded(char('#'), alt((hex_color_6, hex_color_3))).parse(input)
}

/// Parses a border style keyword.
pub fn parse_border_style(input: &str) -> IResult<&str, BorderStyle> {
    alt((
        map(tag_no_case("solid"), |_| BorderStyle::Solid),
        map(tag_no_case("dashed"), |_| BorderStyle::Dashed),
        map(tag_no_case("dotted"), |_| BorderStyle::Dotted),
        map(tag_no_case("double"), |_| BorderStyle::Double),
        map(tag_no_case("none"), |_| BorderStyle::None),
    ))
    .parse(input)
}

/// Parses a border shorthand (e.g., "2pt solid #00ff00"). The colour may be
/// omitted and defaults to black.
pub fn parse_border(input: &str) -> IResult<&str, Border> {
    map(
        (ws(parse_length), ws(parse_border_style), opt(ws(parse_color))),
        |(width, style, color)| Border {
            width,
            style,
            color: color.unwrap_or_default(),
        },
    )
    .parse(input)
}

/// Parses a uniform border radius. Percentages are accepted here and rejected
/// later, at paint time, where the box size is known.
pub fn parse_border_radius(input: &str) -> IResult<&str, BorderRadius> {
    map(parse_dimension, BorderRadius).parse(input)
}

/// Parses "none" or a border shorthand; used for `border` and `outline`.
pub fn parse_optional_border(input: &str) -> IResult<&str, Option<Border>> {
    alt((map(tag("none"), |_| None), map(parse_border, Some))).parse(input)
}

/// Helper to run a nom parser and convert its result to a `Result<T, StyleParseError>`.
pub fn run_parser<'a, T, F>(parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Fn(&'a str) -> IResult<&'a str, T>,
{
    match parser(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

// --- Transform Parsers ---

fn parse_angle(input: &str) -> IResult<&str, f32> {
    let (input, value) = parse_f32(input)?;
    let (input, unit) = opt(alt((tag_no_case("deg"), tag_no_case("rad")))).parse(input)?;
    let radians = match unit {
        Some(unit) if unit.eq_ignore_ascii_case("rad") => value,
        _ => value.to_radians(),
    };
    Ok((input, radians))
}

fn arguments<'a, O, F>(
    name: &'static str,
    argument: F,
) -> impl Parser<&'a str, Output = Vec<O>, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    preceded(
        tag_no_case(name),
        delimited(
            ws(char('(')),
            separated_list1(ws(char(',')), argument),
            preceded(space0, char(')')),
        ),
    )
}

/// Parses one transform function. Angles are clockwise and `translate` y
/// grows downward, as in CSS; both are flipped for y-up page space.
fn parse_transform_function(input: &str) -> IResult<&str, AffineTransform> {
    alt((
        map_res(arguments("rotate", parse_angle), |args| match args.as_slice() {
            [angle] => Ok(AffineTransform::rotation(-*angle)),
            _ => Err("rotate takes one angle"),
        }),
        map_res(arguments("scale", parse_f32), |args| match args.as_slice() {
            [s] => Ok(AffineTransform::scale(*s, *s)),
            [sx, sy] => Ok(AffineTransform::scale(*sx, *sy)),
            _ => Err("scale takes one or two factors"),
        }),
        map_res(arguments("translate", parse_length), |args| match args.as_slice() {
            [tx] => Ok(AffineTransform::translation(*tx, 0.0)),
            [tx, ty] => Ok(AffineTransform::translation(*tx, -*ty)),
            _ => Err("translate takes one or two lengths"),
        }),
    ))
    .parse(input)
}

/// Parses a space-separated transform list such as
/// `"translate(10pt, 0) rotate(45deg)"`, or `"none"`.
///
/// The rightmost function applies first.
pub fn parse_transform(input: &str) -> IResult<&str, AffineTransform> {
    alt((
        map(tag_no_case("none"), |_| AffineTransform::identity()),
        map(separated_list1(space1, parse_transform_function), |functions| {
            functions
                .iter()
                .rev()
                .fold(AffineTransform::identity(), |acc, f| acc.then(f))
        }),
    ))
    .parse(input)
}

// --- Keyword Parsers ---

fn invalid(property: &str, value: &str) -> StyleParseError {
    StyleParseError::InvalidValue {
        property: property.to_string(),
        value: value.to_string(),
    }
}

/// Parses a font weight string (e.g., "bold", "400").
pub fn parse_font_weight(s: &str) -> Result<FontWeight, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "thin" => Ok(FontWeight::Thin),
        "light" => Ok(FontWeight::Light),
        "regular" | "normal" => Ok(FontWeight::Regular),
        "medium" => Ok(FontWeight::Medium),
        "bold" => Ok(FontWeight::Bold),
        "black" => Ok(FontWeight::Black),
        other => other
            .parse::<u16>()
            .map(FontWeight::Numeric)
            .map_err(|_| invalid("font-weight", s)),
    }
}

pub fn parse_font_style(s: &str) -> Result<FontStyle, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "normal" => Ok(FontStyle::Normal),
        "italic" => Ok(FontStyle::Italic),
        "oblique" => Ok(FontStyle::Oblique),
        _ => Err(invalid("font-style", s)),
    }
}

pub fn parse_text_align(s: &str) -> Result<TextAlign, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "left" | "start" => Ok(TextAlign::Left),
        "right" | "end" => Ok(TextAlign::Right),
        "center" => Ok(TextAlign::Center),
        "justify" => Ok(TextAlign::Justify),
        _ => Err(invalid("text-align", s)),
    }
}

pub fn parse_text_decoration(s: &str) -> Result<TextDecoration, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "none" => Ok(TextDecoration::None),
        "underline" => Ok(TextDecoration::Underline),
        "line-through" => Ok(TextDecoration::LineThrough),
        _ => Err(invalid("text-decoration", s)),
    }
}

pub fn parse_direction(s: &str) -> Result<BaseDirection, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "ltr" => Ok(BaseDirection::LeftToRight),
        "rtl" => Ok(BaseDirection::RightToLeft),
        _ => Err(invalid("direction", s)),
    }
}

pub fn parse_position(s: &str) -> Result<Position, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "static" => Ok(Position::Static),
        "relative" => Ok(Position::Relative),
        "absolute" => Ok(Position::Absolute),
        "fixed" => Ok(Position::Fixed),
        _ => Err(invalid("position", s)),
    }
}

pub fn parse_float(s: &str) -> Result<Float, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "none" => Ok(Float::None),
        "left" => Ok(Float::Left),
        "right" => Ok(Float::Right),
        _ => Err(invalid("float", s)),
    }
}

pub fn parse_box_sizing(s: &str) -> Result<BoxSizing, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "content-box" => Ok(BoxSizing::ContentBox),
        "border-box" => Ok(BoxSizing::BorderBox),
        _ => Err(invalid("box-sizing", s)),
    }
}

pub fn parse_overflow(s: &str) -> Result<Overflow, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "fit" => Ok(Overflow::Fit),
        "visible" => Ok(Overflow::Visible),
        "hidden" => Ok(Overflow::Hidden),
        _ => Err(invalid("overflow", s)),
    }
}

pub fn parse_bool(property: &str, s: &str) -> Result<bool, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(invalid(property, s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_units() {
        assert_eq!(run_parser(parse_length, "12pt").unwrap(), 12.0);
        assert_eq!(run_parser(parse_length, "1in").unwrap(), 72.0);
        assert_eq!(run_parser(parse_length, "-.5").unwrap(), -0.5);
        assert!(run_parser(parse_length, "12em").is_err());
    }

    #[test]
    fn test_dimension_variants() {
        assert_eq!(run_parser(parse_dimension, "auto").unwrap(), Dimension::Auto);
        assert_eq!(run_parser(parse_dimension, "50%").unwrap(), Dimension::Percent(50.0));
        assert_eq!(run_parser(parse_dimension, "2in").unwrap(), Dimension::Pt(144.0));
    }

    #[test]
    fn test_edge_shorthand() {
        assert_eq!(parse_shorthand_edges("4").unwrap(), Edges::all(4.0));
        assert_eq!(
            parse_shorthand_edges("1pt 2pt").unwrap(),
            Edges::new(1.0, 2.0, 1.0, 2.0)
        );
        assert_eq!(
            parse_shorthand_edges("1 2 3 4").unwrap(),
            Edges::new(1.0, 2.0, 3.0, 4.0)
        );
        assert!(parse_shorthand_edges("1 2 3").is_err());
    }

    #[test]
    fn test_border_shorthand() {
        let border = run_parser(parse_border, "2pt dashed #00ff00").unwrap();
        assert_eq!(border.width, 2.0);
        assert_eq!(border.style, BorderStyle::Dashed);
        assert_eq!(border.color, Color::rgb(0, 255, 0));

        let no_color = run_parser(parse_border, "1pt solid").unwrap();
        assert_eq!(no_color.color, Color::BLACK);

        assert_eq!(run_parser(parse_optional_border, "none").unwrap(), None);
    }

    #[test]
    fn test_short_hex_color() {
        assert_eq!(run_parser(parse_color, "#0f0").unwrap(), Color::rgb(0, 255, 0));
    }

    #[test]
    fn test_transform_list() {
        let rotate = run_parser(parse_transform, "rotate(90deg)").unwrap();
        assert!(rotate.a.abs() < 1e-6);
        assert!((rotate.b + 1.0).abs() < 1e-6);

        let moved = run_parser(parse_transform, "translate(10pt, 5pt) scale(2)").unwrap();
        let corner = moved.apply(folio_types::Point::new(1.0, 1.0));
        assert!((corner.x - 12.0).abs() < 1e-6);
        assert!((corner.y - -3.0).abs() < 1e-6);

        let spaced = run_parser(parse_transform, "translate( 10pt , 5pt )  scale( 2 )").unwrap();
        assert_eq!(spaced, moved);

        assert_eq!(run_parser(parse_transform, "none").unwrap(), AffineTransform::identity());
        assert!(run_parser(parse_transform, "rotate(1, 2)").is_err());
        assert!(run_parser(parse_transform, "skew(10deg)").is_err());
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_position("Absolute").unwrap(), Position::Absolute);
        assert_eq!(parse_font_weight("700").unwrap(), FontWeight::Numeric(700));
        assert!(matches!(
            parse_float("center"),
            Err(StyleParseError::InvalidValue { .. })
        ));
    }
}
