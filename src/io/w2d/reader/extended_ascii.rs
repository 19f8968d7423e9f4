//! Extended ASCII opcodes: `(Name args...)`.
//!
//! The frame body is decoded as Windows-1252 text and split into
//! arguments with `nom`: bare words, quoted strings (`"..."` or `'...'`,
//! backslash escapes) and nested `(Name args...)` groups.

use crate::error::{DwfError, Result};
use crate::io::w2d::context::DecodeContext;
use crate::io::w2d::opcode::{ExtendedAsciiOpcode, NodeAddressing};
use crate::records::{FontRef, Layer, ObjectNode, OpcodeRecord};
use crate::types::{Color, LinePattern, LineWeight, LogicalPoint, Rgba};

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{all_consuming, map},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use std::str::FromStr;

/// One argument of an extended ASCII opcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsciiArg {
    Word(String),
    Quoted(String),
    Group { name: String, args: Vec<AsciiArg> },
}

impl AsciiArg {
    /// Argument as plain text; groups are re-serialized.
    pub fn as_text(&self) -> String {
        match self {
            AsciiArg::Word(s) | AsciiArg::Quoted(s) => s.clone(),
            AsciiArg::Group { name, args } => {
                let inner: Vec<String> = args.iter().map(AsciiArg::as_text).collect();
                if inner.is_empty() {
                    format!("({})", name)
                } else {
                    format!("({} {})", name, inner.join(" "))
                }
            }
        }
    }
}

/// Parsed frame: opcode name and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiFrame {
    pub name: String,
    pub args: Vec<AsciiArg>,
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')' && c != '"'
}

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(is_word_char)(input)
}

fn quoted(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, q @ ('"' | '\''))) => q,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };

    let mut out = String::new();
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok((&input[i + c.len_utf8()..], out));
        } else {
            out.push(c);
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

fn group(input: &str) -> IResult<&str, AsciiArg> {
    map(
        delimited(
            char('('),
            pair(preceded(multispace0, word), arguments),
            preceded(multispace0, char(')')),
        ),
        |(name, args)| AsciiArg::Group {
            name: name.to_string(),
            args,
        },
    )(input)
}

fn argument(input: &str) -> IResult<&str, AsciiArg> {
    alt((
        group,
        map(quoted, AsciiArg::Quoted),
        map(word, |w: &str| AsciiArg::Word(w.to_string())),
    ))(input)
}

fn arguments(input: &str) -> IResult<&str, Vec<AsciiArg>> {
    many0(preceded(multispace0, argument))(input)
}

/// Parse the bytes between the outer `(` and `)`.
pub fn parse_frame(body: &[u8], offset: u64) -> Result<AsciiFrame> {
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(body);
    let parsed = all_consuming(terminated(
        pair(preceded(multispace0, word), arguments),
        multispace0,
    ))(text.as_ref());

    match parsed {
        Ok((_, (name, args))) => Ok(AsciiFrame {
            name: name.to_string(),
            args,
        }),
        Err(e) => Err(DwfError::MalformedExtendedFrame {
            offset,
            reason: format!("unparsable extended ASCII body: {:?}", e),
        }),
    }
}

// ---------------------------------------------------------------
// Interpretation
// ---------------------------------------------------------------

fn malformed(offset: u64, reason: impl Into<String>) -> DwfError {
    DwfError::MalformedExtendedFrame {
        offset,
        reason: reason.into(),
    }
}

/// Word/quoted arguments split on commas and whitespace.
fn scalars(args: &[AsciiArg]) -> Vec<String> {
    args.iter()
        .filter(|a| !matches!(a, AsciiArg::Group { .. }))
        .flat_map(|a| {
            a.as_text()
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn parse_number<T: FromStr>(value: &str, offset: u64, what: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| malformed(offset, format!("invalid {} {:?}", what, value)))
}

fn parse_switch(value: &str, offset: u64) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(malformed(offset, format!("expected on/off, got {:?}", other))),
    }
}

fn first_scalar(args: &[AsciiArg], offset: u64, name: &str) -> Result<String> {
    scalars(args)
        .into_iter()
        .next()
        .ok_or_else(|| malformed(offset, format!("({}) needs an argument", name)))
}

/// Turn a parsed frame into a record, updating the context.
pub(crate) fn interpret(
    op: ExtendedAsciiOpcode,
    frame: &AsciiFrame,
    ctx: &mut DecodeContext,
    offset: u64,
) -> Result<OpcodeRecord> {
    let args = &frame.args;
    let record = match op {
        ExtendedAsciiOpcode::Version => {
            let raw = first_scalar(args, offset, &frame.name)?;
            let digits = raw.trim_start_matches(['V', 'v']);
            let (major, minor) = digits
                .split_once('.')
                .ok_or_else(|| malformed(offset, format!("invalid version {:?}", raw)))?;
            OpcodeRecord::Version {
                major: parse_number(major, offset, "version")?,
                minor: parse_number(minor, offset, "version")?,
            }
        }
        ExtendedAsciiOpcode::EndOfDwf => OpcodeRecord::EndOfStream,
        ExtendedAsciiOpcode::Color => {
            let values = scalars(args);
            let color = match values.as_slice() {
                [index] => Color::Index(parse_number(index, offset, "color index")?),
                [r, g, b] => Color::Rgba(Rgba::opaque(
                    parse_number(r, offset, "channel")?,
                    parse_number(g, offset, "channel")?,
                    parse_number(b, offset, "channel")?,
                )),
                [r, g, b, a] => Color::Rgba(Rgba::new(
                    parse_number(r, offset, "channel")?,
                    parse_number(g, offset, "channel")?,
                    parse_number(b, offset, "channel")?,
                    parse_number(a, offset, "channel")?,
                )),
                _ => return Err(malformed(offset, "(Color) expects an index or r,g,b[,a]")),
            };
            ctx.current_color = color;
            OpcodeRecord::SetColor(color)
        }
        ExtendedAsciiOpcode::LineWeight => {
            let value = first_scalar(args, offset, &frame.name)?;
            let weight = LineWeight::from_value(parse_number(&value, offset, "line weight")?);
            ctx.current_line_weight = weight;
            OpcodeRecord::SetLineWeight(weight)
        }
        ExtendedAsciiOpcode::LinePattern => {
            let value = first_scalar(args, offset, &frame.name)?;
            let pattern = LinePattern::from_name(&value)
                .ok_or_else(|| malformed(offset, format!("unknown line pattern {:?}", value)))?;
            ctx.current_line_pattern = pattern;
            OpcodeRecord::SetLinePattern(pattern)
        }
        ExtendedAsciiOpcode::Layer => {
            let number = first_scalar(args, offset, &frame.name)?;
            let layer = Layer {
                number: parse_number(&number, offset, "layer number")?,
                name: args.get(1).map(AsciiArg::as_text),
            };
            ctx.set_layer(&layer);
            OpcodeRecord::SetLayer(layer)
        }
        ExtendedAsciiOpcode::Visible => {
            let on = parse_switch(&first_scalar(args, offset, &frame.name)?, offset)?;
            ctx.current_visibility = on;
            OpcodeRecord::SetVisibility(on)
        }
        ExtendedAsciiOpcode::Fill => {
            let on = parse_switch(&first_scalar(args, offset, &frame.name)?, offset)?;
            ctx.current_fill = on;
            OpcodeRecord::SetFill(on)
        }
        ExtendedAsciiOpcode::Origin => match scalars(args).as_slice() {
            [x, y] => OpcodeRecord::SetOrigin(LogicalPoint::new(
                parse_number::<i32>(x, offset, "coordinate")? as i64,
                parse_number::<i32>(y, offset, "coordinate")? as i64,
            )),
            _ => return Err(malformed(offset, "(Origin) expects x,y")),
        },
        ExtendedAsciiOpcode::Font => {
            let font = read_font(args, ctx.current_font.clone().unwrap_or_default(), offset)?;
            ctx.current_font = Some(font.clone());
            OpcodeRecord::SetFont(font)
        }
        ExtendedAsciiOpcode::Node => {
            let number = first_scalar(args, offset, &frame.name)?;
            let value: i32 = parse_number(&number, offset, "node number")?;
            let id = ctx.next_object_node(NodeAddressing::Absolute32, value as i64, offset)?;
            OpcodeRecord::ObjectNode(ObjectNode {
                id,
                name: args.get(1).map(AsciiArg::as_text),
            })
        }
        ExtendedAsciiOpcode::Metadata => {
            let value: Vec<String> = args.iter().map(AsciiArg::as_text).collect();
            OpcodeRecord::Metadata {
                name: frame.name.clone(),
                value: value.join(" "),
            }
        }
    };
    Ok(record)
}

/// `(Font (Name "x") (Height n) (Rotation n))`; fields not mentioned keep
/// their previous values. A leading quoted string is taken as the name.
fn read_font(args: &[AsciiArg], mut font: FontRef, offset: u64) -> Result<FontRef> {
    for arg in args {
        match arg {
            AsciiArg::Quoted(name) => font.name = Some(name.clone()),
            AsciiArg::Group { name, args } => {
                let value = first_scalar(args, offset, name)?;
                match name.as_str() {
                    "Name" => font.name = Some(value),
                    "Height" => font.height = parse_number(&value, offset, "font height")?,
                    "Rotation" => font.rotation = parse_number(&value, offset, "font rotation")?,
                    _ => log::trace!("ignoring font option ({})", name),
                }
            }
            AsciiArg::Word(_) => {}
        }
    }
    Ok(font)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(body: &str) -> AsciiFrame {
        parse_frame(body.as_bytes(), 0).unwrap()
    }

    fn run(body: &str, ctx: &mut DecodeContext) -> Result<OpcodeRecord> {
        let f = frame(body);
        let op = ExtendedAsciiOpcode::from_name(&f.name).unwrap();
        interpret(op, &f, ctx, 0)
    }

    #[test]
    fn test_parse_words_quotes_groups() {
        let f = frame("Font (Name \"Times New Roman\") (Height 120)");
        assert_eq!(f.name, "Font");
        assert_eq!(
            f.args[0],
            AsciiArg::Group {
                name: "Name".to_string(),
                args: vec![AsciiArg::Quoted("Times New Roman".to_string())],
            }
        );
        assert_eq!(f.args[1].as_text(), "(Height 120)");
    }

    #[test]
    fn test_parse_escaped_quote() {
        let f = frame(r#"Title "a \"quoted\" word""#);
        assert_eq!(f.args, vec![AsciiArg::Quoted("a \"quoted\" word".to_string())]);
    }

    #[test]
    fn test_parse_rejects_unbalanced_group() {
        assert!(matches!(
            parse_frame(b"Font (Name x", 9),
            Err(DwfError::MalformedExtendedFrame { offset: 9, .. })
        ));
    }

    #[test]
    fn test_version() {
        let mut ctx = DecodeContext::new();
        assert_eq!(
            run("W2D V06.00", &mut ctx).unwrap(),
            OpcodeRecord::Version { major: 6, minor: 0 }
        );
    }

    #[test]
    fn test_color_forms() {
        let mut ctx = DecodeContext::new();
        run("Color 255,0,0,128", &mut ctx).unwrap();
        assert_eq!(ctx.current_color, Color::Rgba(Rgba::new(255, 0, 0, 128)));
        run("Color 7", &mut ctx).unwrap();
        assert_eq!(ctx.current_color, Color::Index(7));
        assert!(run("Color 1,2", &mut ctx).is_err());
    }

    #[test]
    fn test_layer_with_name() {
        let mut ctx = DecodeContext::new();
        run("Layer 2 \"Walls\"", &mut ctx).unwrap();
        assert_eq!(ctx.current_layer_name(), Some("Walls"));
    }

    #[test]
    fn test_font_merges_with_previous() {
        let mut ctx = DecodeContext::new();
        run("Font (Name \"Arial\") (Height 100)", &mut ctx).unwrap();
        run("Font (Height 250)", &mut ctx).unwrap();
        let font = ctx.current_font.clone().unwrap();
        assert_eq!(font.name.as_deref(), Some("Arial"));
        assert_eq!(font.height, 250);
    }

    #[test]
    fn test_switches_and_origin() {
        let mut ctx = DecodeContext::new();
        run("Visible off", &mut ctx).unwrap();
        run("Fill on", &mut ctx).unwrap();
        assert!(!ctx.current_visibility);
        assert!(ctx.current_fill);
        assert_eq!(
            run("Origin 500,300", &mut ctx).unwrap(),
            OpcodeRecord::SetOrigin(LogicalPoint::new(500, 300))
        );
        assert!(run("Visible maybe", &mut ctx).is_err());
    }

    #[test]
    fn test_metadata_value() {
        let mut ctx = DecodeContext::new();
        assert_eq!(
            run("Author \"J. Doe\"", &mut ctx).unwrap(),
            OpcodeRecord::Metadata {
                name: "Author".to_string(),
                value: "J. Doe".to_string(),
            }
        );
    }

    #[test]
    fn test_node_establishes_chain() {
        let mut ctx = DecodeContext::new();
        run("Node 12 \"door\"", &mut ctx).unwrap();
        assert_eq!(ctx.current_object_node, Some(12));
    }

    #[test]
    fn test_origin_and_node_are_32_bit() {
        let mut ctx = DecodeContext::new();
        assert_eq!(
            run("Origin -2147483648,2147483647", &mut ctx).unwrap(),
            OpcodeRecord::SetOrigin(LogicalPoint::new(i32::MIN as i64, i32::MAX as i64))
        );
        assert!(matches!(
            run("Origin 9223372036854775807,0", &mut ctx),
            Err(DwfError::MalformedExtendedFrame { .. })
        ));
        assert!(matches!(
            run("Node 2147483648", &mut ctx),
            Err(DwfError::MalformedExtendedFrame { .. })
        ));
        assert_eq!(ctx.current_object_node, None);
    }
}
