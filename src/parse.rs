use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{map, map_res, opt, recognize},
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};

use crate::cuboid::Cuboid;
use crate::reactor::Instruction;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseInstructionError {
    Malformed { line: String, reason: String },
    TrailingJunk { line: String, junk: String },
    InvertedRange { axis: char, low: i32, high: i32 },
}

impl Display for ParseInstructionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseInstructionError::Malformed { line, reason } => {
                write!(f, "does not look like a reboot step: '{}': {}", line, reason)
            }
            ParseInstructionError::TrailingJunk { line, junk } => {
                write!(f, "unexpected trailing junk '{}' in '{}'", junk, line)
            }
            ParseInstructionError::InvertedRange { axis, low, high } => {
                write!(f, "inverted {} range {}..{}", axis, low, high)
            }
        }
    }
}

impl std::error::Error for ParseInstructionError {}

fn i32_parser(input: &str) -> IResult<&str, i32> {
    map_res(
        recognize(tuple((opt(char('-')), digit1))),
        FromStr::from_str,
    )(input)
}

fn parse_range(input: &str) -> IResult<&str, (i32, i32)> {
    separated_pair(i32_parser, tag(".."), i32_parser)(input)
}

type Bounds = ((i32, i32), (i32, i32), (i32, i32));

fn parse_ranges(input: &str) -> IResult<&str, Bounds> {
    tuple((
        delimited(tag("x="), parse_range, tag(",")),
        delimited(tag("y="), parse_range, tag(",")),
        preceded(tag("z="), parse_range),
    ))(input)
}

fn parse_on_off(input: &str) -> IResult<&str, bool> {
    alt((map(tag("on"), |_| true), map(tag("off"), |_| false)))(input)
}

fn parse_step(input: &str) -> IResult<&str, (bool, Bounds)> {
    separated_pair(parse_on_off, tag(" "), parse_ranges)(input)
}

fn check_range(axis: char, (low, high): (i32, i32)) -> Result<(i32, i32), ParseInstructionError> {
    if low <= high {
        Ok((low, high))
    } else {
        Err(ParseInstructionError::InvertedRange { axis, low, high })
    }
}

/// Parse a line such as `on x=10..12,y=10..12,z=10..12`.  The bounds
/// in the text are inclusive.
pub fn parse_instruction(line: &str) -> Result<Instruction, ParseInstructionError> {
    match parse_step(line) {
        Ok(("", (on, (x, y, z)))) => {
            let cuboid = Cuboid::from_inclusive(
                check_range('x', x)?,
                check_range('y', y)?,
                check_range('z', z)?,
            );
            Ok(if on {
                Instruction::On(cuboid)
            } else {
                Instruction::Off(cuboid)
            })
        }
        Ok((junk, _)) => Err(ParseInstructionError::TrailingJunk {
            line: line.to_string(),
            junk: junk.to_string(),
        }),
        Err(e) => Err(ParseInstructionError::Malformed {
            line: line.to_string(),
            reason: e.to_string(),
        }),
    }
}

impl TryFrom<&str> for Instruction {
    type Error = ParseInstructionError;
    fn try_from(s: &str) -> Result<Instruction, ParseInstructionError> {
        parse_instruction(s)
    }
}

/// Parse a whole reboot procedure, skipping blank lines.
pub fn parse_instructions<'a, I>(lines: I) -> Result<Vec<Instruction>, String>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            parse_instruction(line.trim_end()).map_err(|e| format!("line {}: {}", n + 1, e))
        })
        .collect()
}

#[test]
fn test_parse_instruction() {
    assert_eq!(
        parse_instruction("on x=-54112..-39298,y=-85059..-49293,z=-27449..7877"),
        Ok(Instruction::On(Cuboid::new(
            -54112..-39297,
            -85059..-49292,
            -27449..7878
        )))
    );
    assert_eq!(
        Instruction::try_from("off x=9..11,y=9..11,z=9..11"),
        Ok(Instruction::Off(Cuboid::new(9..12, 9..12, 9..12)))
    );
}

#[test]
fn test_parse_extreme_bounds() {
    let step = parse_instruction("on x=2147483647..2147483647,y=-2147483648..2147483647,z=0..0")
        .expect("valid");
    assert_eq!(step.affects().x, 2147483647..2147483648);
    assert_eq!(step.affects().volume(), 1u128 << 32);
    // Bounds which don't fit the input's integer type are rejected
    // rather than wrapped.
    assert!(matches!(
        parse_instruction("on x=9223372036854775807..9223372036854775807,y=0..0,z=0..0"),
        Err(ParseInstructionError::Malformed { .. })
    ));
}

#[test]
fn test_parse_single_cell() {
    let step = parse_instruction("on x=10..10,y=10..10,z=10..10").expect("valid");
    assert_eq!(step.affects().volume(), 1);
}

#[test]
fn test_parse_round_trip_display() {
    let text = "off x=-48..-32,y=26..41,z=-47..-37";
    assert_eq!(parse_instruction(text).expect("valid").to_string(), text);
}

#[test]
fn test_parse_rejects_inverted_range() {
    assert_eq!(
        parse_instruction("on x=1..2,y=5..4,z=0..0"),
        Err(ParseInstructionError::InvertedRange {
            axis: 'y',
            low: 5,
            high: 4
        })
    );
}

#[test]
fn test_parse_rejects_junk() {
    assert!(matches!(
        parse_instruction("on x=1..2,y=1..2,z=1..2 please"),
        Err(ParseInstructionError::TrailingJunk { .. })
    ));
    assert!(matches!(
        parse_instruction("toggle x=1..2,y=1..2,z=1..2"),
        Err(ParseInstructionError::Malformed { .. })
    ));
    assert!(matches!(
        parse_instruction("on x=1..2,z=1..2"),
        Err(ParseInstructionError::Malformed { .. })
    ));
}

#[test]
fn test_parse_instructions() {
    let steps = parse_instructions(vec!["on x=0..1,y=0..1,z=0..1", "", "off x=0..0,y=0..0,z=0..0"])
        .expect("valid");
    assert_eq!(steps.len(), 2);
    let err = parse_instructions(vec!["on x=0..1,y=0..1,z=0..1", "", "of x=0..0,y=0..0,z=0..0"])
        .expect_err("bad third line");
    assert!(err.starts_with("line 3: "), "{}", err);
}
