use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char, satisfy};
use nom::combinator::{eof, map, recognize};
use nom::sequence::{pair, terminated};
use nom::IResult;

/// A line seen while reading the header section
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum HeaderLine<'a> {
    /// An mbox "From " separator
    Boundary,
    /// The empty line that ends the header section
    Blank,
    /// The start of a header field
    Field { name: &'a str, value: &'a str },
    /// Anything else, normally the continuation of the previous field
    Other(&'a str),
}

// Classify a header line that has had its line terminator removed.
pub(crate) fn header_line(line: &str) -> HeaderLine {
    match alt((boundary_line, blank_line, field_line))(line) {
        Ok((_, header)) => header,
        Err(_) => HeaderLine::Other(line),
    }
}

// Does the line, with or without its terminator, start a new message?
pub(crate) fn is_boundary(line: &str) -> bool {
    boundary(line).is_ok()
}

// Remove a trailing \n, \r\n or \r
pub(crate) fn chomp(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

// Whitespace in the mbox grammar is ASCII only
pub(crate) fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c')
}

fn boundary(buf: &str) -> IResult<&str, &str> {
    tag("From ")(buf)
}

fn boundary_line(buf: &str) -> IResult<&str, HeaderLine> {
    map(boundary, |_| HeaderLine::Boundary)(buf)
}

fn blank_line(buf: &str) -> IResult<&str, HeaderLine> {
    map(eof, |_| HeaderLine::Blank)(buf)
}

// field = name ":" *space value
fn field_line(buf: &str) -> IResult<&str, HeaderLine> {
    let (i, name) = terminated(field_name, char(':'))(buf)?;
    let (value, _) = space(i)?;
    Ok(("", HeaderLine::Field { name, value }))
}

// The shortest run of non-space characters that is followed by a colon.
// The first character may itself be a colon.
fn field_name(buf: &str) -> IResult<&str, &str> {
    let first = satisfy(|c: char| !is_space(c));
    let others = take_while(|c: char| c != ':' && !is_space(c));
    recognize(pair(first, others))(buf)
}

fn space(buf: &str) -> IResult<&str, &str> {
    take_while(is_space)(buf)
}
