//! A reader for messages stored in Unix mbox format.
//!
//! A message is read line by line from a [`LineSource`]. Header fields are
//! collected into a map keyed by normalized field name, with continuation
//! lines joined onto the field they continue. The lines after the first
//! blank line form the body, up to the next `From ` separator line.
//!
//! Malformed input never causes an error: lines that cannot be understood
//! are dropped and missing sections are left empty.
//!
//! # Example
//! ```
//! use mailread::StrLines;
//!
//! let text = "From sender Mon Jan 1\nSubject: hi\n  there\n\nHello\n";
//! let message = mailread::parse(StrLines::new(text))?;
//!
//! assert_eq!(message.field("subject"), Some("hi\nthere"));
//! assert_eq!(message.body(), &["Hello\n".to_string()]);
//! # Ok::<(), mailread::Error>(())
//! ```
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

mod err;
mod header_accumulator;
mod line_parser;
mod message;
mod parser;
mod source;

pub use crate::err::{Error, Result};
pub use crate::header_accumulator::capitalize;
pub use crate::message::Message;
pub use crate::parser::{MessageParser, Messages};
pub use crate::source::{LineSource, Opened, ReadLines, StrLines};

/// Parse a single message from a source owned by the caller.
/// The source is left open.
pub fn parse<S: LineSource>(source: S) -> Result<Message> {
    MessageParser::new(source).parse()
}

/// Open a file and parse the first message in it.
/// The file is closed before returning, whether or not parsing succeeded.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Message> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut source = Opened::new(ReadLines::new(BufReader::new(file)));
    parse(&mut source)
}
