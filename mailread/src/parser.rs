use crate::err::{Error, Result};
use crate::header_accumulator::HeaderAccumulator;
use crate::line_parser::{self, HeaderLine};
use crate::message::Message;
use crate::source::LineSource;
use log::trace;

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Header,
    Body,
    End,
}

/// MessageParser reads messages from a LineSource.
///
/// The parser never closes the source it is given. Pass `&mut source` to
/// keep ownership of the source after parsing.
pub struct MessageParser<S: LineSource> {
    source: S,
    boundary: Option<String>,
    exhausted: bool,
}

impl<S: LineSource> MessageParser<S> {
    /// Create a new MessageParser that reads lines from the given source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            boundary: None,
            exhausted: false,
        }
    }

    /// Parse the next message.
    ///
    /// Reading stops at the end of the stream or at a `From ` line that
    /// follows the body. That line is not part of the message and is
    /// available from `boundary()`. Lines that cannot be understood are
    /// ignored, the only errors come from the line source.
    pub fn parse(&mut self) -> Result<Message> {
        self.boundary = None;
        if self.exhausted {
            return Ok(Message::default());
        }
        let mut headers = HeaderAccumulator::default();
        let mut body = Vec::new();
        let mut state = State::Header;
        while state != State::End {
            let line = match self.source.next_line().map_err(Error::Read)? {
                Some(line) => line,
                None => {
                    self.exhausted = true;
                    break;
                }
            };
            let next_state = match state {
                State::Header => header_line(&line, &mut headers),
                State::Body => self.body_line(line, &mut body),
                State::End => State::End,
            };
            if next_state != state {
                trace!("* {:?}", next_state);
            }
            state = next_state;
        }
        Ok(Message::new(headers.finish(), body))
    }

    /// The `From ` line that ended the last message, if any
    pub fn boundary(&self) -> Option<&str> {
        self.boundary.as_deref()
    }

    /// Has the source reached the end of the stream?
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Iterate over the remaining messages in the source
    pub fn messages(self) -> Messages<S> {
        Messages {
            parser: self,
            failed: false,
        }
    }

    /// Give back the source, positioned after the last line read
    pub fn into_inner(self) -> S {
        self.source
    }

    fn body_line(&mut self, line: String, body: &mut Vec<String>) -> State {
        if line_parser::is_boundary(&line) {
            trace!("Body ended by {:?}", line);
            self.boundary = Some(line);
            State::End
        } else {
            body.push(line);
            State::Body
        }
    }
}

fn header_line(line: &str, headers: &mut HeaderAccumulator) -> State {
    match line_parser::header_line(line_parser::chomp(line)) {
        HeaderLine::Boundary => {
            trace!("Skipping {:?}", line);
            State::Header
        }
        HeaderLine::Blank => State::Body,
        HeaderLine::Field { name, value } => {
            headers.field(name, value);
            State::Header
        }
        HeaderLine::Other(text) => {
            headers.continuation(text);
            State::Header
        }
    }
}

/// Iterator over successive messages, see `MessageParser::messages()`.
///
/// Iteration ends when the stream ends before anything of a further
/// message has been read, or after the first error. A final section that
/// yields neither headers nor body, such as a lone `From ` line followed
/// by blank or unparseable lines, is not returned.
pub struct Messages<S: LineSource> {
    parser: MessageParser<S>,
    failed: bool,
}

impl<S: LineSource> Iterator for Messages<S> {
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Result<Message>> {
        if self.failed || self.parser.is_exhausted() {
            return None;
        }
        match self.parser.parse() {
            Ok(message) if is_trailing(&self.parser, &message) => None,
            Ok(message) => Some(Ok(message)),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

// Nothing was found between the last boundary and the end of the stream
fn is_trailing<S: LineSource>(parser: &MessageParser<S>, message: &Message) -> bool {
    parser.is_exhausted() && message.headers().is_empty() && message.body().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StrLines;
    use maplit::hashmap;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io;

    fn parse(text: &str) -> Message {
        MessageParser::new(StrLines::new(text)).parse().unwrap()
    }

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_stream() {
        let message = parse("");
        assert!(message.headers().is_empty());
        assert!(message.body().is_empty());
    }

    #[test]
    fn single_blank_line() {
        assert_eq!(parse("\n"), Message::default());
    }

    #[test]
    fn headers_and_body() {
        let message = parse("Subject: hi\nFrom: a@b\n\nbody line\n");
        assert_eq!(
            message.headers(),
            &headers(&[("Subject", "hi"), ("From", "a@b")])
        );
        assert_eq!(message.body(), &["body line\n".to_string()]);
    }

    #[test]
    fn continuation() {
        let message = parse("Subject: hi\n there\n\n");
        assert_eq!(message.headers(), &headers(&[("Subject", "hi\nthere")]));
        assert!(message.body().is_empty());
    }

    #[test]
    fn crlf_lines() {
        let message = parse("Subject: hi\r\n there\r\n\r\nbody\r\n");
        assert_eq!(message.field("subject"), Some("hi\nthere"));
        assert_eq!(message.body(), &["body\r\n".to_string()]);
    }

    #[test]
    fn leading_boundary_is_skipped() {
        let message = parse("From sender Mon Jan 1\nSubject: hi\n\nbody\n");
        assert_eq!(message.headers(), &headers(&[("Subject", "hi")]));
        assert_eq!(message.body(), &["body\n".to_string()]);
    }

    #[test]
    fn headers_without_body() {
        let message = parse("Subject: hi\nTo: b@c");
        assert_eq!(
            message.headers(),
            &headers(&[("Subject", "hi"), ("To", "b@c")])
        );
        assert!(message.body().is_empty());
    }

    #[test]
    fn orphan_line_is_ignored() {
        let message = parse("garbage line\nSubject: hi\n\n");
        assert_eq!(message.headers(), &headers(&[("Subject", "hi")]));
    }

    #[test]
    fn field_names_are_normalized() {
        let message = parse("MESSAGE-ID: <1@b>\nx-mailer: test\n\n");
        assert_eq!(
            message.headers(),
            &hashmap! {
                "Message-id".to_string() => "<1@b>".to_string(),
                "X-mailer".to_string() => "test".to_string(),
            }
        );
    }

    #[test]
    fn body_keeps_blank_lines() {
        let message = parse("Subject: hi\n\none\n\n  two\n");
        assert_eq!(
            message.body(),
            &["one\n".to_string(), "\n".to_string(), "  two\n".to_string()]
        );
    }

    #[test]
    fn body_ends_at_boundary() {
        let mut parser = MessageParser::new(StrLines::new(
            "Subject: one\n\nfirst\nFrom b@c Tue Jan 2\nSubject: two\n\nsecond\n",
        ));
        let message = parser.parse().unwrap();
        assert_eq!(message.body(), &["first\n".to_string()]);
        assert_eq!(parser.boundary(), Some("From b@c Tue Jan 2\n"));
        assert!(!parser.is_exhausted());

        let message = parser.parse().unwrap();
        assert_eq!(message.field("subject"), Some("two"));
        assert_eq!(message.body(), &["second\n".to_string()]);
        assert_eq!(parser.boundary(), None);
        assert!(parser.is_exhausted());
    }

    #[test]
    fn messages() {
        let text = "From a\nSubject: one\n\nfirst\nFrom b\nSubject: two\n\nsecond\nFrom c\n";
        let subjects = MessageParser::new(StrLines::new(text))
            .messages()
            .map(|m| m.unwrap().field("Subject").map(str::to_owned))
            .collect::<Vec<_>>();
        assert_eq!(
            subjects,
            vec![Some("one".to_string()), Some("two".to_string())]
        );
    }

    #[test]
    fn boundary_inside_headers_is_skipped() {
        let message = parse("Subject: a\nFrom x\nTo: b\n\n");
        assert_eq!(
            message.headers(),
            &headers(&[("Subject", "a"), ("To", "b")])
        );
        assert!(message.body().is_empty());
    }

    #[test]
    fn empty_final_section_is_not_a_message() {
        let texts = [
            "Subject: one\n\nfirst\nFrom b\n\n",
            "Subject: one\n\nfirst\nFrom b\ngarbage\n",
        ];
        for text in texts {
            let messages = MessageParser::new(StrLines::new(text))
                .messages()
                .collect::<Result<Vec<_>>>()
                .unwrap();
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].field("subject"), Some("one"));
        }
    }

    #[test]
    fn into_inner_resumes_after_boundary() {
        let mut parser = MessageParser::new(StrLines::new(
            "Subject: one\n\nfirst\nFrom b\nnext line\n",
        ));
        parser.parse().unwrap();
        let mut source = parser.into_inner();
        assert_eq!(source.next_line().unwrap(), Some("next line\n".to_string()));
        assert_eq!(source.next_line().unwrap(), None);
    }

    struct FailingSource {
        lines: Vec<&'static str>,
    }

    impl LineSource for FailingSource {
        fn next_line(&mut self) -> io::Result<Option<String>> {
            if self.lines.is_empty() {
                Err(io::Error::new(io::ErrorKind::Other, "broken"))
            } else {
                Ok(Some(self.lines.remove(0).to_string()))
            }
        }
    }

    #[test]
    fn read_error() {
        let source = FailingSource {
            lines: vec!["Subject: hi\n"],
        };
        let mut messages = MessageParser::new(source).messages();
        assert!(matches!(messages.next(), Some(Err(Error::Read(_)))));
        assert!(messages.next().is_none());
    }
}
