use std::io;
use std::io::BufRead;
use std::str;

/// A LineSource yields successive lines of a message.
///
/// Lines are returned with their line terminators, `Ok(None)` signals the
/// end of the stream.
pub trait LineSource {
    /// Read the next line
    fn next_line(&mut self) -> io::Result<Option<String>>;

    /// Release any resource held by the source. Sources without a resource
    /// keep the default, which does nothing.
    fn close(&mut self) {}
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        (**self).next_line()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Lines of an in-memory string
pub struct StrLines<'a> {
    lines: str::SplitInclusive<'a, char>,
}

impl<'a> StrLines<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.split_inclusive('\n'),
        }
    }
}

impl LineSource for StrLines<'_> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.next().map(str::to_owned))
    }
}

/// Lines read from a buffered reader.
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// failing the read. Closing the source drops the reader, later reads
/// return end of stream.
pub struct ReadLines<R: BufRead> {
    reader: Option<R>,
}

impl<R: BufRead> ReadLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }

    /// Has the reader been released?
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

impl<R: BufRead> LineSource for ReadLines<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let reader = match self.reader.as_mut() {
            Some(reader) => reader,
            None => return Ok(None),
        };
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(String::from_utf8_lossy(&buf).into_owned())),
        }
    }

    fn close(&mut self) {
        self.reader.take();
    }
}

/// Owns a source that was opened on behalf of the caller and closes it when
/// dropped, whether parsing finished or failed.
/// The source is closed at most once.
pub struct Opened<S: LineSource> {
    source: S,
    closed: bool,
}

impl<S: LineSource> Opened<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            closed: false,
        }
    }
}

impl<S: LineSource> LineSource for Opened<S> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.source.next_line()
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.source.close();
        }
    }
}

impl<S: LineSource> Drop for Opened<S> {
    fn drop(&mut self) {
        self.close();
    }
}
