use crate::header_accumulator::capitalize;
use std::collections::HashMap;

/// A message read from an mbox stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    headers: HashMap<String, String>,
    body: Vec<String>,
}

impl Message {
    pub(crate) fn new(headers: HashMap<String, String>, body: Vec<String>) -> Self {
        Self { headers, body }
    }

    /// All header fields, keyed by normalized field name
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Body lines in stream order, each with its original line terminator
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Look up a header field. The name is normalized the same way as
    /// when the message was parsed, so `field("SUBJECT")` finds `Subject`.
    /// Multi-line values are joined with `\n`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.headers.get(&capitalize(name)).map(String::as_str)
    }

    pub fn into_parts(self) -> (HashMap<String, String>, Vec<String>) {
        (self.headers, self.body)
    }
}
