use crate::line_parser::is_space;
use log::debug;
use std::collections::HashMap;

// Collects header fields, joining continuation lines onto the current field
#[derive(Default)]
pub(crate) struct HeaderAccumulator {
    fields: HashMap<String, String>,
    current: Option<String>, // Normalized name of the last field seen
}

impl HeaderAccumulator {
    // Start a new field. A repeated name replaces the earlier value.
    pub(crate) fn field(&mut self, name: &str, value: &str) {
        let name = capitalize(name);
        self.fields.insert(name.clone(), value.to_owned());
        self.current = Some(name);
    }

    // Append a line to the current field, returns false if there is no
    // current field and the line was dropped
    pub(crate) fn continuation(&mut self, line: &str) -> bool {
        let value = self
            .current
            .as_ref()
            .and_then(|name| self.fields.get_mut(name));
        match value {
            Some(value) => {
                value.push('\n');
                value.push_str(line.trim_start_matches(is_space));
                true
            }
            None => {
                debug!("Dropping header line outside a field: {:?}", line);
                false
            }
        }
    }

    pub(crate) fn finish(self) -> HashMap<String, String> {
        self.fields
    }
}

/// Normalize a header field name: the first character is uppercased and
/// the rest lowercased, e.g `MESSAGE-ID` becomes `Message-id`.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
