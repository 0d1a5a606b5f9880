use abbrev::{Abbrev, Filter};
use mailread::Message;
use std::io;
use std::io::{BufRead, Write};

// Write the headers sorted by name, a blank line and then the body.
// Continuation lines are indented with a tab.
pub fn write_message<W: Write>(message: &Message, out: &mut W) -> io::Result<()> {
    let mut fields = message.headers().iter().collect::<Vec<_>>();
    fields.sort();
    for (name, value) in fields {
        writeln!(out, "{}: {}", name, value.replace('\n', "\n\t"))?;
    }
    writeln!(out)?;
    for line in message.body() {
        out.write_all(line.as_bytes())?;
    }
    Ok(())
}

// Each input line is a list of words, write the abbreviation table for
// each line sorted by abbreviation
pub fn write_abbrev<R: BufRead, W: Write>(
    input: R,
    filter: Option<&Filter>,
    out: &mut W,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let words = line.split_whitespace().collect::<Vec<_>>();
        let mut table = words.abbrev(filter).into_iter().collect::<Vec<_>>();
        table.sort();
        for (abbreviation, word) in table {
            writeln!(out, "{} => {}", abbreviation, word)?;
        }
    }
    Ok(())
}
