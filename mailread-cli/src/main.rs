use crate::output::{write_abbrev, write_message};
use abbrev::Filter;
use anyhow::{anyhow, bail, Context, Error};
use getopts::{Matches, Options};
use log::{debug, info};
use mailread::{LineSource, MessageParser, Opened, ReadLines};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::env;
use std::fs::File;
use std::io;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::process;
use time::format_description;
use time::OffsetDateTime;

mod output;

// Command line option names
const OPT_HELP: &str = "help";
const OPT_ABBREV: &str = "abbrev";
const OPT_PREFIX: &str = "prefix";
const OPT_REGEX: &str = "regex";
const OPT_ALL: &str = "all";
const OPT_LOG: &str = "log";
const OPT_VERBOSE: &str = "verbose";

const LOG_TIMESTAMP: &str = "[year][month][day][hour][minute][second]";

fn setup_logger(log_dir: Option<String>, verbosity: usize) -> Result<(), Error> {
    let log_level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));
    if let Some(dir) = log_dir {
        let filepath = Path::new(&dir).join(log_filename()?);
        let file = File::create(&filepath)
            .with_context(|| format!("Cannot create log file {}", filepath.display()))?;
        loggers.push(WriteLogger::new(LevelFilter::Trace, Config::default(), file));
    }
    CombinedLogger::init(loggers).map_err(|err| anyhow!("Cannot initialize logger: {}", err))
}

fn log_filename() -> Result<String, Error> {
    let format = format_description::parse(LOG_TIMESTAMP)?;
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    Ok(format!("mailread-{}.log", now.format(&format)?))
}

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options] [FILE...]", program);
    print!("{}", opts.usage(&brief));
}

fn options() -> Options {
    let mut opts = Options::new();
    opts.optflag("h", OPT_HELP, "print this help menu");
    opts.optflag(
        "a",
        OPT_ABBREV,
        "print the unique abbreviations of the words on each input line",
    );
    opts.optopt(
        "p",
        OPT_PREFIX,
        "only abbreviations starting with PREFIX",
        "PREFIX",
    );
    opts.optopt(
        "r",
        OPT_REGEX,
        "only abbreviations matching PATTERN",
        "PATTERN",
    );
    opts.optflag("A", OPT_ALL, "print every message, not just the first");
    opts.optopt("l", OPT_LOG, "the directory to write logs to", "LOG_DIR");
    opts.optflagmulti("v", OPT_VERBOSE, "increase the log level");
    opts
}

// Abbreviation filters are only accepted in abbreviation mode
fn filter(matches: &Matches) -> Result<Option<Filter>, Error> {
    let prefix = matches.opt_str(OPT_PREFIX);
    let pattern = matches.opt_str(OPT_REGEX);
    if !matches.opt_present(OPT_ABBREV) && (prefix.is_some() || pattern.is_some()) {
        bail!(
            "--{} and --{} need --{}",
            OPT_PREFIX,
            OPT_REGEX,
            OPT_ABBREV
        );
    }
    match (prefix, pattern) {
        (Some(_), Some(_)) => bail!("--{} and --{} cannot be combined", OPT_PREFIX, OPT_REGEX),
        (Some(prefix), None) => Ok(Some(Filter::prefix(prefix))),
        (None, Some(pattern)) => Filter::pattern(&pattern)
            .map(Some)
            .with_context(|| format!("Bad pattern {}", pattern)),
        (None, None) => Ok(None),
    }
}

fn open(path: &str) -> Result<BufReader<File>, Error> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path))?;
    Ok(BufReader::new(file))
}

fn abbreviations<W: Write>(
    files: &[String],
    filter: Option<&Filter>,
    out: &mut W,
) -> Result<(), Error> {
    if files.is_empty() {
        write_abbrev(io::stdin().lock(), filter, out)?;
    }
    for path in files {
        debug!("Abbreviations from {}", path);
        write_abbrev(open(path)?, filter, out)?;
    }
    Ok(())
}

fn all_messages<S: LineSource, W: Write>(source: S, out: &mut W) -> Result<(), Error> {
    for (i, message) in MessageParser::new(source).messages().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write_message(&message?, out)?;
    }
    Ok(())
}

fn messages<W: Write>(files: &[String], all: bool, out: &mut W) -> Result<(), Error> {
    if files.is_empty() {
        let source = ReadLines::new(io::stdin().lock());
        return if all {
            all_messages(source, out)
        } else {
            write_message(&mailread::parse(source)?, out).map_err(Error::from)
        };
    }
    for path in files {
        info!("Reading {}", path);
        if all {
            all_messages(Opened::new(ReadLines::new(open(path)?)), out)?;
        } else {
            write_message(&mailread::parse_file(path)?, out)?;
        }
    }
    Ok(())
}

fn run() -> Result<(), Error> {
    let args: Vec<String> = env::args().collect();
    let opts = options();
    let matches = opts
        .parse(&args[1..])
        .map_err(|err| anyhow!("Error parsing command line: {}", err))?;
    if matches.opt_present(OPT_HELP) {
        print_usage(&args[0], &opts);
        return Ok(());
    }
    let filter = filter(&matches)?;
    setup_logger(matches.opt_str(OPT_LOG), matches.opt_count(OPT_VERBOSE))?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if matches.opt_present(OPT_ABBREV) {
        abbreviations(&matches.free, filter.as_ref(), &mut out)?;
    } else {
        messages(&matches.free, matches.opt_present(OPT_ALL), &mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        process::exit(1);
    }
}
