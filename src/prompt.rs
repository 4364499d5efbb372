//! Interactive mode prompts
//!
//! Used by the binary when it is started without a query or explicit URLs.
//! Reading and writing go through `BufRead`/`Write` so the prompt flow can be
//! driven from tests.

use crate::config::{Config, DEFAULT_CSV_PATH};
use crate::search::SearchQuery;
use std::io::{self, BufRead, Write};

/// Default number of search results to process
pub const DEFAULT_RESULT_COUNT: usize = 10;

/// Default request spacing in seconds
pub const DEFAULT_DELAY_RANGE: (f64, f64) = (1.0, 3.0);

/// Answers collected by [`prompt_settings`]
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveSettings {
    pub query: SearchQuery,
    pub result_count: usize,
    pub csv_path: String,
    pub min_delay: f64,
    pub max_delay: f64,
}

impl InteractiveSettings {
    /// Copies the answers into `config`
    pub fn apply(&self, config: &mut Config) {
        config.collector.result_count = self.result_count;
        config.collector.min_delay = self.min_delay;
        config.collector.max_delay = self.max_delay;
        config.output.csv_path = self.csv_path.clone();
    }

    /// Writes the chosen settings as a short block
    pub fn describe<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n{}", "=".repeat(30))?;
        writeln!(out, "SEARCH CONFIGURATION:")?;
        writeln!(out, "Query: {}", self.query)?;
        writeln!(out, "Results: {}", self.result_count)?;
        writeln!(out, "Output: {}", self.csv_path)?;
        writeln!(out, "Delay: {}-{} seconds", self.min_delay, self.max_delay)?;
        writeln!(out, "{}\n", "=".repeat(30))
    }
}

/// Parses a delay answer: `"2"` for a fixed delay or `"1-3"` for a range
///
/// Returns `None` for anything else, including negative or non-finite
/// values. A reversed range such as `"3-1"` is returned in ascending order.
pub fn parse_delay_range(input: &str) -> Option<(f64, f64)> {
    let input = input.trim();
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
    };

    match input.split_once('-') {
        Some((a, b)) => {
            let (a, b) = (parse(a)?, parse(b)?);
            Some((a.min(b), a.max(b)))
        }
        None => parse(input).map(|d| (d, d)),
    }
}

/// Parses a positive result count
pub fn parse_result_count(input: &str) -> Option<usize> {
    input.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// True for `y` or `yes`, in any case
pub fn is_confirmation(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Prints `question` and reads one trimmed line
///
/// Returns `None` at end of input.
fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> io::Result<Option<String>> {
    write!(out, "{}", question)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Asks for the run settings, re-asking until each answer is valid
///
/// Returns `Ok(None)` if input ends before every question is answered.
pub fn prompt_settings<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<InteractiveSettings>> {
    let query = loop {
        let Some(answer) = ask(input, out, "Enter your search query: ")? else {
            return Ok(None);
        };
        match SearchQuery::new(answer) {
            Ok(query) => break query,
            Err(_) => writeln!(out, "Please enter a valid search query.")?,
        }
    };

    let result_count = loop {
        let question = format!(
            "Number of search results to process (default: {}): ",
            DEFAULT_RESULT_COUNT
        );
        let Some(answer) = ask(input, out, &question)? else {
            return Ok(None);
        };
        if answer.is_empty() {
            break DEFAULT_RESULT_COUNT;
        }
        match parse_result_count(&answer) {
            Some(n) => break n,
            None => writeln!(out, "Please enter a positive number.")?,
        }
    };

    let question = format!("Output filename (default: {}): ", DEFAULT_CSV_PATH);
    let Some(answer) = ask(input, out, &question)? else {
        return Ok(None);
    };
    let csv_path = if answer.is_empty() {
        DEFAULT_CSV_PATH.to_string()
    } else {
        answer
    };

    let (min_delay, max_delay) = loop {
        let question = format!(
            "Delay between requests in seconds (default: {}-{}): ",
            DEFAULT_DELAY_RANGE.0, DEFAULT_DELAY_RANGE.1
        );
        let Some(answer) = ask(input, out, &question)? else {
            return Ok(None);
        };
        if answer.is_empty() {
            break DEFAULT_DELAY_RANGE;
        }
        match parse_delay_range(&answer) {
            Some(range) => break range,
            None => writeln!(out, "Please enter a valid delay (e.g., '2' or '1-3').")?,
        }
    };

    Ok(Some(InteractiveSettings {
        query,
        result_count,
        csv_path,
        min_delay,
        max_delay,
    }))
}

/// Asks a yes/no question; anything but `y`/`yes` (or end of input) is no
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> io::Result<bool> {
    Ok(ask(input, out, question)?
        .map(|answer| is_confirmation(&answer))
        .unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_delay_range() {
        assert_eq!(parse_delay_range("2"), Some((2.0, 2.0)));
        assert_eq!(parse_delay_range("1-3"), Some((1.0, 3.0)));
        assert_eq!(parse_delay_range(" 0.5 - 1.5 "), Some((0.5, 1.5)));
        assert_eq!(parse_delay_range("3-1"), Some((1.0, 3.0)));
        assert_eq!(parse_delay_range("fast"), None);
        assert_eq!(parse_delay_range("1-"), None);
        assert_eq!(parse_delay_range("1-2-3"), None);
        assert_eq!(parse_delay_range(""), None);
    }

    #[test]
    fn test_parse_result_count() {
        assert_eq!(parse_result_count("5"), Some(5));
        assert_eq!(parse_result_count(" 20 "), Some(20));
        assert_eq!(parse_result_count("0"), None);
        assert_eq!(parse_result_count("-1"), None);
        assert_eq!(parse_result_count("ten"), None);
    }

    #[test]
    fn test_is_confirmation() {
        assert!(is_confirmation("y"));
        assert!(is_confirmation("YES"));
        assert!(is_confirmation(" yes\n"));
        assert!(!is_confirmation("n"));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("yep"));
    }

    #[test]
    fn test_prompt_settings_defaults() {
        let mut input = Cursor::new("dentists in leeds\n\n\n\n");
        let mut out = Vec::new();

        let settings = prompt_settings(&mut input, &mut out).unwrap().unwrap();

        assert_eq!(settings.query.as_str(), "dentists in leeds");
        assert_eq!(settings.result_count, DEFAULT_RESULT_COUNT);
        assert_eq!(settings.csv_path, DEFAULT_CSV_PATH);
        assert_eq!((settings.min_delay, settings.max_delay), DEFAULT_DELAY_RANGE);
    }

    #[test]
    fn test_prompt_settings_reasks_invalid_answers() {
        let mut input = Cursor::new("\n  \nbakeries\n0\nabc\n5\nout.csv\nsoon\n2\n");
        let mut out = Vec::new();

        let settings = prompt_settings(&mut input, &mut out).unwrap().unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert_eq!(settings.query.as_str(), "bakeries");
        assert_eq!(settings.result_count, 5);
        assert_eq!(settings.csv_path, "out.csv");
        assert_eq!((settings.min_delay, settings.max_delay), (2.0, 2.0));
        assert_eq!(printed.matches("Please enter a valid search query.").count(), 2);
        assert_eq!(printed.matches("Please enter a positive number.").count(), 2);
        assert!(printed.contains("Please enter a valid delay"));
    }

    #[test]
    fn test_prompt_settings_end_of_input() {
        let mut input = Cursor::new("bakeries\n");
        let mut out = Vec::new();
        assert!(prompt_settings(&mut input, &mut out).unwrap().is_none());
    }

    #[test]
    fn test_apply_overrides_config() {
        let settings = InteractiveSettings {
            query: SearchQuery::new("q").unwrap(),
            result_count: 3,
            csv_path: "x.csv".to_string(),
            min_delay: 0.5,
            max_delay: 0.5,
        };
        let mut config = Config::default();
        settings.apply(&mut config);

        assert_eq!(config.collector.result_count, 3);
        assert_eq!(config.collector.min_delay, 0.5);
        assert_eq!(config.collector.max_delay, 0.5);
        assert_eq!(config.output.csv_path, "x.csv");
    }

    #[test]
    fn test_confirm() {
        let mut out = Vec::new();
        assert!(confirm(&mut Cursor::new("y\n"), &mut out, "Start? ").unwrap());
        assert!(!confirm(&mut Cursor::new("n\n"), &mut out, "Start? ").unwrap());
        assert!(!confirm(&mut Cursor::new(""), &mut out, "Start? ").unwrap());
    }
}
