// src/parser.rs
//! Turns Gobra's log-formatted stdout into a verdict and a list of errors.
//!
//! Gobra reports in one of two shapes. Newer versions print a summary line
//! (`Gobra has found N error(s)`) and one `Error at: <file:line:col>` entry per
//! failure. Older versions and crashes before verification only leave
//! `ERROR <logger> - <message>` log records. The summary shape always wins:
//! its entries are themselves `ERROR` records and would otherwise be counted
//! twice.

use crate::errors::{PlaygroundError, Result};
use crate::models::{Position, VerificationError, VerificationResponse};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Gobra has found (\S+) error\(s\)").expect("summary pattern is valid")
});

static POSITIONED_ERROR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Error at: <([^<>]*):([^:<>]*):([^:<>]*)>\s?(.*)$")
        .expect("positioned error pattern is valid")
});

static BARE_ERROR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bERROR\s+(\S+)\s+-\s(.*)$").expect("bare error pattern is valid")
});

// logback prefixes every record with `HH:MM:SS.mmm`
static LOG_RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d{2}:\d{2}:\d{2}").expect("log record pattern is valid")
});

/// Which report format a run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape<'a> {
    /// A summary line was found. `summary` is the matched text.
    Summary { count: u32, summary: &'a str },
    /// No summary line; fall back to bare `ERROR` records.
    Bare,
}

/// Decode raw process output, replacing invalid UTF-8 with U+FFFD.
pub fn decode_output(raw: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(raw)
}

pub fn classify(output: &str) -> Result<OutputShape<'_>> {
    let Some(caps) = SUMMARY_RE.captures(output) else {
        return Ok(OutputShape::Bare);
    };

    let raw_count = &caps[1];
    let count = raw_count.parse::<u32>().map_err(|_| {
        PlaygroundError::MalformedOutput(format!("error count {:?} is not an integer", raw_count))
    })?;

    Ok(OutputShape::Summary {
        count,
        summary: caps.get(0).map_or("", |m| m.as_str()),
    })
}

/// Parse a complete stdout capture. `duration` and `stats` are left empty.
pub fn parse_output(output: &str) -> Result<VerificationResponse> {
    let errors = match classify(output)? {
        OutputShape::Summary { count: 0, .. } => Vec::new(),
        OutputShape::Summary { count, summary } => {
            let mut errors = extract_positioned_errors(output)?;
            if errors.len() != count as usize {
                log::debug!(
                    "Gobra reported {} error(s) but {} entries were found",
                    count,
                    errors.len()
                );
            }
            if errors.is_empty() {
                errors.push(VerificationError {
                    message: summary.to_string(),
                    position: Position::ORIGIN,
                });
            }
            errors
        }
        OutputShape::Bare => extract_bare_errors(output),
    };

    Ok(VerificationResponse::from_errors(errors))
}

/// Parse raw bytes straight from the process.
pub fn parse_raw_output(raw: &[u8]) -> Result<VerificationResponse> {
    parse_output(&decode_output(raw))
}

fn extract_positioned_errors(output: &str) -> Result<Vec<VerificationError>> {
    let lines: Vec<&str> = output.lines().collect();
    let mut errors = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(caps) = POSITIONED_ERROR_RE.captures(line) else {
            continue;
        };

        let line_no = parse_coordinate(&caps[2], "line", line)?;
        let column = parse_coordinate(&caps[3], "column", line)?;

        let mut message = caps[4].to_string();
        if let Some(next) = lines.get(idx + 1) {
            if !LOG_RECORD_RE.is_match(next) {
                message.push('\n');
                message.push_str(next);
            }
        }

        errors.push(VerificationError {
            message,
            position: Position::new(line_no, column),
        });
    }

    Ok(errors)
}

fn parse_coordinate(raw: &str, what: &str, line: &str) -> Result<u32> {
    raw.parse().map_err(|_| {
        PlaygroundError::MalformedOutput(format!("{} {:?} is not an integer in {:?}", what, raw, line))
    })
}

fn extract_bare_errors(output: &str) -> Vec<VerificationError> {
    output
        .lines()
        .filter_map(|line| BARE_ERROR_RE.captures(line))
        .map(|caps| VerificationError {
            message: caps[2].to_string(),
            position: Position::ORIGIN,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAILED_OUTPUT: &str = "Gobra 1.1-SNAPSHOT (46a35ffb@(detached))
(c) Copyright ETH Zurich 2012 - 2024
14:50:32.055 [main] INFO viper.gobra.Gobra - Verifying package /tmp/scratch - main [14:50:32]
14:50:35.387 [ForkJoinPool-3-worker-2] ERROR viper.gobra.reporting.FileWriterReporter - Error at: <abs.go:29:8> Precondition of call Abs(MinInt) might not hold.
Assertion x != MinInt might not hold.
14:50:35.403 [thread-2] ERROR viper.gobra.Gobra - Gobra has found 1 error(s) in package /tmp/scratch - main
14:50:35.403 [main] INFO viper.gobra.Gobra - Gobra has found 1 error(s)
14:50:35.427 [Thread-0] INFO viper.gobra.Gobra - Writing report to .gobra/stats.json
";

    #[test]
    fn test_summary_shape_wins_over_bare_records() {
        let shape = classify(FAILED_OUTPUT).unwrap();
        assert_eq!(
            shape,
            OutputShape::Summary { count: 1, summary: "Gobra has found 1 error(s)" }
        );

        let response = parse_output(FAILED_OUTPUT).unwrap();
        assert!(!response.verified);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].position, Position::new(29, 8));
        assert_eq!(
            response.errors[0].message,
            "Precondition of call Abs(MinInt) might not hold.\nAssertion x != MinInt might not hold."
        );
    }

    #[test]
    fn test_zero_count_ignores_stray_error_records() {
        let output = "12:00:00.000 [main] ERROR ch.qos.logback.core - appender misconfigured
12:00:01.000 [main] INFO viper.gobra.Gobra - Gobra has found 0 error(s)
";
        let response = parse_output(output).unwrap();
        assert!(response.verified);
        assert!(response.errors.is_empty());
    }

    #[test]
    fn test_malformed_count_is_rejected() {
        let output = "12:00:01.000 [main] INFO viper.gobra.Gobra - Gobra has found many error(s)";
        assert!(matches!(parse_output(output), Err(PlaygroundError::MalformedOutput(_))));
    }

    #[test]
    fn test_malformed_position_is_rejected() {
        let output = "12:00:00.000 [w-1] ERROR viper.gobra.reporting.FileWriterReporter - Error at: <a.go:x:3> Assert might fail.
Assertion false might not hold.
12:00:01.000 [main] INFO viper.gobra.Gobra - Gobra has found 1 error(s)
";
        assert!(matches!(parse_output(output), Err(PlaygroundError::MalformedOutput(_))));
    }

    #[test]
    fn test_file_path_with_colons() {
        let output = "12:00:00.000 [w-1] ERROR viper.gobra.reporting.FileWriterReporter - Error at: <C:\\tmp\\input.gobra:7:12> Assert might fail.
Assertion false might not hold.
12:00:01.000 [main] INFO viper.gobra.Gobra - Gobra has found 1 error(s)
";
        let response = parse_output(output).unwrap();
        assert_eq!(response.errors[0].position, Position::new(7, 12));
    }

    #[test]
    fn test_entry_without_continuation_line() {
        let output = "12:00:00.000 [main] INFO viper.gobra.Gobra - Gobra has found 1 error(s)
12:00:00.100 [w-1] ERROR viper.gobra.reporting.FileWriterReporter - Error at: <a.go:3:1> Postcondition might not hold.
12:00:00.200 [Thread-0] INFO viper.gobra.Gobra - Writing report to .gobra/stats.json";
        let response = parse_output(output).unwrap();
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Postcondition might not hold.");
    }

    #[test]
    fn test_nonzero_count_without_entries_keeps_verdict_consistent() {
        let output = "12:00:01.000 [main] INFO viper.gobra.Gobra - Gobra has found 2 error(s)";
        let response = parse_output(output).unwrap();
        assert!(!response.verified);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Gobra has found 2 error(s)");
        assert_eq!(response.errors[0].position, Position::ORIGIN);
    }

    #[test]
    fn test_bare_records() {
        let output = "Gobra 1.1-SNAPSHOT
13:01:02.003 [main] ERROR viper.gobra.Gobra - An assumption was violated during execution.
13:01:02.004 [main] ERROR viper.gobra.Gobra - Logic error: Missing package clause in /tmp/input.gobra
";
        assert_eq!(classify(output).unwrap(), OutputShape::Bare);

        let response = parse_output(output).unwrap();
        assert!(!response.verified);
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "An assumption was violated during execution.",
                "Logic error: Missing package clause in /tmp/input.gobra",
            ]
        );
        assert!(response.errors.iter().all(|e| e.position == Position::ORIGIN));
    }

    #[test]
    fn test_bare_message_keeps_inner_separators() {
        let output = "13:01:02.004 [main] ERROR viper.gobra.Gobra - Logic error: expected a - b, got a - c\n";

        let response = parse_output(output).unwrap();
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Logic error: expected a - b, got a - c");
    }

    #[test]
    fn test_unrecognised_output_is_verified() {
        let response = parse_output("").unwrap();
        assert!(response.verified);
        assert!(response.errors.is_empty());

        let response = parse_output("Picked up JAVA_TOOL_OPTIONS: -Xmx2g\n").unwrap();
        assert!(response.verified);
    }

    #[test]
    fn test_invalid_utf8_is_repaired() {
        let mut raw = b"13:01:02.003 [main] ERROR viper.gobra.Gobra - bad byte ".to_vec();
        raw.push(0xff);
        raw.extend_from_slice(b" here\n");

        let response = parse_raw_output(&raw).unwrap();
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "bad byte \u{FFFD} here");
    }

    #[test]
    fn test_crlf_line_endings() {
        let output = "12:00:00.000 [w-1] ERROR viper.gobra.reporting.FileWriterReporter - Error at: <a.go:5:9> Postcondition might not hold.\r\nAssertion res > 0 might not hold.\r\n12:00:01.000 [main] INFO viper.gobra.Gobra - Gobra has found 1 error(s)\r\n";
        let response = parse_output(output).unwrap();
        assert_eq!(
            response.errors[0].message,
            "Postcondition might not hold.\nAssertion res > 0 might not hold."
        );
    }
}
