//! Line-delimited observation reader.
//!
//! One number per line. Values are parsed as `f64`, so integer and
//! floating-point datasets load the same way. Blank lines and surrounding
//! whitespace are ignored.

use std::io::BufRead;

use thiserror::Error;
use tracing::debug;

/// Errors raised while reading observations.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read observations: {0}")]
    Io(#[from] std::io::Error),

    /// `line` is 1-based.
    #[error("line {line}: cannot parse {text:?} as a number")]
    Parse { line: usize, text: String },
}

/// Parses observations from an in-memory string.
///
/// # Examples
/// ```
/// use u_dist::io::parse_observations;
/// let data = parse_observations("1\n2.5\n\n-3e1\n").unwrap();
/// assert_eq!(data, vec![1.0, 2.5, -30.0]);
/// ```
pub fn parse_observations(text: &str) -> Result<Vec<f64>, ReadError> {
    read_observations(text.as_bytes())
}

/// Reads observations from any buffered reader, such as a
/// `BufReader<File>`.
pub fn read_observations<R: BufRead>(reader: R) -> Result<Vec<f64>, ReadError> {
    let mut data = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed.parse::<f64>().map_err(|_| ReadError::Parse {
            line: idx + 1,
            text: trimmed.to_string(),
        })?;
        data.push(value);
    }
    debug!(count = data.len(), "read observations");
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{Gaussian, Univariate};

    #[test]
    fn test_parse_integers_and_floats() {
        let data = parse_observations("10\n 11.5 \n12\r\n").unwrap();
        assert_eq!(data, vec![10.0, 11.5, 12.0]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_observations("").unwrap().is_empty());
        assert!(parse_observations("\n\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = parse_observations("1\n\nabc\n4\n").unwrap_err();
        match err {
            ReadError::Parse { line, text } => {
                assert_eq!(line, 3);
                assert_eq!(text, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_then_load() {
        let text = "1\n2\n3\n4\n5\n";
        let data = read_observations(std::io::Cursor::new(text)).unwrap();
        let g = Gaussian::from_sample(&data).unwrap();
        assert_eq!(g.describe(), format!("mean 3, standard deviation {}", 2.5_f64.sqrt()));
    }
}
