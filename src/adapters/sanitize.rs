//! Log sanitization for submitted symptom data.
//!
//! Symptom scores are health data. Handlers never log them on purpose, but
//! error texts and request traces can still carry them, so every formatted
//! log line is passed through [`sanitize`] before it reaches the sink:
//! - `<symptom name>=<score>` / `<symptom name>: <score>` pairs
//! - raw form-encoded payloads (`a=1&b=2&...`)
//! - the rejected value quoted in a parse error
//! - e-mail addresses and UUIDs
//!
//! Input is capped at `ENDOSCREEN_SANITIZE_MAX_BYTES` (default 16 KiB) per
//! call.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::FEATURE_NAMES;

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    any: RegexSet,
    rules: Vec<Rule>,
}

fn max_sanitize_bytes() -> usize {
    std::env::var("ENDOSCREEN_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn cut_at_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        let symptom_names = FEATURE_NAMES
            .iter()
            // Names may appear decoded or form-encoded (`Pelvic+pain`, `Pelvic%20pain`).
            .map(|name| regex::escape(name).replace(' ', r"(?:\s|\+|%20)"))
            .collect::<Vec<_>>()
            .join("|");

        let sources: Vec<(String, &'static str)> = vec![
            // Parse errors quote the submitted value; keep the feature name.
            (
                r"(to float for '[^']{0,80}'): '[^']{0,256}'".to_string(),
                "$1: '[REDACTED]'",
            ),
            // Form-encoded bodies: two or more key=value pairs joined by '&'.
            (
                r"[^\s&=]+=[^\s&]*(?:&[^\s&=]+=[^\s&]*)+".to_string(),
                "[REDACTED-FORM]",
            ),
            // Named symptom followed by a score.
            (
                format!(
                    r"(?i)(?:{symptom_names})\s*[:=]\s*(?:[-+]?(?:\d+\.?\d*|\.\d+)(?:e[-+]?\d+)?|nan|inf(?:inity)?)"
                ),
                "[REDACTED-SYMPTOM]",
            ),
            (
                r"(?i)\b[a-z0-9._%+-]{1,64}@(?:[a-z0-9-]{1,63}\.)+[a-z]{2,}\b".to_string(),
                "[REDACTED-EMAIL]",
            ),
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}"
                    .to_string(),
                "[REDACTED-UUID]",
            ),
        ];

        let any = RegexSet::new(sources.iter().map(|(p, _)| p.as_str()))
            .expect("Valid regex set");
        let rules = sources
            .iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement: *replacement,
            })
            .collect();

        Patterns { any, rules }
    })
}

/// Redact symptom data and identifiers from a log line.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = patterns();
    let (prefix, truncated) = cut_at_char_boundary(input, max_bytes);

    let mut out = prefix.to_string();
    // Rules run in order, and only those that matched the unmodified line.
    for idx in patterns.any.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        out = rule.regex.replace_all(&out, rule.replacement).into_owned();
    }

    if truncated {
        out.push_str(" [TRUNCATED]");
    }
    out
}

/// `MakeWriter` wrapper that sanitizes formatted output line by line.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            pending: Vec::new(),
        }
    }
}

/// Buffers partial lines and sanitizes each complete line before writing it.
pub struct SanitizingWriter<W> {
    inner: W,
    pending: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn emit(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let clean = sanitize(&String::from_utf8_lossy(bytes));
        self.inner.write_all(clean.as_bytes())
    }

    fn drain_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);

        // A line with no newline in sight is flushed as-is (capped by sanitize).
        if self.pending.len() > max_sanitize_bytes().saturating_mul(2) {
            let line = std::mem::take(&mut self.pending);
            self.emit(&line)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.drain_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.drain_lines()?;
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest)?;
        }
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_sanitize_symptom_scores() {
        let input = "scored Pelvic pain=3.5 and Bloating: 1";
        let out = sanitize(input);
        assert_eq!(out, "scored [REDACTED-SYMPTOM] and [REDACTED-SYMPTOM]");
    }

    #[test]
    fn test_sanitize_single_encoded_pair() {
        assert_eq!(sanitize("body Pelvic+pain=4"), "body [REDACTED-SYMPTOM]");
        assert_eq!(
            sanitize("body Ovarian%20cysts=2.5 end"),
            "body [REDACTED-SYMPTOM] end"
        );
    }

    #[test]
    fn test_sanitize_parse_error_value() {
        let input = "could not convert string to float for 'Bloating': 'seven'";
        let out = sanitize(input);
        assert!(out.contains("'Bloating': '[REDACTED]'"), "{out}");
        assert!(!out.contains("seven"));
    }

    #[test]
    fn test_sanitize_form_body() {
        let input = "body Ovarian+cysts=1&Bloating=0&Infertility=2 end";
        let out = sanitize(input);
        assert_eq!(out, "body [REDACTED-FORM] end");
    }

    #[test]
    fn test_sanitize_leaves_tracing_fields() {
        let input = "request method=POST uri=/predict status=400";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_sanitize_identifiers() {
        let out = sanitize("from patient@clinic.org id 550e8400-e29b-41d4-a716-446655440000");
        assert!(out.contains("[REDACTED-EMAIL]"));
        assert!(out.contains("[REDACTED-UUID]"));
    }

    #[test]
    fn test_sanitize_truncates_at_char_boundary() {
        let out = sanitize_with_limit("ééééé", 3);
        assert_eq!(out, "é [TRUNCATED]");
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sanitizes_split_lines() {
        let sink = Capture::default();
        let mut writer = SanitizingWriter {
            inner: sink.clone(),
            pending: Vec::new(),
        };

        writer.write_all(b"got Pelvic ").unwrap();
        writer.write_all(b"pain=4\nnext line\n").unwrap();
        writer.flush().unwrap();

        let written = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "got [REDACTED-SYMPTOM]\nnext line\n");
    }
}
