//! Log sanitization for patient data.
//!
//! Log lines pass through [`SanitizingMakeWriter`] before reaching the sink,
//! which redacts:
//! - Assessment / report identifiers (UUIDs and report file names)
//! - Clinical `field=value` pairs using the model's feature names
//! - Email addresses and phone numbers
//!
//! Sanitizing strings is a fallback. Call sites should not log patient
//! answers in the first place.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::FEATURE_NAMES;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Maximum bytes sanitized per call; the rest of the line is dropped.
const MAX_SANITIZE_BYTES: usize = 16 * 1024;

struct Pattern {
    regex: Regex,
    replacement: String,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Pattern>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn rule_sources() -> Vec<(String, String)> {
    let fields = FEATURE_NAMES.join("|");
    vec![
        (
            r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}".into(),
            "[REDACTED-ID]".into(),
        ),
        (
            r"HeartGuard_Report_[0-9a-fA-F]{8}".into(),
            "HeartGuard_Report_[REDACTED-ID]".into(),
        ),
        (
            format!(r"(?i)\b({fields})\s*[=:]\s*-?[0-9]+(?:\.[0-9]+)?"),
            "${1}=[REDACTED]".into(),
        ),
        (
            r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b".into(),
            "[REDACTED-EMAIL]".into(),
        ),
        (
            r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s][0-9]{3}[-.\s][0-9]{4}\b".into(),
            "[REDACTED-PHONE]".into(),
        ),
    ]
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        let sources = rule_sources();
        // Patterns are static and covered by tests.
        let set = RegexSet::new(sources.iter().map(|(p, _)| p)).expect("Valid regex set");
        let rules = sources
            .into_iter()
            .map(|(pattern, replacement)| Pattern {
                regex: Regex::new(&pattern).expect("Valid regex"),
                replacement,
            })
            .collect();
        Patterns { set, rules }
    })
}

/// Replace sensitive values in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, MAX_SANITIZE_BYTES)
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule
            .regex
            .replace_all(&result, rule.replacement.as_str())
            .into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// A `tracing_subscriber` writer wrapper that sanitizes each formatted log
/// line before it is written to the underlying sink.
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

pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn write_sanitized(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        self.inner.write_all(sanitize(&text).as_bytes())
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_sanitized(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A single line longer than the cap is flushed early.
        if self.buffer.len() > MAX_SANITIZE_BYTES * 2 {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
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
            buffer: Vec::new(),
        }
    }
}
