//! Prometheus text exposition decoder
//!
//! Handles the subset the catalog needs:
//! - `# HELP` and `# TYPE` metadata lines
//! - Sample lines with optional label sets and timestamps
//! - Histogram, summary and gauge histogram series folded into their family

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use mcat_catalog::MetricKind;
use mcat_sync::{MetricFamily, Sample};

use crate::error::DecodeError;

/// Series suffixes that belong to a declared family of the given kinds
const SUFFIXES: &[(&str, &[MetricKind])] = &[
    ("_bucket", &[MetricKind::Histogram, MetricKind::GaugeHistogram]),
    ("_sum", &[MetricKind::Histogram, MetricKind::Summary]),
    ("_count", &[MetricKind::Histogram, MetricKind::Summary]),
    ("_gsum", &[MetricKind::GaugeHistogram]),
    ("_gcount", &[MetricKind::GaugeHistogram]),
];

/// Decode exposition text into metric families sorted by name
///
/// # Errors
/// Returns the first [`DecodeError`] encountered, with its line number.
pub fn decode(text: &str) -> Result<Vec<MetricFamily>, DecodeError> {
    let mut decoder = Decoder::default();
    for (index, line) in text.lines().enumerate() {
        decoder.line(index + 1, line.trim())?;
    }
    Ok(decoder.finish())
}

#[derive(Debug, Default)]
struct Decoder {
    families: Vec<MetricFamily>,
    by_name: HashMap<String, usize>,
    typed: HashMap<String, usize>,
}

impl Decoder {
    fn line(&mut self, line: usize, text: &str) -> Result<(), DecodeError> {
        if text.is_empty() {
            return Ok(());
        }
        match text.strip_prefix('#') {
            Some(comment) => self.comment(line, comment.trim_start()),
            None => self.sample(line, text),
        }
    }

    fn comment(&mut self, line: usize, comment: &str) -> Result<(), DecodeError> {
        if let Some(rest) = comment.strip_prefix("HELP ") {
            let (name, help) = split_token(rest);
            let help = unescape_help(help);
            self.family_mut(name).help = help;
        } else if let Some(rest) = comment.strip_prefix("TYPE ") {
            let (name, kind) = split_token(rest);
            let kind = MetricKind::from_str(kind.trim()).map_err(|e| DecodeError::UnknownType { line, kind: e.0 })?;
            if self.typed.insert(name.to_string(), line).is_some() {
                return Err(DecodeError::DuplicateType {
                    line,
                    name: name.to_string(),
                });
            }
            self.family_mut(name).kind = kind;
        }
        Ok(())
    }

    fn sample(&mut self, line: usize, text: &str) -> Result<(), DecodeError> {
        let name_end = text
            .find(|c: char| c == '{' || c.is_whitespace())
            .unwrap_or(text.len());
        let name = &text[..name_end];
        if name.is_empty() {
            return Err(DecodeError::MissingName { line });
        }

        let mut rest = text[name_end..].trim_start();
        let mut labels = BTreeMap::new();
        if let Some(body) = rest.strip_prefix('{') {
            let (parsed, after) = parse_labels(body).map_err(|message| DecodeError::malformed_labels(line, message))?;
            labels = parsed;
            rest = after;
        }

        // Optional timestamp after the value is ignored
        let value = rest.split_whitespace().next().ok_or_else(|| DecodeError::MissingValue {
            line,
            name: name.to_string(),
        })?;
        let value = f64::from_str(value).map_err(|_| DecodeError::InvalidValue {
            line,
            value: value.to_string(),
        })?;

        let index = self.resolve(name);
        let family = &mut self.families[index];
        match family.kind {
            MetricKind::Histogram | MetricKind::GaugeHistogram if name.ends_with("_bucket") => {
                labels.remove("le");
            }
            MetricKind::Summary if name == family.name => {
                labels.remove("quantile");
            }
            _ => {}
        }
        family.samples.push(Sample { labels, value });
        Ok(())
    }

    /// Family owning a sample series name
    fn resolve(&mut self, series: &str) -> usize {
        if let Some(&index) = self.by_name.get(series) {
            return index;
        }
        for &(suffix, kinds) in SUFFIXES {
            let Some(base) = series.strip_suffix(suffix) else {
                continue;
            };
            if let Some(&index) = self.by_name.get(base) {
                if kinds.contains(&self.families[index].kind) {
                    return index;
                }
            }
        }
        tracing::warn!(metric = series, "Sample without TYPE declaration, treating as untyped");
        self.insert(series)
    }

    fn family_mut(&mut self, name: &str) -> &mut MetricFamily {
        let index = match self.by_name.get(name) {
            Some(&index) => index,
            None => self.insert(name),
        };
        &mut self.families[index]
    }

    fn insert(&mut self, name: &str) -> usize {
        let index = self.families.len();
        self.families.push(MetricFamily::new(name, MetricKind::Untyped, ""));
        self.by_name.insert(name.to_string(), index);
        index
    }

    fn finish(mut self) -> Vec<MetricFamily> {
        self.families.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!(families = self.families.len(), "Decoded exposition");
        self.families
    }
}

/// Split off the first whitespace-delimited token
fn split_token(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(at) => (&text[..at], text[at..].trim_start()),
        None => (text, ""),
    }
}

fn unescape_help(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Parse the body of a label set (after `{`), returning the labels and the
/// text following the closing `}`
fn parse_labels(body: &str) -> Result<(BTreeMap<String, String>, &str), String> {
    let mut labels = BTreeMap::new();
    let mut rest = body;

    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix('}') {
            return Ok((labels, after));
        }

        let name_end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .ok_or("unterminated label set")?;
        let name = &rest[..name_end];
        if name.is_empty() {
            return Err(format!("expected label name at '{}'", preview(rest)));
        }

        rest = rest[name_end..].trim_start();
        rest = rest
            .strip_prefix('=')
            .ok_or_else(|| format!("expected '=' after label '{name}'"))?
            .trim_start();
        rest = rest
            .strip_prefix('"')
            .ok_or_else(|| format!("expected quoted value for label '{name}'"))?;

        let (value, after) = parse_quoted(rest).ok_or_else(|| format!("unterminated value for label '{name}'"))?;
        labels.insert(name.to_string(), value);

        rest = after.trim_start();
        if let Some(after) = rest.strip_prefix(',') {
            rest = after;
        } else if !rest.starts_with('}') {
            return Err(format!("expected ',' or '}}' at '{}'", preview(rest)));
        }
    }
}

/// Read an escaped label value up to its closing quote
fn parse_quoted(text: &str) -> Option<(String, &str)> {
    let mut value = String::new();
    let mut chars = text.char_indices();
    while let Some((at, c)) = chars.next() {
        match c {
            '"' => return Some((value, &text[at + 1..])),
            '\\' => match chars.next()?.1 {
                'n' => value.push('\n'),
                escaped @ ('\\' | '"') => value.push(escaped),
                other => {
                    value.push('\\');
                    value.push(other);
                }
            },
            c => value.push(c),
        }
    }
    None
}

fn preview(text: &str) -> &str {
    let end = text.char_indices().nth(16).map_or(text.len(), |(at, _)| at);
    &text[..end]
}
