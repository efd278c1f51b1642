//! Local PII redaction using regex patterns.
//!
//! Rules run in a fixed order and each one rewrites the output of the
//! previous one, so a span already replaced by an earlier rule is never seen
//! (or counted) by a later one.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::types::{RedactionResult, RedactionSource};

/// Categories of PII handled by the local redactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PiiCategory {
    Cpf,
    Email,
    Phone,
    Address,
    Name,
}

impl PiiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PiiCategory::Cpf => "CPF",
            PiiCategory::Email => "EMAIL",
            PiiCategory::Phone => "PHONE",
            PiiCategory::Address => "ADDRESS",
            PiiCategory::Name => "NAME",
        }
    }

    /// Text substituted for every match of this category.
    pub fn placeholder(&self) -> &'static str {
        match self {
            PiiCategory::Cpf => "[CPF OCULTO]",
            PiiCategory::Email => "[EMAIL OCULTO]",
            PiiCategory::Phone => "[TELEFONE OCULTO]",
            PiiCategory::Address => "[ENDEREÇO OCULTO]",
            PiiCategory::Name => "[NOME OCULTO]",
        }
    }
}

/// A match found by one rule, with offsets into the text that rule saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiiMatch {
    pub category: PiiCategory,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// One step of the redaction pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub category: PiiCategory,
    regex: &'static Regex,
}

impl PatternRule {
    pub fn placeholder(&self) -> &'static str {
        self.category.placeholder()
    }

    pub fn pattern(&self) -> &'static str {
        self.regex.as_str()
    }

    /// Apply this rule to `text`, returning the rewritten text and the matches.
    fn apply(&self, text: &str) -> (String, Vec<PiiMatch>) {
        let matches: Vec<PiiMatch> = self
            .regex
            .find_iter(text)
            .map(|m| PiiMatch {
                category: self.category,
                start: m.start(),
                end: m.end(),
                text: m.as_str().to_string(),
            })
            .collect();

        if matches.is_empty() {
            return (text.to_string(), matches);
        }

        let rewritten = self
            .regex
            .replace_all(text, NoExpand(self.placeholder()))
            .into_owned();
        (rewritten, matches)
    }
}

// CPF: 000.000.000-00 or 11 bare digits.
static CPF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{3}\.\d{3}\.\d{3}-\d{2}\b|\b\d{11}\b").expect("valid CPF pattern")
});
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").expect("valid email pattern")
});
// (00) 0000-0000, (00) 00000-0000, 00 000000000 ...
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\(\d{2}\)|\b\d{2})\s?\d{4,5}-?\d{4}\b").expect("valid phone pattern")
});
// Greedy tail: swallows the rest of the word/space run after the keyword.
static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Rua|Avenida|Av\.|Travessa|Quadra|Condomínio|Conj\.)\s+[\w\s]+")
        .expect("valid address pattern")
});
static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b[A-ZÀÁÂÃÉÊÍÓÔÕÚÇ][a-zàáâãéêíóôõúç]+\s[A-ZÀÁÂÃÉÊÍÓÔÕÚÇ][a-zàáâãéêíóôõúç]+\b",
    )
    .expect("valid name pattern")
});

/// Regex-based redactor, usable standalone or as the pipeline fallback.
#[derive(Debug, Clone)]
pub struct LocalRedactor {
    rules: Vec<PatternRule>,
}

impl LocalRedactor {
    /// Create a redactor with the built-in rules in their fixed order.
    pub fn new() -> Self {
        Self {
            rules: vec![
                PatternRule { category: PiiCategory::Cpf, regex: &CPF_RE },
                PatternRule { category: PiiCategory::Email, regex: &EMAIL_RE },
                PatternRule { category: PiiCategory::Phone, regex: &PHONE_RE },
                PatternRule { category: PiiCategory::Address, regex: &ADDRESS_RE },
                PatternRule { category: PiiCategory::Name, regex: &NAME_RE },
            ],
        }
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Redact PII from `text`.
    pub fn redact(&self, text: &str) -> RedactionResult {
        if text.trim().is_empty() {
            return RedactionResult::unchanged(text, RedactionSource::Local);
        }

        let (redacted, hidden_count) =
            self.rules
                .iter()
                .fold((text.to_string(), 0usize), |(current, count), rule| {
                    let (next, matches) = rule.apply(&current);
                    (next, count + matches.len())
                });

        RedactionResult::new(text, redacted, hidden_count, RedactionSource::Local)
    }

    /// Matches of every rule, in application order.
    ///
    /// Offsets refer to the text as each rule saw it, i.e. after all earlier
    /// rules have rewritten it.
    pub fn detect(&self, text: &str) -> Vec<PiiMatch> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut current = text.to_string();
        let mut found = Vec::new();
        for rule in &self.rules {
            let (next, matches) = rule.apply(&current);
            found.extend(matches);
            current = next;
        }
        found
    }

    /// Substitution counts per category.
    pub fn counts_by_category(&self, text: &str) -> BTreeMap<PiiCategory, usize> {
        let mut counts = BTreeMap::new();
        for m in self.detect(text) {
            *counts.entry(m.category).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for LocalRedactor {
    fn default() -> Self {
        Self::new()
    }
}
