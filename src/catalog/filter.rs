//! User-editable search and filter criteria.

use super::record::Record;
use std::fmt;

/// Current search/filter criteria.
///
/// Starts empty and only changes through [`FilterState::apply`] and
/// [`FilterState::reset`]. It is never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    search_term: String,
    year_from: Option<i32>,
    year_to: Option<i32>,
    format: Option<String>,
}

/// Values submitted by the filter UI in a single "apply" action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub search_term: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub format: Option<String>,
}

impl FilterUpdate {
    pub fn search(term: impl Into<String>) -> Self {
        FilterUpdate {
            search_term: Some(term.into()),
            ..Default::default()
        }
    }

    pub fn years(year_from: Option<i32>, year_to: Option<i32>) -> Self {
        FilterUpdate {
            year_from,
            year_to,
            ..Default::default()
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the criteria with the submitted values.
    ///
    /// An empty term or empty format means unset. The term is kept verbatim,
    /// so a lone space still matches text containing a space.
    pub fn apply(&mut self, update: FilterUpdate) {
        self.search_term = update.search_term.unwrap_or_default();
        self.year_from = update.year_from;
        self.year_to = update.year_to;
        self.format = update.format.filter(|f| !f.is_empty());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn year_from(&self) -> Option<i32> {
        self.year_from
    }

    pub fn year_to(&self) -> Option<i32> {
        self.year_to
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// The current values, as the filter UI would pre-fill its form.
    pub fn to_update(&self) -> FilterUpdate {
        FilterUpdate {
            search_term: (!self.search_term.is_empty()).then(|| self.search_term.clone()),
            year_from: self.year_from,
            year_to: self.year_to,
            format: self.format.clone(),
        }
    }

    /// True when no criterion is active.
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty()
            && self.year_from.is_none()
            && self.year_to.is_none()
            && self.format.is_none()
    }

    pub fn compile(&self) -> CompiledFilter<'_> {
        CompiledFilter {
            needle: (!self.search_term.is_empty()).then(|| self.search_term.to_lowercase()),
            year_from: self.year_from,
            year_to: self.year_to,
            format: self.format.as_deref().filter(|f| !f.is_empty()),
        }
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(no filter)");
        }
        let mut parts: Vec<String> = Vec::new();
        if !self.search_term.is_empty() {
            parts.push(format!("search=\"{}\"", self.search_term));
        }
        if let Some(y) = self.year_from {
            parts.push(format!("from={}", y));
        }
        if let Some(y) = self.year_to {
            parts.push(format!("to={}", y));
        }
        if let Some(format) = &self.format {
            parts.push(format!("format={}", format));
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// A filter ready to be evaluated against many records.
#[derive(Debug)]
pub struct CompiledFilter<'a> {
    needle: Option<String>,
    year_from: Option<i32>,
    year_to: Option<i32>,
    format: Option<&'a str>,
}

impl CompiledFilter<'_> {
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_search(record)
            && self.matches_years(record)
            && self.matches_format(record)
    }

    fn matches_search(&self, record: &Record) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        record.artist().to_lowercase().contains(needle.as_str())
            || record.title().to_lowercase().contains(needle.as_str())
    }

    fn matches_years(&self, record: &Record) -> bool {
        if self.year_from.is_none() && self.year_to.is_none() {
            return true;
        }
        let Some(year) = record.release_year() else {
            return false;
        };
        self.year_from.map_or(true, |from| year >= from)
            && self.year_to.map_or(true, |to| year <= to)
    }

    fn matches_format(&self, record: &Record) -> bool {
        match self.format {
            None => true,
            Some(wanted) => record.format().is_some_and(|f| f == wanted),
        }
    }
}
