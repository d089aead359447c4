//! Comparison outcomes and their rendering.

use crate::error::ErrorKind;
use crate::path::{DiagnosticPath, Segment};
use crate::priority::Priority;
use crate::settings::Settings;

/// Marker appended to truncated text.
const TRUNCATION_MARK: &str = "..";

/// Name the compared object is rendered under when the caller has none.
pub const DEFAULT_NAME: &str = "current";

/// Half of a diagnostic sentence: a verb and what follows it, e.g.
/// `be` + `type "integer"` or `is` + `"character"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub verb: &'static str,
    pub text: String,
}

impl Description {
    pub fn new(verb: &'static str, text: impl Into<String>) -> Self {
        Self {
            verb,
            text: text.into(),
        }
    }
}

/// A single reason why `current` is not alike `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub kind: ErrorKind,
    /// What the failing location should be.
    pub target: Description,
    /// What it is instead, when worth saying.
    pub current: Option<Description>,
    /// Where the failure is, relative to `current`.
    pub path: DiagnosticPath,
    /// Arbitration slot for attribute failures; `Other` for everything else.
    pub priority: Priority,
}

impl Mismatch {
    pub fn new(kind: ErrorKind, target: Description) -> Self {
        Self {
            kind,
            target,
            current: None,
            path: DiagnosticPath::new(),
            priority: Priority::Other,
        }
    }

    pub fn with_current(mut self, current: Description) -> Self {
        self.current = Some(current);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Wrap the path in one more accessor.
    pub fn at(mut self, segment: Segment) -> Self {
        self.path.wrap(segment);
        self
    }

    /// The four sentence fragments: target verb, target text, current verb
    /// and current text (the last two empty when there is no current side).
    pub fn fragments(&self) -> [&str; 4] {
        let (verb, text) = match &self.current {
            Some(c) => (c.verb, c.text.as_str()),
            None => ("", ""),
        };
        [self.target.verb, self.target.text.as_str(), verb, text]
    }

    /// Everything after the subject: `should be X (is Y)`.
    pub fn predicate(&self) -> String {
        self.predicate_within(usize::MAX)
    }

    fn predicate_within(&self, max: usize) -> String {
        let [tv, tt, cv, ct] = self.fragments();
        let tt = truncate(tt, max);
        if self.current.is_some() {
            format!("should {} {} ({} {})", tv, tt, cv, truncate(ct, max))
        } else {
            format!("should {} {}", tv, tt)
        }
    }

    /// Render the full diagnostic with `name` standing for the compared
    /// object, e.g. `` `names(x)[1]` should be "a" (is "b") ``.
    pub fn render(&self, name: &str, settings: &Settings) -> String {
        let subject = truncate(&self.path.render(name), settings.width);
        let message = format!("`{}` {}", subject, self.predicate_within(settings.nchar_max));
        truncate(&message, settings.nchar_max)
    }
}

/// Outcome of a comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    mismatch: Option<Box<Mismatch>>,
    data_frame: bool,
}

impl Comparison {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn fail(mismatch: Mismatch) -> Self {
        Self {
            mismatch: Some(Box::new(mismatch)),
            data_frame: false,
        }
    }

    pub(crate) fn with_data_frame(mut self, data_frame: bool) -> Self {
        self.data_frame |= data_frame;
        self
    }

    pub fn success(&self) -> bool {
        self.mismatch.is_none()
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        self.mismatch.as_deref()
    }

    pub fn into_mismatch(self) -> Option<Mismatch> {
        self.mismatch.map(|m| *m)
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.mismatch().map(|m| m.kind)
    }

    pub fn priority(&self) -> Option<Priority> {
        self.mismatch().map(|m| m.priority)
    }

    /// Whether a `data.frame` class was seen while comparing attributes,
    /// which lets callers phrase hints in data-frame terms.
    pub fn data_frame(&self) -> bool {
        self.data_frame
    }

    /// Wrap a failure's path in one more accessor; successes pass through.
    pub fn wrap(mut self, segment: Segment) -> Self {
        if let Some(m) = self.mismatch.as_mut() {
            m.path.wrap(segment);
        }
        self
    }

    /// Render the failure, if any.
    pub fn render(&self, name: &str, settings: &Settings) -> Option<String> {
        self.mismatch().map(|m| m.render(name, settings))
    }
}

impl From<Option<Mismatch>> for Comparison {
    fn from(mismatch: Option<Mismatch>) -> Self {
        match mismatch {
            Some(m) => Comparison::fail(m),
            None => Comparison::ok(),
        }
    }
}

/// Cut `text` to at most `max` characters, ending in `..` when cut.
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(TRUNCATION_MARK.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(&TRUNCATION_MARK[..max.min(TRUNCATION_MARK.len())]);
    out
}
