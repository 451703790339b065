//! Field-level validation rules and the ordered violation collector

use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[\d\s\-()]+$").expect("valid phone pattern")
});

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("valid time pattern")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern")
});

/// `HH:MM` 24-hour clock check
pub fn is_hh_mm(value: &str) -> bool {
    TIME_RE.is_match(value)
}

/// Loose phone-number shape: digits, spaces, dashes, parens, optional `+`
pub fn is_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Absolute-URL check via the `url` crate
pub fn is_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

/// Ordered collector of rule violations for one step.
///
/// Every rule is total: it records its message on failure and never
/// short-circuits, so the final list holds all violations in the order the
/// rules were declared.
#[derive(Debug, Default)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an unconditional violation
    pub fn fail(&mut self, message: &str) {
        self.messages.push(message.into());
    }

    /// Non-empty string
    pub fn required(&mut self, value: &str, message: &str) -> &mut Self {
        if value.is_empty() {
            self.fail(message);
        }
        self
    }

    pub fn min_len(&mut self, value: &str, min: usize, message: &str) -> &mut Self {
        if value.chars().count() < min {
            self.fail(message);
        }
        self
    }

    pub fn max_len(&mut self, value: &str, max: usize, message: &str) -> &mut Self {
        if value.chars().count() > max {
            self.fail(message);
        }
        self
    }

    pub fn at_least(&mut self, value: f64, min: f64, message: &str) -> &mut Self {
        if value < min {
            self.fail(message);
        }
        self
    }

    pub fn at_most(&mut self, value: f64, max: f64, message: &str) -> &mut Self {
        if value > max {
            self.fail(message);
        }
        self
    }

    /// At least one element present
    pub fn non_empty<T>(&mut self, values: &[T], message: &str) -> &mut Self {
        if values.is_empty() {
            self.fail(message);
        }
        self
    }

    pub fn phone(&mut self, value: &str, message: &str) -> &mut Self {
        if !is_phone(value) {
            self.fail(message);
        }
        self
    }

    pub fn email(&mut self, value: &str, message: &str) -> &mut Self {
        if !is_email(value) {
            self.fail(message);
        }
        self
    }

    pub fn hh_mm(&mut self, value: &str, message: &str) -> &mut Self {
        if !is_hh_mm(value) {
            self.fail(message);
        }
        self
    }

    /// Valid absolute URL; the empty string passes (an unset optional field)
    pub fn url_or_empty(&mut self, value: &str, message: &str) -> &mut Self {
        if !value.is_empty() && !is_url(value) {
            self.fail(message);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}
