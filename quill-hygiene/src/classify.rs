//! Email classification.

use std::fmt;

use regex::Regex;

use crate::HygieneError;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
const DOTTED_QUAD_PATTERN: &str = r"^(?:\d{1,3}\.){3}\d{1,3}$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Not a plausible address at all.
    Malformed,
    /// Local part is an IPv4-looking dotted quad, typical of bot signups.
    IpLocalPart,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Malformed => write!(f, "invalid email"),
            Reason::IpLocalPart => write!(f, "suspicious email"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Remove(Reason),
}

pub struct Classifier {
    email: Regex,
    dotted_quad: Regex,
}

impl Classifier {
    pub fn new() -> Result<Self, HygieneError> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            dotted_quad: Regex::new(DOTTED_QUAD_PATTERN)?,
        })
    }

    pub fn classify(&self, email: &str) -> Verdict {
        if !self.email.is_match(email) {
            return Verdict::Remove(Reason::Malformed);
        }
        let local = email.split('@').next().unwrap_or_default();
        if self.dotted_quad.is_match(local) {
            return Verdict::Remove(Reason::IpLocalPart);
        }
        Verdict::Keep
    }
}
