use std::fmt;

/// Errors raised while turning raw calendar entries into listing records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    /// An input entry cannot be grouped, e.g. its `title.en` is missing.
    MalformedEntry { index: usize, reason: &'static str },
}

impl fmt::Display for ListingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingError::MalformedEntry { index, reason } => {
                write!(f, "malformed calendar entry at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for ListingError {}
