//! Client-side validation of fact submissions.

use thiserror::Error;
use url::Url;

use funfacts_store::NewFact;

use crate::Category;

/// Maximum length of a fact's text, in UTF-16 code units.
pub const MAX_TEXT_LEN: usize = 200;

/// A fact as entered by the user, before it reaches the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub source: String,
    pub category: String,
}

impl Candidate {
    pub fn new(
        text: impl Into<String>,
        source: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            category: category.into(),
        }
    }

    pub fn to_new_fact(&self) -> NewFact {
        NewFact {
            text: self.text.clone(),
            source: self.source.clone(),
            category: self.category.clone(),
        }
    }
}

/// Why a candidate was not sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("text is empty")]
    EmptyText,

    #[error("text is {len} characters, at most {max} allowed", max = MAX_TEXT_LEN)]
    TextTooLong { len: usize },

    #[error("source is not an absolute URL")]
    InvalidSource,

    #[error("source must be an http or https URL, got '{0}'")]
    UnsupportedScheme(String),

    #[error("category is empty")]
    EmptyCategory,

    #[error("unknown category '{0}'")]
    UnknownCategory(String),
}

/// Length of `text` as counted by the submission form.
pub fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Check a candidate. Pure; performs no I/O.
pub fn validate(candidate: &Candidate) -> Result<(), ValidationError> {
    if candidate.text.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    let len = text_len(&candidate.text);
    if len > MAX_TEXT_LEN {
        return Err(ValidationError::TextTooLong { len });
    }

    let url = Url::parse(&candidate.source).map_err(|_| ValidationError::InvalidSource)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ValidationError::UnsupportedScheme(url.scheme().to_string()));
    }

    if candidate.category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    if Category::find(&candidate.category).is_none() {
        return Err(ValidationError::UnknownCategory(candidate.category.clone()));
    }

    Ok(())
}

pub fn is_valid(candidate: &Candidate) -> bool {
    validate(candidate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bees() -> Candidate {
        Candidate::new(
            "Bees can recognize human faces.",
            "https://example.com/bees",
            "science",
        )
    }

    #[test]
    fn test_valid_candidate() {
        assert_eq!(validate(&bees()), Ok(()));
        let http = Candidate {
            source: "http://example.com".into(),
            ..bees()
        };
        assert!(is_valid(&http));
    }

    #[test]
    fn test_text_rules() {
        let empty = Candidate {
            text: String::new(),
            ..bees()
        };
        assert_eq!(validate(&empty), Err(ValidationError::EmptyText));

        let exact = Candidate {
            text: "a".repeat(MAX_TEXT_LEN),
            ..bees()
        };
        assert!(is_valid(&exact));

        let long = Candidate {
            text: "a".repeat(MAX_TEXT_LEN + 1),
            ..bees()
        };
        assert_eq!(
            validate(&long),
            Err(ValidationError::TextTooLong { len: 201 })
        );
    }

    #[test]
    fn test_text_length_counts_utf16_units() {
        // Each emoji is a surrogate pair.
        let text = "\u{1F92F}".repeat(100);
        assert_eq!(text_len(&text), 200);
        assert!(is_valid(&Candidate { text: text.clone(), ..bees() }));

        let text = format!("{}a", text);
        assert!(!is_valid(&Candidate { text, ..bees() }));
    }

    #[test]
    fn test_source_rules() {
        for source in ["", "example.com", "/relative/path", "not a url"] {
            let candidate = Candidate {
                source: source.into(),
                ..bees()
            };
            assert_eq!(
                validate(&candidate),
                Err(ValidationError::InvalidSource),
                "{source:?}"
            );
        }

        let ftp = Candidate {
            source: "ftp://example.com/file".into(),
            ..bees()
        };
        assert_eq!(
            validate(&ftp),
            Err(ValidationError::UnsupportedScheme("ftp".into()))
        );

        let mailto = Candidate {
            source: "mailto:someone@example.com".into(),
            ..bees()
        };
        assert!(!is_valid(&mailto));
    }

    #[test]
    fn test_category_rules() {
        let empty = Candidate {
            category: String::new(),
            ..bees()
        };
        assert_eq!(validate(&empty), Err(ValidationError::EmptyCategory));

        let unknown = Candidate {
            category: "sports".into(),
            ..bees()
        };
        assert_eq!(
            validate(&unknown),
            Err(ValidationError::UnknownCategory("sports".into()))
        );
    }
}
