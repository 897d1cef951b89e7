//! Tag *name* syntax validation (`spec.md` §9, supplemented — see
//! `SPEC_FULL.md` §4.C). Distinct from the resolution/closure semantics
//! the spec actually requires: this is a low-risk naming convention
//! carried from the reference corpus and applied only to newly
//! created/renamed tags and aliases, never to historical rows.

/// Valid tag names:
/// - alphanumeric, underscore, and hyphen only
/// - must start with a letter
/// - no consecutive hyphens
/// - cannot end with a hyphen
pub fn validate_tag_name(name: &str) -> Result<(), TagValidationError> {
    if name.is_empty() {
        return Err(TagValidationError::Empty);
    }

    let first_char = name.chars().next().unwrap();
    if !first_char.is_ascii_alphabetic() {
        return Err(TagValidationError::InvalidStart(first_char));
    }

    let last_char = name.chars().last().unwrap();
    if last_char == '-' {
        return Err(TagValidationError::EndsWithHyphen);
    }

    let mut prev_was_hyphen = false;
    for ch in name.chars() {
        if !is_valid_tag_char(ch) {
            return Err(TagValidationError::InvalidCharacter(ch));
        }
        if ch == '-' {
            if prev_was_hyphen {
                return Err(TagValidationError::ConsecutiveHyphens);
            }
            prev_was_hyphen = true;
        } else {
            prev_was_hyphen = false;
        }
    }

    Ok(())
}

fn is_valid_tag_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    Empty,
    InvalidStart(char),
    EndsWithHyphen,
    ConsecutiveHyphens,
    InvalidCharacter(char),
}

impl std::fmt::Display for TagValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagValidationError::Empty => write!(f, "tag name cannot be empty"),
            TagValidationError::InvalidStart(ch) => {
                write!(f, "tag name must start with a letter, found '{ch}'")
            }
            TagValidationError::EndsWithHyphen => write!(f, "tag name cannot end with a hyphen"),
            TagValidationError::ConsecutiveHyphens => {
                write!(f, "tag name cannot contain consecutive hyphens")
            }
            TagValidationError::InvalidCharacter(ch) => write!(
                f,
                "tag name contains invalid character '{ch}' (only alphanumeric, underscore, and hyphen allowed)"
            ),
        }
    }
}

impl std::error::Error for TagValidationError {}
