//! Player name rule: Hangul syllables, ASCII letters and digits only.
//! Names containing Hangul are 2-10 characters, others 2-20.

use crate::error::NameError;

const KOREAN_LEN: (usize, usize) = (2, 10);
const OTHER_LEN: (usize, usize) = (2, 20);

fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c) // 가..=힣
}

fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Validate `name` and return it trimmed. A byte order mark counts as blank.
pub fn validate_player_name(name: &str) -> Result<&str, NameError> {
    let trimmed = name.trim_matches(is_trimmable);
    if trimmed.is_empty() {
        return Err(NameError::EmptyName);
    }

    let mut korean = 0usize;
    let mut other = 0usize;
    for c in trimmed.chars() {
        if is_hangul_syllable(c) {
            korean += 1;
        } else if c.is_ascii_alphanumeric() {
            other += 1;
        } else {
            return Err(NameError::InvalidCharacters);
        }
    }

    let ((min, max), len) = if korean > 0 {
        (KOREAN_LEN, korean + other)
    } else {
        (OTHER_LEN, other)
    };
    if len < min || len > max {
        return Err(NameError::LengthOutOfRange { len, min, max });
    }
    Ok(trimmed)
}
