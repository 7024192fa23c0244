//! Characters that cannot appear in an XML 1.0 document at all.

use crate::errors::{PlanFeedError, PlanFeedResult};

fn is_forbidden(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => false,
        '\u{0}'..='\u{1F}' => true,
        '\u{FFFE}' | '\u{FFFF}' => true,
        _ => false,
    }
}

/// Reject `value` if escaping cannot make it representable.
///
/// `field` names the value in the error.
pub fn check(field: &str, value: &str) -> PlanFeedResult<()> {
    match value.chars().find(|c| is_forbidden(*c)) {
        Some(bad) => Err(PlanFeedError::Encoding {
            field: field.to_string(),
            reason: format!("contains forbidden character U+{:04X}", bad as u32),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_is_allowed() {
        assert!(check("name", "A & B <test> \"q\" 'a'").is_ok());
    }

    #[test]
    fn test_whitespace_controls_allowed() {
        assert!(check("name", "a\tb\nc\r").is_ok());
    }

    #[test]
    fn test_forbidden_character_rejected() {
        for value in ["bad\u{1}name", "nul\u{0}", "x\u{FFFE}"] {
            assert!(check("name", value).is_err(), "{:?} should be rejected", value);
        }

        let err = check("name", "bad\u{1}name").unwrap_err();
        match err {
            PlanFeedError::Encoding { field, reason } => {
                assert_eq!(field, "name");
                assert!(reason.contains("U+0001"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
