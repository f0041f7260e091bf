//! Social-index rating lookup inside a segment body.
//!
//! The body following an anchor runs `<name> <rating> <next prefix>`. School
//! names may contain digits of their own (house numbers, "Schule 5"), so the
//! rating is taken to be the *last* standalone digit `1`-`9` in the body.

/// A located rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating<'a> {
    /// Body text before the rating, trimmed.
    pub name: &'a str,
    /// The rating value.
    pub value: i32,
    /// Byte offset in the body just past the rating digit. Everything from
    /// here on belongs to the next record's prefix.
    pub end: usize,
}

/// Finds the last whitespace-preceded digit `1`-`9` that is followed by
/// whitespace or the end of `body`.
///
/// Returns `None` if the body has no such digit.
#[must_use]
pub fn locate_rating(body: &str) -> Option<Rating<'_>> {
    let bytes = body.as_bytes();

    let ws_idx = (0..bytes.len().saturating_sub(1)).rev().find(|&i| {
        let digit = bytes[i + 1];
        bytes[i].is_ascii_whitespace()
            && (b'1'..=b'9').contains(&digit)
            && bytes.get(i + 2).is_none_or(u8::is_ascii_whitespace)
    })?;

    Some(Rating {
        name: body[..ws_idx].trim(),
        value: i32::from(bytes[ws_idx + 1] - b'0'),
        end: ws_idx + 2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_last_standalone_digit() {
        let rating = locate_rating("Schule 5 Teststraße 3 7").unwrap();
        assert_eq!(rating.name, "Schule 5 Teststraße 3");
        assert_eq!(rating.value, 7);
        assert_eq!(rating.end, "Schule 5 Teststraße 3 7".len());
    }

    #[test]
    fn remainder_is_next_prefix() {
        let body = "Grundschule Nord 3 Plön Preetz ";
        let rating = locate_rating(body).unwrap();
        assert_eq!(rating.name, "Grundschule Nord");
        assert_eq!(rating.value, 3);
        assert_eq!(&body[rating.end..], " Plön Preetz ");
    }

    #[test]
    fn ignores_zero_and_multi_digit_tokens() {
        assert_eq!(locate_rating("Schule 0 am Markt 12 "), None);
        let rating = locate_rating("Schule 4 am Markt 10 ").unwrap();
        assert_eq!(rating.value, 4);
        assert_eq!(rating.name, "Schule");
    }

    #[test]
    fn digit_needs_leading_whitespace() {
        assert_eq!(locate_rating("7"), None);
        assert_eq!(locate_rating("Haus7 "), None);
    }

    #[test]
    fn digit_glued_to_following_text_is_not_a_rating() {
        assert_eq!(locate_rating("Schule 3a "), None);
    }

    #[test]
    fn empty_body_has_no_rating() {
        assert_eq!(locate_rating(""), None);
        assert_eq!(locate_rating(" "), None);
    }
}
