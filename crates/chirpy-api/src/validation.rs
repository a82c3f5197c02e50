use tracing::debug;

use crate::error::ApiError;

pub const MAX_CHIRP_CHARS: usize = 140;

const PROFANITY: &[&str] = &["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

/// Trim, length-check and mask a chirp body before it is stored.
pub fn clean_chirp(body: &str) -> Result<String, ApiError> {
    let trimmed = body.trim();
    let len = trimmed.chars().count();
    if len > MAX_CHIRP_CHARS {
        debug!(len, "Rejected chirp over {} characters", MAX_CHIRP_CHARS);
        return Err(ApiError::BadRequest("Chirp is too long"));
    }

    Ok(mask_profanity(trimmed))
}

/// Words are split on single spaces; a word only matches when it is exactly
/// a listed word, ignoring case. Punctuation-attached words pass through.
fn mask_profanity(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if PROFANITY.contains(&word.to_lowercase().as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_listed_words_case_insensitively() {
        assert_eq!(
            clean_chirp("This is a Kerfuffle opinion I need to share with the world").unwrap(),
            "This is a **** opinion I need to share with the world"
        );
        assert_eq!(clean_chirp("SHARBERT fornax").unwrap(), "**** ****");
    }

    #[test]
    fn punctuation_keeps_word_unmasked() {
        assert_eq!(clean_chirp("Sharbert!").unwrap(), "Sharbert!");
    }

    #[test]
    fn trims_before_measuring() {
        let body = format!("  {}  ", "a".repeat(MAX_CHIRP_CHARS));
        assert_eq!(clean_chirp(&body).unwrap().len(), MAX_CHIRP_CHARS);
    }

    #[test]
    fn rejects_over_limit() {
        let body = "a".repeat(MAX_CHIRP_CHARS + 1);
        assert!(matches!(clean_chirp(&body), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let body = "é".repeat(MAX_CHIRP_CHARS);
        assert!(clean_chirp(&body).is_ok());
    }
}
