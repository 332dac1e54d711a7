//! Invite codes: six uppercase alphanumeric characters.

use crate::core::GameRng;

/// Characters in an invite code.
pub const INVITE_CODE_LEN: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draw a fresh code. Uniqueness against active rooms is the caller's job.
pub fn generate(rng: &mut GameRng) -> String {
    (0..INVITE_CODE_LEN)
        .map(|_| ALPHABET[rng.gen_range_usize(0..ALPHABET.len())] as char)
        .collect()
}

/// Canonical form of user input: trimmed and upper-cased.
#[must_use]
pub fn normalize(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

/// Six characters, each `A-Z` or `0-9`.
#[must_use]
pub fn is_valid(code: &str) -> bool {
    code.len() == INVITE_CODE_LEN && code.bytes().all(|b| ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_valid() {
        let mut rng = GameRng::new(5);
        for _ in 0..200 {
            let code = generate(&mut rng);
            assert!(is_valid(&code), "bad code {code}");
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  ab12cd "), "AB12CD");
        assert!(is_valid(&normalize("ab12cd")));
    }

    #[test]
    fn test_is_valid_rejects() {
        assert!(!is_valid("ABC"));
        assert!(!is_valid("abcdef"));
        assert!(!is_valid("ABCDE!"));
        assert!(!is_valid("ABCDEFG"));
    }
}
