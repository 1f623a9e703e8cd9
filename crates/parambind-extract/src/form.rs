//! `application/x-www-form-urlencoded` bodies.

use crate::query::decode_pairs;
use crate::ExtractionSource;

/// Parses a url-encoded form body into ordered pairs.
pub(crate) fn form_pairs(body: &[u8]) -> Vec<(String, String)> {
    decode_pairs(ExtractionSource::Body, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_pairs() {
        let pairs = form_pairs(b"user.Name=alice&user.Password=secret+123");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, "user.Name");
        assert_eq!(pairs[1].1, "secret 123");
    }

    #[test]
    fn test_invalid_utf8_decoded_lossily() {
        let pairs = form_pairs(b"a=%FF");
        assert_eq!(pairs, [("a".to_string(), "\u{fffd}".to_string())]);
    }
}
