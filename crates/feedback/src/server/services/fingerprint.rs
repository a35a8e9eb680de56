//! Content fingerprints used as classification cache keys

use sha2::{Digest, Sha256};

/// SHA-256 of the exact UTF-8 bytes, as uppercase hex
///
/// No trimming or case folding happens here: only byte-identical text shares
/// a fingerprint.
pub fn fingerprint(text: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(text.as_bytes());
  hex::encode_upper(hasher.finalize())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fingerprint_is_deterministic() {
    assert_eq!(fingerprint("The app crashes on login"), fingerprint("The app crashes on login"));
  }

  #[test]
  fn test_fingerprint_known_vector() {
    assert_eq!(
      fingerprint("abc"),
      "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"
    );
  }

  #[test]
  fn test_fingerprint_shape() {
    let key = fingerprint("");
    assert_eq!(key.len(), 64);
    assert!(key.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
  }

  #[test]
  fn test_fingerprint_does_not_normalize() {
    let base = fingerprint("slow checkout");
    assert_ne!(base, fingerprint("slow checkout "));
    assert_ne!(base, fingerprint("Slow checkout"));
    assert_ne!(base, fingerprint("slow  checkout"));
  }
}
