//! Text and byte conversion to and from the integers the cipher works on.
//!
//! Bytes are read as a big-endian unsigned integer. A message survives
//! encryption only if that integer is below the modulus.

use num_bigint::BigUint;

use crate::error::{ElGamalError, Result};

pub fn encode_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Minimal big-endian bytes of `value`; zero becomes a single zero byte
pub fn decode_bytes(value: &BigUint) -> Vec<u8> {
    value.to_bytes_be()
}

pub fn encode_text(text: &str) -> BigUint {
    encode_bytes(text.as_bytes())
}

/// Decode `value` as UTF-8 text
pub fn decode_text(value: &BigUint) -> Result<String> {
    Ok(String::from_utf8(decode_bytes(value))?)
}

/// Encode `text`, rejecting it if the integer does not fit below `p`
pub fn encode_text_for(text: &str, p: &BigUint) -> Result<BigUint> {
    let m = encode_text(text);
    if &m >= p {
        return Err(ElGamalError::PlaintextTooLarge);
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encoding() {
        // 'A' = 0x41, '+' = 0x2b
        assert_eq!(encode_text("A+"), BigUint::from(0x412bu32));
        assert_eq!(decode_text(&BigUint::from(0x422bu32)).unwrap(), "B+");
    }

    #[test]
    fn test_multibyte_text() {
        let text = "héllo, wörld ✓";
        assert_eq!(decode_text(&encode_text(text)).unwrap(), text);
    }

    #[test]
    fn test_invalid_utf8() {
        let value = encode_bytes(&[0xff, 0xfe]);
        assert!(matches!(decode_text(&value), Err(ElGamalError::Decode(_))));
    }

    #[test]
    fn test_zero() {
        assert_eq!(decode_bytes(&BigUint::from(0u32)), vec![0u8]);
        assert_eq!(encode_bytes(&[]), BigUint::from(0u32));
    }

    #[test]
    fn test_encode_text_for_modulus() {
        let p = BigUint::from(0x412cu32);
        assert!(encode_text_for("A+", &p).is_ok());
        assert!(matches!(
            encode_text_for("A,", &p),
            Err(ElGamalError::PlaintextTooLarge)
        ));
    }
}
