//! Legacy document protection hash.
//!
//! The viewer verifies forms-only protection with a 16-bit rotating XOR
//! hash over at most 15 UTF-16 code units of the password. The algorithm is
//! weak but fixed: any deviation makes the viewer reject the document.

use std::fmt;

/// Password characters taken into account.
const MAX_PASSWORD_UNITS: usize = 15;

/// Final XOR constant of the legacy scheme.
const HASH_KEY: u16 = 0xCE4B;

/// A legacy protection hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtectionHash(u16);

/// Rotate left by one within 15 bits.
fn rotate(h: u16) -> u16 {
    ((h >> 14) & 0x01) | ((h << 1) & 0x7FFF)
}

impl ProtectionHash {
    /// Hash a password. Returns `None` for an empty password, which must not
    /// produce a protection command.
    pub fn compute(password: &str) -> Option<Self> {
        let units: Vec<u16> = password.encode_utf16().take(MAX_PASSWORD_UNITS).collect();
        if units.is_empty() {
            return None;
        }

        let mut h: u16 = 0;
        for &c in &units {
            h = rotate(h);
            h ^= c;
        }
        h = rotate(h);
        h ^= units.len() as u16;
        h ^= HASH_KEY;
        Some(Self(h))
    }

    /// Raw 16-bit value.
    pub fn value(self) -> u16 {
        self.0
    }

    /// Four uppercase hex digits.
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ProtectionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_hashes() {
        assert_eq!(ProtectionHash::compute("123456").unwrap().to_hex(), "C665");
        assert_eq!(ProtectionHash::compute("password").unwrap().to_hex(), "996B");
        assert_eq!(ProtectionHash::compute("a").unwrap().value(), 0xCE88);
    }

    #[test]
    fn test_stable_across_calls() {
        let first = ProtectionHash::compute("123456");
        for _ in 0..10 {
            assert_eq!(ProtectionHash::compute("123456"), first);
        }
    }

    #[test]
    fn test_truncated_to_fifteen_units() {
        assert_eq!(
            ProtectionHash::compute("abcdefghijklmnopqrstuvwxyz"),
            ProtectionHash::compute("abcdefghijklmno")
        );
        assert_eq!(
            ProtectionHash::compute("abcdefghijklmnopqrstuvwxyz").unwrap().to_hex(),
            "DFAA"
        );
    }

    #[test]
    fn test_empty_password() {
        assert!(ProtectionHash::compute("").is_none());
    }

    #[test]
    fn test_parallel_hashing_has_no_shared_state() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    let other = ProtectionHash::compute(&format!("pw{}", i));
                    (ProtectionHash::compute("123456"), other)
                })
            })
            .collect();
        for handle in handles {
            let (hash, _) = handle.join().unwrap();
            assert_eq!(hash.unwrap().to_hex(), "C665");
        }
    }
}
