// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;

/// Formatter for `derivative(Debug(format_with = ..))` fields holding bytes.
pub fn hexf(data: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", truncate(hex::encode(data)))
}

/// Full `0x` prefixed hex, used for identifiers that must never be shortened in logs.
pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Parses hex with or without a `0x` prefix.
pub fn from_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
}

fn truncate(s: String) -> String {
    let threshold = 100;
    let limit = 50;
    let cutoff = limit / 2;
    if s.len() <= threshold {
        format!("0x{}", s)
    } else {
        let start = &s[..cutoff];
        let end = &s[s.len() - (limit - cutoff)..];
        format!("<bytes({}):0x{}..{}>", s.len() / 2, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Hexed(Vec<u8>);

    impl fmt::Display for Hexed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            hexf(&self.0, f)
        }
    }

    #[test]
    fn short_values_are_printed_in_full() {
        assert_eq!(Hexed(vec![0xde, 0xad]).to_string(), "0xdead");
    }

    #[test]
    fn long_values_are_truncated() {
        let out = Hexed(vec![0xab; 64]).to_string();
        assert!(out.starts_with("<bytes(64):0xabab"));
        assert!(out.len() < 128);
    }

    #[test]
    fn hex_roundtrips_with_and_without_prefix() {
        assert_eq!(from_hex("0x0102").unwrap(), vec![1, 2]);
        assert_eq!(from_hex("0102").unwrap(), vec![1, 2]);
        assert_eq!(to_hex(&[1, 2]), "0x0102");
    }
}
