use std::fmt;
use std::str::FromStr;

use crate::error::ExtractError;

/// 1-based spreadsheet column index parsed from a letter label ("A", "Z", "AB").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ColumnAddress(u32);

impl ColumnAddress {
    pub fn index(self) -> u32 {
        self.0
    }

    /// 0-based offset as used by calamine.
    pub fn offset(self) -> u32 {
        self.index() - 1
    }
}

impl FromStr for ColumnAddress {
    type Err = ExtractError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let invalid = || ExtractError::InvalidColumnLabel(label.to_string());
        if label.is_empty() {
            return Err(invalid());
        }

        let mut index: u32 = 0;
        for b in label.bytes() {
            if !b.is_ascii_uppercase() {
                return Err(invalid());
            }
            let digit = u32::from(b - b'A' + 1);
            index = index
                .checked_mul(26)
                .and_then(|n| n.checked_add(digit))
                .ok_or_else(invalid)?;
        }
        Ok(ColumnAddress(index))
    }
}

impl fmt::Display for ColumnAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // bijective base-26: no zero digit
        let mut n = self.0;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        letters.reverse();
        f.write_str(&String::from_utf8_lossy(&letters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(label: &str) -> u32 {
        label.parse::<ColumnAddress>().unwrap().index()
    }

    #[test]
    fn single_letters_map_to_alphabet_position() {
        for (i, c) in ('A'..='Z').enumerate() {
            assert_eq!(index(&c.to_string()), i as u32 + 1);
        }
    }

    #[test]
    fn two_letter_labels() {
        for (i, first) in ('A'..='Z').enumerate() {
            for (j, second) in ('A'..='Z').enumerate() {
                let label = format!("{first}{second}");
                assert_eq!(index(&label), 26 * (i as u32 + 1) + (j as u32 + 1));
            }
        }
        assert_eq!(index("AA"), 27);
        assert_eq!(index("ZZ"), 702);
    }

    #[test]
    fn three_letter_label() {
        assert_eq!(index("AAA"), 703);
        assert_eq!(index("XFD"), 16384);
    }

    #[test]
    fn display_inverts_parse() {
        for label in ["A", "E", "Z", "AA", "AZ", "BA", "ZZ", "AAA", "XFD"] {
            let addr: ColumnAddress = label.parse().unwrap();
            assert_eq!(addr.to_string(), label);
        }
    }

    #[test]
    fn rejects_empty_and_non_letters() {
        for label in ["", "a", "A1", "1", " A", "A-B", "É"] {
            assert!(
                matches!(
                    label.parse::<ColumnAddress>(),
                    Err(ExtractError::InvalidColumnLabel(ref l)) if l == label
                ),
                "{label:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overflowing_label() {
        let label = "Z".repeat(8);
        assert!(label.parse::<ColumnAddress>().is_err());
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!("A".parse::<ColumnAddress>().unwrap().offset(), 0);
        assert_eq!("E".parse::<ColumnAddress>().unwrap().offset(), 4);
    }
}
