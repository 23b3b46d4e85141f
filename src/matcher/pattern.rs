//! Pattern matching implementation.

use crate::crypto::Address;

/// Result of a pattern match operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// Full match found
    Match,
    /// No match
    NoMatch,
}

impl MatchResult {
    #[inline]
    pub fn is_match(self) -> bool {
        matches!(self, MatchResult::Match)
    }
}

/// A compiled match rule over the 40-character hex form of an address.
///
/// An absent component is vacuously satisfied; a rule with neither component
/// matches every address.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Desired leading hex characters (normalized)
    prefix: Option<String>,
    /// Desired trailing hex characters (normalized)
    suffix: Option<String>,
    /// Whether matching compares against the checksum-cased text exactly
    case_sensitive: bool,
}

impl Pattern {
    /// Creates a new pattern. Empty components collapse to absent.
    pub fn new(prefix: Option<String>, suffix: Option<String>, case_sensitive: bool) -> Self {
        let normalize = |s: String| if case_sensitive { s } else { s.to_lowercase() };

        Self {
            prefix: prefix.map(normalize).filter(|p| !p.is_empty()),
            suffix: suffix.map(normalize).filter(|s| !s.is_empty()),
            case_sensitive,
        }
    }

    /// Returns the prefix component, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the suffix component, if any.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Returns whether matching is case sensitive.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Returns true when neither component is present. Such a rule matches
    /// every address.
    pub fn is_unconstrained(&self) -> bool {
        self.prefix.is_none() && self.suffix.is_none()
    }

    /// Matches an address against this pattern.
    #[inline]
    pub fn matches(&self, address: &Address) -> MatchResult {
        let hex_addr = address.to_hex();
        if !self.nibbles_match(&hex_addr) {
            return MatchResult::NoMatch;
        }
        if self.case_sensitive && !self.checksum_match(address) {
            return MatchResult::NoMatch;
        }
        MatchResult::Match
    }

    /// Case-folded positional check on the raw hex form. Filters out nearly
    /// every candidate before the checksum text is computed.
    fn nibbles_match(&self, hex_addr: &str) -> bool {
        if let Some(p) = self.prefix.as_deref() {
            if hex_addr.len() < p.len() || !hex_addr[..p.len()].eq_ignore_ascii_case(p) {
                return false;
            }
        }
        if let Some(s) = self.suffix.as_deref() {
            if hex_addr.len() < s.len()
                || !hex_addr[hex_addr.len() - s.len()..].eq_ignore_ascii_case(s)
            {
                return false;
            }
        }
        true
    }

    fn checksum_match(&self, address: &Address) -> bool {
        let checksum = address.to_checksum();
        let text = &checksum[2..];
        self.prefix.as_deref().map_or(true, |p| text.starts_with(p))
            && self.suffix.as_deref().map_or(true, |s| text.ends_with(s))
    }

    /// Returns the estimated difficulty (number of attempts to find a match).
    ///
    /// For hex patterns:
    /// - Each character has 16 possible values
    /// - Expected attempts = 16^n where n is the combined pattern length
    pub fn estimated_difficulty(&self) -> u64 {
        let total_len = self.prefix.as_ref().map_or(0, |p| p.len())
            + self.suffix.as_ref().map_or(0, |s| s.len());
        16u64.saturating_pow(total_len as u32)
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        let diff = self.estimated_difficulty();
        match diff {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=100_000 => "Easy (seconds)".into(),
            100_001..=10_000_000 => "Medium (minutes)".into(),
            10_000_001..=1_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, RngCore};

    fn make_address(hex_str: &str) -> Address {
        let bytes: [u8; 20] = hex::decode(hex_str).unwrap().try_into().unwrap();
        Address::from_bytes(bytes)
    }

    #[test]
    fn test_prefix_match() {
        let pattern = Pattern::new(Some("dead".into()), None, false);
        let addr = make_address("deadbeef00000000000000000000000000000000");
        assert!(pattern.matches(&addr).is_match());
    }

    #[test]
    fn test_prefix_no_match() {
        let pattern = Pattern::new(Some("dead".into()), None, false);
        let addr = make_address("beefdeadbeef0000000000000000000000000000");
        assert!(!pattern.matches(&addr).is_match());
    }

    #[test]
    fn test_suffix_match() {
        let pattern = Pattern::new(None, Some("beef".into()), false);
        let addr = make_address("0000000000000000000000000000000000debeef");
        assert!(pattern.matches(&addr).is_match());
    }

    #[test]
    fn test_prefix_and_suffix() {
        let pattern = Pattern::new(Some("dead".into()), Some("beef".into()), false);
        let hit = make_address("dead00000000000000000000000000000000beef");
        let miss = make_address("dead00000000000000000000000000000000bee0");
        assert!(pattern.matches(&hit).is_match());
        assert!(!pattern.matches(&miss).is_match());
    }

    #[test]
    fn test_unconstrained_matches_everything() {
        let pattern = Pattern::new(None, Some(String::new()), false);
        assert!(pattern.is_unconstrained());
        assert!(pattern.matches(&make_address(&"00".repeat(20))).is_match());
    }

    #[test]
    fn test_case_sensitive_uses_checksum() {
        // EIP-55 vector: checksum form is 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed
        let addr = make_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");

        assert!(Pattern::new(Some("5aAeb".into()), None, true)
            .matches(&addr)
            .is_match());
        assert!(!Pattern::new(Some("5aaeb".into()), None, true)
            .matches(&addr)
            .is_match());
        assert!(Pattern::new(None, Some("BeAed".into()), true)
            .matches(&addr)
            .is_match());
        assert!(!Pattern::new(None, Some("beaed".into()), true)
            .matches(&addr)
            .is_match());
        // Insensitive matching folds the same rule
        assert!(Pattern::new(Some("5AAEB".into()), None, false)
            .matches(&addr)
            .is_match());
    }

    #[test]
    fn test_slices_of_own_hex_always_match() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let mut bytes = [0u8; 20];
            rng.fill_bytes(&mut bytes);
            let addr = Address::from_bytes(bytes);
            let hex_addr = addr.to_hex();

            let p_len = rng.gen_range(0..=6);
            let s_len = rng.gen_range(0..=6);
            let pattern = Pattern::new(
                Some(hex_addr[..p_len].to_string()),
                Some(hex_addr[40 - s_len..].to_string()),
                false,
            );
            assert!(pattern.matches(&addr).is_match());
        }
    }

    #[test]
    fn test_agrees_with_direct_string_comparison() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let mut bytes = [0u8; 20];
            rng.fill_bytes(&mut bytes);
            let addr = Address::from_bytes(bytes);
            let hex_addr = addr.to_hex();

            let mut unrelated = [0u8; 4];
            rng.fill_bytes(&mut unrelated);
            let other = hex::encode(unrelated);
            let (p, s) = (&other[..4], &other[4..]);

            let pattern = Pattern::new(Some(p.to_string()), Some(s.to_string()), false);
            let expected = hex_addr.starts_with(p) && hex_addr.ends_with(s);
            assert_eq!(pattern.matches(&addr).is_match(), expected);
        }
    }

    #[test]
    fn test_difficulty() {
        let pattern = Pattern::new(Some("dead".into()), None, false);
        assert_eq!(pattern.estimated_difficulty(), 65536); // 16^4

        let both = Pattern::new(Some("de".into()), Some("ad".into()), false);
        assert_eq!(both.estimated_difficulty(), 65536);
    }
}
