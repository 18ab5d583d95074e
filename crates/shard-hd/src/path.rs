//! Derivation path strings of the form `m/84'/0'/0'/0/0`.

use std::fmt;
use std::str::FromStr;

use crate::HdError;

/// Bit marking a hardened child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// One step in a derivation path, hardened or normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildNumber(u32);

impl ChildNumber {
    /// A normal (non-hardened) child index.
    ///
    /// # Arguments
    /// * `index` - The child index, below 2^31.
    pub fn normal(index: u32) -> Result<Self, HdError> {
        if index >= HARDENED_OFFSET {
            return Err(HdError::InvalidPath(format!(
                "child index {} out of range",
                index
            )));
        }
        Ok(ChildNumber(index))
    }

    /// A hardened child index.
    ///
    /// # Arguments
    /// * `index` - The child index, below 2^31.
    pub fn hardened(index: u32) -> Result<Self, HdError> {
        let normal = Self::normal(index)?;
        Ok(ChildNumber(normal.0 | HARDENED_OFFSET))
    }

    /// Whether this step is hardened.
    pub fn is_hardened(&self) -> bool {
        self.0 & HARDENED_OFFSET != 0
    }

    /// The index without the hardened bit.
    pub fn index(&self) -> u32 {
        self.0 & !HARDENED_OFFSET
    }

    /// The raw serialized form, hardened bit included.
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Rebuild from the raw serialized form.
    pub fn from_raw(raw: u32) -> Self {
        ChildNumber(raw)
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.index())
        } else {
            write!(f, "{}", self.index())
        }
    }
}

impl FromStr for ChildNumber {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = match s.strip_suffix('\'') {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HdError::InvalidPath(format!("bad path segment: {:?}", s)));
        }
        let index = digits
            .parse::<u32>()
            .map_err(|_| HdError::InvalidPath(format!("bad path segment: {:?}", s)))?;
        if hardened {
            ChildNumber::hardened(index)
        } else {
            ChildNumber::normal(index)
        }
    }
}

/// An ordered sequence of child steps below the master key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// The empty path, the master key itself.
    pub fn master() -> Self {
        DerivationPath(Vec::new())
    }

    /// The individual steps.
    pub fn components(&self) -> &[ChildNumber] {
        &self.0
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the master path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// This path extended by one step.
    pub fn child(&self, step: ChildNumber) -> Self {
        let mut components = self.0.clone();
        components.push(step);
        DerivationPath(components)
    }

    /// The leading run of steps up to and including the last hardened
    /// one. This is the account boundary for watch-only export: every
    /// step beyond it derives from the public key alone.
    pub fn hardened_prefix(&self) -> Self {
        let end = self
            .0
            .iter()
            .rposition(ChildNumber::is_hardened)
            .map_or(0, |i| i + 1);
        DerivationPath(self.0[..end].to_vec())
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(components: Vec<ChildNumber>) -> Self {
        DerivationPath(components)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for step in &self.0 {
            write!(f, "/{}", step)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split('/');
        if segments.next() != Some("m") {
            return Err(HdError::InvalidPath(format!(
                "path must start with \"m\": {:?}",
                s
            )));
        }
        let components = segments
            .map(ChildNumber::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DerivationPath(components))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let path: DerivationPath = "m/84'/0'/0'/0/5".parse().unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.to_string(), "m/84'/0'/0'/0/5");

        let steps = path.components();
        assert!(steps[0].is_hardened());
        assert_eq!(steps[0].index(), 84);
        assert_eq!(steps[0].raw(), 84 | HARDENED_OFFSET);
        assert!(!steps[4].is_hardened());
        assert_eq!(steps[4].index(), 5);
    }

    #[test]
    fn test_master_path() {
        let path: DerivationPath = "m".parse().unwrap();
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "m");
        assert_eq!(path, DerivationPath::master());
    }

    #[test]
    fn test_max_normal_index() {
        let path: DerivationPath = "m/2147483647'".parse().unwrap();
        assert_eq!(path.components()[0].index(), 2147483647);
        assert!(path.components()[0].is_hardened());
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "",
            "n/0",
            "m/",
            "m//0",
            "m/x",
            "m/0''",
            "m/'",
            "m/-1",
            "m/+1",
            "m/2147483648",
            "m/4294967296",
            "m/0 /1",
        ] {
            assert!(
                matches!(bad.parse::<DerivationPath>(), Err(HdError::InvalidPath(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_hardened_prefix() {
        let path: DerivationPath = "m/84'/0'/0'/0/5".parse().unwrap();
        assert_eq!(path.hardened_prefix().to_string(), "m/84'/0'/0'");

        let flat: DerivationPath = "m/1/2/3".parse().unwrap();
        assert!(flat.hardened_prefix().is_empty());

        let mixed: DerivationPath = "m/1/2'/3".parse().unwrap();
        assert_eq!(mixed.hardened_prefix().to_string(), "m/1/2'");
    }

    #[test]
    fn test_child_extension() {
        let base: DerivationPath = "m/84'/0'/0'".parse().unwrap();
        let leaf = base
            .child(ChildNumber::normal(0).unwrap())
            .child(ChildNumber::normal(9).unwrap());
        assert_eq!(leaf.to_string(), "m/84'/0'/0'/0/9");
    }
}
