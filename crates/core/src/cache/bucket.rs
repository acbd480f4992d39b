//! Named cache slots, one per search mode.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// File holding the last canonical signature for signature-sensitive buckets.
pub const SIGNATURE_FILE: &str = "last_query";

/// A logical cache namespace holding at most one result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Free-text search; reuse depends on the query signature.
    Random,
    Hot,
    Top,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Random, Bucket::Hot, Bucket::Top];

    /// File name of the bucket's result list inside the provider directory.
    pub fn name(self) -> &'static str {
        match self {
            Bucket::Random => "random",
            Bucket::Hot => "hot",
            Bucket::Top => "top",
        }
    }

    /// Whether cached results are only valid for the query that produced them.
    pub fn is_signature_sensitive(self) -> bool {
        matches!(self, Bucket::Random)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .into_iter()
            .find(|bucket| bucket.name() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown bucket: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_random_is_signature_sensitive() {
        assert!(Bucket::Random.is_signature_sensitive());
        assert!(!Bucket::Hot.is_signature_sensitive());
        assert!(!Bucket::Top.is_signature_sensitive());
    }

    #[test]
    fn test_parse_names() {
        for bucket in Bucket::ALL {
            assert_eq!(bucket.name().parse::<Bucket>().unwrap(), bucket);
        }
        assert!(matches!("toplist".parse::<Bucket>(), Err(Error::InvalidInput(_))));
    }
}
