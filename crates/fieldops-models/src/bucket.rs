//! Due-date buckets used by dashboard counts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Due-date classification of a work item relative to a reference date.
///
/// Variants are declared in dashboard order, so the derived `Ord` is the
/// bucket order: `OverDue < Due15 < Due30 < Due45 < Due60 < NotDue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bucket {
    /// Due date is before the reference date.
    OverDue,
    /// Due within 0..=15 days.
    Due15,
    /// Due within 16..=30 days.
    Due30,
    /// Due within 31..=45 days.
    Due45,
    /// Due within 46..=60 days.
    Due60,
    /// Due more than 60 days out.
    NotDue,
}

impl Bucket {
    /// All buckets in order.
    pub const ALL: [Bucket; 6] = [
        Bucket::OverDue,
        Bucket::Due15,
        Bucket::Due30,
        Bucket::Due45,
        Bucket::Due60,
        Bucket::NotDue,
    ];

    /// Position of this bucket in the total order (0 = OverDue).
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bucket::OverDue => "OverDue",
            Bucket::Due15 => "Due15",
            Bucket::Due30 => "Due30",
            Bucket::Due45 => "Due45",
            Bucket::Due60 => "Due60",
            Bucket::NotDue => "NotDue",
        };
        f.write_str(name)
    }
}

impl FromStr for Bucket {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .into_iter()
            .find(|b| b.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownBucket(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_ordering() {
        assert!(Bucket::OverDue < Bucket::Due15);
        assert!(Bucket::Due15 < Bucket::Due30);
        assert!(Bucket::Due30 < Bucket::Due45);
        assert!(Bucket::Due45 < Bucket::Due60);
        assert!(Bucket::Due60 < Bucket::NotDue);
    }

    #[test]
    fn test_ordinal_follows_all() {
        for (i, bucket) in Bucket::ALL.iter().enumerate() {
            assert_eq!(bucket.ordinal(), i);
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("due30".parse::<Bucket>().unwrap(), Bucket::Due30);
        assert_eq!(" OVERDUE".parse::<Bucket>().unwrap(), Bucket::OverDue);
        assert!("Due90".parse::<Bucket>().is_err());
    }
}
