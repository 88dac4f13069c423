//! Types for use as [crate::Struct::Cfg].

use crate::Error;
use core::ops::{Bound, RangeBounds};

/// Bounds the decoded length of a variable-length value.
///
/// Lengths are checked as soon as their prefix is read, before any bytes are copied or any
/// collection is allocated. This protects against inputs that claim oversized payloads.
///
/// # Examples
///
/// ```
/// use bufio_codec::RangeCfg;
///
/// let cfg = RangeCfg::new(0..=1024);
/// assert!(cfg.contains(500));
/// assert!(!cfg.contains(2000));
///
/// // Allow any length >= 1
/// let cfg = RangeCfg::from(1..);
/// assert!(cfg.contains(1));
/// assert!(!cfg.contains(0));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg {
    start: Bound<usize>,
    end: Bound<usize>,
}

impl RangeCfg {
    /// Creates a new `RangeCfg` from any range of lengths.
    pub fn new(r: impl RangeBounds<usize>) -> Self {
        Self {
            start: r.start_bound().cloned(),
            end: r.end_bound().cloned(),
        }
    }

    /// Creates a `RangeCfg` that only accepts exactly `len`.
    pub fn exact(len: usize) -> Self {
        Self::new(len..=len)
    }

    /// Returns true if `len` is within this range.
    pub fn contains(&self, len: usize) -> bool {
        RangeBounds::contains(self, &len)
    }

    /// Returns `len` if it is within this range, otherwise [Error::InvalidLength] at `offset`.
    pub fn check(&self, len: usize, offset: usize) -> Result<usize, Error> {
        if !self.contains(len) {
            return Err(Error::InvalidLength(len, offset));
        }
        Ok(len)
    }
}

impl Default for RangeCfg {
    /// Accepts any length.
    fn default() -> Self {
        Self::new(..)
    }
}

impl RangeBounds<usize> for RangeCfg {
    fn start_bound(&self) -> Bound<&usize> {
        self.start.as_ref()
    }

    fn end_bound(&self) -> Bound<&usize> {
        self.end.as_ref()
    }
}

macro_rules! impl_from_range {
    ($($range:ty),*) => {
        $(
            impl From<$range> for RangeCfg {
                fn from(r: $range) -> Self {
                    Self::new(r)
                }
            }
        )*
    };
}

impl_from_range!(
    core::ops::Range<usize>,
    core::ops::RangeInclusive<usize>,
    core::ops::RangeFrom<usize>,
    core::ops::RangeTo<usize>,
    core::ops::RangeToInclusive<usize>,
    core::ops::RangeFull
);

#[cfg(test)]
mod tests {
    use super::*;
    use core::ops::Bound::{Excluded, Included, Unbounded};

    #[test]
    fn test_range_cfg_from() {
        let cfg: RangeCfg = (..).into();
        assert_eq!(
            cfg,
            RangeCfg {
                start: Unbounded,
                end: Unbounded
            }
        );
        assert_eq!(cfg, RangeCfg::default());

        let cfg: RangeCfg = (5..10).into();
        assert_eq!(
            cfg,
            RangeCfg {
                start: Included(5),
                end: Excluded(10)
            }
        );

        let cfg: RangeCfg = (..=10).into();
        assert_eq!(
            cfg,
            RangeCfg {
                start: Unbounded,
                end: Included(10)
            }
        );
    }

    #[test]
    fn test_range_cfg_contains() {
        let cfg = RangeCfg::default();
        assert!(cfg.contains(0));
        assert!(cfg.contains(usize::MAX));

        let cfg = RangeCfg::new(5..10);
        assert!(!cfg.contains(4));
        assert!(cfg.contains(5));
        assert!(cfg.contains(9));
        assert!(!cfg.contains(10));

        let cfg = RangeCfg::exact(3);
        assert!(!cfg.contains(2));
        assert!(cfg.contains(3));
        assert!(!cfg.contains(4));

        // Empty range
        let cfg = RangeCfg::new(5..5);
        assert!(!cfg.contains(5));
    }

    #[test]
    fn test_range_cfg_check() {
        let cfg = RangeCfg::new(..=4);
        assert_eq!(cfg.check(4, 7), Ok(4));
        assert_eq!(cfg.check(5, 7), Err(Error::InvalidLength(5, 7)));
    }
}
