//! Seed enumeration
//!
//! Start passwords are taken in base-62 order from a base password. A
//! `SeedRange` names a contiguous slice of that order by password index so it
//! can be split between workers or resumed from a checkpoint.

use crate::constants::PASSWORD_SPACE;
use crate::domain::password::{Password, PasswordError};

/// Contiguous range of seeds in enumeration order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedRange {
    start_index: u64,
    count: u64,
}

impl SeedRange {
    /// Range of up to `count` seeds starting at `start`
    ///
    /// The count is clamped at the end of the password space.
    pub fn new(start: Password, count: u64) -> Self {
        Self::from_index(start.index(), count).unwrap_or(Self {
            start_index: start.index(),
            count: 0,
        })
    }

    /// Range of up to `count` seeds starting at password index `start_index`
    pub fn from_index(start_index: u64, count: u64) -> Result<Self, PasswordError> {
        if start_index >= PASSWORD_SPACE {
            return Err(PasswordError::IndexOutOfRange(start_index));
        }
        let available = PASSWORD_SPACE - start_index;
        Ok(Self {
            start_index,
            count: count.min(available),
        })
    }

    /// Index of the first seed
    pub fn start_index(&self) -> u64 {
        self.start_index
    }

    /// Index one past the last seed
    pub fn end_index(&self) -> u64 {
        self.start_index + self.count
    }

    /// Number of seeds in the range
    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// First seed of the range
    pub fn start(&self) -> Option<Password> {
        if self.is_empty() {
            None
        } else {
            Password::from_index(self.start_index).ok()
        }
    }

    /// Remainder of the range after the first `n` seeds
    pub fn skip(&self, n: u64) -> Self {
        let n = n.min(self.count);
        Self {
            start_index: self.start_index + n,
            count: self.count - n,
        }
    }

    /// Split into at most `parts` disjoint contiguous sub-ranges
    ///
    /// Earlier parts receive the remainder, one extra seed each. Empty parts
    /// are omitted.
    pub fn split(&self, parts: usize) -> Vec<SeedRange> {
        let parts = (parts.max(1) as u64).min(self.count.max(1));
        let base = self.count / parts;
        let extra = self.count % parts;

        let mut ranges = Vec::with_capacity(parts as usize);
        let mut cursor = self.start_index;
        for i in 0..parts {
            let count = base + u64::from(i < extra);
            if count == 0 {
                continue;
            }
            ranges.push(SeedRange {
                start_index: cursor,
                count,
            });
            cursor += count;
        }
        ranges
    }

    /// Iterate over the seeds of the range
    pub fn seeds(&self) -> SeedEnumerator {
        SeedEnumerator {
            next: self.start(),
            remaining: self.count,
        }
    }
}

/// Iterator over consecutive seed passwords
#[derive(Clone, Debug)]
pub struct SeedEnumerator {
    next: Option<Password>,
    remaining: u64,
}

impl SeedEnumerator {
    /// Enumerate up to `count` seeds starting at `start`
    pub fn new(start: Password, count: u64) -> Self {
        SeedRange::new(start, count).seeds()
    }
}

impl Iterator for SeedEnumerator {
    type Item = Password;

    fn next(&mut self) -> Option<Password> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = current.successor();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}
