//! # Group Views
//!
//! The mutable window a parallel callback receives.

use std::ops::{Index, IndexMut, Range};

use crate::record::ParticleRecord;

/// Exclusive access to the records of one group, `[start, end)`.
///
/// Indexed by absolute pool index, so callbacks address records the same
/// way whether they run over the whole pool or one group. Indexing outside
/// the group panics: concurrently running groups can never overlap.
///
/// ```rust,ignore
/// pool.parallel_update(0, |mut group, start, end| {
///     for index in start..end {
///         group[index].age += dt;
///     }
/// });
/// ```
#[derive(Debug)]
pub struct ParticleGroup<'a, P: ParticleRecord> {
    /// Absolute index of `records[0]`.
    start: u32,
    records: &'a mut [P],
}

impl<'a, P: ParticleRecord> ParticleGroup<'a, P> {
    /// Wraps `records`, whose first element sits at pool index `start`.
    ///
    /// # Panics
    ///
    /// Panics if the group would extend past `u32::MAX`.
    #[must_use]
    pub fn new(start: u32, records: &'a mut [P]) -> Self {
        assert!(
            u32::try_from(records.len())
                .ok()
                .and_then(|len| start.checked_add(len))
                .is_some(),
            "particle group exceeds u32 index space"
        );
        Self { start, records }
    }

    /// First absolute index in the group.
    #[inline]
    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// One past the last absolute index in the group.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn end(&self) -> u32 {
        // Checked in `new`.
        self.start + self.records.len() as u32
    }

    /// Absolute index range of the group.
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<u32> {
        self.start..self.end()
    }

    /// Number of records in the group.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the group holds no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record at absolute `index`, if it belongs to this group.
    #[inline]
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&P> {
        let local = index.checked_sub(self.start)?;
        self.records.get(local as usize)
    }

    /// Returns the record at absolute `index` mutably, if it belongs to this
    /// group.
    #[inline]
    pub fn get_mut(&mut self, index: u32) -> Option<&mut P> {
        let local = index.checked_sub(self.start)?;
        self.records.get_mut(local as usize)
    }

    /// Iterates `(absolute index, record)` pairs.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut P)> {
        let start = self.start;
        self.records
            .iter_mut()
            .enumerate()
            .map(move |(offset, record)| (start + offset as u32, record))
    }

    /// The group's records as a slice; element 0 is pool index `start`.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[P] {
        self.records
    }

    /// The group's records as a mutable slice; element 0 is pool index
    /// `start`.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [P] {
        self.records
    }
}

impl<P: ParticleRecord> Index<u32> for ParticleGroup<'_, P> {
    type Output = P;

    #[inline]
    fn index(&self, index: u32) -> &P {
        match self.get(index) {
            Some(record) => record,
            None => panic!(
                "index {index} outside particle group {}..{}",
                self.start,
                self.end()
            ),
        }
    }
}

impl<P: ParticleRecord> IndexMut<u32> for ParticleGroup<'_, P> {
    #[inline]
    fn index_mut(&mut self, index: u32) -> &mut P {
        let (start, end) = (self.start, self.end());
        match self.get_mut(index) {
            Some(record) => record,
            None => panic!("index {index} outside particle group {start}..{end}"),
        }
    }
}
