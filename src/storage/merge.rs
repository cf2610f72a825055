//! Merging iterators
//!
//! Combines the sorted streams of every table and the memtable into one
//! stream in internal key order, then keeps the newest live version of each
//! user key.

use std::cmp::Ordering;

use bytes::Bytes;

use crate::error::Result;
use crate::key::KeyComparator;

use super::internal_key::{compare_entries, InternalEntry, ValueType};

/// A sorted stream of entries
pub type EntrySource<'a> = Box<dyn Iterator<Item = Result<InternalEntry>> + 'a>;

/// K-way merge of sorted sources
pub struct MergingIterator<'a, C: ?Sized> {
    comparator: &'a C,
    sources: Vec<EntrySource<'a>>,
    /// Pending entry of each source
    heads: Vec<Option<InternalEntry>>,
    primed: bool,
    failed: bool,
}

impl<'a, C: KeyComparator + ?Sized> MergingIterator<'a, C> {
    pub fn new(comparator: &'a C, sources: Vec<EntrySource<'a>>) -> Self {
        let heads = sources.iter().map(|_| None).collect();
        Self {
            comparator,
            sources,
            heads,
            primed: false,
            failed: false,
        }
    }

    fn fill(&mut self, index: usize) -> Result<()> {
        self.heads[index] = self.sources[index].next().transpose()?;
        Ok(())
    }

    fn smallest(&self) -> Option<usize> {
        let mut best: Option<(usize, &InternalEntry)> = None;
        for (i, head) in self.heads.iter().enumerate() {
            if let Some(entry) = head {
                let better = match best {
                    None => true,
                    Some((_, current)) => compare_entries(self.comparator, entry, current) == Ordering::Less,
                };
                if better {
                    best = Some((i, entry));
                }
            }
        }
        best.map(|(i, _)| i)
    }

    fn advance(&mut self) -> Result<Option<InternalEntry>> {
        if !self.primed {
            self.primed = true;
            for i in 0..self.sources.len() {
                self.fill(i)?;
            }
        }
        let Some(index) = self.smallest() else {
            return Ok(None);
        };
        let entry = self.heads[index].take();
        self.fill(index)?;
        Ok(entry)
    }
}

impl<'a, C: KeyComparator + ?Sized> Iterator for MergingIterator<'a, C> {
    type Item = Result<InternalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.advance() {
            Ok(entry) => entry.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Yields the newest version of each user key, hiding deleted keys.
pub struct LatestVersions<'a, C: ?Sized> {
    inner: MergingIterator<'a, C>,
    comparator: &'a C,
    last_user_key: Option<Bytes>,
}

impl<'a, C: KeyComparator + ?Sized> LatestVersions<'a, C> {
    pub fn new(inner: MergingIterator<'a, C>) -> Self {
        let comparator = inner.comparator;
        Self {
            inner,
            comparator,
            last_user_key: None,
        }
    }
}

impl<'a, C: KeyComparator + ?Sized> Iterator for LatestVersions<'a, C> {
    /// (user key, value)
    type Item = Result<(Bytes, Bytes)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e)),
            };

            if let Some(last) = &self.last_user_key {
                if self.comparator.compare(last, &entry.user_key) == Ordering::Equal {
                    // Older version of a key already resolved.
                    continue;
                }
            }
            self.last_user_key = Some(entry.user_key.clone());

            match entry.value_type {
                ValueType::Deletion => continue,
                ValueType::Value => return Some(Ok((entry.user_key, entry.value))),
            }
        }
    }
}
