use core::{iter::FusedIterator, slice};
use std::vec;

use crate::raw::{util::unlikely, Ctrl};

/// Walks the full slots of a table in slot order.
pub(crate) struct RawIter<'a> {
    pub(crate) ctrl: slice::Iter<'a, Ctrl>,
    pub(crate) data: slice::Iter<'a, (i64, i16)>,
    // Full slots not yet yielded; lets the walk stop before the table end.
    pub(crate) len: usize,
}

impl Iterator for RawIter<'_> {
    type Item = (i64, i16);

    #[inline]
    fn next(&mut self) -> Option<(i64, i16)> {
        if unlikely(self.len == 0) {
            return None;
        }
        loop {
            let ctrl = *self.ctrl.next()?;
            let entry = *self.data.next()?;
            if ctrl == Ctrl::Full {
                self.len -= 1;
                return Some(entry);
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl ExactSizeIterator for RawIter<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }
}

impl FusedIterator for RawIter<'_> {}

pub(crate) struct RawIntoIter {
    pub(crate) ctrl: vec::IntoIter<Ctrl>,
    pub(crate) data: vec::IntoIter<(i64, i16)>,
    pub(crate) len: usize,
}

impl Iterator for RawIntoIter {
    type Item = (i64, i16);

    #[inline]
    fn next(&mut self) -> Option<(i64, i16)> {
        if unlikely(self.len == 0) {
            return None;
        }
        loop {
            let ctrl = self.ctrl.next()?;
            let entry = self.data.next()?;
            if ctrl == Ctrl::Full {
                self.len -= 1;
                return Some(entry);
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl ExactSizeIterator for RawIntoIter {}
impl FusedIterator for RawIntoIter {}
