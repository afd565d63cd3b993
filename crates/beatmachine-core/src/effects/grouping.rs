//! Fixed-size group windows over a beat stream

use crate::beat::Beat;

/// Lets `skip` beats through untouched, then pulls non-overlapping groups
/// of `group_size` beats and emits whatever `reorder` returns for each.
/// The last group may be short. Only one group is buffered at a time.
pub struct Regroup<I, F> {
    inner: I,
    skip: usize,
    group_size: usize,
    reorder: F,
    pending: std::vec::IntoIter<Beat>,
}

impl<I, F> Regroup<I, F>
where
    I: Iterator<Item = Beat>,
    F: FnMut(Vec<Beat>) -> Vec<Beat>,
{
    /// `group_size` must be non-zero.
    pub fn new(inner: I, skip: usize, group_size: usize, reorder: F) -> Self {
        debug_assert!(group_size > 0);
        Self { inner, skip, group_size, reorder, pending: Vec::new().into_iter() }
    }
}

impl<I, F> Iterator for Regroup<I, F>
where
    I: Iterator<Item = Beat>,
    F: FnMut(Vec<Beat>) -> Vec<Beat>,
{
    type Item = Beat;

    fn next(&mut self) -> Option<Beat> {
        loop {
            if let Some(beat) = self.pending.next() {
                return Some(beat);
            }
            if self.skip > 0 {
                self.skip -= 1;
                return self.inner.next();
            }

            let group: Vec<Beat> = self.inner.by_ref().take(self.group_size).collect();
            if group.is_empty() {
                return None;
            }
            // A reorder may emit nothing for a group; keep pulling.
            self.pending = (self.reorder)(group).into_iter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_util::*;

    #[test]
    fn test_groups_with_short_tail() {
        let mut sizes = Vec::new();
        let out: Vec<Beat> = Regroup::new(single_sample_beats(&[1.0, 2.0, 3.0, 4.0, 5.0]).into_iter(), 0, 2, |g| {
            sizes.push(g.len());
            g
        })
        .collect();
        assert_eq!(heads(&out), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_skip_passes_through() {
        let out: Vec<Beat> = Regroup::new(single_sample_beats(&[1.0, 2.0, 3.0, 4.0]).into_iter(), 1, 3, |mut g| {
            g.reverse();
            g
        })
        .collect();
        assert_eq!(heads(&out), vec![1.0, 4.0, 3.0, 2.0]);
    }

    #[test]
    fn test_skip_longer_than_stream() {
        let out: Vec<Beat> =
            Regroup::new(single_sample_beats(&[1.0, 2.0]).into_iter(), 5, 2, |_| Vec::new()).collect();
        assert_eq!(heads(&out), vec![1.0, 2.0]);
    }

    #[test]
    fn test_empty_groups_are_skipped() {
        let mut first = true;
        let out: Vec<Beat> = Regroup::new(single_sample_beats(&[1.0, 2.0, 3.0, 4.0]).into_iter(), 0, 2, |g| {
            let keep = !first;
            first = false;
            if keep { g } else { Vec::new() }
        })
        .collect();
        assert_eq!(heads(&out), vec![3.0, 4.0]);
    }
}
