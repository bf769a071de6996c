use derive_new::new;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { value: T },
    Insert { value: T },
    Equal { value: T },
}

/// Myers' O((N+M)D) shortest edit script between two sequences
///
/// Uses the linear space refinement: each box is split at its middle snake and the
/// halves are solved recursively, so memory stays O(N+M) however far apart the
/// inputs are.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

/// Furthest `x` reached on each diagonal `k = x - y`
#[derive(Debug)]
struct Frontier {
    reach: Vec<usize>,
    offset: isize,
}

impl Frontier {
    fn new(max_edits: usize) -> Self {
        Frontier {
            reach: vec![0; 2 * max_edits + 2],
            offset: max_edits as isize,
        }
    }

    fn get(&self, k: isize) -> usize {
        self.reach[(self.offset + k) as usize]
    }

    fn set(&mut self, k: isize, x: usize) {
        self.reach[(self.offset + k) as usize] = x;
    }

    /// Starting `x` on diagonal `k` at depth `d`, before following its snake
    fn step(&self, k: isize, d: isize) -> usize {
        if k == -d || (k != d && self.get(k - 1) < self.get(k + 1)) {
            self.get(k + 1)
        } else {
            self.get(k - 1) + 1
        }
    }
}

/// Depth at which the forward and backward searches are guaranteed to meet
fn max_edits(n: usize, m: usize) -> usize {
    (n + m).div_ceil(2) + 1
}

fn common_prefix<T: Eq>(a: &[T], b: &[T]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix<T: Eq>(a: &[T], b: &[T]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

impl<T: Eq + Clone> MyersDiff<'_, T> {
    /// Edit script turning `a` into `b`, in sequence order
    pub fn diff(&self) -> Vec<Edit<T>> {
        let max = max_edits(self.a.len(), self.b.len());
        let mut forward = Frontier::new(max);
        let mut backward = Frontier::new(max);
        let mut edits = Vec::with_capacity(self.a.len().max(self.b.len()));

        self.conquer(
            0..self.a.len(),
            0..self.b.len(),
            &mut forward,
            &mut backward,
            &mut edits,
        );

        edits
    }

    fn conquer(
        &self,
        mut a: Range<usize>,
        mut b: Range<usize>,
        forward: &mut Frontier,
        backward: &mut Frontier,
        edits: &mut Vec<Edit<T>>,
    ) {
        let prefix = common_prefix(&self.a[a.clone()], &self.b[b.clone()]);
        edits.extend(self.equal(a.start..a.start + prefix));
        a.start += prefix;
        b.start += prefix;

        let suffix = common_suffix(&self.a[a.clone()], &self.b[b.clone()]);
        a.end -= suffix;
        b.end -= suffix;
        let suffix = a.end..a.end + suffix;

        if a.is_empty() {
            edits.extend(self.inserted(b));
        } else if b.is_empty() {
            edits.extend(self.deleted(a));
        } else {
            match self.middle_snake(a.clone(), b.clone(), forward, backward) {
                Some((x, y)) => {
                    self.conquer(a.start..x, b.start..y, forward, backward, edits);
                    self.conquer(x..a.end, y..b.end, forward, backward, edits);
                }
                None => {
                    edits.extend(self.deleted(a));
                    edits.extend(self.inserted(b));
                }
            }
        }

        edits.extend(self.equal(suffix));
    }

    /// Point where a shortest path through the box crosses its middle, found by
    /// searching from both corners until the searches overlap
    fn middle_snake(
        &self,
        a: Range<usize>,
        b: Range<usize>,
        forward: &mut Frontier,
        backward: &mut Frontier,
    ) -> Option<(usize, usize)> {
        let (n, m) = (a.len(), b.len());
        let delta = n as isize - m as isize;
        let odd = delta % 2 != 0;
        forward.set(1, 0);
        backward.set(1, 0);

        for d in 0..max_edits(n, m) as isize {
            for k in (-d..=d).rev().step_by(2) {
                let snake_x = forward.step(k, d);
                let snake_y = (snake_x as isize - k) as usize;

                let mut x = snake_x;
                if x < n && snake_y < m {
                    x += common_prefix(
                        &self.a[a.start + x..a.end],
                        &self.b[b.start + snake_y..b.end],
                    );
                }
                forward.set(k, x);

                if odd && (k - delta).abs() < d && x + backward.get(delta - k) >= n {
                    return Some((a.start + snake_x, b.start + snake_y));
                }
            }

            for k in (-d..=d).rev().step_by(2) {
                let mut x = backward.step(k, d);
                let mut y = (x as isize - k) as usize;

                if x < n && y < m {
                    let advance = common_suffix(
                        &self.a[a.start..a.start + n - x],
                        &self.b[b.start..b.start + m - y],
                    );
                    x += advance;
                    y += advance;
                }
                backward.set(k, x);

                if !odd && (k - delta).abs() <= d && x + forward.get(delta - k) >= n {
                    return Some((a.start + n - x, b.start + m - y));
                }
            }
        }

        None
    }

    fn equal(&self, range: Range<usize>) -> impl Iterator<Item = Edit<T>> + '_ {
        self.a[range].iter().map(|value| Edit::Equal {
            value: value.clone(),
        })
    }

    fn deleted(&self, range: Range<usize>) -> impl Iterator<Item = Edit<T>> + '_ {
        self.a[range].iter().map(|value| Edit::Delete {
            value: value.clone(),
        })
    }

    fn inserted(&self, range: Range<usize>) -> impl Iterator<Item = Edit<T>> + '_ {
        self.b[range].iter().map(|value| Edit::Insert {
            value: value.clone(),
        })
    }
}
