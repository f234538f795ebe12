use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An unordered contact between two distinct particles, stored canonically
/// with `i < j`.
///
/// The only way to build a `Pair` is [`Pair::new`], which orders the ids and
/// refuses self pairs, so two discoveries of the same contact always compare
/// equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair {
    i: usize,
    j: usize,
}

impl Pair {
    /// Canonical pair of `a` and `b`, or `None` when `a == b`.
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { i: a, j: b }),
            std::cmp::Ordering::Greater => Some(Self { i: b, j: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The smaller id.
    pub fn i(&self) -> usize {
        self.i
    }

    /// The larger id.
    pub fn j(&self) -> usize {
        self.j
    }

    pub fn as_tuple(&self) -> (usize, usize) {
        (self.i, self.j)
    }

    /// The other end of the pair, if `id` is one of its ends.
    pub fn other(&self, id: usize) -> Option<usize> {
        if id == self.i {
            Some(self.j)
        } else if id == self.j {
            Some(self.i)
        } else {
            None
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

impl From<Pair> for (usize, usize) {
    fn from(pair: Pair) -> Self {
        pair.as_tuple()
    }
}

// Serialized as a two-element array `[i, j]`.
impl Serialize for Pair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.i, self.j].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Pair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [a, b] = <[usize; 2]>::deserialize(deserializer)?;
        Pair::new(a, b).ok_or_else(|| serde::de::Error::custom(format!("self pair ({a}, {a})")))
    }
}
