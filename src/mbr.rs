//! Minimum bounding rectangles: axis-aligned boxes in `d`-dimensional space,
//! stored as per-axis lower bounds and non-negative extents.

use std::fmt;

use geo_traits::{CoordTrait, RectTrait};

use crate::scalar::MbrNum;

/// The coordinate kind of an [`Mbr`].
///
/// Boxes of different kinds never compare equal, contain, or intersect; a
/// merge skips operands whose kind differs from the first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MbrKind {
    Int32,
    Float64,
}

/// An axis-aligned minimum bounding rectangle.
///
/// An `Mbr` carries one lower bound and one extent per axis; the upper bound
/// on axis `i` is `mins[i] + spans[i]`. The dimension and coordinate kind are
/// fixed at construction. All predicates are total: comparing boxes of
/// mismatched kind or dimension yields `false` rather than an error.
///
/// Negative extents are not rejected, but they corrupt merge and intersection
/// results; callers are expected to supply `spans[i] >= 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Mbr(MbrRepr);

#[derive(Clone, Debug, PartialEq)]
enum MbrRepr {
    Int32(Coords<i32>),
    Float64(Coords<f64>),
}

/// Shared per-scalar storage and geometry. The public type dispatches into
/// this once per operation; everything here assumes matching dimensions.
#[derive(Clone, Debug, PartialEq)]
struct Coords<N: MbrNum> {
    mins: Vec<N>,
    spans: Vec<N>,
}

impl<N: MbrNum> Coords<N> {
    fn new(mins: &[N], spans: &[N]) -> Option<Self> {
        let dim = mins.len().min(spans.len());
        if dim == 0 {
            return None;
        }
        Some(Self {
            mins: mins[..dim].to_vec(),
            spans: spans[..dim].to_vec(),
        })
    }

    fn dim(&self) -> usize {
        self.mins.len()
    }

    fn contains(&self, other: &Self) -> bool {
        if self.dim() != other.dim() {
            return false;
        }
        (0..self.dim()).all(|i| {
            self.mins[i] <= other.mins[i]
                && self.mins[i] + self.spans[i] >= other.mins[i] + other.spans[i]
        })
    }

    fn intersects(&self, other: &Self) -> bool {
        if self.dim() != other.dim() {
            return false;
        }
        (0..self.dim()).all(|i| {
            self.mins[i] <= other.mins[i] + other.spans[i]
                && self.mins[i] + self.spans[i] >= other.mins[i]
        })
    }

    fn union_with(&mut self, other: &Self) {
        for i in 0..self.dim() {
            let mut lo = self.mins[i];
            let mut hi = lo + self.spans[i];
            if other.mins[i] < lo {
                lo = other.mins[i];
            }
            let other_hi = other.mins[i] + other.spans[i];
            if other_hi > hi {
                hi = other_hi;
            }
            self.mins[i] = lo;
            self.spans[i] = hi - lo;
        }
    }

    fn size(&self) -> f64 {
        self.spans.iter().fold(1.0, |acc, s| acc * s.as_f64())
    }

    fn fmt_diag(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[(")?;
        for (i, m) in self.mins.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            m.fmt_coord(f)?;
        }
        f.write_str("),(")?;
        for (i, s) in self.spans.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            s.fmt_coord(f)?;
        }
        f.write_str(")]")
    }
}

impl Mbr {
    /// Build a signed 32-bit integer box from lower bounds and extents.
    ///
    /// The dimension is `min(mins.len(), spans.len())`; excess entries of the
    /// longer slice are ignored. Returns `None` if either slice is empty.
    pub fn from_i32(mins: &[i32], spans: &[i32]) -> Option<Mbr> {
        Coords::new(mins, spans).map(|c| Mbr(MbrRepr::Int32(c)))
    }

    /// Build a 64-bit float box from lower bounds and extents.
    ///
    /// Same truncation rules as [`Mbr::from_i32`].
    pub fn from_f64(mins: &[f64], spans: &[f64]) -> Option<Mbr> {
        Coords::new(mins, spans).map(|c| Mbr(MbrRepr::Float64(c)))
    }

    /// Build a two-dimensional `Float64` box from any rectangle implementing
    /// [`geo_traits::RectTrait`].
    pub fn from_rect(rect: &impl RectTrait<T = f64>) -> Mbr {
        let (min, max) = (rect.min(), rect.max());
        Mbr(MbrRepr::Float64(Coords {
            mins: vec![min.x(), min.y()],
            spans: vec![max.x() - min.x(), max.y() - min.y()],
        }))
    }

    /// The coordinate kind of this box.
    pub fn kind(&self) -> MbrKind {
        match &self.0 {
            MbrRepr::Int32(_) => <i32 as MbrNum>::KIND,
            MbrRepr::Float64(_) => <f64 as MbrNum>::KIND,
        }
    }

    /// The number of axes.
    pub fn dim(&self) -> usize {
        match &self.0 {
            MbrRepr::Int32(c) => c.dim(),
            MbrRepr::Float64(c) => c.dim(),
        }
    }

    /// Whether `other` lies entirely inside this box, bounds included.
    ///
    /// Mismatched kind or dimension yields `false`.
    pub fn contains(&self, other: &Mbr) -> bool {
        match (&self.0, &other.0) {
            (MbrRepr::Int32(a), MbrRepr::Int32(b)) => a.contains(b),
            (MbrRepr::Float64(a), MbrRepr::Float64(b)) => a.contains(b),
            _ => false,
        }
    }

    /// Whether the two boxes share at least one point. Touching boundaries
    /// count as intersecting.
    ///
    /// Mismatched kind or dimension yields `false`.
    pub fn intersects(&self, other: &Mbr) -> bool {
        match (&self.0, &other.0) {
            (MbrRepr::Int32(a), MbrRepr::Int32(b)) => a.intersects(b),
            (MbrRepr::Float64(a), MbrRepr::Float64(b)) => a.intersects(b),
            _ => false,
        }
    }

    /// The smallest box covering both operands.
    ///
    /// The kind of `self` wins: an operand of a different kind or dimension
    /// is skipped, leaving a clone of `self`.
    ///
    /// ```
    /// use mbr_index::Mbr;
    ///
    /// let a = Mbr::from_i32(&[0, 0], &[2, 2]).unwrap();
    /// let b = Mbr::from_i32(&[3, 3], &[2, 2]).unwrap();
    /// let u = a.merge(&b);
    /// assert!(u.contains(&a) && u.contains(&b));
    /// ```
    pub fn merge(&self, other: &Mbr) -> Mbr {
        let mut out = self.clone();
        out.merge_from(other);
        out
    }

    /// Fold [`Mbr::merge`] over a sequence, left to right.
    ///
    /// Returns `None` for an empty sequence and a clone of the sole operand
    /// for a singleton one.
    pub fn merge_all<'a, I>(mbrs: I) -> Option<Mbr>
    where
        I: IntoIterator<Item = &'a Mbr>,
    {
        let mut iter = mbrs.into_iter();
        let mut out = iter.next()?.clone();
        for m in iter {
            out.merge_from(m);
        }
        Some(out)
    }

    fn merge_from(&mut self, other: &Mbr) {
        match (&mut self.0, &other.0) {
            (MbrRepr::Int32(a), MbrRepr::Int32(b)) if a.dim() == b.dim() => a.union_with(b),
            (MbrRepr::Float64(a), MbrRepr::Float64(b)) if a.dim() == b.dim() => a.union_with(b),
            _ => {}
        }
    }

    /// The volume of the box: the product of its extents, as `f64`.
    pub fn size(&self) -> f64 {
        match &self.0 {
            MbrRepr::Int32(c) => c.size(),
            MbrRepr::Float64(c) => c.size(),
        }
    }

    /// The lower bound on `axis`, promoted to `f64`.
    pub(crate) fn min_at(&self, axis: usize) -> f64 {
        match &self.0 {
            MbrRepr::Int32(c) => c.mins[axis].as_f64(),
            MbrRepr::Float64(c) => c.mins[axis],
        }
    }
}

impl fmt::Display for Mbr {
    /// Diagnostic form `[(m0,m1,...),(s0,s1,...)]`; integer coordinates in
    /// decimal, float coordinates with six decimal places.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            MbrRepr::Int32(c) => c.fmt_diag(f),
            MbrRepr::Float64(c) => c.fmt_diag(f),
        }
    }
}
