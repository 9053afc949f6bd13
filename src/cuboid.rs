use std::cmp::{max, min};
use std::fmt::{self, Display, Formatter};
use std::ops::Range;

use tracing::{event, Level};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Point(pub i64, pub i64, pub i64);

/// An axis-aligned box of unit cells.  Each axis is stored as a
/// half-open range, so the instruction `x=10..12` becomes `10..13`.
///
/// A cuboid with any empty axis contains no cells at all.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Cuboid {
    pub x: Range<i64>,
    pub y: Range<i64>,
    pub z: Range<i64>,
}

fn ranges_overlap(a: &Range<i64>, b: &Range<i64>) -> bool {
    a.start < b.end && b.start < a.end
}

fn clip_range(a: &Range<i64>, b: &Range<i64>) -> Range<i64> {
    max(a.start, b.start)..min(a.end, b.end)
}

fn range_len(r: &Range<i64>) -> u128 {
    // Callers check for emptiness first.
    u128::from(r.end.abs_diff(r.start))
}

impl Cuboid {
    pub fn new(x: Range<i64>, y: Range<i64>, z: Range<i64>) -> Cuboid {
        Cuboid { x, y, z }
    }

    /// Build a cuboid from inclusive bounds, as they appear in the
    /// puzzle input.  The bounds are widened, so `hi + 1` can't overflow.
    pub fn from_inclusive(x: (i32, i32), y: (i32, i32), z: (i32, i32)) -> Cuboid {
        fn half_open((lo, hi): (i32, i32)) -> Range<i64> {
            i64::from(lo)..(i64::from(hi) + 1)
        }
        Cuboid {
            x: half_open(x),
            y: half_open(y),
            z: half_open(z),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// True if the two cuboids share some positive volume.  Cuboids
    /// which only touch along a face, edge or corner do not intersect,
    /// and an empty cuboid intersects nothing.
    pub fn intersects(&self, other: &Cuboid) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && ranges_overlap(&self.x, &other.x)
            && ranges_overlap(&self.y, &other.y)
            && ranges_overlap(&self.z, &other.z)
    }

    /// The overlap of `self` and `other`.  If they don't intersect, the
    /// result is empty.
    pub fn clip(&self, other: &Cuboid) -> Cuboid {
        Cuboid {
            x: clip_range(&self.x, &other.x),
            y: clip_range(&self.y, &other.y),
            z: clip_range(&self.z, &other.z),
        }
    }

    /// Number of cells in the cuboid.  Cuboids built with
    /// `from_inclusive` are at most 2^32 cells along each axis, so this
    /// is exact for them; larger products saturate.
    pub fn volume(&self) -> u128 {
        if self.is_empty() {
            0
        } else {
            range_len(&self.x)
                .saturating_mul(range_len(&self.y))
                .saturating_mul(range_len(&self.z))
        }
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.x.contains(&p.0) && self.y.contains(&p.1) && self.z.contains(&p.2)
    }

    /// Compute `self \ other` as at most six disjoint cuboids.
    ///
    /// The slabs are cut around the overlapping core `b`: first the
    /// full-width parts of `self` below and above `b` in z, then
    /// (within `b`'s z extent) the parts below and above `b` in y, and
    /// finally (within `b`'s y and z extent) the parts either side of
    /// `b` in x.  Slabs with no volume are dropped.
    pub fn subtract(&self, other: &Cuboid) -> Vec<Cuboid> {
        if !self.intersects(other) {
            return vec![self.clone()];
        }
        let b = self.clip(other);
        let candidates = [
            // z below and above, full extent in x and y.
            Cuboid::new(self.x.clone(), self.y.clone(), self.z.start..b.z.start),
            Cuboid::new(self.x.clone(), self.y.clone(), b.z.end..self.z.end),
            // y below and above, within b's z band.
            Cuboid::new(self.x.clone(), self.y.start..b.y.start, b.z.clone()),
            Cuboid::new(self.x.clone(), b.y.end..self.y.end, b.z.clone()),
            // x either side, within b's y and z band.
            Cuboid::new(self.x.start..b.x.start, b.y.clone(), b.z.clone()),
            Cuboid::new(b.x.end..self.x.end, b.y.clone(), b.z.clone()),
        ];
        let pieces: Vec<Cuboid> = candidates
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect();
        event!(
            Level::TRACE,
            "{} minus {} leaves {} pieces",
            self,
            other,
            pieces.len()
        );
        pieces
    }
}

fn fmt_range(f: &mut Formatter<'_>, axis: char, r: &Range<i64>) -> fmt::Result {
    write!(f, "{}={}..{}", axis, r.start, r.end - 1)
}

impl Display for Cuboid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_range(f, 'x', &self.x)?;
        f.write_str(",")?;
        fmt_range(f, 'y', &self.y)?;
        f.write_str(",")?;
        fmt_range(f, 'z', &self.z)
    }
}

#[cfg(test)]
pub fn all_cells(c: &Cuboid) -> Vec<Point> {
    let mut result = Vec::new();
    for x in c.x.clone() {
        for y in c.y.clone() {
            for z in c.z.clone() {
                result.push(Point(x, y, z));
            }
        }
    }
    result
}

#[test]
fn test_from_inclusive() {
    let c = Cuboid::from_inclusive((10, 12), (-3, -3), (0, 1));
    assert_eq!(c, Cuboid::new(10..13, -3..-2, 0..2));
    assert_eq!(c.volume(), 3 * 1 * 2);
}

#[test]
fn test_display() {
    let c = Cuboid::from_inclusive((-54112, -39298), (-85059, -49293), (-27449, 7877));
    assert_eq!(
        c.to_string(),
        "x=-54112..-39298,y=-85059..-49293,z=-27449..7877"
    );
}

#[test]
fn test_volume() {
    assert_eq!(Cuboid::new(0..3, 0..3, 0..3).volume(), 27);
    assert_eq!(Cuboid::new(0..0, 0..3, 0..3).volume(), 0);
    // Two reversed axes must not multiply out to something positive.
    let reversed = Cuboid::from_inclusive((5, 2), (5, 2), (0, 2));
    assert_eq!(reversed.volume(), 0);
    assert!(reversed.is_empty());
}

#[test]
fn test_intersects() {
    let a = Cuboid::new(0..10, 0..10, 0..10);
    assert!(a.intersects(&Cuboid::new(9..20, 9..20, 9..20)));
    assert!(a.intersects(&Cuboid::new(2..3, 2..3, 2..3)));
    assert!(Cuboid::new(2..3, 2..3, 2..3).intersects(&a));
    // Sharing a face is not an intersection.
    assert!(!a.intersects(&Cuboid::new(10..20, 0..10, 0..10)));
    assert!(!a.intersects(&Cuboid::new(0..10, -5..0, 0..10)));
    // Nor is sharing only an edge or a corner.
    assert!(!a.intersects(&Cuboid::new(10..20, 10..20, 0..10)));
    assert!(!a.intersects(&Cuboid::new(10..20, 10..20, 10..20)));
    // Overlap on two axes isn't enough.
    assert!(!a.intersects(&Cuboid::new(0..10, 0..10, 30..40)));
}

#[test]
fn test_clip() {
    let a = Cuboid::new(0..10, 0..10, 0..10);
    let b = Cuboid::new(5..20, -5..3, 2..4);
    assert_eq!(a.clip(&b), Cuboid::new(5..10, 0..3, 2..4));
    assert_eq!(b.clip(&a), a.clip(&b));
    assert!(a.clip(&Cuboid::new(10..20, 0..10, 0..10)).is_empty());
}

#[test]
fn test_contains() {
    let c = Cuboid::from_inclusive((10, 12), (10, 12), (10, 12));
    assert!(c.contains(&Point(10, 10, 10)));
    assert!(c.contains(&Point(12, 12, 12)));
    assert!(!c.contains(&Point(13, 12, 12)));
    assert!(!c.contains(&Point(9, 12, 12)));
}

#[test]
fn test_subtract_disjoint_is_identity() {
    let a = Cuboid::new(0..3, 0..3, 0..3);
    let b = Cuboid::new(3..6, 0..3, 0..3);
    assert_eq!(a.subtract(&b), vec![a.clone()]);
}

#[test]
fn test_subtract_enclosing_leaves_nothing() {
    let a = Cuboid::new(0..3, 0..3, 0..3);
    let b = Cuboid::new(-1..4, -1..4, -1..4);
    assert!(a.subtract(&b).is_empty());
    assert!(a.subtract(&a).is_empty());
}

#[test]
fn test_subtract_centre_hole() {
    let a = Cuboid::new(0..3, 0..3, 0..3);
    let hole = Cuboid::new(1..2, 1..2, 1..2);
    let pieces = a.subtract(&hole);
    assert_eq!(pieces.len(), 6);
    assert_eq!(pieces.iter().map(Cuboid::volume).sum::<u128>(), 26);
}

#[test]
fn test_subtract_flush_face() {
    // Removing the top layer leaves a single slab.
    let a = Cuboid::new(0..3, 0..3, 0..3);
    let top = Cuboid::new(-10..10, -10..10, 2..10);
    assert_eq!(a.subtract(&top), vec![Cuboid::new(0..3, 0..3, 0..2)]);
}

#[test]
fn test_empty_cuboids_never_intersect() {
    let a = Cuboid::from_inclusive((0, 9), (0, 9), (0, 9));
    let reversed = Cuboid::from_inclusive((5, 3), (0, 9), (0, 9));
    let flat = Cuboid::new(5..5, 0..10, 0..10);
    for empty in [&reversed, &flat] {
        assert!(!a.intersects(empty));
        assert!(!empty.intersects(&a));
        assert_eq!(a.subtract(empty), vec![a.clone()]);
        assert_eq!(a.subtract(empty)[0].volume(), 1000);
    }
}

#[test]
fn test_volume_at_extreme_bounds() {
    let widest = Cuboid::from_inclusive(
        (i32::MIN, i32::MAX),
        (i32::MIN, i32::MAX),
        (i32::MIN, i32::MAX),
    );
    assert_eq!(widest.x, -2147483648..2147483648);
    assert_eq!(widest.volume(), 1u128 << 96);

    let big = Cuboid::from_inclusive(
        (-3000000, 3000000),
        (-3000000, 3000000),
        (-3000000, 3000000),
    );
    assert_eq!(big.volume(), 6000001u128 * 6000001 * 6000001);
}

#[cfg(test)]
fn check_subtraction(a: &Cuboid, b: &Cuboid) {
    let pieces = a.subtract(b);
    assert!(pieces.len() <= 6);
    for (i, p) in pieces.iter().enumerate() {
        assert!(!p.is_empty(), "{} - {}: empty piece {}", a, b, p);
        assert!(!p.intersects(b), "{} - {}: {} overlaps", a, b, p);
        for q in &pieces[i + 1..] {
            assert!(!p.intersects(q), "{} - {}: {} overlaps {}", a, b, p, q);
        }
    }
    let core = if a.intersects(b) { a.clip(b).volume() } else { 0 };
    assert_eq!(
        pieces.iter().map(Cuboid::volume).sum::<u128>() + core,
        a.volume(),
        "{} - {}",
        a,
        b
    );
    // Every cell of `a` is either in `b` or in exactly one piece.
    for cell in all_cells(a) {
        let covering = pieces.iter().filter(|p| p.contains(&cell)).count();
        if b.contains(&cell) {
            assert_eq!(covering, 0);
        } else {
            assert_eq!(covering, 1, "{} - {}: {:?}", a, b, cell);
        }
    }
}

#[test]
fn test_subtract_reconstructs() {
    // Slide a small cuboid through every position relative to a
    // fixed one, covering the enclosed, flush, straddling and
    // disjoint cases on each axis.
    let a = Cuboid::new(0..4, 0..4, 0..4);
    let spans: Vec<Range<i64>> = vec![-2..0, -1..1, -1..5, 0..2, 1..3, 2..4, 3..6, 4..6, 0..4];
    for x in &spans {
        for y in &spans {
            for z in &spans {
                let b = Cuboid::new(x.clone(), y.clone(), z.clone());
                check_subtraction(&a, &b);
                check_subtraction(&b, &a);
            }
        }
    }
}
