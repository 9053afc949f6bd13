use ndarray::{s, Array3};

use crate::cuboid::Cuboid;
use crate::reactor::{CubeFlipper, Instruction};

/// A reactor which tracks every cube in a bounded region
/// individually.  This only works for small regions, but it is
/// obviously correct, so it is useful for checking the cuboid-based
/// reactor.
pub struct VoxelReactor {
    bound: Cuboid,
    on: Array3<bool>,
}

fn offset(start: i64, origin: i64) -> usize {
    // Only called for starts within the bound.
    (start - origin) as usize
}

impl VoxelReactor {
    pub fn new(bound: Cuboid) -> VoxelReactor {
        let shape = if bound.is_empty() {
            (0, 0, 0)
        } else {
            (
                bound.x.end.abs_diff(bound.x.start) as usize,
                bound.y.end.abs_diff(bound.y.start) as usize,
                bound.z.end.abs_diff(bound.z.start) as usize,
            )
        };
        VoxelReactor {
            bound,
            on: Array3::from_elem(shape, false),
        }
    }
}

impl CubeFlipper for VoxelReactor {
    fn count_cubes_on(&self) -> u128 {
        self.on.iter().filter(|&&on| on).count() as u128
    }

    fn obey(&mut self, instruction: &Instruction) {
        let target = instruction.affects();
        if !self.bound.intersects(target) {
            return;
        }
        let c = self.bound.clip(target);
        let (bx, by, bz) = (self.bound.x.start, self.bound.y.start, self.bound.z.start);
        self.on
            .slice_mut(s![
                offset(c.x.start, bx)..offset(c.x.end, bx),
                offset(c.y.start, by)..offset(c.y.end, by),
                offset(c.z.start, bz)..offset(c.z.end, bz)
            ])
            .fill(instruction.new_state());
    }
}

#[test]
fn test_voxel_small_example() {
    let steps = [
        Instruction::On(Cuboid::from_inclusive((10, 12), (10, 12), (10, 12))),
        Instruction::On(Cuboid::from_inclusive((11, 13), (11, 13), (11, 13))),
        Instruction::Off(Cuboid::from_inclusive((9, 11), (9, 11), (9, 11))),
        Instruction::On(Cuboid::from_inclusive((10, 10), (10, 10), (10, 10))),
    ];
    let mut reactor = VoxelReactor::new(Cuboid::from_inclusive((0, 20), (0, 20), (0, 20)));
    let mut counts = Vec::new();
    for step in &steps {
        reactor.obey(step);
        counts.push(reactor.count_cubes_on());
    }
    assert_eq!(counts, vec![27, 46, 38, 39]);
}

#[test]
fn test_voxel_crops_to_bound() {
    let mut reactor = VoxelReactor::new(Cuboid::new(0..4, 0..4, 0..4));
    reactor.obey(&Instruction::On(Cuboid::new(2..100, -100..100, 3..4)));
    assert_eq!(reactor.count_cubes_on(), 2 * 4 * 1);
    reactor.obey(&Instruction::On(Cuboid::new(4..8, 0..4, 0..4)));
    assert_eq!(reactor.count_cubes_on(), 8);
    reactor.obey(&Instruction::Off(Cuboid::new(-5..3, -5..5, -5..5)));
    assert_eq!(reactor.count_cubes_on(), 4);
}

#[test]
fn test_voxel_empty_bound() {
    let mut reactor = VoxelReactor::new(Cuboid::new(0..0, 0..4, 0..4));
    reactor.obey(&Instruction::On(Cuboid::new(-5..5, -5..5, -5..5)));
    assert_eq!(reactor.count_cubes_on(), 0);
}

#[test]
fn test_voxel_reversed_bound() {
    let mut reactor = VoxelReactor::new(Cuboid::from_inclusive((5, 3), (0, 3), (0, 3)));
    reactor.obey(&Instruction::On(Cuboid::new(-5..5, -5..5, -5..5)));
    assert_eq!(reactor.count_cubes_on(), 0);
}
