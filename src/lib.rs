//! Reactor reboot (Advent of Code 2021, day 22).
//!
//! The cubes which are on are kept as a list of disjoint cuboids.  Each
//! reboot step removes its own cuboid from every cuboid in that list
//! and, if it turns cubes on, adds itself; so the count of cubes on is
//! just the sum of the volumes.

pub mod cuboid;
pub mod parse;
pub mod reactor;
pub mod voxel;

pub use cuboid::{Cuboid, Point};
pub use parse::{parse_instruction, parse_instructions, ParseInstructionError};
pub use reactor::{
    apply_instruction, reboot, total_volume, volume_within, CubeFlipper, Instruction, Reactor,
};
pub use voxel::VoxelReactor;

/// The region considered during the initialization procedure,
/// `x=-50..50,y=-50..50,z=-50..50`.
pub const INITIALIZATION_REGION: Cuboid = Cuboid {
    x: -50..51,
    y: -50..51,
    z: -50..51,
};
