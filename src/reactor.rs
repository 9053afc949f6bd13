use std::fmt::{self, Display, Formatter};

use tracing::{event, span, Level};

use crate::cuboid::Cuboid;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Instruction {
    On(Cuboid),
    Off(Cuboid),
}

impl Instruction {
    pub fn new_state(&self) -> bool {
        match self {
            Instruction::On(_) => true,
            Instruction::Off(_) => false,
        }
    }

    pub fn affects(&self) -> &Cuboid {
        match self {
            Instruction::On(c) | Instruction::Off(c) => c,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = if self.new_state() { "on" } else { "off" };
        write!(f, "{} {}", state, self.affects())
    }
}

/// Anything which can follow reboot instructions and report how many
/// cubes end up on.
pub trait CubeFlipper {
    fn count_cubes_on(&self) -> u128;
    fn obey(&mut self, instruction: &Instruction);
}

/// Apply one instruction to a set of disjoint cuboids, producing a new
/// set of disjoint cuboids.
///
/// If `bound` is given and the instruction doesn't touch it, the
/// instruction is ignored.  The bound is only a filter; the instruction
/// cuboid is not cropped to it.
pub fn apply_instruction(
    active: &[Cuboid],
    instruction: &Instruction,
    bound: Option<&Cuboid>,
) -> Vec<Cuboid> {
    let target = instruction.affects();
    if let Some(b) = bound {
        if !b.intersects(target) {
            event!(Level::DEBUG, "skipping {}: outside {}", instruction, b);
            return active.to_vec();
        }
    }
    let mut result: Vec<Cuboid> = Vec::with_capacity(active.len() + 1);
    if instruction.new_state() && !target.is_empty() {
        result.push(target.clone());
    }
    for c in active {
        result.extend(c.subtract(target));
    }
    event!(
        Level::DEBUG,
        "{}: {} active cuboids became {}",
        instruction,
        active.len(),
        result.len()
    );
    result
}

/// Number of cells covered by a set of disjoint cuboids.
pub fn total_volume(active: &[Cuboid]) -> u128 {
    active.iter().map(Cuboid::volume).sum()
}

/// Number of cells covered by a set of disjoint cuboids which also lie
/// inside `bound`.
pub fn volume_within(active: &[Cuboid], bound: &Cuboid) -> u128 {
    active
        .iter()
        .filter(|c| c.intersects(bound))
        .map(|c| c.clip(bound).volume())
        .sum()
}

/// Start with every cube off, follow all the instructions and count
/// the cubes left on.  With a bound, only cubes inside it are counted.
pub fn reboot(instructions: &[Instruction], bound: Option<&Cuboid>) -> u128 {
    let span = span!(
        Level::INFO,
        "reboot",
        steps = instructions.len(),
        bounded = bound.is_some()
    );
    let _enter = span.enter();
    let active = instructions.iter().fold(Vec::new(), |active, instruction| {
        apply_instruction(&active, instruction, bound)
    });
    event!(Level::INFO, "{} disjoint cuboids are on", active.len());
    match bound {
        Some(b) => volume_within(&active, b),
        None => total_volume(&active),
    }
}

/// One snapshot of the reactor: the cubes which are on, as a list of
/// cuboids no two of which intersect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reactor {
    bound: Option<Cuboid>,
    active: Vec<Cuboid>,
}

impl Reactor {
    pub fn new(bound: Option<Cuboid>) -> Reactor {
        Reactor {
            bound,
            active: Vec::new(),
        }
    }

    pub fn active(&self) -> &[Cuboid] {
        &self.active
    }

    /// The state after following `instruction`.  `self` is left alone.
    pub fn apply(&self, instruction: &Instruction) -> Reactor {
        Reactor {
            bound: self.bound.clone(),
            active: apply_instruction(&self.active, instruction, self.bound.as_ref()),
        }
    }

    /// Every successive state of a reactor following `instructions`,
    /// starting from the state after the first instruction.
    pub fn history<'a>(
        instructions: &'a [Instruction],
        bound: Option<&Cuboid>,
    ) -> impl Iterator<Item = Reactor> + 'a {
        let history_span = span!(Level::INFO, "history", steps = instructions.len());
        instructions
            .iter()
            .scan(Reactor::new(bound.cloned()), move |reactor, instruction| {
                let _enter = history_span.enter();
                *reactor = reactor.apply(instruction);
                Some(reactor.clone())
            })
    }
}

impl CubeFlipper for Reactor {
    fn count_cubes_on(&self) -> u128 {
        match &self.bound {
            Some(b) => volume_within(&self.active, b),
            None => total_volume(&self.active),
        }
    }

    fn obey(&mut self, instruction: &Instruction) {
        *self = self.apply(instruction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::INITIALIZATION_REGION;
    use crate::parse::parse_instructions;
    use crate::voxel::VoxelReactor;

    fn instructions(lines: &[&str]) -> Vec<Instruction> {
        parse_instructions(lines.iter().copied()).expect("valid test data")
    }

    fn assert_disjoint(active: &[Cuboid]) {
        for (i, a) in active.iter().enumerate() {
            assert!(!a.is_empty(), "empty cuboid {} retained", a);
            for b in &active[i + 1..] {
                assert!(!a.intersects(b), "{} overlaps {}", a, b);
            }
        }
    }

    const SMALL_EXAMPLE: &[&str] = &[
        "on x=10..12,y=10..12,z=10..12",
        "on x=11..13,y=11..13,z=11..13",
        "off x=9..11,y=9..11,z=9..11",
        "on x=10..10,y=10..10,z=10..10",
    ];

    const LARGER_EXAMPLE: &[&str] = &[
        "on x=-20..26,y=-36..17,z=-47..7",
        "on x=-20..33,y=-21..23,z=-26..28",
        "on x=-22..28,y=-29..23,z=-38..16",
        "on x=-46..7,y=-6..46,z=-50..-1",
        "on x=-49..1,y=-3..46,z=-24..28",
        "on x=2..47,y=-22..22,z=-23..27",
        "on x=-27..23,y=-28..26,z=-21..29",
        "on x=-39..5,y=-6..47,z=-3..44",
        "on x=-30..21,y=-8..43,z=-13..34",
        "on x=-22..26,y=-27..20,z=-29..19",
        "off x=-48..-32,y=26..41,z=-47..-37",
        "on x=-12..35,y=6..50,z=-50..-2",
        "off x=-48..-32,y=-32..-16,z=-15..-5",
        "on x=-18..26,y=-33..15,z=-7..46",
        "off x=-40..-22,y=-38..-28,z=23..41",
        "on x=-16..35,y=-41..10,z=-47..6",
        "off x=-32..-23,y=11..30,z=-14..3",
        "on x=-49..-5,y=-3..45,z=-29..18",
        "off x=18..30,y=-20..-8,z=-3..13",
        "on x=-41..9,y=-7..43,z=-33..15",
        "on x=-54112..-39298,y=-85059..-49293,z=-27449..7877",
        "on x=967..23432,y=45373..81175,z=27513..53682",
    ];

    const REBOOT_EXAMPLE: &[&str] = &[
        "on x=-5..47,y=-31..22,z=-19..33",
        "on x=-44..5,y=-27..21,z=-14..35",
        "on x=-49..-1,y=-11..42,z=-10..38",
        "on x=-20..34,y=-40..6,z=-44..1",
        "off x=26..39,y=40..50,z=-2..11",
        "on x=-41..5,y=-41..6,z=-36..8",
        "off x=-43..-33,y=-45..-28,z=7..25",
        "on x=-33..15,y=-32..19,z=-34..11",
        "off x=35..47,y=-46..-34,z=-11..5",
        "on x=-14..36,y=-6..44,z=-16..29",
        "on x=-57795..-6158,y=29564..72030,z=20435..90618",
        "on x=36731..105352,y=-21140..28532,z=16094..90401",
        "on x=30999..107136,y=-53464..15513,z=8553..71215",
        "on x=13528..83982,y=-99403..-27377,z=-24141..23996",
        "on x=-72682..-12347,y=18159..111354,z=7391..80950",
        "on x=-1060..80757,y=-65301..-20884,z=-103788..-16709",
        "on x=-83015..-9461,y=-72160..-8347,z=-81239..-26856",
        "on x=-52752..22273,y=-49450..9096,z=54442..119054",
        "on x=-29982..40483,y=-108474..-28371,z=-24328..38471",
        "on x=-4958..62750,y=40422..118853,z=-7672..65583",
        "on x=55694..108686,y=-43367..46958,z=-26781..48729",
        "on x=-98497..-18186,y=-63569..3412,z=1232..88485",
        "on x=-726..56291,y=-62629..13224,z=18033..85226",
        "on x=-110886..-34664,y=-81338..-8658,z=8914..63723",
        "on x=-55829..24974,y=-16897..54165,z=-121762..-28058",
        "on x=-65152..-11147,y=22489..91432,z=-58782..1780",
        "on x=-120100..-32970,y=-46592..27473,z=-11695..61039",
        "on x=-18631..37533,y=-124565..-50804,z=-35667..28308",
        "on x=-57817..18248,y=49321..117703,z=5745..55881",
        "on x=14781..98692,y=-1341..70827,z=15753..70151",
        "on x=-34419..55919,y=-19626..40991,z=39015..114138",
        "on x=-60785..11593,y=-56135..2999,z=-95368..-26915",
        "on x=-32178..58085,y=17647..101866,z=-91405..-8878",
        "on x=-53655..12091,y=50097..105568,z=-75335..-4862",
        "on x=-111166..-40997,y=-71714..2688,z=5609..50954",
        "on x=-16602..70118,y=-98693..-44401,z=5197..76897",
        "on x=16383..101554,y=4615..83635,z=-44907..18747",
        "off x=-95822..-15171,y=-19987..48940,z=10804..104439",
        "on x=-89813..-14614,y=16069..88491,z=-3297..45228",
        "on x=41075..99376,y=-20427..49978,z=-52012..13762",
        "on x=-21330..50085,y=-17944..62733,z=-112280..-30197",
        "on x=-16478..35915,y=36008..118594,z=-7885..47086",
        "off x=-98156..-27851,y=-49952..43171,z=-99005..-8456",
        "off x=2032..69770,y=-71013..4824,z=7471..94418",
        "on x=43670..120875,y=-42068..12382,z=-24787..38892",
        "off x=37514..111226,y=-45862..25743,z=-16714..54663",
        "off x=25699..97951,y=-30668..59918,z=-15349..69697",
        "off x=-44271..17935,y=-9516..60759,z=49131..112598",
        "on x=-61695..-5813,y=40978..94975,z=8655..80240",
        "off x=-101086..-9439,y=-7088..67543,z=33935..83858",
        "off x=18020..114017,y=-48931..32606,z=21474..89843",
        "off x=-77139..10506,y=-89994..-18797,z=-80..59318",
        "off x=8476..79288,y=-75520..11602,z=-96624..-24783",
        "on x=-47488..-1262,y=24338..100707,z=16292..72967",
        "off x=-84341..13987,y=2429..92914,z=-90671..-1318",
        "off x=-37810..49457,y=-71013..-7894,z=-105357..-13188",
        "off x=-27365..46395,y=31009..98017,z=15428..76570",
        "off x=-70369..-16548,y=22648..78696,z=-1892..86821",
        "on x=-53470..21291,y=-120233..-33476,z=-44150..38147",
        "off x=-93533..-4276,y=-16170..68771,z=-104985..-24507",
    ];

    #[test]
    fn test_small_example() {
        let steps = instructions(SMALL_EXAMPLE);
        let counts: Vec<u128> = Reactor::history(&steps, None)
            .map(|r| r.count_cubes_on())
            .collect();
        assert_eq!(counts, vec![27, 27 + 19, 27 + 19 - 8, 39]);
        assert_eq!(reboot(&steps, None), 39);
        assert_eq!(reboot(&steps, Some(&INITIALIZATION_REGION)), 39);
    }

    #[test]
    fn test_larger_example() {
        let steps = instructions(LARGER_EXAMPLE);
        let bound = INITIALIZATION_REGION;
        assert_eq!(reboot(&steps, Some(&bound)), 590784);

        let mut voxels = VoxelReactor::new(bound);
        for step in &steps {
            voxels.obey(step);
        }
        assert_eq!(voxels.count_cubes_on(), 590784);
    }

    #[test]
    fn test_reboot_example() {
        let steps = instructions(REBOOT_EXAMPLE);
        assert_eq!(reboot(&steps, Some(&INITIALIZATION_REGION)), 474140);
        assert_eq!(reboot(&steps, None), 2758514936282235);
        for reactor in Reactor::history(&steps, None) {
            assert_disjoint(reactor.active());
        }
    }

    #[test]
    fn test_huge_cuboids() {
        let steps = instructions(&[
            "on x=-3000000..3000000,y=-3000000..3000000,z=-3000000..3000000",
            "off x=0..3000000,y=-3000000..3000000,z=-3000000..3000000",
        ]);
        let side: u128 = 6000001;
        let counts: Vec<u128> = Reactor::history(&steps, None)
            .map(|r| r.count_cubes_on())
            .collect();
        assert_eq!(counts, vec![side * side * side, 3000000 * side * side]);
    }

    #[test]
    fn test_empty_off_changes_nothing() {
        let whole = Instruction::On(Cuboid::from_inclusive((0, 9), (0, 9), (0, 9)));
        let reversed = Instruction::Off(Cuboid::from_inclusive((5, 3), (0, 9), (0, 9)));
        let flat = Instruction::Off(Cuboid::new(5..5, 0..10, 0..10));
        let steps = [whole, reversed, flat];
        for reactor in Reactor::history(&steps, None) {
            assert_eq!(reactor.active().len(), 1);
            assert_eq!(reactor.count_cubes_on(), 1000);
        }
        assert_eq!(reboot(&steps, None), 1000);
    }

    #[test]
    fn test_empty_instructions() {
        assert_eq!(reboot(&[], None), 0);
        assert_eq!(reboot(&[], Some(&INITIALIZATION_REGION)), 0);
    }

    #[test]
    fn test_off_on_empty_is_noop() {
        let steps = instructions(&["off x=0..5,y=0..5,z=0..5"]);
        let after = Reactor::new(None).apply(&steps[0]);
        assert!(after.active().is_empty());
        assert_eq!(after.count_cubes_on(), 0);
    }

    #[test]
    fn test_repeated_on_is_idempotent() {
        let steps = instructions(&[
            "on x=0..9,y=0..9,z=0..9",
            "on x=5..14,y=-3..3,z=2..4",
        ]);
        let once = Reactor::new(None).apply(&steps[0]).apply(&steps[1]);
        let twice = once.apply(&steps[1]);
        assert_eq!(once.count_cubes_on(), twice.count_cubes_on());
        assert_disjoint(twice.active());
    }

    #[test]
    fn test_enclosing_off_clears_everything() {
        let steps = instructions(&[
            "on x=0..9,y=0..9,z=0..9",
            "on x=5..14,y=-3..3,z=2..4",
            "on x=-4..-2,y=20..30,z=0..0",
            "off x=-10..20,y=-10..40,z=-10..10",
        ]);
        let last = Reactor::history(&steps, None).last().expect("four steps");
        assert!(last.active().is_empty());
        assert_eq!(last.count_cubes_on(), 0);
    }

    #[test]
    fn test_apply_leaves_input_alone() {
        let steps = instructions(SMALL_EXAMPLE);
        let before = Reactor::new(None).apply(&steps[0]);
        let snapshot = before.clone();
        let _after = before.apply(&steps[2]);
        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_bound_is_only_a_filter() {
        let bound = Cuboid::new(0..10, 0..10, 0..10);
        let outside = Instruction::On(Cuboid::new(10..20, 0..10, 0..10));
        let straddling = Instruction::On(Cuboid::new(5..15, 0..10, 0..10));
        assert!(apply_instruction(&[], &outside, Some(&bound)).is_empty());
        // The retained cuboid is not cropped...
        assert_eq!(
            apply_instruction(&[], &straddling, Some(&bound)),
            vec![straddling.affects().clone()]
        );
        // ...but only the part inside the bound is counted.
        assert_eq!(reboot(&[straddling], Some(&bound)), 5 * 10 * 10);
    }

    #[test]
    fn test_touching_cuboids_are_kept_whole() {
        let a = Instruction::On(Cuboid::new(0..3, 0..3, 0..3));
        let b = Instruction::On(Cuboid::new(3..6, 0..3, 0..3));
        let r = Reactor::new(None).apply(&a).apply(&b);
        assert_eq!(r.active().len(), 2);
        assert_eq!(r.count_cubes_on(), 54);
    }

    /// A tiny deterministic generator, so that the tests below always see
    /// the same instruction lists.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            self.0 >> 33
        }

        fn coordinate(&mut self, lo: i32, hi: i32) -> i32 {
            lo + (self.next() % ((hi - lo + 1) as u64)) as i32
        }

        fn range(&mut self, lo: i32, hi: i32) -> (i32, i32) {
            let a = self.coordinate(lo, hi);
            let b = self.coordinate(lo, hi);
            (a.min(b), a.max(b))
        }

        fn instruction(&mut self, lo: i32, hi: i32) -> Instruction {
            let (x, y, z) = (self.range(lo, hi), self.range(lo, hi), self.range(lo, hi));
            let c = Cuboid::from_inclusive(x, y, z);
            if self.next() % 3 == 0 {
                Instruction::Off(c)
            } else {
                Instruction::On(c)
            }
        }
    }

    #[test]
    fn test_every_step_is_disjoint() {
        let mut rng = Lcg(22);
        for _ in 0..20 {
            let steps: Vec<Instruction> = (0..25).map(|_| rng.instruction(-10, 10)).collect();
            for reactor in Reactor::history(&steps, None) {
                assert_disjoint(reactor.active());
            }
        }
    }

    #[test]
    fn test_agrees_with_voxels() {
        let mut rng = Lcg(2021);
        let bound = Cuboid::from_inclusive((-6, 6), (-6, 6), (-6, 6));
        for _ in 0..30 {
            // Some instructions straddle the bound, and some miss it.
            let steps: Vec<Instruction> = (0..15).map(|_| rng.instruction(-10, 10)).collect();
            let mut voxels = VoxelReactor::new(bound.clone());
            let mut reactor = Reactor::new(Some(bound.clone()));
            for step in &steps {
                voxels.obey(step);
                reactor.obey(step);
                assert_eq!(reactor.count_cubes_on(), voxels.count_cubes_on());
            }
            assert_eq!(reboot(&steps, Some(&bound)), voxels.count_cubes_on());
        }
    }
}
