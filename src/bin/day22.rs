use std::io;
use std::io::prelude::*;

use tracing::{event, Level};
use tracing_subscriber::prelude::*;

use reactor2021::{
    parse_instructions, reboot, CubeFlipper, Instruction, VoxelReactor, INITIALIZATION_REGION,
};

fn part1(instructions: &[Instruction]) {
    let region = INITIALIZATION_REGION;
    let count = reboot(instructions, Some(&region));
    let mut voxels = VoxelReactor::new(region);
    for instruction in instructions {
        voxels.obey(instruction);
    }
    if voxels.count_cubes_on() != count {
        event!(
            Level::WARN,
            "cuboid reactor says {} but voxel reactor says {}",
            count,
            voxels.count_cubes_on()
        );
    }
    println!("Day 22 part 1: {} cubes are on", count);
}

fn part2(instructions: &[Instruction]) {
    println!("Day 22 part 2: {} cubes are on", reboot(instructions, None));
}

fn run() -> Result<(), String> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
        .map_err(|e| e.to_string())?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let lines: Vec<String> = io::BufReader::new(io::stdin())
        .lines()
        .collect::<Result<_, _>>()
        .map_err(|e| format!("failed to read input: {}", e))?;
    let instructions = parse_instructions(lines.iter().map(String::as_str))?;
    event!(Level::INFO, "read {} reboot steps", instructions.len());
    part1(&instructions);
    part2(&instructions);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
