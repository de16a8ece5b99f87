/// Trajectory dump to dataset payload converter main entry point
mod exporter;
mod lammps;

use exporter::TrajectoryExporter;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <input.lammpstrj> <scalar-field> [frame-index ...]",
            args[0]
        );
        eprintln!("With no frame indices, every frame in the dump is exported.");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let field = &args[2];
    let frame_indices = args[3..]
        .iter()
        .map(|arg| {
            arg.parse::<usize>()
                .map_err(|_| format!("invalid frame index: {arg}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let exporter = TrajectoryExporter::new(input_path, field, frame_indices)?;
    exporter.export()?;

    Ok(())
}
