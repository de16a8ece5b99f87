/// LAMMPS text dump reader extracting positions and one named scalar field.
use std::io::BufRead;

/// One frame as it appears in the dump: raw positions plus the selected
/// scalar column, index-aligned and equal in length by construction.
#[derive(Debug, Clone)]
pub struct DumpFrame {
    pub timestep: u64,
    pub positions: Vec<[f32; 3]>,
    pub scalars: Vec<f64>,
}

/// Column layout of an `ITEM: ATOMS` section.
struct AtomColumns {
    x: usize,
    y: usize,
    z: usize,
    scalar: usize,
}

impl AtomColumns {
    /// Resolve coordinate columns and the requested scalar field. Multi
    /// component fields (`name[1]`, `name[2]`, ...) select their first
    /// column.
    fn resolve(names: &[&str], field: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let find = |wanted: &[&str]| {
            names
                .iter()
                .position(|name| wanted.contains(name))
                .ok_or_else(|| format!("dump has no {} column (columns: {names:?})", wanted[0]))
        };
        let x = find(&["x", "xu", "xs"])?;
        let y = find(&["y", "yu", "ys"])?;
        let z = find(&["z", "zu", "zs"])?;

        let component_prefix = format!("{field}[");
        let scalar = names
            .iter()
            .position(|name| *name == field)
            .or_else(|| {
                names
                    .iter()
                    .position(|name| name.starts_with(&component_prefix))
            })
            .ok_or_else(|| format!("dump has no \"{field}\" column (columns: {names:?})"))?;

        Ok(Self { x, y, z, scalar })
    }
}

/// Parse every frame of a LAMMPS dump. Malformed sections fail the whole
/// read rather than producing a truncated frame.
pub fn read_dump<R: BufRead>(
    reader: R,
    field: &str,
) -> Result<Vec<DumpFrame>, Box<dyn std::error::Error>> {
    let mut lines = reader.lines();
    let mut frames = Vec::new();

    while let Some(line) = lines.next() {
        let line = line?;
        let header = line.trim();
        if header.is_empty() {
            continue;
        }
        if !header.starts_with("ITEM: TIMESTEP") {
            return Err(format!("expected ITEM: TIMESTEP, found \"{header}\"").into());
        }

        let timestep: u64 = next_line(&mut lines, "timestep")?.trim().parse()?;

        expect_item(&mut lines, "ITEM: NUMBER OF ATOMS")?;
        let atom_count: usize = next_line(&mut lines, "atom count")?.trim().parse()?;

        // Box bounds are three extent lines we do not need; scene sizing
        // comes from the particles themselves.
        expect_item(&mut lines, "ITEM: BOX BOUNDS")?;
        for _ in 0..3 {
            next_line(&mut lines, "box bounds")?;
        }

        let atoms_header = next_line(&mut lines, "ITEM: ATOMS")?;
        let atoms_header = atoms_header.trim();
        let Some(column_list) = atoms_header.strip_prefix("ITEM: ATOMS") else {
            return Err(format!("expected ITEM: ATOMS, found \"{atoms_header}\"").into());
        };
        let names: Vec<&str> = column_list.split_whitespace().collect();
        let columns = AtomColumns::resolve(&names, field)?;
        let width = [columns.x, columns.y, columns.z, columns.scalar]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1;

        let mut positions = Vec::with_capacity(atom_count);
        let mut scalars = Vec::with_capacity(atom_count);
        for _ in 0..atom_count {
            let row = next_line(&mut lines, "atom row")?;
            let fields: Vec<&str> = row.split_whitespace().collect();
            if fields.len() < width {
                return Err(format!(
                    "timestep {timestep}: atom row has {} columns, need {width}",
                    fields.len()
                )
                .into());
            }
            positions.push([
                fields[columns.x].parse::<f32>()?,
                fields[columns.y].parse::<f32>()?,
                fields[columns.z].parse::<f32>()?,
            ]);
            scalars.push(fields[columns.scalar].parse::<f64>()?);
        }

        frames.push(DumpFrame {
            timestep,
            positions,
            scalars,
        });
    }

    Ok(frames)
}

fn next_line<I: Iterator<Item = std::io::Result<String>>>(
    lines: &mut I,
    what: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => Err(format!("dump ended early, expected {what}").into()),
    }
}

fn expect_item<I: Iterator<Item = std::io::Result<String>>>(
    lines: &mut I,
    prefix: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let line = next_line(lines, prefix)?;
    if line.trim().starts_with(prefix) {
        Ok(())
    } else {
        Err(format!("expected {prefix}, found \"{}\"", line.trim()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_FRAME_DUMP: &str = "\
ITEM: TIMESTEP
0
ITEM: NUMBER OF ATOMS
3
ITEM: BOX BOUNDS pp pp pp
0.0 10.0
0.0 10.0
0.0 10.0
ITEM: ATOMS id type x y z c_grain_atoms
1 1 0.0 0.0 0.0 1.0
2 1 1.0 0.0 0.0 3.0
3 1 0.0 1.0 0.0 5.0
ITEM: TIMESTEP
285
ITEM: NUMBER OF ATOMS
1
ITEM: BOX BOUNDS pp pp pp
0.0 10.0
0.0 10.0
0.0 10.0
ITEM: ATOMS id type x y z c_grain_atoms
1 1 2.0 2.0 2.0 7.0
";

    #[test]
    fn reads_frames_and_selected_column() {
        let frames = read_dump(Cursor::new(TWO_FRAME_DUMP), "c_grain_atoms").unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].timestep, 0);
        assert_eq!(frames[0].positions[1], [1.0, 0.0, 0.0]);
        assert_eq!(frames[0].scalars, vec![1.0, 3.0, 5.0]);
        assert_eq!(frames[1].timestep, 285);
        assert_eq!(frames[1].scalars, vec![7.0]);
    }

    #[test]
    fn multi_component_field_selects_first_column() {
        let dump = "\
ITEM: TIMESTEP
0
ITEM: NUMBER OF ATOMS
1
ITEM: BOX BOUNDS pp pp pp
0 1
0 1
0 1
ITEM: ATOMS x y z c_stress[1] c_stress[2]
0.0 0.0 0.0 11.0 22.0
";
        let frames = read_dump(Cursor::new(dump), "c_stress").unwrap();
        assert_eq!(frames[0].scalars, vec![11.0]);
    }

    #[test]
    fn missing_field_is_an_error() {
        let err = read_dump(Cursor::new(TWO_FRAME_DUMP), "c_missing").unwrap_err();
        assert!(err.to_string().contains("c_missing"));
    }

    #[test]
    fn short_atom_row_fails_the_read() {
        let dump = "\
ITEM: TIMESTEP
0
ITEM: NUMBER OF ATOMS
1
ITEM: BOX BOUNDS pp pp pp
0 1
0 1
0 1
ITEM: ATOMS x y z c_grain_atoms
0.0 0.0 0.0
";
        assert!(read_dump(Cursor::new(dump), "c_grain_atoms").is_err());
    }

    #[test]
    fn truncated_dump_fails_the_read() {
        let dump = "ITEM: TIMESTEP\n0\nITEM: NUMBER OF ATOMS\n2\n";
        assert!(read_dump(Cursor::new(dump), "c_grain_atoms").is_err());
    }
}
