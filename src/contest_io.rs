//! The contest stdin/stdout turn protocol (ยง6 "Contest I/O").
//!
//! stdin: first the vertex count `n`, then `n` lines of `x y`, then one
//! `x y vx vy fuel rotate power` line per turn. stdout: one `rotate
//! power` line per turn.

use std::io::BufRead;

use anyhow::{Context, ensure};

use crate::geometry::Point;
use crate::map::Terrain;
use crate::state::{Decision, SimulationState};

/// Reads the polyline header (`n` then `n` `x y` lines) from `reader`.
pub fn read_terrain(mut reader: impl BufRead) -> anyhow::Result<Terrain> {
    let mut header = String::new();
    reader
        .read_line(&mut header)
        .context("failed to read polyline vertex count")?;
    let vertex_count: usize = header
        .trim()
        .parse()
        .with_context(|| format!("invalid polyline vertex count: {header:?}"))?;

    let mut vertices = Vec::with_capacity(vertex_count);
    for i in 0..vertex_count {
        let mut line = String::new();
        let bytes = reader
            .read_line(&mut line)
            .with_context(|| format!("failed to read polyline vertex {i}"))?;
        ensure!(bytes > 0, "stdin closed before {vertex_count} vertices were read");
        let mut fields = line.split_ascii_whitespace();
        let x: f64 = fields
            .next()
            .with_context(|| format!("missing x for polyline vertex {i}"))?
            .parse()
            .with_context(|| format!("invalid x for polyline vertex {i}"))?;
        let y: f64 = fields
            .next()
            .with_context(|| format!("missing y for polyline vertex {i}"))?
            .parse()
            .with_context(|| format!("invalid y for polyline vertex {i}"))?;
        vertices.push(Point::new(x, y));
    }

    Terrain::new(vertices).context("contest polyline has no landing pad")
}

/// Reads one turn's ship state line, or `Ok(None)` on clean EOF.
pub fn read_turn(mut reader: impl BufRead) -> anyhow::Result<Option<SimulationState>> {
    let mut line = String::new();
    let bytes = reader.read_line(&mut line).context("failed to read turn state")?;
    if bytes == 0 {
        return Ok(None);
    }

    let mut fields = line.split_ascii_whitespace();
    let mut next = |label: &str| -> anyhow::Result<f64> {
        fields
            .next()
            .with_context(|| format!("missing {label} in turn state"))?
            .parse()
            .with_context(|| format!("invalid {label} in turn state"))
    };

    let x = next("x")?;
    let y = next("y")?;
    let vx = next("vx")?;
    let vy = next("vy")?;
    let fuel = next("fuel")?;
    let rotate = next("rotate")?;
    let power = next("power")?;

    Ok(Some(SimulationState::new(
        Point::new(x, y),
        Point::new(vx, vy),
        fuel,
        rotate,
        power,
    )))
}

/// Writes one turn's decision as `rotate power` to `writer`.
pub fn write_decision(mut writer: impl std::io::Write, decision: Decision) -> anyhow::Result<()> {
    writeln!(writer, "{} {}", decision.rotate, decision.power)
        .context("failed to write decision to stdout")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_a_terrain_header() {
        let input = "4\n0 600\n1000 100\n6000 100\n7000 600\n";
        let terrain = read_terrain(input.as_bytes()).unwrap();
        assert_eq!(terrain.pad().start.x, 1000.0);
    }

    #[test]
    fn reads_turns_until_eof() {
        let input = "3500 3000 0 0 500 0 0\n";
        let mut reader = input.as_bytes();
        let turn = read_turn(&mut reader).unwrap().unwrap();
        assert_eq!(turn.position, Point::new(3500.0, 3000.0));
        let eof = read_turn(&mut reader).unwrap();
        assert!(eof.is_none());
    }

    #[test]
    fn writes_decision_as_two_integers() {
        let mut out = Vec::new();
        write_decision(&mut out, Decision::new(-5, 3)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "-5 3\n");
    }
}
