//! The terrain polyline, its landing pad, and the fixture file loader
//! (ยง6 "Map fixture file").

use std::path::Path;

use anyhow::{Context, bail, ensure};

use crate::constants::MAX_FUEL;
use crate::geometry::{Point, Segment};
use crate::state::SimulationState;

/// A non-self-intersecting polyline terrain with a unique horizontal
/// landing pad segment.
#[derive(Debug, Clone)]
pub struct Terrain {
    vertices: Vec<Point>,
    pad_index: usize,
    y_cutoff: f64,
}

impl Terrain {
    /// Builds a terrain from an ordered, left-to-right vertex list.
    /// Fails (ยง7 "Invalid map" / "Empty polyline") if there are fewer than
    /// two vertices, or if no horizontal segment exists.
    pub fn new(vertices: Vec<Point>) -> anyhow::Result<Self> {
        ensure!(
            vertices.len() >= 2,
            "terrain polyline needs at least 2 vertices, got {}",
            vertices.len()
        );

        let pad_index = vertices
            .windows(2)
            .position(|w| w[0].y == w[1].y)
            .context("no horizontal landing pad segment found in polyline")?;

        let pad = Segment::new(vertices[pad_index], vertices[pad_index + 1]);
        ensure!(
            pad.start.x < pad.end.x,
            "landing pad segment must run left to right (start.x < end.x)"
        );

        let y_cutoff = vertices
            .iter()
            .map(|p| p.y)
            .fold(f64::MIN, f64::max);

        Ok(Self {
            vertices,
            pad_index,
            y_cutoff,
        })
    }

    /// The landing pad segment.
    pub fn pad(&self) -> Segment {
        Segment::new(self.vertices[self.pad_index], self.vertices[self.pad_index + 1])
    }

    /// Index into [`Terrain::segments`] of the pad segment.
    pub fn pad_index(&self) -> usize {
        self.pad_index
    }

    /// Ordered ground segments, left to right.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.vertices.windows(2).map(|w| Segment::new(w[0], w[1]))
    }

    /// Highest ground elevation anywhere in the polyline. The simulator
    /// skips the segment scan entirely when the ship is still above this,
    /// since no collision is possible (ยง4.D optimization).
    pub fn y_cutoff(&self) -> f64 {
        self.y_cutoff
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }
}

/// Parses the whitespace-separated fixture format (ยง6): the first line
/// holds `x y vx vy fuel rotate power`, followed by `x y` pairs describing
/// the polyline.
pub fn load_fixture(path: impl AsRef<Path>) -> anyhow::Result<(SimulationState, Terrain)> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read map fixture: {}", path.display()))?;
    parse_fixture(&contents).with_context(|| format!("malformed map fixture: {}", path.display()))
}

fn parse_fixture(contents: &str) -> anyhow::Result<(SimulationState, Terrain)> {
    let mut numbers = contents.split_ascii_whitespace();

    let mut next = |label: &str| -> anyhow::Result<f64> {
        let raw = numbers
            .next()
            .with_context(|| format!("missing {label} in fixture"))?;
        raw.parse::<f64>()
            .with_context(|| format!("invalid {label} value: {raw:?}"))
    };

    let x = next("position x")?;
    let y = next("position y")?;
    let vx = next("velocity x")?;
    let vy = next("velocity y")?;
    let fuel = next("fuel")?;
    let rotate = next("rotate")?;
    let power = next("power")?;

    ensure!(
        (0.0..=MAX_FUEL).contains(&fuel),
        "fixture fuel {fuel} out of range [0, {MAX_FUEL}]"
    );

    let initial = SimulationState::new(Point::new(x, y), Point::new(vx, vy), fuel, rotate, power);

    let mut vertices = Vec::new();
    loop {
        let Some(raw_x) = numbers.next() else {
            break;
        };
        let raw_y = numbers
            .next()
            .context("polyline x coordinate with no matching y coordinate")?;
        let vx: f64 = raw_x
            .parse()
            .with_context(|| format!("invalid polyline x value: {raw_x:?}"))?;
        let vy: f64 = raw_y
            .parse()
            .with_context(|| format!("invalid polyline y value: {raw_y:?}"))?;
        vertices.push(Point::new(vx, vy));
    }

    if vertices.is_empty() {
        bail!("fixture has no polyline vertices");
    }

    let terrain = Terrain::new(vertices)?;
    Ok((initial, terrain))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_terrain(pad_start_x: f64, pad_end_x: f64, y: f64) -> Terrain {
        Terrain::new(vec![
            Point::new(0.0, y + 500.0),
            Point::new(pad_start_x, y),
            Point::new(pad_end_x, y),
            Point::new(7000.0, y + 500.0),
        ])
        .unwrap()
    }

    #[test]
    fn finds_the_horizontal_pad() {
        let t = flat_terrain(1000.0, 6000.0, 100.0);
        assert_eq!(t.pad().start.x, 1000.0);
        assert_eq!(t.pad().end.x, 6000.0);
        assert_eq!(t.pad_index(), 1);
    }

    #[test]
    fn rejects_terrain_with_no_pad() {
        let err = Terrain::new(vec![
            Point::new(0.0, 100.0),
            Point::new(3500.0, 500.0),
            Point::new(7000.0, 100.0),
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_too_short_polyline() {
        assert!(Terrain::new(vec![Point::new(0.0, 0.0)]).is_err());
    }

    #[test]
    fn parses_fixture_text() {
        let text = "3500 3000 0 0 500 0 0\n0 600 1000 100 6000 100 7000 600\n";
        let (state, terrain) = parse_fixture(text).unwrap();
        assert_eq!(state.position, Point::new(3500.0, 3000.0));
        assert_eq!(state.fuel, 500.0);
        assert_eq!(terrain.pad().start.x, 1000.0);
        assert_eq!(terrain.pad().end.x, 6000.0);
    }

    #[test]
    fn rejects_fixture_with_fuel_above_the_ceiling() {
        let text = "3500 3000 0 0 999999 0 0\n0 600 1000 100 6000 100 7000 600\n";
        assert!(parse_fixture(text).is_err());
    }
}
