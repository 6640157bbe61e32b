use std::fmt;

use geo::{Bearing, Distance, Haversine, LineString, Point};
use serde::{Deserialize, Serialize};

use crate::geodesy::Compass;

/// Vertices between two consecutive "continue" steps
const STEP_INTERVAL: usize = 10;

/// Ways of covering a route, each with a fixed average speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Car,
    Bike,
    Walk,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [TravelMode::Car, TravelMode::Bike, TravelMode::Walk];

    pub fn speed_kmh(self) -> f64 {
        match self {
            TravelMode::Car => 40.0,
            TravelMode::Bike => 10.0,
            TravelMode::Walk => 3.0,
        }
    }

    /// Minutes needed for `meters` at this mode's speed
    pub fn minutes(self, meters: f64) -> f64 {
        meters / 1000.0 / self.speed_kmh() * 60.0
    }
}

/// Estimated duration for one travel mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TravelTime {
    pub mode: TravelMode,
    pub minutes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", content = "heading", rename_all = "snake_case")]
pub enum Instruction {
    Depart(Compass),
    Continue(Compass),
    Arrive,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Depart(heading) => write!(f, "Head {heading}"),
            Instruction::Continue(heading) => write!(f, "Continue {heading}"),
            Instruction::Arrive => write!(f, "Arrive at destination"),
        }
    }
}

/// One turn-by-turn step; `distance` is the length of the segment the
/// heading was taken from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Direction {
    pub instruction: Instruction,
    pub distance: f64,
}

/// Coarse compass directions along a line: a departure step, a heading
/// every [`STEP_INTERVAL`] vertices, then an arrival step.
pub fn directions_along(line: &LineString<f64>) -> Vec<Direction> {
    let mut steps = Vec::new();

    for (i, segment) in line.lines().enumerate() {
        if i != 0 && i % STEP_INTERVAL != 0 {
            continue;
        }

        let from = Point::from(segment.start);
        let to = Point::from(segment.end);
        let heading = Compass::from_bearing(Haversine.bearing(from, to));
        let instruction = if i == 0 {
            Instruction::Depart(heading)
        } else {
            Instruction::Continue(heading)
        };

        steps.push(Direction {
            instruction,
            distance: Haversine.distance(from, to),
        });
    }

    steps.push(Direction {
        instruction: Instruction::Arrive,
        distance: 0.0,
    });
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;

    #[test]
    fn travel_minutes_per_mode() {
        assert!((TravelMode::Car.minutes(10_000.0) - 15.0).abs() < 1e-9);
        assert!((TravelMode::Bike.minutes(10_000.0) - 60.0).abs() < 1e-9);
        assert!((TravelMode::Walk.minutes(1_500.0) - 30.0).abs() < 1e-9);
        assert_eq!(TravelMode::Walk.minutes(0.0), 0.0);
    }

    #[test]
    fn straight_line_heads_north_then_arrives() {
        let line = LineString::from(vec![(28.0, 37.0), (28.0, 37.001)]);
        let steps = directions_along(&line);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].instruction, Instruction::Depart(Compass::North));
        assert!((steps[0].distance - 111.19).abs() < 0.5);
        assert_eq!(steps[1].instruction, Instruction::Arrive);
        assert_eq!(steps[1].distance, 0.0);
    }

    #[test]
    fn emits_a_step_every_tenth_segment() {
        let coords: Vec<Coord<f64>> = (0..=25)
            .map(|i| Coord {
                x: 28.0 + f64::from(i) * 0.0001,
                y: 37.0,
            })
            .collect();
        let steps = directions_along(&LineString::new(coords));

        // segments 0, 10, 20 plus arrival
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].instruction, Instruction::Depart(Compass::East));
        assert_eq!(steps[1].instruction, Instruction::Continue(Compass::East));
        assert_eq!(steps[2].instruction, Instruction::Continue(Compass::East));
        assert_eq!(steps[3].instruction, Instruction::Arrive);
    }

    #[test]
    fn degenerate_line_only_arrives() {
        let steps = directions_along(&LineString::from(vec![(28.0, 37.0)]));
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].instruction.to_string(), "Arrive at destination");
    }
}
