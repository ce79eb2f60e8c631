//! Hex coordinates, directions, terrain and the hex record itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Offset coordinates on a pointy-top grid. Odd rows sit half a hex to the
/// east of even rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub x: i32,
    pub y: i32,
}

impl HexCoord {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent hex in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let odd = self.y.rem_euclid(2) == 1;
        let (dx, dy) = match (direction, odd) {
            (Direction::NorthWest, false) => (-1, -1),
            (Direction::NorthWest, true) => (0, -1),
            (Direction::NorthEast, false) => (0, -1),
            (Direction::NorthEast, true) => (1, -1),
            (Direction::West, _) => (-1, 0),
            (Direction::East, _) => (1, 0),
            (Direction::SouthWest, false) => (-1, 1),
            (Direction::SouthWest, true) => (0, 1),
            (Direction::SouthEast, false) => (0, 1),
            (Direction::SouthEast, true) => (1, 1),
        };
        Self::new(self.x + dx, self.y + dy)
    }

    /// All six neighbours, in `Direction::ALL` order.
    #[must_use]
    pub fn neighbours(self) -> [Self; 6] {
        Direction::ALL.map(|direction| self.step(direction))
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The six hex directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    NorthWest,
    NorthEast,
    West,
    East,
    SouthWest,
    SouthEast,
}

impl Direction {
    pub const ALL: [Self; 6] = [
        Self::NorthWest,
        Self::NorthEast,
        Self::West,
        Self::East,
        Self::SouthWest,
        Self::SouthEast,
    ];

    /// Finds the first compass direction named in free text. Plain "north"
    /// and "south" lean east and west respectively, since a pointy-top grid
    /// has no due north. Text naming no direction heads north.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let lower = text.to_ascii_lowercase();
        let tokens: Vec<&str> = lower
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|token| !token.is_empty())
            .collect();

        for (index, token) in tokens.iter().enumerate() {
            let next = tokens.get(index + 1).copied();
            let found = match (*token, next) {
                ("north", Some("west")) | ("northwest" | "nw", _) => Some(Self::NorthWest),
                ("north", Some("east")) | ("northeast" | "ne" | "north", _) => {
                    Some(Self::NorthEast)
                }
                ("south", Some("east")) | ("southeast" | "se", _) => Some(Self::SouthEast),
                ("south", Some("west")) | ("southwest" | "sw" | "south", _) => {
                    Some(Self::SouthWest)
                }
                ("west", _) => Some(Self::West),
                ("east", _) => Some(Self::East),
                _ => None,
            };
            if let Some(direction) = found {
                return direction;
            }
        }
        Self::NorthEast
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NorthWest => "north-west",
            Self::NorthEast => "north-east",
            Self::West => "west",
            Self::East => "east",
            Self::SouthWest => "south-west",
            Self::SouthEast => "south-east",
        };
        f.write_str(label)
    }
}

/// Dominant terrain of a hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Plains,
    Forest,
    Hills,
    Marsh,
    Mountains,
}

impl Terrain {
    /// Terrain for a d6 roll.
    #[must_use]
    pub fn from_roll(roll: u32) -> Self {
        match roll {
            0..=2 => Self::Plains,
            3 => Self::Forest,
            4 => Self::Hills,
            5 => Self::Marsh,
            _ => Self::Mountains,
        }
    }

    /// Moves spent entering a hex of this terrain.
    #[must_use]
    pub fn move_cost(self) -> u32 {
        match self {
            Self::Plains => 1,
            Self::Forest | Self::Hills | Self::Marsh => 2,
            Self::Mountains => 3,
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Plains => "plains",
            Self::Forest => "forest",
            Self::Hills => "hills",
            Self::Marsh => "marsh",
            Self::Mountains => "mountains",
        };
        f.write_str(label)
    }
}

/// A generated hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hex {
    pub coord: HexCoord,
    pub terrain: Terrain,
    pub landmark: Option<String>,
    /// Index into the myth library, if a myth dwells here.
    pub myth_id: Option<u32>,
    /// Next omen to reveal, 1-based. Past six the myth has shown itself fully.
    pub omen: u32,
    pub explored: bool,
    pub river: bool,
    pub barrier: bool,
}

impl Hex {
    /// Moves spent entering this hex.
    #[must_use]
    pub fn move_cost(&self) -> u32 {
        self.terrain.move_cost() + u32::from(self.river)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_row_neighbours() {
        let neighbours = HexCoord::new(0, 0).neighbours();
        assert_eq!(
            neighbours,
            [
                HexCoord::new(-1, -1),
                HexCoord::new(0, -1),
                HexCoord::new(-1, 0),
                HexCoord::new(1, 0),
                HexCoord::new(-1, 1),
                HexCoord::new(0, 1),
            ]
        );
    }

    #[test]
    fn test_odd_row_neighbours_shift_east() {
        let neighbours = HexCoord::new(0, 1).neighbours();
        assert_eq!(neighbours[0], HexCoord::new(0, 0));
        assert_eq!(neighbours[1], HexCoord::new(1, 0));
        assert_eq!(neighbours[5], HexCoord::new(1, 2));
    }

    #[test]
    fn test_negative_odd_rows_use_odd_offsets() {
        assert_eq!(
            HexCoord::new(0, -1).step(Direction::NorthEast),
            HexCoord::new(1, -2)
        );
    }

    #[test]
    fn test_opposite_steps_return_home() {
        let start = HexCoord::new(3, -5);
        let pairs = [
            (Direction::NorthWest, Direction::SouthEast),
            (Direction::NorthEast, Direction::SouthWest),
            (Direction::West, Direction::East),
        ];
        for (there, back) in pairs {
            assert_eq!(start.step(there).step(back), start);
        }
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(Direction::parse("ride north-west"), Direction::NorthWest);
        assert_eq!(Direction::parse("head south east"), Direction::SouthEast);
        assert_eq!(Direction::parse("go WEST quickly"), Direction::West);
        assert_eq!(Direction::parse("travel north"), Direction::NorthEast);
        assert_eq!(Direction::parse("onward"), Direction::NorthEast);
    }

    #[test]
    fn test_river_adds_to_move_cost() {
        let hex = Hex {
            coord: HexCoord::ORIGIN,
            terrain: Terrain::Forest,
            landmark: None,
            myth_id: None,
            omen: 0,
            explored: false,
            river: true,
            barrier: false,
        };
        assert_eq!(hex.move_cost(), 3);
    }
}
