//! Overland travel between hexes.

use bastionlands_core::determinism::DeterministicRng;
use serde::{Deserialize, Serialize};

use super::hex::{Direction, HexCoord, Terrain};
use super::map::WorldMap;

/// Moves available at the start of each day.
pub const MOVES_PER_DAY: u32 = 3;

/// A completed step into a neighbouring hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelReport {
    pub from: HexCoord,
    pub to: HexCoord,
    pub direction: Direction,
    pub terrain: Terrain,
    pub cost: u32,
    pub moves_remaining: u32,
    pub landmark: Option<String>,
    /// Neighbours generated around the destination.
    pub revealed: usize,
}

/// Why the company could not move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TravelRefusal {
    /// The destination is impassable.
    Barrier { coord: HexCoord },
    /// Not enough of the day is left.
    Exhausted { needed: u32, remaining: u32 },
}

/// Attempts one step from `from` in `direction`.
///
/// The destination is generated if unseen, so even a refused step reveals
/// what lies there. A step costs the destination's terrain cost plus one for
/// a river. A company that has not yet moved today may always take one
/// step, however costly, which spends the whole day.
///
/// # Errors
///
/// Returns `TravelRefusal::Barrier` for impassable hexes and
/// `TravelRefusal::Exhausted` when the remaining moves do not cover the cost.
pub fn travel(
    map: &mut WorldMap,
    from: HexCoord,
    direction: Direction,
    moves_remaining: u32,
    rng: &mut dyn DeterministicRng,
) -> Result<TravelReport, TravelRefusal> {
    let to = from.step(direction);
    let destination = map.ensure(to, rng);

    if destination.barrier {
        return Err(TravelRefusal::Barrier { coord: to });
    }

    let cost = destination.move_cost();
    let fresh_day = moves_remaining >= MOVES_PER_DAY;
    if cost > moves_remaining && !fresh_day {
        return Err(TravelRefusal::Exhausted {
            needed: cost,
            remaining: moves_remaining,
        });
    }

    let terrain = destination.terrain;
    let landmark = destination.landmark.clone();
    let revealed = map.reveal_neighbours(to, rng);

    Ok(TravelReport {
        from,
        to,
        direction,
        terrain,
        cost,
        moves_remaining: moves_remaining.saturating_sub(cost),
        landmark,
        revealed,
    })
}
