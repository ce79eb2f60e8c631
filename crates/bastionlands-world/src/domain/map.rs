//! The sparse world map and hex generation.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use bastionlands_core::determinism::DeterministicRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::hex::{Hex, HexCoord, Terrain};
use super::myth::{OMENS_PER_MYTH, OmenSighting, trigger_omen};

/// Landmarks a hex may be rolled with.
pub const LANDMARKS: [&str; 8] = [
    "Ancient ruins of a fallen tower",
    "Dense forest with twisted paths",
    "Swift river with treacherous crossing",
    "Steep mountain pass",
    "Small village clinging to survival",
    "Dark cave mouth yawning open",
    "Crumbling watchtower",
    "Stone bridge over a chasm",
];

const LANDMARK_CHANCE: f64 = 0.3;
const MYTH_CHANCE: f64 = 0.1;
const RIVER_CHANCE: f64 = 0.2;
const BARRIER_CHANCE: f64 = 0.5;

/// Search rolls at or above this find what a hex hides.
const SEARCH_TARGET: u32 = 5;

/// Rolls a new hex. Only mountains can be barriers, and only when
/// `allow_barrier` is set.
pub fn generate_hex(
    coord: HexCoord,
    force_landmark: bool,
    allow_barrier: bool,
    rng: &mut dyn DeterministicRng,
) -> Hex {
    let terrain = Terrain::from_roll(rng.roll(6));

    let landmark = if force_landmark || rng.chance(LANDMARK_CHANCE) {
        let roll = rng.roll(8);
        LANDMARKS
            .get((roll as usize).saturating_sub(1))
            .map(|landmark| (*landmark).to_owned())
    } else {
        None
    };

    let (myth_id, omen) = if rng.chance(MYTH_CHANCE) {
        (Some(rng.roll(12)), 1)
    } else {
        (None, 0)
    };

    let river = rng.chance(RIVER_CHANCE);
    let barrier = allow_barrier && terrain == Terrain::Mountains && rng.chance(BARRIER_CHANCE);

    Hex {
        coord,
        terrain,
        landmark,
        myth_id,
        omen,
        explored: false,
        river,
        barrier,
    }
}

/// Hexes the company has seen, keyed by coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldMap {
    #[serde(with = "hex_list")]
    hexes: BTreeMap<HexCoord, Hex>,
}

impl WorldMap {
    /// A fresh map: a starting hex with a landmark and its six neighbours.
    /// The starting hex is never a barrier.
    pub fn initialize(rng: &mut dyn DeterministicRng) -> Self {
        let mut map = Self::default();
        let start = generate_hex(HexCoord::ORIGIN, true, false, rng);
        map.hexes.insert(HexCoord::ORIGIN, start);
        map.reveal_neighbours(HexCoord::ORIGIN, rng);
        map
    }

    #[must_use]
    pub fn get(&self, coord: HexCoord) -> Option<&Hex> {
        self.hexes.get(&coord)
    }

    pub fn get_mut(&mut self, coord: HexCoord) -> Option<&mut Hex> {
        self.hexes.get_mut(&coord)
    }

    /// Returns the hex at `coord`, generating it first if unseen.
    pub fn ensure(&mut self, coord: HexCoord, rng: &mut dyn DeterministicRng) -> &mut Hex {
        self.hexes
            .entry(coord)
            .or_insert_with(|| generate_hex(coord, false, true, rng))
    }

    /// Generates any unseen neighbours of `coord`. Returns how many were new.
    pub fn reveal_neighbours(&mut self, coord: HexCoord, rng: &mut dyn DeterministicRng) -> usize {
        let mut revealed = 0;
        for neighbour in coord.neighbours() {
            if !self.hexes.contains_key(&neighbour) {
                self.ensure(neighbour, rng);
                revealed += 1;
            }
        }
        if revealed > 0 {
            debug!(%coord, revealed, "revealed neighbouring hexes");
        }
        revealed
    }

    /// Hexes in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = &Hex> {
        self.hexes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }

    #[must_use]
    pub fn explored_count(&self) -> usize {
        self.hexes.values().filter(|hex| hex.explored).count()
    }

    /// Breadth-first search over known hexes for the closest one whose myth
    /// still has omens to show. Returns its coordinate and distance in hexes.
    #[must_use]
    pub fn nearest_myth(&self, from: HexCoord) -> Option<(HexCoord, u32)> {
        let mut visited = BTreeSet::from([from]);
        let mut queue = VecDeque::from([(from, 0)]);

        while let Some((coord, distance)) = queue.pop_front() {
            let Some(hex) = self.hexes.get(&coord) else {
                continue;
            };
            if hex.myth_id.is_some() && hex.omen <= OMENS_PER_MYTH {
                return Some((coord, distance));
            }
            for neighbour in coord.neighbours() {
                if self.hexes.contains_key(&neighbour) && visited.insert(neighbour) {
                    queue.push_back((neighbour, distance + 1));
                }
            }
        }
        None
    }
}

/// What a search of a hex turned up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploreReport {
    pub coord: HexCoord,
    /// The d6 before the company bonus.
    pub roll: u32,
    pub bonus: u32,
    pub success: bool,
    pub landmark: Option<String>,
    pub omen: Option<OmenSighting>,
    /// Neighbouring hexes generated by the search.
    pub revealed: usize,
}

/// Searches the hex at `coord`. The search roll is d6 plus one per company
/// member, at most three; five or more finds the landmark and advances the
/// hex's myth by one omen. The hex is marked explored and its neighbours are
/// generated either way.
pub fn explore(
    map: &mut WorldMap,
    coord: HexCoord,
    company_size: usize,
    rng: &mut dyn DeterministicRng,
) -> ExploreReport {
    let roll = rng.roll(6);
    let bonus = u32::try_from(company_size.min(3)).unwrap_or(3);
    let success = roll + bonus >= SEARCH_TARGET;

    let hex = map.ensure(coord, rng);
    hex.explored = true;
    let (landmark, omen) = if success {
        (hex.landmark.clone(), trigger_omen(hex))
    } else {
        (None, None)
    };

    let revealed = map.reveal_neighbours(coord, rng);

    ExploreReport {
        coord,
        roll,
        bonus,
        success,
        landmark,
        omen,
        revealed,
    }
}

mod hex_list {
    //! Serializes the map as a list of hexes, since JSON keys must be strings.

    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Hex, HexCoord};

    pub fn serialize<S>(hexes: &BTreeMap<HexCoord, Hex>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(hexes.values())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<HexCoord, Hex>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let list = Vec::<Hex>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|hex| (hex.coord, hex)).collect())
    }
}
