//! The twelve Myths of the Realm and their omens.

use serde::{Deserialize, Serialize};

use super::hex::Hex;

/// Number of omens each myth shows before it manifests.
pub const OMENS_PER_MYTH: u32 = 6;

/// A myth and its omens, in the order they appear.
#[derive(Debug, Clone, Copy)]
pub struct Myth {
    pub id: u32,
    pub name: &'static str,
    pub omens: [&'static str; 6],
}

/// The myth library, ids 1 through 12.
pub const MYTHS: [Myth; 12] = [
    Myth {
        id: 1,
        name: "The Sleeping Giant",
        omens: [
            "The ground trembles in a slow rhythm, like breath",
            "Trees lean away from a long, low hill",
            "A shepherd speaks of stones that were not there yesterday",
            "Boulders the size of houses lie in a row like fingers",
            "The hill opens one vast, clouded eye",
            "The Giant rises, and the valley is its bed no longer",
        ],
    },
    Myth {
        id: 2,
        name: "The Hollow Queen",
        omens: [
            "Crows gather in perfect silence",
            "A crown of twigs hangs from a dead oak",
            "Villagers speak of a lady who walks without footprints",
            "A court of scarecrows bows as you pass",
            "Your own shadow kneels before an empty throne",
            "The Queen holds court, and demands a subject",
        ],
    },
    Myth {
        id: 3,
        name: "The Drowned Bell",
        omens: [
            "A single toll echoes from beneath still water",
            "Fish float belly-up in a perfect circle",
            "A soaked bell-rope trails from the reeds",
            "Every well in the hex tastes of brine",
            "The ringing follows you into your dreams",
            "The Bell rises from the mere, and the drowned rise with it",
        ],
    },
    Myth {
        id: 4,
        name: "The Ash Knight",
        omens: [
            "A circle of scorched grass, still warm",
            "Hoofprints that smoulder in the mud",
            "A broken lance, its tip glowing like a coal",
            "Travellers flee a rider wreathed in smoke",
            "A challenge is burned into a church door",
            "The Ash Knight waits at the crossroads, visor raised",
        ],
    },
    Myth {
        id: 5,
        name: "The Weeping Wood",
        omens: [
            "Sap runs red from every cut branch",
            "Birdsong stops when you enter the trees",
            "A woodcutter's axe lies rusted in a living trunk",
            "Faces show in the bark when the wind blows",
            "Roots close over the path behind you",
            "The Wood weeps aloud, and walks",
        ],
    },
    Myth {
        id: 6,
        name: "The Pale Hound",
        omens: [
            "Howling from every direction at once",
            "Sheep found unmarked but cold",
            "White fur caught on a thornbush",
            "Paw prints circle your camp",
            "Eyes shine at the edge of the firelight",
            "The Hound hunts, and it has your scent",
        ],
    },
    Myth {
        id: 7,
        name: "The Iron Seer",
        omens: [
            "Rust blooms on every blade overnight",
            "A hermit recites your name without being told it",
            "A brass eye lies half-buried in the road",
            "Clockwork ticking from within a cairn",
            "Smoke spells out a question in the sky",
            "The Seer unfolds from the hillside and asks its price",
        ],
    },
    Myth {
        id: 8,
        name: "The Moth Saint",
        omens: [
            "Moths cover a wayside shrine like a shroud",
            "Candles relight themselves after you snuff them",
            "A pilgrim with dust-grey wings sleeps by the road",
            "Your lantern draws a silent, endless swarm",
            "Prayers are whispered in a voice of fluttering",
            "The Saint descends, and all flame bends toward it",
        ],
    },
    Myth {
        id: 9,
        name: "The Salt King",
        omens: [
            "White crust spreads over the fields",
            "A statue of salt weeps in the rain",
            "Herders lead animals that will not drink",
            "A road of white crystal cuts across the land",
            "Your rations turn to salt in the pack",
            "The King surveys his white dominion and finds it wanting",
        ],
    },
    Myth {
        id: 10,
        name: "The Thousand Mouths",
        omens: [
            "The earth is pocked with small round holes",
            "Whispers rise from the burrows at dusk",
            "A cow vanishes into the ground mid-step",
            "Every hole exhales the same warm breath",
            "The ground beneath camp begins to chew",
            "The Thousand Mouths open, and the hex begins to sink",
        ],
    },
    Myth {
        id: 11,
        name: "The Glass Tower",
        omens: [
            "Light flashes from a peak where no tower stands",
            "Shards of glass glitter in a stream bed",
            "A mason boasts of a tower he cannot remember building",
            "Your reflection lingers after you step away",
            "The sky cracks along a straight line",
            "The Tower stands revealed, and something inside knocks",
        ],
    },
    Myth {
        id: 12,
        name: "The Last Seer",
        omens: [
            "An old cloak hangs from a wayside post, still warm",
            "Children sing a rhyme about the end of seeing",
            "Ravens carry scraps of parchment overhead",
            "A blind woman points toward you and smiles",
            "Every road leads back to the same standing stone",
            "The Last Seer waits, and will speak only once",
        ],
    },
];

/// Looks up a myth by id.
#[must_use]
pub fn myth(id: u32) -> Option<&'static Myth> {
    MYTHS.iter().find(|myth| myth.id == id)
}

/// An omen revealed by exploration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OmenSighting {
    pub myth_id: u32,
    pub myth_name: String,
    /// 1-based position of this omen.
    pub index: u32,
    pub text: String,
}

/// Reveals the next omen of the hex's myth and advances it. Returns `None`
/// when the hex has no myth or every omen has already been seen.
pub fn trigger_omen(hex: &mut Hex) -> Option<OmenSighting> {
    let myth = myth(hex.myth_id?)?;
    if hex.omen == 0 || hex.omen > OMENS_PER_MYTH {
        return None;
    }
    let index = hex.omen;
    let text = myth.omens[(index - 1) as usize];
    hex.omen += 1;
    Some(OmenSighting {
        myth_id: myth.id,
        myth_name: myth.name.to_owned(),
        index,
        text: text.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hex::{HexCoord, Terrain};

    fn myth_hex(myth_id: u32) -> Hex {
        Hex {
            coord: HexCoord::ORIGIN,
            terrain: Terrain::Hills,
            landmark: None,
            myth_id: Some(myth_id),
            omen: 1,
            explored: false,
            river: false,
            barrier: false,
        }
    }

    #[test]
    fn test_library_ids_are_one_through_twelve() {
        let ids: Vec<u32> = MYTHS.iter().map(|myth| myth.id).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_omens_advance_in_order_then_stop() {
        let mut hex = myth_hex(3);

        let first = trigger_omen(&mut hex).unwrap();
        assert_eq!(first.index, 1);
        assert_eq!(first.myth_name, "The Drowned Bell");
        assert_eq!(hex.omen, 2);

        for _ in 2..=6 {
            assert!(trigger_omen(&mut hex).is_some());
        }
        assert_eq!(hex.omen, 7);
        assert!(trigger_omen(&mut hex).is_none());
    }

    #[test]
    fn test_hex_without_myth_has_no_omen() {
        let mut hex = myth_hex(1);
        hex.myth_id = None;

        assert!(trigger_omen(&mut hex).is_none());
    }

    #[test]
    fn test_unknown_myth_id_has_no_omen() {
        let mut hex = myth_hex(99);

        assert!(trigger_omen(&mut hex).is_none());
        assert_eq!(hex.omen, 1);
    }
}
