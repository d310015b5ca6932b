use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::LineupError;
use crate::lineup::{Performer, PerformerId, Slot};

/// Performers seeded from one originating stage grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedGroup {
    /// Id prefix and grouping label, e.g. `main` gives ids `main-0`, `main-1`, ...
    pub key: String,
    pub performers: Vec<String>,
}

/// The fixed stage and time labels of the festival plus the first-run roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub stages: Vec<String>,
    pub time_slots: Vec<String>,
    #[serde(default)]
    pub seed: Vec<SeedGroup>,
}

impl Default for Catalog {
    fn default() -> Self {
        let owned = |labels: &[&str]| labels.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            stages: owned(STAGES),
            time_slots: owned(TIME_SLOTS),
            seed: vec![
                SeedGroup {
                    key: "main".into(),
                    performers: owned(MAIN_STAGE_ARTISTS),
                },
                SeedGroup {
                    key: "unplugged".into(),
                    performers: owned(UNPLUGGED_STAGE_ARTISTS),
                },
                SeedGroup {
                    key: "smartpunk".into(),
                    performers: owned(SMARTPUNK_STAGE_ARTISTS),
                },
            ],
        }
    }
}

impl Catalog {
    /// Resolves user-supplied labels to a slot of this festival
    pub fn slot(&self, stage: &str, time: &str) -> Result<Slot, LineupError> {
        if !self.stages.iter().any(|s| s == stage) {
            return Err(LineupError::UnknownStage(stage.to_string()));
        }
        if !self.time_slots.iter().any(|t| t == time) {
            return Err(LineupError::UnknownTime(time.to_string()));
        }
        Ok(Slot::new(stage, time))
    }

    /// The first-run roster, grouping by grouping, with `<key>-<index>` ids
    pub fn seed_roster(&self) -> Vec<Performer> {
        self.seed
            .iter()
            .flat_map(|group| {
                group.performers.iter().enumerate().map(move |(idx, name)| {
                    Performer::new(PerformerId::new(format!("{}-{}", group.key, idx)), name.as_str())
                        .in_group(group.key.as_str())
                })
            })
            .collect()
    }

    /// Checks a catalog read from configuration
    pub fn validate(&self) -> Result<(), LineupError> {
        if self.stages.is_empty() {
            return Err(LineupError::EmptyCatalog("stage"));
        }
        if self.time_slots.is_empty() {
            return Err(LineupError::EmptyCatalog("time slot"));
        }
        check_unique("stage", &self.stages)?;
        check_unique("time slot", &self.time_slots)?;
        let keys: Vec<String> = self.seed.iter().map(|g| g.key.clone()).collect();
        check_unique("seed group", &keys)?;
        if let Some(group) = self
            .seed
            .iter()
            .find(|g| g.performers.iter().any(|name| name.trim().is_empty()))
        {
            return Err(LineupError::BlankSeedName {
                group: group.key.clone(),
            });
        }
        Ok(())
    }
}

fn check_unique(kind: &'static str, labels: &[String]) -> Result<(), LineupError> {
    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(LineupError::DuplicateCatalogEntry {
                kind,
                value: label.clone(),
            });
        }
    }
    Ok(())
}

const TIME_SLOTS: &[&str] = &[
    "11:00 AM",
    "12:00 PM",
    "1:00 PM",
    "2:00 PM",
    "3:00 PM",
    "4:00 PM",
    "5:00 PM",
    "6:00 PM",
    "7:00 PM",
    "8:00 PM",
    "9:00 PM",
    "10:00 PM",
];

const STAGES: &[&str] = &[
    "Vans Right Foot Stage",
    "Vans Left Foot Stage",
    "Geico Stage",
    "Owen's Mixer Stage",
    "Trojan Stage",
    "Club Wyndham Stage",
    "Beatbox Stage",
    "Ghost Stage",
    "Unplugged Stage",
    "Smartpunk Stage",
];

const MAIN_STAGE_ARTISTS: &[&str] = &[
    "3OH!3",
    "408",
    "A Day To Remember",
    "A Loss For Words",
    "All Time Low",
    "Amigo The Devil",
    "Anberlin",
    "Angel Du$t",
    "Arrows In Action",
    "As It Is",
    "Attila",
    "August Burns Red",
    "Aviva",
    "Bad Rabbits",
    "Beauty School Dropout",
    "Better Lovers",
    "Big Ass Truck",
    "Black Veil Brides",
    "Blessthefall",
    "Boundaries",
    "Bowling For Soup",
    "Boys Like Girls",
    "Carolesdaughter",
    "Caskets",
    "Chained Saint",
    "Chandler Leighton",
    "Charlotte Sands",
    "Chiodos",
    "Comeback Kid",
    "Crown The Empire",
    "Deathbyromy",
    "Dinosaur Pile! Up",
    "Drain",
    "Escape The Fate",
    "Falling In Reverse",
    "Fame On Fire",
    "Fever 333",
    "Flycatcher",
    "Four Year Strong",
    "From Ashes To New",
    "Games We Play",
    "Girlfriends",
    "Good Riddance",
    "Gravas",
    "Gwar",
    "Gym Class Heroes",
    "Hail The Sun",
    "Hawthorne Heights",
    "Head Automatica",
    "Holding Absence",
    "Hollow Pact",
    "Holywatr",
    "Honey Revenge",
    "Huddy",
    "I Prevail",
    "I See Stars",
    "IDKHOW",
    "Jeremy Romance",
    "Johnnie Guilbert",
    "Julia Wolf",
    "Jutes",
    "Killswitch Engage",
    "Kim Dracula",
    "Knuckle Puck",
    "Koyo",
    "Lacey Sturm",
    "Left To Suffer",
    "Less Than Jake",
    "Letlive.",
    "Lil Lotus",
    "Magnolia Park",
    "Maryjo",
    "Mayday Parade",
    "Memphis May Fire",
    "MGK",
    "Microwave",
    "Millionaires",
    "Miss May I",
    "Mod Sun",
    "Motionless In White",
    "Movements",
    "Narrow Head",
    "Noelle Sucks",
    "New Years Day",
    "Not Enough Space",
    "Nothing, Nowhere.",
    "Of Mice & Men",
    "Oxymorrons",
    "Pennywise",
    "People R Ugly",
    "Plain White T's",
    "Point North",
    "Royal & The Serpent",
    "Sace6",
    "Scene Queen",
    "Scowl",
    "Senses Fail",
    "Slaughter To Prevail",
    "Sophie Powers",
    "Speed Of Light",
    "State Champs",
    "Story Of The Year",
    "Stratejacket",
    "Streetlight Manifesto",
    "Sueco",
    "Sunami",
    "Surfer Girl",
    "Taylor Acorn",
    "Ten56.",
    "The Dark",
    "The Devil Wears Prada",
    "The Dollyrots",
    "The Elovaters",
    "The Expendables",
    "The Ghost Inside",
    "The Home Team",
    "The Interrupters",
    "The Maine",
    "The Red Jumpsuit Apparatus",
    "The Wonder Years",
    "The Word Alive",
    "Thursday",
    "Traitors",
    "Trxvis",
    "Vended",
    "Wage War",
    "Waves",
    "We The Kings",
    "Winona Fighter",
    "World's First Cinema",
    "Yellowcard",
    "Yung Gravy",
    "Zero 9:36",
];

const UNPLUGGED_STAGE_ARTISTS: &[&str] = &[
    "Anna Valenzuela",
    "Beebs",
    "Bryce Wettstein",
    "Charlotte Sands (unplugged)",
    "Coolie Ranx",
    "Dan Kelly",
    "Divina Jasso & Helena Holleran",
    "Geoff Weers",
    "Gritty in Pink",
    "Jaret Ray Reddick",
    "Jon Gazi",
    "Kat Halll",
    "Kristin Lytie",
    "Myverse",
    "Niko Is",
    "Reverie",
];

const SMARTPUNK_STAGE_ARTISTS: &[&str] = &[
    "Gilt",
    "Glazed",
    "Hungover",
    "Keep Flying",
    "School of Rock",
    "Watts",
    "Wounded Touch",
];
