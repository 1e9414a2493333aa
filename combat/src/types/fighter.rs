//! Fighter identity, archetypes and stat sheets

/// Opaque identifier for a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FighterId(pub u64);

impl std::fmt::Display for FighterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the three fixed fighting styles, chosen once at character creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Archetype {
    /// Aggressive pressure fighter: high strength, will and punch speed.
    Swarmer,
    /// Durable tactician: high stamina recovery, health and footwork.
    OutBoxer,
    /// Counter specialist: high reaction, punch speed and footwork.
    CounterPuncher,
}

impl Archetype {
    /// The preset stat sheet for this archetype.
    pub fn stat_sheet(&self) -> StatSheet {
        match self {
            Archetype::Swarmer => StatSheet {
                strength: 1.5,
                reaction: 1.1,
                punch_speed: 1.35,
                will: 1.5,
                footwork: 1.2,
                stamina_rate: 1.15,
                max_health: 195.0,
            },
            Archetype::OutBoxer => StatSheet {
                strength: 1.15,
                reaction: 1.1,
                punch_speed: 1.15,
                will: 1.3,
                footwork: 1.4,
                stamina_rate: 1.5,
                max_health: 300.0,
            },
            Archetype::CounterPuncher => StatSheet {
                strength: 1.25,
                reaction: 1.5,
                punch_speed: 1.5,
                will: 1.0,
                footwork: 1.5,
                stamina_rate: 1.1,
                max_health: 150.0,
            },
        }
    }

    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Swarmer => "Swarmer",
            Archetype::OutBoxer => "Out-boxer",
            Archetype::CounterPuncher => "Counter-puncher",
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The seven numeric multipliers/base stats every combat formula draws from.
///
/// All fields except `max_health` are multipliers around 1.0. A sheet is
/// immutable for the lifetime of a profile.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatSheet {
    pub strength: f64,
    pub reaction: f64,
    pub punch_speed: f64,
    pub will: f64,
    pub footwork: f64,
    /// Multiplier on stamina recovered while resting.
    pub stamina_rate: f64,
    pub max_health: f64,
}

/// A fighter's permanent profile: identity plus immutable stats.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FighterProfile {
    pub id: FighterId,
    pub name: String,
    pub archetype: Archetype,
    pub stats: StatSheet,
}

impl FighterProfile {
    /// Create a profile with the archetype's preset stat sheet.
    pub fn new(id: FighterId, name: impl Into<String>, archetype: Archetype) -> Self {
        Self {
            id,
            name: name.into(),
            archetype,
            stats: archetype.stat_sheet(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_presets() {
        let swarmer = Archetype::Swarmer.stat_sheet();
        assert_eq!(swarmer.strength, 1.5);
        assert_eq!(swarmer.punch_speed, 1.35);
        assert_eq!(swarmer.max_health, 195.0);

        let out_boxer = Archetype::OutBoxer.stat_sheet();
        assert_eq!(out_boxer.stamina_rate, 1.5);
        assert_eq!(out_boxer.max_health, 300.0);

        let counter = Archetype::CounterPuncher.stat_sheet();
        assert_eq!(counter.reaction, 1.5);
        assert_eq!(counter.will, 1.0);
        assert_eq!(counter.max_health, 150.0);
    }

    #[test]
    fn test_profile_uses_preset_sheet() {
        let profile = FighterProfile::new(FighterId(7), "Rocky", Archetype::Swarmer);
        assert_eq!(profile.stats, Archetype::Swarmer.stat_sheet());
        assert_eq!(profile.name, "Rocky");
    }
}
