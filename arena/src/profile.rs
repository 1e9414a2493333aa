//! Fighter profile lookup seam

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use ringside_combat::{FighterId, FighterProfile};

/// Resolves a fighter id to a full profile.
pub trait ProfileLookup: Send + Sync {
    fn lookup(&self, id: FighterId) -> Option<FighterProfile>;
}

/// In-process profile registry.
#[derive(Default)]
pub struct MemoryProfiles {
    profiles: RwLock<HashMap<FighterId, FighterProfile>>,
}

impl MemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, profile: FighterProfile) {
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(profile.id, profile);
    }
}

impl ProfileLookup for MemoryProfiles {
    fn lookup(&self, id: FighterId) -> Option<FighterProfile> {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringside_combat::Archetype;

    #[test]
    fn test_register_and_lookup() {
        let profiles = MemoryProfiles::new();
        profiles.register(FighterProfile::new(
            FighterId(1),
            "Rocky",
            Archetype::Swarmer,
        ));
        assert_eq!(profiles.lookup(FighterId(1)).unwrap().name, "Rocky");
        assert!(profiles.lookup(FighterId(2)).is_none());
    }
}
