//! Event priorities

use super::EventKind;

/// Priority per event kind; higher is dispatched first within a turn.
///
/// Every kind has exactly one entry and the defaults are all distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventPriorities {
    table: [i32; EventKind::COUNT],
}

impl EventPriorities {
    pub fn new() -> Self {
        let mut table = [0; EventKind::COUNT];
        for kind in EventKind::ALL {
            table[kind.index()] = Self::default_priority(kind);
        }
        Self { table }
    }

    pub fn default_priority(kind: EventKind) -> i32 {
        match kind {
            EventKind::WonRound => 150,
            EventKind::SkippedTurn => 140,
            EventKind::Tick => 130,
            EventKind::Custom => 120,
            EventKind::TeamMessage => 110,
            EventKind::BotDeath => 100,
            EventKind::BulletHitWall => 90,
            EventKind::BulletHitBullet => 80,
            EventKind::BulletHitBot => 70,
            EventKind::BulletFired => 60,
            EventKind::HitByBullet => 50,
            EventKind::HitWall => 40,
            EventKind::HitBot => 30,
            EventKind::ScannedBot => 20,
            EventKind::Death => 10,
        }
    }

    pub fn get(&self, kind: EventKind) -> i32 {
        self.table[kind.index()]
    }

    pub fn set(&mut self, kind: EventKind, priority: i32) {
        self.table[kind.index()] = priority;
    }

    /// Restore the default table
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for EventPriorities {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_defaults_are_distinct() {
        let priorities = EventPriorities::new();
        let unique: HashSet<i32> = EventKind::ALL.iter().map(|k| priorities.get(*k)).collect();

        assert_eq!(unique.len(), EventKind::COUNT);
    }

    #[test]
    fn test_default_range() {
        let priorities = EventPriorities::new();

        assert_eq!(priorities.get(EventKind::Death), 10);
        assert_eq!(priorities.get(EventKind::WonRound), 150);
        assert!(
            EventKind::ALL
                .iter()
                .all(|k| (10..=150).contains(&priorities.get(*k)))
        );
    }

    #[test]
    fn test_set_and_reset() {
        let mut priorities = EventPriorities::new();

        priorities.set(EventKind::ScannedBot, 200);
        assert_eq!(priorities.get(EventKind::ScannedBot), 200);
        assert_eq!(priorities.get(EventKind::Tick), 130);

        priorities.reset();
        assert_eq!(priorities.get(EventKind::ScannedBot), 20);
    }
}
