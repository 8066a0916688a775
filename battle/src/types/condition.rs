//! Named predicates that raise custom events

use std::panic::{AssertUnwindSafe, catch_unwind};

use super::TickSnapshot;

type Predicate = Box<dyn FnMut(&TickSnapshot) -> bool + Send>;

/// A named test run against every new snapshot.
///
/// When the test holds, the bot receives a custom event carrying the name.
pub struct Condition {
    name: String,
    predicate: Predicate,
}

impl Condition {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: FnMut(&TickSnapshot) -> bool + Send + 'static,
    {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the predicate; `None` if it panicked
    pub fn try_test(&mut self, snapshot: &TickSnapshot) -> Option<bool> {
        catch_unwind(AssertUnwindSafe(|| (self.predicate)(snapshot))).ok()
    }

    /// Run the predicate, treating a panic as `false`
    pub fn test(&mut self, snapshot: &TickSnapshot) -> bool {
        self.try_test(snapshot).unwrap_or(false)
    }
}

impl std::fmt::Debug for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Condition").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_protocol::BotState;

    fn snapshot(energy: f64) -> TickSnapshot {
        TickSnapshot {
            round_number: 1,
            turn_number: 1,
            bot_state: BotState {
                energy,
                ..Default::default()
            },
            bullet_states: Vec::new(),
            events: Vec::new(),
        }
    }

    #[test]
    fn test_condition_holds() {
        let mut low_energy = Condition::new("low-energy", |s: &TickSnapshot| s.bot_state.energy < 20.0);

        assert_eq!(low_energy.name(), "low-energy");
        assert!(low_energy.test(&snapshot(10.0)));
        assert!(!low_energy.test(&snapshot(50.0)));
    }

    #[test]
    fn test_stateful_condition() {
        let mut calls = 0;
        let mut every_other = Condition::new("every-other", move |_: &TickSnapshot| {
            calls += 1;
            calls % 2 == 0
        });

        assert!(!every_other.test(&snapshot(1.0)));
        assert!(every_other.test(&snapshot(1.0)));
    }

    #[test]
    fn test_panicking_condition_is_false() {
        let mut broken = Condition::new("broken", |_: &TickSnapshot| -> bool { panic!("boom") });

        assert_eq!(broken.try_test(&snapshot(1.0)), None);
        assert!(!broken.test(&snapshot(1.0)));
    }
}
