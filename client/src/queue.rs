//! Pending events, their dispatch order and the interruption bookkeeping

use skirmish_battle::{BotEvent, EventKind, EventPriorities};

/// Most events held at once; further events are dropped
pub const MAX_QUEUE_SIZE: usize = 256;

/// Non-critical events older than this many turns are purged
pub const MAX_EVENT_AGE: i32 = 2;

/// The event whose handler is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CurrentEvent {
    pub kind: EventKind,
    pub priority: i32,
}

/// Outcome of asking the queue what to dispatch next
#[derive(Debug, PartialEq)]
pub(crate) enum Step {
    /// Run the handler, then hand `previous` back to `finish`
    Dispatch {
        event: BotEvent,
        previous: Option<CurrentEvent>,
    },
    /// An event of equal priority is waiting and the running handler may be unwound
    Interrupt,
    Done,
}

/// Bounded queue of undispatched events.
///
/// Ordering and purging happen at the start of every dispatch pass, not on
/// insertion; the dispatch loop itself lives in the turn coordinator, which
/// releases the lock around every handler call.
#[derive(Debug)]
pub struct EventQueue {
    events: Vec<BotEvent>,
    priorities: EventPriorities,
    current: Option<CurrentEvent>,
    interruptible: [bool; EventKind::COUNT],
    overflow_count: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            priorities: EventPriorities::new(),
            current: None,
            interruptible: [false; EventKind::COUNT],
            overflow_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Queue an event; returns false and drops it when the queue is full
    pub fn add(&mut self, event: BotEvent) -> bool {
        if self.events.len() >= MAX_QUEUE_SIZE {
            self.overflow_count += 1;
            tracing::warn!(
                kind = %event.kind(),
                turn = event.turn_number(),
                dropped = self.overflow_count,
                "Event queue full, dropping event"
            );
            return false;
        }
        self.events.push(event);
        true
    }

    pub fn add_all(&mut self, events: impl IntoIterator<Item = BotEvent>) {
        for event in events {
            self.add(event);
        }
    }

    /// Events dropped because the queue was full
    pub fn overflow_count(&self) -> u64 {
        self.overflow_count
    }

    /// Forget all events and dispatch state; priorities are kept
    pub fn clear(&mut self) {
        self.events.clear();
        self.current = None;
        self.interruptible = [false; EventKind::COUNT];
    }

    pub fn priority(&self, kind: EventKind) -> i32 {
        self.priorities.get(kind)
    }

    pub fn set_priority(&mut self, kind: EventKind, priority: i32) {
        self.priorities.set(kind, priority);
    }

    /// Kind of the event being handled, if any
    pub fn current_kind(&self) -> Option<EventKind> {
        self.current.map(|current| current.kind)
    }

    pub fn is_interruptible(&self, kind: EventKind) -> bool {
        self.interruptible[kind.index()]
    }

    /// Mark the running handler's kind; false when no handler is running
    pub fn set_interruptible(&mut self, interruptible: bool) -> bool {
        match self.current {
            Some(current) => {
                self.interruptible[current.kind.index()] = interruptible;
                true
            }
            None => false,
        }
    }

    /// Drop stale non-critical events and order the rest for dispatch
    pub fn prepare(&mut self, current_turn: i32) {
        self.events.retain(|event| is_fresh(event, current_turn));

        let priorities = &self.priorities;
        // Stable, so equal keys keep arrival order
        self.events.sort_by_key(|event| {
            (
                !event.is_critical(),
                event.turn_number(),
                std::cmp::Reverse(priorities.get(event.kind())),
            )
        });
    }

    /// Take the next event to dispatch at `current_turn`
    pub(crate) fn next_step(&mut self, current_turn: i32) -> Step {
        loop {
            let Some(next) = self.events.first() else {
                return Step::Done;
            };
            let priority = self.priorities.get(next.kind());

            if let Some(current) = self.current
                && current.priority == priority
            {
                let slot = &mut self.interruptible[current.kind.index()];
                if *slot {
                    *slot = false;
                    return Step::Interrupt;
                }
                return Step::Done;
            }

            let event = self.events.remove(0);
            if !is_fresh(&event, current_turn) {
                continue;
            }

            let previous = self.current.replace(CurrentEvent {
                kind: event.kind(),
                priority,
            });
            return Step::Dispatch { event, previous };
        }
    }

    /// Called once the handler for `kind` returned
    pub(crate) fn finish(&mut self, kind: EventKind, previous: Option<CurrentEvent>) {
        self.interruptible[kind.index()] = false;
        self.current = previous;
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn is_fresh(event: &BotEvent, current_turn: i32) -> bool {
    event.is_critical() || event.turn_number() >= current_turn - MAX_EVENT_AGE
}
