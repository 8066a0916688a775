//! Fakes shared by the unit tests: a transport that records what is sent and
//! server threads that answer every sent message with the next tick.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use skirmish_battle::{BotEvent, TickEvent, TickSnapshot};
use skirmish_protocol::{BotIntent, BotState, ClientMessage};

use crate::internals::BotInternals;
use crate::transport::Transport;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Default)]
pub(crate) struct RecordingTransport {
    sent: Arc<Mutex<Vec<ClientMessage>>>,
}

impl RecordingTransport {
    pub fn len(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn intents(&self) -> Vec<BotIntent> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| match m {
                ClientMessage::BotIntent(intent) => Some(intent.clone()),
                _ => None,
            })
            .collect()
    }

    /// Block until at least `n` messages were sent, panicking after a while
    pub fn wait_for(&self, n: usize) {
        let deadline = Instant::now() + TIMEOUT;
        while self.len() < n {
            assert!(Instant::now() < deadline, "timed out waiting for {n} messages");
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// Like `wait_for`, but gives up quietly once the round is over
    pub fn wait_while_running(&self, n: usize, internals: &BotInternals) -> bool {
        let deadline = Instant::now() + TIMEOUT;
        while self.len() < n {
            if !internals.is_running() || Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
        true
    }
}

impl Transport for RecordingTransport {
    fn send(&self, message: ClientMessage) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

pub(crate) fn alive() -> BotState {
    BotState {
        energy: 100.0,
        ..Default::default()
    }
}

/// Snapshot whose event list starts with the tick event, like a mapped wire tick
pub(crate) fn snapshot_with(turn_number: i32, bot_state: BotState, events: Vec<BotEvent>) -> TickSnapshot {
    let mut all = vec![BotEvent::Tick(TickEvent {
        turn_number,
        round_number: 1,
        bot_state: bot_state.clone(),
        bullet_states: Vec::new(),
    })];
    all.extend(events);

    TickSnapshot {
        round_number: 1,
        turn_number,
        bot_state,
        bullet_states: Vec::new(),
        events: all,
    }
}

pub(crate) fn snapshot(turn_number: i32) -> TickSnapshot {
    snapshot_with(turn_number, alive(), Vec::new())
}

/// Internals in a running round, bound to the calling thread
pub(crate) fn setup() -> (Arc<BotInternals>, RecordingTransport) {
    let transport = RecordingTransport::default();
    let internals = Arc::new(BotInternals::new(transport.clone()));
    internals.start_round();
    internals.bind_bot_thread();
    (internals, transport)
}

/// Answer the n-th sent message with the n-th snapshot
pub(crate) fn serve_script(
    internals: &Arc<BotInternals>,
    transport: &RecordingTransport,
    snapshots: Vec<TickSnapshot>,
) -> thread::JoinHandle<()> {
    let internals = Arc::clone(internals);
    let transport = transport.clone();
    thread::spawn(move || {
        for (sent, snapshot) in snapshots.into_iter().enumerate() {
            if !transport.wait_while_running(sent + 1, &internals) {
                return;
            }
            internals.on_tick_received(snapshot);
        }
    })
}

pub(crate) fn serve_turns(
    internals: &Arc<BotInternals>,
    transport: &RecordingTransport,
    turns: i32,
) -> thread::JoinHandle<()> {
    serve_script(internals, transport, (1..=turns).map(snapshot).collect())
}

/// Apply every sent intent to the bot state, as the server would, for up
/// to `turns` turns. Speed changes take effect in full.
pub(crate) fn serve_physics(
    internals: &Arc<BotInternals>,
    transport: &RecordingTransport,
    turns: i32,
) -> thread::JoinHandle<()> {
    let internals = Arc::clone(internals);
    let transport = transport.clone();
    thread::spawn(move || {
        let mut state = alive();
        for turn in 1..=turns {
            if !transport.wait_while_running(turn as usize, &internals) {
                return;
            }
            let Some(intent) = transport.intents().pop() else {
                return;
            };

            state.speed = intent.target_speed.unwrap_or(state.speed);
            state.x += state.speed;
            state.direction += intent.turn_rate.unwrap_or(0.0);
            state.gun_direction += intent.gun_turn_rate.unwrap_or(0.0);
            state.radar_direction += intent.radar_turn_rate.unwrap_or(0.0);

            internals.on_tick_received(snapshot_with(turn, state.clone(), Vec::new()));
        }
    })
}
