//! Turn coordinator.
//!
//! Shared between the connection task, which publishes snapshots, and the
//! bot thread, which is the only caller of [`BotInternals::execute`]. The two
//! meet on a mutex/condvar keyed on the turn number.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use skirmish_battle::{BotEvent, Condition, CustomEvent, MovementGoal, TickSnapshot};
use skirmish_protocol::{BotIntent, ClientMessage, GameSetup, GameStartedEventForBot};

use crate::console::{BufferedConsole, ConsoleCapture};
use crate::error::BotError;
use crate::graphics::{GraphicsRenderer, SvgGraphics};
use crate::queue::{EventQueue, Step};
use crate::transport::Transport;

/// Lock, recovering the data if a panicking thread held the lock
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Per-turn work run on the bot thread before the intent for the turn is sent
pub trait TurnHook {
    fn on_new_turn(&self, snapshot: &TickSnapshot) -> Result<(), BotError>;
}

#[derive(Debug, Default)]
struct TurnState {
    snapshot: Option<Arc<TickSnapshot>>,
    tick_received_at: Option<Instant>,
    running: bool,
    last_processed_turn: Option<i32>,
    last_sent_turn: Option<i32>,
    /// Set on round start, consumed by the first send of the round
    reset_pending: bool,
}

#[derive(Debug, Default)]
struct GameInfo {
    my_id: Option<i32>,
    teammate_ids: Vec<i32>,
    setup: Option<GameSetup>,
}

struct Output {
    console: Box<dyn ConsoleCapture>,
    graphics: Box<dyn GraphicsRenderer>,
}

pub struct BotInternals {
    transport: Box<dyn Transport>,
    turn: Mutex<TurnState>,
    turn_advanced: Condvar,
    intent: Mutex<BotIntent>,
    queue: Mutex<EventQueue>,
    movement: Mutex<MovementGoal>,
    conditions: Mutex<Vec<Condition>>,
    output: Mutex<Output>,
    game: Mutex<GameInfo>,
    bot_thread: Mutex<Option<ThreadId>>,
}

impl BotInternals {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            turn: Mutex::new(TurnState::default()),
            turn_advanced: Condvar::new(),
            intent: Mutex::new(BotIntent::default()),
            queue: Mutex::new(EventQueue::new()),
            movement: Mutex::new(MovementGoal::new()),
            conditions: Mutex::new(Vec::new()),
            output: Mutex::new(Output {
                console: Box::new(BufferedConsole::new()),
                graphics: Box::new(SvgGraphics::new()),
            }),
            game: Mutex::new(GameInfo::default()),
            bot_thread: Mutex::new(None),
        }
    }

    pub fn set_console(&self, console: impl ConsoleCapture + 'static) {
        lock(&self.output).console = Box::new(console);
    }

    pub fn set_graphics(&self, graphics: impl GraphicsRenderer + 'static) {
        lock(&self.output).graphics = Box::new(graphics);
    }

    // Game and round lifecycle, driven by the connection task

    pub fn set_game_setup(&self, event: &GameStartedEventForBot) {
        let mut game = lock(&self.game);
        game.my_id = Some(event.my_id);
        game.teammate_ids = event.teammate_ids.clone();
        game.setup = Some(event.game_setup.clone());
    }

    pub fn my_id(&self) -> Option<i32> {
        lock(&self.game).my_id
    }

    pub fn teammate_ids(&self) -> Vec<i32> {
        lock(&self.game).teammate_ids.clone()
    }

    pub fn game_setup(&self) -> Option<GameSetup> {
        lock(&self.game).setup.clone()
    }

    /// Clear everything turn-scoped and mark the session running
    pub fn start_round(&self) {
        lock(&self.queue).clear();
        lock(&self.movement).reset();
        lock(&self.conditions).clear();
        // Commands of the previous round must not reach the first intent
        lock(&self.intent).reset_commands();
        *lock(&self.turn) = TurnState {
            running: true,
            reset_pending: true,
            ..Default::default()
        };
        self.turn_advanced.notify_all();
        tracing::debug!("Round started");
    }

    /// Wake every waiter; blocked commands return `BotError::Aborted`
    pub fn stop_round(&self) {
        lock(&self.turn).running = false;
        self.turn_advanced.notify_all();
        tracing::debug!("Round stopped");
    }

    pub fn is_running(&self) -> bool {
        lock(&self.turn).running
    }

    /// Publish a new snapshot and stage its events
    pub fn on_tick_received(&self, snapshot: TickSnapshot) {
        lock(&self.queue).add_all(snapshot.events.iter().cloned());
        {
            let mut turn = lock(&self.turn);
            turn.snapshot = Some(Arc::new(snapshot));
            turn.tick_received_at = Some(Instant::now());
        }
        self.turn_advanced.notify_all();
    }

    /// Queue an event that did not arrive inside a tick
    pub fn stage_event(&self, event: BotEvent) -> bool {
        lock(&self.queue).add(event)
    }

    pub fn snapshot(&self) -> Option<Arc<TickSnapshot>> {
        lock(&self.turn).snapshot.clone()
    }

    /// Whether the newest snapshot already went through `TurnHook::on_new_turn`
    pub fn is_turn_processed(&self) -> bool {
        let turn = lock(&self.turn);
        match (&turn.snapshot, turn.last_processed_turn) {
            (Some(snapshot), Some(processed)) => snapshot.turn_number == processed,
            _ => false,
        }
    }

    pub fn current_turn_number(&self) -> Option<i32> {
        lock(&self.turn).snapshot.as_ref().map(|s| s.turn_number)
    }

    /// Time left to answer the current tick before the server skips the turn
    pub fn time_left(&self) -> Duration {
        let timeout = lock(&self.game)
            .setup
            .as_ref()
            .map(|setup| Duration::from_micros(setup.turn_timeout));
        let received = lock(&self.turn).tick_received_at;

        match (timeout, received) {
            (Some(timeout), Some(received)) => timeout.saturating_sub(received.elapsed()),
            _ => Duration::ZERO,
        }
    }

    /// Copy of the intent as it would be sent now
    pub fn pending_intent(&self) -> BotIntent {
        lock(&self.intent).clone()
    }

    // Bot thread

    /// Make the calling thread the only one allowed to `execute`
    pub fn bind_bot_thread(&self) {
        *lock(&self.bot_thread) = Some(thread::current().id());
    }

    fn check_bot_thread(&self) -> Result<(), BotError> {
        if *lock(&self.bot_thread) == Some(thread::current().id()) {
            Ok(())
        } else {
            Err(BotError::NotBotThread)
        }
    }

    /// Finish the current turn and block until the next one.
    ///
    /// Every new snapshot is handed to `hook` exactly once, and exactly one
    /// intent is sent per turn, however deeply calls are nested from inside
    /// the hook.
    pub fn execute(&self, hook: &dyn TurnHook) -> Result<(), BotError> {
        self.check_bot_thread()?;
        if !self.is_running() {
            return Err(BotError::Aborted);
        }

        let Some(snapshot) = self.snapshot() else {
            // Nothing to answer yet, the server gets the intent as it stands
            self.send_intent(None)?;
            return self.wait_for_turn_after(None);
        };

        while let Some(snapshot) = self.next_unprocessed() {
            self.stage_custom_events(&snapshot);
            hook.on_new_turn(&snapshot)?;
        }

        // Nested calls may have moved on to later turns
        let current = self.current_turn_number().unwrap_or(snapshot.turn_number);
        if self.mark_sent(current) {
            self.send_intent(Some(current))?;
        }
        self.wait_for_turn_after(Some(current))
    }

    fn next_unprocessed(&self) -> Option<Arc<TickSnapshot>> {
        let mut turn = lock(&self.turn);
        let snapshot = turn.snapshot.clone()?;
        if turn.last_processed_turn == Some(snapshot.turn_number) {
            return None;
        }
        turn.last_processed_turn = Some(snapshot.turn_number);
        Some(snapshot)
    }

    fn mark_sent(&self, turn_number: i32) -> bool {
        let mut turn = lock(&self.turn);
        if turn.last_sent_turn == Some(turn_number) {
            return false;
        }
        turn.last_sent_turn = Some(turn_number);
        true
    }

    fn wait_for_turn_after(&self, after: Option<i32>) -> Result<(), BotError> {
        let mut turn = lock(&self.turn);
        loop {
            if !turn.running {
                return Err(BotError::Aborted);
            }
            let arrived = match (&turn.snapshot, after) {
                (Some(snapshot), Some(after)) => snapshot.turn_number > after,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if arrived {
                return Ok(());
            }
            turn = self
                .turn_advanced
                .wait(turn)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn send_intent(&self, turn_number: Option<i32>) -> Result<(), BotError> {
        let debugging = self
            .snapshot()
            .is_some_and(|s| s.bot_state.is_debugging_enabled);
        let reset = std::mem::take(&mut lock(&self.turn).reset_pending);

        let message = {
            let mut intent = lock(&self.intent);
            {
                let mut output = lock(&self.output);
                if debugging {
                    intent.debug_graphics = output.graphics.render();
                }
                output.graphics.clear();
                (intent.std_out, intent.std_err) = output.console.drain();
            }

            let message = ClientMessage::BotIntent(intent.clone());
            intent.clear_one_shot();
            if reset {
                intent.reset_commands();
            }
            message
        };

        tracing::debug!(turn = ?turn_number, reset, "Sending intent");
        self.transport
            .send(message)
            .map_err(|e| BotError::Transport(e.to_string()))
    }

    // Conditions and dispatch

    /// Register a condition; false if one with the same name exists
    pub fn add_condition(&self, condition: Condition) -> bool {
        let mut conditions = lock(&self.conditions);
        if conditions.iter().any(|c| c.name() == condition.name()) {
            return false;
        }
        conditions.push(condition);
        true
    }

    pub fn remove_condition(&self, name: &str) -> bool {
        let mut conditions = lock(&self.conditions);
        let before = conditions.len();
        conditions.retain(|c| c.name() != name);
        conditions.len() != before
    }

    fn stage_custom_events(&self, snapshot: &TickSnapshot) {
        // Predicates run without the lock held
        let mut conditions = std::mem::take(&mut *lock(&self.conditions));

        let fired: Vec<BotEvent> = conditions
            .iter_mut()
            .filter_map(|condition| match condition.try_test(snapshot) {
                Some(true) => Some(BotEvent::Custom(CustomEvent {
                    turn_number: snapshot.turn_number,
                    condition: condition.name().to_string(),
                })),
                Some(false) => None,
                None => {
                    tracing::warn!(condition = condition.name(), "Condition panicked, treated as false");
                    None
                }
            })
            .collect();

        {
            let mut guard = lock(&self.conditions);
            conditions.append(&mut guard);
            *guard = conditions;
        }
        lock(&self.queue).add_all(fired);
    }

    /// Dispatch queued events in order until the queue is drained, the
    /// running handler must yield, or the round ends.
    ///
    /// `dispatch` runs without any lock held. `Interrupted` returned by it
    /// is absorbed here; this pass itself returns `Interrupted` when the
    /// handler it is nested in has to unwind.
    pub(crate) fn dispatch_events<F>(&self, turn_number: i32, mut dispatch: F) -> Result<(), BotError>
    where
        F: FnMut(&BotEvent) -> Result<(), BotError>,
    {
        lock(&self.queue).prepare(turn_number);

        while self.is_running() {
            let current_turn = self.current_turn_number().unwrap_or(turn_number);
            let step = lock(&self.queue).next_step(current_turn);

            match step {
                Step::Done => break,
                Step::Interrupt => return Err(BotError::Interrupted),
                Step::Dispatch { event, previous } => {
                    let result = dispatch(&event);
                    lock(&self.queue).finish(event.kind(), previous);
                    match result {
                        Ok(()) | Err(BotError::Interrupted) => {}
                        Err(err) => return Err(err),
                    }
                }
            }
        }
        Ok(())
    }

    // Shared state for the command facade

    pub(crate) fn intent(&self) -> MutexGuard<'_, BotIntent> {
        lock(&self.intent)
    }

    pub(crate) fn movement(&self) -> MutexGuard<'_, MovementGoal> {
        lock(&self.movement)
    }

    pub(crate) fn queue(&self) -> MutexGuard<'_, EventQueue> {
        lock(&self.queue)
    }

    pub(crate) fn write_out(&self, text: &str) {
        lock(&self.output).console.write_out(text);
    }

    pub(crate) fn write_err(&self, text: &str) {
        lock(&self.output).console.write_err(text);
    }

    pub(crate) fn draw(&self, element: &str) {
        lock(&self.output).graphics.draw(element);
    }
}
