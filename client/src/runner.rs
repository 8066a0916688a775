//! Owns the connection and the per-round bot thread

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use skirmish_battle::{BotEvent, SkippedTurnEvent, TickSnapshot};
use skirmish_protocol::{BotHandshake, ClientMessage, ServerMessage};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::bot::Bot;
use crate::config::{BotInfo, ClientConfig};
use crate::connection::Connection;
use crate::error::BotError;
use crate::handler::{BotHandler, ConnectionEvent};
use crate::internals::BotInternals;
use crate::transport::{ChannelTransport, Transport};

/// How long a round end waits for the bot thread before detaching it
const BOT_STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Plays one game session for `program`.
///
/// ```ignore
/// BotRunner::new(ClientConfig::from_env(), BotInfo::new("Walls", "1.0"), Walls)
///     .run()
///     .await?;
/// ```
pub struct BotRunner<H> {
    config: ClientConfig,
    session: Session<H>,
    outbound: mpsc::UnboundedReceiver<ClientMessage>,
}

impl<H: BotHandler + Sync + 'static> BotRunner<H> {
    pub fn new(config: ClientConfig, info: BotInfo, program: H) -> Self {
        let (transport, outbound) = ChannelTransport::channel();
        let session = Session::new(
            transport,
            Arc::new(program),
            info,
            config.server_secret.clone(),
        );
        Self {
            config,
            session,
            outbound,
        }
    }

    /// Shared turn state, e.g. to install another console or graphics renderer
    pub fn internals(&self) -> &Arc<BotInternals> {
        &self.session.internals
    }

    /// Connect and play until the server closes the connection
    pub async fn run(mut self) -> Result<()> {
        let url = self.config.server_url.clone();
        let program = Arc::clone(&self.session.program);

        let mut connection = match Connection::connect(&url, &self.config.reconnect).await {
            Ok(connection) => connection,
            Err(e) => {
                program.on_connection(&ConnectionEvent::Error {
                    url,
                    message: format!("{e:#}"),
                });
                return Err(e);
            }
        };
        tracing::debug!(url = %url, "Connected");
        program.on_connection(&ConnectionEvent::Connected { url: url.clone() });

        let result = loop {
            tokio::select! {
                incoming = connection.recv() => match incoming {
                    Some(Ok(message)) => self.session.handle_message(message).await,
                    Some(Err(e)) => {
                        program.on_connection(&ConnectionEvent::Error {
                            url: url.clone(),
                            message: format!("{e:#}"),
                        });
                        break Err(e);
                    }
                    None => {
                        program.on_connection(&ConnectionEvent::Disconnected {
                            url: url.clone(),
                            remote: true,
                        });
                        break Ok(());
                    }
                },
                Some(message) = self.outbound.recv() => {
                    if let Err(e) = connection.send(&message).await {
                        program.on_connection(&ConnectionEvent::Error {
                            url: url.clone(),
                            message: format!("{e:#}"),
                        });
                        break Err(e);
                    }
                }
            }
        };

        self.session.stop_bot().await;
        if result.is_err() {
            // Best effort, the socket is likely gone already
            let _ = connection.close().await;
        }
        result
    }
}

/// Game state of the runner: answers lifecycle messages and feeds the
/// turn coordinator
struct Session<H> {
    internals: Arc<BotInternals>,
    transport: ChannelTransport,
    program: Arc<H>,
    info: BotInfo,
    secret: Option<String>,
    bot_task: Option<JoinHandle<()>>,
    stop_timeout: Duration,
}

impl<H: BotHandler + Sync + 'static> Session<H> {
    fn new(
        transport: ChannelTransport,
        program: Arc<H>,
        info: BotInfo,
        secret: Option<String>,
    ) -> Self {
        Self {
            internals: Arc::new(BotInternals::new(transport.clone())),
            transport,
            program,
            info,
            secret,
            bot_task: None,
            stop_timeout: BOT_STOP_TIMEOUT,
        }
    }

    fn send(&self, message: ClientMessage) {
        if let Err(e) = self.transport.send(message) {
            tracing::warn!(error = %e, "Dropping outbound message");
        }
    }

    async fn handle_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::ServerHandshake(handshake) => {
                self.send(ClientMessage::BotHandshake(BotHandshake {
                    session_id: handshake.session_id,
                    name: self.info.name.clone(),
                    version: self.info.version.clone(),
                    authors: self.info.authors.clone(),
                    description: self.info.description.clone(),
                    secret: self.secret.clone(),
                    is_droid: false,
                }));
            }
            ServerMessage::GameStarted(event) => {
                self.internals.set_game_setup(&event);
                self.send(ClientMessage::BotReady);
                self.program.on_game_started(&event);
            }
            ServerMessage::RoundStarted(event) => {
                self.stop_bot().await;
                self.internals.start_round();
                self.program.on_round_started(event.round_number);
                self.spawn_bot();
            }
            ServerMessage::Tick(tick) => {
                let Some(my_id) = self.internals.my_id() else {
                    tracing::warn!(turn = tick.turn_number, "Tick before game start, ignored");
                    return;
                };
                self.internals
                    .on_tick_received(TickSnapshot::from_wire(&tick, my_id));
            }
            ServerMessage::SkippedTurn(event) => {
                self.internals.stage_event(BotEvent::SkippedTurn(SkippedTurnEvent {
                    turn_number: event.turn_number,
                }));
            }
            ServerMessage::RoundEnded(event) => {
                self.stop_bot().await;
                self.program.on_round_ended(&event);
            }
            ServerMessage::GameEnded(event) => {
                self.stop_bot().await;
                self.program.on_game_ended(&event);
            }
            ServerMessage::GameAborted => {
                tracing::debug!("Game aborted");
                self.stop_bot().await;
            }
            ServerMessage::Unknown(kind) => {
                tracing::warn!(kind = %kind, "Ignoring unknown message");
            }
        }
    }

    fn spawn_bot(&mut self) {
        let internals = Arc::clone(&self.internals);
        let program = Arc::clone(&self.program);

        self.bot_task = Some(tokio::task::spawn_blocking(move || {
            internals.bind_bot_thread();
            let bot = Bot::new(&internals, &*program);
            match program.run(&bot) {
                Ok(()) => tracing::debug!("Bot program returned"),
                Err(e) if e.is_cancellation() => {
                    tracing::debug!(error = %e, "Bot program unwound");
                    return;
                }
                Err(e) => tracing::error!(error = %e, "Bot program failed"),
            }
            // Events keep flowing to the handlers until the round ends
            loop {
                match bot.go() {
                    Ok(()) => {}
                    Err(e) if e.is_cancellation() => break,
                    Err(e @ (BotError::NotBotThread | BotError::Transport(_))) => {
                        tracing::debug!(error = %e, "Bot thread leaving the round");
                        break;
                    }
                    Err(e) => tracing::warn!(error = %e, "Event handler failed"),
                }
            }
        }));
    }

    /// End the round for the bot thread and wait for it to unwind.
    ///
    /// A thread that does not reach a blocking call within `stop_timeout` is
    /// detached; it loses its binding when the next round starts.
    async fn stop_bot(&mut self) {
        self.internals.stop_round();
        let Some(task) = self.bot_task.take() else {
            return;
        };
        match tokio::time::timeout(self.stop_timeout, task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "Bot thread panicked"),
            Err(_) => tracing::warn!(
                timeout_ms = self.stop_timeout.as_millis() as u64,
                "Bot thread did not stop, detaching"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use skirmish_battle::TickEvent;
    use skirmish_protocol::{
        BotResults, BotState, GameSetup, GameStartedEventForBot, RoundEndedEventForBot,
        RoundStartedEvent, ServerHandshake, TickEventForBot,
    };

    #[derive(Default)]
    struct Counter {
        turns: Mutex<Vec<i32>>,
        log: Mutex<Vec<String>>,
    }

    impl BotHandler for Counter {
        fn run(&self, bot: &Bot<'_>) -> Result<(), BotError> {
            loop {
                bot.go()?;
                self.turns.lock().unwrap().push(bot.turn_number()?);
            }
        }

        fn on_game_started(&self, event: &GameStartedEventForBot) {
            self.log.lock().unwrap().push(format!("game {}", event.my_id));
        }

        fn on_round_started(&self, round_number: i32) {
            self.log.lock().unwrap().push(format!("round {round_number}"));
        }

        fn on_round_ended(&self, event: &RoundEndedEventForBot) {
            self.log
                .lock()
                .unwrap()
                .push(format!("round ended {}", event.round_number));
        }
    }

    fn session(
        secret: Option<&str>,
    ) -> (
        Session<Counter>,
        Arc<Counter>,
        mpsc::UnboundedReceiver<ClientMessage>,
    ) {
        let (transport, rx) = ChannelTransport::channel();
        let program = Arc::new(Counter::default());
        let session = Session::new(
            transport,
            Arc::clone(&program),
            BotInfo::new("Counter", "1.0").with_author("Ann"),
            secret.map(str::to_string),
        );
        (session, program, rx)
    }

    fn game_started() -> ServerMessage {
        ServerMessage::GameStarted(GameStartedEventForBot {
            my_id: 7,
            teammate_ids: Vec::new(),
            game_setup: GameSetup {
                game_type: "classic".to_string(),
                arena_width: 800,
                arena_height: 600,
                number_of_rounds: 10,
                gun_cooling_rate: 0.1,
                max_inactivity_turns: 450,
                turn_timeout: 30_000,
                ready_timeout: 1_000_000,
            },
        })
    }

    fn tick(turn_number: i32) -> ServerMessage {
        ServerMessage::Tick(TickEventForBot {
            round_number: 1,
            turn_number,
            bot_state: BotState {
                energy: 100.0,
                ..Default::default()
            },
            bullet_states: Vec::new(),
            events: Vec::new(),
        })
    }

    #[tokio::test]
    async fn test_handshake_reply() {
        let (mut session, _, mut rx) = session(Some("hush"));

        session
            .handle_message(ServerMessage::ServerHandshake(ServerHandshake {
                session_id: "abc".to_string(),
                name: None,
                version: None,
                game_types: Vec::new(),
            }))
            .await;

        match rx.recv().await {
            Some(ClientMessage::BotHandshake(handshake)) => {
                assert_eq!(handshake.session_id, "abc");
                assert_eq!(handshake.name, "Counter");
                assert_eq!(handshake.authors, vec!["Ann".to_string()]);
                assert_eq!(handshake.secret.as_deref(), Some("hush"));
            }
            other => panic!("expected handshake, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_game_started_sends_ready() {
        let (mut session, program, mut rx) = session(None);

        session.handle_message(game_started()).await;

        assert_eq!(rx.recv().await, Some(ClientMessage::BotReady));
        assert_eq!(session.internals.my_id(), Some(7));
        assert_eq!(*program.log.lock().unwrap(), vec!["game 7".to_string()]);
    }

    #[tokio::test]
    async fn test_tick_before_game_start_is_ignored() {
        let (mut session, _, _rx) = session(None);

        session.handle_message(tick(1)).await;

        assert!(session.internals.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_skipped_turn_is_staged() {
        let (mut session, _, _rx) = session(None);

        session
            .handle_message(ServerMessage::SkippedTurn(
                skirmish_protocol::SkippedTurnEvent { turn_number: 4 },
            ))
            .await;

        assert_eq!(session.internals.queue().len(), 1);
    }

    #[tokio::test]
    async fn test_round_drives_bot_thread() {
        let (mut session, program, mut rx) = session(None);
        session.handle_message(game_started()).await;
        assert_eq!(rx.recv().await, Some(ClientMessage::BotReady));

        session
            .handle_message(ServerMessage::RoundStarted(RoundStartedEvent { round_number: 1 }))
            .await;
        // Sent before the first tick
        assert!(matches!(rx.recv().await, Some(ClientMessage::BotIntent(_))));

        for turn in 1..=2 {
            session.handle_message(tick(turn)).await;
            assert!(matches!(rx.recv().await, Some(ClientMessage::BotIntent(_))));
        }

        session
            .handle_message(ServerMessage::RoundEnded(RoundEndedEventForBot {
                round_number: 1,
                turn_number: 2,
                results: BotResults::default(),
            }))
            .await;

        assert!(!session.internals.is_running());
        assert_eq!(*program.turns.lock().unwrap(), vec![1, 2]);
        assert_eq!(
            *program.log.lock().unwrap(),
            vec![
                "game 7".to_string(),
                "round 1".to_string(),
                "round ended 1".to_string()
            ]
        );
    }

    /// Only reacts to events, `run` is the default no-op
    #[derive(Default)]
    struct Reactive {
        ticks: Mutex<Vec<i32>>,
    }

    impl BotHandler for Reactive {
        fn on_tick(&self, _: &Bot<'_>, event: &TickEvent) -> Result<(), BotError> {
            self.ticks.lock().unwrap().push(event.turn_number);
            Ok(())
        }
    }

    /// Spins without ever blocking until released
    #[derive(Default)]
    struct Busy {
        release: AtomicBool,
    }

    impl BotHandler for Busy {
        fn run(&self, bot: &Bot<'_>) -> Result<(), BotError> {
            while !self.release.load(Ordering::SeqCst) {
                let _ = bot.turn_number();
                std::thread::yield_now();
            }
            Ok(())
        }
    }

    fn session_for<H: BotHandler + Sync + 'static>(
        program: H,
    ) -> (Session<H>, Arc<H>, mpsc::UnboundedReceiver<ClientMessage>) {
        let (transport, rx) = ChannelTransport::channel();
        let program = Arc::new(program);
        let session = Session::new(
            transport,
            Arc::clone(&program),
            BotInfo::new("Bot", "1.0"),
            None,
        );
        (session, program, rx)
    }

    fn round_ended(turn_number: i32) -> ServerMessage {
        ServerMessage::RoundEnded(RoundEndedEventForBot {
            round_number: 1,
            turn_number,
            results: BotResults::default(),
        })
    }

    #[tokio::test]
    async fn test_events_dispatched_after_run_returns() {
        let (mut session, program, mut rx) = session_for(Reactive::default());
        session.handle_message(game_started()).await;
        assert_eq!(rx.recv().await, Some(ClientMessage::BotReady));

        session
            .handle_message(ServerMessage::RoundStarted(RoundStartedEvent { round_number: 1 }))
            .await;
        assert!(matches!(rx.recv().await, Some(ClientMessage::BotIntent(_))));

        for turn in 1..=3 {
            session.handle_message(tick(turn)).await;
            assert!(matches!(rx.recv().await, Some(ClientMessage::BotIntent(_))));
        }

        session.handle_message(round_ended(3)).await;

        assert!(session.bot_task.is_none());
        assert_eq!(*program.ticks.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_round_end_detaches_stuck_bot_thread() {
        let (mut session, program, _rx) = session_for(Busy::default());
        session.stop_timeout = Duration::from_millis(100);
        session.handle_message(game_started()).await;
        session
            .handle_message(ServerMessage::RoundStarted(RoundStartedEvent { round_number: 1 }))
            .await;

        let ended = tokio::time::timeout(
            Duration::from_secs(5),
            session.handle_message(round_ended(0)),
        )
        .await;

        assert!(ended.is_ok());
        assert!(session.bot_task.is_none());
        assert!(!session.internals.is_running());

        // Let the blocking thread finish before the runtime shuts down
        program.release.store(true, Ordering::SeqCst);
    }
}
