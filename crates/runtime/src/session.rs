//! Session actor - one task owns the game state
//!
//! Commands from any number of [`SessionHandle`] clones arrive over an mpsc channel and
//! run one at a time inside the task. Gravity fires from the same `select!` loop, so a
//! timer tick can never interleave with a command. Readers only ever receive copies.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{sleep_until, Instant};

use blockfall_core::{ActiveSnapshot, GameSnapshot, GameState};
use blockfall_types::{Direction, GameConfig};

use crate::config::RuntimeConfig;
use crate::event_log::{EventLog, LogRecord};

/// Capacity of the event broadcast; slow subscribers skip what they missed.
const EVENT_CAPACITY: usize = 256;

/// Mutating command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewGame(Option<GameConfig>),
    TogglePause,
    Move(Direction),
    Rotate { clockwise: bool },
    HardDrop,
    Hold,
}

impl Command {
    /// Stable name used in logs and acks
    pub fn name(&self) -> &'static str {
        match self {
            Command::NewGame(_) => "new_game",
            Command::TogglePause => "toggle_pause",
            Command::Move(Direction::Left) => "move_left",
            Command::Move(Direction::Right) => "move_right",
            Command::Move(Direction::Down) => "move_down",
            Command::Rotate { clockwise: true } => "rotate_cw",
            Command::Rotate { clockwise: false } => "rotate_ccw",
            Command::HardDrop => "hard_drop",
            Command::Hold => "hold",
        }
    }

    fn apply(self, game: &mut GameState) -> bool {
        match self {
            Command::NewGame(config) => {
                game.new_game(config);
                true
            }
            Command::TogglePause => game.toggle_pause(),
            Command::Move(direction) => game.move_piece(direction),
            Command::Rotate { clockwise } => game.rotate(clockwise),
            Command::HardDrop => game.hard_drop(),
            Command::Hold => game.hold(),
        }
    }
}

/// Notification published to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StateChanged(GameSnapshot),
    LinesCleared(u32),
}

enum Request {
    Command(Command, oneshot::Sender<bool>),
    State(oneshot::Sender<GameSnapshot>),
    Config(oneshot::Sender<GameConfig>),
    Ghost(oneshot::Sender<Option<ActiveSnapshot>>),
    PlayTime(oneshot::Sender<Duration>),
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable handle to a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Request>,
    events: broadcast::Sender<SessionEvent>,
}

/// Spawn a session task on the current tokio runtime
pub fn spawn(config: RuntimeConfig) -> SessionHandle {
    let (tx, rx) = mpsc::channel::<Request>(config.max_pending_commands.max(1));
    let (events, _) = broadcast::channel::<SessionEvent>(EVENT_CAPACITY);

    let mut game = GameState::new(config.game);
    {
        let events = events.clone();
        game.on_state_change(move |snapshot| {
            let _ = events.send(SessionEvent::StateChanged(snapshot.clone()));
        });
    }
    {
        let events = events.clone();
        game.on_line_clear(move |count| {
            let _ = events.send(SessionEvent::LinesCleared(count));
        });
    }

    let log = config.log_path.map(EventLog::spawn);
    eprintln!(
        "[Runtime] Session started ({}x{}, level {}, seed {})",
        game.config().width,
        game.config().height,
        game.level(),
        game.seed()
    );

    tokio::spawn(run_session(game, rx, log));

    SessionHandle { tx, events }
}

/// Session loop
///
/// `last` marks the instant up to which the drop scheduler has been advanced. Every
/// wake-up first catches the scheduler up to now, then handles the request.
async fn run_session(mut game: GameState, mut rx: mpsc::Receiver<Request>, log: Option<EventLog>) {
    let mut last = Instant::now();

    loop {
        let deadline = game
            .scheduler()
            .remaining_ms()
            .map(|ms| last + Duration::from_millis(ms as u64));

        let gravity = async {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            request = rx.recv() => {
                catch_up(&mut game, &mut last);
                let Some(request) = request else {
                    break;
                };
                match request {
                    Request::Command(command, reply) => {
                        let ok = command.apply(&mut game);
                        if let Some(log) = &log {
                            log.record(LogRecord {
                                command: command.name(),
                                ok,
                                score: game.score(),
                                level: game.level(),
                                lines: game.lines(),
                                game_over: game.game_over(),
                            });
                        }
                        let _ = reply.send(ok);
                    }
                    Request::State(reply) => {
                        let _ = reply.send(game.state());
                    }
                    Request::Config(reply) => {
                        let _ = reply.send(game.config());
                    }
                    Request::Ghost(reply) => {
                        let _ = reply.send(game.ghost_position().map(ActiveSnapshot::from));
                    }
                    Request::PlayTime(reply) => {
                        let _ = reply.send(game.play_time());
                    }
                    Request::Shutdown(reply) => {
                        let _ = reply.send(());
                        break;
                    }
                }
            }
            _ = gravity => {
                catch_up(&mut game, &mut last);
            }
        }
    }

    eprintln!(
        "[Runtime] Session ended (score {}, lines {}, level {})",
        game.score(),
        game.lines(),
        game.level()
    );
}

/// Feed the wall-clock time since `last` into the drop scheduler
fn catch_up(game: &mut GameState, last: &mut Instant) {
    let elapsed_ms = last.elapsed().as_millis().min(u32::MAX as u128) as u32;
    if elapsed_ms == 0 {
        return;
    }
    game.tick(elapsed_ms);
    *last += Duration::from_millis(elapsed_ms as u64);
}

impl SessionHandle {
    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Request) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| anyhow!("session closed"))?;
        reply_rx.await.context("session dropped the request")
    }

    /// Run a command and return whether it took effect
    pub async fn command(&self, command: Command) -> Result<bool> {
        self.request(|reply| Request::Command(command, reply)).await
    }

    pub async fn new_game(&self, config: Option<GameConfig>) -> Result<()> {
        self.command(Command::NewGame(config)).await.map(|_| ())
    }

    pub async fn toggle_pause(&self) -> Result<bool> {
        self.command(Command::TogglePause).await
    }

    pub async fn move_piece(&self, direction: Direction) -> Result<bool> {
        self.command(Command::Move(direction)).await
    }

    pub async fn rotate(&self, clockwise: bool) -> Result<bool> {
        self.command(Command::Rotate { clockwise }).await
    }

    pub async fn hard_drop(&self) -> Result<bool> {
        self.command(Command::HardDrop).await
    }

    pub async fn hold(&self) -> Result<bool> {
        self.command(Command::Hold).await
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> Result<GameSnapshot> {
        self.request(Request::State).await
    }

    pub async fn config(&self) -> Result<GameConfig> {
        self.request(Request::Config).await
    }

    /// Landing position of the active piece
    pub async fn ghost_position(&self) -> Result<Option<ActiveSnapshot>> {
        self.request(Request::Ghost).await
    }

    pub async fn play_time(&self) -> Result<Duration> {
        self.request(Request::PlayTime).await
    }

    /// Receive every state change and line clear from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Stop the session task
    pub async fn shutdown(&self) -> Result<()> {
        self.request(Request::Shutdown).await
    }
}
