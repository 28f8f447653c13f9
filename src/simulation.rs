//! Timed stepping of a [`Board`].
//!
//! While running, a ticker thread advances the board once per update interval. The board sits
//! behind a mutex shared by the ticker and the [`Simulation`] handle, so a step and an edit never
//! overlap. Manual edits are refused while running anyway.
//!
//! The ticker's only suspension point is a `recv_deadline` on its stop channel. `stop()` sends on
//! that channel and joins the thread, so once it returns no more generations can happen.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use std::time::Instant;

use crossbeam_channel::Receiver;
use crossbeam_channel::RecvTimeoutError;
use crossbeam_channel::Sender;
use crossbeam_channel::TrySendError;
use rand::Rng;
use thiserror::Error;
use tracing::debug;
use tracing::error;
use tracing::trace;
use tracing::warn;

use crate::aabb::Aabb;
use crate::board::Board;
use crate::config;
use crate::config::Config;
use crate::config::ConfigError;
use crate::events::Generation;
use crate::point::Point;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Cells can't be edited while the simulation is running")]
    Running,

    #[error("Cell {cell:?} is outside the board {bounds:?}")]
    OutOfBounds { cell: Point, bounds: Aabb },
}

type Subscribers = Arc<Mutex<Vec<Sender<Generation>>>>;

/// Lock the board. A panic while holding the lock can't leave it half updated, since every
/// mutation is a single insert, remove or swap, so poisoning is ignored.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Hand `generation` to every subscriber, forgetting the ones that hung up. A bounded subscriber
/// that is full misses this generation.
fn publish(subscribers: &Subscribers, generation: &Generation) {
    lock(subscribers).retain(|tx| match tx.try_send(generation.clone()) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            trace!(index = generation.index, "subscriber is full, dropping generation");
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    });
}

/// When the step after the one due at `prev` is due.
///
/// Steps are scheduled off the previous deadline so they don't drift, but a ticker that fell
/// behind restarts from `now` instead of bursting to catch up.
fn next_deadline(prev: Instant, now: Instant, interval: Duration) -> Instant {
    (prev + interval).max(now)
}

pub struct Simulation {
    board: Arc<Mutex<Board>>,

    /// Update interval in nanoseconds. Read by the ticker before every wait.
    interval: Arc<AtomicU64>,

    subscribers: Subscribers,

    /// `Some` while running
    ticker: Option<Ticker>,
}

impl Simulation {
    /// Build a stopped simulation with an empty board.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let bounds = config.bounds()?;
        let interval = config
            .update_interval
            .clamp(config::MIN_INTERVAL, config::MAX_INTERVAL);

        debug!(?bounds, ?interval, rule_set = %config.rule_set, "new simulation");

        Ok(Self {
            board: Arc::new(Mutex::new(Board::new(bounds, config.rule_set))),
            interval: Arc::new(AtomicU64::new(interval.as_nanos() as u64)),
            subscribers: Arc::default(),
            ticker: None,
        })
    }

    pub fn bounds(&self) -> Aabb {
        lock(&self.board).bounds()
    }

    pub fn is_alive(&self, cell: Point) -> bool {
        lock(&self.board).is_alive(cell)
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn population(&self) -> usize {
        lock(&self.board).population()
    }

    pub fn generation(&self) -> u64 {
        lock(&self.board).generation()
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_nanos(self.interval.load(Ordering::Relaxed))
    }

    /// An owned copy of the board as it is right now.
    pub fn snapshot(&self) -> Board {
        lock(&self.board).clone()
    }

    /// Receive a [`Generation`] for every step from now on, timed or manual.
    ///
    /// The channel is unbounded: a receiver that is never drained keeps every generation in
    /// memory, up to 100 per second at the fastest interval. Drop it when done, or use
    /// [`Simulation::subscribe_bounded`].
    pub fn subscribe(&self) -> Receiver<Generation> {
        let (tx, rx) = crossbeam_channel::unbounded();
        lock(&self.subscribers).push(tx);

        rx
    }

    /// Like [`Simulation::subscribe`], but holds at most `cap` undelivered generations. Once
    /// full, new generations are dropped for this receiver until it catches up.
    pub fn subscribe_bounded(&self, cap: usize) -> Receiver<Generation> {
        let (tx, rx) = crossbeam_channel::bounded(cap.max(1));
        lock(&self.subscribers).push(tx);

        rx
    }

    /// Start stepping the board every update interval. Does nothing if already running.
    ///
    /// The first generation happens one interval after this call.
    pub fn start(&mut self) {
        if self.ticker.is_some() {
            return;
        }

        debug!(interval = ?self.update_interval(), "starting");

        self.ticker = Some(Ticker::spawn(
            self.board.clone(),
            self.interval.clone(),
            self.subscribers.clone(),
        ));
    }

    /// Stop stepping. Does nothing if already stopped. The board is left as it is.
    ///
    /// A generation already being computed finishes first, no generation starts after this
    /// returns.
    pub fn stop(&mut self) {
        let Some(ticker) = self.ticker.take() else {
            return;
        };

        ticker.stop();
        debug!(generation = self.generation(), "stopped");
    }

    /// Stop and kill every cell.
    pub fn clear(&mut self) {
        self.stop();
        lock(&self.board).clear();
    }

    /// Stop, clear, then bring each cell to life with probability `p` using the thread's RNG.
    ///
    /// See [`config::DEFAULT_DENSITY`] for the usual value.
    pub fn randomize(&mut self, p: f64) {
        self.randomize_with(p, &mut rand::thread_rng());
    }

    /// Like [`Simulation::randomize`], drawing from `rng`.
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, p: f64, rng: &mut R) {
        self.stop();

        let mut board = lock(&self.board);
        board.randomize(p, rng);

        debug!(p, population = board.population(), "randomized");
    }

    /// Set a single cell while stopped. Returns whether the cell changed.
    pub fn toggle_cell(&mut self, cell: Point, alive: bool) -> Result<bool, SimulationError> {
        if self.is_running() {
            warn!(?cell, "refusing to edit a running board");
            return Err(SimulationError::Running);
        }

        let mut board = lock(&self.board);
        let bounds = board.bounds();

        if !bounds.contains(cell) {
            warn!(?cell, ?bounds, "refusing to edit outside the board");
            return Err(SimulationError::OutOfBounds { cell, bounds });
        }

        Ok(board.set(cell, alive))
    }

    /// Change the stepping rate. Returns the resulting interval, see
    /// [`config::interval_from_rate`].
    ///
    /// If running, the wait in progress keeps its deadline and the new interval applies from the
    /// next one.
    pub fn set_update_interval(&self, steps_per_second: f64) -> Duration {
        let interval = config::interval_from_rate(steps_per_second);
        self.interval
            .store(interval.as_nanos() as u64, Ordering::Relaxed);

        debug!(steps_per_second, ?interval, "update interval changed");

        interval
    }

    /// Advance exactly one generation right now, whether running or not.
    pub fn step(&self) -> Generation {
        advance(&self.board, &self.subscribers)
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Step `board` once and tell everyone about it.
///
/// The board stays locked until the generation is published, so subscribers see generations in
/// order even when the ticker and [`Simulation::step`] race.
fn advance(board: &Mutex<Board>, subscribers: &Subscribers) -> Generation {
    let mut board = lock(board);
    let generation = board.advance();

    trace!(
        index = generation.index,
        born = generation.born.len(),
        died = generation.died.len(),
        "generation"
    );

    publish(subscribers, &generation);
    drop(board);

    generation
}

/// Handle to a running ticker thread
struct Ticker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn spawn(board: Arc<Mutex<Board>>, interval: Arc<AtomicU64>, subscribers: Subscribers) -> Self {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);

        let handle = thread::spawn(move || {
            let current = || Duration::from_nanos(interval.load(Ordering::Relaxed));
            let mut deadline = Instant::now() + current();

            loop {
                match stop_rx.recv_deadline(deadline) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }

                advance(&board, &subscribers);

                deadline = next_deadline(deadline, Instant::now(), current());
            }
        });

        Self { stop_tx, handle }
    }

    fn stop(self) {
        // The ticker may have died already, in which case the channel is disconnected.
        let _ = self.stop_tx.try_send(());

        if self.handle.join().is_err() {
            error!("ticker thread panicked");
        }
    }
}
