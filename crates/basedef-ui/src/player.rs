//! Snapshot player: replays recorded search [`Frame`]s.
//!
//! The player is handed to
//! [`Pathfinder::find_path_traced`](basedef_paths::Pathfinder::find_path_traced)
//! as the recorder, so a search fills its queue. Later, after
//! [`start_playback`](SnapshotPlayer::start_playback), the caller drives it
//! from its own loop with [`update`](SnapshotPlayer::update) (fixed cadence)
//! or [`tick`](SnapshotPlayer::tick) (one frame right now). Each frame is
//! handed to a [`FrameSink`] exactly once, oldest first; when the queue runs
//! dry playback stops by itself.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use basedef_core::Color;
use basedef_paths::{Frame, SearchRecorder};

/// Identifies one playback session. Sessions are numbered from 0 in the
/// order they are started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionId(pub usize);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session #{}", self.0)
    }
}

/// Receives frames as they are played back.
pub trait FrameSink {
    fn apply(&mut self, session: SessionId, frame: &Frame);
}

/// Configuration for a [`SnapshotPlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackConfig {
    /// Wall-clock time between two frames during auto-play.
    pub interval: Duration,
    /// Colour searches use for their final-path frame.
    pub path_tint: Color,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(50),
            path_tint: Color::WHITE,
        }
    }
}

// ---------------------------------------------------------------------------
// SnapshotPlayer
// ---------------------------------------------------------------------------

/// Queues search frames and plays them back one at a time.
#[derive(Debug, Clone)]
pub struct SnapshotPlayer {
    queue: VecDeque<Frame>,
    interval: Duration,
    tint: Color,
    playing: bool,
    session: Option<SessionId>,
    sessions_started: usize,
    /// Time accumulated since playback started.
    elapsed: Duration,
    /// `elapsed` value at which the next frame is due.
    next_due: Duration,
}

impl Default for SnapshotPlayer {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl SnapshotPlayer {
    pub fn new(cfg: PlaybackConfig) -> Self {
        Self {
            queue: VecDeque::new(),
            interval: cfg.interval,
            tint: cfg.path_tint,
            playing: false,
            session: None,
            sessions_started: 0,
            elapsed: Duration::ZERO,
            next_due: Duration::ZERO,
        }
    }

    /// Begin playing the queued frames in a new session.
    ///
    /// Starting while a session is still playing does not open a second,
    /// interleaved session: the running one is kept and returned. With an
    /// empty queue the new session is opened but ends immediately.
    pub fn start_playback(&mut self) -> SessionId {
        if let (true, Some(current)) = (self.playing, self.session) {
            log::warn!("playback already running in {current}, not starting another");
            return current;
        }
        let id = SessionId(self.sessions_started);
        self.sessions_started += 1;
        self.session = Some(id);
        self.playing = !self.queue.is_empty();
        self.elapsed = Duration::ZERO;
        self.next_due = Duration::ZERO;
        log::debug!("{id}: playing {} frames", self.queue.len());
        id
    }

    /// Whether queued frames are still being played.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The most recently started session.
    #[inline]
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    /// How many sessions have been started so far.
    #[inline]
    pub fn sessions_started(&self) -> usize {
        self.sessions_started
    }

    /// Frames not yet applied.
    #[inline]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Queue frames recorded elsewhere, after any still pending.
    pub fn enqueue(&mut self, frames: impl IntoIterator<Item = Frame>) {
        self.queue.extend(frames);
    }

    /// Drop every unapplied frame and stop playback. Safe to call at any
    /// time, any number of times.
    pub fn clear_frames(&mut self) {
        self.queue.clear();
        self.playing = false;
    }

    /// Advance the playback clock by `dt`, applying at most one frame when
    /// one is due. The first frame is due immediately after
    /// [`start_playback`](Self::start_playback). Returns whether a frame was
    /// applied.
    pub fn update<S: FrameSink + ?Sized>(&mut self, dt: Duration, sink: &mut S) -> bool {
        if !self.playing {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed < self.next_due {
            return false;
        }
        self.next_due += self.interval;
        self.tick(sink)
    }

    /// Apply the oldest queued frame now. Returns whether a frame was
    /// applied; playback stops once the queue is empty.
    pub fn tick<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        let (true, Some(session)) = (self.playing, self.session) else {
            return false;
        };
        let applied = match self.queue.pop_front() {
            Some(frame) => {
                sink.apply(session, &frame);
                log::trace!("{session}: frame applied, {} left", self.queue.len());
                true
            }
            None => false,
        };
        if self.queue.is_empty() {
            self.playing = false;
            log::debug!("{session}: playback finished");
        }
        applied
    }
}

impl SearchRecorder for SnapshotPlayer {
    fn clear_frames(&mut self) {
        SnapshotPlayer::clear_frames(self);
    }

    fn take_snapshot(&mut self, frame: Frame) {
        self.queue.push_back(frame);
    }

    fn path_tint(&self) -> Color {
        self.tint
    }
}
