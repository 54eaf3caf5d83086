//! Shuffle choreographer: gather, loop, land.
//!
//! ```text
//!  Idle ──trigger──▶ Gathering ──timer──▶ Looping ──stop──▶ Landing ──timer──▶ Idle
//!                        │                  │  frame error     ▲
//!                        └──────────────────┴──────────────────┘
//! ```
//!
//! The choreographer is driven entirely by frames: it requests one frame at
//! a time from the host's scheduler and does its work when the host
//! delivers it. Gather and settle timers run on frame timestamps, anchored
//! at the first frame of the phase.
//!
//! While a shuffle runs the choreographer owns every card. The loop moves
//! all cards from one shared time value per frame; landing permutes the
//! deck order once, flies each card to its new slot, and after the settle
//! delay attaches everything to the row.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::cards::CardId;
use crate::core::error::BoardError;
use crate::core::geometry::{Pose, SurfaceGeometry, Transform3d};
use crate::host::{FrameHandle, FrameScheduler};
use crate::layout::FanLayout;
use crate::placement::{BoardSession, Motion, Transition};

/// Phase of the shuffle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShufflePhase {
    #[default]
    Idle,
    Gathering,
    Looping,
    Landing,
}

impl std::fmt::Display for ShufflePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ShufflePhase::Idle => "idle",
            ShufflePhase::Gathering => "gathering",
            ShufflePhase::Looping => "looping",
            ShufflePhase::Landing => "landing",
        })
    }
}

/// State of one running shuffle.
#[derive(Clone, Debug)]
pub struct ShuffleSession {
    phase: ShufflePhase,
    elapsed_loop_time: f64,
    frame: Option<FrameHandle>,
    phase_started_at: Option<f64>,
    /// Deck order when the shuffle started; gives each card its loop ordinal.
    ordinals: Vector<CardId>,
}

impl ShuffleSession {
    fn new(ordinals: Vector<CardId>) -> Self {
        Self {
            phase: ShufflePhase::Gathering,
            elapsed_loop_time: 0.0,
            frame: None,
            phase_started_at: None,
            ordinals,
        }
    }

    #[must_use]
    pub fn phase(&self) -> ShufflePhase {
        self.phase
    }

    /// Loop time accumulated so far.
    #[must_use]
    pub fn elapsed_loop_time(&self) -> f64 {
        self.elapsed_loop_time
    }

    /// The frame the session is waiting for.
    #[must_use]
    pub fn frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    fn enter(&mut self, phase: ShufflePhase) {
        debug!("[shuffle] {} -> {}", self.phase, phase);
        self.phase = phase;
        self.phase_started_at = None;
    }
}

/// What the choreographer needs from the board for one call.
pub struct Stage<'a, S: FrameScheduler + ?Sized> {
    pub session: &'a mut BoardSession,
    pub surface: SurfaceGeometry,
    pub scheduler: &'a mut S,
}

/// Runs at most one shuffle at a time.
#[derive(Clone, Debug, Default)]
pub struct Choreographer {
    shuffle: Option<ShuffleSession>,
    /// Phases entered since the last `take_phase_changes`.
    changes: Vec<ShufflePhase>,
}

impl Choreographer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> ShufflePhase {
        self.shuffle.as_ref().map_or(ShufflePhase::Idle, ShuffleSession::phase)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shuffle.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&ShuffleSession> {
        self.shuffle.as_ref()
    }

    /// Every phase entered since the previous call, oldest first.
    pub fn take_phase_changes(&mut self) -> Vec<ShufflePhase> {
        std::mem::take(&mut self.changes)
    }

    /// Start a shuffle. Ignored (returns `false`) unless idle with cards.
    pub fn trigger<S: FrameScheduler + ?Sized>(&mut self, stage: &mut Stage<'_, S>) -> bool {
        if self.shuffle.is_some() {
            debug!("[shuffle] trigger ignored, already {}", self.phase());
            return false;
        }
        if stage.session.store().is_empty() {
            debug!("[shuffle] trigger ignored, no cards");
            return false;
        }

        if let Err(err) = self.gather(stage) {
            warn!("[shuffle] gather failed: {}", err);
            self.recover(stage);
            return true;
        }
        info!("[shuffle] gathering {} cards", stage.session.store().len());
        self.schedule(stage);
        true
    }

    /// Stop the loop and land. Ignored (returns `false`) unless looping.
    pub fn stop<S: FrameScheduler + ?Sized>(&mut self, stage: &mut Stage<'_, S>) -> bool {
        if self.phase() != ShufflePhase::Looping {
            debug!("[shuffle] stop ignored while {}", self.phase());
            return false;
        }
        self.begin_landing(stage);
        true
    }

    /// Handle a delivered frame.
    pub fn on_frame<S: FrameScheduler + ?Sized>(
        &mut self,
        handle: FrameHandle,
        timestamp_ms: f64,
        stage: &mut Stage<'_, S>,
    ) {
        let Some(shuffle) = self.shuffle.as_mut() else {
            trace!("[shuffle] {} arrived while idle", handle);
            return;
        };
        if shuffle.frame != Some(handle) {
            trace!("[shuffle] stale {}", handle);
            return;
        }
        shuffle.frame = None;
        let started = *shuffle.phase_started_at.get_or_insert(timestamp_ms);
        let elapsed = timestamp_ms - started;
        let phase = shuffle.phase;
        let config = stage.session.config();
        let (gather_ms, settle_ms) = (config.gather_duration_ms, config.settle_duration_ms);

        let result = match phase {
            ShufflePhase::Gathering if elapsed >= gather_ms => {
                self.enter_loop(stage).and_then(|()| self.step(stage))
            }
            ShufflePhase::Looping => self.step(stage),
            ShufflePhase::Landing if elapsed >= settle_ms => {
                self.settle(stage);
                return;
            }
            _ => Ok(()),
        };

        match result {
            Ok(()) => self.schedule(stage),
            Err(err) => {
                warn!("[shuffle] frame failed: {}", err);
                self.recover(stage);
            }
        }
    }

    /// The host lost the pending frame or its callback failed.
    pub fn on_frame_error<S: FrameScheduler + ?Sized>(&mut self, stage: &mut Stage<'_, S>) {
        if self.shuffle.is_some() {
            warn!("[shuffle] frame lost while {}", self.phase());
            self.recover(stage);
        }
    }

    /// Drop the running shuffle without touching cards. Only for a board
    /// being rebuilt from scratch.
    pub fn abandon<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(mut shuffle) = self.shuffle.take() {
            if let Some(handle) = shuffle.frame.take() {
                scheduler.cancel_frame(handle);
            }
            debug!("[shuffle] abandoned while {}", shuffle.phase);
            self.changes.push(ShufflePhase::Idle);
        }
    }

    fn cancel_frame<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.shuffle.as_mut().and_then(|s| s.frame.take()) {
            scheduler.cancel_frame(handle);
        }
    }

    /// Request the next frame, recovering if the scheduler refuses.
    fn schedule<S: FrameScheduler + ?Sized>(&mut self, stage: &mut Stage<'_, S>) {
        let Some(shuffle) = self.shuffle.as_mut() else {
            return;
        };
        match stage.scheduler.request_frame() {
            Ok(handle) => shuffle.frame = Some(handle),
            Err(err) => {
                warn!("[shuffle] cannot schedule frame while {}: {}", shuffle.phase, err);
                self.recover(stage);
            }
        }
    }

    /// Finish the shuffle without further frames: land if not landed yet,
    /// then settle at once.
    fn recover<S: FrameScheduler + ?Sized>(&mut self, stage: &mut Stage<'_, S>) {
        self.cancel_frame(&mut *stage.scheduler);
        match self.phase() {
            ShufflePhase::Gathering | ShufflePhase::Looping => {
                self.land(stage);
                self.settle(stage);
            }
            ShufflePhase::Landing => self.settle(stage),
            ShufflePhase::Idle => {}
        }
    }

    fn gather<S: FrameScheduler + ?Sized>(&mut self, stage: &mut Stage<'_, S>) -> Result<(), BoardError> {
        let session = &mut *stage.session;
        let ordinals = session.store().order_snapshot();
        self.shuffle = Some(ShuffleSession::new(ordinals.clone()));
        self.changes.push(ShufflePhase::Gathering);

        // Capture every on-screen position before any card leaves the row,
        // since each departure re-lays out the cards still in it.
        let positions: Vec<_> = ordinals
            .iter()
            .map(|id| {
                session
                    .visual_position(id, &stage.surface)
                    .ok_or_else(|| BoardError::UnknownCard(id.clone()))
            })
            .collect::<Result<_, _>>()?;

        for (id, at) in ordinals.iter().zip(positions) {
            session.apply(id, Transition::Detach { at })?;
        }
        session.store_mut().hide_all();

        let config = session.config().clone();
        let focal = stage.surface.focal_point(config.card_size);
        let motion = Motion::Smooth {
            duration_ms: config.gather_duration_ms,
        };
        for id in &ordinals {
            let pose = Pose::new(session.gather_tilt(), config.gather_scale);
            session.apply(
                id,
                Transition::Reposition {
                    position: focal,
                    pose,
                    motion,
                },
            )?;
        }
        Ok(())
    }

    fn enter_loop<S: FrameScheduler + ?Sized>(&mut self, stage: &mut Stage<'_, S>) -> Result<(), BoardError> {
        let Some(shuffle) = self.shuffle.as_mut() else {
            return Ok(());
        };
        let session = &mut *stage.session;
        let focal = stage.surface.focal_point(session.config().card_size);
        let transform = Transform3d {
            scale: session.config().motion.scale,
            ..Transform3d::IDENTITY
        };

        session.begin_loop();
        for id in &shuffle.ordinals {
            session.apply(id, Transition::Animate { anchor: focal, transform })?;
        }
        shuffle.elapsed_loop_time = 0.0;
        shuffle.enter(ShufflePhase::Looping);
        self.changes.push(ShufflePhase::Looping);
        info!("[shuffle] looping");
        Ok(())
    }

    /// Advance the loop by one frame.
    fn step<S: FrameScheduler + ?Sized>(&mut self, stage: &mut Stage<'_, S>) -> Result<(), BoardError> {
        let Some(shuffle) = self.shuffle.as_mut() else {
            return Ok(());
        };
        let session = &mut *stage.session;
        let motion = session.config().motion;
        let focal = stage.surface.focal_point(session.config().card_size);

        shuffle.elapsed_loop_time += motion.time_step;
        let time = shuffle.elapsed_loop_time;
        trace!("[shuffle] loop t={:.3}", time);

        for (id, (transform, z)) in shuffle.ordinals.iter().zip(motion.frame(time, shuffle.ordinals.len())) {
            session.apply(id, Transition::Animate { anchor: focal, transform })?;
            session.set_z(id, z)?;
        }
        Ok(())
    }

    fn begin_landing<S: FrameScheduler + ?Sized>(&mut self, stage: &mut Stage<'_, S>) {
        self.cancel_frame(&mut *stage.scheduler);
        self.land(stage);
        self.schedule(stage);
    }

    /// Permute the deck and send every card towards its new slot, stacked
    /// in the new order.
    fn land<S: FrameScheduler + ?Sized>(&mut self, stage: &mut Stage<'_, S>) {
        let Some(shuffle) = self.shuffle.as_mut() else {
            return;
        };
        let session = &mut *stage.session;
        session.permute_order();

        let order = session.store().order_snapshot();
        let config = session.config();
        let layout = FanLayout::new(stage.surface.row.size.width, config.card_size.width, order.len());
        let motion = Motion::Smooth {
            duration_ms: config.landing_transition_ms,
        };

        for (i, id) in order.iter().enumerate() {
            let position = stage.surface.row.origin + layout.slot(i);
            if let Err(err) = session.apply(id, Transition::Land { position, motion }) {
                warn!("[shuffle] {}", err);
            }
            let _ = session.set_z(id, i as i32 + 1);
        }
        if session.placements().loop_active() {
            session.end_loop();
        }
        shuffle.enter(ShufflePhase::Landing);
        self.changes.push(ShufflePhase::Landing);
        info!("[shuffle] landing");
    }

    /// Attach every card to the row, realign, and end the shuffle.
    fn settle<S: FrameScheduler + ?Sized>(&mut self, stage: &mut Stage<'_, S>) {
        self.cancel_frame(&mut *stage.scheduler);
        let session = &mut *stage.session;
        for id in session.store().order_snapshot() {
            if let Err(err) = session.apply(&id, Transition::Attach) {
                warn!("[shuffle] {}", err);
            }
        }
        let count = session.realign();
        self.shuffle = None;
        self.changes.push(ShufflePhase::Idle);
        info!("[shuffle] settled {} cards", count);
    }
}
