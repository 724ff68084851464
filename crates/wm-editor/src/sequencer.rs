//! Presentation sequencer.
//!
//! Drives recording and playback of the map's reveal sequence. Every change
//! to the sequence is committed through the document history, so recording
//! steps undo like any other edit. Autoplay runs on an injected [`Timer`];
//! the host calls [`Sequencer::on_timer`] when a scheduled tick fires.
//!
//! ```text
//!   Idle ──start──▶ Recording ──stop──▶ Ready ◀──────────────┐
//!                                        │ play              │ tick past end
//!                                        ▼                   │
//!                 Scrubbing ◀──pause── Playing ──tick──▶ Playing
//! ```

use crate::Document;
use crate::history::History;
use crate::presenter::{PresenterChannel, PresenterMessage, RemoteCommand};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use wm_core::{AnimationSequence, SequenceKind, WardleyMap};

pub type TimerId = u64;

/// One-shot scheduler for autoplay ticks.
pub trait Timer {
    fn schedule(&mut self, delay: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Default)]
struct ManualTimerState {
    next_id: TimerId,
    pending: Vec<(TimerId, Duration)>,
}

/// A timer that never fires by itself. Clones share state, so a host (or a
/// test) keeps one handle and fires ticks with [`ManualTimer::fire_next`].
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    state: Rc<RefCell<ManualTimerState>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids scheduled and not yet fired or cancelled.
    pub fn pending(&self) -> Vec<TimerId> {
        self.state.borrow().pending.iter().map(|(id, _)| *id).collect()
    }

    /// The delay requested for a pending tick.
    pub fn delay_of(&self, id: TimerId) -> Option<Duration> {
        self.state
            .borrow()
            .pending
            .iter()
            .find(|(pending, _)| *pending == id)
            .map(|(_, delay)| *delay)
    }

    /// Remove the oldest pending tick and return its id for dispatch.
    pub fn fire_next(&self) -> Option<TimerId> {
        let mut state = self.state.borrow_mut();
        if state.pending.is_empty() {
            return None;
        }
        Some(state.pending.remove(0).0)
    }
}

impl Timer for ManualTimer {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state.pending.push((id, delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.state.borrow_mut().pending.retain(|(pending, _)| *pending != id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No sequence recorded.
    Idle,
    /// Clicks on the canvas toggle items in the sequence.
    Recording,
    /// A sequence exists and nothing has been revealed.
    Ready,
    /// Autoplay advancing on a timer.
    Playing,
    /// Stepped manually to a step other than zero.
    Scrubbing,
}

pub struct Sequencer {
    state: PlaybackState,
    step: usize,
    delay: Duration,
    timer: Box<dyn Timer>,
    pending: Option<TimerId>,
    channel: Option<Box<dyn PresenterChannel>>,
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("state", &self.state)
            .field("step", &self.step)
            .field("delay", &self.delay)
            .field("pending", &self.pending)
            .field("connected", &self.channel.is_some())
            .finish()
    }
}

impl Sequencer {
    pub fn new(timer: Box<dyn Timer>, delay: Duration) -> Self {
        Self {
            state: PlaybackState::Idle,
            step: 0,
            delay,
            timer,
            pending: None,
            channel: None,
        }
    }

    /// Attach a presenter channel; every state change is published to it.
    pub fn with_channel(mut self, channel: Box<dyn PresenterChannel>) -> Self {
        self.attach(channel);
        self
    }

    pub fn attach(&mut self, channel: Box<dyn PresenterChannel>) {
        self.channel = Some(channel);
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Number of items currently revealed.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_recording(&self) -> bool {
        self.state == PlaybackState::Recording
    }

    // ─── Recording ───────────────────────────────────────────────────────

    /// Begin a fresh recording, discarding any previous sequence.
    pub fn start_recording(&mut self, history: &mut History<Arc<Document>>) -> bool {
        if self.state == PlaybackState::Recording {
            return false;
        }
        self.cancel_tick();
        self.step = 0;
        commit_sequence(
            history,
            AnimationSequence {
                items: Vec::new(),
                is_recording: true,
            },
        );
        self.transition(PlaybackState::Recording);
        self.publish(history);
        true
    }

    /// Toggle `target_id` in the sequence. Ignored unless recording.
    pub fn item_clicked(
        &mut self,
        history: &mut History<Arc<Document>>,
        kind: SequenceKind,
        target_id: &str,
    ) -> bool {
        if self.state != PlaybackState::Recording {
            return false;
        }
        let mut sequence = history.present().map.sequence.clone();
        sequence.toggle(kind, target_id);
        log::trace!("sequence toggled {kind:?} {target_id}; {} items", sequence.len());
        commit_sequence(history, sequence);
        self.publish(history);
        true
    }

    pub fn stop_recording(&mut self, history: &mut History<Arc<Document>>) -> bool {
        if self.state != PlaybackState::Recording {
            return false;
        }
        let mut sequence = history.present().map.sequence.clone();
        sequence.is_recording = false;
        let empty = sequence.is_empty();
        commit_sequence(history, sequence);
        self.transition(if empty {
            PlaybackState::Idle
        } else {
            PlaybackState::Ready
        });
        self.publish(history);
        true
    }

    /// Drop the recorded sequence entirely.
    pub fn clear(&mut self, history: &mut History<Arc<Document>>) {
        self.cancel_tick();
        self.step = 0;
        if history.present().map.sequence != AnimationSequence::default() {
            commit_sequence(history, AnimationSequence::default());
        }
        self.transition(PlaybackState::Idle);
        self.publish(history);
    }

    // ─── Playback ────────────────────────────────────────────────────────

    pub fn play(&mut self, history: &History<Arc<Document>>) -> bool {
        let count = item_count(history);
        if !matches!(self.state, PlaybackState::Ready | PlaybackState::Scrubbing) || count == 0 {
            return false;
        }
        if self.step >= count {
            self.step = 0;
        }
        self.transition(PlaybackState::Playing);
        self.arm_tick();
        self.publish(history);
        true
    }

    pub fn pause(&mut self, history: &History<Arc<Document>>) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        self.cancel_tick();
        self.transition(self.settled());
        self.publish(history);
        true
    }

    /// Reveal one more item. Stops autoplay.
    pub fn next(&mut self, history: &History<Arc<Document>>) -> bool {
        if !self.can_step() {
            return false;
        }
        self.cancel_tick();
        self.step = (self.step + 1).min(item_count(history));
        self.transition(self.settled());
        self.publish(history);
        true
    }

    /// Hide the last revealed item. Stops autoplay.
    pub fn previous(&mut self, history: &History<Arc<Document>>) -> bool {
        if !self.can_step() {
            return false;
        }
        self.cancel_tick();
        self.step = self.step.saturating_sub(1);
        self.transition(self.settled());
        self.publish(history);
        true
    }

    /// Leave the presentation: back to step zero, nothing playing.
    pub fn stop_presentation(&mut self, history: &History<Arc<Document>>) -> bool {
        if !self.can_step() {
            return false;
        }
        self.cancel_tick();
        self.step = 0;
        self.transition(PlaybackState::Ready);
        self.publish(history);
        true
    }

    /// Handle a fired autoplay tick. Stale or unexpected ids are ignored.
    pub fn on_timer(&mut self, history: &History<Arc<Document>>, id: TimerId) -> bool {
        if self.state != PlaybackState::Playing || self.pending != Some(id) {
            log::trace!("ignoring stale tick {id}");
            return false;
        }
        self.pending = None;
        let count = item_count(history);
        if self.step < count {
            self.step += 1;
            self.arm_tick();
        } else {
            self.step = 0;
            self.transition(PlaybackState::Ready);
        }
        self.publish(history);
        true
    }

    // ─── Sync ────────────────────────────────────────────────────────────

    /// Re-derive the playback state after the history moved underneath us
    /// (undo, redo, or a document load).
    pub fn resync(&mut self, history: &History<Arc<Document>>) {
        let sequence = &history.present().map.sequence;
        let count = sequence.len();
        let next = if sequence.is_recording {
            PlaybackState::Recording
        } else if count == 0 {
            PlaybackState::Idle
        } else if self.state == PlaybackState::Recording || self.state == PlaybackState::Idle {
            PlaybackState::Ready
        } else {
            self.state
        };
        if next != PlaybackState::Playing {
            self.cancel_tick();
        }
        if next == PlaybackState::Idle || next == PlaybackState::Recording {
            self.step = 0;
        }
        self.step = self.step.min(count);
        self.transition(next);
        self.publish(history);
    }

    /// Handle one message from the presenter surface.
    pub fn handle_message(&mut self, history: &History<Arc<Document>>, message: PresenterMessage) {
        match message {
            PresenterMessage::PresenterReady => self.publish(history),
            PresenterMessage::PresenterCommand { command } => {
                let handled = match command {
                    RemoteCommand::Play => self.play(history),
                    RemoteCommand::Pause => self.pause(history),
                    RemoteCommand::Next => self.next(history),
                    RemoteCommand::Previous => self.previous(history),
                };
                if !handled {
                    log::debug!("remote {command:?} ignored in {:?}", self.state);
                }
            }
            PresenterMessage::PresenterUpdate { .. } => {}
        }
    }

    /// Drain and handle everything the presenter surface sent.
    pub fn pump(&mut self, history: &History<Arc<Document>>) {
        let messages = match self.channel.as_mut() {
            Some(channel) => channel.drain(),
            None => return,
        };
        for message in messages {
            self.handle_message(history, message);
        }
    }

    /// Push the current state to the presenter surface, if connected.
    pub fn publish(&mut self, history: &History<Arc<Document>>) {
        let Some(channel) = self.channel.as_mut() else {
            return;
        };
        let message = PresenterMessage::PresenterUpdate {
            current_step: self.step,
            is_playing: self.state == PlaybackState::Playing,
            map: Box::new(history.present().map.clone()),
        };
        if let Err(e) = channel.publish(&message) {
            log::warn!("presenter update not delivered: {e}");
        }
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn can_step(&self) -> bool {
        matches!(
            self.state,
            PlaybackState::Ready | PlaybackState::Playing | PlaybackState::Scrubbing
        )
    }

    fn settled(&self) -> PlaybackState {
        if self.step == 0 {
            PlaybackState::Ready
        } else {
            PlaybackState::Scrubbing
        }
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            log::debug!("sequencer {:?} -> {next:?} at step {}", self.state, self.step);
            self.state = next;
        }
    }

    fn arm_tick(&mut self) {
        self.cancel_tick();
        self.pending = Some(self.timer.schedule(self.delay));
    }

    fn cancel_tick(&mut self) {
        if let Some(id) = self.pending.take() {
            self.timer.cancel(id);
        }
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.cancel_tick();
    }
}

fn item_count(history: &History<Arc<Document>>) -> usize {
    history.present().map.sequence.len()
}

fn commit_sequence(history: &mut History<Arc<Document>>, sequence: AnimationSequence) {
    let current = history.present();
    let next = Document {
        source: current.source.clone(),
        map: WardleyMap {
            sequence,
            ..current.map.clone()
        },
    };
    history.commit(Arc::new(next));
}
