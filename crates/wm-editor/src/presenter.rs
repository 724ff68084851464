//! Cross-surface presenter sync.
//!
//! The editor publishes a [`PresenterMessage::PresenterUpdate`] whenever
//! its presentation state changes; a presenter surface announces itself
//! with `PresenterReady` and sends transport commands back. Messages travel
//! as MessagePack frames so the channel only needs to move bytes.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use wm_core::{SequenceItem, WardleyMap};

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("failed to encode presenter message: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode presenter message: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("presenter channel closed")]
    Closed,
}

/// Transport commands a presenter surface may send back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteCommand {
    Play,
    Pause,
    Next,
    Previous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PresenterMessage {
    #[serde(rename_all = "camelCase")]
    PresenterUpdate {
        current_step: usize,
        is_playing: bool,
        map: Box<WardleyMap>,
    },
    PresenterReady,
    PresenterCommand { command: RemoteCommand },
}

impl PresenterMessage {
    pub fn encode(&self) -> Result<Vec<u8>, ChannelError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ChannelError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// A bidirectional, same-origin message pipe between two surfaces.
///
/// Receiving is poll based: the owner drains whatever has arrived when it
/// is ready to handle it.
pub trait PresenterChannel {
    fn publish(&mut self, message: &PresenterMessage) -> Result<(), ChannelError>;

    /// Take every message received since the last call, oldest first.
    fn drain(&mut self) -> Vec<PresenterMessage>;
}

type Queue = Rc<RefCell<VecDeque<Vec<u8>>>>;

/// In-process channel; [`LoopbackChannel::pair`] yields two connected ends.
#[derive(Debug)]
pub struct LoopbackChannel {
    outbox: Queue,
    inbox: Queue,
}

impl LoopbackChannel {
    pub fn pair() -> (Self, Self) {
        let a: Queue = Rc::default();
        let b: Queue = Rc::default();
        (
            Self {
                outbox: Rc::clone(&a),
                inbox: Rc::clone(&b),
            },
            Self { outbox: b, inbox: a },
        )
    }
}

impl PresenterChannel for LoopbackChannel {
    fn publish(&mut self, message: &PresenterMessage) -> Result<(), ChannelError> {
        // The peer holds the only other reference to our outbox.
        if Rc::strong_count(&self.outbox) < 2 {
            return Err(ChannelError::Closed);
        }
        let frame = message.encode()?;
        self.outbox.borrow_mut().push_back(frame);
        Ok(())
    }

    fn drain(&mut self) -> Vec<PresenterMessage> {
        let frames: Vec<Vec<u8>> = self.inbox.borrow_mut().drain(..).collect();
        frames
            .iter()
            .filter_map(|frame| match PresenterMessage::decode(frame) {
                Ok(msg) => Some(msg),
                Err(e) => {
                    log::warn!("dropping undecodable presenter frame: {e}");
                    None
                }
            })
            .collect()
    }
}

// ─── Presenter surface ───────────────────────────────────────────────────

/// Last presentation state received from the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenterView {
    pub current_step: usize,
    pub is_playing: bool,
    pub map: WardleyMap,
}

/// The receiving surface: mirrors the editor's state and drives it remotely.
pub struct RemotePresenter<C: PresenterChannel> {
    channel: C,
    view: Option<PresenterView>,
}

impl<C: PresenterChannel> RemotePresenter<C> {
    /// Connect and announce readiness so the editor pushes its state.
    pub fn connect(mut channel: C) -> Result<Self, ChannelError> {
        channel.publish(&PresenterMessage::PresenterReady)?;
        Ok(Self {
            channel,
            view: None,
        })
    }

    /// Apply pending updates. Returns `true` if the view changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        for message in self.channel.drain() {
            if let PresenterMessage::PresenterUpdate {
                current_step,
                is_playing,
                map,
            } = message
            {
                let next = PresenterView {
                    current_step,
                    is_playing,
                    map: *map,
                };
                if self.view.as_ref() != Some(&next) {
                    self.view = Some(next);
                    changed = true;
                }
            }
        }
        changed
    }

    pub fn view(&self) -> Option<&PresenterView> {
        self.view.as_ref()
    }

    pub fn send(&mut self, command: RemoteCommand) -> Result<(), ChannelError> {
        self.channel
            .publish(&PresenterMessage::PresenterCommand { command })
    }

    /// The item revealed most recently, if any step has been taken.
    pub fn current_item(&self) -> Option<SequenceItem> {
        let view = self.view.as_ref()?;
        let index = view.current_step.checked_sub(1)?;
        ordered_items(&view.map).get(index).cloned()
    }

    /// The item the next step would reveal.
    pub fn next_item(&self) -> Option<SequenceItem> {
        let view = self.view.as_ref()?;
        ordered_items(&view.map).get(view.current_step).cloned()
    }
}

fn ordered_items(map: &WardleyMap) -> Vec<SequenceItem> {
    let mut items = map.sequence.items.clone();
    items.sort_by_key(|item| item.order);
    items
}
