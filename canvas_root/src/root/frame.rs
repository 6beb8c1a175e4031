//! Per-frame state and frame subscribers

use std::time::Duration;
use slotmap::{new_key_type, SlotMap};
use crate::surface::Size;

new_key_type! {
    /// Handle returned by `Root::subscribe`
    pub struct SubscriptionId;
}

/// State handed to frame subscribers before each draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Number of the frame about to be drawn, starting at 1
    pub frame: u64,
    /// Time since the previous frame as reported by the caller
    pub delta: Duration,
    /// Sum of all deltas so far
    pub elapsed: Duration,
    pub size: Size,
    pub pixel_ratio: f64,
}

/// Frame callback
pub type FrameCallback = Box<dyn FnMut(&FrameState) + Send>;

struct Subscriber {
    priority: i32,
    order: u64,
    callback: FrameCallback,
}

/// Callbacks run before each draw, lowest priority first, then in
/// subscription order
#[derive(Default)]
pub(crate) struct FrameSubscribers {
    slots: SlotMap<SubscriptionId, Subscriber>,
    next_order: u64,
}

impl FrameSubscribers {
    pub fn add(&mut self, priority: i32, callback: FrameCallback) -> SubscriptionId {
        let order = self.next_order;
        self.next_order += 1;
        self.slots.insert(Subscriber { priority, order, callback })
    }

    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        self.slots.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn notify(&mut self, state: &FrameState) {
        let mut ordered: Vec<(i32, u64, SubscriptionId)> = self
            .slots
            .iter()
            .map(|(id, s)| (s.priority, s.order, id))
            .collect();
        ordered.sort_unstable_by_key(|&(priority, order, _)| (priority, order));

        for (_, _, id) in ordered {
            if let Some(subscriber) = self.slots.get_mut(id) {
                (subscriber.callback)(state);
            }
        }
    }
}
