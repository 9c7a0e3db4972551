/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Page-level event bus between the pricing widget and the modal.
//!
//! The widget only emits [`TarifEvent`]s; the modal only consumes them. One
//! bus is created per page and handed to both sides, so neither holds a
//! reference to the other.
//!
//! # Example
//!
//! ```
//! use ccom_tarifs::bus::{TarifBus, TarifEvent};
//! use ccom_types::PlanDetailPayload;
//!
//! let bus = TarifBus::new();
//! let mut modal_side = bus.subscribe();
//!
//! bus.emit(TarifEvent::PlanChange(PlanDetailPayload::bare("cpro")));
//!
//! assert!(matches!(modal_side.try_next(), Some(TarifEvent::PlanChange(_))));
//! assert!(modal_side.try_next().is_none());
//! ```

use async_broadcast::{broadcast, InactiveReceiver, Receiver, Sender, TryRecvError};
use ccom_types::PlanDetailPayload;

/// Capacity of the bus. Older events are dropped on overflow.
const TARIF_BUS_CAPACITY: usize = 32;

/// Signals exchanged on the bus.
#[derive(Clone, Debug, PartialEq)]
pub enum TarifEvent {
    /// The active plan changed (also emitted once at mount).
    PlanChange(PlanDetailPayload),
    /// The visitor asked for more information about a plan.
    ModalOpen(PlanDetailPayload),
}

/// Broadcast channel shared by the components of one page.
#[derive(Clone)]
pub struct TarifBus {
    sender: Sender<TarifEvent>,
    // Keeps the channel open while nobody is subscribed.
    _idle: InactiveReceiver<TarifEvent>,
}

impl std::fmt::Debug for TarifBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TarifBus")
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

impl Default for TarifBus {
    fn default() -> Self {
        Self::new()
    }
}

impl TarifBus {
    pub fn new() -> Self {
        Self::with_capacity(TARIF_BUS_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (mut sender, receiver) = broadcast(capacity.max(1));
        sender.set_overflow(true);
        Self {
            sender,
            _idle: receiver.deactivate(),
        }
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&self) -> TarifSubscription {
        TarifSubscription {
            receiver: self.sender.new_receiver(),
        }
    }

    /// Deliver `event` to every current subscriber. Never blocks.
    pub fn emit(&self, event: TarifEvent) {
        if let Err(err) = self.sender.try_broadcast(event) {
            log::trace!("tarif event not delivered: {err}");
        }
    }
}

/// Receiving end of a [`TarifBus`].
pub struct TarifSubscription {
    receiver: Receiver<TarifEvent>,
}

impl TarifSubscription {
    /// Next pending event, if any. Overflow gaps are skipped.
    pub fn try_next(&mut self) -> Option<TarifEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Overflowed(missed)) => {
                    log::debug!("tarif subscriber lagged, {missed} events dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// All pending events in emission order.
    pub fn drain(&mut self) -> Vec<TarifEvent> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}
