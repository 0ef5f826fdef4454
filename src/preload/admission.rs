//! Preload Admission Set
//!
//! Tracks item ids with a measurement in flight. Capacity check and insert
//! happen under one lock, so no more than `max_in_flight` ids are ever
//! admitted. Slots release themselves on drop, which also covers aborted
//! tasks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::AbortHandle;

use crate::error::{HeightError, Result};

#[derive(Debug)]
struct InFlight {
    ticket: u64,
    abort: Option<AbortHandle>,
}

#[derive(Debug, Default)]
struct Inner {
    in_flight: HashMap<String, InFlight>,
    next_ticket: u64,
}

// == Admission Set ==
#[derive(Debug)]
pub struct AdmissionSet {
    inner: Mutex<Inner>,
    max_in_flight: usize,
}

impl AdmissionSet {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_in_flight: max_in_flight.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Try Admit ==
    /// Reserves a slot for `item_id`.
    ///
    /// Fails with `AlreadyInFlight` when the id is being measured elsewhere,
    /// or `AdmissionSaturated` when every slot is taken.
    pub fn try_admit(self: &Arc<Self>, item_id: &str) -> Result<AdmissionSlot> {
        let mut inner = self.lock();
        if inner.in_flight.contains_key(item_id) {
            return Err(HeightError::AlreadyInFlight(item_id.to_string()));
        }
        if inner.in_flight.len() >= self.max_in_flight {
            return Err(HeightError::AdmissionSaturated(item_id.to_string()));
        }

        inner.next_ticket += 1;
        let ticket = inner.next_ticket;
        inner
            .in_flight
            .insert(item_id.to_string(), InFlight { ticket, abort: None });

        Ok(AdmissionSlot {
            set: Arc::clone(self),
            item_id: item_id.to_string(),
            ticket,
        })
    }

    // == Attach ==
    /// Records the task measuring `item_id` so it can be cancelled.
    ///
    /// Ignored when the slot has already been released.
    pub fn attach(&self, item_id: &str, ticket: u64, abort: AbortHandle) {
        if let Some(entry) = self.lock().in_flight.get_mut(item_id) {
            if entry.ticket == ticket {
                entry.abort = Some(abort);
            }
        }
    }

    // == Cancel ==
    /// Aborts the in-flight measurement for `item_id`. Its slot is released
    /// when the aborted task drops it. Returns whether a task was signalled.
    pub fn cancel(&self, item_id: &str) -> bool {
        let abort = self
            .lock()
            .in_flight
            .get(item_id)
            .and_then(|e| e.abort.clone());
        // Abort outside the lock: the slot's drop takes it again.
        match abort {
            Some(abort) => {
                abort.abort();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.lock().in_flight.contains_key(item_id)
    }

    pub fn in_flight(&self) -> usize {
        self.lock().in_flight.len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    fn release(&self, item_id: &str, ticket: u64) {
        let mut inner = self.lock();
        if inner.in_flight.get(item_id).is_some_and(|e| e.ticket == ticket) {
            inner.in_flight.remove(item_id);
        }
    }
}

// == Admission Slot ==
/// Proof of admission for one item. Dropping it frees the slot.
#[derive(Debug)]
pub struct AdmissionSlot {
    set: Arc<AdmissionSet>,
    item_id: String,
    ticket: u64,
}

impl AdmissionSlot {
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

impl Drop for AdmissionSlot {
    fn drop(&mut self) {
        self.set.release(&self.item_id, self.ticket);
    }
}
