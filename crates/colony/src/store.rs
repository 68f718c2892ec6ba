//! The authoritative colony cache.
//!
//! Mutated only by whole-snapshot replacement, delta merges and optimistic player orders.
//! Listeners run synchronously in registration order; a listener may unsubscribe itself
//! (or any other listener) while being notified.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::model::{Colony, Fleet, FleetOrder};
use crate::patch::ColonyPatch;

type Listener = RefCell<Box<dyn FnMut(&[Colony])>>;

#[derive(Default)]
struct ListenerList {
    next_id: u64,
    entries: Vec<(u64, Rc<Listener>)>,
}

impl ListenerList {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }
}

/// Handle returned by [`ColonyStore::subscribe`].
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    list: Weak<RefCell<ListenerList>>,
}

impl Subscription {
    /// Remove the listener. Idempotent; safe from inside any listener.
    pub fn unsubscribe(&self) {
        if let Some(list) = self.list.upgrade() {
            list.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.list
            .upgrade()
            .map(|list| list.borrow().contains(self.id))
            .unwrap_or(false)
    }
}

#[derive(Default)]
pub struct ColonyStore {
    colonies: Vec<Colony>,
    active: Option<String>,
    listeners: Rc<RefCell<ListenerList>>,
}

impl ColonyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colonies(&self) -> &[Colony] {
        &self.colonies
    }

    pub fn colony(&self, id: &str) -> Option<&Colony> {
        self.colonies.iter().find(|c| c.id == id)
    }

    /// Locate a fleet and its owning colony.
    pub fn find_fleet(&self, fleet_id: &str) -> Option<(&Colony, &Fleet)> {
        self.colonies
            .iter()
            .find_map(|c| c.fleet(fleet_id).map(|f| (c, f)))
    }

    /// Overwrite the whole collection and notify.
    pub fn replace_all(&mut self, colonies: Vec<Colony>) {
        self.colonies = colonies;
        if let Some(active) = &self.active {
            if self.colony(active).is_none() {
                log::debug!("Active colony {} left the snapshot; clearing selection", active);
                self.active = None;
            }
        }
        self.notify();
    }

    /// Merge partial patches. Unknown ids are skipped; notifies only if something applied.
    pub fn merge_delta(&mut self, changes: &[ColonyPatch]) -> usize {
        let mut applied = 0;
        for patch in changes {
            match self.colonies.iter_mut().find(|c| c.id == patch.id) {
                Some(colony) => {
                    *colony = patch.merged(colony);
                    applied += 1;
                }
                None => log::debug!("Delta for unknown colony {} skipped", patch.id),
            }
        }
        if applied > 0 {
            self.notify();
        }
        applied
    }

    /// Apply a player order optimistically. Returns false if the fleet is unknown.
    pub fn set_fleet_order(&mut self, fleet_id: &str, order: Option<FleetOrder>) -> bool {
        let fleet = self
            .colonies
            .iter_mut()
            .find_map(|c| c.fleet_mut(fleet_id));
        match fleet {
            Some(fleet) => {
                fleet.order = order;
                self.notify();
                true
            }
            None => false,
        }
    }

    /// Select a colony. Returns false (and keeps the old selection) if the id is unknown.
    pub fn set_active(&mut self, id: &str) -> bool {
        if self.colony(id).is_some() {
            self.active = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// The selected colony as currently stored; merges are visible immediately.
    pub fn active(&self) -> Option<&Colony> {
        self.active.as_deref().and_then(|id| self.colony(id))
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&[Colony]) + 'static) -> Subscription {
        let mut list = self.listeners.borrow_mut();
        let id = list.next_id;
        list.next_id += 1;
        list.entries
            .push((id, Rc::new(RefCell::new(Box::new(listener)))));
        Subscription {
            id,
            list: Rc::downgrade(&self.listeners),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    fn notify(&self) {
        // Iterate a copy so listeners can unsubscribe mid-notification.
        let snapshot: Vec<(u64, Rc<Listener>)> = self.listeners.borrow().entries.clone();
        for (id, listener) in snapshot {
            if !self.listeners.borrow().contains(id) {
                continue;
            }
            match listener.try_borrow_mut() {
                Ok(mut callback) => {
                    let callback: &mut dyn FnMut(&[Colony]) = &mut **callback;
                    callback(&self.colonies);
                }
                Err(_) => log::warn!("Listener {} is already running; skipped", id),
            }
        }
    }
}
