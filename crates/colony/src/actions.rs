//! Append-only action-event log, capped for display.

use std::collections::VecDeque;

use crate::model::ActionEvent;

/// Entries kept for display; older ones are evicted first.
pub const ACTION_LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct ActionLog {
    events: VecDeque<ActionEvent>,
    capacity: usize,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::with_capacity(ACTION_LOG_CAPACITY)
    }
}

impl ActionLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, event: ActionEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Replace the log with a full history, keeping only the newest entries.
    pub fn replace(&mut self, history: Vec<ActionEvent>) {
        self.events.clear();
        let skip = history.len().saturating_sub(self.capacity);
        self.events.extend(history.into_iter().skip(skip));
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ActionEvent> {
        self.events.iter()
    }

    pub fn latest(&self) -> Option<&ActionEvent> {
        self.events.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActionKind;

    fn event(n: i64) -> ActionEvent {
        ActionEvent {
            id: format!("e{n}"),
            timestamp: n,
            colony_id: "c".into(),
            colony_name: "Alpha".into(),
            message: format!("event {n}"),
            kind: ActionKind::General,
        }
    }

    #[test]
    fn action_log_evicts_oldest() {
        let mut log = ActionLog::with_capacity(3);
        for n in 0..5 {
            log.push(event(n));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.iter().next().unwrap().timestamp, 2);
        assert_eq!(log.latest().unwrap().timestamp, 4);
    }

    #[test]
    fn action_log_replace_keeps_newest() {
        let mut log = ActionLog::with_capacity(2);
        log.push(event(99));
        log.replace((0..4).map(event).collect());
        let stamps: Vec<i64> = log.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![2, 3]);
    }
}
