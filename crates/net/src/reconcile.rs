//! Applies inbound server messages to the colony store.

use colony::{ActionLog, ColonyStore};

use crate::protocol::{parse_server_message, GameWinner, ServerMessage};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PlayPhase {
    #[default]
    Playing,
    /// Normal play is suspended until the next snapshot.
    GameOver {
        winner: Option<GameWinner>,
        restart_at: Option<i64>,
    },
}

/// What one inbound message did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Snapshot { colonies: usize },
    Delta { applied: usize },
    Action,
    GameOver,
    /// Malformed or unknown; dropped.
    Ignored,
}

#[derive(Debug, Default)]
pub struct Reconciler {
    actions: ActionLog,
    phase: PlayPhase,
    selection_user_initiated: bool,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and apply one text frame. Bad input is logged and ignored.
    pub fn handle_text(&mut self, text: &str, store: &mut ColonyStore) -> Applied {
        match parse_server_message(text) {
            Ok(message) => self.apply(message, store),
            Err(e) => {
                log::warn!("Dropping server message: {}", e);
                Applied::Ignored
            }
        }
    }

    pub fn apply(&mut self, message: ServerMessage, store: &mut ColonyStore) -> Applied {
        match message {
            ServerMessage::Snapshot {
                colonies,
                action_events,
            } => {
                let count = colonies.len();
                store.replace_all(colonies);
                if let Some(events) = action_events {
                    self.actions.replace(events);
                }
                if self.is_game_over() {
                    log::info!("New round started");
                }
                self.phase = PlayPhase::Playing;
                self.selection_user_initiated = true;
                log::debug!("Snapshot: {} colonies", count);
                Applied::Snapshot { colonies: count }
            }
            ServerMessage::Update { changes } => {
                let applied = store.merge_delta(&changes);
                if applied < changes.len() {
                    log::debug!(
                        "Delta: skipped {} patches for unknown colonies",
                        changes.len() - applied
                    );
                }
                Applied::Delta { applied }
            }
            ServerMessage::Action { event } => {
                log::debug!("Action [{}] {}", event.colony_name, event.message);
                self.actions.push(event);
                Applied::Action
            }
            ServerMessage::GameOver {
                winner,
                action_history,
                restart_at,
            } => {
                log::info!(
                    "Game over; winner {}",
                    winner.as_ref().map(GameWinner::id).unwrap_or("none")
                );
                self.actions.replace(action_history);
                self.phase = PlayPhase::GameOver { winner, restart_at };
                Applied::GameOver
            }
        }
    }

    pub fn actions(&self) -> &ActionLog {
        &self.actions
    }

    pub fn phase(&self) -> &PlayPhase {
        &self.phase
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, PlayPhase::GameOver { .. })
    }

    /// True once after each snapshot: the next selection change should be treated as the
    /// player's own rather than an automatic follow.
    pub fn take_user_initiated_selection(&mut self) -> bool {
        std::mem::take(&mut self.selection_user_initiated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colony_json(id: &str, name: &str, residents: u32) -> String {
        format!(
            r##"{{
                "id": "{id}", "name": "{name}", "residents": {residents}, "color": "#ffffff",
                "planet": {{
                    "position": {{"x": 0, "y": 0, "z": 0}}, "scale": 1, "rot": {{"x": 0, "y": 0, "z": 0}},
                    "planetModelName": "Planet_A", "planetMainBase": {{"x": 0, "y": 0}},
                    "planetNaturalResources": {{"oil": 1, "steel": 1, "water": 1, "temperature": 10}}
                }},
                "colonyLevel": "Settlement"
            }}"##
        )
    }

    fn snapshot(colonies: &[String]) -> String {
        format!(r#"{{"type":"snapshot","colonies":[{}]}}"#, colonies.join(","))
    }

    fn event(id: &str) -> String {
        format!(
            r#"{{"id":"{id}","timestamp":1,"colonyId":"c1","colonyName":"A","message":"m","type":"attack"}}"#
        )
    }

    #[test]
    fn reconcile_snapshot_replaces_store() {
        let mut store = ColonyStore::new();
        let mut rec = Reconciler::new();
        let applied = rec.handle_text(
            &snapshot(&[colony_json("c1", "A", 10), colony_json("c2", "B", 20)]),
            &mut store,
        );
        assert_eq!(applied, Applied::Snapshot { colonies: 2 });
        assert_eq!(store.colonies().len(), 2);
        assert!(rec.take_user_initiated_selection());
        assert!(!rec.take_user_initiated_selection());
    }

    #[test]
    fn reconcile_delta_skips_unknown_colony() {
        let mut store = ColonyStore::new();
        let mut rec = Reconciler::new();
        rec.handle_text(&snapshot(&[colony_json("c1", "A", 10)]), &mut store);
        let applied = rec.handle_text(
            r#"{"type":"update","changes":[{"id":"c1","residents":11},{"id":"zz","residents":5}]}"#,
            &mut store,
        );
        assert_eq!(applied, Applied::Delta { applied: 1 });
        assert_eq!(store.colony("c1").unwrap().residents, 11);
        assert_eq!(store.colonies().len(), 1);
    }

    #[test]
    fn reconcile_malformed_is_ignored() {
        let mut store = ColonyStore::new();
        let mut rec = Reconciler::new();
        rec.handle_text(&snapshot(&[colony_json("c1", "A", 10)]), &mut store);
        assert_eq!(rec.handle_text("{oops", &mut store), Applied::Ignored);
        assert_eq!(rec.handle_text(r#"{"type":"chat"}"#, &mut store), Applied::Ignored);
        assert_eq!(store.colony("c1").unwrap().residents, 10);
    }

    #[test]
    fn reconcile_action_appends_to_log() {
        let mut store = ColonyStore::new();
        let mut rec = Reconciler::new();
        let text = format!(r#"{{"type":"action","event":{}}}"#, event("e1"));
        assert_eq!(rec.handle_text(&text, &mut store), Applied::Action);
        assert_eq!(rec.actions().len(), 1);
        assert_eq!(rec.actions().latest().unwrap().id, "e1");
    }

    #[test]
    fn reconcile_game_over_until_next_snapshot() {
        let mut store = ColonyStore::new();
        let mut rec = Reconciler::new();
        let text = format!(
            r#"{{"type":"game_over","winner":"c1","actionHistory":[{},{}],"restartAt":99}}"#,
            event("e1"),
            event("e2")
        );
        assert_eq!(rec.handle_text(&text, &mut store), Applied::GameOver);
        assert!(rec.is_game_over());
        assert_eq!(rec.actions().len(), 2);
        match rec.phase() {
            PlayPhase::GameOver { winner, restart_at } => {
                assert_eq!(winner.as_ref().unwrap().id(), "c1");
                assert_eq!(*restart_at, Some(99));
            }
            PlayPhase::Playing => panic!("still playing"),
        }

        rec.handle_text(&snapshot(&[colony_json("c1", "A", 10)]), &mut store);
        assert_eq!(*rec.phase(), PlayPhase::Playing);
    }

    #[test]
    fn reconcile_snapshot_events_replace_log() {
        let mut store = ColonyStore::new();
        let mut rec = Reconciler::new();
        let text = format!(r#"{{"type":"action","event":{}}}"#, event("old"));
        rec.handle_text(&text, &mut store);
        let text = format!(
            r#"{{"type":"snapshot","colonies":[],"actionEvents":[{}]}}"#,
            event("new")
        );
        rec.handle_text(&text, &mut store);
        assert_eq!(rec.actions().len(), 1);
        assert_eq!(rec.actions().latest().unwrap().id, "new");
    }
}
