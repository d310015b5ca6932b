use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::LineupError;
use crate::lineup::{GridView, Lineup, ListView, PerformerId, Slot};
use crate::store::{self, KeyValueStore};

/// Which projection the user is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Grid => f.write_str("grid"),
            ViewMode::List => f.write_str("list"),
        }
    }
}

/// A single user action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    AddPerformer { name: String },
    RemovePerformer { id: PerformerId },
    Assign { id: PerformerId, stage: String, time: String },
    Unassign { id: PerformerId },
    ClearSlot { stage: String, time: String },
    Reset { confirmed: bool },
    SetView { view: ViewMode },
}

/// What an action did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Added {
        id: PerformerId,
    },
    Removed {
        id: PerformerId,
        freed: Option<Slot>,
    },
    Assigned {
        id: PerformerId,
        slot: Slot,
        displaced: Option<PerformerId>,
    },
    Unassigned {
        id: PerformerId,
        slot: Slot,
    },
    SlotCleared {
        slot: Slot,
        performer: PerformerId,
    },
    Reset,
    ViewChanged {
        view: ViewMode,
    },
    /// Validated no-op; nothing changed and nothing was saved
    Ignored {
        reason: String,
    },
}

impl Outcome {
    fn ignored(reason: impl Into<String>) -> Self {
        Outcome::Ignored {
            reason: reason.into(),
        }
    }

    /// Whether the lineup changed and must be saved
    pub fn changed_lineup(&self) -> bool {
        !matches!(self, Outcome::Ignored { .. } | Outcome::ViewChanged { .. })
    }
}

/// Owns the live lineup and keeps the store in step with it.
///
/// The stored records are read once in [`Session::open`] and rewritten after
/// every action that changes the lineup.
pub struct Session<S> {
    catalog: Catalog,
    lineup: Lineup,
    view: ViewMode,
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn open(store: S, catalog: Catalog) -> Self {
        let lineup = store::load_lineup(&store, &catalog);
        info!(
            performers = lineup.roster().len(),
            scheduled = lineup.scheduled_count(),
            "lineup loaded"
        );
        Self {
            catalog,
            lineup,
            view: ViewMode::default(),
            store,
        }
    }

    /// Applies one action and persists the result
    pub fn apply(&mut self, action: Action) -> Result<Outcome, LineupError> {
        debug!(?action, "applying action");
        let outcome = self.transition(action)?;
        if outcome.changed_lineup() {
            self.persist();
        }
        Ok(outcome)
    }

    fn transition(&mut self, action: Action) -> Result<Outcome, LineupError> {
        let outcome = match action {
            Action::AddPerformer { name } => match self.lineup.add_performer(&name) {
                Some(id) => Outcome::Added { id },
                None => Outcome::ignored("performer name is blank"),
            },
            Action::RemovePerformer { id } => match self.lineup.remove_performer(&id) {
                Some((_, freed)) => Outcome::Removed { id, freed },
                None => Outcome::ignored(format!("no performer `{id}`")),
            },
            Action::Assign { id, stage, time } => {
                let slot = self.catalog.slot(&stage, &time)?;
                let displaced = self.lineup.assign(&id, slot.clone())?;
                Outcome::Assigned { id, slot, displaced }
            }
            Action::Unassign { id } => match self.lineup.unassign(&id) {
                Some(slot) => Outcome::Unassigned { id, slot },
                None => Outcome::ignored(format!("`{id}` is not scheduled")),
            },
            Action::ClearSlot { stage, time } => {
                let slot = self.catalog.slot(&stage, &time)?;
                match self.lineup.clear_slot(&slot) {
                    Some(performer) => Outcome::SlotCleared { slot, performer },
                    None => Outcome::ignored(format!("{slot} is already empty")),
                }
            }
            Action::Reset { confirmed: false } => Outcome::ignored("reset was not confirmed"),
            Action::Reset { confirmed: true } => {
                if let Err(error) = store::clear_lineup(&mut self.store) {
                    warn!(%error, "failed to clear stored lineup");
                }
                self.lineup.reset(&self.catalog);
                info!("lineup reset to seed roster");
                Outcome::Reset
            }
            Action::SetView { view } => {
                self.view = view;
                Outcome::ViewChanged { view }
            }
        };
        Ok(outcome)
    }

    // Saving is best effort: a failure loses the latest action on restart
    // but never the in-memory state.
    fn persist(&mut self) {
        if let Err(error) = store::save_lineup(&mut self.store, &self.lineup) {
            warn!(%error, "failed to save lineup");
        }
    }

    pub fn lineup(&self) -> &Lineup {
        &self.lineup
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn grid(&self) -> GridView {
        GridView::build(&self.catalog, &self.lineup)
    }

    pub fn list(&self) -> ListView {
        ListView::build(&self.lineup)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, ARTISTS_KEY, SCHEDULE_KEY};

    fn session() -> Session<MemoryStore> {
        Session::open(MemoryStore::new(), Catalog::default())
    }

    fn assign(id: &str, stage: &str, time: &str) -> Action {
        Action::Assign {
            id: id.into(),
            stage: stage.into(),
            time: time.into(),
        }
    }

    #[test]
    fn changes_are_saved_after_each_action() {
        let mut session = session();
        assert_eq!(session.store().get(SCHEDULE_KEY).unwrap(), None);

        session.apply(assign("main-0", "Geico Stage", "1:00 PM")).unwrap();

        let reopened = Session::open(session.into_store(), Catalog::default());
        let slot = Slot::new("Geico Stage", "1:00 PM");
        assert_eq!(reopened.lineup().occupant(&slot).unwrap().name, "3OH!3");
    }

    #[test]
    fn ignored_actions_do_not_touch_the_store() {
        let mut session = session();

        let outcome = session
            .apply(Action::AddPerformer { name: "  ".into() })
            .unwrap();

        assert!(matches!(outcome, Outcome::Ignored { .. }));
        assert_eq!(session.store().get(ARTISTS_KEY).unwrap(), None);
    }

    #[test]
    fn unknown_labels_are_rejected_without_mutation() {
        let mut session = session();

        let err = session
            .apply(assign("main-0", "Moon Stage", "1:00 PM"))
            .unwrap_err();

        assert_eq!(err, LineupError::UnknownStage("Moon Stage".into()));
        assert_eq!(session.lineup().scheduled_count(), 0);
    }

    #[test]
    fn assign_reports_the_displaced_performer() {
        let mut session = session();
        session.apply(assign("main-0", "Geico Stage", "1:00 PM")).unwrap();

        let outcome = session.apply(assign("main-1", "Geico Stage", "1:00 PM")).unwrap();

        assert_eq!(
            outcome,
            Outcome::Assigned {
                id: "main-1".into(),
                slot: Slot::new("Geico Stage", "1:00 PM"),
                displaced: Some("main-0".into()),
            }
        );
    }

    #[test]
    fn clear_slot_frees_whoever_holds_it() {
        let mut session = session();
        session.apply(assign("main-5", "Ghost Stage", "7:00 PM")).unwrap();

        let outcome = session
            .apply(Action::ClearSlot {
                stage: "Ghost Stage".into(),
                time: "7:00 PM".into(),
            })
            .unwrap();

        assert!(matches!(outcome, Outcome::SlotCleared { .. }));
        assert_eq!(session.lineup().scheduled_count(), 0);
    }

    #[test]
    fn reset_needs_confirmation() {
        let mut session = session();
        session.apply(Action::AddPerformer { name: "Extra".into() }).unwrap();
        session.apply(assign("main-0", "Geico Stage", "1:00 PM")).unwrap();
        let before = session.lineup().clone();

        let outcome = session.apply(Action::Reset { confirmed: false }).unwrap();
        assert!(matches!(outcome, Outcome::Ignored { .. }));
        assert_eq!(session.lineup(), &before);

        session.apply(Action::Reset { confirmed: true }).unwrap();
        assert_eq!(session.lineup(), &Lineup::seeded(&Catalog::default()));

        let reopened = Session::open(session.into_store(), Catalog::default());
        assert_eq!(reopened.lineup(), &Lineup::seeded(&Catalog::default()));
    }

    #[test]
    fn view_mode_toggles_without_saving() {
        let mut session = session();
        assert_eq!(session.view(), ViewMode::Grid);

        session
            .apply(Action::SetView {
                view: session.view().toggled(),
            })
            .unwrap();

        assert_eq!(session.view(), ViewMode::List);
        assert_eq!(session.store().get(ARTISTS_KEY).unwrap(), None);
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: Action = serde_json::from_str(
            r#"{"action":"assign","id":"main-3","stage":"Geico Stage","time":"2:00 PM"}"#,
        )
        .unwrap();
        assert_eq!(action, assign("main-3", "Geico Stage", "2:00 PM"));

        let action: Action = serde_json::from_str(r#"{"action":"set_view","view":"list"}"#).unwrap();
        assert_eq!(action, Action::SetView { view: ViewMode::List });
    }
}
