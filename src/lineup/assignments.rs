use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{PerformerId, Slot};

/// One persisted schedule entry, in the shape of the `warped-schedule` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotEntry {
    pub stage: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<PerformerId>,
}

/// The authoritative slot -> performer mapping.
///
/// Holds at most one performer per slot and at most one slot per performer.
/// Every mutation goes through [`Assignments::assign`] or a removal, so the
/// two properties hold for any sequence of calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SlotEntry>", into = "Vec<SlotEntry>")]
pub struct Assignments {
    by_slot: BTreeMap<Slot, PerformerId>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `performer` into `slot`.
    ///
    /// The performer leaves whatever slot it held before, and whoever held
    /// `slot` is pushed out. Returns the pushed-out performer, if any.
    pub fn assign(&mut self, performer: PerformerId, slot: Slot) -> Option<PerformerId> {
        self.unassign(&performer);
        let displaced = self.by_slot.remove(&slot);
        self.by_slot.insert(slot, performer);
        displaced
    }

    /// Frees the slot held by `performer`, returning it. No-op when the
    /// performer is not scheduled.
    pub fn unassign(&mut self, performer: &PerformerId) -> Option<Slot> {
        let slot = self.slot_of(performer)?.clone();
        self.by_slot.remove(&slot);
        Some(slot)
    }

    /// Empties `slot`, returning its previous occupant
    pub fn clear_slot(&mut self, slot: &Slot) -> Option<PerformerId> {
        self.by_slot.remove(slot)
    }

    pub fn occupant(&self, slot: &Slot) -> Option<&PerformerId> {
        self.by_slot.get(slot)
    }

    pub fn slot_of(&self, performer: &PerformerId) -> Option<&Slot> {
        self.by_slot
            .iter()
            .find(|(_, id)| *id == performer)
            .map(|(slot, _)| slot)
    }

    pub fn contains(&self, performer: &PerformerId) -> bool {
        self.slot_of(performer).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Slot, &PerformerId)> {
        self.by_slot.iter()
    }

    pub fn len(&self) -> usize {
        self.by_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_slot.clear();
    }

    /// Keeps only the entries for which `keep` returns true
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Slot, &PerformerId) -> bool,
    {
        self.by_slot.retain(|slot, id| keep(slot, id));
    }
}

impl From<Vec<SlotEntry>> for Assignments {
    /// Replays stored entries through the assignment rule, so a record that
    /// double-books a slot or a performer loads with the last entry winning.
    fn from(entries: Vec<SlotEntry>) -> Self {
        let mut assignments = Self::new();
        for entry in entries {
            if let Some(id) = entry.artist_id {
                assignments.assign(id, Slot::new(entry.stage, entry.time));
            }
        }
        assignments
    }
}

impl From<Assignments> for Vec<SlotEntry> {
    fn from(assignments: Assignments) -> Self {
        assignments
            .by_slot
            .into_iter()
            .map(|(slot, id)| SlotEntry {
                stage: slot.stage,
                time: slot.time,
                artist_id: Some(id),
            })
            .collect()
    }
}
