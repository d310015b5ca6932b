use std::collections::HashSet;

use chrono::Utc;
use tracing::warn;

use crate::catalog::Catalog;
use crate::error::LineupError;

use super::assignments::Assignments;
use super::types::{Performer, PerformerId, Slot};

/// The whole scheduling state: an ordered roster and the slot mapping.
///
/// The mapping is the only record of who plays where. It never names a
/// performer missing from the roster, so "scheduled" is exactly "present in
/// the mapping".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineup {
    roster: Vec<Performer>,
    assignments: Assignments,
}

impl Lineup {
    /// Builds a lineup from stored parts, dropping duplicate roster ids and
    /// schedule entries for performers that are not on the roster or for
    /// slots the catalog no longer lists
    pub fn new(catalog: &Catalog, roster: Vec<Performer>, mut assignments: Assignments) -> Self {
        let mut seen = HashSet::new();
        let roster: Vec<Performer> = roster
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();

        assignments.retain(|slot, id| {
            if !seen.contains(id) {
                warn!(performer = %id, %slot, "dropped schedule entry for performer missing from the roster");
                return false;
            }
            if let Err(error) = catalog.slot(&slot.stage, &slot.time) {
                warn!(performer = %id, %error, "dropped schedule entry outside the catalog");
                return false;
            }
            true
        });

        Self { roster, assignments }
    }

    /// First-run state: the catalog's seed roster, nothing scheduled
    pub fn seeded(catalog: &Catalog) -> Self {
        Self {
            roster: catalog.seed_roster(),
            assignments: Assignments::new(),
        }
    }

    pub fn roster(&self) -> &[Performer] {
        &self.roster
    }

    pub fn assignments(&self) -> &Assignments {
        &self.assignments
    }

    pub fn performer(&self, id: &PerformerId) -> Option<&Performer> {
        self.roster.iter().find(|p| &p.id == id)
    }

    /// Adds a performer under a fresh id. Blank names are ignored.
    pub fn add_performer(&mut self, name: &str) -> Option<PerformerId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = self.fresh_id();
        self.roster.push(Performer::new(id.clone(), name));
        Some(id)
    }

    /// Removes a performer and whatever slot it held
    pub fn remove_performer(&mut self, id: &PerformerId) -> Option<(Performer, Option<Slot>)> {
        let index = self.roster.iter().position(|p| &p.id == id)?;
        let performer = self.roster.remove(index);
        let freed = self.assignments.unassign(id);
        Some((performer, freed))
    }

    /// Moves a roster performer into `slot`, returning whoever it pushed out
    pub fn assign(&mut self, id: &PerformerId, slot: Slot) -> Result<Option<PerformerId>, LineupError> {
        if self.performer(id).is_none() {
            return Err(LineupError::UnknownPerformer(id.clone()));
        }
        Ok(self.assignments.assign(id.clone(), slot))
    }

    pub fn unassign(&mut self, id: &PerformerId) -> Option<Slot> {
        self.assignments.unassign(id)
    }

    pub fn clear_slot(&mut self, slot: &Slot) -> Option<PerformerId> {
        self.assignments.clear_slot(slot)
    }

    /// Discards everything and goes back to the seed roster
    pub fn reset(&mut self, catalog: &Catalog) {
        *self = Self::seeded(catalog);
    }

    pub fn slot_of(&self, id: &PerformerId) -> Option<&Slot> {
        self.assignments.slot_of(id)
    }

    pub fn occupant(&self, slot: &Slot) -> Option<&Performer> {
        self.assignments
            .occupant(slot)
            .and_then(|id| self.performer(id))
    }

    /// Scheduled performers in roster order, with their slot
    pub fn scheduled(&self) -> Vec<(&Performer, &Slot)> {
        self.roster
            .iter()
            .filter_map(|p| self.slot_of(&p.id).map(|slot| (p, slot)))
            .collect()
    }

    /// Performers without a slot, in roster order
    pub fn unscheduled(&self) -> Vec<&Performer> {
        self.roster
            .iter()
            .filter(|p| !self.assignments.contains(&p.id))
            .collect()
    }

    pub fn scheduled_count(&self) -> usize {
        self.assignments.len()
    }

    // Millisecond timestamp, bumped past any id already on the roster
    fn fresh_id(&self) -> PerformerId {
        let mut stamp = Utc::now().timestamp_millis();
        loop {
            let id = PerformerId::new(stamp.to_string());
            if self.performer(&id).is_none() {
                return id;
            }
            stamp += 1;
        }
    }
}
