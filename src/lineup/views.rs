use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

use super::state::Lineup;
use super::types::{Performer, PerformerId, Slot};

/// A performer with its slot looked up from the mapping. This is also the
/// shape of each entry in the persisted `warped-artists` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformerView {
    pub id: PerformerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl PerformerView {
    pub fn of(lineup: &Lineup, performer: &Performer) -> Self {
        let slot = lineup.slot_of(&performer.id);
        Self {
            id: performer.id.clone(),
            name: performer.name.clone(),
            group: performer.group.clone(),
            stage: slot.map(|s| s.stage.clone()),
            time: slot.map(|s| s.time.clone()),
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.stage.is_some() && self.time.is_some()
    }
}

impl From<PerformerView> for Performer {
    fn from(view: PerformerView) -> Self {
        Performer {
            id: view.id,
            name: view.name,
            group: view.group,
        }
    }
}

/// Occupant shown inside a grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub id: PerformerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub time: String,
    /// One entry per stage, in catalog order
    pub cells: Vec<Option<CellView>>,
}

/// Stage x time matrix plus the pool of performers still to place
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridView {
    pub stages: Vec<String>,
    pub rows: Vec<GridRow>,
    pub unscheduled: Vec<CellView>,
    pub scheduled_count: usize,
    pub total: usize,
}

impl GridView {
    pub fn build(catalog: &Catalog, lineup: &Lineup) -> Self {
        let rows = catalog
            .time_slots
            .iter()
            .map(|time| GridRow {
                time: time.clone(),
                cells: catalog
                    .stages
                    .iter()
                    .map(|stage| {
                        let slot = Slot::new(stage.as_str(), time.as_str());
                        lineup.occupant(&slot).map(|p| CellView {
                            id: p.id.clone(),
                            name: p.name.clone(),
                        })
                    })
                    .collect(),
            })
            .collect();

        GridView {
            stages: catalog.stages.clone(),
            rows,
            unscheduled: lineup
                .unscheduled()
                .into_iter()
                .map(|p| CellView {
                    id: p.id.clone(),
                    name: p.name.clone(),
                })
                .collect(),
            scheduled_count: lineup.scheduled_count(),
            total: lineup.roster().len(),
        }
    }
}

/// Flat roster split into scheduled and unscheduled performers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub scheduled: Vec<PerformerView>,
    pub unscheduled: Vec<PerformerView>,
}

impl ListView {
    pub fn build(lineup: &Lineup) -> Self {
        let (scheduled, unscheduled): (Vec<_>, Vec<_>) = lineup
            .roster()
            .iter()
            .map(|p| PerformerView::of(lineup, p))
            .partition(PerformerView::is_scheduled);
        ListView {
            scheduled,
            unscheduled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_places_occupants_under_their_stage() {
        let catalog = Catalog::default();
        let mut lineup = Lineup::seeded(&catalog);
        lineup
            .assign(&"main-2".into(), catalog.slot("Geico Stage", "12:00 PM").unwrap())
            .unwrap();

        let grid = GridView::build(&catalog, &lineup);

        assert_eq!(grid.rows.len(), 12);
        assert_eq!(grid.rows[1].time, "12:00 PM");
        let cell = grid.rows[1].cells[2].as_ref().unwrap();
        assert_eq!(cell.name, "A Day To Remember");
        assert_eq!(grid.rows[0].cells.iter().flatten().count(), 0);
        assert_eq!(grid.scheduled_count, 1);
        assert_eq!(grid.unscheduled.len(), grid.total - 1);
    }

    #[test]
    fn list_reports_derived_stage_and_time() {
        let catalog = Catalog::default();
        let mut lineup = Lineup::seeded(&catalog);
        lineup
            .assign(&"unplugged-1".into(), catalog.slot("Unplugged Stage", "6:00 PM").unwrap())
            .unwrap();

        let list = ListView::build(&lineup);

        assert_eq!(list.scheduled.len(), 1);
        let beebs = &list.scheduled[0];
        assert_eq!(beebs.name, "Beebs");
        assert_eq!(beebs.stage.as_deref(), Some("Unplugged Stage"));
        assert_eq!(beebs.time.as_deref(), Some("6:00 PM"));
        assert!(list.unscheduled.iter().all(|p| p.stage.is_none() && p.time.is_none()));
    }
}
