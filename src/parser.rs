use std::collections::HashSet;
use std::io::Read;

use csv::ReaderBuilder;
use tracing::warn;

use crate::session::{Action, Outcome, Session};
use crate::store::KeyValueStore;

/// One performer read from a roster CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub name: String,
    pub stage: Option<String>,
    pub time: Option<String>,
}

/// Counts reported after an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub assigned: usize,
    pub skipped: usize,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Reads a roster CSV.
///
/// The header must have a column whose name contains `name` (the first
/// column is used otherwise); `stage` and `time` columns are optional.
/// Rows with a blank name are dropped.
pub fn load_roster_csv<R: Read>(reader: R) -> Result<Vec<RosterRow>, csv::Error> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = reader.headers()?.clone();
    let find = |needle: &str| {
        headers
            .iter()
            .position(|h| h.trim().to_lowercase().contains(needle))
    };
    let name_col = find("name").unwrap_or(0);
    let stage_col = find("stage");
    let time_col = find("time");

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let Some(name) = non_empty(record.get(name_col)) else {
            continue;
        };
        rows.push(RosterRow {
            name,
            stage: non_empty(stage_col.and_then(|c| record.get(c))),
            time: non_empty(time_col.and_then(|c| record.get(c))),
        });
    }
    Ok(rows)
}

/// Adds every row to the session, booking the ones that name a valid slot.
/// Rows whose slot is unknown are still added, just left unscheduled. When
/// two rows name the same slot the later one wins, and `assigned` counts
/// only the imported performers still booked at the end.
pub fn import_roster<S: KeyValueStore>(session: &mut Session<S>, rows: Vec<RosterRow>) -> ImportSummary {
    let mut summary = ImportSummary::default();
    let mut booked = HashSet::new();

    for row in rows {
        let id = match session.apply(Action::AddPerformer { name: row.name.clone() }) {
            Ok(Outcome::Added { id }) => id,
            _ => {
                summary.skipped += 1;
                continue;
            }
        };
        summary.added += 1;

        let (Some(stage), Some(time)) = (row.stage, row.time) else {
            continue;
        };
        match session.apply(Action::Assign { id: id.clone(), stage, time }) {
            Ok(Outcome::Assigned { slot, displaced, .. }) => {
                booked.insert(id);
                if let Some(previous) = displaced {
                    warn!(name = %row.name, displaced = %previous, %slot, "imported performer took an already booked slot");
                    booked.remove(&previous);
                }
            }
            Ok(_) => {}
            Err(error) => warn!(name = %row.name, %error, "imported performer left unscheduled"),
        }
    }

    summary.assigned = booked.len();
    summary
}
