use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::catalog::Catalog;
use crate::lineup::{GridView, Lineup, ListView, Slot};

const EMPTY_CELL: &str = "[EMPTY]";

/// Renders the stage x time grid as a plain-text table
pub fn render_grid(grid: &GridView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "WARPED TOUR  {}/{} scheduled", grid.scheduled_count, grid.total);

    let time_width = grid
        .rows
        .iter()
        .map(|r| r.time.chars().count())
        .max()
        .unwrap_or(0)
        .max("Time".chars().count());
    // Each column is as wide as its stage name or its longest occupant
    let widths: Vec<usize> = grid
        .stages
        .iter()
        .enumerate()
        .map(|(col, stage)| {
            grid.rows
                .iter()
                .filter_map(|r| r.cells[col].as_ref().map(|c| c.name.chars().count()))
                .max()
                .unwrap_or(0)
                .max(stage.chars().count())
                .max(EMPTY_CELL.len())
        })
        .collect();

    let _ = write!(out, "{:<time_width$}", "Time");
    for (stage, &width) in grid.stages.iter().zip(&widths) {
        let _ = write!(out, " | {:<width$}", stage);
    }
    out.push('\n');

    for row in &grid.rows {
        let _ = write!(out, "{:<time_width$}", row.time);
        for (cell, &width) in row.cells.iter().zip(&widths) {
            let name = cell.as_ref().map(|c| c.name.as_str()).unwrap_or("");
            let _ = write!(out, " | {:<width$}", name);
        }
        out.push('\n');
    }

    if !grid.unscheduled.is_empty() {
        let _ = writeln!(out, "\nUnscheduled ({}):", grid.unscheduled.len());
        for performer in &grid.unscheduled {
            let _ = writeln!(out, "  {} ({})", performer.name, performer.id);
        }
    }
    out
}

/// Renders the scheduled/unscheduled split of the roster
pub fn render_list(list: &ListView) -> String {
    let mut out = String::new();
    if !list.scheduled.is_empty() {
        let _ = writeln!(out, "Scheduled ({})", list.scheduled.len());
        for p in &list.scheduled {
            let stage = p.stage.as_deref().unwrap_or_default();
            let time = p.time.as_deref().unwrap_or_default();
            let _ = writeln!(out, "  {:<12} {} · {} · {}", p.id.as_str(), p.name, stage, time);
        }
    }
    if !list.unscheduled.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "Unscheduled ({})", list.unscheduled.len());
        for p in &list.unscheduled {
            let _ = writeln!(out, "  {:<12} {}", p.id.as_str(), p.name);
        }
    }
    out
}

/// Writes one section per stage, one line per time slot: `TIME name` or
/// `TIME [EMPTY]`
pub fn write_schedule_to_file(
    catalog: &Catalog,
    lineup: &Lineup,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;

    for (i, stage) in catalog.stages.iter().enumerate() {
        if i > 0 {
            writeln!(file)?;
        }
        writeln!(file, "** {} **", stage)?;
        for time in &catalog.time_slots {
            match lineup.occupant(&Slot::new(stage.as_str(), time.as_str())) {
                Some(p) => writeln!(file, "{} {}", time, p.name)?,
                None => writeln!(file, "{} {}", time, EMPTY_CELL)?,
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booked() -> (Catalog, Lineup) {
        let catalog = Catalog::default();
        let mut lineup = Lineup::seeded(&catalog);
        lineup
            .assign(&"main-4".into(), catalog.slot("Geico Stage", "11:00 AM").unwrap())
            .unwrap();
        (catalog, lineup)
    }

    #[test]
    fn grid_text_has_header_and_one_line_per_time() {
        let (catalog, lineup) = booked();
        let text = render_grid(&GridView::build(&catalog, &lineup));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("1/156 scheduled"));
        assert!(lines[1].starts_with("Time"));
        assert!(lines[1].contains("Owen's Mixer Stage"));
        assert!(lines[2].starts_with("11:00 AM"));
        assert!(lines[2].contains("All Time Low"));
        assert!(text.contains("Unscheduled (155):"));
    }

    #[test]
    fn list_text_shows_slot_for_scheduled_performers() {
        let (_, lineup) = booked();
        let text = render_list(&ListView::build(&lineup));

        assert!(text.starts_with("Scheduled (1)"));
        assert!(text.contains("All Time Low · Geico Stage · 11:00 AM"));
        assert!(text.contains("Unscheduled (155)"));
    }

    #[test]
    fn schedule_file_lists_every_slot_per_stage() {
        let (catalog, lineup) = booked();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.txt");

        write_schedule_to_file(&catalog, &lineup, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert!(text.starts_with("** Vans Right Foot Stage **\n11:00 AM [EMPTY]\n"));
        assert!(text.contains("** Geico Stage **\n11:00 AM All Time Low\n"));
        assert_eq!(text.lines().filter(|l| l.ends_with(EMPTY_CELL)).count(), 119);
    }

    #[test]
    fn columns_line_up_with_non_ascii_time_labels() {
        let catalog = Catalog {
            stages: vec!["Nord".into(), "Süd".into()],
            time_slots: vec!["Früh".into(), "Spät · 22 Uhr".into()],
            seed: Vec::new(),
        };
        let text = render_grid(&GridView::build(&catalog, &Lineup::seeded(&catalog)));

        let columns: Vec<Vec<usize>> = text
            .lines()
            .skip(1)
            .take(3)
            .map(|line| {
                line.chars()
                    .enumerate()
                    .filter(|&(_, c)| c == '|')
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();

        assert_eq!(columns[0].len(), 2);
        assert_eq!(columns[0], columns[1]);
        assert_eq!(columns[0], columns[2]);
        assert_eq!(columns[0][0], "Spät · 22 Uhr".chars().count() + 1);
    }
}
