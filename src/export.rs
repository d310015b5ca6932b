use std::io::Write;

use csv::WriterBuilder;

use crate::lineup::GridView;

/// Writes every slot of the grid as `time,stage,artist_id,artist`, empty
/// slots included, row by row in catalog order
pub fn export_schedule_csv<W: Write>(grid: &GridView, writer: W) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["time", "stage", "artist_id", "artist"])?;

    for row in &grid.rows {
        for (stage, cell) in grid.stages.iter().zip(&row.cells) {
            let (id, name) = cell
                .as_ref()
                .map(|c| (c.id.as_str(), c.name.as_str()))
                .unwrap_or(("", ""));
            wtr.write_record([row.time.as_str(), stage.as_str(), id, name])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::lineup::Lineup;

    #[test]
    fn exports_one_record_per_slot() {
        let catalog = Catalog::default();
        let mut lineup = Lineup::seeded(&catalog);
        lineup
            .assign(&"main-90".into(), catalog.slot("Owen's Mixer Stage", "12:00 PM").unwrap())
            .unwrap();

        let mut buf = Vec::new();
        export_schedule_csv(&GridView::build(&catalog, &lineup), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "time,stage,artist_id,artist");
        assert_eq!(lines.len(), 1 + 120);
        assert_eq!(lines[1], "11:00 AM,Vans Right Foot Stage,,");
        assert!(lines.contains(&"12:00 PM,Owen's Mixer Stage,main-90,Plain White T's"));
    }
}
