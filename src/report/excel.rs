use crate::models::{AggregateTable, Measure};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};
use tracing::info;

pub const COLUMNS: [&str; 5] = ["City", "District", "Area", "Rooms", "Price"];

/// File name for an export started at `now`
pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("{}.xlsx", now.format("Apartments_OLX_%Y%m%d_%H%M_v1"))
}

/// First path that does not exist yet. On a clash, trailing digits of the
/// stem are replaced by a counter starting at 2: `report.xlsx` becomes
/// `report2.xlsx`, `..._v1.xlsx` becomes `..._v2.xlsx`.
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = stem.trim_end_matches(|c: char| c.is_ascii_digit());
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 2;
    loop {
        let candidate = path.with_file_name(format!("{}{}{}", base, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

fn write_measure(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    measure: Option<Measure>,
) -> Result<(), XlsxError> {
    match measure {
        Some(Measure::Exact(value)) => {
            worksheet.write_number(row, col, value.as_f64())?;
        }
        Some(sentinel @ Measure::OpenEnded(_)) => {
            worksheet.write_string(row, col, sentinel.to_string())?;
        }
        None => {}
    }
    Ok(())
}

/// Write the table to `path` as a single-sheet workbook.
pub fn write_workbook(table: &AggregateTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (index, row) in table.rows().iter().enumerate() {
        let line = index as u32 + 1;
        worksheet.write_string(line, 0, row.city.as_str())?;
        worksheet.write_string(line, 1, row.district.as_str())?;
        write_measure(worksheet, line, 2, row.area)?;
        write_measure(worksheet, line, 3, row.rooms)?;
        worksheet.write_number(line, 4, row.price.as_f64())?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save workbook to {}", path.display()))?;
    Ok(())
}

/// Export the table into `dir` under a timestamped, non-clashing name and
/// return the path written.
pub fn export(table: &AggregateTable, dir: &Path, now: DateTime<Local>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = unique_path(&dir.join(export_file_name(now)));
    write_workbook(table, &path)?;

    info!("Exported {} rows to {}", table.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Aggregator, Numeric, Row};
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use chrono::TimeZone;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2021, 3, 7, 12, 5, 0).unwrap()
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(noon()), "Apartments_OLX_20210307_1205_v1.xlsx");
    }

    #[test]
    fn test_unique_path_counts_from_two() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.xlsx");
        assert_eq!(unique_path(&report), report);

        std::fs::write(&report, b"").unwrap();
        assert_eq!(unique_path(&report), dir.path().join("report2.xlsx"));

        std::fs::write(dir.path().join("report2.xlsx"), b"").unwrap();
        assert_eq!(unique_path(&report), dir.path().join("report3.xlsx"));
    }

    #[test]
    fn test_unique_path_bumps_version_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("Apartments_OLX_20210307_1205_v1.xlsx");
        std::fs::write(&first, b"").unwrap();
        assert_eq!(
            unique_path(&first),
            dir.path().join("Apartments_OLX_20210307_1205_v2.xlsx")
        );
    }

    #[test]
    fn test_export_writes_rows_and_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("Export");

        let mut aggregator = Aggregator::new();
        aggregator.append(Row {
            city: "Kraków".to_string(),
            district: "Podgórze".to_string(),
            area: Some(Measure::Exact(Numeric::Float(47.5))),
            rooms: Some(Measure::OpenEnded(4)),
            price: Numeric::Int(520_000),
        });
        aggregator.append(Row {
            city: "Zakopane".to_string(),
            district: String::new(),
            area: None,
            rooms: Some(Measure::Exact(Numeric::Int(2))),
            price: Numeric::Int(390_000),
        });
        let table = aggregator.finish();

        let first = export(&table, &export_dir, noon()).unwrap();
        let second = export(&table, &export_dir, noon()).unwrap();
        assert_eq!(first, export_dir.join("Apartments_OLX_20210307_1205_v1.xlsx"));
        assert_eq!(second, export_dir.join("Apartments_OLX_20210307_1205_v2.xlsx"));

        let mut workbook: Xlsx<_> = open_workbook(&first).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        assert_eq!(range.height(), 3);
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("City".to_string())));
        assert_eq!(range.get_value((0, 4)), Some(&Data::String("Price".to_string())));
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("Kraków".to_string())));
        assert_eq!(range.get_value((1, 2)), Some(&Data::Float(47.5)));
        assert_eq!(range.get_value((1, 3)), Some(&Data::String(">4".to_string())));
        assert_eq!(range.get_value((2, 4)), Some(&Data::Float(390_000.0)));
        assert_eq!(range.get_value((2, 2)), Some(&Data::Empty));
    }
}
