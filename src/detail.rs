use serde_json::Value;

use crate::error::SheetsError;
use crate::models::{ClassLevel, SubjectBreakdown};
use crate::parse::{cell_number, cell_text};
use crate::sheets::SheetsClient;

/// Detail sheet columns: A = name, B = total, C.. = per-subject scores.
/// A secondary name column exists on sheets where A holds a serial number.
const NAME_COLUMN: usize = 0;
const FALLBACK_NAME_COLUMN: usize = 1;
const TOTAL_COLUMN: usize = 1;
const SUBJECT_START_COLUMN: usize = 2;

impl SheetsClient {
    /// Fetch the per-subject breakdown for one student.
    ///
    /// Two single-shot reads over the wide column span: the header row for
    /// subject labels and the data block for scores. `Ok(None)` means no row
    /// matched the name; transport and credential failures are errors.
    pub async fn fetch_subject_breakdown(
        &self,
        class: ClassLevel,
        name: &str,
    ) -> Result<Option<SubjectBreakdown>, SheetsError> {
        let (api_key, sheet_id) = self.config().require(class)?;
        let tab = class.sheet_tab();

        let header_range = format!("'{tab}'!A1:Z1");
        let data_range = format!("'{tab}'!A2:Z60");

        let header = self
            .request_range(sheet_id, api_key, &header_range)
            .await
            .map_err(|detail| SheetsError::Request {
                range: header_range.clone(),
                detail,
            })?;
        let rows = self
            .request_range(sheet_id, api_key, &data_range)
            .await
            .map_err(|detail| SheetsError::Request {
                range: data_range.clone(),
                detail,
            })?;

        let Some(row) = find_student_row(&rows, name) else {
            return Ok(None);
        };

        let labels = header
            .first()
            .map(|cells| trailing(cells, SUBJECT_START_COLUMN))
            .unwrap_or(&[]);
        let scores = trailing(row, SUBJECT_START_COLUMN);

        let total_cell = row.get(TOTAL_COLUMN);
        let total_score = cell_text(total_cell).map(|_| cell_number(total_cell));

        Ok(Some(SubjectBreakdown {
            name: cell_text(row.get(NAME_COLUMN))
                .or_else(|| cell_text(row.get(FALLBACK_NAME_COLUMN)))
                .unwrap_or_else(|| name.to_string()),
            total_score,
            subjects: zip_subjects(labels, scores),
        }))
    }
}

fn trailing(cells: &[Value], from: usize) -> &[Value] {
    cells.get(from..).unwrap_or(&[])
}

/// Case-insensitive trimmed match against the primary name column, then a
/// second pass over the fallback column before giving up.
pub fn find_student_row<'a>(rows: &'a [Vec<Value>], name: &str) -> Option<&'a Vec<Value>> {
    let wanted = name.trim().to_lowercase();

    for column in [NAME_COLUMN, FALLBACK_NAME_COLUMN] {
        let found = rows.iter().find(|row| {
            cell_text(row.get(column))
                .map(|cell| cell.to_lowercase() == wanted)
                .unwrap_or(false)
        });
        if found.is_some() {
            return found;
        }
    }

    None
}

/// Pair each score cell with its header label, positionally. A blank or
/// missing label at position `i` becomes "Category {i+1}".
pub fn zip_subjects(labels: &[Value], scores: &[Value]) -> Vec<(String, f64)> {
    scores
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let label = cell_text(labels.get(index))
                .unwrap_or_else(|| format!("Category {}", index + 1));
            (label, cell_number(Some(cell)))
        })
        .collect()
}
