use serde_json::Value;

use crate::models::{ClassLevel, Student, Trend, WEEK_SLOTS};

/// Sheet columns: A = name, B..F = weekly scores, G = total.
const NAME_COLUMN: usize = 0;
const TOTAL_COLUMN: usize = WEEK_SLOTS + 1;

/// Parse one raw spreadsheet row into a student, or `None` for rows without
/// a usable name. A bad numeric cell never sinks the row; only a blank name
/// does. Rank and trend are sentinels until the whole collection is ranked.
pub fn parse_row(row: &[Value], index: usize, class: ClassLevel) -> Option<Student> {
    let name = cell_text(row.get(NAME_COLUMN))?;

    let weekly_scores: Vec<f64> = (1..=WEEK_SLOTS)
        .map(|column| cell_number(row.get(column)))
        .collect();

    // A missing or unparseable total column falls back to the weekly sum.
    let total_score = match cell_number(row.get(TOTAL_COLUMN)) {
        total if total != 0.0 => total,
        _ => weekly_scores.iter().sum(),
    };

    Some(Student {
        id: format!("{}-{}", class.slug(), index + 1),
        name,
        weekly_scores,
        total_score,
        rank: 0,
        trend: Trend::Stable,
    })
}

/// Trimmed cell text; `None` when the cell is absent, blank, or not
/// representable as text. Numeric cells render via their display form.
pub fn cell_text(cell: Option<&Value>) -> Option<String> {
    let text = match cell? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Permissive numeric coercion: anything that does not parse becomes 0.0.
/// Never NaN, never missing.
pub fn cell_number(cell: Option<&Value>) -> f64 {
    let value = match cell {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
