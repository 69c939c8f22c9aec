use chrono::Utc;

use crate::models::{ClassLevel, Student, WEEK_SLOTS};

/// Render the leaderboard as CSV text. Fields are written verbatim with no
/// quoting, so a name containing a comma produces a malformed line; that
/// matches the exported artifact's documented format.
pub fn leaderboard_csv(students: &[Student]) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    let mut header = vec![
        "Rank".to_string(),
        "Name".to_string(),
        "Total Score".to_string(),
    ];
    for week in 1..=WEEK_SLOTS {
        header.push(format!("Week {week}"));
    }
    writer.write_record(&header)?;

    for student in students {
        let mut record = vec![
            student.rank.to_string(),
            student.name.clone(),
            student.total_score.to_string(),
        ];
        for week in 0..WEEK_SLOTS {
            let score = student.weekly_scores.get(week).copied().unwrap_or(0.0);
            record.push(score.to_string());
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("finalizing csv writer: {err}"))?;
    Ok(String::from_utf8(bytes)?)
}

/// Dated default file name: `leaderboard-plus-one-2026-08-26.csv`.
pub fn default_export_name(class: ClassLevel) -> String {
    format!(
        "leaderboard-{}-{}.csv",
        class.slug(),
        Utc::now().format("%Y-%m-%d")
    )
}
