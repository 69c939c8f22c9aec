use crate::models::{Student, WEEK_SLOTS};

/// Outcome of post-hoc invariant checks over a ranked collection. Used for
/// diagnostics only; a failing report never blocks display.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub violations: Vec<String>,
}

pub fn validate_students(students: &[Student]) -> ValidationReport {
    let mut violations = Vec::new();

    for (index, student) in students.iter().enumerate() {
        if student.name.trim().is_empty() {
            violations.push(format!("student at index {index} has no name"));
        }
        if student.total_score < 0.0 {
            violations.push(format!("{} has a negative total score", student.name));
        }
        if student.weekly_scores.len() != WEEK_SLOTS {
            violations.push(format!(
                "{} does not have exactly {WEEK_SLOTS} weekly scores",
                student.name
            ));
        }
        if student.weekly_scores.iter().any(|score| *score < 0.0) {
            violations.push(format!("{} has negative weekly scores", student.name));
        }
        if student.rank < 1 {
            violations.push(format!("{} has invalid rank", student.name));
        }
    }

    ValidationReport {
        is_valid: violations.is_empty(),
        violations,
    }
}
