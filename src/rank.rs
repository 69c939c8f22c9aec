use std::cmp::Ordering;

use crate::models::{Student, Trend};

/// Sort descending by total score and assign positional 1-based ranks.
/// The sort is stable, so tied scores keep their sheet order and receive
/// distinct consecutive ranks. Trend is recomputed per student as part of
/// the same pass.
pub fn rank_students(mut students: Vec<Student>) -> Vec<Student> {
    students.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(Ordering::Equal)
    });

    for (index, student) in students.iter_mut().enumerate() {
        student.rank = index + 1;
        student.trend = calculate_trend(&student.weekly_scores);
    }

    students
}

/// Compare the last two strictly-positive weekly scores. Zero entries are
/// unplayed weeks, not real scores, so they never count toward a trend.
pub fn calculate_trend(weekly_scores: &[f64]) -> Trend {
    let positive: Vec<f64> = weekly_scores
        .iter()
        .copied()
        .filter(|score| *score > 0.0)
        .collect();

    let [.., previous, last] = positive.as_slice() else {
        return Trend::Stable;
    };

    if last > previous {
        Trend::Up
    } else if last < previous {
        Trend::Down
    } else {
        Trend::Stable
    }
}
