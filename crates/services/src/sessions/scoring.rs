use quiz_core::model::Difficulty;

/// Base points for any correct answer.
pub const BASE_POINTS: f64 = 100.0;

/// Maximum time bonus, granted when the full budget is still on the clock.
pub const MAX_TIME_BONUS: f64 = 50.0;

/// Points for a correct answer.
///
/// `round((100 + bonus) * multiplier)`, where the bonus decays linearly from
/// 50 to 0 as the question's time budget runs out. Extra time can push the
/// remaining time past the budget, in which case the bonus exceeds 50.
/// Incorrect answers score 0 and never reduce the running total.
#[must_use]
pub fn score_answer(difficulty: Difficulty, time_left_secs: u32, time_limit_secs: u32) -> u32 {
    let ratio = if time_limit_secs == 0 {
        0.0
    } else {
        f64::from(time_left_secs) / f64::from(time_limit_secs)
    };
    let time_bonus = (ratio * MAX_TIME_BONUS).max(0.0);
    let points = (BASE_POINTS + time_bonus) * difficulty.multiplier();
    // points is non-negative and far below u32::MAX for any real input.
    points.round() as u32
}
