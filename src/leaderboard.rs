//! Game report ranking.
//!
//! Members are ranked by weighted correct score (descending), then by
//! average seconds per answered question (ascending). Members without any
//! answer carry `None` aggregates and sort after everyone who answered.

use std::cmp::Ordering;

use crate::models::report::{MemberAggregate, ReportRow, ReportTiming};

/// Seconds a member has spent in the game, or `None` if it never started.
///
/// A member who answered every question is timed to their last answer.
/// Everyone else is timed to the game's end: the written endtime, the
/// elapsed duration, or `now` while the game is still running.
fn elapsed_secs(timing: &ReportTiming, member: &MemberAggregate, now: i64) -> Option<i64> {
    let start = timing.starttime?;
    let hard_end = start + timing.duration;

    let finished_all = member.weight_answered == Some(timing.total_weight);
    let end = match (finished_all, member.last_answer_at, timing.endtime) {
        (true, Some(last), _) => last,
        (_, _, Some(end)) => end.min(hard_end),
        _ => now.min(hard_end),
    };

    Some((end - start).max(0))
}

/// Sort key comparison: higher score first, then faster, then lower user id.
fn compare(a: &ReportRow, b: &ReportRow) -> Ordering {
    let score = match (a.question_answered_correct, b.question_answered_correct) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    let speed = match (a.time_per_question, b.time_per_question) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    score.then(speed).then(a.user_id.cmp(&b.user_id))
}

/// Builds the ranked report for one game.
pub fn rank_members(timing: &ReportTiming, members: Vec<MemberAggregate>, now: i64) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = members
        .into_iter()
        .map(|m| {
            let answered = m.answered_count > 0;
            // Members who never answered carry no timing at all.
            let total_time = elapsed_secs(timing, &m, now).filter(|_| answered);
            let time_per_question = total_time.map(|t| t as f64 / m.answered_count as f64);

            ReportRow {
                rank: 0,
                user_id: m.user_id,
                username: m.username,
                question_answered: m.weight_answered.filter(|_| answered),
                question_answered_correct: answered.then(|| m.weight_correct.unwrap_or(0)),
                total_questions: timing.total_weight,
                answered_count: m.answered_count,
                total_time_in_sec: total_time,
                time_per_question,
                user_endtime: m.last_answer_at,
            }
        })
        .collect();

    rows.sort_by(compare);
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx as i64 + 1;
    }
    rows
}
