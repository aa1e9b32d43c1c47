use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::models::{AnswerRecord, AnswerStatistic, Category, DailyStatistic, Statistics};

pub const DAILY_TREND_DAYS: i64 = 7;
pub const THIRTY_DAY_TREND_DAYS: i64 = 30;
pub const TOP_ANSWERS_LIMIT: usize = 10;

/// Builds the full dashboard snapshot from the raw history. Pure: the
/// caller supplies `now` and the week-start convention, so the same
/// inputs always produce the same snapshot.
pub fn compute_statistics(
    records: &[AnswerRecord],
    now: NaiveDateTime,
    week_start: Weekday,
) -> Statistics {
    let total_questions = records.len();
    let start_of_today = start_of_day(now.date());
    let start_of_week = start_of_day(now.date().week(week_start).first_day());

    let mut positive_count = 0;
    let mut neutral_count = 0;
    let mut negative_count = 0;
    let mut questions_today = 0;
    let mut questions_this_week = 0;
    let mut questions_by_hour: HashMap<u32, usize> = HashMap::new();
    let mut questions_by_weekday: HashMap<u32, usize> = HashMap::new();
    let mut day_buckets: HashMap<NaiveDate, DailyStatistic> = HashMap::new();
    let mut first_question_at: Option<NaiveDateTime> = None;
    let mut last_question_at: Option<NaiveDateTime> = None;

    for record in records {
        match record.category {
            Category::Positive => positive_count += 1,
            Category::Neutral => neutral_count += 1,
            Category::Negative => negative_count += 1,
        }

        if record.asked_at >= start_of_today {
            questions_today += 1;
        }
        if record.asked_at >= start_of_week {
            questions_this_week += 1;
        }

        *questions_by_hour
            .entry(record.asked_at.hour())
            .or_insert(0) += 1;
        *questions_by_weekday
            .entry(weekday_number(record.asked_at.weekday()))
            .or_insert(0) += 1;

        let bucket = day_buckets
            .entry(record.asked_at.date())
            .or_insert_with(|| empty_day(record.asked_at.date()));
        bucket.count += 1;
        match record.category {
            Category::Positive => bucket.positive_count += 1,
            Category::Neutral => bucket.neutral_count += 1,
            Category::Negative => bucket.negative_count += 1,
        }

        if first_question_at.map_or(true, |first| record.asked_at < first) {
            first_question_at = Some(record.asked_at);
        }
        if last_question_at.map_or(true, |last| record.asked_at > last) {
            last_question_at = Some(record.asked_at);
        }
    }

    let total_days_used = day_buckets.len();
    let average_questions_per_day = if total_days_used == 0 {
        0.0
    } else {
        total_questions as f64 / total_days_used as f64
    };

    Statistics {
        total_questions,
        positive_count,
        neutral_count,
        negative_count,
        positive_percentage: percentage(positive_count, total_questions),
        neutral_percentage: percentage(neutral_count, total_questions),
        negative_percentage: percentage(negative_count, total_questions),
        questions_today,
        questions_this_week,
        average_questions_per_day,
        total_days_used,
        first_question_at,
        last_question_at,
        daily_trend: trend_window(&day_buckets, now.date(), DAILY_TREND_DAYS),
        thirty_day_trend: trend_window(&day_buckets, now.date(), THIRTY_DAY_TREND_DAYS),
        questions_by_hour,
        questions_by_weekday,
        top_answers: rank_top_answers(records),
    }
}

/// Groups records by answer text and returns the ten most frequent.
/// Equal counts keep first-appearance order (the sort is stable over a
/// grouping built in scan order); the category is the one carried by
/// the first record seen for that text.
pub fn rank_top_answers(records: &[AnswerRecord]) -> Vec<AnswerStatistic> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<AnswerStatistic> = Vec::new();

    for record in records {
        match index.get(record.answer.as_str()) {
            Some(&slot) => grouped[slot].count += 1,
            None => {
                index.insert(record.answer.as_str(), grouped.len());
                grouped.push(AnswerStatistic {
                    answer: record.answer.clone(),
                    count: 1,
                    category: record.category,
                });
            }
        }
    }

    grouped.sort_by(|a, b| b.count.cmp(&a.count));
    grouped.truncate(TOP_ANSWERS_LIMIT);
    grouped
}

fn trend_window(
    day_buckets: &HashMap<NaiveDate, DailyStatistic>,
    today: NaiveDate,
    days: i64,
) -> Vec<DailyStatistic> {
    (0..days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            day_buckets
                .get(&date)
                .cloned()
                .unwrap_or_else(|| empty_day(date))
        })
        .collect()
}

fn empty_day(date: NaiveDate) -> DailyStatistic {
    DailyStatistic {
        date,
        count: 0,
        positive_count: 0,
        neutral_count: 0,
        negative_count: 0,
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

// 1 = Sunday through 7 = Saturday, independent of locale.
fn weekday_number(weekday: Weekday) -> u32 {
    weekday.num_days_from_sunday() + 1
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
