use std::fmt::Write;

use crate::models::{AnswerRecord, Statistics};

pub fn build_report(user_name: &str, stats: &Statistics, recent: &[AnswerRecord]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Magic 8 Ball Report");
    let _ = writeln!(output, "Generated for {user_name}");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Answer Mix");

    if stats.total_questions == 0 {
        let _ = writeln!(output, "No questions asked yet.");
    } else {
        let _ = writeln!(output, "- {} questions in total", stats.total_questions);
        let _ = writeln!(
            output,
            "- positive: {} ({:.1}%)",
            stats.positive_count, stats.positive_percentage
        );
        let _ = writeln!(
            output,
            "- neutral: {} ({:.1}%)",
            stats.neutral_count, stats.neutral_percentage
        );
        let _ = writeln!(
            output,
            "- negative: {} ({:.1}%)",
            stats.negative_count, stats.negative_percentage
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Activity");

    if stats.total_questions == 0 {
        let _ = writeln!(output, "No activity recorded.");
    } else {
        let _ = writeln!(output, "- today: {}", stats.questions_today);
        let _ = writeln!(output, "- this week: {}", stats.questions_this_week);
        let _ = writeln!(output, "- days used: {}", stats.total_days_used);
        let _ = writeln!(
            output,
            "- average per day: {:.1}",
            stats.average_questions_per_day
        );
        if let (Some(first), Some(last)) = (stats.first_question_at, stats.last_question_at) {
            let _ = writeln!(output, "- first question: {}", first.date());
            let _ = writeln!(output, "- last question: {}", last.date());
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Last 7 Days");

    for day in &stats.daily_trend {
        let _ = writeln!(
            output,
            "- {}: {} questions ({} positive, {} neutral, {} negative)",
            day.date, day.count, day.positive_count, day.neutral_count, day.negative_count
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Answers");

    if stats.top_answers.is_empty() {
        let _ = writeln!(output, "No answers recorded yet.");
    } else {
        for answer in &stats.top_answers {
            let _ = writeln!(
                output,
                "- {} ({}) asked {} times",
                answer.answer, answer.category, answer.count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Questions");

    if recent.is_empty() {
        let _ = writeln!(output, "No questions recorded yet.");
    } else {
        for record in recent.iter().take(5) {
            let _ = writeln!(
                output,
                "- {} → {} ({})",
                record.question, record.answer, record.asked_at
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerRecord, Category};
    use crate::stats::compute_statistics;
    use chrono::{NaiveDate, NaiveDateTime, Weekday};
    use uuid::Uuid;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 18)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap()
    }

    fn record(answer: &str, category: Category) -> AnswerRecord {
        AnswerRecord {
            id: Uuid::new_v4(),
            question: "考試會順利嗎？".to_string(),
            answer: answer.to_string(),
            answer_en: answer.to_string(),
            category,
            asked_at: fixed_now(),
        }
    }

    #[test]
    fn report_covers_every_section() {
        let records = vec![
            record("是的", Category::Positive),
            record("很可疑", Category::Negative),
        ];
        let stats = compute_statistics(&records, fixed_now(), Weekday::Sun);

        let report = build_report("Mia", &stats, &records);

        assert!(report.contains("# Magic 8 Ball Report"));
        assert!(report.contains("Generated for Mia"));
        assert!(report.contains("- 2 questions in total"));
        assert!(report.contains("- positive: 1 (50.0%)"));
        assert!(report.contains("- today: 2"));
        assert!(report.contains("- 是的 (positive) asked 1 times"));
        assert!(report.contains("- 考試會順利嗎？ → 是的"));
    }

    #[test]
    fn empty_history_renders_placeholders() {
        let stats = compute_statistics(&[], fixed_now(), Weekday::Sun);

        let report = build_report("Mia", &stats, &[]);

        assert!(report.contains("No questions asked yet."));
        assert!(report.contains("No activity recorded."));
        assert!(report.contains("No answers recorded yet."));
        assert!(report.contains("No questions recorded yet."));
    }

    #[test]
    fn trend_section_always_lists_seven_days() {
        let stats = compute_statistics(&[], fixed_now(), Weekday::Sun);
        let report = build_report("Mia", &stats, &[]);

        let trend_lines = report
            .lines()
            .filter(|line| line.contains("questions (") && line.starts_with("- 2026-"))
            .count();
        assert_eq!(trend_lines, 7);
    }
}
