use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Positive,
    Neutral,
    Negative,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Positive => "positive",
            Category::Neutral => "neutral",
            Category::Negative => "negative",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "positive" => Ok(Category::Positive),
            "neutral" => Ok(Category::Neutral),
            "negative" => Ok(Category::Negative),
            other => Err(anyhow::anyhow!("unknown answer category: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct AnswerRecord {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub answer_en: String,
    pub category: Category,
    pub asked_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_questions: usize,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_count: usize,
    pub positive_percentage: f64,
    pub neutral_percentage: f64,
    pub negative_percentage: f64,
    pub questions_today: usize,
    pub questions_this_week: usize,
    pub average_questions_per_day: f64,
    pub total_days_used: usize,
    pub first_question_at: Option<NaiveDateTime>,
    pub last_question_at: Option<NaiveDateTime>,
    pub daily_trend: Vec<DailyStatistic>,
    pub thirty_day_trend: Vec<DailyStatistic>,
    pub questions_by_hour: HashMap<u32, usize>,
    /// Keyed 1 = Sunday through 7 = Saturday.
    pub questions_by_weekday: HashMap<u32, usize>,
    pub top_answers: Vec<AnswerStatistic>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStatistic {
    pub date: NaiveDate,
    pub count: usize,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerStatistic {
    pub answer: String,
    pub count: usize,
    pub category: Category,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_text() {
        for category in [Category::Positive, Category::Neutral, Category::Negative] {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn category_rejects_unknown_text() {
        assert!("affirmative".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
        assert!("Positive".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Negative).unwrap();
        assert_eq!(json, "\"negative\"");
        let back: Category = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(back, Category::Neutral);
    }
}
