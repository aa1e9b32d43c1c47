use anyhow::Context;
use chrono::{Duration, NaiveDateTime};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::answers::{Answer, ANSWERS};
use crate::models::{AnswerRecord, Category, User};

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn fetch_or_create_user(
    pool: &SqlitePool,
    name: &str,
    now: NaiveDateTime,
) -> anyhow::Result<User> {
    if let Some(row) = sqlx::query("SELECT id, name, created_at FROM users LIMIT 1")
        .fetch_optional(pool)
        .await?
    {
        let id: String = row.get("id");
        return Ok(User {
            id: Uuid::parse_str(&id)?,
            name: row.get("name"),
            created_at: row.get("created_at"),
        });
    }

    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: now,
    };

    sqlx::query("INSERT INTO users (id, name, created_at) VALUES (?1, ?2, ?3)")
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(user.created_at)
        .execute(pool)
        .await?;

    Ok(user)
}

pub async fn insert_record(
    pool: &SqlitePool,
    user_id: Uuid,
    question: &str,
    answer: &Answer,
    asked_at: NaiveDateTime,
) -> anyhow::Result<AnswerRecord> {
    let record = AnswerRecord {
        id: Uuid::new_v4(),
        question: question.to_string(),
        answer: answer.text.to_string(),
        answer_en: answer.text_en.to_string(),
        category: answer.category,
        asked_at,
    };

    sqlx::query(
        "INSERT INTO records (id, user_id, question, answer, answer_en, category, asked_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(record.id.to_string())
    .bind(user_id.to_string())
    .bind(&record.question)
    .bind(&record.answer)
    .bind(&record.answer_en)
    .bind(record.category.as_str())
    .bind(record.asked_at)
    .execute(pool)
    .await?;

    Ok(record)
}

pub async fn fetch_records(pool: &SqlitePool) -> anyhow::Result<Vec<AnswerRecord>> {
    let rows = sqlx::query(
        "SELECT id, question, answer, answer_en, category, asked_at \
         FROM records ORDER BY asked_at ASC",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(record_from_row).collect()
}

pub async fn fetch_recent(pool: &SqlitePool, limit: usize) -> anyhow::Result<Vec<AnswerRecord>> {
    let rows = sqlx::query(
        "SELECT id, question, answer, answer_en, category, asked_at \
         FROM records ORDER BY asked_at DESC LIMIT ?1",
    )
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    rows.iter().map(record_from_row).collect()
}

pub async fn seed(pool: &SqlitePool, now: NaiveDateTime) -> anyhow::Result<usize> {
    let user = fetch_or_create_user(pool, "Mia", now).await?;

    let demo: [(&str, usize, i64, u32, &str); 10] = [
        ("seed-001", 0, 6, 9, "我該換工作嗎？"),
        ("seed-002", 12, 6, 21, "他會回我訊息嗎？"),
        ("seed-003", 8, 5, 10, "這個專案會成功嗎？"),
        ("seed-004", 16, 4, 15, "我會中樂透嗎？"),
        ("seed-005", 3, 3, 8, "今天適合出門嗎？"),
        ("seed-006", 11, 3, 13, "我應該現在告白嗎？"),
        ("seed-007", 19, 2, 20, "明天會下雨嗎？"),
        ("seed-008", 6, 1, 11, "考試會順利嗎？"),
        ("seed-009", 9, 0, 9, "今天運氣好嗎？"),
        ("seed-010", 14, 0, 14, "現在適合做決定嗎？"),
    ];

    let mut inserted = 0usize;

    for (source_key, answer_index, days_ago, hour, question) in demo {
        let answer = &ANSWERS[answer_index];
        let asked_at = (now.date() - Duration::days(days_ago))
            .and_hms_opt(hour, 0, 0)
            .context("invalid seed time")?;

        let result = sqlx::query(
            "INSERT INTO records \
             (id, user_id, question, answer, answer_en, category, asked_at, source_key) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
             ON CONFLICT (source_key) DO NOTHING",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user.id.to_string())
        .bind(question)
        .bind(answer.text)
        .bind(answer.text_en)
        .bind(answer.category.as_str())
        .bind(asked_at)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

pub async fn import_csv(
    pool: &SqlitePool,
    user_id: Uuid,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        question: String,
        answer: String,
        answer_en: String,
        category: Category,
        asked_at: NaiveDateTime,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            "INSERT INTO records \
             (id, user_id, question, answer, answer_en, category, asked_at, source_key) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
             ON CONFLICT (source_key) DO NOTHING",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(&row.question)
        .bind(&row.answer)
        .bind(&row.answer_en)
        .bind(row.category.as_str())
        .bind(row.asked_at)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

fn record_from_row(row: &SqliteRow) -> anyhow::Result<AnswerRecord> {
    let id: String = row.get("id");
    let category: String = row.get("category");

    Ok(AnswerRecord {
        id: Uuid::parse_str(&id)?,
        question: row.get("question"),
        answer: row.get("answer"),
        answer_en: row.get("answer_en"),
        category: category.parse()?,
        asked_at: row.get("asked_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_db(&pool).await.unwrap();
        pool
    }

    fn sample_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 18)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn insert_then_fetch_round_trips() {
        let pool = memory_pool().await;
        let user = fetch_or_create_user(&pool, "Mia", sample_now()).await.unwrap();

        let answer = &ANSWERS[0];
        insert_record(&pool, user.id, "考試會順利嗎？", answer, sample_now())
            .await
            .unwrap();

        let records = fetch_records(&pool).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "考試會順利嗎？");
        assert_eq!(records[0].answer, answer.text);
        assert_eq!(records[0].answer_en, answer.text_en);
        assert_eq!(records[0].category, answer.category);
        assert_eq!(records[0].asked_at, sample_now());
    }

    #[tokio::test]
    async fn user_is_created_once_and_reused() {
        let pool = memory_pool().await;

        let first = fetch_or_create_user(&pool, "Mia", sample_now()).await.unwrap();
        let second = fetch_or_create_user(&pool, "Somebody Else", sample_now())
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Mia");
    }

    #[tokio::test]
    async fn fetch_recent_orders_newest_first() {
        let pool = memory_pool().await;
        let user = fetch_or_create_user(&pool, "Mia", sample_now()).await.unwrap();

        for (index, answer_index) in [0usize, 11, 17].iter().enumerate() {
            let asked_at = sample_now() - Duration::days(index as i64);
            insert_record(&pool, user.id, "今天運氣好嗎？", &ANSWERS[*answer_index], asked_at)
                .await
                .unwrap();
        }

        let recent = fetch_recent(&pool, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].asked_at, sample_now());
        assert_eq!(recent[1].asked_at, sample_now() - Duration::days(1));
    }

    #[tokio::test]
    async fn seed_is_idempotent() {
        let pool = memory_pool().await;

        let first = seed(&pool, sample_now()).await.unwrap();
        let second = seed(&pool, sample_now()).await.unwrap();

        assert_eq!(first, 10);
        assert_eq!(second, 0);
        assert_eq!(fetch_records(&pool).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn import_skips_rows_already_seen() {
        let pool = memory_pool().await;
        let user = fetch_or_create_user(&pool, "Mia", sample_now()).await.unwrap();

        let csv_path = std::env::temp_dir().join(format!("eightball-import-{}.csv", Uuid::new_v4()));
        std::fs::write(
            &csv_path,
            "question,answer,answer_en,category,asked_at,source_key\n\
             考試會順利嗎？,是的,Yes,positive,2026-03-17T09:00:00,ext-001\n\
             明天會下雨嗎？,很可疑,Very doubtful,negative,2026-03-17T10:00:00,\n",
        )
        .unwrap();

        let first = import_csv(&pool, user.id, &csv_path).await.unwrap();
        let second = import_csv(&pool, user.id, &csv_path).await.unwrap();
        std::fs::remove_file(&csv_path).unwrap();

        assert_eq!(first, 2);
        // The keyed row is skipped; the keyless row gets a fresh key each run.
        assert_eq!(second, 1);
        assert_eq!(fetch_records(&pool).await.unwrap().len(), 3);
    }
}
