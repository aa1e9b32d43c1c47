use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, Weekday};
use clap::{Parser, Subcommand};
use rand::thread_rng;
use sqlx::sqlite::SqlitePoolOptions;

mod answers;
mod db;
mod enrich;
mod models;
mod report;
mod stats;

const DEFAULT_DATABASE_URL: &str = "sqlite://eightball.db?mode=rwc";
const DEFAULT_WEEK_START: Weekday = Weekday::Sun;

#[derive(Parser)]
#[command(name = "eightball")]
#[command(about = "Magic 8 Ball fortune teller with local history and statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load a demo user and a spread of demo records
    Seed,
    /// Ask the ball a question and record the answer
    Ask {
        question: String,
        /// Add a personalized Gemini reading on top of the canned answer
        #[arg(long)]
        enrich: bool,
        /// Name used when creating the local user on first ask
        #[arg(long, default_value = "Seeker")]
        user: String,
    },
    /// List the most recent questions
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Import records from a CSV file with columns
    /// question,answer,answer_en,category,asked_at,source_key
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print the statistics dashboard
    Stats {
        /// Emit the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("EIGHTBALL_DATABASE_URL")
        .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to open the history database")?;

    let now = Local::now().naive_local();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let inserted = db::seed(&pool, now).await?;
            println!("Seed data inserted ({inserted} records).");
        }
        Commands::Ask {
            question,
            enrich,
            user,
        } => {
            let question = question.trim().to_string();
            if question.is_empty() {
                anyhow::bail!("the question must not be empty");
            }

            let user = db::fetch_or_create_user(&pool, &user, now).await?;
            let answer = answers::draw(&mut thread_rng());
            db::insert_record(&pool, user.id, &question, answer, now).await?;

            println!("{}", answer.text);
            println!("{}", answer.text_en);

            if enrich {
                match enrich::EnrichClient::from_env() {
                    Some(client) => {
                        match client.personalize(&question, answer, &user.name).await {
                            Ok(reading) => println!("\n{reading}"),
                            Err(error) => println!("\nEnrichment unavailable: {error:#}"),
                        }
                    }
                    None => println!("\nEnrichment unavailable: GEMINI_API_KEY is not set."),
                }
            }
        }
        Commands::History { limit } => {
            let records = db::fetch_recent(&pool, limit).await?;

            if records.is_empty() {
                println!("No questions recorded yet.");
                return Ok(());
            }

            for record in records {
                println!(
                    "- [{}] {} → {} ({})",
                    record.asked_at, record.question, record.answer, record.category
                );
            }
        }
        Commands::Import { csv } => {
            let user = db::fetch_or_create_user(&pool, "Seeker", now).await?;
            let inserted = db::import_csv(&pool, user.id, &csv).await?;
            println!("Inserted {inserted} records from {}.", csv.display());
        }
        Commands::Stats { json } => {
            let records = db::fetch_records(&pool).await?;
            let snapshot = stats::compute_statistics(&records, now, DEFAULT_WEEK_START);

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }

            print_dashboard(&snapshot);
        }
        Commands::Report { out } => {
            let user = db::fetch_or_create_user(&pool, "Seeker", now).await?;
            let records = db::fetch_records(&pool).await?;
            let snapshot = stats::compute_statistics(&records, now, DEFAULT_WEEK_START);

            let mut recent = records;
            recent.reverse();

            let report = report::build_report(&user.name, &snapshot, &recent);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn print_dashboard(snapshot: &models::Statistics) {
    println!(
        "Questions: {} total, {} today, {} this week",
        snapshot.total_questions, snapshot.questions_today, snapshot.questions_this_week
    );
    println!(
        "Mix: positive {} ({:.1}%), neutral {} ({:.1}%), negative {} ({:.1}%)",
        snapshot.positive_count,
        snapshot.positive_percentage,
        snapshot.neutral_count,
        snapshot.neutral_percentage,
        snapshot.negative_count,
        snapshot.negative_percentage
    );
    println!(
        "Usage: {} days, {:.1} questions per day",
        snapshot.total_days_used, snapshot.average_questions_per_day
    );
    if let (Some(first), Some(last)) = (snapshot.first_question_at, snapshot.last_question_at) {
        println!("First question {}, last question {}", first.date(), last.date());
    }

    println!();
    println!("Last 7 days:");
    for day in &snapshot.daily_trend {
        println!("  {}  {:>3}", day.date, day.count);
    }

    println!();
    println!("Top answers:");
    if snapshot.top_answers.is_empty() {
        println!("  (none yet)");
    } else {
        for answer in &snapshot.top_answers {
            println!("  {:>3} × {} ({})", answer.count, answer.answer, answer.category);
        }
    }
}
