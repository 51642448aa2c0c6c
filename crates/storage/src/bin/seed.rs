use std::fmt;

use chrono::{DateTime, Duration, Utc};
use storage::Storage;
use study_core::model::{
    AnalysisResult, ArticleId, Flashcard, Question, Quiz, QuizSettings, SavedArticle, Specialty,
    Topic,
};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    specialty: String,
    articles: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidArticles { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidArticles { raw } => write!(f, "invalid --articles value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("STUDY_DB_URL").unwrap_or_else(|_| "sqlite://study.sqlite3?mode=rwc".into());
        let mut specialty = "Cardiology".to_string();
        let mut articles = 3_u32;
        let mut now = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--specialty" => specialty = require_value(&mut args, "--specialty")?,
                "--articles" => {
                    let value = require_value(&mut args, "--articles")?;
                    articles = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidArticles { raw: value })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value })?;
                    now = Some(parsed.with_timezone(&Utc));
                }
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            specialty,
            articles,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://study.sqlite3?mode=rwc)");
    eprintln!("  --specialty <label>       Specialty to file the articles under (default: Cardiology)");
    eprintln!("  --articles <n>            Number of sample articles to save (default: 3)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_DB_URL");
}

fn sample_analysis(n: u32) -> Result<AnalysisResult, study_core::error::Error> {
    let samples = [
        ("Preload", "Ventricular wall stretch at end-diastole", "Physiology"),
        ("Afterload", "Resistance the ventricle pumps against", "Physiology"),
        ("Ejection fraction", "Stroke volume divided by end-diastolic volume", "Physiology"),
        ("Loop diuretic", "Inhibits NKCC2 in the thick ascending limb", "Pharmacology"),
        ("Beta blocker", "Reduces mortality in HFrEF", "Pharmacology"),
    ];

    let mut questions = Vec::new();
    let mut flashcards = Vec::new();
    for (term, definition, topic) in samples {
        let topic = Topic::new(topic)?;
        questions.push(Question::new(
            format!("Which statement best describes {term}?"),
            [
                definition.to_string(),
                "Heart rate times stroke volume".to_string(),
                "Pressure in the right atrium".to_string(),
                "None of the above".to_string(),
            ],
            0,
            format!("{term}: {definition}."),
            topic.clone(),
        )?);
        flashcards.push(Flashcard::new(term, definition, topic)?);
    }

    let quiz = Quiz::new(
        format!("Heart failure basics #{n}"),
        QuizSettings::new(1.0, -0.25)?,
        questions,
    )?;
    Ok(AnalysisResult::new(
        "<h2>Heart failure</h2><p>Sample summary seeded for local development.</p>",
        quiz,
        flashcards,
    )?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);
    let specialty = Specialty::new(args.specialty.clone())?;
    let mut rng = rand::rng();

    for i in 0..args.articles {
        let saved_at = now - Duration::days(i64::from(i));
        let article = SavedArticle::new(
            ArticleId::generate(saved_at, &mut rng),
            format!("heart-failure-{}.pdf", i + 1),
            specialty.clone(),
            sample_analysis(i + 1)?,
            saved_at,
        )?;
        storage.library.prepend_article(&article).await?;
    }

    println!(
        "Seeded {} articles under {} into {}",
        args.articles, specialty, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
