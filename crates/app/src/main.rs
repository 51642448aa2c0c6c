use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock, SaveArticleDraft, ServicesConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ui::{App, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://study.sqlite3";
const DEFAULT_LOG_FILTER: &str = "app=info,services=info,storage=info";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingPdf,
    MissingSpecialty,
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingPdf => write!(f, "analyze requires a PDF path"),
            ArgsError::MissingSpecialty => write!(f, "--save requires --specialty <label>"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  study-aid ui      [--db <sqlite_url>] [--export-dir <dir>]");
    eprintln!("  study-aid analyze <pdf> [--db <sqlite_url>] [--export-dir <dir>]");
    eprintln!("                    [--export] [--save --specialty <label>]");
    eprintln!("  study-aid library [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --export-dir exports");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_DB_URL, STUDY_EXPORT_DIR, STUDY_AI_API_KEY, STUDY_AI_BASE_URL,");
    eprintln!("  STUDY_AI_MODEL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Analyze,
    Library,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "analyze" => Some(Self::Analyze),
            "library" => Some(Self::Library),
            _ => None,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    db_url: String,
    export_dir: Option<PathBuf>,
    pdf: Option<PathBuf>,
    export: bool,
    save: bool,
    specialty: Option<String>,
}

impl Args {
    fn parse(
        cmd: Command,
        args: &mut impl Iterator<Item = String>,
        env_db_url: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            db_url: env_db_url.map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url),
            ..Self::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--export-dir" => {
                    parsed.export_dir = Some(PathBuf::from(require_value(args, "--export-dir")?));
                }
                "--export" if cmd == Command::Analyze => parsed.export = true,
                "--save" if cmd == Command::Analyze => parsed.save = true,
                "--specialty" if cmd == Command::Analyze => {
                    parsed.specialty = Some(require_value(args, "--specialty")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other
                    if cmd == Command::Analyze
                        && parsed.pdf.is_none()
                        && !other.starts_with("--") =>
                {
                    parsed.pdf = Some(PathBuf::from(other));
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Analyze {
            if parsed.pdf.is_none() {
                return Err(ArgsError::MissingPdf);
            }
            if parsed.save && parsed.specialty.is_none() {
                return Err(ArgsError::MissingSpecialty);
            }
        }
        Ok(parsed)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter, std::env::var("STUDY_DB_URL").ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut config = ServicesConfig::from_env()?;
    if let Some(dir) = parsed.export_dir.clone() {
        config = config.with_export_dir(dir);
    }

    // Open + migrate SQLite here so the library crates never touch the filesystem layout.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::default(), config).await?;
    info!(db = %parsed.db_url, command = ?cmd, "storage ready");

    match cmd {
        Command::Ui => {
            let context = build_app_context(Arc::new(services));

            // Some window managers default new windows to always-on-top.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Study Aid")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Analyze => analyze(&services, parsed).await,
        Command::Library => {
            print_library(&services).await;
            Ok(())
        }
    }
}

async fn analyze(services: &AppServices, args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let Some(pdf) = args.pdf else {
        return Err(ArgsError::MissingPdf.into());
    };

    let document = services.analysis().analyze_file(&pdf).await.map_err(|err| {
        eprintln!("{}", err.user_message());
        err
    })?;
    let analysis = document.analysis();
    let quiz = analysis.quiz();

    println!("# {}", document.file_name());
    println!();
    println!("{}", html2md::parse_html(analysis.summary()).trim());
    println!();
    println!(
        "Quiz \"{}\": {} questions. Flashcards: {}.",
        quiz.title(),
        quiz.questions().len(),
        analysis.flashcards().len()
    );

    if args.export {
        let exports = services.exports();
        let csv = exports
            .write_flashcards(document.file_name(), analysis.flashcards())
            .await?;
        let doc = exports.write_quiz(document.file_name(), quiz).await?;
        println!("Wrote {}", csv.display());
        println!("Wrote {}", doc.display());
    }

    if args.save {
        let specialty = args.specialty.unwrap_or_default();
        let outcome = services
            .library()
            .save(SaveArticleDraft {
                file_name: document.file_name().to_string(),
                specialty: specialty.clone(),
                analysis: analysis.clone(),
            })
            .await?;
        match outcome.saved {
            Some(id) => println!(
                "Saved {id} under {specialty} ({} articles in library).",
                outcome.articles.len()
            ),
            None => eprintln!("Could not save to the library; see the log for details."),
        }
    }
    Ok(())
}

async fn print_library(services: &AppServices) {
    let groups = services.library().by_specialty().await;
    if groups.is_empty() {
        println!("Library is empty.");
        return;
    }
    for group in groups {
        println!("{}", group.specialty);
        for article in &group.articles {
            println!(
                "  {}  {}  {}  ({} questions, {} flashcards)",
                article.id(),
                article.saved_at().format("%Y-%m-%d %H:%M"),
                article.file_name(),
                article.analysis().quiz().questions().len(),
                article.analysis().flashcards().len()
            );
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(cmd: Command, args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(ToString::to_string);
        Args::parse(cmd, &mut iter, None)
    }

    #[test]
    fn analyze_takes_pdf_and_save_flags() {
        let args = parse(
            Command::Analyze,
            &["paper.pdf", "--save", "--specialty", "Cardiology", "--export"],
        )
        .unwrap();
        assert_eq!(args.pdf, Some(PathBuf::from("paper.pdf")));
        assert!(args.save && args.export);
        assert_eq!(args.specialty.as_deref(), Some("Cardiology"));
        assert_eq!(args.db_url, DEFAULT_DB_URL);
    }

    #[test]
    fn save_without_specialty_is_rejected() {
        assert!(matches!(
            parse(Command::Analyze, &["paper.pdf", "--save"]),
            Err(ArgsError::MissingSpecialty)
        ));
        assert!(matches!(parse(Command::Analyze, &[]), Err(ArgsError::MissingPdf)));
    }

    #[test]
    fn ui_rejects_analyze_flags() {
        assert!(matches!(
            parse(Command::Ui, &["--save"]),
            Err(ArgsError::UnknownArg(arg)) if arg == "--save"
        ));
        assert!(matches!(
            parse(Command::Library, &["--db"]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
    }

    #[test]
    fn sqlite_urls_are_made_absolute() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(normalize_sqlite_url("sqlite:///tmp/a.db".into()), "sqlite:///tmp/a.db");
        assert_eq!(normalize_sqlite_url("sqlite:/tmp/b.db".into()), "sqlite:///tmp/b.db");
    }
}
