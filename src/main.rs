use std::{env, path::PathBuf};

use anyhow::Context;
use ielts_lessons::{
    catalog::{check_course, load_course, Course},
    config::Config,
};
use tracing_subscriber::EnvFilter;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const USAGE: &str = "Usage: ielts-lessons <list|check> [lessons_dir]";

enum Command {
    List,
    Check,
}

struct Args {
    command: Command,
    lessons_dir: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let command = match args.next().as_deref() {
        Some("list") => Command::List,
        Some("check") => Command::Check,
        Some(other) => return Err(anyhow::anyhow!("unknown command '{}'", other)),
        None => return Err(anyhow::anyhow!("a command is required")),
    };
    let lessons_dir = args.next().map(PathBuf::from);

    Ok(Args {
        command,
        lessons_dir,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", USAGE);
            return Err(e);
        }
    };

    let config = Config::from_env().context("invalid configuration")?;
    let lessons_dir = args.lessons_dir.unwrap_or(config.lessons_dir);
    let course = load_course(&lessons_dir)
        .context(format!("could not open course in {}", lessons_dir.display()))?;

    match args.command {
        Command::List => list_lessons(&course),
        Command::Check => {
            let report = check_course(&course);
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize report")?
            );
            if !report.is_healthy() {
                return Err(anyhow::anyhow!(
                    "{} lesson(s) failed to load, {} vocabulary term(s) unreachable",
                    report.failed_lessons.len(),
                    report.unreachable_terms_count
                ));
            }
        }
    }

    Ok(())
}

fn list_lessons(course: &Course) {
    println!("{BOLD}{}{RESET}", course.title);
    println!("{}\n", course.description);

    for entry in &course.lessons {
        let icon = entry.icon.as_deref().unwrap_or("-");
        println!(
            "{} {BOLD}{:>2}{RESET}  {}  ({})",
            icon, entry.number, entry.title, entry.topic
        );
    }
}
