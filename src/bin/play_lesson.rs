use std::io::{self, BufRead, Write};
use std::{env, path::PathBuf, thread};

use anyhow::Context;
use ielts_lessons::{
    catalog::load_course,
    config::Config,
    engine::{AudioCue, Transition},
    lesson::{load_lesson, option_label, text::spans, Lesson, Step},
    quiz::{OptionMark, Selection},
    reveal::{ManualClock, Stage},
    session::LessonSession,
};
use tracing_subscriber::EnvFilter;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const UNDERLINE: &str = "\x1b[4m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

const USAGE: &str = "Usage: play_lesson <lesson_number|lesson.yaml> [lessons_dir]";
const HELP: &str = "n: next   p: back   a/b/c...: answer   v <term>: collect a word   r: replay   q: quit";

type Session = LessonSession<ManualClock>;

struct PlayArgs {
    lesson: String,
    lessons_dir: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<PlayArgs> {
    let lesson = args
        .next()
        .context("a lesson number or a lesson file is required")?;
    let lessons_dir = args.next().map(PathBuf::from);

    Ok(PlayArgs {
        lesson,
        lessons_dir,
    })
}

fn open_lesson(args: &PlayArgs, config: &Config) -> anyhow::Result<Lesson> {
    match args.lesson.parse::<u32>() {
        Ok(number) => {
            let dir = args.lessons_dir.as_ref().unwrap_or(&config.lessons_dir);
            let course = load_course(dir)
                .context(format!("could not open course in {}", dir.display()))?;
            course.load_lesson(number)
        }
        Err(_) => load_lesson(PathBuf::from(&args.lesson).as_path()),
    }
}

struct Bell;

impl AudioCue for Bell {
    fn play_victory(&mut self) {
        print!("\x07");
        let _ = io::stdout().flush();
    }
}

#[derive(Debug, PartialEq)]
enum Input {
    Next,
    Back,
    Pick(usize),
    Term(String),
    MissingTerm,
    Replay,
    Quit,
    Help,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if let Some(term) = line.strip_prefix("v ") {
        return Input::Term(term.trim().to_string());
    }

    match line {
        "v" => Input::MissingTerm,
        "" | "n" => Input::Next,
        "p" => Input::Back,
        "r" => Input::Replay,
        "q" => Input::Quit,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => {
                    Input::Pick((c.to_ascii_lowercase() as u8 - b'a') as usize)
                }
                _ => other
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .map(Input::Pick)
                    .unwrap_or(Input::Help),
            }
        }
    }
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
    let lesson = open_lesson(&args, &config)?;

    let clock = ManualClock::new();
    let mut session = LessonSession::new(lesson, clock.clone(), config.session_settings())
        .context("lesson cannot be played")?
        .with_audio(Bell);

    println!("{BOLD}{}{RESET}\n{DIM}{}{RESET}\n", session.title(), HELP);
    show_slide(&session, &clock);

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;

        match parse_input(&line) {
            Input::Next => match session.advance() {
                Transition::Moved { .. } => show_slide(&session, &clock),
                Transition::Completed => {
                    show_badge(&mut session);
                    break;
                }
                Transition::Ignored => {}
            },
            Input::Back => match session.retreat() {
                Transition::Moved { .. } => show_slide(&session, &clock),
                _ => println!("{DIM}this is the first step{RESET}"),
            },
            Input::Pick(index) => match session.select_option(index) {
                Selection::Accepted { .. } => show_feedback(&session),
                Selection::Ignored => println!("{DIM}nothing to answer here{RESET}"),
            },
            Input::Term(term) => match session.encounter_term(&term) {
                0 => println!("{DIM}no new word collected{RESET}"),
                xp => println!("{GREEN}+{} XP{RESET} for '{}'", xp, term),
            },
            Input::MissingTerm => println!("{DIM}type v followed by a word, e.g. v paradox{RESET}"),
            Input::Replay => {
                session.replay();
                show_slide(&session, &clock);
            }
            Input::Quit => break,
            Input::Help => println!("{DIM}{}{RESET}", HELP),
        }
    }

    Ok(())
}

fn show_slide(session: &Session, clock: &ManualClock) {
    let engine = session.engine();
    let progress = engine.progress();
    println!(
        "\n{DIM}Step {} of {} ({}%)   XP {}   Streak {}{RESET}",
        progress.step,
        progress.total,
        progress.percent,
        engine.xp(),
        engine.streak()
    );

    let parts = slide_parts(session.current_step());
    let mut shown = Stage::Hidden;
    print_parts(&parts, shown, session.stage());
    shown = shown.max(session.stage());

    // sleep through the reveal so lines appear the way they would on screen
    while !session.reveal().is_settled() {
        let Some(deadline) = clock.next_deadline() else {
            break;
        };
        let wait = deadline.saturating_sub(clock.now());
        thread::sleep(wait);
        clock.advance(wait);

        let stage = session.stage();
        print_parts(&parts, shown, stage);
        shown = stage;
    }
}

fn print_parts(parts: &[(Stage, String)], after: Stage, upto: Stage) {
    for (stage, text) in parts {
        if *stage > after && upto.shows(*stage) {
            println!("{}", text);
        }
    }
    let _ = io::stdout().flush();
}

fn slide_parts(step: &Step) -> Vec<(Stage, String)> {
    match step {
        Step::Content(content) => {
            let mut parts = vec![
                (
                    Stage::Header,
                    format!(
                        "{DIM}{}{RESET}\n{BOLD}{}{RESET}",
                        content.section_title.to_uppercase(),
                        content.headline()
                    ),
                ),
                (Stage::Label, format!("* {}", content.label)),
            ];

            if let Some(video) = &content.video {
                let text = match video.youtube_id() {
                    Some(id) => format!("[video] {} (youtube {})", video.url(), id),
                    None => format!("[video] {}", video.url()),
                };
                parts.push((Stage::Video, text));
            }

            for (index, line) in content.body.iter().enumerate() {
                let rendered: String = spans(line, &content.vocab)
                    .iter()
                    .map(|span| match (span.term.is_some(), span.bold) {
                        (true, _) => format!("{UNDERLINE}{}{RESET}", span.text),
                        (false, true) => format!("{BOLD}{}{RESET}", span.text),
                        (false, false) => span.text.to_string(),
                    })
                    .collect();
                parts.push((Stage::Line(index), format!("  | {}", rendered)));
            }

            let footer = if content.vocab.is_empty() {
                String::new()
            } else {
                let words: Vec<String> = content
                    .vocab
                    .iter()
                    .map(|v| format!("{} (ru: {}, uz: {})", v.term, v.ru, v.uz))
                    .collect();
                format!("{DIM}Interact with keywords: {}{RESET}", words.join("; "))
            };
            parts.push((Stage::Footer, footer));
            parts
        }
        Step::Quiz(quiz) => {
            let options: Vec<String> = quiz
                .options
                .iter()
                .enumerate()
                .map(|(i, option)| format!("  {}) {}", option_label(i), option))
                .collect();
            vec![
                (
                    Stage::Header,
                    format!("{DIM}KNOWLEDGE CHECK{RESET}\n{BOLD}{}{RESET}", quiz.question),
                ),
                (Stage::Options, options.join("\n")),
            ]
        }
    }
}

fn show_feedback(session: &Session) {
    let (Some(quiz), Some(evaluator)) = (session.current_step().as_quiz(), session.quiz()) else {
        return;
    };

    for (index, mark) in evaluator.marks().into_iter().enumerate() {
        let label = option_label(index);
        let option = &quiz.options[index];
        match mark {
            OptionMark::Correct => println!("{GREEN}  ✓ {}) {}{RESET}", label, option),
            OptionMark::WrongSelected => println!("{RED}  ✕ {}) {}{RESET}", label, option),
            OptionMark::Unselected | OptionMark::Idle => {
                println!("{DIM}    {}) {}{RESET}", label, option)
            }
        }
    }

    if let Some(verdict) = evaluator.verdict() {
        println!("{BOLD}{}{RESET}: {}", verdict.heading(), quiz.explanation);
    }
    let engine = session.engine();
    println!("{DIM}XP {}   Streak {}{RESET}", engine.xp(), engine.streak());
}

fn show_badge(session: &mut Session) {
    if !session.take_just_completed() {
        return;
    }
    let Some(summary) = session.summary() else {
        return;
    };

    println!("\n{BOLD}MISSION ACCOMPLISHED{RESET}");
    println!("{}", summary.title);
    println!("{BOLD}BAND 9{RESET} Certified Master");
    println!("XP {}   Streak {}", summary.xp, summary.streak);
    println!("{DIM}run the lesson again to start over{RESET}");
}
