use std::fs;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use suggest_engine::{settings, CatalogSource, ControllerOutput, KeyEvent, SuggestController};

/// How long `wait` blocks for the fetch worker before giving up.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "suggesttool", about = "Suggestion session diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay an interaction script against an in-memory catalog
    Replay {
        /// JSON array of {"value", "label"} objects
        catalog_file: String,
        /// Script file, one step per line (type, wait, up, down, enter, tab,
        /// escape, click, hover, reset, blur)
        script_file: String,
        /// Settings TOML overriding the built-in defaults
        #[arg(long)]
        settings: Option<String>,
    },

    /// Print the built-in settings TOML
    Settings,
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Type(String),
    Wait(Duration),
    Key(KeyEvent),
    Click(usize),
    Hover(usize),
    Reset,
    Blur,
}

fn parse_step(line: &str) -> Result<Step> {
    let (verb, arg) = match line.split_once(' ') {
        Some((verb, arg)) => (verb, Some(arg)),
        None => (line, None),
    };
    let index = || -> Result<usize> {
        arg.context("missing row index")?
            .trim()
            .parse()
            .context("row index must be a number")
    };
    let step = match verb {
        "type" => Step::Type(arg.unwrap_or_default().to_string()),
        "wait" => {
            let ms: u64 = arg
                .context("missing duration")?
                .trim()
                .parse()
                .context("duration must be milliseconds")?;
            Step::Wait(Duration::from_millis(ms))
        }
        // Caret offsets are filled in at replay time.
        "up" => Step::Key(KeyEvent::ArrowUp { caret: 0 }),
        "down" => Step::Key(KeyEvent::ArrowDown { caret: 0 }),
        "enter" => Step::Key(KeyEvent::Enter),
        "tab" => Step::Key(KeyEvent::Tab),
        "escape" => Step::Key(KeyEvent::Escape),
        "click" => Step::Click(index()?),
        "hover" => Step::Hover(index()?),
        "reset" => Step::Reset,
        "blur" => Step::Blur,
        other => bail!("unknown step {other:?}"),
    };
    Ok(step)
}

fn parse_script(script: &str) -> Result<Vec<(String, Step)>> {
    script
        .lines()
        .enumerate()
        .map(|(n, line)| (n, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            let step = parse_step(line).with_context(|| format!("line {}", n + 1))?;
            Ok((line.to_string(), step))
        })
        .collect()
}

#[derive(Serialize)]
struct ReplayLine<'a> {
    step: &'a str,
    #[serde(flatten)]
    output: &'a ControllerOutput,
}

fn emit(out: &mut impl Write, step: &str, output: &ControllerOutput) -> Result<()> {
    if output.is_empty() {
        return Ok(());
    }
    serde_json::to_writer(&mut *out, &ReplayLine { step, output })?;
    writeln!(out)?;
    Ok(())
}

fn replay(catalog_file: &str, script_file: &str, settings_file: Option<&str>) -> Result<()> {
    if let Some(path) = settings_file {
        let content = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        settings::init_custom(content).with_context(|| format!("loading {path}"))?;
    }
    let catalog_json =
        fs::read_to_string(catalog_file).with_context(|| format!("reading {catalog_file}"))?;
    let catalog = CatalogSource::from_json(&catalog_json)
        .with_context(|| format!("parsing {catalog_file}"))?;
    let script =
        fs::read_to_string(script_file).with_context(|| format!("reading {script_file}"))?;
    let steps = parse_script(&script)?;

    let mut controller = SuggestController::with_source(settings::settings(), Arc::new(catalog))
        .context("starting fetch worker")?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    // Virtual clock: only `wait` advances time.
    let mut now = Instant::now();

    for (line, step) in steps {
        let caret = controller.session().query().chars().count();
        let output = match step {
            Step::Type(text) => controller.edit(&text, now),
            Step::Wait(duration) => {
                now += duration;
                let output = controller.tick(now);
                emit(&mut out, &line, &output)?;
                while controller.awaiting_fetch() {
                    match controller.poll_timeout(FETCH_TIMEOUT, now) {
                        Some(result) => emit(&mut out, "fetch", &result)?,
                        None => bail!("fetch worker did not answer within {FETCH_TIMEOUT:?}"),
                    }
                }
                continue;
            }
            Step::Key(KeyEvent::ArrowUp { .. }) => {
                controller.handle_key(KeyEvent::ArrowUp { caret }, now)
            }
            Step::Key(KeyEvent::ArrowDown { .. }) => {
                controller.handle_key(KeyEvent::ArrowDown { caret }, now)
            }
            Step::Key(key) => controller.handle_key(key, now),
            Step::Click(index) => controller.select_at(index, now),
            Step::Hover(index) => controller.hover(index, now),
            Step::Reset => controller.reset_selection(now),
            Step::Blur => controller.blur(now),
        };
        emit(&mut out, &line, &output)?;
    }
    controller.teardown();
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Replay {
            catalog_file,
            script_file,
            settings,
        } => replay(&catalog_file, &script_file, settings.as_deref()),
        Command::Settings => {
            print!("{}", settings::default_toml());
            Ok(())
        }
    }
}
