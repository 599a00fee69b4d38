use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use triage_core::{Config, Mode, Session, Step, StepClock};
use triage_data::{open_session, CategoryDir, ItemFile, Paths};
use triage_export::{export_rows, result_filename, save_results, to_csv_bytes, Summary};

use crate::render::render_transcript;

const RULE: &str = "────────────────────────────────────────────────────────";
const HELP: &str = "Enter an option number to confirm it. Commands: \
:save (write results so far), :goto N (move to item N between items), :show (reprint dialogue), \
:reset (discard everything), :quit (save and exit).\n\
Confirmed steps cannot be changed afterwards.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Select(usize),
    Save,
    Goto(usize),
    Show,
    Reset,
    Quit,
    Help,
    Empty,
    Invalid(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if let Ok(n) = line.parse::<usize>() {
        return Input::Select(n);
    }

    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(":save"), None, None) => Input::Save,
        (Some(":goto"), Some(n), None) => match n.parse() {
            Ok(n) => Input::Goto(n),
            Err(_) => Input::Invalid(line.to_string()),
        },
        (Some(":show"), None, None) => Input::Show,
        (Some(":reset"), None, None) => Input::Reset,
        (Some(":quit") | Some(":q"), None, None) => Input::Quit,
        (Some(":help") | Some("?"), None, None) => Input::Help,
        _ => Input::Invalid(line.to_string()),
    }
}

/// How the interactive loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    Quit,
    Reset,
}

/// Terminal front end over a started session
pub struct Wizard<'a, R, W> {
    session: &'a mut Session,
    clock: StepClock,
    input: R,
    output: W,
    shown_item: Option<usize>,
}

impl<'a, R: BufRead, W: Write> Wizard<'a, R, W> {
    pub fn new(session: &'a mut Session, input: R, output: W) -> Self {
        Self {
            session,
            clock: StepClock::new(),
            input,
            output,
            shown_item: None,
        }
    }

    /// Drive the session until it completes, the evaluator quits, or input ends
    pub fn run(
        mut self,
        save: &mut dyn FnMut(&Session) -> anyhow::Result<PathBuf>,
    ) -> anyhow::Result<Outcome> {
        writeln!(self.output, "{HELP}")?;

        loop {
            if self.session.is_complete() {
                let (_, total) = self.session.progress();
                writeln!(self.output, "\nAll {total} items annotated.")?;
                return Ok(Outcome::Complete);
            }
            if !self.session.is_started() {
                return Ok(Outcome::Reset);
            }

            self.clock.start();
            let options = self.session.current_options();
            self.render(&options)?;

            write!(self.output, "> ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Outcome::Quit);
            }

            match parse_input(&line) {
                Input::Select(n) => {
                    let Some(choice) = n.checked_sub(1).and_then(|i| options.get(i)) else {
                        writeln!(
                            self.output,
                            "Choose a number between 1 and {}.",
                            options.len()
                        )?;
                        continue;
                    };
                    self.confirm(Some(choice.as_str()))?;
                }
                Input::Empty => self.confirm(None)?,
                Input::Save => self.save(save)?,
                Input::Goto(n) => {
                    match n
                        .checked_sub(1)
                        .ok_or_else(|| "item numbers start at 1".to_string())
                        .and_then(|i| self.session.jump_to(i).map_err(|e| e.to_string()))
                    {
                        Ok(()) => {
                            self.clock.stop();
                            self.shown_item = None;
                        }
                        Err(e) => writeln!(self.output, "{e}")?,
                    }
                }
                Input::Show => self.shown_item = None,
                Input::Reset => {
                    self.session.reset();
                    writeln!(self.output, "Session reset; all answers discarded.")?;
                    return Ok(Outcome::Reset);
                }
                Input::Quit => return Ok(Outcome::Quit),
                Input::Help => writeln!(self.output, "{HELP}")?,
                Input::Invalid(text) => {
                    writeln!(self.output, "Unrecognized input '{text}'. Type :help.")?
                }
            }
        }
    }

    // The step timer only restarts once the session accepts the answer
    fn confirm(&mut self, selected: Option<&str>) -> anyhow::Result<()> {
        let elapsed = self.clock.elapsed_secs();
        match self.session.confirm_step(selected, elapsed) {
            Ok(_) => {
                self.clock.lap();
            }
            Err(e) => writeln!(self.output, "{e}")?,
        }
        Ok(())
    }

    fn save(
        &mut self,
        save: &mut dyn FnMut(&Session) -> anyhow::Result<PathBuf>,
    ) -> anyhow::Result<()> {
        let (done, total) = self.session.progress();
        if done == 0 {
            writeln!(self.output, "No completed evaluations yet.")?;
            return Ok(());
        }
        match save(&*self.session) {
            Ok(path) => writeln!(
                self.output,
                "Saved {done} of {total} results to {}",
                path.display()
            )?,
            Err(e) => writeln!(self.output, "Save failed: {e:#}")?,
        }
        Ok(())
    }

    fn render(&mut self, options: &[String]) -> anyhow::Result<()> {
        let (Some(item), Some(step), Some(pointer)) = (
            self.session.current_item(),
            self.session.current_step(),
            self.session.pointer(),
        ) else {
            return Ok(());
        };
        let (done, total) = self.session.progress();

        if self.shown_item != Some(pointer) {
            writeln!(self.output, "\n{RULE}")?;
            writeln!(
                self.output,
                "Progress: {done} / {total} completed | Evaluator {} ({})",
                self.session.evaluator_id().unwrap_or("-"),
                self.session.mode().unwrap_or(Mode::Plain),
            )?;
            writeln!(
                self.output,
                "Dialogue #{} (item {} of {}, {})",
                item.id,
                pointer + 1,
                total,
                item.bracket
            )?;
            writeln!(self.output, "{RULE}")?;
            if item.transcript.is_empty() {
                writeln!(self.output, "(no dialogue recorded)")?;
            } else {
                writeln!(self.output, "{}", render_transcript(&item.transcript))?;
            }
            writeln!(self.output, "{RULE}")?;
            self.shown_item = Some(pointer);
        }

        writeln!(self.output, "\n{}", step_indicator(step))?;
        if let Some(pending) = self.session.pending() {
            match &pending.sub {
                Some(sub) => writeln!(
                    self.output,
                    "Selected major: {} | sub: {}",
                    pending.major, sub
                )?,
                None => writeln!(self.output, "Selected major: {}", pending.major)?,
            }
        }
        if let Some(prediction) = self.session.current_prediction() {
            writeln!(self.output, "Model answer: {prediction}")?;
        }

        if options.is_empty() {
            writeln!(
                self.output,
                "No options available for this item. Use :goto N, :save or :quit."
            )?;
        } else {
            writeln!(self.output, "Select {}:", step.label())?;
            for (i, option) in options.iter().enumerate() {
                writeln!(self.output, "  {:>2}) {}", i + 1, option)?;
            }
        }
        Ok(())
    }
}

fn step_indicator(current: Step) -> String {
    Step::ALL
        .iter()
        .map(|&step| {
            let mark = if step.index() < current.index() {
                "✓"
            } else if step == current {
                "●"
            } else {
                "○"
            };
            format!("{mark} {}. {}", step.index() + 1, step.label())
        })
        .collect::<Vec<_>>()
        .join("   ")
}

fn save_session(session: &Session, results_dir: &Path) -> anyhow::Result<PathBuf> {
    let rows = export_rows(session);
    let bytes = to_csv_bytes(&rows)?;
    let filename = result_filename(
        session.evaluator_id().unwrap_or("unknown"),
        session.mode().unwrap_or(Mode::Plain),
        Local::now().naive_local(),
    );
    Ok(save_results(results_dir, &filename, &bytes)?)
}

fn finish(
    session: &Session,
    save: &mut dyn FnMut(&Session) -> anyhow::Result<PathBuf>,
) -> anyhow::Result<()> {
    let (done, total) = session.progress();
    if done == 0 {
        println!("No completed evaluations yet. Nothing was saved.");
        return Ok(());
    }

    let path = save(session)?;
    let summary = Summary::from_rows(&export_rows(session), total);
    println!("{summary}");
    println!("Results saved to {}", path.display());
    Ok(())
}

pub fn run(config: &Config, evaluator: &str, mode: Mode, start: usize) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let items = ItemFile::new(paths.items_file(config));
    let categories = CategoryDir::new(paths.categories_dir(config));
    let mut session = open_session(&items, &categories)?;

    let start_index = start
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("start item number must be 1 or greater"))?;
    session.start(evaluator, mode, start_index)?;

    let results_dir = paths.results_dir(config);
    let mut save = |s: &Session| save_session(s, &results_dir);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let outcome = Wizard::new(&mut session, stdin.lock(), stdout.lock()).run(&mut save)?;
    tracing::info!(?outcome, "annotation finished");

    match outcome {
        Outcome::Reset => {
            println!("Session discarded. Run annotate again to start over.");
            Ok(())
        }
        Outcome::Complete | Outcome::Quit => finish(&session, &mut save),
    }
}
