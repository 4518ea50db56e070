pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use ripasso::{
    config::{Config, ConfigStore, FileConfigStore},
    conjugation::{GridAnswers, GridCell},
    dataset,
    runtime::{CrosstermEventSource, FixedTicker, PracticeEvent, Runner},
    trainer::{Mode, TimerView, Trainer},
    typing::{RoundResult, Submission},
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, SystemTime},
};

const TICK_RATE_MS: u64 = 100;

/// practice tool for vocabulary typing drills and verb conjugation quizzes
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal practice tool with two exercise modes: a timed typing drill over a vocabulary list and a verb conjugation quiz with a full person/tense answer grid."
)]
pub struct Cli {
    /// exercise mode to open with
    #[clap(short, long, value_enum)]
    mode: Option<CliMode>,

    /// number of words in a typing round
    #[clap(short = 'w', long)]
    round_size: Option<usize>,

    /// vocabulary JSON file (flat array of strings) overriding the bundled list
    #[clap(long)]
    words_file: Option<PathBuf>,

    /// conjugation JSON file (array of {verb, answers}) overriding the bundled table
    #[clap(long)]
    conjugations_file: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum CliMode {
    Typing,
    Conjugation,
}

impl Cli {
    /// Persisted config overlaid with whatever was given on the command line
    fn apply_to(&self, cfg: &mut Config) {
        if let Some(mode) = self.mode {
            cfg.mode = mode.to_string().to_lowercase();
        }
        if let Some(round_size) = self.round_size {
            cfg.round_size = round_size;
        }
        if self.words_file.is_some() {
            cfg.words_file = self.words_file.clone();
        }
        if self.conjugations_file.is_some() {
            cfg.conjugations_file = self.conjugations_file.clone();
        }
    }
}

fn mode_from_config(cfg: &Config) -> Mode {
    match cfg.mode.as_str() {
        "conjugation" => Mode::Conjugation,
        _ => Mode::Typing,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Menu,
    Typing,
    Conjugation,
    Results,
}

/// Input state for the conjugation grid, one buffer per cell.
#[derive(Debug, Default)]
pub struct GridInput {
    pub cells: Vec<GridCell>,
    pub values: Vec<String>,
    pub focus: usize,
}

impl GridInput {
    fn new(cells: Vec<GridCell>) -> Self {
        let values = vec![String::new(); cells.len()];
        Self {
            cells,
            values,
            focus: 0,
        }
    }

    fn next(&mut self) {
        if !self.cells.is_empty() {
            self.focus = (self.focus + 1) % self.cells.len();
        }
    }

    fn prev(&mut self) {
        if !self.cells.is_empty() {
            self.focus = (self.focus + self.cells.len() - 1) % self.cells.len();
        }
    }

    fn answers(&self) -> GridAnswers {
        self.cells
            .iter()
            .zip(&self.values)
            .map(|(cell, value)| {
                (
                    (cell.person.clone(), cell.form.clone()),
                    value.clone(),
                )
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct App {
    pub trainer: Trainer,
    pub state: AppState,
    pub input: String,
    pub grid: GridInput,
    pub timer: Option<TimerView>,
    pub round_result: Option<RoundResult>,
    pub flash: bool,
    pub notice: Option<String>,
}

impl App {
    pub fn new(trainer: Trainer) -> Self {
        Self {
            trainer,
            state: AppState::Menu,
            input: String::new(),
            grid: GridInput::default(),
            timer: None,
            round_result: None,
            flash: false,
            notice: None,
        }
    }

    /// Starts a round in the active mode; on failure the app stays on the
    /// menu with the error surfaced inline.
    fn start_round(&mut self) {
        self.input.clear();
        self.flash = false;
        self.notice = None;
        self.round_result = None;

        match self.trainer.start(SystemTime::now()) {
            Ok(()) => match self.trainer.mode() {
                Mode::Typing => {
                    self.timer = self.trainer.tick(SystemTime::now());
                    self.state = AppState::Typing;
                }
                Mode::Conjugation => {
                    let cells = self
                        .trainer
                        .conjugation()
                        .map(|s| s.cells())
                        .unwrap_or_default();
                    self.grid = GridInput::new(cells);
                    self.state = AppState::Conjugation;
                }
            },
            Err(e) => {
                self.trainer.reset();
                self.notice = Some(e.to_string());
                self.state = AppState::Menu;
            }
        }
    }

    fn back_to_menu(&mut self) {
        self.trainer.reset();
        self.timer = None;
        self.round_result = None;
        self.input.clear();
        self.flash = false;
        self.state = AppState::Menu;
    }

    pub fn on_tick(&mut self) {
        self.timer = self.trainer.tick(SystemTime::now());
    }

    /// Handles one key event. Returns true when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.state {
            AppState::Menu => match key.code {
                KeyCode::Esc => return true,
                KeyCode::Char('t') => {
                    self.trainer.select_mode(Mode::Typing);
                    self.notice = None;
                }
                KeyCode::Char('c') => {
                    self.trainer.select_mode(Mode::Conjugation);
                    self.notice = None;
                }
                KeyCode::Enter | KeyCode::Char('s') => self.start_round(),
                _ => {}
            },
            AppState::Typing => match key.code {
                KeyCode::Esc => self.back_to_menu(),
                KeyCode::Backspace => {
                    self.input.pop();
                    self.flash = false;
                }
                KeyCode::Enter => self.submit_word(),
                KeyCode::Char(c) => {
                    self.input.push(c);
                    self.flash = false;
                }
                _ => {}
            },
            AppState::Conjugation => match key.code {
                KeyCode::Esc => self.back_to_menu(),
                KeyCode::Tab | KeyCode::Down => self.grid.next(),
                KeyCode::BackTab | KeyCode::Up => self.grid.prev(),
                KeyCode::Backspace => {
                    if let Some(value) = self.grid.values.get_mut(self.grid.focus) {
                        value.pop();
                    }
                }
                KeyCode::Enter => self.submit_grid(),
                KeyCode::Char(c) => {
                    if let Some(value) = self.grid.values.get_mut(self.grid.focus) {
                        value.push(c);
                    }
                }
                _ => {}
            },
            AppState::Results => match key.code {
                KeyCode::Esc => return true,
                KeyCode::Char('r') => self.start_round(),
                KeyCode::Char('m') => self.back_to_menu(),
                _ => {}
            },
        }
        false
    }

    fn submit_word(&mut self) {
        match self.trainer.submit_typed_word(&self.input) {
            Some(Submission::Advanced) => {
                self.input.clear();
                self.flash = false;
            }
            Some(Submission::Finished) => {
                self.input.clear();
                self.flash = false;
                self.timer = None;
                // Freeze the scores now; rendering later must not stretch the clock
                self.round_result = self
                    .trainer
                    .typing()
                    .and_then(|s| s.finish(SystemTime::now()));
                self.state = AppState::Results;
            }
            Some(Submission::NoMatch) => {
                // Transient cue only; the session itself is untouched
                self.flash = true;
            }
            None => {}
        }
    }

    fn submit_grid(&mut self) {
        let answers = self.grid.answers();
        if self.trainer.submit_conjugation_grid(&answers).is_some() {
            self.state = AppState::Results;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut cfg = store.load();
    cli.apply_to(&mut cfg);
    let _ = store.save(&cfg);

    let words = dataset::load_words(cfg.words_file.as_deref());
    let conjugations = dataset::load_conjugations(cfg.conjugations_file.as_deref());

    let mut trainer = Trainer::new(words, conjugations, cfg.round_size);
    trainer.select_mode(mode_from_config(&cfg));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(trainer);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            PracticeEvent::Tick => app.on_tick(),
            PracticeEvent::Resize => {}
            PracticeEvent::Key(key) => {
                if app.on_key(key) {
                    break;
                }
            }
        }
    }

    Ok(())
}
