//! `dyslexia_sim` - distortion engine demonstration binary
//!
//! Distorts a text with the three reading-difficulty rules and shows the
//! result either live in the terminal or, headless, as a final frame after
//! a simulated run.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin dyslexia_sim
//! cargo run --bin dyslexia_sim -- --help
//! cargo run --bin dyslexia_sim -- --file testo.txt --blur --fps 30
//! cargo run --bin dyslexia_sim -- --headless --seed 7 --format markup
//! ```

use dyslexia_sim::render::{TextSurface, to_markup};
use dyslexia_sim::{
    AnsiWriter, ColorMode, EngineConfig, LogLevel, Rules, Simulator,
    SubstitutionDictionary, set_log_callback,
};
use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

// ============================================================================
// CLI Parsing
// ============================================================================

const HELP_TEXT: &str = "dyslexia_sim - reading difficulty simulator

USAGE:
    dyslexia_sim [OPTIONS]

OPTIONS:
    -h, --help              Print this help message and exit
    --text <TEXT>           Text to distort
    --file <PATH>           Read the text to distort from a file
    --dict <PATH>           Substitution dictionary (key: alt1, alt2 lines)

    --letter-swap           Enable rule 1: similar letter swaps
    --blur                  Enable rule 2: pulsing blur on long words
    --word-swap             Enable rule 3: similar word substitution
                            (all rules are enabled when none is given)

    --seed <N>              Deterministic seed for every random choice
    --fps <N>               Frames per second (default: 30)
    --duration <SECS>       Run time in seconds (default: 10)
    --reset-at <MS>         Trigger a reset after MS milliseconds

    --width <COLS>          Wrap width in columns (default: 80)
    --format <FORMAT>       Output: ansi, markup, plain (default: ansi)
    --color <MODE>          Color mode: truecolor, 256, none (default: truecolor)

    --headless              Simulate the run and print the final frame
    --verbose               Log engine activity to stderr

EXAMPLES:
    dyslexia_sim                                  # Live, all rules
    dyslexia_sim --word-swap --duration 30        # Live word swaps for 30s
    dyslexia_sim --headless --seed 7 --format plain
";

const SAMPLE_TEXT: &str = "La dislessia è un disturbo specifico dell'apprendimento che \
influisce sulla capacità di leggere con precisione e fluidità. Le persone con \
dislessia possono presentare difficoltà nel riconoscere le parole, e la lettura \
diventa un processo lento. Questo simulatore riproduce alcuni effetti per \
comprendere meglio, attraverso un'esperienza interattiva, le sfide significative \
che si incontrano durante la lettura.";

/// Output format of rendered frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Ansi,
    Markup,
    Plain,
}

impl OutputFormat {
    fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ansi" => Some(Self::Ansi),
            "markup" | "html" => Some(Self::Markup),
            "plain" | "text" => Some(Self::Plain),
            _ => None,
        }
    }
}

/// Application configuration parsed from command-line arguments.
#[derive(Clone, Debug)]
pub struct Config {
    // Input
    pub text: Option<String>,
    pub file: Option<PathBuf>,
    pub dict: Option<PathBuf>,

    // Rules and timing
    pub rules: Rules,
    pub seed: Option<u64>,
    pub fps: u32,
    pub duration: Duration,
    pub reset_at: Option<Duration>,

    // Output
    pub width: u32,
    pub format: OutputFormat,
    pub color: ColorMode,
    pub headless: bool,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text: None,
            file: None,
            dict: None,
            rules: Rules::empty(),
            seed: None,
            fps: 30,
            duration: Duration::from_secs(10),
            reset_at: None,
            width: 80,
            format: OutputFormat::Ansi,
            color: ColorMode::TrueColor,
            headless: false,
            verbose: false,
        }
    }
}

/// Result of CLI parsing.
pub enum ParseResult {
    /// Successfully parsed configuration.
    Config(Config),
    /// User requested help.
    Help,
    /// Parse error with message.
    Error(String),
}

impl Config {
    /// Parse configuration from command-line arguments.
    pub fn from_args<I>(args: I) -> ParseResult
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        // Skip program name
        args.next();

        while let Some(arg) = args.next() {
            let arg_str = arg.to_string_lossy();
            let flag = arg_str.as_ref();

            if flag == "-h" || flag == "--help" {
                return ParseResult::Help;
            }
            let takes_value = matches!(
                flag,
                "--text"
                    | "--file"
                    | "--dict"
                    | "--seed"
                    | "--fps"
                    | "--duration"
                    | "--reset-at"
                    | "--width"
                    | "--format"
                    | "--color"
            );
            let value = if takes_value {
                match args.next() {
                    Some(v) => v.to_string_lossy().to_string(),
                    None => return ParseResult::Error(format!("{flag} requires a value")),
                }
            } else {
                String::new()
            };

            match flag {
                "--text" => config.text = Some(value),
                "--file" => config.file = Some(PathBuf::from(value)),
                "--dict" => config.dict = Some(PathBuf::from(value)),

                "--letter-swap" => config.rules |= Rules::LETTER_SWAP,
                "--blur" => config.rules |= Rules::BLUR_PULSE,
                "--word-swap" => config.rules |= Rules::WORD_SWAP,

                "--seed" => match value.parse::<u64>() {
                    Ok(seed) => config.seed = Some(seed),
                    Err(_) => {
                        return ParseResult::Error(format!("Invalid --seed value: {value}"));
                    }
                },
                "--fps" => match value.parse::<u32>() {
                    Ok(fps) if fps > 0 => config.fps = fps,
                    _ => {
                        return ParseResult::Error(format!(
                            "Invalid --fps value: {value} (must be positive integer)"
                        ));
                    }
                },
                "--duration" => match parse_seconds(&value) {
                    Some(duration) => config.duration = duration,
                    None => {
                        return ParseResult::Error(format!("Invalid --duration value: {value}"));
                    }
                },
                "--reset-at" => match value.parse::<u64>() {
                    Ok(ms) => config.reset_at = Some(Duration::from_millis(ms)),
                    Err(_) => {
                        return ParseResult::Error(format!("Invalid --reset-at value: {value}"));
                    }
                },

                "--width" => match value.parse::<u32>() {
                    Ok(width) if width > 0 => config.width = width,
                    _ => return ParseResult::Error(format!("Invalid --width value: {value}")),
                },
                "--format" => match OutputFormat::from_str(&value) {
                    Some(format) => config.format = format,
                    None => {
                        return ParseResult::Error(format!(
                            "Unknown --format: {value} (use ansi, markup or plain)"
                        ));
                    }
                },
                "--color" => match value.parse::<ColorMode>() {
                    Ok(mode) => config.color = mode,
                    Err(e) => return ParseResult::Error(e.to_string()),
                },

                "--headless" => config.headless = true,
                "--verbose" => config.verbose = true,

                other => {
                    if other.starts_with('-') {
                        return ParseResult::Error(format!("Unknown option: {other}"));
                    }
                    return ParseResult::Error(format!("Unexpected argument: {other}"));
                }
            }
        }

        if config.text.is_some() && config.file.is_some() {
            return ParseResult::Error("--text and --file are mutually exclusive".to_string());
        }
        if config.rules.is_empty() {
            config.rules = Rules::all();
        }
        ParseResult::Config(config)
    }

    /// Get target frame duration.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.fps))
    }
}

/// Parse a non-negative number of seconds, fractions allowed.
fn parse_seconds(s: &str) -> Option<Duration> {
    let secs = s.parse::<f64>().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() -> dyslexia_sim::Result<()> {
    match Config::from_args(std::env::args_os()) {
        ParseResult::Config(config) => {
            if config.verbose {
                set_log_callback(|level: LogLevel, message: &str| {
                    eprintln!("[{}] {message}", level.label());
                });
            }
            let sim = build_simulator(&config)?;
            if config.headless {
                run_headless(&config, sim)
            } else {
                run_interactive(&config, sim)
            }
        }
        ParseResult::Help => {
            print!("{HELP_TEXT}");
            Ok(())
        }
        ParseResult::Error(msg) => {
            eprintln!("Error: {msg}");
            eprintln!("Run with --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn build_simulator(config: &Config) -> dyslexia_sim::Result<Simulator> {
    let mut sim = Simulator::new(EngineConfig::default())?;
    if let Some(path) = &config.dict {
        sim = sim.with_dictionary(SubstitutionDictionary::from_path(path)?);
    }
    if let Some(seed) = config.seed {
        sim = sim.with_seed(seed);
    }

    let text = match (&config.text, &config.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => SAMPLE_TEXT.to_string(),
    };
    sim.set_text(&text);
    sim.set_rules(config.rules);
    Ok(sim)
}

// ============================================================================
// Headless Mode
// ============================================================================

/// Step simulated time at the frame rate and print the last frame.
fn run_headless(config: &Config, mut sim: Simulator) -> dyslexia_sim::Result<()> {
    let frame = config.frame_duration();
    let mut pending_reset = config.reset_at;
    let mut now = Duration::ZERO;

    while now < config.duration {
        now = (now + frame).min(config.duration);
        if let Some(at) = pending_reset.filter(|at| *at <= now) {
            sim.advance_to(at);
            sim.reset();
            pending_reset = None;
        }
        sim.advance_to(now);
    }

    let units = sim.render_units();
    let mut stdout = io::stdout().lock();
    match config.format {
        OutputFormat::Markup => writeln!(stdout, "{}", to_markup(&units))?,
        OutputFormat::Plain => {
            let surface = TextSurface::new(config.width);
            writeln!(stdout, "{}", surface.plain_text(&units))?;
        }
        OutputFormat::Ansi => {
            let buffer = TextSurface::new(config.width).render(&units);
            let mut writer = AnsiWriter::with_color_mode(&mut stdout, config.color);
            for (row, cells) in buffer.rows().enumerate() {
                if row > 0 {
                    writer.write_str("\n");
                }
                for cell in cells {
                    writer.write_cell(cell);
                }
                writer.write_str(dyslexia_sim::ansi::RESET);
                writer.reset_state();
            }
            writer.write_str("\n");
            writer.flush()?;
        }
    }
    Ok(())
}

// ============================================================================
// Interactive Mode
// ============================================================================

/// Live frame loop on the terminal, paced with `thread::sleep`.
fn run_interactive(config: &Config, mut sim: Simulator) -> dyslexia_sim::Result<()> {
    if !io::stdout().is_terminal() {
        eprintln!("Error: stdout is not a terminal");
        eprintln!();
        eprintln!("For non-interactive use, try: dyslexia_sim --headless");
        std::process::exit(1);
    }
    if config.format != OutputFormat::Ansi {
        eprintln!("Error: live mode only draws ansi frames; add --headless for other formats");
        std::process::exit(1);
    }

    let interrupt = InterruptFlag::install()?;
    let surface = TextSurface::new(config.width);
    let mut guard = CursorGuard::new(AnsiWriter::with_color_mode(io::stdout(), config.color));
    guard.writer().write_str(dyslexia_sim::ansi::CLEAR_SCREEN);

    let frame_duration = config.frame_duration();
    let start = Instant::now();
    let mut pending_reset = config.reset_at;

    loop {
        let frame_start = Instant::now();
        let now = start.elapsed();
        if now >= config.duration || interrupt.is_raised() {
            break;
        }

        // --- Update phase ---
        if let Some(at) = pending_reset.filter(|at| *at <= now) {
            sim.advance_to(at);
            sim.reset();
            pending_reset = None;
        }
        sim.advance_to(now);

        // --- Render phase ---
        let buffer = surface.render(&sim.render_units());
        if buffer.height() < guard.rows {
            guard.writer().write_str(dyslexia_sim::ansi::CLEAR_SCREEN);
        }
        guard.rows = buffer.height();
        guard.writer().write_frame(&buffer);

        // --- Present ---
        guard.writer().flush()?;

        // --- Frame pacing ---
        let elapsed = frame_start.elapsed();
        if let Some(remaining) = frame_duration.checked_sub(elapsed) {
            std::thread::sleep(remaining);
        }
    }

    guard.finish()?;
    Ok(())
}

/// Hides the cursor while alive and shows it again below the last frame
/// when dropped, including on early returns and unwinding panics.
struct CursorGuard<W: Write> {
    writer: AnsiWriter<W>,
    /// Height of the last frame drawn.
    rows: u32,
    restored: bool,
}

impl<W: Write> CursorGuard<W> {
    fn new(mut writer: AnsiWriter<W>) -> Self {
        writer.write_str(dyslexia_sim::ansi::CURSOR_HIDE);
        Self {
            writer,
            rows: 0,
            restored: false,
        }
    }

    fn writer(&mut self) -> &mut AnsiWriter<W> {
        &mut self.writer
    }

    /// Restore the cursor now, reporting write errors.
    fn finish(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        self.writer
            .write_str(&format!("\x1b[{};1H", self.rows.saturating_add(1)));
        self.writer.write_str(dyslexia_sim::ansi::RESET);
        self.writer.write_str(dyslexia_sim::ansi::CURSOR_SHOW);
        self.writer.flush()
    }
}

impl<W: Write> Drop for CursorGuard<W> {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}

/// Set by SIGINT or SIGTERM so the live loop can exit through its guard.
struct InterruptFlag {
    raised: Arc<AtomicBool>,
    #[cfg(unix)]
    handle: signal_hook::iterator::Handle,
}

impl InterruptFlag {
    #[cfg(unix)]
    fn install() -> io::Result<Self> {
        use signal_hook::consts::signal::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        let raised = Arc::new(AtomicBool::new(false));
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let flag = Arc::clone(&raised);
        std::thread::spawn(move || {
            if signals.forever().next().is_some() {
                flag.store(true, Ordering::SeqCst);
            }
        });
        Ok(Self { raised, handle })
    }

    #[cfg(not(unix))]
    fn install() -> io::Result<Self> {
        Ok(Self {
            raised: Arc::new(AtomicBool::new(false)),
        })
    }

    fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

#[cfg(unix)]
impl Drop for InterruptFlag {
    fn drop(&mut self) {
        self.handle.close();
    }
}

// ============================================================================
// Tests
// ============================================================================
