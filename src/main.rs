use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use crossterm::{cursor, execute, style::Color};
use decrypted_text::{
    auto_bind, config::parse_color, AnimateTrigger, ClockScheduler, DecryptedText, FastRandom, Page, RandomSource,
    RevealDirection, ScrambleConfig, TerminalRenderer,
};
use std::{
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(name = "decrypted-text", version, about = "Scramble texts and watch them decrypt")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate a single text.
    Run(RunArgs),
    /// Animate every marked element in a page file.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// The text to animate.
    text: String,

    /// Milliseconds between ticks.
    #[arg(long, default_value_t = 50)]
    speed: u64,

    /// Number of scramble ticks before revealing, when not sequential.
    #[arg(long, default_value_t = 10)]
    max_iterations: u32,

    /// Reveal one character per tick.
    #[arg(long)]
    sequential: bool,

    /// The reveal order in sequential mode: start, end or center.
    #[arg(long, default_value = "start")]
    reveal_direction: RevealDirection,

    /// Only use the text's own characters as substitutes.
    #[arg(long)]
    original_chars_only: bool,

    /// The substitute characters.
    #[arg(long)]
    characters: Option<String>,

    /// What starts the animation: hover, view or both.
    #[arg(long, default_value = "hover")]
    animate_on: AnimateTrigger,

    /// The color of scrambled characters, as `#rrggbb` or a color name.
    #[arg(long, value_parser = color_arg)]
    encrypted_color: Option<Color>,

    /// The color of revealed characters, as `#rrggbb` or a color name.
    #[arg(long, value_parser = color_arg)]
    revealed_color: Option<Color>,

    #[command(flatten)]
    playback: PlaybackArgs,
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// The page file to load.
    page: PathBuf,

    #[command(flatten)]
    playback: PlaybackArgs,
}

#[derive(Args, Debug)]
struct PlaybackArgs {
    /// Seed the random source to get reproducible animations.
    #[arg(long, env = "DECRYPTED_TEXT_SEED")]
    seed: Option<u64>,

    /// Simulate the pointer leaving the texts after this many milliseconds.
    #[arg(long)]
    hover_ms: Option<u64>,

    /// Don't draw a frame around the texts.
    #[arg(long)]
    no_frame: bool,
}

impl PlaybackArgs {
    fn rng(&self, index: usize) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => Box::new(FastRandom::with_seed(seed.wrapping_add(index as u64))),
            None => Box::new(FastRandom::new()),
        }
    }
}

fn color_arg(input: &str) -> Result<Color, String> {
    parse_color(input).ok_or_else(|| format!("invalid color '{input}'"))
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let defaults = ScrambleConfig::default();
    let config = ScrambleConfig {
        tick_interval_ms: args.speed,
        max_iterations: args.max_iterations,
        sequential: args.sequential,
        reveal_direction: args.reveal_direction,
        use_original_chars_only: args.original_chars_only,
        characters: args.characters.unwrap_or(defaults.characters),
        animate_on: args.animate_on,
        encrypted_color: args.encrypted_color.unwrap_or(defaults.encrypted_color),
        revealed_color: args.revealed_color.unwrap_or(defaults.revealed_color),
        ..defaults
    };
    let scheduler = Arc::new(ClockScheduler::new());
    let text = DecryptedText::new(&args.text, config, scheduler.clone(), args.playback.rng(0));
    animate(&scheduler, &[&text], &args.playback)
}

fn play(args: PlayArgs) -> anyhow::Result<()> {
    let page = Page::from_path(&args.page)?;
    let scheduler = Arc::new(ClockScheduler::new());
    let bound = auto_bind(&page, scheduler.clone(), |index| args.playback.rng(index));
    if bound.is_empty() {
        anyhow::bail!("no elements in '{}' are marked for scrambling", args.page.display());
    }
    info!(elements = bound.len(), "bound page elements");
    let texts: Vec<_> = bound.iter().map(|element| &element.text).collect();
    animate(&scheduler, &texts, &args.playback)
}

/// Show every text on screen, fire their triggers and draw frames until they all settle.
fn animate(scheduler: &ClockScheduler, texts: &[&DecryptedText], playback: &PlaybackArgs) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide).context("hiding cursor")?;
    let result = draw_until_settled(scheduler, texts, playback, &mut stdout);
    execute!(stdout, cursor::Show).context("showing cursor")?;
    result
}

fn draw_until_settled<W: Write>(
    scheduler: &ClockScheduler,
    texts: &[&DecryptedText],
    playback: &PlaybackArgs,
    output: W,
) -> anyhow::Result<()> {
    let mut renderer = TerminalRenderer::new(output, !playback.no_frame);
    renderer.draw(texts).context("drawing frame")?;

    // Every text is fully on screen and the pointer starts over it.
    for text in texts {
        text.report_visibility(1.0);
        text.pointer_enter();
    }

    let started = Instant::now();
    let leave_at = playback.hover_ms.map(Duration::from_millis);
    let mut left = false;
    while texts.iter().any(|text| text.is_running()) {
        scheduler.run_for(FRAME_INTERVAL);
        if !left && leave_at.is_some_and(|leave_at| started.elapsed() >= leave_at) {
            info!("pointer left texts");
            texts.iter().for_each(|text| text.pointer_leave());
            left = true;
        }
        renderer.draw(texts).context("drawing frame")?;
    }
    renderer.draw(texts).context("drawing frame")?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(args),
        Command::Play(args) => play(args),
    };
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
