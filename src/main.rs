use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use four_in_a_row::ai::{Agent, LineHeuristic, RandomAgent, SearchAgent, Searcher};
use four_in_a_row::app::App;
use four_in_a_row::config::AppConfig;
use four_in_a_row::game::GameStatus;

/// Play four-in-a-row against the computer in the terminal.
#[derive(Parser)]
#[command(name = "four-in-a-row", about = "Play four-in-a-row against the computer")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "four_in_a_row.toml")]
    config: PathBuf,

    /// Override the search depth
    #[arg(long)]
    depth: Option<usize>,

    /// Who plays the human side
    #[arg(long, value_enum, default_value_t = Opponent::Human)]
    opponent: Opponent,

    /// Seed for the random opponent
    #[arg(long)]
    seed: Option<u64>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Opponent {
    /// Moves typed on stdin
    Human,
    /// A random mover, for unattended games
    Random,
    /// The computer's own search, playing itself
    Search,
}

enum Command {
    Drop(usize),
    Reset,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "q" | "quit" => Some(Command::Quit),
        "r" | "reset" => Some(Command::Reset),
        other => other.parse().ok().map(Command::Drop),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(depth) = cli.depth {
        config.search.max_depth = depth;
        config.validate().context("applying --depth")?;
    }

    match cli.opponent {
        Opponent::Human => play_interactive(&config),
        Opponent::Random => {
            let mut agent = match cli.seed {
                Some(seed) => RandomAgent::with_seed(seed),
                None => RandomAgent::new(),
            };
            play_unattended(&config, &mut agent)
        }
        Opponent::Search => {
            let heuristic = LineHeuristic::new(config.search.line_scoring);
            let searcher = Searcher::new(Arc::new(heuristic));
            let mut agent = SearchAgent::new(searcher, config.search.max_depth);
            play_unattended(&config, &mut agent)
        }
    }
}

fn show(app: &App) {
    print!("{}", app.grid());
    println!("{}", app.message());
}

/// Read stdin on its own thread so the control loop never blocks on input.
fn spawn_input_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn play_interactive(config: &AppConfig) -> Result<()> {
    let mut app = App::new(config);
    let input = spawn_input_reader();
    show(&app);

    loop {
        loop {
            let line = match input.try_recv() {
                Ok(line) => line,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            };
            match parse_command(&line) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Reset) => {
                    app.reset();
                    show(&app);
                }
                Some(Command::Drop(column)) => match app.submit_move(column) {
                    Ok(_) => show(&app),
                    Err(err) => println!("{err}"),
                },
                None => println!("Type a column (0-6), 'r' to restart or 'q' to quit."),
            }
        }

        if app.tick().is_some() {
            show(&app);
        }
        thread::sleep(config.game.tick());
    }
}

fn play_unattended(config: &AppConfig, agent: &mut dyn Agent) -> Result<()> {
    let mut app = App::new(config);
    println!("{} plays {}", agent.name(), app.human().name());
    show(&app);

    while !app.status().is_over() {
        if app.status() == GameStatus::HumanTurn {
            let column = agent
                .select_action(app.grid(), app.human())
                .with_context(|| format!("no legal column left for {}", agent.name()))?;
            app.submit_move(column)
                .with_context(|| format!("playing column {column}"))?;
            show(&app);
        } else if app.tick().is_some() {
            show(&app);
        }
        thread::sleep(config.game.tick());
    }
    Ok(())
}
