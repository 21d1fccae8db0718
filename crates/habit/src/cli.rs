use std::path::PathBuf;

mod completions;
mod config;
mod create;
mod delete;
mod done;
mod init;
mod list;
mod show;
mod stats;
mod sync;
mod terminal;

use clap::ArgAction;
use habit_core::{Clock, CompletionDate, Config, Directory, FixedClock, SystemClock};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the habits directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Treat this day (YYYY-MM-DD) as today instead of reading the clock
    #[arg(long, global = true, value_name = "DATE")]
    today: Option<CompletionDate>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let context = Context {
            root: self.root,
            today: self.today,
        };
        self.command.unwrap_or_default().run(&context)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Global options shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    root: PathBuf,
    today: Option<CompletionDate>,
}

impl Context {
    #[cfg(test)]
    pub fn new(root: PathBuf, today: Option<CompletionDate>) -> Self {
        Self { root, today }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Open the habit store.
    pub fn open(&self) -> anyhow::Result<Directory> {
        Ok(Directory::open(self.root.clone())?)
    }

    /// The clock to read "today" from.
    ///
    /// `--today` takes precedence over the configured day boundary.
    pub fn clock(&self, config: &Config) -> Box<dyn Clock> {
        match self.today {
            Some(day) => Box::new(FixedClock(day)),
            None => Box::new(SystemClock::new(config.day_boundary)),
        }
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show streak statistics for all habits (default)
    Stats(stats::Command),

    /// Initialize a new habits directory
    Init(init::Command),

    /// Create a new habit
    Create(create::Command),

    /// Mark a habit as completed for a day
    Done(done::Command),

    /// Delete a habit
    Delete(delete::Command),

    /// List habits with their streaks
    List(list::Command),

    /// Show detailed information about a habit
    Show(show::Command),

    /// Rewrite all habit files in the current format
    Sync(sync::Command),

    /// Show or modify configuration settings
    Config(config::Command),

    /// Generate shell completions
    Completions(completions::Command),
}

impl Default for Command {
    fn default() -> Self {
        Self::Stats(stats::Command::default())
    }
}

impl Command {
    fn run(self, context: &Context) -> anyhow::Result<()> {
        match self {
            Self::Stats(command) => command.run(context)?,
            Self::Init(command) => command.run(context.root())?,
            Self::Create(command) => command.run(context)?,
            Self::Done(command) => command.run(context)?,
            Self::Delete(command) => command.run(context)?,
            Self::List(command) => command.run(context)?,
            Self::Show(command) => command.run(context)?,
            Self::Sync(command) => command.run(context)?,
            Self::Config(command) => command.run(context.root())?,
            Self::Completions(command) => command.run(),
        }
        Ok(())
    }
}

/// Output format for commands that support machine-readable output.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
