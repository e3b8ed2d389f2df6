use std::io::Write;

use anyhow::Error;

use clap::{ArgAction, Parser, Subcommand};

mod args;

mod hill;
use hill::Hill;

mod lengths;
use lengths::Lengths;

mod output;

mod rarefy;
use rarefy::Rarefy;

mod stat;
use stat::Stat;

const NAME: &str = env!("CARGO_BIN_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Diversity and clonality statistics for immune repertoires.
#[derive(Debug, Parser)]
#[clap(name = NAME, author = AUTHOR, version = VERSION, about)]
#[clap(subcommand_required = true)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suppress warnings.
    ///
    /// By default, only warnings are printed. By setting this flag, warnings will be disabled.
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbosity.
    ///
    /// Flag can be set multiply times to increase verbosity, or left unset for quiet mode.
    #[clap(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print CLI arguments for debugging.
    #[clap(long, hide = true, global = true)]
    debug: bool,
}

impl Cli {
    pub fn run(self) -> Result<(), Error> {
        if self.debug {
            eprintln!("{self:#?}");
        }

        let level = if self.quiet {
            log::LevelFilter::Off
        } else {
            match self.verbose {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            }
        };

        match env_logger::Builder::new()
            .filter_level(level)
            .target(env_logger::Target::Stderr)
            .format(|buf, record| {
                let level = record.level().as_str().to_lowercase();
                let args = record.args();
                writeln!(buf, "[repstat {level:>5}] {args}")
            })
            .try_init()
        {
            Ok(()) => (),
            Err(e) => eprintln!("failed to setup logger: {e}"),
        }

        self.command.run()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Hill(Hill),
    Lengths(Lengths),
    Rarefy(Rarefy),
    Stat(Stat),
}

impl Command {
    fn run(self) -> Result<(), Error> {
        match self {
            Command::Hill(hill) => hill.run(),
            Command::Lengths(lengths) => lengths.run(),
            Command::Rarefy(rarefy) => rarefy.run(),
            Command::Stat(stat) => stat.run(),
        }
    }
}

macro_rules! impl_try_from_command {
    ($variant:ident) => {
        impl TryFrom<Command> for $variant {
            type Error = Command;

            fn try_from(command: Command) -> Result<Self, Self::Error> {
                match command {
                    Command::$variant(args) => Ok(args),
                    command => Err(command),
                }
            }
        }
    };
}

impl_try_from_command!(Hill);
impl_try_from_command!(Lengths);
impl_try_from_command!(Rarefy);
impl_try_from_command!(Stat);

fn main() {
    let cli = Cli::parse();

    match cli.run() {
        Ok(()) => (),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
