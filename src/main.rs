use anyhow::{bail, Context};
use clap::Parser;
use cv_bias_check::config::{config_path, create_default_config, load_config, AppConfig};
use cv_bias_check::console::{render_intro, render_json, render_report, ConsoleRater};
use cv_bias_check::interactive::exercise::{Exercise, ExerciseOutcome};
use cv_bias_check::interactive::session::SESSION_LENGTH;
use cv_bias_check::simulate::{SimulatedBias, SimulatedRater};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cv-bias-check",
    version,
    about = "Rate ten synthetic CVs and see how your ratings split by name and university"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Rate ten CVs interactively (the default)
    Run(RunArgs),
    /// Let a simulated rater with a known bias take the exercise
    Simulate(SimulateArgs),
    /// Create a default config file at ~/.config/cv-bias-check/config.toml
    Init,
}

#[derive(Parser, Default)]
struct CommonArgs {
    /// Seed for a reproducible sequence of profiles
    #[arg(long)]
    seed: Option<u64>,

    /// Path to config file (default: ~/.config/cv-bias-check/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output the report and decisions as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write the finished session to this file as JSON
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Parser, Default)]
struct RunArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser)]
struct SimulateArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Rating points taken off for non-western names
    #[arg(long, default_value_t = 1.5)]
    name_penalty: f64,

    /// Rating points added for Russell Group/Oxbridge
    #[arg(long, default_value_t = 1.0)]
    prestige_bonus: f64,

    /// Half-width of uniform noise added to each rating
    #[arg(long, default_value_t = 1.0)]
    noise: f64,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_app_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match config_path() {
            Some(path) => path,
            None => return Ok(AppConfig::default()),
        },
    };
    load_config(&path).with_context(|| format!("Failed to load config at {}", path.display()))
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn finish(outcome: ExerciseOutcome, common: &CommonArgs) -> anyhow::Result<()> {
    let (report, session) = match outcome {
        ExerciseOutcome::Completed { report, session } => (report, session),
        ExerciseOutcome::Abandoned { collected } => {
            eprintln!("\nSession ended after {collected} of {SESSION_LENGTH} ratings; nothing to report.");
            return Ok(());
        }
    };

    if common.json {
        println!("{}", render_json(&report, session.decisions())?);
    } else {
        print!("{}", render_report(&report));
    }

    if let Some(ref path) = common.export {
        session
            .save(path)
            .with_context(|| format!("Failed to export session to {}", path.display()))?;
        eprintln!("Session written to {}", path.display());
    }
    Ok(())
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = load_app_config(args.common.config.as_deref())?;
    let mut rng = make_rng(args.common.seed.or(config.seed));
    let exercise = Exercise::builder().tables(config.tables).build()?;

    // Keep stdout clean for the JSON document.
    let mut output: Box<dyn io::Write> = if args.common.json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    write!(output, "{}", render_intro())?;

    let stdin = io::stdin();
    let mut rater = ConsoleRater::new(stdin.lock(), output);
    let outcome = exercise.run(&mut rng, &mut rater)?;
    finish(outcome, &args.common)
}

fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let bias = SimulatedBias {
        name_penalty: args.name_penalty,
        prestige_bonus: args.prestige_bonus,
        noise: args.noise,
        ..SimulatedBias::default()
    };
    if let Err(reason) = bias.validate() {
        bail!("Invalid simulated bias: {reason}");
    }

    let config = load_app_config(args.common.config.as_deref())?;
    let seed = args.common.seed.or(config.seed);
    let mut rng = make_rng(seed);
    let mut rater = SimulatedRater::new(&config.tables, bias, seed.unwrap_or_else(rand::random));
    let exercise = Exercise::builder().tables(config.tables).build()?;

    let outcome = exercise.run(&mut rng, &mut rater)?;
    finish(outcome, &args.common)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => run(args),
        Commands::Simulate(args) => simulate(args),
        Commands::Init => {
            let path = config_path().context("HOME environment variable not set")?;
            create_default_config(&path)?;
            println!("Created config at {}", path.display());
            Ok(())
        }
    }
}
