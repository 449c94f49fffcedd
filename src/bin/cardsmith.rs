use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cardsmith", version)]
struct Cli {
    /// Log at DEBUG level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a session script and write the exported card PNG.
    Render(RenderArgs),
    /// Replay a session script and print the composed scene as JSON.
    Scene(SessionArgs),
}

#[derive(Parser, Debug)]
struct SessionArgs {
    /// Input session script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Studio config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for ID and serial numbers.
    #[arg(long)]
    seed: Option<u64>,

    /// Date of issue (`YYYY-MM-DD`); defaults to today.
    #[arg(long)]
    today: Option<String>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Output path. A directory receives `kenya_id_card.png`.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Scene(args) => cmd_scene(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut sess = submit(&args.session)?;
    let card = sess.download()?;

    let out = if args.out.is_dir() {
        args.out.join(card.filename)
    } else {
        args.out
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, &card.png).with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_scene(args: SessionArgs) -> anyhow::Result<()> {
    let sess = submit(&args)?;
    let card = sess
        .card()
        .context("session produced no card")?;
    println!("{}", card.scene.to_json()?);
    Ok(())
}

fn submit(args: &SessionArgs) -> anyhow::Result<cardsmith::CardSession> {
    let config = match &args.config {
        Some(path) => cardsmith::StudioConfig::from_path(path)?,
        None => cardsmith::StudioConfig::default(),
    }
    .with_env();

    let today = match &args.today {
        Some(s) => cardsmith::card::format::parse_iso_date(s)?,
        None => chrono::Local::now().date_naive(),
    };

    let script = cardsmith::SessionScript::from_path(&args.in_path)?;
    let base_dir = args.in_path.parent().unwrap_or_else(|| Path::new("."));

    let mut sess = cardsmith::CardSession::new(config)?;
    if let Some(seed) = args.seed {
        sess = sess.with_rng(cardsmith::DigitRng::new(seed));
    }
    sess.replay(&script, base_dir)?;
    sess.submit(&script.form, today)?;
    Ok(sess)
}
