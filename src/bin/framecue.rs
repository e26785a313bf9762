use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "framecue", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the composition length and scene layout.
    Duration(DurationArgs),
    /// Print the state of a single frame as JSON.
    Frame(FrameArgs),
    /// Write one JSON line per frame for a range.
    Dump(DumpArgs),
    /// Write the built-in vocabulary composition as JSON.
    Library(LibraryArgs),
}

#[derive(Parser, Debug)]
struct DurationArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// End frame (exclusive); defaults to the composition length.
    #[arg(long)]
    end: Option<u64>,

    /// Evaluate frames on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per parallel batch.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Emit `frame hi lo` fingerprints instead of full states.
    #[arg(long)]
    fingerprints: bool,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct LibraryArgs {
    /// Cross-fade between scenes, in frames.
    #[arg(long, default_value_t = 0)]
    transition: u64,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Duration(args) => cmd_duration(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Dump(args) => cmd_dump(args),
        Command::Library(args) => cmd_library(args),
    }
}

fn read_comp_json(path: &Path) -> anyhow::Result<framecue::Composition> {
    framecue::Composition::from_path(path)
        .with_context(|| format!("load composition '{}'", path.display()))
}

fn open_output(out: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
            Ok(Box::new(BufWriter::new(f)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
    }
}

fn cmd_duration(args: DurationArgs) -> anyhow::Result<()> {
    let comp = read_comp_json(&args.in_path)?;
    let fps = comp.fps();
    let total = comp.duration_frames();
    println!(
        "{}: {total} frames at {}/{} fps ({:.3}s)",
        comp.id(),
        fps.num,
        fps.den,
        fps.frames_to_secs(total as f64)
    );
    for (id, frames) in comp.registry().entries() {
        let offset = comp.registry().offset_of(id).unwrap_or_default();
        println!("  {id}: start {offset}, {frames} frames");
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let comp = read_comp_json(&args.in_path)?;
    let state = comp.render_frame(framecue::FrameIndex(args.frame));
    let json = serde_json::to_string_pretty(&state).context("serialize frame state")?;
    println!("{json}");
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let comp = read_comp_json(&args.in_path)?;
    let end = args.end.unwrap_or_else(|| comp.duration_frames());
    let range =
        framecue::FrameRange::new(framecue::FrameIndex(args.start), framecue::FrameIndex(end))?;
    let opts = framecue::RenderOpts {
        parallel: args.parallel,
        threads: args.threads,
        chunk_size: args.chunk_size,
    };
    let states = comp.render_range(range, &opts)?;

    let mut w = open_output(args.out.as_deref())?;
    for state in &states {
        if args.fingerprints {
            let fp = state.fingerprint();
            writeln!(w, "{} {:016x} {:016x}", state.frame.0, fp.hi, fp.lo)?;
        } else {
            serde_json::to_writer(&mut w, state).context("serialize frame state")?;
            writeln!(w)?;
        }
    }
    w.flush()?;

    if let Some(out) = &args.out {
        eprintln!("wrote {} frames to {}", states.len(), out.display());
    }
    Ok(())
}

fn cmd_library(args: LibraryArgs) -> anyhow::Result<()> {
    let card = framecue::scenes::VocabularyCard::default();
    let comp = framecue::scenes::vocation::vocation_composition(
        &card,
        framecue::Fps::default(),
        args.transition,
    )?;
    let mut w = open_output(args.out.as_deref())?;
    serde_json::to_writer_pretty(&mut w, comp.def()).context("serialize composition")?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}
