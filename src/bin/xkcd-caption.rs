use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{ArgAction, CommandFactory as _, Parser};
use tracing_subscriber::EnvFilter;

use xkcd_caption::{
    CaptionCompositor, CaptionStyle, ComicOutcome, DownloadSession, FetchConfig, HttpComicSource,
    IdSampler, ImageStore, ParleyFont, Selection,
};

#[derive(Parser, Debug)]
#[command(
    name = "xkcd-caption",
    version,
    about = "Retrieve and embed the titles and alt text from XKCD comics into single images."
)]
struct Cli {
    /// Comic numbers to fetch (0 is the latest comic).
    #[arg(value_name = "N")]
    ids: Vec<u32>,

    /// Fetch every comic from LOW to HIGH inclusive.
    #[arg(
        short = 'r',
        long,
        num_args = 2,
        value_names = ["LOW", "HIGH"],
        conflicts_with_all = ["ids", "all", "random"]
    )]
    range: Option<Vec<u32>>,

    /// Output directory.
    #[arg(short = 'o', long, value_name = "DIRECTORY", default_value = ".")]
    output_dir: PathBuf,

    /// Fetch all comics.
    #[arg(short = 'a', long, conflicts_with_all = ["ids", "random"])]
    all: bool,

    /// Download images only, without burning in captions.
    #[arg(short = 'd', long)]
    download_only: bool,

    /// Fetch random comics.
    #[arg(
        long,
        value_name = "ITERATIONS",
        num_args = 0..=1,
        default_missing_value = "1",
        conflicts_with = "ids"
    )]
    random: Option<u32>,

    /// TrueType/OpenType font used for captions.
    #[arg(long, value_name = "FILE", default_value = "xkcd.ttf")]
    font: PathBuf,

    /// JSON file overriding caption sizes, padding and colors.
    #[arg(long, value_name = "FILE")]
    style: Option<PathBuf>,

    /// Base URL of the comic metadata API.
    #[arg(long, value_name = "URL", default_value = FetchConfig::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    timeout_secs: u64,

    /// Seed for `--random`, for reproducible picks.
    #[arg(long)]
    seed: Option<u64>,

    /// Log more (repeatable).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn selection(&self) -> Option<Selection> {
        if let Some(r) = &self.range {
            return Some(Selection::Range {
                low: r[0],
                high: r[1],
            });
        }
        if self.all {
            return Some(Selection::All);
        }
        if let Some(iterations) = self.random {
            return Some(Selection::Random { iterations });
        }
        if self.ids.is_empty() {
            None
        } else {
            Some(Selection::Ids(self.ids.clone()))
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = match (quiet, verbose) {
        (true, _) => EnvFilter::new("warn"),
        (false, 0) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        (false, 1) => EnvFilter::new("debug"),
        (false, _) => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let store = ImageStore::open(&cli.output_dir).context("output directory")?;
    let Some(selection) = cli.selection() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut fetch = FetchConfig::with_endpoint(&cli.endpoint)?;
    fetch.timeout = Duration::from_secs(cli.timeout_secs);
    let source = HttpComicSource::new(fetch)?;

    let compositor = if cli.download_only {
        None
    } else {
        let style = match &cli.style {
            Some(p) => CaptionStyle::from_path(p)?,
            None => CaptionStyle::default(),
        };
        let font = ParleyFont::from_path(&cli.font).with_context(|| {
            format!(
                "load caption font '{}' (pass --font or --download-only)",
                cli.font.display()
            )
        })?;
        Some(CaptionCompositor::new(font, style)?)
    };

    let mut sampler = cli
        .seed
        .map(IdSampler::from_seed)
        .unwrap_or_else(IdSampler::from_entropy);
    let mut session = DownloadSession::new(source, store, compositor);
    let stats = session.run(&selection, &mut sampler)?;

    let failed = stats.count(|o| matches!(o, ComicOutcome::FetchFailed { .. }));
    if failed > 0 {
        eprintln!("{failed} comic(s) could not be retrieved");
    }
    Ok(())
}
