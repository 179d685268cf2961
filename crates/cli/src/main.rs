//! Binary entry point for the transcript downloader.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use ytt_core::config::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, DEFAULT_WATCH_URL};
use ytt_core::render::{self, OutputFormat};
use ytt_core::{FetchConfig, Transcript, TranscriptApi, TranscriptError, TranscriptList, VideoId};

/// Command line options for the binary.
#[derive(Parser)]
#[command(version, about = "Download the transcript of a video")]
struct Cli {
    /// Video URL or bare video id.
    video: String,

    /// Preferred language codes, tried in order. An empty value picks the
    /// first available track.
    #[arg(short, long = "lang", value_delimiter = ',', default_value = "en")]
    langs: Vec<String>,

    /// Fall back to the first available track when no language matches.
    #[arg(long)]
    any_language: bool,

    /// Don't print timestamps.
    #[arg(long)]
    no_timestamps: bool,

    /// Output layout.
    #[arg(short, long, value_enum, default_value_t = CliFormat::Text)]
    format: CliFormat,

    /// Output filename (defaults to stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only list the available transcripts.
    #[arg(long)]
    list: bool,

    /// Enable verbose debug and trace logs.
    #[arg(long)]
    debug: bool,

    /// Per-request timeout in seconds.
    #[arg(long, env = "YTT_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// User agent sent with every request.
    #[arg(long, env = "YTT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Watch page base URL.
    #[arg(long, env = "YTT_WATCH_URL", default_value = DEFAULT_WATCH_URL, hide = true)]
    watch_url: String,
}

/// CLI wrapper for [`OutputFormat`] so the core stays free of clap.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Text,
    Srt,
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => OutputFormat::Text,
            CliFormat::Srt => OutputFormat::Srt,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

impl Cli {
    fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            watch_url: self.watch_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout_secs: self.timeout,
            ..FetchConfig::default()
        }
    }

    /// Requested language codes with empty values removed.
    fn language_codes(&self) -> Vec<&str> {
        self.langs
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// Application entry point which parses CLI args and performs actions.
/// Errors are printed once on stderr and turned into a failure exit code.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match init_logging(cli.debug) {
        Ok(()) => run(&cli).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", error_line(&err));
            ExitCode::FAILURE
        }
    }
}

/// Single stderr line for a failed run, including the whole context chain.
/// Plain text so it stays readable when stderr is redirected to a file.
fn error_line(err: &anyhow::Error) -> String {
    format!("❌ Error: {err:#}")
}

fn init_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::default()
            .add_directive("ytt=trace".parse()?)
            .add_directive("ytt_core=trace".parse()?)
            .add_directive("info".parse()?)
    } else {
        EnvFilter::default()
            .add_directive("ytt=info".parse()?)
            .add_directive("ytt_core=info".parse()?)
            .add_directive("warn".parse()?)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let video_id = VideoId::parse(&cli.video).context("failed to extract video ID")?;
    let api = TranscriptApi::from_config(&cli.fetch_config())?;
    let list = api
        .list_transcripts(&video_id)
        .await
        .context("failed to list transcripts")?;
    if cli.list {
        print!("{list}");
        return Ok(());
    }

    let transcript = choose_transcript(&list, &cli.language_codes(), cli.any_language)?;
    info!(
        "using {} transcript {transcript}",
        if transcript.is_generated { "generated" } else { "manual" }
    );
    let entries = api
        .fetch_entries(transcript)
        .await
        .context("failed to fetch transcript")?;
    let output = render::render(&entries, cli.format.into(), !cli.no_timestamps)?;

    match &cli.output {
        Some(path) => {
            write_output(path, &output)?;
            println!("Transcript written to {}", path.display());
        }
        None => print!("{output}"),
    }
    Ok(())
}

/// Pick a track by language preference. With no codes, or with `any_language`
/// and no match, the first available track is used instead.
fn choose_transcript<'a>(
    list: &'a TranscriptList,
    language_codes: &[&str],
    any_language: bool,
) -> Result<&'a Transcript> {
    if language_codes.is_empty() {
        debug!("no language requested, taking first available track");
        return list
            .first_available()
            .context("no transcript available");
    }
    match list.find_transcript(language_codes) {
        Ok(transcript) => Ok(transcript),
        Err(TranscriptError::NoTranscriptFound { .. }) if any_language => {
            warn!(
                "no transcript for {}, falling back to first available",
                language_codes.join(",")
            );
            list.first_available().context("no transcript available")
        }
        Err(err) => Err(err).with_context(|| {
            format!(
                "no transcript found for language code '{}'",
                language_codes.join(",")
            )
        }),
    }
}

fn write_output(path: &Path, output: &str) -> Result<()> {
    debug!("writing {} bytes to {}", output.len(), path.display());
    fs::write(path, output).with_context(|| format!("failed to write to {}", path.display()))
}
