use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use lyric_sync::{
    LrcDocument, LyricSyncerBuilder, RecognizerConfig, StrategyConfig, SyncConfig,
    TimestampPrecision,
};

/// Companion commands rewrite files with centisecond timestamps.
const COMPANION_PRECISION: TimestampPrecision = TimestampPrecision::Centiseconds;

#[derive(Debug, Parser)]
#[command(name = "lyric-sync")]
#[command(about = "Time lyric lines against recognized speech and manage LRC files")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Recognize the audio, align the lyrics and write an LRC file.
    Generate {
        audio: PathBuf,
        lyrics: PathBuf,
        /// Defaults to the audio path with an `.lrc` extension.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Fraction digits: 3, 2, or anything else for whole seconds.
        #[arg(long, env = "LYRIC_SYNC_PRECISION", default_value = "3")]
        precision: String,
        /// JSON file listing recognition strategies in fallback order.
        #[arg(long, env = "LYRIC_SYNC_RECOGNIZERS")]
        recognizers: Option<PathBuf>,
        /// Use an existing word transcript instead of running a recognizer.
        #[arg(long, conflicts_with = "recognizers")]
        transcript: Option<PathBuf>,
        #[arg(long, env = "LYRIC_SYNC_MATCH_THRESHOLD", default_value_t = 90.0)]
        match_threshold: f64,
    },
    /// Align a fixed fixture against itself and report the result.
    SelfTest,
    /// Print headers, line count and time span of an LRC file as JSON.
    Info { lrc: PathBuf },
    /// Shift every line by a number of milliseconds.
    Offset {
        lrc: PathBuf,
        #[arg(allow_hyphen_values = true)]
        ms: i64,
    },
    /// Export an LRC file to JSON.
    Export { lrc: PathBuf, out: PathBuf },
    /// Set LRC header fields.
    Set {
        lrc: PathBuf,
        #[arg(long)]
        ti: Option<String>,
        #[arg(long)]
        ar: Option<String>,
        #[arg(long)]
        al: Option<String>,
        #[arg(long)]
        by: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    match args.command {
        Commands::Generate {
            audio,
            lyrics,
            out,
            precision,
            recognizers,
            transcript,
            match_threshold,
        } => generate(
            &audio,
            &lyrics,
            out.as_deref(),
            parse_precision(&precision),
            recognizer_config(recognizers.as_deref(), transcript)?,
            match_threshold,
        ),
        Commands::SelfTest => {
            let syncer = LyricSyncerBuilder::new(SyncConfig::default())
                .build()
                .map_err(|e| e.to_string())?;
            println!("{}", syncer.self_check().token());
            Ok(())
        }
        Commands::Info { lrc } => {
            let doc = read_document(&lrc)?;
            let json = serde_json::to_string_pretty(&doc.info()).map_err(|e| e.to_string())?;
            println!("{json}");
            Ok(())
        }
        Commands::Offset { lrc, ms } => {
            let mut doc = read_document(&lrc)?;
            doc.apply_offset(ms);
            write_document(&doc, &lrc)
        }
        Commands::Export { lrc, out } => {
            read_document(&lrc)?
                .write_json(&out)
                .map_err(|e| e.to_string())?;
            println!("{}", out.display());
            Ok(())
        }
        Commands::Set { lrc, ti, ar, al, by } => {
            let mut doc = read_document(&lrc)?;
            for (key, value) in [("ti", ti), ("ar", ar), ("al", al), ("by", by)] {
                if let Some(value) = value {
                    doc.set_header(key, value);
                }
            }
            write_document(&doc, &lrc)
        }
    }
}

/// Unparsable input falls back to millisecond precision.
fn parse_precision(raw: &str) -> TimestampPrecision {
    match raw.trim().parse::<u8>() {
        Ok(digits) => TimestampPrecision::from_digits(Some(digits)),
        Err(_) => TimestampPrecision::Milliseconds,
    }
}

fn recognizer_config(
    recognizers: Option<&Path>,
    transcript: Option<PathBuf>,
) -> Result<RecognizerConfig, String> {
    if let Some(transcript) = transcript {
        return Ok(RecognizerConfig {
            strategies: vec![StrategyConfig::Transcript {
                path: Some(transcript.to_string_lossy().into_owned()),
                suffix: String::new(),
            }],
        });
    }
    match recognizers {
        Some(path) => RecognizerConfig::load(path).map_err(|e| e.to_string()),
        None => Ok(RecognizerConfig::default()),
    }
}

fn generate(
    audio: &Path,
    lyrics: &Path,
    out: Option<&Path>,
    precision: TimestampPrecision,
    recognizers: RecognizerConfig,
    match_threshold: f64,
) -> Result<(), String> {
    let syncer = LyricSyncerBuilder::new(SyncConfig {
        precision,
        match_threshold,
        ..SyncConfig::default()
    })
    .with_recognizer_config(recognizers)
    .build()
    .map_err(|e| e.to_string())?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("recognizing {}", audio.display()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = syncer.generate(audio, lyrics, out);
    spinner.finish_and_clear();

    let written = result.map_err(|e| e.to_string())?;
    println!("{}", written.display());
    Ok(())
}

fn read_document(path: &Path) -> Result<LrcDocument, String> {
    LrcDocument::read(path).map_err(|e| format!("{}: {e}", path.display()))
}

fn write_document(doc: &LrcDocument, path: &Path) -> Result<(), String> {
    doc.write(path, COMPANION_PRECISION)
        .map_err(|e| format!("{}: {e}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}
