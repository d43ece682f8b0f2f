//! Feature extraction command.

use super::common::read_mono;
use anyhow::Context;
use cepstra_config::{ExtractorParams, find_config};
use cepstra_core::ParameterMap;
use cepstra_extractor::{BatchExtractor, Features};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ExtractArgs {
    /// Input WAV files
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Frame size in samples (overrides the config file)
    #[arg(long)]
    frame_size: Option<u32>,

    /// Hop size in samples (overrides the config file)
    #[arg(long)]
    hop_size: Option<u32>,

    /// Sample rate in Hz (default: taken from each file)
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Config file (default: cepstra.toml in the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

/// Features of one input file.
#[derive(Serialize)]
struct FileFeatures {
    file: String,
    sample_rate: f64,
    frame_size: u32,
    hop_size: u32,
    frames: usize,
    #[serde(flatten)]
    features: Features,
}

pub fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let params = resolve_params(&args)?;
    let mut extractor = BatchExtractor::from_config(&params)?;
    tracing::info!(
        frame_size = params.frame_size,
        hop_size = params.hop_size,
        "extractor ready"
    );

    let progress = (args.inputs.len() > 1)
        .then(|| -> anyhow::Result<ProgressBar> {
            let pb = ProgressBar::new(args.inputs.len() as u64);
            pb.set_style(
                ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("##-"),
            );
            Ok(pb)
        })
        .transpose()?;

    let mut results = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        if let Some(pb) = &progress {
            pb.set_message(path.display().to_string());
        }
        results.push(extract_file(&mut extractor, &params, args.sample_rate, path)?);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &results)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(&mut out, &results)?,
    }
    out.flush()?;

    if let Some(path) = &args.output {
        tracing::info!("wrote {} file(s) to {}", results.len(), path.display());
    }
    Ok(())
}

/// Config file first, then command-line overrides.
fn resolve_params(args: &ExtractArgs) -> anyhow::Result<ExtractorParams> {
    let mut params = match &args.config {
        Some(path) => ExtractorParams::load(path)?,
        None => match find_config(None) {
            Some(path) => {
                tracing::debug!("using config {}", path.display());
                ExtractorParams::load(&path)?
            }
            None => ExtractorParams::default(),
        },
    };
    if let Some(frame_size) = args.frame_size {
        params = params.with_frame_size(frame_size);
    }
    if let Some(hop_size) = args.hop_size {
        params = params.with_hop_size(hop_size);
    }
    if let Some(sample_rate) = args.sample_rate {
        params = params.with_sample_rate(sample_rate);
    }
    params.validate()?;
    Ok(params)
}

fn extract_file(
    extractor: &mut BatchExtractor,
    params: &ExtractorParams,
    sample_rate_override: Option<f64>,
    path: &Path,
) -> anyhow::Result<FileFeatures> {
    let audio = read_mono(path)?;
    let sample_rate = sample_rate_override.unwrap_or(f64::from(audio.sample_rate));
    if extractor.parameters().real("sampleRate") != Some(sample_rate) {
        extractor.configure(&ParameterMap::new().with("sampleRate", sample_rate))?;
    }

    tracing::debug!(
        "{}: {} samples, {} channel(s), {sample_rate} Hz",
        path.display(),
        audio.samples.len(),
        audio.channels
    );
    let features = extractor
        .compute(&audio.samples)
        .with_context(|| format!("extraction failed for {}", path.display()))?;

    Ok(FileFeatures {
        file: path.display().to_string(),
        sample_rate,
        frame_size: params.frame_size,
        hop_size: params.hop_size,
        frames: features.frame_count(),
        features,
    })
}

/// One row per frame: file, frame index, time, scalar features, MFCCs.
fn write_csv(out: &mut impl Write, results: &[FileFeatures]) -> io::Result<()> {
    let coefficients = results
        .iter()
        .find_map(|r| r.features.mfcc.first())
        .map_or(0, Vec::len);

    write!(out, "file,frame,time,spectral_rms,spectral_rolloff,zerocrossingrate")?;
    for i in 0..coefficients {
        write!(out, ",mfcc_{i}")?;
    }
    writeln!(out)?;

    for result in results {
        for index in 0..result.frames {
            let Some((mfcc, rms, rolloff, zcr)) = result.features.frame(index) else {
                break;
            };
            let time = index as f64 * f64::from(result.hop_size) / result.sample_rate;
            write!(
                out,
                "{},{index},{time:.6},{rms},{rolloff},{zcr}",
                csv_field(&result.file)
            )?;
            for c in mfcc {
                write!(out, ",{c}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Quotes `value` when it holds a separator, quote or line break, doubling
/// embedded quotes.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
