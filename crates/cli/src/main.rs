mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ffpipe_core::{
    load_config, load_default_config, probe_capabilities, validate_config, CapabilitySet, Config,
    FfmpegBinary, FfmpegPipe, ProcessHandle, SinkRequest, TrackDescriptor,
};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // stdout carries media, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = load(&cli)?;
    validate_config(&config).context("Configuration validation failed")?;
    let binary = FfmpegBinary::new(&config.ffmpeg.path);

    match cli.command {
        Commands::Capabilities { json } => {
            let capabilities = probe_capabilities(&binary)
                .await
                .context("Capability probing failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&capabilities)?);
            } else {
                println!("formats: {}", capabilities.formats().collect::<Vec<_>>().join(" "));
                println!("codecs: {}", capabilities.codecs().collect::<Vec<_>>().join(" "));
            }
        }
        Commands::Check { format, codec, uri } => {
            let capabilities = probe_capabilities(&binary)
                .await
                .context("Capability probing failed")?;
            let pipe = FfmpegPipe::new(config.ffmpeg, capabilities);
            let track = TrackDescriptor { format, codec, uri };
            println!("{}", pipe.is_supported(&track).as_str());
        }
        Commands::Source {
            location,
            input,
            seek,
        } => {
            let pipe = FfmpegPipe::new(config.ffmpeg, CapabilitySet::empty());
            let mut spec = input.spec().unwrap_or_default();
            spec.seek = seek;

            let span = info_span!("source", %location);
            let mut handle = pipe.source(&location, Some(&spec), Some(&span))?;
            stream_to_stdout(&mut handle).await?;
        }
        Commands::Sink {
            location,
            destination,
            input,
            output,
            seek,
        } => {
            let pipe = FfmpegPipe::new(config.ffmpeg, CapabilitySet::empty());
            let mut request = SinkRequest::new(location, destination.as_str());
            request.input = input.spec();
            request.output = output.spec();
            request.seek = seek;

            let span = info_span!("sink", %destination);
            let mut handle = pipe.sink(&request, Some(&span))?;
            let feeder = feed_stdin(&mut handle);
            if request.destination.is_stdout() {
                stream_to_stdout(&mut handle).await?;
            } else {
                handle.wait().await?;
            }
            finish_feeder(feeder).await?;
            info!("Finished writing to {}", destination);
        }
        Commands::Transform { input, output } => {
            let Some(output) = output.spec() else {
                bail!("transform needs --output-format or --output-codec");
            };
            let pipe = FfmpegPipe::new(config.ffmpeg, CapabilitySet::empty());
            let input = input.spec().unwrap_or_default();

            let mut handle = pipe.transform(&input, &output, None)?;
            let feeder = feed_stdin(&mut handle);
            stream_to_stdout(&mut handle).await?;
            finish_feeder(feeder).await?;
        }
        Commands::CheckTools => {
            binary.validate().await.context("ffmpeg is not usable")?;
            println!("ffmpeg: ok ({})", binary.path().display());
        }
    }

    Ok(())
}

fn load(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => load_default_config().context("Failed to load default configuration"),
    }
}

/// Copies our stdin into the process when it reads from `-`.
fn feed_stdin(handle: &mut ProcessHandle) -> Option<JoinHandle<std::io::Result<u64>>> {
    let mut child_stdin = handle.take_stdin()?;
    Some(tokio::spawn(async move {
        let copied = tokio::io::copy(&mut tokio::io::stdin(), &mut child_stdin).await?;
        child_stdin.shutdown().await?;
        Ok(copied)
    }))
}

async fn finish_feeder(feeder: Option<JoinHandle<std::io::Result<u64>>>) -> Result<()> {
    if let Some(feeder) = feeder {
        match feeder.await.context("stdin feeder panicked")? {
            Ok(_) => {}
            // ffmpeg may stop reading before our stdin ends
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Err(e) => return Err(e).context("Failed to feed stdin to ffmpeg"),
        }
    }
    Ok(())
}

async fn stream_to_stdout(handle: &mut ProcessHandle) -> Result<()> {
    handle.readable().await?;

    let mut stdout = tokio::io::stdout();
    let bytes = tokio::io::copy(handle, &mut stdout).await?;
    stdout.flush().await?;

    handle.wait().await?;
    info!("{} produced {} bytes", handle.label(), bytes);
    Ok(())
}
