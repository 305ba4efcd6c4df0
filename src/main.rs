// src/main.rs
mod config;
mod drivers;
mod engine;
mod gui;
mod recorder;
mod types;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::channel;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use log::{info, warn};

use config::{AcquisitionConfig, Backpressure};
use drivers::{
    ChannelSink, DisplaySink, HighPassFilter, LineSource, LogSink, RecordParser, SamplePipeline,
    SerialLineSource, SimulatedSource,
};
use engine::{Acquisition, StopHandle, WallClock};
use recorder::DataRecorder;

const SIMULATED_RATE_HZ: f64 = 50.0;

/// Plot and log a serial sensor stream in real time.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Serial device (defaults to the config value, /dev/ttyACM0)
    port: Option<String>,
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Window size in seconds
    #[arg(long)]
    window: Option<f64>,
    /// High-pass cutoff frequency in Hz
    #[arg(long)]
    cutoff: Option<f64>,
    /// Enable the high-pass filter
    #[arg(long)]
    filter: bool,
    /// Keep the value field as text instead of parsing it
    #[arg(long)]
    raw_text: bool,
    /// Process every buffered line instead of only the newest
    #[arg(long)]
    queue_all: bool,
    /// Where to write the data log
    #[arg(long)]
    data_file: Option<PathBuf>,
    /// Use a synthetic sensor instead of the serial port
    #[arg(long)]
    simulate: bool,
    /// No window; press Enter or Ctrl-C to stop
    #[arg(long)]
    headless: bool,
}

impl Args {
    fn apply(&self, config: &mut AcquisitionConfig) {
        if let Some(port) = &self.port {
            config.port = port.clone();
        }
        if let Some(window) = self.window {
            config.window_size = window;
        }
        if let Some(cutoff) = self.cutoff {
            config.cutoff_hz = cutoff;
        }
        if self.filter {
            config.filter_enabled = true;
        }
        if self.raw_text {
            config.coerce_numeric = false;
        }
        if self.queue_all {
            config.backpressure = Backpressure::QueueAll;
        }
        if let Some(path) = &self.data_file {
            config.data_file = path.clone();
        }
    }
}

fn open_source(args: &Args, config: &AcquisitionConfig) -> Result<Box<dyn LineSource + Send>> {
    if args.simulate {
        info!("using simulated sensor at {} Hz", SIMULATED_RATE_HZ);
        return Ok(Box::new(SimulatedSource::new(SIMULATED_RATE_HZ)));
    }
    let serial = SerialLineSource::open(
        &config.port,
        config.baud_rate,
        config.timeout(),
        config.settle(),
    )
    .with_context(|| format!("failed to open {}", config.port))?;
    Ok(Box::new(serial))
}

/// Trips `stop` once a line arrives on `input`. EOF leaves the run to Ctrl-C.
fn stop_on_input(mut input: impl BufRead, stop: &StopHandle) {
    let mut line = String::new();
    if let Ok(n) = input.read_line(&mut line) {
        if n > 0 {
            stop.stop();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AcquisitionConfig::load(path)?,
        None => AcquisitionConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    let source = open_source(&args, &config)?;
    let recorder = DataRecorder::create(&config.data_file)?;
    let pipeline = SamplePipeline::new(
        RecordParser::new(config.coerce_numeric),
        config
            .filter_enabled
            .then(|| HighPassFilter::new(config.cutoff_hz)),
        config.window_size,
    );
    let stop = StopHandle::new();
    let interrupt = stop.clone();
    ctrlc::set_handler(move || {
        info!("interrupted, stopping");
        interrupt.stop();
    })
    .context("failed to install Ctrl-C handler")?;
    let (tx, rx) = channel();
    let display: Box<dyn DisplaySink + Send> = if args.headless {
        Box::new(LogSink)
    } else {
        Box::new(ChannelSink::new(tx.clone()))
    };
    let acquisition = Acquisition::new(
        source,
        pipeline,
        display,
        recorder,
        WallClock::start(),
        stop.clone(),
    )
    .with_backpressure(config.backpressure)
    .with_idle_sleep(config.idle_sleep())
    .with_events(tx);
    let handle = engine::spawn(acquisition).context("failed to start acquisition thread")?;

    if args.headless {
        info!("press Enter or Ctrl-C to stop");
        let watcher = stop.clone();
        std::thread::spawn(move || stop_on_input(std::io::stdin().lock(), &watcher));
        drop(rx);
    } else {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([900.0, 520.0])
                .with_title(config.plot.title.clone()),
            ..Default::default()
        };
        let app = gui::LivePlotApp::new(config.plot.clone(), config.window_size, rx, stop.clone());
        if let Err(e) = eframe::run_native("liveplot", options, Box::new(move |_cc| Box::new(app))) {
            warn!("plot window failed: {e}");
        }
        // Window closed: end the run.
        stop.stop();
    }

    let summary = handle
        .join()
        .map_err(|_| anyhow!("acquisition thread panicked"))??;
    info!(
        "{} samples written to {}",
        summary.accepted,
        config.data_file.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_on_stdin_stops_the_run() {
        let stop = StopHandle::new();
        stop_on_input(&b"\n"[..], &stop);
        assert!(!stop.is_running());
    }

    #[test]
    fn closed_stdin_keeps_running() {
        let stop = StopHandle::new();
        stop_on_input(&b""[..], &stop);
        assert!(stop.is_running());
    }

    #[test]
    fn cli_flags_override_config() {
        let args = Args::parse_from(["liveplot", "/dev/ttyUSB1", "--filter", "--queue-all"]);
        let mut config = AcquisitionConfig::default();
        args.apply(&mut config);
        assert_eq!(config.port, "/dev/ttyUSB1");
        assert!(config.filter_enabled);
        assert_eq!(config.backpressure, Backpressure::QueueAll);
        assert_eq!(config.cutoff_hz, 0.05);
    }
}
