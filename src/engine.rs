// src/engine.rs
use std::io::{BufWriter, Write};
use std::fs::File;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info, trace};

use crate::config::Backpressure;
use crate::drivers::{
    AcquisitionError, DisplaySink, LineSource, SamplePipeline, START_COMMAND, STOP_COMMAND,
};
use crate::recorder::DataRecorder;
use crate::types::{PlotMessage, RunSummary};

/// Cooperative stop flag shared between the loop and whoever ends the run.
#[derive(Clone, Debug)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn stop(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of receipt timestamps, in seconds since the run started.
pub trait Clock {
    fn elapsed_secs(&mut self) -> f64;
}

pub struct WallClock {
    t_init: Instant,
}

impl WallClock {
    pub fn start() -> Self {
        Self { t_init: Instant::now() }
    }
}

impl Clock for WallClock {
    fn elapsed_secs(&mut self) -> f64 {
        self.t_init.elapsed().as_secs_f64()
    }
}

/// One acquisition session: source -> pipeline -> display + data log.
/// Single use; `run` consumes it.
pub struct Acquisition<S, D, C = WallClock, W: Write = BufWriter<File>> {
    source: S,
    pipeline: SamplePipeline,
    display: D,
    recorder: DataRecorder<W>,
    clock: C,
    stop: StopHandle,
    backpressure: Backpressure,
    idle_sleep: Duration,
    events: Option<Sender<PlotMessage>>,
    summary: RunSummary,
}

impl<S, D, C, W> Acquisition<S, D, C, W>
where
    S: LineSource,
    D: DisplaySink,
    C: Clock,
    W: Write,
{
    pub fn new(
        source: S,
        pipeline: SamplePipeline,
        display: D,
        recorder: DataRecorder<W>,
        clock: C,
        stop: StopHandle,
    ) -> Self {
        Self {
            source,
            pipeline,
            display,
            recorder,
            clock,
            stop,
            backpressure: Backpressure::KeepLatest,
            idle_sleep: Duration::from_millis(1),
            events: None,
            summary: RunSummary::default(),
        }
    }

    pub fn with_backpressure(mut self, backpressure: Backpressure) -> Self {
        self.backpressure = backpressure;
        self
    }

    pub fn with_idle_sleep(mut self, idle_sleep: Duration) -> Self {
        self.idle_sleep = idle_sleep;
        self
    }

    /// Status and log lines for the GUI.
    pub fn with_events(mut self, tx: Sender<PlotMessage>) -> Self {
        self.events = Some(tx);
        self
    }

    fn notify(&self, msg: PlotMessage) {
        if let Some(tx) = &self.events {
            tx.send(msg).ok();
        }
    }

    /// Runs until the stop handle is tripped, then sends the stop command.
    /// Returns the writer so callers can inspect what was persisted.
    pub fn run(mut self) -> Result<(RunSummary, Option<W>), AcquisitionError> {
        self.source
            .write(START_COMMAND)
            .map_err(AcquisitionError::Transport)?;
        info!("🌊 Stream started");
        self.notify(PlotMessage::Status(true));

        while self.stop.is_running() {
            if let Err(e) = self.iterate() {
                error!("acquisition aborted: {e}");
                self.notify(PlotMessage::Log(format!("❌ {e}")));
                self.notify(PlotMessage::Status(false));
                // Best effort: leave the device quiet even on a failed run.
                self.source.write(STOP_COMMAND).ok();
                self.recorder.finish().ok();
                return Err(e);
            }
            if self.idle_sleep.is_zero() {
                thread::yield_now();
            } else {
                thread::sleep(self.idle_sleep);
            }
        }

        info!("quitting");
        self.source
            .write(STOP_COMMAND)
            .map_err(AcquisitionError::Transport)?;
        let writer = self.recorder.finish()?;
        info!(
            "🛑 Stream stopped: {} accepted, {} rejected, {} discarded over {} polls",
            self.summary.accepted,
            self.summary.rejected,
            self.summary.discarded_by_backpressure,
            self.summary.polls_with_data
        );
        self.notify(PlotMessage::Status(false));
        Ok((self.summary, writer))
    }

    /// Drains the source once and processes what the backpressure policy keeps.
    fn iterate(&mut self) -> Result<(), AcquisitionError> {
        let mut lines = Vec::new();
        while self.source.poll().map_err(AcquisitionError::Transport)? {
            match self.source.read_line().map_err(AcquisitionError::Transport)? {
                Some(line) => lines.push(line),
                // Timed out: nothing this cycle.
                None => break,
            }
        }
        if lines.is_empty() {
            return Ok(());
        }
        self.summary.polls_with_data += 1;
        if self.backpressure == Backpressure::KeepLatest && lines.len() > 1 {
            self.summary.discarded_by_backpressure += lines.len() - 1;
            lines.drain(..lines.len() - 1);
        }
        for line in &lines {
            self.process(line)?;
        }
        Ok(())
    }

    fn process(&mut self, line: &str) -> Result<(), AcquisitionError> {
        let elapsed = self.clock.elapsed_secs();
        let accepted = match self.pipeline.ingest(line, elapsed) {
            Ok(accepted) => accepted,
            Err(e) => {
                trace!("dropping {:?}: {e}", line.trim_end());
                self.summary.rejected += 1;
                return Ok(());
            }
        };
        match accepted.filtered {
            Some(filtered) => debug!(
                "{}, {} (hp {:.4})",
                accepted.sample.t, accepted.sample.value, filtered
            ),
            None => debug!("{}, {}", accepted.sample.t, accepted.sample.value),
        }
        if accepted.evicted > 0 {
            trace!("window dropped {} samples", accepted.evicted);
        }
        if let Some(frame) = self.pipeline.frame() {
            self.display.show(&frame);
        }
        self.recorder.append(&accepted.sample)?;
        self.summary.accepted += 1;
        Ok(())
    }
}

/// Runs the acquisition loop on its own thread.
pub fn spawn<S, D, C, W>(
    acquisition: Acquisition<S, D, C, W>,
) -> std::io::Result<JoinHandle<Result<RunSummary, AcquisitionError>>>
where
    S: LineSource + Send + 'static,
    D: DisplaySink + Send + 'static,
    C: Clock + Send + 'static,
    W: Write + Send + 'static,
{
    thread::Builder::new()
        .name("acquisition".to_owned())
        .spawn(move || acquisition.run().map(|(summary, _)| summary))
}
