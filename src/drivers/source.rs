#[cfg(test)]
use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};
use rand::{rngs::StdRng, Rng, SeedableRng};
#[cfg(test)]
use crate::engine::StopHandle;
/// Command that starts streaming on the sensor.
pub const START_COMMAND: &str = "b\n";
/// Command that stops streaming on the sensor.
pub const STOP_COMMAND: &str = "\n";
/// Something that yields newline-terminated text records from a device.
pub trait LineSource {
    /// Whether data is available right now. Never blocks.
    fn poll(&mut self) -> io::Result<bool>;
    /// Next complete line, or `None` if the bounded read timeout expired first.
    fn read_line(&mut self) -> io::Result<Option<String>>;
    /// Send a command to the device.
    fn write(&mut self, command: &str) -> io::Result<()>;
}
impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn poll(&mut self) -> io::Result<bool> {
        (**self).poll()
    }
    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
    fn write(&mut self, command: &str) -> io::Result<()> {
        (**self).write(command)
    }
}
impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn poll(&mut self) -> io::Result<bool> {
        (**self).poll()
    }
    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
    fn write(&mut self, command: &str) -> io::Result<()> {
        (**self).write(command)
    }
}
/// Scripted source for tests.
///
/// Each batch becomes available on one poll cycle: once the lines of a batch are
/// read, `poll` reports nothing until the next cycle releases the next batch.
#[cfg(test)]
pub struct ManualSource {
    pending: VecDeque<Vec<String>>,
    ready: VecDeque<String>,
    released_this_cycle: bool,
    written: Vec<String>,
    stop_when_drained: Option<StopHandle>,
}
#[cfg(test)]
impl ManualSource {
    pub fn new<I, B, L>(batches: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            pending: batches
                .into_iter()
                .map(|batch| batch.into_iter().map(Into::into).collect())
                .collect(),
            ready: VecDeque::new(),
            released_this_cycle: false,
            written: Vec::new(),
            stop_when_drained: None,
        }
    }
    /// Trip `stop` once every scripted batch has been handed out.
    pub fn stop_when_drained(mut self, stop: StopHandle) -> Self {
        self.stop_when_drained = Some(stop);
        self
    }
    pub fn written(&self) -> &[String] {
        &self.written
    }
}
#[cfg(test)]
impl LineSource for ManualSource {
    fn poll(&mut self) -> io::Result<bool> {
        if !self.ready.is_empty() {
            return Ok(true);
        }
        if self.released_this_cycle {
            // The batch was drained; the next one arrives on the next cycle.
            self.released_this_cycle = false;
            return Ok(false);
        }
        match self.pending.pop_front() {
            Some(batch) => {
                self.ready.extend(batch);
                self.released_this_cycle = true;
                Ok(!self.ready.is_empty())
            }
            None => {
                if let Some(stop) = &self.stop_when_drained {
                    stop.stop();
                }
                Ok(false)
            }
        }
    }
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.ready.pop_front())
    }
    fn write(&mut self, command: &str) -> io::Result<()> {
        self.written.push(command.to_owned());
        Ok(())
    }
}
/// Synthetic sensor: a slow drift plus a sine and noise, emitted at a fixed rate
/// once the start command has been received.
pub struct SimulatedSource {
    rng: StdRng,
    interval: Duration,
    next_due: Option<Instant>,
    started_at: Instant,
    streaming: bool,
}
impl SimulatedSource {
    pub fn new(rate_hz: f64) -> Self {
        Self::with_rng(rate_hz, StdRng::from_entropy())
    }
    #[cfg(test)]
    pub fn with_seed(rate_hz: f64, seed: u64) -> Self {
        Self::with_rng(rate_hz, StdRng::seed_from_u64(seed))
    }
    fn with_rng(rate_hz: f64, rng: StdRng) -> Self {
        Self {
            rng,
            interval: Duration::from_secs_f64(1.0 / rate_hz.max(1e-3)),
            next_due: None,
            started_at: Instant::now(),
            streaming: false,
        }
    }
    fn synth_line(&mut self, t: f64) -> String {
        let drift = 0.05 * t;
        let signal = (2.0 * std::f64::consts::PI * 1.5 * t).sin();
        let noise = self.rng.gen_range(-0.1..0.1);
        format!("{:.3} {:.4}\n", t, drift + signal + noise)
    }
}
impl LineSource for SimulatedSource {
    fn poll(&mut self) -> io::Result<bool> {
        Ok(self.streaming && self.next_due.is_some_and(|due| Instant::now() >= due))
    }
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let Some(due) = self.next_due.filter(|_| self.streaming) else {
            return Ok(None);
        };
        let now = Instant::now();
        if now < due {
            std::thread::sleep(due - now);
        }
        self.next_due = Some(due + self.interval);
        let t = self.started_at.elapsed().as_secs_f64();
        Ok(Some(self.synth_line(t)))
    }
    fn write(&mut self, command: &str) -> io::Result<()> {
        match command {
            START_COMMAND => {
                self.streaming = true;
                self.started_at = Instant::now();
                self.next_due = Some(self.started_at);
            }
            STOP_COMMAND => {
                self.streaming = false;
                self.next_due = None;
            }
            other => log::warn!("simulated sensor ignoring command {:?}", other),
        }
        Ok(())
    }
}
