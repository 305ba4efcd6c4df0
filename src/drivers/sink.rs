use std::sync::mpsc::Sender;
use log::trace;
use crate::drivers::WindowFrame;
use crate::types::PlotMessage;
/// Receives the full visible series after every accepted sample.
pub trait DisplaySink {
    fn show(&mut self, frame: &WindowFrame);
}
impl<D: DisplaySink + ?Sized> DisplaySink for &mut D {
    fn show(&mut self, frame: &WindowFrame) {
        (**self).show(frame)
    }
}
impl<D: DisplaySink + ?Sized> DisplaySink for Box<D> {
    fn show(&mut self, frame: &WindowFrame) {
        (**self).show(frame)
    }
}
/// Forwards frames to the GUI thread. Never blocks the acquisition loop.
pub struct ChannelSink {
    tx: Sender<PlotMessage>,
}
impl ChannelSink {
    pub fn new(tx: Sender<PlotMessage>) -> Self {
        Self { tx }
    }
}
impl DisplaySink for ChannelSink {
    fn show(&mut self, frame: &WindowFrame) {
        // A closed window is not an acquisition failure.
        self.tx.send(PlotMessage::Frame(frame.clone())).ok();
    }
}
/// Headless stand-in that only traces the visible extent.
#[derive(Default)]
pub struct LogSink;
impl DisplaySink for LogSink {
    fn show(&mut self, frame: &WindowFrame) {
        trace!(
            "window: {} samples, x in [{:.3}, {:.3}]",
            frame.len(),
            frame.x_range.0,
            frame.x_range.1
        );
    }
}
