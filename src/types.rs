// src/types.rs
use crate::drivers::WindowFrame;

// Acquisition thread -> GUI
#[derive(Clone, Debug)]
pub enum PlotMessage {
    Frame(WindowFrame),
    Status(bool), // running
    Log(String),
}

// Counters reported when a run ends
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub polls_with_data: usize,
    pub discarded_by_backpressure: usize,
}
