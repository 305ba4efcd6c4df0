// Acquisition building blocks: line sources, parsing, filtering, windowing, sinks.
pub mod buffer;
pub mod error;
pub mod filter;
pub mod parser;
pub mod pipeline;
pub mod serial;
pub mod sink;
pub mod source;
// Re-exported for the engine and GUI.
pub use buffer::WindowFrame;
pub use error::AcquisitionError;
pub use filter::HighPassFilter;
pub use parser::{RecordParser, Sample};
pub use pipeline::SamplePipeline;
pub use serial::SerialLineSource;
pub use sink::{ChannelSink, DisplaySink, LogSink};
pub use source::{LineSource, SimulatedSource, START_COMMAND, STOP_COMMAND};
