use crate::drivers::buffer::{SampleWindow, WindowEntry, WindowFrame};
use crate::drivers::error::RecordError;
use crate::drivers::filter::HighPassFilter;
use crate::drivers::parser::{RecordParser, Sample};
/// Result of feeding one line through parse, filter and window.
#[derive(Clone, Debug, PartialEq)]
pub struct Accepted {
    pub sample: Sample,
    pub filtered: Option<f64>,
    pub evicted: usize,
}
/// Parser -> optional high-pass filter -> time window. Owns all per-run numeric state.
pub struct SamplePipeline {
    parser: RecordParser,
    filter: Option<HighPassFilter>,
    window: SampleWindow,
    last_t: Option<f64>,
}
impl SamplePipeline {
    pub fn new(parser: RecordParser, filter: Option<HighPassFilter>, window_size: f64) -> Self {
        Self {
            parser,
            filter,
            window: SampleWindow::new(window_size),
            last_t: None,
        }
    }
    /// Processes `line` received `elapsed` seconds into the run. Rejected lines
    /// leave every piece of state untouched.
    pub fn ingest(&mut self, line: &str, elapsed: f64) -> Result<Accepted, RecordError> {
        let sample = self.parser.parse(line, elapsed)?;
        let raw = sample.value.as_f64();
        let dt = self.last_t.map(|prev| sample.t - prev);
        let filtered = self.filter.as_mut().map(|f| f.update(raw, dt));
        let evicted = self.window.push(WindowEntry {
            t: sample.t,
            raw,
            filtered,
        });
        self.last_t = Some(sample.t);
        Ok(Accepted {
            sample,
            filtered,
            evicted,
        })
    }
    pub fn frame(&self) -> Option<WindowFrame> {
        self.window.frame()
    }
}
#[cfg(test)]
impl SamplePipeline {
    pub fn window(&self) -> &SampleWindow {
        &self.window
    }
    pub fn filter(&self) -> Option<&HighPassFilter> {
        self.filter.as_ref()
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::parser::Reading;
    #[test]
    fn rejected_lines_do_not_touch_state() {
        let mut pipeline =
            SamplePipeline::new(RecordParser::new(true), Some(HighPassFilter::new(1.0)), 10.0);
        assert!(pipeline.ingest("42", 0.0).is_err());
        assert!(pipeline.ingest("1 nope", 0.1).is_err());
        assert!(pipeline.window().is_empty());
        assert_eq!(pipeline.filter().unwrap().value(), None);
        let accepted = pipeline.ingest("1 5.0", 0.2).unwrap();
        assert_eq!(accepted.filtered, Some(5.0));
        assert_eq!(accepted.sample.t, 0.2);
    }
    #[test]
    fn filtered_and_raw_stay_aligned() {
        let mut pipeline =
            SamplePipeline::new(RecordParser::new(true), Some(HighPassFilter::new(0.8)), 1.0);
        for i in 0..50 {
            let t = i as f64 * 0.1;
            pipeline.ingest(&format!("{i} {}", (t * 3.0).sin()), t).unwrap();
            let window = pipeline.window();
            assert_eq!(window.times().len(), window.raw_values().len());
            assert_eq!(window.filtered_values().map(|v| v.len()), Some(window.len()));
        }
        let frame = pipeline.frame().unwrap();
        assert_eq!(Some(frame.ys), pipeline.window().filtered_values());
    }
    #[test]
    fn unfiltered_pipeline_displays_raw_values() {
        let mut pipeline = SamplePipeline::new(RecordParser::new(false), None, 10.0);
        let accepted = pipeline.ingest("0 2.5", 1.0).unwrap();
        assert_eq!(accepted.sample.value, Reading::Text("2.5".into()));
        assert_eq!(accepted.evicted, 0);
        assert_eq!(accepted.filtered, None);
        assert_eq!(pipeline.frame().unwrap().ys, vec![2.5]);
    }
    #[test]
    fn non_finite_value_does_not_poison_filter() {
        let mut pipeline =
            SamplePipeline::new(RecordParser::new(true), Some(HighPassFilter::new(1.0)), 10.0);
        assert!(pipeline.ingest("0 nan", 0.0).is_err());
        let accepted = pipeline.ingest("0 2.0", 0.1).unwrap();
        assert_eq!(accepted.filtered, Some(2.0));
        assert_eq!(pipeline.window().len(), 1);
    }
    #[test]
    fn twelve_second_run_keeps_last_ten_seconds() {
        let mut pipeline = SamplePipeline::new(RecordParser::new(true), None, 10.0);
        for i in 0..=12 {
            pipeline.ingest(&format!("0.{i} {i}"), i as f64).unwrap();
        }
        assert_eq!(pipeline.window().oldest().map(|e| e.t), Some(2.0));
        assert_eq!(pipeline.frame().unwrap().x_range, (2.0, 12.0));
    }
}
