use std::fmt;
use crate::drivers::error::RecordError;
/// Measurement as received. The field text is always kept so the data log
/// holds exactly what the device sent.
#[derive(Clone, Debug, PartialEq)]
pub enum Reading {
    Numeric { value: f64, text: String },
    Text(String),
}
impl Reading {
    /// Value used for plotting and filtering. Unparseable text becomes NaN.
    pub fn as_f64(&self) -> f64 {
        match self {
            Reading::Numeric { value, .. } => *value,
            Reading::Text(s) => s.parse().unwrap_or(f64::NAN),
        }
    }
}
impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Numeric { text, .. } | Reading::Text(text) => f.write_str(text),
        }
    }
}
/// One accepted record. `t` is local receipt time since acquisition start,
/// not the device-reported time field.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub t: f64,
    pub value: Reading,
}
/// Turns `"<device_time> <value> ..."` lines into samples.
#[derive(Clone, Copy, Debug)]
pub struct RecordParser {
    coerce_numeric: bool,
}
impl RecordParser {
    pub fn new(coerce_numeric: bool) -> Self {
        Self { coerce_numeric }
    }
    /// Parse `line` received `elapsed` seconds after `t_init`.
    pub fn parse(&self, line: &str, elapsed: f64) -> Result<Sample, RecordError> {
        let mut fields = line.split_whitespace();
        let (Some(device_t), Some(value)) = (fields.next(), fields.next()) else {
            return Err(RecordError::IncompleteRecord {
                fields: line.split_whitespace().count(),
            });
        };
        let value = if self.coerce_numeric {
            // The device clock only has to be well formed; it is not used for timing.
            parse_number("time", device_t)?;
            Reading::Numeric {
                value: parse_number("value", value)?,
                text: value.to_owned(),
            }
        } else {
            Reading::Text(value.to_owned())
        };
        Ok(Sample { t: elapsed, value })
    }
}
/// Finite floats only: a single `nan`/`inf` would stick in the filter state for
/// the rest of the run.
fn parse_number(field: &'static str, text: &str) -> Result<f64, RecordError> {
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RecordError::MalformedField {
            field,
            text: text.to_owned(),
        }),
    }
}
