use std::io::{self, Read, Write};
use std::thread;
use std::time::{Duration, Instant};
use log::{debug, info, trace};
use serialport::SerialPort;
use crate::drivers::error::AcquisitionError;
use crate::drivers::source::LineSource;
/// Line source backed by a USB/serial device.
pub struct SerialLineSource {
    port: Box<dyn SerialPort>,
    port_name: String,
    timeout: Duration,
    pending: Vec<u8>,
}
impl SerialLineSource {
    /// Opens `port_name`, then waits `settle` for the board to finish its reset.
    pub fn open(
        port_name: &str,
        baud_rate: u32,
        timeout: Duration,
        settle: Duration,
    ) -> Result<Self, AcquisitionError> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(timeout)
            .open()?;
        info!("opened {} at {} baud", port_name, baud_rate);
        thread::sleep(settle);
        Ok(Self {
            port,
            port_name: port_name.to_owned(),
            timeout,
            pending: Vec::new(),
        })
    }
    fn take_line(&mut self) -> Option<String> {
        let end = self.pending.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=end).collect();
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}
impl LineSource for SerialLineSource {
    fn poll(&mut self) -> io::Result<bool> {
        if self.pending.contains(&b'\n') {
            return Ok(true);
        }
        Ok(self.port.bytes_to_read()? > 0)
    }
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let deadline = Instant::now() + self.timeout;
        let mut chunk = [0u8; 256];
        loop {
            if let Some(line) = self.take_line() {
                trace!("{} <- {:?}", self.port_name, line);
                return Ok(Some(line));
            }
            if Instant::now() >= deadline {
                debug!("{}: read timed out with {} bytes pending", self.port_name, self.pending.len());
                return Ok(None);
            }
            match self.port.read(&mut chunk) {
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => return Ok(None),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
    fn write(&mut self, command: &str) -> io::Result<()> {
        trace!("{} -> {:?}", self.port_name, command);
        self.port.write_all(command.as_bytes())?;
        self.port.flush()
    }
}
