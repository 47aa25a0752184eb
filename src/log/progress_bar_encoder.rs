//! Keeps log lines readable while the step progress bar is drawn. Without this wrapper a log
//! message written over the bar leaves the tail of the bar behind it.

use log::Record;
use log4rs::encode::{Encode, Write};

/// Wraps an encoder and clears the current terminal line before each record.
#[derive(Debug)]
pub struct PBWrapperEncoder {
    inner: Box<dyn Encode>,
}

impl PBWrapperEncoder {
    pub fn new(inner: Box<dyn Encode>) -> Self {
        Self { inner }
    }
}

impl Encode for PBWrapperEncoder {
    fn encode(&self, w: &mut dyn Write, record: &Record) -> Result<(), anyhow::Error> {
        // Clear the entire line and return the cursor to the beginning.
        w.write_all(b"\x1B[2K\r")?;
        self.inner.encode(w, record)
    }
}
