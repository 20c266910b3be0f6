//! Result sink: per-storm peaks plus the measured simulation time.

use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;
use storms_core::Peak;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub time_secs: f64,
    pub results: Vec<Peak>,
}

impl RunReport {
    pub fn new(elapsed: Duration, results: &[Peak]) -> Self {
        Self {
            time_secs: elapsed.as_secs_f64(),
            results: results.to_vec(),
        }
    }

    /// Plain text, one `position energy` line per storm.
    pub fn write_text<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Time: {:.6}", self.time_secs)?;
        writeln!(out, "Results:")?;
        for peak in &self.results {
            writeln!(out, "{} {:.6}", peak.position, peak.energy)?;
        }
        writeln!(out)?;
        out.flush()
    }

    /// Same content as [`RunReport::write_text`], comma-separated.
    pub fn write_csv<W: Write>(&self, out: W) -> anyhow::Result<()> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);
        let time = format!("{:.6}", self.time_secs);
        writer.write_record(["Time:", time.as_str()])?;
        writer.write_record(["Results:"])?;
        for peak in &self.results {
            writer.write_record([
                peak.position.to_string(),
                format!("{:.6}", peak.energy),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, out: W) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(out, self)?;
        Ok(())
    }
}
