use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::io::write_atomic;
use crate::pipeline::{DiagnosticSeries, DiagnosticSink};

/// Writes every intermediate series to `<dir>/<name>.txt` in Octave's text
/// matrix format, loadable with `load`.
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in stage order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

fn octave_matrix(name: &str, series: DiagnosticSeries<'_>) -> String {
    let (rows, columns) = match series {
        DiagnosticSeries::Real { axis, .. } => (axis.len(), 2),
        DiagnosticSeries::Complex { axis, .. } => (axis.len(), 3),
    };
    let mut out = format!(
        "# Created by ms2psd\n# name: {}\n# type: matrix\n# rows: {}\n# columns: {}\n",
        name, rows, columns
    );

    match series {
        DiagnosticSeries::Real { axis, values } => {
            for (x, y) in axis.iter().zip(values.iter()) {
                out.push_str(&format!(" {:e} {:e}\n", x, y));
            }
        }
        DiagnosticSeries::Complex { axis, values } => {
            for (x, z) in axis.iter().zip(values.iter()) {
                out.push_str(&format!(" {:e} {:e} {:e}\n", x, z.re, z.im));
            }
        }
    }
    out
}

impl DiagnosticSink for DirectorySink {
    fn record(&mut self, name: &str, series: DiagnosticSeries<'_>) -> Result<()> {
        let path = self.dir.join(format!("{}.txt", name));
        let text = octave_matrix(name, series);
        write_atomic(&path, |w| w.write_all(text.as_bytes()))?;
        self.written.push(path);
        Ok(())
    }
}
