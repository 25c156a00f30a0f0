use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snakevo_evaluator::policy::PolicyNetwork;

/// A saved genome with where it came from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenomeModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Generation in which the genome set its record.
    pub generation: usize,
    pub fitness: f32,
    pub score: usize,
    pub network: PolicyNetwork,
}

impl GenomeModel {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open genome file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to read genome file: {}", path.display()))?;

        Ok(model)
    }

    /// Writes the model as pretty-printed JSON, replacing any existing file.
    pub fn save<P>(&self, path: P) -> anyhow::Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create genome file: {}", path.display()))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
        writeln!(writer)
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to flush genome file: {}", path.display()))?;
        Ok(())
    }
}
