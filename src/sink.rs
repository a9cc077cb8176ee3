//! Record sinks
//!
//! Where decoded records go after each poll cycle.

use crate::error::{Error, Result};
use crate::types::Record;
use async_trait::async_trait;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Downstream consumer of decoded records
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Deliver the records produced by one poll cycle
    async fn emit(&self, records: Vec<Record>) -> Result<()>;
}

/// Writes each record as one JSON line
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl JsonLinesSink<std::io::Stdout> {
    /// Sink writing to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the sink and return the writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<W: Write + Send> RecordSink for JsonLinesSink<W> {
    async fn emit(&self, records: Vec<Record>) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        for record in &records {
            serde_json::to_writer(&mut *writer, record)
                .map_err(|e| Error::sink(format!("failed to write record: {e}")))?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Collects records in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Record>>>,
    batches: Arc<Mutex<usize>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records received so far
    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `emit` calls received
    pub fn batches(&self) -> usize {
        *self.batches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drain collected records
    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn emit(&self, records: Vec<Record>) -> Result<()> {
        *self.batches.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_json_lines_sink_writes_one_line_per_record() {
        let sink = JsonLinesSink::new(Vec::new());
        sink.emit(vec![
            record(json!({"a": "x", "b": 5})),
            record(json!({"a": "y", "b": 6})),
        ])
        .await
        .unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines, vec![r#"{"a":"x","b":5}"#, r#"{"a":"y","b":6}"#]);
    }

    #[tokio::test]
    async fn test_json_lines_sink_empty_batch() {
        let sink = JsonLinesSink::new(Vec::new());
        sink.emit(Vec::new()).await.unwrap();
        assert!(sink.into_inner().is_empty());
    }

    #[tokio::test]
    async fn test_memory_sink_collects_batches() {
        let sink = MemorySink::new();
        sink.emit(vec![record(json!({"n": 1}))]).await.unwrap();
        sink.emit(vec![record(json!({"n": 2})), record(json!({"n": 3}))])
            .await
            .unwrap();

        assert_eq!(sink.batches(), 2);
        assert_eq!(sink.records().len(), 3);
        assert_eq!(sink.take().len(), 3);
        assert!(sink.records().is_empty());
    }
}
