// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! JSON-lines ingestion source.
//!
//! Each line is one record object. A `null` line is a tombstone. The line
//! number is the record's offset and the source name stands in for the topic.

use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::engine::{IngestQueue, SourcePosition, WorkItem};
use crate::observability::messages::ingestion::{IngestionFinished, MalformedInput, TombstoneDiscarded};
use crate::observability::messages::StructuredLog;
use crate::record::Record;

/// Counters for one pass over a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub read: u64,
    pub accepted: u64,
    pub shed: u64,
    pub skipped: u64,
}

/// What one line turned into.
#[derive(Debug)]
pub enum ParsedLine {
    Item(WorkItem),
    Tombstone(SourcePosition),
    Malformed(SourcePosition, serde_json::Error),
    Blank,
}

pub struct JsonLinesSource<R> {
    name: Arc<str>,
    reader: R,
    id_field: String,
}

impl JsonLinesSource<BufReader<tokio::fs::File>> {
    pub async fn open(path: &Path, id_field: impl Into<String>) -> std::io::Result<Self> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(path.display().to_string(), BufReader::new(file), id_field))
    }
}

impl JsonLinesSource<BufReader<tokio::io::Stdin>> {
    pub fn stdin(id_field: impl Into<String>) -> Self {
        Self::new("stdin", BufReader::new(tokio::io::stdin()), id_field)
    }
}

impl<R: AsyncBufRead + Unpin> JsonLinesSource<R> {
    pub fn new(name: impl Into<Arc<str>>, reader: R, id_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reader,
            id_field: id_field.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse one line. `offset` is its 1-based line number.
    pub fn parse_line(&self, offset: u64, line: &str) -> ParsedLine {
        if line.trim().is_empty() {
            return ParsedLine::Blank;
        }

        let position = SourcePosition::new(Arc::clone(&self.name), 0, offset);
        match serde_json::from_str::<Option<serde_json::Map<String, serde_json::Value>>>(line) {
            Ok(None) => ParsedLine::Tombstone(position),
            Ok(Some(map)) => {
                let record = Record::from(map);
                let position = position.with_key(record.text(&self.id_field));
                ParsedLine::Item(WorkItem::new(position, record))
            }
            Err(error) => ParsedLine::Malformed(position, error),
        }
    }

    /// Read to the end, offering every record to the queue.
    ///
    /// Items the queue sheds are counted and not retried.
    pub async fn pump(mut self, queue: &IngestQueue) -> std::io::Result<IngestStats> {
        let mut stats = IngestStats::default();
        let mut buf = Vec::new();
        let mut offset = 0u64;

        loop {
            buf.clear();
            if self.reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            offset += 1;

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(error) => {
                    stats.read += 1;
                    stats.skipped += 1;
                    MalformedInput {
                        position: &SourcePosition::new(Arc::clone(&self.name), 0, offset),
                        error: &error,
                    }
                    .log();
                    continue;
                }
            };

            match self.parse_line(offset, line) {
                ParsedLine::Blank => {}
                ParsedLine::Item(item) => {
                    stats.read += 1;
                    if queue.enqueue(item).await {
                        stats.accepted += 1;
                    } else {
                        stats.shed += 1;
                    }
                }
                ParsedLine::Tombstone(position) => {
                    stats.read += 1;
                    stats.skipped += 1;
                    TombstoneDiscarded {
                        position: &position,
                    }
                    .log();
                }
                ParsedLine::Malformed(position, error) => {
                    stats.read += 1;
                    stats.skipped += 1;
                    MalformedInput {
                        position: &position,
                        error: &error,
                    }
                    .log();
                }
            }
        }

        IngestionFinished {
            source: &self.name,
            read: stats.read,
            accepted: stats.accepted,
            shed: stats.shed,
            skipped: stats.skipped,
        }
        .log();
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;
    use std::time::Duration;

    fn source(text: &'static str) -> JsonLinesSource<&'static [u8]> {
        JsonLinesSource::new("test", text.as_bytes(), "uuid")
    }

    #[test]
    fn test_parse_line_variants() {
        let src = source("");

        match src.parse_line(3, r#"{"uuid":"u3","tx_amt":100}"#) {
            ParsedLine::Item(item) => {
                assert_eq!(item.position.offset, 3);
                assert_eq!(item.position.key.as_deref(), Some("u3"));
                assert_eq!(item.record.get("tx_amt"), Some(&Value::Integer(100)));
            }
            other => panic!("expected item, got {:?}", other),
        }

        assert!(matches!(src.parse_line(1, "null"), ParsedLine::Tombstone(p) if p.offset == 1));
        assert!(matches!(src.parse_line(2, "[1, 2]"), ParsedLine::Malformed(..)));
        assert!(matches!(src.parse_line(2, "{\"uuid\":"), ParsedLine::Malformed(..)));
        assert!(matches!(src.parse_line(4, "   \r\n"), ParsedLine::Blank));
    }

    #[tokio::test]
    async fn test_pump_counts_and_delivers() {
        let text = "{\"uuid\":\"a\"}\nnull\n\nnot json\r\n{\"uuid\":\"b\"}\n";
        let (queue, mut rx) = IngestQueue::bounded(8, Duration::from_millis(10));

        let stats = source(text).pump(&queue).await.unwrap();

        assert_eq!(
            stats,
            IngestStats {
                read: 4,
                accepted: 2,
                shed: 0,
                skipped: 2
            }
        );
        let first = rx.recv().await.unwrap();
        assert_eq!(first.position.offset, 1);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.position.offset, 5);
        assert_eq!(second.record.text("uuid").as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_pump_skips_invalid_utf8_line() {
        let text: &'static [u8] = b"{\"uuid\":\"a\"}\n{\"uuid\":\"\xff\"}\n{\"uuid\":\"c\"}\n";
        let (queue, mut rx) = IngestQueue::bounded(8, Duration::from_millis(10));

        let stats = JsonLinesSource::new("test", text, "uuid")
            .pump(&queue)
            .await
            .unwrap();
        drop(queue);

        assert_eq!(stats.read, 3);
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.skipped, 1);
        let mut offsets = Vec::new();
        while let Some(item) = rx.recv().await {
            offsets.push(item.position.offset);
        }
        assert_eq!(offsets, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_pump_counts_shed_items() {
        let text = "{\"n\":1}\n{\"n\":2}\n";
        let (queue, _rx) = IngestQueue::bounded(1, Duration::from_millis(5));
        let stats = source(text).pump(&queue).await.unwrap();
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.shed, 1);
    }
}
