use std::sync::Arc;

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt};

use crate::configs::Transport;
use crate::errors::{DecodeError, StoreError};
use crate::models::RawEnvelope;
use crate::protocol::{extractor_for, Extractor, ReadingDecoder, SensorTypeRegistry};
use crate::repositories::ReadingRepository;

/// Upper bound for buffered SMS text that has not produced a frame yet.
const MAX_PENDING_BYTES: usize = 4096;

#[derive(Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    /// No sensor frame in the transport text
    NoFrame,
    /// A frame was found but its body could not be decoded; the message is dropped
    Rejected(DecodeError),
    Stored { sensor_id: String, count: u64 },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub stored_messages: u64,
    pub stored_readings: u64,
    pub rejected: u64,
    pub failed: u64,
}

pub struct IngestService {
    registry: Arc<SensorTypeRegistry>,
    transport: Transport,
    extractor: Box<dyn Extractor>,
    repository: Arc<ReadingRepository>,
}

impl IngestService {
    pub fn new(
        registry: Arc<SensorTypeRegistry>,
        transport: Transport,
        repository: Arc<ReadingRepository>,
    ) -> Self {
        Self {
            registry,
            transport,
            extractor: extractor_for(transport),
            repository,
        }
    }

    /// Runs one unit of transport text through extraction, decoding and storage.
    ///
    /// Decode failures are logged and reported as [`IngestOutcome::Rejected`]; storage
    /// failures are returned so the caller can decide whether to retry the batch.
    pub async fn handle(&self, raw: &str) -> Result<IngestOutcome, StoreError> {
        tracing::debug!(raw, "transport text received");

        let Some(envelope) = self.extractor.extract(raw) else {
            tracing::debug!("no sensor frame in transport text");
            return Ok(IngestOutcome::NoFrame);
        };

        tracing::info!(
            sender = %envelope.sender_id,
            sent_at = %envelope.envelope_timestamp,
            body = %envelope.body,
            "message received"
        );

        let readings = match ReadingDecoder::decode(&self.registry, &envelope.sender_id, &envelope.body) {
            Ok(readings) => readings,
            Err(e) => {
                tracing::error!(sender = %envelope.sender_id, "could not parse message: {}", e);
                return Ok(IngestOutcome::Rejected(e));
            }
        };

        let count = self.repository.insert_many(&readings).await?;

        tracing::info!("{} readings logged from sensor {}", count, envelope.sender_id);

        Ok(IngestOutcome::Stored {
            sensor_id: envelope.sender_id,
            count,
        })
    }

    /// Consumes transport text line by line until the reader is exhausted.
    ///
    /// Serial bridges deliver one message per line. SMS frames span several lines, so
    /// lines are buffered until a frame is recognised or the buffer outgrows any SMS.
    pub async fn listen<R>(&self, reader: R) -> io::Result<IngestStats>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut pending = String::new();
        let mut stats = IngestStats::default();

        while let Some(line) = lines.next_line().await? {
            let unit = match self.transport {
                Transport::Serial => line,
                Transport::Sms => {
                    pending.push_str(&line);
                    pending.push('\n');
                    pending.clone()
                }
            };

            match self.handle(&unit).await {
                Ok(IngestOutcome::NoFrame) => {
                    if pending.len() > MAX_PENDING_BYTES {
                        trim_pending(&mut pending);
                    }
                    continue;
                }
                Ok(IngestOutcome::Stored { count, .. }) => {
                    stats.stored_messages += 1;
                    stats.stored_readings += count;
                }
                Ok(IngestOutcome::Rejected(_)) => stats.rejected += 1,
                Err(e) => {
                    tracing::error!("could not save readings to database: {}", e);
                    stats.failed += 1;
                }
            }

            pending.clear();
        }

        Ok(stats)
    }
}

/// Drops buffered text ahead of the last SMS header, so a header still waiting for its
/// body line survives. Without such a header the whole buffer goes.
fn trim_pending(pending: &mut String) {
    let keep_from = pending
        .rfind(RawEnvelope::SMS_HEADER)
        .filter(|&start| pending.len() - start <= MAX_PENDING_BYTES);

    match keep_from {
        Some(start) => {
            tracing::warn!(bytes = start, "discarding unframed transport text");
            pending.drain(..start);
        }
        None => {
            tracing::warn!(bytes = pending.len(), "discarding unframed transport text");
            pending.clear();
        }
    }
}
