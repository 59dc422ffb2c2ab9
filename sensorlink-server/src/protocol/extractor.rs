use crate::configs::Transport;
use crate::models::RawEnvelope;

/// Recovers a sensor message from raw transport text.
///
/// Finding nothing is an expected outcome on a noisy link, so misses are `None`
/// rather than errors.
pub trait Extractor: Send + Sync {
    fn extract(&self, raw: &str) -> Option<RawEnvelope>;
}

pub fn extractor_for(transport: Transport) -> Box<dyn Extractor> {
    match transport {
        Transport::Sms => Box::new(SmsExtractor),
        Transport::Serial => Box::new(SerialExtractor),
    }
}

/// Unsolicited SMS notifications as printed by a GSM modem:
///
/// ```text
/// +CMT: "<sender>","<alpha>","<timestamp>"\r\n
/// <body>\r\n
/// ```
pub struct SmsExtractor;

impl SmsExtractor {
    const HEADER_FIELDS: usize = 3;

    fn parse_frame(text: &str) -> Option<RawEnvelope> {
        let (header, rest) = split_line(text)?;
        let fields = parse_quoted_fields(header)?;
        if fields.len() != Self::HEADER_FIELDS {
            return None;
        }

        // A body without a line break after it was cut off in transit.
        let (body, _) = split_line(rest)?;
        if body.is_empty() {
            return None;
        }

        Some(RawEnvelope::new(fields[0], fields[2], body))
    }
}

impl Extractor for SmsExtractor {
    fn extract(&self, raw: &str) -> Option<RawEnvelope> {
        let mut cursor = 0;

        while let Some(offset) = raw[cursor..].find(RawEnvelope::SMS_HEADER) {
            cursor += offset + RawEnvelope::SMS_HEADER.len();

            match Self::parse_frame(&raw[cursor..]) {
                Some(envelope) => return Some(envelope),
                None => tracing::trace!(offset = cursor, "rejected sms header candidate"),
            }
        }

        None
    }
}

/// `<sender>:<body>` messages forwarded by a radio bridge over UART.
pub struct SerialExtractor;

impl SerialExtractor {
    const DELIM: char = ':';
}

impl Extractor for SerialExtractor {
    fn extract(&self, raw: &str) -> Option<RawEnvelope> {
        let mut parts = raw.trim().split(Self::DELIM);

        match (parts.next(), parts.next(), parts.next()) {
            (Some(sender), Some(body), None) => {
                let (sender, body) = (sender.trim(), body.trim());
                if sender.is_empty() || body.is_empty() {
                    return None;
                }
                Some(RawEnvelope::new(sender, "", body))
            }
            _ => None,
        }
    }
}

/// Splits off the first line, accepting `\n` or `\r\n`. `None` if no line break follows.
fn split_line(text: &str) -> Option<(&str, &str)> {
    let end = text.find('\n')?;
    let line = &text[..end];

    Some((line.strip_suffix('\r').unwrap_or(line), &text[end + 1..]))
}

/// Parses `"a","b","c"`; quoted values may contain commas.
fn parse_quoted_fields(line: &str) -> Option<Vec<&str>> {
    let mut fields = Vec::new();
    let mut rest = line.trim();

    loop {
        rest = rest.strip_prefix('"')?;
        let close = rest.find('"')?;
        fields.push(&rest[..close]);

        rest = rest[close + 1..].trim_start();
        if rest.is_empty() {
            return Some(fields);
        }
        rest = rest.strip_prefix(',')?.trim_start();
    }
}
