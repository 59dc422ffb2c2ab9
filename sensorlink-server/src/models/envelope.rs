use serde::{Deserialize, Serialize};

/// A transport frame reduced to the parts the decoder needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEnvelope {
    pub sender_id: String,
    /// Transport-native timestamp, e.g. `14/05/30,00:13:34-32`. Empty for serial frames.
    pub envelope_timestamp: String,
    pub body: String,
}

impl RawEnvelope {
    pub const SMS_HEADER: &'static str = "+CMT:";

    pub fn new(
        sender_id: impl Into<String>,
        envelope_timestamp: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            envelope_timestamp: envelope_timestamp.into(),
            body: body.into(),
        }
    }

    /// Renders the envelope as an unsolicited SMS notification frame.
    pub fn to_frame(&self) -> String {
        format!(
            "\r\n{} \"{}\",\"\",\"{}\"\r\n{}\r\n",
            Self::SMS_HEADER,
            self.sender_id,
            self.envelope_timestamp,
            self.body
        )
    }
}
