//! The message value object: what flows between models and in/out of the
//! executor's external queues.

use serde::{Deserialize, Serialize};

/// Opaque payload element. The executor core never inspects the shape of a
/// payload; it only carries it from producer to consumer(s).
pub type Payload = serde_json::Value;

/// Identifies where a message came from: a named model, or the external
/// world (labeled with the `"SRC"` sentinel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceTag {
    Model(String),
    External,
}

impl SourceTag {
    pub fn as_label(&self) -> &str {
        match self {
            SourceTag::Model(name) => name.as_str(),
            SourceTag::External => "SRC",
        }
    }
}

/// An immutable message: a source tag, the destination port name (an
/// out-port of the source, or a recognized executor input port for external
/// injection), and an ordered payload list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    source: SourceTag,
    port: String,
    payload: Vec<Payload>,
}

impl Message {
    pub fn new(source: SourceTag, port: impl Into<String>, payload: Vec<Payload>) -> Self {
        Self {
            source,
            port: port.into(),
            payload,
        }
    }

    /// Convenience constructor for a single-element payload, the common case
    /// for both model output and external injection.
    pub fn single(source: SourceTag, port: impl Into<String>, payload: Payload) -> Self {
        Self::new(source, port, vec![payload])
    }

    pub fn source(&self) -> &SourceTag {
        &self.source
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn payload(&self) -> &[Payload] {
        &self.payload
    }

    /// Rebind this message's port to a destination in-port, as it crosses a
    /// coupling. The payload and source tag travel unchanged; only the
    /// addressing the recipient sees (its own in-port name) differs from
    /// what the producer emitted on.
    pub fn rebind_port(&self, in_port: &str) -> Self {
        Self {
            source: self.source.clone(),
            port: in_port.to_string(),
            payload: self.payload.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_source_label_is_src() {
        let msg = Message::single(SourceTag::External, "cmd", Payload::from("ping"));
        assert_eq!(msg.source().as_label(), "SRC");
        assert_eq!(msg.port(), "cmd");
    }

    #[test]
    fn rebind_preserves_payload_and_source() {
        let msg = Message::single(
            SourceTag::Model("generator-01".into()),
            "out",
            Payload::from(42),
        );
        let rebound = msg.rebind_port("in");
        assert_eq!(rebound.port(), "in");
        assert_eq!(rebound.source(), msg.source());
        assert_eq!(rebound.payload(), msg.payload());
    }
}
