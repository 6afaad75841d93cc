//! The default message catcher: a sink that absorbs messages routed to
//! unknown destinations. Always active from time 0 onward.

use crate::message::Message;
use crate::model::BehaviorModel;
use crate::time::{Time, INFINITE};

pub const CATCHER_NAME: &str = "dc";
pub const CATCHER_PORT: &str = "uncaught";

/// Records every message it ever caught, for diagnostics and for the
/// catcher-absorption law (L2) in tests.
pub struct DefaultMessageCatcher {
    input_ports: Vec<String>,
    output_ports: Vec<String>,
    caught: Vec<Message>,
}

impl DefaultMessageCatcher {
    pub fn new() -> Self {
        Self {
            input_ports: vec![CATCHER_PORT.to_string()],
            output_ports: Vec::new(),
            caught: Vec::new(),
        }
    }

    pub fn caught(&self) -> &[Message] {
        &self.caught
    }

    pub fn caught_count(&self) -> usize {
        self.caught.len()
    }
}

impl Default for DefaultMessageCatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviorModel for DefaultMessageCatcher {
    fn name(&self) -> &str {
        CATCHER_NAME
    }

    fn create_time(&self) -> Time {
        0.0
    }

    fn destruct_time(&self) -> Time {
        INFINITE
    }

    fn input_ports(&self) -> &[String] {
        &self.input_ports
    }

    fn output_ports(&self) -> &[String] {
        &self.output_ports
    }

    fn time_advance(&self) -> Time {
        INFINITE
    }

    fn output(&mut self) -> Option<Message> {
        None
    }

    fn int_trans(&mut self) {}

    fn ext_trans(&mut self, _port: &str, message: &Message) {
        self.caught.push(message.clone());
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
