//! Output side: where rendered reminders are shown.

use crate::error::SinkError;

/// Shows a message to the user for `duration_ms`.
///
/// Failures propagate out of [`crate::ReminderEngine::notify`] unchanged.
pub trait MessageSink {
    fn show(&mut self, message: &str, duration_ms: u64) -> Result<(), SinkError>;
}

impl<F> MessageSink for F
where
    F: FnMut(&str, u64) -> Result<(), SinkError>,
{
    fn show(&mut self, message: &str, duration_ms: u64) -> Result<(), SinkError> {
        self(message, duration_ms)
    }
}

/// A message captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownMessage {
    pub text: String,
    pub duration_ms: u64,
}

/// Keeps every shown message in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub shown: Vec<ShownMessage>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageSink for RecordingSink {
    fn show(&mut self, message: &str, duration_ms: u64) -> Result<(), SinkError> {
        self.shown.push(ShownMessage {
            text: message.to_string(),
            duration_ms,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        let mut sink = |text: &str, ms: u64| -> Result<(), SinkError> {
            seen.push((text.to_string(), ms));
            Ok(())
        };
        sink.show("hello", 6000).unwrap();
        assert_eq!(seen, vec![("hello".to_string(), 6000)]);
    }

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.show("a", 1).unwrap();
        sink.show("b", 2).unwrap();
        assert_eq!(sink.shown[1].text, "b");
        assert_eq!(sink.shown[1].duration_ms, 2);
    }
}
