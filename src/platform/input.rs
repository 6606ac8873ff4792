//! Activation input
//!
//! Taps arrive asynchronously (UI thread, terminal, tests) and are drained
//! once at the start of each frame.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};

/// Produces press-down activations; releases are never reported
pub trait InputSource {
    /// Number of activations since the last poll
    fn poll_activations(&mut self) -> u32;
}

/// Sending half of a channel input. Cheap to clone.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<()>,
}

impl InputSender {
    /// Report one press. Returns false once the receiving loop is gone.
    pub fn activate(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

/// Receiving half, owned by the game loop
#[derive(Debug)]
pub struct ChannelInput {
    rx: Receiver<()>,
}

/// Create a connected sender/receiver pair
pub fn channel() -> (InputSender, ChannelInput) {
    let (tx, rx) = mpsc::channel();
    (InputSender { tx }, ChannelInput { rx })
}

impl InputSource for ChannelInput {
    fn poll_activations(&mut self) -> u32 {
        self.rx.try_iter().count() as u32
    }
}

/// Pre-recorded activations per frame, then silence
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<u32>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = u32>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll_activations(&mut self) -> u32 {
        self.frames.pop_front().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_drains_all_pending() {
        let (tx, mut input) = channel();
        let other = tx.clone();
        assert!(tx.activate());
        assert!(other.activate());
        assert!(tx.activate());
        assert_eq!(input.poll_activations(), 3);
        assert_eq!(input.poll_activations(), 0);
    }

    #[test]
    fn test_sender_detects_closed_loop() {
        let (tx, input) = channel();
        drop(input);
        assert!(!tx.activate());
    }

    #[test]
    fn test_scripted_input_runs_out() {
        let mut input = ScriptedInput::new([1, 0, 2]);
        assert_eq!(input.poll_activations(), 1);
        assert_eq!(input.poll_activations(), 0);
        assert_eq!(input.poll_activations(), 2);
        assert_eq!(input.poll_activations(), 0);
    }
}
