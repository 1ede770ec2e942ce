//! Mock radio for deterministic testing of the client.
//!
//! [`MockRadio`] implements the [`Transport`] trait by recording every
//! written packet. The client takes ownership of its transports, so each
//! mock hands out a [`MockRadioHandle`] sharing the same log; tests keep the
//! handle and inspect what was transmitted after the client is done.
//!
//! # Example
//!
//! ```
//! use milight_test_harness::MockRadio;
//!
//! let radio = MockRadio::new();
//! let handle = radio.handle();
//! handle.push_inbound(&[0xB8, 0x12, 0x34, 0x00, 0x01, 0x03, 0x00]);
//! assert_eq!(handle.sent_count(), 0);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use milight_core::error::{Error, Result};
use milight_core::transport::Transport;

/// State shared between a [`MockRadio`] and its handles.
#[derive(Debug)]
struct RadioLog {
    /// Every packet written, in order, one entry per `write()` call.
    sent: Vec<Vec<u8>>,
    /// Number of successful `configure()` calls.
    configure_count: usize,
    /// Packets waiting to be returned by `read()`.
    inbound: VecDeque<Vec<u8>>,
    /// Whether the radio responds at all.
    connected: bool,
    /// Fail writes once this many packets have been recorded.
    fail_after: Option<usize>,
}

fn lock(log: &Mutex<RadioLog>) -> MutexGuard<'_, RadioLog> {
    // A panicking test thread must not hide the log from the others.
    log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A recording [`Transport`] for testing without hardware.
#[derive(Debug)]
pub struct MockRadio {
    log: Arc<Mutex<RadioLog>>,
}

impl MockRadio {
    /// Create a new mock radio in the connected state.
    pub fn new() -> Self {
        MockRadio {
            log: Arc::new(Mutex::new(RadioLog {
                sent: Vec::new(),
                configure_count: 0,
                inbound: VecDeque::new(),
                connected: true,
                fail_after: None,
            })),
        }
    }

    /// Return a handle that observes and controls this radio.
    pub fn handle(&self) -> MockRadioHandle {
        MockRadioHandle {
            log: Arc::clone(&self.log),
        }
    }

    /// Create a radio and its handle in one step.
    pub fn with_handle() -> (Self, MockRadioHandle) {
        let radio = Self::new();
        let handle = radio.handle();
        (radio, handle)
    }
}

impl Default for MockRadio {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared view of a [`MockRadio`] that outlives the client owning the radio.
#[derive(Debug, Clone)]
pub struct MockRadioHandle {
    log: Arc<Mutex<RadioLog>>,
}

impl MockRadioHandle {
    /// All packets written so far, one entry per `write()` call.
    pub fn sent_packets(&self) -> Vec<Vec<u8>> {
        lock(&self.log).sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        lock(&self.log).sent.len()
    }

    /// Number of times the radio has been (re)configured.
    pub fn configure_count(&self) -> usize {
        lock(&self.log).configure_count
    }

    /// Forget every packet written so far.
    pub fn clear_sent(&self) {
        lock(&self.log).sent.clear();
    }

    /// Queue a packet for the next `read()`.
    pub fn push_inbound(&self, packet: &[u8]) {
        lock(&self.log).inbound.push_back(packet.to_vec());
    }

    /// Set the connected state.
    ///
    /// When `false`, `configure()` and `write()` return
    /// [`Error::TransportUnavailable`] and nothing is available to read.
    pub fn set_connected(&self, connected: bool) {
        lock(&self.log).connected = connected;
    }

    /// Make writes fail once `count` packets have been recorded.
    pub fn fail_after(&self, count: usize) {
        lock(&self.log).fail_after = Some(count);
    }
}

#[async_trait]
impl Transport for MockRadio {
    async fn configure(&mut self) -> Result<()> {
        let mut log = lock(&self.log);
        if !log.connected {
            return Err(Error::TransportUnavailable);
        }
        log.configure_count += 1;
        Ok(())
    }

    async fn write(&mut self, packet: &[u8]) -> Result<()> {
        let mut log = lock(&self.log);
        if !log.connected {
            return Err(Error::TransportUnavailable);
        }
        if log.fail_after.is_some_and(|limit| log.sent.len() >= limit) {
            return Err(Error::Transport("injected write failure".into()));
        }
        log.sent.push(packet.to_vec());
        Ok(())
    }

    async fn available(&mut self) -> bool {
        let log = lock(&self.log);
        log.connected && !log.inbound.is_empty()
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut log = lock(&self.log);
        if !log.connected {
            return Ok(0);
        }
        let Some(packet) = log.inbound.pop_front() else {
            return Ok(0);
        };
        let n = packet.len().min(buf.len());
        buf[..n].copy_from_slice(&packet[..n]);
        Ok(n)
    }
}
