//! # TM Server
//!
//! Publishes the status lines of each cycle as a single JSON object through the logger on the
//! telemetry target, so they end up in the session telemetry file.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::tm::TmSink;
use log::{info, warn};
use serde_json::{Map, Value};
use util::logger::TM_TARGET;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Telemetry server
#[derive(Debug, Default)]
pub struct TmServer {
    /// Status lines added since the last update
    current: Map<String, Value>,

    /// The most recently published packet
    last_packet: Option<String>,

    num_packets: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TmServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently published packet.
    pub fn last_packet(&self) -> Option<&str> {
        self.last_packet.as_deref()
    }

    /// Number of packets published so far.
    pub fn num_packets(&self) -> u64 {
        self.num_packets
    }
}

impl TmSink for TmServer {
    fn add_data(&mut self, key: &str, value: String) {
        self.current.insert(key.into(), Value::String(value));
    }

    fn update(&mut self) {
        let packet = std::mem::take(&mut self.current);

        match serde_json::to_string(&packet) {
            Ok(s) => {
                info!(target: TM_TARGET, "{}", s);
                self.last_packet = Some(s);
                self.num_packets += 1;
            }
            Err(e) => warn!("Could not serialize the telemetry: {}", e),
        }
    }
}
