//! # Telemetry sink interface

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// An observer which receives status lines every cycle.
///
/// The control core must behave identically whatever the sink does with the data, so this trait
/// has no way to report errors back.
pub trait TmSink {
    /// Add a key/value status line to the current cycle.
    fn add_data(&mut self, key: &str, value: String);

    /// Publish all status lines added since the last update.
    fn update(&mut self);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A telemetry sink which discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTm;

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TmSink for NullTm {
    fn add_data(&mut self, _key: &str, _value: String) {}

    fn update(&mut self) {}
}
