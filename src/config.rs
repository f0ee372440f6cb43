/// Application-level constants
pub const APP_NAME: &str = "Dentara";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// First bookable hour of the clinic day.
pub const OPENING_HOUR: u32 = 8;

/// Hour the clinic stops booking, exclusive.
pub const CLOSING_HOUR: u32 = 17;

/// Booking slot granularity in minutes.
pub const SLOT_MINUTES: u32 = 15;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "dentara=info"
}
