//! Servo limit probing

use crate::config::{
    ChannelTable, ServoChannelConfig, CHANNEL_COUNT, DEFAULT_MAX_POSITION, DEFAULT_MIN_POSITION,
};
use crate::traits::ServoBus;

/// Read one servo's position limits, substituting defaults for anything
/// that cannot be read
pub fn probe_channel<B: ServoBus>(bus: &mut B, id: u8) -> ServoChannelConfig {
    if let Err(e) = bus.ping(id) {
        warn!("Servo {} ping failed: {}, using default limits", id, e);
        return ServoChannelConfig::default();
    }

    let min = match bus.read_min_limit(id) {
        Ok(v) => i32::from(v),
        Err(e) => {
            warn!("Servo {} min limit read failed: {}", id, e);
            DEFAULT_MIN_POSITION
        }
    };
    let max = match bus.read_max_limit(id) {
        Ok(v) => i32::from(v),
        Err(e) => {
            warn!("Servo {} max limit read failed: {}", id, e);
            DEFAULT_MAX_POSITION
        }
    };

    let config = ServoChannelConfig::from_limits(min, max);
    info!(
        "Servo {} limits: min={} max={} center={}",
        id,
        config.min(),
        config.max(),
        config.center()
    );
    config
}

/// Probe all channels (bus ids 1..=6)
pub fn probe_channels<B: ServoBus>(bus: &mut B) -> ChannelTable {
    let mut table = [ServoChannelConfig::default(); CHANNEL_COUNT];
    for (i, channel) in table.iter_mut().enumerate() {
        *channel = probe_channel(bus, i as u8 + 1);
    }
    table
}
