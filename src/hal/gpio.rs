//! Board pin map.
//!
//! Reference wiring for an ESP32 DevKit: DAC channel 1 on GPIO25, push-button
//! to ground on GPIO0 (the BOOT button), activity LED on GPIO2.

/// Control button configuration.
#[derive(Debug, Clone, Copy)]
pub struct ButtonPin {
    pub pin: i32,
    /// Enable the internal pull-up
    pub pull_up: bool,
    /// Interrupt on the falling edge (button pulls to ground)
    pub falling_edge: bool,
}

/// Activity indicator output.
#[derive(Debug, Clone, Copy)]
pub struct LedPin {
    pub pin: i32,
    pub active_high: bool,
}

/// Full pin map.
#[derive(Debug, Clone, Copy)]
pub struct BoardPins {
    /// DAC output GPIO (ESP32: 25 = channel 1, 26 = channel 2)
    pub dac_pin: i32,
    pub button: ButtonPin,
    pub led: LedPin,
    pub terminal_tx: i32,
    pub terminal_rx: i32,
    pub log_tx: i32,
}

/// Pins used by the firmware.
pub const PINS: BoardPins = BoardPins {
    dac_pin: 25,
    button: ButtonPin {
        pin: 0,
        pull_up: true,
        falling_edge: true,
    },
    led: LedPin {
        pin: 2,
        active_high: true,
    },
    terminal_tx: 1,
    terminal_rx: 3,
    log_tx: 4,
};

impl LedPin {
    /// Electrical level for a logical assert/deassert.
    #[inline]
    pub fn level(&self, asserted: bool) -> bool {
        asserted == self.active_high
    }
}
