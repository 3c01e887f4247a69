//! 8253/8254 Programmable Interval Timer, channel 0.

use ::x86_64::instructions::port::Port;
use kestrel_common::{ConfigError, TickRate};

/// PIT input clock in Hz.
const PIT_INPUT_HZ: u32 = 1_193_182;

/// Channel 0, lobyte/hibyte access, mode 2 (rate generator).
const CMD_CH0_RATE_GENERATOR: u8 = 0x34;

const COMMAND_PORT: u16 = 0x43;
const CHANNEL0_PORT: u16 = 0x40;

/// Programs channel 0 to interrupt `rate.per_second` times a second.
pub fn init(rate: TickRate) -> Result<(), ConfigError> {
    let divisor = reload_value(rate.per_second)?;
    let mut command = Port::<u8>::new(COMMAND_PORT);
    let mut channel0 = Port::<u8>::new(CHANNEL0_PORT);
    // SAFETY: the PIT ports are owned by the kernel; IRQ0 is masked or not
    // yet routed while the reload value is written.
    unsafe {
        command.write(CMD_CH0_RATE_GENERATOR);
        channel0.write(divisor as u8);
        channel0.write((divisor >> 8) as u8);
    }
    Ok(())
}

/// Nearest reload value for `hz`. A reload of 0 would mean 65536, which the
/// callers never want, so anything outside 1..=65535 is rejected.
fn reload_value(hz: u32) -> Result<u16, ConfigError> {
    if hz == 0 {
        return Err(ConfigError::DivisorOutOfRange);
    }
    match (PIT_INPUT_HZ + hz / 2) / hz {
        0 => Err(ConfigError::DivisorOutOfRange),
        d if d > u16::MAX as u32 => Err(ConfigError::DivisorOutOfRange),
        d => Ok(d as u16),
    }
}
