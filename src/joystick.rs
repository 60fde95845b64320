/*!
Gameport joystick(s) on port 0x201.

The gameport is a purely analog affair: writing the port fires four
one-shot multivibrators whose pulse widths are set by the stick
potentiometers, and the host polls the port until the axis bits drop.
Pulse width follows the usual 24.2 + 0.011*R microsecond model, with the
axis position mapped linearly onto a 0-60k ohm resistance. The discharge
counters run a thousand times finer than the microsecond ticker, so a
strobed one-shot reads high for a few hundred emulated milliseconds at
centre position. Button bits read inverted in the high nibble.

Reference: http://www.fysnet.net/joystick.htm
*/

use std::any::Any;

use crate::error::Result;
use crate::peripheral::{DeviceId, Peripheral};
use crate::system::{System, TimerId};

pub mod buttons {
    pub const A: u8 = 0x1;
    pub const B: u8 = 0x2;
}

/// Axis/button update for one stick.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoystickEvent {
    /// Stick index, 0 or 1.
    pub id: usize,
    pub buttons: u8,
    pub xaxis: i16,
    pub yaxis: i16,
}

#[derive(Debug, Default)]
struct Stick {
    axis: [i16; 2],
    timeouts: [f64; 2],
    buttons: u8,
}

/// One-shot pulse width for an axis position, in ticker-relative units.
fn axis_timeout(axis: i16) -> f64 {
    let pos = (axis as i32 - i16::MIN as i32 + 1) as f64;
    let ohm = pos / u16::MAX as f64 * 60_000.0;
    (24.2 + 0.011 * ohm) * 1000.0
}

pub struct Joystick {
    port: u16,
    time_stamp: f64,
    ticker: f64,
    sticks: [Stick; 2],
}

impl Joystick {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            time_stamp: 0.0,
            ticker: 0.0,
            sticks: Default::default(),
        }
    }

    pub fn push_event(&mut self, ev: &JoystickEvent) -> bool {
        let Some(stick) = self.sticks.get_mut(ev.id) else {
            return false;
        };
        stick.buttons = ev.buttons;
        stick.axis = [ev.xaxis, ev.yaxis];
        true
    }
}

impl Peripheral for Joystick {
    fn name(&self) -> &'static str {
        "Gameport Joystick(s)"
    }

    fn install(&mut self, sys: &mut System, id: DeviceId) -> Result<()> {
        sys.install_io_at(id, self.port);
        sys.install_timer(id, 0);
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.time_stamp = 0.0;
        self.ticker = 0.0;
        for stick in &mut self.sticks {
            stick.timeouts = [0.0; 2];
        }
        Ok(())
    }

    fn timer(&mut self, sys: &System, _timer: TimerId, cycles: u32) -> Result<()> {
        if self.ticker < 1_000_000.0 {
            self.ticker += cycles as f64 / (sys.frequency() as f64 / 1_000_000.0);
        }
        Ok(())
    }

    fn io_in(&mut self, _sys: &System, _port: u16) -> u8 {
        let mut data = 0xF0u8;
        let elapsed = self.ticker - self.time_stamp;

        for (i, stick) in self.sticks.iter_mut().enumerate() {
            let shift = i * 2;

            stick.timeouts[0] -= elapsed;
            if stick.timeouts[0] > 0.0 {
                data |= 1 << shift;
            } else {
                stick.timeouts[0] = 0.0;
            }

            stick.timeouts[1] -= elapsed;
            if stick.timeouts[1] > 0.0 {
                data |= 2 << shift;
            } else {
                stick.timeouts[1] = 0.0;
            }

            data ^= stick.buttons << (4 + shift);
        }
        data
    }

    fn io_out(&mut self, _sys: &System, _port: u16, _data: u8) {
        // Fire the one-shots; widths derive from the axis positions.
        self.time_stamp = 0.0;
        self.ticker = 0.0;

        for stick in &mut self.sticks {
            stick.timeouts[0] = axis_timeout(stick.axis[0]);
            stick.timeouts[1] = axis_timeout(stick.axis[1]);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::bare_system;

    #[test]
    fn buttons_read_inverted() {
        let sys = bare_system();
        let mut joy = Joystick::new(0x201);

        assert_eq!(joy.io_in(&sys, 0x201) & 0xF0, 0xF0);

        joy.push_event(&JoystickEvent {
            id: 0,
            buttons: buttons::A,
            ..JoystickEvent::default()
        });
        assert_eq!(joy.io_in(&sys, 0x201) & 0xF0, 0xE0);
    }

    #[test]
    fn axis_bits_drop_after_timeout() {
        let sys = bare_system();
        let mut joy = Joystick::new(0x201);

        joy.push_event(&JoystickEvent {
            id: 0,
            xaxis: 0,
            yaxis: 0,
            ..JoystickEvent::default()
        });
        joy.io_out(&sys, 0x201, 0);

        // Immediately after the strobe both axis one-shots are high.
        assert_eq!(joy.io_in(&sys, 0x201) & 0x3, 0x3);

        // A centre-position pulse holds for ~354 emulated milliseconds;
        // one full second of ticker puts us well past it.
        joy.timer(&sys, 0, sys.frequency() as u32).unwrap();
        assert_eq!(joy.io_in(&sys, 0x201) & 0x3, 0x0);
    }

    #[test]
    fn axis_bits_stay_high_within_the_pulse() {
        let sys = bare_system();
        let mut joy = Joystick::new(0x201);

        joy.push_event(&JoystickEvent {
            id: 0,
            xaxis: 0,
            yaxis: 0,
            ..JoystickEvent::default()
        });
        joy.io_out(&sys, 0x201, 0);

        // A millisecond in is nowhere near the centre-position timeout.
        let cycles_per_ms = (sys.frequency() / 1000) as u32;
        joy.timer(&sys, 0, cycles_per_ms).unwrap();
        assert_eq!(joy.io_in(&sys, 0x201) & 0x3, 0x3);
    }

    #[test]
    fn timeout_scales_with_position() {
        assert!(axis_timeout(i16::MIN) < axis_timeout(0));
        assert!(axis_timeout(0) < axis_timeout(i16::MAX));
        // Minimum resistance leaves just the 24.2 us base pulse.
        assert!((axis_timeout(i16::MIN) - 24_210.0).abs() < 1.0);
    }
}
