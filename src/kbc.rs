/*!
AT keyboard controller (Intel 8042) on ports 0x60/0x61/0x64/0x92.

The AT-class variant of the keyboard front: same scancode queue and
speaker gate as the PPI, plus the controller command port (0x64) and the
Fast-A20 register (0x92, bit 1 drives the system A20 gate). There is no
DIP switch block on this board.

Port 0x64 reads return the status byte (bit 0 = output buffer full);
writes execute controller commands, of which the self test (0xAA, answers
0x55) and read-input-port (0xC0, answers 0x84) are implemented. The
millisecond timer delivers queued scancodes whenever the output buffer is
empty, raising IRQ1 per byte.
*/

use std::any::Any;

use crate::error::{Error, Result};
use crate::peripheral::{DeviceId, Peripheral, PeripheralClass};
use crate::pit::Pit;
use crate::ppi::{ScancodeQueue, SpeakerCallback};
use crate::system::{System, TimerId};

const CMD_SELF_TEST: u8 = 0xAA;
const CMD_READ_INPUT: u8 = 0xC0;

pub struct Kbc {
    data_port: u8,
    has_data: bool,

    port_61: u8,
    port_92: u8,

    queue: ScancodeQueue,

    spk_enabled: bool,
    speaker_callback: Option<SpeakerCallback>,

    pit: DeviceId,
}

impl Default for Kbc {
    fn default() -> Self {
        Self::new()
    }
}

impl Kbc {
    pub fn new() -> Self {
        Self {
            data_port: 0,
            has_data: false,
            port_61: 0,
            port_92: 0,
            queue: ScancodeQueue::default(),
            spk_enabled: false,
            speaker_callback: None,
            pit: 0,
        }
    }

    /// Queue a scancode for delivery on the next millisecond tick.
    pub fn key_event(&mut self, key: u8, force: bool) -> bool {
        self.queue.push(key, force)
    }

    pub fn set_speaker_callback(&mut self, cb: SpeakerCallback) {
        self.speaker_callback = Some(cb);
    }

    fn notify_speaker(&mut self, frequency: f64) {
        if let Some(cb) = self.speaker_callback.as_mut() {
            cb(frequency);
        }
    }
}

impl Peripheral for Kbc {
    fn name(&self) -> &'static str {
        "Keyboard Controller (Intel 8042)"
    }

    fn class(&self) -> PeripheralClass {
        PeripheralClass::Ppi
    }

    fn install(&mut self, sys: &mut System, id: DeviceId) -> Result<()> {
        sys.install_io(id, 0x60, 0x61);
        sys.install_io_at(id, 0x64);
        sys.install_io_at(id, 0x92);
        sys.install_timer(id, 1_000_000);

        self.pit = sys
            .find_class(PeripheralClass::Pit)
            .ok_or(Error::User(0))?;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.data_port = 0;
        self.has_data = false;

        self.port_61 = 14;
        self.port_92 = 0;

        self.spk_enabled = false;
        self.notify_speaker(0.0);

        self.queue.clear();
        Ok(())
    }

    fn timer(&mut self, sys: &System, _timer: TimerId, _cycles: u32) -> Result<()> {
        if !self.has_data {
            if let Some(key) = self.queue.pop() {
                self.data_port = key;
                self.has_data = true;
                sys.interrupt(1);
            }
        }
        Ok(())
    }

    fn io_in(&mut self, _sys: &System, port: u16) -> u8 {
        match port {
            0x60 => {
                let data = self.data_port;
                self.has_data = false;
                log::trace!("keyboard data read: {data:#04X}");
                data
            }
            0x61 => {
                self.port_61 ^= 0x10; // RAM refresh bit
                self.port_61
            }
            0x64 => self.has_data as u8,
            0x92 => self.port_92,
            _ => 0,
        }
    }

    fn io_out(&mut self, sys: &System, port: u16, data: u8) {
        match port {
            0x60 => log::trace!("keyboard data write: {data:#04X}"),
            0x61 => {
                let spk_enable = (data & 3) == 3;
                if spk_enable != self.spk_enabled {
                    self.spk_enabled = spk_enable;
                    let frequency = if spk_enable {
                        sys.with_peripheral(self.pit, |p| {
                            p.as_any().downcast_ref::<Pit>().map_or(0.0, |pit| pit.frequency(2))
                        })
                    } else {
                        0.0
                    };
                    self.notify_speaker(frequency);
                }
                self.port_61 = data;
            }
            0x64 => match data {
                CMD_SELF_TEST => {
                    self.data_port = 0x55;
                    self.has_data = true;
                }
                CMD_READ_INPUT => {
                    self.data_port = 0x84;
                    self.has_data = true;
                }
                _ => log::trace!("unhandled KBC command {data:#04X}"),
            },
            0x92 => {
                let enable_a20 = data & 2 != 0;
                if (self.port_92 ^ data) & 2 != 0 {
                    log::info!(
                        "{} Fast-A20 line",
                        if enable_a20 { "enable" } else { "disable" }
                    );
                }
                sys.set_a20(enable_a20);
                self.port_92 = data;
            }
            _ => (),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
