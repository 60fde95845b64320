/*!
Programmable peripheral interface (Intel 8255) on ports 0x60-0x63: the
PC/XT keyboard port, DIP switch block, speaker gate and turbo flag.

Port 0x60 returns the latched scancode (or 0xAA while the keyboard
self-test reset sequence is in flight). Port 0x61 is the control port:
bits 0-1 gate the speaker, bit 2 is the turbo flag, bit 3 selects which
DIP switch nibble port 0x62 returns, bits 6-7 pulse the keyboard reset
line; reads toggle the RAM refresh bit (bit 4) so BIOS refresh-detect
loops make progress. A millisecond timer pulls one scancode from the
bounded queue, latches it into port 0x60 and raises IRQ1.

Speaker transitions report the new tone frequency (PIT channel 2, or 0 Hz
when gated off) through an optional callback.

Scancodes are XT set-1 bytes; bit 7 set marks the break (release) code.
*/

use std::any::Any;

use crate::error::{Error, Result};
use crate::peripheral::{DeviceId, Peripheral, PeripheralClass};
use crate::pit::Pit;
use crate::system::{System, TimerId};

/// Scancode FIFO depth.
pub const MAX_EVENTS: usize = 16;

/// Default XT DIP switches: 640K RAM, 80-column CGA, one floppy, no FPU.
pub const DEFAULT_SWITCHES: u8 = 0x2E;

/// Tone-change notification: new speaker frequency in Hz, 0.0 = silent.
pub type SpeakerCallback = Box<dyn FnMut(f64)>;

/// Bounded scancode queue shared by the PPI and KBC keyboard fronts.
#[derive(Debug, Default)]
pub struct ScancodeQueue {
    events: Vec<u8>,
}

impl ScancodeQueue {
    /// Append a scancode. A full queue drops the event unless `force`,
    /// which overwrites the newest slot. Returns false when dropped or
    /// overwritten.
    pub fn push(&mut self, key: u8, force: bool) -> bool {
        if self.events.len() < MAX_EVENTS {
            self.events.push(key);
            true
        } else {
            if force {
                self.events[MAX_EVENTS - 1] = key;
            }
            false
        }
    }

    pub fn pop(&mut self) -> Option<u8> {
        if self.events.is_empty() {
            None
        } else {
            Some(self.events.remove(0))
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

pub struct Ppi {
    data_port: u8,
    port_61: u8,
    xt_switches: u8,

    kb_reset: bool,
    turbo_enabled: bool,

    queue: ScancodeQueue,

    spk_enabled: bool,
    speaker_callback: Option<SpeakerCallback>,

    pit: DeviceId,
}

impl Default for Ppi {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppi {
    pub fn new() -> Self {
        Self {
            data_port: 0,
            port_61: 0,
            xt_switches: DEFAULT_SWITCHES,
            kb_reset: false,
            turbo_enabled: false,
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

    pub fn turbo_enabled(&self) -> bool {
        self.turbo_enabled
    }

    pub fn set_speaker_callback(&mut self, cb: SpeakerCallback) {
        self.speaker_callback = Some(cb);
    }

    pub fn xt_switches(&self) -> u8 {
        self.xt_switches
    }

    pub fn set_xt_switches(&mut self, switches: u8) {
        self.xt_switches = switches;
    }

    fn notify_speaker(&mut self, frequency: f64) {
        if let Some(cb) = self.speaker_callback.as_mut() {
            cb(frequency);
        }
    }
}

impl Peripheral for Ppi {
    fn name(&self) -> &'static str {
        "PPI (Intel 8255)"
    }

    fn class(&self) -> PeripheralClass {
        PeripheralClass::Ppi
    }

    fn install(&mut self, sys: &mut System, id: DeviceId) -> Result<()> {
        sys.install_io(id, 0x60, 0x63);
        sys.install_timer(id, 1_000_000); // one scancode per millisecond

        self.pit = sys
            .find_class(PeripheralClass::Pit)
            .ok_or(Error::User(0))?;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.data_port = 0;
        self.port_61 = 14;
        self.turbo_enabled = false;

        self.spk_enabled = false;
        self.notify_speaker(0.0);

        self.kb_reset = false;
        self.queue.clear();
        Ok(())
    }

    fn config(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        // DIP switch block: values are active-low hex fields.
        if section != "switch1" {
            return Ok(());
        }
        let v = !u8::from_str_radix(value, 16).map_err(|_| Error::User(1))?;
        match key {
            "ram" => self.xt_switches = (self.xt_switches & 0xF3) | ((v & 3) << 2),
            "video" => self.xt_switches = (self.xt_switches & 0xCF) | ((v & 3) << 4),
            "floppy" => self.xt_switches = (self.xt_switches & 0x3F) | ((v & 3) << 6),
            _ => return Err(Error::User(2)),
        }
        Ok(())
    }

    fn timer(&mut self, sys: &System, _timer: TimerId, _cycles: u32) -> Result<()> {
        if !self.kb_reset {
            if let Some(key) = self.queue.pop() {
                self.data_port = key;
                sys.interrupt(1);
            }
        }
        Ok(())
    }

    fn io_in(&mut self, _sys: &System, port: u16) -> u8 {
        match port {
            0x60 => {
                let data = self.data_port;
                if self.kb_reset {
                    self.kb_reset = false;
                    self.data_port = 0;
                }
                data
            }
            0x61 => {
                self.port_61 ^= 0x10; // RAM refresh bit
                self.port_61
            }
            0x62 => {
                if self.port_61 & 8 != 0 {
                    self.xt_switches >> 4
                } else {
                    self.xt_switches & 0xF
                }
            }
            _ => 0,
        }
    }

    fn io_out(&mut self, sys: &System, port: u16, data: u8) {
        if port != 0x61 {
            return;
        }

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

        let turbo = data & 4 != 0;
        if turbo != self.turbo_enabled {
            self.turbo_enabled = turbo;
            log::info!("turbo mode {}", if turbo { "on" } else { "off" });
        }

        let do_reset = self.port_61 & 0xC0 == 0 && data & 0xC0 != 0;
        self.kb_reset = self.kb_reset || do_reset;

        if self.kb_reset && self.data_port != 0xAA {
            self.queue.clear();
            self.data_port = 0xAA;
            sys.interrupt(1);
            log::info!("keyboard reset");
        }

        self.port_61 = data;
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
    fn scancode_queue_is_fifo() {
        let mut q = ScancodeQueue::default();
        for i in 0..5u8 {
            assert!(q.push(0x10 + i, false));
        }
        for i in 0..5u8 {
            assert_eq!(q.pop(), Some(0x10 + i));
        }
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn seventeenth_push_drops_unless_forced() {
        let mut q = ScancodeQueue::default();
        for i in 0..16u8 {
            assert!(q.push(i, false));
        }
        assert!(!q.push(0xE0, false));
        // Dropped: slot 15 still holds the old value.
        for i in 0..16u8 {
            assert_eq!(q.pop(), Some(i));
        }

        for i in 0..16u8 {
            q.push(i, false);
        }
        assert!(!q.push(0xE0, true));
        for i in 0..15u8 {
            assert_eq!(q.pop(), Some(i));
        }
        // Forced: the newest slot was overwritten.
        assert_eq!(q.pop(), Some(0xE0));
    }

    #[test]
    fn timer_latches_scancode_into_data_port() {
        let sys = bare_system();
        let mut ppi = Ppi::new();
        ppi.reset().unwrap();

        ppi.key_event(0x1E, false); // 'A' make
        ppi.timer(&sys, 0, 0).unwrap();
        assert_eq!(ppi.io_in(&sys, 0x60), 0x1E);
    }

    #[test]
    fn refresh_bit_toggles_on_every_read() {
        let sys = bare_system();
        let mut ppi = Ppi::new();
        ppi.reset().unwrap();

        let a = ppi.io_in(&sys, 0x61) & 0x10;
        let b = ppi.io_in(&sys, 0x61) & 0x10;
        assert_ne!(a, b);
    }

    #[test]
    fn switch_nibble_selected_by_bit_3() {
        let sys = bare_system();
        let mut ppi = Ppi::new();
        ppi.reset().unwrap();
        ppi.set_xt_switches(0xA5);

        ppi.io_out(&sys, 0x61, 0x00);
        assert_eq!(ppi.io_in(&sys, 0x62), 0x5);
        ppi.io_out(&sys, 0x61, 0x08);
        assert_eq!(ppi.io_in(&sys, 0x62), 0xA);
    }

    #[test]
    fn keyboard_reset_latches_self_test_byte() {
        let sys = bare_system();
        let mut ppi = Ppi::new();
        ppi.reset().unwrap();
        ppi.key_event(0x1E, false);

        // Rising edge on bits 6-7 requests the reset.
        ppi.io_out(&sys, 0x61, 0xC0);
        assert!(ppi.queue.is_empty());
        assert_eq!(ppi.io_in(&sys, 0x60), 0xAA);
        // The latch clears after the guest consumes it.
        assert_eq!(ppi.io_in(&sys, 0x60), 0x00);
    }

    #[test]
    fn speaker_gate_reports_tone_changes() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let sys = bare_system();
        let mut ppi = Ppi::new();
        ppi.reset().unwrap();

        let tones: Rc<RefCell<Vec<f64>>> = Rc::default();
        let sink = tones.clone();
        ppi.set_speaker_callback(Box::new(move |f| sink.borrow_mut().push(f)));

        ppi.io_out(&sys, 0x61, 0x03); // gate on (no PIT attached: 0 Hz)
        ppi.io_out(&sys, 0x61, 0x00); // gate off
        assert_eq!(tones.borrow().as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn dip_switch_config_is_active_low() {
        let mut ppi = Ppi::new();
        ppi.config("switch1", "video", "2").unwrap();
        // ~0x02 & 3 = 1 -> bits 5..4 = 01.
        assert_eq!(ppi.xt_switches() & 0x30, 0x10);
        assert!(ppi.config("switch1", "bogus", "0").is_err());
    }
}
