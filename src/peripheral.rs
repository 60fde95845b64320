/*!
Uniform peripheral contract (the device side of the substrate).

Every device the system hosts implements `Peripheral`. The original
hardware model is a table of optional function pointers; here each slot is
a defaulted trait method, so a device declares only the callbacks it
actually has:

- `install` runs exactly once, during `System::initialize`, and is where a
  device claims port ranges, memory ranges, timers and monitor entries.
- `reset` returns the device to power-on state; `restore` is the
  snapshot-restore path and defaults to `CantRestore`.
- `io_in`/`io_out` handle port accesses, `mem_read`/`mem_write` handle
  memory-mapped accesses. Devices without the callback inherit the
  documented defaults (port reads 0, memory reads 0xFF, writes ignored).
- `dma_read`/`dma_write` are implemented by the DMA controller class and
  called by requester peripherals one byte at a time.
- `pic_next`/`pic_irq` are implemented by the interrupt-controller class.
- `timer` receives the elapsed CPU cycles whenever one of the device's
  installed timers comes due.

Callbacks are re-entrant with respect to *other* peripherals only: a
callback may read memory, write ports or raise interrupts (all of which
dispatch into other devices), but must not call back into itself through
the system. Teardown needs no callback; devices release resources in
`Drop`.
*/

use std::any::Any;

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::system::{System, TimerId};
use crate::video::VideoAdapter;

/// Index into the system's device table. Id 0 is the null sentinel that
/// backs every unmapped address and port.
pub type DeviceId = u8;

/// Broad device category used for substrate-level routing (interrupt
/// delivery goes to the `Pic` class, DMA requests to the `Dma` class) and
/// for cross-device discovery at install time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralClass {
    Generic,
    Debugger,
    Pic,
    Dma,
    Ppi,
    Pit,
    Uart,
    Disk,
    Video,
}

bitflags! {
    /// Size/format hints for monitor entries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MonitorFlags: u32 {
        const SIZE_BYTE  = 0x01;
        const SIZE_WORD  = 0x02;
        const SIZE_DWORD = 0x04;

        const FORMAT_DECIMAL = 0x10;
        const FORMAT_HEX     = 0x20;
        const FORMAT_BINARY  = 0x40;
    }
}

/// Named inspector surface registered by a peripheral. Bookkeeping only:
/// a debugger enumerates entries and queries the owning device for the
/// value.
#[derive(Debug, Clone)]
pub struct MonitorEntry {
    pub device: DeviceId,
    pub name: String,
    pub flags: MonitorFlags,
}

pub trait Peripheral {
    /// Human-readable device name.
    fn name(&self) -> &'static str;

    fn class(&self) -> PeripheralClass {
        PeripheralClass::Generic
    }

    /// Claim resources on the system. Called exactly once, before the
    /// first `reset`. `id` is the device's own table slot.
    fn install(&mut self, _sys: &mut System, _id: DeviceId) -> Result<()> {
        Ok(())
    }

    /// Return to power-on state.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Restore from a snapshot blob.
    fn restore(&mut self, _snapshot: &[u8]) -> Result<()> {
        Err(Error::CantRestore)
    }

    /// Apply one configuration triple.
    fn config(&mut self, _section: &str, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    /// One of the device's timers came due. `cycles` is the CPU cycle
    /// count the current step advanced by.
    fn timer(&mut self, _sys: &System, _timer: TimerId, _cycles: u32) -> Result<()> {
        Ok(())
    }

    /// Port read. Devices that claim ports but leave this defaulted
    /// read as 0.
    fn io_in(&mut self, _sys: &System, _port: u16) -> u8 {
        0
    }

    /// Port write; defaulted writes are discarded.
    fn io_out(&mut self, _sys: &System, _port: u16, _data: u8) {}

    /// Memory-mapped read of a physical (A20-masked) address.
    fn mem_read(&mut self, _sys: &System, _addr: u32) -> u8 {
        0xFF
    }

    /// Memory-mapped write; defaulted writes are discarded.
    fn mem_write(&mut self, _sys: &System, _addr: u32, _data: u8) {}

    /// DMA-controller class: fetch the next byte of `channel`'s transfer
    /// from system memory.
    fn dma_read(&mut self, _sys: &System, _channel: u8) -> u8 {
        0xFF
    }

    /// DMA-controller class: store the next byte of `channel`'s transfer
    /// to system memory.
    fn dma_write(&mut self, _sys: &System, _channel: u8, _data: u8) {}

    /// Interrupt-controller class: acknowledge and return the next
    /// pending vector, if any.
    fn pic_next(&mut self) -> Option<u8> {
        None
    }

    /// Interrupt-controller class: raise IRQ line `line`.
    fn pic_irq(&mut self, _line: u8) {}

    /// Concrete-type escape hatch for cross-device coupling.
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Video adapters expose the snapshot/render surface here.
    fn as_video(&mut self) -> Option<&mut dyn VideoAdapter> {
        None
    }
}

/// Sentinel occupying device slot 0: reads as open bus (0xFF), swallows
/// writes. Every unmapped paragraph and port resolves to it.
#[derive(Debug, Default)]
pub struct NullDevice;

impl Peripheral for NullDevice {
    fn name(&self) -> &'static str {
        "none"
    }

    fn io_in(&mut self, _sys: &System, _port: u16) -> u8 {
        0xFF
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

    struct Bare;

    impl Peripheral for Bare {
        fn name(&self) -> &'static str {
            "bare"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn defaults_match_documented_open_bus_behaviour() {
        let mut sys = crate::test_utils::bare_system();
        let mut d = Bare;
        assert_eq!(d.class(), PeripheralClass::Generic);
        assert_eq!(d.io_in(&sys, 0x1234), 0);
        assert_eq!(d.mem_read(&sys, 0x1234), 0xFF);
        assert_eq!(d.pic_next(), None);
        d.io_out(&mut sys, 0, 0xAA);
        d.mem_write(&mut sys, 0, 0xAA);
    }

    #[test]
    fn restore_defaults_to_cant_restore() {
        let mut d = Bare;
        assert!(matches!(d.restore(&[]), Err(Error::CantRestore)));
    }

    #[test]
    fn null_device_reads_open_bus() {
        let sys = crate::test_utils::bare_system();
        let mut n = NullDevice;
        assert_eq!(n.io_in(&sys, 0), 0xFF);
        assert_eq!(n.mem_read(&sys, 0), 0xFF);
    }
}
