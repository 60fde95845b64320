/*!
DMA controller (Intel 8237) on ports 0x00-0x0F, 0x80-0x8F and 0xC0-0xDE.

Eight channels with 16-bit address/count registers behind a shared
byte-pair flip-flop, page registers supplying physical address bits
16..23, and mode/mask/request state per channel. The controller drives no
transfers on its own: requester peripherals pull or push one byte at a
time through `dma_read`/`dma_write`, which walk system memory (so page
registers, the address map and the A20 gate all apply) and post-adjust
the channel per its programmed direction, reloading on terminal count
when auto-init is set.

The page-register ports map to channels nonlinearly (a quirk of the PC
board wiring): 0x81->2, 0x82->3, 0x83->1, 0x87->0, 0x89->6, 0x8A->7,
0x8B->5, 0x8F->4; the remaining ports in that range are plain latches.
The secondary controller's ports fold onto the shared register logic.
*/

use std::any::Any;

use crate::error::Result;
use crate::peripheral::{DeviceId, Peripheral, PeripheralClass};
use crate::system::System;

#[derive(Debug, Default, Clone)]
struct Channel {
    masked: bool,
    auto_init: bool,
    request: bool,

    operation: u8,
    mode: u8,

    count: u16,
    reload_count: u16,
    addr: u16,
    reload_addr: u16,
    addr_inc: u16,
    page: u32,
}

pub struct Dma {
    flip: bool,
    mem_to_mem: bool,
    extra_regs: [u8; 16],
    channels: [Channel; 8],
}

impl Default for Dma {
    fn default() -> Self {
        Self::new()
    }
}

/// Page-register port (low nibble) to channel, where one exists.
fn page_channel(port: u16) -> Option<usize> {
    match port & 0xF {
        0x1 => Some(2),
        0x2 => Some(3),
        0x3 => Some(1),
        0x7 => Some(0),
        0x9 => Some(6),
        0xA => Some(7),
        0xB => Some(5),
        0xF => Some(4),
        _ => None,
    }
}

impl Dma {
    pub fn new() -> Self {
        let mut dma = Self {
            flip: false,
            mem_to_mem: false,
            extra_regs: [0; 16],
            channels: Default::default(),
        };
        dma.master_reset();
        dma
    }

    fn master_reset(&mut self) {
        self.flip = false;
        self.mem_to_mem = false;
        self.extra_regs = [0; 16];
        for ch in &mut self.channels {
            *ch = Channel {
                masked: true,
                ..Channel::default()
            };
        }
    }

    /// Fold a port into the shared register index. Primary and secondary
    /// controllers share the register logic; page ports return `None`
    /// here and are handled separately.
    fn fold_port(port: u16) -> u16 {
        if port >= 0xC0 { (port & 0xF) >> 1 } else { port & 0xF }
    }

    fn update_count(&mut self, ch: usize) {
        let c = &mut self.channels[ch];
        c.addr = c.addr.wrapping_add(c.addr_inc);
        c.count = c.count.wrapping_sub(1);

        // Terminal count: the counter holds transfers-minus-one and just
        // wrapped past zero.
        if c.count == 0xFFFF && c.auto_init {
            c.count = c.reload_count;
            c.addr = c.reload_addr;
        }
    }

    /// Current physical transfer address of `channel` (page | addr).
    pub fn address(&self, channel: u8) -> u32 {
        let c = &self.channels[(channel & 7) as usize];
        c.page + c.addr as u32
    }
}

impl Peripheral for Dma {
    fn name(&self) -> &'static str {
        "DMA (Intel 8237)"
    }

    fn class(&self) -> PeripheralClass {
        PeripheralClass::Dma
    }

    fn install(&mut self, sys: &mut System, id: DeviceId) -> Result<()> {
        sys.install_io(id, 0x00, 0x0F);
        sys.install_io(id, 0x80, 0x8F);
        sys.install_io(id, 0xC0, 0xDE);
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.master_reset();
        Ok(())
    }

    fn io_in(&mut self, _sys: &System, port: u16) -> u8 {
        if (0x80..0xC0).contains(&port) {
            return match page_channel(port) {
                Some(ch) => (self.channels[ch].page >> 16) as u8,
                None => self.extra_regs[(port & 0xF) as usize],
            };
        }

        let reg = Self::fold_port(port);
        if reg < 8 {
            let ch = ((reg >> 1) & 7) as usize;
            let c = &self.channels[ch];
            let value = if reg & 1 != 0 { c.count } else { c.addr };
            let byte = (value >> if self.flip { 8 } else { 0 }) as u8;
            self.flip = !self.flip;
            byte
        } else if reg == 8 {
            // Status register.
            0xF
        } else {
            0xFF
        }
    }

    fn io_out(&mut self, _sys: &System, port: u16, data: u8) {
        if (0x80..0xC0).contains(&port) {
            match page_channel(port) {
                Some(ch) => self.channels[ch].page = (data as u32) << 16,
                None => self.extra_regs[(port & 0xF) as usize] = data,
            }
            return;
        }

        let reg = Self::fold_port(port);
        match reg {
            0x0..=0x7 => {
                let ch = ((reg >> 1) & 7) as usize;
                let c = &mut self.channels[ch];
                let target = if reg & 1 != 0 { &mut c.count } else { &mut c.addr };
                if self.flip {
                    *target = (*target & 0x00FF) | ((data as u16) << 8);
                } else {
                    *target = (*target & 0xFF00) | data as u16;
                }
                if reg & 1 != 0 {
                    c.reload_count = c.count;
                } else {
                    c.reload_addr = c.addr;
                }
                self.flip = !self.flip;
            }
            0x8 => self.mem_to_mem = data & 1 != 0,
            0x9 => self.channels[(data & 7) as usize].request = (data >> 2) & 1 != 0,
            0xA => self.channels[(data & 7) as usize].masked = (data >> 2) & 1 != 0,
            0xB => {
                let c = &mut self.channels[(data & 7) as usize];
                c.operation = (data >> 2) & 3;
                c.mode = (data >> 6) & 3;
                c.auto_init = (data >> 4) & 1 != 0;
                c.addr_inc = if data & 0x20 != 0 { 0xFFFF } else { 1 };
            }
            0xC => self.flip = false,
            0xD => self.master_reset(),
            0xF => {
                for (i, ch) in self.channels.iter_mut().enumerate() {
                    ch.masked = (data >> i) & 1 != 0;
                }
            }
            _ => (),
        }
    }

    fn dma_read(&mut self, sys: &System, channel: u8) -> u8 {
        let ch = (channel & 7) as usize;
        let value = sys.read_byte(self.address(channel));
        self.update_count(ch);
        value
    }

    fn dma_write(&mut self, sys: &System, channel: u8, data: u8) {
        let ch = (channel & 7) as usize;
        sys.write_byte(self.address(channel), data);
        self.update_count(ch);
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

    /// Program a channel's address and count through the byte-pair ports.
    fn program(dma: &mut Dma, sys: &System, channel: u16, addr: u16, count: u16) {
        dma.io_out(sys, 0x0C, 0); // clear flip-flop
        dma.io_out(sys, channel * 2, addr as u8);
        dma.io_out(sys, channel * 2, (addr >> 8) as u8);
        dma.io_out(sys, channel * 2 + 1, count as u8);
        dma.io_out(sys, channel * 2 + 1, (count >> 8) as u8);
    }

    #[test]
    fn flip_flop_pairs_address_bytes() {
        let sys = bare_system();
        let mut dma = Dma::new();
        program(&mut dma, &sys, 2, 0x1234, 0x0010);

        dma.io_out(&sys, 0x0C, 0);
        assert_eq!(dma.io_in(&sys, 0x04), 0x34);
        assert_eq!(dma.io_in(&sys, 0x04), 0x12);
        assert_eq!(dma.io_in(&sys, 0x05), 0x10);
        assert_eq!(dma.io_in(&sys, 0x05), 0x00);
    }

    #[test]
    fn page_register_port_mapping() {
        let sys = bare_system();
        let mut dma = Dma::new();
        dma.io_out(&sys, 0x81, 0x0A); // channel 2
        dma.io_out(&sys, 0x83, 0x0B); // channel 1
        dma.io_out(&sys, 0x87, 0x0C); // channel 0
        assert_eq!(dma.channels[2].page, 0x0A_0000);
        assert_eq!(dma.channels[1].page, 0x0B_0000);
        assert_eq!(dma.channels[0].page, 0x0C_0000);
        assert_eq!(dma.io_in(&sys, 0x81), 0x0A);
    }

    #[test]
    fn unmapped_page_ports_are_plain_latches() {
        let sys = bare_system();
        let mut dma = Dma::new();
        dma.io_out(&sys, 0x80, 0x42); // POST range latch, no channel
        assert_eq!(dma.io_in(&sys, 0x80), 0x42);
        assert_eq!(dma.channels.iter().filter(|c| c.page != 0).count(), 0);
    }

    #[test]
    fn master_reset_masks_all_channels() {
        let sys = bare_system();
        let mut dma = Dma::new();
        dma.io_out(&sys, 0x0A, 0x02); // unmask channel 2
        assert!(!dma.channels[2].masked);
        dma.io_out(&sys, 0x0D, 0);
        assert!(dma.channels.iter().all(|c| c.masked));
    }

    #[test]
    fn mode_register_decodes_direction() {
        let sys = bare_system();
        let mut dma = Dma::new();
        dma.io_out(&sys, 0x0B, 0b0101_1010); // ch2: single, auto-init, write, inc
        let c = &dma.channels[2];
        assert_eq!(c.mode, 1);
        assert!(c.auto_init);
        assert_eq!(c.operation, 2);
        assert_eq!(c.addr_inc, 1);

        dma.io_out(&sys, 0x0B, 0b0010_0110); // ch6: decrement
        assert_eq!(dma.channels[6].addr_inc, 0xFFFF);
    }

    #[test]
    fn write_mask_register_sets_all_at_once() {
        let sys = bare_system();
        let mut dma = Dma::new();
        dma.io_out(&sys, 0x0F, 0b0101_0101);
        for (i, c) in dma.channels.iter().enumerate() {
            assert_eq!(c.masked, i % 2 == 0);
        }
    }

    #[test]
    fn secondary_ports_fold_onto_shared_registers() {
        let sys = bare_system();
        let mut dma = Dma::new();
        dma.io_out(&sys, 0x0C, 0);
        dma.io_out(&sys, 0xC0, 0x78); // folds to register 0 (channel 0 addr)
        dma.io_out(&sys, 0xC0, 0x56);
        assert_eq!(dma.channels[0].addr, 0x5678);
    }
}
