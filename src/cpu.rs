/*!
CPU-facing types: the 8086 register file and the executor contract.

The instruction decoder/executor itself is an external collaborator. The
substrate only needs what this module defines:
- `Registers`: general/segment registers, instruction pointer, FLAGS and
  the debug (single-step trap) flag, with the byte-half accessors the
  BIOS-convention peripherals use (AH/AL and friends).
- `Executor`: cycle stepping over the system bus plus the documented
  interrupt-acknowledge behaviour at instruction boundaries.
- `IdleExecutor`: a stand-in executor for tests and the demo binary. It
  consumes cycles in instruction-sized chunks, honours injected wait
  states and acknowledges pending interrupts, but executes no opcodes.

The reset vector contract (CS=0xF000, IP=0xFFF0) is applied by
`System::reset`, not here.
*/

use bitflags::bitflags;

use crate::error::Result;
use crate::system::System;

/// CPU model hosted by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuVariant {
    /// Intel 8088.
    I8088,
    /// NEC V20.
    V20,
}

bitflags! {
    /// 8086 FLAGS register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Flags: u16 {
        const CARRY     = 0x0001;
        const PARITY    = 0x0004;
        const AUXILIARY = 0x0010;
        const ZERO      = 0x0040;
        const SIGN      = 0x0080;
        const TRAP      = 0x0100;
        const INTERRUPT = 0x0200;
        const DIRECTION = 0x0400;
        const OVERFLOW  = 0x0800;
    }
}

/// 8088/V20 register file.
///
/// Word registers are stored whole; the x86 byte halves are exposed as
/// accessor pairs. `debug` is the executor's single-step trap flag: when
/// set, `System::step` stops handing cycles to the executor.
#[derive(Debug, Clone, Default)]
pub struct Registers {
    pub ax: u16,
    pub bx: u16,
    pub cx: u16,
    pub dx: u16,

    pub sp: u16,
    pub bp: u16,
    pub si: u16,
    pub di: u16,

    pub es: u16,
    pub cs: u16,
    pub ss: u16,
    pub ds: u16,

    pub ip: u16,
    pub flags: Flags,

    pub debug: bool,
}

macro_rules! byte_halves {
    ($lo:ident, $set_lo:ident, $hi:ident, $set_hi:ident, $word:ident) => {
        #[inline]
        pub fn $lo(&self) -> u8 {
            self.$word as u8
        }

        #[inline]
        pub fn $set_lo(&mut self, v: u8) {
            self.$word = (self.$word & 0xFF00) | v as u16;
        }

        #[inline]
        pub fn $hi(&self) -> u8 {
            (self.$word >> 8) as u8
        }

        #[inline]
        pub fn $set_hi(&mut self, v: u8) {
            self.$word = (self.$word & 0x00FF) | ((v as u16) << 8);
        }
    };
}

impl Registers {
    byte_halves!(al, set_al, ah, set_ah, ax);
    byte_halves!(bl, set_bl, bh, set_bh, bx);
    byte_halves!(cl, set_cl, ch, set_ch, cx);
    byte_halves!(dl, set_dl, dh, set_dh, dx);
}

/// Linear address from a segment:offset pair.
#[inline]
pub fn linear(segment: u16, offset: u16) -> u32 {
    ((segment as u32) << 4) + offset as u32
}

/// The instruction executor driven by `System::step`.
///
/// Implementations read and write memory and I/O exclusively through the
/// system bus, access the register file via `System::registers_mut`, and
/// must not re-enter `System::step`. At every instruction boundary an
/// executor is expected to consume injected wait states
/// (`System::take_wait_states`) and, when IF is set, acknowledge a pending
/// interrupt via `System::next_interrupt`.
pub trait Executor {
    /// Execute for up to `budget` CPU cycles. Returns cycles consumed,
    /// which may exceed the budget when wait states or a final
    /// instruction straddle it.
    fn step(&mut self, sys: &System, budget: u32) -> Result<u32>;
}

/// Shared-handle executors, so a caller can keep inspecting an executor
/// it has handed to a system.
impl<E: Executor> Executor for std::rc::Rc<std::cell::RefCell<E>> {
    fn step(&mut self, sys: &System, budget: u32) -> Result<u32> {
        (**self).borrow_mut().step(sys, budget)
    }
}

/// Average 8088 instruction cost used to pace the idle executor.
const IDLE_INSTRUCTION_CYCLES: u32 = 4;

/// Executor stand-in that burns cycles without decoding instructions.
///
/// Interrupt acknowledgment is modeled faithfully: at each synthetic
/// instruction boundary with IF set, a pending vector is taken from the
/// PIC and recorded in `delivered`. Tests use the recording to count
/// IRQ deliveries; a real executor would push FLAGS/CS/IP and jump
/// through the IVT instead.
#[derive(Debug, Default)]
pub struct IdleExecutor {
    pub delivered: Vec<u8>,
}

impl IdleExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Executor for IdleExecutor {
    fn step(&mut self, sys: &System, budget: u32) -> Result<u32> {
        let mut consumed = 0;
        while consumed < budget {
            consumed += IDLE_INSTRUCTION_CYCLES + sys.take_wait_states();

            let interrupts_enabled = {
                let regs = sys.registers();
                if regs.debug {
                    break;
                }
                regs.flags.contains(Flags::INTERRUPT)
            };
            if interrupts_enabled {
                if let Some(vector) = sys.next_interrupt() {
                    self.delivered.push(vector);
                }
            }
        }
        Ok(consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_halves_compose_words() {
        let mut r = Registers::default();
        r.set_ah(0x12);
        r.set_al(0x34);
        assert_eq!(r.ax, 0x1234);
        assert_eq!(r.ah(), 0x12);
        assert_eq!(r.al(), 0x34);

        r.dx = 0xBEEF;
        assert_eq!(r.dh(), 0xBE);
        assert_eq!(r.dl(), 0xEF);
        r.set_dl(0x01);
        assert_eq!(r.dx, 0xBE01);
    }

    #[test]
    fn linear_addressing() {
        assert_eq!(linear(0x0000, 0x7C00), 0x07C00);
        assert_eq!(linear(0xF000, 0xFFF0), 0xFFFF0);
        assert_eq!(linear(0x0040, 0x0074), 0x00474);
        // Top of real-mode memory straddles the 1 MiB line.
        assert_eq!(linear(0xFFFF, 0x0010), 0x100000);
    }
}
