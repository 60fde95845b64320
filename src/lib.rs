#![doc = r#"
xt88 library crate.

A cycle-aware IBM PC/XT-class system-emulator core: the device
composition substrate that hosts an 8088/V20 register file and a set of
memory-mapped and port-mapped peripherals, plus the canonical chipset
that makes the machine bootable.

Modules:
- cpu: 8086 register file, FLAGS, the executor contract and an idle
  stand-in executor
- system: the substrate; device table, address/port maps, timers,
  interrupt path, cycle clock and dispatch
- peripheral: the uniform device contract and the null sentinel
- machine: canonical XT/AT machine assembly and frontend glue
- memory: RAM/ROM/noise-fill memory devices
- pic: programmable interrupt controller (Intel 8259)
- pit: programmable interval timer (Intel 8253)
- dma: DMA controller (Intel 8237)
- ppi: PC/XT peripheral interface and keyboard front (Intel 8255)
- kbc: AT keyboard controller with Fast-A20 (Intel 8042)
- disk: BIOS-replacement disk controller on ports 0xB0/0xB1
- uart: serial port (National Semiconductor 8250)
- mouse: Microsoft serial mouse
- joystick: gameport joysticks
- post: POST diagnostic card
- video: MDA/CGA/VGA adapters behind a snapshot/render contract
- error: crate-wide error taxonomy

In tests, shared builders are available under `crate::test_utils`.
"#]

pub mod cpu;
pub mod disk;
pub mod dma;
pub mod error;
pub mod joystick;
pub mod kbc;
pub mod machine;
pub mod memory;
pub mod mouse;
pub mod peripheral;
pub mod pic;
pub mod pit;
pub mod post;
pub mod ppi;
pub mod system;
pub mod uart;
pub mod video;

// Re-export commonly used types at the crate root for convenience.
pub use cpu::{CpuVariant, Executor, Flags, IdleExecutor, Registers};
pub use error::{Error, Result};
pub use machine::{Machine, MachineConfig, VideoKind};
pub use peripheral::{DeviceId, Peripheral, PeripheralClass};
pub use system::System;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
