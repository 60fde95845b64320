/*!
Canonical machine assembly: wires the chipset into a bootable PC.

`MachineConfig` describes the board (CPU variant and clock, RAM size,
video adapter, serial topology, joystick, optional BIOS image); `build`
attaches the peripherals in the canonical order, initializes the system,
distributes configuration triples and resets. The returned `Machine`
keeps the device ids of the interesting peripherals so frontends can
inject input, mount disks and pull video frames without digging through
the device table.

Default port and IRQ assignments: PIC 0x20, PIT 0x40, DMA 0x00/0x80/
0xC0, PPI or KBC 0x60, disk 0xB0, POST 0x80, COM1 0x3F8/IRQ4, COM2
0x2F8/IRQ3, joystick 0x201.
*/

use crate::cpu::{CpuVariant, Executor, Flags};
use crate::disk::{DiskController, DiskImage};
use crate::dma::Dma;
use crate::error::{Error, Result};
use crate::joystick::{Joystick, JoystickEvent};
use crate::kbc::Kbc;
use crate::memory::Memory;
use crate::mouse::{MouseEvent, SerialMouse};
use crate::peripheral::DeviceId;
use crate::pic::Pic;
use crate::pit::Pit;
use crate::post::PostCard;
use crate::ppi::Ppi;
use crate::system::System;
use crate::uart::Uart;
use crate::video::cga::Cga;
use crate::video::mda::Mda;
use crate::video::vga::Vga;
use crate::video::VideoAdapter;

/// The XT crystal: 14.31818 MHz / 3.
pub const XT_FREQUENCY: u64 = 4_772_726;

pub const COM1_BASE: u16 = 0x3F8;
pub const COM2_BASE: u16 = 0x2F8;
pub const COM1_IRQ: u8 = 4;
pub const COM2_IRQ: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoKind {
    None,
    Mda,
    Cga,
    Vga,
}

pub struct MachineConfig {
    pub variant: CpuVariant,
    pub frequency: u64,
    /// Conventional memory size in KiB.
    pub ram_kib: u32,
    pub video: VideoKind,
    /// Serial mouse on COM1; otherwise a plain UART sits there.
    pub serial_mouse: bool,
    pub uart_com2: bool,
    pub joystick: bool,
    /// AT-class board: 8042 KBC (with Fast-A20) instead of the PPI.
    pub at_keyboard_controller: bool,
    /// BIOS image mapped so it ends at the top of the first megabyte.
    pub bios: Option<Vec<u8>>,
    /// Configuration triples distributed to every peripheral.
    pub config: Vec<(String, String, String)>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            variant: CpuVariant::I8088,
            frequency: XT_FREQUENCY,
            ram_kib: 640,
            video: VideoKind::Cga,
            serial_mouse: true,
            uart_com2: false,
            joystick: false,
            at_keyboard_controller: false,
            bios: None,
            config: Vec::new(),
        }
    }
}

pub struct Machine {
    sys: System,

    at_variant: bool,
    keyboard: DeviceId,
    disk: DeviceId,
    video: Option<DeviceId>,
    mouse: Option<DeviceId>,
    joystick: Option<DeviceId>,
    com1: Option<DeviceId>,
    com2: Option<DeviceId>,
}

impl Machine {
    /// Assemble, initialize and reset a machine.
    pub fn build(config: MachineConfig, executor: Box<dyn Executor>) -> Result<Self> {
        let mut sys = System::new(config.variant, config.frequency, executor);

        sys.attach(Box::new(Memory::ram(0, config.ram_kib as usize * 1024)));
        if let Some(image) = &config.bios {
            let base = 0x100000 - image.len() as u32;
            sys.attach(Box::new(Memory::rom(base, image.len(), image)));
        }

        sys.attach(Box::new(Pic::new()));
        sys.attach(Box::new(Dma::new()));
        sys.attach(Box::new(Pit::new()));

        let keyboard = if config.at_keyboard_controller {
            sys.attach(Box::new(Kbc::new()))
        } else {
            sys.attach(Box::new(Ppi::new()))
        };

        let disk = sys.attach(Box::new(DiskController::new()));
        sys.attach(Box::new(PostCard::new()));

        let video = match config.video {
            VideoKind::None => None,
            VideoKind::Mda => Some(sys.attach(Box::new(Mda::new()))),
            VideoKind::Cga => Some(sys.attach(Box::new(Cga::new()))),
            VideoKind::Vga => Some(sys.attach(Box::new(Vga::new()))),
        };

        let (mouse, com1) = if config.serial_mouse {
            (
                Some(sys.attach(Box::new(SerialMouse::new(COM1_BASE, COM1_IRQ)))),
                None,
            )
        } else {
            (
                None,
                Some(sys.attach(Box::new(Uart::new(COM1_BASE, COM1_IRQ)))),
            )
        };
        let com2 = config
            .uart_com2
            .then(|| sys.attach(Box::new(Uart::new(COM2_BASE, COM2_IRQ))));

        let joystick = config
            .joystick
            .then(|| sys.attach(Box::new(Joystick::new(0x201))));

        for (section, key, value) in &config.config {
            for id in 1..sys.peripheral_count() as DeviceId {
                sys.with_peripheral_mut(id, |p| p.config(section, key, value))?;
            }
        }

        sys.initialize()?;

        let mut machine = Self {
            sys,
            at_variant: config.at_keyboard_controller,
            keyboard,
            disk,
            video,
            mouse,
            joystick,
            com1,
            com2,
        };
        machine.reset()?;
        Ok(machine)
    }

    /// Reset the whole system and leave interrupts enabled, the state
    /// firmware hands to the OS.
    pub fn reset(&mut self) -> Result<()> {
        self.sys.reset()?;
        self.sys.registers_mut().flags.insert(Flags::INTERRUPT);
        Ok(())
    }

    pub fn step(&mut self, cycles: u32) -> Result<u32> {
        self.sys.step(cycles)
    }

    pub fn system(&self) -> &System {
        &self.sys
    }

    pub fn system_mut(&mut self) -> &mut System {
        &mut self.sys
    }

    /// Queue a keyboard scancode.
    pub fn key_event(&self, key: u8, force: bool) -> bool {
        self.sys.with_peripheral_mut(self.keyboard, |p| {
            if self.at_variant {
                p.as_any_mut()
                    .downcast_mut::<Kbc>()
                    .is_some_and(|kbc| kbc.key_event(key, force))
            } else {
                p.as_any_mut()
                    .downcast_mut::<Ppi>()
                    .is_some_and(|ppi| ppi.key_event(key, force))
            }
        })
    }

    /// Push a mouse movement packet, when a serial mouse is fitted.
    pub fn mouse_event(&self, ev: &MouseEvent) -> bool {
        let Some(id) = self.mouse else {
            return false;
        };
        self.sys.with_peripheral_mut(id, |p| {
            p.as_any_mut()
                .downcast_mut::<SerialMouse>()
                .is_some_and(|m| m.push_event(&self.sys, ev))
        })
    }

    /// Push a joystick update, when a gameport is fitted.
    pub fn joystick_event(&self, ev: &JoystickEvent) -> bool {
        let Some(id) = self.joystick else {
            return false;
        };
        self.sys.with_peripheral_mut(id, |p| {
            p.as_any_mut()
                .downcast_mut::<Joystick>()
                .is_some_and(|j| j.push_event(ev))
        })
    }

    /// Device id of the first serial port, when a plain UART sits there.
    pub fn com1(&self) -> Option<DeviceId> {
        self.com1
    }

    pub fn com2(&self) -> Option<DeviceId> {
        self.com2
    }

    /// Mount a disk image as DOS drive `num`.
    pub fn mount(&self, num: u8, image: Box<dyn DiskImage>) -> Result<()> {
        self.sys.with_peripheral_mut(self.disk, |p| {
            p.as_any_mut()
                .downcast_mut::<DiskController>()
                .ok_or(Error::User(0))?
                .mount(num, image)
        })
    }

    pub fn set_boot_drive(&self, num: u8) {
        self.sys.with_peripheral_mut(self.disk, |p| {
            if let Some(disk) = p.as_any_mut().downcast_mut::<DiskController>() {
                disk.set_boot_drive(num);
            }
        });
    }

    /// Trigger the firmware bootstrap: load the boot drive's MBR to
    /// 0:7C00, exactly as the BIOS does through port 0xB0.
    pub fn boot(&self) {
        self.sys.io_write(0xB0, 0);
    }

    /// Run `f` against the video adapter, if one is fitted.
    pub fn with_video<R>(&self, f: impl FnOnce(&mut dyn VideoAdapter) -> R) -> Option<R> {
        let id = self.video?;
        self.sys.with_peripheral_mut(id, |p| p.as_video().map(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::IdleExecutor;
    use crate::peripheral::PeripheralClass;

    fn xt() -> Machine {
        Machine::build(MachineConfig::default(), Box::new(IdleExecutor::new())).unwrap()
    }

    #[test]
    fn canonical_port_assignments() {
        let m = xt();
        let sys = m.system();

        let class_at = |port: u16| sys.peripheral_class(sys.port_map()[port as usize]);
        assert_eq!(class_at(0x20), PeripheralClass::Pic);
        assert_eq!(class_at(0x43), PeripheralClass::Pit);
        assert_eq!(class_at(0x00), PeripheralClass::Dma);
        assert_eq!(class_at(0xC0), PeripheralClass::Dma);
        assert_eq!(class_at(0x60), PeripheralClass::Ppi);
        assert_eq!(class_at(0xB0), PeripheralClass::Disk);
        assert_eq!(class_at(0x3D8), PeripheralClass::Video);
    }

    #[test]
    fn post_card_claims_port_0x80_over_dma() {
        let m = xt();
        let sys = m.system();
        assert_eq!(sys.peripheral_name(sys.port_map()[0x80]), "Post Card");
        // The rest of the page-register range stays with the DMA chip.
        assert_eq!(
            sys.peripheral_class(sys.port_map()[0x81]),
            PeripheralClass::Dma
        );
    }

    #[test]
    fn conventional_ram_is_mapped_and_writable() {
        let m = xt();
        let sys = m.system();
        sys.write_byte(0x1234, 0x99);
        assert_eq!(sys.read_byte(0x1234), 0x99);
        // Above 640K is open bus on this config.
        assert_eq!(sys.read_byte(0xE0000), 0xFF);
    }

    #[test]
    fn reset_applies_the_reset_vector() {
        let m = xt();
        let regs = m.system().registers();
        assert_eq!(regs.cs, 0xF000);
        assert_eq!(regs.ip, 0xFFF0);
        assert!(regs.flags.contains(Flags::INTERRUPT));
    }

    #[test]
    fn bios_image_lands_at_top_of_memory() {
        let mut config = MachineConfig::default();
        config.bios = Some(vec![0xEA; 0x2000]); // 8 KiB
        let m = Machine::build(config, Box::new(IdleExecutor::new())).unwrap();
        assert_eq!(m.system().read_byte(0xFE000), 0xEA);
    }

    #[test]
    fn at_variant_exposes_kbc_ports() {
        let mut config = MachineConfig::default();
        config.at_keyboard_controller = true;
        let m = Machine::build(config, Box::new(IdleExecutor::new())).unwrap();

        let sys = m.system();
        m.key_event(0x1E, false);
        sys.io_write(0x64, 0xAA);
        assert_eq!(sys.io_read(0x60), 0x55);
        sys.io_write(0x92, 0x00);
        assert!(!sys.a20());
    }

    #[test]
    fn dip_switch_triples_reach_the_ppi() {
        let mut config = MachineConfig::default();
        config.video = VideoKind::None;
        config.config = vec![(
            "switch1".to_owned(),
            "video".to_owned(),
            "0".to_owned(),
        )];
        let m = Machine::build(config, Box::new(IdleExecutor::new())).unwrap();

        // Select the high switch nibble; video bits 4-5 = ~0 & 3 = 3.
        m.system().io_write(0x61, 0x08);
        assert_eq!(m.system().io_read(0x62) & 3, 3);
    }
}
