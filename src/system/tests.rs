//! Substrate unit tests and end-to-end machine scenarios: dispatch,
//! A20 wraparound, timers, and the canonical boot/keyboard/DMA/mouse
//! flows across a fully assembled XT.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::cpu::{CpuVariant, IdleExecutor};
use crate::dma::Dma;
use crate::error::{Error, Result};
use crate::machine::{Machine, MachineConfig, VideoKind, XT_FREQUENCY};
use crate::memory::Memory;
use crate::mouse::{MouseEvent, buttons};
use crate::peripheral::{DeviceId, Peripheral};
use crate::test_utils::{boot_floppy_image, cycles_per_ms, shared_executor};

fn sys_with(peripherals: Vec<Box<dyn Peripheral>>) -> System {
    let mut sys = System::create(
        CpuVariant::I8088,
        XT_FREQUENCY,
        Box::new(IdleExecutor::new()),
        peripherals,
    );
    sys.initialize().unwrap();
    sys.reset().unwrap();
    sys
}

fn xt_machine() -> (Machine, Rc<RefCell<IdleExecutor>>) {
    let (exec, boxed) = shared_executor();
    let machine = Machine::build(MachineConfig::default(), boxed).unwrap();
    (machine, exec)
}

/// Program the PIC for base vector 8 with auto-EOI, the way the
/// scenarios want interrupts acknowledged without a software handler.
fn init_pic_auto_eoi(sys: &System) {
    sys.io_write(0x20, 0x13);
    sys.io_write(0x21, 0x08);
    sys.io_write(0x21, 0x03);
    sys.io_write(0x21, 0x00);
}

// -----------------------------
// Dispatch and maps
// -----------------------------

#[test]
fn unmapped_memory_reads_open_bus_and_discards_writes() {
    let sys = sys_with(vec![]);
    assert_eq!(sys.read_byte(0x12345), 0xFF);
    sys.write_byte(0x12345, 0x00);
    assert_eq!(sys.read_byte(0x12345), 0xFF);
    assert_eq!(sys.io_read(0x1234), 0xFF);
}

#[test]
fn ram_read_back_and_rom_write_protection() {
    let sys = sys_with(vec![
        Box::new(Memory::ram(0, 0x1000)),
        Box::new(Memory::rom(0xFE000, 0x10, &[0x12])),
    ]);

    sys.write_byte(0x123, 0xAB);
    assert_eq!(sys.read_byte(0x123), 0xAB);

    assert_eq!(sys.read_byte(0xFE000), 0x12);
    sys.write_byte(0xFE000, 0x34);
    assert_eq!(sys.read_byte(0xFE000), 0x12);
}

#[test]
fn later_install_wins_overlapping_range() {
    let mut sys = System::create(
        CpuVariant::I8088,
        XT_FREQUENCY,
        Box::new(IdleExecutor::new()),
        vec![
            Box::new(Memory::ram(0x1000, 0x100)),
            Box::new(Memory::ram(0x1000, 0x100)),
        ],
    );
    sys.initialize().unwrap();

    // Both devices cover the same paragraphs; the second registration
    // owns every cell.
    assert_eq!(sys.mem_map()[0x100], 2);
}

#[test]
fn word_access_is_little_endian_and_may_straddle_devices() {
    let sys = sys_with(vec![Box::new(Memory::ram(0, 0xA0000))]);

    sys.write_word(0x2000, 0xBEEF);
    assert_eq!(sys.read_byte(0x2000), 0xEF);
    assert_eq!(sys.read_byte(0x2001), 0xBE);
    assert_eq!(sys.read_word(0x2000), 0xBEEF);

    // Low byte in RAM, high byte on open bus.
    sys.write_byte(0x9FFFF, 0x12);
    assert_eq!(sys.read_word(0x9FFFF), 0xFF12);
}

#[test]
fn paragraph_granularity_rounds_install_ranges() {
    let sys = sys_with(vec![Box::new(Memory::ram(0x1008, 0x10))]);
    // The covering paragraph maps the whole 16-byte granule, so the
    // first half of 0x1000 hits the device's out-of-window path.
    assert_eq!(sys.mem_map()[0x100], 1);
    assert_eq!(sys.read_byte(0x1000), 0xFF);
    sys.write_byte(0x1008, 0x42);
    assert_eq!(sys.read_byte(0x1008), 0x42);
}

// -----------------------------
// A20 gate
// -----------------------------

#[test]
fn a20_disabled_wraps_bit_20() {
    let sys = sys_with(vec![Box::new(Memory::ram(0, 0xA0000))]);

    sys.write_byte(0x000100, 0x5A);
    sys.set_a20(false);
    assert_eq!(sys.read_byte(0x100100), 0x5A);

    for k in [0u32, 0x10, 0xFFEE] {
        assert_eq!(sys.read_byte(0x100000 + k), sys.read_byte(k));
    }
}

#[test]
fn reset_enables_a20() {
    let mut sys = sys_with(vec![]);
    sys.set_a20(false);
    assert!(!sys.a20());
    sys.reset().unwrap();
    assert!(sys.a20());
}

// -----------------------------
// Timers and wait states
// -----------------------------

struct TickCounter {
    fired: Rc<RefCell<Vec<u32>>>,
    interval_ns: u64,
}

impl Peripheral for TickCounter {
    fn name(&self) -> &'static str {
        "tick counter"
    }

    fn install(&mut self, sys: &mut System, id: DeviceId) -> Result<()> {
        sys.install_timer(id, self.interval_ns);
        Ok(())
    }

    fn timer(&mut self, _sys: &System, _timer: TimerId, cycles: u32) -> Result<()> {
        self.fired.borrow_mut().push(cycles);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn interval_zero_timer_fires_every_step() {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let mut sys = sys_with(vec![Box::new(TickCounter {
        fired: fired.clone(),
        interval_ns: 0,
    })]);

    for _ in 0..5 {
        sys.step(100).unwrap();
    }
    assert_eq!(fired.borrow().len(), 5);
    assert!(fired.borrow().iter().all(|&c| c == 100));
}

#[test]
fn periodic_timer_coalesces_missed_deadlines() {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let mut sys = sys_with(vec![Box::new(TickCounter {
        fired: fired.clone(),
        interval_ns: 1_000_000,
    })]);

    // One huge step spanning ~10 intervals still fires exactly once.
    sys.step(cycles_per_ms() * 10).unwrap();
    assert_eq!(fired.borrow().len(), 1);

    // Steady milliseconds fire once each.
    for _ in 0..4 {
        sys.step(cycles_per_ms()).unwrap();
    }
    assert_eq!(fired.borrow().len(), 5);
}

struct FailingTimer;

impl Peripheral for FailingTimer {
    fn name(&self) -> &'static str {
        "failing timer"
    }

    fn install(&mut self, sys: &mut System, id: DeviceId) -> Result<()> {
        sys.install_timer(id, 0);
        Ok(())
    }

    fn timer(&mut self, _sys: &System, _timer: TimerId, _cycles: u32) -> Result<()> {
        Err(Error::User(7))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn timer_errors_surface_from_step() {
    let mut sys = sys_with(vec![Box::new(FailingTimer)]);
    assert!(matches!(sys.step(10), Err(Error::User(7))));
}

#[test]
fn wait_states_stall_the_executor() {
    let mut sys = sys_with(vec![]);
    sys.wait(1000);
    let consumed = sys.step(8).unwrap();
    assert!(consumed >= 1000);
}

struct InstallFails;

impl Peripheral for InstallFails {
    fn name(&self) -> &'static str {
        "install fails"
    }

    fn install(&mut self, _sys: &mut System, _id: DeviceId) -> Result<()> {
        Err(Error::User(9))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn install_failure_aborts_initialize() {
    let mut sys = System::create(
        CpuVariant::I8088,
        XT_FREQUENCY,
        Box::new(IdleExecutor::new()),
        vec![Box::new(InstallFails)],
    );
    assert!(matches!(sys.initialize(), Err(Error::User(9))));
}

// -----------------------------
// End-to-end scenarios
// -----------------------------

#[test]
fn pit_channel_0_raises_18_interrupts_per_second() {
    let (mut machine, exec) = xt_machine();
    {
        let sys = machine.system();
        init_pic_auto_eoi(sys);

        // Channel 0, toggle access, divisor 0 -> 65536 -> 18.2 Hz.
        sys.io_write(0x43, 0x36);
        sys.io_write(0x40, 0x00);
        sys.io_write(0x40, 0x00);
    }

    // One emulated second in millisecond slices.
    for _ in 0..1000 {
        machine.step(cycles_per_ms()).unwrap();
    }

    let irq0 = exec.borrow().delivered.iter().filter(|&&v| v == 8).count();
    assert_eq!(irq0, 18);
}

#[test]
fn keyboard_scancode_latches_and_raises_irq1() {
    let (mut machine, exec) = xt_machine();
    init_pic_auto_eoi(machine.system());

    assert!(machine.key_event(0x1E, false)); // 'A' make

    for _ in 0..2 {
        machine.step(cycles_per_ms()).unwrap();
    }

    assert_eq!(machine.system().io_read(0x60), 0x1E);
    assert!(exec.borrow().delivered.contains(&9));
}

#[test]
fn disk_bootstrap_loads_mbr_to_7c00() {
    let (machine, _) = xt_machine();

    machine.mount(0, Box::new(boot_floppy_image(10_240))).unwrap();
    machine.set_boot_drive(0);
    machine.boot();

    let sys = machine.system();
    assert_eq!(sys.read_byte(0x7C00), 0x55);
    assert_eq!(sys.read_byte(0x7C01), 0xAA);
    for k in 2..512u32 {
        assert_eq!(sys.read_byte(0x7C00 + k), (k & 0xFF) as u8);
    }
    assert_eq!(sys.registers().dl(), 0);
}

#[test]
fn disk_sector_read_back_matches_lba() {
    let (machine, _) = xt_machine();
    // 720K image: 80 cylinders, 2 heads, 9 sectors.
    machine
        .mount(0, Box::new(crate::test_utils::sector_numbered_image(1440)))
        .unwrap();

    let sys = machine.system();
    // Read CHS (2, 1, 3) -> LBA (2*2+1)*9+3-1 = 47.
    {
        let mut r = sys.registers_mut();
        r.set_ah(2); // read sectors
        r.set_al(1);
        r.set_ch(2);
        r.set_cl(3);
        r.set_dh(1);
        r.set_dl(0);
        r.es = 0;
        r.bx = 0x4000;
    }
    sys.io_write(0xB1, 0);

    let r = sys.registers();
    assert!(!r.flags.contains(crate::cpu::Flags::CARRY));
    assert_eq!(r.al(), 1);
    drop(r);
    assert_eq!(sys.read_byte(0x4000), 47);
}

#[test]
fn dma_auto_init_wraps_after_terminal_count() {
    let (machine, _) = xt_machine();
    let sys = machine.system();

    sys.write_byte(0x12000, 0x77);

    sys.io_write(0x0B, 0x12); // channel 2: auto-init, increment
    sys.io_write(0x0C, 0x00); // clear flip-flop
    sys.io_write(0x04, 0x00); // address 0x2000
    sys.io_write(0x04, 0x20);
    sys.io_write(0x05, 0x00); // count 0: one transfer per reload
    sys.io_write(0x05, 0x00);
    sys.io_write(0x81, 0x01); // page 0x10000

    let first = sys.dma_read(2);
    assert_eq!(first, 0x77);
    for _ in 0..65_535 {
        let _ = sys.dma_read(2);
    }
    let wrapped = sys.dma_read(2);
    assert_eq!(wrapped, first);
}

#[test]
fn dma_single_transfer_visits_each_address_once_then_reloads() {
    let (machine, _) = xt_machine();
    let sys = machine.system();

    for i in 0..16u32 {
        sys.write_byte(0x100 + i, i as u8);
    }

    sys.io_write(0x0B, 0x52); // channel 2: single, auto-init, increment
    sys.io_write(0x0C, 0x00);
    sys.io_write(0x04, 0x00); // address 0x100
    sys.io_write(0x04, 0x01);
    sys.io_write(0x05, 0x0F); // count 15 -> 16 transfers
    sys.io_write(0x05, 0x00);
    sys.io_write(0x81, 0x00);

    for i in 0..16u8 {
        assert_eq!(sys.dma_read(2), i);
    }
    // Terminal count reloaded address and count.
    assert_eq!(sys.dma_read(2), 0);

    machine.system().with_peripheral(
        machine.system().port_map()[0x04],
        |p| {
            let dma = p.as_any().downcast_ref::<Dma>().unwrap();
            assert_eq!(dma.address(2) & 0xFFFF, 0x101);
        },
    );
}

#[test]
fn serial_mouse_emits_three_byte_packets() {
    let (machine, _) = xt_machine();

    let ev = MouseEvent {
        buttons: buttons::LEFT,
        xrel: -1,
        yrel: 2,
    };
    assert!(machine.mouse_event(&ev));

    let sys = machine.system();
    assert_eq!(sys.io_read(0x3F8), 0x63);
    assert_eq!(sys.io_read(0x3F8), 0x3F);
    assert_eq!(sys.io_read(0x3F8), 0x02);
}

#[test]
fn a20_wraparound_on_a_full_machine() {
    let (machine, _) = xt_machine();
    let sys = machine.system();

    sys.write_byte(0x000100, 0x5A);
    sys.set_a20(false);
    assert_eq!(sys.read_byte(0x100100), 0x5A);
}

#[test]
fn disk_access_inserts_wait_states() {
    let (mut machine, _) = xt_machine();
    machine.system().io_write(0xB0, 0); // no boot drive mounted; still pays latency
    let consumed = machine.step(4).unwrap();
    assert!(consumed >= 1000);
}

#[test]
fn video_none_machine_boots_without_adapter() {
    let mut config = MachineConfig::default();
    config.video = VideoKind::None;
    let machine = Machine::build(config, Box::new(IdleExecutor::new())).unwrap();
    assert!(machine.with_video(|_| ()).is_none());
}
