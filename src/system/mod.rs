/*!
System substrate: device table, address/port maps, timers, interrupt path
and the cycle clock.

Overview
- The system owns every peripheral in a fixed table (max 32 entries, slot
  0 reserved for the null sentinel). Peripheral ids are assigned in
  registration order at attach time and never change.
- Memory dispatch is a flat map of 65,536 paragraph slots (1 MiB >> 4),
  port dispatch a flat map of 65,536 port slots; each cell holds the id of
  the peripheral that last claimed it, so the hot path is a mask, a table
  load and a virtual call.
- Timers are a small linear list (N <= 32); each `step` advances the
  nanosecond clock by `cycles * 1e9 / frequency` and invokes every due
  callback once, coalescing missed periods.
- Interrupts are delegated: `interrupt(n)` forwards to the PIC-class
  device, and the executor acknowledges via `next_interrupt` at
  instruction boundaries.

Borrow discipline
- Devices live in `RefCell` cells so a dispatched callback (holding its
  own device mutably) can re-enter the system for *other* devices: a timer
  tick may read memory, raise an interrupt, or start a DMA transfer. A
  device calling back into itself through the system is a contract
  violation and panics.
- During `initialize` each device is moved out of its cell in turn
  (swapped against the null sentinel) so its `install` can mutate the
  system maps directly.
- Everything `install` writes (maps, monitors) is a plain field, written
  only pre-run; everything run-time dispatch mutates through `&System`
  (clock, wait states, A20, register file, timer deadlines) sits behind a
  `Cell`/`RefCell`.
*/

use std::cell::{Cell, Ref, RefCell, RefMut};

use crate::cpu::{CpuVariant, Executor, Registers};
use crate::error::Result;
use crate::peripheral::{
    DeviceId, MonitorEntry, MonitorFlags, NullDevice, Peripheral, PeripheralClass,
};

#[cfg(test)]
mod tests;

/// Size of the device table, sentinel included.
pub const MAX_PERIPHERALS: usize = 32;

/// One paragraph (16 bytes) per memory-map slot.
pub const PARAGRAPH: u32 = 16;

const MEM_SLOTS: usize = 0x10000;
const PORT_SLOTS: usize = 0x10000;
const A20_BIT: u32 = 1 << 20;

/// Reset vector contract for the hosted executor.
pub const RESET_CS: u16 = 0xF000;
pub const RESET_IP: u16 = 0xFFF0;

/// Stable handle returned by `install_timer`.
pub type TimerId = usize;

#[derive(Debug)]
struct Timer {
    device: DeviceId,
    interval_ns: u64,
    deadline_ns: u64,
}

pub struct System {
    variant: CpuVariant,
    frequency: u64,

    regs: RefCell<Registers>,
    executor: RefCell<Box<dyn Executor>>,

    devices: Vec<RefCell<Box<dyn Peripheral>>>,
    mem_map: Vec<DeviceId>,
    port_map: Vec<DeviceId>,
    monitors: Vec<MonitorEntry>,

    timers: RefCell<Vec<Timer>>,
    total_cycles: Cell<u64>,
    clock_ns: Cell<u64>,
    wait_states: Cell<u32>,

    a20_enabled: Cell<bool>,
    pic_device: Cell<DeviceId>,
    dma_device: Cell<DeviceId>,

    initialized: bool,
}

impl System {
    /// Build an empty system around an executor. Attach peripherals with
    /// `attach`, then call `initialize` once and `reset`.
    pub fn new(variant: CpuVariant, frequency: u64, executor: Box<dyn Executor>) -> Self {
        let null: Box<dyn Peripheral> = Box::new(NullDevice);
        Self {
            variant,
            frequency,
            regs: RefCell::new(Registers::default()),
            executor: RefCell::new(executor),
            devices: vec![RefCell::new(null)],
            mem_map: vec![0; MEM_SLOTS],
            port_map: vec![0; PORT_SLOTS],
            monitors: Vec::new(),
            timers: RefCell::new(Vec::new()),
            total_cycles: Cell::new(0),
            clock_ns: Cell::new(0),
            wait_states: Cell::new(0),
            a20_enabled: Cell::new(true),
            pic_device: Cell::new(0),
            dma_device: Cell::new(0),
            initialized: false,
        }
    }

    /// Build a system from a peripheral list, ids assigned in order.
    pub fn create(
        variant: CpuVariant,
        frequency: u64,
        executor: Box<dyn Executor>,
        peripherals: Vec<Box<dyn Peripheral>>,
    ) -> Self {
        let mut sys = Self::new(variant, frequency, executor);
        for p in peripherals {
            sys.attach(p);
        }
        sys
    }

    /// Add a peripheral to the table and return its id. Panics when the
    /// table is full or the system is already initialized; both are
    /// assembly-time programming errors.
    pub fn attach(&mut self, peripheral: Box<dyn Peripheral>) -> DeviceId {
        assert!(!self.initialized, "attach after initialize");
        assert!(
            self.devices.len() < MAX_PERIPHERALS,
            "peripheral table full ({MAX_PERIPHERALS} entries)"
        );
        self.devices.push(RefCell::new(peripheral));
        (self.devices.len() - 1) as DeviceId
    }

    /// Run every peripheral's `install` in registration order. The first
    /// failure aborts initialization.
    pub fn initialize(&mut self) -> Result<()> {
        assert!(!self.initialized, "initialize called twice");
        for idx in 1..self.devices.len() {
            // Swap the device out against the sentinel so `install` can
            // borrow the system mutably while the device is live.
            let placeholder: Box<dyn Peripheral> = Box::new(NullDevice);
            let cell = std::mem::replace(&mut self.devices[idx], RefCell::new(placeholder));
            let mut dev = cell.into_inner();
            let result = dev.install(self, idx as DeviceId);
            self.devices[idx] = RefCell::new(dev);
            result?;
        }

        for idx in 1..self.devices.len() {
            match self.devices[idx].borrow().class() {
                PeripheralClass::Pic => self.pic_device.set(idx as DeviceId),
                PeripheralClass::Dma => self.dma_device.set(idx as DeviceId),
                _ => (),
            }
        }

        self.initialized = true;
        Ok(())
    }

    /// Reset to power-on state: A20 enabled, wait states cleared, every
    /// peripheral reset in registration order, CPU at the reset vector.
    pub fn reset(&mut self) -> Result<()> {
        self.a20_enabled.set(true);
        self.wait_states.set(0);

        for cell in &self.devices[1..] {
            cell.borrow_mut().reset()?;
        }

        let mut regs = self.regs.borrow_mut();
        *regs = Registers::default();
        regs.cs = RESET_CS;
        regs.ip = RESET_IP;
        Ok(())
    }

    /// Advance the machine by up to `cycle_budget` CPU cycles: tick due
    /// timers, then hand the budget to the executor. Returns the cycles
    /// the executor consumed; the first error from a timer callback or
    /// the executor surfaces here.
    pub fn step(&mut self, cycle_budget: u32) -> Result<u32> {
        self.tick_timers(cycle_budget)?;
        let consumed = self.executor.borrow_mut().step(self, cycle_budget)?;
        Ok(consumed)
    }

    fn tick_timers(&self, cycles: u32) -> Result<()> {
        let total = self.total_cycles.get().wrapping_add(cycles as u64);
        self.total_cycles.set(total);
        let now = (total as u128 * 1_000_000_000 / self.frequency as u128) as u64;
        self.clock_ns.set(now);

        let count = self.timers.borrow().len();
        for slot in 0..count {
            let due = {
                let mut timers = self.timers.borrow_mut();
                let t = &mut timers[slot];
                if t.interval_ns == 0 {
                    Some(t.device)
                } else if now >= t.deadline_ns {
                    // Fire once; missed periods are coalesced.
                    while t.deadline_ns <= now {
                        t.deadline_ns += t.interval_ns;
                    }
                    Some(t.device)
                } else {
                    None
                }
            };
            if let Some(device) = due {
                self.devices[device as usize]
                    .borrow_mut()
                    .timer(self, slot, cycles)?;
            }
        }
        Ok(())
    }

    // -----------------------------
    // Memory and port dispatch
    // -----------------------------

    /// Apply the A20 gate and fold into the 1 MiB map. With A20 disabled
    /// bit 20 is forced low before the fold, reproducing the classic
    /// 8088 wraparound.
    #[inline]
    fn phys(&self, addr: u32) -> u32 {
        let addr = if self.a20_enabled.get() {
            addr
        } else {
            addr & !A20_BIT
        };
        addr & 0xF_FFFF
    }

    pub fn read_byte(&self, addr: u32) -> u8 {
        let addr = self.phys(addr);
        let id = self.mem_map[(addr >> 4) as usize];
        // SAFETY: map cells only ever hold ids written by `install_mem`,
        // which validates them against the device table.
        let dev = unsafe { self.devices.get_unchecked(id as usize) };
        dev.borrow_mut().mem_read(self, addr)
    }

    pub fn write_byte(&self, addr: u32, value: u8) {
        let addr = self.phys(addr);
        let id = self.mem_map[(addr >> 4) as usize];
        // SAFETY: as in `read_byte`.
        let dev = unsafe { self.devices.get_unchecked(id as usize) };
        dev.borrow_mut().mem_write(self, addr, value);
    }

    /// Little-endian word read; the two bytes dispatch independently and
    /// may straddle peripherals.
    #[inline]
    pub fn read_word(&self, addr: u32) -> u16 {
        let lo = self.read_byte(addr) as u16;
        let hi = self.read_byte(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    #[inline]
    pub fn write_word(&self, addr: u32, value: u16) {
        self.write_byte(addr, value as u8);
        self.write_byte(addr.wrapping_add(1), (value >> 8) as u8);
    }

    pub fn io_read(&self, port: u16) -> u8 {
        let id = self.port_map[port as usize];
        self.devices[id as usize].borrow_mut().io_in(self, port)
    }

    pub fn io_write(&self, port: u16, value: u8) {
        let id = self.port_map[port as usize];
        self.devices[id as usize].borrow_mut().io_out(self, port, value);
    }

    // -----------------------------
    // Install API (called from Peripheral::install)
    // -----------------------------

    fn check_device(&self, device: DeviceId) {
        assert!(
            device != 0 && (device as usize) < self.devices.len(),
            "install with invalid device id {device}"
        );
    }

    /// Claim the inclusive port range `lo..=hi`. Later claims overwrite
    /// earlier ones cell by cell.
    pub fn install_io(&mut self, device: DeviceId, lo: u16, hi: u16) {
        self.check_device(device);
        assert!(lo <= hi, "install_io with reversed range");
        for port in lo..=hi {
            self.port_map[port as usize] = device;
        }
    }

    pub fn install_io_at(&mut self, device: DeviceId, port: u16) {
        self.install_io(device, port, port);
    }

    /// Claim the inclusive address range `lo..=hi`. The map granule is a
    /// paragraph; the range is widened to paragraph boundaries.
    pub fn install_mem(&mut self, device: DeviceId, lo: u32, hi: u32) {
        self.check_device(device);
        assert!(lo <= hi && hi <= 0xF_FFFF, "install_mem range out of map");
        for slot in (lo / PARAGRAPH)..=(hi / PARAGRAPH) {
            self.mem_map[slot as usize] = device;
        }
    }

    /// Register a timer with the given interval in nanoseconds. Interval
    /// 0 fires on every step.
    pub fn install_timer(&mut self, device: DeviceId, interval_ns: u64) -> TimerId {
        self.check_device(device);
        let mut timers = self.timers.borrow_mut();
        timers.push(Timer {
            device,
            interval_ns,
            deadline_ns: self.clock_ns.get() + interval_ns,
        });
        timers.len() - 1
    }

    pub fn install_monitor(&mut self, device: DeviceId, name: &str, flags: MonitorFlags) {
        self.check_device(device);
        self.monitors.push(MonitorEntry {
            device,
            name: name.to_owned(),
            flags,
        });
    }

    // -----------------------------
    // Interrupts, DMA routing, wait states, A20
    // -----------------------------

    /// Raise IRQ line `n`; delegated to the PIC-class peripheral.
    pub fn interrupt(&self, n: u8) {
        let pic = self.pic_device.get();
        if pic == 0 {
            log::warn!("IRQ {n} raised with no interrupt controller attached");
            return;
        }
        self.devices[pic as usize].borrow_mut().pic_irq(n);
    }

    /// Acknowledge and return the next pending interrupt vector, if any.
    /// Called by the executor at instruction boundaries when IF=1.
    pub fn next_interrupt(&self) -> Option<u8> {
        let pic = self.pic_device.get();
        if pic == 0 {
            return None;
        }
        self.devices[pic as usize].borrow_mut().pic_next()
    }

    /// One byte of a DMA transfer on `channel`, routed through the
    /// DMA-class peripheral so page registers and the A20 gate apply.
    pub fn dma_read(&self, channel: u8) -> u8 {
        let dma = self.dma_device.get();
        if dma == 0 {
            return 0xFF;
        }
        self.devices[dma as usize].borrow_mut().dma_read(self, channel)
    }

    pub fn dma_write(&self, channel: u8, value: u8) {
        let dma = self.dma_device.get();
        if dma != 0 {
            self.devices[dma as usize]
                .borrow_mut()
                .dma_write(self, channel, value);
        }
    }

    /// Request the executor to stall for `cycles` at the next instruction
    /// boundary. Used to model device latency (disk controller).
    pub fn wait(&self, cycles: u32) {
        self.wait_states.set(self.wait_states.get().saturating_add(cycles));
    }

    /// Drain the pending wait states; the executor calls this once per
    /// instruction boundary.
    pub fn take_wait_states(&self) -> u32 {
        self.wait_states.replace(0)
    }

    pub fn set_a20(&self, enabled: bool) {
        self.a20_enabled.set(enabled);
    }

    pub fn a20(&self) -> bool {
        self.a20_enabled.get()
    }

    // -----------------------------
    // Accessors
    // -----------------------------

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn variant(&self) -> CpuVariant {
        self.variant
    }

    /// Nanoseconds of emulated time elapsed since creation.
    pub fn elapsed_ns(&self) -> u64 {
        self.clock_ns.get()
    }

    /// Total CPU cycles handed to `step` since creation.
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles.get()
    }

    pub fn registers(&self) -> Ref<'_, Registers> {
        self.regs.borrow()
    }

    pub fn registers_mut(&self) -> RefMut<'_, Registers> {
        self.regs.borrow_mut()
    }

    pub fn peripheral_count(&self) -> usize {
        self.devices.len()
    }

    pub fn peripheral_name(&self, id: DeviceId) -> &'static str {
        self.devices[id as usize].borrow().name()
    }

    pub fn peripheral_class(&self, id: DeviceId) -> PeripheralClass {
        self.devices[id as usize].borrow().class()
    }

    /// First attached device of `class`, if any. Install-time discovery
    /// helper (PPI finds the PIT this way).
    pub fn find_class(&self, class: PeripheralClass) -> Option<DeviceId> {
        (1..self.devices.len())
            .map(|i| i as DeviceId)
            .find(|&i| self.peripheral_class(i) == class)
    }

    /// Borrow a peripheral immutably for the duration of `f`.
    pub fn with_peripheral<R>(&self, id: DeviceId, f: impl FnOnce(&dyn Peripheral) -> R) -> R {
        let dev = self.devices[id as usize].borrow();
        f(dev.as_ref())
    }

    /// Borrow a peripheral mutably for the duration of `f`. Panics if the
    /// peripheral is the one currently being dispatched.
    pub fn with_peripheral_mut<R>(
        &self,
        id: DeviceId,
        f: impl FnOnce(&mut dyn Peripheral) -> R,
    ) -> R {
        let mut dev = self.devices[id as usize].borrow_mut();
        f(dev.as_mut())
    }

    pub fn mem_map(&self) -> &[DeviceId] {
        &self.mem_map
    }

    pub fn port_map(&self) -> &[DeviceId] {
        &self.port_map
    }

    pub fn monitors(&self) -> &[MonitorEntry] {
        &self.monitors
    }
}
