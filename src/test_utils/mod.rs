//! Shared test utilities: bare systems, shared executors and disk image
//! builders.
//!
//! These helpers de-duplicate construction logic across the device unit
//! tests and the end-to-end scenarios in `system/tests.rs`.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use crate::cpu::{CpuVariant, Executor, IdleExecutor};
use crate::disk::SECTOR_SIZE;
use crate::machine::XT_FREQUENCY;
use crate::system::System;

/// An empty system around an idle executor. Good enough for unit tests
/// that poke a device directly; nothing is attached or initialized.
pub fn bare_system() -> System {
    System::new(CpuVariant::I8088, XT_FREQUENCY, Box::new(IdleExecutor::new()))
}

/// An idle executor plus a shared handle to it, so tests can inspect
/// the vectors it acknowledged after handing ownership to a system.
pub fn shared_executor() -> (Rc<RefCell<IdleExecutor>>, Box<dyn Executor>) {
    let exec = Rc::new(RefCell::new(IdleExecutor::new()));
    (exec.clone(), Box::new(exec))
}

/// CPU cycles per emulated millisecond at the XT clock, rounded up so
/// stepping once always crosses the millisecond line.
pub fn cycles_per_ms() -> u32 {
    (XT_FREQUENCY / 1000) as u32 + 1
}

/// A floppy image of `size` bytes whose first sector starts with the
/// 0x55 0xAA signature followed by a recognizable byte ramp.
pub fn boot_floppy_image(size: usize) -> Cursor<Vec<u8>> {
    let mut data = vec![0u8; size];
    data[0] = 0x55;
    data[1] = 0xAA;
    for (i, b) in data.iter_mut().enumerate().take(SECTOR_SIZE).skip(2) {
        *b = (i & 0xFF) as u8;
    }
    Cursor::new(data)
}

/// A raw image where every sector is filled with its own sector index,
/// for read-back checks against computed LBAs.
pub fn sector_numbered_image(sectors: usize) -> Cursor<Vec<u8>> {
    let mut data = vec![0u8; sectors * SECTOR_SIZE];
    for (i, b) in data.iter_mut().enumerate() {
        *b = (i / SECTOR_SIZE) as u8;
    }
    Cursor::new(data)
}
