//! Demo runner: assemble an XT, mount a disk image, trigger the
//! firmware bootstrap and report what the machine did.
//!
//! Usage: `xt88 [disk-image] [--at] [--vga|--mda]`
//!
//! The runner drives the machine with the built-in idle executor, so no
//! guest code executes; it exists to exercise the substrate end to end
//! and to give frontends a wiring reference.

use std::fs::OpenOptions;
use std::process::ExitCode;

use xt88::machine::{Machine, MachineConfig, VideoKind};

fn main() -> ExitCode {
    env_logger::init();

    let mut config = MachineConfig::default();
    let mut image_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--at" => config.at_keyboard_controller = true,
            "--vga" => config.video = VideoKind::Vga,
            "--mda" => config.video = VideoKind::Mda,
            _ => image_path = Some(arg),
        }
    }

    let mut machine = match Machine::build(config, Box::new(xt88::IdleExecutor::new())) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("failed to assemble machine: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = &image_path {
        let file = match OpenOptions::new().read(true).write(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("cannot open {path}: {e}");
                return ExitCode::FAILURE;
            }
        };
        let drive = 0;
        if let Err(e) = machine.mount(drive, Box::new(file)) {
            eprintln!("cannot mount {path}: {e}");
            return ExitCode::FAILURE;
        }
        machine.set_boot_drive(drive);
        machine.boot();
    }

    // Run one emulated second.
    let frequency = machine.system().frequency();
    let slice = (frequency / 1000) as u32;
    for _ in 0..1000 {
        if let Err(e) = machine.step(slice) {
            eprintln!("step failed: {e}");
            return ExitCode::FAILURE;
        }
    }

    let sys = machine.system();
    let regs = sys.registers();
    println!(
        "cpu: {:?} @ {} Hz  CS:IP={:04X}:{:04X}  DL={:02X}",
        sys.variant(),
        frequency,
        regs.cs,
        regs.ip,
        regs.dl()
    );
    drop(regs);

    if image_path.is_some() {
        print!("boot sector at 0:7C00:");
        for i in 0..16 {
            print!(" {:02X}", sys.read_byte(0x7C00 + i));
        }
        println!();
    }

    println!("devices:");
    for id in 1..sys.peripheral_count() as u8 {
        println!("  {id:2}: {}", sys.peripheral_name(id));
    }

    ExitCode::SUCCESS
}
