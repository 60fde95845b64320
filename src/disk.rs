/*!
BIOS-replacement disk controller on the non-standard ports 0xB0/0xB1.

Firmware traps int 13h and int 19h into OUT instructions on these ports;
the controller then executes the request directly against host disk
images, honouring the BIOS register conventions (AH = function, DL =
drive, CHS in CX/DH, buffer at ES:BX, status through AH and the carry
flag). Up to 256 drives can be mounted, keyed by DOS drive number
(0x00-0x7F floppy, 0x80+ hard disk); geometry is inferred from the image
size at mount time.

Port 0xB0 triggers the bootstrap: the boot drive's MBR is read to
linear 0x07C00 and DL is set for the firmware. Reading 0xB0 reports the
boot drive kind with the inverted sense firmware expects (0 when a hard
disk boots, 0xFF otherwise). Every access inserts 1000 CPU wait states to
model controller latency.

Host images are anything `Read + Write + Seek`; every transferred sector
also reports the drive number through an optional activity callback.
*/

use std::any::Any;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::cpu::{Flags, linear};
use crate::error::{Error, Result};
use crate::peripheral::{DeviceId, Peripheral, PeripheralClass};
use crate::system::System;

pub const SECTOR_SIZE: usize = 512;

/// Wait states inserted on every controller access.
const WAIT_STATES: u32 = 1000;

/// Largest image still treated as a floppy.
const MAX_FLOPPY_SIZE: u64 = 1_474_560;

/// Host-side disk image contract.
pub trait DiskImage: Read + Write + Seek {}

impl<T: Read + Write + Seek> DiskImage for T {}

/// Activity notification: drive number of each transferred request.
pub type ActivityCallback = Box<dyn FnMut(u8)>;

struct Drive {
    image: Box<dyn DiskImage>,
    is_hd: bool,

    cylinders: u16,
    sectors: u16,
    heads: u16,

    // Sticky BIOS status of the last operation.
    ah: u8,
    cf: bool,
}

pub struct DiskController {
    boot_drive: u8,
    num_hd: u8,
    activity: Option<ActivityCallback>,
    drives: Vec<Option<Drive>>,
}

impl Default for DiskController {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskController {
    pub fn new() -> Self {
        Self {
            boot_drive: 0,
            num_hd: 0,
            activity: None,
            drives: (0..0x100).map(|_| None).collect(),
        }
    }

    pub fn set_activity_callback(&mut self, cb: ActivityCallback) {
        self.activity = Some(cb);
    }

    pub fn set_boot_drive(&mut self, num: u8) {
        self.boot_drive = num;
    }

    pub fn boot_drive(&self) -> u8 {
        self.boot_drive
    }

    /// Mount `image` as drive `num`, deriving CHS geometry from its
    /// size. Remounting an occupied slot unmounts the old image first.
    pub fn mount(&mut self, num: u8, mut image: Box<dyn DiskImage>) -> Result<()> {
        let size = image.seek(SeekFrom::End(0))?;
        image.seek(SeekFrom::Start(0))?;

        if size > MAX_FLOPPY_SIZE && num < 0x80 {
            log::error!("image too large for floppy drive {num:#04X}, expected 0x80+");
            return Err(Error::User(4));
        }

        self.unmount(num);

        let mut drive = Drive {
            image,
            is_hd: num >= 0x80,
            cylinders: 80,
            sectors: 18,
            heads: 2,
            ah: 0,
            cf: false,
        };

        if drive.is_hd {
            drive.cylinders = (size / (63 * 16 * SECTOR_SIZE as u64)) as u16;
            drive.sectors = 63;
            drive.heads = 16;
            self.num_hd += 1;
        } else {
            if size <= 1_228_800 {
                drive.sectors = 15;
            }
            if size <= 737_280 {
                drive.sectors = 9;
            }
            if size <= 368_640 {
                drive.cylinders = 40;
                drive.sectors = 9;
            }
            if size <= 163_840 {
                drive.cylinders = 40;
                drive.sectors = 8;
                drive.heads = 1;
            }
        }

        self.drives[num as usize] = Some(drive);
        Ok(())
    }

    /// Unmount drive `num`; returns whether a disk was present.
    pub fn unmount(&mut self, num: u8) -> bool {
        match self.drives[num as usize].take() {
            Some(d) => {
                if d.is_hd {
                    self.num_hd -= 1;
                }
                true
            }
            None => false,
        }
    }

    /// Transfer up to `count` sectors between the image and guest
    /// memory. Returns the number of complete sectors moved.
    #[allow(clippy::too_many_arguments)]
    fn execute_operation(
        &mut self,
        sys: &System,
        disk: u8,
        read: bool,
        mut addr: u32,
        cylinder: u16,
        sector: u16,
        head: u16,
        count: u8,
    ) -> u8 {
        if sector == 0 {
            return 0;
        }
        let Some(drive) = self.drives[disk as usize].as_mut() else {
            return 0;
        };

        let lba = (cylinder as u64 * drive.heads as u64 + head as u64) * drive.sectors as u64
            + sector as u64
            - 1;
        if drive.image.seek(SeekFrom::Start(lba * SECTOR_SIZE as u64)).is_err() {
            return 0;
        }
        if let Some(cb) = self.activity.as_mut() {
            cb(disk);
        }

        let mut buffer = [0u8; SECTOR_SIZE];
        let mut transferred = 0u8;
        while transferred < count {
            if read {
                if drive.image.read_exact(&mut buffer).is_err() {
                    break;
                }
                for &b in &buffer {
                    sys.write_byte(addr, b);
                    addr = addr.wrapping_add(1);
                }
            } else {
                for b in &mut buffer {
                    *b = sys.read_byte(addr);
                    addr = addr.wrapping_add(1);
                }
                if drive.image.write_all(&buffer).is_err() {
                    break;
                }
            }
            transferred += 1;
        }

        if !read {
            let _ = drive.image.flush();
        }
        transferred
    }

    /// Run a read or write per the int 13h register convention and set
    /// the BIOS result registers.
    fn execute_and_set(&mut self, sys: &System, read: bool) {
        let (dl, al, ch, cl, dh, es, bx) = {
            let r = sys.registers();
            (r.dl(), r.al(), r.ch(), r.cl(), r.dh(), r.es, r.bx)
        };

        if self.drives[dl as usize].is_none() {
            let mut r = sys.registers_mut();
            r.set_ah(1);
            r.flags.insert(Flags::CARRY);
            return;
        }

        let cylinder = ch as u16 + (cl as u16 / 64) * 256;
        let sector = (cl & 0x3F) as u16;
        let transferred =
            self.execute_operation(sys, dl, read, linear(es, bx), cylinder, sector, dh as u16, al);

        let mut r = sys.registers_mut();
        r.set_al(transferred);
        r.set_ah(0);
        r.flags.remove(Flags::CARRY);
    }

    /// Load the boot drive's MBR to linear 0x07C00 and hand the drive
    /// number to the firmware in DL.
    fn bootstrap(&mut self, sys: &System) {
        let boot = self.boot_drive;
        if self.drives[boot as usize].is_none() {
            log::error!("no bootdrive");
            return;
        }

        sys.registers_mut().set_dl(boot);
        let loaded = self.execute_operation(sys, boot, true, linear(0, 0x7C00), 0, 1, 0, 1);
        sys.registers_mut().set_al(loaded);
    }

    fn handle_request(&mut self, sys: &System) {
        let (dl, ah) = {
            let r = sys.registers();
            (r.dl(), r.ah())
        };

        match ah {
            // Reset.
            0 => {
                let mut r = sys.registers_mut();
                r.set_ah(0);
                r.flags.remove(Flags::CARRY);
            }
            // Return status of last operation.
            1 => {
                let (ah, cf) = self.drives[dl as usize]
                    .as_ref()
                    .map_or((1, true), |d| (d.ah, d.cf));
                let mut r = sys.registers_mut();
                r.set_ah(ah);
                r.flags.set(Flags::CARRY, cf);
                return;
            }
            // Read / write sectors.
            2 => self.execute_and_set(sys, true),
            3 => self.execute_and_set(sys, false),
            // Format track / verify: report success.
            4 | 5 => {
                let mut r = sys.registers_mut();
                r.set_ah(0);
                r.flags.remove(Flags::CARRY);
            }
            // Drive parameters.
            8 => match self.drives[dl as usize].as_ref() {
                None => {
                    let mut r = sys.registers_mut();
                    r.set_ah(0xAA);
                    r.flags.insert(Flags::CARRY);
                }
                Some(d) => {
                    let mut r = sys.registers_mut();
                    r.set_ah(0);
                    r.flags.remove(Flags::CARRY);
                    r.set_ch((d.cylinders - 1) as u8);
                    r.set_cl(((d.sectors & 0x3F) + (d.cylinders / 256) * 64) as u8);
                    r.set_dh((d.heads - 1) as u8);
                    if dl < 0x80 {
                        r.set_bl(4); // 1.44M drive type
                        r.set_dl(2);
                    } else {
                        r.set_dl(self.num_hd);
                    }
                }
            },
            _ => {
                sys.registers_mut().flags.insert(Flags::CARRY);
            }
        }

        // Latch sticky status and mirror hard-disk status into the BDA.
        let (ah, cf) = {
            let r = sys.registers();
            (r.ah(), r.flags.contains(Flags::CARRY))
        };
        if let Some(d) = self.drives[dl as usize].as_mut() {
            d.ah = ah;
            d.cf = cf;
            if d.is_hd {
                sys.write_byte(linear(0x40, 0x74), ah);
            }
        }
    }
}

impl Peripheral for DiskController {
    fn name(&self) -> &'static str {
        "Disk Controller"
    }

    fn class(&self) -> PeripheralClass {
        PeripheralClass::Disk
    }

    fn install(&mut self, sys: &mut System, id: DeviceId) -> Result<()> {
        sys.install_io(id, 0xB0, 0xB1);
        self.boot_drive = 0;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        for drive in self.drives.iter_mut().flatten() {
            drive.ah = 0;
            drive.cf = false;
        }
        Ok(())
    }

    fn io_in(&mut self, sys: &System, port: u16) -> u8 {
        match port {
            // Inverted sense by firmware convention.
            0xB0 => {
                if self.boot_drive >= 0x80 {
                    0
                } else {
                    0xFF
                }
            }
            0xB1 => {
                let dl = sys.registers().dl();
                if self.drives[dl as usize].is_some() { 0 } else { 0xFF }
            }
            _ => 0xFF,
        }
    }

    fn io_out(&mut self, sys: &System, port: u16, _data: u8) {
        // Controller latency.
        sys.wait(WAIT_STATES);

        match port {
            0xB0 => self.bootstrap(sys),
            0xB1 => self.handle_request(sys),
            _ => (),
        }
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
    use std::io::Cursor;

    fn image(size: usize) -> Box<dyn DiskImage> {
        let mut data = vec![0u8; size];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i / SECTOR_SIZE) as u8;
        }
        Box::new(Cursor::new(data))
    }

    #[test]
    fn floppy_geometry_from_size() {
        let mut disk = DiskController::new();
        disk.mount(0, image(163_840)).unwrap();
        disk.mount(1, image(368_640)).unwrap();
        disk.mount(2, image(737_280)).unwrap();
        disk.mount(3, image(1_228_800)).unwrap();
        disk.mount(4, image(1_474_560)).unwrap();

        let geo = |n: usize| {
            let d = disk.drives[n].as_ref().unwrap();
            (d.cylinders, d.heads, d.sectors)
        };
        assert_eq!(geo(0), (40, 1, 8));
        assert_eq!(geo(1), (40, 2, 9));
        assert_eq!(geo(2), (80, 2, 9));
        assert_eq!(geo(3), (80, 2, 15));
        assert_eq!(geo(4), (80, 2, 18));
    }

    #[test]
    fn hard_disk_geometry_from_size() {
        let mut disk = DiskController::new();
        let cylinders = 20u64;
        disk.mount(0x80, image((cylinders * 63 * 16 * 512) as usize))
            .unwrap();
        let d = disk.drives[0x80].as_ref().unwrap();
        assert!(d.is_hd);
        assert_eq!((d.cylinders, d.heads, d.sectors), (20, 16, 63));
    }

    #[test]
    fn oversized_floppy_is_rejected() {
        let mut disk = DiskController::new();
        assert!(matches!(
            disk.mount(0, image(2_000_000)),
            Err(Error::User(4))
        ));
    }

    #[test]
    fn boot_port_read_has_inverted_sense() {
        let sys = crate::test_utils::bare_system();
        let mut disk = DiskController::new();
        disk.set_boot_drive(0);
        assert_eq!(disk.io_in(&sys, 0xB0), 0xFF);
        disk.set_boot_drive(0x80);
        assert_eq!(disk.io_in(&sys, 0xB0), 0);
    }

    #[test]
    fn mount_against_temp_file() {
        use std::io::Write as _;

        let mut f = tempfile::tempfile().unwrap();
        f.write_all(&vec![0x42u8; 163_840]).unwrap();
        let mut disk = DiskController::new();
        disk.mount(0, Box::new(f)).unwrap();
        assert!(disk.unmount(0));
        assert!(!disk.unmount(0));
    }
}
