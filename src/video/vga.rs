/*!
VGA-compatible adapter: 256 KiB plane-addressable memory behind the
0xA0000-0xBFFFF window, with the sequencer, graphics-controller,
attribute-controller, CRT-controller and DAC register files on ports
0x3C0-0x3CF (+ the CRT pair at 0x3B4/0x3D4).

Reference: https://www.scs.stanford.edu/10wi-cs140/pintos/specs/freevga/vga/vga.htm

Planar writes run the full mode 0-3 pipeline: data rotate, enable
set/reset, logic op against the latches, and bit masking, gated by the
sequencer map mask. Planar reads fill the four latches and return the
read-map-selected plane. Legacy CGA/MDA-style modes bypass the pipeline
and address memory linearly (text and CGA graphics live at +0x18000,
where the 0xB8000 window lands).

The active BIOS mode is snooped from the BIOS data area: the device also
claims the 0x40:0x49 paragraph so mode switches performed by firmware are
visible without an int 10h implementation. A 16 us scanline timer
advances a synthetic scan counter so status-register reads return
plausible retrace/display-enable bits, and a slower timer blinks the
text cursor.
*/

use std::any::Any;

use crate::error::Result;
use crate::peripheral::{DeviceId, MonitorFlags, Peripheral, PeripheralClass};
use crate::ppi::Ppi;
use crate::system::{System, TimerId};
use crate::video::font;
use crate::video::{CGA_PALETTE, ScanlineFn, VideoAdapter, rgba};

const PLANE_SIZE: usize = 0x10000;
const MEMORY_SIZE: usize = 0x40000;
const MEMORY_START: u32 = 0xA0000;

/// Where the 0xB8000 legacy window lands inside the VGA slab.
const CGA_BASE: usize = 0x18000;

const SCANLINE_TIMING_NS: u64 = 16_000;
const CURSOR_TIMING_NS: u64 = 333_333_000;

const BDA_VIDEO_MODE: u32 = 0x449;
const BDA_START: u32 = BDA_VIDEO_MODE & 0xFFFF0;
const BDA_END: u32 = BDA_START + 0xF;

#[inline]
fn wrap(index: usize) -> usize {
    index & (MEMORY_SIZE - 1)
}

/// The default DAC contents: EGA colors, a gray ramp and a 6-level
/// color cube, channels stored as 0xRRGGBB.
fn default_dac_palette() -> [u32; 0x100] {
    let mut palette = [0u32; 0x100];
    palette[..16].copy_from_slice(&CGA_PALETTE);
    for i in 0..16 {
        let v = (i as u32) * 0x11;
        palette[16 + i] = (v << 16) | (v << 8) | v;
    }
    for i in 0..216 {
        let (r, g, b) = (i / 36, (i / 6) % 6, i % 6);
        let scale = |c: usize| (c as u32 * 255 / 5) & 0xFF;
        palette[32 + i] = (scale(r) << 16) | (scale(g) << 8) | scale(b);
    }
    palette
}

struct RegisterFile {
    mode_ctrl_reg: u8,
    color_ctrl_reg: u8,
    feature_ctrl_reg: u8,
    status_reg: u8,
    flip_3c0: bool,

    misc_output: u8,
    vga_enable: u8,
    pixel_mask: u8,

    dac_state: u8,
    pal_rgb: u32,
    pal_read_index: u8,
    pal_read_latch: u8,
    pal_write_index: u8,
    pal_write_latch: u8,

    crt_addr: u8,
    crt_reg: [u8; 0x100],

    attr_addr: u8,
    attr_reg: [u8; 0x100],

    seq_addr: u8,
    seq_reg: [u8; 0x100],

    gfx_addr: u8,
    gfx_reg: [u8; 0x100],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            mode_ctrl_reg: 0,
            color_ctrl_reg: 0,
            feature_ctrl_reg: 0,
            status_reg: 0,
            flip_3c0: false,
            misc_output: 0,
            vga_enable: 0,
            pixel_mask: 0,
            dac_state: 0,
            pal_rgb: 0,
            pal_read_index: 0,
            pal_read_latch: 0,
            pal_write_index: 0,
            pal_write_latch: 0,
            crt_addr: 0,
            crt_reg: [0; 0x100],
            attr_addr: 0,
            attr_reg: [0; 0x100],
            seq_addr: 0,
            seq_reg: [0; 0x100],
            gfx_addr: 0,
            gfx_reg: [0; 0x100],
        }
    }
}

struct Snapshot {
    mem: Box<[u8; MEMORY_SIZE]>,
    palette: [u32; 0x100],
    video_mode: u8,
    color_ctrl: u8,
    cursor: Option<usize>,
    start: usize,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            mem: Box::new([0; MEMORY_SIZE]),
            palette: [0; 0x100],
            video_mode: 3,
            color_ctrl: 0,
            cursor: None,
            start: 0,
        }
    }
}

pub struct Vga {
    mem: Box<[u8; MEMORY_SIZE]>,
    mem_latch: [u8; 4],

    video_mode: u8,
    bda_memory: [u8; 16],

    palette: [u32; 0x100],

    cursor_blink: bool,
    cursor_visible: bool,
    cursor_start: u8,
    cursor_end: u8,
    cursor_offset: usize,

    scanline: u32,
    retrace: u32,
    scanline_timer: TimerId,

    reg: RegisterFile,
    snap: Snapshot,
}

impl Default for Vga {
    fn default() -> Self {
        Self::new()
    }
}

impl Vga {
    pub fn new() -> Self {
        Self {
            mem: Box::new([0; MEMORY_SIZE]),
            mem_latch: [0; 4],
            video_mode: 3,
            bda_memory: [0; 16],
            palette: default_dac_palette(),
            cursor_blink: false,
            cursor_visible: true,
            cursor_start: 0,
            cursor_end: 0,
            cursor_offset: 0,
            scanline: 0,
            retrace: 0,
            scanline_timer: 0,
            reg: RegisterFile::default(),
            snap: Snapshot::default(),
        }
    }

    /// Current BIOS video mode, as snooped from the BDA.
    pub fn video_mode(&self) -> u8 {
        self.video_mode
    }

    #[inline]
    fn planar_mode(&self) -> bool {
        matches!(self.video_mode, 0xD | 0xE | 0x10 | 0x12)
    }

    #[inline]
    fn rotate(&self, mut value: u8) -> u8 {
        for _ in 0..(self.reg.gfx_reg[3] & 7) {
            value = value.rotate_right(1);
        }
        value
    }

    #[inline]
    fn logic_op(&self, value: u8, latch: u8) -> u8 {
        match (self.reg.gfx_reg[3] >> 3) & 3 {
            1 => value & latch,
            2 => value | latch,
            3 => value ^ latch,
            _ => value,
        }
    }

    fn write_planar(&mut self, addr: usize, data: u8) {
        let gr = &self.reg.gfx_reg;
        let bit_mask = gr[8];
        let set_reset = gr[0];
        let enable_set_reset = gr[1];
        let map_mask = self.reg.seq_reg[2] & 0xF;

        match gr[5] & 3 {
            0 => {
                let rotated = self.rotate(data);
                for plane in 0..4 {
                    if map_mask & (1 << plane) == 0 {
                        continue;
                    }
                    let value = if enable_set_reset & (1 << plane) != 0 {
                        if set_reset & (1 << plane) != 0 { 0xFF } else { 0x00 }
                    } else {
                        rotated
                    };
                    let value = self.logic_op(value, self.mem_latch[plane]);
                    self.mem[wrap(addr + PLANE_SIZE * plane)] =
                        (bit_mask & value) | (!bit_mask & self.mem_latch[plane]);
                }
            }
            1 => {
                for plane in 0..4 {
                    if map_mask & (1 << plane) != 0 {
                        self.mem[wrap(addr + PLANE_SIZE * plane)] = self.mem_latch[plane];
                    }
                }
            }
            2 => {
                for plane in 0..4 {
                    if map_mask & (1 << plane) == 0 {
                        continue;
                    }
                    let value = if data & (1 << plane) != 0 { 0xFF } else { 0x00 };
                    let value = self.logic_op(value, self.mem_latch[plane]);
                    self.mem[wrap(addr + PLANE_SIZE * plane)] =
                        (bit_mask & value) | (!bit_mask & self.mem_latch[plane]);
                }
            }
            _ => {
                let value = self.rotate(data) & bit_mask;
                for plane in 0..4 {
                    if map_mask & (1 << plane) == 0 {
                        continue;
                    }
                    let sr = if set_reset & (1 << plane) != 0 { 0xFF } else { 0x00 };
                    self.mem[wrap(addr + PLANE_SIZE * plane)] =
                        (value & sr) | (!value & self.mem_latch[plane]);
                }
            }
        }
    }

    fn text_geometry(&self) -> (usize, usize) {
        match self.snap.video_mode {
            0 | 1 => (40, 25),
            _ => (80, 25),
        }
    }

    fn render_text(&self, f: &mut ScanlineFn) {
        let (columns, rows) = self.text_geometry();
        let width = columns * font::GLYPH_WIDTH;
        let mut row = vec![0u8; width * 4];

        for y in 0..rows * font::GLYPH_HEIGHT {
            let cell_row = y / font::GLYPH_HEIGHT;
            let glyph_line = y % font::GLYPH_HEIGHT;

            for col in 0..columns {
                let index = cell_row * columns + col;
                let cell = CGA_BASE + (self.snap.start + index) * 2;
                let glyph = self.snap.mem[wrap(cell)];
                let attr = self.snap.mem[wrap(cell + 1)];

                let mut bits = font::glyph_row(glyph, glyph_line);
                if self.snap.cursor == Some(index) && glyph_line >= font::GLYPH_HEIGHT - 2 {
                    bits = 0xFF;
                }

                let fg = rgba(self.snap.palette[(attr & 0xF) as usize]);
                let bg = rgba(self.snap.palette[((attr >> 4) & 7) as usize]);
                for x in 0..font::GLYPH_WIDTH {
                    let pixel = if (bits >> x) & 1 != 0 { fg } else { bg };
                    let offset = (col * font::GLYPH_WIDTH + x) * 4;
                    row[offset..offset + 4].copy_from_slice(&pixel);
                }
            }
            f(y, &row);
        }
    }

    fn render_cga_graphics(&self, f: &mut ScanlineFn) {
        let hi_res = self.snap.video_mode == 6;
        let width = if hi_res { 640 } else { 320 };
        let mut row = vec![0u8; width * 4];
        let color_ctrl = self.snap.color_ctrl;
        let intensity = ((color_ctrl >> 4) & 1) * 8;
        let base = if color_ctrl & 0x20 != 0 { [3, 5, 7] } else { [2, 4, 6] };

        for y in 0..200 {
            let bank = CGA_BASE + (y & 1) * 0x2000 + (y >> 1) * 80;
            for x in 0..width {
                let color = if hi_res {
                    let byte = self.snap.mem[wrap(bank + x / 8)];
                    if (byte >> (7 - (x & 7))) & 1 != 0 {
                        (color_ctrl & 0xF) as usize
                    } else {
                        0
                    }
                } else {
                    let byte = self.snap.mem[wrap(bank + x / 4)];
                    let ci = (byte >> (6 - 2 * (x & 3))) & 3;
                    if ci == 0 {
                        (color_ctrl & 0xF) as usize
                    } else {
                        (base[ci as usize - 1] + intensity) as usize
                    }
                };
                row[x * 4..x * 4 + 4].copy_from_slice(&rgba(self.snap.palette[color]));
            }
            f(y, &row);
        }
    }

    fn render_planar(&self, f: &mut ScanlineFn) {
        let (width, height) = self.resolution();
        let stride = width / 8;
        let mut row = vec![0u8; width * 4];

        for y in 0..height {
            for x in 0..width {
                let offset = y * stride + x / 8;
                let bit = 7 - (x & 7);
                let mut color = 0usize;
                for plane in 0..4 {
                    let byte = self.snap.mem[wrap(offset + PLANE_SIZE * plane)];
                    color |= (((byte >> bit) & 1) as usize) << plane;
                }
                row[x * 4..x * 4 + 4].copy_from_slice(&rgba(self.snap.palette[color]));
            }
            f(y, &row);
        }
    }

    fn render_chained_256(&self, f: &mut ScanlineFn) {
        let mut row = vec![0u8; 320 * 4];
        for y in 0..200 {
            for x in 0..320 {
                let color = self.snap.mem[wrap(y * 320 + x)] as usize;
                row[x * 4..x * 4 + 4].copy_from_slice(&rgba(self.snap.palette[color]));
            }
            f(y, &row);
        }
    }
}

impl Peripheral for Vga {
    fn name(&self) -> &'static str {
        "VGA Compatible Device"
    }

    fn class(&self) -> PeripheralClass {
        PeripheralClass::Video
    }

    fn install(&mut self, sys: &mut System, id: DeviceId) -> Result<()> {
        // Flip the XT switch block to "EGA/VGA" so POST agrees with us.
        if let Some(ppi) = sys.find_class(PeripheralClass::Ppi) {
            sys.with_peripheral_mut(ppi, |p| {
                if let Some(ppi) = p.as_any_mut().downcast_mut::<Ppi>() {
                    let switches = ppi.xt_switches();
                    ppi.set_xt_switches(switches & 0xCF);
                }
            });
        }

        sys.install_monitor(id, "Video Mode", MonitorFlags::SIZE_BYTE | MonitorFlags::FORMAT_HEX);

        sys.install_mem(id, MEMORY_START, MEMORY_START + 0x20000 - 1);
        sys.install_mem(id, BDA_START, BDA_END); // BDA video mode snoop

        sys.install_timer(id, CURSOR_TIMING_NS);
        self.scanline_timer = sys.install_timer(id, SCANLINE_TIMING_NS);

        sys.install_io_at(id, 0x3B4); // CRT index (mono)
        sys.install_io_at(id, 0x3D4); // CRT index
        sys.install_io_at(id, 0x3B5); // CRT data (mono)
        sys.install_io_at(id, 0x3D5); // CRT data

        sys.install_io_at(id, 0x3C0); // attribute index
        sys.install_io_at(id, 0x3C1); // attribute data
        sys.install_io_at(id, 0x3C2); // misc output / input status 0
        sys.install_io_at(id, 0x3C3); // VGA enable
        sys.install_io_at(id, 0x3C4); // sequencer index
        sys.install_io_at(id, 0x3C5); // sequencer data
        sys.install_io_at(id, 0x3C6); // pixel mask
        sys.install_io_at(id, 0x3C7); // DAC state / read address
        sys.install_io_at(id, 0x3C8); // DAC write address
        sys.install_io_at(id, 0x3C9); // DAC data
        sys.install_io_at(id, 0x3CA); // feature control
        sys.install_io_at(id, 0x3CC); // misc output read
        sys.install_io_at(id, 0x3CE); // graphics index
        sys.install_io_at(id, 0x3CF); // graphics data

        sys.install_io_at(id, 0x3D8); // mode control
        sys.install_io_at(id, 0x3D9); // color control

        sys.install_io_at(id, 0x3BA); // status (mono)
        sys.install_io_at(id, 0x3DA); // status / feature control

        sys.install_io_at(id, 0xAFFF); // plane system latch
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.reg.mode_ctrl_reg = 1;
        self.reg.color_ctrl_reg = 0x20;
        self.reg.status_reg = 0;
        self.palette = default_dac_palette();
        Ok(())
    }

    fn timer(&mut self, _sys: &System, timer: TimerId, _cycles: u32) -> Result<()> {
        if timer == self.scanline_timer {
            self.reg.status_reg = 6;
            self.reg.status_reg |= if self.retrace == 3 { 1 } else { 0 };
            self.reg.status_reg |= if self.scanline >= 224 { 8 } else { 0 };

            self.retrace += 1;
            if self.retrace == 4 {
                self.retrace = 0;
                self.scanline += 1;
            }
            if self.scanline == 256 {
                self.scanline = 0;
            }
        } else {
            self.cursor_blink = !self.cursor_blink;
        }
        Ok(())
    }

    fn mem_read(&mut self, _sys: &System, addr: u32) -> u8 {
        if (BDA_START..=BDA_END).contains(&addr) {
            if addr == BDA_VIDEO_MODE {
                return self.video_mode;
            }
            return self.bda_memory[(addr - BDA_START) as usize];
        }
        let addr = (addr - MEMORY_START) as usize;

        if self.reg.seq_reg[5] & 8 != 0 {
            log::warn!("read mode 1 is unsupported");
            return 0;
        }

        if !self.planar_mode() || self.reg.seq_reg[4] & 8 != 0 {
            return self.mem[wrap(addr)];
        }

        for plane in 0..4 {
            self.mem_latch[plane] = self.mem[wrap(addr + PLANE_SIZE * plane)];
        }
        self.mem_latch[(self.reg.gfx_reg[4] & 3) as usize]
    }

    fn mem_write(&mut self, _sys: &System, addr: u32, data: u8) {
        if (BDA_START..=BDA_END).contains(&addr) {
            if addr == BDA_VIDEO_MODE {
                if self.video_mode != data {
                    log::info!("switch video mode: {data:#04X}");
                    self.video_mode = data;
                    self.reg.seq_reg[4] = 0; // back to chained addressing
                }
                return;
            }
            self.bda_memory[(addr - BDA_START) as usize] = data;
            return;
        }
        let addr = (addr - MEMORY_START) as usize;

        if !self.planar_mode() || self.reg.seq_reg[4] & 8 != 0 {
            self.mem[wrap(addr)] = data;
            return;
        }

        self.write_planar(addr, data);
    }

    fn io_in(&mut self, _sys: &System, port: u16) -> u8 {
        match port {
            0x3C0 => self.reg.attr_addr,
            0x3C1 => self.reg.attr_reg[self.reg.attr_addr as usize],
            0x3C3 => self.reg.vga_enable,
            0x3C4 => self.reg.seq_addr,
            0x3C5 => self.reg.seq_reg[self.reg.seq_addr as usize],
            0x3C6 => self.reg.pixel_mask,
            0x3C7 => self.reg.dac_state,
            0x3C8 => self.reg.pal_read_index,
            0x3C9 => {
                let index = self.reg.pal_read_index as usize;
                match self.reg.pal_read_latch {
                    0 => {
                        self.reg.pal_read_latch += 1;
                        ((self.palette[index] >> 18) & 0x3F) as u8
                    }
                    1 => {
                        self.reg.pal_read_latch += 1;
                        ((self.palette[index] >> 10) & 0x3F) as u8
                    }
                    _ => {
                        self.reg.pal_read_latch = 0;
                        let value = ((self.palette[index] >> 2) & 0x3F) as u8;
                        self.reg.pal_read_index = self.reg.pal_read_index.wrapping_add(1);
                        value
                    }
                }
            }
            0x3CA => self.reg.feature_ctrl_reg,
            0x3CC => self.reg.misc_output,
            0x3CE => self.reg.gfx_addr,
            0x3CF => self.reg.gfx_reg[self.reg.gfx_addr as usize],
            0x3B4 | 0x3D4 => self.reg.crt_addr,
            0x3B5 | 0x3D5 => self.reg.crt_reg[self.reg.crt_addr as usize],
            0x3D8 => self.reg.mode_ctrl_reg,
            0x3D9 => self.reg.color_ctrl_reg,
            0x3BA | 0x3C2 | 0x3DA => {
                self.reg.flip_3c0 = false;
                self.reg.status_reg
            }
            0xAFFF => self.mem_latch[(self.reg.gfx_addr & 3) as usize],
            _ => 0,
        }
    }

    fn io_out(&mut self, _sys: &System, port: u16, data: u8) {
        match port {
            0x3C0 => {
                if self.reg.flip_3c0 {
                    self.reg.attr_addr = data;
                } else {
                    self.reg.attr_reg[self.reg.attr_addr as usize] = data;
                }
                self.reg.flip_3c0 = !self.reg.flip_3c0;
            }
            0x3C1 => self.reg.attr_reg[self.reg.attr_addr as usize] = data,
            0x3C2 => self.reg.misc_output = data,
            0x3C3 => self.reg.vga_enable = data,
            0x3C4 => self.reg.seq_addr = data,
            0x3C5 => self.reg.seq_reg[self.reg.seq_addr as usize] = data,
            0x3C7 => {
                self.reg.pal_read_index = data;
                self.reg.pal_read_latch = 0;
                self.reg.dac_state = 0;
            }
            0x3C8 => {
                self.reg.pal_write_index = data;
                self.reg.pal_write_latch = 0;
                self.reg.dac_state = 3;
            }
            0x3C9 => {
                let value = (data & 0x3F) as u32;
                match self.reg.pal_write_latch {
                    0 => {
                        self.reg.pal_rgb = value << 18;
                        self.reg.pal_write_latch += 1;
                    }
                    1 => {
                        self.reg.pal_rgb |= value << 10;
                        self.reg.pal_write_latch += 1;
                    }
                    _ => {
                        self.reg.pal_rgb |= value << 2;
                        self.reg.pal_write_latch = 0;
                        self.palette[self.reg.pal_write_index as usize] = self.reg.pal_rgb;
                        self.reg.pal_write_index = self.reg.pal_write_index.wrapping_add(1);
                    }
                }
            }
            0x3CE => self.reg.gfx_addr = data,
            0x3CF => self.reg.gfx_reg[self.reg.gfx_addr as usize] = data,
            0x3B4 | 0x3D4 => self.reg.crt_addr = data,
            0x3B5 | 0x3D5 => {
                self.reg.crt_reg[self.reg.crt_addr as usize] = data;
                match self.reg.crt_addr {
                    0xA => {
                        self.cursor_start = data & 0x1F;
                        self.cursor_visible = data & 0x20 == 0 && self.cursor_start < 16;
                    }
                    0xB => self.cursor_end = data,
                    0xE => {
                        self.cursor_offset =
                            (self.cursor_offset & 0x00FF) | ((data as usize) << 8);
                    }
                    0xF => self.cursor_offset = (self.cursor_offset & 0xFF00) | data as usize,
                    _ => (),
                }
            }
            0x3D8 => self.reg.mode_ctrl_reg = data,
            0x3D9 => self.reg.color_ctrl_reg = data,
            0x3BA | 0x3DA => self.reg.feature_ctrl_reg = data,
            0xAFFF => self.mem_latch[(self.reg.gfx_addr & 3) as usize] = data,
            _ => (),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_video(&mut self) -> Option<&mut dyn VideoAdapter> {
        Some(self)
    }
}

impl VideoAdapter for Vga {
    fn border_color(&self) -> u32 {
        CGA_PALETTE[(self.reg.color_ctrl_reg & 0xF) as usize]
    }

    fn resolution(&self) -> (usize, usize) {
        match self.snap.video_mode {
            0 | 1 | 4 | 5 | 0xD | 0x13 => (320, 200),
            0x10 => (640, 350),
            0x12 => (640, 480),
            _ => (640, 200),
        }
    }

    fn snapshot(&mut self) {
        self.snap.mem.copy_from_slice(self.mem.as_slice());
        self.snap.palette = self.palette;
        self.snap.video_mode = self.video_mode;
        self.snap.color_ctrl = self.reg.color_ctrl_reg;
        self.snap.start =
            ((self.reg.crt_reg[0xC] as usize) << 8 | self.reg.crt_reg[0xD] as usize) & 0x1FFF;
        self.snap.cursor = (self.cursor_visible && self.cursor_blink)
            .then_some(self.cursor_offset.wrapping_sub(self.snap.start) & 0x1FFF);
    }

    fn render(&self, f: &mut ScanlineFn) {
        match self.snap.video_mode {
            4 | 5 | 6 => self.render_cga_graphics(f),
            0xD | 0xE | 0x10 | 0x12 => self.render_planar(f),
            0x13 => self.render_chained_256(f),
            _ => self.render_text(f),
        }
    }
}
