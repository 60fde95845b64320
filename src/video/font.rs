//! CP437 8x8 font ROM shared by the text renderers.
//!
//! One row per byte, top to bottom, leftmost pixel in bit 0. The ASCII
//! block carries the full glyph set; accented and Greek code points fall
//! back on their base letters, which keeps text legible without carrying
//! a second ROM image.

/// Glyph height in scanlines.
pub const GLYPH_HEIGHT: usize = 8;

/// Glyph width in pixels.
pub const GLYPH_WIDTH: usize = 8;

#[rustfmt::skip]
pub const FONT_8X8: [[u8; 8]; 256] = [
    // 0x00-0x07: control pictures
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // 0x00
    [0x3C, 0x42, 0xA5, 0x81, 0xA5, 0x99, 0x42, 0x3C], // 0x01 smiley
    [0x3C, 0x7E, 0xDB, 0xFF, 0xDB, 0xE7, 0x7E, 0x3C], // 0x02 inverse smiley
    [0x36, 0x7F, 0x7F, 0x7F, 0x3E, 0x1C, 0x08, 0x00], // 0x03 heart
    [0x08, 0x1C, 0x3E, 0x7F, 0x3E, 0x1C, 0x08, 0x00], // 0x04 diamond
    [0x1C, 0x1C, 0x7F, 0x7F, 0x6B, 0x08, 0x1C, 0x00], // 0x05 club
    [0x08, 0x1C, 0x3E, 0x7F, 0x7F, 0x08, 0x1C, 0x00], // 0x06 spade
    [0x00, 0x18, 0x3C, 0x3C, 0x18, 0x00, 0x00, 0x00], // 0x07 bullet
    [0xFF, 0xE7, 0xC3, 0xC3, 0xE7, 0xFF, 0xFF, 0xFF], // 0x08
    [0x00, 0x3C, 0x66, 0x42, 0x42, 0x66, 0x3C, 0x00], // 0x09
    [0xFF, 0xC3, 0x99, 0xBD, 0xBD, 0x99, 0xC3, 0xFF], // 0x0A
    [0x70, 0x60, 0x7E, 0x33, 0x33, 0x33, 0x1E, 0x00], // 0x0B
    [0x3C, 0x66, 0x66, 0x3C, 0x18, 0x7E, 0x18, 0x00], // 0x0C
    [0x30, 0x70, 0x50, 0x10, 0x10, 0x1E, 0x0E, 0x00], // 0x0D note
    [0x7C, 0x44, 0x7C, 0x44, 0x44, 0x46, 0x66, 0x00], // 0x0E notes
    [0x18, 0xDB, 0x3C, 0xE7, 0x3C, 0xDB, 0x18, 0x00], // 0x0F sun
    [0x02, 0x0E, 0x3E, 0xFE, 0x3E, 0x0E, 0x02, 0x00], // 0x10 right triangle
    [0x40, 0x70, 0x7C, 0x7F, 0x7C, 0x70, 0x40, 0x00], // 0x11 left triangle
    [0x18, 0x3C, 0x7E, 0x18, 0x18, 0x7E, 0x3C, 0x18], // 0x12 up/down arrow
    [0x66, 0x66, 0x66, 0x66, 0x66, 0x00, 0x66, 0x00], // 0x13 double bang
    [0xFE, 0xDB, 0xDB, 0xDE, 0xD8, 0xD8, 0xD8, 0x00], // 0x14 pilcrow
    [0x7C, 0x06, 0x3C, 0x66, 0x3C, 0x60, 0x3E, 0x00], // 0x15 section
    [0x00, 0x00, 0x00, 0x00, 0x7E, 0x7E, 0x7E, 0x00], // 0x16
    [0x18, 0x3C, 0x7E, 0x18, 0x7E, 0x3C, 0x18, 0xFF], // 0x17
    [0x18, 0x3C, 0x7E, 0x18, 0x18, 0x18, 0x18, 0x00], // 0x18 up arrow
    [0x18, 0x18, 0x18, 0x18, 0x7E, 0x3C, 0x18, 0x00], // 0x19 down arrow
    [0x00, 0x18, 0x30, 0x7F, 0x30, 0x18, 0x00, 0x00], // 0x1A right arrow
    [0x00, 0x0C, 0x06, 0x7F, 0x06, 0x0C, 0x00, 0x00], // 0x1B left arrow
    [0x00, 0x00, 0x03, 0x03, 0x3F, 0x00, 0x00, 0x00], // 0x1C
    [0x00, 0x24, 0x66, 0xFF, 0x66, 0x24, 0x00, 0x00], // 0x1D left/right arrow
    [0x00, 0x18, 0x3C, 0x7E, 0xFF, 0xFF, 0x00, 0x00], // 0x1E up triangle
    [0x00, 0xFF, 0xFF, 0x7E, 0x3C, 0x18, 0x00, 0x00], // 0x1F down triangle
    // 0x20-0x7F: ASCII
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // 0x20 ' '
    [0x18, 0x3C, 0x3C, 0x18, 0x18, 0x00, 0x18, 0x00], // 0x21 '!'
    [0x36, 0x36, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // 0x22 '"'
    [0x36, 0x36, 0x7F, 0x36, 0x7F, 0x36, 0x36, 0x00], // 0x23 '#'
    [0x0C, 0x3E, 0x03, 0x1E, 0x30, 0x1F, 0x0C, 0x00], // 0x24 '$'
    [0x00, 0x63, 0x33, 0x18, 0x0C, 0x66, 0x63, 0x00], // 0x25 '%'
    [0x1C, 0x36, 0x1C, 0x6E, 0x3B, 0x33, 0x6E, 0x00], // 0x26 '&'
    [0x06, 0x06, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00], // 0x27 '\''
    [0x18, 0x0C, 0x06, 0x06, 0x06, 0x0C, 0x18, 0x00], // 0x28 '('
    [0x06, 0x0C, 0x18, 0x18, 0x18, 0x0C, 0x06, 0x00], // 0x29 ')'
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // 0x2A '*'
    [0x00, 0x0C, 0x0C, 0x3F, 0x0C, 0x0C, 0x00, 0x00], // 0x2B '+'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x06], // 0x2C ','
    [0x00, 0x00, 0x00, 0x3F, 0x00, 0x00, 0x00, 0x00], // 0x2D '-'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x00], // 0x2E '.'
    [0x60, 0x30, 0x18, 0x0C, 0x06, 0x03, 0x01, 0x00], // 0x2F '/'
    [0x3E, 0x63, 0x73, 0x7B, 0x6F, 0x67, 0x3E, 0x00], // 0x30 '0'
    [0x0C, 0x0E, 0x0C, 0x0C, 0x0C, 0x0C, 0x3F, 0x00], // 0x31 '1'
    [0x1E, 0x33, 0x30, 0x1C, 0x06, 0x33, 0x3F, 0x00], // 0x32 '2'
    [0x1E, 0x33, 0x30, 0x1C, 0x30, 0x33, 0x1E, 0x00], // 0x33 '3'
    [0x38, 0x3C, 0x36, 0x33, 0x7F, 0x30, 0x78, 0x00], // 0x34 '4'
    [0x3F, 0x03, 0x1F, 0x30, 0x30, 0x33, 0x1E, 0x00], // 0x35 '5'
    [0x1C, 0x06, 0x03, 0x1F, 0x33, 0x33, 0x1E, 0x00], // 0x36 '6'
    [0x3F, 0x33, 0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x00], // 0x37 '7'
    [0x1E, 0x33, 0x33, 0x1E, 0x33, 0x33, 0x1E, 0x00], // 0x38 '8'
    [0x1E, 0x33, 0x33, 0x3E, 0x30, 0x18, 0x0E, 0x00], // 0x39 '9'
    [0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x00], // 0x3A ':'
    [0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x06], // 0x3B ';'
    [0x18, 0x0C, 0x06, 0x03, 0x06, 0x0C, 0x18, 0x00], // 0x3C '<'
    [0x00, 0x00, 0x3F, 0x00, 0x00, 0x3F, 0x00, 0x00], // 0x3D '='
    [0x06, 0x0C, 0x18, 0x30, 0x18, 0x0C, 0x06, 0x00], // 0x3E '>'
    [0x1E, 0x33, 0x30, 0x18, 0x0C, 0x00, 0x0C, 0x00], // 0x3F '?'
    [0x3E, 0x63, 0x7B, 0x7B, 0x7B, 0x03, 0x1E, 0x00], // 0x40 '@'
    [0x0C, 0x1E, 0x33, 0x33, 0x3F, 0x33, 0x33, 0x00], // 0x41 'A'
    [0x3F, 0x66, 0x66, 0x3E, 0x66, 0x66, 0x3F, 0x00], // 0x42 'B'
    [0x3C, 0x66, 0x03, 0x03, 0x03, 0x66, 0x3C, 0x00], // 0x43 'C'
    [0x1F, 0x36, 0x66, 0x66, 0x66, 0x36, 0x1F, 0x00], // 0x44 'D'
    [0x7F, 0x46, 0x16, 0x1E, 0x16, 0x46, 0x7F, 0x00], // 0x45 'E'
    [0x7F, 0x46, 0x16, 0x1E, 0x16, 0x06, 0x0F, 0x00], // 0x46 'F'
    [0x3C, 0x66, 0x03, 0x03, 0x73, 0x66, 0x7C, 0x00], // 0x47 'G'
    [0x33, 0x33, 0x33, 0x3F, 0x33, 0x33, 0x33, 0x00], // 0x48 'H'
    [0x1E, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 0x49 'I'
    [0x78, 0x30, 0x30, 0x30, 0x33, 0x33, 0x1E, 0x00], // 0x4A 'J'
    [0x67, 0x66, 0x36, 0x1E, 0x36, 0x66, 0x67, 0x00], // 0x4B 'K'
    [0x0F, 0x06, 0x06, 0x06, 0x46, 0x66, 0x7F, 0x00], // 0x4C 'L'
    [0x63, 0x77, 0x7F, 0x7F, 0x6B, 0x63, 0x63, 0x00], // 0x4D 'M'
    [0x63, 0x67, 0x6F, 0x7B, 0x73, 0x63, 0x63, 0x00], // 0x4E 'N'
    [0x1C, 0x36, 0x63, 0x63, 0x63, 0x36, 0x1C, 0x00], // 0x4F 'O'
    [0x3F, 0x66, 0x66, 0x3E, 0x06, 0x06, 0x0F, 0x00], // 0x50 'P'
    [0x1E, 0x33, 0x33, 0x33, 0x3B, 0x1E, 0x38, 0x00], // 0x51 'Q'
    [0x3F, 0x66, 0x66, 0x3E, 0x36, 0x66, 0x67, 0x00], // 0x52 'R'
    [0x1E, 0x33, 0x07, 0x0E, 0x38, 0x33, 0x1E, 0x00], // 0x53 'S'
    [0x3F, 0x2D, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 0x54 'T'
    [0x33, 0x33, 0x33, 0x33, 0x33, 0x33, 0x3F, 0x00], // 0x55 'U'
    [0x33, 0x33, 0x33, 0x33, 0x33, 0x1E, 0x0C, 0x00], // 0x56 'V'
    [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00], // 0x57 'W'
    [0x63, 0x63, 0x36, 0x1C, 0x1C, 0x36, 0x63, 0x00], // 0x58 'X'
    [0x33, 0x33, 0x33, 0x1E, 0x0C, 0x0C, 0x1E, 0x00], // 0x59 'Y'
    [0x7F, 0x63, 0x31, 0x18, 0x4C, 0x66, 0x7F, 0x00], // 0x5A 'Z'
    [0x1E, 0x06, 0x06, 0x06, 0x06, 0x06, 0x1E, 0x00], // 0x5B '['
    [0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x40, 0x00], // 0x5C '\\'
    [0x1E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x1E, 0x00], // 0x5D ']'
    [0x08, 0x1C, 0x36, 0x63, 0x00, 0x00, 0x00, 0x00], // 0x5E '^'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF], // 0x5F '_'
    [0x0C, 0x0C, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00], // 0x60 '`'
    [0x00, 0x00, 0x1E, 0x30, 0x3E, 0x33, 0x6E, 0x00], // 0x61 'a'
    [0x07, 0x06, 0x06, 0x3E, 0x66, 0x66, 0x3B, 0x00], // 0x62 'b'
    [0x00, 0x00, 0x1E, 0x33, 0x03, 0x33, 0x1E, 0x00], // 0x63 'c'
    [0x38, 0x30, 0x30, 0x3E, 0x33, 0x33, 0x6E, 0x00], // 0x64 'd'
    [0x00, 0x00, 0x1E, 0x33, 0x3F, 0x03, 0x1E, 0x00], // 0x65 'e'
    [0x1C, 0x36, 0x06, 0x0F, 0x06, 0x06, 0x0F, 0x00], // 0x66 'f'
    [0x00, 0x00, 0x6E, 0x33, 0x33, 0x3E, 0x30, 0x1F], // 0x67 'g'
    [0x07, 0x06, 0x36, 0x6E, 0x66, 0x66, 0x67, 0x00], // 0x68 'h'
    [0x0C, 0x00, 0x0E, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 0x69 'i'
    [0x30, 0x00, 0x30, 0x30, 0x30, 0x33, 0x33, 0x1E], // 0x6A 'j'
    [0x07, 0x06, 0x66, 0x36, 0x1E, 0x36, 0x67, 0x00], // 0x6B 'k'
    [0x0E, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 0x6C 'l'
    [0x00, 0x00, 0x33, 0x7F, 0x7F, 0x6B, 0x63, 0x00], // 0x6D 'm'
    [0x00, 0x00, 0x1F, 0x33, 0x33, 0x33, 0x33, 0x00], // 0x6E 'n'
    [0x00, 0x00, 0x1E, 0x33, 0x33, 0x33, 0x1E, 0x00], // 0x6F 'o'
    [0x00, 0x00, 0x3B, 0x66, 0x66, 0x3E, 0x06, 0x0F], // 0x70 'p'
    [0x00, 0x00, 0x6E, 0x33, 0x33, 0x3E, 0x30, 0x78], // 0x71 'q'
    [0x00, 0x00, 0x3B, 0x6E, 0x66, 0x06, 0x0F, 0x00], // 0x72 'r'
    [0x00, 0x00, 0x3E, 0x03, 0x1E, 0x30, 0x1F, 0x00], // 0x73 's'
    [0x08, 0x0C, 0x3E, 0x0C, 0x0C, 0x2C, 0x18, 0x00], // 0x74 't'
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x33, 0x6E, 0x00], // 0x75 'u'
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x1E, 0x0C, 0x00], // 0x76 'v'
    [0x00, 0x00, 0x63, 0x6B, 0x7F, 0x7F, 0x36, 0x00], // 0x77 'w'
    [0x00, 0x00, 0x63, 0x36, 0x1C, 0x36, 0x63, 0x00], // 0x78 'x'
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x3E, 0x30, 0x1F], // 0x79 'y'
    [0x00, 0x00, 0x3F, 0x19, 0x0C, 0x26, 0x3F, 0x00], // 0x7A 'z'
    [0x38, 0x0C, 0x0C, 0x07, 0x0C, 0x0C, 0x38, 0x00], // 0x7B '{'
    [0x18, 0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x00], // 0x7C '|'
    [0x07, 0x0C, 0x0C, 0x38, 0x0C, 0x0C, 0x07, 0x00], // 0x7D '}'
    [0x6E, 0x3B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // 0x7E '~'
    [0x08, 0x1C, 0x36, 0x63, 0x63, 0x63, 0x7F, 0x00], // 0x7F house
    // 0x80-0xAF: accented block (base-letter fallbacks)
    [0x3C, 0x66, 0x03, 0x03, 0x03, 0x66, 0x3C, 0x30], // 0x80 C-cedilla
    [0x00, 0x33, 0x00, 0x33, 0x33, 0x33, 0x6E, 0x00], // 0x81 u-umlaut
    [0x18, 0x0C, 0x1E, 0x33, 0x3F, 0x03, 0x1E, 0x00], // 0x82 e-acute
    [0x1C, 0x36, 0x1E, 0x30, 0x3E, 0x33, 0x6E, 0x00], // 0x83 a-circumflex
    [0x00, 0x33, 0x1E, 0x30, 0x3E, 0x33, 0x6E, 0x00], // 0x84 a-umlaut
    [0x06, 0x0C, 0x1E, 0x30, 0x3E, 0x33, 0x6E, 0x00], // 0x85 a-grave
    [0x0C, 0x0C, 0x1E, 0x30, 0x3E, 0x33, 0x6E, 0x00], // 0x86 a-ring
    [0x00, 0x00, 0x1E, 0x33, 0x03, 0x33, 0x1E, 0x30], // 0x87 c-cedilla
    [0x1C, 0x36, 0x1E, 0x33, 0x3F, 0x03, 0x1E, 0x00], // 0x88 e-circumflex
    [0x00, 0x33, 0x1E, 0x33, 0x3F, 0x03, 0x1E, 0x00], // 0x89 e-umlaut
    [0x06, 0x0C, 0x1E, 0x33, 0x3F, 0x03, 0x1E, 0x00], // 0x8A e-grave
    [0x00, 0x33, 0x0E, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 0x8B i-umlaut
    [0x1C, 0x36, 0x0E, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 0x8C i-circumflex
    [0x06, 0x0C, 0x0E, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 0x8D i-grave
    [0x33, 0x0C, 0x1E, 0x33, 0x3F, 0x33, 0x33, 0x00], // 0x8E A-umlaut
    [0x0C, 0x0C, 0x1E, 0x33, 0x3F, 0x33, 0x33, 0x00], // 0x8F A-ring
    [0x18, 0x0C, 0x7F, 0x46, 0x1E, 0x46, 0x7F, 0x00], // 0x90 E-acute
    [0x00, 0x00, 0x7E, 0xD8, 0xFE, 0x1B, 0x76, 0x00], // 0x91 ae
    [0x7C, 0x1B, 0x1B, 0x7F, 0x1B, 0x1B, 0x7B, 0x00], // 0x92 AE
    [0x1C, 0x36, 0x1E, 0x33, 0x33, 0x33, 0x1E, 0x00], // 0x93 o-circumflex
    [0x00, 0x33, 0x1E, 0x33, 0x33, 0x33, 0x1E, 0x00], // 0x94 o-umlaut
    [0x06, 0x0C, 0x1E, 0x33, 0x33, 0x33, 0x1E, 0x00], // 0x95 o-grave
    [0x1C, 0x36, 0x33, 0x33, 0x33, 0x33, 0x6E, 0x00], // 0x96 u-circumflex
    [0x06, 0x0C, 0x33, 0x33, 0x33, 0x33, 0x6E, 0x00], // 0x97 u-grave
    [0x00, 0x33, 0x33, 0x33, 0x3E, 0x30, 0x1F, 0x00], // 0x98 y-umlaut
    [0x33, 0x1C, 0x36, 0x63, 0x63, 0x36, 0x1C, 0x00], // 0x99 O-umlaut
    [0x33, 0x00, 0x33, 0x33, 0x33, 0x33, 0x3F, 0x00], // 0x9A U-umlaut
    [0x00, 0x00, 0x5E, 0x3B, 0x6B, 0x6E, 0x3D, 0x00], // 0x9B cent
    [0x1C, 0x36, 0x06, 0x0F, 0x06, 0x67, 0x3F, 0x00], // 0x9C pound
    [0x5C, 0x36, 0x73, 0x7B, 0x6F, 0x36, 0x1D, 0x00], // 0x9D yen
    [0x00, 0x00, 0x1B, 0x36, 0x6C, 0x36, 0x1B, 0x00], // 0x9E
    [0x70, 0xD8, 0x18, 0x3C, 0x18, 0x18, 0x1B, 0x0E], // 0x9F florin
    [0x18, 0x0C, 0x1E, 0x30, 0x3E, 0x33, 0x6E, 0x00], // 0xA0 a-acute
    [0x18, 0x0C, 0x0E, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 0xA1 i-acute
    [0x18, 0x0C, 0x1E, 0x33, 0x33, 0x33, 0x1E, 0x00], // 0xA2 o-acute
    [0x18, 0x0C, 0x33, 0x33, 0x33, 0x33, 0x6E, 0x00], // 0xA3 u-acute
    [0x6E, 0x3B, 0x1F, 0x33, 0x33, 0x33, 0x33, 0x00], // 0xA4 n-tilde
    [0x6E, 0x3B, 0x63, 0x67, 0x6F, 0x7B, 0x73, 0x00], // 0xA5 N-tilde
    [0x3C, 0x36, 0x36, 0x7C, 0x00, 0x7E, 0x00, 0x00], // 0xA6 ordfeminine
    [0x1C, 0x36, 0x36, 0x1C, 0x00, 0x3E, 0x00, 0x00], // 0xA7 ordmasculine
    [0x0C, 0x00, 0x0C, 0x06, 0x03, 0x33, 0x1E, 0x00], // 0xA8 inverted ?
    [0x00, 0x00, 0x00, 0x3F, 0x03, 0x03, 0x00, 0x00], // 0xA9
    [0x00, 0x00, 0x00, 0x3F, 0x30, 0x30, 0x00, 0x00], // 0xAA
    [0x43, 0x33, 0x18, 0x0C, 0x66, 0x73, 0x19, 0x0F], // 0xAB 1/2
    [0x43, 0x33, 0x18, 0x4C, 0x66, 0x7B, 0x61, 0x40], // 0xAC 1/4
    [0x0C, 0x00, 0x0C, 0x0C, 0x1E, 0x1E, 0x0C, 0x00], // 0xAD inverted !
    [0x00, 0x66, 0x33, 0x19, 0x33, 0x66, 0x00, 0x00], // 0xAE <<
    [0x00, 0x33, 0x66, 0x4C, 0x66, 0x33, 0x00, 0x00], // 0xAF >>
    // 0xB0-0xDF: shades, box drawing, blocks
    [0x11, 0x44, 0x11, 0x44, 0x11, 0x44, 0x11, 0x44], // 0xB0 light shade
    [0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA], // 0xB1 medium shade
    [0xEE, 0xBB, 0xEE, 0xBB, 0xEE, 0xBB, 0xEE, 0xBB], // 0xB2 dark shade
    [0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18], // 0xB3 vertical
    [0x18, 0x18, 0x18, 0x1F, 0x18, 0x18, 0x18, 0x18], // 0xB4 vertical+left
    [0x18, 0x18, 0x1F, 0x18, 0x1F, 0x18, 0x18, 0x18], // 0xB5
    [0x6C, 0x6C, 0x6C, 0x6F, 0x6C, 0x6C, 0x6C, 0x6C], // 0xB6
    [0x00, 0x00, 0x00, 0x6F, 0x6C, 0x6C, 0x6C, 0x6C], // 0xB7
    [0x00, 0x00, 0x1F, 0x18, 0x1F, 0x18, 0x18, 0x18], // 0xB8
    [0x6C, 0x6C, 0x6F, 0x60, 0x6F, 0x6C, 0x6C, 0x6C], // 0xB9
    [0x6C, 0x6C, 0x6C, 0x6C, 0x6C, 0x6C, 0x6C, 0x6C], // 0xBA double vertical
    [0x00, 0x00, 0x7F, 0x60, 0x6F, 0x6C, 0x6C, 0x6C], // 0xBB
    [0x6C, 0x6C, 0x6F, 0x60, 0x7F, 0x00, 0x00, 0x00], // 0xBC
    [0x6C, 0x6C, 0x6C, 0x7F, 0x00, 0x00, 0x00, 0x00], // 0xBD
    [0x18, 0x18, 0x1F, 0x18, 0x1F, 0x00, 0x00, 0x00], // 0xBE
    [0x00, 0x00, 0x00, 0x1F, 0x18, 0x18, 0x18, 0x18], // 0xBF top-left corner
    [0x18, 0x18, 0x18, 0xF8, 0x00, 0x00, 0x00, 0x00], // 0xC0 bottom-right corner
    [0x18, 0x18, 0x18, 0xFF, 0x00, 0x00, 0x00, 0x00], // 0xC1 bottom tee
    [0x00, 0x00, 0x00, 0xFF, 0x18, 0x18, 0x18, 0x18], // 0xC2 top tee
    [0x18, 0x18, 0x18, 0xF8, 0x18, 0x18, 0x18, 0x18], // 0xC3 vertical+right
    [0x00, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x00], // 0xC4 horizontal
    [0x18, 0x18, 0x18, 0xFF, 0x18, 0x18, 0x18, 0x18], // 0xC5 cross
    [0x18, 0x18, 0xF8, 0x18, 0xF8, 0x18, 0x18, 0x18], // 0xC6
    [0x6C, 0x6C, 0x6C, 0xEC, 0x6C, 0x6C, 0x6C, 0x6C], // 0xC7
    [0x6C, 0x6C, 0xEC, 0x0C, 0xFC, 0x00, 0x00, 0x00], // 0xC8
    [0x00, 0x00, 0xFC, 0x0C, 0xEC, 0x6C, 0x6C, 0x6C], // 0xC9
    [0x6C, 0x6C, 0xEF, 0x00, 0xFF, 0x00, 0x00, 0x00], // 0xCA
    [0x00, 0x00, 0xFF, 0x00, 0xEF, 0x6C, 0x6C, 0x6C], // 0xCB
    [0x6C, 0x6C, 0xEC, 0x0C, 0xEC, 0x6C, 0x6C, 0x6C], // 0xCC
    [0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0x00, 0x00], // 0xCD double horizontal
    [0x6C, 0x6C, 0xEF, 0x00, 0xEF, 0x6C, 0x6C, 0x6C], // 0xCE
    [0x18, 0x18, 0xFF, 0x00, 0xFF, 0x00, 0x00, 0x00], // 0xCF
    [0x6C, 0x6C, 0x6C, 0xFF, 0x00, 0x00, 0x00, 0x00], // 0xD0
    [0x00, 0x00, 0xFF, 0x00, 0xFF, 0x18, 0x18, 0x18], // 0xD1
    [0x00, 0x00, 0x00, 0xFF, 0x6C, 0x6C, 0x6C, 0x6C], // 0xD2
    [0x6C, 0x6C, 0x6C, 0xFC, 0x00, 0x00, 0x00, 0x00], // 0xD3
    [0x18, 0x18, 0xF8, 0x18, 0xF8, 0x00, 0x00, 0x00], // 0xD4
    [0x00, 0x00, 0xF8, 0x18, 0xF8, 0x18, 0x18, 0x18], // 0xD5
    [0x00, 0x00, 0x00, 0xFC, 0x6C, 0x6C, 0x6C, 0x6C], // 0xD6
    [0x6C, 0x6C, 0x6C, 0xFF, 0x6C, 0x6C, 0x6C, 0x6C], // 0xD7
    [0x18, 0x18, 0xFF, 0x18, 0xFF, 0x18, 0x18, 0x18], // 0xD8
    [0x18, 0x18, 0x18, 0x1F, 0x00, 0x00, 0x00, 0x00], // 0xD9 bottom-left corner
    [0x00, 0x00, 0x00, 0xF8, 0x18, 0x18, 0x18, 0x18], // 0xDA top-right corner
    [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF], // 0xDB full block
    [0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF], // 0xDC lower half
    [0x0F, 0x0F, 0x0F, 0x0F, 0x0F, 0x0F, 0x0F, 0x0F], // 0xDD left half
    [0xF0, 0xF0, 0xF0, 0xF0, 0xF0, 0xF0, 0xF0, 0xF0], // 0xDE right half
    [0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00], // 0xDF upper half
    // 0xE0-0xFF: Greek and math (base-letter fallbacks)
    [0x00, 0x00, 0x6E, 0x3B, 0x13, 0x3B, 0x6E, 0x00], // 0xE0 alpha
    [0x1E, 0x33, 0x1F, 0x33, 0x1F, 0x03, 0x03, 0x02], // 0xE1 beta
    [0x7F, 0x63, 0x03, 0x03, 0x03, 0x03, 0x03, 0x00], // 0xE2 Gamma
    [0x00, 0x7F, 0x36, 0x36, 0x36, 0x36, 0x36, 0x00], // 0xE3 pi
    [0x7F, 0x63, 0x06, 0x0C, 0x06, 0x63, 0x7F, 0x00], // 0xE4 Sigma
    [0x00, 0x00, 0x7E, 0x1B, 0x1B, 0x1B, 0x0E, 0x00], // 0xE5 sigma
    [0x00, 0x66, 0x66, 0x66, 0x66, 0x3E, 0x06, 0x03], // 0xE6 mu
    [0x00, 0x6E, 0x3B, 0x18, 0x18, 0x18, 0x18, 0x00], // 0xE7 tau
    [0x3F, 0x0C, 0x1E, 0x33, 0x33, 0x1E, 0x0C, 0x3F], // 0xE8 Phi
    [0x1C, 0x36, 0x63, 0x7F, 0x63, 0x36, 0x1C, 0x00], // 0xE9 Theta
    [0x1C, 0x36, 0x63, 0x63, 0x36, 0x36, 0x77, 0x00], // 0xEA Omega
    [0x38, 0x0C, 0x18, 0x3E, 0x33, 0x33, 0x1E, 0x00], // 0xEB delta
    [0x00, 0x00, 0x7E, 0xDB, 0xDB, 0x7E, 0x00, 0x00], // 0xEC infinity
    [0x60, 0x30, 0x7E, 0xDB, 0xDB, 0x7E, 0x06, 0x03], // 0xED phi
    [0x1C, 0x06, 0x03, 0x1F, 0x03, 0x06, 0x1C, 0x00], // 0xEE epsilon
    [0x1E, 0x33, 0x33, 0x33, 0x33, 0x33, 0x33, 0x00], // 0xEF intersection
    [0x00, 0x3F, 0x00, 0x3F, 0x00, 0x3F, 0x00, 0x00], // 0xF0 triple bar
    [0x0C, 0x0C, 0x3F, 0x0C, 0x0C, 0x00, 0x3F, 0x00], // 0xF1 plus-minus
    [0x06, 0x0C, 0x18, 0x0C, 0x06, 0x00, 0x3F, 0x00], // 0xF2 >=
    [0x18, 0x0C, 0x06, 0x0C, 0x18, 0x00, 0x3F, 0x00], // 0xF3 <=
    [0x70, 0xD8, 0xD8, 0x18, 0x18, 0x18, 0x18, 0x18], // 0xF4 integral top
    [0x18, 0x18, 0x18, 0x18, 0x18, 0x1B, 0x1B, 0x0E], // 0xF5 integral bottom
    [0x0C, 0x0C, 0x00, 0x3F, 0x00, 0x0C, 0x0C, 0x00], // 0xF6 divide
    [0x00, 0x6E, 0x3B, 0x00, 0x6E, 0x3B, 0x00, 0x00], // 0xF7 approx
    [0x1C, 0x36, 0x36, 0x1C, 0x00, 0x00, 0x00, 0x00], // 0xF8 degree
    [0x00, 0x00, 0x00, 0x18, 0x18, 0x00, 0x00, 0x00], // 0xF9 mid dot
    [0x00, 0x00, 0x00, 0x18, 0x00, 0x00, 0x00, 0x00], // 0xFA small dot
    [0x30, 0x30, 0x18, 0x18, 0x0C, 0x0C, 0x06, 0x06], // 0xFB root
    [0x1E, 0x30, 0x1C, 0x30, 0x1E, 0x00, 0x00, 0x00], // 0xFC superscript n
    [0x1E, 0x30, 0x18, 0x0C, 0x3E, 0x00, 0x00, 0x00], // 0xFD superscript 2
    [0x00, 0x3C, 0x3C, 0x3C, 0x3C, 0x3C, 0x3C, 0x00], // 0xFE square
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // 0xFF
];

/// One font row for `glyph`, leftmost pixel in bit 0.
#[inline]
pub fn glyph_row(glyph: u8, row: usize) -> u8 {
    FONT_8X8[glyph as usize][row & 7]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_is_blank_and_block_is_solid() {
        assert_eq!(FONT_8X8[0x20], [0; 8]);
        assert_eq!(FONT_8X8[0xDB], [0xFF; 8]);
    }

    #[test]
    fn box_vertical_is_symmetric() {
        for row in 0..8 {
            assert_eq!(glyph_row(0xB3, row), 0x18);
        }
    }
}
