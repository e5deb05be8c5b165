use std::collections::HashMap;
use std::fmt;

/// A single character of a one-bit font.
///
/// Each column is a byte; bit `n` set means row `n` is lit, counting from
/// the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    character: char,
    columns: Vec<u8>,
}

impl Glyph {
    pub fn new(character: char, columns: Vec<u8>) -> Self {
        Glyph { character, columns }
    }

    pub fn character(&self) -> char {
        self.character
    }

    pub fn columns(&self) -> &[u8] {
        &self.columns
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        y < 8 && self.columns.get(x).map_or(false, |c| c & (1 << y) != 0)
    }
}

/// A black and white font keyed by character.
#[derive(Debug, Clone, Default)]
pub struct BwFont {
    glyphs: HashMap<char, Glyph>,
}

/// The errors which can occur when decoding a font.
#[derive(Debug, PartialEq)]
pub enum FontError {
    /// The table ended inside a character code.
    Truncated(usize),
    /// `0xff` at the given offset was not followed by `0x00`.
    BadSeparator(usize),
    /// The character code is not a valid `char`.
    InvalidChar(u16),
}

impl BwFont {
    /// Decodes the built-in font.
    pub fn builtin() -> Result<Self, FontError> {
        BwFont::deserialize(FONT_BYTES)
    }

    /// Decodes a font table.
    ///
    /// Each entry is a little endian u16 character code followed by its
    /// columns. Entries are separated by `0xff, 0x00`.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, FontError> {
        let mut glyphs = HashMap::new();
        let mut pos = 0;
        while pos < bytes.len() {
            if pos + 2 > bytes.len() {
                return Err(FontError::Truncated(pos));
            }
            let code = u16::from(bytes[pos]) | (u16::from(bytes[pos + 1]) << 8);
            let character = char::from_u32(u32::from(code)).ok_or(FontError::InvalidChar(code))?;
            pos += 2;

            let end = bytes[pos..].iter()
                .position(|&b| b == 0xff)
                .map_or(bytes.len(), |n| pos + n);
            let columns = bytes[pos..end].to_vec();
            pos = end;
            if pos < bytes.len() {
                if bytes.get(pos + 1) != Some(&0x00) {
                    return Err(FontError::BadSeparator(pos));
                }
                pos += 2;
            }
            glyphs.insert(character, Glyph::new(character, columns));
        }
        debug!("decoded font with {} glyphs", glyphs.len());
        Ok(BwFont { glyphs })
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    /// The glyphs of `text` in order. Characters the font lacks are skipped.
    pub fn glyphs_for(&self, text: &str) -> Vec<Glyph> {
        text.chars()
            .filter_map(|c| {
                let glyph = self.glyph(c);
                if glyph.is_none() {
                    trace!("no glyph for {:?}", c);
                }
                glyph.cloned()
            })
            .collect()
    }
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FontError::Truncated(pos) => write!(f, "font table truncated at byte {}", pos),
            FontError::BadSeparator(pos) => write!(f, "bad glyph separator at byte {}", pos),
            FontError::InvalidChar(code) => write!(f, "invalid character code {:#06x}", code),
        }
    }
}

/// Latin letters (with Å, Ä, Ö, É, Ü), digits and common punctuation.
pub static FONT_BYTES: &[u8] = &[
    0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0x00, 0x41, 0x00,
    0x00, 0x7c, 0x7e, 0x0b, 0x0b, 0x7e, 0x7c, 0x00, 0xff, 0x00, 0x42, 0x00,
    0x00, 0x7f, 0x7f, 0x49, 0x49, 0x7f, 0x36, 0x00, 0xff, 0x00, 0x43, 0x00,
    0x00, 0x3e, 0x7f, 0x41, 0x41, 0x63, 0x22, 0x00, 0xff, 0x00, 0x44, 0x00,
    0x00, 0x7f, 0x7f, 0x41, 0x63, 0x3e, 0x1c, 0x00, 0xff, 0x00, 0x45, 0x00,
    0x00, 0x7f, 0x7f, 0x49, 0x49, 0x41, 0x41, 0x00, 0xff, 0x00, 0x46, 0x00,
    0x00, 0x7f, 0x7f, 0x09, 0x09, 0x01, 0x01, 0x00, 0xff, 0x00, 0x47, 0x00,
    0x00, 0x3e, 0x7f, 0x41, 0x49, 0x7b, 0x3a, 0x00, 0xff, 0x00, 0x48, 0x00,
    0x00, 0x7f, 0x7f, 0x08, 0x08, 0x7f, 0x7f, 0x00, 0xff, 0x00, 0x49, 0x00,
    0x00, 0x41, 0x7f, 0x7f, 0x41, 0x00, 0xff, 0x00, 0x4a, 0x00, 0x00, 0x20,
    0x60, 0x41, 0x7f, 0x3f, 0x01, 0x00, 0xff, 0x00, 0x4b, 0x00, 0x00, 0x7f,
    0x7f, 0x1c, 0x36, 0x63, 0x41, 0x00, 0xff, 0x00, 0x4c, 0x00, 0x00, 0x7f,
    0x7f, 0x40, 0x40, 0x40, 0x40, 0x00, 0xff, 0x00, 0x4d, 0x00, 0x00, 0x7f,
    0x7f, 0x06, 0x0c, 0x06, 0x7f, 0x7f, 0x00, 0xff, 0x00, 0x4e, 0x00, 0x00,
    0x7f, 0x7f, 0x0e, 0x1c, 0x7f, 0x7f, 0x00, 0xff, 0x00, 0x4f, 0x00, 0x00,
    0x3e, 0x7f, 0x41, 0x41, 0x7f, 0x3e, 0x00, 0xff, 0x00, 0x50, 0x00, 0x00,
    0x7f, 0x7f, 0x09, 0x09, 0x0f, 0x06, 0x00, 0xff, 0x00, 0x51, 0x00, 0x00,
    0x1e, 0x3f, 0x21, 0x61, 0x7f, 0x5e, 0x00, 0xff, 0x00, 0x52, 0x00, 0x00,
    0x7f, 0x7f, 0x19, 0x39, 0x6f, 0x46, 0x00, 0xff, 0x00, 0x53, 0x00, 0x00,
    0x26, 0x6f, 0x49, 0x49, 0x7b, 0x32, 0x00, 0xff, 0x00, 0x54, 0x00, 0x00,
    0x01, 0x01, 0x7f, 0x7f, 0x01, 0x01, 0x00, 0xff, 0x00, 0x55, 0x00, 0x00,
    0x3f, 0x7f, 0x40, 0x40, 0x7f, 0x3f, 0x00, 0xff, 0x00, 0x56, 0x00, 0x00,
    0x1f, 0x3f, 0x60, 0x60, 0x3f, 0x1f, 0x00, 0xff, 0x00, 0x57, 0x00, 0x00,
    0x7f, 0x7f, 0x30, 0x18, 0x30, 0x7f, 0x7f, 0x00, 0xff, 0x00, 0x58, 0x00,
    0x00, 0x63, 0x77, 0x1c, 0x1c, 0x77, 0x63, 0x00, 0xff, 0x00, 0x59, 0x00,
    0x00, 0x07, 0x0f, 0x78, 0x78, 0x0f, 0x07, 0x00, 0xff, 0x00, 0x5a, 0x00,
    0x00, 0x61, 0x71, 0x59, 0x4d, 0x47, 0x43, 0x00, 0xff, 0x00, 0xc5, 0x00,
    0x00, 0x70, 0x7a, 0x2d, 0x2d, 0x7a, 0x70, 0x00, 0xff, 0x00, 0xc4, 0x00,
    0x00, 0x71, 0x79, 0x2c, 0x2c, 0x79, 0x71, 0x00, 0xff, 0x00, 0xd6, 0x00,
    0x00, 0x39, 0x7d, 0x44, 0x44, 0x7d, 0x39, 0x00, 0xff, 0x00, 0xc9, 0x00,
    0x00, 0x7c, 0x7c, 0x54, 0x56, 0x45, 0x45, 0x00, 0xff, 0x00, 0xdc, 0x00,
    0x00, 0x3d, 0x7d, 0x40, 0x40, 0x7d, 0x3d, 0x00, 0xff, 0x00, 0x61, 0x00,
    0x20, 0x74, 0x54, 0x54, 0x7c, 0x78, 0x00, 0xff, 0x00, 0x62, 0x00, 0x00,
    0x7f, 0x7f, 0x48, 0x48, 0x78, 0x30, 0x00, 0xff, 0x00, 0x63, 0x00, 0x00,
    0x38, 0x7c, 0x44, 0x44, 0x44, 0x00, 0xff, 0x00, 0x64, 0x00, 0x00, 0x38,
    0x7c, 0x44, 0x44, 0x7f, 0x7f, 0x00, 0xff, 0x00, 0x65, 0x00, 0x00, 0x38,
    0x7c, 0x54, 0x54, 0x5c, 0x18, 0x00, 0xff, 0x00, 0x66, 0x00, 0x00, 0x04,
    0x7e, 0x7f, 0x05, 0x05, 0x00, 0xff, 0x00, 0x67, 0x00, 0x00, 0x98, 0xbc,
    0xa4, 0xa4, 0xfc, 0x7c, 0x00, 0xff, 0x00, 0x68, 0x00, 0x00, 0x7f, 0x7f,
    0x08, 0x08, 0x78, 0x70, 0x00, 0xff, 0x00, 0x69, 0x00, 0x00, 0x48, 0x7a,
    0x7a, 0x40, 0x00, 0xff, 0x00, 0x6a, 0x00, 0x80, 0x80, 0x80, 0xfa, 0x7a,
    0x00, 0xff, 0x00, 0x6b, 0x00, 0x00, 0x7f, 0x7f, 0x10, 0x38, 0x68, 0x40,
    0x00, 0xff, 0x00, 0x6c, 0x00, 0x00, 0x41, 0x7f, 0x7f, 0x40, 0x00, 0xff,
    0x00, 0x6d, 0x00, 0x00, 0x7c, 0x7c, 0x18, 0x38, 0x1c, 0x7c, 0x78, 0x00,
    0xff, 0x00, 0x6e, 0x00, 0x00, 0x7c, 0x7c, 0x04, 0x04, 0x7c, 0x78, 0x00,
    0xff, 0x00, 0x6f, 0x00, 0x00, 0x38, 0x7c, 0x44, 0x44, 0x7c, 0x38, 0x00,
    0xff, 0x00, 0x70, 0x00, 0x00, 0xfc, 0xfc, 0x24, 0x24, 0x3c, 0x18, 0x00,
    0xff, 0x00, 0x71, 0x00, 0x00, 0x18, 0x3c, 0x24, 0x24, 0xfc, 0xfc, 0x00,
    0xff, 0x00, 0x72, 0x00, 0x00, 0x7c, 0x7c, 0x04, 0x04, 0x0c, 0x08, 0x00,
    0xff, 0x00, 0x73, 0x00, 0x00, 0x48, 0x5c, 0x54, 0x54, 0x74, 0x24, 0x00,
    0xff, 0x00, 0x74, 0x00, 0x00, 0x04, 0x04, 0x3f, 0x7f, 0x44, 0x44, 0x00,
    0xff, 0x00, 0x75, 0x00, 0x00, 0x3c, 0x7c, 0x40, 0x40, 0x7c, 0x7c, 0x00,
    0xff, 0x00, 0x76, 0x00, 0x00, 0x1c, 0x3c, 0x60, 0x60, 0x3c, 0x1c, 0x00,
    0xff, 0x00, 0x77, 0x00, 0x00, 0x1c, 0x7c, 0x70, 0x38, 0x70, 0x7c, 0x1c,
    0x00, 0xff, 0x00, 0x78, 0x00, 0x00, 0x44, 0x6c, 0x38, 0x38, 0x6c, 0x44,
    0x00, 0xff, 0x00, 0x79, 0x00, 0x00, 0x9c, 0xbc, 0xa0, 0xe0, 0x7c, 0x3c,
    0x00, 0xff, 0x00, 0x7a, 0x00, 0x00, 0x44, 0x64, 0x74, 0x5c, 0x4c, 0x44,
    0x00, 0xff, 0x00, 0xe5, 0x00, 0x20, 0x74, 0x55, 0x55, 0x7c, 0x78, 0x00,
    0xff, 0x00, 0xe4, 0x00, 0x20, 0x75, 0x54, 0x54, 0x7d, 0x78, 0x00, 0xff,
    0x00, 0xf6, 0x00, 0x00, 0x30, 0x7a, 0x48, 0x48, 0x7a, 0x30, 0x00, 0xff,
    0x00, 0xe9, 0x00, 0x00, 0x38, 0x7c, 0x54, 0x56, 0x5d, 0x19, 0x00, 0xff,
    0x00, 0xfc, 0x00, 0x00, 0x3a, 0x7a, 0x40, 0x40, 0x7a, 0x7a, 0x00, 0xff,
    0x00, 0x30, 0x00, 0x00, 0x3e, 0x7f, 0x49, 0x45, 0x7f, 0x3e, 0x00, 0xff,
    0x00, 0x31, 0x00, 0x00, 0x40, 0x44, 0x7f, 0x7f, 0x40, 0x40, 0x00, 0xff,
    0x00, 0x32, 0x00, 0x00, 0x62, 0x73, 0x51, 0x49, 0x4f, 0x46, 0x00, 0xff,
    0x00, 0x33, 0x00, 0x00, 0x22, 0x63, 0x49, 0x49, 0x7f, 0x36, 0x00, 0xff,
    0x00, 0x34, 0x00, 0x00, 0x18, 0x18, 0x14, 0x16, 0x7f, 0x7f, 0x10, 0xff,
    0x00, 0x35, 0x00, 0x00, 0x27, 0x67, 0x45, 0x45, 0x7d, 0x39, 0x00, 0xff,
    0x00, 0x36, 0x00, 0x00, 0x3e, 0x7f, 0x49, 0x49, 0x7b, 0x32, 0x00, 0xff,
    0x00, 0x37, 0x00, 0x00, 0x03, 0x03, 0x79, 0x7d, 0x07, 0x03, 0x00, 0xff,
    0x00, 0x38, 0x00, 0x00, 0x36, 0x7f, 0x49, 0x49, 0x7f, 0x36, 0x00, 0xff,
    0x00, 0x39, 0x00, 0x00, 0x26, 0x6f, 0x49, 0x49, 0x7f, 0x3e, 0x00, 0xff,
    0x00, 0x2e, 0x00, 0x00, 0x60, 0x60, 0x00, 0xff, 0x00, 0x2c, 0x00, 0x00,
    0x80, 0xe0, 0x60, 0x00, 0xff, 0x00, 0x3f, 0x00, 0x00, 0x02, 0x03, 0x51,
    0x59, 0x0f, 0x06, 0x00, 0xff, 0x00, 0x21, 0x00, 0x00, 0x4f, 0x4f, 0x00,
    0xff, 0x00, 0x22, 0x00, 0x00, 0x07, 0x07, 0x00, 0x00, 0x07, 0x07, 0x00,
    0xff, 0x00, 0x23, 0x00, 0x00, 0x14, 0x7f, 0x7f, 0x14, 0x14, 0x7f, 0x7f,
    0x14, 0x00, 0xff, 0x00, 0x24, 0x00, 0x00, 0x24, 0x2e, 0x6b, 0x6b, 0x3a,
    0x12, 0x00, 0xff, 0x00, 0x25, 0x00, 0x00, 0x63, 0x33, 0x18, 0x0c, 0x66,
    0x63, 0x00, 0xff, 0x00, 0x26, 0x00, 0x00, 0x32, 0x7f, 0x4d, 0x4d, 0x77,
    0x72, 0x50, 0x00, 0xff, 0x00, 0x2d, 0x00, 0x00, 0x08, 0x08, 0x08, 0x08,
    0x08, 0x08, 0x00, 0xff, 0x00, 0x2b, 0x00, 0x00, 0x08, 0x08, 0x3e, 0x3e,
    0x08, 0x08, 0x00, 0xff, 0x00, 0x2a, 0x00, 0x00, 0x08, 0x2a, 0x3e, 0x1c,
    0x1c, 0x3e, 0x2a, 0x08, 0x00, 0xff, 0x00, 0x3a, 0x00, 0x00, 0x66, 0x66,
    0x00, 0xff, 0x00, 0x3b, 0x00, 0x00, 0x80, 0xe6, 0x66, 0x00, 0xff, 0x00,
    0x2f, 0x00, 0x00, 0x40, 0x60, 0x30, 0x18, 0x0c, 0x06, 0x02, 0x00, 0xff,
    0x00, 0x5c, 0x00, 0x00, 0x02, 0x06, 0x0c, 0x18, 0x30, 0x60, 0x40, 0x00,
    0xff, 0x00, 0x3c, 0x00, 0x00, 0x08, 0x1c, 0x36, 0x63, 0x41, 0x41, 0x00,
    0xff, 0x00, 0x3e, 0x00, 0x00, 0x41, 0x41, 0x63, 0x36, 0x1c, 0x08, 0x00,
    0xff, 0x00, 0x28, 0x00, 0x00, 0x1c, 0x3e, 0x63, 0x41, 0x00, 0xff, 0x00,
    0x29, 0x00, 0x00, 0x41, 0x63, 0x3e, 0x1c, 0x00, 0xff, 0x00, 0x27, 0x00,
    0x00, 0x04, 0x06, 0x03, 0x01, 0x00, 0xff, 0x00, 0x60, 0x00, 0x00, 0x01,
    0x03, 0x06, 0x04, 0x00, 0xff, 0x00, 0x3d, 0x00, 0x00, 0x14, 0x14, 0x14,
    0x14, 0x14, 0x14, 0x00,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_font_has_every_glyph() {
        let font = BwFont::builtin().unwrap();
        assert_eq!(font.len(), 96);
        for c in "ABCXYZabcxyz0123456789ÅÄÖÉÜåäöéü .,?!:-+=()".chars() {
            assert!(font.glyph(c).is_some(), "missing {:?}", c);
        }
    }

    #[test]
    fn glyph_widths_match_the_table() {
        let font = BwFont::builtin().unwrap();
        assert_eq!(font.glyph(' ').unwrap().width(), 6);
        assert_eq!(font.glyph('A').unwrap().width(), 8);
        assert_eq!(font.glyph('M').unwrap().width(), 9);
        assert_eq!(font.glyph('!').unwrap().width(), 4);
        assert_eq!(font.glyph('#').unwrap().width(), 10);
        assert_eq!(font.glyph('H').unwrap().columns(), &[0x00, 0x7f, 0x7f, 0x08, 0x08, 0x7f, 0x7f, 0x00]);
    }

    #[test]
    fn lit_bits_count_from_the_top() {
        let glyph = Glyph::new('x', vec![0b0000_0001, 0b1000_0000]);
        assert!(glyph.is_lit(0, 0));
        assert!(!glyph.is_lit(0, 1));
        assert!(glyph.is_lit(1, 7));
        assert!(!glyph.is_lit(2, 0));
        assert!(!glyph.is_lit(0, 8));
    }

    #[test]
    fn unknown_characters_are_skipped() {
        let font = BwFont::builtin().unwrap();
        let glyphs = font.glyphs_for("H~i");
        let chars: String = glyphs.iter().map(Glyph::character).collect();
        assert_eq!(chars, "Hi");
        assert_eq!(glyphs.iter().map(Glyph::width).sum::<usize>(), 14);
    }

    #[test]
    fn decode_errors() {
        assert_eq!(BwFont::deserialize(&[0x41]).unwrap_err(), FontError::Truncated(0));
        assert_eq!(BwFont::deserialize(&[0x41, 0x00, 0x7f, 0xff, 0x01]).unwrap_err(),
                   FontError::BadSeparator(3));
        assert_eq!(BwFont::deserialize(&[0x00, 0xd8, 0x7f]).unwrap_err(),
                   FontError::InvalidChar(0xd800));
    }

    #[test]
    fn last_entry_needs_no_separator() {
        let font = BwFont::deserialize(&[0x41, 0x00, 0x01, 0x02, 0xff, 0x00, 0x42, 0x00, 0x03]).unwrap();
        assert_eq!(font.glyph('A').unwrap().columns(), &[0x01, 0x02]);
        assert_eq!(font.glyph('B').unwrap().columns(), &[0x03]);
    }
}
