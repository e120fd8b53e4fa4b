use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use egui::Color32;
use thiserror::Error;

// ============================================================================
// PALETTE — fixed 16-colour product palette
// ============================================================================

/// Number of colours in the product palette. Cell values are nibbles, so this
/// is also the largest value a raster cell may hold plus one.
pub const PALETTE_SIZE: usize = 16;

/// Palette index used for blank cells and light decorations.
pub const WHITE: u8 = 11;
/// Palette index used for hover outlines on the swatch picker.
pub const LIGHT_GREY: u8 = 12;

/// Immutable ordered list of display colours. Passed explicitly to every
/// renderer; index validity of any raster is defined against this length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: [Color32; PALETTE_SIZE],
}

/// The Doctrine product palette.
pub const DOCTRINE_PALETTE: Palette = Palette::new([
    Color32::from_rgb(0xe8, 0x00, 0x00), // red
    Color32::from_rgb(0xe7, 0x97, 0x00), // orange
    Color32::from_rgb(0xe6, 0xdb, 0x00), // yellow
    Color32::from_rgb(0x92, 0xe2, 0x33), // light green
    Color32::from_rgb(0x00, 0xc0, 0x00), // green
    Color32::from_rgb(0x01, 0xe5, 0xf2), // cyan
    Color32::from_rgb(0x00, 0x82, 0xca), // mid blue
    Color32::from_rgb(0x06, 0x00, 0xee), // blue
    Color32::from_rgb(0xff, 0xa6, 0xd1), // light pink
    Color32::from_rgb(0xe2, 0x3e, 0xff), // pink
    Color32::from_rgb(0x82, 0x02, 0x81), // purple
    Color32::from_rgb(0xff, 0xff, 0xff), // white
    Color32::from_rgb(0xe4, 0xe4, 0xe4), // light grey
    Color32::from_rgb(0x88, 0x87, 0x89), // grey
    Color32::from_rgb(0x22, 0x22, 0x22), // dark grey
    Color32::from_rgb(0xa1, 0x6a, 0x3f), // brown
]);

impl Palette {
    pub const fn new(colors: [Color32; PALETTE_SIZE]) -> Self {
        Self { colors }
    }

    /// Display colour for a cell value. Cell values are nibbles, so masking
    /// keeps the lookup total without hiding a corrupt raster elsewhere.
    pub fn color(&self, index: u8) -> Color32 {
        self.colors[(index & 0x0f) as usize]
    }

    pub const fn len(&self) -> usize {
        PALETTE_SIZE
    }

    pub const fn is_empty(&self) -> bool {
        false
    }
}

// ============================================================================
// RASTER — fixed-size grid of colour indices
// ============================================================================

/// Side length of an avatar raster.
pub const AVATAR_SIZE: usize = 16;

/// Wire size of an encoded avatar: two cells per byte.
pub const AVATAR_BYTES: usize = AVATAR_SIZE * AVATAR_SIZE / 2;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// A fixed-size grid of palette indices representing a small image.
///
/// Dimensions are immutable after creation; the grid is mutated in place by
/// paint operations or replaced wholesale by [`Raster::decode_base64`].
/// Coordinates are bounds-checked: out-of-range access panics like slice
/// indexing, and callers translating pointer positions clamp first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    cells: Vec<u8>, // row-major
}

impl Raster {
    /// Create a blank raster filled with the white background index.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![WHITE; width * height],
        }
    }

    /// A blank 16×16 avatar raster.
    pub fn avatar() -> Self {
        Self::new(AVATAR_SIZE, AVATAR_SIZE)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset every cell to `fill`.
    pub fn clear(&mut self, fill: u8) {
        debug_assert!((fill as usize) < PALETTE_SIZE);
        self.cells.fill(fill);
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) out of range");
        self.cells[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, index: u8) {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) out of range");
        debug_assert!((index as usize) < PALETTE_SIZE);
        self.cells[y * self.width + x] = index;
    }

    /// Iterate rows top to bottom, each a slice of `width` cell values.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(self.width)
    }

    /// Replace the grid contents from a base64 encoding of nibble-packed
    /// cells. Embedded newlines are stripped first (the server wraps long
    /// values). Each byte expands high nibble first; the flat cell sequence
    /// is reshaped into rows of `width`, and a trailing partial row is
    /// dropped. Rows beyond the available data keep their previous contents,
    /// and rows beyond the grid height are ignored — dimensions never change.
    pub fn decode_base64(&mut self, text: &str) -> Result<(), CodecError> {
        let cleaned: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let bytes = BASE64.decode(cleaned.as_bytes())?;

        let mut flat = Vec::with_capacity(bytes.len() * 2);
        for byte in bytes {
            flat.push(byte >> 4);
            flat.push(byte & 0x0f);
        }

        let rows = (flat.len() / self.width).min(self.height);
        for row in 0..rows {
            let start = row * self.width;
            self.cells[start..start + self.width]
                .copy_from_slice(&flat[start..start + self.width]);
        }
        Ok(())
    }

    /// Encode the grid as base64 of nibble-packed cells, row-major, two
    /// cells per byte with the first cell in the high nibble.
    ///
    /// The total cell count must be even (16×16 = 256 always is); the
    /// constructors in this crate never produce an odd grid.
    pub fn encode_base64(&self) -> String {
        assert!(self.cells.len() % 2 == 0, "cell count must be even to pack nibbles");
        let bytes: Vec<u8> = self
            .cells
            .chunks_exact(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect();
        BASE64.encode(bytes)
    }
}

// ============================================================================
// Tests
// ============================================================================
