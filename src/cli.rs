// ============================================================================
// Doctrine CLI — headless avatar tool via command-line arguments
// ============================================================================
//
// Usage examples:
//   doctrine --decode avatar.b64 --print
//   doctrine -d avatar.b64 -o avatar.png --scale 24
//   doctrine -d - -o out.png              (reads the encoded text from stdin)
//
// No window is opened in CLI mode. Handy for eyeballing the `picture` field
// of API responses without logging into the app.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::raster::{DOCTRINE_PALETTE, Raster};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// Doctrine headless avatar tool.
///
/// Decode a wire-format avatar (base64 of nibble-packed palette indices) to
/// a PNG or a text rendering — no GUI required.
#[derive(Parser, Debug)]
#[command(
    name = "doctrine",
    about = "Doctrine headless avatar tool",
    long_about = "Decode wire-format avatars (base64 of nibble-packed palette\n\
                  indices) without opening the GUI.\n\n\
                  Example:\n  \
                  doctrine --decode avatar.b64 --output avatar.png --scale 24\n  \
                  doctrine -d - --print   (encoded text on stdin)"
)]
pub struct CliArgs {
    /// File holding an encoded avatar; "-" reads standard input.
    #[arg(short, long, value_name = "FILE")]
    pub decode: String,

    /// Write the avatar as a PNG to this path.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pixels per avatar cell in the PNG output.
    #[arg(short, long, default_value_t = 16, value_name = "N")]
    pub scale: u32,

    /// Print the avatar to stdout as a grid of hex palette indices.
    /// Implied when no --output is given.
    #[arg(short, long)]
    pub print: bool,
}

impl CliArgs {
    /// Returns `true` when any CLI-mode flag is present in the real process
    /// arguments. Used by `main()` to route before creating an eframe window.
    pub fn is_cli_mode() -> bool {
        std::env::args().any(|a| a == "--decode" || a == "-d")
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run the avatar tool and return an OS exit code.
pub fn run(args: CliArgs) -> ExitCode {
    match run_one(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_one(args: &CliArgs) -> Result<(), String> {
    let encoded = read_input(&args.decode)?;

    let mut raster = Raster::avatar();
    raster
        .decode_base64(encoded.trim())
        .map_err(|e| format!("decode failed: {e}"))?;

    if args.print || args.output.is_none() {
        print!("{}", index_grid(&raster));
    }

    if let Some(path) = &args.output {
        let scale = args.scale.max(1);
        write_png(&raster, scale, path)?;
        println!("wrote {}", path.display());
    }

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn read_input(source: &str) -> Result<String, String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("could not read stdin: {e}"))?;
        Ok(text)
    } else {
        std::fs::read_to_string(source)
            .map_err(|e| format!("could not read '{source}': {e}"))
    }
}

/// Render the raster as one hex digit per cell, one row per line.
fn index_grid(raster: &Raster) -> String {
    let mut out = String::with_capacity((raster.width() + 1) * raster.height());
    for row in raster.rows() {
        for &cell in row {
            out.push(char::from_digit(cell as u32, 16).unwrap_or('?'));
        }
        out.push('\n');
    }
    out
}

/// Write the raster as a PNG, `scale` pixels per cell, using the product
/// palette.
fn write_png(raster: &Raster, scale: u32, path: &std::path::Path) -> Result<(), String> {
    let width = raster.width() as u32 * scale;
    let height = raster.height() as u32 * scale;
    let img = image::RgbaImage::from_fn(width, height, |px, py| {
        let cell = raster.get((px / scale) as usize, (py / scale) as usize);
        let color = DOCTRINE_PALETTE.color(cell);
        image::Rgba([color.r(), color.g(), color.b(), 255])
    });
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| format!("could not write '{}': {e}", path.display()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_grid_prints_one_hex_digit_per_cell() {
        let mut raster = Raster::new(4, 2);
        raster.clear(0);
        raster.set(1, 0, 10);
        raster.set(3, 1, 15);
        assert_eq!(index_grid(&raster), "0a00\n000f\n");
    }

    #[test]
    fn blank_avatar_prints_as_white_grid() {
        let grid = index_grid(&Raster::avatar());
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 16);
        assert!(lines.iter().all(|l| *l == "b".repeat(16)));
    }
}
