//! GIF animation rendering

use crate::output::{ensure_parent_dir, OutputError};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write captured ticks as an animated GIF.
///
/// GIF delays are stored in centiseconds, so `duration_ms` is rounded down to
/// a multiple of 10 with a floor of 10ms. An empty frame list writes nothing.
pub fn render_gif(
    frames: &[RgbaImage],
    duration_ms: u32,
    loop_anim: bool,
    path: &Path,
) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }

    ensure_parent_dir(path)?;
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = GifEncoder::new(writer);

    let repeat = if loop_anim {
        Repeat::Infinite
    } else {
        Repeat::Finite(0)
    };
    encoder.set_repeat(repeat)?;

    let delay_ms = (duration_ms / 10).max(1) * 10;
    for image in frames {
        let delay = Delay::from_numer_denom_ms(delay_ms, 1);
        encoder.encode_frame(Frame::from_parts(image.clone(), 0, 0, delay))?;
    }

    Ok(())
}
