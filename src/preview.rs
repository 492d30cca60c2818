use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;

use crate::data::ResampledRamp;
use crate::error::Result;

/// Horizontal strip of the ramp, left = 0, right = 1. Colors are clamped.
pub fn render_ramp(ramp: &ResampledRamp, width: u32, height: u32) -> RgbaImage {
    let width = width.max(1);
    let column: Vec<Rgba<u8>> = (0..width)
        .map(|x| {
            let t = if width > 1 {
                x as f32 / (width - 1) as f32
            } else {
                0.
            };
            Rgba(ramp.evaluate(t).to_rgba8())
        })
        .collect();
    ImageBuffer::from_fn(width, height.max(1), |x, _| column[x as usize])
}

pub fn save_ramp_png(ramp: &ResampledRamp, path: &Path, width: u32, height: u32) -> Result<()> {
    render_ramp(ramp, width, height).save_with_format(path, image::ImageFormat::Png)?;
    log::info!("Ramp preview saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{resample, Color, ColorStop};

    #[test]
    fn strip_endpoints() {
        let ramp = resample(
            &[ColorStop::new(0., Color::RED), ColorStop::new(1., Color::BLUE)],
            8,
        )
        .unwrap();
        let img = render_ramp(&ramp, 16, 2);
        assert_eq!(img.dimensions(), (16, 2));
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(15, 1), &Rgba([0, 0, 255, 255]));
    }
}
