//! Screenshots of the current view.
//!
//! The frame is rendered into an offscreen texture (see
//! [`crate::context::Context::capture`]), copied into a mappable buffer with
//! rows padded to [`wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`], then read back,
//! unpadded and encoded as PNG.

use std::io::Cursor;

use anyhow::{Context as _, anyhow};

const BYTES_PER_PIXEL: u32 = 4;

/// Row stride of the readback buffer for an image `width` pixels wide.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Drop the padding at the end of every row.
pub fn unpad_rows(data: &[u8], width: u32, height: u32, padded_bytes_per_row: u32) -> Vec<u8> {
    let row = (width * BYTES_PER_PIXEL) as usize;
    data.chunks(padded_bytes_per_row as usize)
        .take(height as usize)
        .flat_map(|chunk| &chunk[..row.min(chunk.len())])
        .copied()
        .collect()
}

/// Swap red and blue of every pixel in place.
pub fn bgra_to_rgba(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

pub fn encode_png(image: &image::RgbaImage) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .context("PNG encoding failed")?;
    Ok(bytes)
}

/// Write the PNG into the working directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn save(png: &[u8], file_name: &str) -> anyhow::Result<std::path::PathBuf> {
    let path = std::env::current_dir()?.join(file_name);
    std::fs::write(&path, png).with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(path)
}

/// A rendered frame on its way back from the GPU.
#[derive(Debug)]
pub struct PendingCapture {
    buffer: wgpu::Buffer,
    extent: wgpu::Extent3d,
    padded_bytes_per_row: u32,
    format: wgpu::TextureFormat,
}

impl PendingCapture {
    pub fn new(device: &wgpu::Device, extent: wgpu::Extent3d, format: wgpu::TextureFormat) -> Self {
        let padded_bytes_per_row = padded_bytes_per_row(extent.width);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screenshot Buffer"),
            size: (padded_bytes_per_row * extent.height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            extent,
            padded_bytes_per_row,
            format,
        }
    }

    pub fn copy_from(&self, encoder: &mut wgpu::CommandEncoder, texture: &wgpu::Texture) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.extent.height),
                },
            },
            self.extent,
        );
    }

    /// Map the buffer and convert its contents into an RGBA image.
    pub async fn read(self, device: &wgpu::Device) -> anyhow::Result<image::RgbaImage> {
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = self.buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            // The receiver only goes away when the capture was abandoned.
            let _ = tx.send(result);
        });
        #[cfg(not(target_arch = "wasm32"))]
        device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(std::time::Duration::from_secs(3)),
        })?;
        #[cfg(target_arch = "wasm32")]
        device.poll(wgpu::PollType::Poll)?;
        rx.receive()
            .await
            .ok_or_else(|| anyhow!("Screenshot buffer mapping was cancelled"))??;

        let mut pixels = {
            let data = buffer_slice.get_mapped_range();
            unpad_rows(
                &data,
                self.extent.width,
                self.extent.height,
                self.padded_bytes_per_row,
            )
        };
        self.buffer.unmap();

        match self.format {
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => {
                bgra_to_rgba(&mut pixels)
            }
            wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => {}
            other => return Err(anyhow!("Unsupported surface format for screenshots: {:?}", other)),
        }
        image::RgbaImage::from_raw(self.extent.width, self.extent.height, pixels)
            .ok_or_else(|| anyhow!("Screenshot buffer is smaller than the image"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(800), 3200);
    }

    #[test]
    fn unpadding_keeps_only_pixels() {
        // 2x2 image, 4 bytes of padding per row.
        let data = [
            1, 1, 1, 1, 2, 2, 2, 2, 0, 0, 0, 0, //
            3, 3, 3, 3, 4, 4, 4, 4, 0, 0, 0, 0,
        ];
        let pixels = unpad_rows(&data, 2, 2, 12);
        assert_eq!(pixels, vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4]);
    }

    #[test]
    fn bgra_swizzle_swaps_red_and_blue() {
        let mut px = [10, 20, 30, 255];
        bgra_to_rgba(&mut px);
        assert_eq!(px, [30, 20, 10, 255]);
    }

    #[test]
    fn png_output_has_signature() {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]));
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
    }
}
