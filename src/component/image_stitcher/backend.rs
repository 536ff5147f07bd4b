use crate::config::Direction;
use crate::tools::extension_of;
use anyhow::{Context, Result, bail};
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage, imageops};
use log::debug;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// 實際的圖片拼接實作
///
/// 依序讀取輸入圖片並拼接成一張，回傳以第一張圖片格式編碼後的內容。
pub trait StitchBackend: Send + Sync {
    fn stitch(&self, inputs: &[PathBuf], direction: Direction) -> Result<Vec<u8>>;
}

/// 使用 `image` crate 的拼接實作
///
/// 不做縮放或對齊：水平拼接時圖片靠上對齊，垂直拼接時靠左對齊，
/// 尺寸不足的區域保持透明（JPEG 等不支援透明的格式為黑色）。
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateBackend;

impl StitchBackend for ImageCrateBackend {
    fn stitch(&self, inputs: &[PathBuf], direction: Direction) -> Result<Vec<u8>> {
        let Some(first) = inputs.first() else {
            bail!("沒有輸入圖片");
        };
        let format = output_format(first)?;
        for path in inputs {
            ensure_decodable(path)?;
        }

        let images = inputs
            .iter()
            .map(|path| load_image(path))
            .collect::<Result<Vec<_>>>()?;

        let (width, height) = canvas_size(&images, direction)?;
        debug!(
            "{direction}拼接 {} 張圖片，輸出尺寸 {width}x{height}",
            images.len()
        );

        let mut canvas = RgbaImage::new(width, height);
        let mut offset: i64 = 0;
        for image in &images {
            let (x, y) = match direction {
                Direction::Horizontal => (offset, 0),
                Direction::Vertical => (0, offset),
            };
            imageops::replace(&mut canvas, &image.to_rgba8(), x, y);
            offset += i64::from(match direction {
                Direction::Horizontal => image.width(),
                Direction::Vertical => image.height(),
            });
        }

        encode(DynamicImage::ImageRgba8(canvas), format)
    }
}

/// `image` 只內建 AVIF 編碼器，解碼需要系統的 libdav1d，因此在讀取任何圖片之前就先拒絕
fn ensure_decodable(path: &Path) -> Result<()> {
    if extension_of(path).as_deref() == Some(".avif") {
        bail!(
            "無法解碼 AVIF 圖片，此版本未包含 AVIF 解碼器: {}",
            path.display()
        );
    }
    Ok(())
}

fn load_image(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)
        .with_context(|| format!("無法開啟圖片: {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("無法判斷圖片格式: {}", path.display()))?
        .decode()
        .with_context(|| format!("無法解碼圖片: {}", path.display()))
}

/// 計算拼接後的畫布尺寸
fn canvas_size(images: &[DynamicImage], direction: Direction) -> Result<(u32, u32)> {
    let mut along: u32 = 0;
    let mut across: u32 = 0;

    for image in images {
        let (length, breadth) = match direction {
            Direction::Horizontal => (image.width(), image.height()),
            Direction::Vertical => (image.height(), image.width()),
        };
        along = along
            .checked_add(length)
            .context("拼接後的圖片尺寸超出上限")?;
        across = across.max(breadth);
    }

    Ok(match direction {
        Direction::Horizontal => (along, across),
        Direction::Vertical => (across, along),
    })
}

/// 輸出格式與第一個輸入檔案相同
fn output_format(path: &Path) -> Result<ImageFormat> {
    let format = match extension_of(path).as_deref() {
        Some(".png") => ImageFormat::Png,
        Some(".jpg" | ".jpeg" | ".jfif") => ImageFormat::Jpeg,
        Some(".tiff") => ImageFormat::Tiff,
        Some(".bmp") => ImageFormat::Bmp,
        Some(".webp") => ImageFormat::WebP,
        Some(".avif") => ImageFormat::Avif,
        _ => bail!("不支援的輸出格式: {}", path.display()),
    };
    Ok(format)
}

fn encode(image: DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let image = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(image.to_rgb8())
    } else {
        image
    };

    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format)
        .with_context(|| format!("無法編碼為 {format:?}"))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};
    use std::fs;
    use tempfile::TempDir;

    fn create_png(path: &Path, width: u32, height: u32, color: [u8; 3]) {
        RgbImage::from_pixel(width, height, Rgb(color))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_stitch_horizontal() {
        let temp_dir = TempDir::new().unwrap();
        let red = temp_dir.path().join("red.png");
        let blue = temp_dir.path().join("blue.png");
        create_png(&red, 4, 3, [255, 0, 0]);
        create_png(&blue, 2, 5, [0, 0, 255]);

        let bytes = ImageCrateBackend
            .stitch(&[red, blue], Direction::Horizontal)
            .unwrap();
        let result = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();

        assert_eq!(result.dimensions(), (6, 5));
        assert_eq!(result.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(result.get_pixel(4, 4), &Rgba([0, 0, 255, 255]));
        // 高度不足的區域為透明
        assert_eq!(result.get_pixel(0, 4)[3], 0);
    }

    #[test]
    fn test_stitch_vertical() {
        let temp_dir = TempDir::new().unwrap();
        let top = temp_dir.path().join("top.png");
        let bottom = temp_dir.path().join("bottom.png");
        create_png(&top, 3, 2, [0, 255, 0]);
        create_png(&bottom, 3, 4, [0, 0, 0]);

        let bytes = ImageCrateBackend
            .stitch(&[top, bottom], Direction::Vertical)
            .unwrap();
        let result = image::load_from_memory(&bytes).unwrap().to_rgba8();

        assert_eq!(result.dimensions(), (3, 6));
        assert_eq!(result.get_pixel(1, 1), &Rgba([0, 255, 0, 255]));
        assert_eq!(result.get_pixel(1, 5), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_stitch_jpeg_output() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.jpg");
        let b = temp_dir.path().join("b.jpg");
        create_png(&a, 8, 8, [200, 200, 200]);
        create_png(&b, 8, 8, [10, 10, 10]);

        let bytes = ImageCrateBackend
            .stitch(&[a, b], Direction::Horizontal)
            .unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        let result = image::load_from_memory(&bytes).unwrap();
        assert_eq!((result.width(), result.height()), (16, 8));
    }

    #[test]
    fn test_stitch_corrupt_input() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.png");
        let bad = temp_dir.path().join("bad.png");
        create_png(&good, 2, 2, [1, 2, 3]);
        fs::write(&bad, b"definitely not a png").unwrap();

        assert!(ImageCrateBackend
            .stitch(&[good, bad], Direction::Vertical)
            .is_err());
    }

    #[test]
    fn test_stitch_avif_input_fails_before_decoding() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.avif");
        let b = temp_dir.path().join("b.avif");
        // 只有 AVIF 編碼器可用，所以可以產生輸入檔
        create_png(&a, 8, 8, [40, 80, 120]);
        create_png(&b, 8, 8, [120, 80, 40]);

        let err = ImageCrateBackend
            .stitch(&[a, b], Direction::Horizontal)
            .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("AVIF"), "{message}");
        assert!(message.contains("a.avif"), "{message}");
    }

    #[test]
    fn test_output_format() {
        assert_eq!(output_format(Path::new("a.JFIF")).unwrap(), ImageFormat::Jpeg);
        assert_eq!(output_format(Path::new("a.webp")).unwrap(), ImageFormat::WebP);
        assert!(output_format(Path::new("a.gif")).is_err());
    }
}
