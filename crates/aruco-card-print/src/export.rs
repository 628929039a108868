//! Single-page PDF export through a temporary PNG raster.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};
use tempfile::NamedTempFile;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Canvas, CardConfig, CardError};

const IMAGE_NAME: Name<'static> = Name(b"Im0");

/// A PNG copy of the canvas on disk, deleted when dropped.
#[derive(Debug)]
pub struct TempRaster {
    file: NamedTempFile,
}

impl TempRaster {
    /// Encode `canvas` as an 8-bit RGB PNG in the system temp directory.
    pub fn write(canvas: &Canvas) -> Result<Self, CardError> {
        let mut file = tempfile::Builder::new()
            .prefix("aruco-card-")
            .suffix(".png")
            .tempfile()
            .map_err(|source| CardError::TempRaster {
                path: std::env::temp_dir(),
                source,
            })?;
        let path = file.path().to_path_buf();

        {
            let mut out = BufWriter::new(file.as_file_mut());
            let mut encoder = png::Encoder::new(&mut out, canvas.width(), canvas.height());
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(canvas.as_rgb().as_raw())?;
            writer.finish()?;
            out.flush().map_err(|source| CardError::TempRaster {
                path: path.clone(),
                source,
            })?;
        }

        debug!("raster written to {}", path.display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Decoded raster samples, always 8-bit RGB.
struct RgbRaster {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

fn read_rgb_png(path: &Path) -> Result<RgbRaster, CardError> {
    let file = File::open(path).map_err(|source| CardError::TempRaster {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = png::Decoder::new(BufReader::new(file)).read_info()?;
    let (color, depth) = reader.output_color_type();
    if color != png::ColorType::Rgb || depth != png::BitDepth::Eight {
        return Err(CardError::UnexpectedRasterFormat(color));
    }
    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let mut samples = vec![0u8; width as usize * height as usize * 3];
    let frame = reader.next_frame(&mut samples)?;
    samples.truncate(frame.buffer_size());
    Ok(RgbRaster {
        width,
        height,
        samples,
    })
}

/// Build a one-page PDF whose page is filled by the raster at `raster_path`.
///
/// The page is `page_w_pt × page_h_pt`, landscape. The raster is embedded
/// once as a FlateDecode DeviceRGB image and no info dictionary is written,
/// so equal inputs give equal bytes.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
pub fn build_pdf(raster_path: &Path, page_w_pt: f32, page_h_pt: f32) -> Result<Vec<u8>, CardError> {
    let (w, h) = if page_h_pt > page_w_pt {
        (page_h_pt, page_w_pt)
    } else {
        (page_w_pt, page_h_pt)
    };
    let raster = read_rgb_png(raster_path)?;

    let mut zlib = ZlibEncoder::new(Vec::new(), Compression::default());
    zlib.write_all(&raster.samples)
        .map_err(|source| CardError::TempRaster {
            path: raster_path.to_path_buf(),
            source,
        })?;
    let compressed = zlib.finish().map_err(|source| CardError::TempRaster {
        path: raster_path.to_path_buf(),
        source,
    })?;

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let content_id = Ref::new(5);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, w, h));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources().x_objects().pair(IMAGE_NAME, image_id);
    page.finish();

    let mut image = pdf.image_xobject(image_id, &compressed);
    image.filter(Filter::FlateDecode);
    image.width(raster.width as i32);
    image.height(raster.height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    let mut content = Content::new();
    content.save_state();
    content.transform([w, 0.0, 0.0, h, 0.0, 0.0]);
    content.x_object(IMAGE_NAME);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    let bytes = pdf.finish();
    debug!(
        "pdf page {w}x{h} pt, image {}x{} px, {} bytes",
        raster.width,
        raster.height,
        bytes.len()
    );
    Ok(bytes)
}

/// Write `canvas` to `cfg.output_path` as a one-page PDF.
///
/// The intermediate raster is removed before this returns, whether or not
/// the export succeeded.
pub fn export_pdf(canvas: &Canvas, cfg: &CardConfig) -> Result<PathBuf, CardError> {
    let (w, h) = cfg.page_size_pt();
    let bytes = {
        let raster = TempRaster::write(canvas)?;
        build_pdf(raster.path(), w, h)?
    };
    std::fs::write(&cfg.output_path, &bytes).map_err(|source| CardError::Io {
        path: cfg.output_path.clone(),
        source,
    })?;
    Ok(cfg.output_path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn sample_canvas() -> Canvas {
        let mut canvas = Canvas::new(40, 20, Rgb([255, 255, 255]));
        canvas.blend_pixel(3, 4, Rgb([200, 10, 10]), 1.0);
        canvas
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn temp_raster_round_trips_and_is_removed() {
        let canvas = sample_canvas();
        let path = {
            let raster = TempRaster::write(&canvas).expect("raster");
            let path = raster.path().to_path_buf();
            assert!(path.exists());
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));

            let decoded = read_rgb_png(&path).expect("decode");
            assert_eq!((decoded.width, decoded.height), (40, 20));
            assert_eq!(decoded.samples, canvas.as_rgb().as_raw().clone());
            path
        };
        assert!(!path.exists());
    }

    #[test]
    fn pdf_has_one_page_and_one_image() {
        let raster = TempRaster::write(&sample_canvas()).expect("raster");
        let bytes = build_pdf(raster.path(), 144.0, 252.0).expect("pdf");

        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(count(&bytes, b"/Type /Page\n"), 1);
        assert_eq!(count(&bytes, b"/Subtype /Image"), 1);
        assert_eq!(count(&bytes, b"/Count 1"), 1);
        assert_eq!(count(&bytes, b"/MediaBox [0 0 252 144]"), 1);
        assert_eq!(count(&bytes, b"/Filter /FlateDecode"), 1);
    }

    #[test]
    fn corrupt_raster_fails_and_is_still_removed() {
        let raster = TempRaster::write(&sample_canvas()).expect("raster");
        let path = raster.path().to_path_buf();
        let png = std::fs::read(&path).expect("read raster");
        std::fs::write(&path, &png[..png.len() / 2]).expect("truncate raster");

        let err = build_pdf(&path, 252.0, 144.0).unwrap_err();
        assert!(matches!(err, CardError::PngDecode(_)));
        assert_eq!(err.stage(), crate::Stage::Export);
        assert!(path.exists());

        drop(raster);
        assert!(!path.exists());
    }

    #[test]
    fn missing_raster_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = build_pdf(&dir.path().join("absent.png"), 10.0, 10.0).unwrap_err();
        assert!(matches!(err, CardError::TempRaster { .. }));
    }

    #[test]
    fn unwritable_destination_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = CardConfig {
            output_path: dir.path().join("missing").join("card.pdf"),
            ..CardConfig::default()
        };
        let err = export_pdf(&sample_canvas(), &cfg).unwrap_err();
        assert!(matches!(err, CardError::Io { .. }));
    }
}
