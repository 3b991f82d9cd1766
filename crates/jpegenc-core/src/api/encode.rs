use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::dct::DctMethod;
use crate::encoder::{encode_to, EncoderOptions};
use crate::error::{JpegEncodeError, Result};
use crate::image::Image;
use crate::quantization::Quality;

pub fn prepare() -> EncodeApi {
    EncodeApi::default()
}

#[derive(Default, Debug)]
pub struct EncodeApi {
    #[cfg(feature = "image-input")]
    image: Option<PathBuf>,
    pixels: Option<Image>,
    output: Option<PathBuf>,
    quality: Option<i32>,
    options: EncoderOptions,
}

impl EncodeApi {
    pub fn with_options(mut self, options: EncoderOptions) -> Self {
        self.options = options;
        self
    }

    /// Input file, decoded with the `image` crate (BMP, PNG or JPEG).
    #[cfg(feature = "image-input")]
    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    /// Already decoded pixels. Takes precedence over [`EncodeApi::with_image`].
    pub fn with_pixels(mut self, image: Image) -> Self {
        self.pixels = Some(image);
        self
    }

    /// Quality 1..=100, checked when executing.
    pub fn with_quality(mut self, quality: i32) -> Self {
        self.quality = Some(quality);
        self
    }

    /// If `None` is passed, the quality of the options is kept.
    pub fn use_quality(mut self, quality: Option<i32>) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_dct_method(mut self, method: DctMethod) -> Self {
        self.options.dct_method = method;
        self
    }

    pub fn use_parallel(mut self, parallel: bool) -> Self {
        self.options.parallel = parallel;
        self
    }

    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    /// Validate, encode and write the output file.
    ///
    /// The stream goes to a hidden sibling of the output first and is renamed
    /// over the target only once complete. On failure the partial file is
    /// removed and the target is left untouched.
    pub fn execute(mut self) -> Result<()> {
        let mut options = self.options;
        if let Some(quality) = self.quality {
            options.quality = Quality::new(quality)?;
        }

        let image = match self.pixels.take() {
            Some(image) => image,
            None => self.load()?,
        };
        let Some(output) = self.output.take() else {
            return Err(JpegEncodeError::MissingOutput);
        };

        let partial = partial_path(&output)?;
        let result = write_then_rename(&image, &options, &partial, &output);
        if result.is_err() {
            let _ = fs::remove_file(&partial);
        }
        result?;

        log::debug!(
            "Encoded {}x{} image to {}",
            image.width(),
            image.height(),
            output.display()
        );
        Ok(())
    }

    #[cfg(feature = "image-input")]
    fn load(&self) -> Result<Image> {
        match &self.image {
            Some(path) => load_image(path),
            None => Err(JpegEncodeError::MissingImage),
        }
    }

    #[cfg(not(feature = "image-input"))]
    fn load(&self) -> Result<Image> {
        Err(JpegEncodeError::MissingImage)
    }
}

/// Decode an image file into an RGB raster.
#[cfg(feature = "image-input")]
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Image> {
    let decoded = image::open(path.as_ref()).map_err(|e| match e {
        image::ImageError::IoError(source) => JpegEncodeError::Read { source },
        e => e.into(),
    })?;
    let color = decoded.color();
    if color != image::ColorType::Rgb8 {
        return Err(JpegEncodeError::UnsupportedColorType {
            color: format!("{color:?}"),
        });
    }
    let rgb = decoded.into_rgb8();
    let (width, height) = rgb.dimensions();
    log::debug!(
        "Loaded {}: {}x{}",
        path.as_ref().display(),
        width,
        height
    );
    Image::new(
        width as usize,
        height as usize,
        rgb.into_raw(),
        crate::image::PixelOrder::Rgb,
    )
}

fn partial_path(output: &Path) -> Result<PathBuf> {
    let name = output
        .file_name()
        .ok_or(JpegEncodeError::MissingOutput)?
        .to_string_lossy();
    Ok(output.with_file_name(format!(".{name}.partial")))
}

fn write_then_rename(
    image: &Image,
    options: &EncoderOptions,
    partial: &Path,
    output: &Path,
) -> Result<()> {
    let file = File::create(partial)?;
    let mut writer = BufWriter::new(file);
    encode_to(image, options, &mut writer)?;

    let file = writer
        .into_inner()
        .map_err(|e| JpegEncodeError::Write {
            source: e.into_error(),
        })?;
    file.sync_all()?;
    drop(file);

    fs::rename(partial, output)?;
    Ok(())
}
