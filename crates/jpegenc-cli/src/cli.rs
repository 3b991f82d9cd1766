use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use jpegenc_core::{DctMethod, EncoderOptions, Quality};

use crate::CliResult;

/// Encodes BMP, PNG and JPEG images as baseline JPEG
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Source image, used readonly.
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub input: PathBuf,

    /// Encoded JPEG will be stored as file
    #[arg(short = 'o', long = "out", value_name = "output jpeg file", required = true)]
    pub output: PathBuf,

    /// Quantization scale 1-100, larger values compress harder
    #[arg(
        short,
        long,
        value_name = "quality",
        default_value_t = 50,
        value_parser = clap::value_parser!(i32).range(1..=100)
    )]
    pub quality: i32,

    /// Forward DCT implementation
    #[arg(long = "dct", value_enum, default_value_t = DctArg::Float)]
    pub dct: DctArg,

    /// Compute block coefficients on all cores
    #[arg(long)]
    pub parallel: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DctArg {
    Float,
    Integer,
}

impl From<DctArg> for DctMethod {
    fn from(value: DctArg) -> Self {
        match value {
            DctArg::Float => DctMethod::Float,
            DctArg::Integer => DctMethod::Integer,
        }
    }
}

impl CliArgs {
    pub fn options(&self) -> CliResult<EncoderOptions> {
        Ok(EncoderOptions {
            quality: Quality::new(self.quality)?,
            dct_method: self.dct.into(),
            parallel: self.parallel,
        })
    }

    pub fn run(self) -> CliResult<()> {
        let options = self.options()?;

        jpegenc_core::api::encode::prepare()
            .with_image(&self.input)
            .with_options(options)
            .with_output(&self.output)
            .execute()?;

        log::info!(
            "Encoded {} to {} (quality {}, {:?} DCT)",
            self.input.display(),
            self.output.display(),
            self.quality,
            options.dct_method
        );
        Ok(())
    }
}
