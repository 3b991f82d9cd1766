use image::ImageFormat;
use jpegenc_core::{encode, DctMethod, EncoderOptions, Image, PixelOrder, Quality};
use proptest::prelude::*;

/// Block-aligned dimensions, kept small for speed.
fn dimensions_strategy() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=6, 1usize..=6).prop_map(|(w, h)| (w * 8, h * 8))
}

/// An image together with its pixel buffer.
fn image_strategy() -> impl Strategy<Value = (usize, usize, Vec<u8>)> {
    dimensions_strategy().prop_flat_map(|(width, height)| {
        (
            Just(width),
            Just(height),
            prop::collection::vec(any::<u8>(), width * height * 3),
        )
    })
}

fn dct_strategy() -> impl Strategy<Value = DctMethod> {
    prop_oneof![Just(DctMethod::Float), Just(DctMethod::Integer)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: any valid image at any quality decodes to the same dimensions.
    #[test]
    fn prop_output_decodes_with_input_dimensions(
        (width, height, pixels) in image_strategy(),
        quality in 1i32..=100,
        dct_method in dct_strategy(),
    ) {
        let image = Image::new(width, height, pixels, PixelOrder::Rgb).unwrap();
        let options = EncoderOptions {
            quality: Quality::new(quality).unwrap(),
            dct_method,
            ..Default::default()
        };
        let jpeg = encode(&image, &options).unwrap();

        let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg);
        prop_assert!(decoded.is_ok(), "decode failed: {:?}", decoded.as_ref().err());
        let decoded = decoded.unwrap().to_rgb8();
        prop_assert_eq!(decoded.dimensions(), (width as u32, height as u32));
    }

    /// Property: with the finest tables even noise reconstructs closely.
    #[test]
    fn prop_finest_scale_is_near_lossless(
        (width, height, pixels) in image_strategy(),
        dct_method in dct_strategy(),
    ) {
        let image = Image::new(width, height, pixels.clone(), PixelOrder::Rgb).unwrap();
        let options = EncoderOptions {
            quality: Quality::new(1).unwrap(),
            dct_method,
            ..Default::default()
        };
        let jpeg = encode(&image, &options).unwrap();
        let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg)
            .unwrap()
            .to_rgb8();

        let max = pixels
            .iter()
            .zip(decoded.as_raw())
            .map(|(a, b)| a.abs_diff(*b))
            .max()
            .unwrap_or(0);
        prop_assert!(max <= 8, "max difference {}", max);
    }

    /// Property: encoding is a pure function of image and options.
    #[test]
    fn prop_encoding_is_deterministic(
        (width, height, pixels) in image_strategy(),
        quality in 1i32..=100,
    ) {
        let image = Image::new(width, height, pixels, PixelOrder::Bgr).unwrap();
        let options = EncoderOptions {
            quality: Quality::new(quality).unwrap(),
            ..Default::default()
        };
        prop_assert_eq!(encode(&image, &options).unwrap(), encode(&image, &options).unwrap());
    }
}
