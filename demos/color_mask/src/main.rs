use argh::FromArgs;
use std::path::PathBuf;

use huemask::engine::{HsvRange, MaskPipeline, PipelineOptions};
use huemask::image::Image;
use huemask::imgproc;
use huemask::io::functional as F;

#[derive(FromArgs)]
/// Segment an HSV color range in an image and log it to Rerun
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// lower hue bound [0, 179]
    #[argh(option, default = "0")]
    h_min: u8,

    /// upper hue bound [0, 179]
    #[argh(option, default = "179")]
    h_max: u8,

    /// lower saturation bound [0, 255]
    #[argh(option, default = "50")]
    s_min: u8,

    /// upper saturation bound [0, 255]
    #[argh(option, default = "255")]
    s_max: u8,

    /// lower value bound [0, 255]
    #[argh(option, default = "50")]
    v_min: u8,

    /// upper value bound [0, 255]
    #[argh(option, default = "255")]
    v_max: u8,

    /// smooth the image before thresholding
    #[argh(switch)]
    blur: bool,

    /// clean the mask with a morphological opening
    #[argh(switch)]
    morphology: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // read the image
    let rgba = F::read_image_any_rgba8(&args.image_path)?;

    let range = HsvRange {
        h_min: args.h_min,
        h_max: args.h_max,
        s_min: args.s_min,
        s_max: args.s_max,
        v_min: args.v_min,
        v_max: args.v_max,
    };
    let options = PipelineOptions {
        blur: args.blur,
        morphology: args.morphology,
    };

    // the HSV view, for inspection alongside the mask
    let mut hsv = Image::<u8, 3>::from_size_val(rgba.size(), 0)?;
    imgproc::color::hsv_from_rgba(&rgba, &mut hsv)?;

    // compute the in-range mask
    let mut pipeline = MaskPipeline::new();
    let mask = pipeline.compute(&rgba, &range, &options)?.clone();

    // apply the mask to the image
    let mut overlay = Image::<u8, 4>::from_size_val(mask.size(), 0)?;
    imgproc::core::apply_mask(&rgba, &mask, &mut overlay)?;

    // create a Rerun recording stream
    let rec = rerun::RecordingStreamBuilder::new("huemask color mask").spawn()?;

    rec.log(
        "image",
        &rerun::Image::from_elements(rgba.as_slice(), rgba.size().into(), rerun::ColorModel::RGBA),
    )?;

    rec.log(
        "hsv",
        &rerun::Image::from_elements(hsv.as_slice(), hsv.size().into(), rerun::ColorModel::RGB),
    )?;

    rec.log(
        "mask",
        &rerun::Image::from_elements(mask.as_slice(), mask.size().into(), rerun::ColorModel::L),
    )?;

    rec.log(
        "overlay",
        &rerun::Image::from_elements(
            overlay.as_slice(),
            overlay.size().into(),
            rerun::ColorModel::RGBA,
        ),
    )?;

    println!("range: {}", range.summary());

    Ok(())
}
