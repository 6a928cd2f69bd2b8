use argh::FromArgs;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use huemask::engine::{HsvRange, PipelineOptions, RenderLoop, TickOutcome};
use huemask::io::fps_counter::FpsCounter;
use huemask::io::gstreamer::V4L2CameraConfig;
use huemask::io::sources::CameraSource;

#[derive(FromArgs)]
/// Stream a camera, mask an HSV color range per frame and log to Rerun
struct Args {
    /// the camera id to use
    #[argh(option, short = 'c', default = "0")]
    camera_id: u32,

    /// the frames per second to capture
    #[argh(option, short = 'f', default = "30")]
    fps: u32,

    /// the duration in seconds to run the app
    #[argh(option, short = 'd')]
    duration: Option<u64>,

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

    /// smooth each frame before thresholding
    #[argh(switch)]
    blur: bool,

    /// clean the mask with a morphological opening
    #[argh(switch)]
    morphology: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // start the recording stream
    let rec = rerun::RecordingStreamBuilder::new("huemask camera mask").spawn()?;

    // create a cancel token to stop the capture loop
    let cancel_token = Arc::new(AtomicBool::new(false));

    ctrlc::set_handler({
        let cancel_token = cancel_token.clone();
        move || {
            println!("Received Ctrl-C signal. Sending cancel signal !!");
            cancel_token.store(true, Ordering::SeqCst);
        }
    })?;

    // open the camera and attach it to the render loop
    let source = CameraSource::open(
        V4L2CameraConfig::new()
            .with_camera_id(args.camera_id)
            .with_fps(args.fps),
    )?;

    let mut render_loop = RenderLoop::new();
    render_loop.start(Box::new(source));

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

    let mut fps_counter = FpsCounter::new();
    let deadline = args
        .duration
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    while !cancel_token.load(Ordering::SeqCst) {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                println!("Sending timer cancel signal !!");
                break;
            }
        }

        match render_loop.tick(&range, &options) {
            TickOutcome::Rendered => {
                fps_counter.update();

                if let (Some(frame), Some(mask)) =
                    (render_loop.current_frame(), render_loop.current_mask())
                {
                    rec.log_static(
                        "image",
                        &rerun::Image::from_elements(
                            frame.as_slice(),
                            frame.size().into(),
                            rerun::ColorModel::RGBA,
                        ),
                    )?;

                    rec.log_static(
                        "mask",
                        &rerun::Image::from_elements(
                            mask.as_slice(),
                            mask.size().into(),
                            rerun::ColorModel::L,
                        ),
                    )?;
                }
            }
            // no decoded frame yet; wait briefly for the next one
            TickOutcome::NotReady => std::thread::sleep(Duration::from_millis(5)),
            TickOutcome::Idle | TickOutcome::Stopped => break,
        }
    }

    // release the camera before exiting
    render_loop.stop();

    println!(
        "Finished recording at {:.1} fps. Closing app.",
        fps_counter.fps()
    );

    Ok(())
}
