use gstreamer as gst;
use gstreamer::prelude::*;

use huemask_image::ImageSize;

use crate::gstreamer::capture::StreamCapture;
use crate::gstreamer::error::StreamCaptureError;

/// A configuration object for capturing frames from a V4L2 camera.
pub struct V4L2CameraConfig {
    /// The camera device path
    pub device: String,
    /// The desired image size hint, forwarded to the caps negotiation
    pub size: Option<ImageSize>,
    /// The desired frames per second
    pub fps: u32,
}

impl V4L2CameraConfig {
    /// Creates a new V4L2CameraConfig object with default values.
    ///
    /// Note: The default device is "/dev/video0", the default size hint is
    /// 1280x720 and the default fps is 30.
    pub fn new() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            size: Some(ImageSize {
                width: 1280,
                height: 720,
            }),
            fps: 30,
        }
    }

    /// Sets the camera device path.
    pub fn with_device(mut self, device: &str) -> Self {
        self.device = device.to_string();
        self
    }

    /// Sets the camera device path based on the camera id.
    pub fn with_camera_id(mut self, camera_id: u32) -> Self {
        self.device = format!("/dev/video{camera_id}");
        self
    }

    /// Sets the image size hint, or None to take the camera's native size.
    pub fn with_size(mut self, size: Option<ImageSize>) -> Self {
        self.size = size;
        self
    }

    /// Sets the desired frames per second.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Create a new [`CameraCapture`] object.
    pub fn build(self) -> Result<CameraCapture, StreamCaptureError> {
        CameraCapture::new(&self)
    }
}

impl Default for V4L2CameraConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A camera capture object that grabs RGBA frames from a V4L2 camera.
pub struct CameraCapture(pub StreamCapture);

impl CameraCapture {
    /// Creates a new CameraCapture for the given configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configuration names no device or when the pipeline
    /// cannot be constructed (e.g. the camera is absent or access was
    /// denied); the failure is reported, never retried automatically.
    pub fn new(config: &V4L2CameraConfig) -> Result<Self, StreamCaptureError> {
        if config.device.is_empty() {
            return Err(StreamCaptureError::InvalidConfig(
                "device is empty".to_string(),
            ));
        }

        let pipeline =
            v4l2_camera_pipeline_description(&config.device, config.size, config.fps);

        Ok(Self(StreamCapture::new(&pipeline)?))
    }
}

impl std::ops::Deref for CameraCapture {
    type Target = StreamCapture;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for CameraCapture {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Returns a GStreamer pipeline description string to capture RGBA frames
/// from a V4L2 camera.
///
/// # Arguments
///
/// * `device` - The camera device path, e.g. "/dev/video0".
/// * `size` - An optional image size hint for the caps negotiation.
/// * `fps` - The desired frames per second.
pub fn v4l2_camera_pipeline_description(
    device: &str,
    size: Option<ImageSize>,
    fps: u32,
) -> String {
    let caps = match size {
        Some(size) => format!(
            "video/x-raw,format=RGBA,width={},height={},framerate={}/1",
            size.width, size.height, fps
        ),
        None => format!("video/x-raw,format=RGBA,framerate={fps}/1"),
    };
    format!(
        "v4l2src device={device} ! \
        videoconvert ! videoscale ! videorate ! \
        {caps} ! \
        appsink name=sink sync=false"
    )
}

/// A video input device visible to the device monitor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraDevice {
    /// The device path used to open the camera, e.g. "/dev/video0".
    pub id: String,
    /// A human readable device label.
    pub label: String,
}

/// Lists the video input devices currently available on the system.
///
/// Devices without a resolvable path are skipped.
pub fn enumerate_cameras() -> Result<Vec<CameraDevice>, StreamCaptureError> {
    gst::init()?;

    let monitor = gst::DeviceMonitor::new();
    monitor.add_filter(Some("Video/Source"), None);
    monitor
        .start()
        .map_err(|_| StreamCaptureError::DeviceMonitorError)?;

    let mut cameras = Vec::new();
    for device in monitor.devices() {
        let Some(id) = device_path(&device) else {
            continue;
        };
        cameras.push(CameraDevice {
            id,
            label: device.display_name().to_string(),
        });
    }

    monitor.stop();

    Ok(cameras)
}

/// The filesystem path of a monitored device, if it exposes one.
fn device_path(device: &gst::Device) -> Option<String> {
    let props = device.properties()?;
    props
        .get::<String>("device.path")
        .or_else(|_| props.get::<String>("api.v4l2.path"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::{v4l2_camera_pipeline_description, V4L2CameraConfig};
    use huemask_image::ImageSize;

    #[test]
    fn pipeline_description_with_size() {
        let desc = v4l2_camera_pipeline_description(
            "/dev/video2",
            Some(ImageSize {
                width: 1280,
                height: 720,
            }),
            30,
        );
        assert!(desc.contains("v4l2src device=/dev/video2"));
        assert!(desc.contains("width=1280,height=720"));
        assert!(desc.contains("framerate=30/1"));
        assert!(desc.contains("appsink name=sink"));
    }

    #[test]
    fn pipeline_description_native_size() {
        let desc = v4l2_camera_pipeline_description("/dev/video0", None, 15);
        assert!(!desc.contains("width="));
        assert!(desc.contains("framerate=15/1"));
    }

    #[test]
    fn config_builder() {
        let config = V4L2CameraConfig::new().with_camera_id(1).with_fps(60);
        assert_eq!(config.device, "/dev/video1");
        assert_eq!(config.fps, 60);
        // the default size hint requests 720p
        assert_eq!(config.size.map(|s| (s.width, s.height)), Some((1280, 720)));
    }

    #[test]
    fn empty_device_is_invalid() {
        let res = V4L2CameraConfig::new().with_device("").build();
        assert!(res.is_err());
    }
}
