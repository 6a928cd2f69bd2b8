use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use eframe::egui;

use huemask::engine::{EyedropSample, HsvRange, PipelineOptions, RenderLoop, TickOutcome};
use huemask::io::fps_counter::FpsCounter;
use huemask::io::gstreamer::{enumerate_cameras, CameraDevice, V4L2CameraConfig};
use huemask::io::sources::{CameraSource, StillImageSource, VideoFileSource};

const VIEW_SPACING: f32 = 8.;

pub struct TunerApp {
    render_loop: RenderLoop,
    range: HsvRange,
    options: PipelineOptions,
    devices: Vec<CameraDevice>,
    selected_device: usize,
    image_path: String,
    video_path: String,
    /// Shared handle to the running video source, for the seek slider.
    video: Option<Rc<RefCell<VideoFileSource>>>,
    eyedrop: Option<EyedropSample>,
    status: String,
    fps_counter: FpsCounter,
    source_texture: Option<egui::TextureHandle>,
    mask_texture: Option<egui::TextureHandle>,
}

impl Default for TunerApp {
    fn default() -> Self {
        let devices = match enumerate_cameras() {
            Ok(devices) => devices,
            Err(err) => {
                log::error!("failed to enumerate cameras: {err}");
                Vec::new()
            }
        };

        Self {
            render_loop: RenderLoop::new(),
            range: HsvRange::default(),
            options: PipelineOptions::default(),
            devices,
            selected_device: 0,
            image_path: String::new(),
            video_path: String::new(),
            video: None,
            eyedrop: None,
            status: String::new(),
            fps_counter: FpsCounter::new(),
            source_texture: None,
            mask_texture: None,
        }
    }
}

impl eframe::App for TunerApp {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        // keep ticking while idle so camera/video frames keep flowing
        ctx.request_repaint();

        if self.render_loop.tick(&self.range, &self.options) == TickOutcome::Rendered {
            self.fps_counter.update();
            self.refresh_textures(ctx);
        }

        egui::SidePanel::left("controls")
            .min_width(280.)
            .show(ctx, |ui| self.controls_ui(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.viewer_ui(ui));
    }
}

impl TunerApp {
    fn refresh_textures(&mut self, ctx: &egui::Context) {
        if let Some(frame) = self.render_loop.current_frame() {
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [frame.width(), frame.height()],
                frame.as_slice(),
            );
            match self.source_texture.as_mut() {
                Some(texture) => texture.set(color_image, egui::TextureOptions::default()),
                None => {
                    self.source_texture = Some(ctx.load_texture(
                        "source_frame",
                        color_image,
                        egui::TextureOptions::default(),
                    ));
                }
            }
        }

        if let Some(mask) = self.render_loop.current_mask() {
            let color_image =
                egui::ColorImage::from_gray([mask.width(), mask.height()], mask.as_slice());
            match self.mask_texture.as_mut() {
                Some(texture) => texture.set(color_image, egui::TextureOptions::default()),
                None => {
                    self.mask_texture = Some(ctx.load_texture(
                        "mask_frame",
                        color_image,
                        egui::TextureOptions::default(),
                    ));
                }
            }
        }
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Source");

        ui.horizontal(|ui| {
            let selected_label = self
                .devices
                .get(self.selected_device)
                .map(|d| d.label.as_str())
                .unwrap_or("no camera found");
            egui::ComboBox::from_label("camera")
                .selected_text(selected_label)
                .show_ui(ui, |ui| {
                    for (i, device) in self.devices.iter().enumerate() {
                        ui.selectable_value(&mut self.selected_device, i, &device.label);
                    }
                });
            if ui.button("refresh").clicked() {
                self.refresh_devices();
            }
        });

        ui.horizontal(|ui| {
            if ui.button("start camera").clicked() {
                self.start_camera();
            }
            ui.add_enabled_ui(self.render_loop.is_running(), |ui| {
                if ui.button("stop").clicked() {
                    self.stop();
                }
            });
        });

        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("load image").clicked() {
                self.load_image();
            }
            ui.add(
                egui::TextEdit::singleline(&mut self.image_path).hint_text("path to an image"),
            );
        });

        ui.horizontal(|ui| {
            if ui.button("load video").clicked() {
                self.load_video();
            }
            ui.add(
                egui::TextEdit::singleline(&mut self.video_path).hint_text("path to a video"),
            );
        });

        self.video_seek_ui(ui);

        ui.separator();
        ui.heading("Range");

        ui.add(egui::Slider::new(&mut self.range.h_min, 0..=179).text("H min"));
        ui.add(egui::Slider::new(&mut self.range.h_max, 0..=179).text("H max"));
        ui.add(egui::Slider::new(&mut self.range.s_min, 0..=255).text("S min"));
        ui.add(egui::Slider::new(&mut self.range.s_max, 0..=255).text("S max"));
        ui.add(egui::Slider::new(&mut self.range.v_min, 0..=255).text("V min"));
        ui.add(egui::Slider::new(&mut self.range.v_max, 0..=255).text("V max"));

        ui.checkbox(&mut self.options.blur, "blur before threshold");
        ui.checkbox(&mut self.options.morphology, "morphological cleanup");

        ui.separator();

        ui.label(format!("active range: {}", self.range.summary()));
        match &self.eyedrop {
            Some(sample) => ui.label(format!("eyedrop: {sample}")),
            None => ui.label("eyedrop: click the source view"),
        };

        if self.render_loop.is_running() {
            ui.label(format!("{:.1} fps", self.fps_counter.fps()));
        }
        if !self.status.is_empty() {
            ui.label(&self.status);
        }
    }

    fn video_seek_ui(&mut self, ui: &mut egui::Ui) {
        let mut seek_to = None;

        if let Some(video) = &self.video {
            let video = video.borrow();
            let reader = video.reader();
            if let (Some(pos), Some(duration)) = (reader.pos(), reader.duration()) {
                let mut pos_secs = pos.as_secs_f64();
                let response = ui.add(
                    egui::Slider::new(&mut pos_secs, 0.0..=duration.as_secs_f64())
                        .text("position"),
                );
                if response.drag_stopped() {
                    seek_to = Some(Duration::from_secs_f64(pos_secs));
                }
            }
        }

        if let (Some(pos), Some(video)) = (seek_to, &self.video) {
            if let Err(err) = video.borrow().reader().seek(pos) {
                self.status = format!("seek failed: {err}");
            }
        }
    }

    fn viewer_ui(&mut self, ui: &mut egui::Ui) {
        let Some(source_texture) = &self.source_texture else {
            ui.label("start a camera or load a file to see frames here");
            return;
        };

        let avail = ui.available_size();
        let view_height = (avail.y - VIEW_SPACING) / 2.;
        let display_size = fit_size(source_texture.size_vec2(), avail.x, view_height);

        let sized_texture = egui::load::SizedTexture::new(source_texture.id(), display_size);
        let response = ui.add(egui::Image::new(sized_texture).sense(egui::Sense::click()));

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let rel = pos - response.rect.min;
                self.eyedrop = self.render_loop.sample(
                    rel.x,
                    rel.y,
                    response.rect.width(),
                    response.rect.height(),
                );
            }
        }

        ui.add_space(VIEW_SPACING);

        if let Some(mask_texture) = &self.mask_texture {
            let display_size = fit_size(mask_texture.size_vec2(), avail.x, view_height);
            let sized_texture = egui::load::SizedTexture::new(mask_texture.id(), display_size);
            ui.add(egui::Image::new(sized_texture));
        }
    }

    fn refresh_devices(&mut self) {
        match enumerate_cameras() {
            Ok(devices) => {
                self.devices = devices;
                self.selected_device = 0;
            }
            Err(err) => {
                self.status = format!("device enumeration failed: {err}");
                log::error!("failed to enumerate cameras: {err}");
            }
        }
    }

    fn start_camera(&mut self) {
        // release the previous source (and its camera) before acquiring
        self.render_loop.stop();
        self.video = None;

        let config = match self.devices.get(self.selected_device) {
            Some(device) => V4L2CameraConfig::new().with_device(&device.id),
            None => V4L2CameraConfig::new(),
        };

        match CameraSource::open(config) {
            Ok(source) => {
                self.attach_source(Box::new(source));
                self.status = "camera running".to_string();
            }
            Err(err) => {
                // access denied or device gone; report and stay stopped
                self.status = format!("camera failed: {err}");
                log::error!("failed to open camera: {err}");
            }
        }
    }

    fn load_image(&mut self) {
        self.render_loop.stop();
        self.video = None;

        match StillImageSource::from_path(&self.image_path) {
            Ok(source) => {
                self.attach_source(Box::new(source));
                self.status = format!("showing {}", self.image_path);
            }
            Err(err) => {
                self.status = format!("image failed: {err}");
                log::error!("failed to load image: {err}");
            }
        }
    }

    fn load_video(&mut self) {
        self.render_loop.stop();
        self.video = None;

        match VideoFileSource::open(&self.video_path) {
            Ok(source) => {
                let video = Rc::new(RefCell::new(source));
                self.attach_source(Box::new(video.clone()));
                self.video = Some(video);
                self.status = format!("playing {}", self.video_path);
            }
            Err(err) => {
                self.status = format!("video failed: {err}");
                log::error!("failed to open video: {err}");
            }
        }
    }

    fn attach_source(&mut self, source: Box<dyn huemask::engine::FrameSource>) {
        // a new source invalidates the previous readouts and textures
        self.video = None;
        self.eyedrop = None;
        self.source_texture = None;
        self.mask_texture = None;
        self.fps_counter = FpsCounter::new();
        self.render_loop.start(source);
    }

    fn stop(&mut self) {
        self.render_loop.stop();
        self.video = None;
        self.status = "stopped".to_string();
    }
}

/// Scale `size` to fit into the given bounds while keeping its aspect ratio.
fn fit_size(size: egui::Vec2, max_width: f32, max_height: f32) -> egui::Vec2 {
    if size.x <= 0. || size.y <= 0. {
        return size;
    }
    let scale = (max_width / size.x).min(max_height / size.y).min(1.);
    egui::Vec2::new(size.x * scale, size.y * scale)
}
