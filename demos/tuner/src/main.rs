use eframe::egui;
use tuner::TunerApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280., 800.]),
        ..Default::default()
    };
    eframe::run_native(
        "huemask tuner",
        options,
        Box::new(|_cc| Ok(Box::<TunerApp>::default())),
    )
}
