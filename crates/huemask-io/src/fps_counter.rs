use std::time::Instant;

/// The smoothing factor for the FPS estimate.
const SMOOTHING: f32 = 0.95;

/// A simple frames per second (FPS) counter.
///
/// Call [`FpsCounter::update`] once per rendered frame; [`FpsCounter::fps`]
/// returns an exponentially smoothed estimate.
///
/// # Examples
///
/// ```
/// use huemask_io::fps_counter::FpsCounter;
///
/// let mut fps_counter = FpsCounter::new();
///
/// for _ in 0..100 {
///     fps_counter.update();
/// }
/// ```
pub struct FpsCounter {
    last_update: Instant,
    smoothed: Option<f32>,
}

impl FpsCounter {
    /// Creates a new `FpsCounter`.
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            smoothed: None,
        }
    }

    /// Returns the current FPS estimate, 0.0 until the first update.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.smoothed.unwrap_or(0.0)
    }

    /// Registers a rendered frame and refreshes the FPS estimate.
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;

        if elapsed <= 0.0 {
            return;
        }

        let instant_fps = 1.0 / elapsed;
        self.smoothed = Some(match self.smoothed {
            Some(fps) => fps * SMOOTHING + instant_fps * (1.0 - SMOOTHING),
            None => instant_fps,
        });
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
