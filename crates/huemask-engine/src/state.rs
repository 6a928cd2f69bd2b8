/// An inclusive HSV box used to decide which pixels enter the mask.
///
/// Hue bounds live in [0, 179], saturation and value bounds in [0, 255].
/// No ordering is enforced between a minimum and its maximum: a range with
/// `h_min > h_max` (or the S/V analog) selects nothing and yields an empty
/// mask, which is a valid way to mute the output while tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HsvRange {
    /// Lower hue bound, inclusive, in [0, 179].
    pub h_min: u8,
    /// Upper hue bound, inclusive, in [0, 179].
    pub h_max: u8,
    /// Lower saturation bound, inclusive.
    pub s_min: u8,
    /// Upper saturation bound, inclusive.
    pub s_max: u8,
    /// Lower value bound, inclusive.
    pub v_min: u8,
    /// Upper value bound, inclusive.
    pub v_max: u8,
}

impl Default for HsvRange {
    /// The full hue circle with low saturation and value cut off, a useful
    /// starting point for isolating any saturated color.
    fn default() -> Self {
        Self {
            h_min: 0,
            h_max: 179,
            s_min: 50,
            s_max: 255,
            v_min: 50,
            v_max: 255,
        }
    }
}

impl HsvRange {
    /// The lower bounds as an HSV triplet.
    pub fn lower(&self) -> [u8; 3] {
        [self.h_min, self.s_min, self.v_min]
    }

    /// The upper bounds as an HSV triplet.
    pub fn upper(&self) -> [u8; 3] {
        [self.h_max, self.s_max, self.v_max]
    }

    /// One-line textual summary of the active range for display surfaces.
    pub fn summary(&self) -> String {
        format!(
            "H {}-{}  S {}-{}  V {}-{}",
            self.h_min, self.h_max, self.s_min, self.s_max, self.v_min, self.v_max
        )
    }
}

/// Toggles that parameterize the mask pipeline.
///
/// The two options are independent; both default to off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Smooth the HSV image with a 3x3 box blur before thresholding.
    pub blur: bool,
    /// Clean the mask with a 3x3 morphological opening after thresholding.
    pub morphology: bool,
}

#[cfg(test)]
mod tests {
    use super::{HsvRange, PipelineOptions};

    #[test]
    fn default_range_covers_saturated_colors() {
        let range = HsvRange::default();
        assert_eq!(range.lower(), [0, 50, 50]);
        assert_eq!(range.upper(), [179, 255, 255]);
    }

    #[test]
    fn summary_lists_all_bounds() {
        let range = HsvRange {
            h_min: 60,
            h_max: 120,
            ..Default::default()
        };
        assert_eq!(range.summary(), "H 60-120  S 50-255  V 50-255");
    }

    #[test]
    fn options_default_off() {
        let options = PipelineOptions::default();
        assert!(!options.blur);
        assert!(!options.morphology);
    }
}
