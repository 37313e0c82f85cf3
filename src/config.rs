use crate::color::parse_color;
use crate::error::ConfigError;
use clap::Args;
use image::Rgb;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Deserializer};

/// Largest `branch_chance_mu` accepted while the runaway guard is enforced
pub const MAX_BRANCH_CHANCE_MU: f64 = 5.0;

/// Largest canvas `validate` accepts, in pixels (64 megapixels, ~192 MiB of RGB)
pub const MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

/// Tree parameters as a user types them: angles in degrees, colors as specs.
///
/// The same struct is filled by clap for the CLI and by serde for the web
/// form, so both adapters produce identical configurations. Form fields that
/// are left out fall back to the CLI defaults.
#[derive(Debug, Clone, Args, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Color of the background
    #[arg(long = "background_color", default_value = "white")]
    pub background_color: String,

    /// Color of the tree
    #[arg(long = "foreground_color", default_value = "black")]
    pub foreground_color: String,

    /// X dimension of the image (pixels)
    #[arg(long = "size_x", default_value_t = 1024)]
    pub size_x: u32,

    /// Y dimension of the image (pixels)
    #[arg(long = "size_y", default_value_t = 512)]
    pub size_y: u32,

    /// Starting angle of the trunk in degrees (180 grows straight up)
    #[arg(long = "starting_angle", default_value_t = 180.0)]
    pub starting_angle: f64,

    /// Length of the trunk in pixels; branches get shorter each generation
    #[arg(long = "starting_length", default_value_t = 100.0)]
    pub starting_length: f64,

    /// Width of the trunk in pixels; branches get thinner each generation
    #[arg(long = "starting_width", default_value_t = 30)]
    pub starting_width: i32,

    /// Maximum path length from the base to any leaf
    #[arg(long = "max_length", default_value_t = 400.0)]
    pub max_length: f64,

    /// Average number of branches spawned from a branch
    #[arg(long = "branch_chance_mu", default_value_t = 3.0)]
    pub branch_chance_mu: f64,

    /// Standard deviation of the number of spawned branches
    #[arg(long = "branch_chance_sigma", default_value_t = 1.0)]
    pub branch_chance_sigma: f64,

    /// Standard deviation (degrees) of a child's angle around its parent's
    #[arg(long = "angle_variance", default_value_t = 30.0)]
    pub angle_variance: f64,

    /// Average shortening per generation
    #[arg(long = "shortening_mu", default_value_t = 15.0)]
    pub shortening_mu: f64,

    /// Standard deviation of the shortening
    #[arg(long = "shortening_sigma", default_value_t = 1.0)]
    pub shortening_sigma: f64,

    /// Average thinning per generation
    #[arg(long = "thinning_mu", default_value_t = 5.0)]
    pub thinning_mu: f64,

    /// Standard deviation of the thinning
    #[arg(long = "thinning_sigma", default_value_t = 1.0)]
    pub thinning_sigma: f64,

    /// Branches thinner than this are not drawn
    #[arg(long = "min_width", default_value_t = 5)]
    pub min_width: i32,

    /// Branches shorter than this are not drawn
    #[arg(long = "min_length", default_value_t = 0.0)]
    pub min_length: f64,

    /// Lowest angle (degrees) a branch may twist to
    #[arg(long = "min_angle", default_value_t = 90.0)]
    pub min_angle: f64,

    /// Highest angle (degrees) a branch may twist to
    #[arg(long = "max_angle", default_value_t = 270.0)]
    pub max_angle: f64,

    /// Random seed for reproducibility
    #[arg(short, long)]
    #[serde(deserialize_with = "empty_as_none")]
    pub seed: Option<u64>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            background_color: "white".into(),
            foreground_color: "black".into(),
            size_x: 1024,
            size_y: 512,
            starting_angle: 180.0,
            starting_length: 100.0,
            starting_width: 30,
            max_length: 400.0,
            branch_chance_mu: 3.0,
            branch_chance_sigma: 1.0,
            angle_variance: 30.0,
            shortening_mu: 15.0,
            shortening_sigma: 1.0,
            thinning_mu: 5.0,
            thinning_sigma: 1.0,
            min_width: 5,
            min_length: 0.0,
            min_angle: 90.0,
            max_angle: 270.0,
            seed: None,
        }
    }
}

/// Whether `validate` refuses a `branch_chance_mu` above [`MAX_BRANCH_CHANCE_MU`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchGuard {
    Enforce,
    Waive,
}

/// Normal distribution parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    pub mean: f64,
    pub stddev: f64,
}

impl Gaussian {
    pub const fn new(mean: f64, stddev: f64) -> Self {
        Self { mean, stddev }
    }

    /// Draw one sample. A zero stddev always yields exactly `mean`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        self.mean + self.stddev * z
    }
}

/// Hard ceilings that keep a single rendering pass bounded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    /// Deepest generation that is still drawn (the trunk is depth 0)
    pub max_depth: u32,
    /// Total segments drawn before the pass stops growing
    pub max_segments: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_segments: 2_000_000,
        }
    }
}

/// Validated tree configuration. Angles are in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    pub background_color: Rgb<u8>,
    pub foreground_color: Rgb<u8>,
    pub size_x: u32,
    pub size_y: u32,
    pub starting_angle: f64,
    pub starting_length: f64,
    pub starting_width: i32,
    pub max_length: f64,
    pub branch_chance: Gaussian,
    pub angle_variance: f64,
    pub shortening: Gaussian,
    pub thinning: Gaussian,
    pub min_width: i32,
    pub min_length: f64,
    pub min_angle: f64,
    pub max_angle: f64,
    pub limits: Limits,
}

impl TreeParams {
    /// Check every constraint and convert into an engine configuration.
    pub fn validate(&self, guard: BranchGuard) -> Result<TreeConfig, ConfigError> {
        if self.size_x == 0 || self.size_y == 0 {
            return Err(ConfigError::EmptyCanvas {
                size_x: self.size_x,
                size_y: self.size_y,
            });
        }
        if u64::from(self.size_x) * u64::from(self.size_y) > MAX_CANVAS_PIXELS {
            return Err(ConfigError::CanvasTooLarge {
                size_x: self.size_x,
                size_y: self.size_y,
                limit: MAX_CANVAS_PIXELS,
            });
        }

        let numbers = [
            ("starting_angle", self.starting_angle),
            ("starting_length", self.starting_length),
            ("max_length", self.max_length),
            ("branch_chance_mu", self.branch_chance_mu),
            ("branch_chance_sigma", self.branch_chance_sigma),
            ("angle_variance", self.angle_variance),
            ("shortening_mu", self.shortening_mu),
            ("shortening_sigma", self.shortening_sigma),
            ("thinning_mu", self.thinning_mu),
            ("thinning_sigma", self.thinning_sigma),
            ("min_length", self.min_length),
            ("min_angle", self.min_angle),
            ("max_angle", self.max_angle),
        ];
        if let Some(&(field, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite { field });
        }

        let non_negative = [
            ("starting_length", self.starting_length),
            ("starting_width", f64::from(self.starting_width)),
            ("max_length", self.max_length),
            ("min_width", f64::from(self.min_width)),
            ("min_length", self.min_length),
            ("angle_variance", self.angle_variance),
        ];
        if let Some(&(field, value)) = non_negative.iter().find(|(_, v)| *v < 0.0) {
            return Err(ConfigError::Negative { field, value });
        }

        if self.min_angle > self.max_angle {
            return Err(ConfigError::AngleRange {
                min: self.min_angle,
                max: self.max_angle,
            });
        }

        if guard == BranchGuard::Enforce && self.branch_chance_mu > MAX_BRANCH_CHANCE_MU {
            return Err(ConfigError::RunawayBranching {
                mu: self.branch_chance_mu,
                limit: MAX_BRANCH_CHANCE_MU,
            });
        }

        Ok(TreeConfig {
            background_color: parse_color(&self.background_color)?,
            foreground_color: parse_color(&self.foreground_color)?,
            size_x: self.size_x,
            size_y: self.size_y,
            starting_angle: self.starting_angle.to_radians(),
            starting_length: self.starting_length,
            starting_width: self.starting_width,
            max_length: self.max_length,
            branch_chance: Gaussian::new(self.branch_chance_mu, self.branch_chance_sigma),
            angle_variance: self.angle_variance.to_radians(),
            shortening: Gaussian::new(self.shortening_mu, self.shortening_sigma),
            thinning: Gaussian::new(self.thinning_mu, self.thinning_sigma),
            min_width: self.min_width,
            min_length: self.min_length,
            min_angle: self.min_angle.to_radians(),
            max_angle: self.max_angle.to_radians(),
            limits: Limits::default(),
        })
    }
}

/// Blank form inputs arrive as `seed=`; treat them as absent
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    #[test]
    fn test_defaults_validate() {
        let config = TreeParams::default().validate(BranchGuard::Enforce).unwrap();
        assert_eq!((config.size_x, config.size_y), (1024, 512));
        assert_relative_eq!(config.starting_angle, PI);
        assert_relative_eq!(config.min_angle, PI / 2.0);
        assert_relative_eq!(config.max_angle, 3.0 * PI / 2.0);
        assert_relative_eq!(config.angle_variance, PI / 6.0);
        assert_eq!(config.branch_chance, Gaussian::new(3.0, 1.0));
        assert_eq!(config.foreground_color, Rgb([0, 0, 0]));
        assert_eq!(config.background_color, Rgb([255, 255, 255]));
    }

    #[test]
    fn test_empty_canvas_rejected() {
        let params = TreeParams { size_x: 0, ..TreeParams::default() };
        assert_eq!(
            params.validate(BranchGuard::Enforce),
            Err(ConfigError::EmptyCanvas { size_x: 0, size_y: 512 })
        );
    }

    #[test]
    fn test_oversized_canvas_rejected() {
        for (size_x, size_y) in [(u32::MAX, u32::MAX), (100_000, 100_000), (65_536, 1_025)] {
            let params = TreeParams { size_x, size_y, ..TreeParams::default() };
            assert_eq!(
                params.validate(BranchGuard::Waive),
                Err(ConfigError::CanvasTooLarge {
                    size_x,
                    size_y,
                    limit: MAX_CANVAS_PIXELS,
                })
            );
        }

        // Exactly at the limit is fine
        let params = TreeParams { size_x: 8192, size_y: 8192, ..TreeParams::default() };
        assert!(params.validate(BranchGuard::Enforce).is_ok());
    }

    #[test]
    fn test_negative_lengths_rejected() {
        let params = TreeParams { min_width: -1, ..TreeParams::default() };
        assert_eq!(
            params.validate(BranchGuard::Enforce),
            Err(ConfigError::Negative { field: "min_width", value: -1.0 })
        );

        let params = TreeParams { angle_variance: -5.0, ..TreeParams::default() };
        assert!(matches!(
            params.validate(BranchGuard::Enforce),
            Err(ConfigError::Negative { field: "angle_variance", .. })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let params = TreeParams { shortening_mu: f64::NAN, ..TreeParams::default() };
        assert_eq!(
            params.validate(BranchGuard::Enforce),
            Err(ConfigError::NotFinite { field: "shortening_mu" })
        );
    }

    #[test]
    fn test_inverted_angle_range_rejected() {
        let params = TreeParams {
            min_angle: 200.0,
            max_angle: 100.0,
            ..TreeParams::default()
        };
        assert_eq!(
            params.validate(BranchGuard::Enforce),
            Err(ConfigError::AngleRange { min: 200.0, max: 100.0 })
        );
    }

    #[test]
    fn test_equal_angle_bounds_allowed() {
        let params = TreeParams {
            min_angle: 180.0,
            max_angle: 180.0,
            ..TreeParams::default()
        };
        assert!(params.validate(BranchGuard::Enforce).is_ok());
    }

    #[test]
    fn test_branch_guard() {
        let params = TreeParams { branch_chance_mu: 5.5, ..TreeParams::default() };
        assert_eq!(
            params.validate(BranchGuard::Enforce),
            Err(ConfigError::RunawayBranching { mu: 5.5, limit: 5.0 })
        );
        assert!(params.validate(BranchGuard::Waive).is_ok());

        // The limit itself is still accepted
        let params = TreeParams { branch_chance_mu: 5.0, ..TreeParams::default() };
        assert!(params.validate(BranchGuard::Enforce).is_ok());
    }

    #[test]
    fn test_unknown_color_rejected() {
        let params = TreeParams {
            foreground_color: "not-a-color".into(),
            ..TreeParams::default()
        };
        assert_eq!(
            params.validate(BranchGuard::Enforce),
            Err(ConfigError::UnknownColor("not-a-color".into()))
        );
    }

    #[test]
    fn test_gaussian_zero_stddev_is_exact() {
        let mut rng = StdRng::seed_from_u64(7);
        let g = Gaussian::new(15.0, 0.0);
        for _ in 0..100 {
            assert_eq!(g.sample(&mut rng), 15.0);
        }
    }

    #[test]
    fn test_gaussian_sample_mean() {
        let mut rng = StdRng::seed_from_u64(42);
        let g = Gaussian::new(3.0, 1.0);
        let n = 20_000;
        let mean = (0..n).map(|_| g.sample(&mut rng)).sum::<f64>() / n as f64;
        assert!((mean - 3.0).abs() < 0.05, "sample mean {mean}");
    }
}
