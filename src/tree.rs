//! Recursive, randomized branch growth.
//!
//! Every call draws one segment and then spawns a random number of children
//! whose angle, length and width are perturbed copies of its own. Growth
//! along a path stops once the path's accumulated length reaches
//! `max_length`, or the branch gets thinner than `min_width` or shorter than
//! `min_length`.
//!
//! Two entry points share the same sampling order: [`render_tree`] draws as
//! it goes, [`grow_tree`] builds a [`Branch`] tree that can be inspected and
//! painted later. Given the same seeded RNG they produce the same segments.

use crate::canvas::{Canvas, Point, Surface};
use crate::config::{Gaussian, TreeConfig};
use image::Rgb;
use rand::Rng;
use tracing::debug;

/// State of one branch before it is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprout {
    pub origin: Point,
    /// Radians; 0 points down the canvas, PI points up
    pub angle: f64,
    pub length: f64,
    pub width: i32,
    /// Path length from the root up to (not including) this branch
    pub travelled: f64,
    /// Generation, the trunk is 0
    pub depth: u32,
}

impl Sprout {
    /// The trunk of a tree
    pub fn root(origin: Point, angle: f64, length: f64, width: i32) -> Self {
        Self {
            origin,
            angle,
            length,
            width,
            travelled: 0.0,
            depth: 0,
        }
    }

    /// Where a segment from `origin` at `angle` for `length` ends. Each axis
    /// is rounded on its own.
    pub fn endpoint(&self) -> Point {
        let dx = round_half_even(self.angle.sin() * self.length);
        let dy = round_half_even(self.angle.cos() * self.length);
        // Float addition then a saturating cast: huge lengths pin to the i32 range
        Point::new(
            (f64::from(self.origin.x) + dx) as i32,
            (f64::from(self.origin.y) + dy) as i32,
        )
    }
}

/// A drawn branch and everything that grew out of it
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub start: Point,
    pub end: Point,
    pub angle: f64,
    pub length: f64,
    pub width: i32,
    pub children: Vec<Branch>,
}

impl Branch {
    /// Draw this branch and its descendants, parents before children
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S, color: Rgb<u8>) {
        surface.draw_line(self.start, self.end, self.width, color);
        for child in &self.children {
            child.paint(surface, color);
        }
    }

    pub fn segment_count(&self) -> usize {
        1 + self.children.iter().map(Branch::segment_count).sum::<usize>()
    }

    /// Number of generations, a lone trunk is 1
    pub fn depth(&self) -> u32 {
        1 + self.children.iter().map(Branch::depth).max().unwrap_or(0)
    }
}

/// Round to the nearest integer, ties to even
fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Recursion context shared by both entry points
struct Grower<'a, R: ?Sized> {
    rng: &'a mut R,
    config: &'a TreeConfig,
    drawn: usize,
}

impl<R: Rng + ?Sized> Grower<'_, R> {
    /// Termination guards, in order. None of them has side effects.
    fn is_spent(&self, sprout: &Sprout) -> bool {
        let config = self.config;
        sprout.travelled >= config.max_length
            || sprout.width < config.min_width
            || sprout.length < config.min_length
            || sprout.depth > config.limits.max_depth
            || self.drawn >= config.limits.max_segments
    }

    /// Folded-normal branch count: |round(N(mu, sigma))|. A mean of zero
    /// with non-zero sigma still yields branches most of the time.
    fn branch_count(&mut self) -> u32 {
        let sample = self.config.branch_chance.sample(&mut *self.rng);
        round_half_even(sample).abs() as u32
    }

    /// Perturbed child of a branch that ended at `origin`
    fn offshoot(&mut self, parent: &Sprout, origin: Point, travelled: f64) -> Sprout {
        let config = self.config;
        let spread = Gaussian::new(parent.angle, config.angle_variance);
        let angle = spread.sample(&mut *self.rng).max(config.min_angle).min(config.max_angle);
        let length = parent.length - config.shortening.sample(&mut *self.rng);
        let width = round_half_even(f64::from(parent.width) - config.thinning.sample(&mut *self.rng));

        Sprout {
            origin,
            angle,
            length,
            width: width as i32,
            travelled,
            depth: parent.depth + 1,
        }
    }

    fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S, sprout: Sprout) {
        if self.is_spent(&sprout) {
            return;
        }

        let end = sprout.endpoint();
        surface.draw_line(sprout.origin, end, sprout.width, self.config.foreground_color);
        self.drawn += 1;
        let travelled = sprout.travelled + sprout.length;

        for _ in 0..self.branch_count() {
            let child = self.offshoot(&sprout, end, travelled);
            self.draw(surface, child);
        }
    }

    fn grow(&mut self, sprout: Sprout) -> Option<Branch> {
        if self.is_spent(&sprout) {
            return None;
        }

        let end = sprout.endpoint();
        self.drawn += 1;
        let travelled = sprout.travelled + sprout.length;

        let mut children = Vec::new();
        for _ in 0..self.branch_count() {
            let child = self.offshoot(&sprout, end, travelled);
            children.extend(self.grow(child));
        }

        Some(Branch {
            start: sprout.origin,
            end,
            angle: sprout.angle,
            length: sprout.length,
            width: sprout.width,
            children,
        })
    }
}

/// Draw the tree rooted at `sprout` onto `surface`, returning how many
/// segments were drawn.
pub fn render_tree<S, R>(surface: &mut S, rng: &mut R, sprout: Sprout, config: &TreeConfig) -> usize
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    let mut grower = Grower { rng, config, drawn: 0 };
    grower.draw(surface, sprout);
    grower.drawn
}

/// Grow the tree rooted at `sprout` without drawing it. `None` when the
/// root itself is already past a termination guard.
pub fn grow_tree<R: Rng + ?Sized>(rng: &mut R, sprout: Sprout, config: &TreeConfig) -> Option<Branch> {
    let mut grower = Grower { rng, config, drawn: 0 };
    grower.grow(sprout)
}

/// Render a whole picture: a fresh canvas with the trunk standing on the
/// middle of the bottom edge.
pub fn render<R: Rng + ?Sized>(config: &TreeConfig, rng: &mut R) -> Canvas {
    let mut canvas = Canvas::new(config.size_x, config.size_y, config.background_color);
    let origin = Point::new((config.size_x / 2) as i32, config.size_y as i32);
    let trunk = Sprout::root(
        origin,
        config.starting_angle,
        config.starting_length,
        config.starting_width,
    );

    let drawn = render_tree(&mut canvas, rng, trunk, config);
    debug!(segments = drawn, width = config.size_x, height = config.size_y, "tree rendered");
    canvas
}

/// Seed derived from the wall clock, for runs without an explicit seed
pub fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0) // Fallback seed for misconfigured system clocks
}
