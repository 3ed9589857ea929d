use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of landmarks in the cat face annotation schema.
pub const NUM_LANDMARKS: usize = 48;

/// A 2D point (or vector) with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        (*self - *other).norm()
    }

    pub fn dot(&self, other: &Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean length when the point is read as a vector.
    pub fn norm(&self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Neg for Point {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl std::ops::Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Pixel {}
    impl Sealed for super::Normalized {}
}

/// Coordinate space a [`LandmarkSet`] lives in.
pub trait Space: sealed::Sealed + Copy + fmt::Debug + Send + Sync + 'static {
    const NAME: &'static str;
}

/// Coordinates tied to one image's width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel;

/// Coordinates divided by image width/height, nominally in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized;

impl Space for Pixel {
    const NAME: &'static str = "pixel";
}

impl Space for Normalized {
    const NAME: &'static str = "normalized";
}

/// Width and height of a source image, both strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    width: u32,
    height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "image size {width}x{height} has zero area"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Convert a point from pixel coordinates to normalized coordinates.
    /// x and y are scaled independently; aspect ratio is not preserved.
    pub fn normalize_point(&self, p: Point) -> Point {
        Point::new(p.x / self.width as f32, p.y / self.height as f32)
    }

    /// Convert a point from normalized coordinates to pixel coordinates.
    pub fn denormalize_point(&self, p: Point) -> Point {
        Point::new(p.x * self.width as f32, p.y * self.height as f32)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The 48 facial landmarks of one cat face, tagged with their coordinate space.
///
/// Construction validates the landmark count and rejects non-finite
/// coordinates, so every classifier and evaluator downstream can treat the
/// set as well-formed.
#[derive(Clone, PartialEq)]
pub struct LandmarkSet<S: Space> {
    points: Vec<Point>,
    _space: PhantomData<S>,
}

impl<S: Space> LandmarkSet<S> {
    pub fn from_points(points: Vec<Point>) -> Result<Self> {
        if points.len() != NUM_LANDMARKS {
            return Err(Error::LandmarkCount {
                expected: NUM_LANDMARKS,
                actual: points.len(),
            });
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "landmark {i} has non-finite {} coordinates",
                S::NAME
            )));
        }
        Ok(Self {
            points,
            _space: PhantomData,
        })
    }

    /// Build from `[x, y]` pairs, the shape used by label records.
    pub fn from_pairs(pairs: &[[f32; 2]]) -> Result<Self> {
        Self::from_points(pairs.iter().map(|&[x, y]| Point::new(x, y)).collect())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn to_pairs(&self) -> Vec<[f32; 2]> {
        self.points.iter().map(|p| [p.x, p.y]).collect()
    }

    fn map_points(&self, f: impl Fn(Point) -> Point) -> Vec<Point> {
        self.points.iter().map(|&p| f(p)).collect()
    }
}

impl LandmarkSet<Pixel> {
    /// Dividing by a non-zero image size cannot overflow, so this is
    /// infallible.
    pub fn normalize(&self, size: ImageSize) -> LandmarkSet<Normalized> {
        LandmarkSet {
            points: self.map_points(|p| size.normalize_point(p)),
            _space: PhantomData,
        }
    }
}

impl LandmarkSet<Normalized> {
    /// Scale back to pixel space. Fails if a far out-of-range coordinate
    /// overflows when multiplied by the image size.
    pub fn to_pixel(&self, size: ImageSize) -> Result<LandmarkSet<Pixel>> {
        LandmarkSet::from_points(self.map_points(|p| size.denormalize_point(p)))
    }
}

impl<S: Space> std::ops::Index<usize> for LandmarkSet<S> {
    type Output = Point;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

impl<S: Space> fmt::Debug for LandmarkSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LandmarkSet")
            .field("space", &S::NAME)
            .field("points", &self.points)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Point> {
        (0..NUM_LANDMARKS)
            .map(|i| Point::new((i % 8) as f32 * 10.0, (i / 8) as f32 * 20.0))
            .collect()
    }

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, 4.0);

        let diff = b - a;
        assert_eq!(diff.x, 2.0);
        assert_eq!(diff.y, 2.0);

        let neg = -a;
        assert_eq!(neg, Point::new(-1.0, -2.0));

        assert_eq!(a.dot(&b), 11.0);
        assert!((Point::new(3.0, 4.0).norm() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn image_size_normalization() {
        let size = ImageSize::new(200, 100).unwrap();

        let norm = size.normalize_point(Point::new(100.0, 25.0));
        assert!((norm.x - 0.5).abs() < 1e-6);
        assert!((norm.y - 0.25).abs() < 1e-6);

        let back = size.denormalize_point(norm);
        assert!((back.x - 100.0).abs() < 1e-4);
        assert!((back.y - 25.0).abs() < 1e-4);
    }

    #[test]
    fn zero_area_image_is_rejected() {
        assert!(matches!(ImageSize::new(0, 10), Err(Error::InvalidInput(_))));
        assert!(matches!(ImageSize::new(10, 0), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn landmark_count_is_enforced() {
        let err = LandmarkSet::<Pixel>::from_points(vec![Point::zero(); 47]).unwrap_err();
        assert!(matches!(
            err,
            Error::LandmarkCount {
                expected: 48,
                actual: 47
            }
        ));
    }

    #[test]
    fn non_finite_landmarks_are_rejected() {
        let mut points = grid();
        points[12] = Point::new(f32::NAN, 1.0);
        assert!(matches!(
            LandmarkSet::<Pixel>::from_points(points),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn space_round_trip() {
        let size = ImageSize::new(70, 140).unwrap();
        let pixel = LandmarkSet::<Pixel>::from_points(grid()).unwrap();
        let back = pixel.normalize(size).to_pixel(size).unwrap();
        for (a, b) in pixel.iter().zip(back.iter()) {
            assert!(a.distance(b) < 1e-3);
        }
    }

    #[test]
    fn norm_does_not_overflow_for_large_coordinates() {
        let v = Point::new(3e19, 4e19);
        assert!((v.norm() / 5e19 - 1.0).abs() < 1e-6);
        assert!(Point::new(1e30, 1e30).norm().is_finite());
    }

    #[test]
    fn overflowing_pixel_conversion_is_rejected() {
        let size = ImageSize::new(4000, 4000).unwrap();
        let mut points = grid();
        points[0] = Point::new(1e36, 0.5);
        let normalized = LandmarkSet::<Normalized>::from_points(points).unwrap();
        assert!(matches!(
            normalized.to_pixel(size),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn normalizing_extreme_pixels_stays_finite() {
        let size = ImageSize::new(1, 1).unwrap();
        let mut points = grid();
        points[5] = Point::new(f32::MAX, -f32::MAX);
        let pixel = LandmarkSet::<Pixel>::from_points(points).unwrap();
        assert!(pixel.normalize(size).iter().all(Point::is_finite));
    }
}
