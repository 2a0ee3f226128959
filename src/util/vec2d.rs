use num::{Float, NumCast};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A 2D vector generic over any numeric type.
///
/// Used throughout the crate for waypoint positions, with `x` as the
/// eastward and `y` as the northward component relative to the airport
/// reference point.
///
/// # Type Parameters
/// * `T` - The functionality for the vector depends on traits implemented by `T`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Vec2D<T> {
    /// The x-component (east) of the vector.
    x: T,
    /// The y-component (north) of the vector.
    y: T,
}

impl<T: Copy> Vec2D<T> {
    /// Creates a new vector with the given x and y components.
    pub const fn new(x: T, y: T) -> Self { Self { x, y } }

    /// Returns the x-component of the vector.
    pub const fn x(&self) -> T { self.x }

    /// Returns the y-component of the vector.
    pub const fn y(&self) -> T { self.y }
}

impl<T> Vec2D<T>
where
    T: Float + NumCast,
{
    /// Computes the magnitude (absolute value) of the vector.
    pub fn abs(&self) -> T { (self.x.powi(2) + self.y.powi(2)).sqrt() }

    /// Creates a vector pointing from the current vector (`self`) to another vector.
    ///
    /// # Arguments
    /// * `other` - The target vector.
    ///
    /// # Returns
    /// A new vector representing the direction from `self` to `other`.
    pub fn to(&self, other: &Vec2D<T>) -> Vec2D<T> {
        Vec2D::new(other.x - self.x, other.y - self.y)
    }

    /// Computes the Euclidean distance between the current vector and another vector.
    pub fn euclid_distance(&self, other: &Self) -> T {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Computes the bearing from `self` to `other` in degrees clockwise
    /// from north, normalized to `[0, 360)`.
    ///
    /// # Arguments
    /// * `other` - The target vector.
    ///
    /// # Returns
    /// The bearing as a scalar of type `T`.
    pub fn bearing_to(&self, other: &Self) -> T {
        let full_circle = T::from(360.0).unwrap();
        let diff = self.to(other);
        let bearing = diff.x.atan2(diff.y).to_degrees();
        (bearing + full_circle) % full_circle
    }
}

impl<T: Add<Output = T>> Add for Vec2D<T> {
    type Output = Vec2D<T>;

    fn add(self, rhs: Self) -> Self::Output {
        Vec2D { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl<T: Sub<Output = T>> Sub for Vec2D<T> {
    type Output = Vec2D<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        Vec2D { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl<T: Mul<Output = T> + Copy> Mul<T> for Vec2D<T> {
    type Output = Vec2D<T>;

    fn mul(self, rhs: T) -> Self::Output {
        Vec2D { x: self.x * rhs, y: self.y * rhs }
    }
}

impl<T: Copy> From<(T, T)> for Vec2D<T> {
    fn from(value: (T, T)) -> Self { Self::new(value.0, value.1) }
}

impl<T: fmt::Display> fmt::Display for Vec2D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
