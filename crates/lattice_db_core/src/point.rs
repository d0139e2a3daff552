use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Rem, Sub, SubAssign};
use num::Integer;
use std::cmp::Ordering;

/// The units of a `Point3`. Voxel (fine) and chunk (block) coordinates are distinct types so they can't be mixed up by
/// accident; converting between them always goes through a `ChunkSize`.
pub trait Unit: 'static {
    /// Short name used in `Debug` output.
    const NAME: &'static str;
}

/// Units of a single voxel.
pub enum Voxel {}

/// Units of a chunk (a fixed-size block of voxels).
pub enum Chunk {}

impl Unit for Voxel {
    const NAME: &'static str = "Voxel";
}

impl Unit for Chunk {
    const NAME: &'static str = "Chunk";
}

/// A 3-dimensional integer point in units `U`.
///
/// ```
/// use lattice_db_core::VoxelCoord;
///
/// let p1 = VoxelCoord::new(1, 2, 3);
/// let p2 = VoxelCoord::new(3, 4, 5);
///
/// assert_eq!(p1 + p2, VoxelCoord::new(4, 6, 8));
/// assert_eq!(p1 - p2, VoxelCoord::new(-2, -2, -2));
/// assert_eq!(p2 / 2, VoxelCoord::new(1, 2, 2));
/// ```
///
/// Like `PointN` in the rest of the lattice crates, there is a partial order defined on points which says that a point A is
/// greater than a point B if and only if all of the components of point A are greater than point B.
pub struct Point3<U> {
    xyz: [i32; 3],
    unit: PhantomData<fn() -> U>,
}

/// The coordinate of a single voxel.
pub type VoxelCoord = Point3<Voxel>;
/// The coordinate of a chunk. `chunk = voxel / chunk_size` (with floor division).
pub type ChunkCoord = Point3<Chunk>;

// A few of these traits could be derived. But derive would put bounds on `U`, which is only ever a marker.

impl<U> Clone for Point3<U> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}
impl<U> Copy for Point3<U> {}

impl<U> PartialEq for Point3<U> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.xyz == other.xyz
    }
}
impl<U> Eq for Point3<U> {}

impl<U> Hash for Point3<U> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.xyz.hash(state);
    }
}

impl<U> Default for Point3<U> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<U: Unit> fmt::Debug for Point3<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {}, {})", U::NAME, self.x(), self.y(), self.z())
    }
}

impl<U> fmt::Display for Point3<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x(), self.y(), self.z())
    }
}

impl<U> PartialOrd for Point3<U> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self < other {
            Some(Ordering::Less)
        } else if self > other {
            Some(Ordering::Greater)
        } else if self == other {
            Some(Ordering::Equal)
        } else {
            None
        }
    }

    #[inline]
    fn lt(&self, other: &Self) -> bool {
        self.x() < other.x() && self.y() < other.y() && self.z() < other.z()
    }

    #[inline]
    fn gt(&self, other: &Self) -> bool {
        self.x() > other.x() && self.y() > other.y() && self.z() > other.z()
    }

    #[inline]
    fn le(&self, other: &Self) -> bool {
        self.x() <= other.x() && self.y() <= other.y() && self.z() <= other.z()
    }

    #[inline]
    fn ge(&self, other: &Self) -> bool {
        self.x() >= other.x() && self.y() >= other.y() && self.z() >= other.z()
    }
}

impl<U> From<[i32; 3]> for Point3<U> {
    #[inline]
    fn from(xyz: [i32; 3]) -> Self {
        Self::from_array(xyz)
    }
}

impl<U> From<Point3<U>> for [i32; 3] {
    #[inline]
    fn from(p: Point3<U>) -> Self {
        p.xyz
    }
}

impl<U> Point3<U> {
    pub const ZERO: Self = Self::new(0, 0, 0);
    pub const ONES: Self = Self::new(1, 1, 1);
    pub const MIN: Self = Self::fill(i32::MIN);
    pub const MAX: Self = Self::fill(i32::MAX);

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self::from_array([x, y, z])
    }

    #[inline]
    pub const fn from_array(xyz: [i32; 3]) -> Self {
        Self {
            xyz,
            unit: PhantomData,
        }
    }

    #[inline]
    pub const fn fill(value: i32) -> Self {
        Self::from_array([value; 3])
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.xyz[0]
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.xyz[1]
    }

    #[inline]
    pub fn z(&self) -> i32 {
        self.xyz[2]
    }

    /// Returns the component specified by index. I.e. X = 0, Y = 1, Z = 2.
    #[inline]
    pub fn at(&self, component_index: usize) -> i32 {
        self.xyz[component_index]
    }

    #[inline]
    pub fn as_array(&self) -> [i32; 3] {
        self.xyz
    }

    #[inline]
    pub fn map_components_unary(&self, f: impl Fn(i32) -> i32) -> Self {
        Self::new(f(self.x()), f(self.y()), f(self.z()))
    }

    #[inline]
    pub fn map_components_binary(&self, other: &Self, f: impl Fn(i32, i32) -> i32) -> Self {
        Self::new(
            f(self.x(), other.x()),
            f(self.y(), other.y()),
            f(self.z(), other.z()),
        )
    }

    /// Component-wise maximum.
    #[inline]
    pub fn join(&self, other: &Self) -> Self {
        self.map_components_binary(other, |c1, c2| c1.max(c2))
    }

    /// Component-wise minimum.
    #[inline]
    pub fn meet(&self, other: &Self) -> Self {
        self.map_components_binary(other, |c1, c2| c1.min(c2))
    }

    /// Returns a point where each component is not smaller than the corresponding component of `lower`.
    #[inline]
    pub fn bound_min(&self, lower: &Self) -> Self {
        self.join(lower)
    }

    /// Returns a point where each component is not greater than the corresponding component of `upper`.
    #[inline]
    pub fn bound_max(&self, upper: &Self) -> Self {
        self.meet(upper)
    }

    /// Moves this point by `size` minus one. If `size` is the shape of a box starting here, this is the maximum point
    /// still inside of the box.
    #[inline]
    pub fn add_size(&self, size: &Self) -> Self {
        *self + *size - Self::ONES
    }

    #[inline]
    pub fn vector_div_floor(&self, rhs: &Self) -> Self {
        self.map_components_binary(rhs, |c1, c2| Integer::div_floor(&c1, &c2))
    }

    #[inline]
    pub fn vector_mod_floor(&self, rhs: &Self) -> Self {
        self.map_components_binary(rhs, |c1, c2| Integer::mod_floor(&c1, &c2))
    }

    /// The volume of the box with this point as its shape.
    #[inline]
    pub fn volume(&self) -> i64 {
        i64::from(self.x()) * i64::from(self.y()) * i64::from(self.z())
    }
}

impl<U> Add for Point3<U> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.map_components_binary(&rhs, |c1, c2| c1 + c2)
    }
}

impl<U> Sub for Point3<U> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.map_components_binary(&rhs, |c1, c2| c1 - c2)
    }
}

impl<U> AddAssign for Point3<U> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<U> SubAssign for Point3<U> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<U> Neg for Point3<U> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::ZERO - self
    }
}

impl<U> Mul for Point3<U> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.map_components_binary(&rhs, |c1, c2| c1 * c2)
    }
}

impl<U> Mul<i32> for Point3<U> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: i32) -> Self {
        self.map_components_unary(|c| c * rhs)
    }
}

// Division and remainder truncate toward zero. Use `vector_div_floor` when negative coordinates need to land in the
// containing cell.

impl<U> Div for Point3<U> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.map_components_binary(&rhs, |c1, c2| c1 / c2)
    }
}

impl<U> Div<i32> for Point3<U> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: i32) -> Self {
        self.map_components_unary(|c| c / rhs)
    }
}

impl<U> Rem for Point3<U> {
    type Output = Self;

    #[inline]
    fn rem(self, rhs: Self) -> Self {
        self.map_components_binary(&rhs, |c1, c2| c1 % c2)
    }
}

#[cfg(feature = "serde")]
impl<U> serde::Serialize for Point3<U> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.xyz.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, U> serde::Deserialize<'de> for Point3<U> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <[i32; 3]>::deserialize(deserializer).map(Self::from_array)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
