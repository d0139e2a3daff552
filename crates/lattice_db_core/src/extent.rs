use crate::{point::Unit, Chunk, ChunkSize, Point3, Voxel};

use core::fmt;
use core::ops::Range;
use itertools::{iproduct, ConsTuples, Product};

/// A 3-dimensional extent in units `U`. This is mathematically the Cartesian product of a half-closed interval `[a, b)` in
/// each dimension. When reading a region out of a chunked store, this is the structure used to determine the bounds of the
/// query.
pub struct Extent3<U> {
    /// The least point contained in the extent.
    pub minimum: Point3<U>,
    /// The length of each dimension.
    pub shape: Point3<U>,
}

/// An extent measured in voxels.
pub type VoxelExtent = Extent3<Voxel>;
/// An extent measured in chunks.
pub type ChunkExtent = Extent3<Chunk>;

impl<U> Clone for Extent3<U> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}
impl<U> Copy for Extent3<U> {}

impl<U> PartialEq for Extent3<U> {
    fn eq(&self, other: &Self) -> bool {
        self.minimum == other.minimum && self.shape == other.shape
    }
}
impl<U> Eq for Extent3<U> {}

impl<U: Unit> fmt::Debug for Extent3<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extent3")
            .field("minimum", &self.minimum)
            .field("shape", &self.shape)
            .finish()
    }
}

impl<U> Extent3<U> {
    /// The default representation of an extent as the minimum point and shape.
    #[inline]
    pub fn from_min_and_shape(minimum: Point3<U>, shape: Point3<U>) -> Self {
        Self { minimum, shape }
    }

    /// An alternative representation of an extent as the minimum point and least upper bound.
    #[inline]
    pub fn from_min_and_lub(minimum: Point3<U>, least_upper_bound: Point3<U>) -> Self {
        // We want to avoid negative shape components. A shape too long for `i32` is clamped.
        let shape = least_upper_bound
            .map_components_binary(&minimum, i32::saturating_sub)
            .join(&Point3::ZERO);

        Self { minimum, shape }
    }

    /// An extent containing both `minimum` and `max` (inclusive). The least upper bound cannot pass `i32::MAX`, so a `max`
    /// component of `i32::MAX` is excluded.
    #[inline]
    pub fn from_min_and_max(minimum: Point3<U>, max: Point3<U>) -> Self {
        Self::from_min_and_lub(minimum, max.map_components_unary(|c| c.saturating_add(1)))
    }

    /// The least point `p` for which all points `q` in the extent satisfy `q < p`.
    #[inline]
    pub fn least_upper_bound(&self) -> Point3<U> {
        self.minimum + self.shape
    }

    /// The greatest point contained in the extent.
    #[inline]
    pub fn max(&self) -> Point3<U> {
        self.least_upper_bound() - Point3::ONES
    }

    /// Returns `true` iff the point `p` is contained in this extent.
    #[inline]
    pub fn contains(&self, p: Point3<U>) -> bool {
        let lub = self.least_upper_bound();

        self.minimum <= p && p < lub
    }

    /// The number of points contained in the extent.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.shape.volume().max(0) as usize
    }

    /// Returns `true` iff the number of points in the extent is 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_points() == 0
    }

    /// Returns the extent containing only the points in both `self` and `other`.
    #[inline]
    pub fn intersection(&self, other: &Self) -> Self {
        let minimum = self.minimum.join(&other.minimum);
        let lub = self.least_upper_bound().meet(&other.least_upper_bound());

        Self::from_min_and_lub(minimum, lub)
    }

    /// Iterates over all points in row-major order, i.e. X varies fastest and Z slowest.
    #[inline]
    pub fn iter_points(&self) -> Extent3PointIter<U> {
        let lub = self.least_upper_bound();

        Extent3PointIter {
            // iproduct is opposite of row-major order.
            product_iter: iproduct!(
                self.minimum.z()..lub.z(),
                self.minimum.y()..lub.y(),
                self.minimum.x()..lub.x()
            ),
            unit: Default::default(),
        }
    }
}

impl VoxelExtent {
    /// The smallest extent of chunks that contains every voxel of `self`.
    pub fn chunks_covering(&self, size: &ChunkSize) -> ChunkExtent {
        if self.is_empty() {
            return ChunkExtent::from_min_and_shape(self.minimum.chunk(size), Point3::ZERO);
        }

        ChunkExtent::from_min_and_max(self.minimum.chunk(size), self.max().chunk(size))
    }
}

type RangeProduct2 = Product<Range<i32>, Range<i32>>;
type RangeProduct3 = Product<RangeProduct2, Range<i32>>;

/// An iterator over all points in an `Extent3<U>`.
pub struct Extent3PointIter<U> {
    product_iter: ConsTuples<RangeProduct3, ((i32, i32), i32)>,
    unit: std::marker::PhantomData<fn() -> U>,
}

impl<U> Iterator for Extent3PointIter<U> {
    type Item = Point3<U>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.product_iter.next().map(|(z, y, x)| Point3::new(x, y, z))
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ChunkCoord, VoxelCoord};

    use pretty_assertions::assert_eq;

    #[test]
    fn row_major_extent_iter() {
        let extent = ChunkExtent::from_min_and_shape(ChunkCoord::ZERO, ChunkCoord::fill(2));

        let points: Vec<_> = extent.iter_points().collect();

        assert_eq!(
            points,
            vec![
                ChunkCoord::new(0, 0, 0),
                ChunkCoord::new(1, 0, 0),
                ChunkCoord::new(0, 1, 0),
                ChunkCoord::new(1, 1, 0),
                ChunkCoord::new(0, 0, 1),
                ChunkCoord::new(1, 0, 1),
                ChunkCoord::new(0, 1, 1),
                ChunkCoord::new(1, 1, 1),
            ]
        );
    }

    #[test]
    fn min_and_max_are_inclusive() {
        let extent = VoxelExtent::from_min_and_max(VoxelCoord::new(-1, 0, 0), VoxelCoord::new(1, 4, 0));

        assert_eq!(extent.shape, VoxelCoord::new(3, 5, 1));
        assert_eq!(extent.max(), VoxelCoord::new(1, 4, 0));
        assert_eq!(extent.num_points(), 15);
        assert!(extent.contains(VoxelCoord::new(1, 4, 0)));
        assert!(!extent.contains(VoxelCoord::new(2, 4, 0)));
    }

    #[test]
    fn bounds_at_the_edge_of_i32_do_not_overflow() {
        let extent = VoxelExtent::from_min_and_max(VoxelCoord::new(i32::MAX - 2, 0, 0), VoxelCoord::new(i32::MAX, 0, 0));
        assert_eq!(extent.shape, VoxelCoord::new(2, 1, 1));
        assert_eq!(extent.least_upper_bound().x(), i32::MAX);

        let everything = VoxelExtent::from_min_and_lub(VoxelCoord::fill(i32::MIN), VoxelCoord::fill(i32::MAX));
        assert_eq!(everything.shape, VoxelCoord::fill(i32::MAX));
        assert_eq!(everything.least_upper_bound(), VoxelCoord::fill(-1));
    }

    #[test]
    fn intersection_of_disjoint_extents_is_empty() {
        let a = VoxelExtent::from_min_and_shape(VoxelCoord::ZERO, VoxelCoord::fill(4));
        let b = VoxelExtent::from_min_and_shape(VoxelCoord::fill(10), VoxelCoord::fill(4));

        assert!(a.intersection(&b).is_empty());
        assert_eq!(
            a.intersection(&VoxelExtent::from_min_and_shape(VoxelCoord::fill(2), VoxelCoord::fill(4))),
            VoxelExtent::from_min_and_shape(VoxelCoord::fill(2), VoxelCoord::fill(2))
        );
    }

    #[test]
    fn chunks_covering_subvolume() {
        let size = ChunkSize::cube(32).unwrap();
        let subvolume =
            VoxelExtent::from_min_and_shape(VoxelCoord::new(-10, 0, 40), VoxelCoord::new(20, 64, 1));

        let chunks = subvolume.chunks_covering(&size);

        assert_eq!(chunks.minimum, ChunkCoord::new(-1, 0, 1));
        assert_eq!(chunks.max(), ChunkCoord::new(0, 1, 1));
    }
}
