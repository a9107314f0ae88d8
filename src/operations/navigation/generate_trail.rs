use crate::config::{TrailParams, DEFAULT_MAX_TRAIL_POSES};
use crate::error::{Result, TrailError};
use crate::math::frame::{pose_at, travel_orientation};
use crate::math::{Isometry3, Matrix4, Point3, TOLERANCE};
use crate::topology::Anchor;

/// Evenly spaced, oriented poses tracing a path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    poses: Vec<Isometry3>,
}

impl Trail {
    /// The poses in travel order.
    #[must_use]
    pub fn poses(&self) -> &[Isometry3] {
        &self.poses
    }

    /// The poses as 4x4 homogeneous matrices, for renderers.
    #[must_use]
    pub fn to_matrices(&self) -> Vec<Matrix4> {
        self.poses.iter().map(Isometry3::to_homogeneous).collect()
    }

    /// Number of poses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Returns `true` if the trail has no poses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

/// Resamples a path into a trail of poses spaced `step_size` apart.
///
/// Positions advance along the straight segments between consecutive
/// anchors. Spacing is measured along the whole path: whatever is left of a
/// step at the end of one segment carries into the next, so there is no gap
/// or restart at an anchor. Every pose on a segment shares that segment's
/// travel orientation (see [`crate::math::frame`]); orientation changes
/// abruptly at anchors.
pub struct GenerateTrail {
    step_size: f64,
    max_poses: usize,
}

impl GenerateTrail {
    /// Creates a new `GenerateTrail` operation with the default pose limit.
    ///
    /// # Errors
    ///
    /// Returns an error if `step_size` is not positive and finite.
    pub fn new(step_size: f64) -> Result<Self> {
        if !step_size.is_finite() || step_size <= 0.0 {
            return Err(TrailError::InvalidStepSize(step_size).into());
        }
        Ok(Self {
            step_size,
            max_poses: DEFAULT_MAX_TRAIL_POSES,
        })
    }

    /// Creates the operation from trail parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the step size is not positive and finite.
    pub fn from_params(params: &TrailParams) -> Result<Self> {
        Ok(Self::new(params.step_size)?.with_max_poses(params.max_poses))
    }

    /// Sets the largest number of poses a trail may contain.
    #[must_use]
    pub fn with_max_poses(mut self, max_poses: usize) -> Self {
        self.max_poses = max_poses;
        self
    }

    /// Returns the configured step size.
    #[must_use]
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Executes the operation over the anchors of a path.
    ///
    /// Fewer than two anchors yield an empty trail. Zero-length segments
    /// (consecutive anchors at the same position) contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TrailError::TooManyPoses`] before sampling anything if the
    /// path length at this step size needs more poses than the limit.
    pub fn execute<'a, P>(&self, path: P) -> Result<Trail>
    where
        P: IntoIterator<Item = &'a Anchor>,
    {
        let points: Vec<Point3> = path.into_iter().map(Anchor::position).collect();
        let length: f64 = points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
        if points.len() < 2 {
            return Ok(Trail::default());
        }

        #[allow(clippy::cast_precision_loss)]
        let limit = self.max_poses as f64;
        // Each segment may keep one extra pose within TOLERANCE of its end.
        #[allow(clippy::cast_precision_loss)]
        let required = (length / self.step_size).floor() + (points.len() - 1) as f64;
        if required > limit {
            return Err(TrailError::TooManyPoses {
                length,
                step: self.step_size,
                limit: self.max_poses,
            }
            .into());
        }

        let mut poses = Vec::new();
        let mut previous = points[0];
        // Distance into the current segment at which the next pose falls.
        let mut offset = 0.0;

        for &current in &points[1..] {
            let displacement = current - previous;
            let length = displacement.norm();
            let Some(orientation) = travel_orientation(&displacement) else {
                continue;
            };
            let direction = displacement / length;

            let mut k = 0.0;
            let mut travelled = offset;
            while travelled <= length + TOLERANCE {
                poses.push(pose_at(&(previous + direction * travelled), orientation));
                k += 1.0;
                travelled = offset + k * self.step_size;
            }

            offset = travelled - length;
            previous = current;
        }

        Ok(Trail { poses })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::NavGraphError;
    use crate::math::frame::forward;
    use crate::math::{Point3, Vector3};
    use crate::operations::Path;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use slotmap::SlotMap;

    fn path(points: &[(f64, f64, f64)]) -> Path {
        let mut keys: SlotMap<crate::topology::AnchorId, ()> = SlotMap::with_key();
        Path::new(
            points
                .iter()
                .map(|&(x, y, z)| Anchor::new(keys.insert(()), Isometry3::translation(x, y, z)))
                .collect(),
        )
    }

    fn position(pose: &Isometry3) -> Point3 {
        Point3::from(pose.translation.vector)
    }

    #[test]
    fn rejects_bad_step_sizes() {
        for step in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = GenerateTrail::new(step).err().unwrap();
            assert!(matches!(err, NavGraphError::Trail(TrailError::InvalidStepSize(_))));
        }
    }

    #[test]
    fn short_paths_are_empty() {
        let generate = GenerateTrail::new(0.5).unwrap();
        assert!(generate.execute(&Path::default()).unwrap().is_empty());
        assert!(generate.execute(&path(&[(1.0, 0.0, 0.0)])).unwrap().is_empty());
    }

    #[test]
    fn single_segment_count_and_spacing() {
        let generate = GenerateTrail::new(0.3).unwrap();
        let trail = generate.execute(&path(&[(0.0, 0.0, 0.0), (2.0, 0.0, 0.0)])).unwrap();

        // floor(2.0 / 0.3) + 1
        assert_eq!(trail.len(), 7);
        let first = trail.poses()[0];
        for (i, pose) in trail.poses().iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let expected = Point3::new(0.3 * i as f64, 0.0, 0.0);
            assert_relative_eq!(position(pose), expected, epsilon = 1e-9);
            assert_relative_eq!(pose.rotation, first.rotation, epsilon = 1e-12);
        }
        assert_relative_eq!(forward(&first), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn exact_multiple_includes_endpoint() {
        let generate = GenerateTrail::new(0.1).unwrap();
        let trail = generate.execute(&path(&[(0.0, 0.0, 0.0), (0.0, 0.0, 1.0)])).unwrap();
        assert_eq!(trail.len(), 11);
        assert_relative_eq!(
            position(&trail.poses()[10]),
            Point3::new(0.0, 0.0, 1.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn spacing_continues_across_segments() {
        let generate = GenerateTrail::new(2.0).unwrap();
        let trail = generate.execute(&path(&[
            (0.0, 0.0, 0.0),
            (3.0, 0.0, 0.0),
            (3.0, 0.0, 5.0),
        ]))
        .unwrap();

        // Cumulative distances 0, 2, 4, 6, 8 over a total length of 8.
        let expected = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 1.0),
            Point3::new(3.0, 0.0, 3.0),
            Point3::new(3.0, 0.0, 5.0),
        ];
        assert_eq!(trail.len(), expected.len());
        for (pose, point) in trail.poses().iter().zip(expected) {
            assert_relative_eq!(position(pose), point, epsilon = 1e-9);
        }

        // Orientation switches exactly between the second and third pose.
        let poses = trail.poses();
        assert_relative_eq!(forward(&poses[1]), Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(forward(&poses[2]), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(poses[2].rotation, poses[4].rotation, epsilon = 1e-12);
    }

    #[test]
    fn zero_length_segments_are_skipped() {
        let generate = GenerateTrail::new(1.0).unwrap();
        let trail = generate.execute(&path(&[
            (0.0, 0.0, 0.0),
            (0.0, 0.0, 0.0),
            (2.5, 0.0, 0.0),
            (2.5, 0.0, 0.0),
            (2.5, 0.0, 1.5),
        ]))
        .unwrap();

        let xs: Vec<Point3> = trail.poses().iter().map(position).collect();
        let expected = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.5, 0.0, 0.5),
            Point3::new(2.5, 0.0, 1.5),
        ];
        assert_eq!(xs.len(), expected.len());
        for (got, want) in xs.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn matrices_carry_translation() {
        let generate = GenerateTrail::new(1.0).unwrap();
        let trail = generate.execute(&path(&[(1.0, 2.0, 3.0), (1.0, 2.0, 5.0)])).unwrap();
        let matrices = trail.to_matrices();
        assert_eq!(matrices.len(), 3);
        assert_relative_eq!(matrices[2][(0, 3)], 1.0);
        assert_relative_eq!(matrices[2][(1, 3)], 2.0);
        assert_relative_eq!(matrices[2][(2, 3)], 5.0);
        assert_relative_eq!(matrices[2][(3, 3)], 1.0);
    }

    #[test]
    fn refuses_oversized_trails_before_sampling() {
        let one_metre = path(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);
        let err = GenerateTrail::new(1e-12).unwrap().execute(&one_metre).unwrap_err();
        assert!(matches!(
            err,
            NavGraphError::Trail(TrailError::TooManyPoses { limit: DEFAULT_MAX_TRAIL_POSES, .. })
        ));

        let two_metres = path(&[(0.0, 0.0, 0.0), (2.0, 0.0, 0.0)]);
        let tight = GenerateTrail::new(0.5).unwrap().with_max_poses(4);
        assert!(tight.execute(&two_metres).is_err());

        let params = TrailParams {
            step_size: 0.5,
            max_poses: 5,
        };
        let exact = GenerateTrail::from_params(&params).unwrap();
        assert_eq!(exact.execute(&two_metres).unwrap().len(), 5);
    }

    proptest! {
        #[test]
        fn pose_count_and_spacing_follow_step(
            step in 0.05..5.0f64,
            whole in 0usize..200,
            fraction in 0.01..0.99f64,
            (dx, dy, dz) in (-1.0..1.0f64, -1.0..1.0f64, -1.0..1.0f64),
        ) {
            let direction = Vector3::new(dx, dy, dz);
            prop_assume!(direction.norm() > 0.1);
            #[allow(clippy::cast_precision_loss)]
            let length = step * (whole as f64 + fraction);
            let end = direction.normalize() * length;

            let trail = GenerateTrail::new(step)
                .unwrap()
                .execute(&path(&[(0.0, 0.0, 0.0), (end.x, end.y, end.z)]))
                .unwrap();

            prop_assert_eq!(trail.len(), whole + 1);
            for pair in trail.poses().windows(2) {
                let gap = (position(&pair[1]) - position(&pair[0])).norm();
                prop_assert!((gap - step).abs() < 1e-9);
            }
        }
    }
}
