//! Orientation frames for poses that travel along a straight segment.
//!
//! A travel frame is a right-handed rotation whose columns are
//! `[right, up, right × up]`. The third column points against the
//! direction of travel, so a pose looks down its local `-Z` axis the same
//! way a camera does.

use nalgebra::{Rotation3, Translation3};

use super::{Isometry3, Point3, UnitQuaternion, Vector3, TOLERANCE};

/// Reference up axis of map space.
#[must_use]
pub fn world_up() -> Vector3 {
    Vector3::y()
}

/// Builds the orientation for travelling along `direction`.
///
/// Returns `None` if `direction` has zero length. Directions parallel to
/// [`world_up`] use `+Z` as the reference axis instead, since the cross
/// product with the up vector vanishes there.
#[must_use]
pub fn travel_orientation(direction: &Vector3) -> Option<UnitQuaternion> {
    let forward = direction.try_normalize(TOLERANCE)?;

    let right = forward
        .cross(&world_up())
        .try_normalize(TOLERANCE)
        .or_else(|| forward.cross(&Vector3::z()).try_normalize(TOLERANCE))?;
    let up = right.cross(&forward);
    let back = right.cross(&up);

    let rotation = Rotation3::from_basis_unchecked(&[right, up, back]);
    Some(UnitQuaternion::from_rotation_matrix(&rotation))
}

/// Places a travel-frame pose at `position`.
#[must_use]
pub fn pose_at(position: &Point3, orientation: UnitQuaternion) -> Isometry3 {
    Isometry3::from_parts(Translation3::from(position.coords), orientation)
}

/// Direction a pose is facing, i.e. its local `-Z` axis in map space.
#[must_use]
pub fn forward(pose: &Isometry3) -> Vector3 {
    -(pose.rotation * Vector3::z())
}
