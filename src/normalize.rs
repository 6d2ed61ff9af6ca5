//! Display normalization: the scaling and re-centering pass that runs over
//! motion data before any drawing happens.

use log::debug;

use crate::types::{Motion, Position, RenderConfig, Skeleton};
use crate::{Error, Result};

/// Motion data after normalization, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMotion {
    /// Scaled, height-shifted and (when following the root) re-centered
    /// frames, same shape as the input motion.
    pub frames: Vec<Vec<Position>>,
    /// Bounding-box minimum of the scaled, height-shifted data. `mins.y` is
    /// always 0 after height normalization.
    pub mins: Position,
    /// Bounding-box maximum of the scaled, height-shifted data.
    pub maxs: Position,
    /// The root joint's horizontal (x, z) position per frame, recorded after
    /// scaling but before re-centering.
    pub trajectory: Vec<(f64, f64)>,
    /// The uniform scale factor that was applied.
    pub scale: f64,
}

/// Normalize raw motion into a display-friendly coordinate frame:
///
/// 1. validate that every frame carries one position per skeleton joint,
/// 2. derive a scale factor (explicit, or display radius / largest raw
///    bounding-box extent),
/// 3. scale uniformly and recompute the bounding box on the scaled data,
/// 4. shift everything down so the lowest point sits at height zero,
/// 5. record the root's horizontal trajectory,
/// 6. when `config.follow_root`, re-center each frame on its root joint so
///    the root's x and z are exactly zero per frame.
pub fn normalize(
    skeleton: &Skeleton,
    motion: &Motion,
    config: &RenderConfig,
) -> Result<NormalizedMotion> {
    if motion.num_frames() == 0 {
        return Err(Error::EmptyMotion);
    }
    for (frame, positions) in motion.frames().iter().enumerate() {
        if positions.len() != skeleton.len() {
            return Err(Error::JointCountMismatch {
                frame,
                expected: skeleton.len(),
                got: positions.len(),
            });
        }
    }

    // Raw extent is only used to derive the scale factor; camera limits and
    // plane placement use the recomputed post-scale bounding box below.
    let (raw_mins, raw_maxs) = bounds(motion.frames());
    let extent = raw_maxs - raw_mins;
    let max_extent = extent.x.max(extent.y).max(extent.z);

    let scale = match config.scale {
        Some(s) if s.is_finite() && s > 0.0 => s,
        Some(s) => {
            return Err(Error::InvalidConfig(format!(
                "explicit scale factor must be positive and finite, got {s}"
            )))
        }
        None => {
            if !(config.radius.is_finite() && config.radius > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "display radius must be positive and finite, got {}",
                    config.radius
                )));
            }
            if max_extent <= 0.0 {
                return Err(Error::ZeroExtent);
            }
            debug!(
                "derived scale factor {} (radius {} / extent {})",
                config.radius / max_extent,
                config.radius,
                max_extent
            );
            config.radius / max_extent
        }
    };

    let mut frames = motion.frames().to_vec();
    for frame in &mut frames {
        for p in frame.iter_mut() {
            *p *= scale;
        }
    }

    let (mut mins, mut maxs) = bounds(&frames);

    let height_offset = mins.y;
    debug!("height offset {height_offset}");
    for frame in &mut frames {
        for p in frame.iter_mut() {
            p.y -= height_offset;
        }
    }
    mins.y = 0.0;
    maxs.y -= height_offset;

    // Horizontal shifts below do not change y, so the trajectory can be read
    // off now, before re-centering throws the world position away.
    let trajectory: Vec<(f64, f64)> = frames.iter().map(|f| (f[0].x, f[0].z)).collect();

    if config.follow_root {
        for frame in &mut frames {
            let (root_x, root_z) = (frame[0].x, frame[0].z);
            for p in frame.iter_mut() {
                p.x -= root_x;
                p.z -= root_z;
            }
        }
    }

    Ok(NormalizedMotion {
        frames,
        mins,
        maxs,
        trajectory,
        scale,
    })
}

/// Component-wise bounding box over all frames and joints. Empty input
/// yields an inverted (infinite) box.
pub fn bounds(frames: &[Vec<Position>]) -> (Position, Position) {
    let mut mins = Position::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    let mut maxs = Position::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    for frame in frames {
        for p in frame {
            mins = Position::new(mins.x.min(p.x), mins.y.min(p.y), mins.z.min(p.z));
            maxs = Position::new(maxs.x.max(p.x), maxs.y.max(p.y), maxs.z.max(p.z));
        }
    }
    (mins, maxs)
}

/// Widen any axis with zero extent so the plotting ranges stay non-empty
/// (a perfectly flat skeleton would otherwise produce a degenerate chart).
pub(crate) fn pad_degenerate(mins: &mut Position, maxs: &mut Position) {
    const PAD: f64 = 0.5;
    for axis in 0..3 {
        if maxs[axis] - mins[axis] <= f64::EPSILON {
            mins[axis] -= PAD;
            maxs[axis] += PAD;
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;

    fn two_joint_skeleton() -> Skeleton {
        Skeleton::new(
            vec![-1, 0],
            vec![Position::new(0.0, 0.0, 0.0), Position::new(0.0, 1.0, 0.0)],
        )
        .unwrap()
    }

    /// Root fixed at the origin, child swinging from (0,1,0) to (2,1,0).
    fn swing_motion() -> Motion {
        Motion::from_frames(vec![
            vec![Position::new(0.0, 0.0, 0.0), Position::new(0.0, 1.0, 0.0)],
            vec![Position::new(0.0, 0.0, 0.0), Position::new(1.0, 1.0, 0.0)],
            vec![Position::new(0.0, 0.0, 0.0), Position::new(2.0, 1.0, 0.0)],
        ])
    }

    /// Root walking along +x/+z with the child riding one unit above it.
    fn walking_motion(frames: usize) -> Motion {
        Motion::from_frames(
            (0..frames)
                .map(|i| {
                    let root = Position::new(i as f64, 0.5, 2.0 * i as f64);
                    vec![root, root + Position::new(0.0, 1.0, 0.0)]
                })
                .collect(),
        )
    }

    #[test]
    fn scale_maps_extent_onto_radius() {
        let config = RenderConfig::default(); // radius 10
        let norm = normalize(&two_joint_skeleton(), &swing_motion(), &config).unwrap();

        // raw extent is 2 along x, so the factor is 10 / 2
        assert_eq!(norm.scale, 5.0);
        assert!((norm.maxs.x - norm.mins.x - config.radius).abs() < 1e-9);
    }

    #[test]
    fn explicit_scale_bypasses_radius() {
        let config = RenderConfig {
            scale: Some(2.0),
            follow_root: false,
            ..RenderConfig::default()
        };
        let norm = normalize(&two_joint_skeleton(), &swing_motion(), &config).unwrap();
        assert_eq!(norm.scale, 2.0);
        assert_eq!(norm.frames[2][1].x, 4.0);
    }

    #[test]
    fn root_is_centered_in_every_frame() {
        let config = RenderConfig {
            scale: Some(1.0),
            ..RenderConfig::default()
        };
        let norm = normalize(&two_joint_skeleton(), &walking_motion(4), &config).unwrap();
        for frame in &norm.frames {
            assert_eq!(frame[0].x, 0.0);
            assert_eq!(frame[0].z, 0.0);
        }
        // the child keeps its offset relative to the root
        assert_eq!(norm.frames[3][1].y - norm.frames[3][0].y, 1.0);
    }

    #[test]
    fn trajectory_is_recorded_before_centering() {
        let config = RenderConfig {
            scale: Some(1.0),
            ..RenderConfig::default()
        };
        let norm = normalize(&two_joint_skeleton(), &walking_motion(4), &config).unwrap();
        let expected: Vec<(f64, f64)> = (0..4).map(|i| (i as f64, 2.0 * i as f64)).collect();
        assert_eq!(norm.trajectory, expected);
    }

    #[test]
    fn without_follow_the_root_keeps_its_position() {
        let config = RenderConfig {
            scale: Some(1.0),
            follow_root: false,
            ..RenderConfig::default()
        };
        let norm = normalize(&two_joint_skeleton(), &walking_motion(4), &config).unwrap();
        for (frame, &(x, z)) in norm.frames.iter().zip(&norm.trajectory) {
            assert_eq!(frame[0].x, x);
            assert_eq!(frame[0].z, z);
        }
    }

    #[test]
    fn lowest_point_lands_on_height_zero() {
        let lifted = Motion::from_frames(
            swing_motion()
                .frames()
                .iter()
                .map(|f| f.iter().map(|p| p + Position::new(0.0, 3.0, 0.0)).collect())
                .collect(),
        );
        let norm = normalize(&two_joint_skeleton(), &lifted, &RenderConfig::default()).unwrap();

        let min_y = norm
            .frames
            .iter()
            .flatten()
            .fold(f64::INFINITY, |acc, p| acc.min(p.y));
        assert_eq!(min_y, 0.0);
        assert_eq!(norm.mins.y, 0.0);
    }

    #[test]
    fn frame_count_is_preserved() {
        let motion = walking_motion(7);
        let norm = normalize(&two_joint_skeleton(), &motion, &RenderConfig::default()).unwrap();
        assert_eq!(norm.frames.len(), motion.num_frames());
        assert_eq!(norm.trajectory.len(), motion.num_frames());
    }

    #[test]
    fn zero_extent_needs_an_explicit_scale() {
        let frozen = Motion::from_frames(vec![
            vec![Position::new(1.0, 1.0, 1.0); 2];
            3
        ]);
        let err = normalize(&two_joint_skeleton(), &frozen, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, crate::Error::ZeroExtent));

        let config = RenderConfig {
            scale: Some(1.0),
            ..RenderConfig::default()
        };
        assert!(normalize(&two_joint_skeleton(), &frozen, &config).is_ok());
    }

    #[test]
    fn shape_mismatches_fail_fast() {
        let skeleton = two_joint_skeleton();

        let empty = Motion::from_frames(vec![]);
        assert!(matches!(
            normalize(&skeleton, &empty, &RenderConfig::default()).unwrap_err(),
            crate::Error::EmptyMotion
        ));

        let ragged = Motion::from_frames(vec![
            vec![Position::new(0.0, 0.0, 0.0), Position::new(0.0, 1.0, 0.0)],
            vec![Position::new(0.0, 0.0, 0.0)],
        ]);
        assert!(matches!(
            normalize(&skeleton, &ragged, &RenderConfig::default()).unwrap_err(),
            crate::Error::JointCountMismatch {
                frame: 1,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn bad_config_is_rejected() {
        let bad_radius = RenderConfig {
            radius: 0.0,
            ..RenderConfig::default()
        };
        assert!(matches!(
            normalize(&two_joint_skeleton(), &swing_motion(), &bad_radius).unwrap_err(),
            crate::Error::InvalidConfig(_)
        ));

        let bad_scale = RenderConfig {
            scale: Some(-1.0),
            ..RenderConfig::default()
        };
        assert!(matches!(
            normalize(&two_joint_skeleton(), &swing_motion(), &bad_scale).unwrap_err(),
            crate::Error::InvalidConfig(_)
        ));
    }

    #[test]
    fn degenerate_axes_get_padded() {
        let (mut mins, mut maxs) = bounds(swing_motion().frames());
        pad_degenerate(&mut mins, &mut maxs);
        // the swing happens entirely in the z = 0 plane
        assert_eq!(mins.z, -0.5);
        assert_eq!(maxs.z, 0.5);
        // non-degenerate axes stay untouched
        assert_eq!(maxs.x, 2.0);
    }
}
