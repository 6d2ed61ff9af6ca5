//! Stick-figure rendering for skeletal animation data.
//!
//! Takes a joint hierarchy (a parents array) together with per-frame global
//! joint positions and renders the skeleton as an animated GIF, or takes the
//! hierarchy's rest-pose offsets and renders a single still image. All input
//! is in-memory; the only side effect is the written file.
//!
//! ```no_run
//! use skeleton_viz::{Motion, Position, RenderConfig, Skeleton, render_motion};
//!
//! // root + one child, three frames of the child swinging sideways
//! let skeleton = Skeleton::new(
//!     vec![-1, 0],
//!     vec![Position::new(0.0, 0.0, 0.0), Position::new(0.0, 1.0, 0.0)],
//! )?;
//! let motion = Motion::from_frames(vec![
//!     vec![Position::new(0.0, 0.0, 0.0), Position::new(0.0, 1.0, 0.0)],
//!     vec![Position::new(0.0, 0.0, 0.0), Position::new(1.0, 1.0, 0.0)],
//!     vec![Position::new(0.0, 0.0, 0.0), Position::new(2.0, 1.0, 0.0)],
//! ]);
//! render_motion(&skeleton, &motion, "swing.gif", &RenderConfig::default())?;
//! # Ok::<(), skeleton_viz::Error>(())
//! ```

pub mod normalize;
pub mod types;
pub mod visualize;

pub use normalize::{normalize, NormalizedMotion};
pub use types::{Index, Motion, ParentIndex, Position, RenderConfig, Skeleton};
pub use visualize::{render_motion, render_rest_pose};

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("skeleton has no joints")]
    EmptyHierarchy,

    #[error("joint {joint} has parent {parent}, which does not precede it")]
    InvalidHierarchy { joint: Index, parent: ParentIndex },

    #[error("skeleton has {joints} joints but {offsets} offsets")]
    OffsetCountMismatch { joints: usize, offsets: usize },

    #[error("frame {frame} has {got} joints, expected {expected}")]
    JointCountMismatch {
        frame: usize,
        expected: usize,
        got: usize,
    },

    #[error("motion contains no frames")]
    EmptyMotion,

    #[error("cannot reshape {values} values into frames of {joints} joints")]
    Reshape { values: usize, joints: usize },

    #[error("motion has zero spatial extent and no explicit scale factor")]
    ZeroExtent,

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("drawing failed: {0}")]
    Draw(String),
}

// The plotting backend's errors are generic over the backend type, so a
// `#[from]` attribute cannot cover them; a manual blanket impl keeps `?`
// usable throughout the drawing code.
impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Error::Draw(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
