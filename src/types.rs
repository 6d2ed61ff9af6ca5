use cgmath::Vector3;

use crate::{Error, Result};

/////////////////////////////////////////////////////////////////////////////////////////////////

pub type Index = usize;
pub type ParentIndex = isize; // -1 for the root joint, which has no parent
pub type Position = Vector3<f64>;

/////////////////////////////////////////////////////////////////////////////////////////////////

/// A rooted tree of joints given as a parents array, plus the rest-pose
/// offset of every joint relative to its parent.
///
/// Joints are ordered so that every parent precedes its children; the root
/// sits at index 0 with parent -1. The constructor enforces this, so code
/// holding a `Skeleton` may process joints in index order without any tree
/// traversal.
#[derive(Debug, Clone)]
pub struct Skeleton {
    parents: Vec<ParentIndex>,
    offsets: Vec<Position>,
}

impl Skeleton {
    pub fn new(parents: Vec<ParentIndex>, offsets: Vec<Position>) -> Result<Self> {
        if parents.is_empty() {
            return Err(Error::EmptyHierarchy);
        }
        if parents[0] != -1 {
            return Err(Error::InvalidHierarchy {
                joint: 0,
                parent: parents[0],
            });
        }
        for (joint, &parent) in parents.iter().enumerate().skip(1) {
            if parent < 0 || parent as Index >= joint {
                return Err(Error::InvalidHierarchy { joint, parent });
            }
        }
        if offsets.len() != parents.len() {
            return Err(Error::OffsetCountMismatch {
                joints: parents.len(),
                offsets: offsets.len(),
            });
        }
        Ok(Self { parents, offsets })
    }

    pub fn parents(&self) -> &[ParentIndex] {
        &self.parents
    }

    pub fn offsets(&self) -> &[Position] {
        &self.offsets
    }

    /// Number of joints.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Iterate over the bones as (joint, parent) index pairs, skipping the
    /// root (which has no bone).
    pub fn bones(&self) -> impl Iterator<Item = (Index, Index)> + '_ {
        self.parents
            .iter()
            .enumerate()
            .skip(1)
            .map(|(joint, &parent)| (joint, parent as Index))
    }

    /// Resolve the rest pose to world positions by accumulating each joint's
    /// offset onto its parent's already-resolved position. A single forward
    /// pass suffices because parents always precede their children.
    pub fn rest_global_positions(&self) -> Vec<Position> {
        let mut globals: Vec<Position> = Vec::with_capacity(self.len());
        for (joint, &parent) in self.parents.iter().enumerate() {
            if parent == -1 {
                globals.push(self.offsets[joint]);
            } else {
                globals.push(globals[parent as Index] + self.offsets[joint]);
            }
        }
        globals
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Motion data: one world position per joint per frame, frame-major.
#[derive(Debug, Clone)]
pub struct Motion {
    frames: Vec<Vec<Position>>,
}

impl Motion {
    pub fn from_frames(frames: Vec<Vec<Position>>) -> Self {
        Self { frames }
    }

    /// Reshape a flat `[x, y, z, x, y, z, ..]` slice into (frame, joint, 3)
    /// form. The slice length must be a multiple of `3 * num_joints`.
    pub fn from_flat(values: &[f64], num_joints: usize) -> Result<Self> {
        let stride = num_joints * 3;
        if stride == 0 || values.len() % stride != 0 {
            return Err(Error::Reshape {
                values: values.len(),
                joints: num_joints,
            });
        }
        let frames = values
            .chunks_exact(stride)
            .map(|frame| {
                frame
                    .chunks_exact(3)
                    .map(|p| Position::new(p[0], p[1], p[2]))
                    .collect()
            })
            .collect();
        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[Vec<Position>] {
        &self.frames
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Joint count of the first frame (0 for empty motion). Per-frame
    /// consistency against a skeleton is checked at render time.
    pub fn num_joints(&self) -> usize {
        self.frames.first().map_or(0, Vec::len)
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Caller-supplied render settings. Nothing here is persisted; construct one
/// per call (or reuse, they are plain data).
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output surface size in pixels (width, height).
    pub size: (u32, u32),
    /// Target playback rate; the animation frame delay is `1000 / fps` ms.
    pub fps: u32,
    /// Display radius: the derived scale factor maps the motion's largest
    /// bounding-box extent onto this many scene units.
    pub radius: f64,
    /// Explicit scale factor. When set, `radius` is not used for scaling.
    pub scale: Option<f64>,
    /// Title drawn above the figure; empty means no caption at all.
    pub title: String,
    /// Camera elevation in degrees.
    pub elevation: f64,
    /// Camera azimuth in degrees.
    pub azimuth: f64,
    /// Camera dolly distance; smaller means closer.
    pub distance: f64,
    /// Re-center every frame on the root joint so the skeleton animates in
    /// place and the camera effectively follows it.
    pub follow_root: bool,
    /// Draw the historical root trajectory as a trail on the ground plane.
    pub draw_trajectory: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size: (600, 600),
            fps: 30,
            radius: 10.0,
            scale: None,
            title: String::new(),
            elevation: 120.0,
            azimuth: -90.0,
            distance: 7.5,
            follow_root: true,
            draw_trajectory: true,
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////
