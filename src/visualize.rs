//! Stick-figure drawing: feeds normalized motion (or a resolved rest pose)
//! through a 3D chart into the bitmap backend's animation or image writer.

use std::ops::Range;
use std::path::Path;

use log::{info, warn};
use plotters::coord::ranged3d::Cartesian3d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::normalize::{bounds, normalize, pad_degenerate, NormalizedMotion};
use crate::types::{Motion, Position, RenderConfig, Skeleton};
use crate::{Error, Result};

/////////////////////////////////////////////////////////////////////////////////////////////////

const GROUND_COLOR: RGBColor = RGBColor(128, 128, 128);
// camera dolly distance that maps to unit projection zoom
const NEUTRAL_DISTANCE: f64 = 7.5;

type Chart3<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian3d<RangedCoordf64, RangedCoordf64, RangedCoordf64>>;

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Render a motion sequence as an animated stick figure.
///
/// One output frame is written per input frame, with a frame delay of
/// `1000 / fps` milliseconds. The animation writer always encodes GIF;
/// anything else in the path extension only earns a warning because the
/// resulting file would carry a misleading name.
///
/// Each call owns its drawing surface, so concurrent calls are independent
/// as long as they target different output paths.
pub fn render_motion<P: AsRef<Path>>(
    skeleton: &Skeleton,
    motion: &Motion,
    path: P,
    config: &RenderConfig,
) -> Result<()> {
    let path = path.as_ref();
    check_surface(config)?;
    if config.fps == 0 {
        return Err(Error::InvalidConfig("frame rate must be at least 1".into()));
    }
    if config.follow_root && !(config.radius.is_finite() && config.radius > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "display radius must be positive and finite, got {}",
            config.radius
        )));
    }

    let norm = normalize(skeleton, motion, config)?;

    if path.extension().map_or(true, |e| !e.eq_ignore_ascii_case("gif")) {
        warn!(
            "animation path {} does not end in .gif; the writer encodes GIF regardless",
            path.display()
        );
    }

    let delay_ms = (1000.0 / config.fps as f64).round().max(1.0) as u32;
    let area = BitMapBackend::gif(path, config.size, delay_ms)
        .map_err(|e| Error::Draw(e.to_string()))?
        .into_drawing_area();

    info!(
        "rendering {} frames at {} fps to {}",
        norm.frames.len(),
        config.fps,
        path.display()
    );

    let (x_range, y_range, z_range) = axis_window(&norm, config);

    for (index, frame) in norm.frames.iter().enumerate() {
        clear_surface(&area)?;
        let mut chart = build_chart(
            &area,
            config,
            x_range.clone(),
            y_range.clone(),
            z_range.clone(),
        )?;

        // With follow_root the skeleton animates in place, so world-fixed
        // geometry (plane, trail) shifts by the current root position instead.
        let (track_x, track_z) = if config.follow_root {
            norm.trajectory[index]
        } else {
            (0.0, 0.0)
        };

        draw_ground_plane(
            &mut chart,
            norm.mins.x - track_x,
            norm.maxs.x - track_x,
            norm.mins.z - track_z,
            norm.maxs.z - track_z,
        )?;

        // fewer than two history points is a degenerate path
        if config.draw_trajectory && index > 1 {
            draw_trail(&mut chart, &norm.trajectory[..index], (track_x, track_z))?;
        }

        draw_bones(&mut chart, skeleton, frame)?;
        draw_joint_markers(&mut chart, frame)?;

        area.present()?;
    }

    info!("wrote animation to {}", path.display());
    Ok(())
}

/// Render the skeleton's rest pose as a single still image. The output
/// format follows the path extension (e.g. `.png`).
pub fn render_rest_pose<P: AsRef<Path>>(
    skeleton: &Skeleton,
    path: P,
    config: &RenderConfig,
) -> Result<()> {
    let path = path.as_ref();
    check_surface(config)?;

    let positions = skeleton.rest_global_positions();
    let (mut mins, mut maxs) = bounds(std::slice::from_ref(&positions));
    pad_degenerate(&mut mins, &mut maxs);

    // probe the path first; the bitmap backend saves in drop and panics there
    // when the file cannot be written
    std::fs::File::create(path).map_err(|e| Error::Draw(e.to_string()))?;

    let area = BitMapBackend::new(path, config.size).into_drawing_area();
    clear_surface(&area)?;
    let mut chart = build_chart(
        &area,
        config,
        mins.x..maxs.x,
        mins.y..maxs.y,
        mins.z..maxs.z,
    )?;

    draw_bones(&mut chart, skeleton, &positions)?;
    area.present()?;

    info!("wrote rest pose image to {}", path.display());
    Ok(())
}

/////////////////////////////////////////////////////////////////////////////////////////////////

fn check_surface(config: &RenderConfig) -> Result<()> {
    if config.size.0 == 0 || config.size.1 == 0 {
        return Err(Error::InvalidConfig(format!(
            "surface size must be non-zero, got {}x{}",
            config.size.0, config.size.1
        )));
    }
    if !(config.distance.is_finite() && config.distance > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "camera distance must be positive and finite, got {}",
            config.distance
        )));
    }
    Ok(())
}

/// Axis limits for the animated chart: a fixed window around the origin when
/// the camera follows the root, otherwise the scaled data's bounding box.
fn axis_window(
    norm: &NormalizedMotion,
    config: &RenderConfig,
) -> (Range<f64>, Range<f64>, Range<f64>) {
    if config.follow_root {
        let r = config.radius;
        (
            -r / 2.0..r / 2.0,
            0.0..r,
            -r / 3.0..r * 2.0 / 3.0,
        )
    } else {
        let (mut mins, mut maxs) = (norm.mins, norm.maxs);
        pad_degenerate(&mut mins, &mut maxs);
        (mins.x..maxs.x, mins.y..maxs.y, mins.z..maxs.z)
    }
}

/// Reset the drawing surface for the next frame; everything drawn so far is
/// dropped by flooding the surface with the background color.
fn clear_surface(area: &DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()> {
    area.fill(&WHITE)?;
    Ok(())
}

/// Build the 3D chart with the configured caption and camera. Axis
/// decorations are never configured, leaving a bare scene.
fn build_chart<'a, 'b>(
    area: &'a DrawingArea<BitMapBackend<'b>, Shift>,
    config: &RenderConfig,
    x: Range<f64>,
    y: Range<f64>,
    z: Range<f64>,
) -> Result<Chart3<'a, 'b>> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    if !config.title.is_empty() {
        builder.caption(&config.title, ("sans-serif", 24));
    }
    let mut chart = builder.build_cartesian_3d(x, y, z)?;
    apply_camera(&mut chart, config);
    Ok(chart)
}

/// Fix the camera for this frame from the configured elevation/azimuth
/// (degrees) and dolly distance.
fn apply_camera(chart: &mut Chart3<'_, '_>, config: &RenderConfig) {
    let pitch = (config.elevation - 90.0).to_radians();
    let yaw = (config.azimuth + 90.0).to_radians();
    let zoom = NEUTRAL_DISTANCE / config.distance;
    chart.with_projection(|mut pb| {
        pb.pitch = pitch;
        pb.yaw = yaw;
        pb.scale = zoom;
        pb.into_matrix()
    });
}

/// Translucent quadrilateral at height zero giving a spatial reference.
fn draw_ground_plane(
    chart: &mut Chart3<'_, '_>,
    min_x: f64,
    max_x: f64,
    min_z: f64,
    max_z: f64,
) -> Result<()> {
    let verts = vec![
        (min_x, 0.0, min_z),
        (min_x, 0.0, max_z),
        (max_x, 0.0, max_z),
        (max_x, 0.0, min_z),
    ];
    chart.draw_series(std::iter::once(Polygon::new(verts, GROUND_COLOR.mix(0.5).filled())))?;
    Ok(())
}

/// Thin blue polyline on the ground through the root's past positions,
/// shifted by `offset` so it lines up with a re-centered skeleton.
fn draw_trail(
    chart: &mut Chart3<'_, '_>,
    trail: &[(f64, f64)],
    (off_x, off_z): (f64, f64),
) -> Result<()> {
    chart.draw_series(LineSeries::new(
        trail.iter().map(|&(x, z)| (x - off_x, 0.0, z - off_z)),
        BLUE.stroke_width(1),
    ))?;
    Ok(())
}

/// One line segment from every non-root joint to its parent.
fn draw_bones(
    chart: &mut Chart3<'_, '_>,
    skeleton: &Skeleton,
    positions: &[Position],
) -> Result<()> {
    for (joint, parent) in skeleton.bones() {
        let (a, b) = (positions[joint], positions[parent]);
        chart.draw_series(LineSeries::new(
            vec![(a.x, a.y, a.z), (b.x, b.y, b.z)],
            GREEN.stroke_width(2),
        ))?;
    }
    Ok(())
}

/// Small filled dot at every joint position.
fn draw_joint_markers(chart: &mut Chart3<'_, '_>, positions: &[Position]) -> Result<()> {
    chart.draw_series(
        positions
            .iter()
            .map(|p| Circle::new((p.x, p.y, p.z), 3, GREEN.filled())),
    )?;
    Ok(())
}

/////////////////////////////////////////////////////////////////////////////////////////////////
