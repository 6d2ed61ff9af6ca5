use anyhow::Context;
use log::info;
use skeleton_viz::{render_motion, render_rest_pose, Motion, Position, RenderConfig, Skeleton};

////////////////////////////// a synthetic 16-joint walker ///////////////////////////////////////

// joint order: pelvis, spine, neck, head,
//              left shoulder/elbow/hand, right shoulder/elbow/hand,
//              left hip/knee/foot, right hip/knee/foot
const PARENTS: [isize; 16] = [-1, 0, 1, 2, 1, 4, 5, 1, 7, 8, 0, 10, 11, 0, 13, 14];

fn walker_skeleton() -> anyhow::Result<Skeleton> {
    // rest offsets are local: each joint relative to its parent
    let offsets = vec![
        Position::new(0.0, 0.0, 0.0),     // pelvis
        Position::new(0.0, 0.45, 0.0),    // spine
        Position::new(0.0, 0.25, 0.0),    // neck
        Position::new(0.0, 0.2, 0.0),     // head
        Position::new(-0.22, -0.05, 0.0), // left shoulder
        Position::new(0.0, -0.3, 0.0),    // left elbow
        Position::new(0.0, -0.28, 0.0),   // left hand
        Position::new(0.22, -0.05, 0.0),  // right shoulder
        Position::new(0.0, -0.3, 0.0),    // right elbow
        Position::new(0.0, -0.28, 0.0),   // right hand
        Position::new(-0.12, 0.0, 0.0),   // left hip
        Position::new(0.0, -0.42, 0.0),   // left knee
        Position::new(0.0, -0.42, 0.0),   // left foot
        Position::new(0.12, 0.0, 0.0),    // right hip
        Position::new(0.0, -0.42, 0.0),   // right knee
        Position::new(0.0, -0.42, 0.0),   // right foot
    ];
    Ok(Skeleton::new(PARENTS.to_vec(), offsets)?)
}

/// Global joint positions of the walker at time `t` (seconds). Legs and arms
/// swing in opposite phase while the pelvis travels along +z with a slight bob.
fn walker_frame(t: f64) -> Vec<Position> {
    let phase = t * std::f64::consts::TAU; // one stride per second
    let forward = 0.9 * t;
    let bob = 0.03 * (2.0 * phase).sin();

    let pelvis = Position::new(0.0, 0.89 + bob, forward);
    let spine = pelvis + Position::new(0.0, 0.45, 0.0);
    let neck = spine + Position::new(0.0, 0.25, 0.0);
    let head = neck + Position::new(0.0, 0.2, 0.0);

    // limb as two segments hinged at the joint, swinging in the y-z plane
    let limb = |base: Position, side_x: f64, upper: f64, lower: f64, swing: f64, bend: f64| {
        let top = base + Position::new(side_x, -0.05, 0.0);
        let mid = top + Position::new(0.0, -upper * swing.cos(), upper * swing.sin());
        let end = mid + Position::new(0.0, -lower * (swing + bend).cos(), lower * (swing + bend).sin());
        (top, mid, end)
    };

    let leg_swing = 0.5 * phase.sin();
    let arm_swing = 0.35 * phase.sin();
    // knees only bend backwards, strongest mid-swing
    let knee_bend = |s: f64| -0.6 * s.max(0.0);

    let (l_sho, l_elb, l_hand) = limb(spine, -0.22, 0.3, 0.28, -arm_swing, 0.0);
    let (r_sho, r_elb, r_hand) = limb(spine, 0.22, 0.3, 0.28, arm_swing, 0.0);
    let (l_hip, l_knee, l_foot) = limb(
        pelvis + Position::new(0.0, 0.05, 0.0),
        -0.12,
        0.42,
        0.42,
        leg_swing,
        knee_bend(leg_swing),
    );
    let (r_hip, r_knee, r_foot) = limb(
        pelvis + Position::new(0.0, 0.05, 0.0),
        0.12,
        0.42,
        0.42,
        -leg_swing,
        knee_bend(-leg_swing),
    );

    vec![
        pelvis, spine, neck, head, l_sho, l_elb, l_hand, r_sho, r_elb, r_hand, l_hip, l_knee,
        l_foot, r_hip, r_knee, r_foot,
    ]
}

////////////////////////////// rendering /////////////////////////////////////////////////////////

fn main() -> anyhow::Result<()> {
    env_logger::init();
    info!("starting up");

    let skeleton = walker_skeleton()?;

    // two seconds of walking at 30 fps
    let fps = 30;
    let frames: Vec<Vec<Position>> = (0..60).map(|i| walker_frame(i as f64 / fps as f64)).collect();
    let motion = Motion::from_frames(frames);

    let config = RenderConfig {
        size: (480, 480),
        fps,
        title: "walk cycle".to_string(),
        ..RenderConfig::default()
    };

    // the animated figure: camera follows the root, trajectory drawn on the ground
    render_motion(&skeleton, &motion, "walk_cycle.gif", &config)
        .context("failed to render the walk animation")?;

    // the same skeleton's rest pose as a still image
    render_rest_pose(&skeleton, "walk_rest.png", &config)
        .context("failed to render the rest pose")?;

    info!("done; wrote walk_cycle.gif and walk_rest.png");
    Ok(())
}
