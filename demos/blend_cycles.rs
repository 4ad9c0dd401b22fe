//! Headless multiple-animations demo.
//!
//! Builds a small biped, loops a single cycle, then blends two cycles that
//! animate disjoint halves of the body (a wave on the left arm, a bow in
//! the spine). Poses are printed instead of rendered; run with
//! `RUST_LOG=debug` to see the playback transitions.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};
use marrow::{Node, Skeleton, Timer};

const WAVE: u32 = 0;
const BOW: u32 = 1;

fn bone(name: &str, local: Vec3) -> Node {
    Node::new(name, Mat4::from_translation(local), Mat4::IDENTITY)
}

fn main() {
    env_logger::init();

    let mut skeleton = Skeleton::new();
    let pelvis = skeleton.set_root(bone("pelvis", Vec3::new(0.0, 1.0, 0.0)));
    let spine = skeleton.attach(bone("spine", Vec3::new(0.0, 0.5, 0.0)), pelvis).unwrap();
    let arm_l = skeleton.attach(bone("arm_l", Vec3::new(-0.4, 0.4, 0.0)), spine).unwrap();
    let _arm_r = skeleton.attach(bone("arm_r", Vec3::new(0.4, 0.4, 0.0)), spine).unwrap();

    // Cycle 0 waves the left arm up and back over one second
    {
        let arm = skeleton.node_mut(arm_l).unwrap();
        arm.add_animation_cycle(WAVE, 1.0, 1.0);
        arm.add_translation_keyframe(WAVE, 0.0, Vec3::new(-0.4, 0.4, 0.0)).unwrap();
        arm.add_rotation_keyframe(WAVE, 0.0, Quat::IDENTITY).unwrap();
        arm.add_rotation_keyframe(WAVE, 0.5, Quat::from_rotation_z(FRAC_PI_2)).unwrap();
        arm.add_rotation_keyframe(WAVE, 1.0, Quat::IDENTITY).unwrap();
    }

    // Cycle 1 bows the spine forward over two seconds
    {
        let spine = skeleton.node_mut(spine).unwrap();
        spine.add_animation_cycle(BOW, 2.0, 1.0);
        spine.add_translation_keyframe(BOW, 0.0, Vec3::new(0.0, 0.5, 0.0)).unwrap();
        spine.add_rotation_keyframe(BOW, 0.0, Quat::IDENTITY).unwrap();
        spine.add_rotation_keyframe(BOW, 2.0, Quat::from_rotation_x(0.8)).unwrap();
    }

    println!("hierarchy:\n{skeleton}");

    let mut timer = Timer::new();

    println!("looping 'wave':");
    skeleton.loop_anim(WAVE);
    sweep(&mut skeleton, 1.0);

    println!("blending 'wave' + 'bow':");
    skeleton.set_blended_cycles([(WAVE, 1.0), (BOW, 1.0)]);
    sweep(&mut skeleton, 2.0);

    timer.tick();
    println!("evaluated both sweeps in {:.2} ms", timer.dt_seconds() * 1000.0);
}

fn sweep(skeleton: &mut Skeleton, duration: f32) {
    let steps = 4;
    for frame in 0..=steps {
        let t = duration * frame as f32 / steps as f32;
        skeleton.update(t);
        print!("  t={t:.2}:");
        for (_, node) in skeleton.iter() {
            let p = node.absolute_position();
            print!(" {}=({:.2},{:.2},{:.2})", node.name(), p.x, p.y, p.z);
        }
        println!();
    }
}
