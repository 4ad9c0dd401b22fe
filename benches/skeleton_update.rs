use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Mat4, Quat, Vec3};
use marrow::{Node, Skeleton};

/// Bone chain where every bone carries the given cycles, each with a dense
/// rotation curve.
fn build_chain(bones: usize, keyframes: usize, cycles: &[u32]) -> Skeleton {
    let mut skeleton = Skeleton::new();
    let mut parent = skeleton.set_root(Node::new("bone0", Mat4::IDENTITY, Mat4::IDENTITY));

    for i in 1..bones {
        let local = Mat4::from_translation(Vec3::new(0.0, 0.1, 0.0));
        let mut node = Node::new(format!("bone{i}"), local, Mat4::IDENTITY);
        for &cycle_id in cycles {
            node.add_animation_cycle(cycle_id, keyframes as f32, 25.0);
            for k in 0..keyframes {
                let angle = (k as f32 / keyframes as f32) * std::f32::consts::TAU;
                node.add_rotation_keyframe(cycle_id, k as f32, Quat::from_rotation_z(angle))
                    .unwrap();
            }
        }
        parent = skeleton.attach(node, parent).unwrap();
    }

    skeleton
}

fn bench_update(c: &mut Criterion) {
    let mut looping = build_chain(64, 32, &[0]);
    looping.loop_anim(0);
    let mut t = 0.0_f32;
    c.bench_function("looping_update_64_bones", |b| {
        b.iter(|| {
            t += 0.016;
            looping.update(black_box(t));
        });
    });

    let mut blended = build_chain(64, 32, &[0, 1]);
    blended.set_blended_cycles([(0, 0.5), (1, 0.5)]);
    let mut t = 0.0_f32;
    c.bench_function("blended_update_64_bones", |b| {
        b.iter(|| {
            t += 0.016;
            blended.update(black_box(t));
        });
    });
}

criterion_group!(benches, bench_update);
criterion_main!(benches);
