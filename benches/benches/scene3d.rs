// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_scene3d` bounds maintenance and ray hit testing.
//!
//! Scenes are deterministic random trees of small meshes, so runs are comparable.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use glam::{DMat4, DVec3};
use kurbo::{Point, Size};
use understory_geom3d::Ray3;
use understory_scene3d::{FilterBehavior, MeshGeometry3D, NodeId, ResultBehavior, Scene3D};
use understory_view3d::{Camera, PerspectiveCamera};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_range_usize(&mut self, upper_exclusive: usize) -> usize {
        if upper_exclusive == 0 {
            return 0;
        }
        (self.next_u32() as usize) % upper_exclusive
    }

    fn gen_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * (f64::from(self.next_u32()) / f64::from(u32::MAX))
    }

    fn gen_vec3(&mut self, lo: f64, hi: f64) -> DVec3 {
        DVec3::new(self.gen_f64(lo, hi), self.gen_f64(lo, hi), self.gen_f64(lo, hi))
    }
}

struct BuiltScene {
    scene: Scene3D,
    root: NodeId,
    leaves: Vec<NodeId>,
}

/// A tree of `n` nodes with a branching factor of roughly `fanout`, each node
/// holding a small random mesh.
fn build_scene(n: usize, fanout: usize, seed: u64) -> BuiltScene {
    let mut rng = Lcg::new(seed);
    let mut scene = Scene3D::new();
    let root = scene.create_node();
    let mut nodes = vec![root];
    for i in 1..n {
        let parent = nodes[rng.gen_range_usize(i.div_ceil(fanout))];
        let node = scene.create_node();
        scene.add_child(parent, node).unwrap();
        scene
            .set_transform(
                node,
                DMat4::from_rotation_z(rng.gen_f64(-1.0, 1.0))
                    * DMat4::from_translation(rng.gen_vec3(-4.0, 4.0)),
            )
            .unwrap();
        let positions = (0..12).map(|_| rng.gen_vec3(-0.5, 0.5)).collect();
        let model = scene.create_geometry_model(MeshGeometry3D::new(positions, None));
        scene.set_content(node, Some(model)).unwrap();
        nodes.push(node);
    }
    let leaves = nodes
        .iter()
        .copied()
        .filter(|id| scene.children(*id).unwrap().is_empty())
        .collect();
    BuiltScene {
        scene,
        root,
        leaves,
    }
}

fn random_rays(count: usize, seed: u64) -> Vec<Ray3> {
    let mut rng = Lcg::new(seed);
    (0..count)
        .map(|_| {
            let origin = rng.gen_vec3(-30.0, 30.0);
            let target = rng.gen_vec3(-4.0, 4.0);
            Ray3::new(origin, target - origin)
        })
        .collect()
}

fn bench_bounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene3d_bounds");
    group.sample_size(50);

    for &(n, fanout) in &[(256_usize, 4_usize), (4_096, 4), (4_096, 16)] {
        group.bench_function(format!("full_recompute(n={n},f={fanout})"), |b| {
            b.iter_batched(
                || build_scene(n, fanout, 0x5CE0_0000_0000_0001),
                |mut built| {
                    black_box(built.scene.subgraph_bounds(built.root).unwrap());
                    built
                },
                BatchSize::LargeInput,
            );
        });

        let mut built = build_scene(n, fanout, 0x5CE0_0000_0000_0002);
        built.scene.subgraph_bounds(built.root).unwrap();
        let mut rng = Lcg::new(7);
        group.bench_function(format!("leaf_edit_recompute(n={n},f={fanout})"), |b| {
            b.iter(|| {
                let leaf = built.leaves[rng.gen_range_usize(built.leaves.len())];
                let t = DMat4::from_translation(rng.gen_vec3(-4.0, 4.0));
                built.scene.set_transform(leaf, t).unwrap();
                black_box(built.scene.subgraph_bounds(built.root).unwrap());
            });
        });

        group.bench_function(format!("clean_query(n={n},f={fanout})"), |b| {
            b.iter(|| black_box(built.scene.subgraph_bounds(built.root).unwrap()));
        });
    }

    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene3d_hit_test");
    group.sample_size(50);

    for &(n, fanout) in &[(256_usize, 4_usize), (4_096, 4)] {
        let mut built = build_scene(n, fanout, 0x5CE0_0000_0000_0003);
        built.scene.subgraph_bounds(built.root).unwrap();
        let rays = random_rays(64, 0x5CE0_0000_0000_0004);

        group.bench_function(format!("all_hits_x64(n={n},f={fanout})"), |b| {
            b.iter(|| {
                let mut total = 0_usize;
                for ray in &rays {
                    total += built.scene.hit_test_all(built.root, *ray).unwrap().len();
                }
                black_box(total)
            });
        });

        group.bench_function(format!("nearest_x64(n={n},f={fanout})"), |b| {
            b.iter(|| {
                let mut sum = 0.0;
                for ray in &rays {
                    if let Some(hit) = built.scene.hit_test_nearest(built.root, *ray).unwrap() {
                        sum += hit.distance;
                    }
                }
                black_box(sum)
            });
        });

        let camera = Camera::from(PerspectiveCamera {
            position: DVec3::new(0.0, 0.0, 40.0),
            ..PerspectiveCamera::default()
        });
        let viewport = Size::new(800.0, 600.0);
        let mut rng = Lcg::new(11);
        group.bench_function(format!("viewport_pick(n={n},f={fanout})"), |b| {
            b.iter(|| {
                let p = Point::new(rng.gen_f64(0.0, 800.0), rng.gen_f64(0.0, 600.0));
                let mut hits = 0_usize;
                built
                    .scene
                    .hit_test_viewport(
                        built.root,
                        &camera,
                        p,
                        viewport,
                        |_, _| FilterBehavior::Continue,
                        |_| {
                            hits += 1;
                            ResultBehavior::Continue
                        },
                    )
                    .unwrap();
                black_box(hits)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bounds, bench_hit_test);
criterion_main!(benches);
