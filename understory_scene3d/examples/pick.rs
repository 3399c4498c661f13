// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picking basics.
//!
//! Build a small scene of stacked panels, then pick through a perspective and
//! an orthographic camera, printing every hit front to back.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_scene3d --example pick`

use glam::{DMat4, DVec3};
use kurbo::{Point, Size};
use understory_scene3d::{FilterBehavior, MeshGeometry3D, NodeId, ResultBehavior, Scene3D};
use understory_view3d::{Camera, OrthographicCamera, PerspectiveCamera};

/// A `size` by `size` panel in the z = 0 plane, centered on the origin.
fn panel(size: f64) -> MeshGeometry3D {
    let h = size * 0.5;
    MeshGeometry3D::new(
        vec![
            DVec3::new(-h, -h, 0.0),
            DVec3::new(h, -h, 0.0),
            DVec3::new(h, h, 0.0),
            DVec3::new(-h, h, 0.0),
        ],
        Some(vec![0, 1, 2, 0, 2, 3]),
    )
}

fn main() {
    env_logger::init();

    let mut scene = Scene3D::new();
    let root = scene.create_node();
    let mut names: Vec<(NodeId, &str)> = Vec::new();
    for (name, z, size) in [("back", -4.0, 6.0), ("middle", -2.0, 4.0), ("front", 0.0, 2.0)] {
        let node = scene.create_node();
        let model = scene.create_geometry_model(panel(size));
        scene.set_content(node, Some(model)).unwrap();
        scene
            .set_transform(node, DMat4::from_translation(DVec3::new(0.0, 0.0, z)))
            .unwrap();
        scene.add_child(root, node).unwrap();
        names.push((node, name));
    }
    let name_of = |id: NodeId| {
        names
            .iter()
            .find(|(n, _)| *n == id)
            .map_or("?", |(_, name)| *name)
    };

    let bounds = scene.subgraph_bounds(root).unwrap();
    println!("scene bounds: {:?} .. {:?}", bounds.min, bounds.max);

    let viewport = Size::new(640.0, 480.0);
    let cameras = [
        (
            "perspective",
            Camera::from(PerspectiveCamera {
                position: DVec3::new(0.0, 0.0, 10.0),
                field_of_view: 60.0,
                ..PerspectiveCamera::default()
            }),
        ),
        (
            "orthographic",
            Camera::from(OrthographicCamera {
                position: DVec3::new(0.0, 0.0, 100.0),
                width: 8.0,
                near_plane_distance: -1000.0,
                ..OrthographicCamera::default()
            }),
        ),
    ];

    for (label, camera) in &cameras {
        for point in [Point::new(330.0, 230.0), Point::new(420.0, 140.0)] {
            println!("{label} pick at {point:?}:");
            let ray = scene
                .hit_test_viewport(
                    root,
                    camera,
                    point,
                    viewport,
                    |_, _| FilterBehavior::Continue,
                    |hit| {
                        println!(
                            "  {:<6} distance {:>8.3} at {:?}",
                            name_of(hit.node),
                            hit.distance,
                            hit.world_point
                        );
                        ResultBehavior::Continue
                    },
                )
                .unwrap();
            if let Some(ray) = ray {
                println!("  (ray adjustment {})", ray.distance_adjustment);
            }
        }
    }
}
