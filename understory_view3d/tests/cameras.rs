// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picking rays built through the public camera API.

use glam::{DMat4, DVec3};
use kurbo::{Point, Size};
use understory_view3d::{Aabb3, Camera, OrthographicCamera, PerspectiveCamera};

fn close(a: DVec3, b: DVec3) -> bool {
    (a - b).length() < 1e-12
}

#[test]
fn perspective_center_ray_looks_forward() {
    let camera = PerspectiveCamera {
        field_of_view: 90.0,
        ..PerspectiveCamera::default()
    };
    let viewport = Size::new(100.0, 100.0);
    let ray = camera
        .ray_from_viewport_point(Point::new(50.0, 50.0), viewport)
        .unwrap();
    assert!(close(ray.ray.direction, DVec3::NEG_Z));
    assert!(close(ray.ray.origin, DVec3::new(0.0, 0.0, -0.125)));
    assert_eq!(ray.distance_adjustment, 0.0);

    // A 90 degree horizontal field of view puts the right edge at 45 degrees.
    let edge = camera
        .ray_from_viewport_point(Point::new(100.0, 50.0), viewport)
        .unwrap();
    let expected = DVec3::new(1.0, 0.0, -1.0).normalize();
    assert!(close(edge.ray.direction, expected));
}

#[test]
fn perspective_camera_transform_moves_the_ray() {
    let offset = DVec3::new(1.0, 2.0, 3.0);
    let camera = PerspectiveCamera {
        transform: DMat4::from_translation(offset),
        ..PerspectiveCamera::default()
    };
    let viewport = Size::new(64.0, 64.0);
    let plain = PerspectiveCamera::default()
        .ray_from_viewport_point(Point::new(10.0, 20.0), viewport)
        .unwrap();
    let moved = camera
        .ray_from_viewport_point(Point::new(10.0, 20.0), viewport)
        .unwrap();
    assert!(close(moved.ray.origin, plain.ray.origin + offset));
    assert!(close(moved.ray.direction, plain.ray.direction));

    // Points on the moved ray still project back to the picked pixel.
    let p = moved.project_to_viewport(moved.ray.at(7.0)).unwrap();
    assert!((p - Point::new(10.0, 20.0)).hypot() < 1e-9);
}

#[test]
fn orthographic_rays_start_on_the_near_plane() {
    let camera = OrthographicCamera {
        position: DVec3::new(0.0, 0.0, 5.0),
        width: 4.0,
        ..OrthographicCamera::default()
    };
    let viewport = Size::new(100.0, 50.0);
    let corner = camera
        .ray_from_viewport_point(Point::ZERO, viewport, &Aabb3::EMPTY)
        .unwrap();
    assert!(close(corner.ray.origin, DVec3::new(-2.0, 1.0, 4.875)));
    assert!(close(corner.ray.direction, DVec3::NEG_Z));
    assert_eq!(corner.distance_adjustment, 0.0);

    let p = corner.project_to_viewport(corner.ray.at(3.0)).unwrap();
    assert!((p - Point::ZERO).hypot() < 1e-9);
}

#[test]
fn orthographic_camera_transform_moves_the_ray() {
    let camera = OrthographicCamera {
        position: DVec3::new(0.0, 0.0, 100.0),
        width: 10.0,
        near_plane_distance: -1000.0,
        ..OrthographicCamera::default()
    };
    // Turning about the look axis leaves the scene's depth range unchanged.
    let transform =
        DMat4::from_translation(DVec3::new(3.0, -2.0, 5.0)) * DMat4::from_rotation_z(0.7);
    let moved_camera = OrthographicCamera {
        transform,
        ..camera.clone()
    };
    let scene = Aabb3::new(DVec3::splat(-1.0), DVec3::splat(1.0));
    let moved_scene = scene.transform(&transform);
    let viewport = Size::new(100.0, 100.0);
    let pick = Point::new(30.0, 70.0);

    let plain = camera
        .ray_from_viewport_point(pick, viewport, &scene)
        .unwrap();
    let moved = moved_camera
        .ray_from_viewport_point(pick, viewport, &moved_scene)
        .unwrap();
    assert!(plain.distance_adjustment > 0.0);
    assert!((moved.distance_adjustment - plain.distance_adjustment).abs() < 1e-9);
    let expected_origin = transform.transform_point3(plain.ray.origin);
    assert!((moved.ray.origin - expected_origin).length() < 1e-9);
    let expected_direction = transform.transform_vector3(plain.ray.direction);
    assert!((moved.ray.direction - expected_direction).length() < 1e-12);

    let p = moved.project_to_viewport(moved.ray.at(85.0)).unwrap();
    assert!((p - pick).hypot() < 1e-6, "{p:?}");

    let singular = OrthographicCamera {
        transform: DMat4::from_scale(DVec3::new(1.0, 1.0, 0.0)),
        ..camera
    };
    assert!(singular.view_matrix().is_none());
    assert!(
        singular
            .ray_from_viewport_point(pick, viewport, &scene)
            .is_none()
    );
}

#[test]
fn camera_enum_rejects_unusable_input() {
    let scene = Aabb3::new(DVec3::splat(-1.0), DVec3::splat(1.0));
    let camera = Camera::default();
    assert!(
        camera
            .ray_from_viewport_point(Point::ZERO, Size::ZERO, &scene)
            .is_none()
    );

    let degenerate = Camera::from(PerspectiveCamera {
        look_direction: DVec3::Y,
        up_direction: DVec3::Y,
        ..PerspectiveCamera::default()
    });
    assert!(
        degenerate
            .ray_from_viewport_point(Point::new(1.0, 1.0), Size::new(2.0, 2.0), &scene)
            .is_none()
    );

    let flat = Camera::from(OrthographicCamera {
        width: 0.0,
        ..OrthographicCamera::default()
    });
    assert!(
        flat.ray_from_viewport_point(Point::new(1.0, 1.0), Size::new(2.0, 2.0), &scene)
            .is_none()
    );
}
