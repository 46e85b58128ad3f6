//! Transform tests
//!
//! Tests for:
//! - Identity and constructors
//! - Affine conversion round-trip through decomposition
//! - Parent-then-child composition order
//! - Inverse
//! - Approximate equality across antipodal quaternions

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{Affine3A, Quat, Vec3};
use rootbake::scene::Transform;

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::default();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
    assert_eq!(t, Transform::IDENTITY);
}

#[test]
fn transform_from_affine_recovers_trs() {
    let mat = Affine3A::from_scale_rotation_translation(
        Vec3::splat(2.0),
        Quat::from_rotation_z(FRAC_PI_4),
        Vec3::new(1.0, 2.0, 3.0),
    );
    let t = Transform::from_affine(mat);
    assert!(vec3_approx(t.position, Vec3::new(1.0, 2.0, 3.0)));
    assert!(vec3_approx(t.scale, Vec3::splat(2.0)));
    assert!(t.rotation.angle_between(Quat::from_rotation_z(FRAC_PI_4)) < 1e-4);
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn mul_transform_applies_child_in_parent_space() {
    let parent = Transform::from_translation_rotation(
        Vec3::new(10.0, 0.0, 0.0),
        Quat::from_rotation_z(FRAC_PI_2),
    );
    let child = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));

    let world = parent.mul_transform(&child);

    // Child's +X offset is rotated onto +Y by the parent.
    assert!(vec3_approx(world.position, Vec3::new(10.0, 1.0, 0.0)));
    assert!(world.rotation.angle_between(parent.rotation) < 1e-4);
}

#[test]
fn inverse_composes_to_identity() {
    let t = Transform {
        position: Vec3::new(-3.0, 4.5, 0.25),
        rotation: Quat::from_rotation_x(0.7) * Quat::from_rotation_z(-1.2),
        scale: Vec3::ONE,
    };
    let identity = t.mul_transform(&t.inverse());
    assert!(identity.approx_eq(&Transform::IDENTITY, 1e-5));

    let identity = t.inverse().mul_transform(&t);
    assert!(identity.approx_eq(&Transform::IDENTITY, 1e-5));
}

#[test]
fn approx_eq_treats_negated_rotation_as_equal() {
    let q = Quat::from_rotation_y(0.4);
    let a = Transform::from_rotation(q);
    let b = Transform::from_rotation(-q);
    assert!(a.approx_eq(&b, 1e-6));

    let c = Transform::from_rotation(Quat::from_rotation_y(0.5));
    assert!(!a.approx_eq(&c, 1e-6));
}
