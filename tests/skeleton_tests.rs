//! Skeleton tests
//!
//! Tests for:
//! - Bone insertion, name lookup and duplicate rejection
//! - Reparenting and cycle detection
//! - Ancestor chains and bind pose composition
//! - Root bone insertion above the hips
//! - Hip bone detection

use glam::{Quat, Vec3};
use rootbake::errors::BakeError;
use rootbake::scene::{Skeleton, Transform};

const EPSILON: f32 = 1e-5;

fn simple_skeleton() -> Skeleton {
    let mut skeleton = Skeleton::new();
    let hips = skeleton
        .add_bone(
            "Hips",
            None,
            Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
        )
        .unwrap();
    let spine = skeleton
        .add_bone(
            "Spine",
            Some(hips),
            Transform::from_translation_rotation(
                Vec3::new(0.0, 0.0, 0.2),
                Quat::from_rotation_z(0.5),
            ),
        )
        .unwrap();
    skeleton
        .add_bone(
            "Chest",
            Some(spine),
            Transform::from_translation(Vec3::new(0.1, 0.0, 0.0)),
        )
        .unwrap();
    skeleton
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn add_bone_links_parent_and_child() {
    let skeleton = simple_skeleton();
    let hips = skeleton.find("Hips").unwrap();
    let spine = skeleton.find("Spine").unwrap();

    assert_eq!(skeleton.len(), 3);
    assert_eq!(skeleton.bone(spine).unwrap().parent(), Some(hips));
    assert_eq!(skeleton.bone(hips).unwrap().children(), &[spine]);
    assert_eq!(skeleton.roots().collect::<Vec<_>>(), vec![hips]);
}

#[test]
fn add_bone_rejects_duplicate_names() {
    let mut skeleton = simple_skeleton();
    let err = skeleton
        .add_bone("Spine", None, Transform::IDENTITY)
        .unwrap_err();
    assert!(matches!(err, BakeError::DuplicateBone(name) if name == "Spine"));
}

#[test]
fn bones_iterate_in_insertion_order() {
    let skeleton = simple_skeleton();
    let names: Vec<&str> = skeleton.bones().map(|(_, b)| b.name.as_str()).collect();
    assert_eq!(names, vec!["Hips", "Spine", "Chest"]);
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn set_parent_rejects_cycles() {
    let mut skeleton = simple_skeleton();
    let hips = skeleton.find("Hips").unwrap();
    let chest = skeleton.find("Chest").unwrap();

    let err = skeleton.set_parent(hips, Some(chest)).unwrap_err();
    assert!(matches!(err, BakeError::HierarchyCycle { .. }));

    let err = skeleton.set_parent(hips, Some(hips)).unwrap_err();
    assert!(matches!(err, BakeError::HierarchyCycle { .. }));

    // Hierarchy is unchanged
    assert_eq!(skeleton.bone(hips).unwrap().parent(), None);
}

#[test]
fn set_parent_moves_child_lists() {
    let mut skeleton = simple_skeleton();
    let hips = skeleton.find("Hips").unwrap();
    let spine = skeleton.find("Spine").unwrap();
    let chest = skeleton.find("Chest").unwrap();

    skeleton.set_parent(chest, Some(hips)).unwrap();
    assert!(skeleton.bone(spine).unwrap().children().is_empty());
    assert_eq!(skeleton.bone(hips).unwrap().children(), &[spine, chest]);
}

#[test]
fn chain_runs_from_top_to_bone() {
    let skeleton = simple_skeleton();
    let hips = skeleton.find("Hips").unwrap();
    let spine = skeleton.find("Spine").unwrap();
    let chest = skeleton.find("Chest").unwrap();

    assert_eq!(skeleton.chain(chest).unwrap().as_slice(), &[hips, spine, chest]);
    assert!(skeleton.is_ancestor(hips, chest));
    assert!(!skeleton.is_ancestor(chest, hips));
    assert!(!skeleton.is_ancestor(hips, hips));
}

#[test]
fn bind_world_composes_ancestors() {
    let skeleton = simple_skeleton();
    let chest = skeleton.find("Chest").unwrap();
    let world = skeleton.bind_world(chest).unwrap();

    // Spine is rotated 0.5 rad about Z, so the chest's +X offset is rotated.
    let expected = Vec3::new(0.1 * 0.5_f32.cos(), 0.1 * 0.5_f32.sin(), 1.2);
    assert!(world.position.abs_diff_eq(expected, EPSILON));
}

// ============================================================================
// Root bone
// ============================================================================

#[test]
fn add_root_bone_reparents_hips_and_keeps_world_bind() {
    let mut skeleton = simple_skeleton();
    let hips = skeleton.find("Hips").unwrap();
    let chest = skeleton.find("Chest").unwrap();
    let before = skeleton.bind_world(chest).unwrap();

    let root = skeleton.add_root_bone("Root", "Hips").unwrap();

    assert_eq!(skeleton.bone(hips).unwrap().parent(), Some(root));
    assert_eq!(skeleton.bone(root).unwrap().bind, Transform::IDENTITY);
    assert!(skeleton.bind_world(chest).unwrap().approx_eq(&before, EPSILON));
}

#[test]
fn add_root_bone_under_nested_parent_keeps_world_bind() {
    let mut skeleton = Skeleton::new();
    let armature = skeleton
        .add_bone(
            "Armature",
            None,
            Transform::from_translation(Vec3::new(0.0, 2.0, 0.0)),
        )
        .unwrap();
    let hips = skeleton
        .add_bone(
            "Hips",
            Some(armature),
            Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
        )
        .unwrap();
    let before = skeleton.bind_world(hips).unwrap();

    skeleton.add_root_bone("Root", "Hips").unwrap();
    assert!(skeleton.bind_world(hips).unwrap().approx_eq(&before, EPSILON));
}

#[test]
fn add_root_bone_is_idempotent() {
    let mut skeleton = simple_skeleton();
    let first = skeleton.add_root_bone("Root", "Hips").unwrap();
    let second = skeleton.add_root_bone("Root", "Hips").unwrap();
    assert_eq!(first, second);
    assert_eq!(skeleton.len(), 4);
}

#[test]
fn add_root_bone_requires_hips() {
    let mut skeleton = simple_skeleton();
    let err = skeleton.add_root_bone("Root", "Pelvis").unwrap_err();
    assert!(matches!(err, BakeError::MissingReferenceBone(name) if name == "Pelvis"));
    assert!(skeleton.find("Root").is_none());
}

// ============================================================================
// Hip detection
// ============================================================================

#[test]
fn find_hip_bone_checks_common_names() {
    assert_eq!(simple_skeleton().find_hip_bone(), Some("Hips"));

    let mut mixamo = Skeleton::new();
    mixamo
        .add_bone("mixamorig:Hips", None, Transform::IDENTITY)
        .unwrap();
    assert_eq!(mixamo.find_hip_bone(), Some("mixamorig:Hips"));

    let mut other = Skeleton::new();
    other.add_bone("torso", None, Transform::IDENTITY).unwrap();
    assert_eq!(other.find_hip_bone(), None);
}
