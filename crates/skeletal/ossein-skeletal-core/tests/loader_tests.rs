use std::sync::Arc;

use serde_json::json;

use ossein_skeletal_core::{
    parse_clip_json, parse_skeleton_json, AssetLibrary, BoneTrack, LoadError,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn clip_doc() -> serde_json::Value {
    json!({
        "metadata": { "type": "itpanim", "version": 2 },
        "sequence": {
            "frames": 3,
            "length": 1.0,
            "bonecount": 2,
            "tracks": [
                { "bone": 0, "transforms": [
                    { "rot": [0.0, 0.0, 0.0, 1.0], "trans": [0.0, 0.0, 0.0] },
                    { "rot": [0.0, 0.0, 0.70710678, 0.70710678], "trans": [1.0, 0.0, 0.0] },
                    { "rot": [0.0, 0.0, 0.0, 1.0], "trans": [0.0, 0.0, 0.0] }
                ]}
            ]
        }
    })
}

fn skeleton_doc() -> serde_json::Value {
    json!({
        "metadata": { "type": "itpskel", "version": 1 },
        "bonecount": 3,
        "bones": [
            { "name": "root", "parent": -1,
              "bindpose": { "rot": [0.0, 0.0, 0.0, 1.0], "trans": [0.0, 0.0, 0.0] } },
            { "name": "spine", "parent": 0,
              "bindpose": { "rot": [0.0, 0.0, 0.0, 1.0], "trans": [0.0, 1.0, 0.0] } },
            { "name": "head", "parent": 1,
              "bindpose": { "rot": [0.0, 0.0, 0.0, 1.0], "trans": [0.0, 0.5, 0.0] } }
        ]
    })
}

/// it should round-trip frames, length, and bone count from a valid clip
#[test]
fn clip_round_trip() {
    let clip = parse_clip_json(&clip_doc().to_string()).unwrap();
    assert_eq!(clip.num_frames(), 3);
    approx(clip.length(), 1.0, 0.0);
    assert_eq!(clip.num_bones(), 2);

    // Bone 0 carries keyframes; bone 1 has no track and stays static.
    match clip.track(0).unwrap() {
        BoneTrack::Animated(frames) => {
            assert_eq!(frames.len(), 3);
            approx(frames[1].translation.x, 1.0, 0.0);
            approx(frames[1].rotation.z, 0.70710678, 1e-6);
        }
        BoneTrack::Static => panic!("bone 0 should be animated"),
    }
    assert!(clip.track(1).unwrap().is_static());
    assert!(clip.track(2).is_none());
}

/// it should reject a clip with the wrong metadata type
#[test]
fn clip_rejects_wrong_type() {
    let mut doc = clip_doc();
    doc["metadata"]["type"] = json!("itpskel");
    let err = parse_clip_json(&doc.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::UnknownFormat { .. }), "{err}");
}

/// it should reject a clip with the wrong metadata version
#[test]
fn clip_rejects_wrong_version() {
    let mut doc = clip_doc();
    doc["metadata"]["version"] = json!(1);
    let err = parse_clip_json(&doc.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::UnknownFormat { .. }), "{err}");
}

/// it should reject a track whose transform count disagrees with frames
#[test]
fn clip_rejects_track_length_mismatch() {
    let mut doc = clip_doc();
    doc["sequence"]["tracks"][0]["transforms"]
        .as_array_mut()
        .unwrap()
        .pop();
    let err = parse_clip_json(&doc.to_string()).unwrap_err();
    assert!(
        matches!(
            err,
            LoadError::TrackLengthMismatch {
                bone: 0,
                got: 2,
                expected: 3
            }
        ),
        "{err}"
    );
}

/// it should reject a track bone index past the declared bone count
#[test]
fn clip_rejects_bone_index_out_of_range() {
    let mut doc = clip_doc();
    doc["sequence"]["tracks"][0]["bone"] = json!(2);
    let err = parse_clip_json(&doc.to_string()).unwrap_err();
    assert!(
        matches!(err, LoadError::BoneIndexOutOfRange { bone: 2, num_bones: 2 }),
        "{err}"
    );
}

/// it should reject two tracks that target the same bone
#[test]
fn clip_rejects_duplicate_tracks() {
    let mut doc = clip_doc();
    let track = doc["sequence"]["tracks"][0].clone();
    doc["sequence"]["tracks"].as_array_mut().unwrap().push(track);
    let err = parse_clip_json(&doc.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::DuplicateTrack(0)), "{err}");
}

/// it should reject bone counts past the palette capacity
#[test]
fn clip_rejects_oversized_bone_count() {
    let mut doc = clip_doc();
    doc["sequence"]["bonecount"] = json!(97);
    doc["sequence"]["tracks"] = json!([]);
    let err = parse_clip_json(&doc.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::TooManyBones { got: 97, .. }), "{err}");
}

/// it should reject clips with fewer than two frames
#[test]
fn clip_rejects_too_few_frames() {
    let mut doc = clip_doc();
    doc["sequence"]["frames"] = json!(1);
    doc["sequence"]["tracks"] = json!([]);
    let err = parse_clip_json(&doc.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::TooFewFrames(1)), "{err}");
}

/// it should reject clips with a non-positive length
#[test]
fn clip_rejects_non_positive_length() {
    let mut doc = clip_doc();
    doc["sequence"]["length"] = json!(0.0);
    let err = parse_clip_json(&doc.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::NonPositiveLength(_)), "{err}");
}

/// it should surface malformed documents as json errors
#[test]
fn clip_rejects_malformed_json() {
    assert!(matches!(
        parse_clip_json("not json at all").unwrap_err(),
        LoadError::Json(_)
    ));
    assert!(matches!(
        parse_clip_json(r#"{"metadata": {"type": "itpanim", "version": 2}}"#).unwrap_err(),
        LoadError::Json(_)
    ));
    // Non-numeric field in a transform.
    let mut doc = clip_doc();
    doc["sequence"]["tracks"][0]["transforms"][0]["trans"] = json!(["a", "b", "c"]);
    assert!(matches!(
        parse_clip_json(&doc.to_string()).unwrap_err(),
        LoadError::Json(_)
    ));
}

/// it should round-trip a valid skeleton with parent links and bind poses
#[test]
fn skeleton_round_trip() {
    let skeleton = parse_skeleton_json(&skeleton_doc().to_string()).unwrap();
    assert_eq!(skeleton.num_bones(), 3);
    assert_eq!(skeleton.bone(0).unwrap().parent, None);
    assert_eq!(skeleton.bone(1).unwrap().parent, Some(0));
    assert_eq!(skeleton.bone(2).unwrap().parent, Some(1));
    assert_eq!(skeleton.bone(2).unwrap().name, "head");
    approx(skeleton.bone(1).unwrap().local_bind_pose.translation.y, 1.0, 0.0);
    assert_eq!(skeleton.global_inv_bind_poses().len(), 3);
}

/// it should reject a skeleton with the wrong format gate
#[test]
fn skeleton_rejects_wrong_format() {
    let mut doc = skeleton_doc();
    doc["metadata"]["version"] = json!(2);
    let err = parse_skeleton_json(&doc.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::UnknownFormat { .. }), "{err}");
}

/// it should reject bones stored before their parents
#[test]
fn skeleton_rejects_non_topological_order() {
    let mut doc = skeleton_doc();
    doc["bones"][1]["parent"] = json!(2);
    let err = parse_skeleton_json(&doc.to_string()).unwrap_err();
    assert!(
        matches!(err, LoadError::NonTopologicalOrder { bone: 1, parent: 2 }),
        "{err}"
    );
}

/// it should reject a second root
#[test]
fn skeleton_rejects_second_root() {
    let mut doc = skeleton_doc();
    doc["bones"][2]["parent"] = json!(-1);
    let err = parse_skeleton_json(&doc.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::UnexpectedRoot(2)), "{err}");
}

/// it should reject a bone list that disagrees with the declared count
#[test]
fn skeleton_rejects_bone_count_mismatch() {
    let mut doc = skeleton_doc();
    doc["bonecount"] = json!(2);
    let err = parse_skeleton_json(&doc.to_string()).unwrap_err();
    assert!(
        matches!(err, LoadError::BoneCountMismatch { declared: 2, got: 3 }),
        "{err}"
    );
}

/// it should reject an empty skeleton
#[test]
fn skeleton_rejects_empty() {
    let mut doc = skeleton_doc();
    doc["bonecount"] = json!(0);
    doc["bones"] = json!([]);
    let err = parse_skeleton_json(&doc.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::EmptySkeleton), "{err}");
}

/// it should cache library loads by name and hand back the same handle
#[test]
fn library_caches_by_name() {
    let dir = std::env::temp_dir();
    let clip_path = dir.join(format!("ossein-clip-{}.itpanim", std::process::id()));
    let skel_path = dir.join(format!("ossein-skel-{}.itpskel", std::process::id()));
    std::fs::write(&clip_path, clip_doc().to_string()).unwrap();
    std::fs::write(&skel_path, skeleton_doc().to_string()).unwrap();

    let mut library = AssetLibrary::new();
    let first = library.load_clip("walk", &clip_path).unwrap();
    let second = library.load_clip("walk", &clip_path).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(library.clip("walk").is_some());
    assert!(library.clip("run").is_none());

    let skeleton = library.load_skeleton("biped", &skel_path).unwrap();
    assert!(Arc::ptr_eq(&skeleton, &library.skeleton("biped").unwrap()));

    std::fs::remove_file(&clip_path).ok();
    std::fs::remove_file(&skel_path).ok();
}

/// it should report a missing file as an io load error
#[test]
fn library_missing_file_is_io_error() {
    let mut library = AssetLibrary::new();
    let err = library
        .load_clip("ghost", std::path::Path::new("/definitely/not/here.itpanim"))
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "{err}");
}
