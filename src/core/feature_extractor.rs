// Per-finger curl and direction estimation from a hand skeleton

use crate::models::hand::{
    Finger, FingerCurl, FingerDirection, FingerFeatures, Landmark, LandmarkSet, FINGER_COUNT,
};

/// Mean interior joint angle (degrees) above which a finger counts as straight
pub const NO_CURL_MIN_ANGLE_DEG: f32 = 150.0;

/// Mean interior joint angle (degrees) above which a finger counts as half curled
pub const HALF_CURL_MIN_ANGLE_DEG: f32 = 110.0;

const DEGENERATE_SEGMENT: f32 = 1e-6;

/// Derive curl and pointing direction for all five fingers.
///
/// Pure: the same landmark set always yields the same features.
pub fn extract(landmarks: &LandmarkSet) -> FingerFeatures {
    let mut curls = [FingerCurl::NoCurl; FINGER_COUNT];
    let mut directions = [FingerDirection::Up; FINGER_COUNT];

    for finger in Finger::ALL {
        let joints = landmarks.finger(finger);
        curls[finger.index()] = estimate_curl(landmarks.wrist(), &joints);
        directions[finger.index()] = estimate_direction(&joints[0], &joints[3]);
    }

    FingerFeatures { curls, directions }
}

/// Curl from the interior angles at the three inner joints of the chain
/// wrist -> j1 -> j2 -> j3 -> tip
fn estimate_curl(wrist: &Landmark, joints: &[Landmark; 4]) -> FingerCurl {
    let chain = [wrist, &joints[0], &joints[1], &joints[2], &joints[3]];
    let mean_angle = chain
        .windows(3)
        .map(|w| interior_angle_deg(w[0], w[1], w[2]))
        .sum::<f32>()
        / 3.0;

    if mean_angle > NO_CURL_MIN_ANGLE_DEG {
        FingerCurl::NoCurl
    } else if mean_angle > HALF_CURL_MIN_ANGLE_DEG {
        FingerCurl::HalfCurl
    } else {
        FingerCurl::FullCurl
    }
}

/// Angle at `joint` between the segments to `prev` and `next`, in degrees.
/// 180 means the three points are collinear (finger straight).
fn interior_angle_deg(prev: &Landmark, joint: &Landmark, next: &Landmark) -> f32 {
    let a = prev.sub(joint);
    let b = next.sub(joint);
    let len_a = norm(&a);
    let len_b = norm(&b);
    if len_a < DEGENERATE_SEGMENT || len_b < DEGENERATE_SEGMENT {
        return 180.0;
    }

    let cos = (a[0] * b[0] + a[1] * b[1] + a[2] * b[2]) / (len_a * len_b);
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

fn norm(v: &[f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Nearest of the eight compass directions for the base -> tip vector.
/// Image y grows downward, so it is flipped to measure angles with up positive.
fn estimate_direction(base: &Landmark, tip: &Landmark) -> FingerDirection {
    let dx = tip.x - base.x;
    let dy = base.y - tip.y;
    let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);
    let sector = ((angle / 45.0).round() as usize) % 8;
    FingerDirection::COMPASS[sector]
}
