// Synthetic hand skeletons for tests
//
// Each finger is laid out as a chain starting at the shared wrist. Every joint
// bends by the same angle, so the interior angle at each joint is
// 180 - bend and the base -> tip vector points along the requested direction.

use crate::models::hand::{Finger, FingerDirection, Landmark, LandmarkSet, FINGER_COUNT, LANDMARK_COUNT};

pub const STRAIGHT: f32 = 0.0;
pub const HALF: f32 = 40.0;
pub const FULL: f32 = 100.0;

#[derive(Debug, Clone)]
pub struct HandBuilder {
    wrist: (f32, f32),
    segment: f32,
    fingers: [(FingerDirection, f32); FINGER_COUNT],
}

impl HandBuilder {
    pub fn new() -> Self {
        Self::uniform(FingerDirection::Up, STRAIGHT)
    }

    pub fn uniform(direction: FingerDirection, bend: f32) -> Self {
        Self {
            wrist: (0.5, 0.5),
            segment: 0.05,
            fingers: [(direction, bend); FINGER_COUNT],
        }
    }

    pub fn finger(mut self, finger: Finger, direction: FingerDirection, bend: f32) -> Self {
        self.fingers[finger.index()] = (direction, bend);
        self
    }

    /// Place the wrist at `(x, y)` with bones of length `segment`
    pub fn at(mut self, x: f32, y: f32, segment: f32) -> Self {
        self.wrist = (x, y);
        self.segment = segment;
        self
    }

    pub fn build(&self) -> LandmarkSet {
        let wrist = Landmark::new(self.wrist.0, self.wrist.1, 0.0);
        let mut points = [wrist; LANDMARK_COUNT];

        for finger in Finger::ALL {
            let (direction, bend) = self.fingers[finger.index()];
            let target = compass_angle(direction);
            let mut heading = target - 2.0 * bend;
            let mut current = wrist;

            for joint in finger.joints() {
                let rad = heading.to_radians();
                current = Landmark::new(
                    current.x + self.segment * rad.cos(),
                    current.y - self.segment * rad.sin(),
                    0.0,
                );
                points[joint.index()] = current;
                heading += bend;
            }
        }

        LandmarkSet::new(points)
    }
}

fn compass_angle(direction: FingerDirection) -> f32 {
    let sector = FingerDirection::COMPASS
        .iter()
        .position(|d| *d == direction)
        .unwrap_or(0);
    sector as f32 * 45.0
}

use crate::models::hand::Finger::{Index, Middle, Pinky, Thumb};
use crate::models::hand::FingerDirection::{DiagonalUpLeft, Down, Left, Right, Up};

pub fn thumbs_up_hand() -> HandBuilder {
    HandBuilder::uniform(Left, FULL).finger(Thumb, Up, STRAIGHT)
}

pub fn victory_hand() -> HandBuilder {
    HandBuilder::uniform(Down, FULL)
        .finger(Thumb, Left, HALF)
        .finger(Index, DiagonalUpLeft, STRAIGHT)
        .finger(Middle, Up, STRAIGHT)
}

pub fn i_love_you_hand() -> HandBuilder {
    HandBuilder::uniform(Down, FULL)
        .finger(Thumb, Left, STRAIGHT)
        .finger(Index, Up, STRAIGHT)
        .finger(Pinky, Up, STRAIGHT)
}

pub fn point_left_hand() -> HandBuilder {
    HandBuilder::uniform(Right, FULL)
        .finger(Thumb, Left, HALF)
        .finger(Index, Left, STRAIGHT)
}

pub fn point_right_hand() -> HandBuilder {
    HandBuilder::uniform(Left, FULL)
        .finger(Thumb, Right, HALF)
        .finger(Index, Right, STRAIGHT)
}

pub fn okay_hand() -> HandBuilder {
    HandBuilder::uniform(Up, STRAIGHT)
        .finger(Thumb, Up, HALF)
        .finger(Index, Up, HALF)
}

/// Every finger half curled and hanging down; not part of the vocabulary
pub fn limp_hand() -> HandBuilder {
    HandBuilder::uniform(Down, HALF)
}
