//! Contact events for audio/haptic feedback
//!
//! Flattens the per-frame collision flags into one ordered list, so a sound
//! layer can schedule effects without walking every frame.

use serde::Serialize;

use super::state::{TrajectoryPoint, WallSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContactKind {
    /// Ball registered a hit on a peg
    Peg { row: u16, col: u16 },
    /// Ball bounced off a board wall
    Wall { side: WallSide },
    /// Ball struck a bucket divider
    BucketWall,
    /// Ball landed on a bucket floor
    BucketFloor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactEvent {
    pub frame: u32,
    pub kind: ContactKind,
}

/// All contacts in frame order (pegs, then walls, then buckets within a frame)
pub fn contact_events(points: &[TrajectoryPoint]) -> Vec<ContactEvent> {
    let mut events = Vec::new();
    for point in points.iter().filter(|p| p.has_contact()) {
        let frame = point.frame;
        events.extend(point.pegs_hit.iter().map(|hit| ContactEvent {
            frame,
            kind: ContactKind::Peg {
                row: hit.row,
                col: hit.col,
            },
        }));
        if let Some(side) = point.wall_hit {
            events.push(ContactEvent {
                frame,
                kind: ContactKind::Wall { side },
            });
        }
        if point.bucket_wall_hit {
            events.push(ContactEvent {
                frame,
                kind: ContactKind::BucketWall,
            });
        }
        if point.bucket_floor_hit {
            events.push(ContactEvent {
                frame,
                kind: ContactKind::BucketFloor,
            });
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PegHit;

    #[test]
    fn test_events_in_frame_order() {
        let quiet = |frame| TrajectoryPoint {
            frame,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            vx: 0.0,
            vy: 0.0,
            pegs_hit: Vec::new(),
            wall_hit: None,
            bucket_wall_hit: false,
            bucket_floor_hit: false,
        };

        let mut points: Vec<_> = (0..5).map(quiet).collect();
        points[1].pegs_hit = vec![PegHit { row: 0, col: 3 }, PegHit { row: 1, col: 2 }];
        points[3].wall_hit = Some(WallSide::Right);
        points[4].bucket_wall_hit = true;
        points[4].bucket_floor_hit = true;

        let events = contact_events(&points);
        let kinds: Vec<_> = events.iter().map(|e| (e.frame, e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (1, ContactKind::Peg { row: 0, col: 3 }),
                (1, ContactKind::Peg { row: 1, col: 2 }),
                (3, ContactKind::Wall { side: WallSide::Right }),
                (4, ContactKind::BucketWall),
                (4, ContactKind::BucketFloor),
            ]
        );
    }
}
