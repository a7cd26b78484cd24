//! Frame-indexed render cache
//!
//! The renderer reads one entry per frame at 60 FPS, so every value it needs is
//! derived here once: no square roots or clamping on the hot path.

use serde::Serialize;

use super::state::TrajectoryPoint;
use crate::consts::{MAX_SQUASH, MAX_STRETCH};
use crate::error::CacheError;

/// Values for one frame, copied out of the cache
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    pub speed: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub trail_length: u16,
}

/// Parallel per-frame buffers, all the same length as the trajectory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryCache {
    speeds: Box<[f32]>,
    scales_x: Box<[f32]>,
    scales_y: Box<[f32]>,
    trail_lengths: Box<[u16]>,
    max_trail_length: u16,
}

impl TrajectoryCache {
    /// Derive the cache from a finished trajectory
    ///
    /// `max_speed` is the speed at which squash/stretch and trail length saturate.
    pub fn build(
        points: &[TrajectoryPoint],
        max_speed: f32,
        max_trail_length: u16,
    ) -> Result<Self, CacheError> {
        let len = points.len();
        let mut speeds = Vec::with_capacity(len);
        let mut scales_x = Vec::with_capacity(len);
        let mut scales_y = Vec::with_capacity(len);
        let mut trail_lengths = Vec::with_capacity(len);

        for point in points {
            let speed = point.speed();
            let t = speed_fraction(speed, max_speed);
            speeds.push(speed);
            scales_x.push(1.0 - MAX_SQUASH * t);
            scales_y.push(1.0 + MAX_STRETCH * t);
            trail_lengths.push((t * max_trail_length as f32).round() as u16);
        }

        Self::from_parts(
            speeds.into(),
            scales_x.into(),
            scales_y.into(),
            trail_lengths.into(),
            max_trail_length,
            len,
        )
    }

    /// Assemble a cache from precomputed buffers, checking every invariant
    pub fn from_parts(
        speeds: Box<[f32]>,
        scales_x: Box<[f32]>,
        scales_y: Box<[f32]>,
        trail_lengths: Box<[u16]>,
        max_trail_length: u16,
        expected_len: usize,
    ) -> Result<Self, CacheError> {
        for (buffer, actual) in [
            ("speeds", speeds.len()),
            ("scalesX", scales_x.len()),
            ("scalesY", scales_y.len()),
            ("trailLengths", trail_lengths.len()),
        ] {
            if actual != expected_len {
                return Err(CacheError::LengthMismatch {
                    buffer,
                    expected: expected_len,
                    actual,
                });
            }
        }

        check_range("speeds", &speeds, 0.0, f32::MAX)?;
        check_range("scalesX", &scales_x, Self::SCALE_X_RANGE.0, Self::SCALE_X_RANGE.1)?;
        check_range("scalesY", &scales_y, Self::SCALE_Y_RANGE.0, Self::SCALE_Y_RANGE.1)?;
        if let Some((frame, &len)) = trail_lengths
            .iter()
            .enumerate()
            .find(|&(_, &len)| len > max_trail_length)
        {
            return Err(CacheError::OutOfRange {
                buffer: "trailLengths",
                frame,
                value: len as f32,
            });
        }

        Ok(Self {
            speeds,
            scales_x,
            scales_y,
            trail_lengths,
            max_trail_length,
        })
    }

    /// Clamp range of `scales_x` (squash)
    pub const SCALE_X_RANGE: (f32, f32) = (1.0 - MAX_SQUASH, 1.0);
    /// Clamp range of `scales_y` (stretch)
    pub const SCALE_Y_RANGE: (f32, f32) = (1.0, 1.0 + MAX_STRETCH);

    #[inline]
    pub fn len(&self) -> usize {
        self.speeds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.speeds.is_empty()
    }

    /// O(1) lookup for a frame
    #[inline]
    pub fn sample(&self, frame: usize) -> Option<FrameSample> {
        Some(FrameSample {
            speed: *self.speeds.get(frame)?,
            scale_x: self.scales_x[frame],
            scale_y: self.scales_y[frame],
            trail_length: self.trail_lengths[frame],
        })
    }

    pub fn speeds(&self) -> &[f32] {
        &self.speeds
    }

    pub fn scales_x(&self) -> &[f32] {
        &self.scales_x
    }

    pub fn scales_y(&self) -> &[f32] {
        &self.scales_y
    }

    pub fn trail_lengths(&self) -> &[u16] {
        &self.trail_lengths
    }

    pub fn max_trail_length(&self) -> u16 {
        self.max_trail_length
    }
}

/// Monotonic map of speed into [0, 1]
#[inline]
fn speed_fraction(speed: f32, max_speed: f32) -> f32 {
    if max_speed <= 0.0 || !speed.is_finite() {
        return 0.0;
    }
    (speed / max_speed).clamp(0.0, 1.0)
}

fn check_range(buffer: &'static str, values: &[f32], lo: f32, hi: f32) -> Result<(), CacheError> {
    match values.iter().position(|v| !(lo..=hi).contains(v)) {
        Some(frame) => Err(CacheError::OutOfRange {
            buffer,
            frame,
            value: values[frame],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(frame: u32, vx: f32, vy: f32) -> TrajectoryPoint {
        TrajectoryPoint {
            frame,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            vx,
            vy,
            pegs_hit: Vec::new(),
            wall_hit: None,
            bucket_wall_hit: false,
            bucket_floor_hit: false,
        }
    }

    #[test]
    fn test_buffers_match_trajectory() {
        let points: Vec<_> = (0..50).map(|i| point(i, i as f32 * 10.0, 300.0)).collect();
        let cache = TrajectoryCache::build(&points, 900.0, 12).unwrap();
        assert_eq!(cache.len(), points.len());
        assert_eq!(cache.scales_x().len(), points.len());
        assert_eq!(cache.scales_y().len(), points.len());
        assert_eq!(cache.trail_lengths().len(), points.len());
        assert!((cache.speeds()[4] - 40.0f32.hypot(300.0)).abs() < 1e-3);
    }

    #[test]
    fn test_scales_clamped_and_monotonic() {
        let points = vec![
            point(0, 0.0, 0.0),
            point(1, 0.0, 450.0),
            point(2, 0.0, 900.0),
            point(3, 3000.0, 3000.0),
        ];
        let cache = TrajectoryCache::build(&points, 900.0, 12).unwrap();

        assert_eq!(cache.sample(0).unwrap().scale_x, 1.0);
        assert_eq!(cache.sample(0).unwrap().trail_length, 0);
        assert_eq!(cache.sample(1).unwrap().trail_length, 6);
        assert_eq!(cache.sample(2).unwrap().trail_length, 12);
        // Faster than max_speed saturates
        assert_eq!(cache.sample(3).unwrap(), FrameSample {
            speed: cache.speeds()[3],
            scale_x: 1.0 - MAX_SQUASH,
            scale_y: 1.0 + MAX_STRETCH,
            trail_length: 12,
        });

        for pair in cache.scales_y().windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        for pair in cache.scales_x().windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        assert!(cache.sample(4).is_none());
    }

    #[test]
    fn test_from_parts_rejects_length_mismatch() {
        let err = TrajectoryCache::from_parts(
            vec![0.0; 3].into(),
            vec![1.0; 3].into(),
            vec![1.0; 2].into(),
            vec![0; 3].into(),
            12,
            3,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CacheError::LengthMismatch {
                buffer: "scalesY",
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_from_parts_rejects_out_of_range() {
        let err = TrajectoryCache::from_parts(
            vec![0.0; 2].into(),
            vec![1.0, 0.5].into(),
            vec![1.0; 2].into(),
            vec![0; 2].into(),
            12,
            2,
        )
        .unwrap_err();
        assert!(matches!(err, CacheError::OutOfRange { buffer: "scalesX", frame: 1, .. }));

        let err = TrajectoryCache::from_parts(
            vec![0.0; 1].into(),
            vec![1.0; 1].into(),
            vec![1.0; 1].into(),
            vec![13].into(),
            12,
            1,
        )
        .unwrap_err();
        assert!(matches!(err, CacheError::OutOfRange { buffer: "trailLengths", .. }));
    }

    #[test]
    fn test_empty_trajectory() {
        let cache = TrajectoryCache::build(&[], 900.0, 12).unwrap();
        assert!(cache.is_empty());
    }
}
