use serde::Serialize;
use simcore::ControlMode;

/// Snapshot of the car after one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetrySample {
    /// s
    pub time: f64,
    /// m
    pub distance: f64,
    /// m/s
    pub speed: f64,
    /// m/s²
    pub acceleration: f64,
    /// N
    pub drag: f64,
    /// N
    pub downforce: f64,
    pub throttle: f64,
    pub brake: f64,
    pub lateral_g: f64,
    pub longitudinal_g: f64,
    pub drs_active: bool,
    /// Segment the step was integrated in.
    pub segment_index: usize,
    pub mode: ControlMode,
}

impl TelemetrySample {
    pub fn speed_kmh(&self) -> f64 {
        self.speed * mechanics::KMH_PER_MS
    }
}

/// Samples recorded during one lap, in time order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Telemetry {
    samples: Vec<TelemetrySample>,
}

impl Telemetry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Telemetry { samples: Vec::with_capacity(capacity) }
    }

    pub(crate) fn push(&mut self, sample: TelemetrySample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TelemetrySample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&TelemetrySample> {
        self.samples.last()
    }

    /// m/s, `None` when nothing was recorded.
    pub fn max_speed(&self) -> Option<f64> {
        self.iter().map(|s| s.speed).reduce(f64::max)
    }

    pub fn min_speed(&self) -> Option<f64> {
        self.iter().map(|s| s.speed).reduce(f64::min)
    }

    pub fn mean_speed(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.iter().map(|s| s.speed).sum::<f64>() / self.len() as f64)
        }
    }

    /// Samples with `start <= distance < end`.
    pub fn within(&self, start: f64, end: f64) -> impl Iterator<Item = &TelemetrySample> {
        self.iter().filter(move |s| s.distance >= start && s.distance < end)
    }

    /// Every n-th sample, with n chosen so that at most `max_points` remain.
    pub fn downsample(&self, max_points: usize) -> Vec<TelemetrySample> {
        if max_points == 0 {
            return Vec::new();
        }
        let stride = self.len().div_ceil(max_points).max(1);
        self.iter().step_by(stride).copied().collect()
    }
}

impl<'a> IntoIterator for &'a Telemetry {
    type Item = &'a TelemetrySample;
    type IntoIter = std::slice::Iter<'a, TelemetrySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(distance: f64, speed: f64) -> TelemetrySample {
        TelemetrySample {
            time: distance / 10.0,
            distance,
            speed,
            acceleration: 0.0,
            drag: 0.0,
            downforce: 0.0,
            throttle: 1.0,
            brake: 0.0,
            lateral_g: 0.0,
            longitudinal_g: 0.0,
            drs_active: false,
            segment_index: 0,
            mode: ControlMode::Accelerating,
        }
    }

    fn telemetry(count: usize) -> Telemetry {
        let mut telemetry = Telemetry::default();
        for i in 0..count {
            telemetry.push(sample(i as f64 * 10.0, 20.0 + (i % 7) as f64));
        }
        telemetry
    }

    #[test]
    fn test_empty_statistics() {
        let telemetry = Telemetry::default();
        assert!(telemetry.is_empty());
        assert_eq!(telemetry.max_speed(), None);
        assert_eq!(telemetry.min_speed(), None);
        assert_eq!(telemetry.mean_speed(), None);
        assert!(telemetry.downsample(200).is_empty());
    }

    #[test]
    fn test_speed_statistics() {
        let telemetry = telemetry(7);
        assert_eq!(telemetry.max_speed(), Some(26.0));
        assert_eq!(telemetry.min_speed(), Some(20.0));
        assert!((telemetry.mean_speed().unwrap() - 23.0).abs() < 1e-12);
        assert_eq!(telemetry.last().map(|s| s.distance), Some(60.0));
    }

    #[test]
    fn test_within_is_half_open() {
        let telemetry = telemetry(10);
        let distances: Vec<f64> = telemetry.within(20.0, 50.0).map(|s| s.distance).collect();
        assert_eq!(distances, vec![20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_downsample_bounds_point_count() {
        for count in [1, 85, 199, 200, 201, 450, 1000] {
            let telemetry = telemetry(count);
            let reduced = telemetry.downsample(200);
            assert!(reduced.len() <= 200, "{} samples gave {}", count, reduced.len());
            assert_eq!(reduced[0], telemetry.samples()[0]);
        }
        assert_eq!(telemetry(85).downsample(200).len(), 85);
        assert_eq!(telemetry(450).downsample(200).len(), 150);
    }

    #[test]
    fn test_speed_kmh() {
        assert!((sample(0.0, 100.0).speed_kmh() - 360.0).abs() < 1e-9);
    }
}
