use crate::scenario::config::ScenarioConfig;
use navcore::model::GpsSnapshot;
use rand::{rngs::StdRng, Rng, SeedableRng};

const EARTH_DEGREE_METERS: f64 = 111_320.0;

/// Seeded random walk along the scenario heading, emitting the same wire
/// records the device uplink would publish.
pub struct TrackWalker {
    config: ScenarioConfig,
    latitude: f64,
    longitude: f64,
    rng: StdRng,
}

impl TrackWalker {
    pub fn new(config: ScenarioConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            latitude: config.start_latitude,
            longitude: config.start_longitude,
            config,
            rng,
        }
    }

    /// Advances the walk by `dt_secs` and emits the next snapshot. With
    /// probability `invalid_ratio` the tick simulates a lost fix instead.
    pub fn step(&mut self, dt_secs: f64) -> GpsSnapshot {
        let meters = self.config.speed_kmph / 3.6 * dt_secs;
        let heading = self.config.heading_deg.to_radians();
        self.latitude += meters * heading.cos() / EARTH_DEGREE_METERS;
        self.longitude += meters * heading.sin()
            / (EARTH_DEGREE_METERS * self.latitude.to_radians().cos().max(0.01));

        if self.config.invalid_ratio > 0.0
            && self.rng.gen_bool(self.config.invalid_ratio.min(1.0))
        {
            return GpsSnapshot {
                latitude: Some(self.latitude),
                longitude: Some(self.longitude),
                valid: false,
                speed_kmph: Some(0.0),
                satellites: Some(self.rng.gen_range(0..3)),
            };
        }

        let jitter = self.config.coord_jitter;
        let (lat_jitter, lon_jitter) = if jitter > 0.0 {
            (
                self.rng.gen_range(-jitter..jitter),
                self.rng.gen_range(-jitter..jitter),
            )
        } else {
            (0.0, 0.0)
        };
        let speed = (self.config.speed_kmph + self.rng.gen_range(-0.5..0.5)).max(0.0);
        let satellites = self
            .config
            .satellites
            .saturating_add_signed(self.rng.gen_range(-2..=2));

        GpsSnapshot {
            latitude: Some(self.latitude + lat_jitter),
            longitude: Some(self.longitude + lon_jitter),
            valid: true,
            speed_kmph: Some(speed),
            satellites: Some(satellites),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ScenarioConfig {
        ScenarioConfig {
            invalid_ratio: 0.0,
            coord_jitter: 0.0,
            seed: 42,
            ..Default::default()
        }
    }

    #[test]
    fn identical_seeds_replay_the_same_track() {
        let mut first = TrackWalker::new(scenario());
        let mut second = TrackWalker::new(scenario());
        for _ in 0..25 {
            assert_eq!(first.step(1.0), second.step(1.0));
        }
    }

    #[test]
    fn zero_invalid_ratio_emits_only_actionable_snapshots() {
        let mut walker = TrackWalker::new(ScenarioConfig {
            invalid_ratio: 0.0,
            ..Default::default()
        });
        for _ in 0..50 {
            assert!(walker.step(1.0).actionable().is_some());
        }
    }

    #[test]
    fn full_invalid_ratio_never_emits_actionable_snapshots() {
        let mut walker = TrackWalker::new(ScenarioConfig {
            invalid_ratio: 1.0,
            ..Default::default()
        });
        for _ in 0..20 {
            assert!(walker.step(1.0).actionable().is_none());
        }
    }

    #[test]
    fn northbound_walk_increases_latitude_only() {
        let mut config = scenario();
        config.heading_deg = 0.0;
        let start_latitude = config.start_latitude;
        let start_longitude = config.start_longitude;

        let mut walker = TrackWalker::new(config);
        let last = (0..30).map(|_| walker.step(1.0)).last().unwrap();

        assert!(last.latitude.unwrap() > start_latitude);
        assert!((last.longitude.unwrap() - start_longitude).abs() < 1e-9);
    }
}
