use std::collections::VecDeque;
use std::ops::Range;

use rand::Rng;


pub const HEART_RATE_BPM: Range<u32> = 60..100;
pub const BODY_TEMP_CELSIUS: Range<f64> = 36.0..37.5;

pub const HEART_RATE_SERIES: &str = "Heart Rate";
pub const BODY_TEMP_SERIES: &str = "Body Temp";


/// One observation at a discrete time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub index: u64,
    pub value: f64,
}

impl Sample {
    pub fn new(index: u64, value: f64) -> Self {
        Sample { index, value }
    }
}

impl From<Sample> for [f64; 2] {
    fn from(sample: Sample) -> Self {
        [sample.index as f64, sample.value]
    }
}


/// Chronological, append-only run of samples for one quantity.
///
/// With a non-zero `max_samples` only the newest samples are retained and the
/// oldest one is evicted on every append past the cap.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: &'static str,
    samples: VecDeque<Sample>,
    max_samples: usize,
}

impl Series {
    pub fn new(name: &'static str, max_samples: usize) -> Self {
        Series {
            name,
            samples: VecDeque::new(),
            max_samples,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn push(&mut self, sample: Sample) {
        if self.max_samples > 0 && self.samples.len() == self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.iter().copied().collect()
    }
}


/// The pair of raw values produced by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub heart_rate: u32,
    pub body_temp: f64,
}

impl Reading {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Reading {
            heart_rate: rng.gen_range(HEART_RATE_BPM),
            body_temp: rng.gen_range(BODY_TEMP_CELSIUS),
        }
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    heart_rate: Series,
    body_temp: Series,
    tick: u64,
}

impl SimulationState {
    pub fn new(max_samples: usize) -> Self {
        SimulationState {
            heart_rate: Series::new(HEART_RATE_SERIES, max_samples),
            body_temp: Series::new(BODY_TEMP_SERIES, max_samples),
            tick: 0,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn heart_rate(&self) -> &Series {
        &self.heart_rate
    }

    pub fn body_temp(&self) -> &Series {
        &self.body_temp
    }

    /// Records `reading` under the next index on both series.
    pub fn record(&mut self, reading: Reading) -> u64 {
        self.tick += 1;
        self.heart_rate.push(Sample::new(self.tick, reading.heart_rate as f64));
        self.body_temp.push(Sample::new(self.tick, reading.body_temp));
        self.tick
    }
}


#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn generated_readings_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let reading = Reading::generate(&mut rng);
            assert!(HEART_RATE_BPM.contains(&reading.heart_rate));
            assert!(reading.body_temp >= 36.0 && reading.body_temp < 37.5);
        }
    }

    #[test]
    fn record_grows_both_series_in_lockstep() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SimulationState::new(0);
        assert_eq!(state.tick(), 0);
        assert_eq!(state.heart_rate().len(), 0);

        for expected in 1..=50u64 {
            let before = state.heart_rate().len();
            let tick = state.record(Reading::generate(&mut rng));

            assert_eq!(tick, expected);
            assert_eq!(state.tick(), expected);
            assert_eq!(state.heart_rate().len(), before + 1);
            assert_eq!(state.body_temp().len(), state.heart_rate().len());
            assert_eq!(state.heart_rate().len() as u64, state.tick());
        }
    }

    #[test]
    fn heart_rate_samples_are_integral() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = SimulationState::new(0);
        for _ in 0..200 {
            state.record(Reading::generate(&mut rng));
        }

        for sample in state.heart_rate().iter() {
            assert_eq!(sample.value.fract(), 0.0);
            assert!(sample.value >= 60.0 && sample.value < 100.0);
        }
        for sample in state.body_temp().iter() {
            assert!(sample.value >= 36.0 && sample.value < 37.5);
        }
    }

    #[test]
    fn indices_are_shared_and_chronological() {
        let mut state = SimulationState::new(0);
        state.record(Reading { heart_rate: 72, body_temp: 36.6 });
        state.record(Reading { heart_rate: 80, body_temp: 37.1 });

        let hr: Vec<u64> = state.heart_rate().iter().map(|s| s.index).collect();
        let temp: Vec<u64> = state.body_temp().iter().map(|s| s.index).collect();
        assert_eq!(hr, vec![1, 2]);
        assert_eq!(hr, temp);
        assert_eq!(state.heart_rate().iter().last(), Some(&Sample::new(2, 80.0)));
        assert_eq!(state.heart_rate().name(), "Heart Rate");
        assert_eq!(state.body_temp().name(), "Body Temp");
    }

    #[test]
    fn capped_series_keeps_newest_window() {
        let mut state = SimulationState::new(5);
        for i in 0..8 {
            state.record(Reading { heart_rate: 60 + i, body_temp: 36.0 });
        }

        assert_eq!(state.tick(), 8);
        assert_eq!(state.heart_rate().len(), 5);
        assert_eq!(state.body_temp().len(), 5);

        let indices: Vec<u64> = state.heart_rate().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![4, 5, 6, 7, 8]);
        assert_eq!(state.heart_rate().to_vec()[0].value, 63.0);
    }

    #[test]
    fn same_seed_same_readings() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(Reading::generate(&mut a), Reading::generate(&mut b));
        }
    }
}
