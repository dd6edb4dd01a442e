//! Demonstrates enabling verbose logging for bfpfft.
use bfpfft::{ComplexQ31, FftPlanner, RfftPlanner, Scaling};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .init();

    let mut planner = FftPlanner::new();
    let mut input = vec![ComplexQ31::zero(); 48];
    input[0] = ComplexQ31::new(1 << 24, 0);
    let mut output = vec![ComplexQ31::zero(); 48];
    let shift = planner
        .fft(&mut input, &mut output, Scaling::Dynamic)
        .unwrap();
    println!("complex shift {shift}, bin 0 {:?}", output[0]);

    let mut real = RfftPlanner::new();
    let samples = [1 << 20; 24];
    let mut bins = vec![ComplexQ31::zero(); 13];
    let mut scratch = vec![ComplexQ31::zero(); 24];
    let shift = real
        .rfft(&samples, &mut bins, &mut scratch, Scaling::Dynamic)
        .unwrap();
    println!("real shift {shift}, dc bin {:?}", bins[0]);
}
