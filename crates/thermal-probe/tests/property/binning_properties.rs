use proptest::prelude::*;
use thermal_probe::binning::{adaptive_bins, assign_bin, information_gain};

const STATIC_BINS: [f64; 5] = [-10.0, 0.0, 10.0, 20.0, 30.0];

proptest! {
    #[test]
    fn bin_assignment_is_monotonic(a in -60.0f64..80.0, b in -60.0f64..80.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(assign_bin(lo, &STATIC_BINS) <= assign_bin(hi, &STATIC_BINS));
        prop_assert!(assign_bin(hi, &STATIC_BINS) <= STATIC_BINS.len());
    }

    #[test]
    fn gain_is_bounded(
        temp in -40.0f64..60.0,
        history in prop::collection::vec(-40.0f64..60.0, 0..100),
    ) {
        let gain = information_gain(temp, &history, &STATIC_BINS);
        prop_assert!(gain > 0.0);
        prop_assert!(gain <= 1.0);
    }

    #[test]
    fn adaptive_bins_keep_minimum_spread(
        history in prop::collection::vec(-30.0f64..45.0, 50..150),
        num_bins in 2usize..8,
    ) {
        let bins = adaptive_bins(&history, num_bins).unwrap();
        prop_assert_eq!(bins.len(), num_bins - 1);
        for w in bins.windows(2) {
            prop_assert!(w[1] - w[0] >= 5.0 - 1e-9);
        }
    }
}
