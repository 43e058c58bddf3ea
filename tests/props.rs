use datasound::mapping::{build_scale, quantize, quantize_2d, Mode};
use proptest::prelude::*;

/// Finite samples: mostly everyday magnitudes, sometimes anywhere in f64.
fn sample() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => -1.0e6f64..1.0e6,
        1 => prop::num::f64::NORMAL,
    ]
}

/// Series with roughly one NaN in five and at least one finite value.
fn series() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(prop::option::weighted(0.8, sample()), 1..64)
        .prop_map(|values| {
            values
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect::<Vec<f64>>()
        })
        .prop_filter("needs a finite value", |values| {
            values.iter().any(|v| v.is_finite())
        })
}

fn mode() -> impl Strategy<Value = Mode> {
    prop::sample::select(Mode::all().collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn quantize_stays_in_scale(values in series(), mode in mode(), octaves in 1usize..4) {
        let scale = build_scale("C", mode.name(), octaves).unwrap();
        let indices = quantize(&values, &scale).unwrap();

        prop_assert_eq!(indices.len(), values.len());
        for (value, index) in values.iter().zip(&indices) {
            match index {
                None => prop_assert!(value.is_nan()),
                Some(i) => prop_assert!(*i < scale.len()),
            }
        }
    }

    #[test]
    fn quantize_is_monotonic(mut values in prop::collection::vec(sample(), 1..64)) {
        values.sort_by(f64::total_cmp);
        let scale = build_scale("G", "minor", 2).unwrap();
        let indices: Vec<usize> = quantize(&values, &scale)
            .unwrap()
            .into_iter()
            .flatten()
            .collect();

        prop_assert_eq!(indices.len(), values.len());
        prop_assert!(indices.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert_eq!(indices.first().copied(), Some(0));
        // The maximum always lands on the top degree unless the series is constant.
        if values.first() != values.last() {
            prop_assert_eq!(indices.last().copied(), Some(scale.len() - 1));
        }
    }

    #[test]
    fn quantize_spans_extreme_ranges(lo in -f64::MAX..-1.0e300, hi in 1.0e300..f64::MAX) {
        let scale = build_scale("C", "major", 1).unwrap();
        let indices = quantize(&[lo, 0.0, hi], &scale).unwrap();
        prop_assert_eq!(indices[0], Some(0));
        prop_assert!(indices[0] <= indices[1] && indices[1] <= indices[2]);
        prop_assert_eq!(indices[2], Some(6));
    }

    #[test]
    fn quantize_2d_keeps_shape(rows in 1usize..6, columns in 1usize..12, seed in series()) {
        let grid: Vec<Vec<f64>> = (0..rows)
            .map(|r| (0..columns).map(|c| seed[(r * columns + c) % seed.len()]).collect())
            .collect();
        prop_assume!(grid.iter().flatten().any(|v| v.is_finite()));
        let scale = build_scale("C", "pentatonic", 1).unwrap();
        let indices = quantize_2d(&grid, &scale).unwrap();

        prop_assert_eq!(indices.len(), rows);
        prop_assert!(indices.iter().all(|row| row.len() == columns));
    }

    #[test]
    fn scale_length_is_degrees_times_octaves(mode in mode(), octaves in 1usize..6, tonic in 0usize..12) {
        let key = datasound::mapping::CHROMATIC[tonic];
        let scale = build_scale(key, mode.name(), octaves).unwrap();
        prop_assert_eq!(scale.len(), mode.intervals().len() * octaves);
        prop_assert!(scale.notes()[0].eq_ignore_ascii_case(key));
    }
}
