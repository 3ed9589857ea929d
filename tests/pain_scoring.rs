//! End-to-end scoring scenarios on synthetic landmark sets.

use feline_face::{
    eyes, inter_ocular_distance, nme, stats, ImageSize, LandmarkSet, PainLevel, PainReport,
    Pixel, Point, SubScore, NUM_LANDMARKS,
};

/// A plausible face layout: distinct points spread over a 200x200 image.
fn base_points() -> Vec<Point> {
    (0..NUM_LANDMARKS)
        .map(|i| Point::new(30.0 + (i % 8) as f32 * 18.0, 25.0 + (i / 8) as f32 * 25.0))
        .collect()
}

/// Set both eyes to the given horizontal and vertical eyelid distances.
fn set_eyes(points: &mut [Point], horizontal: f32, vertical: f32) {
    for (h0, h1, v0, v1, x) in [(8, 9, 11, 10, 40.0), (4, 5, 6, 7, 120.0)] {
        points[h0] = Point::new(x, 60.0);
        points[h1] = Point::new(x + horizontal, 60.0);
        points[v0] = Point::new(x + horizontal / 2.0, 60.0 - vertical / 2.0);
        points[v1] = Point::new(x + horizontal / 2.0, 60.0 + vertical / 2.0);
    }
}

fn eye_score(horizontal: f32, vertical: f32) -> SubScore {
    let mut points = base_points();
    set_eyes(&mut points, horizontal, vertical);
    eyes(&LandmarkSet::<Pixel>::from_points(points).unwrap())
}

#[test]
fn open_eyes_score_zero() {
    assert_eq!(eye_score(10.0, 8.0), SubScore::Scored(PainLevel::None));
    assert_eq!(eye_score(10.0, 8.0).code(), 0);
}

#[test]
fn squinting_eyes_score_two() {
    assert_eq!(eye_score(10.0, 4.0), SubScore::Scored(PainLevel::Marked));
    assert_eq!(eye_score(10.0, 4.0).code(), 2);
}

#[test]
fn eye_boundaries_fall_to_documented_side() {
    assert_eq!(eye_score(10.0, 7.0).code(), 1);
    assert_eq!(eye_score(10.0, 5.0).code(), 1);
    assert_eq!(eye_score(10.0, 4.9).code(), 2);
    assert_eq!(eye_score(10.0, 7.1).code(), 0);
}

#[test]
fn report_is_deterministic_and_flags_indeterminate_axes() {
    let mut points = base_points();
    set_eyes(&mut points, 10.0, 15.0);
    let set = LandmarkSet::<Pixel>::from_points(points).unwrap();

    let first = PainReport::assess(&set);
    let second = PainReport::assess(&set);
    assert_eq!(first, second);

    assert_eq!(first.eyes, SubScore::Indeterminate);
    assert!(first.is_error());
    assert!(first.indeterminate_axes().contains(&feline_face::Axis::Eyes));
    assert_eq!(first.total(), None);
}

#[test]
fn translated_prediction_has_shift_over_eye_distance_nme() {
    let size = ImageSize::new(200, 200).unwrap();
    let gt = LandmarkSet::<Pixel>::from_points(base_points()).unwrap();
    let shift = Point::new(6.0, 8.0);
    let pred =
        LandmarkSet::<Pixel>::from_points(base_points().into_iter().map(|p| p + shift).collect())
            .unwrap();

    let value = nme(&pred, &gt, size);
    // |shift| in normalized space is 10 / 200
    let expected = 0.05 / inter_ocular_distance(&gt.normalize(size));
    assert!(value > 0.0);
    assert!((value - expected).abs() < 1e-3, "{value} vs {expected}");
}

#[test]
fn nme_is_zero_for_perfect_prediction() {
    let size = ImageSize::new(200, 150).unwrap();
    let gt = LandmarkSet::<Pixel>::from_points(base_points()).unwrap();
    assert_eq!(nme(&gt, &gt, size), 0.0);
}

#[test]
fn outlier_example_flags_only_largest() {
    let values = [0.1, 0.2, 0.2, 0.3, 5.0];
    let threshold = stats::outlier_threshold(&values).unwrap();
    assert!((threshold - 0.45).abs() < 1e-5);
    assert_eq!(stats::outlier_indices(&values), vec![4]);
}
