use cloudsift_algorithms::{
    downsample, filter_outliers, normalize, synthetic, validate, FeaturePipeline,
    SiftDetector, PipelineConfig, PixelIndexKind, DESCRIPTOR_LEN,
};
use cloudsift_core::{Drawable, Point3f, PointCloud, NEUTRAL_GRAY};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sample_cylinder(seed: u64) -> PointCloud {
    let mut rng = StdRng::seed_from_u64(seed);
    synthetic::cylinder(
        synthetic::SAMPLE_RADIUS,
        synthetic::SAMPLE_HEIGHT,
        synthetic::SAMPLE_POINTS,
        &mut rng,
    )
}

#[test]
fn test_cylinder_end_to_end() {
    let cloud = sample_cylinder(42);
    assert!(validate(&cloud));

    let pipeline = FeaturePipeline::new(SiftDetector::new(), PipelineConfig::default());
    let output = pipeline.run(&cloud).unwrap();

    assert!(output.cloud.len() <= cloud.len());
    assert!(!output.features.is_empty());
    assert!(output.features.len() <= 1000);
    assert!(output.features.len() <= output.extracted);

    for (keypoint, descriptor) in output.features.iter() {
        assert!(output.cloud.positions.contains(keypoint));
        assert_eq!(descriptor.len(), DESCRIPTOR_LEN);
    }
}

#[test]
fn test_index_kinds_agree_end_to_end() {
    let cloud = sample_cylinder(5);
    let brute = FeaturePipeline::new(
        SiftDetector::new(),
        PipelineConfig::default().with_index_kind(PixelIndexKind::BruteForce),
    );
    let tree = FeaturePipeline::new(
        SiftDetector::new(),
        PipelineConfig::default().with_index_kind(PixelIndexKind::RTree),
    );

    let normalized = brute.preprocess(&cloud).unwrap();
    assert_eq!(
        brute.extract_features(&normalized).unwrap(),
        tree.extract_features(&normalized).unwrap()
    );
}

#[test]
fn test_identical_points_do_not_panic() {
    let cloud = PointCloud::with_uniform_color(vec![Point3f::new(3.0, -2.0, 7.0); 200], NEUTRAL_GRAY);
    let pipeline = FeaturePipeline::new(SiftDetector::new(), PipelineConfig::default());
    let output = pipeline.run(&cloud).unwrap();

    assert_eq!(output.cloud.len(), 200);
    assert!(output.cloud.positions.iter().all(|p| *p == Point3f::origin()));
    for keypoint in &output.features.keypoints {
        assert_eq!(*keypoint, Point3f::origin());
    }
}

#[test]
fn test_normalized_cylinder_fits_unit_box() {
    let cloud = sample_cylinder(8);
    let normalized = normalize(&filter_outliers(&cloud, 2.0).unwrap());
    let (min, max) = normalized.bounding_box();

    for axis in 0..3 {
        assert!(max[axis] - min[axis] <= 1.0 + 1e-6);
        assert!((max[axis] + min[axis]).abs() <= 1e-5);
    }
}

#[test]
fn test_downsample_then_pipeline() {
    let cloud = sample_cylinder(13);
    let mut rng = StdRng::seed_from_u64(13);
    let reduced = downsample(&cloud, 2_000, &mut rng);
    assert_eq!(reduced.len(), 2_000);

    let pipeline = FeaturePipeline::new(
        SiftDetector::new(),
        PipelineConfig::default().with_raster_size(256).with_max_features(50),
    );
    let output = pipeline.run(&reduced).unwrap();
    assert!(output.features.len() <= 50);
    for keypoint in &output.features.keypoints {
        assert!(output.cloud.positions.contains(keypoint));
    }
}
