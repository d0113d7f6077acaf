//! Descriptor-based feature filtering

use cloudsift_core::FeatureSet;

/// Added to the maximum norm so an all-zero feature set never divides by zero
const NORM_EPSILON: f64 = 1e-10;

/// Keep features whose relative descriptor strength exceeds `threshold`
///
/// The score of a feature is its descriptor's L2 norm divided by the largest
/// norm in the set. Only features with a score strictly above `threshold`
/// survive, in their original order; a zero descriptor scores 0 and is
/// therefore dropped even at a threshold of 0.
///
/// # Arguments
/// * `features` - Keypoints and their descriptors
/// * `threshold` - Minimum relative strength, normally in `[0, 1)`
///
/// # Returns
/// * `FeatureSet` - The surviving features
pub fn filter_by_quality(features: &FeatureSet, threshold: f32) -> FeatureSet {
    if features.is_empty() {
        return FeatureSet::new();
    }

    let norms = features.descriptor_norms();
    let max_norm = norms.iter().cloned().fold(0.0f32, f32::max) as f64;
    let denom = max_norm + NORM_EPSILON;

    let keep: Vec<usize> = norms
        .iter()
        .enumerate()
        .filter(|(_, &norm)| norm as f64 / denom > threshold as f64)
        .map(|(idx, _)| idx)
        .collect();

    features.select(&keep)
}

/// Keep the `max_count` features with the strongest descriptors
///
/// Returns the input unchanged when it already fits. Otherwise features are
/// ordered by descriptor norm, strongest first, with equal norms keeping their
/// original relative order, and the first `max_count` are returned in that
/// order.
pub fn limit_count(features: &FeatureSet, max_count: usize) -> FeatureSet {
    if features.len() <= max_count {
        return features.clone();
    }

    let norms = features.descriptor_norms();
    let mut order: Vec<usize> = (0..features.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| norms[b].total_cmp(&norms[a]));
    order.truncate(max_count);

    features.select(&order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsift_core::Point3f;

    fn features(descriptors: Vec<Vec<f32>>) -> FeatureSet {
        let keypoints = (0..descriptors.len())
            .map(|i| Point3f::new(i as f32, 0.0, 0.0))
            .collect();
        FeatureSet::from_parts(keypoints, descriptors).unwrap()
    }

    fn xs(set: &FeatureSet) -> Vec<f32> {
        set.keypoints.iter().map(|p| p.x).collect()
    }

    #[test]
    fn test_quality_filter_drops_zero_descriptors() {
        let set = features(vec![vec![3.0, 4.0], vec![0.0, 0.0], vec![1.0, 0.0]]);
        let filtered = filter_by_quality(&set, 0.0);
        assert_eq!(xs(&filtered), vec![0.0, 2.0]);
    }

    #[test]
    fn test_quality_filter_threshold_is_relative() {
        let set = features(vec![vec![10.0], vec![5.0], vec![4.0], vec![6.0]]);
        let filtered = filter_by_quality(&set, 0.5);
        // scores 1.0, ~0.5, 0.4, 0.6; 5/10 sits just below 0.5 because of the epsilon
        assert_eq!(xs(&filtered), vec![0.0, 3.0]);
    }

    #[test]
    fn test_quality_filter_on_all_zero_set() {
        let set = features(vec![vec![0.0; 4]; 3]);
        assert!(filter_by_quality(&set, 0.0).is_empty());
    }

    #[test]
    fn test_quality_filter_on_empty_set() {
        assert!(filter_by_quality(&FeatureSet::new(), 0.0).is_empty());
    }

    #[test]
    fn test_limit_count_is_identity_when_small() {
        let set = features(vec![vec![1.0], vec![3.0]]);
        assert_eq!(limit_count(&set, 2), set);
        assert_eq!(limit_count(&set, 10), set);
    }

    #[test]
    fn test_limit_count_keeps_strongest_in_sorted_order() {
        let set = features(vec![vec![1.0], vec![5.0], vec![3.0], vec![4.0]]);
        let limited = limit_count(&set, 2);
        assert_eq!(limited.len(), 2);
        assert_eq!(xs(&limited), vec![1.0, 3.0]);
        assert_eq!(limited.descriptors, vec![vec![5.0], vec![4.0]]);
    }

    #[test]
    fn test_limit_count_ties_keep_original_order() {
        let set = features(vec![vec![2.0], vec![0.0, 2.0], vec![1.0], vec![-2.0]]);
        let limited = limit_count(&set, 3);
        assert_eq!(xs(&limited), vec![0.0, 1.0, 3.0]);
    }

    #[test]
    fn test_limit_count_zero() {
        let set = features(vec![vec![1.0]]);
        assert!(limit_count(&set, 0).is_empty());
    }
}
