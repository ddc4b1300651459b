//! Controlled vocabularies used by the validator.
//!
//! The tables are plain static data. [`Vocabulary::standard`] bundles the
//! GEON defaults; a project with its own category list can swap tables in
//! with the `with_*` builders.

/// Place categories.
pub const CATEGORIES: &[&str] = &[
    "public_space",
    "street",
    "building",
    "transport_hub",
    "infrastructure",
    "natural_feature",
    "district",
    "landmark",
    "threshold",
    "hybrid",
];

pub const FIVE_SCALE: &[&str] = &["very_low", "low", "medium", "high", "very_high"];
pub const NOISE_SCALE: &[&str] = &["very_quiet", "quiet", "moderate", "loud", "very_loud"];
pub const COMPLEXITY_SCALE: &[&str] = &["very_simple", "simple", "moderate", "complex", "very_complex"];
pub const AIR_QUALITY_SCALE: &[&str] = &["very_poor", "poor", "moderate", "good", "very_good"];
pub const ACTIVITY_DENSITY_SCALE: &[&str] = &["deserted", "sparse", "moderate", "busy", "crowded"];
pub const SAFETY_SCALE: &[&str] = &["very_unsafe", "unsafe", "neutral", "safe", "very_safe"];
pub const TERRITORIALITY_SCALE: &[&str] =
    &["very_private", "semi_private", "semi_public", "public", "very_public"];
pub const PACE_SCALE: &[&str] = &["very_slow", "slow", "moderate", "fast", "very_fast"];
pub const STABILITY_SCALE: &[&str] =
    &["very_transient", "transient", "stable", "permanent", "very_permanent"];

/// Experiential qualities and their ordered value scales.
pub const EXPERIENCE_SCALES: &[(&str, &[&str])] = &[
    // Spatial
    ("openness", FIVE_SCALE),
    ("enclosure", FIVE_SCALE),
    ("permeability", FIVE_SCALE),
    ("legibility", FIVE_SCALE),
    // Sensory
    ("noise_level", NOISE_SCALE),
    ("visual_complexity", COMPLEXITY_SCALE),
    ("air_quality", AIR_QUALITY_SCALE),
    // Social
    ("activity_density", ACTIVITY_DENSITY_SCALE),
    ("social_diversity", FIVE_SCALE),
    ("sense_of_safety", SAFETY_SCALE),
    ("territoriality", TERRITORIALITY_SCALE),
    // Temporal
    ("pace", PACE_SCALE),
    ("temporal_stability", STABILITY_SCALE),
];

/// Purpose taxonomy, grouped by category.
pub const PURPOSE_CATEGORIES: &[(&str, &[&str])] = &[
    ("Economic", &["commerce", "retail", "services", "production", "agriculture"]),
    ("Civic", &["governance", "community", "education", "health", "emergency"]),
    ("Social", &["gathering", "celebration", "protest", "exchange", "encounter"]),
    ("Cultural", &["arts", "heritage", "performance", "exhibition", "worship"]),
    ("Recreational", &["play", "sport", "leisure", "contemplation", "exercise"]),
    ("Residential", &["dwelling", "sleeping", "domesticity"]),
    ("Circulation", &["movement", "waiting", "transition", "parking"]),
    ("Ecological", &["habitat", "biodiversity", "environmental services"]),
];

/// Fields that must be present for a place to be valid.
pub const REQUIRED_FIELDS: &[&str] = &["PLACE", "TYPE", "LOCATION"];

/// Fields whose absence is reported at info level.
pub const RECOMMENDED_FIELDS: &[&str] = &["PURPOSE", "EXPERIENCE", "ADJACENCIES", "CONNECTIVITY", "SOURCE"];

/// The set of tables a validation run checks against.
///
/// # Examples
///
/// ```rust
/// use geon::vocab::Vocabulary;
///
/// let vocab = Vocabulary::standard();
/// assert!(vocab.is_category("landmark"));
/// assert_eq!(vocab.scale("pace").map(|s| s.len()), Some(5));
/// assert_eq!(vocab.purpose_category("worship"), Some("Cultural"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    pub categories: &'static [&'static str],
    pub experience_scales: &'static [(&'static str, &'static [&'static str])],
    pub purposes: &'static [(&'static str, &'static [&'static str])],
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

impl Vocabulary {
    /// The GEON default tables.
    #[must_use]
    pub const fn standard() -> Self {
        Vocabulary {
            categories: CATEGORIES,
            experience_scales: EXPERIENCE_SCALES,
            purposes: PURPOSE_CATEGORIES,
        }
    }

    #[must_use]
    pub const fn with_categories(mut self, categories: &'static [&'static str]) -> Self {
        self.categories = categories;
        self
    }

    #[must_use]
    pub const fn with_experience_scales(
        mut self,
        scales: &'static [(&'static str, &'static [&'static str])],
    ) -> Self {
        self.experience_scales = scales;
        self
    }

    #[must_use]
    pub const fn with_purposes(mut self, purposes: &'static [(&'static str, &'static [&'static str])]) -> Self {
        self.purposes = purposes;
        self
    }

    #[must_use]
    pub fn is_category(&self, category: &str) -> bool {
        self.categories.contains(&category)
    }

    /// The value scale of a known experiential quality.
    #[must_use]
    pub fn scale(&self, quality: &str) -> Option<&'static [&'static str]> {
        self.experience_scales
            .iter()
            .find(|(name, _)| *name == quality)
            .map(|(_, scale)| *scale)
    }

    /// The taxonomy group a purpose belongs to.
    #[must_use]
    pub fn purpose_category(&self, purpose: &str) -> Option<&'static str> {
        self.purposes
            .iter()
            .find(|(_, members)| members.contains(&purpose))
            .map(|(group, _)| *group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables() {
        assert_eq!(CATEGORIES.len(), 10);
        assert_eq!(EXPERIENCE_SCALES.len(), 13);
        assert_eq!(PURPOSE_CATEGORIES.len(), 8);
        assert!(EXPERIENCE_SCALES.iter().all(|(_, scale)| scale.len() == 5));
    }

    #[test]
    fn test_custom_categories() {
        const MINE: &[&str] = &["quay", "slipway"];
        let vocab = Vocabulary::standard().with_categories(MINE);
        assert!(vocab.is_category("quay"));
        assert!(!vocab.is_category("building"));
        assert!(vocab.scale("openness").is_some());
    }

    #[test]
    fn test_unknown_lookups() {
        let vocab = Vocabulary::standard();
        assert!(vocab.scale("smell").is_none());
        assert!(vocab.purpose_category("teleportation").is_none());
    }
}
