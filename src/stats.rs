use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::es::{ProfileHit, SocialProfile};

/// The tracked demographic attributes.
pub const SOC_DEMO_ATTRS: [&str; 3] = ["gender", "city", "country"];

/// Attribute name -> (attribute value -> occurrence count).
///
/// All three attribute bins exist from construction, so an empty run still
/// reports every attribute. Counts are increment-only; absent and empty
/// values are never counted.
#[derive(Debug, PartialEq, Serialize)]
pub struct FreqDistribution(BTreeMap<&'static str, BTreeMap<String, u64>>);

impl FreqDistribution {
    pub fn new() -> Self {
        let mut bins = BTreeMap::new();
        for attr in SOC_DEMO_ATTRS {
            bins.insert(attr, BTreeMap::new());
        }
        FreqDistribution(bins)
    }

    /// Tallies every present, non-empty attribute value of one sub-profile.
    pub fn record(&mut self, profile: &SocialProfile) {
        for (attr, value) in profile.attr_values() {
            if let Some(value) = value {
                if !value.is_empty() {
                    if let Some(bin) = self.0.get_mut(attr) {
                        *bin.entry(value.to_string()).or_insert(0) += 1;
                    }
                }
            }
        }
    }

    /// Folds a batch of returned records into the distribution.
    ///
    /// Records lacking the expected nested profile structure are skipped
    /// with a diagnostic; the number of skipped records is returned.
    pub fn absorb(&mut self, hits: &[ProfileHit]) -> usize {
        let mut skipped = 0;
        for hit in hits {
            match hit.sub_profile() {
                Some(profile) => self.record(profile),
                None => {
                    skipped += 1;
                    warn!(
                        action = "skip",
                        component = "aggregation",
                        "Record without social profile data"
                    );
                }
            }
        }
        skipped
    }

    pub fn count(&self, attr: &str, value: &str) -> u64 {
        self.0
            .get(attr)
            .and_then(|bin| bin.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// Pretty JSON with alphabetically sorted attribute and value keys.
    pub fn render(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for FreqDistribution {
    fn default() -> Self {
        FreqDistribution::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::es::{ProfileSource, SocialIds};

    fn hit(gender: Option<&str>, city: Option<&str>, country: Option<&str>) -> ProfileHit {
        ProfileHit {
            source: ProfileSource {
                snid: Some(SocialIds {
                    fb: vec![SocialProfile {
                        gender: gender.map(String::from),
                        city: city.map(String::from),
                        country: country.map(String::from),
                    }],
                }),
            },
        }
    }

    fn malformed_hit() -> ProfileHit {
        ProfileHit {
            source: ProfileSource { snid: None },
        }
    }

    #[test]
    fn present_value_increments_exactly_its_counter() {
        let mut dist = FreqDistribution::new();
        dist.absorb(&[hit(Some("female"), None, None)]);
        assert_eq!(dist.count("gender", "female"), 1);
        assert_eq!(dist.count("city", "female"), 0);
        assert_eq!(dist.count("country", "female"), 0);
    }

    #[test]
    fn absent_values_increment_nothing() {
        let mut dist = FreqDistribution::new();
        dist.absorb(&[hit(None, None, None)]);
        assert_eq!(dist, FreqDistribution::new());
    }

    #[test]
    fn empty_values_increment_nothing() {
        let mut dist = FreqDistribution::new();
        dist.absorb(&[hit(Some(""), Some(""), None)]);
        assert_eq!(dist, FreqDistribution::new());
    }

    #[test]
    fn repeated_values_accumulate() {
        let mut dist = FreqDistribution::new();
        dist.absorb(&[
            hit(Some("male"), None, None),
            hit(Some("male"), None, None),
            hit(None, None, None),
        ]);
        assert_eq!(dist.count("gender", "male"), 2);
    }

    #[test]
    fn all_attributes_are_tallied_independently() {
        let mut dist = FreqDistribution::new();
        dist.absorb(&[
            hit(Some("female"), Some("Riga"), Some("Latvia")),
            hit(Some("male"), Some("Riga"), None),
        ]);
        assert_eq!(dist.count("gender", "female"), 1);
        assert_eq!(dist.count("gender", "male"), 1);
        assert_eq!(dist.count("city", "Riga"), 2);
        assert_eq!(dist.count("country", "Latvia"), 1);
    }

    #[test]
    fn aggregation_is_order_independent() {
        let forward = [
            hit(Some("female"), Some("Riga"), Some("Latvia")),
            hit(Some("male"), None, Some("Latvia")),
            hit(Some("male"), Some("Tallinn"), None),
        ];
        let reversed = [
            hit(Some("male"), Some("Tallinn"), None),
            hit(Some("male"), None, Some("Latvia")),
            hit(Some("female"), Some("Riga"), Some("Latvia")),
        ];

        let mut a = FreqDistribution::new();
        a.absorb(&forward);
        let mut b = FreqDistribution::new();
        b.absorb(&reversed);

        assert_eq!(a, b);
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let mut dist = FreqDistribution::new();
        let skipped = dist.absorb(&[
            hit(Some("female"), None, None),
            malformed_hit(),
            ProfileHit {
                source: ProfileSource {
                    snid: Some(SocialIds { fb: vec![] }),
                },
            },
        ]);
        assert_eq!(skipped, 2);
        assert_eq!(dist.count("gender", "female"), 1);
    }

    #[test]
    fn render_sorts_attribute_and_value_keys() {
        let mut dist = FreqDistribution::new();
        dist.absorb(&[
            hit(Some("male"), None, None),
            hit(Some("female"), None, None),
        ]);

        let expected = "{\n  \"city\": {},\n  \"country\": {},\n  \"gender\": {\n    \"female\": 1,\n    \"male\": 1\n  }\n}";
        assert_eq!(dist.render().unwrap(), expected);
    }

    #[test]
    fn empty_distribution_reports_all_bins() {
        let dist = FreqDistribution::new();
        let expected = "{\n  \"city\": {},\n  \"country\": {},\n  \"gender\": {}\n}";
        assert_eq!(dist.render().unwrap(), expected);
    }
}
