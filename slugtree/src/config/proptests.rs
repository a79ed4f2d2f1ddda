//! Property-based tests for configuration system.

use super::merger::ConfigMerger;
use super::schema::{Config, LevelConfig, UrlConfig};
use super::validator::ConfigValidator;
use crate::chain::ManyValuedPolicy;
use proptest::prelude::*;

fn policy_strategy() -> impl Strategy<Value = ManyValuedPolicy> {
    prop_oneof![
        Just(ManyValuedPolicy::Reject),
        Just(ManyValuedPolicy::FirstCandidate)
    ]
}

fn url_strategy() -> impl Strategy<Value = UrlConfig> {
    (
        prop::option::of("(/[a-z]{1,8}){0,3}/"),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(prefix, trailing_slash)| UrlConfig {
            prefix,
            trailing_slash,
        })
}

fn levels_strategy() -> impl Strategy<Value = Vec<LevelConfig>> {
    prop::collection::btree_set("[a-z]{1,8}", 1..5).prop_map(|names| {
        names
            .into_iter()
            .map(|name| LevelConfig::new(name.clone(), format!("{name}_page")))
            .collect()
    })
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(levels_strategy()),
        prop::option::of(url_strategy()),
        prop::option::of(policy_strategy()),
        prop::option::of(1usize..1024),
        prop::option::of(any::<bool>()),
        prop::option::of(1u64..600),
    )
        .prop_map(
            |(levels, url, many_valued, max_depth, verify_scope, lock_wait)| Config {
                levels,
                url,
                many_valued,
                max_depth,
                verify_scope,
                maximum_lock_wait_seconds: lock_wait,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Higher precedence wins whenever it sets a field.
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        prop_assert_eq!(&result.levels, if high.levels.is_some() { &high.levels } else { &low.levels });
        prop_assert_eq!(result.many_valued, high.many_valued.or(low.many_valued));
        prop_assert_eq!(result.max_depth, high.max_depth.or(low.max_depth));
        prop_assert_eq!(result.verify_scope, high.verify_scope.or(low.verify_scope));
        prop_assert_eq!(
            result.maximum_lock_wait_seconds,
            high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds)
        );
    }

    // Empty config is identity element for merge
    #[test]
    fn config_merge_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(&merged, &config);

        let mut from_empty = Config::default();
        ConfigMerger::merge_into(&mut from_empty, &config);
        prop_assert_eq!(from_empty, config);
    }

    // Merging the same config twice changes nothing.
    #[test]
    fn config_merge_idempotent(base in config_strategy(), layer in config_strategy()) {
        let mut once = base.clone();
        ConfigMerger::merge_into(&mut once, &layer);
        let mut twice = once.clone();
        ConfigMerger::merge_into(&mut twice, &layer);
        prop_assert_eq!(once, twice);
    }

    // Generated configs are valid and survive a YAML round trip.
    #[test]
    fn config_yaml_round_trip(config in config_strategy()) {
        prop_assert!(ConfigValidator::validate(&config).is_ok());
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, config);
    }
}
