//! Property-based tests for configuration merging.

use super::merger::ConfigMerger;
use super::schema::{Config, NotificationsConfig, PolicyConfig};
use proptest::prelude::*;

fn policy_strategy() -> impl Strategy<Value = PolicyConfig> {
    (
        prop::option::of(1u32..=365),
        prop::option::of(0u32..=48),
        prop::option::of(1u32..=24),
        prop::option::of(1u32..=100),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(days, notice, hours, weekly, student, professor)| PolicyConfig {
            max_days_in_advance: days,
            min_time_before_reservation: notice,
            max_hours_per_reservation: hours,
            max_reservations_per_week: weekly,
            student_require_approval: student,
            professor_require_approval: professor,
            ..PolicyConfig::default()
        })
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(1u64..=300),
        prop::option::of(any::<bool>()),
        prop::option::of(policy_strategy()),
        prop::option::of(prop::option::of(any::<bool>())),
    )
        .prop_map(|(lock, autoinit, policy, outbox)| Config {
            maximum_lock_wait_seconds: lock,
            disable_autoinit: autoinit,
            policy,
            notifications: outbox.map(|outbox| NotificationsConfig { outbox }),
            ..Default::default()
        })
}

fn merged(layers: &[&Config]) -> Config {
    let mut result = Config::default();
    for layer in layers {
        ConfigMerger::merge_into(&mut result, layer);
    }
    result
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 5000,
        .. ProptestConfig::default()
    })]

    // Merging an empty config changes nothing
    #[test]
    fn empty_config_is_identity(config in config_strategy()) {
        let mut result = config.clone();
        ConfigMerger::merge_into(&mut result, &Config::default());
        prop_assert_eq!(result.settings(), config.settings());
        prop_assert_eq!(result.maximum_lock_wait_seconds, config.maximum_lock_wait_seconds);
        prop_assert_eq!(result.disable_autoinit, config.disable_autoinit);
        prop_assert_eq!(result.uses_outbox(), config.uses_outbox());
    }

    // Every set policy field of the higher layer wins; unset ones fall through
    #[test]
    fn higher_policy_fields_win(low in policy_strategy(), high in policy_strategy()) {
        let low_config = Config { policy: Some(low.clone()), ..Default::default() };
        let high_config = Config { policy: Some(high.clone()), ..Default::default() };
        let settings = merged(&[&low_config, &high_config]).settings();

        let expected = high.apply_to(low.apply_to(crate::Settings::default()));
        prop_assert_eq!(settings, expected);
    }

    // Grouping of merges does not matter
    #[test]
    fn merge_is_associative(
        a in config_strategy(),
        b in config_strategy(),
        c in config_strategy()
    ) {
        let left = merged(&[&a, &b, &c]);

        let mut b_then_c = b;
        ConfigMerger::merge_into(&mut b_then_c, &c);
        let right = merged(&[&a, &b_then_c]);

        prop_assert_eq!(left.settings(), right.settings());
        prop_assert_eq!(left.maximum_lock_wait_seconds, right.maximum_lock_wait_seconds);
        prop_assert_eq!(left.disable_autoinit, right.disable_autoinit);
        prop_assert_eq!(left.uses_outbox(), right.uses_outbox());
    }
}
