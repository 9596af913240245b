//! Tests for listing view filtering and sorting

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use shared::{filter_and_sort, BloodGroup, BloodGroupFilter, Donor, DonorId, NewDonor, SortKey};

fn donor(name: &str, group: BloodGroup, city: Option<&str>, minutes: i64) -> Donor {
    let mut input = NewDonor::new(name, group, "555-0100");
    input.location_city = city.map(str::to_string);
    input.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes));
    Donor::new(DonorId::new(), input.into_details(Utc::now()))
}

// ============================================================================
// Unit Tests
// ============================================================================

mod unit_tests {
    use super::*;

    #[test]
    fn recent_sort_puts_newest_first() {
        let donors = vec![
            donor("Old", BloodGroup::OPositive, None, 0),
            donor("New", BloodGroup::OPositive, None, 10),
        ];
        let view = filter_and_sort(&donors, BloodGroupFilter::All, SortKey::Recent);
        assert_eq!(view[0].details.name, "New");
    }

    #[test]
    fn ties_keep_source_order() {
        let donors = vec![
            donor("Same", BloodGroup::APositive, Some("Austin"), 1),
            donor("Same", BloodGroup::BPositive, Some("Austin"), 2),
        ];
        let view = filter_and_sort(&donors, BloodGroupFilter::All, SortKey::Name);
        assert_eq!(view[0].id, donors[0].id);
        assert_eq!(view[1].id, donors[1].id);

        let view = filter_and_sort(&donors, BloodGroupFilter::All, SortKey::City);
        assert_eq!(view[0].id, donors[0].id);
    }

    #[test]
    fn filtered_ties_keep_source_order() {
        let donors = vec![
            donor("Zoe", BloodGroup::ONegative, Some("Denver"), 1),
            donor("Adam", BloodGroup::APositive, Some("Denver"), 2),
            donor("Mia", BloodGroup::ONegative, Some("Austin"), 3),
            donor("Ben", BloodGroup::ONegative, Some("Denver"), 4),
            donor("Carl", BloodGroup::ONegative, Some("Denver"), 5),
        ];
        let view = filter_and_sort(
            &donors,
            BloodGroupFilter::Only(BloodGroup::ONegative),
            SortKey::City,
        );

        let names: Vec<_> = view.iter().map(|d| d.details.name.as_str()).collect();
        assert_eq!(names, vec!["Mia", "Zoe", "Ben", "Carl"]);
    }

    #[test]
    fn empty_input_gives_empty_view() {
        let view = filter_and_sort(&[], BloodGroupFilter::Only(BloodGroup::ONegative), SortKey::City);
        assert!(view.is_empty());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;

    fn group_strategy() -> impl Strategy<Value = BloodGroup> {
        (0usize..8).prop_map(|i| BloodGroup::ALL[i])
    }

    fn donors_strategy() -> impl Strategy<Value = Vec<Donor>> {
        prop::collection::vec(
            (
                "[A-Za-z]{1,12}",
                group_strategy(),
                prop::option::of("[A-Z][a-z]{2,10}"),
                0i64..10_000,
            ),
            0..20,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(name, group, city, minutes)| donor(&name, group, city.as_deref(), minutes))
                .collect()
        })
    }

    fn sort_strategy() -> impl Strategy<Value = SortKey> {
        (0usize..3).prop_map(|i| SortKey::ALL[i])
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Filtering keeps exactly the donors of the selected group
        #[test]
        fn prop_filter_keeps_only_selected_group(
            donors in donors_strategy(),
            group in group_strategy(),
            key in sort_strategy(),
        ) {
            let view = filter_and_sort(&donors, BloodGroupFilter::Only(group), key);
            let expected = donors.iter().filter(|d| d.details.blood_group == group).count();

            prop_assert_eq!(view.len(), expected);
            prop_assert!(view.iter().all(|d| d.details.blood_group == group));
        }

        /// "All" is a permutation of the input
        #[test]
        fn prop_all_keeps_every_donor(donors in donors_strategy(), key in sort_strategy()) {
            let view = filter_and_sort(&donors, BloodGroupFilter::All, key);
            prop_assert_eq!(view.len(), donors.len());
            for donor in &donors {
                prop_assert!(view.iter().any(|d| d.id == donor.id));
            }
        }

        /// Output is ordered under the sort key and sorting again is a no-op
        #[test]
        fn prop_sort_is_ordered_and_idempotent(donors in donors_strategy(), key in sort_strategy()) {
            let view = filter_and_sort(&donors, BloodGroupFilter::All, key);
            for pair in view.windows(2) {
                prop_assert_ne!(key.compare(&pair[0], &pair[1]), std::cmp::Ordering::Greater);
            }

            let again = filter_and_sort(&view, BloodGroupFilter::All, key);
            prop_assert_eq!(again, view);
        }

        /// Kept donors that tie under the key stay in source order
        #[test]
        fn prop_ties_keep_source_order(
            donors in donors_strategy(),
            group in group_strategy(),
            key in sort_strategy(),
        ) {
            let view = filter_and_sort(&donors, BloodGroupFilter::Only(group), key);
            let position = |id: DonorId| donors.iter().position(|d| d.id == id);

            for pair in view.windows(2) {
                if key.compare(&pair[0], &pair[1]) == std::cmp::Ordering::Equal {
                    prop_assert!(position(pair[0].id) < position(pair[1].id));
                }
            }
        }

        /// Donors without a city come after every donor with one
        #[test]
        fn prop_city_sort_puts_missing_last(donors in donors_strategy()) {
            let view = filter_and_sort(&donors, BloodGroupFilter::All, SortKey::City);
            let first_missing = view
                .iter()
                .position(|d| d.details.location_city.is_none())
                .unwrap_or(view.len());
            prop_assert!(view[first_missing..].iter().all(|d| d.details.location_city.is_none()));
        }
    }
}
