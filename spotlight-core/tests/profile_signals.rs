//! Signal intake rules applied to interest profiles.

use rstest::{fixture, rstest};
use spotlight_core::test_support::item;
use spotlight_core::{Axis, CandidateItem, InterestProfile, RECENTLY_VIEWED_CAP, Signal};

#[fixture]
fn concert() -> CandidateItem {
    item(11, "Music", "concert", "Harbour Hall")
}

fn approx(actual: f32, expected: f32) -> bool {
    (actual - expected).abs() <= 1e-6
}

#[rstest]
fn booking_weighs_three_views(concert: CandidateItem) {
    let mut viewed = InterestProfile::new();
    let mut booked = InterestProfile::new();
    viewed.record_view(&concert);
    booked.record_booking(&concert);

    for axis in Axis::ALL {
        let label = concert.label(axis).expect("fixture describes every axis");
        assert!(approx(
            booked.weight(axis, label),
            3.0 * viewed.weight(axis, label)
        ));
    }
}

#[rstest]
fn booking_leaves_recent_views_alone(concert: CandidateItem) {
    let mut profile = InterestProfile::new();
    profile.record(Signal::Booking, &concert);
    assert!(profile.recently_viewed().is_empty());
    assert!(!profile.is_blank());
}

#[rstest]
#[case(CandidateItem::new(1).with_category("Action"), &[Axis::Category])]
#[case(CandidateItem::new(2).with_type("movie").with_location(""), &[Axis::Type])]
#[case(CandidateItem::new(3), &[])]
fn missing_fields_skip_only_their_axis(
    #[case] candidate: CandidateItem,
    #[case] touched: &[Axis],
) {
    let mut profile = InterestProfile::new();
    profile.record_view(&candidate);
    for axis in Axis::ALL {
        assert_eq!(
            profile.weights(axis).is_empty(),
            !touched.contains(&axis),
            "unexpected weights on {axis}"
        );
    }
    assert_eq!(profile.recently_viewed(), &[candidate.id]);
}

#[rstest]
fn more_than_ten_views_keep_the_latest() {
    let mut profile = InterestProfile::new();
    for id in 1..=15 {
        profile.record_view(&CandidateItem::new(id).with_category("Drama"));
    }
    let expected: Vec<u64> = (6..=15).rev().collect();
    assert_eq!(profile.recently_viewed(), expected.as_slice());
    assert_eq!(profile.recently_viewed().len(), RECENTLY_VIEWED_CAP);
    assert!(approx(profile.weight(Axis::Category, "Drama"), 15.0));
}

#[rstest]
fn re_viewing_moves_item_to_front() {
    let mut profile = InterestProfile::new();
    for id in [1, 2, 3, 2] {
        profile.record_view(&CandidateItem::new(id));
    }
    assert_eq!(profile.recently_viewed(), &[2, 3, 1]);
}

#[rstest]
fn views_and_bookings_accumulate() {
    let action = CandidateItem::new(1).with_category("Action");
    let mut profile = InterestProfile::new();
    for _ in 0..3 {
        profile.record_view(&action);
    }
    profile.record_booking(&CandidateItem::new(3).with_category("Action"));
    assert!(approx(profile.weight(Axis::Category, "Action"), 6.0));
}

#[rstest]
fn reset_restores_a_blank_profile(concert: CandidateItem) {
    let mut profile = InterestProfile::new();
    profile.record_view(&concert);
    profile.reset();
    assert!(profile.is_blank());
}
