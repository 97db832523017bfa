//! JSON payload encoding shared by the backends.

use spotlight_core::{InterestProfile, UserKey};

pub(crate) fn encode(profile: &InterestProfile) -> serde_json::Result<String> {
    serde_json::to_string_pretty(profile)
}

/// Decode a payload and normalise it, warning when repairs were needed.
pub(crate) fn decode(user: &UserKey, payload: &str) -> serde_json::Result<InterestProfile> {
    let raw: InterestProfile = serde_json::from_str(payload)?;
    let clean = raw.clone().sanitised();
    if clean != raw {
        log::warn!("stored profile for {user} contained invalid entries; normalised on load");
    }
    Ok(clean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use spotlight_core::Axis;

    fn user() -> UserKey {
        UserKey::new("kim").expect("valid key")
    }

    #[rstest]
    #[case("{}", 0)]
    #[case(r#"{"recentlyViewed":[1,1,2]}"#, 2)]
    #[case(r#"{"categories":{"Action":-3.0},"recentlyViewed":[]}"#, 0)]
    fn decode_normalises(#[case] payload: &str, #[case] recent: usize) {
        let profile = decode(&user(), payload).expect("valid payload");
        assert_eq!(profile.recently_viewed().len(), recent);
        assert!(profile.weight(Axis::Category, "Action").abs() <= f32::EPSILON);
    }

    #[rstest]
    fn encode_uses_camel_case_keys() {
        let profile = InterestProfile::new().with_weight(Axis::Location, "Dock", 2.0);
        let payload = encode(&profile).expect("encodable");
        assert!(payload.contains("\"locations\""));
        assert!(payload.contains("\"recentlyViewed\""));
        assert_eq!(decode(&user(), &payload).expect("round trip"), profile);
    }

    #[rstest]
    #[case(r#"{"categories":null,"types":{"movie":5.0},"recentlyViewed":[1]}"#)]
    #[case(r#"{"categories":[1,2],"types":{"movie":5.0},"recentlyViewed":[1]}"#)]
    fn decode_keeps_valid_axes_beside_a_wrong_shape(#[case] payload: &str) {
        let profile = decode(&user(), payload).expect("wrong shape loads as empty");
        assert!(profile.weights(Axis::Category).is_empty());
        assert!((profile.weight(Axis::Type, "movie") - 5.0).abs() <= f32::EPSILON);
        assert_eq!(profile.recently_viewed(), &[1]);
    }

    #[rstest]
    fn decode_rejects_invalid_json() {
        assert!(decode(&user(), "not json").is_err());
        assert!(decode(&user(), r#""profile""#).is_err());
    }
}
