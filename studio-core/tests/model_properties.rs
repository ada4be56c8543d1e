//! Property tests for the data model invariants.

use proptest::prelude::*;
use studio_core::transform::{wrap_degrees, MAX_ZOOM, MIN_SCALE, MIN_ZOOM};
use studio_core::{Color, Complexity, Palette, Transform};

proptest! {
    #[test]
    fn prop_wrapped_angles_in_range(degrees in any::<f32>()) {
        let wrapped = wrap_degrees(degrees);
        prop_assert!((0.0..360.0).contains(&wrapped), "{degrees} -> {wrapped}");
    }

    #[test]
    fn prop_input_never_escapes_bounds(
        drags in prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 0..20),
        scrolls in prop::collection::vec(-5000.0f32..5000.0, 0..20),
        scale in -10.0f32..10.0,
    ) {
        let mut transform = Transform::new();
        transform.set_scale(scale);
        for (dx, dy) in drags {
            transform.drag(dx, dy);
        }
        for delta in scrolls {
            transform.scroll(delta);
        }
        let rotation = transform.rotation();
        prop_assert!((0.0..360.0).contains(&rotation.x));
        prop_assert!((0.0..360.0).contains(&rotation.y));
        prop_assert!((MIN_ZOOM..=MAX_ZOOM).contains(&transform.zoom()));
        prop_assert!(transform.scale() >= MIN_SCALE);
    }

    #[test]
    fn prop_complexity_accepts_only_one_to_ten(value in -100i64..100) {
        let result = Complexity::new(value);
        prop_assert_eq!(result.is_ok(), (1..=10).contains(&value));
        let clamped = Complexity::saturating(value).get();
        prop_assert!((1..=10).contains(&clamped));
    }

    #[test]
    fn prop_palette_rejects_duplicates(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let color = Color::rgb(r, g, b);
        prop_assert!(Palette::new(vec![color, color]).is_err());
        prop_assert!(Palette::new(vec![color, Color::rgb(r ^ 1, g, b)]).is_ok());
    }
}
