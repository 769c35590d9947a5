//! Property-based tests using proptest
//!
//! Invariants that must hold for ALL inputs:
//! - Resolver: identical inputs give identical output
//! - Resolver: grounded with a non-rising velocity never keeps a downward component
//! - Resolver: a fall of any length never carries the feet below the floor
//! - Vault: a finished session exits exactly on its landing point, whatever the frame times

use arena_shared::{
    CollidableVolume, CollisionSettings, VaultMachine, resolve,
    collision::Vec3,
    vault::VaultSettings,
};
use proptest::prelude::*;

fn arena() -> Vec<CollidableVolume> {
    vec![
        CollidableVolume::floor(0.0),
        CollidableVolume::cuboid(Vec3::new(0.0, 1.0, -3.0), Vec3::new(6.0, 2.0, 0.5)),
        CollidableVolume::cuboid(Vec3::new(2.0, 0.2, 0.0), Vec3::new(1.0, 0.4, 1.0)),
        CollidableVolume::ball(Vec3::new(-2.0, 1.0, 1.0), 0.7),
        CollidableVolume::cylinder(Vec3::new(1.0, 0.75, 2.0), 0.75, 0.4),
        CollidableVolume::cuboid(Vec3::new(0.0, 2.6, 0.0), Vec3::new(1.0, 0.2, 1.0))
            .non_blocking(),
    ]
}

fn vec3(range: std::ops::Range<f32>) -> impl Strategy<Value = Vec3> {
    (range.clone(), range.clone(), range).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

// ============================================================
// Resolver Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_resolver_is_idempotent(
        x in -4.0f32..4.0,
        y in 0.5f32..3.0,
        z in -4.0f32..4.0,
        velocity in vec3(-10.0..10.0),
        dt in 0.0f32..0.125,
    ) {
        let statics = arena();
        let settings = CollisionSettings::default();
        let position = Vec3::new(x, y, z);
        let a = resolve(&statics, &settings, position, velocity, dt);
        let b = resolve(&statics, &settings, position, velocity, dt);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_grounded_never_keeps_falling(
        x in -1.0f32..1.0,
        z in -1.0f32..1.0,
        hover in 0.0f32..0.04,
        vx in -8.0f32..8.0,
        vy in -20.0f32..=0.0,
        vz in -8.0f32..8.0,
        dt in 0.001f32..0.125,
    ) {
        let statics = vec![CollidableVolume::floor(0.0)];
        let settings = CollisionSettings::default();
        let position = Vec3::new(x, settings.half_height() + hover, z);
        let r = resolve(&statics, &settings, position, Vec3::new(vx, vy, vz), dt);
        prop_assert!(r.grounded, "hover {hover} should be within the ground probe");
        prop_assert_eq!(r.velocity.y, 0.0);
    }

    #[test]
    fn prop_fall_never_passes_the_floor(
        y in 0.9f32..20.0,
        vy in -80.0f32..0.0,
        dt in 0.001f32..0.125,
    ) {
        let statics = vec![CollidableVolume::floor(0.0)];
        let settings = CollisionSettings::default();
        let r = resolve(&statics, &settings, Vec3::new(0.0, y, 0.0), Vec3::new(0.0, vy, 0.0), dt);
        let end = y + r.velocity.y * dt;
        prop_assert!(end >= settings.half_height() - 1.0e-3, "ended at {end}");
    }

    #[test]
    fn prop_resolver_only_removes_motion(
        x in -4.0f32..4.0,
        y in 0.5f32..3.0,
        z in -4.0f32..4.0,
        velocity in vec3(-10.0..10.0),
        dt in 0.0f32..0.125,
    ) {
        let statics = arena();
        let r = resolve(&statics, &CollisionSettings::default(), Vec3::new(x, y, z), velocity, dt);
        // Each component is kept, shortened, or zeroed; never reversed or grown.
        for (out, inp) in r.velocity.iter().zip(velocity.iter()) {
            prop_assert!(
                *out == 0.0 || (out.signum() == inp.signum() && out.abs() <= inp.abs()),
                "{out} from {inp}"
            );
        }
    }
}

// ============================================================
// Vault Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_vault_exit_is_exact(
        top in 0.55f32..1.2,
        depth in 0.3f32..1.5,
        duration in 0.05f32..1.0,
        frames in prop::collection::vec(0.0f32..0.125, 1..64),
    ) {
        let table = CollidableVolume::cuboid(
            Vec3::new(0.0, top * 0.5, -0.6 - depth * 0.5),
            Vec3::new(2.0, top, depth),
        )
        .vaultable(top);
        let statics = vec![table];

        let mut settings = VaultSettings::default();
        settings.vault.duration = duration;
        let mut machine = VaultMachine::new(settings);

        let start = Vec3::new(0.0, 0.8, 0.0);
        let forward = Some(Vec3::new(0.0, 0.0, -1.0));
        machine.scan(&statics, start, forward, true);
        let session = machine.try_trigger(&statics, start, forward, true);
        prop_assert!(session.is_ok(), "table of height {top} should be vaultable");
        let landing = session.unwrap().landing;

        let mut exit = None;
        for dt in frames.iter().copied().chain(std::iter::repeat(0.1)).take(200) {
            let step = machine.advance(dt).expect("session is active until it finishes");
            if step.finished {
                exit = Some(step.position);
                break;
            }
            prop_assert!(machine.is_active());
        }
        prop_assert_eq!(exit, Some(landing));
        prop_assert!(!machine.is_active());
    }
}
