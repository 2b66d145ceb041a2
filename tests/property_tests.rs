//! Property-based tests for the layout generation pipeline's universal
//! invariants: envelope containment, non-overlap, hub/corridor touch,
//! and determinism under a fixed seed.

use proptest::prelude::*;

use floorplan_core::brief::{Brief, HardConstraints, RoomSpec, SoftObjectives, SoftWeights};
use floorplan_core::pipeline::Pipeline;

fn room(name: &str, area: f64, min_w: f64, min_h: f64) -> RoomSpec {
    RoomSpec {
        name: name.to_string(),
        target_area: area,
        min_w,
        min_h,
        fixed: false,
    }
}

fn brief_with(rooms: Vec<RoomSpec>, envelope_w: f64, envelope_h: f64, seed: u64) -> Brief {
    Brief {
        rooms,
        envelope_w,
        envelope_h,
        hard: HardConstraints::default(),
        soft: SoftObjectives::default(),
        weights: SoftWeights::default(),
        adjacency_preferences: vec![],
        adjacency: vec![],
        connectivity: None,
        pins: vec![],
        seed: Some(seed),
        tenant_id: None,
        consent_external: false,
        floors: 1,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(80))]

    #[test]
    fn prop_placed_rooms_stay_within_envelope(
        seed in any::<u64>(),
        n_beds in 1usize..4,
        env_w in 1500.0f64..4000.0,
        env_h in 1000.0f64..3000.0,
    ) {
        let mut rooms = vec![room("living", 200_000.0, 200.0, 200.0), room("kitchen", 90_000.0, 150.0, 150.0)];
        for i in 0..n_beds {
            rooms.push(room(&format!("bed{i}"), 70_000.0, 150.0, 150.0));
        }
        rooms.push(room("bath1", 40_000.0, 100.0, 100.0));

        let brief = brief_with(rooms, env_w, env_h, seed);
        let pipeline = Pipeline::default();
        let response = pipeline.generate(brief.clone()).unwrap();

        for r in &response.layout.rooms {
            prop_assert!(r.x >= -1e-6 && r.x1() <= env_w + 1e-3);
            prop_assert!(r.y >= -1e-6 && r.y1() <= env_h + 1e-3);
        }
    }

    #[test]
    fn prop_no_two_placed_rooms_overlap(
        seed in any::<u64>(),
        n_beds in 1usize..4,
    ) {
        let mut rooms = vec![room("living", 200_000.0, 200.0, 200.0), room("kitchen", 90_000.0, 150.0, 150.0)];
        for i in 0..n_beds {
            rooms.push(room(&format!("bed{i}"), 70_000.0, 150.0, 150.0));
        }
        rooms.push(room("bath1", 40_000.0, 100.0, 100.0));

        let brief = brief_with(rooms, 2500.0, 1500.0, seed);
        let pipeline = Pipeline::default();
        let response = pipeline.generate(brief).unwrap();

        prop_assert!(!response.layout.has_overlap());
    }

    #[test]
    fn prop_generation_is_deterministic_for_same_seed_and_brief(seed in any::<u64>()) {
        let rooms = vec![
            room("living", 200_000.0, 200.0, 200.0),
            room("kitchen", 90_000.0, 150.0, 150.0),
            room("bed1", 70_000.0, 150.0, 150.0),
            room("bath1", 40_000.0, 100.0, 100.0),
        ];
        let brief = brief_with(rooms, 2200.0, 1400.0, seed);
        let pipeline = Pipeline::default();

        let a = pipeline.generate(brief.clone()).unwrap();
        let b = pipeline.generate(brief).unwrap();

        prop_assert_eq!(a.layout.rooms, b.layout.rooms);
        prop_assert_eq!(a.total_cost, b.total_cost);
    }

    #[test]
    fn prop_repair_is_idempotent(seed in any::<u64>()) {
        let rooms = vec![
            room("living", 200_000.0, 200.0, 200.0),
            room("bed1", 70_000.0, 150.0, 150.0),
            room("bed2", 70_000.0, 150.0, 150.0),
            room("bed3", 70_000.0, 150.0, 150.0),
            room("bath1", 40_000.0, 100.0, 100.0),
        ];
        let brief = brief_with(rooms, 2200.0, 1400.0, seed).normalize().unwrap();

        let mut layout = floorplan_core::pack::pack_with_hub(&brief);
        floorplan_core::repair::repair(&mut layout, &brief);
        let once = layout.clone();
        floorplan_core::repair::repair(&mut layout, &brief);

        prop_assert_eq!(once, layout);
    }
}
