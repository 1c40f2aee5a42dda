use chamber_core::effects::EffectKind;
use chamber_core::render::Recorder;
use chamber_core::shapes::PointTag;
use chamber_core::*;
use glam::{Vec2, Vec3};

fn chamber() -> HolographicChamber {
    HolographicChamber::new(800.0, 600.0, ChamberConfig::default()).unwrap()
}

fn run(chamber: &mut HolographicChamber, frames: usize) {
    for _ in 0..frames {
        chamber.tick(16.0);
    }
}

#[test]
fn test_rejects_bad_construction() {
    assert!(matches!(
        HolographicChamber::new(0.0, 600.0, ChamberConfig::default()),
        Err(ChamberError::InvalidDimensions { .. })
    ));
    let config = ChamberConfig {
        particle_count: 0,
        ..ChamberConfig::default()
    };
    assert!(matches!(
        HolographicChamber::new(800.0, 600.0, config),
        Err(ChamberError::EmptyParticleSet)
    ));
}

#[test]
fn test_starts_idle_and_publishes_status() {
    let c = chamber();
    assert_eq!(c.particles().len(), 150);
    assert_eq!(c.mode(), Mode::Idle);
    assert_eq!(c.current_formation(), Formation::Scatter);
    let status = c.status();
    assert_eq!(status.mode, "idle");
    assert_eq!(status.formation, "scatter");
    assert_eq!(status.coherence, 1.0, "nothing is in formation yet");
    assert!(c.particles().iter().all(|p| p.velocity == Vec3::ZERO));
}

#[test]
fn test_creative_mode_settles_into_torus() {
    let mut c = chamber();
    c.set_epoch_origin(1_700_000_000_000.0);
    let handle = c.status_handle();
    c.set_mode("creative");
    assert_eq!(c.current_formation(), Formation::Torus);
    assert!(c.particles().iter().all(|p| p.in_formation));

    run(&mut c, 1);
    assert_eq!(c.current_formation(), Formation::Torus);
    assert_eq!(handle.borrow().mode, "creative");

    run(&mut c, 199);

    let status = handle.borrow().clone();
    assert_eq!(status.mode, "creative");
    assert_eq!(status.formation, "torus");
    assert!(status.coherence >= 0.9, "coherence={}", status.coherence);
    assert!(status.energy > 0.0);
    assert!(status.timestamp >= 1_700_000_000_000.0 + 3000.0);
    assert!(c.particles().iter().all(|p| p.is_finite()));
}

#[test]
fn test_mode_with_same_formation_keeps_targets() {
    let mut c = chamber();
    c.set_mode("summon");
    let before: Vec<Vec3> = c.particles().iter().map(|p| p.target).collect();
    c.set_mode("observing");
    assert_eq!(c.mode(), Mode::Observing);
    let after: Vec<Vec3> = c.particles().iter().map(|p| p.target).collect();
    assert_eq!(before, after);
}

#[test]
fn test_unknown_mode_is_ignored() {
    let mut c = chamber();
    c.set_mode("banana");
    assert_eq!(c.mode(), Mode::Idle);
    assert_eq!(c.current_formation(), Formation::Scatter);
}

#[test]
fn test_unknown_formation_falls_back_to_sphere() {
    let mut c = chamber();
    c.morph_to_formation("blob");
    assert_eq!(c.current_formation(), Formation::Sphere);
}

#[test]
fn test_second_morph_replaces_membership() {
    let mut c = chamber();
    c.morph_to_formation("cube");
    run(&mut c, 5);
    c.morph_to_formation("helix");
    assert!(c
        .particles()
        .iter()
        .all(|p| p.membership.map(|m| m.formation) == Some(Formation::Helix)));
}

#[test]
fn test_hold_timeline_follows_clock() {
    let mut c = chamber();
    let options = HoldOptions {
        hold_ms: 1000.0,
        post_drift_ms: 500.0,
    };
    c.morph_to_formation_with_hold("sphere", options);
    assert_eq!(c.transition_phase(), Some(TransitionPhase::Converge));
    assert!(c.particles().iter().all(|p| p.speed == p.base_speed * 2.0));

    run(&mut c, 62); // 992ms
    assert!(!c.is_holding());

    run(&mut c, 1); // 1008ms
    assert!(c.is_holding());
    assert!(c.particles().iter().all(|p| p.speed == p.base_speed * 0.5));

    run(&mut c, 24); // 1392ms
    assert!(c.is_holding());
    let (coherence, _) = c.measure();
    assert!(coherence >= 0.9, "held formation should stay coherent: {coherence}");

    run(&mut c, 7); // 1504ms
    assert!(!c.is_holding());
    assert_eq!(c.transition_phase(), Some(TransitionPhase::Release));
    assert!(c.particles().iter().all(|p| p.speed == p.base_speed));

    run(&mut c, 100); // 3104ms, past the release blend
    assert_eq!(c.transition_phase(), None);
    assert!(c.particles().iter().all(|p| !p.in_formation));
    assert_eq!(c.current_formation(), Formation::Sphere);
}

#[test]
fn test_new_morph_preempts_hold() {
    let mut c = chamber();
    c.morph_to_formation_with_hold("torus", HoldOptions::default());
    run(&mut c, 10);
    c.morph_to_formation("cube");
    assert_eq!(c.transition_phase(), None);
    assert!(c.particles().iter().all(|p| p.speed == p.base_speed));
}

#[test]
fn test_dna_payload_tags_both_strands() {
    let mut c = chamber();
    c.create_mathematical_shape_json(
        r#"{"name": "dna double helix", "properties": {"turns": 2, "point_count": 40}}"#,
    );
    assert_eq!(c.current_formation(), Formation::Dna);

    let verts = c.shape_vertices();
    let count = |tag| verts.iter().filter(|v| v.tag == tag).count();
    assert_eq!(count(PointTag::Backbone1), 40);
    assert_eq!(count(PointTag::Backbone2), 40);
    assert_eq!(count(PointTag::BasePair), 30);

    assert!(c.particles().iter().all(|p| p.in_formation));
    assert!(c
        .particles()
        .iter()
        .any(|p| p.membership.map(|m| m.tag) == Some(PointTag::BasePair)));
}

#[test]
fn test_malformed_payload_presents_sphere() {
    let mut c = chamber();
    c.create_mathematical_shape_json("{not json");
    assert_eq!(c.current_formation(), Formation::Sphere);

    c.create_mathematical_shape(&ShapePayload::named("mystery object"));
    assert_eq!(c.current_formation(), Formation::Sphere);
    assert!(!c.shape_vertices().is_empty());
}

#[test]
fn test_oversized_payload_presents_sphere() {
    let mut c = chamber();
    c.create_mathematical_shape_json(
        r#"{"name":"dna","properties":{"turns":2,"point_count":9223372036854775807}}"#,
    );
    assert_eq!(c.current_formation(), Formation::Sphere);
    c.create_mathematical_shape_json(r#"{"name":"helix","properties":{"turns":1e38}}"#);
    assert_eq!(c.current_formation(), Formation::Sphere);
    assert!(c.particles().iter().all(|p| p.target.is_finite()));
}

#[test]
fn test_non_finite_shape_falls_back_to_sphere() {
    let runaway = ShapeKind::Helix {
        turns: f32::MAX,
        point_count: 56,
    };
    let mut c = chamber();
    c.present_shape(runaway.clone());
    assert_eq!(c.current_formation(), Formation::Sphere);
    assert!(c.shape_vertices().iter().all(|v| v.position.is_finite()));

    c.morph_to(runaway);
    assert_eq!(c.current_formation(), Formation::Sphere);
    assert!(c.particles().iter().all(|p| p.target.is_finite() && p.in_formation));

    run(&mut c, 120);
    assert!(c.particles().iter().all(|p| p.is_finite()));
}

#[test]
fn test_shape_rotation_restores_targets() {
    let mut c = chamber();
    c.create_mathematical_shape(&ShapePayload::named("star"));
    let originals: Vec<Vec3> = c.particles().iter().map(|p| p.target).collect();
    assert!(c.particles().iter().all(|p| p.speed == p.base_speed * 2.0));

    run(&mut c, 120); // 1920ms
    assert!(!c.is_rotating());
    run(&mut c, 6); // 2016ms
    assert!(c.is_rotating());
    assert!(c.particles().iter().all(|p| p.speed == p.base_speed));

    run(&mut c, 200); // 5216ms
    let moved = c
        .particles()
        .iter()
        .zip(&originals)
        .filter(|(p, o)| p.target.distance(**o) > 1.0)
        .count();
    assert!(moved > 0, "targets should be turning mid-rotation");

    run(&mut c, 250); // 9216ms
    assert!(!c.is_rotating());
    let restored: Vec<Vec3> = c.particles().iter().map(|p| p.target).collect();
    assert_eq!(restored, originals);
}

#[test]
fn test_resize_scales_exactly() {
    let mut c = chamber();
    c.morph_to_formation("sphere");
    run(&mut c, 10);
    let before: Vec<(Vec3, Vec3)> = c.particles().iter().map(|p| (p.position, p.target)).collect();

    c.resize(1000.0, 500.0);
    let sx = 1000.0_f32 / 800.0;
    let sy = 500.0_f32 / 600.0;
    for (p, (pos, target)) in c.particles().iter().zip(&before) {
        assert_eq!(p.position.x, pos.x * sx);
        assert_eq!(p.position.y, pos.y * sy);
        assert_eq!(p.position.z, pos.z);
        assert_eq!(p.target.x, target.x * sx);
        assert_eq!(p.target.y, target.y * sy);
    }

    c.resize(0.0, 500.0);
    assert_eq!(c.width(), 1000.0);
    assert_eq!(c.height(), 500.0);
}

#[test]
fn test_non_finite_particle_is_not_drawn() {
    let mut c = chamber();
    c.particles_mut()[0].position = Vec3::new(f32::NAN, 10.0, 0.0);
    let mut rec = Recorder::default();
    c.render(&mut rec);
    assert_eq!(rec.clears, 1);
    // each drawable particle gets a halo and a core
    assert_eq!(rec.circles.len(), 2 * 149);
    assert!(rec.circles.iter().all(|(center, r, _)| center.is_finite() && r.is_finite()));
    assert!(rec.lines.iter().all(|(a, b)| a.is_finite() && b.is_finite()));

    let mut vertices = Vec::new();
    c.pack_vertices(&mut vertices);
    assert_eq!(vertices.len(), 149);

    run(&mut c, 1);
    assert!(c.particles().iter().all(|p| p.is_finite()));
    let mut rec = Recorder::default();
    c.render(&mut rec);
    assert_eq!(rec.circles.len(), 2 * 150);
}

#[test]
fn test_non_finite_particle_rejoins_formation() {
    let mut c = chamber();
    c.morph_to_formation("sphere");
    run(&mut c, 200);
    let target = c.particles()[0].target;
    c.particles_mut()[0].position = Vec3::splat(f32::NAN);
    c.particles_mut()[0].velocity = Vec3::splat(f32::INFINITY);

    run(&mut c, 1);
    let p = &c.particles()[0];
    assert!(p.is_finite());
    assert!(p.position.distance(target) < 5.0, "reset onto its target");

    run(&mut c, 600);
    assert!(c.particles().iter().all(|p| p.is_finite()));
    let (coherence, _) = c.measure();
    assert!(coherence >= 0.9, "formation should recover: {coherence}");
}

#[test]
fn test_effects_expire_without_cleanup() {
    let mut c = chamber();
    c.spawn_energy_wave(400.0, 300.0);
    c.spawn_magnetic_field(200.0, 200.0, 0.8);
    c.spawn_lightning(Vec2::new(10.0, 10.0), Vec2::new(300.0, 200.0));
    assert_eq!(c.effects().len(), 3);

    let mut rec = Recorder::default();
    c.render(&mut rec);
    assert_eq!(rec.rings.len(), 2);

    run(&mut c, 200);
    assert!(c.effects().is_empty());
}

#[test]
fn test_thinking_throws_lightning() {
    let mut c = chamber();
    c.set_mode("thinking");
    assert_eq!(c.current_formation(), Formation::Dna);
    run(&mut c, 57);
    assert!(c
        .effects()
        .iter()
        .any(|e| matches!(e.kind, EffectKind::Lightning(_))));
}

#[test]
fn test_pointer_pushes_particles_away() {
    let mut c = chamber();
    c.morph_to_formation("sphere");
    run(&mut c, 120);
    let before = c.particles()[0].position;
    let pointer = before.truncate() + Vec2::new(5.0, 0.0);
    c.on_pointer_move(pointer.x, pointer.y);
    run(&mut c, 3);
    assert!(c.particles()[0].position.x < before.x);
    c.on_pointer_leave();
}

#[test]
fn test_roam_grows_while_idle_and_resets_on_morph() {
    let mut c = chamber();
    run(&mut c, 120);
    let roam = c.roam_expansion();
    assert!(roam > 1.0 && roam <= c.config().max_roam);
    c.morph_to_formation("torus");
    assert_eq!(c.roam_expansion(), 1.0);
}

#[test]
fn test_self_check_stiffens_and_floors_energy() {
    let mut c = chamber();
    c.morph_to_formation("sphere");
    for p in c.particles_mut() {
        p.energy = 0.1;
    }
    let status = c.maintain_cognitive_connection();
    assert!(status.coherence < 0.5, "fresh morph should be loose: {}", status.coherence);
    assert!((c.stiffness_boost() - 1.1).abs() < 1e-6);
    assert!(c.particles().iter().all(|p| p.energy >= 0.3));
    assert_eq!(c.status(), status);
}

#[test]
fn test_governor_shrinks_particle_set_on_slow_frames() {
    let mut c = chamber();
    c.morph_to_formation("cube");
    for _ in 0..60 {
        c.tick(40.0);
    }
    let n = c.particles().len();
    assert!(n < 150 && n >= 40, "particle count {n}");
    assert!(c
        .particles()
        .iter()
        .all(|p| p.membership.map(|m| m.formation) == Some(Formation::Cube)));
    assert!(c.optimal_settings().stride > 1);
}

#[test]
fn test_status_json_fields() {
    let c = chamber();
    let json: serde_json::Value = serde_json::from_str(&c.status().to_json()).unwrap();
    for key in ["coherence", "energy", "mode", "formation", "timestamp"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn test_governor_rebuild_keeps_released_particles_released() {
    let mut c = chamber();
    let options = HoldOptions {
        hold_ms: 100.0,
        post_drift_ms: 100.0,
    };
    c.morph_to_formation_with_hold("sphere", options);
    for _ in 0..60 {
        c.tick(40.0); // released at 1700ms, rebuilt at 2000ms
    }
    assert_eq!(c.transition_phase(), None);
    assert!(c.particles().len() < 127, "count {}", c.particles().len());
    assert!(c.particles().iter().all(|p| !p.in_formation));
    assert_eq!(c.current_formation(), Formation::Sphere);
}

#[test]
fn test_governor_rebuild_keeps_shape_rotation() {
    let mut c = chamber();
    c.create_mathematical_shape(&ShapePayload::named("star"));
    for _ in 0..25 {
        c.tick(40.0); // first rebuild at 1000ms, rotation still pending
    }
    assert_eq!(c.particles().len(), 127);
    assert!(!c.is_rotating());

    for _ in 0..25 {
        c.tick(40.0); // rotation starts at 2000ms, then the set shrinks again
    }
    assert!(c.is_rotating());
    assert!(c.particles().len() < 127);

    assert!(c.particles().iter().all(|p| p.in_formation));

    for _ in 0..200 {
        c.tick(40.0);
    }
    assert!(!c.is_rotating());
    assert!(c.particles().iter().all(|p| p.is_finite()));
}
