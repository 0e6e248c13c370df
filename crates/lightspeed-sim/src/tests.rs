//! Tests for bodies, interactions, light-delay observation, and the battlefield driver.

use std::collections::HashMap;

use glam::DVec2;

use lightspeed_core::constants::*;
use lightspeed_core::enums::*;
use lightspeed_core::error::OrderRejected;
use lightspeed_core::orders::Order;
use lightspeed_core::types::CloudCharge;
use lightspeed_core::units::*;

use crate::battlefield::{Battlefield, BattlefieldConfig};
use crate::body::{Body, BodyKind};
use crate::gas_cloud::GasCloud;
use crate::laser::Laser;
use crate::observation;
use crate::presentation::sprite_or_default;
use crate::spawner::Spawner;

const A: u8 = 0;
const B: u8 = 16;

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}

/// A Blue fighter at the origin and a Red fighter 300 m east, match started at t=0.
fn duel(local_team: Team) -> Battlefield {
    let mut bf = Battlefield::new(
        BattlefieldConfig {
            local_team,
            ..Default::default()
        },
        0.0,
    );
    bf.spawn_test_ship(A, Team::Blue, ShipClass::Fighter, DVec2::ZERO);
    bf.spawn_test_ship(B, Team::Red, ShipClass::Fighter, DVec2::new(300.0, 0.0));
    bf.receive(Order::ready(Team::Blue, 0.0)).unwrap();
    bf.receive(Order::ready(Team::Red, 0.0)).unwrap();
    assert_eq!(bf.phase(), MatchPhase::Active);
    bf
}

fn ship(bf: &Battlefield, id: u8) -> &Body {
    bf.ship(id).expect("ship should be on the field")
}

fn lasers(bf: &Battlefield) -> Vec<&Body> {
    bf.bodies()
        .iter()
        .filter(|body| body.as_laser().is_some())
        .collect()
}

fn cloud_with_charge(stored: f64, accumulated: f64, t: f64) -> Body {
    let mut body = Body::gas_cloud(DVec2::ZERO, DVec2::ZERO, 0.0);
    if let BodyKind::GasCloud(cloud) = &mut body.kind {
        cloud.set_charge(
            t,
            CloudCharge {
                stored,
                accumulated,
            },
        );
    }
    body
}

// ---- End to end ----

#[test]
fn test_shot_seen_with_light_delay_by_target() {
    let mut bf = duel(Team::Red);
    bf.receive(Order::shoot(A, 300.0, 0.0, 0.0)).unwrap();
    bf.update(310.0);

    let a = ship(&bf, A);
    let b = ship(&bf, B);
    assert_close(bf.observed_time(a, 310.0), 10.0, 1e-9);

    let laser = lasers(&bf)[0];
    assert!(laser.exists_at(10.0), "laser in flight at t=10");
    assert!(!laser.exists_at(310.0), "laser spent by t=310");
    assert_eq!(laser.as_laser().unwrap().collided_at(), Some(280.0));

    assert_eq!(b.h_val_at(279.0), Some(1.5 * MJ));
    assert_close(b.h_val_at(310.0).unwrap(), 0.5 * MJ, 1e-6);
    assert!(b.exists_at(310.0));

    let pew = a.cues_between(-1.0, bf.observed_time(a, 310.0));
    assert_eq!(pew.len(), 1);
    assert_eq!(pew[0].sound, Sound::Pew);
}

#[test]
fn test_shooter_sees_target_unhurt_until_light_returns() {
    let mut bf = duel(Team::Blue);
    bf.receive(Order::shoot(A, 300.0, 0.0, 0.0)).unwrap();
    bf.update(310.0);

    let b = ship(&bf, B);
    let seen = bf.observed_time(b, 310.0);
    assert_close(seen, 10.0, 1e-9);
    assert_eq!(b.h_val_at(seen), Some(1.5 * MJ));
    assert_close(bf.observed_time(b, 600.0), 300.0, 1e-9);
    assert_close(b.h_val_at(bf.observed_time(b, 600.0)).unwrap(), 0.5 * MJ, 1e-6);
}

#[test]
fn test_observed_dist_uses_each_bodys_own_time() {
    let bf = duel(Team::Red);
    let a = ship(&bf, A);
    let b = ship(&bf, B);
    assert_close(bf.observed_dist(a, b, 310.0), 300.0, 1e-9);
    assert_close(bf.dist(a, b, 0.0, 310.0), 300.0, 1e-9);
}

// ---- Light delay ----

#[test]
fn test_stationary_target_converges_quickly() {
    let target = DVec2::new(300.0, 400.0);
    let obs = observation::solve(DVec2::ZERO, 1000.0, |_| target);
    assert!(obs.converged);
    assert!(obs.iterations <= 5, "took {} iterations", obs.iterations);
    assert_close(obs.time, 500.0, 1e-9);
}

#[test]
fn test_receding_target_matches_closed_form() {
    let (x0, v, t) = (300.0, FIGHTER_SPEED, 1000.0);
    let obs = observation::solve(DVec2::ZERO, t, |s| DVec2::new(x0 + v * s, 0.0));
    assert!(obs.converged);
    assert_close(obs.time, (t - x0 / C) / (1.0 + v / C), 1e-6);
}

#[test]
fn test_laser_closing_at_light_speed_stays_unseen() {
    let start = DVec2::new(1000.0, 0.0);
    let laser = Body::laser(LaserKind::Visible, start, std::f64::consts::PI, MJ, 0.0);
    let obs = observation::solve(DVec2::ZERO, 500.0, |s| laser.position_at(s));
    assert!(!obs.converged);
    assert!(obs.time <= 500.0);
    assert!(!laser.exists_at(obs.time));
}

#[test]
fn test_local_ships_are_seen_without_delay() {
    let bf = duel(Team::Blue);
    assert_eq!(bf.observed_time(ship(&bf, A), 123.0), 123.0);
}

#[test]
fn test_freshest_vantage_point_wins() {
    let mut bf = duel(Team::Red);
    bf.spawn_test_ship(17, Team::Red, ShipClass::Steamship, DVec2::new(0.0, 100.0));
    assert_close(bf.observed_time(ship(&bf, A), 1000.0), 900.0, 1e-9);
}

#[test]
fn test_no_delay_without_a_local_ship() {
    let mut bf = Battlefield::new(BattlefieldConfig::default(), 0.0);
    bf.spawn_test_ship(B, Team::Red, ShipClass::Fighter, DVec2::new(300.0, 0.0));
    assert_eq!(bf.observed_time(ship(&bf, B), 50.0), 50.0);
}

#[test]
fn test_queries_are_idempotent() {
    let mut bf = duel(Team::Red);
    bf.receive(Order::move_to(A, 0.0, -100.0, 0.0)).unwrap();
    bf.update(200.0);
    let a = ship(&bf, A);

    assert_eq!(a.position_at(150.0), a.position_at(150.0));
    assert_eq!(a.h_val_at(150.0), a.h_val_at(150.0));
    assert_eq!(a.e_val_at(150.0), a.e_val_at(150.0));
    assert_eq!(a.exists_at(150.0), a.exists_at(150.0));
    assert_eq!(bf.observed_time(a, 200.0), bf.observed_time(a, 200.0));
}

// ---- Ship actions ----

#[test]
fn test_reissued_move_discards_later_segments() {
    let mut body = Body::ship(A, Team::Blue, ShipClass::Fighter, DVec2::ZERO, 0.0);
    assert_eq!(body.move_to(DVec2::new(100.0, 0.0), 0.0), Ok(800.0));
    assert_eq!(body.position_at(400.0), DVec2::new(50.0, 0.0));

    assert_eq!(body.move_to(DVec2::new(50.0, 100.0), 400.0), Ok(1200.0));
    assert_eq!(body.position_at(1000.0), DVec2::new(50.0, 75.0));
    assert_eq!(body.position_at(2000.0), DVec2::new(50.0, 100.0));

    let mut fresh = Body::ship(A, Team::Blue, ShipClass::Fighter, DVec2::new(50.0, 0.0), 400.0);
    fresh.move_to(DVec2::new(50.0, 100.0), 400.0).unwrap();
    for t in [400.0, 700.0, 1000.0, 1200.0, 5000.0] {
        assert_eq!(body.position_at(t), fresh.position_at(t), "diverged at t={t}");
    }
}

#[test]
fn test_zero_length_move_stops_ship() {
    let mut body = Body::ship(A, Team::Blue, ShipClass::Fighter, DVec2::ZERO, 0.0);
    body.move_to(DVec2::new(100.0, 0.0), 0.0).unwrap();
    let here = body.position_at(200.0);
    assert_eq!(body.move_to(here, 200.0), Ok(200.0));
    assert_eq!(body.position_at(900.0), here);
    assert_eq!(body.vx_val_at(900.0), 0.0);
}

#[test]
fn test_move_cues_blast_at_both_ends() {
    let mut body = Body::ship(A, Team::Blue, ShipClass::Fighter, DVec2::ZERO, 0.0);
    body.move_to(DVec2::new(100.0, 0.0), 0.0).unwrap();
    body.move_to(DVec2::new(0.0, 0.0), 200.0).unwrap();

    let cues = body.cues_between(-1.0, 1.0e6);
    let times: Vec<f64> = cues.iter().map(|c| c.time).collect();
    assert_eq!(times, vec![0.0, 200.0, 400.0], "arrival blast of the first move is cleared");
    assert!(cues.iter().all(|c| c.sound == Sound::Blast));
}

#[test]
fn test_ship_at_exactly_zero_health_is_gone() {
    let mut spawner = Spawner::new(1);
    let mut body = Body::ship(A, Team::Blue, ShipClass::Steamship, DVec2::ZERO, 0.0);
    body.damaged(SHIP_INITIAL_HEALTH, 100.0);

    assert!(body.exists_at(99.0));
    assert!(!body.exists_at(100.0));
    assert_eq!(body.h_val_at(100.0), Some(0.0));

    let track_before = body.motion().track.clone();
    let energy_before = body.e_val_at(200.0);
    let destroyed = OrderRejected::ShipDestroyed { ship: A, time: 200.0 };

    assert_eq!(body.move_to(DVec2::new(10.0, 0.0), 200.0), Err(destroyed));
    assert_eq!(body.shoot(DVec2::new(10.0, 0.0), 200.0, &mut spawner), Err(destroyed));
    assert_eq!(body.special(DVec2::new(10.0, 0.0), 200.0, &mut spawner), Err(destroyed));

    assert_eq!(body.motion().track, track_before);
    assert_eq!(body.e_val_at(200.0), energy_before);
    assert!(spawner.pending().is_empty());
    assert_eq!(body.cues_between(-1.0, 1.0e6).last().map(|c| c.sound), Some(Sound::Boom));
}

#[test]
fn test_unaffordable_special_changes_nothing() {
    let mut spawner = Spawner::new(1);
    let mut body = Body::ship(A, Team::Blue, ShipClass::Steamship, DVec2::ZERO, 0.0);
    body.special(DVec2::ZERO, 0.0, &mut spawner).unwrap();
    body.special(DVec2::ZERO, 10.0, &mut spawner).unwrap();
    body.special(DVec2::ZERO, 20.0, &mut spawner).unwrap();
    assert_close(body.e_val_at(20.0).unwrap(), 0.5 * MJ, 1e-6);

    let result = body.special(DVec2::ZERO, 30.0, &mut spawner);
    assert!(matches!(result, Err(OrderRejected::InsufficientEnergy { ship: A, .. })));
    assert_eq!(spawner.pending().len(), 3);
    assert_close(body.e_val_at(30.0).unwrap(), 0.5 * MJ, 1e-6);
}

#[test]
fn test_expend_refuses_overdraft() {
    let mut body = Body::ship(A, Team::Blue, ShipClass::Fighter, DVec2::ZERO, 0.0);
    assert!(!body.expend(SHIP_INITIAL_ENERGY + 1.0, 10.0));
    assert_eq!(body.e_val_at(10.0), Some(SHIP_INITIAL_ENERGY));
    assert!(body.expend(SHIP_INITIAL_ENERGY, 10.0));
    assert_eq!(body.e_val_at(10.0), Some(0.0));
}

#[test]
fn test_late_special_cannot_overdraw_later_spends() {
    let mut bf = Battlefield::new(BattlefieldConfig::default(), 0.0);
    bf.spawn_test_ship(1, Team::Blue, ShipClass::Steamship, DVec2::ZERO);
    bf.spawn_test_ship(B, Team::Red, ShipClass::Fighter, DVec2::new(300.0, 0.0));
    bf.receive(Order::ready(Team::Blue, 0.0)).unwrap();
    bf.receive(Order::ready(Team::Red, 0.0)).unwrap();
    for t in [100.0, 200.0, 300.0] {
        bf.receive(Order::special(1, 0.0, 0.0, t)).unwrap();
    }
    assert_close(ship(&bf, 1).e_val_at(300.0).unwrap(), 0.5 * MJ, 1e-6);

    // Stamped before the three spends already on record.
    let late = bf.receive(Order::special(1, 0.0, 0.0, 50.0));
    assert!(matches!(late, Err(OrderRejected::InsufficientEnergy { ship: 1, .. })));

    let steamship = ship(&bf, 1);
    assert_eq!(steamship.e_val_at(50.0), Some(SHIP_INITIAL_ENERGY));
    assert_close(steamship.e_val_at(300.0).unwrap(), 0.5 * MJ, 1e-6);
    assert_eq!(bf.orders().len(), 6);
    assert_eq!(bf.orders()[5].shown_until(), None);
}

#[test]
fn test_fighter_has_no_special() {
    let mut spawner = Spawner::new(1);
    let mut body = Body::ship(A, Team::Blue, ShipClass::Fighter, DVec2::ZERO, 0.0);
    assert_eq!(
        body.special(DVec2::ZERO, 0.0, &mut spawner),
        Err(OrderRejected::NoSpecial(A))
    );
    assert_eq!(body.e_val_at(0.0), Some(SHIP_INITIAL_ENERGY));
}

#[test]
fn test_lamplighter_fires_uv_laser() {
    let mut spawner = Spawner::new(1);
    let mut body = Body::ship(A, Team::Blue, ShipClass::Lamplighter, DVec2::ZERO, 0.0);
    body.special(DVec2::new(0.0, 500.0), 0.0, &mut spawner).unwrap();

    let laser = spawner.pending()[0].as_laser().unwrap();
    assert_eq!(laser.kind(), LaserKind::Ultraviolet);
    assert_eq!(laser.e_val(), UV_LASER_ENERGY);
    assert_eq!(body.e_val_at(0.0), Some(SHIP_INITIAL_ENERGY - LAMPLIGHTER_SPECIAL_COST));
}

#[test]
fn test_shot_spawns_clear_of_shooter() {
    let mut spawner = Spawner::new(1);
    let mut body = Body::ship(A, Team::Blue, ShipClass::Fighter, DVec2::ZERO, 0.0);
    body.shoot(DVec2::new(0.0, 300.0), 0.0, &mut spawner).unwrap();

    let laser = &spawner.pending()[0];
    let expected = Laser::radius_for(SHOT_ENERGY) + SHOT_SPAWN_CLEARANCE;
    assert_close(laser.position_at(0.0).length(), expected, 1e-9);
    assert_close(laser.vy_val_at(0.0), LASER_SPEED, 1e-12);
}

// ---- Lasers ----

#[test]
fn test_laser_radius_scales_with_root_energy() {
    assert_close(Laser::radius_for(MJ), 12.0, 1e-12);
    assert_close(Laser::radius_for(4.0 * MJ), 24.0, 1e-12);
}

#[test]
fn test_laser_expires_at_range() {
    let laser = Body::laser(LaserKind::Visible, DVec2::ZERO, 0.0, MJ, 100.0);
    assert!(!laser.exists_at(99.0));
    assert!(laser.exists_at(100.0));
    assert!(laser.exists_at(100.0 + LASER_RANGE / LASER_SPEED - 1.0));
    assert!(!laser.exists_at(100.0 + LASER_RANGE / LASER_SPEED));
}

#[test]
fn test_laser_cannot_skip_past_a_ship_between_ticks() {
    let mut bf = Battlefield::new(BattlefieldConfig::default(), 0.0);
    bf.spawn_test_ship(B, Team::Red, ShipClass::Fighter, DVec2::new(105.0, -300.0));
    bf.spawn_test_ship(18, Team::Red, ShipClass::Lamplighter, DVec2::new(205.0, -290.0));
    // Radius under 4 m while it covers 10 m per tick; samples land at x=100 and x=110.
    let laser = Body::laser(
        LaserKind::Visible,
        DVec2::new(0.0, -300.0),
        0.0,
        GAS_CLOUD_LASER_ENERGY,
        0.0,
    );
    bf.spawner_mut().spawn(laser, 1);
    bf.update(400.0);

    let hit = SHIP_INITIAL_HEALTH - GAS_CLOUD_LASER_ENERGY;
    assert_close(ship(&bf, B).h_val_at(400.0).unwrap(), hit, 1e-6);
    assert_eq!(lasers(&bf)[0].as_laser().unwrap().collided_at(), Some(110.0));
    assert_eq!(ship(&bf, 18).h_val_at(400.0), Some(SHIP_INITIAL_HEALTH), "10 m off the path");
}

// ---- Gas clouds ----

#[test]
fn test_cloud_radius_grows_then_shrinks() {
    assert_eq!(GasCloud::r_val_for(0.0), 0.0);
    assert!(GasCloud::r_val_for(1.0 * S) > 0.0);
    assert!(GasCloud::r_val_for(5.0 * S) > GasCloud::r_val_for(1.0 * S));
    assert!(GasCloud::r_val_for(29.0 * S) < GasCloud::r_val_for(11.0 * S));
    assert_eq!(GasCloud::r_val_for(GAS_CLOUD_LIFETIME), 0.0);
}

#[test]
fn test_cloud_at_threshold_emits_one_laser() {
    let mut spawner = Spawner::new(7);
    let mut body = cloud_with_charge(GAS_CLOUD_LASER_ENERGY, GAS_CLOUD_LASER_ENERGY, 1000.0);
    body.update(1000.0, &mut spawner);

    assert_eq!(spawner.pending().len(), 1);
    let cloud = body.as_gas_cloud().unwrap();
    assert_eq!(cloud.e_val_at(1000.0), 0.0);
    assert_eq!(cloud.es_val_at(1000.0), 0.0);

    let laser = &spawner.pending()[0];
    assert_eq!(laser.as_laser().unwrap().e_val(), GAS_CLOUD_LASER_ENERGY);
    let clearance = GasCloud::r_val_for(1000.0) + Laser::radius_for(GAS_CLOUD_LASER_ENERGY);
    assert_close(laser.position_at(1000.0).length(), clearance, 1e-9);
}

#[test]
fn test_cloud_surplus_emits_several_lasers() {
    let mut spawner = Spawner::new(7);
    let mut body = cloud_with_charge(0.35 * MJ, 0.35 * MJ, 1000.0);
    body.update(1000.0, &mut spawner);

    assert_eq!(spawner.pending().len(), 3);
    let cloud = body.as_gas_cloud().unwrap();
    assert_eq!(cloud.emitted(), 3);
    assert_close(cloud.e_val_at(1000.0), 0.05 * MJ, 1e-6);
    assert_close(cloud.es_val_at(1000.0), 0.05 * MJ, 1e-6);
}

#[test]
fn test_cloud_below_threshold_waits_for_charge() {
    let mut spawner = Spawner::new(7);
    let mut body = cloud_with_charge(0.05 * MJ, 0.09 * MJ, 1000.0);
    body.update(1000.0, &mut spawner);
    assert!(spawner.pending().is_empty());

    // 0.05 MJ stored adds 0.02 MJ over two seconds.
    body.update(3000.0, &mut spawner);
    assert_eq!(spawner.pending().len(), 1);
}

#[test]
fn test_emission_is_capped_per_update() {
    let mut spawner = Spawner::new(7);
    let mut body = cloud_with_charge(100.0 * MJ, 100.0 * MJ, 1000.0);
    body.update(1000.0, &mut spawner);
    assert_eq!(spawner.pending().len(), MAX_EMISSIONS_PER_UPDATE as usize);
}

#[test]
fn test_emission_directions_follow_seed() {
    let headings = |seed: u64| {
        let mut spawner = Spawner::new(seed);
        let mut body = cloud_with_charge(0.35 * MJ, 0.35 * MJ, 1000.0);
        body.update(1000.0, &mut spawner);
        spawner
            .pending()
            .iter()
            .map(|laser| laser.as_laser().unwrap().heading())
            .collect::<Vec<_>>()
    };
    assert_eq!(headings(11), headings(11));
    assert_ne!(headings(11), headings(12));
}

#[test]
fn test_cloud_absorbs_laser_and_shields_steamship() {
    let mut bf = Battlefield::new(BattlefieldConfig::default(), 0.0);
    bf.spawn_test_ship(1, Team::Blue, ShipClass::Steamship, DVec2::ZERO);
    bf.spawn_test_ship(B, Team::Red, ShipClass::Fighter, DVec2::new(300.0, 0.0));
    bf.receive(Order::ready(Team::Blue, 0.0)).unwrap();
    bf.receive(Order::ready(Team::Red, 0.0)).unwrap();

    bf.receive(Order::special(1, 0.0, 0.0, 0.0)).unwrap();
    bf.receive(Order::shoot(B, 0.0, 0.0, 0.0)).unwrap();
    bf.update(400.0);

    let steamship = ship(&bf, 1);
    assert_eq!(steamship.h_val_at(400.0), Some(SHIP_INITIAL_HEALTH));
    assert_eq!(
        steamship.e_val_at(400.0),
        Some(SHIP_INITIAL_ENERGY - STEAMSHIP_SPECIAL_COST)
    );

    let shot = lasers(&bf)[0].as_laser().unwrap();
    assert_eq!(shot.collided_at(), Some(250.0));
    let cloud = bf
        .bodies()
        .iter()
        .find_map(Body::as_gas_cloud)
        .expect("cloud released");
    assert_eq!(cloud.e_val_at(300.0), SHOT_ENERGY);

    // 1 MJ stored builds 0.1 MJ in half a second.
    bf.update(760.0);
    let emitted: Vec<&Body> = lasers(&bf)
        .into_iter()
        .filter(|laser| laser.created() == 750.0)
        .collect();
    assert_eq!(emitted.len(), 1);
    let cloud = bf.bodies().iter().find_map(Body::as_gas_cloud).unwrap();
    assert_close(cloud.e_val_at(760.0), 0.9 * MJ, 1e-6);
}

#[test]
fn test_uv_laser_passes_through_cloud() {
    let mut bf = Battlefield::new(BattlefieldConfig::default(), 0.0);
    bf.spawn_test_ship(1, Team::Blue, ShipClass::Steamship, DVec2::ZERO);
    bf.spawn_test_ship(18, Team::Red, ShipClass::Lamplighter, DVec2::new(300.0, 0.0));
    bf.receive(Order::ready(Team::Blue, 0.0)).unwrap();
    bf.receive(Order::ready(Team::Red, 0.0)).unwrap();

    bf.receive(Order::special(1, 0.0, 0.0, 0.0)).unwrap();
    bf.receive(Order::special(18, 0.0, 0.0, 0.0)).unwrap();
    bf.update(400.0);

    let hit = SHIP_INITIAL_HEALTH - UV_LASER_ENERGY;
    assert_close(ship(&bf, 1).h_val_at(400.0).unwrap(), hit, 1e-6);
}

// ---- Battlefield lifecycle ----

#[test]
fn test_placement_flow() {
    let mut bf = Battlefield::new(BattlefieldConfig::default(), 0.0);
    assert_eq!(bf.phase(), MatchPhase::Placement);
    assert!(bf.region().unwrap().exists_at(0.0));

    assert_eq!(
        bf.receive(Order::place(Team::Blue, ShipClass::Fighter, 0.0, 0.0, 0.0)),
        Err(OrderRejected::OutsideRegion {
            team: Team::Blue,
            x: 0.0,
            y: 0.0
        })
    );
    bf.receive(Order::place(Team::Blue, ShipClass::Fighter, 0.0, 450.0, 0.0))
        .unwrap();
    assert_eq!(
        bf.receive(Order::place(Team::Blue, ShipClass::Fighter, 10.0, 450.0, 0.0)),
        Err(OrderRejected::DuplicateShip(0))
    );
    assert_eq!(
        bf.receive(Order::ready(Team::Red, 0.0)),
        Err(OrderRejected::EmptyFleet(Team::Red))
    );
    assert_eq!(
        bf.receive(Order::move_to(0, 0.0, 0.0, 0.0)),
        Err(OrderRejected::NotStarted)
    );

    bf.receive(Order::ready(Team::Blue, 10.0)).unwrap();
    assert_eq!(bf.message(), "Waiting for players...");
    bf.dismiss_message();
    assert_eq!(bf.message(), "");
    assert_eq!(
        bf.receive(Order::place(Team::Blue, ShipClass::Steamship, 0.0, 500.0, 20.0)),
        Err(OrderRejected::AlreadyStarted)
    );

    bf.receive(Order::place(Team::Red, ShipClass::Steamship, 0.0, -450.0, 30.0))
        .unwrap();
    bf.receive(Order::ready(Team::Red, 50.0)).unwrap();

    assert_eq!(bf.phase(), MatchPhase::Active);
    assert!(bf.started());
    assert_eq!(bf.started_at(), Some(50.0));
    assert_eq!(bf.message(), "");
    assert!(ship(&bf, 17).exists_at(50.0));

    let region = bf.region().unwrap();
    assert!(region.exists_at(49.0));
    assert!(!region.exists_at(50.0));

    assert_eq!(bf.orders().len(), 9, "rejected orders are logged too");
}

#[test]
fn test_match_ends_when_a_fleet_is_gone() {
    let mut bf = duel(Team::Blue);
    bf.receive(Order::shoot(A, 300.0, 0.0, 0.0)).unwrap();
    bf.receive(Order::shoot(A, 300.0, 0.0, 1.0)).unwrap();
    bf.update(300.0);

    assert!(!ship(&bf, B).exists_at(280.0));
    assert_eq!(bf.phase(), MatchPhase::Ended);
    assert_eq!(bf.outcome(), Some(Outcome::Victory));
    assert_eq!(bf.message(), "Victory!");
    assert!(bf.active());

    bf.update(280.0 + END_LINGER + 10.0);
    assert!(!bf.active());
    assert!(bf.ship(B).is_some(), "destroyed ships are never removed");
}

#[test]
fn test_defeat_from_the_other_side() {
    let mut bf = duel(Team::Red);
    bf.receive(Order::shoot(A, 300.0, 0.0, 0.0)).unwrap();
    bf.receive(Order::shoot(A, 300.0, 0.0, 1.0)).unwrap();
    bf.update(300.0);
    assert_eq!(bf.outcome(), Some(Outcome::Defeat));
}

#[test]
fn test_abandon_freezes_match() {
    let mut bf = duel(Team::Blue);
    bf.update(100.0);
    bf.abandon("peer closed");

    assert_eq!(bf.phase(), MatchPhase::Ended);
    assert_eq!(bf.outcome(), Some(Outcome::Abandoned));
    assert_eq!(bf.message(), "Connection lost");
    assert_eq!(
        bf.receive(Order::move_to(A, 10.0, 10.0, 120.0)),
        Err(OrderRejected::MatchEnded)
    );
    assert_eq!(ship(&bf, A).position_at(500.0), DVec2::ZERO);
}

#[test]
fn test_actions_on_unknown_ship_are_dropped() {
    let mut bf = duel(Team::Blue);
    assert_eq!(
        bf.receive(Order::shoot(9, 0.0, 0.0, 0.0)),
        Err(OrderRejected::UnknownShip(9))
    );
}

#[test]
fn test_spent_bodies_retire_after_retention() {
    let mut bf = duel(Team::Blue);
    bf.receive(Order::shoot(A, 300.0, 0.0, 0.0)).unwrap();
    bf.update(300.0);
    assert_eq!(lasers(&bf).len(), 1, "spent laser kept for distant observers");

    bf.update(280.0 + DEFAULT_RETENTION + 10.0);
    assert!(lasers(&bf).is_empty());
}

#[test]
fn test_update_never_runs_backwards() {
    let mut bf = duel(Team::Blue);
    bf.update(500.0);
    bf.update(100.0);
    assert_eq!(bf.time(), 500.0);
}

#[test]
fn test_large_jump_skips_ahead() {
    let mut bf = duel(Team::Blue);
    bf.update(1.0e9);
    assert_eq!(bf.time(), 1.0e9);
    assert!(ship(&bf, A).exists_at(1.0e9));
}

// ---- Order markers ----

#[test]
fn test_order_marker_windows() {
    let mut bf = duel(Team::Blue);
    bf.receive(Order::move_to(A, 0.0, -100.0, 0.0)).unwrap();
    bf.receive(Order::shoot(A, 300.0, 0.0, 0.0)).unwrap();

    let orders = bf.orders();
    let (ready, moving, shot) = (&orders[0], &orders[2], &orders[3]);
    assert!(!ready.exists_at(0.0));
    assert_eq!(ready.sprite_name(), None);

    assert_eq!(moving.shown_until(), Some(800.0));
    assert!(moving.exists_at(799.0));
    assert!(!moving.exists_at(800.0));
    assert_eq!(moving.r_val_at(400.0), 0.0);

    assert_eq!(shot.shown_until(), Some(300.0));
    assert_eq!(shot.sprite_name().as_deref(), Some("order1"));
    assert_eq!(shot.r_val_at(100.0), 100.0);
    assert_eq!(bf.observed_time(shot, 100.0), 100.0);
}

// ---- Determinism ----

fn cloud_scenario(seed: u64, frame: f64) -> String {
    let mut bf = Battlefield::new(
        BattlefieldConfig {
            seed,
            ..Default::default()
        },
        0.0,
    );
    bf.spawn_test_ship(1, Team::Blue, ShipClass::Steamship, DVec2::ZERO);
    bf.spawn_test_ship(B, Team::Red, ShipClass::Fighter, DVec2::new(300.0, 0.0));
    bf.receive(Order::ready(Team::Blue, 0.0)).unwrap();
    bf.receive(Order::ready(Team::Red, 0.0)).unwrap();
    bf.receive(Order::special(1, 0.0, 0.0, 0.0)).unwrap();
    bf.receive(Order::shoot(B, 0.0, 0.0, 0.0)).unwrap();

    let mut now = 0.0;
    while now < 1500.0 {
        now = (now + frame).min(1500.0);
        bf.update(now);
    }
    serde_json::to_string(bf.bodies()).unwrap()
}

#[test]
fn test_frame_rate_does_not_change_history() {
    assert_eq!(cloud_scenario(42, 16.0), cloud_scenario(42, 33.0));
}

#[test]
fn test_different_seeds_diverge() {
    assert_ne!(cloud_scenario(1, 16.0), cloud_scenario(2, 16.0));
}

/// Each side releases a cloud and fires into the other side's cloud. Each
/// peer applies its own orders first, so the two peers see the same orders
/// in a different order.
fn crossfire(blue_first: bool) -> Battlefield {
    let mut bf = Battlefield::new(BattlefieldConfig::default(), 0.0);
    let mut fleets = [
        (
            Team::Blue,
            [(A, ShipClass::Fighter, DVec2::new(300.0, 600.0)), (1, ShipClass::Steamship, DVec2::ZERO)],
            [Order::special(1, 0.0, 0.0, 0.0), Order::shoot(A, 0.0, 600.0, 0.0)],
        ),
        (
            Team::Red,
            [(B, ShipClass::Fighter, DVec2::new(300.0, 0.0)), (17, ShipClass::Steamship, DVec2::new(0.0, 600.0))],
            [Order::special(17, 0.0, 600.0, 0.0), Order::shoot(B, 0.0, 0.0, 0.0)],
        ),
    ];
    if !blue_first {
        fleets.reverse();
    }

    for (team, ships, _) in &fleets {
        for (id, class, pos) in ships {
            bf.spawn_test_ship(*id, *team, *class, *pos);
        }
    }
    for (team, _, _) in &fleets {
        bf.receive(Order::ready(*team, 0.0)).unwrap();
    }
    for (_, _, orders) in &fleets {
        for order in orders {
            bf.receive(*order).unwrap();
        }
    }
    bf.update(1500.0);
    bf
}

#[test]
fn test_arrival_order_does_not_change_history() {
    let blue_first = crossfire(true);
    let red_first = crossfire(false);

    let both_emit = lasers(&blue_first)
        .iter()
        .filter(|laser| laser.created() == 750.0)
        .count();
    assert_eq!(both_emit, 2, "both clouds emit in the same tick");

    assert_eq!(
        serde_json::to_string(blue_first.bodies()).unwrap(),
        serde_json::to_string(red_first.bodies()).unwrap()
    );
}

// ---- Presentation ----

#[test]
fn test_sprite_names() {
    let bf = duel(Team::Blue);
    assert_eq!(ship(&bf, A).sprite_name(), "ship_fighter_b");
    assert_eq!(ship(&bf, B).sprite_name(), "ship_fighter_r");
    assert_eq!(bf.region().unwrap().sprite_name(), "region_b");
    assert!(!ship(&bf, A).scales());

    let cloud = Body::gas_cloud(DVec2::ZERO, DVec2::ZERO, 0.0);
    assert_eq!(cloud.sprite_name(), "gas");
    assert!(cloud.scales());
}

#[test]
fn test_sprite_transforms() {
    let laser = Body::laser(LaserKind::Ultraviolet, DVec2::ZERO, 1.0, MJ, 0.0);
    let tf = laser.sprite_transform(10.0).unwrap();
    assert_eq!(laser.sprite_name(), "laser_uv");
    assert_eq!(tf.rotation, 1.0);
    assert_close(tf.scale_x, 1.0, 1e-12);

    let cloud = Body::gas_cloud(DVec2::ZERO, DVec2::ZERO, 0.0);
    assert!(cloud.sprite_transform(0.0).is_none(), "zero-size cloud is not drawn");
    let tf = cloud.sprite_transform(15.0 * S).unwrap();
    assert_close(tf.alpha, 0.75, 1e-12);
    assert_close(tf.scale_x, GasCloud::r_val_for(15.0 * S) / GAS_SPRITE_RADIUS, 1e-12);
    assert_eq!(cloud.r_val_at(15.0 * S), Some(GasCloud::r_val_for(15.0 * S)));
}

#[test]
fn test_missing_sprite_falls_back() {
    let sprites: HashMap<String, u32> =
        [("null".to_string(), 0), ("gas".to_string(), 1)].into_iter().collect();
    assert_eq!(sprite_or_default(&sprites, "gas"), Some(&1));
    assert_eq!(sprite_or_default(&sprites, "ship_fighter_b"), Some(&0));
    assert_eq!(sprite_or_default(&HashMap::<String, u32>::new(), "gas"), None);
}
