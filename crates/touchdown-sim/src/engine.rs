//! Simulation engine.
//!
//! `SimulationEngine` owns the obstacle world, terrain, vehicle, scanner and
//! autopilot, processes operator commands at tick boundaries and produces a
//! `SimSnapshot` per tick. Fully headless and deterministic for a given
//! config.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use touchdown_autopilot::{AutopilotConfig, LandingAutopilot};
use touchdown_core::commands::AutopilotCommand;
use touchdown_core::constants::*;
use touchdown_core::events::AutopilotEvent;
use touchdown_core::state::SimSnapshot;
use touchdown_core::types::{BodyId, SimTime};
use touchdown_radar::{LandingSiteScanner, ScanContext, ScannerConfig};
use touchdown_terrain::{TerrainConfig, TerrainHeightField};

use crate::obstacle_world::ObstacleWorld;
use crate::systems;
use crate::vehicle::{PointMassVehicle, VehicleParams};
use crate::world_setup::{self, RockField};

/// Body id given to the simulated vehicle.
pub const VEHICLE_BODY: BodyId = BodyId(1);

/// Configuration for a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed for obstacle placement. Same seed = same simulation.
    pub seed: u64,
    /// Seconds per tick.
    pub dt: f32,
    pub terrain: TerrainConfig,
    pub scanner: ScannerConfig,
    pub autopilot: AutopilotConfig,
    pub vehicle: VehicleParams,
    pub spawn_position: Vec3,
    pub spawn_velocity: Vec3,
    pub rock_count: usize,
    pub rock_field_radius: f32,
    pub rock_clear_radius: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: SIM_SEED,
            dt: DT,
            terrain: TerrainConfig::default(),
            scanner: ScannerConfig::default(),
            autopilot: AutopilotConfig::default(),
            vehicle: VehicleParams::default(),
            spawn_position: Vec3::new(0.0, SPAWN_HEIGHT, 0.0),
            spawn_velocity: Vec3::ZERO,
            rock_count: ROCK_COUNT,
            rock_field_radius: ROCK_FIELD_RADIUS,
            rock_clear_radius: ROCK_FIELD_CLEAR_RADIUS,
        }
    }
}

/// The simulation engine.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    dt: f32,
    terrain: TerrainHeightField,
    vehicle: PointMassVehicle,
    vehicle_collider: Entity,
    scanner: LandingSiteScanner,
    autopilot: LandingAutopilot,
    command_queue: VecDeque<AutopilotCommand>,
    autopilot_events: Vec<AutopilotEvent>,
}

impl SimulationEngine {
    pub fn new(config: SimConfig) -> Self {
        let dt = if config.dt > 0.0 && config.dt.is_finite() {
            config.dt
        } else {
            log::warn!("sim dt = {} invalid, using {DT}", config.dt);
            DT
        };
        let terrain = TerrainHeightField::new(config.terrain);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut world = World::new();

        let mut spawn = config.spawn_position;
        spawn.y = spawn.y.max(terrain.height_at(spawn.x, spawn.z));
        let vehicle =
            PointMassVehicle::new(VEHICLE_BODY, config.vehicle, spawn, config.spawn_velocity);
        let vehicle_collider = world_setup::spawn_vehicle_collider(&mut world, &vehicle);

        let field = RockField {
            center: Vec2::new(spawn.x, spawn.z),
            count: config.rock_count,
            radius: config.rock_field_radius,
            clear_radius: config.rock_clear_radius,
        };
        world_setup::spawn_rocks(&mut world, &mut rng, &terrain, &field);
        log::debug!(
            "simulation ready: {} rocks, vehicle at ({:.1}, {:.1}, {:.1})",
            config.rock_count,
            spawn.x,
            spawn.y,
            spawn.z,
        );

        Self {
            world,
            time: SimTime::default(),
            dt,
            terrain,
            vehicle,
            vehicle_collider,
            scanner: LandingSiteScanner::new(config.scanner),
            autopilot: LandingAutopilot::new(config.autopilot),
            command_queue: VecDeque::new(),
            autopilot_events: Vec::new(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: AutopilotCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = AutopilotCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_commands();
        self.run_systems();
        self.time.advance(self.dt);

        let autopilot_events = std::mem::take(&mut self.autopilot_events);
        let scan_events = self.scanner.take_events();
        systems::snapshot::build_snapshot(
            &self.time,
            &self.vehicle,
            &self.autopilot,
            &self.scanner,
            autopilot_events,
            scan_events,
        )
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn vehicle(&self) -> &PointMassVehicle {
        &self.vehicle
    }

    pub fn autopilot(&self) -> &LandingAutopilot {
        &self.autopilot
    }

    pub fn scanner(&self) -> &LandingSiteScanner {
        &self.scanner
    }

    pub fn terrain(&self) -> &TerrainHeightField {
        &self.terrain
    }

    /// Read-only access to the obstacle world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Place an extra rock on the terrain (for tests needing a known layout).
    #[cfg(test)]
    pub fn spawn_test_rock(&mut self, ground: Vec2, half_width: f32, height: f32) -> Entity {
        world_setup::spawn_rock(
            &mut self.world,
            &self.terrain,
            "Rock_test".to_string(),
            ground,
            half_width,
            height,
        )
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: AutopilotCommand) {
        match command {
            AutopilotCommand::StartLanding => {
                if let Err(err) = self.autopilot.start_landing(&mut self.vehicle) {
                    log::debug!("start command at tick {} ignored: {err}", self.time.tick);
                }
            }
            AutopilotCommand::StopLanding => self.autopilot.stop_landing(&mut self.vehicle),
        }
        self.autopilot_events.extend(self.autopilot.take_events());
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Collider follows the vehicle
        systems::colliders::sync_vehicle(&mut self.world, self.vehicle_collider, &self.vehicle);
        // 2. Radar scan slice
        let obstacles = ObstacleWorld::new(&self.world);
        let ctx = ScanContext {
            terrain: &self.terrain,
            obstacles: &obstacles,
            vehicle_position: self.vehicle.position,
            vehicle_body: Some(self.vehicle.body),
        };
        self.scanner.update(&ctx, self.dt);
        // 3. Autopilot
        self.autopilot.update(&mut self.vehicle, &self.scanner, self.dt);
        self.autopilot_events.extend(self.autopilot.take_events());
        // 4. Vehicle dynamics
        systems::dynamics::run(&mut self.vehicle, &self.terrain, self.dt);
    }
}
