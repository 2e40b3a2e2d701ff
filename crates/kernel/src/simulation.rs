use quadsim_common::{ControlInputs, VehicleId};
use std::collections::BTreeMap;

use crate::clock::{ClockConfig, FixedTimestep};
use crate::error::{FlightError, check_dt, check_inputs};
use crate::flight::FlightConfig;
use crate::rotor::RotorLayout;
use crate::vehicle::Vehicle;

/// Per-tick pilot inputs keyed by vehicle. Vehicles without an entry read
/// centered sticks.
pub type InputFrame = BTreeMap<VehicleId, ControlInputs>;

/// The authoritative set of simulated vehicles.
///
/// Vehicles never interact; each is advanced by its own integrator. A BTreeMap
/// keeps iteration order stable so repeated runs hash identically. Every step
/// is staged on copies and committed only if all vehicles succeed.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    vehicles: BTreeMap<VehicleId, Vehicle>,
    tick: u64,
    elapsed: f64,
    clock: FixedTimestep,
}

impl Simulation {
    /// Empty simulation at tick 0 with the default fixed timestep.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(config: ClockConfig) -> Result<Self, FlightError> {
        Ok(Self {
            clock: FixedTimestep::new(config)?,
            ..Default::default()
        })
    }

    /// Number of fixed or variable steps taken.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn clock(&self) -> &FixedTimestep {
        &self.clock
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn vehicles(&self) -> &BTreeMap<VehicleId, Vehicle> {
        &self.vehicles
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    /// Add a vehicle at the spawn point. Returns its id.
    pub fn spawn(
        &mut self,
        config: FlightConfig,
        layout: RotorLayout,
    ) -> Result<VehicleId, FlightError> {
        let id = VehicleId::new();
        self.spawn_with_id(id, Vehicle::new(config, layout)?);
        Ok(id)
    }

    /// Insert a prebuilt vehicle under a known id, replacing any previous one.
    pub fn spawn_with_id(&mut self, id: VehicleId, vehicle: Vehicle) {
        tracing::info!(
            vehicle = %id.short(),
            strategy = ?vehicle.config().strategy,
            "vehicle spawned"
        );
        self.vehicles.insert(id, vehicle);
    }

    /// Remove a vehicle. Returns it if it existed.
    pub fn remove(&mut self, id: VehicleId) -> Option<Vehicle> {
        let removed = self.vehicles.remove(&id);
        if removed.is_some() {
            tracing::info!(vehicle = %id.short(), "vehicle removed");
        }
        removed
    }

    pub fn reset_vehicle(&mut self, id: VehicleId) -> Result<(), FlightError> {
        self.vehicles
            .get_mut(&id)
            .ok_or(FlightError::UnknownVehicle(id))?
            .reset();
        Ok(())
    }

    /// Advance every vehicle by exactly one fixed tick.
    pub fn step(&mut self, inputs: &InputFrame) -> Result<(), FlightError> {
        let dt = self.clock.step();
        self.advance_all(dt, inputs)
    }

    /// Feed one render frame's delta through the fixed timestep and run the
    /// ticks it yields. Returns how many ticks ran.
    ///
    /// Each tick commits on its own. If a tick is rejected, the ticks before
    /// it stay committed and the time for it and every later tick goes back
    /// into the accumulator, so `tick()` tells the caller how far it got.
    pub fn step_frame(&mut self, frame_dt: f32, inputs: &InputFrame) -> Result<u32, FlightError> {
        self.check_frame(inputs)?;
        let ticks = self.clock.accumulate(frame_dt)?;
        for ran in 0..ticks {
            if let Err(err) = self.step(inputs) {
                self.clock.refund(ticks - ran);
                tracing::warn!(ran, pending = ticks - ran, %err, "tick rejected mid-frame");
                return Err(err);
            }
        }
        Ok(ticks)
    }

    /// Advance every vehicle by an arbitrary slice, coupling physics to the
    /// caller's frame rate.
    pub fn step_variable(&mut self, dt: f32, inputs: &InputFrame) -> Result<(), FlightError> {
        self.advance_all(dt, inputs)
    }

    fn check_frame(&self, inputs: &InputFrame) -> Result<(), FlightError> {
        for (id, input) in inputs {
            if !self.vehicles.contains_key(id) {
                return Err(FlightError::UnknownVehicle(*id));
            }
            check_inputs(input)?;
        }
        Ok(())
    }

    fn advance_all(&mut self, dt: f32, inputs: &InputFrame) -> Result<(), FlightError> {
        let _span = tracing::debug_span!("sim_step", tick = self.tick + 1).entered();
        check_dt(dt)?;
        self.check_frame(inputs)?;

        let mut staged = Vec::with_capacity(self.vehicles.len());
        for (id, vehicle) in &self.vehicles {
            let input = inputs.get(id).copied().unwrap_or_default();
            let mut next = vehicle.clone();
            next.advance(input, dt)?;
            staged.push((*id, next));
        }
        for (id, next) in staged {
            self.vehicles.insert(id, next);
        }

        self.tick += 1;
        self.elapsed += dt as f64;
        tracing::trace!(vehicles = self.vehicles.len(), "sim step complete");
        Ok(())
    }

    /// Deterministic hash over the tick and every vehicle's kinematic state.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        for (id, vehicle) in &self.vehicles {
            let s = vehicle.state();
            mix(&mut h, id.0.as_bytes());
            for v in [s.position, s.velocity, s.orientation, s.angular_velocity] {
                for c in v.to_array() {
                    mix(&mut h, &c.to_le_bytes());
                }
            }
            for a in vehicle.rotors().angles() {
                mix(&mut h, &a.to_le_bytes());
            }
        }
        h
    }
}
