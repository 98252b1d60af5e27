//! World - central ECS container and phase scheduler

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, trace, warn};
use serde::Serialize;

use super::command::Command;
use super::{CommandQueue, Component, EcsError, Entity, EntityId, LoopPhase, System};

/// Frame timing shared with systems through the world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameClock {
    pub frame: u64,
    pub delta_seconds: f32,
    pub elapsed_seconds: f64,
}

/// Timing and match statistics for one system turn
#[derive(Debug, Clone, Serialize)]
pub struct SystemRunReport {
    pub name: String,
    pub matched: usize,
    pub duration_ms: f64,
}

/// Outcome of a single `process_all` call
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    pub phase: LoopPhase,
    pub systems: Vec<SystemRunReport>,
}

impl PhaseReport {
    fn new(phase: LoopPhase) -> Self {
        Self {
            phase,
            systems: Vec::new(),
        }
    }

    pub fn total_duration_ms(&self) -> f64 {
        self.systems.iter().map(|s| s.duration_ms).sum()
    }
}

struct LiveEntity {
    /// Position in `World::order`.
    seq: u64,
    entity: Entity,
}

struct RegisteredSystem {
    phase: LoopPhase,
    name: String,
    /// Empty while the system is running its own turn.
    system: Option<Box<dyn System>>,
}

/// World holds all live entities and registered systems
pub struct World {
    entities: HashMap<EntityId, LiveEntity>,
    order: BTreeMap<u64, EntityId>,
    next_seq: u64,
    systems: Vec<RegisteredSystem>,
    commands: CommandQueue,
    clock: FrameClock,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
            systems: Vec::new(),
            commands: CommandQueue::new(),
            clock: FrameClock::default(),
        }
    }

    /// Make `entity` live. It takes part in every `Select` step that
    /// starts after this call.
    pub fn add_entity(&mut self, entity: Entity) -> Result<EntityId, EcsError> {
        let id = entity.id();
        if self.entities.contains_key(&id) {
            return Err(EcsError::DuplicateEntity(id));
        }
        debug!("adding entity {id} ({:?})", entity.tag());
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entities.insert(id, LiveEntity { seq, entity });
        self.order.insert(seq, id);
        Ok(id)
    }

    /// Create an empty live entity.
    pub fn spawn(&mut self) -> Result<EntityId, EcsError> {
        self.add_entity(Entity::new())
    }

    /// Drop `id` from the live set and hand the entity back to the caller.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity, EcsError> {
        let live = self
            .entities
            .remove(&id)
            .ok_or(EcsError::EntityNotFound(id))?;
        self.order.remove(&live.seq);
        debug!("removed entity {id}");
        Ok(live.entity)
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity, EcsError> {
        self.try_entity(id).ok_or(EcsError::EntityNotFound(id))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, EcsError> {
        self.try_entity_mut(id).ok_or(EcsError::EntityNotFound(id))
    }

    pub fn try_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id).map(|live| &live.entity)
    }

    pub fn try_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id).map(|live| &mut live.entity)
    }

    pub fn get_component<T: Component>(&self, id: EntityId) -> Result<&T, EcsError> {
        self.entity(id)?.get_component::<T>()
    }

    pub fn get_component_mut<T: Component>(&mut self, id: EntityId) -> Result<&mut T, EcsError> {
        self.entity_mut(id)?.get_component_mut::<T>()
    }

    /// Live entity ids in registration order
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.values().copied()
    }

    /// Live entities in registration order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order.values().filter_map(|id| self.try_entity(*id))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// First live entity carrying `tag`, in registration order.
    pub fn find_by_tag(&self, tag: &str) -> Option<EntityId> {
        self.entities()
            .find(|entity| entity.tag() == Some(tag))
            .map(Entity::id)
    }

    /// Register a system. Systems of the same phase run in registration order.
    pub fn add_system(&mut self, system: impl System + 'static) {
        self.add_boxed_system(Box::new(system));
    }

    /// Systems added while a phase is running join from the next
    /// `process_all` call.
    pub fn add_boxed_system(&mut self, system: Box<dyn System>) {
        let phase = system.loop_phase();
        let name = system.name().to_string();
        debug!("registering system '{name}' for {phase} phase");
        self.systems.push(RegisteredSystem {
            phase,
            name,
            system: Some(system),
        });
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Names of the systems of `phase` in execution order.
    pub fn system_names(&self, phase: LoopPhase) -> Vec<&str> {
        self.systems
            .iter()
            .filter(|registered| registered.phase == phase)
            .map(|registered| registered.name.as_str())
            .collect()
    }

    /// First registered system of type `T`.
    ///
    /// During a phase every other system stays reachable; only the one whose
    /// turn is running cannot see itself here.
    pub fn system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .filter_map(|registered| registered.system.as_deref())
            .find_map(|system| system.as_any().downcast_ref::<T>())
    }

    pub fn system_mut<T: System + 'static>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .filter_map(|registered| registered.system.as_deref_mut())
            .find_map(|system| system.as_any_mut().downcast_mut::<T>())
    }

    /// Queue of mutations applied at the next flush point.
    pub fn commands(&mut self) -> &mut CommandQueue {
        &mut self.commands
    }

    pub fn clock(&self) -> FrameClock {
        self.clock
    }

    /// Start a new frame lasting `delta_seconds`.
    pub fn advance_clock(&mut self, delta_seconds: f32) {
        self.clock.frame += 1;
        self.clock.delta_seconds = delta_seconds;
        self.clock.elapsed_seconds += f64::from(delta_seconds);
    }

    /// Apply every queued command in FIFO order.
    ///
    /// Stops at the first failing command; the rest of the batch is dropped.
    pub fn flush_commands(&mut self) -> Result<usize, EcsError> {
        let commands = self.commands.drain();
        let total = commands.len();
        for (applied, command) in commands.into_iter().enumerate() {
            if let Err(err) = self.apply(command) {
                let dropped = total - applied - 1;
                if dropped > 0 {
                    warn!("discarding {dropped} queued commands after failure: {err}");
                }
                return Err(err);
            }
        }
        Ok(total)
    }

    fn apply(&mut self, command: Command) -> Result<(), EcsError> {
        match command {
            Command::AddEntity(entity) => self.add_entity(entity).map(|_| ()),
            Command::RemoveEntity(id) => self.remove_entity(id).map(|_| ()),
            Command::Edit { entity, edit, .. } => edit(self.entity_mut(entity)?),
        }
    }

    /// Run every system registered for `phase`.
    ///
    /// Each system gets a fresh match set computed against the live set at
    /// the moment its turn starts, so mutations made by earlier systems of
    /// the same call are already visible. The first failing system aborts
    /// the call and its error is returned.
    pub fn process_all(&mut self, phase: LoopPhase) -> Result<PhaseReport> {
        self.flush_commands()
            .with_context(|| format!("failed to apply queued commands before {phase} phase"))?;

        // Anything registered past this point waits for the next call.
        let registered = self.systems.len();
        let mut report = PhaseReport::new(phase);
        for index in 0..registered {
            if self.systems[index].phase != phase {
                continue;
            }
            // Empty only when a system re-enters `process_all` from its own turn.
            let Some(mut system) = self.systems[index].system.take() else {
                continue;
            };
            let outcome = self.run_system(phase, system.as_mut());
            self.systems[index].system = Some(system);
            report.systems.push(outcome?);
        }
        Ok(report)
    }

    fn run_system(&mut self, phase: LoopPhase, system: &mut dyn System) -> Result<SystemRunReport> {
        let start = Instant::now();
        let matched = self.select(&*system);
        trace!("system '{}' matched {} entities", system.name(), matched.len());

        if let Err(err) = system.process(&matched, self) {
            warn!("system '{}' failed during {phase} phase: {err:#}", system.name());
            self.commands.clear();
            return Err(err.context(format!(
                "system '{}' failed during {phase} phase",
                system.name()
            )));
        }
        self.flush_commands().with_context(|| {
            format!("failed to apply commands queued by system '{}'", system.name())
        })?;

        Ok(SystemRunReport {
            name: system.name().to_string(),
            matched: matched.len(),
            duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
        })
    }

    fn select(&self, system: &dyn System) -> Vec<EntityId> {
        self.entities()
            .filter(|entity| system.matches(entity))
            .map(Entity::id)
            .collect()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
