use anyhow::{ensure, Result};
use log::info;
use serde::Serialize;

use crate::ecs::{LoopPhase, PhaseReport, System, World};

pub struct EngineSettings {
    pub name: String,
    /// Fixed simulated duration of one frame, in seconds.
    pub frame_dt: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            name: "frameloop".into(),
            frame_dt: 1.0 / 60.0,
        }
    }
}

pub struct EngineBuilder {
    settings: EngineSettings,
    world: World,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            world: World::new(),
            systems: Vec::new(),
        }
    }

    pub fn with_world(mut self, world: World) -> Self {
        self.world = world;
        self
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    pub fn build(self) -> Engine {
        let mut world = self.world;
        for system in self.systems {
            world.add_boxed_system(system);
        }
        Engine {
            world,
            settings: self.settings,
        }
    }
}

/// Host loop driving the world: one update pass then one render pass per frame.
pub struct Engine {
    world: World,
    settings: EngineSettings,
}

impl Engine {
    pub fn run_frame(&mut self) -> Result<FrameSummary> {
        self.world.advance_clock(self.settings.frame_dt);
        let update = self.world.process_all(LoopPhase::Update)?;
        let render = self.world.process_all(LoopPhase::Render)?;
        let clock = self.world.clock();

        Ok(FrameSummary {
            frame: clock.frame,
            elapsed_seconds: clock.elapsed_seconds,
            live_entities: self.world.entity_count(),
            update,
            render,
        })
    }

    pub fn run(&mut self, frames: u64) -> Result<()> {
        self.run_with_hook(frames, |_| {})
    }

    /// Run `frames` frames, handing each summary to `hook`.
    pub fn run_with_hook<F>(&mut self, frames: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(&FrameSummary),
    {
        ensure!(
            self.settings.frame_dt.is_finite() && self.settings.frame_dt > 0.0,
            "frame_dt must be positive and finite, got {}",
            self.settings.frame_dt
        );
        info!("running '{}' for {frames} frames", self.settings.name);
        for _ in 0..frames {
            let summary = self.run_frame()?;
            hook(&summary);
        }
        info!(
            "'{}' finished at frame {} with {} live entities",
            self.settings.name,
            self.world.clock().frame,
            self.world.entity_count()
        );
        Ok(())
    }

    pub fn current_frame(&self) -> u64 {
        self.world.clock().frame
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FrameSummary {
    pub frame: u64,
    pub elapsed_seconds: f64,
    pub live_entities: usize,
    pub update: PhaseReport,
    pub render: PhaseReport,
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::ecs::{Entity, EntityId};

    /// Writes the frame number it last ran in.
    struct Stamp {
        phase: LoopPhase,
        log: Rc<Cell<(u64, u64)>>,
    }

    impl System for Stamp {
        fn name(&self) -> &str {
            "stamp"
        }

        fn loop_phase(&self) -> LoopPhase {
            self.phase
        }

        fn matches(&self, _entity: &Entity) -> bool {
            false
        }

        fn process(&mut self, _entities: &[EntityId], world: &mut World) -> Result<()> {
            let (update, render) = self.log.get();
            let frame = world.clock().frame;
            match self.phase {
                LoopPhase::Update => {
                    assert_eq!(render, frame - 1, "render ran before update");
                    self.log.set((frame, render));
                }
                _ => {
                    assert_eq!(update, frame, "update did not run first");
                    self.log.set((update, frame));
                }
            }
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_update_runs_before_render_each_frame() {
        let log = Rc::new(Cell::new((0, 0)));
        // Registered render-first to show ordering comes from the phases.
        let mut engine = EngineBuilder::new(EngineSettings::default())
            .with_system(Stamp {
                phase: LoopPhase::Render,
                log: log.clone(),
            })
            .with_system(Stamp {
                phase: LoopPhase::Update,
                log: log.clone(),
            })
            .build();

        engine.run(3).unwrap();

        assert_eq!(log.get(), (3, 3));
        assert_eq!(engine.current_frame(), 3);
    }

    #[test]
    fn test_rejects_non_positive_frame_dt() {
        let mut engine = EngineBuilder::new(EngineSettings {
            name: "broken".into(),
            frame_dt: 0.0,
        })
        .build();

        assert!(engine.run(1).is_err());
        assert_eq!(engine.current_frame(), 0);
    }

    #[test]
    fn test_rejects_infinite_frame_dt() {
        let mut engine = EngineBuilder::new(EngineSettings {
            name: "runaway".into(),
            frame_dt: f32::INFINITY,
        })
        .build();

        let err = engine.run(1).unwrap_err();
        assert!(err.to_string().contains("finite"));
        assert_eq!(engine.current_frame(), 0);
    }
}
