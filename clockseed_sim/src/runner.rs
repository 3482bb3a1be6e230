//! Scenario runner - drives a simulated session and checks the outcome.

use crate::exporter::SimExport;
use crate::scenarios::ScenarioId;
use crate::world::{SimConfig, SimWorld};

use clockseed_core::{SceneSeeds, Seed, SeedCapture, SeedConfig};
use clockseed_env::{SceneHost, Timestamp};
use tracing::{debug, info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Virtual wall clock at the end of the run
    pub final_clock: Timestamp,

    /// Number of scenes in the session
    pub scene_count: usize,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Total clock samples
    pub clock_samples: u64,

    /// Events routed to a handler
    pub events_delivered: u64,

    /// Events with no subscribed handler
    pub events_dropped: u64,

    /// Objects tagged for re-evaluation at least once
    pub objects_tagged: usize,

    /// Forced frame re-evaluations
    pub frame_resets: u64,
}

type Check = Result<(), String>;

fn ensure(condition: bool, message: impl FnOnce() -> String) -> Check {
    if condition {
        Ok(())
    } else {
        Err(message())
    }
}

fn delivered(capture: Option<SeedCapture>, event: &str) -> Result<SeedCapture, String> {
    capture.ok_or_else(|| format!("{} event was not delivered", event))
}

/// Runs session scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Number of scenes
    num_scenes: usize,

    /// Number of objects
    num_objects: usize,

    /// Propagator configuration
    seed_config: SeedConfig,

    /// Load/play/generate cycles in the full session
    cycles: usize,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64, num_scenes: usize) -> Self {
        Self {
            seed,
            num_scenes,
            num_objects: 8,
            seed_config: SeedConfig::default(),
            cycles: 6,
        }
    }

    /// Sets the number of objects.
    pub fn with_objects(mut self, num_objects: usize) -> Self {
        self.num_objects = num_objects;
        self
    }

    /// Sets the propagator configuration.
    pub fn with_seed_config(mut self, config: SeedConfig) -> Self {
        self.seed_config = config;
        self
    }

    /// Sets the number of cycles in the full session.
    pub fn with_cycles(mut self, cycles: usize) -> Self {
        self.cycles = cycles;
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        self.run_with_export(scenario).0
    }

    /// Runs a scenario, also returning a frame-by-frame trace.
    pub fn run_with_export(&self, scenario: ScenarioId) -> (ScenarioResult, SimExport) {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        let start = if scenario.fixed_clock() {
            Some(Timestamp::MIDNIGHT)
        } else {
            None
        };
        let mut world = SimWorld::new(SimConfig {
            seed: self.seed,
            num_scenes: self.num_scenes,
            num_objects: self.num_objects,
            start_time: start,
            seed_config: self.seed_config.clone(),
            ..Default::default()
        });
        let mut export = SimExport::new(scenario.name(), self.seed);

        let outcome = match scenario {
            ScenarioId::LoadSession => self.run_load_session(&mut world, &mut export),
            ScenarioId::PlaybackFanout => self.run_playback_fanout(&mut world, &mut export),
            ScenarioId::ManualGenerate => self.run_manual_generate(&mut world, &mut export),
            ScenarioId::LazyInit => self.run_lazy_init(&mut world, &mut export),
            ScenarioId::MidnightSentinel => self.run_midnight_sentinel(&mut world, &mut export),
            ScenarioId::Registration => self.run_registration(&mut world, &mut export),
            ScenarioId::FullSession => self.run_full_session(&mut world, &mut export),
        };

        let failure_reason = outcome.err();
        let passed = failure_reason.is_none();
        if let Some(reason) = &failure_reason {
            warn!("{} failed: {}", scenario.name(), reason);
        }
        export.finalize(passed, failure_reason.clone());

        let stats = world.stats();
        let result = ScenarioResult {
            scenario,
            seed: self.seed,
            passed,
            final_clock: world.context.peek(),
            scene_count: world.scene_count(),
            failure_reason,
            metrics: ScenarioMetrics {
                clock_samples: world.context.sample_count(),
                events_delivered: stats.delivered,
                events_dropped: stats.dropped,
                objects_tagged: world.host.tagged_objects(),
                frame_resets: world.host.frame_set_count(),
            },
        };
        (result, export)
    }

    /// SEED-001: load seeds both slots from one sample.
    fn run_load_session(&self, world: &mut SimWorld, export: &mut SimExport) -> Check {
        world.register();
        let capture = delivered(world.load(), "load")?;
        export.record("load", Some(capture), world);

        ensure(world.context.sample_count() == 1, || {
            format!("load sampled the clock {} times", world.context.sample_count())
        })?;
        for (scene, seeds) in world.all_seeds() {
            ensure(seeds.static_seed == seeds.dynamic_seed, || {
                format!("{}: static {} != dynamic {}", scene, seeds.static_seed, seeds.dynamic_seed)
            })?;
            ensure(seeds.dynamic_matches(&capture), || {
                format!("{}: dynamic fields do not match {}", scene, capture.time)
            })?;
            ensure(capture.seed == Seed::ZERO || seeds.static_initialized(), || {
                format!("{}: static slot still unset", scene)
            })?;
        }

        info!("✓ LoadSession complete: seed={} on {} scene(s)", capture.seed, world.scene_count());
        Ok(())
    }

    /// SEED-002: each play is one sample, fanned out unchanged.
    fn run_playback_fanout(&self, world: &mut SimWorld, export: &mut SimExport) -> Check {
        world.register();

        let mut previous: Option<SeedCapture> = None;
        for round in 1..=2u64 {
            let capture = delivered(world.play(), "playback")?;
            export.record("play", Some(capture), world);

            ensure(world.context.sample_count() == round, || {
                format!("{} play(s) took {} samples", round, world.context.sample_count())
            })?;
            for (scene, seeds) in world.all_seeds() {
                ensure(seeds.dynamic_matches(&capture), || {
                    format!("{}: dynamic {} != {}", scene, seeds.dynamic_seed, capture.seed)
                })?;
                ensure(seeds.static_seed == 0, || {
                    format!("{}: playback touched static seed", scene)
                })?;
            }
            if let Some(prev) = previous {
                ensure(prev.seed != capture.seed, || {
                    "second playback reused the first seed".to_string()
                })?;
            }
            previous = Some(capture);

            let step = world.advance_jitter();
            debug!("  round {} seed={} | advanced {:?}", round, capture.seed, step);
        }

        info!("✓ PlaybackFanout complete: {} scene(s) in lockstep", world.scene_count());
        Ok(())
    }

    /// SEED-003: explicit generation.
    fn run_manual_generate(&self, world: &mut SimWorld, export: &mut SimExport) -> Check {
        world.register();
        let loaded = delivered(world.load(), "load")?;
        export.record("load", Some(loaded), world);
        world.advance_jitter();

        world
            .invoke_operator(clockseed_core::GENERATE_OPERATOR.idname)
            .map_err(|e| e.to_string())?;
        let capture = world
            .propagator()
            .last_captured()
            .copied()
            .ok_or("generate did not populate the cache")?;
        export.record("generate", Some(capture), world);

        let samples = world.context.sample_count();
        ensure(samples == 2, || format!("expected 2 samples, saw {}", samples))?;

        // Repeated cache reads must not touch the clock
        for _ in 0..3 {
            ensure(world.propagator().stored_seed() == capture.seed, || {
                "cached seed changed between reads".to_string()
            })?;
        }
        ensure(world.context.sample_count() == samples, || {
            "cache read sampled the clock".to_string()
        })?;

        for (scene, seeds) in world.all_seeds() {
            ensure(seeds.static_seed == capture.seed.as_field(), || {
                format!("{}: static {} != {}", scene, seeds.static_seed, capture.seed)
            })?;
            ensure(seeds.dynamic_matches(&loaded), || {
                format!("{}: generate touched the dynamic slot", scene)
            })?;
        }

        let config = world.propagator().config().clone();
        let procedural = world
            .host
            .all_objects()
            .iter()
            .filter(|object| object.modifiers.iter().any(|kind| kind.is_procedural()))
            .count();
        let expected_tagged = if config.tag_procedural_objects { procedural } else { 0 };
        ensure(world.host.tagged_objects() == expected_tagged, || {
            format!(
                "tagged {} object(s), expected {}",
                world.host.tagged_objects(),
                expected_tagged
            )
        })?;

        let expected_resets =
            u64::from(config.refresh_frame_on_generate && world.host.active_scene().is_some());
        ensure(world.host.frame_set_count() == expected_resets, || {
            format!("frame re-set {} time(s)", world.host.frame_set_count())
        })?;

        info!(
            "✓ ManualGenerate complete: seed={} | {} procedural object(s) tagged",
            capture.seed, expected_tagged
        );
        Ok(())
    }

    /// SEED-004: lazy initialization happens once per scene.
    fn run_lazy_init(&self, world: &mut SimWorld, export: &mut SimExport) -> Check {
        world.register();

        let first = world.depsgraph_update_all();
        export.record("depsgraph", first.iter().flatten().next().copied(), world);

        if !world.propagator().config().lazy_init {
            ensure(first.iter().all(Option::is_none), || {
                "lazy init ran while disabled".to_string()
            })?;
            info!("✓ LazyInit complete: disabled by config");
            return Ok(());
        }

        ensure(first.iter().all(Option::is_some), || {
            "a zeroed scene was not initialized".to_string()
        })?;
        let after_first: Vec<(_, SceneSeeds)> = world.all_seeds();
        let samples = world.context.sample_count();
        ensure(samples == world.scene_count() as u64, || {
            format!("{} scene(s) took {} samples", world.scene_count(), samples)
        })?;

        world.advance_jitter();
        let second = world.depsgraph_update_all();
        export.record("depsgraph", None, world);

        let midnight_hit = first.iter().flatten().any(|capture| capture.seed == Seed::ZERO);
        if !midnight_hit {
            ensure(second.iter().all(Option::is_none), || {
                "initialized scene was re-initialized".to_string()
            })?;
            ensure(world.context.sample_count() == samples, || {
                "idle update sampled the clock".to_string()
            })?;
            ensure(world.all_seeds() == after_first, || {
                "idle update changed seed fields".to_string()
            })?;
        }

        info!("✓ LazyInit complete: {} scene(s) initialized once", world.scene_count());
        Ok(())
    }

    /// SEED-005: documents the midnight/sentinel collision.
    fn run_midnight_sentinel(&self, world: &mut SimWorld, export: &mut SimExport) -> Check {
        world.register();
        let scene = world
            .host
            .scenes()
            .first()
            .copied()
            .ok_or("scenario needs at least one scene")?;

        for _ in 0..2 {
            let capture = delivered(world.depsgraph_update(scene), "state change")?;
            export.record("depsgraph", Some(capture), world);
            ensure(capture.seed == Seed::ZERO, || {
                format!("clock pinned at midnight produced {}", capture.seed)
            })?;
        }

        ensure(world.context.sample_count() == 2, || {
            "midnight seed was not treated as uninitialized".to_string()
        })?;

        info!("✓ MidnightSentinel complete: seed 0 re-initialized on every update");
        Ok(())
    }

    /// SEED-006: idempotent registration and teardown.
    fn run_registration(&self, world: &mut SimWorld, export: &mut SimExport) -> Check {
        let first = world.register();
        let second = world.register();
        ensure(first.handlers == 3 && second.is_noop(), || {
            format!("register reports {:?} then {:?}", first, second)
        })?;

        let down = world.unregister();
        let again = world.unregister();
        ensure(down.handlers == 3 && again.is_noop(), || {
            format!("unregister reports {:?} then {:?}", down, again)
        })?;

        let dropped = [world.load(), world.play()];
        export.record("after_unregister", None, world);
        ensure(dropped.iter().all(Option::is_none), || {
            "event delivered after unregister".to_string()
        })?;
        ensure(world.context.sample_count() == 0, || {
            "clock sampled with no handlers".to_string()
        })?;
        ensure(world.invoke_operator(clockseed_core::GENERATE_OPERATOR.idname).is_err(), || {
            "operator still callable after unregister".to_string()
        })?;

        world.register();
        let capture = delivered(world.play(), "playback")?;
        export.record("play", Some(capture), world);

        info!("✓ Registration complete: {} event(s) dropped while unregistered", world.stats().dropped);
        Ok(())
    }

    /// SEED-007: a realistic session with interleaved events.
    fn run_full_session(&self, world: &mut SimWorld, export: &mut SimExport) -> Check {
        world.register();
        let loaded = delivered(world.load(), "load")?;
        export.record("load", Some(loaded), world);

        let mut expected_samples = 1;
        let mut static_seed = loaded.seed;

        for cycle in 0..self.cycles {
            world.advance_jitter();
            let played = delivered(world.play(), "playback")?;
            export.record("play", Some(played), world);
            expected_samples += 1;

            if cycle % 2 == 0 {
                world.advance_jitter();
                world
                    .invoke_operator(clockseed_core::GENERATE_OPERATOR.idname)
                    .map_err(|e| e.to_string())?;
                static_seed = world.propagator().stored_seed();
                export.record("generate", world.propagator().last_captured().copied(), world);
                expected_samples += 1;
            }

            let lazy = world.depsgraph_update_all();
            if static_seed != Seed::ZERO && played.seed != Seed::ZERO {
                ensure(lazy.iter().all(Option::is_none), || {
                    format!("cycle {}: initialized scenes re-initialized", cycle)
                })?;
            } else {
                expected_samples += lazy.iter().flatten().count() as u64;
            }

            for (scene, seeds) in world.all_seeds() {
                ensure(seeds.static_seed == static_seed.as_field(), || {
                    format!("cycle {} {}: static {} != {}", cycle, scene, seeds.static_seed, static_seed)
                })?;
                ensure(seeds.dynamic_matches(&played), || {
                    format!("cycle {} {}: dynamic out of sync", cycle, scene)
                })?;
            }
            debug!("  cycle {} | static={} dynamic={}", cycle, static_seed, played.seed);
        }

        ensure(world.context.sample_count() == expected_samples, || {
            format!(
                "expected {} samples, saw {}",
                expected_samples,
                world.context.sample_count()
            )
        })?;

        info!(
            "✓ FullSession complete: {} cycle(s), {} clock samples",
            self.cycles, expected_samples
        );
        Ok(())
    }
}
