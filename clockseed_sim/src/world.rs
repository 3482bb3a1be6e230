//! SimWorld - The simulation harness container.

use crate::context::SimContext;
use crate::host::SimHost;

use clockseed_core::addon::handler_for;
use clockseed_core::{
    RegistrationReport, SceneSeeds, SeedAddon, SeedCapture, SeedConfig, SeedPropagator,
    GENERATE_OPERATOR,
};
use clockseed_env::{
    EnvError, HostEvent, HostRegistry, ModifierKind, ObjectId, OperatorResult, SceneHost, SceneId,
    Timestamp,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master seed for the layout and clock RNG
    pub seed: u64,

    /// Number of scenes in the session
    pub num_scenes: usize,

    /// Number of objects in the session
    pub num_objects: usize,

    /// Probability an object carries a procedural modifier
    pub procedural_ratio: f64,

    /// Virtual wall-clock start (random if None)
    pub start_time: Option<Timestamp>,

    /// Propagator configuration
    pub seed_config: SeedConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_scenes: 3,
            num_objects: 8,
            procedural_ratio: 0.5,
            start_time: None,
            seed_config: SeedConfig::default(),
        }
    }
}

/// Event delivery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events routed to a subscribed handler
    pub delivered: u64,

    /// Events with no subscribed handler
    pub dropped: u64,
}

/// The SimWorld - a host session with the seed generator plugged in.
pub struct SimWorld {
    /// Configuration
    pub config: SimConfig,

    /// Shared virtual clock
    pub context: Arc<SimContext>,

    /// Simulated host application
    pub host: SimHost,

    /// Seed propagation policy under test
    propagator: SeedPropagator<SimContext>,

    /// Registration entry point
    addon: SeedAddon,

    /// Deterministic RNG for clock jitter
    rng: ChaCha8Rng,

    stats: DispatchStats,
}

impl SimWorld {
    /// Creates a world with scenes and objects laid out from the config seed.
    ///
    /// The addon is not registered yet; call [`SimWorld::register`].
    pub fn new(config: SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let start = config
            .start_time
            .unwrap_or_else(|| Timestamp::from_millis_since_midnight(rng.gen_range(0..86_400_000)));
        let context = SimContext::shared(start);

        let mut host = SimHost::new();
        for i in 0..config.num_scenes {
            host.add_scene(SceneId::from_seed(i as u64), format!("Scene.{:03}", i));
        }
        for i in 0..config.num_objects {
            let mut modifiers = Vec::new();
            if rng.gen_bool(config.procedural_ratio.clamp(0.0, 1.0)) {
                modifiers.push(ModifierKind::Procedural);
            }
            if rng.gen_bool(0.5) {
                modifiers.push(ModifierKind::Other);
            }
            host.add_object(ObjectId::from_seed(i as u64), format!("Object.{:03}", i), modifiers);
        }

        let propagator = SeedPropagator::with_config(context.clone(), config.seed_config.clone());

        Self {
            config,
            context,
            host,
            propagator,
            addon: SeedAddon::new(),
            rng,
            stats: DispatchStats::default(),
        }
    }

    /// Registers the addon with the host.
    pub fn register(&mut self) -> RegistrationReport {
        self.addon.register(&mut self.host)
    }

    /// Unregisters the addon from the host.
    pub fn unregister(&mut self) -> RegistrationReport {
        self.addon.unregister(&mut self.host)
    }

    /// Delivers a host event if its handler is subscribed.
    pub fn dispatch(&mut self, event: HostEvent) -> Option<SeedCapture> {
        let trigger = event.trigger();
        if !self.host.is_subscribed(trigger, handler_for(trigger)) {
            self.stats.dropped += 1;
            debug!("No handler for {}, event dropped", trigger);
            return None;
        }
        self.stats.delivered += 1;
        self.propagator.handle(&mut self.host, &event)
    }

    /// Simulates the session finishing loading.
    pub fn load(&mut self) -> Option<SeedCapture> {
        self.dispatch(HostEvent::LoadComplete)
    }

    /// Simulates the user pressing play.
    pub fn play(&mut self) -> Option<SeedCapture> {
        self.dispatch(HostEvent::PlaybackStart)
    }

    /// Simulates a dependency-graph update on one scene.
    pub fn depsgraph_update(&mut self, scene: SceneId) -> Option<SeedCapture> {
        self.dispatch(HostEvent::StateChange { scene })
    }

    /// Simulates a dependency-graph update on every scene, in order.
    pub fn depsgraph_update_all(&mut self) -> Vec<Option<SeedCapture>> {
        self.host
            .scenes()
            .into_iter()
            .map(|scene| self.depsgraph_update(scene))
            .collect()
    }

    /// Invokes a registered operator by id.
    pub fn invoke_operator(&mut self, idname: &str) -> Result<OperatorResult, EnvError> {
        if idname != GENERATE_OPERATOR.idname || !self.host.has_operator(idname) {
            return Err(EnvError::UnknownOperator(idname.to_string()));
        }
        Ok(self.addon.execute_generate(&mut self.propagator, &mut self.host))
    }

    /// Advances the virtual clock.
    pub fn advance(&self, duration: Duration) {
        self.context.advance_time(duration);
    }

    /// Advances the virtual clock by a random 1 ms - 10 s step.
    pub fn advance_jitter(&mut self) -> Duration {
        let step = Duration::from_millis(self.rng.gen_range(1..=10_000));
        self.context.advance_time(step);
        step
    }

    /// Reads the seed fields of a scene.
    pub fn seeds(&self, scene: SceneId) -> Option<SceneSeeds> {
        SceneSeeds::read(&self.host, scene)
    }

    /// Reads the seed fields of every scene.
    pub fn all_seeds(&self) -> Vec<(SceneId, SceneSeeds)> {
        self.host
            .scenes()
            .into_iter()
            .filter_map(|scene| self.seeds(scene).map(|seeds| (scene, seeds)))
            .collect()
    }

    /// Returns the propagator.
    pub fn propagator(&self) -> &SeedPropagator<SimContext> {
        &self.propagator
    }

    /// Returns event delivery counters.
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Returns the number of scenes.
    pub fn scene_count(&self) -> usize {
        self.host.all_scenes().len()
    }
}
