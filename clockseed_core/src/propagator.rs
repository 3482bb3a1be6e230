//! Propagation Policy - when to sample the clock and where the seed goes.
//!
//! # Entry points
//!
//! ```text
//!  trigger              samples   static_seed   dynamic + components   extra
//!  ───────────────────  ────────  ────────────  ─────────────────────  ─────────────────────────
//!  generate_static      always    all scenes    -                      cache, tag procedural
//!                                                                      objects, re-set frame
//!  on_playback_start    always    -             all scenes             -
//!  on_load_complete     always    all scenes    all scenes             -
//!  on_state_change      if a slot -> only if 0  -> only if 0           -
//!                       is 0
//! ```
//!
//! Every entry point samples the clock at most once and fans the same
//! capture out to all scenes.

use crate::config::SeedConfig;
use crate::seed::{Seed, SeedCapture};
use crate::state::UNSET;
use clockseed_env::{HostEvent, SceneHost, SceneId, SeedContext, SeedField};
use std::sync::Arc;
use tracing::{debug, info};

/// Stateful coordinator that writes time-derived seeds onto host scenes.
///
/// Owns the last explicitly generated capture, so repeated reads return the
/// value of the last "Generate New Seed" without touching the clock.
pub struct SeedPropagator<Ctx: SeedContext> {
    /// Clock source
    context: Arc<Ctx>,

    /// Configuration
    config: SeedConfig,

    /// Last explicitly generated seed, if any
    last_captured: Option<SeedCapture>,
}

impl<Ctx: SeedContext> SeedPropagator<Ctx> {
    /// Creates a propagator with the default configuration.
    pub fn new(context: Arc<Ctx>) -> Self {
        Self::with_config(context, SeedConfig::default())
    }

    /// Creates a propagator with the given configuration.
    pub fn with_config(context: Arc<Ctx>, config: SeedConfig) -> Self {
        debug!("Seed propagator on {} clock: {:?}", context.name(), config);
        Self {
            context,
            config,
            last_captured: None,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Returns the clock context.
    pub fn context(&self) -> &Arc<Ctx> {
        &self.context
    }

    /// Returns the last explicitly generated capture, if any.
    pub fn last_captured(&self) -> Option<&SeedCapture> {
        self.last_captured.as_ref()
    }

    /// Returns the last explicitly generated seed, or 0 if none yet.
    pub fn stored_seed(&self) -> Seed {
        self.last_captured.map_or(Seed::ZERO, |capture| capture.seed)
    }

    /// Samples the clock once.
    fn sample(&self) -> SeedCapture {
        SeedCapture::from_time(self.context.local_time())
    }

    /// Routes a host event to its entry point.
    pub fn handle<H: SceneHost>(&mut self, host: &mut H, event: &HostEvent) -> Option<SeedCapture> {
        match *event {
            HostEvent::PlaybackStart => Some(self.on_playback_start(host)),
            HostEvent::LoadComplete => Some(self.on_load_complete(host)),
            HostEvent::StateChange { scene } => self.on_state_change(host, scene),
        }
    }

    /// Explicit "Generate New Seed" action.
    ///
    /// Caches the capture before any scene is written, then updates
    /// `static_seed` everywhere and forces dependents to re-evaluate.
    pub fn generate_static<H: SceneHost>(&mut self, host: &mut H) -> SeedCapture {
        let capture = self.sample();
        self.last_captured = Some(capture);

        let scenes = host.scenes();
        for &scene in &scenes {
            host.set_field(scene, SeedField::StaticSeed, capture.seed.as_field());
            host.mark_dirty(scene);
        }

        let mut tagged = 0;
        if self.config.tag_procedural_objects {
            for object in host.objects() {
                if host.modifiers(object).iter().any(|kind| kind.is_procedural()) {
                    host.mark_object_dirty(object);
                    tagged += 1;
                }
            }
        }

        if self.config.refresh_frame_on_generate {
            if let Some(active) = host.active_scene() {
                if let Some(frame) = host.current_frame(active) {
                    host.set_current_frame(active, frame);
                }
            }
        }

        info!(
            "Manual generation: seed={} ({}) -> {} scene(s), {} procedural object(s)",
            capture.seed,
            capture.time,
            scenes.len(),
            tagged
        );
        capture
    }

    /// Playback started: refresh the dynamic slot on every scene.
    pub fn on_playback_start<H: SceneHost>(&mut self, host: &mut H) -> SeedCapture {
        let capture = self.sample();

        let scenes = host.scenes();
        for &scene in &scenes {
            write_dynamic(host, scene, &capture);
            host.mark_dirty(scene);
        }

        info!(
            "Playback started: seed={} ({}) -> {} scene(s)",
            capture.seed,
            capture.time,
            scenes.len()
        );
        capture
    }

    /// Session loaded: reset both slots on every scene from one sample.
    pub fn on_load_complete<H: SceneHost>(&mut self, host: &mut H) -> SeedCapture {
        let capture = self.sample();

        let scenes = host.scenes();
        for &scene in &scenes {
            host.set_field(scene, SeedField::StaticSeed, capture.seed.as_field());
            write_dynamic(host, scene, &capture);
        }

        info!(
            "File loaded: seed={} ({}) -> {} scene(s)",
            capture.seed,
            capture.time,
            scenes.len()
        );
        capture
    }

    /// State change on one scene: initialize slots still at the sentinel.
    ///
    /// Does nothing, and does not sample the clock, once both slots are
    /// non-zero. Returns the capture only if something was written.
    pub fn on_state_change<H: SceneHost>(&mut self, host: &mut H, scene: SceneId) -> Option<SeedCapture> {
        if !self.config.lazy_init {
            return None;
        }

        let static_unset = host.field(scene, SeedField::StaticSeed)? == UNSET;
        let dynamic_unset = host.field(scene, SeedField::DynamicSeed)? == UNSET;
        if !static_unset && !dynamic_unset {
            return None;
        }

        let capture = self.sample();
        if static_unset {
            host.set_field(scene, SeedField::StaticSeed, capture.seed.as_field());
        }
        if dynamic_unset {
            write_dynamic(host, scene, &capture);
        }

        debug!(
            "Lazy init {}: seed={} static={} dynamic={}",
            scene, capture.seed, static_unset, dynamic_unset
        );
        Some(capture)
    }
}

/// Writes the dynamic seed and its four components.
fn write_dynamic<H: SceneHost>(host: &mut H, scene: SceneId, capture: &SeedCapture) {
    host.set_field(scene, SeedField::DynamicSeed, capture.seed.as_field());
    host.set_field(scene, SeedField::Hour, capture.time.hour.into());
    host.set_field(scene, SeedField::Minute, capture.time.minute.into());
    host.set_field(scene, SeedField::Second, capture.time.second.into());
    host.set_field(scene, SeedField::Millisecond, capture.time.millisecond.into());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SceneSeeds;
    use clockseed_env::{ModifierKind, ObjectId, Timestamp};
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// Clock returning a scripted time and counting samples.
    struct ScriptedClock {
        now: Mutex<Timestamp>,
        samples: Mutex<usize>,
    }

    impl ScriptedClock {
        fn at(h: u8, m: u8, s: u8, ms: u16) -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(Timestamp::new(h, m, s, ms).unwrap()),
                samples: Mutex::new(0),
            })
        }

        fn set(&self, h: u8, m: u8, s: u8, ms: u16) {
            *self.now.lock().unwrap() = Timestamp::new(h, m, s, ms).unwrap();
        }

        fn samples(&self) -> usize {
            *self.samples.lock().unwrap()
        }
    }

    impl SeedContext for ScriptedClock {
        fn local_time(&self) -> Timestamp {
            *self.samples.lock().unwrap() += 1;
            *self.now.lock().unwrap()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[derive(Default)]
    struct TestHost {
        scenes: Vec<SceneId>,
        fields: HashMap<(SceneId, SeedField), i64>,
        dirty: HashSet<SceneId>,
        objects: Vec<(ObjectId, Vec<ModifierKind>)>,
        dirty_objects: HashSet<ObjectId>,
        active: Option<SceneId>,
        frame: i32,
        frame_sets: usize,
    }

    impl TestHost {
        fn with_scenes(n: u64) -> Self {
            let scenes: Vec<SceneId> = (0..n).map(SceneId::from_seed).collect();
            Self {
                active: scenes.first().copied(),
                scenes,
                frame: 12,
                ..Default::default()
            }
        }

        fn seeds(&self, scene: SceneId) -> SceneSeeds {
            SceneSeeds::read(self, scene).unwrap()
        }
    }

    impl SceneHost for TestHost {
        fn scenes(&self) -> Vec<SceneId> {
            self.scenes.clone()
        }

        fn field(&self, scene: SceneId, field: SeedField) -> Option<i64> {
            if !self.scenes.contains(&scene) {
                return None;
            }
            Some(*self.fields.get(&(scene, field)).unwrap_or(&0))
        }

        fn set_field(&mut self, scene: SceneId, field: SeedField, value: i64) {
            if self.scenes.contains(&scene) {
                self.fields.insert((scene, field), value);
            }
        }

        fn mark_dirty(&mut self, scene: SceneId) {
            self.dirty.insert(scene);
        }

        fn objects(&self) -> Vec<ObjectId> {
            self.objects.iter().map(|(id, _)| *id).collect()
        }

        fn modifiers(&self, object: ObjectId) -> Vec<ModifierKind> {
            self.objects
                .iter()
                .find(|(id, _)| *id == object)
                .map(|(_, mods)| mods.clone())
                .unwrap_or_default()
        }

        fn mark_object_dirty(&mut self, object: ObjectId) {
            self.dirty_objects.insert(object);
        }

        fn active_scene(&self) -> Option<SceneId> {
            self.active
        }

        fn current_frame(&self, _scene: SceneId) -> Option<i32> {
            Some(self.frame)
        }

        fn set_current_frame(&mut self, _scene: SceneId, frame: i32) {
            self.frame = frame;
            self.frame_sets += 1;
        }
    }

    #[test]
    fn test_playback_fans_out_single_sample() {
        let clock = ScriptedClock::at(14, 30, 45, 123);
        let mut propagator = SeedPropagator::new(clock.clone());
        let mut host = TestHost::with_scenes(3);

        let capture = propagator.on_playback_start(&mut host);

        assert_eq!(clock.samples(), 1);
        assert_eq!(capture.seed, Seed(143_045_123));
        for &scene in &host.scenes {
            let seeds = host.seeds(scene);
            assert!(seeds.dynamic_matches(&capture));
            assert_eq!(seeds.static_seed, 0);
            assert!(host.dirty.contains(&scene));
        }
    }

    #[test]
    fn test_playback_ignores_cache() {
        let clock = ScriptedClock::at(9, 0, 0, 0);
        let mut propagator = SeedPropagator::new(clock.clone());
        let mut host = TestHost::with_scenes(1);

        propagator.generate_static(&mut host);
        clock.set(9, 0, 5, 0);
        let capture = propagator.on_playback_start(&mut host);

        assert_eq!(capture.seed, Seed(90_005_000));
        assert_eq!(propagator.stored_seed(), Seed(90_000_000));
    }

    #[test]
    fn test_generate_updates_cache_before_reads() {
        let clock = ScriptedClock::at(8, 15, 0, 42);
        let mut propagator = SeedPropagator::new(clock.clone());
        let mut host = TestHost::with_scenes(2);

        assert_eq!(propagator.stored_seed(), Seed::ZERO);
        assert!(propagator.last_captured().is_none());

        let capture = propagator.generate_static(&mut host);
        assert_eq!(clock.samples(), 1);

        // Cache reads never sample the clock
        clock.set(20, 0, 0, 0);
        assert_eq!(propagator.stored_seed(), capture.seed);
        assert_eq!(propagator.last_captured(), Some(&capture));
        assert_eq!(clock.samples(), 1);

        for &scene in &host.scenes {
            let seeds = host.seeds(scene);
            assert_eq!(seeds.static_seed, capture.seed.as_field());
            assert_eq!(seeds.dynamic_seed, 0);
            assert!(host.dirty.contains(&scene));
        }
    }

    #[test]
    fn test_generate_tags_only_procedural_objects() {
        let clock = ScriptedClock::at(8, 15, 0, 42);
        let mut propagator = SeedPropagator::new(clock);
        let mut host = TestHost::with_scenes(1);

        let procedural = ObjectId::from_seed(1);
        let mixed = ObjectId::from_seed(2);
        let plain = ObjectId::from_seed(3);
        let bare = ObjectId::from_seed(4);
        host.objects = vec![
            (procedural, vec![ModifierKind::Procedural]),
            (mixed, vec![ModifierKind::Other, ModifierKind::Procedural]),
            (plain, vec![ModifierKind::Other]),
            (bare, vec![]),
        ];

        propagator.generate_static(&mut host);

        assert!(host.dirty_objects.contains(&procedural));
        assert!(host.dirty_objects.contains(&mixed));
        assert!(!host.dirty_objects.contains(&plain));
        assert!(!host.dirty_objects.contains(&bare));
    }

    #[test]
    fn test_generate_resets_active_frame() {
        let clock = ScriptedClock::at(8, 15, 0, 42);
        let mut propagator = SeedPropagator::new(clock);
        let mut host = TestHost::with_scenes(1);

        propagator.generate_static(&mut host);

        assert_eq!(host.frame_sets, 1);
        assert_eq!(host.frame, 12);
    }

    #[test]
    fn test_generate_respects_config() {
        let clock = ScriptedClock::at(8, 15, 0, 42);
        let config = SeedConfig {
            refresh_frame_on_generate: false,
            tag_procedural_objects: false,
            ..Default::default()
        };
        let mut propagator = SeedPropagator::with_config(clock, config);
        let mut host = TestHost::with_scenes(1);
        host.objects = vec![(ObjectId::from_seed(1), vec![ModifierKind::Procedural])];

        propagator.generate_static(&mut host);

        assert_eq!(host.frame_sets, 0);
        assert!(host.dirty_objects.is_empty());
    }

    #[test]
    fn test_load_sets_both_slots_from_one_sample() {
        let clock = ScriptedClock::at(14, 30, 45, 123);
        let mut propagator = SeedPropagator::new(clock.clone());
        let mut host = TestHost::with_scenes(2);

        let capture = propagator.on_load_complete(&mut host);

        assert_eq!(clock.samples(), 1);
        for &scene in &host.scenes {
            let seeds = host.seeds(scene);
            assert_eq!(seeds.static_seed, seeds.dynamic_seed);
            assert_ne!(seeds.static_seed, 0);
            assert!(seeds.dynamic_matches(&capture));
        }
        // Load does not touch the explicit-generation cache
        assert!(propagator.last_captured().is_none());
    }

    #[test]
    fn test_load_overwrites_existing_values() {
        let clock = ScriptedClock::at(1, 0, 0, 0);
        let mut propagator = SeedPropagator::new(clock.clone());
        let mut host = TestHost::with_scenes(1);
        let scene = host.scenes[0];

        propagator.on_load_complete(&mut host);
        clock.set(2, 0, 0, 0);
        propagator.on_load_complete(&mut host);

        assert_eq!(host.seeds(scene).static_seed, 20_000_000);
    }

    #[test]
    fn test_state_change_initializes_then_idles() {
        let clock = ScriptedClock::at(10, 20, 30, 40);
        let mut propagator = SeedPropagator::new(clock.clone());
        let mut host = TestHost::with_scenes(1);
        let scene = host.scenes[0];

        let first = propagator.on_state_change(&mut host, scene);
        assert!(first.is_some());
        assert_eq!(clock.samples(), 1);
        let after_first = host.seeds(scene);

        clock.set(11, 0, 0, 0);
        let second = propagator.on_state_change(&mut host, scene);

        assert!(second.is_none());
        assert_eq!(clock.samples(), 1);
        assert_eq!(host.seeds(scene), after_first);
    }

    #[test]
    fn test_state_change_fills_only_unset_slot() {
        let clock = ScriptedClock::at(10, 20, 30, 40);
        let mut propagator = SeedPropagator::new(clock.clone());
        let mut host = TestHost::with_scenes(1);
        let scene = host.scenes[0];
        host.set_field(scene, SeedField::StaticSeed, 5);

        propagator.on_state_change(&mut host, scene);

        let seeds = host.seeds(scene);
        assert_eq!(seeds.static_seed, 5);
        assert_eq!(seeds.dynamic_seed, 102_030_040);
        assert_eq!(seeds.hour, 10);
        assert_eq!(seeds.millisecond, 40);
    }

    #[test]
    fn test_state_change_static_only_keeps_components() {
        let clock = ScriptedClock::at(10, 20, 30, 40);
        let mut propagator = SeedPropagator::new(clock);
        let mut host = TestHost::with_scenes(1);
        let scene = host.scenes[0];
        host.set_field(scene, SeedField::DynamicSeed, 7);
        host.set_field(scene, SeedField::Hour, 3);

        propagator.on_state_change(&mut host, scene);

        let seeds = host.seeds(scene);
        assert_eq!(seeds.static_seed, 102_030_040);
        assert_eq!(seeds.dynamic_seed, 7);
        assert_eq!(seeds.hour, 3);
    }

    #[test]
    fn test_state_change_at_midnight_keeps_reinitializing() {
        // Known limitation: a midnight seed equals the sentinel
        let clock = ScriptedClock::at(0, 0, 0, 0);
        let mut propagator = SeedPropagator::new(clock.clone());
        let mut host = TestHost::with_scenes(1);
        let scene = host.scenes[0];

        propagator.on_state_change(&mut host, scene);
        propagator.on_state_change(&mut host, scene);

        assert_eq!(clock.samples(), 2);
        assert_eq!(host.seeds(scene).static_seed, 0);
    }

    #[test]
    fn test_state_change_unknown_scene_is_noop() {
        let clock = ScriptedClock::at(10, 0, 0, 0);
        let mut propagator = SeedPropagator::new(clock.clone());
        let mut host = TestHost::with_scenes(1);

        let result = propagator.on_state_change(&mut host, SceneId::from_seed(99));

        assert!(result.is_none());
        assert_eq!(clock.samples(), 0);
    }

    #[test]
    fn test_state_change_disabled() {
        let clock = ScriptedClock::at(10, 0, 0, 0);
        let config = SeedConfig {
            lazy_init: false,
            ..Default::default()
        };
        let mut propagator = SeedPropagator::with_config(clock.clone(), config);
        let mut host = TestHost::with_scenes(1);
        let scene = host.scenes[0];

        assert!(propagator.on_state_change(&mut host, scene).is_none());
        assert_eq!(host.seeds(scene), SceneSeeds::default());
        assert_eq!(clock.samples(), 0);
    }

    #[test]
    fn test_empty_host_is_silent_noop() {
        let clock = ScriptedClock::at(10, 0, 0, 0);
        let mut propagator = SeedPropagator::new(clock);
        let mut host = TestHost::default();

        propagator.on_playback_start(&mut host);
        propagator.on_load_complete(&mut host);
        let capture = propagator.generate_static(&mut host);

        assert!(host.fields.is_empty());
        assert_eq!(host.frame_sets, 0);
        assert_eq!(propagator.stored_seed(), capture.seed);
    }

    #[test]
    fn test_handle_routes_events() {
        let clock = ScriptedClock::at(10, 0, 0, 1);
        let mut propagator = SeedPropagator::new(clock);
        let mut host = TestHost::with_scenes(1);
        let scene = host.scenes[0];

        let lazy = propagator.handle(&mut host, &HostEvent::StateChange { scene });
        assert!(lazy.is_some());
        assert!(propagator.handle(&mut host, &HostEvent::StateChange { scene }).is_none());

        let played = propagator.handle(&mut host, &HostEvent::PlaybackStart).unwrap();
        assert!(host.seeds(scene).dynamic_matches(&played));

        let loaded = propagator.handle(&mut host, &HostEvent::LoadComplete).unwrap();
        assert_eq!(host.seeds(scene).static_seed, loaded.seed.as_field());
    }
}
