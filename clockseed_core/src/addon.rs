//! Host wiring: fields, the generate operator and event subscriptions.
//!
//! Registration mirrors teardown in reverse, and each step checks whether
//! it is already in place first, so calling either twice is harmless.

use crate::propagator::SeedPropagator;
use clockseed_env::{
    FieldSpec, HandlerId, HostRegistry, OperatorResult, OperatorSpec, SceneHost, SeedContext,
    SeedField, TriggerKind,
};
use tracing::{debug, info};

/// Handler subscribed to playback start.
pub const PLAYBACK_HANDLER: HandlerId = HandlerId("clockseed.playback_start");

/// Handler subscribed to load completion.
pub const LOAD_HANDLER: HandlerId = HandlerId("clockseed.load_complete");

/// Handler subscribed to dependency-graph updates.
pub const STATE_CHANGE_HANDLER: HandlerId = HandlerId("clockseed.state_change");

/// The "Generate New Seed" operator.
pub const GENERATE_OPERATOR: OperatorSpec = OperatorSpec {
    idname: "seed.generate_static",
    label: "Generate New Seed",
    description: "Generate a new static seed based on current system time",
};

/// Returns the handler that listens on a channel.
pub fn handler_for(trigger: TriggerKind) -> HandlerId {
    match trigger {
        TriggerKind::PlaybackStart => PLAYBACK_HANDLER,
        TriggerKind::LoadComplete => LOAD_HANDLER,
        TriggerKind::StateChange => STATE_CHANGE_HANDLER,
    }
}

/// What a register/unregister call actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    pub fields: bool,
    pub operator: bool,
    pub handlers: usize,
}

impl RegistrationReport {
    /// True if the call changed nothing.
    pub fn is_noop(&self) -> bool {
        !self.fields && !self.operator && self.handlers == 0
    }
}

/// Registers the seed generator with a host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedAddon;

impl SeedAddon {
    /// Creates the addon.
    pub fn new() -> Self {
        Self
    }

    /// Defines fields, registers the operator and subscribes all handlers.
    pub fn register<R: HostRegistry>(&self, registry: &mut R) -> RegistrationReport {
        let mut report = RegistrationReport {
            fields: registry.define_fields(&FieldSpec::all()),
            ..Default::default()
        };

        if !registry.has_operator(GENERATE_OPERATOR.idname) {
            report.operator = registry.register_operator(&GENERATE_OPERATOR);
        }

        for trigger in TriggerKind::all() {
            let handler = handler_for(trigger);
            if !registry.is_subscribed(trigger, handler) && registry.subscribe(trigger, handler) {
                report.handlers += 1;
            }
        }

        if report.is_noop() {
            debug!("Seed generator already registered");
        } else {
            info!("Seed generator registered ({} handler(s))", report.handlers);
        }
        report
    }

    /// Unsubscribes handlers, unregisters the operator and removes fields.
    pub fn unregister<R: HostRegistry>(&self, registry: &mut R) -> RegistrationReport {
        let mut report = RegistrationReport::default();

        for trigger in TriggerKind::all() {
            let handler = handler_for(trigger);
            if registry.is_subscribed(trigger, handler) && registry.unsubscribe(trigger, handler) {
                report.handlers += 1;
            }
        }

        if registry.has_operator(GENERATE_OPERATOR.idname) {
            report.operator = registry.unregister_operator(GENERATE_OPERATOR.idname);
        }

        report.fields = registry.remove_fields(&SeedField::ALL);

        if report.is_noop() {
            debug!("Seed generator was not registered");
        } else {
            info!("Seed generator unregistered ({} handler(s))", report.handlers);
        }
        report
    }

    /// Runs the "Generate New Seed" operator.
    pub fn execute_generate<Ctx, H>(&self, propagator: &mut SeedPropagator<Ctx>, host: &mut H) -> OperatorResult
    where
        Ctx: SeedContext,
        H: SceneHost,
    {
        propagator.generate_static(host);
        OperatorResult::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashSet};

    #[derive(Default)]
    struct TestRegistry {
        fields: BTreeSet<SeedField>,
        operators: HashSet<&'static str>,
        handlers: HashSet<(TriggerKind, HandlerId)>,
        subscribe_calls: usize,
    }

    impl HostRegistry for TestRegistry {
        fn define_fields(&mut self, specs: &[FieldSpec]) -> bool {
            let before = self.fields.len();
            self.fields.extend(specs.iter().map(|spec| spec.field));
            self.fields.len() != before
        }

        fn remove_fields(&mut self, fields: &[SeedField]) -> bool {
            let before = self.fields.len();
            for field in fields {
                self.fields.remove(field);
            }
            self.fields.len() != before
        }

        fn register_operator(&mut self, spec: &OperatorSpec) -> bool {
            self.operators.insert(spec.idname)
        }

        fn unregister_operator(&mut self, idname: &str) -> bool {
            self.operators.remove(idname)
        }

        fn has_operator(&self, idname: &str) -> bool {
            self.operators.contains(idname)
        }

        fn subscribe(&mut self, trigger: TriggerKind, handler: HandlerId) -> bool {
            self.subscribe_calls += 1;
            self.handlers.insert((trigger, handler))
        }

        fn unsubscribe(&mut self, trigger: TriggerKind, handler: HandlerId) -> bool {
            self.handlers.remove(&(trigger, handler))
        }

        fn is_subscribed(&self, trigger: TriggerKind, handler: HandlerId) -> bool {
            self.handlers.contains(&(trigger, handler))
        }
    }

    #[test]
    fn test_register_wires_everything() {
        let mut registry = TestRegistry::default();
        let report = SeedAddon::new().register(&mut registry);

        assert!(report.fields);
        assert!(report.operator);
        assert_eq!(report.handlers, 3);
        assert_eq!(registry.fields.len(), 6);
        for trigger in TriggerKind::all() {
            assert!(registry.is_subscribed(trigger, handler_for(trigger)));
        }
    }

    #[test]
    fn test_register_twice_is_noop() {
        let mut registry = TestRegistry::default();
        let addon = SeedAddon::new();

        addon.register(&mut registry);
        let second = addon.register(&mut registry);

        assert!(second.is_noop());
        assert_eq!(registry.handlers.len(), 3);
        // Guard skips the subscribe call entirely
        assert_eq!(registry.subscribe_calls, 3);
    }

    #[test]
    fn test_unregister_twice_is_noop() {
        let mut registry = TestRegistry::default();
        let addon = SeedAddon::new();

        addon.register(&mut registry);
        let first = addon.unregister(&mut registry);
        let second = addon.unregister(&mut registry);

        assert_eq!(first.handlers, 3);
        assert!(first.operator);
        assert!(first.fields);
        assert!(second.is_noop());
        assert!(registry.handlers.is_empty());
        assert!(registry.fields.is_empty());
    }

    #[test]
    fn test_unregister_without_register() {
        let mut registry = TestRegistry::default();
        assert!(SeedAddon::new().unregister(&mut registry).is_noop());
    }

    #[test]
    fn test_handler_ids_distinct() {
        let ids: HashSet<_> = TriggerKind::all().into_iter().map(handler_for).collect();
        assert_eq!(ids.len(), 3);
    }
}
