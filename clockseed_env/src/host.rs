//! Host collaborator traits: scene mutation and registration.

use crate::fields::{FieldSpec, SeedField};
use crate::types::{HandlerId, ModifierKind, ObjectId, OperatorSpec, SceneId, TriggerKind};

/// Entity-mutation API the propagation policy writes through.
///
/// All enumeration methods may return empty collections; callers treat
/// that as "nothing to update", never as a failure.
///
/// # Fan-out
///
/// ```text
/// Propagator ──sample──► Timestamp ──derive──► Seed
///      │
///      ├── for scene in scenes():  set_field(scene, ..) + mark_dirty(scene)
///      ├── for obj in objects():   mark_object_dirty(obj) if procedural
///      └── active_scene():         set_current_frame(current_frame())
/// ```
pub trait SceneHost {
    /// Returns every scene currently known to the host.
    fn scenes(&self) -> Vec<SceneId>;

    /// Reads a seed field. `None` if the scene is unknown.
    fn field(&self, scene: SceneId, field: SeedField) -> Option<i64>;

    /// Writes a seed field. Unknown scenes are ignored.
    fn set_field(&mut self, scene: SceneId, field: SeedField, value: i64);

    /// Tags a scene for redraw/re-evaluation.
    fn mark_dirty(&mut self, scene: SceneId);

    /// Returns every object known to the host.
    fn objects(&self) -> Vec<ObjectId>;

    /// Returns the kinds of modifiers attached to an object.
    fn modifiers(&self, object: ObjectId) -> Vec<ModifierKind>;

    /// Tags an object for re-evaluation.
    fn mark_object_dirty(&mut self, object: ObjectId);

    /// Returns the scene the user is working in, if any.
    fn active_scene(&self) -> Option<SceneId>;

    /// Returns the scene's current frame.
    fn current_frame(&self, scene: SceneId) -> Option<i32>;

    /// Sets the scene's current frame; triggers dependent recalculation.
    fn set_current_frame(&mut self, scene: SceneId, frame: i32);
}

/// Capability registration against the host.
///
/// Every method is idempotent and reports whether it changed anything:
/// subscribing twice or removing something absent returns `false`.
pub trait HostRegistry {
    /// Adds the seed properties to the host scene type.
    fn define_fields(&mut self, specs: &[FieldSpec]) -> bool;

    /// Removes the seed properties (and their values) from all scenes.
    fn remove_fields(&mut self, fields: &[SeedField]) -> bool;

    /// Registers a user-invokable operator.
    fn register_operator(&mut self, spec: &OperatorSpec) -> bool;

    /// Unregisters an operator by id.
    fn unregister_operator(&mut self, idname: &str) -> bool;

    /// Returns true if the operator is registered.
    fn has_operator(&self, idname: &str) -> bool;

    /// Subscribes a handler to a lifecycle channel.
    fn subscribe(&mut self, trigger: TriggerKind, handler: HandlerId) -> bool;

    /// Unsubscribes a handler from a lifecycle channel.
    fn unsubscribe(&mut self, trigger: TriggerKind, handler: HandlerId) -> bool;

    /// Returns true if the handler is subscribed to the channel.
    fn is_subscribed(&self, trigger: TriggerKind, handler: HandlerId) -> bool;
}
