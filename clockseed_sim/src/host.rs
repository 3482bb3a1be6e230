//! In-memory host: scenes, objects and the registration tables.

use clockseed_env::{
    FieldSpec, HandlerId, HostRegistry, ModifierKind, ObjectId, OperatorSpec, SceneHost, SceneId,
    SeedField, TriggerKind,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A scene as the host stores it.
#[derive(Debug, Clone)]
pub struct SimScene {
    pub id: SceneId,
    pub name: String,

    /// Seed field values; absent means default (0)
    fields: BTreeMap<SeedField, i64>,

    /// Current frame on the timeline
    pub frame_current: i32,

    /// Number of redraw tags received
    pub dirty_count: u64,
}

/// An object with its modifier stack.
#[derive(Debug, Clone)]
pub struct SimObject {
    pub id: ObjectId,
    pub name: String,
    pub modifiers: Vec<ModifierKind>,

    /// Number of update tags received
    pub update_count: u64,
}

/// The simulated host application.
///
/// Implements both collaborator traits: `SceneHost` for the propagation
/// policy and `HostRegistry` for addon registration.
#[derive(Debug, Default)]
pub struct SimHost {
    scenes: Vec<SimScene>,
    objects: Vec<SimObject>,
    active: Option<SceneId>,

    /// Registered property definitions
    schema: BTreeMap<SeedField, FieldSpec>,

    /// Registered operators by id
    operators: HashMap<&'static str, OperatorSpec>,

    /// Active handler subscriptions
    subscriptions: BTreeSet<(TriggerKind, HandlerId)>,

    /// Number of `set_current_frame` calls (forced re-evaluations)
    frame_set_count: u64,
}

impl SimHost {
    /// Creates an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scene with all seed fields at 0. The first scene becomes active.
    pub fn add_scene(&mut self, id: SceneId, name: impl Into<String>) {
        self.scenes.push(SimScene {
            id,
            name: name.into(),
            fields: BTreeMap::new(),
            frame_current: 1,
            dirty_count: 0,
        });
        if self.active.is_none() {
            self.active = Some(id);
        }
    }

    /// Removes a scene.
    pub fn remove_scene(&mut self, id: SceneId) -> bool {
        let before = self.scenes.len();
        self.scenes.retain(|scene| scene.id != id);
        if self.active == Some(id) {
            self.active = self.scenes.first().map(|scene| scene.id);
        }
        self.scenes.len() != before
    }

    /// Adds an object with a modifier stack.
    pub fn add_object(&mut self, id: ObjectId, name: impl Into<String>, modifiers: Vec<ModifierKind>) {
        self.objects.push(SimObject {
            id,
            name: name.into(),
            modifiers,
            update_count: 0,
        });
    }

    /// Makes a scene the active one.
    pub fn set_active(&mut self, id: SceneId) -> bool {
        if self.scene(id).is_some() {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    /// Returns a scene by id.
    pub fn scene(&self, id: SceneId) -> Option<&SimScene> {
        self.scenes.iter().find(|scene| scene.id == id)
    }

    fn scene_mut(&mut self, id: SceneId) -> Option<&mut SimScene> {
        self.scenes.iter_mut().find(|scene| scene.id == id)
    }

    /// Returns an object by id.
    pub fn object(&self, id: ObjectId) -> Option<&SimObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    /// Reads a field by its driver path (`clock_seed`, `hour`, ...).
    pub fn read_path(&self, scene: SceneId, path: &str) -> Result<i64, clockseed_env::EnvError> {
        let field: SeedField = path.parse()?;
        self.field(scene, field)
            .ok_or_else(|| clockseed_env::EnvError::unknown_scene(scene))
    }

    /// Returns true if the field is defined on the scene type.
    pub fn is_defined(&self, field: SeedField) -> bool {
        self.schema.contains_key(&field)
    }

    /// Returns the number of forced frame re-evaluations.
    pub fn frame_set_count(&self) -> u64 {
        self.frame_set_count
    }

    /// Returns the number of objects tagged at least once.
    pub fn tagged_objects(&self) -> usize {
        self.objects.iter().filter(|object| object.update_count > 0).count()
    }

    /// Returns all scenes.
    pub fn all_scenes(&self) -> &[SimScene] {
        &self.scenes
    }

    /// Returns all objects.
    pub fn all_objects(&self) -> &[SimObject] {
        &self.objects
    }
}

impl SceneHost for SimHost {
    fn scenes(&self) -> Vec<SceneId> {
        self.scenes.iter().map(|scene| scene.id).collect()
    }

    fn field(&self, scene: SceneId, field: SeedField) -> Option<i64> {
        let scene = self.scene(scene)?;
        Some(*scene.fields.get(&field).unwrap_or(&FieldSpec::DEFAULT))
    }

    fn set_field(&mut self, scene: SceneId, field: SeedField, value: i64) {
        // Registered properties clamp to their hard bounds
        let value = self.schema.get(&field).map_or(value, |spec| spec.clamp(value));
        if let Some(scene) = self.scene_mut(scene) {
            scene.fields.insert(field, value);
        }
    }

    fn mark_dirty(&mut self, scene: SceneId) {
        if let Some(scene) = self.scene_mut(scene) {
            scene.dirty_count += 1;
        }
    }

    fn objects(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|object| object.id).collect()
    }

    fn modifiers(&self, object: ObjectId) -> Vec<ModifierKind> {
        self.object(object)
            .map(|object| object.modifiers.clone())
            .unwrap_or_default()
    }

    fn mark_object_dirty(&mut self, object: ObjectId) {
        if let Some(object) = self.objects.iter_mut().find(|o| o.id == object) {
            object.update_count += 1;
        }
    }

    fn active_scene(&self) -> Option<SceneId> {
        self.active
    }

    fn current_frame(&self, scene: SceneId) -> Option<i32> {
        self.scene(scene).map(|scene| scene.frame_current)
    }

    fn set_current_frame(&mut self, scene: SceneId, frame: i32) {
        if let Some(scene) = self.scene_mut(scene) {
            scene.frame_current = frame;
            self.frame_set_count += 1;
        }
    }
}

impl HostRegistry for SimHost {
    fn define_fields(&mut self, specs: &[FieldSpec]) -> bool {
        let mut changed = false;
        for spec in specs {
            if !self.schema.contains_key(&spec.field) {
                self.schema.insert(spec.field, *spec);
                changed = true;
            }
        }
        changed
    }

    fn remove_fields(&mut self, fields: &[SeedField]) -> bool {
        let mut changed = false;
        for field in fields {
            if self.schema.remove(field).is_some() {
                changed = true;
                for scene in &mut self.scenes {
                    scene.fields.remove(field);
                }
            }
        }
        changed
    }

    fn register_operator(&mut self, spec: &OperatorSpec) -> bool {
        if self.operators.contains_key(spec.idname) {
            return false;
        }
        self.operators.insert(spec.idname, spec.clone());
        true
    }

    fn unregister_operator(&mut self, idname: &str) -> bool {
        self.operators.remove(idname).is_some()
    }

    fn has_operator(&self, idname: &str) -> bool {
        self.operators.contains_key(idname)
    }

    fn subscribe(&mut self, trigger: TriggerKind, handler: HandlerId) -> bool {
        self.subscriptions.insert((trigger, handler))
    }

    fn unsubscribe(&mut self, trigger: TriggerKind, handler: HandlerId) -> bool {
        self.subscriptions.remove(&(trigger, handler))
    }

    fn is_subscribed(&self, trigger: TriggerKind, handler: HandlerId) -> bool {
        self.subscriptions.contains(&(trigger, handler))
    }
}
