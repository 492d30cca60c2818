//! Read access to per-element attributes of scene objects.
//!
//! Hosts implement [`AttributeSource`] over their own scene graph; [`Scene`]
//! is a small in-memory implementation used by the binary and the tests.

use indexmap::IndexMap;

use crate::types::{Scalar, Vectors};

/// Borrowed attribute data.
#[derive(Debug, Copy, Clone)]
pub enum AttributeValues<'a> {
    Scalar(&'a [f32]),
    Vector(&'a [[f32; 3]]),
}

pub trait AttributeSource {
    /// Values of `attribute` on `object`, `None` when either is unknown.
    fn attribute(&self, object: &str, attribute: &str) -> Option<AttributeValues<'_>>;

    /// Whether `object` carries geometry a material can be applied to.
    fn has_geometry(&self, object: &str) -> bool;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    Mesh,
    /// Lights, cameras, empties: no surface to shade.
    Other,
}

#[derive(Debug, Clone)]
pub enum AttributeData {
    Scalar(Vec<f32>),
    Vector(Vec<[f32; 3]>),
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub kind: ObjectKind,
    pub selected: bool,
    attributes: IndexMap<String, AttributeData>,
}

impl SceneObject {
    fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            selected: false,
            attributes: IndexMap::new(),
        }
    }

    pub fn add_scalar(&mut self, name: String, values: impl Scalar) -> &mut Self {
        self.attributes
            .insert(name, AttributeData::Scalar(Scalar::into(values)));
        self
    }

    pub fn add_vector(&mut self, name: String, values: impl Vectors) -> &mut Self {
        self.attributes
            .insert(name, AttributeData::Vector(Vectors::into(values)));
        self
    }

    pub fn set_selected(&mut self, selected: bool) -> &mut Self {
        self.selected = selected;
        self
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.attributes.keys().map(|k| k.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: IndexMap<String, SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh, replacing any object of the same name.
    pub fn register_mesh(&mut self, name: String) -> &mut SceneObject {
        self.register(name, ObjectKind::Mesh)
    }

    pub fn register_object(&mut self, name: String) -> &mut SceneObject {
        self.register(name, ObjectKind::Other)
    }

    fn register(&mut self, name: String, kind: ObjectKind) -> &mut SceneObject {
        self.objects.insert(name.clone(), SceneObject::new(kind));
        &mut self.objects[&name]
    }

    pub fn get_object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.get(name)
    }

    pub fn get_object_mut(&mut self, name: &str) -> Option<&mut SceneObject> {
        self.objects.get_mut(name)
    }

    /// Meshes a material would be assigned to.
    pub fn meshes(&self, selected_only: bool) -> Vec<&str> {
        self.objects
            .iter()
            .filter(|(_, o)| o.kind == ObjectKind::Mesh && (!selected_only || o.selected))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl AttributeSource for Scene {
    fn attribute(&self, object: &str, attribute: &str) -> Option<AttributeValues<'_>> {
        let data = self.objects.get(object)?.attributes.get(attribute)?;
        Some(match data {
            AttributeData::Scalar(values) => AttributeValues::Scalar(values),
            AttributeData::Vector(values) => AttributeValues::Vector(values),
        })
    }

    fn has_geometry(&self, object: &str) -> bool {
        self.objects
            .get(object)
            .map(|o| o.kind == ObjectKind::Mesh)
            .unwrap_or(false)
    }
}
