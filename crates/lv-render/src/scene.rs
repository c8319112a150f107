//! Keyed reconciliation of primitives

use indexmap::IndexMap;

use crate::{Primitive, PrimitiveKey, Style};

/// Keys that entered, changed geometry, or left during a reconciliation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDiff {
    pub entered: Vec<PrimitiveKey>,
    pub updated: Vec<PrimitiveKey>,
    pub exited: Vec<PrimitiveKey>,
}

impl SceneDiff {
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.updated.is_empty() && self.exited.is_empty()
    }
}

/// The primitives a view currently shows, in draw order
#[derive(Debug, Clone, Default)]
pub struct Scene {
    primitives: IndexMap<PrimitiveKey, Primitive>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scene with `next`, reporting what changed.
    ///
    /// A key present before and after counts as updated only when its
    /// geometry moved; styles are always taken from `next`.
    pub fn reconcile(&mut self, next: Vec<Primitive>) -> SceneDiff {
        let mut previous = std::mem::take(&mut self.primitives);
        let mut diff = SceneDiff::default();

        for primitive in next {
            match previous.swap_remove(&primitive.key) {
                Some(old) if old.shape != primitive.shape => diff.updated.push(primitive.key.clone()),
                Some(_) => {}
                None => diff.entered.push(primitive.key.clone()),
            }
            self.primitives.insert(primitive.key.clone(), primitive);
        }

        diff.exited = previous.into_keys().collect();
        diff
    }

    /// Insert or replace a single primitive
    pub fn upsert(&mut self, primitive: Primitive) -> SceneDiff {
        let key = primitive.key.clone();
        let mut diff = SceneDiff::default();
        match self.primitives.insert(key.clone(), primitive) {
            Some(_) => diff.updated.push(key),
            None => diff.entered.push(key),
        }
        diff
    }

    pub fn remove(&mut self, key: &PrimitiveKey) -> SceneDiff {
        let mut diff = SceneDiff::default();
        if self.primitives.shift_remove(key).is_some() {
            diff.exited.push(key.clone());
        }
        diff
    }

    /// Change only the paint attributes of an existing primitive
    pub fn set_style(&mut self, key: &PrimitiveKey, style: Style) -> bool {
        match self.primitives.get_mut(key) {
            Some(primitive) => {
                primitive.style = style;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &PrimitiveKey) -> Option<&Primitive> {
        self.primitives.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.values()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Drop everything, returning the keys that left
    pub fn clear(&mut self) -> SceneDiff {
        SceneDiff {
            exited: std::mem::take(&mut self.primitives).into_keys().collect(),
            ..SceneDiff::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;
    use egui::{pos2, Color32};

    fn point(record: usize, x: f32) -> Primitive {
        Primitive::new(
            PrimitiveKey::point(record),
            Shape::Circle { center: pos2(x, 10.0), radius: 3.0 },
            Style::filled(Color32::BLUE, 0.3),
        )
        .for_record(record)
    }

    #[test]
    fn test_reconcile_enter_update_exit() {
        let mut scene = Scene::new();
        let diff = scene.reconcile(vec![point(1, 0.0), point(2, 5.0)]);
        assert_eq!(diff.entered.len(), 2);

        let diff = scene.reconcile(vec![point(2, 6.0), point(3, 1.0)]);
        assert_eq!(diff.entered, vec![PrimitiveKey::point(3)]);
        assert_eq!(diff.updated, vec![PrimitiveKey::point(2)]);
        assert_eq!(diff.exited, vec![PrimitiveKey::point(1)]);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_identical_reconcile_is_empty() {
        let mut scene = Scene::new();
        scene.reconcile(vec![point(1, 0.0), point(2, 5.0)]);
        scene.set_style(&PrimitiveKey::point(1), Style::filled(Color32::RED, 1.0));
        assert!(scene.reconcile(vec![point(1, 0.0), point(2, 5.0)]).is_empty());
        assert_eq!(scene.get(&PrimitiveKey::point(1)).unwrap().style.opacity, 0.3);
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut scene = Scene::new();
        assert_eq!(scene.upsert(point(4, 0.0)).entered.len(), 1);
        assert_eq!(scene.upsert(point(4, 1.0)).updated.len(), 1);
        assert_eq!(scene.remove(&PrimitiveKey::point(4)).exited.len(), 1);
        assert!(scene.remove(&PrimitiveKey::point(4)).is_empty());
        assert!(scene.is_empty());
    }
}
