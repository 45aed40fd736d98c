use std::collections::HashMap;

use rankview_core::traits::{LayoutProvider, Rect};
use rankview_core::types::ItemId;

/// Layout boxes of a set of items at one point in time. Ids the surface did
/// not report are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionSnapshot {
    order: Vec<ItemId>,
    rects: HashMap<ItemId, Rect>,
}

impl PositionSnapshot {
    pub fn capture<'a, I>(ids: I, layout: &dyn LayoutProvider) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut snapshot = Self::default();
        for id in ids {
            if let Some(rect) = layout.rect(id) { snapshot.insert(id.to_string(), rect); }
        }
        snapshot
    }

    pub fn insert(&mut self, id: ItemId, rect: Rect) {
        if self.rects.insert(id.clone(), rect).is_none() { self.order.push(id); }
    }

    pub fn get(&self, id: &str) -> Option<Rect> { self.rects.get(id).copied() }
    pub fn len(&self) -> usize { self.order.len() }
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    /// Ids in capture order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ { self.order.iter().map(String::as_str) }
}
