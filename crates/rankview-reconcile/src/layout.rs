use std::collections::HashMap;

use rankview_core::traits::{LayoutProvider, Rect};
use rankview_core::types::{ItemId, ResultSet};

/// Single-column list where every row has the same height: the item at
/// index `i` sits at `top = i * row_height`.
#[derive(Debug, Clone, Default)]
pub struct StackedLayout {
    row_height: f64,
    index: HashMap<ItemId, usize>,
}

impl StackedLayout {
    pub fn new<'a, I>(ids: I, row_height: f64) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let index = ids.into_iter().enumerate().map(|(i, id)| (id.to_string(), i)).collect();
        Self { row_height, index }
    }

    pub fn for_set(set: &ResultSet, row_height: f64) -> Self { Self::new(set.ids(), row_height) }
}

impl LayoutProvider for StackedLayout {
    fn rect(&self, item_id: &str) -> Option<Rect> {
        self.index.get(item_id).map(|&i| Rect { top: i as f64 * self.row_height, height: self.row_height })
    }
}
