use compact_str::CompactString;
use serde::Deserialize;

/// Index into the arena `Vec<Item>`. Uses u32 to keep placement tables small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

impl ItemId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One element to place. Only the natural box is read by the engine;
/// assigned size and position live in the layout's side-table.
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    /// Display name (used in logs and diagnostics)
    #[serde(default)]
    pub name: CompactString,
    /// Natural width in pixels (0 = unknown)
    pub width: u32,
    /// Natural height in pixels (0 = unknown)
    pub height: u32,
}

impl Item {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: CompactString::new(name),
            width,
            height,
        }
    }
}

/// Caller-owned items stored as a flat arena. Order is priority order.
#[derive(Debug, Clone, Default)]
pub struct ItemSet {
    items: Vec<Item>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item to the end of the priority order. Returns its ID.
    pub fn push(&mut self, item: Item) -> ItemId {
        let id = ItemId(self.items.len() as u32);
        self.items.push(item);
        id
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    pub fn contains(&self, id: ItemId) -> bool {
        id.index() < self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate `(id, item)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (ItemId(i as u32), item))
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> {
        (0..self.items.len() as u32).map(ItemId)
    }
}

impl FromIterator<Item> for ItemSet {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_insertion_order() {
        let mut set = ItemSet::new();
        let a = set.push(Item::new("a", 10, 20));
        let b = set.push(Item::new("b", 30, 40));
        assert_eq!(a, ItemId(0));
        assert_eq!(b, ItemId(1));
        assert_eq!(set.get(b).map(|i| i.width), Some(30));
        assert!(set.get(ItemId(2)).is_none());
        assert!(!set.contains(ItemId(2)));

        let names: Vec<_> = set.iter().map(|(_, i)| i.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn collects_from_iterator() {
        let set: ItemSet = (1..=3).map(|n| Item::new("x", n, n)).collect();
        assert_eq!(set.len(), 3);
        assert_eq!(set.ids().last(), Some(ItemId(2)));
    }
}
