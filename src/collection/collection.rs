use crate::collection::keyed::{Key, Keyed, Merge};
use crate::observe::ObservableList;
use std::sync::Arc;

/// One-or-many input normalization.
///
/// Every insertion entry point accepts a single item, a sequence or
/// nothing at all; the conversion happens once, up front, so the
/// operations themselves only ever deal with explicit shapes.
pub enum Items<T> {
    None,
    One(T),
    Many(Vec<T>),
}

impl<T> Items<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Items::None => Vec::new(),
            Items::One(item) => vec![item],
            Items::Many(items) => items,
        }
    }
}

impl<T> From<T> for Items<T> {
    fn from(item: T) -> Self {
        Items::One(item)
    }
}

impl<T> From<Vec<T>> for Items<T> {
    fn from(items: Vec<T>) -> Self {
        Items::Many(items)
    }
}

impl<T> From<Option<T>> for Items<T> {
    fn from(item: Option<T>) -> Self {
        match item {
            Some(item) => Items::One(item),
            None => Items::None,
        }
    }
}

/// What an insertion produced; the shape follows the input shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Added<T> {
    /// Nothing was passed in, nothing happened.
    None,
    One(T),
    Many(Vec<T>),
}

impl<T> Added<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Added::One(item) => Some(item),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Added::None => 0,
            Added::One(_) => 1,
            Added::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Uniqueness policy for insertions.
#[derive(Debug, Clone, Copy)]
pub enum Unique<'a> {
    /// Filter out candidates whose extracted key equals an existing
    /// item's key under the named field.
    By(&'a str),
    /// No check; duplicates are allowed in.
    Off,
}

impl Default for Unique<'_> {
    fn default() -> Self {
        Unique::By("id")
    }
}

/// Options for [`Collection::add_item_with`].
#[derive(Debug, Clone, Copy)]
pub struct AddOptions<'a> {
    pub unique: Unique<'a>,
    /// Replace an existing key match instead of keeping it.
    pub replace: bool,
    /// Insert at the front instead of the end.
    pub first: bool,
}

impl Default for AddOptions<'_> {
    fn default() -> Self {
        Self {
            unique: Unique::default(),
            replace: false,
            first: false,
        }
    }
}

/// What an update did.
#[derive(Debug, Clone, PartialEq)]
pub enum Updated<T> {
    /// No stored entry matched; the input is handed back untouched.
    /// The caller most likely wanted an insertion.
    Absent(T),
    /// The stored entry absorbed the patch in place.
    Merged(T),
    /// The stored entry could not merge and was replaced wholesale.
    Replaced(T),
}

impl<T> Updated<T> {
    pub fn into_inner(self) -> T {
        match self {
            Updated::Absent(item) | Updated::Merged(item) | Updated::Replaced(item) => item,
        }
    }
}

/// What an update-or-add did.
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted<T> {
    Updated(T),
    Added(T),
}

impl<T> Upserted<T> {
    pub fn into_inner(self) -> T {
        match self {
            Upserted::Updated(item) | Upserted::Added(item) => item,
        }
    }
}

/// Removal target, resolved once at the call site.
///
/// Mirrors the three lookup modes: a direct position, an identity value
/// matched under the id field, or a full item (matched by its id field
/// when it carries one, by literal equality otherwise).
#[derive(Debug, Clone)]
pub enum Target<T> {
    Index(usize),
    Key(Key),
    Item(T),
}

impl<T> From<usize> for Target<T> {
    fn from(index: usize) -> Self {
        Target::Index(index)
    }
}

impl<T> From<Key> for Target<T> {
    fn from(key: Key) -> Self {
        Target::Key(key)
    }
}

impl<T> From<&str> for Target<T> {
    fn from(id: &str) -> Self {
        Target::Key(Key::from(id))
    }
}

impl<T> From<String> for Target<T> {
    fn from(id: String) -> Self {
        Target::Key(Key::from(id))
    }
}

type ItemFactory<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// CRUD actions over an externally supplied observable sequence.
///
/// The engine layers uniqueness, ordered insertion, partial update and
/// positional or identity-based removal on top of an
/// [`ObservableList`]. It holds a cloned handle to the list and mutates
/// it in place; the caller keeps ownership and may read or subscribe
/// through its own handle at any time.
///
/// Every item passes through the item factory (identity by default)
/// immediately before it becomes part of the collection. Mutations are
/// labeled `"<name> - <operation>"` for tracing by the substrate.
///
/// Operations never fail: invalid or no-op inputs are signaled through
/// return values, since a panic mid-mutation could leave the backing
/// list partially updated.
///
/// # Examples
///
/// ```
/// use depot::{Collection, ObservableList, TrackedList, Value};
///
/// let list = TrackedList::new(Vec::new());
/// let todos = Collection::new(list.clone()).with_name("Todos");
///
/// todos.add_item(Value::record([("id", Value::from("1"))]));
/// assert_eq!(list.len(), 1);
/// ```
pub struct Collection<T, L> {
    list: L,
    factory: ItemFactory<T>,
    name: String,
}

impl<T, L> Collection<T, L>
where
    T: Keyed + Merge + Clone + PartialEq,
    L: ObservableList<T>,
{
    pub fn new(list: L) -> Self {
        Self {
            list,
            factory: Arc::new(|item| item),
            name: "Collection".to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.factory = Arc::new(factory);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The item construction function applied before storage.
    pub fn factory(&self) -> ItemFactory<T> {
        Arc::clone(&self.factory)
    }

    fn action_name(&self, operation: &str) -> String {
        format!("{} - {}", self.name, operation)
    }

    /// Replace the entire collection with the normalized, factory-applied
    /// input. Always succeeds.
    pub fn set_items<I>(&self, items: I)
    where
        I: Into<Items<T>>,
    {
        let prepared: Vec<T> = items
            .into()
            .into_vec()
            .into_iter()
            .map(|item| (self.factory)(item))
            .collect();
        self.list.replace(&self.action_name("Set items"), prepared);
    }

    /// First stored item whose key under `key` equals the identifier's.
    ///
    /// The identifier may be a full item or a raw key-shaped value; an
    /// identifier with no usable key falls back to a literal equality
    /// scan.
    pub fn get_item(&self, identifier: &T, key: &str) -> Option<T> {
        match identifier.extract_key(key) {
            Some(wanted) => self.find_by_key(&wanted, key),
            None => self.list.find(|element| element == identifier),
        }
    }

    /// Index of the first stored item whose key matches, same extraction
    /// as [`get_item`](Self::get_item).
    pub fn get_index(&self, item: &T, key: &str) -> Option<usize> {
        let wanted = item.extract_key(key)?;
        self.index_by_key(&wanted, key)
    }

    pub fn get_by_index(&self, index: usize) -> Option<T> {
        self.list.get(index)
    }

    /// Add the subset of `items` not already present, comparing by
    /// extracted key. Returns the factory-applied subset that was added,
    /// in input order, not where the items ended up.
    pub fn add_items<I>(&self, items: I, unique: Unique<'_>) -> Vec<T>
    where
        I: Into<Items<T>>,
    {
        self.add_items_processed(items, unique, |all| all)
    }

    /// [`add_items`](Self::add_items) with an ordering hook: the entire
    /// resulting sequence is passed through `process_all` before it
    /// replaces the collection.
    pub fn add_items_processed<I, P>(&self, items: I, unique: Unique<'_>, process_all: P) -> Vec<T>
    where
        I: Into<Items<T>>,
        P: FnOnce(Vec<T>) -> Vec<T>,
    {
        let incoming = items.into().into_vec();
        if incoming.is_empty() {
            return Vec::new();
        }

        let to_add: Vec<T> = match unique {
            Unique::Off => incoming,
            Unique::By(key) => {
                let existing: Vec<Key> = self
                    .list
                    .snapshot()
                    .iter()
                    .filter_map(|element| element.extract_key(key))
                    .collect();
                incoming
                    .into_iter()
                    .filter(|candidate| match candidate.extract_key(key) {
                        Some(candidate_key) => !existing.contains(&candidate_key),
                        None => true,
                    })
                    .collect()
            }
        };

        // Everything already present: leave the collection untouched.
        if to_add.is_empty() {
            return Vec::new();
        }

        let prepared: Vec<T> = to_add.into_iter().map(|item| (self.factory)(item)).collect();

        let all = self.list.concat(prepared.clone());
        self.list
            .replace(&self.action_name("Add items"), process_all(all));

        prepared
    }

    /// Add a single item with default options; sequences delegate to
    /// [`add_items`](Self::add_items) and the result keeps the input
    /// shape.
    pub fn add_item<I>(&self, item: I) -> Added<T>
    where
        I: Into<Items<T>>,
    {
        self.add_item_with(item, AddOptions::default())
    }

    pub fn add_item_with<I>(&self, item: I, options: AddOptions<'_>) -> Added<T>
    where
        I: Into<Items<T>>,
    {
        match item.into() {
            Items::None => Added::None,
            Items::Many(items) => Added::Many(self.add_items(items, options.unique)),
            Items::One(item) => Added::One(self.insert_single(
                item,
                options.unique,
                options.replace,
                options.first,
            )),
        }
    }

    fn insert_single(&self, item: T, unique: Unique<'_>, replace: bool, first: bool) -> T {
        let existing = match unique {
            Unique::Off => None,
            Unique::By(key) => self.get_index(&item, key),
        };

        if let Some(index) = existing {
            // Keep the stored item unless the caller asked to replace it.
            if !replace {
                return self.list.get(index).unwrap_or(item);
            }
            let prepared = (self.factory)(item);
            self.list
                .splice(&self.action_name("Add item"), index, 1, vec![prepared.clone()]);
            return prepared;
        }

        let prepared = (self.factory)(item);
        if first {
            self.list
                .unshift(&self.action_name("Add item"), prepared.clone());
        } else {
            self.list.push(&self.action_name("Add item"), prepared.clone());
        }
        prepared
    }

    /// Merge new data onto the stored entry matching `id_prop`.
    ///
    /// A mergeable stored entry absorbs the patch field-wise in place; a
    /// non-mergeable one is replaced with the factory output. When
    /// nothing matches, the input comes back as `Updated::Absent` and
    /// the collection is untouched.
    pub fn update_item(&self, item: T, id_prop: &str) -> Updated<T> {
        let Some(index) = self.get_index(&item, id_prop) else {
            return Updated::Absent(item);
        };

        let mergeable = self
            .list
            .get(index)
            .map(|stored| stored.is_mergeable())
            .unwrap_or(false);
        if mergeable {
            if let Some(merged) =
                self.list
                    .merge_at(&self.action_name("Update item"), index, &item)
            {
                return Updated::Merged(merged);
            }
        }

        let prepared = (self.factory)(item);
        self.list.splice(
            &self.action_name("Update item"),
            index,
            1,
            vec![prepared.clone()],
        );
        Updated::Replaced(prepared)
    }

    /// Update a matching entry, or insert when there is none.
    ///
    /// The insertion skips the uniqueness check on purpose: absence was
    /// just confirmed.
    pub fn update_or_add(&self, item: T, id_prop: &str, first: bool) -> Upserted<T> {
        if self.get_index(&item, id_prop).is_some() {
            Upserted::Updated(self.update_item(item, id_prop).into_inner())
        } else {
            Upserted::Added(self.insert_single(item, Unique::Off, false, first))
        }
    }

    /// Remove exactly one element and return it, or `None` when the
    /// target resolves to nothing.
    pub fn remove_item<G>(&self, target: G, id_prop: &str) -> Option<T>
    where
        G: Into<Target<T>>,
    {
        let index = match target.into() {
            Target::Index(index) => (index < self.list.len()).then_some(index),
            Target::Key(key) => self.index_by_key(&key, id_prop),
            Target::Item(item) => match item.extract_key(id_prop) {
                Some(key) => self.index_by_key(&key, id_prop),
                None => self.list.index_of(&item),
            },
        }?;

        self.list
            .splice(&self.action_name("Remove item"), index, 1, Vec::new())
            .into_iter()
            .next()
    }

    /// Empty the collection. Returns the (now empty) snapshot.
    pub fn clear(&self) -> Vec<T> {
        self.list.clear(&self.action_name("Clear"));
        self.list.snapshot()
    }

    /// Remove every item the filter selects, in one pass.
    ///
    /// The remaining items are collected into a fresh sequence and the
    /// collection is replaced wholesale, so consecutive matches are all
    /// removed. Returns the snapshot of what remains.
    pub fn clear_where<P>(&self, filter: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        let kept: Vec<T> = self
            .list
            .snapshot()
            .into_iter()
            .filter(|item| !filter(item))
            .collect();
        self.list.replace(&self.action_name("Clear"), kept);
        self.list.snapshot()
    }

    fn find_by_key(&self, wanted: &Key, key: &str) -> Option<T> {
        self.list
            .find(|element| element.extract_key(key).as_ref() == Some(wanted))
    }

    fn index_by_key(&self, wanted: &Key, key: &str) -> Option<usize> {
        self.list
            .find_index(|element| element.extract_key(key).as_ref() == Some(wanted))
    }
}
