use crate::resolve::Resolvable;
use crate::store::compose::Store;
use indexmap::IndexMap;

/// A narrowed view of a composed store.
///
/// Holds a cloned state handle and borrowed action entries; dropping it
/// leaves the store untouched.
pub struct Selection<'a, R> {
    pub state: R,
    pub actions: IndexMap<&'a str, &'a Resolvable>,
}

impl<R: Clone> Store<R> {
    /// Narrow the store for one consumer.
    ///
    /// No keys selects every action; the single key `"state"` selects
    /// none of them; any other key list selects the named actions,
    /// silently dropping unknown names. The state handle is always
    /// included.
    pub fn select(&self, keys: &[&str]) -> Selection<'_, R> {
        let actions = if keys.is_empty() {
            self.actions.iter().collect()
        } else if matches!(keys, ["state"]) {
            IndexMap::new()
        } else {
            self.actions
                .iter()
                .filter(|(key, _)| keys.contains(key))
                .collect()
        };

        Selection {
            state: self.state.clone(),
            actions,
        }
    }
}
