use crate::observe::ObservableRecord;
use crate::resolve::{Resolvable, Resolve, ResolveError};
use crate::value::Value;
use futures::future::{BoxFuture, FutureExt};
use indexmap::IndexMap;

/// What a factory sees while the composition is being built.
pub struct FactoryContext<'a> {
    /// The factory's own registration key.
    pub key: &'a str,
    /// The action map built so far, in registration order. A factory
    /// registered later can reach into what earlier factories produced.
    pub actions: &'a IndexMap<String, Resolvable>,
}

type Factory<R> = Box<dyn FnOnce(&R, &Value, FactoryContext<'_>) -> Resolvable>;

/// Named state-factories, kept in registration order.
///
/// Registration order is the composition order: each factory runs with
/// the state as earlier factories left it, so inter-store dependencies
/// are expressed purely by registering dependents later.
pub struct Factories<R>(IndexMap<String, Factory<R>>);

impl<R> Factories<R> {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn with<F>(mut self, key: impl Into<String>, factory: F) -> Self
    where
        F: FnOnce(&R, &Value, FactoryContext<'_>) -> Resolvable + 'static,
    {
        self.0.insert(key.into(), Box::new(factory));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<R> Default for Factories<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// The settled action map of a composed store.
pub struct Actions(pub(crate) IndexMap<String, Resolvable>);

impl Actions {
    pub fn get(&self, key: &str) -> Option<&Resolvable> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolvable)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A composed store: one shared reactive record plus the action map the
/// factories produced.
pub struct Store<R> {
    pub state: R,
    pub actions: Actions,
}

/// The composer's result: available synchronously when every factory
/// returned a settled value, pending otherwise.
pub enum Composition<R> {
    Ready(Store<R>),
    Pending(BoxFuture<'static, Result<Store<R>, ResolveError>>),
}

impl<R> Composition<R> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Composition::Ready(_))
    }

    /// The store, when it was available synchronously.
    pub fn ready(self) -> Option<Store<R>> {
        match self {
            Composition::Ready(store) => Some(store),
            Composition::Pending(_) => None,
        }
    }

    /// The store, however long it takes.
    pub async fn wait(self) -> Result<Store<R>, ResolveError> {
        match self {
            Composition::Ready(store) => Ok(store),
            Composition::Pending(future) => future.await,
        }
    }
}

/// Compose named factories over one freshly created shared record.
///
/// Factories are invoked strictly sequentially, in registration order,
/// each with the state handle, the initial data and a
/// [`FactoryContext`]. Invocation itself never suspends - a factory
/// that starts asynchronous work returns a pending [`Resolvable`]
/// immediately. Once all factories have run, either every entry is
/// settled and the store is returned synchronously, or the entire
/// action map is resolved in one concurrent fan-out pass and the
/// composition is pending. A rejection anywhere rejects the whole
/// composition; no partially resolved action map is ever exposed.
///
/// # Examples
///
/// ```
/// use depot::{compose, Factories, TrackedRecord, Value};
///
/// let factories = Factories::<TrackedRecord>::new()
///     .with("answer", |_state, _initial, _context| Value::Int(42).into());
///
/// let store = compose(factories, Value::Null).ready().unwrap();
/// assert_eq!(store.actions.len(), 1);
/// ```
pub fn compose<R>(factories: Factories<R>, initial: Value) -> Composition<R>
where
    R: ObservableRecord + Default + Send + 'static,
{
    let state = R::default();
    let mut actions: IndexMap<String, Resolvable> = IndexMap::new();

    for (key, factory) in factories.0 {
        let produced = factory(
            &state,
            &initial,
            FactoryContext {
                key: &key,
                actions: &actions,
            },
        );
        actions.insert(key, produced);
    }

    if actions.values().all(Resolve::is_settled) {
        return Composition::Ready(Store {
            state,
            actions: Actions(actions),
        });
    }

    Composition::Pending(
        async move {
            let resolved = actions.resolve().await?;
            Ok(Store {
                state,
                actions: Actions(resolved),
            })
        }
        .boxed(),
    )
}
