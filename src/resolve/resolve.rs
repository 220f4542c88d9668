use crate::collection::Key;
use crate::value::Value;
use futures::future::{self, try_join_all, BoxFuture, FutureExt};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::future::Future;
use std::hash::Hash;

/// A pending leaf settled with a failure.
///
/// One rejection anywhere in a tree fails the whole resolution; no
/// partial result is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("pending value rejected: {0}")]
    Rejected(String),
}

impl ResolveError {
    pub fn rejected(reason: impl fmt::Display) -> Self {
        ResolveError::Rejected(reason.to_string())
    }
}

/// Deep asynchronous resolution.
///
/// `resolve` returns the value with every nested pending computation
/// awaited and replaced by its settlement, container kind, order and
/// key identity preserved. All pending leaves discovered in one pass
/// are awaited concurrently. Values with no pending leaves pass through
/// unchanged, and `is_settled` reports that without polling anything.
///
/// The dispatch is by capability: whatever implements this trait knows
/// how to resolve itself, plain values implement it as passthrough.
pub trait Resolve: Sized + Send + 'static {
    type Output: Send + 'static;

    /// True when no pending leaf remains anywhere beneath this value.
    fn is_settled(&self) -> bool;

    fn resolve(self) -> BoxFuture<'static, Result<Self::Output, ResolveError>>;
}

/// A pending value: work not yet complete, resolvable later.
///
/// The wrapped future may itself yield another pending value; resolution
/// keeps unwrapping until a settled value appears.
pub struct Pending<T>(BoxFuture<'static, Result<T, ResolveError>>);

impl<T: Send + 'static> Pending<T> {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, ResolveError>> + Send + 'static,
    {
        Self(future.boxed())
    }

    /// An already-settled pending value, for tests and adapters.
    pub fn ready(value: T) -> Self {
        Self(future::ready(Ok(value)).boxed())
    }

    pub fn rejected(error: ResolveError) -> Self {
        Self(future::ready(Err(error)).boxed())
    }
}

impl<T: Resolve> Resolve for Pending<T> {
    type Output = T::Output;

    fn is_settled(&self) -> bool {
        false
    }

    fn resolve(self) -> BoxFuture<'static, Result<Self::Output, ResolveError>> {
        async move {
            let inner = self.0.await?;
            inner.resolve().await
        }
        .boxed()
    }
}

impl<T: Resolve> Resolve for Option<T> {
    type Output = Option<T::Output>;

    fn is_settled(&self) -> bool {
        match self {
            Some(value) => value.is_settled(),
            None => true,
        }
    }

    fn resolve(self) -> BoxFuture<'static, Result<Self::Output, ResolveError>> {
        match self {
            Some(value) => async move { Ok(Some(value.resolve().await?)) }.boxed(),
            None => future::ready(Ok(None)).boxed(),
        }
    }
}

impl<T: Resolve> Resolve for Vec<T> {
    type Output = Vec<T::Output>;

    fn is_settled(&self) -> bool {
        self.iter().all(Resolve::is_settled)
    }

    fn resolve(self) -> BoxFuture<'static, Result<Self::Output, ResolveError>> {
        try_join_all(self.into_iter().map(Resolve::resolve)).boxed()
    }
}

impl<K, T> Resolve for IndexMap<K, T>
where
    K: Hash + Eq + Send + 'static,
    T: Resolve,
{
    type Output = IndexMap<K, T::Output>;

    fn is_settled(&self) -> bool {
        self.values().all(Resolve::is_settled)
    }

    fn resolve(self) -> BoxFuture<'static, Result<Self::Output, ResolveError>> {
        let (keys, values): (Vec<K>, Vec<T>) = self.into_iter().unzip();
        async move {
            let resolved = try_join_all(values.into_iter().map(Resolve::resolve)).await?;
            Ok(keys.into_iter().zip(resolved).collect())
        }
        .boxed()
    }
}

impl<T> Resolve for IndexSet<T>
where
    T: Resolve + Hash + Eq,
    T::Output: Hash + Eq,
{
    type Output = IndexSet<T::Output>;

    fn is_settled(&self) -> bool {
        self.iter().all(Resolve::is_settled)
    }

    fn resolve(self) -> BoxFuture<'static, Result<Self::Output, ResolveError>> {
        async move {
            let resolved = try_join_all(self.into_iter().map(Resolve::resolve)).await?;
            // Members that settle to equal values collapse, as sets do.
            Ok(resolved.into_iter().collect())
        }
        .boxed()
    }
}

/// Passthrough wrapper for values with nothing to resolve.
///
/// Covers the "anything else" rule for types the crate does not know
/// about: functions, caller structs, handles.
pub struct Settled<T>(pub T);

impl<T: Send + 'static> Resolve for Settled<T> {
    type Output = T;

    fn is_settled(&self) -> bool {
        true
    }

    fn resolve(self) -> BoxFuture<'static, Result<Self::Output, ResolveError>> {
        future::ready(Ok(self.0)).boxed()
    }
}

macro_rules! impl_resolve_passthrough {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Resolve for $ty {
                type Output = $ty;

                fn is_settled(&self) -> bool {
                    true
                }

                fn resolve(self) -> BoxFuture<'static, Result<Self::Output, ResolveError>> {
                    future::ready(Ok(self)).boxed()
                }
            }
        )*
    };
}

impl_resolve_passthrough!(
    (),
    bool,
    i32,
    i64,
    u32,
    u64,
    usize,
    f32,
    f64,
    char,
    String,
    &'static str,
    Value,
    Key,
);
