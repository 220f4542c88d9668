//! Demonstration of asynchronous store composition
//!
//! One factory settles immediately, the other finishes its setup inside
//! a pending value; the composition resolves both in a single
//! concurrent pass.

use depot::{compose, Factories, ObservableRecord, Resolvable, TrackedRecord, Value};
use futures::executor::block_on;

fn main() {
    let factories = Factories::<TrackedRecord>::new()
        .with("config", |state, _initial, _context| {
            state.set("config - init", "theme", Value::from("dark"));
            Value::from("config-ready").into()
        })
        .with("profile", |state, _initial, _context| {
            let state = state.clone();
            Resolvable::pending(async move {
                // Stand-in for a slow lookup.
                let profile = Value::record([
                    ("user", Value::from("ada")),
                    ("plan", Value::from("pro")),
                ]);
                state.set("profile - loaded", "profile", profile.clone());
                Ok(profile.into())
            })
        });

    let composition = compose(factories, Value::Null);
    println!("available synchronously: {}", composition.is_ready());

    let store = block_on(composition.wait()).expect("composition resolves");

    println!("profile action = {:?}", store.actions.get("profile"));
    println!("theme = {:?}", store.state.get("theme"));
    println!("profile in state = {:?}", store.state.get("profile"));
}
