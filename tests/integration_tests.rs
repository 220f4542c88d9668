//! Integration tests for Depot

use depot::{
    compose, Collection, Factories, ObservableRecord, Resolvable, ResolveError, TrackedList,
    TrackedRecord, Value,
};
use futures::executor::block_on;

type TodoActions = Collection<Value, TrackedList<Value>>;

fn todo(id: &str, title: &str) -> Value {
    Value::record([
        ("id", Value::from(id)),
        ("title", Value::from(title)),
        ("done", Value::from(false)),
    ])
}

#[test]
fn collection_actions_flow_into_shared_state() {
    let factories = Factories::<TrackedRecord>::new().with("todos", |state, _initial, _context| {
        let list = TrackedList::new(Vec::new());
        let todos = Collection::new(list.clone()).with_name("Todos");

        // Mirror the backing list into the shared record so consumers
        // can read it off the state like any other field.
        let mirror = state.clone();
        list.subscribe(move |action, items| {
            mirror.set(action, "todos", Value::List(items.to_vec()));
        });

        Resolvable::handle(todos)
    });

    let store = compose(factories, Value::Null).ready().unwrap();
    let todos: &TodoActions = store.actions.get("todos").unwrap().downcast().unwrap();

    todos.add_item(todo("1", "write tests"));
    todos.add_item(todo("2", "run nothing"));
    todos.remove_item("1", "id");

    let mirrored = store.state.get("todos").unwrap();
    let items = mirrored.as_list().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].get("id"), Some(&Value::from("2")));
}

#[test]
fn initial_data_seeds_the_collection() {
    let initial = Value::record([(
        "todos",
        Value::List(vec![todo("1", "carried over"), todo("2", "also here")]),
    )]);

    let factories = Factories::<TrackedRecord>::new().with("todos", |_state, initial, _context| {
        let list: TrackedList<Value> = TrackedList::new(Vec::new());
        let todos = Collection::new(list).with_name("Todos");

        if let Some(seed) = initial.get("todos") {
            todos.set_items(seed.as_list().map(<[Value]>::to_vec).unwrap_or_default());
        }

        Resolvable::handle(todos)
    });

    let store = compose(factories, initial).ready().unwrap();
    let todos: &TodoActions = store.actions.get("todos").unwrap().downcast().unwrap();
    assert_eq!(
        todos.get_by_index(1).unwrap().get("id"),
        Some(&Value::from("2"))
    );
}

#[test]
fn later_factories_build_on_earlier_ones() {
    let factories = Factories::<TrackedRecord>::new()
        .with("session", |state, _initial, _context| {
            state.set("session - init", "user", Value::from("ada"));
            Value::from("session-ready").into()
        })
        .with("greeting", |state, _initial, context| {
            // Earlier state mutation and earlier action are both visible.
            let user = state.get("user").unwrap();
            assert!(context.actions.get("session").is_some());
            Value::from(format!("hello {}", user.as_str().unwrap_or("?"))).into()
        });

    let store = compose(factories, Value::Null).ready().unwrap();
    assert_eq!(
        store.actions.get("greeting").and_then(Resolvable::as_value),
        Some(&Value::from("hello ada"))
    );
}

#[test]
fn asynchronous_factories_resolve_in_one_pass() {
    let factories = Factories::<TrackedRecord>::new()
        .with("remote", |state, _initial, _context| {
            let state = state.clone();
            Resolvable::pending(async move {
                // Simulated asynchronous setup completing later.
                state.set("remote - loaded", "remote_ready", Value::Bool(true));
                Ok(Value::from("remote-actions").into())
            })
        })
        .with("local", |_state, _initial, _context| {
            Value::from("local-actions").into()
        });

    let composition = compose(factories, Value::Null);
    assert!(!composition.is_ready());

    let store = block_on(composition.wait()).unwrap();
    assert_eq!(
        store.actions.get("remote").and_then(Resolvable::as_value),
        Some(&Value::from("remote-actions"))
    );
    assert_eq!(
        store.actions.get("local").and_then(Resolvable::as_value),
        Some(&Value::from("local-actions"))
    );
    assert_eq!(store.state.get("remote_ready"), Some(Value::Bool(true)));
}

#[test]
fn one_failed_factory_fails_the_composition() {
    let factories = Factories::<TrackedRecord>::new()
        .with("fine", |_state, _initial, _context| Value::Int(1).into())
        .with("doomed", |_state, _initial, _context| {
            Resolvable::pending(async { Err(ResolveError::rejected("connection refused")) })
        });

    let outcome = block_on(compose(factories, Value::Null).wait());
    assert_eq!(
        outcome.err(),
        Some(ResolveError::rejected("connection refused"))
    );
}

#[test]
fn selection_narrows_a_composed_store() {
    let factories = Factories::<TrackedRecord>::new()
        .with("users", |_state, _initial, _context| Value::Int(1).into())
        .with("posts", |_state, _initial, _context| Value::Int(2).into());

    let store = compose(factories, Value::Null).ready().unwrap();
    store.state.set("test", "theme", Value::from("dark"));

    let everything = store.select(&[]);
    assert_eq!(everything.actions.len(), 2);

    let narrowed = store.select(&["posts", "unknown"]);
    assert_eq!(narrowed.actions.len(), 1);
    assert_eq!(narrowed.state.get("theme"), Some(Value::from("dark")));

    let state_only = store.select(&["state"]);
    assert!(state_only.actions.is_empty());
}
