//! Demonstration of a composed store with a collection and a field accessor

use depot::{
    compose, AddOptions, Collection, Factories, FieldAccessor, ObservableRecord, Resolvable,
    Target, TrackedList, TrackedRecord, Unique, Value,
};

type TodoActions = Collection<Value, TrackedList<Value>>;

fn todo(id: &str, title: &str) -> Value {
    Value::record([
        ("id", Value::from(id)),
        ("title", Value::from(title)),
        ("done", Value::from(false)),
    ])
}

fn main() {
    let factories = Factories::<TrackedRecord>::new()
        .with("todos", |state, _initial, _context| {
            let list = TrackedList::new(Vec::new());
            let todos = Collection::new(list.clone()).with_name("Todos");

            // Every labeled mutation lands in the shared record.
            let mirror = state.clone();
            list.subscribe(move |action, items| {
                println!("[{action}] {} item(s)", items.len());
                mirror.set(action, "todos", Value::List(items.to_vec()));
            });

            Resolvable::handle(todos)
        })
        .with("filter", |state, _initial, _context| {
            let filter =
                FieldAccessor::new(state.clone(), "filter").with_initial(Value::from("all"));
            filter.reset();
            Resolvable::handle(filter)
        });

    let store = compose(factories, Value::Null)
        .ready()
        .expect("every factory is synchronous");

    let todos: &TodoActions = store.actions.get("todos").unwrap().downcast().unwrap();
    let filter: &FieldAccessor<TrackedRecord> =
        store.actions.get("filter").unwrap().downcast().unwrap();

    todos.add_items(
        vec![todo("1", "buy milk"), todo("2", "walk the dog")],
        Unique::default(),
    );

    // Duplicate ids are filtered out before insertion.
    let added = todos.add_item(todo("1", "buy milk again"));
    println!("duplicate add produced {} item(s)", added.len());

    // A partial record merges onto the stored entry.
    todos.update_item(
        Value::record([("id", Value::from("2")), ("done", Value::from(true))]),
        "id",
    );

    todos.add_item_with(
        todo("0", "wake up"),
        AddOptions {
            first: true,
            ..AddOptions::default()
        },
    );

    todos.remove_item(Target::Item(todo("1", "buy milk")), "id");

    filter.set(Value::from("active"));

    println!("filter = {:?}", store.state.get("filter"));
    println!("state snapshot = {:?}", store.state.snapshot());
}
