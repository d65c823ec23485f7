use multistore::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Person {
    first_name: String,
    last_name: String,
    age: u32,
}

impl Person {
    fn new(first_name: &str, last_name: &str, age: u32) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            age,
        }
    }

    fn initials(&self) -> String {
        format!("{:.1}{:.1}", self.first_name, self.last_name)
    }
}

indexes! {
    struct PersonIndexes for Person {
        by_full_name: HashedIndex<Person, (String, String)> =
            HashedIndex::unique("by_full_name", |p: &Person| {
                (p.first_name.clone(), p.last_name.clone())
            }),
        by_name_age: OrderedIndex<Person, (String, u32)> =
            OrderedIndex::non_unique("by_name_age", Order::Asc, |p: &Person| {
                (p.first_name.clone(), p.age)
            }),
        by_initials: HashedIndex<Person, String> =
            HashedIndex::non_unique("by_initials", Person::initials),
    }
}

fn key(first: &str, last: &str) -> (String, String) {
    (first.to_string(), last.to_string())
}

fn filled() -> MultiIndexStore<Person, PersonIndexes> {
    let mut store = MultiIndexStore::new(PersonIndexes::new());
    store.insert(Person::new("john", "doe", 40)).unwrap();
    store.insert(Person::new("john", "roe", 25)).unwrap();
    store.insert(Person::new("jane", "doe", 31)).unwrap();
    store
}

#[test]
fn composite_keys_are_independent() {
    let store = filled();

    let doe: Vec<_> = store.find_by(|i| &i.by_full_name, &key("john", "doe")).collect();
    assert_eq!(doe, vec![&Person::new("john", "doe", 40)]);

    let roe: Vec<_> = store.find_by(|i| &i.by_full_name, &key("john", "roe")).collect();
    assert_eq!(roe, vec![&Person::new("john", "roe", 25)]);

    assert_eq!(
        store.find_by(|i| &i.by_full_name, &key("john", "zzz")).count(),
        0
    );
}

#[test]
fn composite_ordered_range() {
    let store = filled();

    let johns: Vec<_> = store
        .index(|i| &i.by_name_age)
        .range(("john".to_string(), 0)..=("john".to_string(), u32::MAX))
        .map(|p| p.age)
        .collect();
    assert_eq!(johns, vec![25, 40]);
}

#[test]
fn computed_key_with_borrowed_lookup() {
    let store = filled();

    let mut jd: Vec<_> = store
        .index(|i| &i.by_initials)
        .get("jd")
        .map(|p| p.first_name.as_str())
        .collect();
    jd.sort();
    assert_eq!(jd, vec!["jane", "john"]);
    assert_eq!(store.index(|i| &i.by_initials).get("jr").count(), 1);
}

#[test]
fn rename_rekeys_every_index() {
    let mut store = filled();
    let (handle, _) = store
        .rows()
        .find(|(_, p)| p.last_name == "roe")
        .unwrap();

    store
        .modify(handle, |p| p.first_name = "jack".to_string())
        .unwrap();

    assert_eq!(store.find_by(|i| &i.by_full_name, &key("john", "roe")).count(), 0);
    assert_eq!(store.find_by(|i| &i.by_full_name, &key("jack", "roe")).count(), 1);
    assert_eq!(store.index(|i| &i.by_initials).get("jr").count(), 1);
    assert_eq!(store.index(|i| &i.by_initials).get("jd").count(), 2);
    assert_eq!(
        store.index(|i| &i.by_name_age).first().map(|p| p.first_name.as_str()),
        Some("jack")
    );
}

#[test]
fn age_is_a_non_key_update_only_for_full_name() {
    let mut store = filled();
    let (handle, _) = store
        .rows()
        .find(|(_, p)| p.first_name == "jane")
        .unwrap();

    store.modify(handle, |p| p.age = 32).unwrap();

    let jane = store
        .find_by(|i| &i.by_full_name, &key("jane", "doe"))
        .next()
        .unwrap();
    assert_eq!(jane.age, 32);
    assert_eq!(
        store
            .find_by(|i| &i.by_name_age, &("jane".to_string(), 32))
            .count(),
        1
    );
}
