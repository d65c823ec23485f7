use multistore::prelude::*;

use crate::store::{Point, PointIndexes, PointStore, assert_synchronized};

fn filled() -> PointStore {
    let mut store = PointStore::default();
    store.insert(Point::new(1, 5)).unwrap();
    store.insert(Point::new(2, 3)).unwrap();
    store.insert(Point::new(1, 7)).unwrap();
    store
}

#[test]
fn iterate_by_x_ascending() {
    let store = filled();

    let got: Vec<_> = store.iter(|i| &i.by_x).copied().collect();
    assert_eq!(got.len(), 3);
    assert_eq!(got[2], Point::new(2, 3));
    assert!(got[..2].contains(&Point::new(1, 5)));
    assert!(got[..2].contains(&Point::new(1, 7)));
}

#[test]
fn iterate_by_y_descending() {
    let store = filled();

    let got: Vec<_> = store.iter(|i| &i.by_y).copied().collect();
    assert_eq!(
        got,
        vec![Point::new(1, 7), Point::new(1, 5), Point::new(2, 3)]
    );
}

#[test]
fn hashed_lookup() {
    let store = filled();

    let got: Vec<_> = store.find_by(|i| &i.by_xy, &(2, 3)).collect();
    assert_eq!(got, vec![&Point::new(2, 3)]);
    assert_eq!(store.find_by(|i| &i.by_xy, &(9, 9)).count(), 0);
}

#[test]
fn duplicate_rejected_on_hashed_index() {
    let mut store = filled();

    let err = store.insert(Point::new(1, 5)).unwrap_err();
    match err {
        StoreError::DuplicateKey(e) => {
            assert_eq!(e.index, "by_xy");
            assert_eq!(e.key, "(1, 5)");
        }
        e => panic!("unexpected error {e}"),
    }
    assert_eq!(store.len(), 3);
    assert_synchronized(&store);
    assert_eq!(store.count_by(|i| &i.by_x, &1), 2);
}

#[test]
fn find_by_non_unique_ordered() {
    let store = filled();

    let mut got: Vec<_> = store.find_by(|i| &i.by_x, &1).map(|p| p.y).collect();
    got.sort();
    assert_eq!(got, vec![5, 7]);
}

#[test]
fn range_queries_follow_index_direction() {
    let store = filled();

    let by_x: Vec<_> = store.index(|i| &i.by_x).range(2..).copied().collect();
    assert_eq!(by_x, vec![Point::new(2, 3)]);

    let by_y: Vec<_> = store.index(|i| &i.by_y).range(7..=5).map(|p| p.y).collect();
    assert_eq!(by_y, vec![7, 5]);

    let lower: Vec<_> = store.index(|i| &i.by_y).lower_bound(6).map(|p| p.y).collect();
    assert_eq!(lower, vec![5, 3]);

    let upper: Vec<_> = store.index(|i| &i.by_y).upper_bound(5).map(|p| p.y).collect();
    assert_eq!(upper, vec![3]);
}

#[test]
fn select_with_offset_and_limit() {
    let store = filled();

    let got = store
        .index(|i| &i.by_y)
        .select()
        .order(Order::Desc)
        .limit(2)
        .execute_cloned();
    assert_eq!(got, vec![Point::new(2, 3), Point::new(1, 5)]);

    let got = store
        .index(|i| &i.by_y)
        .select()
        .where_by(|p| p.x == 1)
        .offset(1)
        .execute();
    assert_eq!(got, vec![&Point::new(1, 5)]);
}

#[test]
fn system_info_lists_every_index() {
    let store = filled();
    let info = store.system_info();

    assert_eq!(info.rows, 3);
    let names: Vec<_> = info.indexes.iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["by_x", "by_y", "by_xy"]);
    assert!(info.index_heap_size() > 0);

    let rendered = info.to_string();
    assert!(rendered.contains("by_xy"));
    assert!(rendered.contains("ordered desc"));
}

#[test]
fn configured_store() {
    let store: PointStore =
        MultiIndexStore::with_config(PointIndexes::new(), StoreConfig::new("points").with_capacity(16));

    assert_eq!(store.name(), "points");
    assert_eq!(store.config().capacity, 16);
    assert!(store.is_empty());
}

type Snapshot = (
    Vec<(RecordHandle, Point)>,
    Vec<Point>,
    Vec<Point>,
    Vec<Point>,
);

fn snapshot(store: &PointStore) -> Snapshot {
    (
        store.rows().map(|(h, p)| (h, *p)).collect(),
        store.iter(|i| &i.by_x).copied().collect(),
        store.iter(|i| &i.by_y).copied().collect(),
        store.iter(|i| &i.by_xy).copied().collect(),
    )
}

#[test]
fn rejected_insert_leaves_every_index_identical() {
    let mut store = filled();
    let before = snapshot(&store);

    assert!(store.insert(Point::new(1, 5)).is_err());

    assert_eq!(snapshot(&store), before);
    assert_eq!(store.system_info().indexes, filled().system_info().indexes);
}

#[test]
fn rejected_update_leaves_every_index_identical() {
    let mut store = filled();
    let (handle, _) = store.rows().find(|(_, p)| **p == Point::new(2, 3)).unwrap();
    let before = snapshot(&store);

    let err = store.modify(handle, |p| *p = Point::new(1, 7)).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey(_)));
    assert_eq!(snapshot(&store), before);

    let err = store.replace(handle, Point::new(1, 5)).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey(_)));
    assert_eq!(snapshot(&store), before);
}
