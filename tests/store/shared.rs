use multistore::prelude::*;

use crate::store::{Point, PointIndexes, assert_synchronized};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_keep_indexes_synchronized() {
    let store = SharedStore::new(PointIndexes::new());

    let tasks: Vec<_> = (0..4)
        .map(|t| {
            let store = store.clone();
            tokio::task::spawn(async move {
                for i in 0..250 {
                    store.insert(Point::new(t, i)).unwrap();
                    if i % 5 == 0 {
                        store.erase_by(|idx| &idx.by_xy, &(t, i));
                    }
                }
            })
        })
        .collect();

    let reader = {
        let store = store.clone();
        tokio::task::spawn(async move {
            for _ in 0..100 {
                store.read(|s| assert_synchronized(s));
                tokio::task::yield_now().await;
            }
        })
    };

    for task in tasks {
        task.await.unwrap();
    }
    reader.await.unwrap();

    assert_eq!(store.len(), 4 * 200);
    store.read(|s| {
        assert_synchronized(s);
        assert_eq!(s.count_by(|i| &i.by_x, &2), 200);
    });
}

#[tokio::test]
async fn write_closure_is_atomic_for_readers() {
    let store = SharedStore::new(PointIndexes::new());
    let handle = store.insert(Point::new(1, 1)).unwrap();

    store.write(|s| {
        s.insert(Point::new(2, 2)).unwrap();
        s.modify(handle, |p| p.y = 3).unwrap();
    });

    assert_eq!(store.get_cloned(handle), Some(Point::new(1, 3)));
    assert_eq!(store.find_cloned(|i| &i.by_xy, &(2, 2)), vec![Point::new(2, 2)]);
    store.update_non_key_field(handle, |_| {}).unwrap();
    assert_eq!(store.erase(handle), Some(Point::new(1, 3)));
    assert_eq!(store.len(), 1);
}
