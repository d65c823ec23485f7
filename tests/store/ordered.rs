use multistore::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Quote {
    id: u64,
    price: OrderedFloat<f64>,
}

indexes! {
    struct QuoteIndexes for Quote {
        id_asc: OrderedIndex<Quote, u64> =
            OrderedIndex::unique("id_asc", Order::Asc, |q: &Quote| q.id),
        id_desc: OrderedIndex<Quote, u64> =
            OrderedIndex::unique("id_desc", Order::Desc, |q: &Quote| q.id),
        by_price: OrderedIndex<Quote, OrderedFloat<f64>> =
            OrderedIndex::non_unique("by_price", Order::Asc, |q: &Quote| q.price),
    }
}

fn filled(ids: &[u64]) -> MultiIndexStore<Quote, QuoteIndexes> {
    let mut store = MultiIndexStore::new(QuoteIndexes::new());
    for id in ids {
        store
            .insert(Quote {
                id: *id,
                price: OrderedFloat(*id as f64 / 4.0),
            })
            .unwrap();
    }
    store
}

#[test]
fn ascending_and_descending_are_reverse() {
    let ids = [17, 3, 99, 42, 5, 8, 0, 64];
    let store = filled(&ids);

    let asc: Vec<_> = store.iter(|i| &i.id_asc).map(|q| q.id).collect();
    let mut desc: Vec<_> = store.iter(|i| &i.id_desc).map(|q| q.id).collect();

    assert_eq!(asc.len(), ids.len());
    assert!(asc.windows(2).all(|w| w[0] <= w[1]));
    desc.reverse();
    assert_eq!(asc, desc);
}

#[test]
fn iteration_is_restartable() {
    let store = filled(&[3, 1, 2]);
    let view = store.index(|i| &i.id_asc);

    let first: Vec<_> = view.iter().map(|q| q.id).collect();
    let second: Vec<_> = view.iter().map(|q| q.id).collect();
    assert_eq!(first, vec![1, 2, 3]);
    assert_eq!(first, second);
}

#[test]
fn float_keys() {
    let store = filled(&[1, 2, 3, 4, 5, 6]);

    let cheap: Vec<_> = store
        .index(|i| &i.by_price)
        .range(..OrderedFloat(1.0))
        .map(|q| q.id)
        .collect();
    assert_eq!(cheap, vec![1, 2, 3]);
}

#[test]
fn duplicate_on_ordered_unique() {
    let mut store = filled(&[1, 2]);

    let err = store
        .insert(Quote {
            id: 2,
            price: OrderedFloat(0.0),
        })
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Value `2` already exists for `id_asc` index"
    );
    assert_eq!(store.len(), 2);
    assert_eq!(store.count_by(|i| &i.by_price, &OrderedFloat(0.0)), 0);
}

#[test]
fn replace_rekeys_and_returns_old_row() {
    let mut store = filled(&[1, 2, 3]);
    let handle = store
        .index(|i| &i.id_asc)
        .find(&2)
        .with_handles()
        .next()
        .map(|(h, _)| h)
        .unwrap();

    let old = store
        .replace(
            handle,
            Quote {
                id: 10,
                price: OrderedFloat(7.5),
            },
        )
        .unwrap();

    assert_eq!(old.id, 2);
    let ids: Vec<_> = store.iter(|i| &i.id_desc).map(|q| q.id).collect();
    assert_eq!(ids, vec![10, 3, 1]);
    assert_eq!(store.get(handle).map(|q| q.id), Some(10));

    let err = store
        .replace(
            handle,
            Quote {
                id: 1,
                price: OrderedFloat(0.0),
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey(_)));
    assert_eq!(store.get(handle).map(|q| q.id), Some(10));
}

#[test]
fn clear_drops_rows_and_entries() {
    let mut store = filled(&[1, 2, 3]);
    let handle = store.rows().next().map(|(h, _)| h).unwrap();

    store.clear();

    assert!(store.is_empty());
    assert!(store.index_info().iter().all(|i| i.len == 0));
    assert!(!store.contains(handle));
    store
        .insert(Quote {
            id: 1,
            price: OrderedFloat(0.0),
        })
        .unwrap();
    assert_eq!(store.len(), 1);
}
