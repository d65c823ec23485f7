use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use eyre::{Result, bail, eyre};
use multistore::prelude::*;
use rand::Rng;
use rand::distr::{Alphanumeric, SampleString};
use tokio::task;

const CONTAINER_SIZE: usize = 200_000;
const SAMPLES: usize = 100;

/// Row carrying a heap buffer, so moving rows around is not free.
#[derive(Debug, Clone)]
struct Blob {
    x: i32,
    y: i32,
    buffer: Vec<u8>,
}

impl Blob {
    fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            buffer: vec![0; 1024],
        }
    }
}

impl MemStat for Blob {
    fn heap_size(&self) -> usize {
        self.buffer.heap_size()
    }
    fn used_size(&self) -> usize {
        self.buffer.used_size()
    }
}

indexes! {
    struct BlobIndexes for Blob {
        by_x: OrderedIndex<Blob, i32> =
            OrderedIndex::non_unique("by_x", Order::Asc, |b: &Blob| b.x),
        by_y: OrderedIndex<Blob, i32> =
            OrderedIndex::non_unique("by_y", Order::Desc, |b: &Blob| b.y),
    }
}

#[derive(Debug, Clone)]
struct Stock {
    market_ref: String,
    id: String,
    price: OrderedFloat<f64>,
    volume: i32,
}

impl MemStat for Stock {
    fn heap_size(&self) -> usize {
        self.market_ref.heap_size() + self.id.heap_size()
    }
    fn used_size(&self) -> usize {
        self.market_ref.used_size() + self.id.used_size()
    }
}

indexes! {
    struct StockIndexes for Stock {
        by_reference: HashedIndex<Stock, String> =
            HashedIndex::unique("by_reference", |s: &Stock| s.market_ref.clone()),
        by_id: HashedIndex<Stock, String> =
            HashedIndex::non_unique("by_id", |s: &Stock| s.id.clone()),
        by_price: OrderedIndex<Stock, OrderedFloat<f64>> =
            OrderedIndex::non_unique("by_price", Order::Desc, |s: &Stock| s.price),
    }
}

fn report(desc: &str, iterations: usize, elapsed: Duration) {
    let per_iteration = elapsed.as_nanos() as f64 / iterations.max(1) as f64;
    if elapsed.as_millis() < 1 {
        println!(
            "{desc}: total_time={}us per_iteration={per_iteration:.1}ns",
            elapsed.as_micros()
        );
    } else {
        println!(
            "{desc}: total_time={}ms per_iteration={per_iteration:.1}ns",
            elapsed.as_millis()
        );
    }
}

fn run_benchmark(desc: &str, iterations: usize, mut f: impl FnMut()) {
    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    report(desc, iterations, start.elapsed());
}

fn blob_store() -> Result<()> {
    let mut rng = rand::rng();
    let mut store = MultiIndexStore::with_config(
        BlobIndexes::new(),
        StoreConfig::new("blobs").with_capacity(CONTAINER_SIZE),
    );

    let mut failed = 0;
    run_benchmark(
        &format!("store <insert {CONTAINER_SIZE} elements>"),
        CONTAINER_SIZE,
        || {
            let blob = Blob::new(rng.random_range(0..1_000_000), rng.random_range(0..1_000_000));
            if store.insert(blob).is_err() {
                failed += 1;
            }
        },
    );
    if failed > 0 {
        bail!("{failed} inserts were rejected by non-unique indexes");
    }

    let mut found = 0;
    run_benchmark(&format!("store <lookup {SAMPLES} elements>"), SAMPLES, || {
        found += store.count_by(|i| &i.by_x, &rng.random_range(0..1_000_000));
    });
    println!("found={found}");

    let mut sum = 0i64;
    let start = Instant::now();
    for blob in store.iter(|i| &i.by_x) {
        sum += i64::from(blob.x);
    }
    report("store <container walk>", store.len(), start.elapsed());
    println!("walk checksum={sum}");

    let start = Instant::now();
    let mut erased = 0;
    for x in 0..1_000 {
        erased += store.erase_by(|i| &i.by_x, &x);
    }
    report("store <erase 1000 keys>", 1_000, start.elapsed());
    println!("erased={erased}");

    println!("{}", store.system_info());
    Ok(())
}

/// The same workload over one `BTreeMap` per key, each holding its own copy
/// of every row.
fn copied_containers() -> Result<()> {
    let mut rng = rand::rng();
    let mut by_x: BTreeMap<(i32, usize), Blob> = BTreeMap::new();
    let mut by_y: BTreeMap<(i32, usize), Blob> = BTreeMap::new();

    let mut n = 0;
    run_benchmark(
        &format!("copied maps <insert {CONTAINER_SIZE} elements>"),
        CONTAINER_SIZE,
        || {
            let blob = Blob::new(rng.random_range(0..1_000_000), rng.random_range(0..1_000_000));
            by_y.insert((-blob.y, n), blob.clone());
            by_x.insert((blob.x, n), blob);
            n += 1;
        },
    );

    let start = Instant::now();
    let sum: i64 = by_x.values().map(|b| i64::from(b.x)).sum();
    report("copied maps <container walk>", by_x.len(), start.elapsed());
    println!("walk checksum={sum}");

    if by_x.len() != by_y.len() {
        bail!("copied maps diverged");
    }
    Ok(())
}

async fn stock_feed() -> Result<()> {
    let store = SharedStore::new(StockIndexes::new());
    let tasks = 4;
    let per_task = 10_000;

    let start = Instant::now();
    let handles: Vec<_> = (0..tasks)
        .map(|t| {
            let store = store.clone();
            task::spawn(async move {
                let mut rng = rand::rng();
                for i in 0..per_task {
                    let stock = Stock {
                        market_ref: format!("{t}-{i}"),
                        id: Alphanumeric.sample_string(&mut rng, 3),
                        price: OrderedFloat(rng.random_range(1.0..500.0)),
                        volume: rng.random_range(1..1_000),
                    };
                    store.insert(stock)?;
                }
                Ok::<_, StoreError>(())
            })
        })
        .collect();
    for h in handles {
        h.await??;
    }
    report("shared store <concurrent insert>", tasks * per_task, start.elapsed());

    let top = store.read(|s| {
        s.index(|i| &i.by_price)
            .select()
            .limit(3)
            .execute_cloned()
    });
    for stock in &top {
        println!(
            "{} {} price={} volume={}",
            stock.market_ref, stock.id, stock.price, stock.volume
        );
    }

    let first = top.first().ok_or_else(|| eyre!("store is empty"))?;
    let same_id = store.read(|s| s.count_by(|i| &i.by_id, &first.id));
    println!("rows sharing id {}: {same_id}", first.id);

    store.read(|s| println!("{}", s.system_info()));
    Ok(())
}

#[tokio::main(worker_threads = 4)]
async fn main() -> Result<()> {
    blob_store()?;
    copied_containers()?;
    stock_feed().await?;
    Ok(())
}
