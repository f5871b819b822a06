//! Building a small sparse tensor with string-labelled dimensions.
//!
//! Run with:
//! ```bash
//! cargo run --example basic_addresses
//! RUST_LOG=tenaddr_label=debug cargo run --example basic_addresses --features tracing
//! ```

use anyhow::Result;
use tenaddr::core::parallel::par_of_strings;
use tenaddr::label::tracing_support::{init_tracing, TracingConfig};
use tenaddr::prelude::*;

fn main() -> Result<()> {
    init_tracing(TracingConfig::default())?;

    let cache = LabelCache::with_config(CacheConfig::from_env())?;
    let dims = Dimensions::new(["city", "month"])?;

    // Cells of a (city, month) -> temperature tensor
    let readings = [
        ("oslo", 1, -4.3),
        ("oslo", 7, 17.1),
        ("lisbon", 1, 11.6),
        ("lisbon", 7, 23.5),
    ];

    let mut cells = CellMap::new(dims.len());
    for (city, month, value) in readings {
        let mut builder = AddressBuilder::new(&dims);
        builder.add_string(&cache, "city", city)?;
        builder.add_index("month", month)?;
        cells.insert(builder.build()?, value)?;
    }

    println!("{} cells, {} live labels", cells.nnz(), cache.size());
    for address in cells.sorted_addresses() {
        println!("  {} = {:.1}", address.to_string_with(&dims)?, cells[address]);
    }

    // Same coordinates, built from raw strings, find the same cell
    let key = TensorAddress::of_labels([cache.get_or_create_label("oslo")?, Label::index(7)]);
    println!("oslo in july: {:?}", cells.get(&key));

    // Batch construction shares one cache across threads
    let rows: Vec<Vec<String>> = (0..1_000)
        .map(|i| vec![format!("sensor{}", i % 10), "reading".to_string()])
        .collect();
    let batch = par_of_strings(&cache, &rows)?;
    println!("{} batch addresses, {} live labels", batch.len(), cache.size());

    drop(batch);
    drop(cells);
    drop(key);
    println!("after drop: {} live labels, stats {:?}", cache.size(), cache.stats());

    Ok(())
}
