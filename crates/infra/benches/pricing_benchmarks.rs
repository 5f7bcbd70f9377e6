use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use storefront_catalog::{
    CatalogDetails, Product, SimpleProduct, TaxRate, price_including_tax, reconcile,
};
use storefront_core::Entity;
use storefront_infra::{CatalogStore, InMemoryCatalog};

fn bench_calculator(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_calculator");
    let base = Decimal::new(9_999, 2);
    let rate = Decimal::from(20);
    let entered = Decimal::new(15_000, 2);

    group.bench_function("price_including_tax", |b| {
        b.iter(|| price_including_tax(black_box(base), black_box(rate)))
    });
    group.bench_function("reconcile_changed_entry", |b| {
        b.iter(|| reconcile(black_box(base), black_box(rate), black_box(Some(entered))))
    });
    group.finish();
}

fn bench_save_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_cycle");

    for count in [100u64, 1_000] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::new("save_product", count), &count, |b, &count| {
            b.iter(|| {
                let store = InMemoryCatalog::new();
                let category = store.find_or_create_category("Bench").unwrap();
                for i in 0..count {
                    let mut details =
                        CatalogDetails::new(format!("Product {i}"), format!("SKU-{i}"));
                    details.description = "Benchmark product".to_string();
                    details.short_description = "Bench".to_string();
                    details.category_id = Some(*category.id());
                    let mut product = Product::Simple(
                        SimpleProduct::new(details, Decimal::from(100))
                            .with_tax_rate(TaxRate::new("VAT", Decimal::from(20)).unwrap()),
                    );
                    product.set_price_including_tax(Some(Decimal::new(15_000, 2)));
                    store.save_product(product).unwrap();
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_calculator, bench_save_cycle);
criterion_main!(benches);
