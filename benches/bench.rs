// Criterion benchmarks for Nourish Match

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nourish_match::core::derive_notifications;
use nourish_match::models::FoodAlert;
use nourish_match::services::parse_tips;

fn create_alert(id: usize, matched: bool) -> FoodAlert {
    FoodAlert {
        id: id.to_string(),
        account_id: "u1".to_string(),
        food_type: "Canned Goods".to_string(),
        quantity: 1 + (id % 5) as u32,
        special_notes: None,
        location: "12 Baker St, Springfield, IL, USA".to_string(),
        expiration_date: Utc::now() + Duration::days(3),
        is_matched: matched,
        created_at: None,
    }
}

fn bench_derive_notifications(c: &mut Criterion) {
    let own_alerts: Vec<FoodAlert> = (0..100).map(|i| create_alert(i, i == 99)).collect();

    c.bench_function("derive_notifications", |b| {
        b.iter(|| derive_notifications(black_box(&own_alerts), black_box(7)));
    });
}

fn bench_parse_tips(c: &mut Criterion) {
    let text = "1. **Plan your meals** for the week before shopping\n\
                2. Store produce properly to extend its life\n\
                3. Compost scraps you cannot eat\n\
                4. Freeze bread and leftovers before they spoil\n\
                5. Share surplus food with neighbors\n";

    c.bench_function("parse_tips", |b| {
        b.iter(|| parse_tips(black_box(text)));
    });
}

criterion_group!(benches, bench_derive_notifications, bench_parse_tips);
criterion_main!(benches);
