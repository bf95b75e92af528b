//! Benchmarks for model construction and per-request scoring
//!
//! Run with: cargo bench --package engines
//!
//! Uses a generated catalog so the benches run without any dataset files.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use engines::{CollaborativeEngine, ContentEngine, ContentFeatures, InteractionMatrix};
use catalog::{Book, Catalog, Interaction};
use std::sync::Arc;

const N_USERS: u32 = 200;
const N_BOOKS: u32 = 150;

fn generate_books() -> Vec<Book> {
    let genres = ["Mystery", "Fantasy", "Romance", "Thriller", "Biography"];
    let tags = ["dark", "uplifting", "classic", "page-turner", "atmospheric"];

    (1..=N_BOOKS)
        .map(|id| Book {
            id,
            title: format!("Generated Book {}", id),
            author: format!("Author {}", id % 23),
            narrator: format!("Narrator {}", id % 17),
            genre: genres[id as usize % genres.len()].to_string(),
            description: format!(
                "A {} story about {} and {}",
                tags[id as usize % tags.len()],
                tags[(id as usize + 1) % tags.len()],
                tags[(id as usize + 2) % tags.len()],
            ),
            tags: vec![
                tags[id as usize % tags.len()].to_string(),
                tags[(id as usize + 2) % tags.len()].to_string(),
            ],
            duration_minutes: 180 + (id * 37) % 900,
            rating: 3.0 + f32::from((id % 20) as u16) / 10.0,
        })
        .collect()
}

fn generate_interactions() -> Vec<Interaction> {
    let mut interactions = Vec::new();
    for user_id in 1..=N_USERS {
        // Each user listens to a deterministic slice of the catalog
        for k in 0..15u32 {
            let book_id = 1 + (user_id * 7 + k * 11) % N_BOOKS;
            interactions.push(Interaction {
                user_id,
                book_id,
                progress: 10.0 + ((user_id + k) % 10) as f32 * 10.0,
                rating: if k % 3 == 0 {
                    Some(1.0 + ((user_id + k) % 5) as f32)
                } else {
                    None
                },
                timestamp: 1_700_000_000 + i64::from(user_id * 100 + k),
            });
        }
    }
    interactions
}

fn bench_build_collaborative(c: &mut Criterion) {
    let interactions = generate_interactions();

    c.bench_function("build_collaborative_engine", |b| {
        b.iter(|| {
            let matrix = InteractionMatrix::build(black_box(&interactions)).unwrap();
            black_box(CollaborativeEngine::new(matrix))
        })
    });
}

fn bench_build_content(c: &mut Criterion) {
    let books = generate_books();
    let catalog = Arc::new(Catalog::from_tables(books.clone(), Vec::new()).unwrap());

    c.bench_function("build_content_engine", |b| {
        b.iter(|| {
            let features = ContentFeatures::build(black_box(&books));
            black_box(ContentEngine::new(catalog.clone(), features))
        })
    });
}

fn bench_predict(c: &mut Criterion) {
    let matrix = InteractionMatrix::build(&generate_interactions()).unwrap();
    let engine = CollaborativeEngine::new(matrix);

    c.bench_function("collaborative_predict", |b| {
        b.iter(|| {
            let predictions = engine.predict(black_box(1), black_box(20), true).unwrap();
            black_box(predictions)
        })
    });
}

fn bench_similar_books(c: &mut Criterion) {
    let books = generate_books();
    let features = ContentFeatures::build(&books);
    let catalog = Arc::new(Catalog::from_tables(books, Vec::new()).unwrap());
    let engine = ContentEngine::new(catalog, features);

    c.bench_function("content_similar_books", |b| {
        b.iter(|| {
            let similar = engine.similar_books(black_box(1), black_box(20)).unwrap();
            black_box(similar)
        })
    });
}

criterion_group!(
    benches,
    bench_build_collaborative,
    bench_build_content,
    bench_predict,
    bench_similar_books
);
criterion_main!(benches);
