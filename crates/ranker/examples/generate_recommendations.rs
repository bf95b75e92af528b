//! Example: Generate hybrid recommendations for a few users
//!
//! Run with: cargo run --package ranker --example generate_recommendations
//!
//! This example shows how to:
//! 1. Assemble book and interaction tables (synthetic, in memory)
//! 2. Build the hybrid model once
//! 3. Request ranked recommendations per user
//! 4. Display the blended and per-engine scores

use catalog::{Book, Interaction};
use ranker::{BlendWeights, HybridRecommender};
use std::time::Instant;

const N_USERS: u32 = 50;
const N_BOOKS: u32 = 60;

fn generate_books() -> Vec<Book> {
    let genres = ["Mystery", "Fantasy", "Romance", "Thriller", "Biography"];
    let tags = ["dark", "uplifting", "classic", "page-turner", "atmospheric"];

    (1..=N_BOOKS)
        .map(|id| Book {
            id,
            title: format!("Generated Book {}", id),
            author: format!("Author {}", id % 13),
            narrator: format!("Narrator {}", id % 7),
            genre: genres[id as usize % genres.len()].to_string(),
            description: format!(
                "A {} story about {} and {}",
                tags[id as usize % tags.len()],
                tags[(id as usize + 1) % tags.len()],
                tags[(id as usize + 3) % tags.len()],
            ),
            tags: vec![
                tags[id as usize % tags.len()].to_string(),
                tags[(id as usize + 2) % tags.len()].to_string(),
            ],
            duration_minutes: 180 + (id * 41) % 720,
            rating: 3.0 + f32::from((id % 20) as u16) / 10.0,
        })
        .collect()
}

fn generate_interactions() -> Vec<Interaction> {
    let mut interactions = Vec::new();
    for user_id in 1..=N_USERS {
        // Each user listens to a deterministic slice of the catalog
        for k in 0..12u32 {
            let book_id = 1 + (user_id * 5 + k * 13) % N_BOOKS;
            interactions.push(Interaction {
                user_id,
                book_id,
                progress: 20.0 + ((user_id + k) % 9) as f32 * 10.0,
                rating: if k % 2 == 0 {
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

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== Audiobook Hybrid Recommendation Example ===\n");

    let books = generate_books();
    let interactions = generate_interactions();
    println!(
        "Generated {} books and {} interactions",
        books.len(),
        interactions.len()
    );

    // Build the model once; requests read the immutable snapshot
    let start = Instant::now();
    let weights = BlendWeights::new(0.6, 0.4)?;
    let model = HybridRecommender::build(books, interactions, weights)?;
    println!("Built hybrid model in {:?}\n", start.elapsed());

    for user_id in [1, 17, 42] {
        let start = Instant::now();
        let recommendations = model.recommend(user_id, 10);
        println!(
            "Top {} recommendations for user {} ({:?}):",
            recommendations.len(),
            user_id,
            start.elapsed()
        );
        for (rank, rec) in recommendations.iter().enumerate() {
            println!(
                "  {:2}. {} by {} [{}] hybrid={:.3} (collaborative={:.3}, content={:.3})",
                rank + 1,
                rec.title,
                rec.author,
                rec.genre,
                rec.hybrid_score,
                rec.collaborative_score,
                rec.content_score,
            );
        }
        println!();
    }

    Ok(())
}
