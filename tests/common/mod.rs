#![allow(dead_code)]

use std::env;

use blog_api::config::{Config, MEMORY_DATABASE_URL};
use blog_api::core::blog_post::{Author, BlogPost, NewBlogPost};
use blog_api::infrastructure::database::BlogPostStore;
use blog_api::{run_server, ServerHandle};

pub mod scenarios;

pub const SEED_COUNT: usize = 10;

const FIRST_NAMES: [&str; 6] = ["Ada", "Grace", "Alan", "Barbara", "Edsger", "Margaret"];
const LAST_NAMES: [&str; 6] = ["Lovelace", "Hopper", "Turing", "Liskov", "Dijkstra", "Hamilton"];
const WORDS: [&str; 8] = ["borrow", "lifetime", "trait", "async", "macro", "crate", "iterator", "closure"];

/// PostgreSQL url for the database-backed suite, if one is configured.
pub fn test_database_url() -> Option<String> {
    env::var("TEST_DATABASE_URL").ok().filter(|url| !url.trim().is_empty())
}

fn sentence(seed: usize, len: usize) -> String {
    let words: Vec<&str> = (0..len).map(|i| WORDS[(seed * 3 + i) % WORDS.len()]).collect();
    format!("{} {seed}", words.join(" "))
}

pub fn fake_post(seed: usize) -> NewBlogPost {
    NewBlogPost {
        title: sentence(seed, 4),
        content: (0..3).map(|i| sentence(seed + i, 8)).collect::<Vec<_>>().join(". "),
        author: Author::new(FIRST_NAMES[seed % FIRST_NAMES.len()], LAST_NAMES[(seed / 2) % LAST_NAMES.len()]),
    }
}

pub async fn seed_blog_posts(server: &ServerHandle) -> Vec<BlogPost> {
    let posts = (1..=SEED_COUNT).map(fake_post).collect();
    server.store().insert_many(posts).await.expect("Failed to seed blog posts")
}

pub async fn tear_down_db(server: &ServerHandle) {
    server.store().drop_all().await.expect("Failed to drop blog posts");
}

/// Start a server against `database_url` and seed it.
pub async fn start_seeded(database_url: &str) -> ServerHandle {
    let server = run_server(&Config::for_database(database_url))
        .await
        .expect("Failed to start server");
    tear_down_db(&server).await;
    seed_blog_posts(&server).await;
    server
}

pub async fn start_seeded_memory() -> ServerHandle {
    start_seeded(MEMORY_DATABASE_URL).await
}

pub async fn finish(server: ServerHandle) {
    tear_down_db(&server).await;
    server.close().await.expect("Failed to close server");
}
