//! Random demo dataset in the bulk-load format.

use crate::record::NewRecord;
use rand::seq::SliceRandom;
use rand::Rng;
use std::io::{self, Write};

const TITLE_LEADS: &[&str] = &[
    "The",
    "A",
    "An",
    "Mystery of",
    "Secrets of",
    "Journey to",
    "Chronicles of",
];
const TITLE_NOUNS: &[&str] = &[
    "Lost City",
    "Great Adventure",
    "Hidden Treasure",
    "Ancient Secrets",
    "Wanderers",
    "Forgotten World",
    "Endless Dream",
];
const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Alex", "Emily", "Michael", "Sarah", "Robert", "Jessica", "David", "Laura",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Martinez",
    "Lopez",
];

/// Genre vocabulary used by the generator.
pub const GENRES: &[&str] = &[
    "Fiction",
    "Non-Fiction",
    "Fantasy",
    "Science Fiction",
    "Biography",
    "History",
    "Mystery",
    "Romance",
    "Horror",
    "Adventure",
];

/// Borrow counts are drawn from `0..MAX_SEED_COUNT`.
pub const MAX_SEED_COUNT: u64 = 50;

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, words: &[&'a str]) -> &'a str {
    words.choose(rng).copied().unwrap_or_default()
}

/// Generate `n` random records with one genre each.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<NewRecord> {
    (0..n)
        .map(|_| NewRecord {
            title: format!("{} {}", pick(rng, TITLE_LEADS), pick(rng, TITLE_NOUNS)),
            author: format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)),
            genres: vec![pick(rng, GENRES).to_string()],
            borrow_count: rng.gen_range(0..MAX_SEED_COUNT),
        })
        .collect()
}

/// Write records one per line in the bulk-load format.
pub fn write_dataset<W: Write>(mut out: W, records: &[NewRecord]) -> io::Result<()> {
    for record in records {
        writeln!(out, "{}", record)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::loader::{load_reader, LoadReport};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    #[test]
    fn test_generate_uses_vocabulary() {
        let mut rng = StdRng::seed_from_u64(5);
        let records = generate(&mut rng, 200);
        assert_eq!(records.len(), 200);
        for r in &records {
            assert!(TITLE_NOUNS.iter().any(|n| r.title.ends_with(n)));
            assert_eq!(r.genres.len(), 1);
            assert!(GENRES.contains(&r.genres[0].as_str()));
            assert!(r.borrow_count < MAX_SEED_COUNT);
        }
    }

    #[test]
    fn test_generated_dataset_loads_cleanly() {
        let mut rng = StdRng::seed_from_u64(8);
        let records = generate(&mut rng, 100);
        let mut buf = Vec::new();
        write_dataset(&mut buf, &records).unwrap();

        let mut catalog = Catalog::new();
        let report = load_reader(&mut catalog, Cursor::new(buf)).unwrap();
        assert_eq!(report, LoadReport { loaded: 100, skipped: 0 });
        assert_eq!(catalog.len(), 100);
    }
}
