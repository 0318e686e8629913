use data_loader::Catalog;
use std::path::Path;
use std::time::Instant;

fn main() {
    let path = Path::new("final_movies.csv");

    println!("Loading movie catalog...\n");

    let start = Instant::now();
    let catalog = Catalog::load_from_file(path)
        .expect("Failed to load catalog");
    let elapsed = start.elapsed();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", catalog.len());
    for genre in catalog.genres().iter() {
        println!("  {}: {}", genre, catalog.count_in_genre(genre));
    }
    println!("\nPerformance: {:.0} movies/second",
             catalog.len() as f64 / elapsed.as_secs_f64());
}
