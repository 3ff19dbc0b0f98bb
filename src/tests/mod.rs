
use crate::catalog::{Catalog, LoadOptions};
use crate::recommender::{Recommender, RecommenderOptions};

/// Dune / Foundation / Emma.
pub const THREE_BOOKS: &str = "\
title,authors,categories,average_rating,ratings_count,num_pages,published_year,thumbnail
Dune,Frank Herbert,Science Fiction,4.5,1000,412,1965,http://img/dune
Foundation,Isaac Asimov,Science Fiction,4.2,500,255,1951,http://img/foundation
Emma,Jane Austen,Romance,4.0,200,474,1815,http://img/emma
";

/// Abbreviated headers, ignored description columns, gaps to fill and a row
/// without a page count.
pub const RAW_BOOKS: &str = "\
 title ,subtitle,authors,categories,thumbnail,description, published ,average_r,num_page,ratings_count
Dune,,Frank Herbert,Science Fiction,http://img/dune,Spice  and   sand,1965,4.5,412,1000
Foundation,,Isaac Asimov,Science Fiction,,Empire,1951,4.2,255,500
Emma,,Jane Austen,Romance,http://img/emma,,1815,4.0,474,200
Missing Pages,,Nobody,Science Fiction,,,2000,5.0,,99999
Dune   Messiah,,Frank Herbert,\"Science Fiction, Classics\",,,1969,,256,
The Unknown,,,,,,2001.0,3.0,100.0,10
";

pub fn load_str(csv: &str) -> Catalog {
    Catalog::from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap()
}

pub fn build_str(csv: &str) -> Recommender {
    Recommender::build(load_str(csv), &RecommenderOptions::default())
}

pub fn titles(books: &[&crate::catalog::Book]) -> Vec<String> {
    books.iter().map(|b| b.title.clone()).collect()
}
