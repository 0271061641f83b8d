//! Bookshelf: the books configured for a run and the order they are visited in.
//!
//! A book declared more than once is still one [`Book`]: each declaration
//! becomes an entry pointing at the shared book, so generators, guards and
//! deferred tasks all see the same state.

use super::{Book, BookConfig};
use std::path::Path;
use tracing::warn;

/// One configured visit of a book, with the generators declared for it
#[derive(Debug)]
struct Entry {
    book: usize,
    generate: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Bookshelf {
    books: Vec<Book>,
    entries: Vec<Entry>,
}

impl Bookshelf {
    /// Build a shelf from books in visiting order. A repeated id becomes a
    /// second entry for the first book with that id; the repeat's own
    /// generator list is kept for that entry.
    pub fn new(books: Vec<Book>) -> Self {
        let mut shelf = Self::default();
        for book in books {
            match shelf.books.iter().position(|b| b.id == book.id) {
                Some(index) => {
                    warn!(book = %book.id, "Book declared more than once in configuration");
                    shelf.entries.push(Entry {
                        book: index,
                        generate: book.generate,
                    });
                }
                None => {
                    shelf.entries.push(Entry {
                        book: shelf.books.len(),
                        generate: book.generate.clone(),
                    });
                    shelf.books.push(book);
                }
            }
        }
        shelf
    }

    pub fn from_configs(configs: &[BookConfig], content_dir: &Path) -> Self {
        Self::new(
            configs
                .iter()
                .map(|config| Book::from_config(config, content_dir))
                .collect(),
        )
    }

    /// Number of distinct books
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Number of configured visits, counting repeated declarations
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Ids in visiting order, repeats included
    pub fn entry_ids(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|entry| self.books[entry.book].id.as_str())
    }

    /// The book visited at `index` together with the generators declared there
    pub fn entry_mut(&mut self, index: usize) -> Option<(&mut Book, &[String])> {
        let entry = self.entries.get(index)?;
        let book = self.books.get_mut(entry.book)?;
        Some((book, entry.generate.as_slice()))
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.id == id)
    }

    /// Keep only the named books, preserving visiting order.
    ///
    /// Returns the first requested id that is not on the shelf.
    pub fn retain_ids(&mut self, ids: &[String]) -> Result<(), String> {
        if let Some(missing) = ids.iter().find(|id| self.get(id).is_none()) {
            return Err(missing.clone());
        }

        let mut remap = Vec::with_capacity(self.books.len());
        let mut kept = 0;
        for book in &self.books {
            if ids.contains(&book.id) {
                remap.push(Some(kept));
                kept += 1;
            } else {
                remap.push(None);
            }
        }

        self.books.retain(|b| ids.contains(&b.id));
        self.entries.retain_mut(|entry| match remap[entry.book] {
            Some(index) => {
                entry.book = index;
                true
            }
            None => false,
        });
        Ok(())
    }
}
