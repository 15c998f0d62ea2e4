//! services/engine/src/adapters/memory.rs
//!
//! In-process implementations of the `BookStore` and `UserDirectory` ports.
//! Each save replaces a whole document under one write lock, which gives the
//! atomic single-document semantics the engine relies on.

use async_trait::async_trait;
use bookshare_core::{Book, BookId, BookStore, PortError, PortResult, UserDirectory, UserId};
use std::collections::HashMap;
use tokio::sync::RwLock;

//=========================================================================================
// Book store
//=========================================================================================

#[derive(Default)]
struct Shelf {
    books: Vec<Book>,
    positions: HashMap<BookId, usize>,
}

/// A book store that keeps every document in memory, in insertion order.
#[derive(Default)]
pub struct InMemoryBookStore {
    shelf: RwLock<Shelf>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn get(&self, id: BookId) -> PortResult<Book> {
        let shelf = self.shelf.read().await;
        shelf
            .positions
            .get(&id)
            .map(|&pos| shelf.books[pos].clone())
            .ok_or_else(|| PortError::NotFound(format!("Book {} not found", id)))
    }

    async fn list_all(&self) -> PortResult<Vec<Book>> {
        Ok(self.shelf.read().await.books.clone())
    }

    async fn save(&self, book: Book) -> PortResult<()> {
        let mut shelf = self.shelf.write().await;
        match shelf.positions.get(&book.id).copied() {
            Some(pos) => shelf.books[pos] = book,
            None => {
                let pos = shelf.books.len();
                shelf.positions.insert(book.id, pos);
                shelf.books.push(book);
            }
        }
        Ok(())
    }

    async fn count_all(&self) -> PortResult<usize> {
        Ok(self.shelf.read().await.books.len())
    }
}

//=========================================================================================
// User directory
//=========================================================================================

/// Registered users and the push token each one may have.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<Vec<(UserId, Option<String>)>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user or replaces their push token.
    pub async fn register(&self, user_id: UserId, push_token: Option<String>) {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|(id, _)| *id == user_id) {
            Some(entry) => entry.1 = push_token,
            None => users.push((user_id, push_token)),
        }
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn push_tokens(&self) -> PortResult<Vec<String>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .filter_map(|(_, token)| token.clone())
            .filter(|token| !token.trim().is_empty())
            .collect())
    }
}
