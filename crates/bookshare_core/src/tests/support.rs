//! In-memory fakes for every port, shared by the unit and scenario tests.

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Book, BookId, Genre, PushMessage, Rating, UserId};
use crate::ports::{
    BookStore, Clock, NotificationSender, PortError, PortResult, RandomSource, UserDirectory,
};

pub fn book(title: &str, genre: Genre) -> Book {
    Book::new(title, "Test Author", Uuid::new_v4(), genre, Utc::now())
}

pub fn rated(mut book: Book, votes: &[(UserId, u8)]) -> Book {
    for &(user_id, value) in votes {
        book.apply_rating(Rating {
            user_id,
            value,
            rated_at: Utc::now(),
        });
    }
    book
}

pub fn titles(books: &[Book]) -> Vec<String> {
    books.iter().map(|b| b.title.clone()).collect()
}

//=========================================================================================
// BookStore
//=========================================================================================

#[derive(Default)]
pub struct MemoryStore {
    books: RwLock<Vec<Book>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub async fn insert(&self, book: Book) -> BookId {
        let id = book.id;
        self.books.write().await.push(book);
        id
    }

    pub async fn get_book(&self, id: BookId) -> Book {
        self.get(id).await.expect("book should exist")
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn get(&self, id: BookId) -> PortResult<Book> {
        let found = self.books.read().await.iter().find(|b| b.id == id).cloned();
        // Give other tasks a chance to interleave between a read and its save.
        tokio::task::yield_now().await;
        found.ok_or_else(|| PortError::NotFound(format!("Book {} not found", id)))
    }

    async fn list_all(&self) -> PortResult<Vec<Book>> {
        Ok(self.books.read().await.clone())
    }

    async fn save(&self, book: Book) -> PortResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("disk full".to_string()));
        }
        let mut books = self.books.write().await;
        match books.iter_mut().find(|b| b.id == book.id) {
            Some(slot) => *slot = book,
            None => books.push(book),
        }
        Ok(())
    }

    async fn count_all(&self) -> PortResult<usize> {
        Ok(self.books.read().await.len())
    }
}

//=========================================================================================
// UserDirectory
//=========================================================================================

#[derive(Default)]
pub struct MemoryUsers {
    tokens: Vec<String>,
}

impl MemoryUsers {
    pub fn with_tokens(tokens: &[&str]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryUsers {
    async fn push_tokens(&self) -> PortResult<Vec<String>> {
        Ok(self.tokens.clone())
    }
}

//=========================================================================================
// Clock & RandomSource
//=========================================================================================

pub struct FixedClock {
    day: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self {
            day: Mutex::new(NaiveDate::from_ymd_opt(year, month, day).expect("valid date")),
        }
    }

    pub fn advance_days(&self, days: u64) {
        let mut day = self.day.lock().unwrap();
        *day = day.checked_add_days(Days::new(days)).expect("date in range");
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.day.lock().unwrap()
    }
}

/// Replays scripted offsets, then `0` once the script runs out.
pub struct ScriptedRandom {
    script: Mutex<VecDeque<usize>>,
    draws: AtomicUsize,
}

impl ScriptedRandom {
    pub fn new(script: Vec<usize>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            draws: AtomicUsize::new(0),
        }
    }

    pub fn draws(&self) -> usize {
        self.draws.load(Ordering::SeqCst)
    }
}

impl RandomSource for ScriptedRandom {
    fn index_up_to(&self, upper: usize) -> usize {
        self.draws.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().pop_front().unwrap_or(0).min(upper)
    }
}

//=========================================================================================
// NotificationSender
//=========================================================================================

#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<Vec<PushMessage>>>,
    attempts: AtomicUsize,
    fail: AtomicBool,
    delay: Mutex<Duration>,
}

impl RecordingSender {
    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Makes every following send wait `delay` before it completes.
    pub fn delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Number of batches delivered successfully.
    pub fn batches(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent_messages(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send_batch(&self, messages: &[PushMessage]) -> PortResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(PortError::Unavailable("push provider down".to_string()));
        }
        self.sent.lock().unwrap().push(messages.to_vec());
        Ok(())
    }
}
