//! Progress observers for long-running matrix builds and field sweeps.
//!
//! Observers are ticked once per completed unit of work (a matrix row or a
//! field value), possibly from several threads at once. They never affect
//! numerical results.

use std::{
    io::Write,
    sync::{
        Mutex,
        atomic::{ AtomicUsize, Ordering },
    },
};

/// Receives progress updates.
pub trait Progress: Sync {
    /// Called once before any work is done.
    fn start(&self, _desc: &str, _total: usize) { }

    /// Called once per completed unit of work.
    fn tick(&self) { }

    /// Called once after all work is done.
    fn finish(&self) { }
}

/// Discards all updates.
#[derive(Copy, Clone, Debug, Default)]
pub struct Silent;

impl Progress for Silent { }

/// Prints a running percentage to stderr.
#[derive(Debug, Default)]
pub struct Bar {
    desc: Mutex<String>,
    total: AtomicUsize,
    done: AtomicUsize,
}

impl Bar {
    pub fn new() -> Self { Self::default() }

    fn print(&self, done: usize, total: usize) {
        let desc = self.desc.lock().map(|d| d.clone()).unwrap_or_default();
        let pct = if total == 0 { 100 } else { 100 * done / total };
        let mut stderr = std::io::stderr().lock();
        // progress output is best-effort
        let _ = write!(stderr, "\r{desc}: {pct:>3}% ({done}/{total})");
        let _ = stderr.flush();
    }
}

impl Progress for Bar {
    fn start(&self, desc: &str, total: usize) {
        if let Ok(mut d) = self.desc.lock() { *d = desc.to_string(); }
        self.total.store(total, Ordering::Relaxed);
        self.done.store(0, Ordering::Relaxed);
        self.print(0, total);
    }

    fn tick(&self) {
        let total = self.total.load(Ordering::Relaxed);
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        // only redraw when the displayed percentage changes
        if total == 0 || (100 * done / total) != (100 * (done - 1) / total) {
            self.print(done, total);
        }
    }

    fn finish(&self) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr);
    }
}

/// Forwards `(done, total)` to a closure on every tick.
pub struct Callback<F>
where F: Fn(usize, usize) + Sync
{
    f: F,
    total: AtomicUsize,
    done: AtomicUsize,
}

impl<F> Callback<F>
where F: Fn(usize, usize) + Sync
{
    pub fn new(f: F) -> Self {
        Self { f, total: AtomicUsize::new(0), done: AtomicUsize::new(0) }
    }
}

impl<F> Progress for Callback<F>
where F: Fn(usize, usize) + Sync
{
    fn start(&self, _desc: &str, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.done.store(0, Ordering::Relaxed);
    }

    fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        (self.f)(done, self.total.load(Ordering::Relaxed));
    }
}

/// Return [`Bar`] if `show` is `true`, otherwise [`Silent`].
pub fn select(show: bool) -> Box<dyn Progress> {
    if show { Box::new(Bar::new()) } else { Box::new(Silent) }
}
