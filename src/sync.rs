//! Synchronization primitives with conditional compilation.
//!
//! Provides a unified mutex interface that uses `parking_lot::Mutex` when
//! the `fast-lock` feature is enabled, falling back to `std::sync::Mutex` otherwise.
//! Group stores use it to serialize concurrent appends.

#[cfg(feature = "fast-lock")]
use parking_lot::Mutex as ParkingLotMutex;

#[cfg(not(feature = "fast-lock"))]
use std::sync::Mutex as StdMutex;

/// Mutex type that conditionally uses parking_lot or std::sync::Mutex.
///
/// # Example
///
/// ```rust
/// use lexner::sync::{lock, Mutex};
///
/// let data = Mutex::new(42);
/// *lock(&data) = 100;
/// assert_eq!(*lock(&data), 100);
/// ```
#[cfg(feature = "fast-lock")]
pub type Mutex<T> = ParkingLotMutex<T>;

/// Mutex type that conditionally uses parking_lot or std::sync::Mutex.
#[cfg(not(feature = "fast-lock"))]
pub type Mutex<T> = StdMutex<T>;

/// Lock a mutex and return the guard, handling poisoning gracefully.
///
/// For `std::sync::Mutex` a poisoned lock is recovered: stores only ever
/// append whole records, so the data behind a poisoned lock is still valid.
#[cfg(feature = "fast-lock")]
pub fn lock<T>(mutex: &Mutex<T>) -> parking_lot::MutexGuard<'_, T> {
    mutex.lock()
}

/// Lock a mutex and return the guard, handling poisoning gracefully.
#[cfg(not(feature = "fast-lock"))]
pub fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_shared_across_threads() {
        let mutex = std::sync::Arc::new(Mutex::new(Vec::<u32>::new()));
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let mutex = std::sync::Arc::clone(&mutex);
                std::thread::spawn(move || lock(&mutex).push(n))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let mut seen = lock(&mutex).clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
