//! services/client/src/debounce.rs
//!
//! Delays propagation of a rapidly changing value (typically a search box)
//! until it has been stable for a given delay.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

pub struct Debouncer<T> {
    input: watch::Sender<T>,
    output: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Must be called inside a tokio runtime.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (input, mut incoming) = watch::channel(initial.clone());
        let (settled, output) = watch::channel(initial);

        let task = tokio::spawn(async move {
            'outer: loop {
                if incoming.changed().await.is_err() {
                    break;
                }
                incoming.borrow_and_update();
                // Every new value restarts the quiet period.
                loop {
                    tokio::select! {
                        changed = incoming.changed() => {
                            if changed.is_err() {
                                break 'outer;
                            }
                            incoming.borrow_and_update();
                        }
                        _ = tokio::time::sleep(delay) => break,
                    }
                }
                let value = incoming.borrow_and_update().clone();
                settled.send_replace(value);
            }
        });

        Self { input, output, task }
    }

    pub fn with_default_delay(initial: T) -> Self {
        Self::new(initial, DEFAULT_DELAY)
    }

    /// Feeds a new raw value.
    pub fn set(&self, value: T) {
        self.input.send_replace(value);
    }

    /// The latest raw value, settled or not.
    pub fn pending(&self) -> T {
        self.input.borrow().clone()
    }

    /// The latest settled value.
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn publishes_after_quiet_period() {
        let search = Debouncer::new(String::new(), Duration::from_millis(500));
        search.set("c".into());
        sleep(Duration::from_millis(200)).await;
        search.set("ca".into());
        sleep(Duration::from_millis(400)).await;
        assert_eq!(search.current(), "");
        assert_eq!(search.pending(), "ca");

        sleep(Duration::from_millis(150)).await;
        assert_eq!(search.current(), "ca");
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_only_settled_value() {
        let search = Debouncer::with_default_delay(String::new());
        let mut settled = search.subscribe();
        for text in ["c", "ca", "cab", "cable"] {
            search.set(text.to_string());
            sleep(Duration::from_millis(100)).await;
        }
        settled.changed().await.unwrap();
        assert_eq!(*settled.borrow_and_update(), "cable");
        assert!(!settled.has_changed().unwrap());
    }
}
