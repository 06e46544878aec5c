//! Generic input debouncer.
//!
//! A [`Debouncer`] accepts a stream of rapidly changing values and emits the
//! latest one only after no new value has arrived for a full window. Each new
//! value restarts the window. Dropping the [`Debouncer`] (or calling
//! [`Debouncer::cancel`]) discards whatever is pending.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use bookfinder::debounce::Debouncer;
//!
//! # async fn example() {
//! let (debouncer, mut debounced) = Debouncer::new(Duration::from_millis(500));
//! debouncer.push("d".to_string());
//! debouncer.push("du".to_string());
//! debouncer.push("dune".to_string());
//!
//! // Arrives 500ms after the last push.
//! assert_eq!(debounced.recv().await.as_deref(), Some("dune"));
//! # }
//! ```

use tokio::{
  sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
  task::JoinHandle,
  time::sleep,
};

use super::*;

/// Input side of a debounced channel. Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct Debouncer<T> {
  /// Values waiting to be debounced
  input:  UnboundedSender<T>,
  /// Task owning the timer
  worker: JoinHandle<()>,
  /// Quiet period
  delay:  Duration,
}

/// Output side of a debounced channel.
#[derive(Debug)]
pub struct Debounced<T> {
  /// Settled values
  output: UnboundedReceiver<T>,
}

impl<T: Send + 'static> Debouncer<T> {
  /// Creates a debouncer with the given quiet period.
  pub fn new(delay: Duration) -> (Self, Debounced<T>) {
    let (input, input_rx) = mpsc::unbounded_channel();
    let (output_tx, output) = mpsc::unbounded_channel();
    let worker = tokio::spawn(run(delay, input_rx, output_tx));
    (Self { input, worker, delay }, Debounced { output })
  }

  /// Records a new value, restarting the quiet period.
  pub fn push(&self, value: T) {
    if self.input.send(value).is_err() {
      trace!("Debouncer already cancelled, dropping value");
    }
  }

  /// Discards any pending value and stops emitting.
  pub fn cancel(&self) { self.worker.abort(); }

  /// The quiet period.
  pub fn delay(&self) -> Duration { self.delay }
}

impl<T> Drop for Debouncer<T> {
  fn drop(&mut self) { self.worker.abort(); }
}

impl<T> Debounced<T> {
  /// Waits for the next settled value. Returns `None` once the debouncer is gone.
  pub async fn recv(&mut self) -> Option<T> { self.output.recv().await }

  /// A settled value if one is ready right now.
  pub fn try_recv(&mut self) -> Option<T> { self.output.try_recv().ok() }
}

/// Timer loop: hold the latest value until `delay` passes without a newer one.
async fn run<T>(delay: Duration, mut input: UnboundedReceiver<T>, output: UnboundedSender<T>) {
  while let Some(mut latest) = input.recv().await {
    loop {
      tokio::select! {
        next = input.recv() => match next {
          Some(value) => latest = value,
          // input side torn down, the pending value goes with it
          None => return,
        },
        _ = sleep(delay) => {
          if output.send(latest).is_err() {
            return;
          }
          break;
        },
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use tokio::time::{advance, timeout, Instant};

  use super::*;

  const WINDOW: Duration = Duration::from_millis(500);

  #[tokio::test(start_paused = true)]
  async fn test_burst_collapses_to_last_value() {
    let (debouncer, mut debounced) = Debouncer::new(WINDOW);
    let start = Instant::now();

    debouncer.push("d");
    sleep(Duration::from_millis(100)).await;
    debouncer.push("du");
    sleep(Duration::from_millis(100)).await;
    debouncer.push("dune");

    assert_eq!(debounced.recv().await, Some("dune"));
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(700), "emitted early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(710), "emitted late: {elapsed:?}");

    // nothing else is pending
    assert!(timeout(Duration::from_secs(10), debounced.recv()).await.is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn test_no_emission_before_window() {
    let (debouncer, mut debounced) = Debouncer::new(WINDOW);
    debouncer.push(1);
    tokio::task::yield_now().await;

    advance(Duration::from_millis(499)).await;
    assert_eq!(debounced.try_recv(), None);

    advance(Duration::from_millis(1)).await;
    assert_eq!(debounced.recv().await, Some(1));
  }

  #[tokio::test(start_paused = true)]
  async fn test_separate_bursts_emit_separately() {
    let (debouncer, mut debounced) = Debouncer::new(WINDOW);
    debouncer.push("first");
    assert_eq!(debounced.recv().await, Some("first"));
    debouncer.push("second");
    assert_eq!(debounced.recv().await, Some("second"));
  }

  #[tokio::test(start_paused = true)]
  async fn test_drop_cancels_pending_emission() {
    let (debouncer, mut debounced) = Debouncer::new(WINDOW);
    debouncer.push("pending");
    sleep(Duration::from_millis(200)).await;
    drop(debouncer);

    assert_eq!(debounced.recv().await, None);
  }

  #[tokio::test(start_paused = true)]
  async fn test_cancel_discards_pending() {
    let (debouncer, mut debounced) = Debouncer::new(WINDOW);
    debouncer.push("pending");
    debouncer.cancel();
    debouncer.push("ignored");

    assert_eq!(debounced.recv().await, None);
    assert_eq!(debouncer.delay(), WINDOW);
  }
}
