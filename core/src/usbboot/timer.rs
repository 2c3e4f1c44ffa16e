//! usbboot/timer.rs
//! Async sleep used for the inter-stage settle delay.

use std::thread;
use std::time::Duration;

use futures::channel::oneshot;

#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

/// Runtime-agnostic timer: a helper thread sleeps and completes a oneshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadTimer;

impl Timer for ThreadTimer {
    async fn sleep(&self, duration: Duration) {
        let (tx, rx) = oneshot::channel::<()>();
        thread::spawn(move || {
            thread::sleep(duration);
            let _ = tx.send(());
        });
        // A dropped sender still means the thread is gone; either way we are done waiting.
        let _ = rx.await;
    }
}
