//! ESP-IDF runtime symbols required by `critical-section` and `embassy-time`.
//!
//! The transport event channel locks through `critical-section`; every
//! [`Instant`](embassy_time::Instant) the main loop creates reads the clock
//! through `_embassy_time_now`.  Neither crate ships an ESP-IDF backend in
//! this dependency set, so the binary provides them here.

#[cfg(target_os = "espidf")]
mod imp {
    use core::cell::{Cell, RefCell};
    use core::time::Duration;
    use std::sync::{Mutex, MutexGuard};

    /// One global lock; nesting is tracked per thread.
    static CS_LOCK: Mutex<()> = Mutex::new(());

    thread_local! {
        static CS_DEPTH: Cell<u8> = const { Cell::new(0) };
        static CS_GUARD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
        let depth = CS_DEPTH.with(Cell::get);
        if depth == 0 {
            // A panic while holding the lock cannot leave the unit data torn.
            let guard = CS_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            CS_GUARD.with(|slot| *slot.borrow_mut() = Some(guard));
        }
        let depth = depth.saturating_add(1);
        CS_DEPTH.with(|d| d.set(depth));
        depth
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn _critical_section_1_0_release(_token: u8) {
        let depth = CS_DEPTH.with(Cell::get);
        if depth == 0 {
            return;
        }
        CS_DEPTH.with(|d| d.set(depth - 1));
        if depth == 1 {
            CS_GUARD.with(|slot| slot.borrow_mut().take());
        }
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn _embassy_time_now() -> u64 {
        crate::adapters::time::now_micros()
    }

    /// Driver half of the `embassy-time` timer queue.  Required at link time
    /// by the `generic-queue-8` feature; nothing in this firmware awaits an
    /// `embassy-time` timer, so it is not expected to run.
    #[unsafe(no_mangle)]
    pub extern "C" fn _embassy_time_schedule_wake(at: u64, waker: *mut core::ffi::c_void) {
        if waker.is_null() {
            return;
        }
        // SAFETY: embassy-time hands over a valid `Waker` for the duration
        // of the call; it is cloned before returning.
        let waker = unsafe { (*(waker as *const core::task::Waker)).clone() };
        std::thread::spawn(move || {
            let now = _embassy_time_now();
            if at > now {
                std::thread::sleep(Duration::from_micros(at - now));
            }
            waker.wake();
        });
    }
}
