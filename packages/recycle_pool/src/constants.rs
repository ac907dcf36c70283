// A poisoned lock means another thread panicked while mutating pool state. We can no longer
// tell which items are idle and which are checked out, so continuing is not safe (we panic).
pub(crate) const ERR_POISONED_LOCK: &str = "encountered poisoned lock - item ownership \
    can no longer be tracked reliably";
