use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Insertion-ordered set of listener registrations.
///
/// Registering the same listener twice is allowed and yields two
/// notifications. Unregistering removes the first matching registration and
/// is a no-op for listeners that are not registered. Listeners are matched by
/// identity (`Arc` address), not by value.
///
/// Notification iterates a snapshot taken before the first listener runs and
/// no lock is held while listener code executes: a listener that registers or
/// unregisters during a notification affects only later notifications.
pub struct ListenerRegistry<L: ?Sized> {
    listeners: RwLock<Vec<Arc<L>>>,
}

impl<L: ?Sized> ListenerRegistry<L> {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn register(&self, listener: Arc<L>) {
        self.listeners.write().push(listener);
    }

    /// Returns whether a registration was removed
    pub fn unregister(&self, listener: &Arc<L>) -> bool {
        let mut listeners = self.listeners.write();
        match listeners.iter().position(|l| same_listener(l, listener)) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, listener: &Arc<L>) -> bool {
        self.listeners.read().iter().any(|l| same_listener(l, listener))
    }

    pub fn snapshot(&self) -> Vec<Arc<L>> {
        self.listeners.read().clone()
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Call `notify` for every registered listener, in registration order.
    /// Returns the number of listeners notified.
    pub fn notify_all(&self, mut notify: impl FnMut(&L)) -> usize {
        let snapshot = self.snapshot();
        for listener in &snapshot {
            notify(&**listener);
        }
        snapshot.len()
    }
}

impl<L: ?Sized> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> fmt::Debug for ListenerRegistry<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

// Compare data addresses only; vtable pointers of the same object may differ.
fn same_listener<L: ?Sized>(a: &Arc<L>, b: &Arc<L>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    trait Recorder: Send + Sync {
        fn record(&self, value: &str);
    }

    struct Named {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder for Named {
        fn record(&self, value: &str) {
            self.log.lock().push(format!("{}:{}", self.name, value));
        }
    }

    fn named(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn Recorder> {
        Arc::new(Named {
            name,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn test_notifies_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry: ListenerRegistry<dyn Recorder> = ListenerRegistry::new();
        registry.register(named("a", &log));
        registry.register(named("b", &log));
        registry.register(named("c", &log));

        let notified = registry.notify_all(|l| l.record("x"));

        assert_eq!(notified, 3);
        assert_eq!(*log.lock(), vec!["a:x", "b:x", "c:x"]);
    }

    #[test]
    fn test_duplicate_registration_notifies_twice() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry: ListenerRegistry<dyn Recorder> = ListenerRegistry::new();
        let listener = named("a", &log);
        registry.register(Arc::clone(&listener));
        registry.register(Arc::clone(&listener));

        registry.notify_all(|l| l.record("x"));
        assert_eq!(log.lock().len(), 2);

        assert!(registry.unregister(&listener));
        assert!(registry.contains(&listener));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_unknown_listener_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry: ListenerRegistry<dyn Recorder> = ListenerRegistry::new();
        let registered = named("a", &log);
        let stranger = named("a", &log);
        registry.register(Arc::clone(&registered));

        assert!(!registry.unregister(&stranger));
        assert!(registry.unregister(&registered));
        assert!(!registry.unregister(&registered));
        assert!(registry.is_empty());
    }

    struct SelfRemoving {
        registry: Arc<ListenerRegistry<dyn Recorder>>,
        me: Mutex<Option<Arc<dyn Recorder>>>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder for SelfRemoving {
        fn record(&self, value: &str) {
            self.log.lock().push(format!("self:{value}"));
            if let Some(me) = self.me.lock().take() {
                self.registry.unregister(&me);
            }
        }
    }

    #[test]
    fn test_self_unregister_during_notification_applies_to_next_round() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry: Arc<ListenerRegistry<dyn Recorder>> = Arc::new(ListenerRegistry::new());
        let remover = Arc::new(SelfRemoving {
            registry: Arc::clone(&registry),
            me: Mutex::new(None),
            log: Arc::clone(&log),
        });
        let as_listener: Arc<dyn Recorder> = remover.clone();
        *remover.me.lock() = Some(Arc::clone(&as_listener));

        registry.register(as_listener);
        registry.register(named("b", &log));

        assert_eq!(registry.notify_all(|l| l.record("1")), 2);
        assert_eq!(registry.notify_all(|l| l.record("2")), 1);
        assert_eq!(*log.lock(), vec!["self:1", "b:1", "b:2"]);
    }
}
