//! The object injection queue.
//!
//! Proxy registrations accumulate here between navigations and are drained
//! exactly once per navigation cycle: all objects are bound first, then all
//! initialization scripts run, in registration order.

/// Reserved object name for the console sink. An entry with this name is
/// captured as the sink instead of being bound into the page.
pub const CONSOLE_OBJECT: &str = "console";

/// A proxy registration waiting for the next navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingObject {
    /// Logical identity used for native dispatch.
    pub name: String,
    /// Symbol exposed to page scripts. May differ from `name`.
    pub binding_name: String,
    /// Script run after binding, typically installing a script-side wrapper
    /// around the bound proxy.
    pub init_script: String,
}

impl PendingObject {
    pub fn new(
        name: impl Into<String>,
        binding_name: impl Into<String>,
        init_script: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            binding_name: binding_name.into(),
            init_script: init_script.into(),
        }
    }

    /// Whether this entry is the console sink rather than an ordinary
    /// binding.
    pub fn is_console(&self) -> bool {
        self.name == CONSOLE_OBJECT
    }
}

/// Ordered, append-only list of pending registrations.
///
/// Insertion order is significant: binding order matches registration order
/// so later init scripts may depend on earlier bindings.
#[derive(Debug, Default)]
pub struct InjectionQueue {
    entries: Vec<PendingObject>,
}

impl InjectionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: PendingObject) {
        self.entries.push(entry);
    }

    /// Take every queued entry, leaving the queue empty.
    ///
    /// A navigation cycle calls this exactly once; because the entries move
    /// out, a cleared queue can never be drained twice and stale objects
    /// never leak into the next cycle.
    pub fn take_all(&mut self) -> Vec<PendingObject> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_registration_order() {
        let mut queue = InjectionQueue::new();
        queue.push(PendingObject::new("a", "wa", "init_a"));
        queue.push(PendingObject::new("b", "wb", "init_b"));
        queue.push(PendingObject::new("c", "wc", "init_c"));

        let drained = queue.take_all();
        let names: Vec<&str> = drained.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn take_all_empties_the_queue() {
        let mut queue = InjectionQueue::new();
        queue.push(PendingObject::new("app", "nproxy", ""));
        assert_eq!(queue.len(), 1);

        let drained = queue.take_all();
        assert_eq!(drained.len(), 1);
        assert!(queue.is_empty());

        // A second drain yields nothing.
        assert!(queue.take_all().is_empty());
    }

    #[test]
    fn console_entry_is_recognized() {
        let console = PendingObject::new("console", "console", "");
        assert!(console.is_console());

        let app = PendingObject::new("app", "nproxy", "");
        assert!(!app.is_console());
    }
}
