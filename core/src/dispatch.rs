use hashbrown::HashMap;

use crate::record::EventRecord;
use crate::session::SessionCache;

pub type Handler = Box<dyn FnMut(&EventRecord, &SessionCache)>;

/// Routes parsed records to user handlers by event-type name. A handler
/// registered for several names is stored once and shares its state across
/// all of them; handlers for one name run in registration order.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Handler>,
    routes: HashMap<String, Vec<usize>>,
}

impl Dispatcher {
    /// Register `handler` for every name in `event_types`.
    pub fn register<F>(&mut self, event_types: &[&str], handler: F)
    where
        F: FnMut(&EventRecord, &SessionCache) + 'static,
    {
        let slot = self.handlers.len();
        self.handlers.push(Box::new(handler));
        for &event in event_types {
            self.routes.entry(event.to_string()).or_default().push(slot);
        }
    }

    /// Run every handler registered for the record's event type. A panic in
    /// a handler propagates to the caller of the parse pass.
    pub fn dispatch(&mut self, record: &EventRecord, cache: &SessionCache) {
        let Some(slots) = self.routes.get(record.event_type.as_str()) else {
            return;
        };
        for &slot in slots {
            (self.handlers[slot])(record, cache);
        }
    }

    pub fn is_routed(&self, event_type: &str) -> bool {
        self.routes.contains_key(event_type)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handlers.len())
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .finish()
    }
}
