//! Engine event notifications.
//!
//! Provides the notification channel between the object model and the
//! hosting UI: every successful mutation publishes a re-render event for
//! the affected view. The session is single-threaded (one editing
//! session, mutations serialized through the history manager), so this is
//! a plain handler registry rather than an async channel.

use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::view::ViewId;

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Events published by the design session.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignEvent {
    /// A view's object set changed and should be re-rendered.
    ViewInvalidated { view: ViewId },
    /// The active view changed.
    ActiveViewChanged { view: ViewId },
    /// The product template changed; all boundaries were re-resolved.
    ProductChanged { product: String },
    /// An asset finished loading and its consumers should re-render.
    AssetResolved { view: ViewId },
    /// A view was exported to a raster image.
    ViewExported { view: ViewId },
}

type EventHandler = Box<dyn Fn(&DesignEvent) + Send + Sync>;

/// Handler registry for [`DesignEvent`] notifications.
///
/// Cloning shares the registry: the session keeps one instance and hands
/// clones to collaborators that need to publish.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<RwLock<Vec<(SubscriptionId, EventHandler)>>>,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler; returns the id used to unsubscribe.
    pub fn subscribe(&self, handler: impl Fn(&DesignEvent) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.handlers.write().push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.handlers.write().retain(|(sub, _)| *sub != id);
    }

    /// Publishes an event to every registered handler, in subscription
    /// order.
    pub fn publish(&self, event: &DesignEvent) {
        for (_, handler) in self.handlers.read().iter() {
            handler(event);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
