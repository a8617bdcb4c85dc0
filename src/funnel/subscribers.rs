use yew::Callback;

/// Handle returned by `subscribe`, used to detach a listener again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(usize);

/// Listener list for the state machines that renderers watch.
pub struct Subscribers<T> {
    next_id: usize,
    listeners: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T: Clone> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Callback<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }

    pub fn notify(&self, value: &T) {
        for (_, listener) in &self.listeners {
            listener.emit(value.clone());
        }
    }
}

impl<T: Clone> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}
