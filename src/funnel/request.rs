/// Lifecycle of a single asynchronous call to a collaborator.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestState<T, E> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(E),
}

impl<T, E> RequestState<T, E> {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn phase(&self) -> RequestPhase {
        match self {
            RequestState::Idle => RequestPhase::Idle,
            RequestState::Pending => RequestPhase::Pending,
            RequestState::Succeeded(_) => RequestPhase::Succeeded,
            RequestState::Failed(_) => RequestPhase::Failed,
        }
    }
}

impl<T, E> Default for RequestState<T, E> {
    fn default() -> Self {
        RequestState::Idle
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// A request state plus every phase it has passed through.
#[derive(Clone, Debug)]
pub struct TrackedRequest<T, E> {
    state: RequestState<T, E>,
    history: Vec<RequestPhase>,
}

impl<T: Clone, E: Clone> TrackedRequest<T, E> {
    pub fn new() -> Self {
        Self {
            state: RequestState::Idle,
            history: vec![RequestPhase::Idle],
        }
    }

    pub fn state(&self) -> RequestState<T, E> {
        self.state.clone()
    }

    pub fn history(&self) -> &[RequestPhase] {
        &self.history
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn begin(&mut self) {
        self.transition(RequestState::Pending);
    }

    pub fn succeed(&mut self, value: T) {
        self.transition(RequestState::Succeeded(value));
    }

    pub fn fail(&mut self, error: E) {
        self.transition(RequestState::Failed(error));
    }

    /// Drops back to idle, used when a pending call is abandoned.
    pub fn reset(&mut self) {
        self.transition(RequestState::Idle);
    }

    fn transition(&mut self, next: RequestState<T, E>) {
        self.history.push(next.phase());
        self.state = next;
    }
}

impl<T: Clone, E: Clone> Default for TrackedRequest<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_each_transition() {
        let mut request: TrackedRequest<String, String> = TrackedRequest::new();
        assert_eq!(request.state(), RequestState::Idle);

        request.begin();
        assert!(request.is_pending());
        request.fail("boom".to_string());
        request.begin();
        request.succeed("ok".to_string());

        assert_eq!(request.state(), RequestState::Succeeded("ok".to_string()));
        assert_eq!(
            request.history(),
            &[
                RequestPhase::Idle,
                RequestPhase::Pending,
                RequestPhase::Failed,
                RequestPhase::Pending,
                RequestPhase::Succeeded,
            ]
        );
    }
}
