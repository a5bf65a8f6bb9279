//! In-memory doubles for the receptor and the log stream.
//!
//! Available to unit tests and, through the `testkit` feature, to integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core::logs::{LogMessage, LogReader, LogStreamError, LogUpdate};
use crate::receptor::{
    ActualLrp, DesiredLrp, DesiredLrpCreateRequest, DesiredLrpUpdateRequest, ReceptorClient,
    ReceptorError, ReceptorResult,
};

/// Receptor request recorded by [`FakeReceptorClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceptorCall {
    DesiredLrps,
    CreateDesiredLrp(DesiredLrpCreateRequest),
    UpdateDesiredLrp(String, DesiredLrpUpdateRequest),
    DeleteDesiredLrp(String),
    ActualLrpsByProcessGuid(String),
}

#[derive(Debug)]
struct FakeState {
    calls: Vec<ReceptorCall>,
    desired_lrps: Result<Vec<DesiredLrp>, ReceptorError>,
    create: Result<(), ReceptorError>,
    update: Result<(), ReceptorError>,
    delete: Result<(), ReceptorError>,
    /// Consumed front to back; the last entry keeps answering once the rest are gone.
    actual_lrps: VecDeque<Result<Vec<ActualLrp>, ReceptorError>>,
}

/// Scriptable [`ReceptorClient`] that records every call.
#[derive(Debug)]
pub struct FakeReceptorClient {
    state: Mutex<FakeState>,
}

impl Default for FakeReceptorClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeReceptorClient {
    /// Empty backend: no desired LRPs, no actual LRPs, every mutation succeeds.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                calls: Vec::new(),
                desired_lrps: Ok(Vec::new()),
                create: Ok(()),
                update: Ok(()),
                delete: Ok(()),
                actual_lrps: VecDeque::from([Ok(Vec::new())]),
            }),
        }
    }

    pub fn desired_lrps_returns(&self, result: Result<Vec<DesiredLrp>, ReceptorError>) {
        self.lock().desired_lrps = result;
    }

    pub fn create_desired_lrp_returns(&self, result: Result<(), ReceptorError>) {
        self.lock().create = result;
    }

    pub fn update_desired_lrp_returns(&self, result: Result<(), ReceptorError>) {
        self.lock().update = result;
    }

    pub fn delete_desired_lrp_returns(&self, result: Result<(), ReceptorError>) {
        self.lock().delete = result;
    }

    /// Replace every queued actual-LRP answer with `result`.
    pub fn actual_lrps_returns(&self, result: Result<Vec<ActualLrp>, ReceptorError>) {
        let mut state = self.lock();
        state.actual_lrps.clear();
        state.actual_lrps.push_back(result);
    }

    /// Answer successive actual-LRP lookups with `results`, in order.
    pub fn actual_lrps_sequence(
        &self,
        results: impl IntoIterator<Item = Result<Vec<ActualLrp>, ReceptorError>>,
    ) {
        let mut state = self.lock();
        state.actual_lrps = results.into_iter().collect();
        if state.actual_lrps.is_empty() {
            state.actual_lrps.push_back(Ok(Vec::new()));
        }
    }

    pub fn calls(&self) -> Vec<ReceptorCall> {
        self.lock().calls.clone()
    }

    pub fn created_requests(&self) -> Vec<DesiredLrpCreateRequest> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ReceptorCall::CreateDesiredLrp(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReceptorClient for FakeReceptorClient {
    fn desired_lrps(&self) -> ReceptorResult<Vec<DesiredLrp>> {
        let mut state = self.lock();
        state.calls.push(ReceptorCall::DesiredLrps);
        state.desired_lrps.clone()
    }

    fn create_desired_lrp(&self, request: DesiredLrpCreateRequest) -> ReceptorResult<()> {
        let mut state = self.lock();
        state.calls.push(ReceptorCall::CreateDesiredLrp(request));
        state.create.clone()
    }

    fn update_desired_lrp(
        &self,
        process_guid: &str,
        update: DesiredLrpUpdateRequest,
    ) -> ReceptorResult<()> {
        let mut state = self.lock();
        state
            .calls
            .push(ReceptorCall::UpdateDesiredLrp(process_guid.to_string(), update));
        state.update.clone()
    }

    fn delete_desired_lrp(&self, process_guid: &str) -> ReceptorResult<()> {
        let mut state = self.lock();
        state
            .calls
            .push(ReceptorCall::DeleteDesiredLrp(process_guid.to_string()));
        state.delete.clone()
    }

    fn actual_lrps_by_process_guid(&self, process_guid: &str) -> ReceptorResult<Vec<ActualLrp>> {
        let mut state = self.lock();
        state
            .calls
            .push(ReceptorCall::ActualLrpsByProcessGuid(process_guid.to_string()));
        if state.actual_lrps.len() > 1 {
            state.actual_lrps.pop_front().unwrap_or_else(|| Ok(Vec::new()))
        } else {
            state
                .actual_lrps
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}

/// [`LogReader`] that replays a fixed script and records each subscription.
#[derive(Debug, Default)]
pub struct ScriptedLogReader {
    script: Vec<LogUpdate>,
    subscriptions: Mutex<Vec<String>>,
}

impl ScriptedLogReader {
    pub fn new(script: Vec<LogUpdate>) -> Self {
        Self {
            script,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Process guids passed to `tail_logs`, in call order.
    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions
            .lock()
            .map(|subs| subs.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl LogReader for ScriptedLogReader {
    fn tail_logs(
        &self,
        process_guid: &str,
        on_message: &mut dyn FnMut(LogMessage),
        on_error: &mut dyn FnMut(LogStreamError),
    ) {
        if let Ok(mut subs) = self.subscriptions.lock() {
            subs.push(process_guid.to_string());
        }
        for update in &self.script {
            match update {
                LogUpdate::Message(message) => on_message(message.clone()),
                LogUpdate::Error(error) => on_error(error.clone()),
            }
        }
    }
}
