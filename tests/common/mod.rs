//! Common test utilities for broker integration tests
//!
//! Provides a scripted in-memory Kinesis control plane and helpers to build
//! a broker around it.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use async_trait::async_trait;
use kinesis_broker::config::BrokerConfig;
use kinesis_broker::controller::reconciler::StreamBroker;
use kinesis_broker::model::{OwnershipTag, OwnershipTags, StreamStatus};
use kinesis_broker::observability::BufferedBuildLog;
use kinesis_broker::provider::{ProviderError, StreamProvider};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

pub const APP: &str = "orders-svc";

/// Provider operation, used for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Describe,
    Create,
    Delete,
    ListTags,
    AddTags,
    StartEncryption,
}

/// A recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Describe(String),
    Create(String, i32),
    Delete(String),
    List,
    ListTags(String),
    AddTags(String, HashMap<String, String>),
    StartEncryption(String, String),
}

impl Call {
    /// Calls that change provider state
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Call::Create(..) | Call::Delete(_) | Call::AddTags(..) | Call::StartEncryption(..)
        )
    }
}

/// Live state of one fake stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeStream {
    pub status: StreamStatus,
    pub shard_count: i32,
    pub tags: HashMap<String, String>,
    pub encryption_key: Option<String>,
    describes_until_active: usize,
}

#[derive(Debug, Default)]
struct State {
    streams: BTreeMap<String, FakeStream>,
    describe_scripts: HashMap<String, VecDeque<Result<StreamStatus, ProviderError>>>,
    failures: HashMap<(Op, String), ProviderError>,
    list_failure: Option<ProviderError>,
    activate_after: usize,
    calls: Vec<Call>,
}

/// Scripted Kinesis control plane
///
/// Created streams start in CREATING and turn ACTIVE after a configurable
/// number of describes. Describe scripts, when present, take precedence over
/// live state until they run out. Injected failures apply to every call.
#[derive(Debug, Default)]
pub struct FakeKinesis {
    state: Mutex<State>,
}

impl FakeKinesis {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                activate_after: 1,
                ..State::default()
            }),
        }
    }

    /// Add a pre-existing stream
    pub fn with_stream(self, name: &str, status: StreamStatus, tags: &[(&str, &str)]) -> Self {
        self.state.lock().unwrap().streams.insert(
            name.to_string(),
            FakeStream {
                status,
                shard_count: 1,
                tags: tags
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
                encryption_key: None,
                describes_until_active: 0,
            },
        );
        self
    }

    /// Add a pre-existing ACTIVE stream owned by [`APP`]
    pub fn with_owned_stream(self, name: &str) -> Self {
        self.with_stream(name, StreamStatus::Active, &[("appName", APP)])
    }

    /// Queue describe answers for a stream
    pub fn with_describe_script(
        self,
        name: &str,
        script: Vec<Result<StreamStatus, ProviderError>>,
    ) -> Self {
        self.state
            .lock()
            .unwrap()
            .describe_scripts
            .insert(name.to_string(), script.into());
        self
    }

    /// Number of describes a created stream answers CREATING before ACTIVE
    pub fn with_activation_after(self, describes: usize) -> Self {
        self.state.lock().unwrap().activate_after = describes;
        self
    }

    pub fn with_failure(self, op: Op, name: &str, error: ProviderError) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((op, name.to_string()), error);
        self
    }

    pub fn with_list_failure(self, error: ProviderError) -> Self {
        self.state.lock().unwrap().list_failure = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }

    pub fn describe_count(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Describe(n) if n == name))
            .count()
    }

    pub fn stream(&self, name: &str) -> Option<FakeStream> {
        self.state.lock().unwrap().streams.get(name).cloned()
    }

    pub fn stream_names(&self) -> Vec<String> {
        self.state.lock().unwrap().streams.keys().cloned().collect()
    }

    fn begin(
        &self,
        call: Call,
        op: Option<(Op, &str)>,
    ) -> Result<MutexGuard<'_, State>, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if let Some((op, name)) = op {
            if let Some(error) = state.failures.get(&(op, name.to_string())) {
                return Err(error.clone());
            }
        }
        Ok(state)
    }
}

fn not_found(name: &str) -> ProviderError {
    ProviderError::NotFound {
        stream: name.to_string(),
    }
}

#[async_trait]
impl StreamProvider for FakeKinesis {
    async fn describe_stream_status(
        &self,
        stream_name: &str,
    ) -> Result<StreamStatus, ProviderError> {
        let mut state = self.begin(
            Call::Describe(stream_name.to_string()),
            Some((Op::Describe, stream_name)),
        )?;

        if let Some(answer) = state
            .describe_scripts
            .get_mut(stream_name)
            .and_then(VecDeque::pop_front)
        {
            return answer;
        }

        let stream = state
            .streams
            .get_mut(stream_name)
            .ok_or_else(|| not_found(stream_name))?;
        if stream.status == StreamStatus::Creating {
            if stream.describes_until_active == 0 {
                stream.status = StreamStatus::Active;
            } else {
                stream.describes_until_active -= 1;
            }
        }
        Ok(stream.status.clone())
    }

    async fn create_stream(
        &self,
        stream_name: &str,
        shard_count: i32,
    ) -> Result<(), ProviderError> {
        let mut state = self.begin(
            Call::Create(stream_name.to_string(), shard_count),
            Some((Op::Create, stream_name)),
        )?;

        if state.streams.contains_key(stream_name) {
            return Err(ProviderError::AlreadyExists {
                stream: stream_name.to_string(),
            });
        }

        let describes_until_active = state.activate_after;
        state.streams.insert(
            stream_name.to_string(),
            FakeStream {
                status: StreamStatus::Creating,
                shard_count,
                tags: HashMap::new(),
                encryption_key: None,
                describes_until_active,
            },
        );
        Ok(())
    }

    async fn delete_stream(&self, stream_name: &str) -> Result<(), ProviderError> {
        let mut state = self.begin(
            Call::Delete(stream_name.to_string()),
            Some((Op::Delete, stream_name)),
        )?;
        state
            .streams
            .remove(stream_name)
            .map(|_| ())
            .ok_or_else(|| not_found(stream_name))
    }

    async fn list_streams(&self) -> Result<Vec<String>, ProviderError> {
        let state = self.begin(Call::List, None)?;
        if let Some(error) = &state.list_failure {
            return Err(error.clone());
        }
        Ok(state.streams.keys().cloned().collect())
    }

    async fn list_tags_for_stream(
        &self,
        stream_name: &str,
    ) -> Result<HashMap<String, String>, ProviderError> {
        let state = self.begin(
            Call::ListTags(stream_name.to_string()),
            Some((Op::ListTags, stream_name)),
        )?;
        state
            .streams
            .get(stream_name)
            .map(|stream| stream.tags.clone())
            .ok_or_else(|| not_found(stream_name))
    }

    async fn add_tags_to_stream(
        &self,
        stream_name: &str,
        tags: &HashMap<String, String>,
    ) -> Result<(), ProviderError> {
        let mut state = self.begin(
            Call::AddTags(stream_name.to_string(), tags.clone()),
            Some((Op::AddTags, stream_name)),
        )?;
        let stream = state
            .streams
            .get_mut(stream_name)
            .ok_or_else(|| not_found(stream_name))?;
        stream.tags.extend(tags.clone());
        Ok(())
    }

    async fn start_stream_encryption(
        &self,
        stream_name: &str,
        kms_key_id: &str,
    ) -> Result<(), ProviderError> {
        let mut state = self.begin(
            Call::StartEncryption(stream_name.to_string(), kms_key_id.to_string()),
            Some((Op::StartEncryption, stream_name)),
        )?;
        let stream = state
            .streams
            .get_mut(stream_name)
            .ok_or_else(|| not_found(stream_name))?;
        stream.encryption_key = Some(kms_key_id.to_string());
        Ok(())
    }
}

/// Tags for the `orders-svc` deployment on `ecs-prod-1`
pub fn ownership_tags() -> OwnershipTags {
    OwnershipTags {
        sbu: OwnershipTag::new("sbu", "retail"),
        org: OwnershipTag::new("org", "payments"),
        app: OwnershipTag::new("appName", APP),
        cluster: OwnershipTag::new("clusterId", "ecs-prod-1"),
    }
}

/// Broker over `fake` with default settings (20s poll, 10 minute budget)
pub fn broker(fake: &Arc<FakeKinesis>, log: &Arc<BufferedBuildLog>) -> StreamBroker {
    StreamBroker::new(
        Arc::clone(fake) as Arc<dyn StreamProvider>,
        Arc::clone(log) as Arc<dyn kinesis_broker::observability::BuildLog>,
        ownership_tags(),
        &BrokerConfig::default(),
    )
}

pub fn throttled() -> ProviderError {
    ProviderError::Throttled {
        message: "Rate exceeded for stream".to_string(),
    }
}
