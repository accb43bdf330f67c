//! Execution engine: turns a graph snapshot into one pass of asynchronous
//! node computations, re-run from scratch on every reactive trigger.
//!
//! One [RunContext] is current at a time. [Engine::abort] marks it
//! superseded and awaits termination of the in-flight pass; worker tasks
//! started under the aborted context are left to finish, but they only ever
//! write into that context's cache, which is never read again.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::Notify;
use tracing::{debug, error, info, trace};

use crate::component::{Component, ComponentRegistry, WorkerOutput};
use crate::error::EngineError;
use crate::fanout::VirtualOutput;
use crate::types::{Data, GraphSnapshot, InputData, NodeId, OutputData, SnapshotNode};

/// How a completed pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
  /// The pass ran to the end; its output cache is now the visible one.
  Completed,
  /// The pass was aborted mid-flight; its cache was discarded.
  Superseded,
}

/// What to do with nodes still unprocessed when the seeds and their forward
/// cascades have settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnreachablePolicy {
  /// Settle them with empty output data, without running their workers.
  #[default]
  SettleEmpty,
  /// Leave them alone. Used when virtual connections are in play: virtual
  /// targets are unreachable via the static graph by construction and must
  /// stay undefaulted so worker-driven fan-out can run them.
  Suppress,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
  m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct RunState {
  cache: HashMap<NodeId, Arc<WorkerOutput>>,
  in_progress: HashSet<NodeId>,
  forwarded: HashSet<NodeId>,
}

enum Begin {
  Cached(Arc<WorkerOutput>),
  Fresh,
}

/// Cache and cancellation scope of one pass over one snapshot.
pub(crate) struct RunContext {
  pub(crate) generation: u64,
  pub(crate) snapshot: Arc<GraphSnapshot>,
  state: Mutex<RunState>,
  aborted: AtomicBool,
  abort_notify: Notify,
}

impl RunContext {
  fn new(generation: u64, snapshot: Arc<GraphSnapshot>) -> Self {
    Self {
      generation,
      snapshot,
      state: Mutex::new(RunState::default()),
      aborted: AtomicBool::new(false),
      abort_notify: Notify::new(),
    }
  }

  pub(crate) fn is_aborted(&self) -> bool {
    self.aborted.load(Ordering::SeqCst)
  }

  fn abort(&self) {
    self.aborted.store(true, Ordering::SeqCst);
    self.abort_notify.notify_waiters();
  }

  pub(crate) fn check_abort(&self) -> Result<(), EngineError> {
    if self.is_aborted() {
      return Err(EngineError::Superseded);
    }
    Ok(())
  }

  fn cached(&self, id: NodeId) -> Option<Arc<WorkerOutput>> {
    lock(&self.state).cache.get(&id).cloned()
  }

  fn begin(&self, id: NodeId) -> Result<Begin, EngineError> {
    let mut state = lock(&self.state);
    if let Some(out) = state.cache.get(&id) {
      return Ok(Begin::Cached(out.clone()));
    }
    if !state.in_progress.insert(id) {
      return Err(EngineError::Cycle(id));
    }
    Ok(Begin::Fresh)
  }

  fn complete(&self, id: NodeId, out: Arc<WorkerOutput>) {
    let mut state = lock(&self.state);
    state.in_progress.remove(&id);
    state.cache.insert(id, out);
  }

  fn abandon(&self, id: NodeId) {
    lock(&self.state).in_progress.remove(&id);
  }

  fn settle_empty(&self, id: NodeId) {
    let mut state = lock(&self.state);
    state.cache.entry(id).or_default();
  }

  /// Marks a node forward-propagated; false if it already was this pass.
  fn mark_forwarded(&self, id: NodeId) -> bool {
    lock(&self.state).forwarded.insert(id)
  }

  /// Drops a node's cached output so it can be re-invoked. Used by the
  /// recursive clear preceding each virtual re-invocation.
  pub(crate) fn clear_node(&self, id: NodeId) {
    let mut state = lock(&self.state);
    state.cache.remove(&id);
    state.forwarded.remove(&id);
  }
}

/// Everything a worker invocation can see: its snapshot node, the gathered
/// input deliveries, and (through [WorkerContext::virtual_output]) the
/// fan-out handles for the node's declared virtual outputs.
pub struct WorkerContext {
  pub(crate) engine: Arc<EngineInner>,
  pub(crate) run: Arc<RunContext>,
  pub(crate) node: SnapshotNode,
  pub(crate) inputs: InputData,
}

impl WorkerContext {
  pub fn node(&self) -> &SnapshotNode {
    &self.node
  }

  pub fn node_id(&self) -> NodeId {
    self.node.id
  }

  pub fn inputs(&self) -> &InputData {
    &self.inputs
  }

  /// All deliveries for an input key, in connection order. Unconnected
  /// inputs resolve to an empty sequence.
  pub fn input(&self, key: &str) -> &[Data] {
    self.inputs.get(key).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn first_input(&self, key: &str) -> Option<&Data> {
    self.input(key).first()
  }

  pub fn control(&self, key: &str) -> Option<&Data> {
    self.node.controls.get(key)
  }

  /// Fan-out handle for one of this node's virtual outputs. Empty if the key
  /// has no virtual connections deployed.
  pub fn virtual_output(&self, key: &str) -> VirtualOutput {
    VirtualOutput::new(self, key)
  }
}

pub(crate) struct EngineInner {
  registry: Arc<ComponentRegistry>,
  unreachable: UnreachablePolicy,
  pass_lock: tokio::sync::Mutex<()>,
  current: Mutex<Option<Arc<RunContext>>>,
  completed: Mutex<Option<Arc<RunContext>>>,
  generation: AtomicU64,
}

/// The dataflow execution engine. Cloning shares the same run state.
#[derive(Clone)]
pub struct Engine {
  inner: Arc<EngineInner>,
}

impl Engine {
  /// Builds an engine over a registry. The unreachable policy is
  /// [UnreachablePolicy::Suppress] when any registered component declares
  /// virtual wiring, [UnreachablePolicy::SettleEmpty] otherwise.
  pub fn new(registry: Arc<ComponentRegistry>) -> Self {
    let unreachable = if registry.has_virtual_components() {
      UnreachablePolicy::Suppress
    } else {
      UnreachablePolicy::SettleEmpty
    };
    Self::with_policy(registry, unreachable)
  }

  pub fn with_policy(registry: Arc<ComponentRegistry>, unreachable: UnreachablePolicy) -> Self {
    Self {
      inner: Arc::new(EngineInner {
        registry,
        unreachable,
        pass_lock: tokio::sync::Mutex::new(()),
        current: Mutex::new(None),
        completed: Mutex::new(None),
        generation: AtomicU64::new(0),
      }),
    }
  }

  /// Runs one pass over a snapshot. With `start`, only that node seeds the
  /// pass; otherwise every init node without an inbound action connection
  /// and every source node does.
  ///
  /// A worker failure or a dependency cycle fails the pass; the previous
  /// successful pass's output data stays visible until superseded.
  pub async fn process(
    &self,
    snapshot: GraphSnapshot,
    start: Option<NodeId>,
  ) -> Result<PassOutcome, EngineError> {
    let _pass = self.inner.pass_lock.lock().await;
    let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
    let run = Arc::new(RunContext::new(generation, Arc::new(snapshot)));
    *lock(&self.inner.current) = Some(run.clone());
    info!(generation, nodes = run.snapshot.nodes.len(), "pass started");

    match self.inner.run_pass(&run, start).await {
      Ok(()) if run.is_aborted() => {
        info!(generation, "pass superseded");
        Ok(PassOutcome::Superseded)
      }
      Ok(()) => {
        *lock(&self.inner.completed) = Some(run.clone());
        info!(generation, "pass completed");
        Ok(PassOutcome::Completed)
      }
      Err(EngineError::Superseded) => {
        info!(generation, "pass superseded");
        Ok(PassOutcome::Superseded)
      }
      Err(e) => {
        error!(generation, error = %e, "pass failed");
        Err(e)
      }
    }
  }

  /// Marks the current pass superseded and awaits its termination.
  /// Idempotent; a no-op when no pass is in flight.
  pub async fn abort(&self) {
    let run = lock(&self.inner.current).clone();
    if let Some(run) = run {
      trace!(generation = run.generation, "abort requested");
      run.abort();
    }
    // Settles once the in-flight pass has wound down.
    let _pass = self.inner.pass_lock.lock().await;
  }

  /// Downstream-visible output data of a node from the last completed pass.
  /// Closed keys are excluded. None while no pass has completed or the node
  /// was not processed.
  pub fn output_data(&self, id: NodeId) -> Option<OutputData> {
    let completed = lock(&self.inner.completed).clone();
    completed.and_then(|run| run.cached(id)).map(|o| o.visible_data())
  }
}

impl EngineInner {
  fn is_seed(&self, node: &SnapshotNode) -> bool {
    let init = self
      .registry
      .get(&node.component)
      .map(|c| c.task().init)
      .unwrap_or(false);
    (init && !node.has_inbound_action()) || node.is_source()
  }

  async fn run_pass(
    self: &Arc<Self>,
    run: &Arc<RunContext>,
    start: Option<NodeId>,
  ) -> Result<(), EngineError> {
    let seeds: Vec<NodeId> = match start {
      Some(id) => {
        if run.snapshot.node(id).is_none() {
          return Err(EngineError::NodeNotFound(id));
        }
        vec![id]
      }
      None => run
        .snapshot
        .nodes
        .values()
        .filter(|n| self.is_seed(n))
        .map(|n| n.id)
        .collect(),
    };
    trace!(?seeds, "seeding pass");

    for id in seeds {
      self.process_node(run, id, None).await?;
      self.forward_process(run, id).await?;
    }

    match self.unreachable {
      UnreachablePolicy::SettleEmpty => {
        for id in run.snapshot.nodes.keys() {
          if run.cached(*id).is_none() {
            trace!(node = %id, "settling unreachable node with no output");
            run.settle_empty(*id);
          }
        }
      }
      UnreachablePolicy::Suppress => {}
    }
    Ok(())
  }

  /// Processes one node: gathers inputs, invokes the worker, caches the
  /// result for the pass. At most once per node per pass; re-entry while in
  /// progress is a dependency cycle.
  ///
  /// `delivery` is the virtual input override: one extra value appended to
  /// the given input key's sequence after concrete gathering.
  pub(crate) fn process_node<'a>(
    self: &'a Arc<Self>,
    run: &'a Arc<RunContext>,
    id: NodeId,
    delivery: Option<(String, Data)>,
  ) -> BoxFuture<'a, Result<Arc<WorkerOutput>, EngineError>> {
    async move {
      run.check_abort()?;
      match run.begin(id)? {
        Begin::Cached(out) => return Ok(out),
        Begin::Fresh => {}
      }
      match self.run_worker_for(run, id, delivery).await {
        Ok(out) => {
          let out = Arc::new(out);
          run.complete(id, out.clone());
          Ok(out)
        }
        Err(e) => {
          run.abandon(id);
          Err(e)
        }
      }
    }
    .boxed()
  }

  async fn run_worker_for(
    self: &Arc<Self>,
    run: &Arc<RunContext>,
    id: NodeId,
    delivery: Option<(String, Data)>,
  ) -> Result<WorkerOutput, EngineError> {
    let node = run
      .snapshot
      .node(id)
      .ok_or(EngineError::NodeNotFound(id))?
      .clone();
    let component = self
      .registry
      .get(&node.component)
      .cloned()
      .ok_or_else(|| EngineError::UnknownComponent(node.component.clone()))?;
    let inputs = self.gather_inputs(run, &node, delivery).await?;
    debug!(node = %id, component = %node.component, "processing node");
    let ctx = WorkerContext {
      engine: self.clone(),
      run: run.clone(),
      node,
      inputs,
    };
    self.invoke_worker(run, component, ctx).await
  }

  /// Gathers every delivery per input key in connection order, pulling
  /// unprocessed upstream nodes recursively. A source output key that is
  /// closed (or produced no value) yields no delivery.
  async fn gather_inputs(
    self: &Arc<Self>,
    run: &Arc<RunContext>,
    node: &SnapshotNode,
    delivery: Option<(String, Data)>,
  ) -> Result<InputData, EngineError> {
    let mut inputs = InputData::new();
    for (key, port) in &node.inputs {
      let mut deliveries = Vec::new();
      for link in &port.connections {
        let source_out = self.process_node(run, link.node, None).await?;
        if let Some(value) = source_out.visible(&link.output) {
          deliveries.push(value.clone());
        }
      }
      inputs.insert(key.clone(), deliveries);
    }
    if let Some((key, value)) = delivery {
      inputs.entry(key).or_default().push(value);
    }
    Ok(inputs)
  }

  /// Spawns the worker so an aborted pass can leave it to finish, and awaits
  /// it against the abort signal. The settle point is atomic with respect to
  /// propagation: nothing else runs between the worker resolving and its
  /// output being cached.
  async fn invoke_worker(
    self: &Arc<Self>,
    run: &Arc<RunContext>,
    component: Arc<dyn Component>,
    ctx: WorkerContext,
  ) -> Result<WorkerOutput, EngineError> {
    let node_id = ctx.node_id();
    let mut handle = tokio::spawn(async move { component.worker(ctx).await });
    let notified = run.abort_notify.notified();
    tokio::pin!(notified);
    run.check_abort()?;
    tokio::select! {
      res = &mut handle => match res {
        Ok(out) => out,
        Err(e) => Err(EngineError::WorkerFailed(format!(
          "worker for node {node_id} panicked: {e}"
        ))),
      },
      _ = &mut notified => {
        trace!(node = %node_id, "aborted while worker pending; leaving it to finish");
        Err(EngineError::Superseded)
      }
    }
  }

  /// Forward-propagates from a settled node along every non-closed,
  /// non-virtual output. Each node forwards at most once per pass (until a
  /// recursive clear re-arms it for virtual re-invocation).
  pub(crate) fn forward_process<'a>(
    self: &'a Arc<Self>,
    run: &'a Arc<RunContext>,
    id: NodeId,
  ) -> BoxFuture<'a, Result<(), EngineError>> {
    async move {
      if !run.mark_forwarded(id) {
        return Ok(());
      }
      let Some(node) = run.snapshot.node(id) else {
        return Ok(());
      };
      let Some(out) = run.cached(id) else {
        return Ok(());
      };
      for (key, port) in &node.outputs {
        if out.is_closed(key) {
          debug!(node = %id, output = %key, "output closed; propagation suppressed");
          continue;
        }
        for link in &port.connections {
          run.check_abort()?;
          self.process_node(run, link.node, None).await?;
          self.forward_process(run, link.node).await?;
        }
      }
      Ok(())
    }
    .boxed()
  }
}
