//! Runs render requests off the UI thread and hands results back per frame.

use crossbeam_channel::{Receiver, Sender, unbounded};
use inkmaid_core::{DiagramSyntaxError, RenderOptions, RenderRequest, ViewerConfig};
use inkmaid_render::{DiagramRenderer, render_request};

#[cfg(not(target_arch = "wasm32"))]
use std::sync::{
    Arc,
    atomic::{AtomicU64, AtomicUsize, Ordering},
};
#[cfg(not(target_arch = "wasm32"))]
use std::thread;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

/// A finished render: request sequence number and its outcome.
pub type RenderOutcome = (u64, Result<String, DiagramSyntaxError>);

#[cfg(not(target_arch = "wasm32"))]
type SharedRenderer = Arc<dyn DiagramRenderer>;
#[cfg(target_arch = "wasm32")]
type SharedRenderer = Rc<dyn DiagramRenderer>;

/// Native render threads. Every `mmdc` run starts a headless browser, so at
/// most this many run at once.
#[cfg(not(target_arch = "wasm32"))]
pub const RENDER_WORKERS: usize = 2;

/// Owns the renderer and the channel results come back on.
///
/// Natively, requests queue up for a small pool of worker threads; a queued
/// request that has been superseded by a newer one is skipped. The newest
/// request always renders, and the session ignores stale completions.
pub struct RenderDispatcher {
    name: &'static str,
    #[cfg(not(target_arch = "wasm32"))]
    jobs: Sender<RenderRequest>,
    /// Sequence number of the newest submitted request.
    #[cfg(not(target_arch = "wasm32"))]
    latest: Arc<AtomicU64>,
    /// Requests the workers dropped since the last poll.
    #[cfg(not(target_arch = "wasm32"))]
    skipped: Arc<AtomicUsize>,
    #[cfg(not(target_arch = "wasm32"))]
    _workers: Vec<thread::JoinHandle<()>>,
    #[cfg(target_arch = "wasm32")]
    renderer: SharedRenderer,
    #[cfg(target_arch = "wasm32")]
    tx: Sender<RenderOutcome>,
    rx: Receiver<RenderOutcome>,
    in_flight: usize,
}

impl RenderDispatcher {
    /// Start the worker pool around an initialized renderer.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(renderer: SharedRenderer) -> Self {
        let (tx, rx) = unbounded();
        let (jobs, queue) = unbounded::<RenderRequest>();
        let latest = Arc::new(AtomicU64::new(0));
        let skipped = Arc::new(AtomicUsize::new(0));

        let mut workers = Vec::with_capacity(RENDER_WORKERS);
        for worker_id in 0..RENDER_WORKERS {
            let worker = RenderWorker {
                id: worker_id,
                renderer: Arc::clone(&renderer),
                queue: queue.clone(),
                results: tx.clone(),
                latest: Arc::clone(&latest),
                skipped: Arc::clone(&skipped),
            };
            let spawned = thread::Builder::new()
                .name(format!("render-worker-{}", worker_id))
                .spawn(move || worker.run());
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => log::error!("Failed to spawn render worker {}: {}", worker_id, e),
            }
        }
        log::debug!("Render workers initialized: {} threads", workers.len());

        Self {
            name: renderer.name(),
            jobs,
            latest,
            skipped,
            _workers: workers,
            rx,
            in_flight: 0,
        }
    }

    /// Wrap an initialized renderer.
    #[cfg(target_arch = "wasm32")]
    pub fn new(renderer: SharedRenderer) -> Self {
        let (tx, rx) = unbounded();
        Self {
            name: renderer.name(),
            renderer,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Build the platform renderer from the config.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_config(config: &ViewerConfig) -> Self {
        let mut renderer = match &config.mmdc_path {
            Some(path) => inkmaid_render::MermaidCli::with_program(path),
            None => inkmaid_render::MermaidCli::new(),
        };
        initialize(&mut renderer, &config.render);
        Self::new(Arc::new(renderer))
    }

    /// Build the platform renderer from the config.
    #[cfg(target_arch = "wasm32")]
    pub fn from_config(config: &ViewerConfig) -> Self {
        let mut renderer = inkmaid_render::MermaidJs::new();
        initialize(&mut renderer, &config.render);
        Self::new(Rc::new(renderer))
    }

    pub fn renderer_name(&self) -> &'static str {
        self.name
    }

    /// Queue `request` for the worker pool.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn submit(&mut self, request: RenderRequest) {
        log::debug!("Dispatching render {} ({})", request.seq, request.id);
        self.latest.fetch_max(request.seq, Ordering::Relaxed);
        match self.jobs.send(request) {
            Ok(()) => self.in_flight += 1,
            Err(e) => log::error!("Failed to queue render {}: {}", e.0.seq, e),
        }
    }

    /// Start rendering `request` in the background.
    #[cfg(target_arch = "wasm32")]
    pub fn submit(&mut self, request: RenderRequest) {
        let renderer = Rc::clone(&self.renderer);
        let tx = self.tx.clone();
        self.in_flight += 1;
        log::debug!("Dispatching render {} ({})", request.seq, request.id);

        wasm_bindgen_futures::spawn_local(async move {
            let result = render_request(renderer.as_ref(), &request).await;
            let _ = tx.send((request.seq, result));
        });
    }

    /// Collect every render that finished since the last call.
    pub fn poll(&mut self) -> Vec<RenderOutcome> {
        let outcomes: Vec<RenderOutcome> = self.rx.try_iter().collect();
        #[cfg(not(target_arch = "wasm32"))]
        let dropped = self.skipped.swap(0, Ordering::Relaxed);
        #[cfg(target_arch = "wasm32")]
        let dropped = 0;
        self.in_flight = self.in_flight.saturating_sub(outcomes.len() + dropped);
        outcomes
    }

    /// Whether any submitted render has not reported back yet.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

/// One thread of the native pool.
#[cfg(not(target_arch = "wasm32"))]
struct RenderWorker {
    id: usize,
    renderer: SharedRenderer,
    queue: Receiver<RenderRequest>,
    results: Sender<RenderOutcome>,
    latest: Arc<AtomicU64>,
    skipped: Arc<AtomicUsize>,
}

#[cfg(not(target_arch = "wasm32"))]
impl RenderWorker {
    fn run(self) {
        log::debug!("Render worker {} started", self.id);

        // Runs until the dispatcher, and with it the job sender, is dropped.
        while let Ok(request) = self.queue.recv() {
            let newest = self.latest.load(Ordering::Relaxed);
            if request.seq < newest {
                log::debug!("Skipping render {}: {} is newer", request.seq, newest);
                self.skipped.fetch_add(1, Ordering::Relaxed);
                continue;
            }
            let result = pollster::block_on(render_request(self.renderer.as_ref(), &request));
            // The receiver only goes away on shutdown.
            let _ = self.results.send((request.seq, result));
        }

        log::debug!("Render worker {} stopped", self.id);
    }
}

fn initialize(renderer: &mut dyn DiagramRenderer, options: &RenderOptions) {
    if let Err(e) = renderer.initialize(options) {
        log::error!("Failed to initialize {}: {}", renderer.name(), e);
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use inkmaid_core::{Completion, EditorSession, Preview};
    use inkmaid_render::{BoxFuture, MemoryRenderer, RenderResult};
    use std::time::{Duration, Instant};

    fn wait_idle(dispatcher: &mut RenderDispatcher) -> Vec<RenderOutcome> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut outcomes = dispatcher.poll();
        while dispatcher.is_busy() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            outcomes.extend(dispatcher.poll());
        }
        outcomes
    }

    /// Records how many renders overlap.
    struct SlowRenderer {
        active: AtomicUsize,
        peak: Arc<AtomicUsize>,
    }

    impl DiagramRenderer for SlowRenderer {
        fn name(&self) -> &'static str {
            "slow"
        }

        fn initialize(&mut self, _options: &RenderOptions) -> RenderResult<()> {
            Ok(())
        }

        fn render(&self, id: &str, _source: &str) -> BoxFuture<'_, RenderResult<String>> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.active.fetch_sub(1, Ordering::SeqCst);
            let svg = format!("<svg id=\"{}\"></svg>", id);
            Box::pin(async move { Ok(svg) })
        }
    }

    #[test]
    fn test_dispatch_roundtrip() {
        let mut dispatcher = RenderDispatcher::new(Arc::new(MemoryRenderer::new()));
        let (mut session, request) =
            EditorSession::new(&ViewerConfig::default(), "graph TD\n  A --> B");
        dispatcher.submit(request);
        assert!(dispatcher.is_busy());

        let outcomes = wait_idle(&mut dispatcher);
        assert_eq!(outcomes.len(), 1);
        assert!(!dispatcher.is_busy());
        for (seq, result) in outcomes {
            assert_eq!(session.complete(seq, result), Completion::Applied);
        }
        assert!(matches!(session.orchestrator().preview(), Preview::Diagram(_)));
    }

    #[test]
    fn test_out_of_order_results_keep_latest() {
        let mut dispatcher = RenderDispatcher::new(Arc::new(MemoryRenderer::new()));
        let (mut session, first) = EditorSession::new(&ViewerConfig::default(), "graph TD\n  A --> B");
        let second = session.edit("graph TD\n  A -->");
        dispatcher.submit(first);
        dispatcher.submit(second);

        let mut outcomes = wait_idle(&mut dispatcher);
        assert!(!outcomes.is_empty());
        // Apply the newer result first, as a slow first render would.
        outcomes.sort_by(|a, b| b.0.cmp(&a.0));
        for (seq, result) in outcomes {
            session.complete(seq, result);
        }
        assert!(matches!(session.orchestrator().preview(), Preview::Error(_)));
    }

    #[test]
    fn test_typing_burst_is_bounded_and_ends_on_latest() {
        let peak = Arc::new(AtomicUsize::new(0));
        let renderer = SlowRenderer {
            active: AtomicUsize::new(0),
            peak: Arc::clone(&peak),
        };
        let mut dispatcher = RenderDispatcher::new(Arc::new(renderer));
        let (mut session, first) = EditorSession::new(&ViewerConfig::default(), "graph TD");
        dispatcher.submit(first);

        let mut source = String::from("graph TD");
        let mut last_seq = 0;
        for _ in 0..12 {
            source.push('\n');
            let request = session.edit(&source);
            last_seq = request.seq;
            dispatcher.submit(request);
        }

        let outcomes = wait_idle(&mut dispatcher);
        assert!(!dispatcher.is_busy());
        assert!(outcomes.len() <= 13);
        assert!(outcomes.iter().any(|(seq, _)| *seq == last_seq));
        assert!(peak.load(Ordering::SeqCst) <= RENDER_WORKERS);

        for (seq, result) in outcomes {
            session.complete(seq, result);
        }
        assert_eq!(session.orchestrator().applied_seq(), last_seq);
    }
}
