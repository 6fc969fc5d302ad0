//! Scripted access backends shared by the integration tests.
//!
//! Each mock keeps its state behind an `Arc<Mutex<_>>` so a test can inspect
//! and steer the backend after it has been moved into a stream.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use media_access::control::{Control, ControlReply};
use media_access::stream::{
    Access, AccessContext, AccessModule, Capabilities, FilterChain, OpenError, ReadOutcome,
};
use media_access::{AccessError, Block, Opener, Registry, StatsSink, Stream};

// ─── Block-mode backend ──────────────────────────────────────────────────────

/// State of a [`BlockAccess`].
#[derive(Default)]
pub struct BlockState {
    /// `None` entries are transient gaps (no block, not at end).
    pub queue: VecDeque<Option<Vec<u8>>>,
    /// Replaces `queue` on every successful seek.
    pub after_seek: Vec<Vec<u8>>,
    pub eof: bool,
    pub fetches: usize,
    pub seeks: Vec<u64>,
    pub accept_titles: bool,
    pub title: usize,
    /// Cancelled during the given (1-based) fetch.
    pub cancel_on_fetch: Option<(usize, CancellationToken)>,
}

impl BlockState {
    pub fn with_blocks(blocks: &[&[u8]]) -> Self {
        Self {
            queue: blocks.iter().map(|b| Some(b.to_vec())).collect(),
            accept_titles: true,
            ..Self::default()
        }
    }
}

pub struct BlockAccess {
    pub state: Arc<Mutex<BlockState>>,
    pub capabilities: Capabilities,
    pub dropped: Arc<AtomicBool>,
}

impl BlockAccess {
    pub fn new(state: BlockState) -> (Self, Arc<Mutex<BlockState>>) {
        let state = Arc::new(Mutex::new(state));
        let access = Self {
            state: Arc::clone(&state),
            capabilities: Capabilities::block_stream().with_seek(true),
            dropped: Arc::default(),
        };
        (access, state)
    }
}

impl Access for BlockAccess {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn eof(&self) -> bool {
        self.state.lock().eof
    }

    fn block(&mut self) -> Option<Block> {
        let mut state = self.state.lock();
        state.fetches += 1;
        if let Some((at, token)) = &state.cancel_on_fetch {
            if *at == state.fetches {
                token.cancel();
            }
        }
        let next = state.queue.pop_front();
        if state.queue.is_empty() {
            state.eof = true;
        }
        next.flatten().map(Block::from)
    }

    fn seek(&mut self, offset: u64) -> media_access::Result<()> {
        let mut state = self.state.lock();
        state.seeks.push(offset);
        let fresh: VecDeque<_> = state.after_seek.iter().cloned().map(Some).collect();
        state.queue = fresh;
        state.eof = false;
        Ok(())
    }

    fn control(&mut self, query: Control) -> media_access::Result<ControlReply> {
        let mut state = self.state.lock();
        match query {
            Control::SetTitle(title) | Control::SetSeekpoint(title) => {
                if state.accept_titles {
                    state.title = title;
                    let fresh: VecDeque<_> = state.after_seek.iter().cloned().map(Some).collect();
                    state.queue = fresh;
                    state.eof = false;
                    Ok(ControlReply::Done)
                } else {
                    Err(AccessError::Backend("title change rejected".to_string()))
                }
            }
            Control::GetTitle => Ok(ControlReply::Title(state.title)),
            Control::CanSeek => Ok(ControlReply::Flag(true)),
            other => Err(AccessError::Unsupported(other.tag())),
        }
    }
}

impl Drop for BlockAccess {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

// ─── Byte-mode backend ───────────────────────────────────────────────────────

/// One scripted answer of a [`ByteAccess`].
#[derive(Debug, Clone)]
pub enum Step {
    Data(Vec<u8>),
    Retry,
    Eof,
}

#[derive(Default)]
pub struct ByteState {
    pub script: VecDeque<Step>,
    pub eof: bool,
    pub calls: usize,
    /// Buffer lengths passed to each read call.
    pub lengths: Vec<usize>,
    /// Cancelled during the given (1-based) call.
    pub cancel_on_call: Option<(usize, CancellationToken)>,
}

impl ByteState {
    pub fn with_steps(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: steps.into_iter().collect(),
            ..Self::default()
        }
    }
}

pub struct ByteAccess {
    pub state: Arc<Mutex<ByteState>>,
}

impl ByteAccess {
    pub fn new(state: ByteState) -> (Self, Arc<Mutex<ByteState>>) {
        let state = Arc::new(Mutex::new(state));
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }
}

impl Access for ByteAccess {
    fn capabilities(&self) -> Capabilities {
        Capabilities::byte_stream()
    }

    fn eof(&self) -> bool {
        self.state.lock().eof
    }

    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        let mut state = self.state.lock();
        state.calls += 1;
        state.lengths.push(buf.len());
        if let Some((at, token)) = &state.cancel_on_call {
            if *at == state.calls {
                token.cancel();
            }
        }
        match state.script.pop_front() {
            Some(Step::Data(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    state.script.push_front(Step::Data(data.split_off(n)));
                }
                ReadOutcome::Data(n)
            }
            Some(Step::Retry) => ReadOutcome::Retry,
            Some(Step::Eof) | None => {
                state.eof = true;
                ReadOutcome::Eof
            }
        }
    }

    fn seek(&mut self, _offset: u64) -> media_access::Result<()> {
        self.state.lock().eof = false;
        Ok(())
    }

    fn control(&mut self, query: Control) -> media_access::Result<ControlReply> {
        match query {
            Control::CanSeek => Ok(ControlReply::Flag(true)),
            other => Err(AccessError::Unsupported(other.tag())),
        }
    }
}

// ─── Other shapes ────────────────────────────────────────────────────────────

/// Backend with a fixed capability set and no data.
pub struct Inert {
    pub capabilities: Capabilities,
    pub touched: Arc<AtomicUsize>,
}

impl Inert {
    pub fn new(capabilities: Capabilities) -> (Self, Arc<AtomicUsize>) {
        let touched = Arc::new(AtomicUsize::new(0));
        (
            Self {
                capabilities,
                touched: Arc::clone(&touched),
            },
            touched,
        )
    }
}

impl Access for Inert {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn eof(&self) -> bool {
        self.touched.fetch_add(1, Ordering::SeqCst);
        false
    }

    fn read(&mut self, _buf: &mut [u8]) -> ReadOutcome {
        self.touched.fetch_add(1, Ordering::SeqCst);
        ReadOutcome::Eof
    }

    fn block(&mut self) -> Option<Block> {
        self.touched.fetch_add(1, Ordering::SeqCst);
        None
    }

    fn control(&mut self, query: Control) -> media_access::Result<ControlReply> {
        media_access::control::directory_control(&query)
    }
}

// ─── Module / opener helpers ─────────────────────────────────────────────────

/// Module handing out one prepared backend for the `mock` scheme.
pub struct OneShot {
    slot: Mutex<Option<Box<dyn Access>>>,
    pub opens: Arc<AtomicUsize>,
}

impl OneShot {
    pub fn new(access: Box<dyn Access>) -> (Self, Arc<AtomicUsize>) {
        let opens = Arc::new(AtomicUsize::new(0));
        (
            Self {
                slot: Mutex::new(Some(access)),
                opens: Arc::clone(&opens),
            },
            opens,
        )
    }
}

impl AccessModule for OneShot {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn shortcuts(&self) -> &[&'static str] {
        &["mock"]
    }

    fn priority(&self) -> i32 {
        10
    }

    fn open(&self, _ctx: &AccessContext<'_>) -> Result<Box<dyn Access>, OpenError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.slot.lock().take().ok_or(OpenError::Declined)
    }
}

/// Opener whose registry serves `mock://` with `access`.
pub fn opener(access: impl Access + 'static) -> Opener {
    let (module, _) = OneShot::new(Box::new(access));
    Opener::new(Registry::new().with_module(Box::new(module)))
}

/// Read `stream` to end in chunks of `chunk` bytes.
pub fn read_all(stream: &mut dyn Stream, chunk: usize) -> media_access::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; chunk];
    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Ok(out);
        }
        out.extend_from_slice(&buf[..n]);
    }
}

/// Filter chain that records requested recipes and decorates nothing.
#[derive(Default, Clone)]
pub struct RecordingChain {
    pub recipes: Arc<Mutex<Vec<String>>>,
}

impl FilterChain for RecordingChain {
    fn wrap(&self, source: Box<dyn Stream>, recipe: &str) -> Box<dyn Stream> {
        self.recipes.lock().push(recipe.to_string());
        source
    }
}

/// Statistics sink counting bytes and packets, logging each byte report.
#[derive(Default, Clone)]
pub struct Counting {
    pub bytes: Arc<Mutex<u64>>,
    pub packets: Arc<Mutex<u64>>,
    /// `(bytes this read, running total)` per report.
    pub reads: Arc<Mutex<Vec<(u64, u64)>>>,
}

impl StatsSink for Counting {
    fn read_bytes(&mut self, bytes: u64) -> u64 {
        let mut total = self.bytes.lock();
        *total += bytes;
        self.reads.lock().push((bytes, *total));
        *total
    }

    fn input_bitrate(&mut self, _total: u64) {}

    fn read_packets(&mut self, delta: u64) {
        *self.packets.lock() += delta;
    }
}
