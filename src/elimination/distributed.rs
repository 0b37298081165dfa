use crate::elimination::kernel::{
    check_shape, check_tolerance, check_workers, partition_rows, prepare_diagonal, reduce_block,
};
use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix2D;
use crate::utils::show_progression;
use std::ops::Range;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info, warn};

const ROOT: usize = 0;

// Everything that crosses a rank boundary. Payloads are owned, ranks share no memory.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // sent once before elimination; fixes the wire contract for every rank
    Layout {
        rows: usize,
        cols: usize,
        chunks: Vec<Range<usize>>,
    },
    Pivot {
        diagonal: usize,
        row: Vec<f64>,
    },
    Chunk(Vec<f64>),
    Abort,
}

impl Message {
    fn kind(&self) -> &'static str {
        match self {
            Message::Layout { .. } => "layout",
            Message::Pivot { .. } => "pivot",
            Message::Chunk(_) => "chunk",
            Message::Abort => "abort",
        }
    }
}

// Per-rank view of the elimination, agreed through the layout broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct RankContext {
    pub rank: usize,
    pub size: usize,
    pub rows: usize,
    pub cols: usize,
    pub layout: Vec<Range<usize>>,
}

impl RankContext {
    pub fn new(rank: usize, rows: usize, cols: usize, layout: Vec<Range<usize>>) -> RankContext {
        RankContext {
            rank,
            size: layout.len(),
            rows,
            cols,
            layout,
        }
    }

    // global rows owned by this rank
    pub fn chunk_rows(&self) -> Range<usize> {
        self.layout[self.rank].clone()
    }

    pub fn chunk_len(&self) -> usize {
        self.chunk_len_of(self.rank)
    }

    pub fn chunk_len_of(&self, rank: usize) -> usize {
        self.layout[rank].len() * self.cols
    }
}

fn unexpected(rank: usize, expected: &str, got: &Message) -> MatrixError {
    MatrixError::Transport(format!(
        "rank {rank} expected a {expected} message, got {}",
        got.kind()
    ))
}

fn hung_up(rank: usize) -> MatrixError {
    MatrixError::Transport(format!("rank {rank} hung up"))
}

// Root side of the star: one channel pair per worker rank.
pub struct Coordinator {
    workers: Vec<(Sender<Message>, Receiver<Message>)>,
}

// Worker side of the star.
pub struct WorkerLink {
    rank: usize,
    to_root: Sender<Message>,
    from_root: Receiver<Message>,
}

// Build the endpoints for `size` ranks. Rank 0 is the coordinator.
pub fn connect(size: usize) -> (Coordinator, Vec<WorkerLink>) {
    let mut workers = Vec::with_capacity(size.saturating_sub(1));
    let mut links = Vec::with_capacity(size.saturating_sub(1));

    for rank in 1..size {
        let (to_worker, from_root) = mpsc::channel();
        let (to_root, from_worker) = mpsc::channel();
        workers.push((to_worker, from_worker));
        links.push(WorkerLink {
            rank,
            to_root,
            from_root,
        });
    }

    (Coordinator { workers }, links)
}

impl Coordinator {
    pub fn size(&self) -> usize {
        self.workers.len() + 1
    }

    pub fn broadcast(&self, message: &Message) -> Result<()> {
        for (rank, (sender, _)) in self.workers.iter().enumerate() {
            sender
                .send(message.clone())
                .map_err(|_| hung_up(rank + 1))?;
        }
        Ok(())
    }

    // Send every rank its row chunk of the flattened matrix, return the root's own chunk.
    pub fn scatter(&self, buffer: &[f64], context: &RankContext) -> Result<Vec<f64>> {
        let offset = |rank: usize| context.layout[rank].start * context.cols;

        for (index, (sender, _)) in self.workers.iter().enumerate() {
            let rank = index + 1;
            let start = offset(rank);
            let chunk = buffer[start..start + context.chunk_len_of(rank)].to_vec();
            sender
                .send(Message::Chunk(chunk))
                .map_err(|_| hung_up(rank))?;
        }

        let start = offset(ROOT);
        Ok(buffer[start..start + context.chunk_len_of(ROOT)].to_vec())
    }

    // Collect every rank's chunk, in rank order, into one row-major buffer.
    pub fn gather(&self, own: Vec<f64>, context: &RankContext) -> Result<Vec<f64>> {
        let mut buffer = own;
        buffer.reserve(context.rows * context.cols - buffer.len());

        for (index, (_, receiver)) in self.workers.iter().enumerate() {
            let rank = index + 1;
            match receiver.recv().map_err(|_| hung_up(rank))? {
                Message::Chunk(chunk) if chunk.len() == context.chunk_len_of(rank) => {
                    buffer.extend_from_slice(&chunk)
                }
                Message::Chunk(chunk) => {
                    return Err(MatrixError::Transport(format!(
                        "rank {rank} sent {} values, expected {}",
                        chunk.len(),
                        context.chunk_len_of(rank)
                    )))
                }
                other => return Err(unexpected(ROOT, "chunk", &other)),
            }
        }

        Ok(buffer)
    }

    // Tell every rank to stop. Ranks that already hung up are ignored.
    pub fn abort(&self) {
        for (sender, _) in &self.workers {
            let _ = sender.send(Message::Abort);
        }
    }
}

impl WorkerLink {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn receive(&self) -> Result<Message> {
        self.from_root.recv().map_err(|_| hung_up(ROOT))
    }

    pub fn send(&self, message: Message) -> Result<()> {
        self.to_root.send(message).map_err(|_| hung_up(ROOT))
    }
}

// Worker rank: wait for the layout, then for every diagonal receive the pivot row and a
// chunk, reduce the chunk and send it back.
pub fn run_worker(link: WorkerLink) -> Result<()> {
    let rank = link.rank();

    let context = match link.receive()? {
        Message::Layout { rows, cols, chunks } => RankContext::new(rank, rows, cols, chunks),
        Message::Abort => return Ok(()),
        other => return Err(unexpected(rank, "layout", &other)),
    };
    info!(
        rank,
        size = context.size,
        rows = ?context.chunk_rows(),
        "started worker rank"
    );

    let first_row = context.chunk_rows().start;

    for diagonal in 0..context.rows {
        let pivot = match link.receive()? {
            Message::Pivot { diagonal: d, row } if d == diagonal && row.len() == context.cols => {
                row
            }
            Message::Abort => {
                debug!(rank, diagonal, "aborted by coordinator");
                return Ok(());
            }
            other => return Err(unexpected(rank, "pivot", &other)),
        };

        let mut chunk = match link.receive()? {
            Message::Chunk(chunk) if chunk.len() == context.chunk_len() => chunk,
            Message::Abort => return Ok(()),
            other => return Err(unexpected(rank, "chunk", &other)),
        };

        reduce_block(&mut chunk, context.cols, first_row, diagonal, &pivot);
        link.send(Message::Chunk(chunk))?;
    }

    Ok(())
}

fn coordinate(
    matrix: &mut Matrix2D,
    coordinator: &Coordinator,
    tolerance: f64,
) -> Result<()> {
    let rows = matrix.rows();
    let cols = matrix.cols();
    let layout = partition_rows(rows, coordinator.size());
    let context = RankContext::new(ROOT, rows, cols, layout.clone());

    coordinator.broadcast(&Message::Layout {
        rows,
        cols,
        chunks: layout,
    })?;

    let first_row = context.chunk_rows().start;
    let now = Instant::now();

    for diagonal in 0..rows {
        show_progression(diagonal, rows, now);

        let pivot = prepare_diagonal(matrix, diagonal, tolerance)?;
        coordinator.broadcast(&Message::Pivot {
            diagonal,
            row: pivot.clone(),
        })?;

        let flat = matrix.flatten();
        let mut own = coordinator.scatter(&flat, &context)?;
        reduce_block(&mut own, cols, first_row, diagonal, &pivot);

        let gathered = coordinator.gather(own, &context)?;
        matrix.replace_from_slice(&gathered)?;
    }

    Ok(())
}

// Gauss-Jordan elimination over `participants` ranks. Rank 0 runs on the calling thread and
// owns the matrix; the other ranks only ever see owned copies of their chunk and the pivot
// row. Every diagonal is one broadcast, one scatter and one gather.
pub fn distributed_elimination(
    matrix: &mut Matrix2D,
    participants: usize,
    tolerance: f64,
) -> Result<()> {
    check_shape(matrix)?;
    check_workers(participants)?;
    check_tolerance(tolerance)?;

    let (coordinator, links) = connect(participants);
    let handles = links
        .into_iter()
        .map(|link| {
            let rank = link.rank();
            thread::Builder::new()
                .name(format!("rank-{rank}"))
                .spawn(move || run_worker(link))
                .map(|handle| (rank, handle))
                .map_err(MatrixError::from)
        })
        .collect::<Result<Vec<(usize, JoinHandle<Result<()>>)>>>();

    let handles = match handles {
        Ok(handles) => handles,
        Err(error) => {
            // ranks that did start are waiting for the layout
            coordinator.abort();
            return Err(error);
        }
    };

    let result = coordinate(matrix, &coordinator, tolerance);
    if result.is_err() {
        coordinator.abort();
    }
    drop(coordinator);

    let mut worker_error = None;
    for (rank, handle) in handles {
        let outcome = handle
            .join()
            .map_err(|_| MatrixError::Transport(format!("rank {rank} panicked")))
            .and_then(|outcome| outcome);
        if let Err(error) = outcome {
            warn!(rank, %error, "worker rank failed");
            worker_error.get_or_insert(error);
        }
    }

    result?;
    match worker_error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
