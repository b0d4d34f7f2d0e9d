//! # Matrix Row Sums by Actor Pipeline
//!
//! Input on stdin: `k n` (rows, columns), then `k * n` pairs `value millis`
//! in row-major order. Prints the sum of every row, one per line.
//!
//! One actor per column. Column 0 walks the rows one after another; every
//! column adds its cell after sleeping for the cell's delay and forwards the
//! row to the next column, so several rows are in the pipeline at once.
//! Columns spawn their right neighbour when they see the first row.
//!
//! ```text
//! printf '2 3\n1 2 1 5 12 4\n23 9 3 11 7 2\n' | cargo run --example matrix
//! ```

use std::io::{self, Read};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};

use cacti::logging::{self, debug};
use cacti::thread::sync::fatal;
use cacti::{ActorContext, ActorSystem, Message, Role, SendError, ThreadActorSystemConfig};

const MSG_SUM: usize = 1;
const MSG_PASS_ON: usize = 2;

#[derive(Debug)]
struct Matrix {
    rows: usize,
    cols: usize,
    values: Vec<i64>,
    delays: Vec<u64>,
    sums: Vec<AtomicI64>,
}

impl Matrix {
    fn cell(&self, row: usize, col: usize) -> (i64, u64) {
        let index = row * self.cols + col;
        (self.values[index], self.delays[index])
    }
}

/// Shared by every message of the pipeline.
#[derive(Debug)]
struct Job {
    matrix: Matrix,
    role: Arc<Role>,
}

/// Per-actor state: which column this actor owns, which row it handles next.
#[derive(Debug)]
struct Column {
    col: usize,
    row: usize,
}

fn checked(result: Result<(), SendError>) {
    if let Err(err) = result {
        fatal(format_args!("matrix pipeline broken: {}", err));
    }
}

fn sum(ctx: &mut dyn ActorContext, msg: &Message) {
    let Some(job) = msg.payload.downcast_arc::<Job>() else {
        fatal("SUM without job payload");
    };
    let matrix = &job.matrix;
    let Some(&mut Column { col, row }) = ctx.state_mut::<Column>() else {
        fatal("SUM before HELLO");
    };
    let last_col = col + 1 == matrix.cols;

    if row == 0 && !last_col {
        checked(ctx.send_self(Message::spawn(job.role.clone())));
    }

    let (value, delay) = matrix.cell(row, col);
    thread::sleep(Duration::from_millis(delay));
    matrix.sums[row].fetch_add(value, Ordering::SeqCst);
    debug!(col, row, value, "cell added");

    if !last_col {
        checked(ctx.send_self(Message::with_shared(MSG_PASS_ON, job.clone())));
    }

    let next_row = row + 1;
    if let Some(column) = ctx.state_mut::<Column>() {
        column.row = next_row;
    }
    if next_row == matrix.rows {
        ctx.take_state::<Column>();
        checked(ctx.send_self(Message::godie()));
    } else if col == 0 {
        checked(ctx.send_self(Message::with_shared(MSG_SUM, job)));
    }
}

fn matrix_role() -> Arc<Role> {
    Role::builder()
        .handler(|ctx: &mut dyn ActorContext, msg: &Message| {
            // Actors spawned by column c own column c + 1.
            let col = msg.payload.actor().map_or(0, |parent| parent.index() + 1);
            ctx.set_state(Column { col, row: 0 });
        })
        .handler(sum)
        .handler(|ctx: &mut dyn ActorContext, msg: &Message| {
            let next = ctx.id().next();
            checked(ctx.send(next, Message::new(MSG_SUM, msg.nbytes, msg.payload.clone())));
        })
        .build_shared()
}

fn read_matrix() -> anyhow::Result<Matrix> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    let mut tokens = input.split_whitespace();
    let mut next = |what: &str| -> anyhow::Result<i64> {
        let token = tokens
            .next()
            .with_context(|| format!("missing {}", what))?;
        token
            .parse()
            .with_context(|| format!("invalid {}: {:?}", what, token))
    };

    let rows = usize::try_from(next("row count")?).context("negative row count")?;
    let cols = usize::try_from(next("column count")?).context("negative column count")?;
    let cells = rows * cols;
    let mut values = Vec::with_capacity(cells);
    let mut delays = Vec::with_capacity(cells);
    for _ in 0..cells {
        values.push(next("value")?);
        delays.push(u64::try_from(next("delay")?).context("negative delay")?);
    }

    Ok(Matrix {
        rows,
        cols,
        values,
        delays,
        sums: (0..rows).map(|_| AtomicI64::new(0)).collect(),
    })
}

fn main() -> anyhow::Result<()> {
    logging::init_default();

    let matrix = read_matrix()?;
    let role = matrix_role();
    let job = Arc::new(Job { matrix, role });

    if job.matrix.rows > 0 && job.matrix.cols > 0 {
        let (system, first) =
            ActorSystem::create(ThreadActorSystemConfig::default(), job.role.clone())?;
        system.send(first, Message::with_shared(MSG_SUM, job.clone()))?;
        system.join()?;
        if system.is_interrupted() {
            bail!("interrupted before every row was summed");
        }
    }

    for row_sum in &job.matrix.sums {
        println!("{}", row_sum.load(Ordering::SeqCst));
    }
    Ok(())
}
