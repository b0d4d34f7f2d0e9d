//! # Factorial by Actor Chain
//!
//! Reads `n` from stdin and prints `n!`.
//!
//! Every actor in the chain multiplies the running product by the next
//! factor, spawns its successor, hands the progress over and dies. The last
//! actor publishes the result; the system then terminates on its own because
//! every actor has processed `GODIE`.
//!
//! ```text
//! echo 20 | cargo run --example factorial
//! ```
//!
//! Products wrap on overflow past `u128::MAX` (n > 34).

use std::io::{self, Read};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context};

use cacti::logging;
use cacti::thread::sync::fatal;
use cacti::{ActorContext, ActorSystem, Message, Role, SendError, ThreadActorSystemConfig};

const MSG_FACTORIZE: usize = 1;
const MSG_PASS_ON: usize = 2;

/// Progress handed down the chain.
#[derive(Debug, Clone)]
struct Progress {
    n: u64,
    k: u64,
    product: u128,
    role: Arc<Role>,
}

fn checked(result: Result<(), SendError>) {
    if let Err(err) = result {
        fatal(format_args!("factorial chain broken: {}", err));
    }
}

fn factorial_role(result: Arc<Mutex<Option<u128>>>) -> Arc<Role> {
    Role::builder()
        // HELLO: nothing to set up.
        .handler(|_: &mut dyn ActorContext, _: &Message| {})
        .handler(move |ctx: &mut dyn ActorContext, msg: &Message| {
            let Some(progress) = msg.payload.downcast_ref::<Progress>() else {
                fatal("FACTORIZE without progress payload");
            };

            if progress.k >= progress.n {
                if let Ok(mut slot) = result.lock() {
                    *slot = Some(progress.product);
                }
            } else {
                let k = progress.k + 1;
                let next = Progress {
                    k,
                    product: progress.product.wrapping_mul(u128::from(k)),
                    ..progress.clone()
                };
                checked(ctx.send_self(Message::spawn(progress.role.clone())));
                checked(ctx.send_self(Message::with_data(MSG_PASS_ON, next)));
            }
            checked(ctx.send_self(Message::godie()));
        })
        .handler(|ctx: &mut dyn ActorContext, msg: &Message| {
            // The successor spawned by the preceding SPAWN got the next id.
            let successor = ctx.id().next();
            checked(ctx.send(successor, Message::new(MSG_FACTORIZE, msg.nbytes, msg.payload.clone())));
        })
        .build_shared()
}

fn read_input() -> anyhow::Result<i64> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    let Some(token) = input.split_whitespace().next() else {
        bail!("expected a number on stdin");
    };
    token
        .parse()
        .with_context(|| format!("not a number: {:?}", token))
}

fn main() -> anyhow::Result<()> {
    logging::init_default();

    let number = read_input()?;
    if number <= 0 {
        println!("1");
        return Ok(());
    }

    let result = Arc::new(Mutex::new(None));
    let role = factorial_role(result.clone());

    let (system, first) = ActorSystem::create(ThreadActorSystemConfig::default(), role.clone())?;
    let progress = Progress {
        n: number as u64,
        k: 1,
        product: 1,
        role,
    };
    system.send(first, Message::with_data(MSG_FACTORIZE, progress))?;
    system.join()?;

    let slot = result
        .lock()
        .map_err(|_| anyhow::anyhow!("result slot poisoned"))?;
    match *slot {
        Some(product) => println!("{}", product),
        None => bail!("actor system stopped before the chain finished"),
    }
    Ok(())
}
