//! Operation command implementations and the shared operation poller

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use crate::cli::{CommandContext, GlobalOptions};
use crate::client::StoreApi;
use crate::client::models::{Operation, OperationStatus, OperationType};
use crate::error::{Error, Result};
use crate::models::operation_fields;
use crate::output::{self, Detail};

/// Delay between operation polls
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Give up waiting on an operation after this long
pub const MAX_WAIT: Duration = Duration::from_secs(10 * 60);

/// Run the operation get command
pub async fn get(opts: &GlobalOptions, name: &str, op_type: Option<OperationType>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    debug!("Fetching operation {}", name);
    let op = ctx.client.get_operation(name).await?;
    let status = OperationStatus::from_operation(op, op_type);

    output::print(&Detail::new(&status, operation_fields(&status)), ctx.format)
}

/// Spinner on stderr, or nothing when quiet.
pub fn spinner(message: &str, quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let sp = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]") {
        sp.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
    }
    sp.set_message(message.to_string());
    sp.enable_steady_tick(Duration::from_millis(80));
    Some(sp)
}

/// Poll `op` until it finishes, fails, or `max_wait` passes.
///
/// A failed operation is returned as a status with `failed` set; only
/// transport errors and the deadline become `Err`.
pub async fn wait_for_operation<C: StoreApi + ?Sized>(
    client: &C,
    op: Operation,
    op_type: OperationType,
    quiet: bool,
    max_wait: Duration,
) -> Result<OperationStatus> {
    let name = op.name.clone();
    let sp = spinner(&format!("Waiting for {} {}", op_type, name), quiet);

    let result = tokio::time::timeout(max_wait, async {
        let mut op = op;
        while !op.done && op.error.is_none() {
            tokio::time::sleep(POLL_INTERVAL).await;
            op = client.get_operation(&name).await?;
            debug!("Operation {} done={}", name, op.done);
        }
        Ok::<_, Error>(op)
    })
    .await;

    if let Some(sp) = sp {
        sp.finish_and_clear();
    }

    match result {
        Ok(op) => Ok(OperationStatus::from_operation(op?, Some(op_type))),
        Err(_) => Err(Error::Other(format!(
            "timed out after {:?} waiting for {}; check it later with `file-search operation get {}`",
            max_wait, name, name
        ))),
    }
}
