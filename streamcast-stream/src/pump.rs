// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The pump task: sole driver of the upstream.
//!
//! Exactly one pump runs per core epoch. It pulls the upstream one element
//! at a time and hands each to [`SharedCore::fan_out`]; completion and
//! failure are recorded once through [`SharedCore::terminate`].
//! Cancellation is checked ahead of every pull, so tearing a pump down
//! never completes another pull.

use crate::mailbox::Terminal;
use crate::state::SharedCore;
use futures::StreamExt;
use std::sync::Arc;
use streamcast_core::StreamEvent;
use tokio_util::sync::CancellationToken;

pub(crate) async fn run<T: Clone + Send + 'static>(
    core: Arc<SharedCore<T>>,
    epoch: u64,
    cancel: CancellationToken,
) {
    if cancel.is_cancelled() {
        return;
    }
    // Upstream startup side effects run here, not at spawn time, and only
    // if this start is still current.
    let Some(mut upstream) = core.build_upstream(epoch) else {
        return;
    };
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = upstream.next() => match event {
                Some(StreamEvent::Value(value)) => {
                    if !core.fan_out(epoch, value) {
                        break;
                    }
                }
                Some(StreamEvent::Error(error)) => {
                    core.terminate(epoch, Terminal::Failed(error));
                    break;
                }
                None => {
                    core.terminate(epoch, Terminal::Finished);
                    break;
                }
            },
        }
    }
}
