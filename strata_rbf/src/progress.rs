/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines progress reporting messages, sinks, and helper functions for long-running processes.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Progress reporting primitives for long-running computations.
//!
//! Every stage of the pipeline reports through an optional
//! [`ProgressSink`]. Nothing is printed; a caller that wants console output
//! installs a sink (see [`closure_sink`]) or a `log` backend.

use std::fmt::Debug;
use std::sync::{Arc, mpsc};
use std::thread;

/// Progress events emitted during long-running computations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMsg {
    /// Event indicating that duplicate control points were removed.
    DuplicatesRemoved { num_duplicates: usize },

    /// Event indicating that the control points were thinned to the cap.
    PointsSubsampled { from: usize, to: usize },

    /// Event indicating iteration status for the iterative solver.
    SolverIteration { iter: usize, residual: f64, progress: f64 },

    /// Event indicating how many query points have been evaluated.
    EvaluationProgress { processed: usize, total: usize, progress: f64 },

    /// Event indicating that a cross-validation fold has been scored.
    CrossValidationFold { fold: usize, folds: usize, error: f64 },

    /// Arbitrary informational message.
    Message { message: String },
}

/// Sink that consumes progress messages.
pub trait ProgressSink: Send + Sync + Debug {
    fn emit(&self, msg: ProgressMsg);
}

/// Progress sink that forwards messages over a channel.
#[derive(Debug)]
pub struct ClosureSink {
    tx: mpsc::SyncSender<ProgressMsg>,
}

impl ProgressSink for ClosureSink {
    #[inline]
    fn emit(&self, msg: ProgressMsg) {
        let _ = self.tx.try_send(msg);
    }
}

/// Spawns a listener thread that runs a handler closure for each progress message.
///
/// Messages are dropped rather than blocking the computation when the
/// buffer is full. The listener exits once every clone of the sink is dropped.
pub fn closure_sink<F>(
    buffer: usize,
    mut handler: F,
) -> (Arc<dyn ProgressSink>, thread::JoinHandle<()>)
where
    F: FnMut(ProgressMsg) + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel::<ProgressMsg>(buffer.max(1));
    let sink: Arc<dyn ProgressSink> = Arc::new(ClosureSink { tx });

    let handle = thread::spawn(move || {
        while let Ok(msg) = rx.recv() {
            handler(msg);
        }
    });

    (sink, handle)
}

/// Sink that collects every message in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: std::sync::Mutex<Vec<ProgressMsg>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the messages received so far.
    pub fn messages(&self) -> Vec<ProgressMsg> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ProgressSink for CollectingSink {
    fn emit(&self, msg: ProgressMsg) {
        match self.messages.lock() {
            Ok(mut guard) => guard.push(msg),
            Err(poisoned) => poisoned.into_inner().push(msg),
        }
    }
}

/// Sends `msg` to `sink` if one is installed.
#[inline]
pub(crate) fn emit(sink: &Option<Arc<dyn ProgressSink>>, msg: ProgressMsg) {
    if let Some(sink) = sink {
        sink.emit(msg);
    }
}

/// Calculates the fraction of progress of the solver based on the
/// current residual and the requested accuracy tolerance. Returns
/// a value in [0, 1].
#[inline]
pub(crate) fn progress_from_rel(current_res: f64, start_res: f64, target_res: f64) -> f64 {
    if current_res <= target_res {
        1.0
    } else if start_res <= target_res || current_res >= start_res {
        0.0
    } else {
        let p = (start_res.log10() - current_res.log10())
            / (start_res.log10() - target_res.log10());
        p.clamp(0.0, 1.0)
    }
}
