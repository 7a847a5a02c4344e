//! Bounded-concurrency chunk submission.
//!
//! A fixed number of workers pull chunks from a shared queue; results come
//! back over a channel and are recorded in the session on the calling thread.
//! Acknowledgement order may differ from index order. The first failure stops
//! workers from taking new chunks and is returned once in-flight ones drain.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Mutex};
use std::thread;

use super::{Chunk, ChunkError, ChunkUploader, UploadError, UploadFile, UploadSession};

pub(super) fn send_pooled(
    uploader: &ChunkUploader<'_>,
    file: &UploadFile,
    session: &mut UploadSession,
) -> Result<(), UploadError> {
    let info = session.info().clone();
    let pending: VecDeque<Chunk> = session
        .chunks()
        .iter()
        .filter(|c| !session.is_acknowledged(c.index))
        .copied()
        .collect();
    let count = pending.len();
    if count == 0 {
        return Ok(());
    }

    let work = Mutex::new(pending);
    let stop = AtomicBool::new(false);
    let num_workers = uploader.options().concurrency.min(count);
    let mut first_error: Option<UploadError> = None;

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<(usize, Result<(), ChunkError>)>();
        for _ in 0..num_workers {
            let tx = tx.clone();
            let (work, stop, info) = (&work, &stop, &info);
            scope.spawn(move || loop {
                if stop.load(Ordering::Relaxed) || uploader.is_aborted() {
                    break;
                }
                let next = match work.lock() {
                    Ok(mut queue) => queue.pop_front(),
                    Err(_) => None,
                };
                let Some(chunk) = next else {
                    break;
                };
                let res = uploader.send_chunk(info, file, &chunk);
                if res.is_err() {
                    stop.store(true, Ordering::Relaxed);
                }
                if tx.send((chunk.index, res)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        for (index, res) in rx {
            match res {
                Ok(()) => uploader.record_ack(session, index),
                Err(source) => {
                    if first_error.is_none() {
                        first_error = Some(uploader.chunk_failed(session, index, source));
                    }
                }
            }
        }
    });

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
