//! Typed combinators: element-wise and partition-wise transforms.
//!
//! Each combinator converts rows to their typed form before invoking the
//! caller's function, then rebuilds a frame of the output record type.
//! Iteration order is the engine's materialization order; the eager backend
//! holds a single partition.

use super::TypedFrame;
use crate::error::FrameError;
use crate::record::Record;

pub(crate) fn map<R, R2, F>(frame: &TypedFrame<R>, mut f: F) -> Result<TypedFrame<R2>, FrameError>
where
    R: Record,
    R2: Record,
    F: FnMut(R) -> R2,
{
    let records = frame.collect()?;
    TypedFrame::from_records(records.into_iter().map(&mut f).collect())
}

pub(crate) fn flat_map<R, R2, I, F>(
    frame: &TypedFrame<R>,
    mut f: F,
) -> Result<TypedFrame<R2>, FrameError>
where
    R: Record,
    R2: Record,
    I: IntoIterator<Item = R2>,
    F: FnMut(R) -> I,
{
    let records = frame.collect()?;
    let mut out = Vec::new();
    for record in records {
        out.extend(f(record));
    }
    TypedFrame::from_records(out)
}

pub(crate) fn map_partitions<R, R2, F>(
    frame: &TypedFrame<R>,
    f: F,
) -> Result<TypedFrame<R2>, FrameError>
where
    R: Record,
    R2: Record,
    F: FnOnce(Vec<R>) -> Vec<R2>,
{
    TypedFrame::from_records(f(frame.collect()?))
}

pub(crate) fn foreach<R, F>(frame: &TypedFrame<R>, mut f: F) -> Result<(), FrameError>
where
    R: Record,
    F: FnMut(R),
{
    for record in frame.collect()? {
        f(record);
    }
    Ok(())
}
