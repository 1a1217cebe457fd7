//! Schema-preserving frame operations: filter, distinct, limit, tail, offset,
//! union, intersect, subtract, sample. Each delegates to one engine
//! operation and rewraps the result under the same record type.

use super::TypedFrame;
use crate::error::FrameError;
use crate::record::Record;
use polars::prelude::{
    col, Expr, IntoLazy, JoinBuilder, JoinType as PlJoinType, NamedFrom, Series, UnionArgs,
    UniqueKeepStrategy,
};

/// Filter rows using a Polars expression.
pub(crate) fn filter<R: Record>(
    frame: &TypedFrame<R>,
    condition: Expr,
) -> Result<TypedFrame<R>, FrameError> {
    let lf = frame.df.as_ref().clone().lazy().filter(condition);
    Ok(TypedFrame::from_polars_unchecked(lf.collect()?))
}

/// Distinct: drop duplicate rows, keeping first occurrences in order.
pub(crate) fn distinct<R: Record>(frame: &TypedFrame<R>) -> Result<TypedFrame<R>, FrameError> {
    let lf = frame
        .df
        .as_ref()
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First);
    Ok(TypedFrame::from_polars_unchecked(lf.collect()?))
}

/// Limit: return first n rows.
pub(crate) fn limit<R: Record>(
    frame: &TypedFrame<R>,
    n: usize,
) -> Result<TypedFrame<R>, FrameError> {
    Ok(TypedFrame::from_polars_unchecked(
        frame.df.as_ref().head(Some(n)),
    ))
}

/// Last n rows.
pub(crate) fn tail<R: Record>(
    frame: &TypedFrame<R>,
    n: usize,
) -> Result<TypedFrame<R>, FrameError> {
    Ok(TypedFrame::from_polars_unchecked(
        frame.df.as_ref().tail(Some(n)),
    ))
}

/// Skip first n rows.
pub(crate) fn offset<R: Record>(
    frame: &TypedFrame<R>,
    n: usize,
) -> Result<TypedFrame<R>, FrameError> {
    let height = frame.df.height();
    let remaining = height.saturating_sub(n);
    Ok(TypedFrame::from_polars_unchecked(
        frame.df.slice(n as i64, remaining),
    ))
}

/// Union (unionAll): stack vertically. The shared record type guarantees
/// matching column layout.
pub(crate) fn union<R: Record>(
    left: &TypedFrame<R>,
    right: &TypedFrame<R>,
) -> Result<TypedFrame<R>, FrameError> {
    let lf1 = left.df.as_ref().clone().lazy();
    let lf2 = right.df.as_ref().clone().lazy();
    let out = polars::prelude::concat([lf1, lf2], UnionArgs::default())?.collect()?;
    Ok(TypedFrame::from_polars_unchecked(out))
}

/// Set intersection (distinct rows present in both sides).
pub(crate) fn intersect<R: Record>(
    left: &TypedFrame<R>,
    right: &TypedFrame<R>,
) -> Result<TypedFrame<R>, FrameError> {
    set_op(left, right, PlJoinType::Semi)
}

/// Set difference (distinct rows of left absent from right).
pub(crate) fn subtract<R: Record>(
    left: &TypedFrame<R>,
    right: &TypedFrame<R>,
) -> Result<TypedFrame<R>, FrameError> {
    set_op(left, right, PlJoinType::Anti)
}

/// Semi/anti join on all columns, nulls compared equal (Spark set-operation
/// semantics), then distinct.
fn set_op<R: Record>(
    left: &TypedFrame<R>,
    right: &TypedFrame<R>,
    how: PlJoinType,
) -> Result<TypedFrame<R>, FrameError> {
    let on_exprs: Vec<Expr> = left
        .df
        .get_column_names()
        .iter()
        .map(|n| col(n.as_str()))
        .collect();
    let lf = JoinBuilder::new(left.df.as_ref().clone().lazy())
        .with(right.df.as_ref().clone().lazy())
        .how(how)
        .on(&on_exprs)
        .join_nulls(true)
        .finish()
        .unique_stable(None, UniqueKeepStrategy::First);
    Ok(TypedFrame::from_polars_unchecked(lf.collect()?))
}

/// Sample a fraction of rows, keeping engine row order.
pub(crate) fn sample<R: Record>(
    frame: &TypedFrame<R>,
    with_replacement: bool,
    fraction: f64,
    seed: Option<u64>,
) -> Result<TypedFrame<R>, FrameError> {
    let frac = Series::new("fraction".into(), vec![fraction]);
    let pl_df = frame
        .df
        .sample_frac(&frac, with_replacement, false, seed)?;
    Ok(TypedFrame::from_polars_unchecked(pl_df))
}
