//! Join operations for TypedFrame.

use super::TypedFrame;
use crate::error::FrameError;
use crate::record::{Joined, Record};
use polars::prelude::{
    col, DataFrame as PlDataFrame, Expr, IntoLazy, JoinBuilder, JoinCoalesce,
    JoinType as PlJoinType,
};

/// Join type for typed joins.
///
/// Semi and anti joins keep only left columns and so do not change the
/// schema; they live on [`TypedFrame::semi_join`] / [`TypedFrame::anti_join`]
/// instead of here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    /// Full outer join (PySpark outer = Polars full).
    Outer,
}

/// Resolve a key column name against a side's engine columns.
fn resolve_key(df: &PlDataFrame, name: &str, side: &str) -> Result<(), FrameError> {
    let names = df.get_column_names();
    if names.iter().any(|n| n.as_str() == name) {
        return Ok(());
    }
    let available: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    Err(FrameError::NotFound(format!(
        "join key '{}' not found on {} side. Available columns: [{}]",
        name,
        side,
        available.join(", ")
    )))
}

/// Join two typed frames on the given key columns.
///
/// Both key copies are kept (no coalescing), so the output columns are the
/// left columns in order followed by the right columns in order: exactly the
/// `Joined<A, B>` layout. Physical name collisions on the right side get an
/// engine suffix; the typed layer reads positionally and never sees it.
pub(crate) fn join<A: Record, B: Record>(
    left: &TypedFrame<A>,
    right: &TypedFrame<B>,
    on: Vec<&str>,
    how: JoinType,
) -> Result<TypedFrame<Joined<A, B>>, FrameError> {
    for key in &on {
        resolve_key(left.df.as_ref(), key, "left")?;
        resolve_key(right.df.as_ref(), key, "right")?;
    }
    let on_exprs: Vec<Expr> = on.iter().map(|name| col(*name)).collect();
    let polars_how = match how {
        JoinType::Inner => PlJoinType::Inner,
        JoinType::Left => PlJoinType::Left,
        JoinType::Right => PlJoinType::Right,
        JoinType::Outer => PlJoinType::Full,
    };
    let joined = JoinBuilder::new(left.df.as_ref().clone().lazy())
        .with(right.df.as_ref().clone().lazy())
        .how(polars_how)
        .on(&on_exprs)
        .coalesce(JoinCoalesce::KeepColumns)
        .finish()
        .collect()?;
    Ok(TypedFrame::from_polars_unchecked(joined))
}

/// Rows from left with a match in right; left columns only.
pub(crate) fn semi_join<A: Record, B: Record>(
    left: &TypedFrame<A>,
    right: &TypedFrame<B>,
    on: Vec<&str>,
) -> Result<TypedFrame<A>, FrameError> {
    filtering_join(left, right, on, PlJoinType::Semi)
}

/// Rows from left with no match in right; left columns only.
pub(crate) fn anti_join<A: Record, B: Record>(
    left: &TypedFrame<A>,
    right: &TypedFrame<B>,
    on: Vec<&str>,
) -> Result<TypedFrame<A>, FrameError> {
    filtering_join(left, right, on, PlJoinType::Anti)
}

fn filtering_join<A: Record, B: Record>(
    left: &TypedFrame<A>,
    right: &TypedFrame<B>,
    on: Vec<&str>,
    how: PlJoinType,
) -> Result<TypedFrame<A>, FrameError> {
    for key in &on {
        resolve_key(left.df.as_ref(), key, "left")?;
        resolve_key(right.df.as_ref(), key, "right")?;
    }
    let on_exprs: Vec<Expr> = on.iter().map(|name| col(*name)).collect();
    let out = JoinBuilder::new(left.df.as_ref().clone().lazy())
        .with(right.df.as_ref().clone().lazy())
        .how(how)
        .on(&on_exprs)
        .finish()
        .collect()?;
    Ok(TypedFrame::from_polars_unchecked(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_key_lists_available_columns() {
        let left = TypedFrame::<(i64, String)>::from_records(vec![(1, "a".to_string())]).unwrap();
        let right = TypedFrame::<(i64,)>::from_records(vec![(1,)]).unwrap();
        let err = join(&left, &right, vec!["nope"], JoinType::Inner).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nope"));
        assert!(msg.contains("_1"));
    }

    #[test]
    fn joined_frame_has_prepended_arity() {
        let left = TypedFrame::<(i64, String)>::from_records(vec![(1, "a".to_string())]).unwrap();
        let right =
            TypedFrame::<(i64, f64)>::from_records(vec![(1, 0.5)]).unwrap();
        let joined = join(&left, &right, vec!["_1"], JoinType::Inner).unwrap();
        assert_eq!(joined.df.width(), <(i64, String)>::ARITY + <(i64, f64)>::ARITY);
    }
}
