#![allow(dead_code)]
// Leaf operators used by the integration suites. Real operator libraries live outside
// this crate; these are the minimum needed to drive the evaluator.

use bson::Bson;
use nexus_agg::{
    AggError, ComputeOptions, EvalResult, OperatorCategory, OperatorTable, RawOperator, Registry,
    ResolveOptions, compute_value,
};
use std::cmp::Ordering;
use std::sync::Arc;

pub fn as_f64(v: &Bson) -> Option<f64> {
    match v {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(d) => Some(*d),
        _ => None,
    }
}

fn compare(a: Option<&Bson>, b: Option<&Bson>) -> Option<Ordering> {
    let (a, b) = (as_f64(a?)?, as_f64(b?)?);
    a.partial_cmp(&b)
}

fn truthy(v: Option<&Bson>) -> bool {
    match v {
        None | Some(Bson::Null | Bson::Undefined) => false,
        Some(Bson::Boolean(b)) => *b,
        Some(other) => as_f64(other).is_none_or(|n| n != 0.0),
    }
}

/// Values an accumulator reduces: the items themselves when called from `compute_value`,
/// otherwise `expr` evaluated per item.
fn group_values(
    reg: &Registry,
    items: &[Bson],
    expr: &Bson,
    opts: &ComputeOptions<'_>,
) -> Result<Vec<Bson>, AggError> {
    if matches!(expr, Bson::Null) {
        return Ok(items.to_vec());
    }
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if let Some(v) = compute_value(reg, item, expr, None, Some(opts))? {
            out.push(v);
        }
    }
    Ok(out)
}

fn sum(values: &[Bson]) -> Bson {
    let all_int = values
        .iter()
        .filter(|v| as_f64(v).is_some())
        .all(|v| matches!(v, Bson::Int32(_) | Bson::Int64(_)));
    if all_int {
        let total: i64 = values
            .iter()
            .map(|v| match v {
                Bson::Int32(i) => i64::from(*i),
                Bson::Int64(i) => *i,
                _ => 0,
            })
            .sum();
        Bson::Int64(total)
    } else {
        Bson::Double(values.iter().filter_map(as_f64).sum())
    }
}

pub fn accumulators() -> OperatorTable {
    let sum_op = RawOperator::accumulator(|reg, items, expr, opts| {
        Ok(Some(sum(&group_values(reg, items, expr, opts)?)))
    });
    let avg = RawOperator::accumulator(|reg, items, expr, opts| {
        let values = group_values(reg, items, expr, opts)?;
        let nums: Vec<f64> = values.iter().filter_map(as_f64).collect();
        if nums.is_empty() {
            return Ok(Some(Bson::Null));
        }
        let mean = nums.iter().sum::<f64>() / nums.len() as f64;
        Ok(Some(Bson::Double(mean)))
    });
    let push = RawOperator::accumulator(|reg, items, expr, opts| {
        Ok(Some(Bson::Array(group_values(reg, items, expr, opts)?)))
    });
    [("$sum".to_string(), sum_op), ("$avg".to_string(), avg), ("$push".to_string(), push)].into()
}

fn two_args(
    reg: &Registry,
    doc: &Bson,
    expr: &Bson,
    opts: &ComputeOptions<'_>,
    name: &str,
) -> Result<(Option<Bson>, Option<Bson>), AggError> {
    match expr {
        Bson::Array(args) if args.len() == 2 => Ok((
            compute_value(reg, doc, &args[0], None, Some(opts))?,
            compute_value(reg, doc, &args[1], None, Some(opts))?,
        )),
        _ => Err(AggError::TypeError(format!("{name} takes two arguments"))),
    }
}

fn cond(reg: &Registry, doc: &Bson, expr: &Bson, opts: &ComputeOptions<'_>) -> EvalResult {
    let (test, then, otherwise) = match expr {
        Bson::Document(d) => (
            d.get("if").cloned().unwrap_or(Bson::Null),
            d.get("then").cloned().unwrap_or(Bson::Null),
            d.get("else").cloned().unwrap_or(Bson::Null),
        ),
        Bson::Array(a) if a.len() == 3 => (a[0].clone(), a[1].clone(), a[2].clone()),
        _ => return Err(AggError::TypeError("$cond takes if/then/else".into())),
    };
    let branch = if truthy(compute_value(reg, doc, &test, None, Some(opts))?.as_ref()) {
        then
    } else {
        otherwise
    };
    compute_value(reg, doc, &branch, None, Some(opts))
}

pub fn expressions() -> OperatorTable {
    let double = RawOperator::expression(|reg, doc, expr, opts| {
        match compute_value(reg, doc, expr, None, Some(opts))? {
            Some(Bson::Int32(n)) => Ok(Some(Bson::Int32(n * 2))),
            Some(Bson::Int64(n)) => Ok(Some(Bson::Int64(n * 2))),
            Some(Bson::Double(n)) => Ok(Some(Bson::Double(n * 2.0))),
            other => Err(AggError::TypeError(format!("$double expects a number, got {other:?}"))),
        }
    });
    let gt = RawOperator::expression(|reg, doc, expr, opts| {
        let (a, b) = two_args(reg, doc, expr, opts, "$gt")?;
        Ok(Some(Bson::Boolean(compare(a.as_ref(), b.as_ref()) == Some(Ordering::Greater))))
    });
    let eq = RawOperator::expression(|reg, doc, expr, opts| {
        let (a, b) = two_args(reg, doc, expr, opts, "$eq")?;
        Ok(Some(Bson::Boolean(a == b)))
    });
    // [path, expr]: evaluates expr with the value at path as the current document
    let inner = RawOperator::expression(|reg, doc, expr, opts| {
        let Bson::Array(args) = expr else {
            return Err(AggError::TypeError("$inner takes [path, expr]".into()));
        };
        let (Some(Bson::String(path)), Some(body)) = (args.first(), args.get(1)) else {
            return Err(AggError::TypeError("$inner takes [path, expr]".into()));
        };
        let sub = nexus_agg::resolve(doc, path, ResolveOptions::default()).unwrap_or(Bson::Null);
        compute_value(reg, &sub, body, None, Some(opts))
    });
    [
        ("$cond".to_string(), RawOperator::expression(cond)),
        ("$double".to_string(), double),
        ("$eq".to_string(), eq),
        ("$gt".to_string(), gt),
        ("$inner".to_string(), inner),
    ]
    .into()
}

pub fn queries() -> OperatorTable {
    let gt = RawOperator::query(|_, _, resolved, compare_to, _| {
        Ok(compare(resolved, Some(compare_to)) == Some(Ordering::Greater))
    });
    let eq = RawOperator::query(|_, _, resolved, compare_to, _| Ok(resolved == Some(compare_to)));
    [("$gt".to_string(), gt), ("$eq".to_string(), eq)].into()
}

pub fn projections() -> OperatorTable {
    // first n elements of the resolved array
    let take = RawOperator::projection(|_, selector, resolved, expr, _| {
        let n = expr.as_i32().and_then(|n| usize::try_from(n).ok()).unwrap_or(0);
        match resolved {
            Some(Bson::Array(items)) => {
                Ok(Some(Bson::Array(items.iter().take(n).cloned().collect())))
            }
            Some(other) => Err(AggError::TypeError(format!(
                "{selector} is {:?}, not an array",
                other.element_type()
            ))),
            None => Ok(None),
        }
    });
    [("$take".to_string(), take)].into()
}

pub fn pipelines() -> OperatorTable {
    let limit = RawOperator::pipeline(|_, collection, expr, _| {
        let n = expr.as_i32().and_then(|n| usize::try_from(n).ok()).unwrap_or(0);
        Ok(collection.iter().take(n).cloned().collect())
    });
    [("$limit".to_string(), limit)].into()
}

/// Registry with every fixture group registered.
pub fn registry() -> Registry {
    let mut reg = Registry::new();
    reg.add_operators(OperatorCategory::Accumulator, |_| accumulators()).unwrap();
    reg.add_operators(OperatorCategory::Expression, |_| expressions()).unwrap();
    reg.add_operators(OperatorCategory::Query, |_| queries()).unwrap();
    reg.add_operators(OperatorCategory::Projection, |_| projections()).unwrap();
    reg.add_operators(OperatorCategory::Pipeline, |_| pipelines()).unwrap();
    reg
}

pub fn shared() -> Arc<Registry> {
    registry().into_shared()
}
