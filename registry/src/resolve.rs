//! Dependency resolution between the fields of a class.
//!
//! A field whose constraints read `block.x` depends on `x`, so `x` (and its
//! own constraints) must be validated first.

use crate::{SchemaError, SchemaResult};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Order fields so that every dependency precedes its dependents.
///
/// `deps[i]` lists the indexes field `i` depends on. Among fields that are
/// ready at the same time, the one declared first goes first, so the order
/// is reproducible and equals declaration order when nothing depends on
/// anything.
pub(crate) fn evaluation_order(
    class: &str,
    names: &[&str],
    deps: &[Vec<usize>],
) -> SchemaResult<Vec<usize>> {
    let n = names.len();
    let mut pending = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

    for (field, field_deps) in deps.iter().enumerate() {
        pending[field] = field_deps.len();
        for &dep in field_deps {
            dependents[dep].push(field);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
        .filter(|&i| pending[i] == 0)
        .map(Reverse)
        .collect();
    let mut order = Vec::with_capacity(n);

    while let Some(Reverse(field)) = ready.pop() {
        order.push(field);
        for &dependent in &dependents[field] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    if order.len() < n {
        let mut resolved = vec![false; n];
        for &i in &order {
            resolved[i] = true;
        }
        let cycle = find_cycle(deps, &resolved)
            .into_iter()
            .map(|i| names[i].to_string())
            .collect();
        return Err(SchemaError::dependency_cycle(class, cycle));
    }

    Ok(order)
}

/// Walk unresolved dependencies from the first unresolved field until a
/// field repeats. Every unresolved field has an unresolved dependency, so
/// the walk always closes a cycle.
fn find_cycle(deps: &[Vec<usize>], resolved: &[bool]) -> Vec<usize> {
    let Some(start) = resolved.iter().position(|r| !r) else {
        return Vec::new();
    };

    let mut path = vec![start];
    let mut current = start;
    loop {
        let Some(&next) = deps[current].iter().find(|&&d| !resolved[d]) else {
            return path;
        };
        if let Some(pos) = path.iter().position(|&p| p == next) {
            let mut cycle = path.split_off(pos);
            cycle.push(next);
            return cycle;
        }
        path.push(next);
        current = next;
    }
}
